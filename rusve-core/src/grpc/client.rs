//! # Dynamic gRPC Client
//!
//! Wraps `tonic::client::Grpc` so that a method is selected at runtime from a
//! [`MethodDescriptor`] instead of a generated stub.
//!
//! The HTTP/2 path (`/proto.NotesService/GetNotes`) is built from the descriptor,
//! string header pairs become gRPC metadata, and [`JsonCodec`] does the
//! transcoding. One method exists per RPC shape.
use super::codec::JsonCodec;
use crate::BoxError;
use futures_util::Stream;
use http_body::Body as HttpBody;
use prost_reflect::MethodDescriptor;
use std::str::FromStr;
use tonic::{
    client::GrpcService,
    metadata::{
        MetadataKey, MetadataValue,
        errors::{InvalidMetadataKey, InvalidMetadataValue},
    },
    transport::Channel,
};
use tracing::debug;

#[derive(thiserror::Error, Debug)]
pub enum GrpcRequestError {
    #[error("Internal error, the client was not ready: '{0}'")]
    ClientNotReady(#[source] BoxError),
    #[error("Invalid gRPC path '{0}'")]
    InvalidPath(String),
    #[error("Invalid metadata (header) key '{key}': '{source}'")]
    InvalidMetadataKey {
        key: String,
        source: InvalidMetadataKey,
    },
    #[error("Invalid metadata (header) value for key '{key}': '{source}'")]
    InvalidMetadataValue {
        key: String,
        source: InvalidMetadataValue,
    },
}

/// The outcome of a call that reached the server: a value or the returned status.
pub type CallResult<T> = Result<T, tonic::Status>;

#[derive(Debug, Clone)]
pub struct GrpcClient<S = Channel> {
    client: tonic::client::Grpc<S>,
}

impl<S> GrpcClient<S>
where
    S: GrpcService<tonic::body::Body>,
    S::Error: Into<BoxError>,
    S::ResponseBody: HttpBody<Data = tonic::codegen::Bytes> + Send + 'static,
    <S::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
{
    pub fn new(service: S) -> Self {
        let client = tonic::client::Grpc::new(service);
        Self { client }
    }

    /// Sends one JSON message and waits for the single reply.
    ///
    /// The outer `Result` fails when nothing went over the wire (bad header, client
    /// not ready). Once the call reached the server its status is reported in the
    /// inner [`CallResult`], so `NOT_FOUND` and friends are values, not errors.
    pub async fn unary(
        &mut self,
        method: MethodDescriptor,
        payload: serde_json::Value,
        headers: Vec<(String, String)>,
    ) -> Result<CallResult<serde_json::Value>, GrpcRequestError> {
        let (path, codec) = self.prepare(&method).await?;
        let request = build_request(payload, headers)?;

        Ok(into_call_result(self.client.unary(request, path, codec).await))
    }

    /// Sends one JSON message; the replies arrive as a stream (e.g. `GetNotes`).
    pub async fn server_streaming(
        &mut self,
        method: MethodDescriptor,
        payload: serde_json::Value,
        headers: Vec<(String, String)>,
    ) -> Result<
        CallResult<impl Stream<Item = CallResult<serde_json::Value>>>,
        GrpcRequestError,
    > {
        let (path, codec) = self.prepare(&method).await?;
        let request = build_request(payload, headers)?;

        Ok(into_call_result(
            self.client.server_streaming(request, path, codec).await,
        ))
    }

    pub async fn client_streaming(
        &mut self,
        method: MethodDescriptor,
        messages: impl Stream<Item = serde_json::Value> + Send + 'static,
        headers: Vec<(String, String)>,
    ) -> Result<CallResult<serde_json::Value>, GrpcRequestError> {
        let (path, codec) = self.prepare(&method).await?;
        let request = build_request(messages, headers)?;

        Ok(into_call_result(
            self.client.client_streaming(request, path, codec).await,
        ))
    }

    /// Both directions stream; the outgoing stream is consumed while replies are read.
    pub async fn bidirectional_streaming(
        &mut self,
        method: MethodDescriptor,
        messages: impl Stream<Item = serde_json::Value> + Send + 'static,
        headers: Vec<(String, String)>,
    ) -> Result<
        CallResult<impl Stream<Item = CallResult<serde_json::Value>>>,
        GrpcRequestError,
    > {
        let (path, codec) = self.prepare(&method).await?;
        let request = build_request(messages, headers)?;

        Ok(into_call_result(
            self.client.streaming(request, path, codec).await,
        ))
    }

    async fn prepare(
        &mut self,
        method: &MethodDescriptor,
    ) -> Result<(http::uri::PathAndQuery, JsonCodec), GrpcRequestError> {
        self.client
            .ready()
            .await
            .map_err(|e| GrpcRequestError::ClientNotReady(e.into()))?;

        let path = http_path(method)?;
        debug!(path = %path, "dispatching gRPC call");

        Ok((path, JsonCodec::new(method.input(), method.output())))
    }
}

fn http_path(method: &MethodDescriptor) -> Result<http::uri::PathAndQuery, GrpcRequestError> {
    let path = format!("/{}/{}", method.parent_service().full_name(), method.name());
    http::uri::PathAndQuery::from_str(&path).map_err(|_| GrpcRequestError::InvalidPath(path))
}

fn into_call_result<T>(result: Result<tonic::Response<T>, tonic::Status>) -> CallResult<T> {
    result.map(tonic::Response::into_inner)
}

/// Wraps `body` in a request whose metadata holds every header pair.
fn build_request<T>(
    body: T,
    headers: Vec<(String, String)>,
) -> Result<tonic::Request<T>, GrpcRequestError> {
    let mut request = tonic::Request::new(body);
    let metadata = request.metadata_mut();

    for (name, value) in headers {
        let key = match MetadataKey::from_str(&name) {
            Ok(key) => key,
            Err(source) => return Err(GrpcRequestError::InvalidMetadataKey { key: name, source }),
        };
        let value = match MetadataValue::from_str(&value) {
            Ok(value) => value,
            Err(source) => {
                return Err(GrpcRequestError::InvalidMetadataValue { key: name, source });
            }
        };
        metadata.insert(key, value);
    }
    Ok(request)
}
