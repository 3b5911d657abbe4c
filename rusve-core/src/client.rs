//! # Service Client
//!
//! A [`ServiceClient`] is the handle through which every call to one of the rusve
//! services goes. It is bound to one service descriptor and one underlying tonic
//! service (normally a lazily connected [`Channel`]).
//!
//! Handles are built once by [`crate::AppContext`] and shared for the life of the
//! process. They are cheap to clone and every call takes `&self`: the inner channel
//! is cloned per call, which is how tonic expects concurrent callers to share it.
mod types;

pub use types::*;

use crate::{
    BoxError,
    grpc::client::{GrpcClient, GrpcRequestError},
    service::ServiceKind,
    transport::Target,
};
use futures_util::{Stream, StreamExt};
use http_body::Body as HttpBody;
use prost_reflect::{MethodDescriptor, ServiceDescriptor};
use tonic::transport::Channel;
use tracing::debug;

/// Errors that can occur before a dynamic call reaches the server.
#[derive(Debug, thiserror::Error)]
pub enum DynamicCallError {
    #[error("Invalid input: '{0}'")]
    InvalidInput(String),
    #[error("Method '{method}' not found in service '{service}'")]
    MethodNotFound { service: String, method: String },
    #[error("gRPC client request error: '{0}'")]
    GrpcRequestError(#[from] GrpcRequestError),
}

#[derive(Debug, Clone)]
pub struct ServiceClient<S = Channel> {
    kind: ServiceKind,
    descriptor: ServiceDescriptor,
    /// `None` when the handle wraps an in-process service.
    target: Option<Target>,
    service: S,
}

impl<S> ServiceClient<S> {
    pub fn new(
        kind: ServiceKind,
        descriptor: ServiceDescriptor,
        target: Option<Target>,
        service: S,
    ) -> Self {
        Self {
            kind,
            descriptor,
            target,
            service,
        }
    }

    pub fn kind(&self) -> ServiceKind {
        self.kind
    }

    pub fn descriptor(&self) -> &ServiceDescriptor {
        &self.descriptor
    }

    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    /// Names of the methods declared by the service.
    pub fn method_names(&self) -> Vec<String> {
        self.descriptor
            .methods()
            .map(|m| m.name().to_string())
            .collect()
    }

    pub fn method(&self, name: &str) -> Option<MethodDescriptor> {
        self.descriptor.methods().find(|m| m.name() == name)
    }
}

impl<S: Clone> ServiceClient<S> {
    /// The underlying tonic service, for building generated clients over it.
    pub fn inner(&self) -> S {
        self.service.clone()
    }
}

impl<S> ServiceClient<S>
where
    S: tonic::client::GrpcService<tonic::body::Body> + Clone,
    S::Error: Into<BoxError>,
    S::ResponseBody: HttpBody<Data = tonic::codegen::Bytes> + Send + 'static,
    <S::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
{
    /// Calls `request.method` with a JSON body.
    ///
    /// The RPC shape is taken from the method descriptor. Streaming responses are
    /// collected before returning.
    pub async fn dynamic(
        &self,
        request: DynamicRequest,
    ) -> Result<DynamicResponse, DynamicCallError> {
        let method =
            self.method(&request.method)
                .ok_or_else(|| DynamicCallError::MethodNotFound {
                    service: self.descriptor.full_name().to_string(),
                    method: request.method.clone(),
                })?;

        debug!(service = %self.kind, method = %request.method, "dynamic call");

        let mut grpc_client = GrpcClient::new(self.service.clone());

        match (method.is_client_streaming(), method.is_server_streaming()) {
            (false, false) => {
                let result = grpc_client
                    .unary(method, request.body, request.headers)
                    .await?;
                Ok(DynamicResponse::Unary(result))
            }
            (false, true) => match grpc_client
                .server_streaming(method, request.body, request.headers)
                .await?
            {
                Ok(stream) => Ok(DynamicResponse::Streaming(Ok(stream.collect().await))),
                Err(status) => Ok(DynamicResponse::Streaming(Err(status))),
            },
            (true, false) => {
                let input_stream =
                    json_array_to_stream(request.body).map_err(DynamicCallError::InvalidInput)?;
                let result = grpc_client
                    .client_streaming(method, input_stream, request.headers)
                    .await?;
                Ok(DynamicResponse::Unary(result))
            }
            (true, true) => {
                let input_stream =
                    json_array_to_stream(request.body).map_err(DynamicCallError::InvalidInput)?;
                match grpc_client
                    .bidirectional_streaming(method, input_stream, request.headers)
                    .await?
                {
                    Ok(stream) => Ok(DynamicResponse::Streaming(Ok(stream.collect().await))),
                    Err(status) => Ok(DynamicResponse::Streaming(Err(status))),
                }
            }
        }
    }
}

fn json_array_to_stream(
    json: serde_json::Value,
) -> Result<impl Stream<Item = serde_json::Value> + Send + 'static, String> {
    match json {
        serde_json::Value::Array(items) => Ok(tokio_stream::iter(items)),
        _ => Err("Client streaming requires a JSON Array body".to_string()),
    }
}
