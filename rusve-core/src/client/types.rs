use prost_reflect::{EnumDescriptor, MessageDescriptor, ServiceDescriptor};

/// A call to one method of the service a [`super::ServiceClient`] is bound to.
#[derive(Debug, Clone)]
pub struct DynamicRequest {
    /// The method name as declared in the schema (e.g. `GetNotes`).
    pub method: String,
    /// The JSON body of the request.
    /// - Unary and server streaming methods take an object `{}`.
    /// - Client streaming and bidirectional methods take an array of objects `[{}]`.
    pub body: serde_json::Value,
    /// gRPC metadata (headers) attached to the request.
    pub headers: Vec<(String, String)>,
}

/// The result of a dynamic call that reached the server.
#[derive(Debug, Clone)]
pub enum DynamicResponse {
    /// A single response message (unary and client streaming methods).
    Unary(Result<serde_json::Value, tonic::Status>),
    /// Every message of a response stream (server streaming and bidirectional methods).
    Streaming(Result<Vec<Result<serde_json::Value, tonic::Status>>, tonic::Status>),
}

/// A service, message or enum resolved from the descriptor pool.
#[derive(Debug, Clone)]
pub enum Descriptor {
    MessageDescriptor(MessageDescriptor),
    ServiceDescriptor(ServiceDescriptor),
    EnumDescriptor(EnumDescriptor),
}

impl Descriptor {
    /// Short name, e.g. `File`.
    pub fn name(&self) -> &str {
        match self {
            Descriptor::MessageDescriptor(v) => v.name(),
            Descriptor::ServiceDescriptor(v) => v.name(),
            Descriptor::EnumDescriptor(v) => v.name(),
        }
    }

    /// Fully qualified name, e.g. `proto.File`.
    pub fn full_name(&self) -> &str {
        match self {
            Descriptor::MessageDescriptor(v) => v.full_name(),
            Descriptor::ServiceDescriptor(v) => v.full_name(),
            Descriptor::EnumDescriptor(v) => v.full_name(),
        }
    }

    pub fn message_descriptor(&self) -> Option<&MessageDescriptor> {
        match self {
            Descriptor::MessageDescriptor(d) => Some(d),
            _ => None,
        }
    }

    pub fn service_descriptor(&self) -> Option<&ServiceDescriptor> {
        match self {
            Descriptor::ServiceDescriptor(d) => Some(d),
            _ => None,
        }
    }

    pub fn enum_descriptor(&self) -> Option<&EnumDescriptor> {
        match self {
            Descriptor::EnumDescriptor(d) => Some(d),
            _ => None,
        }
    }
}
