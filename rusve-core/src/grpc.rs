//! # Dynamic gRPC Transport
//!
//! Low-level pieces used by [`crate::ServiceClient`] to call any method of a rusve
//! service with `serde_json::Value` payloads, transcoding them to Protobuf on the fly
//! with the descriptors parsed at startup.
pub mod client;
pub mod codec;
