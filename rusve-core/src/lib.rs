//! # Rusve Core
//!
//! `rusve-core` turns the embedded rusve schemas into ready-to-use clients for the
//! three backend services: `UsersService`, `NotesService` and `UtilsService`.
//!
//! ## Key Components
//!
//! * **[`AppContext`]:** Built once at startup by [`AppContext::bootstrap`]. It parses the
//!   schema bundle, picks the transport security for the deployment and holds one
//!   [`ServiceClient`] per service for the lifetime of the process.
//! * **[`ClientConfig`]:** Process configuration (`URI_USERS`, `URI_NOTES`, `URI_UTILS`, `ENV`).
//! * **[`SchemaBundle`]:** The protobuf sources and their compiled descriptor set.
//! * **[`ServiceClient`]:** A cheap-to-clone handle to one service. Calls take `&self`, so a
//!   single handle can be shared by every request handler.
//!
//! ## Calling services
//!
//! Handles accept JSON bodies that are transcoded against the service descriptors on the
//! fly (see [`grpc::codec::JsonCodec`]). The generated, strongly typed stubs are also
//! available from the context, e.g. [`AppContext::notes_client`].
//!
//! ```rust,no_run
//! use rusve_core::{AppContext, ClientConfig, DynamicRequest};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::from_env()?;
//! let ctx = AppContext::bootstrap(&config)?;
//!
//! let _response = ctx
//!     .notes()
//!     .dynamic(DynamicRequest {
//!         method: "GetNotes".to_string(),
//!         body: serde_json::json!({ "userId": "b7b3c1f2-..." }),
//!         headers: vec![],
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports `prost`, `prost-reflect`, `tonic` and the generated bindings
//! (`rusve_proto`) so that consumers use compatible versions of them.
pub mod client;
pub mod config;
pub mod context;
pub mod grpc;
pub mod schema;
pub mod service;
pub mod transport;

pub use client::{Descriptor, DynamicCallError, DynamicRequest, DynamicResponse, ServiceClient};
pub use config::{ClientConfig, ConfigError, Deployment};
pub use context::{AppContext, BootstrapError};
pub use schema::{MaterializeError, SchemaBundle, SchemaError, SchemaName, ServiceDescriptors};
pub use service::ServiceKind;
pub use transport::{Target, TransportError, TransportSecurity};

// Re-exports
pub use prost;
pub use prost_reflect;
pub use rusve_proto as proto;
pub use tonic;

/// Type alias for the standard boxed error used in generic bounds.
type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
