//! # Rusve Proto
//!
//! The schema bundle shared by every rusve client: the raw `.proto` texts, the
//! `FileDescriptorSet` compiled from them at build time, and the `prost`/`tonic`
//! bindings generated from the same files.
//!
//! The descriptor set is what `rusve-core` parses at startup. The texts are kept
//! around so they can be exported for tools that want the original sources.

mod file;

pub mod pb {
    include!(concat!(env!("OUT_DIR"), "/proto.rs"));
}

pub use pb::notes_service_client::NotesServiceClient;
pub use pb::notes_service_server::{NotesService, NotesServiceServer};
pub use pb::users_service_client::UsersServiceClient;
pub use pb::users_service_server::{UsersService, UsersServiceServer};
pub use pb::utils_service_client::UtilsServiceClient;
pub use pb::utils_service_server::{UtilsService, UtilsServiceServer};

/// Binary `FileDescriptorSet` of all the schemas, imports included.
pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("descriptors");

/// Root schema, importing the three service schemas.
pub const MAIN_PROTO: &str = include_str!("../proto/main.proto");
pub const USERS_PROTO: &str = include_str!("../proto/users.proto");
pub const NOTES_PROTO: &str = include_str!("../proto/notes.proto");
pub const UTILS_PROTO: &str = include_str!("../proto/utils.proto");

/// Protobuf package every schema is declared in.
pub const PACKAGE: &str = "proto";
