//! # Schema Bundle
//!
//! The protobuf definitions the clients are built from.
//!
//! The embedded bundle carries the four `.proto` texts (`main`, `users`, `notes`,
//! `utils`) and the binary `FileDescriptorSet` compiled from them at build time.
//! Parsing happens straight from memory, so startup never touches the filesystem
//! unless a descriptor set override is configured.
//!
//! [`SchemaBundle::materialize`] writes the texts to a directory for tools that
//! need the original sources.
use crate::client::Descriptor;
use crate::service::ServiceKind;
use prost_reflect::{DescriptorError, DescriptorPool, ServiceDescriptor};
use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Failed to read descriptor set '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to decode file descriptor set: '{0}'")]
    Decode(#[from] DescriptorError),
    #[error("Service '{0}' not found in the descriptor set")]
    MissingService(&'static str),
    #[error("Unexpected service '{0}' in the descriptor set")]
    UnexpectedService(String),
}

#[derive(Debug, thiserror::Error)]
pub enum MaterializeError {
    #[error("The schema bundle has no proto sources to write")]
    NoSources,
    #[error("Failed to create directory '{}': {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write schema '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Logical name of a schema file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaName {
    Main,
    Users,
    Notes,
    Utils,
}

impl SchemaName {
    pub const ALL: [SchemaName; 4] = [
        SchemaName::Main,
        SchemaName::Users,
        SchemaName::Notes,
        SchemaName::Utils,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            SchemaName::Main => "main.proto",
            SchemaName::Users => "users.proto",
            SchemaName::Notes => "notes.proto",
            SchemaName::Utils => "utils.proto",
        }
    }
}

impl fmt::Display for SchemaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SchemaName::Main => "main",
            SchemaName::Users => "users",
            SchemaName::Notes => "notes",
            SchemaName::Utils => "utils",
        };
        f.write_str(name)
    }
}

/// One protobuf source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaFile {
    pub name: SchemaName,
    pub source: Cow<'static, str>,
}

/// Immutable set of protobuf definitions.
#[derive(Debug, Clone)]
pub struct SchemaBundle {
    files: Vec<SchemaFile>,
    descriptor_set: Cow<'static, [u8]>,
}

impl SchemaBundle {
    /// The schemas compiled into this binary.
    pub fn embedded() -> Self {
        let source = |name: SchemaName| match name {
            SchemaName::Main => rusve_proto::MAIN_PROTO,
            SchemaName::Users => rusve_proto::USERS_PROTO,
            SchemaName::Notes => rusve_proto::NOTES_PROTO,
            SchemaName::Utils => rusve_proto::UTILS_PROTO,
        };

        Self {
            files: SchemaName::ALL
                .into_iter()
                .map(|name| SchemaFile {
                    name,
                    source: Cow::Borrowed(source(name)),
                })
                .collect(),
            descriptor_set: Cow::Borrowed(rusve_proto::FILE_DESCRIPTOR_SET),
        }
    }

    /// A bundle made of a binary `FileDescriptorSet` only, without proto sources.
    pub fn from_descriptor_set(bytes: impl Into<Cow<'static, [u8]>>) -> Self {
        Self {
            files: Vec::new(),
            descriptor_set: bytes.into(),
        }
    }

    /// Loads a binary `FileDescriptorSet` from disk.
    pub fn from_descriptor_file(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), bytes = bytes.len(), "loaded descriptor set override");
        Ok(Self::from_descriptor_set(bytes))
    }

    pub fn files(&self) -> &[SchemaFile] {
        &self.files
    }

    pub fn source(&self, name: SchemaName) -> Option<&str> {
        self.files
            .iter()
            .find(|file| file.name == name)
            .map(|file| file.source.as_ref())
    }

    pub fn descriptor_set(&self) -> &[u8] {
        &self.descriptor_set
    }

    /// Parses the descriptor set and resolves the three services.
    ///
    /// Fails if the bytes are not a valid `FileDescriptorSet` or if any of the
    /// services is missing from it.
    pub fn parse(&self) -> Result<ServiceDescriptors, SchemaError> {
        let pool = DescriptorPool::decode(self.descriptor_set.as_ref())?;
        ServiceDescriptors::from_pool(pool)
    }

    /// Writes every proto source into `dir`, creating it if needed.
    ///
    /// Returns the written paths, in bundle order.
    pub fn materialize(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, MaterializeError> {
        if self.files.is_empty() {
            return Err(MaterializeError::NoSources);
        }

        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|source| MaterializeError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;

        self.files
            .iter()
            .map(|file| {
                let path = dir.join(file.name.file_name());
                fs::write(&path, file.source.as_bytes()).map_err(|source| {
                    MaterializeError::Write {
                        path: path.clone(),
                        source,
                    }
                })?;
                debug!(schema = %file.name, path = %path.display(), "schema written");
                Ok(path)
            })
            .collect()
    }
}

/// The parsed descriptor pool together with the resolved service descriptors.
#[derive(Debug, Clone)]
pub struct ServiceDescriptors {
    pool: DescriptorPool,
    users: ServiceDescriptor,
    notes: ServiceDescriptor,
    utils: ServiceDescriptor,
}

impl ServiceDescriptors {
    /// Resolves the three service descriptors. The pool must declare exactly these
    /// services and nothing else.
    pub fn from_pool(pool: DescriptorPool) -> Result<Self, SchemaError> {
        let known = |name: &str| ServiceKind::ALL.iter().any(|k| k.full_name() == name);
        if let Some(extra) = pool.services().find(|svc| !known(svc.full_name())) {
            return Err(SchemaError::UnexpectedService(extra.full_name().to_string()));
        }

        let resolve = |kind: ServiceKind| {
            pool.get_service_by_name(kind.full_name())
                .ok_or(SchemaError::MissingService(kind.full_name()))
        };

        Ok(Self {
            users: resolve(ServiceKind::Users)?,
            notes: resolve(ServiceKind::Notes)?,
            utils: resolve(ServiceKind::Utils)?,
            pool,
        })
    }

    pub fn pool(&self) -> &DescriptorPool {
        &self.pool
    }

    pub fn service(&self, kind: ServiceKind) -> &ServiceDescriptor {
        match kind {
            ServiceKind::Users => &self.users,
            ServiceKind::Notes => &self.notes,
            ServiceKind::Utils => &self.utils,
        }
    }

    /// Lists all services defined in the pool.
    ///
    /// # Returns
    ///
    /// A list of fully qualified service names (e.g. `proto.NotesService`).
    pub fn list_services(&self) -> Vec<String> {
        self.pool
            .services()
            .map(|s| s.full_name().to_string())
            .collect()
    }

    /// Looks up a service, message or enum by its fully qualified name.
    pub fn get_descriptor_by_symbol(&self, symbol: &str) -> Option<Descriptor> {
        if let Some(descriptor) = self.pool.get_service_by_name(symbol) {
            return Some(Descriptor::ServiceDescriptor(descriptor));
        }
        if let Some(descriptor) = self.pool.get_message_by_name(symbol) {
            return Some(Descriptor::MessageDescriptor(descriptor));
        }
        if let Some(descriptor) = self.pool.get_enum_by_name(symbol) {
            return Some(Descriptor::EnumDescriptor(descriptor));
        }
        None
    }
}
