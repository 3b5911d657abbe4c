//! The three services a rusve client talks to.
use std::fmt;

/// Identifies one of the backend services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ServiceKind {
    Users,
    Notes,
    Utils,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 3] = [ServiceKind::Users, ServiceKind::Notes, ServiceKind::Utils];

    /// Service name as declared in the schema (e.g. `NotesService`).
    pub fn name(self) -> &'static str {
        match self {
            ServiceKind::Users => "UsersService",
            ServiceKind::Notes => "NotesService",
            ServiceKind::Utils => "UtilsService",
        }
    }

    /// Fully qualified service name (e.g. `proto.NotesService`).
    pub fn full_name(self) -> &'static str {
        match self {
            ServiceKind::Users => "proto.UsersService",
            ServiceKind::Notes => "proto.NotesService",
            ServiceKind::Utils => "proto.UtilsService",
        }
    }

    /// Environment variable holding the address of the service.
    pub fn uri_var(self) -> &'static str {
        match self {
            ServiceKind::Users => "URI_USERS",
            ServiceKind::Notes => "URI_NOTES",
            ServiceKind::Utils => "URI_UTILS",
        }
    }

    /// Resolves either the short (`NotesService`) or the fully qualified
    /// (`proto.NotesService`) service name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name || kind.full_name() == name)
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.full_name())
    }
}
