//! # Client Configuration
//!
//! Addresses and deployment mode come from the process environment:
//!
//! | variable               | meaning                                              |
//! |------------------------|------------------------------------------------------|
//! | `URI_USERS`            | address of `UsersService` (`host:port` or full URI)  |
//! | `URI_NOTES`            | address of `NotesService`                            |
//! | `URI_UTILS`            | address of `UtilsService`                            |
//! | `ENV`                  | deployment mode, `production` enables TLS            |
//! | `PROTO_DESCRIPTOR_SET` | optional path to a binary descriptor set to use instead of the embedded one |
use crate::service::ServiceKind;
use std::fmt;
use std::path::PathBuf;

pub const ENV: &str = "ENV";
pub const PROTO_DESCRIPTOR_SET: &str = "PROTO_DESCRIPTOR_SET";

/// Value of `ENV` that selects encrypted transport.
pub const PRODUCTION: &str = "production";
/// Deployment assumed when `ENV` is not set.
pub const DEFAULT_DEPLOYMENT: &str = "development";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable '{0}'")]
    MissingVar(&'static str),
}

/// The deployment the process runs in.
///
/// Only the exact literal `production` counts as production. Any other value,
/// including `Production` or `prod`, is kept as-is and treated as a development
/// deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deployment {
    Production,
    Development(String),
}

impl Deployment {
    pub fn from_flag(flag: &str) -> Self {
        if flag == PRODUCTION {
            Deployment::Production
        } else {
            Deployment::Development(flag.to_string())
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Deployment::Production)
    }
}

impl Default for Deployment {
    fn default() -> Self {
        Deployment::Development(DEFAULT_DEPLOYMENT.to_string())
    }
}

impl fmt::Display for Deployment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Deployment::Production => f.write_str(PRODUCTION),
            Deployment::Development(flag) => f.write_str(flag),
        }
    }
}

/// Everything the bootstrapper needs from the outside world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub users_uri: String,
    pub notes_uri: String,
    pub utils_uri: String,
    pub deployment: Deployment,
    /// Binary `FileDescriptorSet` to load instead of the embedded schemas.
    pub descriptor_set: Option<PathBuf>,
}

impl ClientConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let required = |kind: ServiceKind| {
            get(kind.uri_var()).ok_or(ConfigError::MissingVar(kind.uri_var()))
        };

        Ok(Self {
            users_uri: required(ServiceKind::Users)?,
            notes_uri: required(ServiceKind::Notes)?,
            utils_uri: required(ServiceKind::Utils)?,
            deployment: get(ENV)
                .map(|flag| Deployment::from_flag(&flag))
                .unwrap_or_default(),
            descriptor_set: get(PROTO_DESCRIPTOR_SET).map(PathBuf::from),
        })
    }

    /// The configured address of a service.
    pub fn uri(&self, kind: ServiceKind) -> &str {
        match kind {
            ServiceKind::Users => &self.users_uri,
            ServiceKind::Notes => &self.notes_uri,
            ServiceKind::Utils => &self.utils_uri,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_reads_all_variables() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("URI_USERS", "users.internal:443"),
            ("URI_NOTES", "notes.internal:443"),
            ("URI_UTILS", "utils.internal:443"),
            ("ENV", "production"),
            ("PROTO_DESCRIPTOR_SET", "/tmp/descriptors.bin"),
        ]))
        .unwrap();

        assert_eq!(config.uri(ServiceKind::Users), "users.internal:443");
        assert_eq!(config.uri(ServiceKind::Notes), "notes.internal:443");
        assert_eq!(config.uri(ServiceKind::Utils), "utils.internal:443");
        assert_eq!(config.deployment, Deployment::Production);
        assert_eq!(
            config.descriptor_set,
            Some(PathBuf::from("/tmp/descriptors.bin"))
        );
    }

    #[test]
    fn test_env_defaults_to_development() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("URI_USERS", "localhost:443"),
            ("URI_NOTES", "localhost:444"),
            ("URI_UTILS", "localhost:445"),
        ]))
        .unwrap();

        assert_eq!(config.deployment, Deployment::default());
        assert!(!config.deployment.is_production());
        assert_eq!(config.deployment.to_string(), "development");
        assert_eq!(config.descriptor_set, None);
    }

    #[test]
    fn test_missing_or_empty_uri_is_an_error() {
        let err = ClientConfig::from_lookup(lookup(&[
            ("URI_USERS", "localhost:443"),
            ("URI_UTILS", "localhost:445"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("URI_NOTES")));

        let err = ClientConfig::from_lookup(lookup(&[
            ("URI_USERS", "  "),
            ("URI_NOTES", "localhost:444"),
            ("URI_UTILS", "localhost:445"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("URI_USERS")));
    }

    #[test]
    fn test_only_exact_production_literal_is_production() {
        assert!(Deployment::from_flag("production").is_production());
        assert!(!Deployment::from_flag("Production").is_production());
        assert!(!Deployment::from_flag("prod").is_production());
        assert!(!Deployment::from_flag("").is_production());
        assert_eq!(Deployment::from_flag("staging").to_string(), "staging");
    }
}
