//! # CLI
//!
//! Command-line interface of `rusve`, built with `clap`.
//!
//! Every connection setting can be given as a flag or through the same environment
//! variables the library reads (`URI_USERS`, `URI_NOTES`, `URI_UTILS`, `ENV`,
//! `PROTO_DESCRIPTOR_SET`).
use clap::{Args, Parser, Subcommand};
use rusve_core::{ClientConfig, ConfigError, config};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rusve", version, about = "Client for the rusve gRPC services")]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Address of UsersService (host:port or URI)
    #[arg(long, env = "URI_USERS", global = true)]
    pub users_uri: Option<String>,

    /// Address of NotesService (host:port or URI)
    #[arg(long, env = "URI_NOTES", global = true)]
    pub notes_uri: Option<String>,

    /// Address of UtilsService (host:port or URI)
    #[arg(long, env = "URI_UTILS", global = true)]
    pub utils_uri: Option<String>,

    /// Deployment mode, `production` enables TLS
    #[arg(long = "env", env = "ENV", default_value = config::DEFAULT_DEPLOYMENT, global = true)]
    pub deployment: String,

    /// Binary descriptor set to use instead of the embedded schemas
    #[arg(long, env = "PROTO_DESCRIPTOR_SET", global = true)]
    pub descriptor_set: Option<PathBuf>,
}

impl ConnectionArgs {
    /// Builds the client configuration, failing on the first missing address.
    pub fn client_config(&self) -> Result<ClientConfig, ConfigError> {
        ClientConfig::from_lookup(|key| match key {
            "URI_USERS" => self.users_uri.clone(),
            "URI_NOTES" => self.notes_uri.clone(),
            "URI_UTILS" => self.utils_uri.clone(),
            config::ENV => Some(self.deployment.clone()),
            config::PROTO_DESCRIPTOR_SET => self
                .descriptor_set
                .as_ref()
                .map(|path| path.display().to_string()),
            _ => None,
        })
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the services declared by the schemas
    Services,

    /// Show the definition of a service, message or enum
    ///
    /// ## Examples:
    ///
    /// ```bash
    /// rusve describe proto.File
    /// ```
    Describe {
        /// Fully qualified symbol (e.g. proto.NotesService)
        symbol: String,
    },

    /// Call a method through the service handles
    ///
    /// ## Examples:
    ///
    /// ```bash
    /// URI_NOTES=localhost:443 rusve call NotesService/GetNotes --body '{"userId": "..."}'
    /// ```
    Call {
        /// Endpoint (Service/Method), the service may be fully qualified
        #[arg(value_parser = parse_endpoint)]
        endpoint: (String, String),

        /// JSON body (Object for Unary, Array for Streaming)
        #[arg(long, value_parser = parse_body, default_value = "{}")]
        body: serde_json::Value,

        #[arg(short = 'H', long = "header", value_parser = parse_header)]
        headers: Vec<(String, String)>,
    },

    /// Work with the embedded proto sources
    Schemas {
        #[command(subcommand)]
        sub: SchemaCommands,
    },
}

#[derive(Subcommand)]
pub enum SchemaCommands {
    /// Write the proto sources into a directory
    Export {
        /// Target directory, created if missing
        dir: PathBuf,
    },
}

fn parse_endpoint(value: &str) -> Result<(String, String), String> {
    let (service, method) = value.split_once('/').ok_or_else(|| {
        format!("Invalid endpoint format: '{value}'. Expected 'Service/Method'",)
    })?;

    if service.trim().is_empty() || method.trim().is_empty() {
        return Err("Service and Method names cannot be empty".to_string());
    }

    Ok((service.to_string(), method.to_string()))
}

fn parse_header(s: &str) -> Result<(String, String), String> {
    s.split_once(':')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .ok_or_else(|| "Format must be 'key:value'".to_string())
}

fn parse_body(value: &str) -> Result<serde_json::Value, String> {
    serde_json::from_str(value).map_err(|e| format!("Invalid JSON: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rusve_core::Deployment;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_endpoint() {
        assert_eq!(
            parse_endpoint("proto.NotesService/GetNotes").unwrap(),
            ("proto.NotesService".to_string(), "GetNotes".to_string())
        );
        assert!(parse_endpoint("NotesService").is_err());
        assert!(parse_endpoint("NotesService/ ").is_err());
    }

    #[test]
    fn test_parse_header() {
        assert_eq!(
            parse_header("authorization: Bearer abc").unwrap(),
            ("authorization".to_string(), "Bearer abc".to_string())
        );
        assert!(parse_header("no-separator").is_err());
    }

    #[test]
    fn test_call_arguments() {
        let cli = Cli::try_parse_from([
            "rusve",
            "--users-uri",
            "localhost:1",
            "--notes-uri",
            "localhost:2",
            "--utils-uri",
            "localhost:3",
            "--env",
            "production",
            "call",
            "UtilsService/GetFile",
            "--body",
            r#"{"fileId": "f-1"}"#,
            "-H",
            "authorization:Bearer abc",
        ])
        .unwrap();

        let config = cli.connection.client_config().unwrap();
        assert_eq!(config.utils_uri, "localhost:3");
        assert_eq!(config.deployment, Deployment::Production);

        match cli.command {
            Commands::Call {
                endpoint,
                body,
                headers,
            } => {
                assert_eq!(endpoint.0, "UtilsService");
                assert_eq!(body["fileId"], "f-1");
                assert_eq!(headers.len(), 1);
            }
            _ => panic!("Expected the call command"),
        }
    }

    #[test]
    fn test_missing_address_is_reported() {
        let args = ConnectionArgs {
            users_uri: Some("localhost:1".to_string()),
            notes_uri: Some("localhost:2".to_string()),
            utils_uri: None,
            deployment: "development".to_string(),
            descriptor_set: None,
        };

        assert!(matches!(
            args.client_config(),
            Err(ConfigError::MissingVar("URI_UTILS"))
        ));
    }
}
