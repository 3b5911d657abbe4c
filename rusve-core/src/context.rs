//! # Application Context
//!
//! [`AppContext`] is the result of the one-shot startup sequence:
//!
//! 1. Parse the schema bundle into [`ServiceDescriptors`].
//! 2. Pick the [`TransportSecurity`] for the configured deployment.
//! 3. Build one lazily connected [`ServiceClient`] per service.
//!
//! Every step runs before any handle is handed out, so a bootstrap error never
//! leaves a partial set of clients behind. Nothing here is retried: a failure is a
//! configuration problem and should abort startup.
//!
//! The context is meant to be built once and then shared (by reference, `Arc` or
//! clone) with every request handler.
use crate::{
    BoxError,
    client::ServiceClient,
    config::{ClientConfig, ConfigError},
    schema::{SchemaBundle, SchemaError, ServiceDescriptors},
    service::ServiceKind,
    transport::{Target, TransportError, TransportSecurity},
};
use http_body::Body as HttpBody;
use rusve_proto::{NotesServiceClient, UsersServiceClient, UtilsServiceClient};
use tonic::transport::Channel;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to load schemas: {0}")]
    Schema(#[from] SchemaError),
    #[error("Invalid endpoint '{uri}' for {service}: {source}")]
    Endpoint {
        service: ServiceKind,
        uri: String,
        #[source]
        source: TransportError,
    },
}

#[derive(Debug, Clone)]
pub struct AppContext<S = Channel> {
    descriptors: ServiceDescriptors,
    users: ServiceClient<S>,
    notes: ServiceClient<S>,
    utils: ServiceClient<S>,
}

impl AppContext<Channel> {
    /// Reads [`ClientConfig`] from the environment and bootstraps from it.
    pub fn from_env() -> Result<Self, BootstrapError> {
        let config = ClientConfig::from_env()?;
        Self::bootstrap(&config)
    }

    /// Bootstraps from the embedded schemas, or from the descriptor set file named
    /// in the configuration.
    ///
    /// Must be called from within a Tokio runtime: the channels are created lazily
    /// and spawn their worker on it. No network I/O happens until the first call.
    pub fn bootstrap(config: &ClientConfig) -> Result<Self, BootstrapError> {
        let bundle = match &config.descriptor_set {
            Some(path) => SchemaBundle::from_descriptor_file(path)?,
            None => SchemaBundle::embedded(),
        };
        Self::bootstrap_with(&bundle, config)
    }

    /// Bootstraps from an explicit schema bundle.
    pub fn bootstrap_with(
        bundle: &SchemaBundle,
        config: &ClientConfig,
    ) -> Result<Self, BootstrapError> {
        let descriptors = bundle.parse()?;
        let security = TransportSecurity::for_deployment(&config.deployment);

        info!(
            deployment = %config.deployment,
            transport = %security,
            services = descriptors.list_services().len(),
            "schemas loaded"
        );

        let connect = |kind: ServiceKind| {
            connect_lazy(&descriptors, kind, config.uri(kind), security)
        };

        Ok(Self {
            users: connect(ServiceKind::Users)?,
            notes: connect(ServiceKind::Notes)?,
            utils: connect(ServiceKind::Utils)?,
            descriptors,
        })
    }
}

fn connect_lazy(
    descriptors: &ServiceDescriptors,
    kind: ServiceKind,
    addr: &str,
    security: TransportSecurity,
) -> Result<ServiceClient<Channel>, BootstrapError> {
    let endpoint = security
        .endpoint(addr)
        .map_err(|source| BootstrapError::Endpoint {
            service: kind,
            uri: addr.to_string(),
            source,
        })?;
    let target = Target {
        uri: endpoint.uri().to_string(),
        security,
    };
    let channel = endpoint.connect_lazy();

    info!(service = %kind, uri = %target.uri, transport = %security, "client handle ready");

    Ok(ServiceClient::new(
        kind,
        descriptors.service(kind).clone(),
        Some(target),
        channel,
    ))
}

impl<S> AppContext<S> {
    /// Builds a context over already constructed tonic services, e.g. in-process
    /// servers.
    pub fn from_services(descriptors: ServiceDescriptors, users: S, notes: S, utils: S) -> Self {
        let handle = |kind: ServiceKind, service: S| {
            ServiceClient::new(kind, descriptors.service(kind).clone(), None, service)
        };

        Self {
            users: handle(ServiceKind::Users, users),
            notes: handle(ServiceKind::Notes, notes),
            utils: handle(ServiceKind::Utils, utils),
            descriptors,
        }
    }

    pub fn descriptors(&self) -> &ServiceDescriptors {
        &self.descriptors
    }

    pub fn users(&self) -> &ServiceClient<S> {
        &self.users
    }

    pub fn notes(&self) -> &ServiceClient<S> {
        &self.notes
    }

    pub fn utils(&self) -> &ServiceClient<S> {
        &self.utils
    }

    pub fn client(&self, kind: ServiceKind) -> &ServiceClient<S> {
        match kind {
            ServiceKind::Users => &self.users,
            ServiceKind::Notes => &self.notes,
            ServiceKind::Utils => &self.utils,
        }
    }

    /// Handles in `ServiceKind::ALL` order.
    pub fn clients(&self) -> [&ServiceClient<S>; 3] {
        [&self.users, &self.notes, &self.utils]
    }
}

impl<S> AppContext<S>
where
    S: tonic::client::GrpcService<tonic::body::Body> + Clone,
    S::Error: Into<BoxError>,
    S::ResponseBody: HttpBody<Data = tonic::codegen::Bytes> + Send + 'static,
    <S::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
{
    /// Generated `UsersService` stub sharing the handle's channel.
    pub fn users_client(&self) -> UsersServiceClient<S> {
        UsersServiceClient::new(self.users.inner())
    }

    /// Generated `NotesService` stub sharing the handle's channel.
    pub fn notes_client(&self) -> NotesServiceClient<S> {
        NotesServiceClient::new(self.notes.inner())
    }

    /// Generated `UtilsService` stub sharing the handle's channel.
    pub fn utils_client(&self) -> UtilsServiceClient<S> {
        UtilsServiceClient::new(self.utils.inner())
    }
}
