//! # Transport Security
//!
//! Picks between TLS and plaintext for the service channels. The choice is a pure
//! function of the [`Deployment`]: production talks TLS with certificate validation
//! against the webpki root store, everything else talks plaintext HTTP/2 and is only
//! meant for local development.
//!
//! An address may carry its own scheme, but it has to agree with the mode: production
//! never accepts `http://`, and development never accepts `https://`.
use crate::config::Deployment;
use std::fmt;
use tonic::transport::{ClientTlsConfig, Endpoint};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Scheme '{scheme}' is not allowed with {security} transport, expected '{expected}'")]
    SchemeMismatch {
        scheme: String,
        expected: &'static str,
        security: TransportSecurity,
    },
    #[error(transparent)]
    Endpoint(#[from] tonic::transport::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportSecurity {
    Tls,
    Plaintext,
}

impl TransportSecurity {
    pub fn for_deployment(deployment: &Deployment) -> Self {
        if deployment.is_production() {
            TransportSecurity::Tls
        } else {
            TransportSecurity::Plaintext
        }
    }

    pub fn scheme(self) -> &'static str {
        match self {
            TransportSecurity::Tls => "https",
            TransportSecurity::Plaintext => "http",
        }
    }

    /// Turns a configured address into a URI.
    ///
    /// Addresses in `host:port` form get the scheme matching this mode. An explicit
    /// scheme is kept only when it is the one this mode uses.
    pub fn normalize_uri(self, addr: &str) -> Result<String, TransportError> {
        let addr = addr.trim();
        match addr.split_once("://") {
            Some((scheme, _)) if scheme.eq_ignore_ascii_case(self.scheme()) => {
                Ok(addr.to_string())
            }
            Some((scheme, _)) => Err(TransportError::SchemeMismatch {
                scheme: scheme.to_string(),
                expected: self.scheme(),
                security: self,
            }),
            None => Ok(format!("{}://{}", self.scheme(), addr)),
        }
    }

    /// Builds the endpoint for `addr`, configuring TLS when required.
    ///
    /// No connection is attempted here.
    pub fn endpoint(self, addr: &str) -> Result<Endpoint, TransportError> {
        let endpoint = Endpoint::from_shared(self.normalize_uri(addr)?)?;

        match self {
            TransportSecurity::Tls => {
                Ok(endpoint.tls_config(ClientTlsConfig::new().with_webpki_roots())?)
            }
            TransportSecurity::Plaintext => Ok(endpoint),
        }
    }
}

impl fmt::Display for TransportSecurity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportSecurity::Tls => f.write_str("tls"),
            TransportSecurity::Plaintext => f.write_str("plaintext"),
        }
    }
}

/// Where a handle sends its calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub uri: String,
    pub security: TransportSecurity,
}
