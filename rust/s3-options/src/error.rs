use aws_sdk_s3::presigning::PresigningConfigError;
use aws_smithy_runtime_api::box_error::BoxError;
use thiserror::Error;

/// A configuration value violates one of its documented constraints.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `auth.key`.
    pub field: String,
    /// Human readable constraint, e.g. `must be at least 5MiB`.
    pub reason: String,
}

impl ValidationError {
    /// Create a new validation error for `field`.
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Prefix the field path with the name of the enclosing field.
    pub fn within(mut self, parent: &str) -> Self {
        self.field = format!("{}.{}", parent, self.field);
        self
    }
}

/// Errors building a URL for a static endpoint.
#[derive(Debug, Error)]
pub enum EndpointError {
    /// The endpoint is not a valid absolute URL.
    #[error("invalid URL: {0}")]
    Parse(#[from] url::ParseError),

    /// The endpoint URL has no host to address.
    #[error("{0} has no host")]
    MissingHost(String),

    /// The bucket can not be turned into a virtual host of the endpoint.
    #[error("bucket {bucket:?} can not be addressed as a host of {endpoint}")]
    VirtualHost {
        /// The bucket being addressed.
        bucket: String,
        /// The configured endpoint.
        endpoint: String,
        /// Why the host was rejected.
        #[source]
        source: url::ParseError,
    },
}

/// Errors turning effective options into client settings.
///
/// All of them are raised while the client is being built, never on first
/// request.
#[derive(Debug, Error)]
pub enum OptionsError {
    /// The options failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A configured URI can not be used as an endpoint.
    #[error("invalid endpoint {uri:?}: {source}")]
    Endpoint {
        /// The URI as configured.
        uri: String,
        /// What is wrong with it.
        #[source]
        source: EndpointError,
    },

    /// The default TLS transport could not be built from the root certificates.
    #[error("could not build the default transport: {0}")]
    Transport(#[source] BoxError),

    /// The presign expiry is not accepted by the client.
    #[error("invalid presign expiry: {0}")]
    Presign(#[from] PresigningConfigError),
}
