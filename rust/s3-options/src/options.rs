//! Layered options for S3-compatible storage.

use std::time::Duration;

use aws_smithy_runtime_api::client::http::{HttpClient, SharedHttpClient};
use s3_unsigned_headers::HeaderNames;
use serde::Deserialize;

use crate::{StaticCredentials, ValidationError};

/// One kibibyte.
pub const KIB: usize = 1024;
/// One mebibyte.
pub const MIB: usize = KIB * 1024;

/// Upload buffer size used when none is configured.
pub const DEFAULT_BUFFER_SIZE: usize = 10 * MIB;
/// Smallest accepted upload buffer, the S3 minimum multipart part size.
pub const MIN_BUFFER_SIZE: usize = 5 * MIB;
/// Maximum number of parts in one multipart upload.
pub const MAX_PARTS: usize = 10_000;
/// Presigned URL lifetime used when none is configured.
pub const DEFAULT_EXPIRE: Duration = Duration::from_secs(15 * 60);

/// Settings for talking to an S3-compatible service.
///
/// A value doubles as a partial overlay: every field is optional and
/// [`Options::new`] folds a sequence of overlays into one effective set,
/// the last value set for a field winning. Fields left unset in a later
/// overlay never erase earlier ones.
///
/// ```
/// use s3_options::{Options, MIB};
///
/// let options = Options::new([
///     Options::default().with_region("us-east-1"),
///     Options::default(),
///     Options::default().with_buffer_size(20 * MIB),
/// ]);
///
/// assert_eq!(options.region(), Some("us-east-1"));
/// assert_eq!(options.buffer_size(), 20 * MIB);
/// ```
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct Options {
    #[serde(rename = "auth")]
    credentials: Option<StaticCredentials>,

    region: Option<String>,
    content_type: Option<String>,
    filename_suffix: Option<String>,
    external_uri: Option<String>,
    uri: Option<String>,

    force_path_style: Option<bool>,
    use_accelerate: Option<bool>,

    #[serde(rename = "default_expire_seconds", deserialize_with = "seconds")]
    default_expire: Option<Duration>,
    buffer_size: Option<usize>,

    unsigned_headers: HeaderNames,

    #[serde(skip)]
    transport: Option<SharedHttpClient>,
}

fn seconds<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_secs))
}

fn overlay<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

impl Options {
    /// Merge `overlays` in order on top of the defaults.
    pub fn new(overlays: impl IntoIterator<Item = Options>) -> Self {
        let defaults = Options {
            buffer_size: Some(DEFAULT_BUFFER_SIZE),
            ..Default::default()
        };
        overlays.into_iter().fold(defaults, Options::overlay)
    }

    /// Apply `other` on top of `self`.
    pub fn overlay(mut self, other: Options) -> Self {
        overlay(&mut self.credentials, other.credentials);
        overlay(&mut self.region, other.region);
        overlay(&mut self.content_type, other.content_type);
        overlay(&mut self.filename_suffix, other.filename_suffix);
        overlay(&mut self.external_uri, other.external_uri);
        overlay(&mut self.uri, other.uri);
        overlay(&mut self.force_path_style, other.force_path_style);
        overlay(&mut self.use_accelerate, other.use_accelerate);
        overlay(&mut self.default_expire, other.default_expire);
        overlay(&mut self.buffer_size, other.buffer_size);
        overlay(&mut self.transport, other.transport);
        if !other.unsigned_headers.is_empty() {
            self.unsigned_headers = other.unsigned_headers;
        }
        self
    }

    /// Check the options against their documented constraints.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(credentials) = &self.credentials {
            credentials
                .validate()
                .map_err(|error| error.within("auth"))?;
        }
        if let Some(buffer_size) = self.buffer_size {
            if buffer_size < MIN_BUFFER_SIZE {
                return Err(ValidationError::new(
                    "buffer_size",
                    "must be at least 5MiB",
                ));
            }
        }
        Ok(())
    }

    /// Use a fixed access key instead of the environment's credentials.
    pub fn with_static_credentials(
        mut self,
        key: impl Into<String>,
        secret: impl Into<String>,
        session_token: impl Into<String>,
    ) -> Self {
        self.credentials = Some(StaticCredentials::new(key, secret, session_token));
        self
    }

    /// Region the bucket lives in.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Content type of uploaded objects.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Suffix appended to the content disposition of downloads.
    pub fn with_filename_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.filename_suffix = Some(suffix.into());
        self
    }

    /// URI presigned URLs point at, when it differs from [`Options::with_uri`].
    pub fn with_external_uri(mut self, external_uri: impl Into<String>) -> Self {
        self.external_uri = Some(external_uri.into());
        self
    }

    /// URI of the S3 API.
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Encode the bucket in the path instead of the host.
    pub fn with_force_path_style(mut self, force_path_style: bool) -> Self {
        self.force_path_style = Some(force_path_style);
        self
    }

    /// Use S3 Transfer Acceleration.
    pub fn with_use_accelerate(mut self, use_accelerate: bool) -> Self {
        self.use_accelerate = Some(use_accelerate);
        self
    }

    /// Lifetime of presigned URLs.
    pub fn with_default_expire(mut self, default_expire: Duration) -> Self {
        self.default_expire = Some(default_expire);
        self
    }

    /// Size of the buffer allocated for uploads.
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = Some(buffer_size);
        self
    }

    /// Headers to leave out of request signatures.
    pub fn with_unsigned_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.unsigned_headers = HeaderNames::new(headers);
        self
    }

    /// HTTP client to send requests with instead of the default TLS one.
    pub fn with_transport(mut self, transport: impl HttpClient + 'static) -> Self {
        self.transport = Some(SharedHttpClient::new(transport));
        self
    }

    /// Static credentials, if configured.
    pub fn credentials(&self) -> Option<&StaticCredentials> {
        self.credentials.as_ref()
    }

    /// Configured region.
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Configured content type for uploads.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Configured download filename suffix.
    pub fn filename_suffix(&self) -> Option<&str> {
        self.filename_suffix.as_deref()
    }

    /// Configured URI for presigned URLs.
    pub fn external_uri(&self) -> Option<&str> {
        self.external_uri.as_deref()
    }

    /// Configured URI of the S3 API.
    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    /// Whether path-style addressing is forced.
    pub fn force_path_style(&self) -> bool {
        self.force_path_style.unwrap_or(false)
    }

    /// Whether Transfer Acceleration is enabled.
    pub fn use_accelerate(&self) -> bool {
        self.use_accelerate.unwrap_or(false)
    }

    /// Configured presign lifetime.
    pub fn default_expire(&self) -> Option<Duration> {
        self.default_expire
    }

    /// Presign lifetime, falling back to [`DEFAULT_EXPIRE`].
    pub fn presign_expire(&self) -> Duration {
        self.default_expire.unwrap_or(DEFAULT_EXPIRE)
    }

    /// Upload buffer size, falling back to [`DEFAULT_BUFFER_SIZE`].
    pub fn buffer_size(&self) -> usize {
        self.buffer_size.unwrap_or(DEFAULT_BUFFER_SIZE)
    }

    /// Largest object a multipart upload with this buffer can produce.
    pub fn max_upload_size(&self) -> usize {
        self.buffer_size().saturating_mul(MAX_PARTS)
    }

    /// Headers left out of request signatures.
    pub fn unsigned_headers(&self) -> &HeaderNames {
        &self.unsigned_headers
    }

    /// Caller supplied transport, if any.
    pub fn transport(&self) -> Option<&SharedHttpClient> {
        self.transport.as_ref()
    }
}

impl std::fmt::Debug for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Options")
            .field("credentials", &self.credentials)
            .field("region", &self.region)
            .field("content_type", &self.content_type)
            .field("filename_suffix", &self.filename_suffix)
            .field("external_uri", &self.external_uri)
            .field("uri", &self.uri)
            .field("force_path_style", &self.force_path_style)
            .field("use_accelerate", &self.use_accelerate)
            .field("default_expire", &self.default_expire)
            .field("buffer_size", &self.buffer_size)
            .field("unsigned_headers", &self.unsigned_headers)
            .field("transport", &self.transport.as_ref().map(|_| "custom"))
            .finish()
    }
}
