//! A fixed endpoint for S3-compatible services.

use aws_sdk_s3::config::endpoint::{Endpoint, EndpointFuture, Params, ResolveEndpoint};
use aws_smithy_runtime_api::box_error::BoxError;
use url::Url;

use crate::EndpointError;

/// Resolves every request against one configured URL.
///
/// When `hostname_immutable` is set the host is used verbatim and the
/// bucket goes into the path (`https://endpoint/bucket/key`). Otherwise the
/// bucket becomes a subdomain of the host (`https://bucket.endpoint/key`),
/// unless its name is not a single DNS label, in which case it goes into the
/// path as well.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticEndpoint {
    url: Url,
    hostname_immutable: bool,
}

impl StaticEndpoint {
    /// Parse `uri` into an endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if `uri` is not an absolute URL with a host.
    pub fn parse(uri: &str, hostname_immutable: bool) -> Result<Self, EndpointError> {
        let url = Url::parse(uri)?;
        if url.host_str().is_none() {
            return Err(EndpointError::MissingHost(uri.to_string()));
        }
        Ok(Self {
            url,
            hostname_immutable,
        })
    }

    /// The configured URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Whether the host is left untouched (path-style addressing).
    pub fn hostname_immutable(&self) -> bool {
        self.hostname_immutable
    }

    /// Build the URL requests for `bucket` are sent to.
    pub fn bucket_url(&self, bucket: Option<&str>) -> Result<Url, EndpointError> {
        let Some(bucket) = bucket.filter(|bucket| !bucket.is_empty()) else {
            return Ok(self.url.clone());
        };

        let mut url = self.url.clone();
        if self.hostname_immutable || !is_dns_label(bucket) {
            let path = format!("{}/{}", self.url.path().trim_end_matches('/'), bucket);
            url.set_path(&path);
        } else {
            let host = self
                .url
                .host_str()
                .ok_or_else(|| EndpointError::MissingHost(self.url.to_string()))?;
            url.set_host(Some(&format!("{}.{}", bucket, host)))
                .map_err(|source| EndpointError::VirtualHost {
                    bucket: bucket.to_string(),
                    endpoint: self.url.to_string(),
                    source,
                })?;
        }
        Ok(url)
    }

    fn resolve(&self, bucket: Option<&str>) -> Result<Endpoint, EndpointError> {
        let url = self.bucket_url(bucket)?;
        // The client appends the object key with its own leading slash.
        Ok(Endpoint::builder()
            .url(url.as_str().trim_end_matches('/').to_string())
            .build())
    }
}

/// Whether `bucket` can be used as a host label: 3 to 63 lowercase letters,
/// digits or hyphens, starting and ending with a letter or digit.
fn is_dns_label(bucket: &str) -> bool {
    let bytes = bucket.as_bytes();
    (3..=63).contains(&bytes.len())
        && bytes
            .iter()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
        && bytes.first().is_some_and(u8::is_ascii_alphanumeric)
        && bytes.last().is_some_and(u8::is_ascii_alphanumeric)
}

impl ResolveEndpoint for StaticEndpoint {
    fn resolve_endpoint<'a>(&'a self, params: &'a Params) -> EndpointFuture<'a> {
        EndpointFuture::ready(self.resolve(params.bucket()).map_err(BoxError::from))
    }
}
