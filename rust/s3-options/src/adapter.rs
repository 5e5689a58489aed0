//! Projection of effective [`Options`] onto the S3 client.

use std::time::Duration;

use aws_sdk_s3::config::{Builder, Credentials, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::{Client, Config};
use aws_smithy_runtime_api::client::http::SharedHttpClient;
use s3_unsigned_headers::UnsignedHeaders;
use tracing::debug;

use crate::{Options, OptionsError, RootCertificates, StaticEndpoint, default_transport};

/// Settings applied to the builder of the client used for API calls.
#[derive(Clone)]
pub struct ClientOptions {
    credentials: Option<Credentials>,
    region: Option<Region>,
    unsigned_headers: Option<UnsignedHeaders>,
    endpoint: Option<StaticEndpoint>,
    http_client: SharedHttpClient,
    force_path_style: bool,
    accelerate: bool,
}

impl ClientOptions {
    /// Apply these settings to `builder`.
    pub fn apply(&self, builder: Builder) -> Builder {
        let mut builder = builder
            .http_client(self.http_client.clone())
            .force_path_style(self.force_path_style)
            .accelerate(self.accelerate);

        if let Some(credentials) = &self.credentials {
            builder = builder.credentials_provider(credentials.clone());
        }
        if let Some(region) = &self.region {
            builder = builder.region(region.clone());
        }
        if let Some(unsigned_headers) = &self.unsigned_headers {
            builder = builder.push_auth_scheme(unsigned_headers.clone());
        }
        if let Some(endpoint) = &self.endpoint {
            builder = builder.endpoint_resolver(endpoint.clone());
        }
        builder
    }

    /// Build a client from `builder` with these settings applied.
    pub fn client(&self, builder: Builder) -> Client {
        Client::from_conf(self.apply(builder).build())
    }

    /// The auth scheme keeping headers out of signatures, if any are configured.
    pub fn unsigned_headers(&self) -> Option<&UnsignedHeaders> {
        self.unsigned_headers.as_ref()
    }

    /// The endpoint API calls go to, if one is configured.
    pub fn endpoint(&self) -> Option<&StaticEndpoint> {
        self.endpoint.as_ref()
    }

    /// The configured region.
    pub fn region(&self) -> Option<&Region> {
        self.region.as_ref()
    }

    /// Whether path-style addressing is forced.
    pub fn force_path_style(&self) -> bool {
        self.force_path_style
    }

    /// Whether Transfer Acceleration is enabled.
    pub fn accelerate(&self) -> bool {
        self.accelerate
    }
}

impl std::fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientOptions")
            .field("credentials", &self.credentials)
            .field("region", &self.region)
            .field("unsigned_headers", &self.unsigned_headers)
            .field("endpoint", &self.endpoint)
            .field("force_path_style", &self.force_path_style)
            .field("accelerate", &self.accelerate)
            .finish_non_exhaustive()
    }
}

/// Settings for generating presigned URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignOptions {
    expires_in: Duration,
    endpoint: Option<StaticEndpoint>,
}

impl PresignOptions {
    /// How long presigned URLs stay valid.
    pub fn expires_in(&self) -> Duration {
        self.expires_in
    }

    /// The public endpoint presigned URLs point at, if it differs from the API one.
    pub fn endpoint(&self) -> Option<&StaticEndpoint> {
        self.endpoint.as_ref()
    }

    /// Presigning configuration carrying the expiry.
    pub fn presigning_config(&self) -> Result<PresigningConfig, OptionsError> {
        Ok(PresigningConfig::expires_in(self.expires_in)?)
    }

    /// Point `builder` at the public endpoint, if one is configured.
    pub fn apply(&self, builder: Builder) -> Builder {
        match &self.endpoint {
            Some(endpoint) => builder.endpoint_resolver(endpoint.clone()),
            None => builder,
        }
    }

    /// Derive the client presigned URLs are generated with from the API
    /// client's configuration.
    pub fn presign_client(&self, config: &Config) -> Client {
        Client::from_conf(self.apply(config.to_builder()).build())
    }
}

fn static_endpoint(uri: &str, hostname_immutable: bool) -> Result<StaticEndpoint, OptionsError> {
    StaticEndpoint::parse(uri, hostname_immutable).map_err(|source| OptionsError::Endpoint {
        uri: uri.to_string(),
        source,
    })
}

impl Options {
    /// Project these options onto the API client and the presigner.
    ///
    /// `roots` is only consulted when no transport was configured.
    ///
    /// # Errors
    ///
    /// Fails if the options do not validate, a configured URI is not a
    /// usable endpoint, or the default transport can not be built.
    pub fn s3_options(
        &self,
        roots: &impl RootCertificates,
    ) -> Result<(ClientOptions, PresignOptions), OptionsError> {
        self.validate()?;
        let force_path_style = self.force_path_style();

        let unsigned_headers = if self.unsigned_headers().is_empty() {
            None
        } else {
            debug!(
                headers = ?self.unsigned_headers(),
                "excluding headers from request signatures"
            );
            Some(UnsignedHeaders::new(self.unsigned_headers().clone()))
        };

        let endpoint = self
            .uri()
            .map(|uri| static_endpoint(uri, force_path_style))
            .transpose()?;
        if let Some(endpoint) = &endpoint {
            debug!(
                url = %endpoint.url(),
                path_style = force_path_style,
                "resolving against a static endpoint"
            );
        }

        let http_client = match self.transport() {
            Some(transport) => transport.clone(),
            None => {
                debug!("using the default TLS transport");
                default_transport(roots)?
            }
        };

        let client = ClientOptions {
            credentials: self.credentials().map(Credentials::from),
            region: self.region().map(|region| Region::new(region.to_string())),
            unsigned_headers,
            endpoint,
            http_client,
            force_path_style,
            accelerate: self.use_accelerate(),
        };

        let presign = PresignOptions {
            expires_in: self.presign_expire(),
            endpoint: self
                .external_uri()
                .map(|uri| static_endpoint(uri, force_path_style))
                .transpose()?,
        };

        Ok((client, presign))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DEFAULT_EXPIRE, PlatformRoots};
    use aws_smithy_http_client::test_util::capture_request;
    use testresult::TestResult;

    fn options(overlay: Options) -> Options {
        let (http_client, _requests) = capture_request(None);
        Options::new([Options::default().with_transport(http_client), overlay])
    }

    #[test]
    fn it_uses_the_default_expiry() -> TestResult {
        let (_, presign) = options(Options::default()).s3_options(&PlatformRoots::default())?;

        assert_eq!(presign.expires_in(), DEFAULT_EXPIRE);
        assert_eq!(presign.expires_in(), Duration::from_secs(15 * 60));
        assert_eq!(
            presign.presigning_config()?.expires(),
            Duration::from_secs(15 * 60)
        );
        Ok(())
    }

    #[test]
    fn it_uses_the_configured_expiry() -> TestResult {
        let overlay = Options::default().with_default_expire(Duration::from_secs(5 * 60));
        let (_, presign) = options(overlay).s3_options(&PlatformRoots::default())?;

        assert_eq!(presign.expires_in(), Duration::from_secs(5 * 60));
        assert_eq!(
            presign.presigning_config()?.expires(),
            Duration::from_secs(5 * 60)
        );
        Ok(())
    }

    #[test]
    fn it_rejects_expiries_the_client_refuses() -> TestResult {
        let overlay = Options::default().with_default_expire(Duration::from_secs(8 * 24 * 3600));
        let (_, presign) = options(overlay).s3_options(&PlatformRoots::default())?;

        assert!(matches!(
            presign.presigning_config(),
            Err(OptionsError::Presign(_))
        ));
        Ok(())
    }

    #[test]
    fn it_wraps_the_signer_only_when_headers_are_configured() -> TestResult {
        let (client, _) = options(Options::default()).s3_options(&PlatformRoots::default())?;
        assert!(client.unsigned_headers().is_none());

        let overlay = Options::default().with_unsigned_headers(["Accept-Encoding"]);
        let (client, _) = options(overlay).s3_options(&PlatformRoots::default())?;
        let scheme = client.unsigned_headers().expect("signer is wrapped");
        assert!(scheme.names().contains("accept-encoding"));
        Ok(())
    }

    #[test]
    fn it_shares_host_immutability_between_both_endpoints() -> TestResult {
        let overlay = Options::default()
            .with_uri("http://minio:9000")
            .with_external_uri("https://files.example.com")
            .with_force_path_style(true)
            .with_use_accelerate(true)
            .with_region("us-east-1");
        let (client, presign) = options(overlay).s3_options(&PlatformRoots::default())?;

        let endpoint = client.endpoint().expect("API endpoint is set");
        assert_eq!(endpoint.url().as_str(), "http://minio:9000/");
        assert!(endpoint.hostname_immutable());

        let endpoint = presign.endpoint().expect("presign endpoint is set");
        assert_eq!(endpoint.url().as_str(), "https://files.example.com/");
        assert!(endpoint.hostname_immutable());

        assert!(client.force_path_style());
        assert!(client.accelerate());
        assert_eq!(client.region().map(|r| r.as_ref()), Some("us-east-1"));
        Ok(())
    }

    #[test]
    fn it_leaves_the_endpoints_alone_without_uris() -> TestResult {
        let (client, presign) = options(Options::default()).s3_options(&PlatformRoots::default())?;

        assert!(client.endpoint().is_none());
        assert!(presign.endpoint().is_none());
        assert!(client.region().is_none());
        Ok(())
    }

    #[test]
    fn it_refuses_options_that_do_not_validate() {
        let overlay = Options::default().with_buffer_size(1024);

        let result = options(overlay).s3_options(&PlatformRoots::default());
        assert!(matches!(result, Err(OptionsError::Validation(_))));
    }

    #[test]
    fn it_surfaces_bad_uris_when_building() {
        let overlay = Options::default().with_uri("not a url");

        let result = options(overlay).s3_options(&PlatformRoots::default());
        assert!(matches!(result, Err(OptionsError::Endpoint { .. })));

        let overlay = Options::default().with_external_uri("also not a url");
        let result = options(overlay).s3_options(&PlatformRoots::default());
        assert!(matches!(result, Err(OptionsError::Endpoint { .. })));
    }
}
