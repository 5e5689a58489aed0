//! Trusted root certificates and the default TLS transport.

use std::path::Path;

use aws_smithy_http_client::Builder;
use aws_smithy_http_client::tls::{self, TlsContext, TrustStore};
use aws_smithy_runtime_api::client::http::SharedHttpClient;
use rustls_pki_types::CertificateDer;
use rustls_pki_types::pem::PemObject;

use crate::OptionsError;

/// Source of the certificate pool used to verify the storage service.
pub trait RootCertificates {
    /// The trust store to build the default transport from.
    ///
    /// # Errors
    ///
    /// Fails if the certificates can not be read.
    fn trust_store(&self) -> Result<TrustStore, OptionsError>;
}

/// The platform's trusted roots, optionally extended with PEM bundles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformRoots {
    native: bool,
    pem: Vec<Vec<u8>>,
}

impl Default for PlatformRoots {
    fn default() -> Self {
        Self {
            native: true,
            pem: Vec::new(),
        }
    }
}

impl PlatformRoots {
    /// Trust the platform's native roots.
    pub fn new() -> Self {
        Self::default()
    }

    /// Do not trust the platform's native roots, only added bundles.
    pub fn without_native_roots(mut self) -> Self {
        self.native = false;
        self
    }

    /// Also trust the certificates in a PEM bundle.
    pub fn with_pem(mut self, pem: impl Into<Vec<u8>>) -> Self {
        self.pem.push(pem.into());
        self
    }

    /// Also trust the certificates in the PEM bundle at `path`.
    pub fn with_pem_file(self, path: impl AsRef<Path>) -> std::io::Result<Self> {
        let pem = std::fs::read(path)?;
        Ok(self.with_pem(pem))
    }

    /// Whether native roots are trusted.
    pub fn native(&self) -> bool {
        self.native
    }

    /// The added PEM bundles.
    pub fn bundles(&self) -> &[Vec<u8>] {
        &self.pem
    }
}

/// Number of trust anchors in a PEM bundle.
fn anchor_count(pem: &[u8]) -> Result<usize, OptionsError> {
    let certificates = CertificateDer::pem_slice_iter(pem)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|error| OptionsError::Transport(error.into()))?;
    for certificate in &certificates {
        webpki::anchor_from_trusted_cert(certificate)
            .map_err(|error| OptionsError::Transport(error.into()))?;
    }
    Ok(certificates.len())
}

impl RootCertificates for PlatformRoots {
    fn trust_store(&self) -> Result<TrustStore, OptionsError> {
        let mut store = TrustStore::default().with_native_roots(self.native);
        for pem in &self.pem {
            // The transport only parses bundles once it connects, and
            // panics on bad ones.
            if anchor_count(pem)? == 0 {
                return Err(OptionsError::Transport(
                    "PEM bundle contains no certificates".into(),
                ));
            }
            store = store.with_pem_certificate(pem.as_slice());
        }
        Ok(store)
    }
}

/// Build the TLS transport used when the caller supplies none.
pub fn default_transport(roots: &impl RootCertificates) -> Result<SharedHttpClient, OptionsError> {
    let context = TlsContext::builder()
        .with_trust_store(roots.trust_store()?)
        .build()
        .map_err(|error| OptionsError::Transport(error.into()))?;

    Ok(Builder::new()
        .tls_provider(tls::Provider::Rustls(
            tls::rustls_provider::CryptoMode::Ring,
        ))
        .tls_context(context)
        .build_https())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use testresult::TestResult;

    const CERTIFICATE: &str = "-----BEGIN CERTIFICATE-----
MIIBkTCCATegAwIBAgIUP3hq4scMjf8fZfqdkPpkbvoslSowCgYIKoZIzj0EAwIw
HTEbMBkGA1UEAwwSczMtb3B0aW9ucyB0ZXN0IENBMCAXDTI2MTAxODE4MzYwN1oY
DzIxMjYwOTI0MTgzNjA3WjAdMRswGQYDVQQDDBJzMy1vcHRpb25zIHRlc3QgQ0Ew
WTATBgcqhkjOPQIBBggqhkjOPQMBBwNCAAQnO/RHxy9bRNupSNrvBxRtQxNDwbhw
hqI4Y5FIb7je+o+k7PIJYwY0Nw0UBZoOvqGT6vLzS+S5PIQumHBV2u0do1MwUTAd
BgNVHQ4EFgQU4lfOi7sLNwTNkvnymfxkAChU9oQwHwYDVR0jBBgwFoAU4lfOi7sL
NwTNkvnymfxkAChU9oQwDwYDVR0TAQH/BAUwAwEB/zAKBggqhkjOPQQDAgNIADBF
AiEAtBEo/vJ2H76o4hXQgNgejAKIEWxYWhVn/RU4aKY26hQCICp1ERRXctzvtCDp
DfJ3WKORVZSf2U7LiKQsGVrkkEHI
-----END CERTIFICATE-----
";

    #[test]
    fn it_trusts_native_roots_by_default() {
        let roots = PlatformRoots::default();

        assert!(roots.native());
        assert!(roots.bundles().is_empty());
    }

    #[test]
    fn it_reads_pem_bundles_from_disk() -> TestResult {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(CERTIFICATE.as_bytes())?;

        let roots = PlatformRoots::new()
            .without_native_roots()
            .with_pem_file(file.path())?;

        assert!(!roots.native());
        assert_eq!(roots.bundles().len(), 1);
        roots.trust_store()?;
        Ok(())
    }

    #[test]
    fn it_builds_the_default_transport() -> TestResult {
        default_transport(&PlatformRoots::default())?;
        default_transport(&PlatformRoots::new().with_pem(CERTIFICATE))?;
        Ok(())
    }

    #[test]
    fn it_rejects_malformed_bundles() {
        let truncated = PlatformRoots::new().with_pem("-----BEGIN CERTIFICATE-----\nMIIB\n");
        assert!(matches!(
            default_transport(&truncated),
            Err(OptionsError::Transport(_))
        ));

        let empty = PlatformRoots::new().with_pem("not a certificate");
        assert!(matches!(
            default_transport(&empty),
            Err(OptionsError::Transport(_))
        ));

        let not_der = PlatformRoots::new()
            .with_pem("-----BEGIN CERTIFICATE-----\nAAAA\n-----END CERTIFICATE-----\n");
        assert!(matches!(
            default_transport(&not_der),
            Err(OptionsError::Transport(_))
        ));
    }

    #[test]
    fn it_fails_on_a_missing_bundle() {
        assert!(
            PlatformRoots::new()
                .with_pem_file("/definitely/not/here.pem")
                .is_err()
        );
    }
}
