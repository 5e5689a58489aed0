use aws_runtime::auth::sigv4::SigV4AuthScheme;
use aws_smithy_runtime_api::box_error::BoxError;
use aws_smithy_runtime_api::client::auth::{
    AuthScheme, AuthSchemeEndpointConfig, AuthSchemeId, SharedAuthScheme, Sign,
};
use aws_smithy_runtime_api::client::identity::{Identity, SharedIdentityResolver};
use aws_smithy_runtime_api::client::orchestrator::HttpRequest;
use aws_smithy_runtime_api::client::runtime_components::{GetIdentityResolver, RuntimeComponents};
use aws_smithy_types::config_bag::ConfigBag;
use tracing::trace;

use crate::{HeaderNames, StrippedHeaders};

/// Auth scheme that keeps a fixed set of headers out of the signature.
///
/// It wraps another scheme (SigV4 by default) and reports the same
/// [`AuthSchemeId`], so pushing it onto a client config replaces the wrapped
/// scheme. Its signer lifts the listed headers off the request, lets the
/// wrapped signer run and puts them back before returning. No other stage of
/// the request pipeline ever sees the request without them.
///
/// Operations that resolve to a different auth scheme never reach this one
/// and go out unchanged.
#[derive(Debug, Clone)]
pub struct UnsignedHeaders {
    names: HeaderNames,
    inner: SharedAuthScheme,
}

impl UnsignedHeaders {
    /// Wrap SigV4 for the given header names (any case).
    pub fn new(names: impl Into<HeaderNames>) -> Self {
        Self::wrap(names, SigV4AuthScheme::new())
    }

    /// Wrap an arbitrary auth scheme.
    pub fn wrap(names: impl Into<HeaderNames>, scheme: impl AuthScheme + 'static) -> Self {
        Self {
            names: names.into(),
            inner: SharedAuthScheme::new(scheme),
        }
    }

    /// The canonical names excluded from signing.
    pub fn names(&self) -> &HeaderNames {
        &self.names
    }
}

impl AuthScheme for UnsignedHeaders {
    fn scheme_id(&self) -> AuthSchemeId {
        self.inner.scheme_id()
    }

    fn identity_resolver(
        &self,
        identity_resolvers: &dyn GetIdentityResolver,
    ) -> Option<SharedIdentityResolver> {
        self.inner.identity_resolver(identity_resolvers)
    }

    fn signer(&self) -> &dyn Sign {
        self
    }
}

impl Sign for UnsignedHeaders {
    fn sign_http_request(
        &self,
        request: &mut HttpRequest,
        identity: &Identity,
        auth_scheme_endpoint_config: AuthSchemeEndpointConfig<'_>,
        runtime_components: &RuntimeComponents,
        config_bag: &ConfigBag,
    ) -> Result<(), BoxError> {
        let stripped = StrippedHeaders::strip(&self.names, request.headers_mut());
        if !stripped.is_empty() {
            trace!(
                headers = ?stripped.names().collect::<Vec<_>>(),
                "signing without headers"
            );
        }

        let signed = self.inner.signer().sign_http_request(
            request,
            identity,
            auth_scheme_endpoint_config,
            runtime_components,
            config_bag,
        );

        // Headers go back even when signing failed.
        stripped.restore(request.headers_mut())?;
        signed
    }
}
