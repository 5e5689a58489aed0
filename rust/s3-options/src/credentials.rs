//! Static access keys.

use aws_sdk_s3::config::Credentials;
use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Provider name reported by credentials built from [`StaticCredentials`].
pub const STATIC_PROVIDER_NAME: &str = "static";

/// An access key, its secret and an optional session token.
///
/// These override whatever the environment would otherwise supply. An
/// empty `token` means the key is not temporary.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticCredentials {
    /// Access key ID.
    pub key: String,
    /// Secret access key.
    pub secret: String,
    /// Session token for temporary credentials.
    #[serde(default)]
    pub token: String,
}

impl StaticCredentials {
    /// Create a new credential triple.
    pub fn new(
        key: impl Into<String>,
        secret: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
            token: token.into(),
        }
    }

    /// The session token, if one was given.
    pub fn session_token(&self) -> Option<&str> {
        if self.token.is_empty() {
            None
        } else {
            Some(&self.token)
        }
    }

    /// Both the key and the secret must be present.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.key.is_empty() {
            return Err(ValidationError::new("key", "cannot be blank"));
        }
        if self.secret.is_empty() {
            return Err(ValidationError::new("secret", "cannot be blank"));
        }
        Ok(())
    }
}

impl std::fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("key", &self.key)
            .field("secret", &"** redacted **")
            .field(
                "token",
                &self.session_token().map(|_| "** redacted **"),
            )
            .finish()
    }
}

impl From<&StaticCredentials> for Credentials {
    fn from(credentials: &StaticCredentials) -> Self {
        Credentials::new(
            credentials.key.clone(),
            credentials.secret.clone(),
            credentials.session_token().map(str::to_owned),
            None,
            STATIC_PROVIDER_NAME,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_requires_key_and_secret() {
        assert!(StaticCredentials::new("AKIA", "secret", "").validate().is_ok());

        let error = StaticCredentials::new("", "secret", "").validate().unwrap_err();
        assert_eq!(error.to_string(), "key: cannot be blank");

        let error = StaticCredentials::new("AKIA", "", "").validate().unwrap_err();
        assert_eq!(error.to_string(), "secret: cannot be blank");
    }

    #[test]
    fn it_treats_an_empty_token_as_absent() {
        let credentials = Credentials::from(&StaticCredentials::new("AKIA", "secret", ""));
        assert_eq!(credentials.session_token(), None);

        let credentials = Credentials::from(&StaticCredentials::new("AKIA", "secret", "token"));
        assert_eq!(credentials.access_key_id(), "AKIA");
        assert_eq!(credentials.session_token(), Some("token"));
    }

    #[test]
    fn it_redacts_secrets_in_debug_output() {
        let debug = format!("{:?}", StaticCredentials::new("AKIA", "hunter2", "sesame"));

        assert!(debug.contains("AKIA"));
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("sesame"));
    }
}
