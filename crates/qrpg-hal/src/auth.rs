//! Remote-access credentials.

use std::fmt;

use crate::error::{HalError, HalResult};

/// Environment variable consulted for the IBM Quantum API token.
pub const IBM_TOKEN_ENV: &str = "IBM_QUANTUM_TOKEN";

/// An API token for a remote provider.
///
/// Always non-empty and trimmed. The secret never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    /// Wrap a token, rejecting blank input.
    pub fn new(token: impl AsRef<str>) -> HalResult<Self> {
        let token = token.as_ref().trim();
        if token.is_empty() {
            return Err(HalError::AuthenticationFailed("API token is empty".into()));
        }
        Ok(Self(token.to_string()))
    }

    /// Read a token from an environment variable, if set and non-blank.
    pub fn from_env(env_var: &str) -> Option<Self> {
        std::env::var(env_var)
            .ok()
            .and_then(|value| Self::new(value).ok())
    }

    /// Pick the explicitly supplied token, falling back to a saved one in `env_var`.
    ///
    /// A blank explicit value counts as not supplied.
    pub fn resolve(explicit: Option<&str>, env_var: &str) -> Option<Self> {
        explicit
            .and_then(|token| Self::new(token).ok())
            .or_else(|| Self::from_env(env_var))
    }

    /// The secret value, for building request headers.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiToken").field(&"[REDACTED]").finish()
    }
}
