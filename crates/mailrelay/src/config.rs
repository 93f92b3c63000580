use std::fmt;

use crate::message::Letterhead;

pub const ENV_USER: &str = "EMAIL_USER";
pub const ENV_PASS: &str = "EMAIL_PASS";
pub const ENV_API_URL: &str = "MAIL_API_URL";
pub const ENV_SIGNATURE: &str = "EMAIL_SIGNATURE";

/// Local submission endpoint of a mail relay sidecar.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8025/api/v1/send";
pub const DEFAULT_SIGNATURE: &str = "Nixate Studio";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RelayConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),
}

/// Operator mailbox credentials and provider endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub operator_address: String,
    pub app_secret: String,
    pub api_url: String,
    pub signature: String,
}

impl RelayConfig {
    pub fn from_env() -> Result<Self, RelayConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RelayConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        Ok(Self {
            operator_address: get(ENV_USER).ok_or(RelayConfigError::Missing(ENV_USER))?,
            app_secret: get(ENV_PASS).ok_or(RelayConfigError::Missing(ENV_PASS))?,
            api_url: get(ENV_API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            signature: get(ENV_SIGNATURE).unwrap_or_else(|| DEFAULT_SIGNATURE.to_string()),
        })
    }

    pub fn letterhead(&self) -> Letterhead {
        Letterhead {
            operator_address: self.operator_address.clone(),
            signature: self.signature.clone(),
        }
    }
}

impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("operator_address", &self.operator_address)
            .field("app_secret", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("signature", &self.signature)
            .finish()
    }
}
