//! Runtime configuration for the Pinecone client.

use crate::errors::RagError;

pub const DEFAULT_CONTROLLER_URL: &str = "https://api.pinecone.io";
pub const DEFAULT_API_VERSION: &str = "2024-07";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connectivity settings for the Pinecone control plane and index hosts.
#[derive(Clone, Debug)]
pub struct PineconeConfig {
    /// API key sent as the `Api-Key` header.
    pub api_key: String,
    /// Control-plane base URL, e.g. `https://api.pinecone.io`.
    pub controller_url: String,
    /// Value of the `X-Pinecone-API-Version` header.
    pub api_version: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl PineconeConfig {
    /// Creates a config with default endpoints for the given API key.
    pub fn new_default(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            controller_url: DEFAULT_CONTROLLER_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Reads `PINECONE_API_KEY` (required), `PINECONE_CONTROLLER_URL`,
    /// `PINECONE_API_VERSION` and `PINECONE_TIMEOUT_SECS`.
    ///
    /// # Errors
    /// Returns `RagError::Config` if the key is missing or a value is malformed.
    pub fn from_env() -> Result<Self, RagError> {
        let api_key = std::env::var("PINECONE_API_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| RagError::Config("PINECONE_API_KEY is not set".into()))?;

        let mut cfg = Self::new_default(api_key);
        if let Some(url) = non_empty_env("PINECONE_CONTROLLER_URL") {
            cfg.controller_url = url;
        }
        if let Some(version) = non_empty_env("PINECONE_API_VERSION") {
            cfg.api_version = version;
        }
        if let Some(raw) = non_empty_env("PINECONE_TIMEOUT_SECS") {
            cfg.timeout_secs = raw.trim().parse().map_err(|_| {
                RagError::Config(format!("PINECONE_TIMEOUT_SECS must be an integer, got '{raw}'"))
            })?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), RagError> {
        if self.api_key.trim().is_empty() {
            return Err(RagError::Config("api_key is empty".into()));
        }
        if !(self.controller_url.starts_with("http://") || self.controller_url.starts_with("https://"))
        {
            return Err(RagError::Config(
                "controller_url must start with http:// or https://".into(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(RagError::Config("timeout_secs must be > 0".into()));
        }
        Ok(())
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = PineconeConfig::new_default("pc-key");
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.controller_url, DEFAULT_CONTROLLER_URL);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut cfg = PineconeConfig::new_default("  ");
        assert!(cfg.validate().is_err());

        cfg.api_key = "pc-key".into();
        cfg.controller_url = "api.pinecone.io".into();
        assert!(cfg.validate().is_err());

        cfg.controller_url = DEFAULT_CONTROLLER_URL.into();
        cfg.timeout_secs = 0;
        assert!(cfg.validate().is_err());
    }
}
