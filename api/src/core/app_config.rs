//! Listener settings read once at startup.

use std::net::SocketAddr;

use ai_llm_service::error_handler::env_or;

use crate::error_handler::AppError;

pub const DEFAULT_API_ADDRESS: &str = "0.0.0.0:8000";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    /// Address the HTTP server binds to (`API_ADDRESS`).
    pub address: SocketAddr,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::parse(&env_or("API_ADDRESS", DEFAULT_API_ADDRESS))
    }

    fn parse(raw: &str) -> Result<Self, AppError> {
        let address = raw.trim().parse().map_err(|_| {
            AppError::Config(format!("API_ADDRESS must be host:port, got '{raw}'"))
        })?;
        Ok(Self { address })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_address_parses() {
        let cfg = AppConfig::parse(DEFAULT_API_ADDRESS).unwrap();
        assert_eq!(cfg.address.port(), 8000);
    }

    #[test]
    fn garbage_address_is_config_error() {
        assert!(matches!(
            AppConfig::parse("localhost"),
            Err(AppError::Config(_))
        ));
    }
}
