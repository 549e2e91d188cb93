//! Runtime configuration loaded from environment variables.

use crate::error::ContextorError;

/// Config bag for the query pipeline.
#[derive(Clone, Debug)]
pub struct ContextorConfig {
    /// How many namespace searches may be in flight during fan-out.
    /// `1` keeps the fan-out strictly sequential.
    pub fanout_concurrency: usize,
}

impl Default for ContextorConfig {
    fn default() -> Self {
        Self {
            fanout_concurrency: 1,
        }
    }
}

impl ContextorConfig {
    /// Build from environment variables with defaults.
    ///
    /// - `RAG_FANOUT_CONCURRENCY` (default `1`, must be >= 1)
    pub fn from_env() -> Result<Self, ContextorError> {
        let mut cfg = Self::default();
        if let Ok(raw) = std::env::var("RAG_FANOUT_CONCURRENCY") {
            if !raw.trim().is_empty() {
                cfg.fanout_concurrency = parse_concurrency(&raw)?;
            }
        }
        Ok(cfg)
    }
}

fn parse_concurrency(raw: &str) -> Result<usize, ContextorError> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(ContextorError::Config(format!(
            "RAG_FANOUT_CONCURRENCY must be a positive integer, got '{raw}'"
        ))),
    }
}
