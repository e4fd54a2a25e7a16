//! Server startup configuration.
//!
//! Loaded once at startup from a JSON file; every field has a default so a
//! missing file yields a usable development configuration. An invalid
//! memory percentage is a startup-fatal error, not a request-time one: a
//! server that cannot resolve its memory budget cannot serve any request
//! correctly.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShoalError};

/// Configuration for the array server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the TCP transport binds to.
    pub bind_addr: String,
    /// Number of locales the fabric is carved into.
    pub num_locales: usize,
    /// Percentage of each locale's physical memory available to arrays.
    pub mem_max_pct: u8,
    /// Default tracing filter, overridable by `RUST_LOG`.
    pub trace_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_addr: "127.0.0.1:5555".to_string(),
            num_locales: 4,
            mem_max_pct: 90,
            trace_filter: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let cfg: ServerConfig =
            serde_json::from_str(&text).map_err(|e| ShoalError::ValueError {
                reason: format!("invalid config {}: {}", path.display(), e),
            })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check structural constraints. The memory percentage must be usable
    /// to compute a per-locale byte budget.
    pub fn validate(&self) -> Result<()> {
        if self.mem_max_pct == 0 || self.mem_max_pct > 100 {
            return Err(ShoalError::value_error(format!(
                "mem_max_pct must be in 1..=100, got {}",
                self.mem_max_pct
            )));
        }
        if self.num_locales == 0 {
            return Err(ShoalError::value_error("num_locales must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        ServerConfig::default().validate().unwrap();
    }

    #[test]
    fn zero_percent_budget_is_rejected() {
        let cfg = ServerConfig {
            mem_max_pct: 0,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ShoalError::ValueError { .. })
        ));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: ServerConfig = serde_json::from_str(r#"{"num_locales": 2}"#).unwrap();
        assert_eq!(cfg.num_locales, 2);
        assert_eq!(cfg.mem_max_pct, 90);
    }
}
