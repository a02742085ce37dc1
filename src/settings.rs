//! Environment-backed configuration. Everything the original deployment
//! hard-coded (weights path, API key) must come from `INFERGATE_*` variables
//! so the process fails fast with a clear diagnostic when one is missing.

use serde::Deserialize;
use std::path::PathBuf;

/// Gateway configuration, loaded once at startup
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// Path to the persisted classifier weights artifact
    pub weights_path: PathBuf,

    /// Path to the newline-delimited label list
    pub labels_path: PathBuf,

    /// Credential for the Gemini API
    pub gemini_api_key: String,

    /// Gemini model identifier
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    /// Port to serve HTTP on
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_gemini_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_port() -> u16 {
    5173
}

impl Settings {
    /// Read settings from `INFERGATE_`-prefixed environment variables
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("INFERGATE"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(default_gemini_model(), "gemini-1.5-flash");
        assert_eq!(default_port(), 5173);
    }

    #[test]
    fn test_missing_required_vars_is_an_error() {
        // No INFERGATE_* variables are set under `cargo test`
        assert!(Settings::load().is_err());
    }
}
