//! Prediction client settings, read once at startup.

use std::time::Duration;

use medi_core::env;

use crate::form::InputMode;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictConfig {
    /// Base URL of the prediction service, without the `/predict` path.
    pub backend_url: String,
    /// `None` waits for the service indefinitely.
    pub request_timeout: Option<Duration>,
    pub input_mode: InputMode,
}

impl Default for PredictConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout: None,
            input_mode: InputMode::Permissive,
        }
    }
}

impl PredictConfig {
    /// Reads `MEDI_BACKEND_URL`, `MEDI_REQUEST_TIMEOUT_MS` and
    /// `MEDI_STRICT_INPUT`, keeping defaults for anything unset or invalid.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(url) = env::var("MEDI_BACKEND_URL") {
            config.backend_url = url;
        }
        if let Some(ms) = env::parse_var::<u64>("MEDI_REQUEST_TIMEOUT_MS") {
            config.request_timeout = (ms > 0).then(|| Duration::from_millis(ms));
        }
        if let Some(strict) = env::flag("MEDI_STRICT_INPUT") {
            config.input_mode = if strict {
                InputMode::Strict
            } else {
                InputMode::Permissive
            };
        }
        log::debug!("predict config: {config:?}");
        config
    }

    /// Full URL of the prediction endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}/predict", self.backend_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let mut config = PredictConfig::default();
        assert_eq!(config.endpoint(), "http://localhost:5000/predict");
        config.backend_url = "https://screening.example.org/api/".to_string();
        assert_eq!(config.endpoint(), "https://screening.example.org/api/predict");
    }

    #[test]
    fn defaults_are_permissive_without_timeout() {
        let config = PredictConfig::default();
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.input_mode, InputMode::Permissive);
    }
}
