//! Errors raised at the boundary of the report engine.
//!
//! The engine itself never fails on degraded data: missing values, malformed
//! clock strings, unknown interval categories and zero targets all fall back
//! to neutral values. Only input decoding, configuration and the rendering
//! collaborator can fail.

/// Result type for report operations
pub type ReportResult<T> = Result<T, ReportError>;

/// Error type for report operations
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Invalid report input: {0}")]
    Input(#[from] serde_json::Error),

    #[error("Invalid configuration file: {0}")]
    ConfigFile(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Render error: {0}")]
    Render(String),
}

impl ReportError {
    pub fn config(msg: impl Into<String>) -> Self {
        ReportError::Config(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        ReportError::Render(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_from_json() {
        let err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: ReportError = err.into();
        assert!(err.to_string().starts_with("Invalid report input"));
    }

    #[test]
    fn test_config_message() {
        let err = ReportError::config("page capacity must be positive");
        assert_eq!(
            err.to_string(),
            "Configuration error: page capacity must be positive"
        );
    }
}
