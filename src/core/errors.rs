use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExporterError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("API error: {code} - {message}")]
    ApiError { code: u16, message: String },

    #[error("Exchange error: {0}")]
    ExchangeError(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] crate::core::config::ConfigError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Metric encoding error: {0}")]
    EncodeError(#[from] prometheus::Error),

    #[error("Other error: {0}")]
    Other(String),
}

impl ExporterError {
    /// Whether the failure is worth retrying: the exchange was unreachable,
    /// the request timed out, or the upstream answered with a 5xx.
    ///
    /// The Qryptos market-load loop retries indefinitely on these; every
    /// other failure aborts the cycle.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::HttpError(e) => e.is_timeout() || e.is_connect(),
            Self::ApiError { code, .. } => (500..600).contains(code),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_retryable() {
        let err = ExporterError::ApiError {
            code: 503,
            message: "Service Unavailable".to_string(),
        };
        assert!(err.is_retryable());

        let err = ExporterError::ApiError {
            code: 502,
            message: "Bad Gateway".to_string(),
        };
        assert!(err.is_retryable());
    }

    #[test]
    fn client_errors_are_not_retryable() {
        let err = ExporterError::ApiError {
            code: 404,
            message: "Not Found".to_string(),
        };
        assert!(!err.is_retryable());

        let err = ExporterError::ApiError {
            code: 429,
            message: "Too Many Requests".to_string(),
        };
        assert!(!err.is_retryable());
    }

    #[test]
    fn parse_and_auth_errors_are_not_retryable() {
        let err: ExporterError = serde_json::from_str::<serde_json::Value>("not json")
            .unwrap_err()
            .into();
        assert!(!err.is_retryable());

        assert!(!ExporterError::AuthError("bad token".to_string()).is_retryable());
        assert!(!ExporterError::ExchangeError("EGeneral:Invalid".to_string()).is_retryable());
    }
}
