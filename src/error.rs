// src/error.rs
// Error types for the chat client

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Why a call to the chat endpoint did not produce a reply.
///
/// The session treats every variant the same way ("request failed"); the
/// distinction only exists for logging.
#[derive(Error, Debug)]
pub enum EndpointError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("could not decode response: {0}")]
    Decode(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("request abandoned before a reply arrived")]
    Abandoned,
}

impl EndpointError {
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }
}

impl From<serde_json::Error> for EndpointError {
    fn from(err: serde_json::Error) -> Self {
        EndpointError::Decode(err.to_string())
    }
}

/// Configuration file errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Endpoint result type
pub type EndpointResult<T> = Result<T, EndpointError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_message() {
        let err = EndpointError::decode("missing field `message`");
        assert!(err.to_string().contains("could not decode"));
        assert!(err.to_string().contains("message"));
    }

    #[test]
    fn test_timeout_error_message() {
        let err = EndpointError::Timeout(Duration::from_secs(30));
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_abandoned_error_message() {
        assert!(EndpointError::Abandoned.to_string().contains("abandoned"));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: EndpointError = json_err.into();
        assert!(matches!(err, EndpointError::Decode(_)));
    }

    #[test]
    fn test_config_parse_error() {
        let toml_err = toml::from_str::<toml::Value>("= broken").unwrap_err();
        let err: ConfigError = toml_err.into();
        assert!(err.to_string().starts_with("failed to parse config"));
    }
}
