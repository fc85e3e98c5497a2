//! Error types for scribed.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScribedError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Audio input errors
    #[error("Malformed audio payload: {message}")]
    MalformedAudio { message: String },

    #[error("Audio decode failed: {message}")]
    AudioDecode { message: String },

    // Transcription errors
    #[error("Transcription model not found at {path}")]
    TranscriptionModelNotFound { path: String },

    #[error("Transcription inference failed: {message}")]
    TranscriptionInferenceFailed { message: String },

    #[error("Transcription engine unavailable: {message}")]
    EngineUnavailable { message: String },

    // Server errors
    #[error("Server socket error: {message}")]
    ServerSocket { message: String },

    #[error("Wire protocol error: {message}")]
    Protocol { message: String },

    #[error("Connection failed: {message}")]
    Connection { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, ScribedError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_config_file_not_found_display() {
        let error = ScribedError::ConfigFileNotFound {
            path: "/etc/scribed/config.toml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found at /etc/scribed/config.toml"
        );
    }

    #[test]
    fn test_config_invalid_value_display() {
        let error = ScribedError::ConfigInvalidValue {
            key: "audio.sample_rate".to_string(),
            message: "must be positive".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration value for audio.sample_rate: must be positive"
        );
    }

    #[test]
    fn test_malformed_audio_display() {
        let error = ScribedError::MalformedAudio {
            message: "payload is not valid base64".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Malformed audio payload: payload is not valid base64"
        );
    }

    #[test]
    fn test_transcription_model_not_found_display() {
        let error = ScribedError::TranscriptionModelNotFound {
            path: "/models/ggml-large-v2.bin".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Transcription model not found at /models/ggml-large-v2.bin"
        );
    }

    #[test]
    fn test_transcription_inference_failed_display() {
        let error = ScribedError::TranscriptionInferenceFailed {
            message: "out of memory".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Transcription inference failed: out of memory"
        );
    }

    #[test]
    fn test_engine_unavailable_display() {
        let error = ScribedError::EngineUnavailable {
            message: "worker stopped".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Transcription engine unavailable: worker stopped"
        );
    }

    #[test]
    fn test_server_socket_display() {
        let error = ScribedError::ServerSocket {
            message: "bind failed".to_string(),
        };
        assert_eq!(error.to_string(), "Server socket error: bind failed");
    }

    #[test]
    fn test_protocol_display() {
        let error = ScribedError::Protocol {
            message: "invalid message format".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Wire protocol error: invalid message format"
        );
    }

    #[test]
    fn test_connection_display() {
        let error = ScribedError::Connection {
            message: "timeout".to_string(),
        };
        assert_eq!(error.to_string(), "Connection failed: timeout");
    }

    #[test]
    fn test_other_display() {
        let error = ScribedError::Other("unexpected error".to_string());
        assert_eq!(error.to_string(), "unexpected error");
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: ScribedError = io_error.into();
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_toml_error() {
        let toml_str = "invalid = toml = syntax";
        let toml_error = toml::from_str::<toml::Value>(toml_str).unwrap_err();
        let error: ScribedError = toml_error.into();
        assert!(error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(returns_result().unwrap(), 42);

        fn returns_error() -> Result<i32> {
            Err(ScribedError::Other("test error".to_string()))
        }
        assert!(returns_error().is_err());
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<ScribedError>();
        assert_sync::<ScribedError>();
    }

    #[test]
    fn test_error_debug_format() {
        let error = ScribedError::ConfigFileNotFound {
            path: "/test/path".to_string(),
        };
        let debug_str = format!("{:?}", error);
        assert!(debug_str.contains("ConfigFileNotFound"));
        assert!(debug_str.contains("/test/path"));
    }
}
