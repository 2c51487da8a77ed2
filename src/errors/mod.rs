// Error handling module
// One error type per failure domain, rolled up into AppError at the request boundary

use thiserror::Error;

/// Failure talking to the local text-generation service.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Inference API error: HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Inference service unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed inference response: {0}")]
    Malformed(String),
}

/// Raised by content extraction for documents the pipeline cannot read.
#[derive(Debug, Error)]
pub enum UnsupportedInputError {
    #[error("Unsupported file type: {0}")]
    FileType(String),

    #[error("Document could not be decoded: {0}")]
    Decode(String),

    #[error("Malformed slide content: {0}")]
    Malformed(String),
}

/// Failure while rendering, muxing or encoding the final video.
#[derive(Debug, Error)]
pub enum CompositionError {
    #[error("IO error during composition: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV encoding failed: {0}")]
    Wav(#[from] hound::Error),

    #[error("Slide rendering failed: {0}")]
    Render(String),

    #[error("Video encoding failed: {0}")]
    Encode(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error(transparent)]
    UnsupportedInput(#[from] UnsupportedInputError),

    #[error(transparent)]
    Composition(#[from] CompositionError),

    #[error(transparent)]
    Configuration(#[from] ConfigError),

    #[error("Invalid generation settings: {0}")]
    InvalidSettings(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Short machine-readable category, used in error responses and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Inference(_) => "inference",
            AppError::UnsupportedInput(_) => "unsupported_input",
            AppError::Composition(_) => "composition",
            AppError::Configuration(_) => "configuration",
            AppError::InvalidSettings(_) => "settings",
            AppError::Io(_) => "io",
        }
    }
}

// Result type alias for application
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_carries_code_and_body() {
        let err = InferenceError::Status {
            status: 404,
            body: "model not found".to_string(),
        };
        assert_eq!(err.to_string(), "Inference API error: HTTP 404: model not found");
    }

    #[test]
    fn test_app_error_kind() {
        let err: AppError = UnsupportedInputError::FileType("docx".into()).into();
        assert_eq!(err.kind(), "unsupported_input");
        assert_eq!(err.to_string(), "Unsupported file type: docx");

        let err: AppError = CompositionError::Encode("exit 1".into()).into();
        assert_eq!(err.kind(), "composition");

        let err = AppError::InvalidSettings("voice must not be empty".into());
        assert_eq!(err.kind(), "settings");
    }
}
