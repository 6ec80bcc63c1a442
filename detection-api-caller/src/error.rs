/// The only error the api client hands to its callers: one human readable message.
/// Status codes and transport details are logged, not returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RequestError {
    message: String,
}

impl RequestError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Operation-specific messages used when the backend gives none
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    UploadImage,
    DetectionHistory,
    DetectionById,
    TestCall,
}

impl Operation {
    #[must_use]
    pub fn fallback_message(self) -> &'static str {
        match self {
            Operation::UploadImage => "Failed to upload image",
            Operation::DetectionHistory => "Failed to fetch detection history",
            Operation::DetectionById => "Failed to fetch detection",
            Operation::TestCall => "Failed to reach detection service",
        }
    }

    #[must_use]
    pub fn fallback_error(self) -> RequestError {
        RequestError::new(self.fallback_message())
    }
}
