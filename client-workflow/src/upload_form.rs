//! The upload form: an image, a confidence threshold and one upload at a time.
//!
//! The form never talks to the result display directly. It reports its lifecycle
//! as [`UploadEvent`]s over a channel, and whoever owns the display reacts to them.

use detection_api_caller::{
    error::RequestError, image_file::ImageFile, json::detection::DetectionResult,
    traits::DetectionApi,
};
use tokio::sync::mpsc::UnboundedSender;
use utils::struct_name;

const STRUCT_NAME: &str = struct_name!(UploadForm);

pub const MIN_CONFIDENCE_THRESHOLD: f64 = 0.1;
pub const MAX_CONFIDENCE_THRESHOLD: f64 = 0.9;
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.5;
/// Number of threshold steps per unit, i.e. a step of 0.1
const CONFIDENCE_STEPS_PER_UNIT: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please select an image file")]
    NoFileSelected,
    #[error("An upload is already in progress")]
    AlreadySubmitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormState {
    /// Nothing selected yet
    Idle,
    /// A file is selected and the form accepts a submit
    Selecting,
    Submitting,
}

/// Lifecycle notifications sent to the owner of the form
#[derive(Debug, Clone, PartialEq)]
pub enum UploadEvent {
    Started,
    Succeeded(DetectionResult),
    Failed(String),
}

/// Everything needed for exactly one upload call
#[must_use]
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file: ImageFile,
    pub confidence_threshold: f64,
}

#[must_use]
#[derive(Debug, Clone)]
pub struct UploadForm {
    file: Option<ImageFile>,
    confidence_threshold: f64,
    is_submitting: bool,
    error: Option<String>,
    last_outcome: Option<UploadEvent>,
}

impl Default for UploadForm {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadForm {
    pub fn new() -> Self {
        Self {
            file: None,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            is_submitting: false,
            error: None,
            last_outcome: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> UploadFormState {
        if self.is_submitting {
            UploadFormState::Submitting
        } else if self.file.is_some() {
            UploadFormState::Selecting
        } else {
            UploadFormState::Idle
        }
    }

    /// Stores the file for the next submit; does not upload
    pub fn select_file(&mut self, file: ImageFile) {
        tracing::debug!(
            "{STRUCT_NAME}: selected `{}` ({} bytes)",
            file.file_name,
            file.len()
        );
        self.file = Some(file);
        self.error = None;
    }

    /// Clamps to the slider range and snaps to its step. Returns the stored value.
    pub fn set_confidence_threshold(&mut self, value: f64) -> f64 {
        if value.is_finite() {
            let clamped = value.clamp(MIN_CONFIDENCE_THRESHOLD, MAX_CONFIDENCE_THRESHOLD);
            self.confidence_threshold =
                (clamped * CONFIDENCE_STEPS_PER_UNIT).round() / CONFIDENCE_STEPS_PER_UNIT;
        } else {
            tracing::debug!("{STRUCT_NAME}: ignoring non-finite confidence threshold {value}");
        }
        self.confidence_threshold
    }

    #[must_use]
    pub fn confidence_threshold(&self) -> f64 {
        self.confidence_threshold
    }

    #[must_use]
    pub fn selected_file(&self) -> Option<&ImageFile> {
        self.file.as_ref()
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    /// Inline error shown under the form
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn last_outcome(&self) -> Option<&UploadEvent> {
        self.last_outcome.as_ref()
    }

    /// Whether the submit button is enabled
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.is_submitting && self.file.is_some()
    }

    /// Validates locally and enters `Submitting`. No network call happens here.
    pub fn begin_submit(&mut self) -> Result<UploadRequest, ValidationError> {
        if self.is_submitting {
            return Err(ValidationError::AlreadySubmitting);
        }

        let Some(file) = self.file.clone() else {
            let error = ValidationError::NoFileSelected;
            self.error = Some(error.to_string());
            return Err(error);
        };

        self.is_submitting = true;
        self.error = None;

        Ok(UploadRequest {
            file,
            confidence_threshold: self.confidence_threshold,
        })
    }

    /// Leaves `Submitting` whatever the outcome, and returns the terminal event for the owner
    pub fn finish_submit(&mut self, result: Result<DetectionResult, RequestError>) -> UploadEvent {
        self.is_submitting = false;

        let event = match result {
            Ok(detection) => {
                tracing::info!(
                    "{STRUCT_NAME}: detection {} finished with {} people",
                    detection.id,
                    detection.num_people
                );
                self.error = None;
                UploadEvent::Succeeded(detection)
            }
            Err(e) => {
                tracing::error!("{STRUCT_NAME}: upload failed: {e}");
                self.error = Some(e.message().to_string());
                UploadEvent::Failed(e.message().to_string())
            }
        };

        self.last_outcome = Some(event.clone());
        event
    }

    /// One full submit: `Started`, exactly one upload call, then exactly one of
    /// `Succeeded` / `Failed`. On a validation error nothing is sent.
    pub async fn submit(
        &mut self,
        api: &dyn DetectionApi,
        events: &UnboundedSender<UploadEvent>,
    ) -> Result<(), ValidationError> {
        let request = self.begin_submit()?;

        Self::notify(events, UploadEvent::Started);

        let result = api
            .upload_image(request.file, request.confidence_threshold)
            .await;

        let event = self.finish_submit(result);
        Self::notify(events, event);

        Ok(())
    }

    fn notify(events: &UnboundedSender<UploadEvent>, event: UploadEvent) {
        if let Err(e) = events.send(event) {
            tracing::warn!("{STRUCT_NAME}: nobody listens to upload events anymore: {e}");
        }
    }

    #[must_use]
    pub fn render(&self) -> String {
        let mut lines = vec!["Upload Image for Person Detection".to_string()];

        let selected = self
            .file
            .as_ref()
            .map_or("(none)", |f| f.file_name.as_str());
        lines.push(format!("  Selected image: {selected}"));
        lines.push(format!(
            "  Confidence threshold: {}",
            self.confidence_threshold
        ));

        if let Some(error) = &self.error {
            lines.push(format!("  Error: {error}"));
        }

        lines.push(if self.is_submitting {
            "  [Processing...]".to_string()
        } else {
            "  [Detect People]".to_string()
        });

        lines.join("\n")
    }
}
