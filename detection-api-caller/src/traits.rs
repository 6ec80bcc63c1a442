use crate::{
    error::RequestError,
    image_file::ImageFile,
    json::{
        detection::{DetectionId, DetectionResult},
        history::{HistoryPayload, HistoryQuery},
        status::ServiceStatus,
    },
};
use async_trait::async_trait;

#[async_trait]
pub trait DetectionApi: Send + Sync {
    /// Attempt a call to the API that only tests whether the API is healthy
    #[must_use]
    async fn test_call(&self) -> Result<ServiceStatus, RequestError>;

    /// Runs person detection on the image with the given threshold
    #[must_use]
    async fn upload_image(
        &self,
        file: ImageFile,
        confidence_threshold: f64,
    ) -> Result<DetectionResult, RequestError>;

    /// The payload is returned as received; see `HistoryPayload::normalize`
    #[must_use]
    async fn detection_history(&self, query: HistoryQuery)
    -> Result<HistoryPayload, RequestError>;

    #[must_use]
    async fn detection_by_id(&self, id: DetectionId) -> Result<DetectionResult, RequestError>;
}
