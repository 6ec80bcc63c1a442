use async_trait::async_trait;
use detection_api_caller::{
    error::RequestError,
    image_file::ImageFile,
    json::{
        detection::{DetectionId, DetectionResult},
        history::{HistoryPayload, HistoryQuery},
        status::ServiceStatus,
    },
    traits::DetectionApi,
};

#[must_use]
pub fn make_detection_client_mock() -> MockDetectionApi {
    MockDetectionApi::new()
}

mockall::mock! {
    pub DetectionApi {}

    #[async_trait]
    impl DetectionApi for DetectionApi {
        async fn test_call(&self) -> Result<ServiceStatus, RequestError>;
        async fn upload_image(
            &self,
            file: ImageFile,
            confidence_threshold: f64,
        ) -> Result<DetectionResult, RequestError>;
        async fn detection_history(
            &self,
            query: HistoryQuery,
        ) -> Result<HistoryPayload, RequestError>;
        async fn detection_by_id(&self, id: DetectionId) -> Result<DetectionResult, RequestError>;
    }
}
