pub mod config;
pub mod error;
pub mod image_file;
pub mod json;
pub mod traits;

use async_trait::async_trait;
use config::DetectionApiConfig;
use error::{Operation, RequestError};
use image_file::ImageFile;
use json::{
    detection::{DetectionId, DetectionResult},
    error_body,
    history::{HistoryPayload, HistoryQuery},
    status::ServiceStatus,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use traits::DetectionApi;

pub fn make_detection_client(config: DetectionApiConfig) -> anyhow::Result<Arc<dyn DetectionApi>> {
    let mut builder = reqwest::ClientBuilder::new().default_headers(json_headers_map());

    if let Some(proxy) = &config.api_proxy {
        let proxy = reqwest::Proxy::all(proxy)
            .map_err(|e| anyhow::anyhow!("Invalid proxy URL `{proxy}`: {e}"))?;
        builder = builder.proxy(proxy);
    }

    if let Some(timeout) = config.request_timeout {
        builder = builder.timeout(timeout);
    }

    let client = builder.build()?;

    tracing::debug!("Created detection API client for {}", config.api_base_url);

    Ok(Arc::new(DetectionApiClient { client, config }))
}

struct DetectionApiClient {
    client: reqwest::Client,
    config: DetectionApiConfig,
}

impl DetectionApiClient {
    fn history_request(&self, query: &HistoryQuery) -> reqwest::RequestBuilder {
        let url = self.config.resource_url("history/");
        self.client.get(url).query(query)
    }

    /// Sends the request and maps every failure to a `RequestError`, preferring
    /// the backend's `detail` message over the operation's fallback message
    async fn send_for_json<T: DeserializeOwned>(
        request: reqwest::RequestBuilder,
        operation: Operation,
    ) -> Result<T, RequestError> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!("{operation:?}: request could not be completed: {e}");
            operation.fallback_error()
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            tracing::warn!("{operation:?}: failed to read response body (status {status}): {e}");
            operation.fallback_error()
        })?;

        if !status.is_success() {
            let error = error_body::detail_message(&body)
                .map_or_else(|| operation.fallback_error(), RequestError::new);
            tracing::warn!("{operation:?}: backend responded with status {status}: {error}");
            return Err(error);
        }

        serde_json::from_slice::<T>(&body).map_err(|e| {
            tracing::warn!("{operation:?}: response body could not be parsed: {e}");
            operation.fallback_error()
        })
    }
}

#[async_trait]
impl DetectionApi for DetectionApiClient {
    async fn test_call(&self) -> Result<ServiceStatus, RequestError> {
        let url = self.config.resource_url("");
        let request = self.client.get(url);
        let status: ServiceStatus = Self::send_for_json(request, Operation::TestCall).await?;

        tracing::debug!("API test call succeeded with output: {status:?}");

        Ok(status)
    }

    async fn upload_image(
        &self,
        file: ImageFile,
        confidence_threshold: f64,
    ) -> Result<DetectionResult, RequestError> {
        let url = self.config.resource_url("detection/");
        let file_size = file.len();

        let file_part = reqwest::multipart::Part::bytes(file.bytes.to_vec())
            .file_name(file.file_name)
            .mime_str(file.mime_type)
            .map_err(|e| {
                tracing::warn!("Invalid mime type `{}`: {e}", file.mime_type);
                Operation::UploadImage.fallback_error()
            })?;
        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("confidence_threshold", confidence_threshold.to_string());

        let request = self.client.post(url).multipart(form);
        let result: DetectionResult = Self::send_for_json(request, Operation::UploadImage).await?;

        tracing::debug!(
            "Call `upload_image` with {file_size} bytes and threshold {confidence_threshold} with response: {result:?}"
        );

        Ok(result)
    }

    async fn detection_history(
        &self,
        query: HistoryQuery,
    ) -> Result<HistoryPayload, RequestError> {
        let request = self.history_request(&query);
        let result: HistoryPayload =
            Self::send_for_json(request, Operation::DetectionHistory).await?;

        tracing::debug!(
            "Call `detection_history` for page {} (limit {}) succeeded",
            query.page,
            query.limit
        );

        Ok(result)
    }

    async fn detection_by_id(&self, id: DetectionId) -> Result<DetectionResult, RequestError> {
        let url = self.config.resource_url(&format!("history/{id}"));
        let request = self.client.get(url);
        let result: DetectionResult =
            Self::send_for_json(request, Operation::DetectionById).await?;

        tracing::debug!("Call `detection_by_id` with id {id} with response: {result:?}");

        Ok(result)
    }
}

fn json_headers_map() -> reqwest::header::HeaderMap {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::ACCEPT,
        reqwest::header::HeaderValue::from_static("application/json"),
    );
    headers
}

#[cfg(test)]
mod tests;
