use crate::config::ClientConfig;
use detection_api_caller::traits::DetectionApi;
use std::sync::Arc;

pub trait DetectionApiMaker:
    Fn(&ClientConfig) -> anyhow::Result<Arc<dyn DetectionApi>> + Send + Sync + 'static
{
}

impl<T> DetectionApiMaker for T where
    T: Fn(&ClientConfig) -> anyhow::Result<Arc<dyn DetectionApi>> + Send + Sync + 'static
{
}
