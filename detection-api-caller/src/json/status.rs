/// Response of the service root, used as a health check
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct ServiceStatus {
    pub message: String,
    #[serde(default)]
    pub environment: Option<String>,
}
