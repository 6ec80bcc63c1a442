#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionApiConfig {
    /// e.g.: http://localhost/api
    pub api_base_url: String,
    // e.g.: socks5://192.168.1.1:9000
    pub api_proxy: Option<String>,
    pub request_timeout: Option<std::time::Duration>,
}

impl DetectionApiConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            api_proxy: None,
            request_timeout: None,
        }
    }

    /// Joins the base url and a relative path with exactly one `/` between them
    #[must_use]
    pub fn resource_url(&self, relative_path: &str) -> String {
        join_url(&self.api_base_url, relative_path)
    }
}

#[must_use]
pub fn join_url(base: &str, relative_path: &str) -> String {
    let base = base.trim_end_matches('/');
    let relative_path = relative_path.trim_start_matches('/');
    format!("{base}/{relative_path}")
}
