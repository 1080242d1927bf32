#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub places_api_key: Option<String>,
    pub places_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub navigation_timeout_ms: u64,
    pub settle_delay_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field(
                "places_api_key",
                &self.places_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("places_base_url", &self.places_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("navigation_timeout_ms", &self.navigation_timeout_ms)
            .field("settle_delay_ms", &self.settle_delay_ms)
            .finish()
    }
}
