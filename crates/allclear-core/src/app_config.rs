use crate::facility::GeoPosition;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub api_base_url: String,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    /// Trailing-edge debounce for map drag/zoom end events. `0` dispatches
    /// every event immediately.
    pub map_idle_debounce_ms: u64,
    pub cancel_superseded: bool,
    pub default_center: GeoPosition,
    pub default_zoom: u8,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("api_base_url", &self.api_base_url)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("map_idle_debounce_ms", &self.map_idle_debounce_ms)
            .field("cancel_superseded", &self.cancel_superseded)
            .field(
                "default_center",
                &format_args!(
                    "{},{}",
                    self.default_center.latitude, self.default_center.longitude
                ),
            )
            .field("default_zoom", &self.default_zoom)
            .finish()
    }
}
