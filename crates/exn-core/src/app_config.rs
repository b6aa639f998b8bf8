use chrono::NaiveTime;

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

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Identifier the recurring background task is registered under.
    pub task_id: String,
    /// Start of the daily scheduling window (wall clock).
    pub window_start: NaiveTime,
    /// End of the daily scheduling window (wall clock).
    pub window_end: NaiveTime,
    /// Hours between consecutive slots within the window.
    pub slot_interval_hours: u32,
    /// How long a fired task may run before the runner signals expiration.
    pub task_execution_allowance_secs: u64,
    pub report_api_base_url: String,
    pub batch_download_base_url: String,
    pub http_timeout_secs: u64,
    /// Whether exposure processing is authorized. In production this mirrors
    /// the platform framework's authorization status; here it is config-fed.
    pub exposure_authorized: bool,
}
