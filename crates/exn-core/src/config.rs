use chrono::NaiveTime;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default =
        |var: &str, default: &str| -> String { lookup(var).unwrap_or_else(|_| default.to_string()) };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<bool>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_time = |var: &str, default: &str| -> Result<NaiveTime, ConfigError> {
        let raw = or_default(var, default);
        NaiveTime::parse_from_str(&raw, "%H:%M").map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("EXN_ENV", "development"));
    let window_start = parse_time("EXN_WINDOW_START", "06:00")?;
    let window_end = parse_time("EXN_WINDOW_END", "22:00")?;
    let slot_interval_hours = parse_u32("EXN_SLOT_INTERVAL_HOURS", "4")?;

    if window_start >= window_end {
        return Err(ConfigError::InvalidEnvVar {
            var: "EXN_WINDOW_START".to_string(),
            reason: format!("window start {window_start} must precede window end {window_end}"),
        });
    }
    if slot_interval_hours == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "EXN_SLOT_INTERVAL_HOURS".to_string(),
            reason: "slot interval must be at least one hour".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        log_level: or_default("EXN_LOG_LEVEL", "info"),
        task_id: or_default("EXN_TASK_ID", "exn.exposure-notification"),
        window_start,
        window_end,
        slot_interval_hours,
        task_execution_allowance_secs: parse_u64("EXN_TASK_EXECUTION_ALLOWANCE_SECS", "25")?,
        report_api_base_url: require("EXN_REPORT_API_BASE_URL")?,
        batch_download_base_url: require("EXN_BATCH_DOWNLOAD_BASE_URL")?,
        http_timeout_secs: parse_u64("EXN_HTTP_TIMEOUT_SECS", "30")?,
        exposure_authorized: parse_bool("EXN_EXPOSURE_AUTHORIZED", "true")?,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    /// Returns a map with all required env vars populated with valid defaults.
    fn full_env<'a>() -> HashMap<&'a str, &'a str> {
        let mut m = HashMap::new();
        m.insert("EXN_REPORT_API_BASE_URL", "https://report.example/api/v1");
        m.insert("EXN_BATCH_DOWNLOAD_BASE_URL", "https://cdn.example/batches");
        m
    }

    #[test]
    fn build_app_config_fails_without_report_api_base_url() {
        let mut map = full_env();
        map.remove("EXN_REPORT_API_BASE_URL");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "EXN_REPORT_API_BASE_URL"),
            "expected MissingEnvVar(EXN_REPORT_API_BASE_URL), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_applies_window_defaults() {
        let map = full_env();
        let config = build_app_config(lookup_from_map(&map)).expect("config should build");
        assert_eq!(config.window_start, NaiveTime::from_hms_opt(6, 0, 0).unwrap());
        assert_eq!(config.window_end, NaiveTime::from_hms_opt(22, 0, 0).unwrap());
        assert_eq!(config.slot_interval_hours, 4);
        assert_eq!(config.env, Environment::Development);
        assert!(config.exposure_authorized);
    }

    #[test]
    fn build_app_config_parses_custom_window() {
        let mut map = full_env();
        map.insert("EXN_WINDOW_START", "08:30");
        map.insert("EXN_WINDOW_END", "20:00");
        map.insert("EXN_SLOT_INTERVAL_HOURS", "2");
        let config = build_app_config(lookup_from_map(&map)).expect("config should build");
        assert_eq!(config.window_start, NaiveTime::from_hms_opt(8, 30, 0).unwrap());
        assert_eq!(config.window_end, NaiveTime::from_hms_opt(20, 0, 0).unwrap());
        assert_eq!(config.slot_interval_hours, 2);
    }

    #[test]
    fn build_app_config_rejects_inverted_window() {
        let mut map = full_env();
        map.insert("EXN_WINDOW_START", "21:00");
        map.insert("EXN_WINDOW_END", "08:00");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "EXN_WINDOW_START"),
            "expected InvalidEnvVar(EXN_WINDOW_START), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_rejects_zero_interval() {
        let mut map = full_env();
        map.insert("EXN_SLOT_INTERVAL_HOURS", "0");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "EXN_SLOT_INTERVAL_HOURS"),
            "expected InvalidEnvVar(EXN_SLOT_INTERVAL_HOURS), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_rejects_malformed_time() {
        let mut map = full_env();
        map.insert("EXN_WINDOW_START", "8am");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "EXN_WINDOW_START"),
            "expected InvalidEnvVar(EXN_WINDOW_START), got: {result:?}"
        );
    }

    #[test]
    fn parse_environment_recognizes_known_values() {
        assert_eq!(parse_environment("production"), Environment::Production);
        assert_eq!(parse_environment("test"), Environment::Test);
        assert_eq!(parse_environment("development"), Environment::Development);
        assert_eq!(parse_environment("anything-else"), Environment::Development);
    }
}
