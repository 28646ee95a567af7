use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub enabled: bool,
    pub allow_any_origin: bool,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// When true, a GET for a missing blueprint answers 200 with a
    /// `"No encontrado"` message instead of a 404, matching the wire
    /// behavior the original clients expect.
    pub compat_not_found: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RelayConfig {
    /// When true, a draw event naming a missing blueprint is rejected with
    /// an error event to the sender instead of being relayed anyway.
    pub strict_events: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub environment: String,
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub api: ApiConfig,
    pub relay: RelayConfig,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            // Start with default values
            .set_default("environment", "development")?
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3001)?
            .set_default("server.workers", num_cpus::get() as i64)?
            .set_default("cors.enabled", true)?
            .set_default("cors.allow_any_origin", true)?
            .set_default("cors.max_age", 3600)?
            .set_default("api.compat_not_found", true)?
            .set_default("relay.strict_events", false)?
            // Add in settings from the config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add in settings from environment variables (with prefix "APP_")
            // E.g., `APP_SERVER__PORT=5001` would set `Settings.server.port`
            .add_source(
                Environment::with_prefix("app")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
            )
            .build()?;

        s.try_deserialize()
    }

    #[cfg(test)]
    pub fn new_for_test() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("environment", "test")?
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3001)?
            .set_default("server.workers", num_cpus::get() as i64)?
            .set_default("cors.enabled", true)?
            .set_default("cors.allow_any_origin", true)?
            .set_default("cors.max_age", 3600)?
            .set_default("api.compat_not_found", true)?
            .set_default("relay.strict_events", false)?
            .add_source(
                Environment::with_prefix("app")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Settings reads the whole process environment, so tests that set
    // APP_* variables must not run concurrently.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn cleanup_env() {
        env::remove_var("APP_SERVER__PORT");
        env::remove_var("APP_SERVER__WORKERS");
        env::remove_var("APP_CORS__ALLOW_ANY_ORIGIN");
        env::remove_var("APP_API__COMPAT_NOT_FOUND");
        env::remove_var("APP_RELAY__STRICT_EVENTS");
    }

    #[test]
    fn test_settings_defaults() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        cleanup_env();
        let settings = Settings::new_for_test().expect("Failed to load settings");
        assert_eq!(settings.environment, "test");
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 3001);
        assert_eq!(settings.server.workers as usize, num_cpus::get());
        assert!(settings.cors.enabled);
        assert!(settings.cors.allow_any_origin);
        assert!(settings.api.compat_not_found);
        assert!(!settings.relay.strict_events);
    }

    #[test]
    fn test_environment_override() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        cleanup_env();

        env::set_var("APP_SERVER__PORT", "9000");
        env::set_var("APP_RELAY__STRICT_EVENTS", "true");
        env::set_var("APP_API__COMPAT_NOT_FOUND", "false");

        let settings = Settings::new_for_test().expect("Failed to load settings");

        assert_eq!(settings.server.port, 9000);
        assert!(settings.relay.strict_events);
        assert!(!settings.api.compat_not_found);

        cleanup_env();
    }

    #[test]
    fn test_invalid_port() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        cleanup_env();

        env::set_var("APP_SERVER__PORT", "invalid");

        let result = Settings::new_for_test();
        assert!(result.is_err(), "Expected error for invalid port");

        if let Err(e) = result {
            let error_message = e.to_string();
            assert!(
                error_message.contains("invalid digit found in string") ||
                error_message.contains("invalid value"),
                "Unexpected error: {}",
                error_message
            );
        }

        cleanup_env();
    }
}
