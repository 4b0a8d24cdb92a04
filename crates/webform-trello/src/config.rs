//! Configuration for the webform-trello service.

use std::env;
use std::path::PathBuf;
use trello::TRELLO_API_URL;

/// Service configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port.
    pub port: u16,
    /// Directory holding the stored settings and handler configs.
    pub config_dir: PathBuf,
    /// Trello API base URL.
    pub api_url: String,
    /// Emit JSON logs instead of human-readable ones.
    pub json_logs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: env::var("WEBFORM_TRELLO_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8080),
            config_dir: env::var("WEBFORM_TRELLO_CONFIG_DIR")
                .ok()
                .filter(|s| !s.is_empty())
                .map_or_else(|| PathBuf::from("./config"), PathBuf::from),
            api_url: env::var("TRELLO_API_URL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| TRELLO_API_URL.to_string()),
            json_logs: env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Use a mutex to serialize tests that modify environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 4] = [
        "WEBFORM_TRELLO_PORT",
        "WEBFORM_TRELLO_CONFIG_DIR",
        "TRELLO_API_URL",
        "LOG_FORMAT",
    ];

    fn clear() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_default_config() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear();

        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.config_dir, PathBuf::from("./config"));
        assert_eq!(config.api_url, TRELLO_API_URL);
        assert!(!config.json_logs);
    }

    #[test]
    fn test_config_from_env() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear();

        env::set_var("WEBFORM_TRELLO_PORT", "9000");
        env::set_var("WEBFORM_TRELLO_CONFIG_DIR", "/var/lib/webform-trello");
        env::set_var("TRELLO_API_URL", "http://localhost:4010/1");
        env::set_var("LOG_FORMAT", "JSON");

        let config = Config::default();
        assert_eq!(config.port, 9000);
        assert_eq!(
            config.config_dir,
            PathBuf::from("/var/lib/webform-trello")
        );
        assert_eq!(config.api_url, "http://localhost:4010/1");
        assert!(config.json_logs);

        clear();
    }

    #[test]
    fn test_invalid_port_falls_back() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear();

        env::set_var("WEBFORM_TRELLO_PORT", "not-a-port");
        assert_eq!(Config::default().port, 8080);

        clear();
    }
}
