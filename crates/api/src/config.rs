//! Application configuration loaded from environment variables.

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `RULES_PATH` — JSON file with the order rule set (default: the
///   built-in storefront rules)
/// - `CATALOG_PATH` — JSON file with product snapshots to seed the
///   in-memory catalog (default: empty catalog)
/// - `CANCEL_WINDOW_HOURS` — hours after creation during which a pending
///   order may still be cancelled (default: no limit)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub rules_path: Option<String>,
    pub catalog_path: Option<String>,
    pub cancel_window_hours: Option<i64>,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            rules_path: std::env::var("RULES_PATH").ok(),
            catalog_path: std::env::var("CATALOG_PATH").ok(),
            cancel_window_hours: std::env::var("CANCEL_WINDOW_HOURS")
                .ok()
                .and_then(|h| h.parse().ok()),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            rules_path: None,
            catalog_path: None,
            cancel_window_hours: None,
        }
    }
}
