// src/config.rs

use std::{env, fmt::Display, str::FromStr, time::Duration};

use tracing::{info, warn};

const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;
const DEFAULT_NOTIFICATION_SECS: u64 = 4;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base_url: String,
    /// Baza dla obrazków budowanych ze ścieżki w storage.
    pub storage_base_url: String,
    pub low_stock_threshold: i64,
    pub notification_ttl: Duration,
    pub request_timeout: Duration,
    pub session_token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            storage_base_url: DEFAULT_API_URL.to_string(),
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            notification_ttl: Duration::from_secs(DEFAULT_NOTIFICATION_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            session_token: None,
        }
    }
}

impl ClientConfig {
    /// Wczytuje konfigurację ze zmiennych środowiskowych (po `dotenvy::dotenv()`).
    pub fn load() -> Self {
        let api_base_url = trim_base(
            &var("MYSTORE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
        );
        let storage_base_url = var("MYSTORE_STORAGE_URL")
            .map(|url| trim_base(&url))
            .unwrap_or_else(|_| api_base_url.clone());

        Self {
            api_base_url,
            storage_base_url,
            low_stock_threshold: try_load("MYSTORE_LOW_STOCK_THRESHOLD", DEFAULT_LOW_STOCK_THRESHOLD),
            notification_ttl: Duration::from_secs(try_load(
                "MYSTORE_NOTIFICATION_SECS",
                DEFAULT_NOTIFICATION_SECS,
            )),
            request_timeout: Duration::from_secs(try_load(
                "MYSTORE_REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )),
            session_token: var("MYSTORE_TOKEN")
                .ok()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        info!("Zmienna środowiskowa {key} nie jest ustawiona, używam domyślnej");
    })
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    parse_or_default(key, var(key).ok().as_deref(), default)
}

fn parse_or_default<T>(key: &str, raw: Option<&str>, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match raw {
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!("Nieprawidłowa wartość {key}='{raw}': {e}, używam {default}");
            default
        }),
        None => default,
    }
}

fn trim_base(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_urls_lose_trailing_slashes() {
        assert_eq!(trim_base(" http://shop.test/ "), "http://shop.test");
        assert_eq!(trim_base("http://shop.test//"), "http://shop.test");
    }

    #[test]
    fn invalid_numbers_fall_back_to_default() {
        assert_eq!(parse_or_default("THRESHOLD", Some("five"), 5_i64), 5);
        assert_eq!(parse_or_default("THRESHOLD", Some(" 12 "), 5_i64), 12);
        assert_eq!(parse_or_default("THRESHOLD", None, 5_i64), 5);
        assert_eq!(parse_or_default("SECS", Some("-3"), 4_u64), 4);
    }

    #[test]
    fn defaults_match_local_backend() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base_url, "http://127.0.0.1:8000");
        assert_eq!(config.low_stock_threshold, 5);
        assert_eq!(config.notification_ttl, Duration::from_secs(4));
        assert!(config.session_token.is_none());
    }
}
