use std::env;
use std::time::Duration;

const DEFAULT_API_URL: &str = "http://127.0.0.1:9000";
const DEFAULT_CURRENCY: &str = "BTC";
const DEFAULT_SERVER_PORT: u16 = 8080;
const DEFAULT_FETCH_TIMEOUT_SECONDS: u64 = 30;

/// Runtime settings, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the explorer API, without the `/v2/lightning/...` suffix.
    pub api_url: String,
    pub currency: String,
    pub server_port: u16,
    /// Applies to every single API request.
    pub fetch_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECONDS),
        }
    }
}

impl Config {
    /// Missing or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            api_url: lookup("API_URL").unwrap_or(defaults.api_url),
            currency: lookup("CURRENCY").unwrap_or(defaults.currency),
            server_port: lookup("SERVER_PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.server_port),
            fetch_timeout: lookup("FETCH_TIMEOUT_SECONDS")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.fetch_timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn reads_values_and_falls_back_on_garbage() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("API_URL", "https://explorer.example"),
            ("SERVER_PORT", "not-a-port"),
            ("FETCH_TIMEOUT_SECONDS", "5"),
        ]);
        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.api_url, "https://explorer.example");
        assert_eq!(config.currency, "BTC");
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.fetch_timeout, Duration::from_secs(5));
    }
}
