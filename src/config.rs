use std::env;

/// Default GraphQL endpoint when `CENTIME_BACKEND_URL` is not set.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:4000/graphql";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the remote GraphQL service.
    pub backend_url: String,
    /// BCP 47 locale identifier used for currency display, e.g. "en-US".
    pub locale: String,
    /// ISO 4217 currency code, e.g. "USD".
    pub currency: String,
    /// Per-request timeout for gateway calls.
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            backend_url: env::var("CENTIME_BACKEND_URL")
                .unwrap_or_else(|_| DEFAULT_BACKEND_URL.into()),
            locale: env::var("CENTIME_LOCALE").unwrap_or_else(|_| "en-US".into()),
            currency: env::var("CENTIME_CURRENCY").unwrap_or_else(|_| "USD".into()),
            request_timeout_secs: env::var("CENTIME_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.into(),
            locale: "en-US".into(),
            currency: "USD".into(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}
