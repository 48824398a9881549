use anyhow::{anyhow, Result};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

const CREDENTIALS_FILE: &str = "credentials.json";
const APP_DIR: &str = "fourpaws";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: String,
    pub request_timeout_seconds: u64,
    pub credentials_path: PathBuf,
    pub otp_resend_cooldown_seconds: u64,
    pub feed_page_limit: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let api_base_url = env_or_err("API_BASE_URL")?;
        let _parsed_base_url =
            Url::parse(&api_base_url).map_err(|err| anyhow!("invalid API_BASE_URL: {}", err))?;

        let credentials_path = match std::env::var("CREDENTIALS_PATH") {
            Ok(path) => PathBuf::from(path),
            Err(_) => default_credentials_path()?,
        };

        let feed_page_limit: u32 = env_or_parse("FEED_PAGE_LIMIT", "50")?;
        if feed_page_limit == 0 {
            return Err(anyhow!("invalid FEED_PAGE_LIMIT: must be greater than 0"));
        }

        Ok(Self {
            api_base_url,
            request_timeout_seconds: env_or_parse("REQUEST_TIMEOUT_SECONDS", "30")?,
            credentials_path,
            otp_resend_cooldown_seconds: env_or_parse("OTP_RESEND_COOLDOWN_SECONDS", "120")?,
            feed_page_limit,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn otp_resend_cooldown(&self) -> Duration {
        Duration::from_secs(self.otp_resend_cooldown_seconds)
    }
}

fn default_credentials_path() -> Result<PathBuf> {
    let base = dirs::config_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| anyhow!("cannot determine a config directory; set CREDENTIALS_PATH"))?;
    Ok(base.join(APP_DIR).join(CREDENTIALS_FILE))
}

fn env_or_err(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| anyhow!("missing required env var: {}", key))
}

fn env_or_parse<T>(key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    let value = std::env::var(key).unwrap_or_else(|_| default.to_string());
    value
        .parse::<T>()
        .map_err(|err| anyhow!("invalid {}: {}", key, err))
}
