/// Runtime settings, read from the environment.
///
/// Every value has a default, so an empty environment yields a working
/// configuration pointed at the public Moltbook host.
use std::time::Duration;

use anyhow::{Context, Result, bail};
use url::Url;

/// Default API host.
pub const DEFAULT_BASE_URL: &str = "https://www.moltbook.com/";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Environment variable overriding the API host.
pub const BASE_URL_ENV_VAR: &str = "MOLTBOOK_BASE_URL";

/// Environment variable overriding the per-request timeout (whole seconds).
pub const TIMEOUT_ENV_VAR: &str = "MOLTBOOK_TIMEOUT_SECS";

/// Environment variable holding tracing filter directives.
pub const LOG_LEVEL_ENV_VAR: &str = "MOLTBOOK_READER_LOG_LEVEL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: Url,
    pub timeout: Duration,
}

impl Settings {
    /// Read settings from the process environment.
    ///
    /// # Errors
    ///
    /// Fails when a variable is set but unusable; the message names it.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, which returns the value of a variable
    /// if it is set.
    ///
    /// # Errors
    ///
    /// Same as [`Settings::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut settings = Self {
            base_url: Url::parse(DEFAULT_BASE_URL).context("default base URL")?,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        if let Some(raw) = lookup(BASE_URL_ENV_VAR).filter(|v| !v.trim().is_empty()) {
            let url = Url::parse(raw.trim())
                .with_context(|| format!("{BASE_URL_ENV_VAR}='{raw}' is not a valid URL"))?;
            if !matches!(url.scheme(), "http" | "https") {
                bail!("{BASE_URL_ENV_VAR}='{raw}' must use http or https");
            }
            settings.base_url = url;
        }

        if let Some(raw) = lookup(TIMEOUT_ENV_VAR).filter(|v| !v.trim().is_empty()) {
            let secs: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{TIMEOUT_ENV_VAR}='{raw}' is not a whole number of seconds"))?;
            if secs == 0 {
                bail!("{TIMEOUT_ENV_VAR} must be at least 1 second");
            }
            settings.timeout = Duration::from_secs(secs);
        }

        Ok(settings)
    }
}
