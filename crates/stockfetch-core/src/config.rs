//! Provider configuration read from the environment.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `STOCKFETCH_TIMEOUT_MS` | `10000` | Per-request timeout in milliseconds |
//! | `STOCKFETCH_USER_AGENT` | browser-like UA | User agent sent to Yahoo |
//! | `YAHOO_COOKIE` | unset | Pre-captured Yahoo session cookie |

use crate::ValidationError;

pub const TIMEOUT_ENV: &str = "STOCKFETCH_TIMEOUT_MS";
pub const USER_AGENT_ENV: &str = "STOCKFETCH_USER_AGENT";
pub const COOKIE_ENV: &str = "YAHOO_COOKIE";

const DEFAULT_TIMEOUT_MS: u64 = 10_000;
// Yahoo rejects the default reqwest agent on the crumb endpoint.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
(KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub timeout_ms: u64,
    pub user_agent: String,
    pub cookie: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: String::from(DEFAULT_USER_AGENT),
            cookie: None,
        }
    }
}

impl ProviderConfig {
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();

        if let Some(raw) = read(TIMEOUT_ENV) {
            config.timeout_ms = raw
                .parse::<u64>()
                .ok()
                .filter(|timeout| *timeout > 0)
                .ok_or(ValidationError::InvalidConfig {
                    key: TIMEOUT_ENV,
                    value: raw,
                })?;
        }
        if let Some(user_agent) = read(USER_AGENT_ENV) {
            config.user_agent = user_agent;
        }
        config.cookie = read(COOKIE_ENV);

        Ok(config)
    }
}
