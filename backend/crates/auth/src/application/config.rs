//! Application Configuration
//!
//! Token and password-hashing settings, read from the environment:
//!
//! | Variable         | Default                 |
//! |------------------|-------------------------|
//! | `JWT_SECRET`     | `fallback-secret-key`   |
//! | `JWT_EXPIRES_IN` | `7d` (humantime syntax) |
//! | `BCRYPT_COST`    | `12`                    |

use platform::password::DEFAULT_COST;
use platform::token::TokenConfig;
use thiserror::Error;

/// bcrypt accepts costs in this range
const BCRYPT_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

/// Cost used by `development()`; fast enough for local runs and tests
const DEVELOPMENT_COST: u32 = 4;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_EXPIRES_IN is not a valid duration: {0}")]
    InvalidExpiry(#[from] humantime::DurationError),

    #[error("JWT_EXPIRES_IN must be greater than zero")]
    ZeroExpiry,

    #[error("BCRYPT_COST must be an integer between 4 and 31 (got {0:?})")]
    InvalidCost(String),
}

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Signing secret and token lifetime
    pub token: TokenConfig,
    /// bcrypt work factor for new digests
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token: TokenConfig::default(),
            bcrypt_cost: DEFAULT_COST,
        }
    }
}

impl AuthConfig {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`; unset or blank values use defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(secret) = get("JWT_SECRET") {
            config.token = TokenConfig::new(secret);
        }

        if let Some(raw) = get("JWT_EXPIRES_IN") {
            let expires_in = humantime::parse_duration(raw.trim())?;
            if expires_in.is_zero() {
                return Err(ConfigError::ZeroExpiry);
            }
            config.token = config.token.with_expiration(expires_in);
        }

        if let Some(raw) = get("BCRYPT_COST") {
            config.bcrypt_cost = raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|cost| BCRYPT_COST_RANGE.contains(cost))
                .ok_or(ConfigError::InvalidCost(raw))?;
        }

        Ok(config)
    }

    /// Low bcrypt cost with the default secret
    pub fn development() -> Self {
        Self {
            bcrypt_cost: DEVELOPMENT_COST,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AuthConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bcrypt_cost, 12);
        assert!(config.token.uses_insecure_default());
        assert_eq!(config.token.expires_in, Duration::from_secs(7 * 24 * 3600));
    }

    #[test]
    fn test_overrides() {
        let config = AuthConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "s3cret"),
            ("JWT_EXPIRES_IN", "12h"),
            ("BCRYPT_COST", "10"),
        ]))
        .unwrap();

        assert!(!config.token.uses_insecure_default());
        assert_eq!(config.token.expires_in, Duration::from_secs(12 * 3600));
        assert_eq!(config.bcrypt_cost, 10);
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = AuthConfig::from_lookup(lookup(&[("JWT_SECRET", "  ")])).unwrap();
        assert!(config.token.uses_insecure_default());
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            AuthConfig::from_lookup(lookup(&[("JWT_EXPIRES_IN", "seven days")])),
            Err(ConfigError::InvalidExpiry(_))
        ));
        assert!(matches!(
            AuthConfig::from_lookup(lookup(&[("JWT_EXPIRES_IN", "0s")])),
            Err(ConfigError::ZeroExpiry)
        ));
        assert!(matches!(
            AuthConfig::from_lookup(lookup(&[("BCRYPT_COST", "40")])),
            Err(ConfigError::InvalidCost(_))
        ));
    }
}
