//! Service configuration from environment variables.
//!
//! HOST (default 0.0.0.0), PORT (default 8080), MEDAL_MIN_FORMS_STANDARD (default 3),
//! MEDAL_MIN_DEFAULT (default 4). Unparseable values fall back to the default.

use crate::logic::EligibilityRule;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub eligibility: EligibilityRule,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            eligibility: EligibilityRule::default(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl ServiceConfig {
    /// Read from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read through `lookup`, so tests need not touch the environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = EligibilityRule::default();
        Self {
            host: get("HOST").unwrap_or_else(default_host),
            port: get("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or_else(default_port),
            eligibility: EligibilityRule {
                forms_standard_min: get("MEDAL_MIN_FORMS_STANDARD")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.forms_standard_min),
                default_min: get("MEDAL_MIN_DEFAULT")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.default_min),
            },
        }
    }
}
