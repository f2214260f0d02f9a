//! API server configuration.
//!
//! Built once at startup and handed to constructors; nothing else in the
//! workspace reads the process environment.

use thiserror::Error;

use planboard_core::auth::password::{DEFAULT_BCRYPT_COST, MAX_BCRYPT_COST, MIN_BCRYPT_COST};

/// Local-development cookie secret. Refused in production.
pub const DEV_SESSION_SECRET: &str = "planboard-dev-session-secret-change-in-production";

/// Deployment environment, from `ENV`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// `production` (any case) selects production; anything else is development.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

/// Configuration errors that abort startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SESSION_SECRET must be set to a non-default value when ENV=production")]
    InsecureSessionSecret,

    #[error("invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:8080").
    pub bind_addr: String,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Secret used to sign the session cookie.
    pub session_secret: String,
    pub environment: Environment,
    /// bcrypt work factor for new password hashes.
    pub bcrypt_cost: u32,
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable         | Default                               |
    /// |------------------|---------------------------------------|
    /// | `BIND_ADDR`      | `127.0.0.1:8080`                      |
    /// | `DATABASE_URL`   | `postgres://localhost:5432/planboard` |
    /// | `SESSION_SECRET` | dev fallback, refused in production   |
    /// | `ENV`            | `development`                         |
    /// | `BCRYPT_COST`    | `14`                                  |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Self::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENV")
            .map(|v| Environment::parse(&v))
            .unwrap_or_default();

        let session_secret = match lookup("SESSION_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) if environment.is_production() && secret == DEV_SESSION_SECRET => {
                return Err(ConfigError::InsecureSessionSecret);
            }
            Some(secret) => secret,
            None if environment.is_production() => {
                return Err(ConfigError::InsecureSessionSecret);
            }
            None => {
                tracing::warn!("SESSION_SECRET not set, using development fallback");
                DEV_SESSION_SECRET.to_string()
            }
        };

        let bcrypt_cost = match lookup("BCRYPT_COST") {
            Some(raw) => raw.trim().parse::<u32>().map_err(|e| ConfigError::Invalid {
                name: "BCRYPT_COST",
                reason: e.to_string(),
            })?,
            None => DEFAULT_BCRYPT_COST,
        };
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                name: "BCRYPT_COST",
                reason: format!("must be between {MIN_BCRYPT_COST} and {MAX_BCRYPT_COST}"),
            });
        }

        Ok(Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:8080".into()),
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "postgres://localhost:5432/planboard".into()),
            session_secret,
            environment,
            bcrypt_cost,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_in_development() {
        let cfg = ApiConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.environment, Environment::Development);
        assert_eq!(cfg.session_secret, DEV_SESSION_SECRET);
        assert_eq!(cfg.bcrypt_cost, DEFAULT_BCRYPT_COST);
        assert_eq!(cfg.bind_addr, "127.0.0.1:8080");
    }

    #[test]
    fn production_requires_explicit_secret() {
        let missing = ApiConfig::from_lookup(lookup(&[("ENV", "production")]));
        assert!(matches!(missing, Err(ConfigError::InsecureSessionSecret)));

        let empty = ApiConfig::from_lookup(lookup(&[("ENV", "production"), ("SESSION_SECRET", "")]));
        assert!(matches!(empty, Err(ConfigError::InsecureSessionSecret)));

        let fallback = ApiConfig::from_lookup(lookup(&[
            ("ENV", "Production"),
            ("SESSION_SECRET", DEV_SESSION_SECRET),
        ]));
        assert!(matches!(fallback, Err(ConfigError::InsecureSessionSecret)));
    }

    #[test]
    fn production_with_secret() {
        let cfg = ApiConfig::from_lookup(lookup(&[
            ("ENV", "production"),
            ("SESSION_SECRET", "a-real-secret"),
        ]))
        .unwrap();
        assert!(cfg.environment.is_production());
        assert_eq!(cfg.session_secret, "a-real-secret");
    }

    #[test]
    fn bad_bcrypt_cost() {
        for raw in ["fast", "99", "3", "32", "-1"] {
            let err = ApiConfig::from_lookup(lookup(&[("BCRYPT_COST", raw)])).unwrap_err();
            assert!(
                matches!(err, ConfigError::Invalid { name: "BCRYPT_COST", .. }),
                "accepted BCRYPT_COST={raw}"
            );
        }
    }

    #[test]
    fn bcrypt_cost_bounds_are_inclusive() {
        for raw in ["4", "31"] {
            let cfg = ApiConfig::from_lookup(lookup(&[("BCRYPT_COST", raw)])).unwrap();
            assert_eq!(cfg.bcrypt_cost.to_string(), raw);
        }
    }

    #[test]
    fn environment_parse() {
        assert_eq!(Environment::parse("PRODUCTION"), Environment::Production);
        assert_eq!(Environment::parse("staging"), Environment::Development);
        assert_eq!(Environment::parse(""), Environment::Development);
    }
}
