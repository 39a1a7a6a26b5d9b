//! Service configuration, read from the process environment.
//!
//! `.env` is loaded by [`crate::common::bootstrap::init_env`] before this runs.
//!
//! Required: `DATABASE_URL`, `AUTH_JWT_SECRET`.
//!
//! Optional: `SERVER_HOST` (0.0.0.0), `SERVER_PORT` (3000),
//! `HTTP_TIMEOUT_SECS` (30), `DEFAULT_CURRENCY` (INR), `AUTH_AUDIENCE`,
//! `AUTH_LOGIN_PATH` (/auth/login), the Razorpay key pairs
//! `RAZORPAY_LIVE_KEY_ID`/`RAZORPAY_LIVE_KEY_SECRET` and
//! `RAZORPAY_TEST_KEY_ID`/`RAZORPAY_TEST_KEY_SECRET`, and
//! `PAYPAL_CLIENT_ID`/`PAYPAL_CLIENT_SECRET`/`PAYPAL_ENVIRONMENT`.

use std::{fmt, time::Duration};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(&'static str, String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub http: HttpConfig,
    pub razorpay: Option<RazorpayConfig>,
    pub paypal: Option<PaypalConfig>,
    pub default_currency: String,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"[REDACTED]")
            .finish()
    }
}

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub audience: Option<String>,
    pub login_path: String,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("audience", &self.audience)
            .field("login_path", &self.login_path)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RazorpayMode {
    Live,
    Test,
}

#[derive(Clone)]
pub struct RazorpayConfig {
    pub key_id: String,
    pub key_secret: String,
    pub mode: RazorpayMode,
}

impl fmt::Debug for RazorpayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RazorpayConfig")
            .field("key_id", &self.key_id)
            .field("key_secret", &"[REDACTED]")
            .field("mode", &self.mode)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaypalEnvironment {
    Sandbox,
    Live,
}

impl PaypalEnvironment {
    pub fn base_url(&self) -> &'static str {
        match self {
            PaypalEnvironment::Sandbox => "https://api-m.sandbox.paypal.com",
            PaypalEnvironment::Live => "https://api-m.paypal.com",
        }
    }
}

#[derive(Clone)]
pub struct PaypalConfig {
    pub client_id: String,
    pub client_secret: String,
    pub environment: PaypalEnvironment,
}

impl fmt::Debug for PaypalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaypalConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("environment", &self.environment)
            .finish()
    }
}

/// Loads the configuration from the process environment.
pub fn load() -> Result<AppConfig, ConfigError> {
    from_lookup(|key| std::env::var(key).ok())
}

/// Builds the configuration from an arbitrary key lookup. Blank values count as unset.
pub fn from_lookup<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
    let require = |key: &'static str| get(key).ok_or(ConfigError::MissingEnvVar(key));

    let port = match get("SERVER_PORT") {
        Some(raw) => raw
            .parse::<u16>()
            .map_err(|err| ConfigError::InvalidEnvVar("SERVER_PORT", err.to_string()))?,
        None => 3000,
    };

    let timeout_secs = match get("HTTP_TIMEOUT_SECS") {
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|err| ConfigError::InvalidEnvVar("HTTP_TIMEOUT_SECS", err.to_string()))?,
        None => 30,
    };

    // Live keys win over test keys.
    let razorpay = match (get("RAZORPAY_LIVE_KEY_ID"), get("RAZORPAY_LIVE_KEY_SECRET")) {
        (Some(key_id), Some(key_secret)) => Some(RazorpayConfig {
            key_id,
            key_secret,
            mode: RazorpayMode::Live,
        }),
        _ => match (get("RAZORPAY_TEST_KEY_ID"), get("RAZORPAY_TEST_KEY_SECRET")) {
            (Some(key_id), Some(key_secret)) => Some(RazorpayConfig {
                key_id,
                key_secret,
                mode: RazorpayMode::Test,
            }),
            _ => None,
        },
    };

    let paypal_environment = match get("PAYPAL_ENVIRONMENT").as_deref() {
        None | Some("sandbox") => PaypalEnvironment::Sandbox,
        Some("live") => PaypalEnvironment::Live,
        Some(other) => {
            return Err(ConfigError::InvalidEnvVar(
                "PAYPAL_ENVIRONMENT",
                format!("expected `sandbox` or `live`, got `{other}`"),
            ));
        }
    };

    let paypal = match (get("PAYPAL_CLIENT_ID"), get("PAYPAL_CLIENT_SECRET")) {
        (Some(client_id), Some(client_secret)) => Some(PaypalConfig {
            client_id,
            client_secret,
            environment: paypal_environment,
        }),
        _ => None,
    };

    Ok(AppConfig {
        server: ServerConfig {
            host: get("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
        },
        database: DatabaseConfig {
            url: require("DATABASE_URL")?,
        },
        auth: AuthConfig {
            jwt_secret: require("AUTH_JWT_SECRET")?,
            audience: get("AUTH_AUDIENCE"),
            login_path: get("AUTH_LOGIN_PATH").unwrap_or_else(|| "/auth/login".to_string()),
        },
        http: HttpConfig {
            timeout: Duration::from_secs(timeout_secs),
        },
        razorpay,
        paypal,
        default_currency: get("DEFAULT_CURRENCY").unwrap_or_else(|| "INR".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const BASE: [(&str, &str); 2] = [
        ("DATABASE_URL", "postgres://localhost:5432/marketplace"),
        ("AUTH_JWT_SECRET", "unit-test-secret"),
    ];

    #[test]
    fn applies_defaults() {
        let config = from_lookup(lookup(&BASE)).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.http.timeout, Duration::from_secs(30));
        assert_eq!(config.auth.login_path, "/auth/login");
        assert_eq!(config.default_currency, "INR");
        assert!(config.razorpay.is_none());
        assert!(config.paypal.is_none());
    }

    #[test]
    fn requires_database_url() {
        let err = from_lookup(lookup(&[("AUTH_JWT_SECRET", "s")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar("DATABASE_URL")));
    }

    #[test]
    fn live_razorpay_keys_take_precedence() {
        let mut pairs = BASE.to_vec();
        pairs.extend([
            ("RAZORPAY_TEST_KEY_ID", "rzp_test_1"),
            ("RAZORPAY_TEST_KEY_SECRET", "test-secret"),
            ("RAZORPAY_LIVE_KEY_ID", "rzp_live_1"),
            ("RAZORPAY_LIVE_KEY_SECRET", "live-secret"),
        ]);

        let razorpay = from_lookup(lookup(&pairs)).unwrap().razorpay.unwrap();

        assert_eq!(razorpay.key_id, "rzp_live_1");
        assert_eq!(razorpay.mode, RazorpayMode::Live);
    }

    #[test]
    fn falls_back_to_test_razorpay_keys() {
        let mut pairs = BASE.to_vec();
        pairs.extend([
            ("RAZORPAY_TEST_KEY_ID", "rzp_test_1"),
            ("RAZORPAY_TEST_KEY_SECRET", "test-secret"),
            ("RAZORPAY_LIVE_KEY_ID", ""),
        ]);

        let razorpay = from_lookup(lookup(&pairs)).unwrap().razorpay.unwrap();

        assert_eq!(razorpay.mode, RazorpayMode::Test);
    }

    #[test]
    fn paypal_environment_selects_base_url() {
        let mut pairs = BASE.to_vec();
        pairs.extend([
            ("PAYPAL_CLIENT_ID", "client"),
            ("PAYPAL_CLIENT_SECRET", "secret"),
            ("PAYPAL_ENVIRONMENT", "live"),
        ]);

        let paypal = from_lookup(lookup(&pairs)).unwrap().paypal.unwrap();

        assert_eq!(paypal.environment.base_url(), "https://api-m.paypal.com");
    }

    #[test]
    fn rejects_unknown_paypal_environment() {
        let mut pairs = BASE.to_vec();
        pairs.push(("PAYPAL_ENVIRONMENT", "staging"));

        let err = from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar("PAYPAL_ENVIRONMENT", _)));
    }

    #[test]
    fn secrets_are_redacted_in_debug_output() {
        let mut pairs = BASE.to_vec();
        pairs.extend([
            ("RAZORPAY_TEST_KEY_ID", "rzp_test_1"),
            ("RAZORPAY_TEST_KEY_SECRET", "very-private"),
        ]);

        let rendered = format!("{:?}", from_lookup(lookup(&pairs)).unwrap());

        assert!(!rendered.contains("very-private"));
        assert!(!rendered.contains("unit-test-secret"));
    }
}
