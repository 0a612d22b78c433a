//! Application configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SUPABASE_URL` - Primary Supabase project URL (fallback: `NEXT_PUBLIC_SUPABASE_URL`)
//! - `SUPABASE_SERVICE_ROLE_KEY` - Privileged service-role key (server-side only)
//! - `SUPABASE_ANON_KEY` - Public anon key (fallback: `NEXT_PUBLIC_SUPABASE_ANON_KEY`)
//! - `PERFORMANCE_SUPABASE_URL` - Performance project URL (fallback: `NEXT_PUBLIC_PERFORMANCE_SUPABASE_URL`)
//! - `PERFORMANCE_SUPABASE_ANON_KEY` - Performance project anon key (fallback: `NEXT_PUBLIC_PERFORMANCE_SUPABASE_ANON_KEY`)
//! - `RESEND_API_KEY` - Resend API key for outbound email
//! - `EMAIL_FROM` - Sender address for outbound email
//! - `BASE_URL` - Public base URL (reset links, secure-cookie detection)
//!
//! ## Optional
//! - `HOST` - Bind address (default: 127.0.0.1)
//! - `PORT` - Listen port (default: 3000)
//! - `STOCK_REPORT_TO` - Default recipient for stock report emails
//! - `RESEND_BASE_URL` - Resend API endpoint (default: <https://api.resend.com>)
//! - `IMAGE_ALLOWLIST` - Comma-separated `host/path-prefix` pairs for the image proxy
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Sentry traces sample rate (default: 1.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

use crate::images::ImageAllowlist;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Default Resend API endpoint.
const DEFAULT_RESEND_BASE_URL: &str = "https://api.resend.com";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL (reset links, secure-cookie detection)
    pub base_url: String,
    /// Primary Supabase project
    pub supabase: SupabaseConfig,
    /// Secondary Supabase project for the analytics/performance dataset
    pub performance: PerformanceConfig,
    /// Resend email delivery configuration
    pub resend: ResendConfig,
    /// Allowed remote hosts for the image proxy
    pub image_allowlist: ImageAllowlist,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Primary Supabase project configuration.
///
/// Implements `Debug` manually to redact the service-role key. The anon key
/// is browser-public by definition and stays visible.
#[derive(Clone)]
pub struct SupabaseConfig {
    /// Project URL (e.g., <https://abcdefgh.supabase.co>)
    pub url: String,
    /// Service-role key. Bypasses row-level security; server-side only.
    pub service_role_key: SecretString,
    /// Anon key, safe to ship to the browser
    pub anon_key: String,
}

impl std::fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("service_role_key", &"[REDACTED]")
            .field("anon_key", &self.anon_key)
            .finish()
    }
}

/// Secondary Supabase project holding the analytics/performance dataset.
///
/// Only the anon key exists for this project; nothing privileged runs
/// against it.
#[derive(Debug, Clone)]
pub struct PerformanceConfig {
    /// Project URL
    pub url: String,
    /// Anon key, safe to ship to the browser
    pub anon_key: String,
}

/// Resend email delivery configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct ResendConfig {
    /// Resend API endpoint
    pub base_url: String,
    /// Resend API key
    pub api_key: SecretString,
    /// Email sender address (From header)
    pub from_address: String,
    /// Default recipient for stock report emails
    pub report_to: Option<String>,
}

impl std::fmt::Debug for ResendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResendConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("from_address", &self.from_address)
            .field("report_to", &self.report_to)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORT".to_string(), e.to_string()))?;
        let base_url = get_required_env("BASE_URL")?;

        let supabase = SupabaseConfig::from_env()?;
        let performance = PerformanceConfig::from_env()?;
        let resend = ResendConfig::from_env()?;

        let image_allowlist =
            ImageAllowlist::from_env_value(get_optional_env("IMAGE_ALLOWLIST"), &supabase.url)
                .map_err(|e| {
                    ConfigError::InvalidEnvVar("IMAGE_ALLOWLIST".to_string(), e.to_string())
                })?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            host,
            port,
            base_url,
            supabase,
            performance,
            resend,
            image_allowlist,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl SupabaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: get_env_with_fallback("SUPABASE_URL", "NEXT_PUBLIC_SUPABASE_URL")?,
            service_role_key: get_validated_secret("SUPABASE_SERVICE_ROLE_KEY")?,
            // Deliberately not strength-validated: the anon key is a
            // browser-public value, not a secret.
            anon_key: get_env_with_fallback("SUPABASE_ANON_KEY", "NEXT_PUBLIC_SUPABASE_ANON_KEY")?,
        })
    }
}

impl PerformanceConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: get_env_with_fallback(
                "PERFORMANCE_SUPABASE_URL",
                "NEXT_PUBLIC_PERFORMANCE_SUPABASE_URL",
            )?,
            anon_key: get_env_with_fallback(
                "PERFORMANCE_SUPABASE_ANON_KEY",
                "NEXT_PUBLIC_PERFORMANCE_SUPABASE_ANON_KEY",
            )?,
        })
    }
}

impl ResendConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: get_env_or_default("RESEND_BASE_URL", DEFAULT_RESEND_BASE_URL),
            api_key: get_validated_secret("RESEND_API_KEY")?,
            from_address: get_required_env("EMAIL_FROM")?,
            report_to: get_optional_env("STOCK_REPORT_TO"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a legacy fallback name.
///
/// Older deployments exported the `NEXT_PUBLIC_*` names; the clean name
/// wins when both are set.
fn get_env_with_fallback(primary_key: &str, fallback_key: &str) -> Result<String, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(value);
    }
    if let Ok(value) = std::env::var(fallback_key) {
        return Ok(value);
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real secrets like API keys have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        // All same character = 0 entropy
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        // "ab" has entropy of 1 bit per char (50% a, 50% b)
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_shannon_entropy_high() {
        // Random-looking string should have high entropy
        let entropy = shannon_entropy("aB3$xY9!mK2@nL5#");
        assert!(entropy > 3.3);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-api-key-here", "TEST_VAR");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_secret_strength_changeme() {
        let result = validate_secret_strength("changeme123", "TEST_VAR");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        // High-entropy random string
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    #[allow(unsafe_code)]
    fn test_from_env_fails_fast_on_missing_required_vars() {
        // The only test in this crate that touches the process environment,
        // so clearing these names cannot race with other tests.
        for key in [
            "SUPABASE_URL",
            "NEXT_PUBLIC_SUPABASE_URL",
            "SUPABASE_SERVICE_ROLE_KEY",
            "SUPABASE_ANON_KEY",
            "NEXT_PUBLIC_SUPABASE_ANON_KEY",
            "PERFORMANCE_SUPABASE_URL",
            "NEXT_PUBLIC_PERFORMANCE_SUPABASE_URL",
            "PERFORMANCE_SUPABASE_ANON_KEY",
            "NEXT_PUBLIC_PERFORMANCE_SUPABASE_ANON_KEY",
            "RESEND_API_KEY",
            "EMAIL_FROM",
            "BASE_URL",
        ] {
            unsafe { std::env::remove_var(key) };
        }

        let err = AppConfig::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(_)));
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            supabase: SupabaseConfig {
                url: "https://abcdefgh.supabase.co".to_string(),
                service_role_key: SecretString::from("service-role"),
                anon_key: "anon".to_string(),
            },
            performance: PerformanceConfig {
                url: "https://perf.supabase.co".to_string(),
                anon_key: "perf-anon".to_string(),
            },
            resend: ResendConfig {
                base_url: DEFAULT_RESEND_BASE_URL.to_string(),
                api_key: SecretString::from("re_key"),
                from_address: "noreply@aykasosyal.com".to_string(),
                report_to: None,
            },
            image_allowlist: ImageAllowlist::defaults_for("https://abcdefgh.supabase.co").unwrap(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_supabase_config_debug_redacts_service_key() {
        let config = SupabaseConfig {
            url: "https://abcdefgh.supabase.co".to_string(),
            service_role_key: SecretString::from("super_secret_service_role_key"),
            anon_key: "public_anon_key_value".to_string(),
        };

        let debug_output = format!("{config:?}");

        // Public fields should be visible
        assert!(debug_output.contains("abcdefgh.supabase.co"));
        assert!(debug_output.contains("public_anon_key_value"));

        // Secret fields should be redacted
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_service_role_key"));
    }

    #[test]
    fn test_resend_config_debug_redacts_api_key() {
        let config = ResendConfig {
            base_url: DEFAULT_RESEND_BASE_URL.to_string(),
            api_key: SecretString::from("re_super_secret_key"),
            from_address: "noreply@aykasosyal.com".to_string(),
            report_to: Some("ops@aykasosyal.com".to_string()),
        };

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("noreply@aykasosyal.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("re_super_secret_key"));
    }
}
