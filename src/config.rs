use std::{path::PathBuf, str::FromStr, time::Duration};

use thiserror::Error;

pub const DEFAULT_TAG: &str = "Ed25519Signature2020";

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid value `{value}` for {key}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

/// Settings of a suite run, read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct SuiteConfig {
    pub implementations_dir: PathBuf,
    pub tag: String,
    pub reference_issuer: Option<String>,
    pub only: Option<Vec<String>>,
    pub report_dir: PathBuf,
    pub http_timeout: Duration,
    pub http_retries: usize,
    pub max_concurrency: usize,
    pub fail_on_nonconformance: bool,
    pub log_level: tracing::Level,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            implementations_dir: PathBuf::from("implementations"),
            tag: DEFAULT_TAG.to_string(),
            reference_issuer: None,
            only: None,
            report_dir: PathBuf::from("reports"),
            http_timeout: Duration::from_secs(30),
            http_retries: 2,
            max_concurrency: 8,
            fail_on_nonconformance: false,
            log_level: tracing::Level::INFO,
        }
    }
}

impl SuiteConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// Call `dotenv_flow::dotenv_flow()` beforehand to pick up `.env` files.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`; unset or empty keys keep their default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = SuiteConfig::default();

        Ok(SuiteConfig {
            implementations_dir: get("IMPLEMENTATIONS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.implementations_dir),
            tag: get("SUITE_TAG").unwrap_or(defaults.tag),
            reference_issuer: get("REFERENCE_ISSUER"),
            only: get("IMPLEMENTATIONS_ONLY").map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(String::from)
                    .collect()
            }),
            report_dir: get("REPORT_DIR").map(PathBuf::from).unwrap_or(defaults.report_dir),
            http_timeout: match get("HTTP_TIMEOUT_SECS") {
                Some(v) => Duration::from_secs(parse_positive("HTTP_TIMEOUT_SECS", &v)? as u64),
                None => defaults.http_timeout,
            },
            http_retries: match get("HTTP_RETRIES") {
                Some(v) => parse("HTTP_RETRIES", &v)?,
                None => defaults.http_retries,
            },
            max_concurrency: match get("MAX_CONCURRENCY") {
                Some(v) => parse_positive("MAX_CONCURRENCY", &v)?,
                None => defaults.max_concurrency,
            },
            fail_on_nonconformance: match get("FAIL_ON_NONCONFORMANCE") {
                Some(v) => parse("FAIL_ON_NONCONFORMANCE", &v.to_ascii_lowercase())?,
                None => defaults.fail_on_nonconformance,
            },
            log_level: match get("LOG_LEVEL") {
                Some(v) => parse("LOG_LEVEL", &v)?,
                None => defaults.log_level,
            },
        })
    }
}

fn parse<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError {
        key,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn parse_positive(key: &'static str, value: &str) -> Result<usize, ConfigError> {
    match parse::<usize>(key, value)? {
        0 => Err(ConfigError {
            key,
            value: value.to_string(),
            reason: "must be greater than zero".to_string(),
        }),
        n => Ok(n),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<SuiteConfig, ConfigError> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        SuiteConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(config(&[]).unwrap(), SuiteConfig::default());
        assert_eq!(config(&[("SUITE_TAG", "  ")]).unwrap().tag, DEFAULT_TAG);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("IMPLEMENTATIONS_DIR", "/etc/manifests"),
            ("REFERENCE_ISSUER", "Acme"),
            ("IMPLEMENTATIONS_ONLY", "Acme, Globex,,"),
            ("HTTP_TIMEOUT_SECS", "5"),
            ("HTTP_RETRIES", "0"),
            ("MAX_CONCURRENCY", "2"),
            ("FAIL_ON_NONCONFORMANCE", "TRUE"),
            ("LOG_LEVEL", "debug"),
        ])
        .unwrap();

        assert_eq!(config.implementations_dir, PathBuf::from("/etc/manifests"));
        assert_eq!(config.reference_issuer.as_deref(), Some("Acme"));
        assert_eq!(config.only, Some(vec!["Acme".to_string(), "Globex".to_string()]));
        assert_eq!(config.http_timeout, Duration::from_secs(5));
        assert_eq!(config.http_retries, 0);
        assert_eq!(config.max_concurrency, 2);
        assert!(config.fail_on_nonconformance);
        assert_eq!(config.log_level, tracing::Level::DEBUG);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = config(&[("MAX_CONCURRENCY", "0")]).unwrap_err();
        assert_eq!(err.key, "MAX_CONCURRENCY");

        let err = config(&[("HTTP_RETRIES", "many")]).unwrap_err();
        assert_eq!(err.key, "HTTP_RETRIES");
        assert_eq!(err.value, "many");

        assert!(config(&[("FAIL_ON_NONCONFORMANCE", "yes")]).is_err());
        assert!(config(&[("LOG_LEVEL", "loud")]).is_err());
    }
}
