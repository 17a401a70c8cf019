//! Connection configuration for the Bastion API.
//!
//! [`BastionConfig`] carries the appliance address, credentials and transport
//! settings. It can be deserialized from provider configuration or assembled
//! from `WALLIX_BASTION_*` environment variables, and is validated with
//! `validator` before a client is built from it.

use crate::{ApiVersion, Error, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;
use url::Url;
use validator::{Validate, ValidationError};

/// Environment variable holding the appliance host or IP address.
pub const ENV_HOST: &str = "WALLIX_BASTION_HOST";
/// Environment variable holding the HTTPS port.
pub const ENV_PORT: &str = "WALLIX_BASTION_PORT";
/// Environment variable holding the API key.
pub const ENV_TOKEN: &str = "WALLIX_BASTION_TOKEN";
/// Environment variable holding the API user.
pub const ENV_USER: &str = "WALLIX_BASTION_USER";
/// Environment variable holding the user password.
pub const ENV_PASSWORD: &str = "WALLIX_BASTION_PASSWORD";
/// Environment variable holding the API version.
pub const ENV_API_VERSION: &str = "WALLIX_BASTION_API_VERSION";

/// Configuration for connecting to a WALLIX Bastion appliance.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_credentials"))]
pub struct BastionConfig {
    /// Appliance host name or IP address
    #[validate(length(min = 1, message = "host must not be empty"))]
    pub host: String,

    /// HTTPS port
    #[validate(range(min = 1))]
    #[serde(default = "default_port")]
    pub port: u16,

    /// API key, sent as `X-Auth-Key`
    #[serde(default)]
    pub token: Option<SecretString>,

    /// API user
    #[serde(default = "default_user")]
    pub user: String,

    /// Password for HTTP basic authentication when no token is set
    #[serde(default)]
    pub password: Option<SecretString>,

    /// API version, e.g. `v3.8`
    #[validate(custom(function = "validate_api_version"))]
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Whether to verify the appliance TLS certificate
    #[serde(default)]
    pub tls_verify: bool,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Maximum number of retry attempts
    #[validate(range(min = 0, max = 10))]
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

const fn default_port() -> u16 {
    443
}

fn default_user() -> String {
    "admin".to_string()
}

fn default_api_version() -> String {
    ApiVersion::DEFAULT.to_string()
}

const fn default_request_timeout_secs() -> u64 {
    30
}

const fn default_max_retries() -> u32 {
    3
}

fn validate_api_version(value: &str) -> std::result::Result<(), ValidationError> {
    ApiVersion::parse_supported(value)
        .map(|_| ())
        .map_err(|_| ValidationError::new("unsupported_api_version"))
}

fn validate_credentials(config: &BastionConfig) -> std::result::Result<(), ValidationError> {
    let has = |secret: &Option<SecretString>| {
        secret
            .as_ref()
            .is_some_and(|s| !s.expose_secret().is_empty())
    };
    if has(&config.token) || has(&config.password) {
        Ok(())
    } else {
        let mut err = ValidationError::new("missing_credentials");
        err.message = Some("one of token or password must be set".into());
        Err(err)
    }
}

impl BastionConfig {
    /// Create a configuration for `host` with default settings and no credentials.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: default_port(),
            token: None,
            user: default_user(),
            password: None,
            api_version: default_api_version(),
            tls_verify: false,
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }

    /// Build a configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or validation fails.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or validation fails.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let host = get(ENV_HOST)
            .ok_or_else(|| Error::ConfigError(format!("{ENV_HOST} is not set")))?;
        let mut config = Self::new(host);

        if let Some(port) = get(ENV_PORT) {
            config.port = port
                .parse()
                .map_err(|_| Error::ConfigError(format!("{ENV_PORT} is not a valid port: {port}")))?;
        }
        if let Some(user) = get(ENV_USER) {
            config.user = user;
        }
        if let Some(version) = get(ENV_API_VERSION) {
            config.api_version = version;
        }
        config.token = get(ENV_TOKEN).map(SecretString::from);
        config.password = get(ENV_PASSWORD).map(SecretString::from);

        config.validated()
    }

    /// Validate the configuration and return it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` describing every failing field.
    pub fn validated(self) -> Result<Self> {
        self.validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;
        Ok(self)
    }

    /// Set the HTTPS port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Authenticate with an API key.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }

    /// Set the API user.
    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    /// Authenticate with a password.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(SecretString::from(password.into()));
        self
    }

    /// Set the API version.
    #[must_use]
    pub fn with_api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = version.to_string();
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Set maximum retry attempts.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parsed API version.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed or unsupported versions.
    pub fn version(&self) -> Result<ApiVersion> {
        ApiVersion::parse_supported(&self.api_version)
    }

    /// Root of the versioned API, `https://<host>:<port>/api/<version>/`.
    ///
    /// # Errors
    ///
    /// Returns an error if the host does not form a valid URL.
    pub fn base_url(&self) -> Result<Url> {
        let version = self.version()?;
        Url::parse(&format!(
            "https://{}:{}/api/{version}/",
            self.host, self.port
        ))
        .map_err(|e| Error::ConfigError(format!("Invalid Bastion address: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = BastionConfig::new("bastion.example.com");
        assert_eq!(config.port, 443);
        assert_eq!(config.user, "admin");
        assert_eq!(config.api_version, "v3.3");
        assert!(!config.tls_verify);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_credentials_required() {
        let err = BastionConfig::new("10.0.0.1").validated().unwrap_err();
        assert!(err.to_string().contains("one of token or password must be set"));

        assert!(BastionConfig::new("10.0.0.1").with_token("k").validated().is_ok());
        assert!(BastionConfig::new("10.0.0.1")
            .with_password("p")
            .validated()
            .is_ok());
    }

    #[test]
    fn test_validation_ranges() {
        let config = BastionConfig::new("10.0.0.1")
            .with_token("k")
            .with_timeout(0);
        assert!(config.validated().is_err());

        let config = BastionConfig::new("10.0.0.1")
            .with_token("k")
            .with_max_retries(11);
        assert!(config.validated().is_err());

        let config = BastionConfig::new("").with_token("k");
        assert!(config.validated().is_err());
    }

    #[test]
    fn test_unsupported_api_version() {
        let mut config = BastionConfig::new("10.0.0.1").with_token("k");
        config.api_version = "v2.0".to_string();
        assert!(config.validated().is_err());
    }

    #[test]
    fn test_base_url() {
        let config = BastionConfig::new("10.0.0.1")
            .with_port(8443)
            .with_api_version(ApiVersion::V3_12);
        assert_eq!(
            config.base_url().unwrap().as_str(),
            "https://10.0.0.1:8443/api/v3.12/"
        );
        // the default port is dropped by the URL normalization
        let config = BastionConfig::new("bastion");
        assert_eq!(config.base_url().unwrap().as_str(), "https://bastion/api/v3.3/");
    }

    #[test]
    fn test_from_lookup() {
        let config = BastionConfig::from_lookup(lookup(&[
            (ENV_HOST, "192.168.1.10"),
            (ENV_PORT, "8443"),
            (ENV_TOKEN, "abcd"),
            (ENV_USER, "api"),
            (ENV_API_VERSION, "v3.8"),
        ]))
        .unwrap();

        assert_eq!(config.host, "192.168.1.10");
        assert_eq!(config.port, 8443);
        assert_eq!(config.user, "api");
        assert_eq!(config.version().unwrap(), ApiVersion::V3_8);
        assert_eq!(config.token.as_ref().map(|t| t.expose_secret().to_string()), Some("abcd".to_string()));
        assert!(config.password.is_none());
    }

    #[test]
    fn test_from_lookup_errors() {
        let err = BastionConfig::from_lookup(lookup(&[(ENV_TOKEN, "abcd")])).unwrap_err();
        assert_eq!(err, Error::ConfigError("WALLIX_BASTION_HOST is not set".to_string()));

        let err = BastionConfig::from_lookup(lookup(&[
            (ENV_HOST, "h"),
            (ENV_PORT, "https"),
            (ENV_TOKEN, "abcd"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: BastionConfig = serde_json::from_value(serde_json::json!({
            "host": "bastion.local",
            "password": "secret"
        }))
        .unwrap();
        assert_eq!(config.port, 443);
        assert_eq!(config.user, "admin");
        assert!(config.validated().is_ok());
    }
}
