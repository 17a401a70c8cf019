//! HTTP client utilities, authentication and retry logic.
//!
//! [`ServiceClient`] is the transport shared by the typed Bastion client. It owns the
//! `reqwest` client, resolves request paths against the versioned API root, attaches
//! Bastion authentication headers and retries idempotent requests with exponential
//! backoff.

use crate::{Error, Result};
use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder, Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

/// Default timeout for Bastion API requests (seconds)
pub const BASTION_DEFAULT_TIMEOUT: u64 = 30;

/// Default TCP connect timeout (seconds)
pub const DEFAULT_CONNECT_TIMEOUT: u64 = 10;

// Connection pool settings

/// Default idle timeout for connection pools
pub const DEFAULT_POOL_IDLE_TIMEOUT: u64 = 90;

/// Default maximum idle connections per host
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

// Retry settings

/// Default maximum number of retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default initial retry delay in milliseconds
pub const DEFAULT_RETRY_DELAY_MS: u64 = 500;

/// Default maximum retry delay in milliseconds (for exponential backoff)
pub const DEFAULT_RETRY_MAX_DELAY_MS: u64 = 5000;

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Retry policy with exponential backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts
    pub max_retries: u32,

    /// Initial delay before first retry
    pub initial_delay: Duration,

    /// Maximum delay between retries (cap for exponential backoff)
    pub max_delay: Duration,

    /// Backoff multiplier
    pub backoff_multiplier: u32,
}

impl RetryPolicy {
    /// Create a new retry policy with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_RETRY_MAX_DELAY_MS),
            backoff_multiplier: 2,
        }
    }

    /// Create a retry policy with no retries.
    #[must_use]
    pub const fn no_retry() -> Self {
        Self {
            max_retries: 0,
            initial_delay: Duration::from_millis(0),
            max_delay: Duration::from_millis(0),
            backoff_multiplier: 1,
        }
    }

    /// Set the maximum number of retries.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the initial delay.
    #[must_use]
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the maximum delay.
    #[must_use]
    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Set the backoff multiplier.
    #[must_use]
    pub const fn with_backoff_multiplier(mut self, multiplier: u32) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Calculate delay for a given attempt number.
    ///
    /// delay = min(initial_delay * multiplier^(attempt - 1), max_delay)
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::from_secs(0);
        }

        let multiplier = self.backoff_multiplier.saturating_pow(attempt - 1);
        let initial_ms = u64::try_from(self.initial_delay.as_millis()).unwrap_or(u64::MAX);
        let delay = Duration::from_millis(initial_ms.saturating_mul(u64::from(multiplier)));

        std::cmp::min(delay, self.max_delay)
    }

    /// Check if retries are enabled.
    #[must_use]
    pub const fn has_retries(&self) -> bool {
        self.max_retries > 0
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout
    pub timeout: Duration,

    /// Retry policy
    pub retry_policy: RetryPolicy,

    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Enable request logging
    pub enable_logging: bool,

    /// Enable response compression
    pub enable_compression: bool,

    /// Accept self-signed or otherwise invalid TLS certificates
    pub accept_invalid_certs: bool,
}

impl ClientConfig {
    /// Create a new client configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: Duration::from_secs(BASTION_DEFAULT_TIMEOUT),
            retry_policy: RetryPolicy::new(),
            pool_idle_timeout: Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            enable_logging: true,
            enable_compression: true,
            accept_invalid_certs: false,
        }
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set retry policy.
    #[must_use]
    pub const fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Disable retries.
    #[must_use]
    pub const fn without_retries(mut self) -> Self {
        self.retry_policy = RetryPolicy::no_retry();
        self
    }

    /// Set connection pool idle timeout.
    #[must_use]
    pub const fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Set maximum idle connections per host.
    #[must_use]
    pub const fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Enable or disable logging.
    #[must_use]
    pub const fn with_logging(mut self, enabled: bool) -> Self {
        self.enable_logging = enabled;
        self
    }

    /// Enable or disable compression.
    #[must_use]
    pub const fn with_compression(mut self, enabled: bool) -> Self {
        self.enable_compression = enabled;
        self
    }

    /// Accept invalid TLS certificates.
    #[must_use]
    pub const fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Credentials attached to every Bastion request.
#[derive(Debug, Clone, Default)]
pub enum Credentials {
    /// No authentication headers.
    #[default]
    Anonymous,
    /// API key sent as `X-Auth-Key` together with `X-Auth-User`.
    ApiKey {
        /// Bastion user owning the key
        user: String,
        /// API key
        key: SecretString,
    },
    /// HTTP basic authentication.
    Basic {
        /// Bastion user
        user: String,
        /// Password
        password: SecretString,
    },
}

impl Credentials {
    fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::Anonymous => request,
            Self::ApiKey { user, key } => request
                .header("X-Auth-User", user)
                .header("X-Auth-Key", key.expose_secret()),
            Self::Basic { user, password } => {
                request.basic_auth(user, Some(password.expose_secret()))
            }
        }
    }
}

/// Builder for [`ServiceClient`].
#[derive(Debug, Clone)]
pub struct ServiceClientBuilder {
    service: &'static str,
    base_url: Url,
    http_config: ClientConfig,
    user_agent: Option<String>,
    credentials: Credentials,
}

impl ServiceClientBuilder {
    /// Create a builder for `service` rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute URL.
    pub fn new(service: &'static str, base_url: impl AsRef<str>, timeout: Duration) -> Result<Self> {
        let mut base_url = Url::parse(base_url.as_ref())?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidEndpoint(format!(
                "{service} base URL `{base_url}` cannot be a base"
            )));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            service,
            base_url,
            http_config: ClientConfig::new().with_timeout(timeout),
            user_agent: None,
            credentials: Credentials::Anonymous,
        })
    }

    /// Set the User-Agent header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Override the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.http_config.retry_policy = retry;
        self
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Configure HTTP basic authentication credentials.
    #[must_use]
    pub fn with_basic_auth(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Credentials::Basic {
            user: user.into(),
            password: SecretString::from(password.into()),
        };
        self
    }

    /// Configure `X-Auth-User`/`X-Auth-Key` API key authentication.
    #[must_use]
    pub fn with_token(mut self, user: impl Into<String>, token: impl Into<String>) -> Self {
        self.credentials = Credentials::ApiKey {
            user: user.into(),
            key: SecretString::from(token.into()),
        };
        self
    }

    /// Replace the credentials wholesale.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn build(self) -> Result<ServiceClient> {
        let config = self.http_config;
        let mut builder = ClientBuilder::new()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT))
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .gzip(config.enable_compression);

        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }

        if config.accept_invalid_certs {
            warn!(service = self.service, "TLS verification disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder.build().map_err(|err| {
            Error::ConfigError(format!(
                "Failed to build {} HTTP client: {err}",
                self.service
            ))
        })?;

        Ok(ServiceClient {
            service: self.service,
            http,
            base_url: self.base_url,
            credentials: self.credentials,
            retry_policy: config.retry_policy,
            enable_logging: config.enable_logging,
        })
    }
}

/// Shared asynchronous HTTP transport.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    service: &'static str,
    http: Client,
    base_url: Url,
    credentials: Credentials,
    retry_policy: RetryPolicy,
    enable_logging: bool,
}

impl ServiceClient {
    /// Return the base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Return the service name used in logs and errors.
    #[must_use]
    pub const fn service(&self) -> &'static str {
        self.service
    }

    /// Resolve `path` against the base URL.
    ///
    /// Relative paths land under the versioned API root; paths starting
    /// with `/` are resolved from the host root.
    ///
    /// # Errors
    ///
    /// Returns an error if the joined URL is invalid.
    pub fn url_for(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(|err| {
            Error::InvalidEndpoint(format!("Invalid {} path `{path}`: {err}", self.service))
        })
    }

    /// Send a request, retrying transient failures of idempotent methods.
    ///
    /// `customize` is applied to every attempt (headers, body). Non-2xx responses
    /// are turned into errors with `map_error`.
    ///
    /// # Errors
    ///
    /// Returns the mapped error for a non-success status, or the transport error
    /// once retries are exhausted.
    pub async fn execute_with_retry<F, E>(
        &self,
        method: Method,
        path: &str,
        params: &[(&'static str, String)],
        customize: F,
        map_error: E,
    ) -> Result<Response>
    where
        F: Fn(RequestBuilder) -> RequestBuilder,
        E: Fn(StatusCode, String) -> Error,
    {
        let url = self.url_for(path)?;
        let retryable_method = method.is_idempotent();
        let mut attempt = 0;

        loop {
            let mut request = self
                .http
                .request(method.clone(), url.clone())
                .header(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))
                .header(ACCEPT, HeaderValue::from_static("application/json"));
            if !params.is_empty() {
                request = request.query(params);
            }
            request = customize(self.credentials.apply(request));

            if self.enable_logging {
                info!(service = self.service, %method, path = %path, ?params, attempt, "Sending request");
            }

            let error = match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }

                    let text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    let error = map_error(status, text);
                    if !is_retryable_status(status) {
                        return Err(error);
                    }
                    error
                }
                Err(err) => {
                    let error = Error::from(err);
                    if !error.is_transient() {
                        return Err(error);
                    }
                    error
                }
            };

            attempt += 1;
            if !retryable_method || attempt > self.retry_policy.max_retries {
                return Err(error);
            }

            let delay = self.retry_policy.delay_for_attempt(attempt);
            debug!(service = self.service, ?delay, attempt, "Retrying request");
            if delay > Duration::from_millis(0) {
                sleep(delay).await;
            }
        }
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn map_status(status: StatusCode, text: String) -> Error {
        match status {
            StatusCode::NOT_FOUND => Error::NotFound(text),
            s if s.is_server_error() => Error::ServiceUnavailable(text),
            s => Error::ApiError {
                status: s.as_u16(),
                message: text,
            },
        }
    }

    fn fast_retry() -> RetryPolicy {
        RetryPolicy::new()
            .with_max_retries(2)
            .with_initial_delay(Duration::from_millis(1))
    }

    async fn client(server: &MockServer) -> ServiceClient {
        ServiceClientBuilder::new(
            "bastion",
            format!("{}/api/v3.3", server.uri()),
            Duration::from_secs(5),
        )
        .unwrap()
        .with_retry_policy(fast_retry())
        .with_token("admin", "s3cr3t")
        .build()
        .unwrap()
    }

    #[test]
    fn test_retry_policy_new() {
        let policy = RetryPolicy::new();
        assert_eq!(policy.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(policy.initial_delay, Duration::from_millis(DEFAULT_RETRY_DELAY_MS));
        assert_eq!(policy.max_delay, Duration::from_millis(DEFAULT_RETRY_MAX_DELAY_MS));
        assert!(policy.has_retries());
        assert!(!RetryPolicy::no_retry().has_retries());
    }

    #[test]
    fn test_retry_policy_delay_calculation() {
        let policy = RetryPolicy::new();

        assert_eq!(policy.delay_for_attempt(0), Duration::from_secs(0));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(500));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(1000));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(2000));
        // capped at max_delay
        assert_eq!(policy.delay_for_attempt(5), Duration::from_millis(5000));
        assert_eq!(policy.delay_for_attempt(40), Duration::from_millis(5000));
    }

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::new()
            .with_timeout(Duration::from_secs(60))
            .without_retries()
            .with_pool_max_idle(20)
            .with_accept_invalid_certs(true)
            .with_logging(false);

        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.retry_policy.max_retries, 0);
        assert_eq!(config.pool_max_idle_per_host, 20);
        assert!(config.accept_invalid_certs);
        assert!(!config.enable_logging);
        assert!(!ClientConfig::default().accept_invalid_certs);
    }

    #[test]
    fn test_builder_normalizes_trailing_slash() {
        let builder =
            ServiceClientBuilder::new("bastion", "https://10.0.0.1:443/api/v3.8", Duration::from_secs(1))
                .unwrap();
        let client = builder.build().unwrap();
        assert_eq!(client.base_url().as_str(), "https://10.0.0.1/api/v3.8/");
        assert_eq!(
            client.url_for("devices/abc").unwrap().as_str(),
            "https://10.0.0.1/api/v3.8/devices/abc"
        );
        assert_eq!(
            client.url_for("/api/version").unwrap().as_str(),
            "https://10.0.0.1/api/version"
        );
    }

    #[test]
    fn test_builder_rejects_relative_url() {
        let err = ServiceClientBuilder::new("bastion", "api/v3.3", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, Error::InvalidEndpoint(_)));
    }

    #[tokio::test]
    async fn sends_api_key_headers_and_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3.3/devices"))
            .and(query_param("q", "device_name=srv1"))
            .and(header("X-Auth-User", "admin"))
            .and(header("X-Auth-Key", "s3cr3t"))
            .and(header("Content-Type", "application/json; charset=utf-8"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server).await;
        let response = client
            .execute_with_retry(
                Method::GET,
                "devices",
                &[("q", "device_name=srv1".to_string())],
                |request| request,
                map_status,
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn sends_basic_auth_without_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3.3/users/admin"))
            .and(header("Authorization", "Basic YWRtaW46cGFzcw=="))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let client = ServiceClientBuilder::new(
            "bastion",
            format!("{}/api/v3.3/", server.uri()),
            Duration::from_secs(5),
        )
        .unwrap()
        .with_basic_auth("admin", "pass")
        .build()
        .unwrap();

        client
            .execute_with_retry(Method::GET, "users/admin", &[], |r| r, map_status)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn retries_idempotent_request_on_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3.3/devices"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v3.3/devices"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .mount(&server)
            .await;

        let client = client(&server).await;
        let response = client
            .execute_with_retry(Method::GET, "devices", &[], |r| r, map_status)
            .await
            .unwrap();
        assert_eq!(response.text().await.unwrap(), "[]");
    }

    #[tokio::test]
    async fn does_not_retry_post() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v3.3/devices"))
            .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server).await;
        let err = client
            .execute_with_retry(Method::POST, "devices", &[], |r| r, map_status)
            .await
            .unwrap_err();
        assert_eq!(err, Error::ServiceUnavailable("busy".to_string()));
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3.3/devices/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such device"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server).await;
        let err = client
            .execute_with_retry(Method::GET, "devices/missing", &[], |r| r, map_status)
            .await
            .unwrap_err();
        assert_eq!(err, Error::NotFound("no such device".to_string()));
    }
}
