//! Asynchronous Bastion client implementation.

use crate::models::Named;
use crate::Result;
use bastion_core::client::{
    ClientConfig, RetryPolicy, ServiceClient, ServiceClientBuilder, BASTION_DEFAULT_TIMEOUT,
};
use bastion_core::config::BastionConfig;
use bastion_core::query::QueryParams;
use bastion_core::{ApiVersion, Error};
use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::time::Duration;
use tracing::debug;
use url::Url;

const USER_AGENT: &str = concat!("terraform-provider-wallix-bastion/", env!("CARGO_PKG_VERSION"));

const SERVICE: &str = "bastion";

/// Builder for [`BastionClient`].
#[derive(Debug, Clone)]
pub struct BastionClientBuilder {
    inner: ServiceClientBuilder,
    api_version: ApiVersion,
}

impl BastionClientBuilder {
    /// Create a builder for the versioned API root, e.g. `https://host/api/v3.8/`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(base_url: impl AsRef<str>, api_version: ApiVersion) -> Result<Self> {
        let builder = ServiceClientBuilder::new(
            SERVICE,
            base_url,
            Duration::from_secs(BASTION_DEFAULT_TIMEOUT),
        )?
        .with_user_agent(USER_AGENT);

        Ok(Self {
            inner: builder,
            api_version,
        })
    }

    /// Create a builder from a validated [`BastionConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if the address or API version is invalid.
    pub fn from_config(config: &BastionConfig) -> Result<Self> {
        let api_version = config.version()?;
        let http = ClientConfig::new()
            .with_timeout(config.timeout())
            .with_retry_policy(RetryPolicy::new().with_max_retries(config.max_retries))
            .with_accept_invalid_certs(!config.tls_verify);

        let mut builder = Self::new(config.base_url()?, api_version)?.with_http_config(http);
        builder = match (&config.token, &config.password) {
            (Some(token), _) if !token.expose_secret().is_empty() => {
                builder.with_token(config.user.clone(), token.expose_secret())
            }
            (_, Some(password)) => {
                builder.with_basic_auth(config.user.clone(), password.expose_secret())
            }
            _ => builder,
        };
        Ok(builder)
    }

    /// Override the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.inner = self.inner.with_retry_policy(retry);
        self
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.inner = self.inner.with_http_config(config);
        self
    }

    /// Configure HTTP basic authentication credentials.
    #[must_use]
    pub fn with_basic_auth(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.inner = self.inner.with_basic_auth(user, password);
        self
    }

    /// Configure `X-Auth-User`/`X-Auth-Key` authentication.
    #[must_use]
    pub fn with_token(mut self, user: impl Into<String>, token: impl Into<String>) -> Self {
        self.inner = self.inner.with_token(user, token);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn build(self) -> Result<BastionClient> {
        let inner = self.inner.build()?;
        Ok(BastionClient {
            inner,
            api_version: self.api_version,
        })
    }
}

/// Asynchronous WALLIX Bastion client.
#[derive(Debug, Clone)]
pub struct BastionClient {
    inner: ServiceClient,
    api_version: ApiVersion,
}

impl BastionClient {
    /// Construct a client from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot produce a client.
    pub fn from_config(config: &BastionConfig) -> Result<Self> {
        BastionClientBuilder::from_config(config)?.build()
    }

    /// Return the versioned API root.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.inner.base_url()
    }

    /// Return the API version this client targets.
    #[must_use]
    pub const fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    /// Typed handle on a collection endpoint such as `devices`.
    #[must_use]
    pub fn collection<T>(&self, path: impl Into<String>) -> Collection<'_, T> {
        Collection {
            client: self,
            path: path.into().trim_end_matches('/').to_string(),
            force: false,
            _item: PhantomData,
        }
    }

    /// GET a JSON document.
    ///
    /// # Errors
    ///
    /// Returns the mapped API error for non-2xx statuses, including `NotFound`.
    pub async fn get_json<R>(&self, path: &str, params: &[(&'static str, String)]) -> Result<R>
    where
        R: DeserializeOwned,
    {
        self.send_json::<(), R>(Method::GET, path, None, params).await
    }

    /// GET a JSON document, mapping 404 to `None`.
    ///
    /// # Errors
    ///
    /// Returns the mapped API error for non-2xx statuses other than 404.
    pub async fn get_optional<R>(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<Option<R>>
    where
        R: DeserializeOwned,
    {
        match self.get_json(path, params).await {
            Ok(value) => Ok(Some(value)),
            Err(Error::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// POST a JSON body, ignoring the response body.
    ///
    /// # Errors
    ///
    /// Returns the mapped API error for non-2xx statuses.
    pub async fn post_json<B>(&self, path: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        self.send(Method::POST, path, Some(body), &[]).await
    }

    /// PUT a JSON body, ignoring the response body.
    ///
    /// # Errors
    ///
    /// Returns the mapped API error for non-2xx statuses.
    pub async fn put_json<B>(
        &self,
        path: &str,
        body: &B,
        params: &[(&'static str, String)],
    ) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        self.send(Method::PUT, path, Some(body), params).await
    }

    /// DELETE a path.
    ///
    /// # Errors
    ///
    /// Returns the mapped API error for non-2xx statuses.
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.send::<()>(Method::DELETE, path, None, &[]).await
    }

    async fn send<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        params: &[(&'static str, String)],
    ) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        self.inner
            .execute_with_retry(
                method,
                path,
                params,
                |request| match body {
                    Some(payload) => request.json(payload),
                    None => request,
                },
                map_status_to_error,
            )
            .await
            .map(|_| ())
    }

    async fn send_json<B, R>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        params: &[(&'static str, String)],
    ) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .inner
            .execute_with_retry(
                method,
                path,
                params,
                |request| match body {
                    Some(payload) => request.json(payload),
                    None => request,
                },
                map_status_to_error,
            )
            .await?;

        let text = response.text().await.map_err(Error::from)?;
        serde_json::from_str(&text)
            .map_err(|e| Error::ParseError(format!("json.Unmarshal failed on {path}: {e}")))
    }
}

/// Typed view of one Bastion collection endpoint.
///
/// Items are addressed as `<path>/<id>`. Searches use the API `q=` filter.
#[derive(Debug)]
pub struct Collection<'a, T> {
    client: &'a BastionClient,
    path: String,
    force: bool,
    _item: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<'_, T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client,
            path: self.path.clone(),
            force: self.force,
            _item: PhantomData,
        }
    }
}

impl<T> Collection<'_, T> {
    /// Send `force=true` with updates.
    #[must_use]
    pub fn with_force(mut self) -> Self {
        self.force = true;
        self
    }

    /// Collection path relative to the API root.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path of a single item.
    #[must_use]
    pub fn item_path(&self, id: &str) -> String {
        format!("{}/{id}", self.path)
    }
}

impl<T> Collection<'_, T>
where
    T: DeserializeOwned,
{
    /// List every item.
    ///
    /// # Errors
    ///
    /// Returns the mapped API error.
    pub async fn list(&self) -> Result<Vec<T>> {
        self.client.get_json(&self.path, &[]).await
    }

    /// List items matching `q=<field>=<value>`.
    ///
    /// # Errors
    ///
    /// Returns the mapped API error.
    pub async fn search(&self, field: &str, value: &str) -> Result<Vec<T>> {
        self.query(QueryParams::search(field, value)).await
    }

    /// List items with arbitrary query parameters.
    ///
    /// # Errors
    ///
    /// Returns the mapped API error.
    pub async fn query(&self, params: QueryParams) -> Result<Vec<T>> {
        self.client.get_json(&self.path, params.as_pairs()).await
    }

    /// Fetch one item, `None` when the API answers 404.
    ///
    /// # Errors
    ///
    /// Returns the mapped API error for other failures.
    pub async fn get(&self, id: &str) -> Result<Option<T>> {
        self.client.get_optional(&self.item_path(id), &[]).await
    }

    /// POST a new item.
    ///
    /// # Errors
    ///
    /// Returns the mapped API error.
    pub async fn create<B>(&self, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        debug!(path = %self.path, "creating item");
        self.client.post_json(&self.path, body).await
    }

    /// PUT an existing item.
    ///
    /// # Errors
    ///
    /// Returns the mapped API error.
    pub async fn update<B>(&self, id: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let params = if self.force {
            QueryParams::force()
        } else {
            QueryParams::new()
        };
        self.client
            .put_json(&self.item_path(id), body, params.as_pairs())
            .await
    }

    /// DELETE an item.
    ///
    /// # Errors
    ///
    /// Returns the mapped API error.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client.delete(&self.item_path(id)).await
    }
}

impl<T> Collection<'_, T>
where
    T: DeserializeOwned + Named,
{
    /// Search by natural name and keep the exact match.
    ///
    /// # Errors
    ///
    /// Returns the mapped API error.
    pub async fn find(&self, name: &str) -> Result<Option<T>> {
        let found = self.search(T::NAME_FIELD, name).await?;
        Ok(found.into_iter().find(|item| item.name() == name))
    }
}

fn map_status_to_error(status: StatusCode, text: String) -> Error {
    match status {
        StatusCode::NOT_FOUND => Error::NotFound(text),
        StatusCode::BAD_REQUEST => Error::BadRequest(text),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Error::InvalidRequest(format!("Bastion authentication failed: {text}"))
        }
        StatusCode::CONFLICT => Error::Conflict(text),
        StatusCode::TOO_MANY_REQUESTS
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => {
            Error::ServiceUnavailable(format!("Bastion temporarily unavailable: {text}"))
        }
        status => Error::ApiError {
            status: status.as_u16(),
            message: text,
        },
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use wiremock::MockServer;

    pub(crate) fn client(server: &MockServer, version: ApiVersion) -> BastionClient {
        BastionClientBuilder::new(format!("{}/api/{version}/", server.uri()), version)
            .unwrap()
            .with_retry_policy(RetryPolicy::no_retry())
            .with_token("admin", "token")
            .build()
            .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::client;
    use super::*;
    use crate::models::Device;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn maps_statuses() {
        assert!(matches!(
            map_status_to_error(StatusCode::NOT_FOUND, String::new()),
            Error::NotFound(_)
        ));
        assert!(matches!(
            map_status_to_error(StatusCode::FORBIDDEN, String::new()),
            Error::InvalidRequest(_)
        ));
        assert_eq!(
            map_status_to_error(StatusCode::INTERNAL_SERVER_ERROR, "boom".into()),
            Error::ApiError {
                status: 500,
                message: "boom".into()
            }
        );
    }

    #[test]
    fn from_config_targets_versioned_root() {
        let config = BastionConfig::new("10.1.2.3")
            .with_token("k")
            .with_api_version(ApiVersion::V3_8);
        let client = BastionClient::from_config(&config).unwrap();
        assert_eq!(client.base_url().as_str(), "https://10.1.2.3/api/v3.8/");
        assert_eq!(client.api_version(), ApiVersion::V3_8);
    }

    #[test]
    fn paths_need_no_item_bound() {
        fn forced<T>(client: &BastionClient) -> Collection<'_, T> {
            client.collection("authdomains/").with_force()
        }

        struct Opaque;
        let config = BastionConfig::new("10.1.2.3").with_token("k");
        let client = BastionClient::from_config(&config).unwrap();
        let domains = forced::<Opaque>(&client);
        assert_eq!(domains.path(), "authdomains");
        assert_eq!(domains.item_path("ad1"), "authdomains/ad1");
    }

    #[tokio::test]
    async fn find_keeps_exact_match_only() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3.3/devices"))
            .and(query_param("q", "device_name=srv"))
            .and(header("X-Auth-User", "admin"))
            .and(header("X-Auth-Key", "token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "1", "device_name": "srv-old", "host": "10.0.0.1"},
                {"id": "2", "device_name": "srv", "host": "10.0.0.2"}
            ])))
            .mount(&server)
            .await;

        let client = client(&server, ApiVersion::V3_3);
        let found = client.devices().find("srv").await.unwrap().unwrap();
        assert_eq!(found.id, "2");
        assert_eq!(found.host, "10.0.0.2");
    }

    #[tokio::test]
    async fn get_maps_not_found_to_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3.3/devices/gone"))
            .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
            .mount(&server)
            .await;

        let client = client(&server, ApiVersion::V3_3);
        assert!(client.devices().get("gone").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_sends_force_flag() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/v3.3/applications/abc"))
            .and(query_param("force", "true"))
            .and(body_json(json!({"description": "x"})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server, ApiVersion::V3_3);
        client
            .collection::<serde_json::Value>("applications/")
            .with_force()
            .update("abc", &json!({"description": "x"}))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn post_and_delete_accept_no_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v3.3/devices"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/v3.3/devices/1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = client(&server, ApiVersion::V3_3);
        let device = Device {
            device_name: "srv".into(),
            host: "10.0.0.1".into(),
            ..Device::default()
        };
        client.devices().create(&device).await.unwrap();
        client.devices().delete("1").await.unwrap();
    }

    #[tokio::test]
    async fn error_body_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v3.3/devices"))
            .respond_with(ResponseTemplate::new(400).set_body_string("{\"error\":\"host\"}"))
            .mount(&server)
            .await;

        let client = client(&server, ApiVersion::V3_3);
        let err = client
            .devices()
            .create(&Device::default())
            .await
            .unwrap_err();
        assert_eq!(err, Error::BadRequest("{\"error\":\"host\"}".into()));
    }

    #[tokio::test]
    async fn invalid_json_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3.3/devices"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = client(&server, ApiVersion::V3_3);
        let err = client.devices().list().await.unwrap_err();
        assert!(matches!(err, Error::ParseError(_)));
    }
}
