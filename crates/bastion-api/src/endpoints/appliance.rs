use crate::client::BastionClient;
use crate::models::{
    ConfigOptions, EncryptionChange, EncryptionStatus, LocalPasswordPolicy, VersionInfo,
    X509Config,
};
use crate::Result;
use bastion_core::query::QueryParams;

const X509_PATH: &str = "config/x509";
const ENCRYPTION_PATH: &str = "encryption";
// Outside the versioned prefix.
const VERSION_PATH: &str = "/api/version";

impl BastionClient {
    /// Read the X509 configuration; empty keys mean it is not configured.
    ///
    /// # Errors
    ///
    /// Returns the mapped API error for failures other than 404.
    pub async fn x509_config(&self) -> Result<Option<X509Config>> {
        let config: Option<X509Config> = self.get_optional(X509_PATH, &[]).await?;
        Ok(config.filter(|c| !c.is_empty()))
    }

    /// Upload a new X509 configuration.
    ///
    /// # Errors
    ///
    /// Returns the mapped API error.
    pub async fn create_x509_config(&self, config: &X509Config) -> Result<()> {
        self.post_json(X509_PATH, config).await
    }

    /// Replace the X509 configuration.
    ///
    /// # Errors
    ///
    /// Returns the mapped API error.
    pub async fn update_x509_config(&self, config: &X509Config) -> Result<()> {
        self.put_json(X509_PATH, config, &[]).await
    }

    /// Reset the X509 configuration.
    ///
    /// # Errors
    ///
    /// Returns the mapped API error.
    pub async fn delete_x509_config(&self) -> Result<()> {
        self.delete(X509_PATH).await
    }

    /// Read the encryption state of the appliance.
    ///
    /// # Errors
    ///
    /// Returns the mapped API error.
    pub async fn encryption_status(&self) -> Result<EncryptionStatus> {
        self.get_json(ENCRYPTION_PATH, &[]).await
    }

    /// Initialize encryption or change its passphrase.
    ///
    /// # Errors
    ///
    /// Returns the mapped API error.
    pub async fn set_encryption(&self, change: &EncryptionChange) -> Result<()> {
        self.put_json(ENCRYPTION_PATH, change, &[]).await
    }

    /// Read a configuration, optionally narrowed to some options.
    ///
    /// # Errors
    ///
    /// Returns the mapped API error for failures other than 404.
    pub async fn config_options<I, S>(
        &self,
        config_id: &str,
        options: I,
    ) -> Result<Option<ConfigOptions>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut params = QueryParams::new();
        params.push_list("options", options);
        self.get_optional(&format!("configoptions/{config_id}"), params.as_pairs())
            .await
    }

    /// Find a local password policy by name.
    ///
    /// # Errors
    ///
    /// Returns the mapped API error.
    pub async fn local_password_policy(&self, name: &str) -> Result<Option<LocalPasswordPolicy>> {
        let found: Vec<LocalPasswordPolicy> = self
            .collection("localpasswordpolicies")
            .search("password_policy_name", name)
            .await?;
        Ok(found.into_iter().next())
    }

    /// Read the appliance and API versions.
    ///
    /// # Errors
    ///
    /// Returns the mapped API error.
    pub async fn version(&self) -> Result<VersionInfo> {
        self.get_json(VERSION_PATH, &[]).await
    }
}

#[cfg(test)]
mod tests {
    use crate::client::test_support::client;
    use crate::models::{EncryptionChange, X509Config};
    use bastion_core::ApiVersion;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn version_is_read_outside_versioned_prefix() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/version"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "version": "3.12",
                "version_decimal": 3.12,
                "wab_version": "10.0",
                "wab_version_decimal": 10.0,
                "wab_version_hotfix": "10.0.3",
                "wab_version_hotfix_decimal": 10.03,
                "wab_complete_version": "10.0.3.0"
            })))
            .mount(&server)
            .await;

        let client = client(&server, ApiVersion::V3_12);
        let info = client.version().await.unwrap();
        assert_eq!(info.wab_complete_version, "10.0.3.0");
        assert!((info.version_decimal - 3.12).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn empty_x509_reads_as_absent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3.8/config/x509"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ca_certificate": "",
                "server_public_key": "",
                "server_private_key": ""
            })))
            .mount(&server)
            .await;

        let client = client(&server, ApiVersion::V3_8);
        assert_eq!(client.x509_config().await.unwrap(), None::<X509Config>);
    }

    #[tokio::test]
    async fn encryption_put_sends_passphrases() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/v3.8/encryption"))
            .and(body_json(json!({"passphrase": "old", "new_passphrase": "new"})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server, ApiVersion::V3_8);
        client
            .set_encryption(&EncryptionChange {
                passphrase: "old".into(),
                new_passphrase: "new".into(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn config_options_are_comma_joined() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3.8/configoptions/wabengine"))
            .and(query_param("options", "a,b"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "config_id": "wabengine",
                "config_name": "wabengine",
                "name": "Engine",
                "date": "2024-01-01 00:00:00",
                "options": [{"name": "a", "value": 1}]
            })))
            .mount(&server)
            .await;

        let client = client(&server, ApiVersion::V3_8);
        let options = client
            .config_options("wabengine", ["a", "b"])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(options.options.len(), 1);
        assert_eq!(options.name, "Engine");
    }

    #[tokio::test]
    async fn password_policy_takes_first_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3.3/localpasswordpolicies"))
            .and(query_param("q", "password_policy_name=default"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "p1", "password_policy_name": "default", "password_min_length": 12}
            ])))
            .mount(&server)
            .await;

        let client = client(&server, ApiVersion::V3_3);
        let policy = client.local_password_policy("default").await.unwrap().unwrap();
        assert_eq!(policy.password_min_length, 12);
        assert!(client.local_password_policy("missing").await.is_err());
    }
}
