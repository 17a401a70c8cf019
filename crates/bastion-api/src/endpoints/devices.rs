use crate::client::{BastionClient, Collection};
use crate::models::{Account, Credential, Device, DeviceLocalDomain, DeviceService};

impl BastionClient {
    /// `/devices`
    #[must_use]
    pub fn devices(&self) -> Collection<'_, Device> {
        self.collection("devices")
    }

    /// `/devices/{device_id}/localdomains`
    #[must_use]
    pub fn device_localdomains(&self, device_id: &str) -> Collection<'_, DeviceLocalDomain> {
        self.collection(format!("devices/{device_id}/localdomains"))
    }

    /// `/devices/{device_id}/localdomains/{domain_id}/accounts`
    #[must_use]
    pub fn device_localdomain_accounts(
        &self,
        device_id: &str,
        domain_id: &str,
    ) -> Collection<'_, Account> {
        self.collection(format!("devices/{device_id}/localdomains/{domain_id}/accounts"))
            .with_force()
    }

    /// `/devices/{device_id}/localdomains/{domain_id}/accounts/{account_id}/credentials`
    #[must_use]
    pub fn device_account_credentials(
        &self,
        device_id: &str,
        domain_id: &str,
        account_id: &str,
    ) -> Collection<'_, Credential> {
        self.collection(format!(
            "devices/{device_id}/localdomains/{domain_id}/accounts/{account_id}/credentials"
        ))
    }

    /// `/devices/{device_id}/services`
    #[must_use]
    pub fn device_services(&self, device_id: &str) -> Collection<'_, DeviceService> {
        self.collection(format!("devices/{device_id}/services"))
            .with_force()
    }
}

#[cfg(test)]
mod tests {
    use crate::client::test_support::client;
    use crate::models::Credential;
    use bastion_core::ApiVersion;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn localdomain_search_uses_domain_name_filter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3.3/devices/dev1/localdomains"))
            .and(query_param("q", "domain_name=local"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "ld1", "domain_name": "local", "enable_password_change": false}
            ])))
            .mount(&server)
            .await;

        let client = client(&server, ApiVersion::V3_3);
        let domain = client
            .device_localdomains("dev1")
            .find("local")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(domain.id, "ld1");
    }

    #[tokio::test]
    async fn account_update_is_forced() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/v3.3/devices/dev1/localdomains/ld1/accounts/acc1"))
            .and(query_param("force", "true"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server, ApiVersion::V3_3);
        client
            .device_localdomain_accounts("dev1", "ld1")
            .update("acc1", &json!({"account_name": "root"}))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn credential_create_posts_password() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v3.3/devices/d/localdomains/l/accounts/a/credentials"))
            .and(body_json(json!({"type": "password", "password": "pw"})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server, ApiVersion::V3_3);
        client
            .device_account_credentials("d", "l", "a")
            .create(&Credential::password("pw"))
            .await
            .unwrap();
    }
}
