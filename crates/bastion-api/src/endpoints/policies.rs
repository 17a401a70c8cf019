use crate::client::{BastionClient, Collection};
use crate::models::{CheckoutPolicy, Cluster, ConnectionMessage, ConnectionPolicy};
use crate::Result;

impl BastionClient {
    /// `/connectionpolicies`
    #[must_use]
    pub fn connection_policies(&self) -> Collection<'_, ConnectionPolicy> {
        self.collection("connectionpolicies").with_force()
    }

    /// `/checkoutpolicies`
    #[must_use]
    pub fn checkout_policies(&self) -> Collection<'_, CheckoutPolicy> {
        self.collection("checkoutpolicies")
    }

    /// `/clusters`
    #[must_use]
    pub fn clusters(&self) -> Collection<'_, Cluster> {
        self.collection("clusters").with_force()
    }

    /// Read a connection message such as `motd_en`.
    ///
    /// # Errors
    ///
    /// Returns the mapped API error for failures other than 404.
    pub async fn connection_message(&self, name: &str) -> Result<Option<ConnectionMessage>> {
        self.collection::<ConnectionMessage>("connectionmessages")
            .get(name)
            .await
    }

    /// Replace the text of a connection message.
    ///
    /// # Errors
    ///
    /// Returns the mapped API error.
    pub async fn put_connection_message(
        &self,
        name: &str,
        message: &ConnectionMessage,
    ) -> Result<()> {
        self.collection::<ConnectionMessage>("connectionmessages")
            .update(name, message)
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::client::test_support::client;
    use crate::models::ConnectionMessage;
    use bastion_core::ApiVersion;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn connection_message_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/v3.3/connectionmessages/motd_en"))
            .and(body_json(json!({"message": "Authorized use only"})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v3.3/connectionmessages/motd_en"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"message": "Authorized use only"})),
            )
            .mount(&server)
            .await;

        let client = client(&server, ApiVersion::V3_3);
        let message = ConnectionMessage {
            message: "Authorized use only".into(),
        };
        client
            .put_connection_message("motd_en", &message)
            .await
            .unwrap();
        let read = client.connection_message("motd_en").await.unwrap();
        assert_eq!(read, Some(message));
    }

    #[tokio::test]
    async fn connection_policy_search() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3.3/connectionpolicies"))
            .and(query_param("q", "connection_policy_name=ssh-strict"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "id": "cp1",
                    "connection_policy_name": "ssh-strict",
                    "protocol": "SSH",
                    "authentication_methods": ["PASSWORD_VAULT"],
                    "options": {"general": {"transformation_rule": ""}}
                }
            ])))
            .mount(&server)
            .await;

        let client = client(&server, ApiVersion::V3_3);
        let policy = client
            .connection_policies()
            .find("ssh-strict")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(policy.protocol, "SSH");
        assert!(policy.options.contains_key("general"));
    }

    #[tokio::test]
    async fn checkout_policy_delete() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v3.3/checkoutpolicies/co1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server, ApiVersion::V3_3);
        client.checkout_policies().delete("co1").await.unwrap();
    }
}
