use crate::client::{BastionClient, Collection};
use crate::models::{Authorization, Profile, TargetGroup, Timeframe, User, UserGroup};

impl BastionClient {
    /// `/authorizations`
    #[must_use]
    pub fn authorizations(&self) -> Collection<'_, Authorization> {
        self.collection("authorizations").with_force()
    }

    /// `/users`, addressed by user name.
    #[must_use]
    pub fn users(&self) -> Collection<'_, User> {
        self.collection("users").with_force()
    }

    /// `/usergroups`
    #[must_use]
    pub fn usergroups(&self) -> Collection<'_, UserGroup> {
        self.collection("usergroups").with_force()
    }

    /// `/profiles`
    #[must_use]
    pub fn profiles(&self) -> Collection<'_, Profile> {
        self.collection("profiles").with_force()
    }

    /// `/timeframes`, addressed by timeframe name.
    #[must_use]
    pub fn timeframes(&self) -> Collection<'_, Timeframe> {
        self.collection("timeframes").with_force()
    }

    /// `/targetgroups`
    #[must_use]
    pub fn targetgroups(&self) -> Collection<'_, TargetGroup> {
        self.collection("targetgroups").with_force()
    }
}

#[cfg(test)]
mod tests {
    use crate::client::test_support::client;
    use crate::models::{Timeframe, User};
    use bastion_core::ApiVersion;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn user_is_read_by_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3.6/users/jdoe"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user_name": "jdoe",
                "email": "jdoe@example.com",
                "profile": "user",
                "user_auths": ["local_password"],
                "groups": ["ops"]
            })))
            .mount(&server)
            .await;

        let client = client(&server, ApiVersion::V3_6);
        let user: User = client.users().get("jdoe").await.unwrap().unwrap();
        assert_eq!(user.email, "jdoe@example.com");
        assert_eq!(user.groups, Some(vec!["ops".to_string()]));
        assert!(client.users().get("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn timeframe_update_is_forced() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/v3.6/timeframes/office"))
            .and(query_param("force", "true"))
            .and(body_partial_json(json!({"timeframe_name": "office"})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server, ApiVersion::V3_6);
        let timeframe = Timeframe {
            timeframe_name: "office".into(),
            ..Timeframe::default()
        };
        client
            .timeframes()
            .update("office", &timeframe)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn targetgroup_find_by_group_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3.6/targetgroups"))
            .and(query_param("q", "group_name=linux"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "id": "tg1",
                    "group_name": "linux",
                    "session": {
                        "accounts": [
                            {"account": "root", "domain": "local", "domain_type": "local",
                             "device": "srv", "service": "SSH"}
                        ]
                    }
                }
            ])))
            .mount(&server)
            .await;

        let client = client(&server, ApiVersion::V3_6);
        let group = client.targetgroups().find("linux").await.unwrap().unwrap();
        assert_eq!(group.session.accounts[0].service.as_deref(), Some("SSH"));
    }
}
