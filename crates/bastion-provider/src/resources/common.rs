//! Helpers shared by resource implementations.

use crate::data::{Attributes, ResourceData};
use crate::schema::{Attribute, Schema, Validator};
use crate::Result;
use bastion_api::models::{Account, Credential, Named, Restriction};
use bastion_api::Collection;
use bastion_core::Error;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

pub(crate) const LANGUAGES: &[&str] = &["de", "en", "es", "fr", "ru"];

pub(crate) const PROTOCOLS: &[&str] = &["SSH", "RAWTCPIP", "RDP", "RLOGIN", "TELNET", "VNC"];

pub(crate) const CHECKOUT_POLICY_DEFAULT: &str = "default";

/// Search, POST, search again; returns the id of the new object.
///
/// `what` describes the object in errors, e.g. `device_name srv`.
pub(crate) async fn create_named<T, B>(
    collection: &Collection<'_, T>,
    name: &str,
    body: &B,
    what: &str,
) -> Result<String>
where
    T: DeserializeOwned + Named,
    B: Serialize + Sync,
{
    if collection.find(name).await?.is_some() {
        return Err(Error::Conflict(format!("{what} already exists")));
    }
    debug!(path = collection.path(), what, "posting new object");
    collection.create(body).await?;
    collection
        .find(name)
        .await?
        .map(|found| found.id().to_string())
        .ok_or_else(|| Error::NotFound(format!("{what} not found after POST")))
}

/// Drop an object that vanished remotely from state.
pub(crate) fn mark_gone(data: &mut ResourceData, type_name: &str) {
    warn!(
        resource = type_name,
        id = data.id(),
        "object not found, removing it from state"
    );
    data.clear_id();
}

/// Fail when a parent object does not exist.
pub(crate) fn require_parent<T>(found: Option<T>, message: impl FnOnce() -> String) -> Result<T> {
    found.ok_or_else(|| Error::NotFound(message()))
}

/// Parse a JSON-object attribute; an empty string gives an empty object.
pub(crate) fn json_object(data: &impl Attributes, key: &str) -> Result<Map<String, Value>> {
    let raw = data.get_str(key);
    if raw.is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str(&raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(Error::ValidationError(format!("{key} must be a JSON object"))),
        Err(e) => Err(Error::ValidationError(format!("{key}: {e}"))),
    }
}

/// Serialize a JSON object back into an attribute string.
pub(crate) fn json_string(map: &Map<String, Value>) -> String {
    Value::Object(map.clone()).to_string()
}

/// `None` for empty strings.
pub(crate) fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// Schema of a session restriction block.
pub(crate) fn restriction_schema(subprotocols: &'static [&'static str]) -> Schema {
    Schema::new()
        .attr(
            "action",
            Attribute::string()
                .required()
                .validate(Validator::StringInSlice(&["kill", "notify"])),
        )
        .attr("rules", Attribute::string().required())
        .attr(
            "subprotocol",
            Attribute::string()
                .required()
                .validate(Validator::StringInSlice(subprotocols)),
        )
}

pub(crate) fn restrictions_from(data: &impl Attributes) -> Vec<Restriction> {
    data.get_blocks("restrictions")
        .iter()
        .map(|block| Restriction {
            action: block.get_str("action"),
            rules: block.get_str("rules"),
            subprotocol: block.get_str("subprotocol"),
        })
        .collect()
}

pub(crate) fn restrictions_value(restrictions: &[Restriction]) -> Value {
    Value::Array(
        restrictions
            .iter()
            .map(|r| json!({"action": r.action, "rules": r.rules, "subprotocol": r.subprotocol}))
            .collect(),
    )
}

/// Computed `credentials` block of account resources.
pub(crate) fn credential_block_schema() -> Schema {
    Schema::new()
        .attr("id", Attribute::string().computed())
        .attr("public_key", Attribute::string().computed())
        .attr("type", Attribute::string().computed())
}

pub(crate) fn credentials_value(credentials: Option<&Vec<Credential>>) -> Value {
    Value::Array(
        credentials
            .map(|list| {
                list.iter()
                    .map(|c| json!({"id": c.id, "public_key": c.public_key, "type": c.kind}))
                    .collect()
            })
            .unwrap_or_default(),
    )
}

/// Attributes every account flavour shares.
pub(crate) fn fill_account_common(data: &mut ResourceData, account: &Account) {
    data.set("account_name", account.account_name.clone());
    data.set("account_login", account.account_login.clone());
    data.set("auto_change_password", account.auto_change_password);
    data.set("checkout_policy", account.checkout_policy.clone());
    data.set("description", account.description.clone());
    data.set(
        "domain_password_change",
        account.domain_password_change.unwrap_or_default(),
    );
}

pub(crate) fn strings_value(values: &[String]) -> Value {
    Value::Array(values.iter().cloned().map(Value::String).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_object_parses_or_defaults() {
        let mut data = ResourceData::default();
        assert!(json_object(&data, "params").unwrap().is_empty());
        data.set("params", r#"{"host":"10.0.0.1"}"#);
        assert_eq!(json_object(&data, "params").unwrap()["host"], json!("10.0.0.1"));
        data.set("params", "[1]");
        assert!(json_object(&data, "params").is_err());
    }

    #[test]
    fn credentials_block_keeps_public_fields() {
        let creds = vec![Credential {
            id: "c1".into(),
            kind: "ssh_key".into(),
            public_key: "ssh-ed25519 AAAA".into(),
            private_key: "secret".into(),
            ..Credential::default()
        }];
        assert_eq!(
            credentials_value(Some(&creds)),
            json!([{"id": "c1", "public_key": "ssh-ed25519 AAAA", "type": "ssh_key"}])
        );
        assert_eq!(credentials_value(None), json!([]));
    }
}
