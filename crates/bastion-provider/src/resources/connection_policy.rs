use super::common::{create_named, json_object, json_string, mark_gone, strings_value, PROTOCOLS};
use crate::data::{Attributes, ResourceData};
use crate::import::ImportFormat;
use crate::resource::{ProviderContext, Resource};
use crate::schema::{Attribute, Schema, Validator};
use crate::Result;
use async_trait::async_trait;
use bastion_api::models::ConnectionPolicy;

const IMPORT: ImportFormat = ImportFormat("<connection_policy_name>");

const AUTHENTICATION_METHODS: &[&str] = &[
    "KERBEROS_FORWARDING",
    "PASSWORD_INTERACTIVE",
    "PASSWORD_MAPPING",
    "PASSWORD_VAULT",
    "PUBKEY_AGENT_FORWARDING",
    "PUBKEY_VAULT",
];

/// `wallix-bastion_connection_policy`
pub(crate) struct ConnectionPolicyResource;

fn body(data: &ResourceData) -> Result<ConnectionPolicy> {
    Ok(ConnectionPolicy {
        connection_policy_name: data.get_str("connection_policy_name"),
        description: data.get_str("description"),
        protocol: data.get_str("protocol"),
        authentication_methods: data.get_strings("authentication_methods"),
        options: json_object(data, "options")?,
        ..ConnectionPolicy::default()
    })
}

fn fill(data: &mut ResourceData, policy: &ConnectionPolicy) {
    data.set("connection_policy_name", policy.connection_policy_name.clone());
    data.set("description", policy.description.clone());
    data.set("protocol", policy.protocol.clone());
    data.set(
        "authentication_methods",
        strings_value(&policy.authentication_methods),
    );
    data.set("options", json_string(&policy.options));
}

#[async_trait]
impl Resource for ConnectionPolicyResource {
    fn type_name(&self) -> &'static str {
        "wallix-bastion_connection_policy"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("connection_policy_name", Attribute::string().required())
            .attr(
                "protocol",
                Attribute::string()
                    .required()
                    .validate(Validator::StringInSlice(PROTOCOLS)),
            )
            .attr("description", Attribute::string().optional())
            .attr(
                "authentication_methods",
                Attribute::string_set()
                    .optional()
                    .validate(Validator::StringInSlice(AUTHENTICATION_METHODS)),
            )
            .attr(
                "options",
                Attribute::string()
                    .optional()
                    .default("{}")
                    .validate(Validator::StringIsJson),
            )
    }

    async fn create(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let name = data.get_str("connection_policy_name");
        let id = create_named(
            &ctx.client().connection_policies(),
            &name,
            &body(data)?,
            &format!("connection_policy_name {name}"),
        )
        .await?;
        data.set_id(id);
        self.read(ctx, data).await
    }

    async fn read(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        match ctx.client().connection_policies().get(data.id()).await? {
            Some(policy) => fill(data, &policy),
            None => mark_gone(data, self.type_name()),
        }
        Ok(())
    }

    async fn update(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        ctx.client()
            .connection_policies()
            .update(data.id(), &body(data)?)
            .await?;
        self.read(ctx, data).await
    }

    async fn delete(&self, ctx: &ProviderContext, data: &ResourceData) -> Result<()> {
        ctx.client().connection_policies().delete(data.id()).await
    }

    async fn import(&self, ctx: &ProviderContext, id: &str) -> Result<ResourceData> {
        let parts = IMPORT.parse(id)?;
        let policy = ctx
            .client()
            .connection_policies()
            .find(&parts[0])
            .await?
            .ok_or_else(|| IMPORT.not_found("connection_policy_name", id))?;
        let mut data = ResourceData::default();
        data.set_id(policy.id.clone());
        fill(&mut data, &policy);
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn options_sent_as_object() {
        let Value::Object(config) = json!({
            "connection_policy_name": "ssh-strict",
            "protocol": "SSH",
            "options": r#"{"general": {"transformation_rule": ""}}"#
        }) else {
            unreachable!()
        };
        let value = serde_json::to_value(body(&ResourceData::new(config)).unwrap()).unwrap();
        assert_eq!(value["options"], json!({"general": {"transformation_rule": ""}}));
        assert_eq!(value["authentication_methods"], json!([]));
    }

    #[test]
    fn unknown_authentication_method_rejected() {
        let Value::Object(config) = json!({
            "connection_policy_name": "ssh-strict",
            "protocol": "SSH",
            "authentication_methods": ["PASSWORD_VAULT", "TOTP"]
        }) else {
            unreachable!()
        };
        let err = ConnectionPolicyResource
            .schema()
            .validate(&config)
            .unwrap_err()
            .to_string();
        assert!(err.contains("got TOTP"));
    }
}
