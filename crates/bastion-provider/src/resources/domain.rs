use super::common::{create_named, json_object, mark_gone};
use crate::data::{Attributes, ResourceData};
use crate::import::ImportFormat;
use crate::resource::{ProviderContext, Resource};
use crate::schema::{Attribute, Schema, Validator};
use crate::Result;
use async_trait::async_trait;
use bastion_api::models::Domain;

const IMPORT: ImportFormat = ImportFormat("<domain_name>");

/// `wallix-bastion_domain`
pub(crate) struct DomainResource;

/// A `generate:<type>` key is only requested while no key exists yet.
fn ca_private_key(data: &ResourceData) -> String {
    let key = data.get_str("ca_private_key");
    if !key.starts_with("generate:") {
        return key;
    }
    if data.has_change("ca_private_key") && data.old_str("ca_private_key").is_empty() {
        key
    } else {
        String::new()
    }
}

fn body(data: &ResourceData, creating: bool) -> Result<Domain> {
    let mut domain = Domain {
        domain_name: data.get_str("domain_name"),
        domain_real_name: data.get_str("domain_real_name"),
        ca_private_key: ca_private_key(data),
        description: data.get_str("description"),
        passphrase: data.get_str("passphrase"),
        ..Domain::default()
    };
    if data.get_bool("enable_password_change") {
        if !creating {
            domain.admin_account = Some(data.get_str("admin_account"));
        }
        domain.enable_password_change = true;
        domain.password_change_policy = data.get_str("password_change_policy");
        domain.password_change_plugin = data.get_str("password_change_plugin");
        domain.password_change_plugin_parameters =
            Some(json_object(data, "password_change_plugin_parameters")?);
    } else if data.is_set("vault_plugin") {
        domain.vault_plugin = data.get_str("vault_plugin");
        domain.vault_plugin_parameters = Some(json_object(data, "vault_plugin_parameters")?);
    }
    Ok(domain)
}

fn fill(data: &mut ResourceData, domain: &Domain) {
    data.set("domain_name", domain.domain_name.clone());
    data.set("domain_real_name", domain.domain_real_name.clone());
    data.set("admin_account", domain.admin_account.clone().unwrap_or_default());
    data.set("ca_public_key", domain.ca_public_key.clone());
    data.set("description", domain.description.clone());
    data.set("enable_password_change", domain.enable_password_change);
    data.set("passphrase", domain.passphrase.clone());
    data.set("password_change_policy", domain.password_change_policy.clone());
    data.set("password_change_plugin", domain.password_change_plugin.clone());
    data.set("vault_plugin", domain.vault_plugin.clone());
}

#[async_trait]
impl Resource for DomainResource {
    fn type_name(&self) -> &'static str {
        "wallix-bastion_domain"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("domain_name", Attribute::string().required())
            .attr("domain_real_name", Attribute::string().optional())
            .attr(
                "admin_account",
                Attribute::string().optional().required_with(&[
                    "enable_password_change",
                    "password_change_policy",
                    "password_change_plugin",
                ]),
            )
            .attr("ca_public_key", Attribute::string().computed())
            .attr(
                "ca_private_key",
                Attribute::string()
                    .optional()
                    .sensitive()
                    .conflicts_with(&["vault_plugin"]),
            )
            .attr("description", Attribute::string().optional())
            .attr(
                "enable_password_change",
                Attribute::bool()
                    .optional()
                    .required_with(&["password_change_policy", "password_change_plugin"])
                    .conflicts_with(&["vault_plugin"]),
            )
            .attr("passphrase", Attribute::string().optional().sensitive())
            .attr(
                "password_change_policy",
                Attribute::string()
                    .optional()
                    .required_with(&["enable_password_change"]),
            )
            .attr(
                "password_change_plugin",
                Attribute::string()
                    .optional()
                    .required_with(&["enable_password_change"]),
            )
            .attr(
                "password_change_plugin_parameters",
                Attribute::string()
                    .optional()
                    .sensitive()
                    .validate(Validator::StringIsJson)
                    .required_with(&["enable_password_change"]),
            )
            .attr(
                "vault_plugin",
                Attribute::string()
                    .optional()
                    .force_new()
                    .conflicts_with(&["enable_password_change", "ca_private_key"]),
            )
            .attr(
                "vault_plugin_parameters",
                Attribute::string()
                    .optional()
                    .sensitive()
                    .validate(Validator::StringIsJson)
                    .required_with(&["vault_plugin"]),
            )
    }

    async fn create(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let name = data.get_str("domain_name");
        let id = create_named(
            &ctx.client().domains(),
            &name,
            &body(data, true)?,
            &format!("domain_name {name}"),
        )
        .await?;
        data.set_id(id);
        self.read(ctx, data).await
    }

    async fn read(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        match ctx.client().domains().get(data.id()).await? {
            Some(domain) => fill(data, &domain),
            None => mark_gone(data, self.type_name()),
        }
        Ok(())
    }

    async fn update(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        ctx.client()
            .domains()
            .update(data.id(), &body(data, false)?)
            .await?;
        self.read(ctx, data).await
    }

    async fn delete(&self, ctx: &ProviderContext, data: &ResourceData) -> Result<()> {
        ctx.client().domains().delete(data.id()).await
    }

    async fn import(&self, ctx: &ProviderContext, id: &str) -> Result<ResourceData> {
        let parts = IMPORT.parse(id)?;
        let domain = ctx
            .client()
            .domains()
            .find(&parts[0])
            .await?
            .ok_or_else(|| IMPORT.not_found("domain_name", id))?;
        let mut data = ResourceData::default();
        data.set_id(domain.id.clone());
        fill(&mut data, &domain);
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map, Value};

    fn state(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn generated_key_requested_once() {
        let data = ResourceData::new(state(json!({"ca_private_key": "generate:RSA_4096"})));
        assert_eq!(ca_private_key(&data), "generate:RSA_4096");

        let data = ResourceData::for_update(
            state(json!({"id": "d1", "ca_private_key": "generate:RSA_4096"})),
            state(json!({"ca_private_key": "generate:RSA_4096"})),
        );
        assert_eq!(ca_private_key(&data), "");

        let data = ResourceData::for_update(
            state(json!({"id": "d1", "ca_private_key": "generate:RSA_4096"})),
            state(json!({"ca_private_key": "generate:ED25519"})),
        );
        assert_eq!(ca_private_key(&data), "");
    }

    #[test]
    fn vault_plugin_parameters_default_to_empty_object() {
        let data = ResourceData::new(state(json!({
            "domain_name": "corp",
            "vault_plugin": "hashicorp"
        })));
        let domain = body(&data, true).unwrap();
        assert_eq!(domain.vault_plugin, "hashicorp");
        assert_eq!(domain.vault_plugin_parameters, Some(Map::new()));
        assert!(domain.password_change_plugin_parameters.is_none());
    }
}
