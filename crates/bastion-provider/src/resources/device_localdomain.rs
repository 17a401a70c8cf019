use super::common::{create_named, json_object, mark_gone, require_parent};
use crate::data::{Attributes, ResourceData};
use crate::import::ImportFormat;
use crate::resource::{ProviderContext, Resource};
use crate::schema::{Attribute, Schema, Validator};
use crate::Result;
use async_trait::async_trait;
use bastion_api::models::DeviceLocalDomain;

const IMPORT: ImportFormat = ImportFormat("<device_id>/<domain_name>");

/// `wallix-bastion_device_localdomain`
pub(crate) struct DeviceLocalDomainResource;

fn body(data: &ResourceData, creating: bool) -> Result<DeviceLocalDomain> {
    let ca_private_key = data.get_str("ca_private_key");
    let mut domain = DeviceLocalDomain {
        domain_name: data.get_str("domain_name"),
        description: data.get_str("description"),
        passphrase: data.get_str("passphrase"),
        ca_private_key: if creating || !ca_private_key.starts_with("generate:") {
            ca_private_key
        } else {
            String::new()
        },
        ..DeviceLocalDomain::default()
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
    }
    Ok(domain)
}

fn fill(data: &mut ResourceData, domain: &DeviceLocalDomain) {
    data.set("domain_name", domain.domain_name.clone());
    data.set("admin_account", domain.admin_account.clone());
    data.set("ca_public_key", domain.ca_public_key.clone());
    data.set("description", domain.description.clone());
    data.set("enable_password_change", domain.enable_password_change);
    data.set("passphrase", domain.passphrase.clone());
    data.set("password_change_policy", domain.password_change_policy.clone());
    data.set("password_change_plugin", domain.password_change_plugin.clone());
}

#[async_trait]
impl Resource for DeviceLocalDomainResource {
    fn type_name(&self) -> &'static str {
        "wallix-bastion_device_localdomain"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("device_id", Attribute::string().required().force_new())
            .attr("domain_name", Attribute::string().required())
            .attr(
                "admin_account",
                Attribute::string().optional().required_with(&[
                    "enable_password_change",
                    "password_change_policy",
                    "password_change_plugin",
                ]),
            )
            .attr("ca_public_key", Attribute::string().computed())
            .attr("ca_private_key", Attribute::string().optional().sensitive())
            .attr("description", Attribute::string().optional())
            .attr(
                "enable_password_change",
                Attribute::bool()
                    .optional()
                    .required_with(&["password_change_policy", "password_change_plugin"]),
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
                    .required_with(&[
                        "enable_password_change",
                        "password_change_policy",
                        "password_change_plugin",
                    ]),
            )
    }

    async fn create(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let device_id = data.get_str("device_id");
        let client = ctx.client();
        require_parent(client.devices().get(&device_id).await?, || {
            format!("device with ID {device_id} doesn't exists")
        })?;

        let name = data.get_str("domain_name");
        let id = create_named(
            &client.device_localdomains(&device_id),
            &name,
            &body(data, true)?,
            &format!("domain_name {name} on device_id {device_id}"),
        )
        .await?;
        data.set_id(id);
        self.read(ctx, data).await
    }

    async fn read(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let device_id = data.get_str("device_id");
        match ctx
            .client()
            .device_localdomains(&device_id)
            .get(data.id())
            .await?
        {
            Some(domain) => fill(data, &domain),
            None => mark_gone(data, self.type_name()),
        }
        Ok(())
    }

    async fn update(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let device_id = data.get_str("device_id");
        ctx.client()
            .device_localdomains(&device_id)
            .update(data.id(), &body(data, false)?)
            .await?;
        self.read(ctx, data).await
    }

    async fn delete(&self, ctx: &ProviderContext, data: &ResourceData) -> Result<()> {
        let device_id = data.get_str("device_id");
        ctx.client()
            .device_localdomains(&device_id)
            .delete(data.id())
            .await
    }

    async fn import(&self, ctx: &ProviderContext, id: &str) -> Result<ResourceData> {
        let parts = IMPORT.parse(id)?;
        let domain = ctx
            .client()
            .device_localdomains(&parts[0])
            .find(&parts[1])
            .await?
            .ok_or_else(|| IMPORT.not_found("domain_name", id))?;
        let mut data = ResourceData::default();
        data.set_id(domain.id.clone());
        data.set("device_id", parts[0].clone());
        fill(&mut data, &domain);
        Ok(data)
    }
}
