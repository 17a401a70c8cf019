use super::common::{create_named, json_object, mark_gone, require_parent};
use crate::data::{Attributes, ResourceData};
use crate::import::ImportFormat;
use crate::resource::{ProviderContext, Resource};
use crate::schema::{Attribute, Schema, Validator};
use crate::Result;
use async_trait::async_trait;
use bastion_api::models::ApplicationLocalDomain;

const IMPORT: ImportFormat = ImportFormat("<application_id>/<domain_name>");

/// `wallix-bastion_application_localdomain`
pub(crate) struct ApplicationLocalDomainResource;

fn body(data: &ResourceData, creating: bool) -> Result<ApplicationLocalDomain> {
    let mut domain = ApplicationLocalDomain {
        domain_name: data.get_str("domain_name"),
        description: data.get_str("description"),
        ..ApplicationLocalDomain::default()
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

fn fill(data: &mut ResourceData, domain: &ApplicationLocalDomain) {
    data.set("domain_name", domain.domain_name.clone());
    data.set("admin_account", domain.admin_account.clone().unwrap_or_default());
    data.set("description", domain.description.clone());
    data.set("enable_password_change", domain.enable_password_change);
    data.set("password_change_policy", domain.password_change_policy.clone());
    data.set("password_change_plugin", domain.password_change_plugin.clone());
}

#[async_trait]
impl Resource for ApplicationLocalDomainResource {
    fn type_name(&self) -> &'static str {
        "wallix-bastion_application_localdomain"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("application_id", Attribute::string().required().force_new())
            .attr("domain_name", Attribute::string().required())
            .attr(
                "admin_account",
                Attribute::string().optional().required_with(&[
                    "enable_password_change",
                    "password_change_policy",
                    "password_change_plugin",
                ]),
            )
            .attr("description", Attribute::string().optional())
            .attr(
                "enable_password_change",
                Attribute::bool()
                    .optional()
                    .required_with(&["password_change_policy", "password_change_plugin"]),
            )
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
    }

    async fn create(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let application_id = data.get_str("application_id");
        let client = ctx.client();
        require_parent(client.applications().get(&application_id).await?, || {
            format!("application with ID {application_id} doesn't exists")
        })?;

        let name = data.get_str("domain_name");
        let id = create_named(
            &client.application_localdomains(&application_id),
            &name,
            &body(data, true)?,
            &format!("domain_name {name} on application_id {application_id}"),
        )
        .await?;
        data.set_id(id);
        self.read(ctx, data).await
    }

    async fn read(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let application_id = data.get_str("application_id");
        match ctx
            .client()
            .application_localdomains(&application_id)
            .get(data.id())
            .await?
        {
            Some(domain) => fill(data, &domain),
            None => mark_gone(data, self.type_name()),
        }
        Ok(())
    }

    async fn update(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let application_id = data.get_str("application_id");
        ctx.client()
            .application_localdomains(&application_id)
            .update(data.id(), &body(data, false)?)
            .await?;
        self.read(ctx, data).await
    }

    async fn delete(&self, ctx: &ProviderContext, data: &ResourceData) -> Result<()> {
        let application_id = data.get_str("application_id");
        ctx.client()
            .application_localdomains(&application_id)
            .delete(data.id())
            .await
    }

    async fn import(&self, ctx: &ProviderContext, id: &str) -> Result<ResourceData> {
        let parts = IMPORT.parse(id)?;
        let domain = ctx
            .client()
            .application_localdomains(&parts[0])
            .find(&parts[1])
            .await?
            .ok_or_else(|| IMPORT.not_found("domain_name", id))?;
        let mut data = ResourceData::default();
        data.set_id(domain.id.clone());
        data.set("application_id", parts[0].clone());
        fill(&mut data, &domain);
        Ok(data)
    }
}
