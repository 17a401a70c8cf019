use super::common::{create_named, mark_gone, require_parent};
use crate::data::{Attributes, ResourceData};
use crate::import::ImportFormat;
use crate::resource::{ApiSupport, ProviderContext, Resource};
use crate::schema::{Attribute, Schema};
use crate::Result;
use async_trait::async_trait;
use bastion_api::models::AuthDomainMapping;
use bastion_core::ApiVersion;

const IMPORT: ImportFormat = ImportFormat("<domain_id>/<user_group>");

/// `wallix-bastion_authdomain_mapping`
pub(crate) struct AuthDomainMappingResource;

fn body(data: &ResourceData) -> AuthDomainMapping {
    AuthDomainMapping {
        user_group: data.get_str("user_group"),
        external_group: data.get_str("external_group"),
        ..AuthDomainMapping::default()
    }
}

fn fill(data: &mut ResourceData, mapping: &AuthDomainMapping) {
    data.set("user_group", mapping.user_group.clone());
    data.set("external_group", mapping.external_group.clone());
    data.set("domain", mapping.domain.clone());
}

#[async_trait]
impl Resource for AuthDomainMappingResource {
    fn type_name(&self) -> &'static str {
        "wallix-bastion_authdomain_mapping"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("domain_id", Attribute::string().required().force_new())
            .attr("user_group", Attribute::string().required())
            .attr("external_group", Attribute::string().required())
            .attr("domain", Attribute::string().computed())
    }

    fn api_support(&self) -> ApiSupport {
        ApiSupport::Since(ApiVersion::V3_8)
    }

    async fn create(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let domain_id = data.get_str("domain_id");
        let client = ctx.client();
        require_parent(client.auth_domain_type(&domain_id).await?, || {
            format!("auth domain with ID {domain_id} doesn't exists")
        })?;

        let group = data.get_str("user_group");
        let id = create_named(
            &client.auth_domain_mappings(&domain_id),
            &group,
            &body(data),
            &format!("auth domain mapping for user_group {group} on domain_id {domain_id}"),
        )
        .await?;
        data.set_id(id);
        self.read(ctx, data).await
    }

    async fn read(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let domain_id = data.get_str("domain_id");
        match ctx
            .client()
            .auth_domain_mappings(&domain_id)
            .get(data.id())
            .await?
        {
            Some(mapping) => fill(data, &mapping),
            None => mark_gone(data, self.type_name()),
        }
        Ok(())
    }

    async fn update(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let domain_id = data.get_str("domain_id");
        ctx.client()
            .auth_domain_mappings(&domain_id)
            .update(data.id(), &body(data))
            .await?;
        self.read(ctx, data).await
    }

    async fn delete(&self, ctx: &ProviderContext, data: &ResourceData) -> Result<()> {
        let domain_id = data.get_str("domain_id");
        ctx.client()
            .auth_domain_mappings(&domain_id)
            .delete(data.id())
            .await
    }

    async fn import(&self, ctx: &ProviderContext, id: &str) -> Result<ResourceData> {
        let parts = IMPORT.parse(id)?;
        let mapping = ctx
            .client()
            .auth_domain_mappings(&parts[0])
            .find(&parts[1])
            .await?
            .ok_or_else(|| IMPORT.not_found("auth domain mapping", id))?;
        let mut data = ResourceData::default();
        data.set_id(mapping.id.clone());
        data.set("domain_id", parts[0].clone());
        fill(&mut data, &mapping);
        Ok(data)
    }
}
