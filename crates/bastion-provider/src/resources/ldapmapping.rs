use super::common::mark_gone;
use crate::data::{Attributes, ResourceData};
use crate::import::ImportFormat;
use crate::resource::{ApiSupport, ProviderContext, Resource};
use crate::schema::{Attribute, Schema};
use crate::Result;
use async_trait::async_trait;
use bastion_api::models::LdapMapping;
use bastion_core::{ApiVersion, Error};

const IMPORT: ImportFormat = ImportFormat("<domain>/<user_group>/<ldap_group>");

/// `/ldapmappings` only exists before authentication domain mappings.
const LEGACY_LDAP: ApiSupport = ApiSupport::Only(&[ApiVersion::V3_3, ApiVersion::V3_6]);

/// `wallix-bastion_ldapmapping`; every attribute forces a new mapping.
pub(crate) struct LdapMappingResource;

fn mapping(data: &impl Attributes) -> LdapMapping {
    LdapMapping {
        domain: data.get_str("domain"),
        user_group: data.get_str("user_group"),
        ldap_group: data.get_str("ldap_group"),
    }
}

fn fill(data: &mut ResourceData, mapping: &LdapMapping) {
    data.set("domain", mapping.domain.clone());
    data.set("user_group", mapping.user_group.clone());
    data.set("ldap_group", mapping.ldap_group.clone());
}

#[async_trait]
impl Resource for LdapMappingResource {
    fn type_name(&self) -> &'static str {
        "wallix-bastion_ldapmapping"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("domain", Attribute::string().required().force_new())
            .attr("user_group", Attribute::string().required().force_new())
            .attr("ldap_group", Attribute::string().required().force_new())
    }

    fn api_support(&self) -> ApiSupport {
        LEGACY_LDAP
    }

    fn successor(&self) -> Option<&'static str> {
        Some("wallix-bastion_authdomain_mapping")
    }

    async fn create(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let wanted = mapping(data);
        let client = ctx.client();
        if client.find_ldap_mapping(&wanted).await?.is_some() {
            return Err(Error::Conflict(format!(
                "ldapmapping {} already exists",
                wanted.id()
            )));
        }
        client.create_ldap_mapping(&wanted).await?;
        data.set_id(wanted.id());
        Ok(())
    }

    async fn read(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        if ctx.client().find_ldap_mapping(&mapping(data)).await?.is_none() {
            mark_gone(data, self.type_name());
        }
        Ok(())
    }

    async fn delete(&self, ctx: &ProviderContext, data: &ResourceData) -> Result<()> {
        ctx.client().delete_ldap_mapping(&mapping(data)).await
    }

    async fn import(&self, ctx: &ProviderContext, id: &str) -> Result<ResourceData> {
        let parts = IMPORT.parse(id)?;
        let wanted = LdapMapping {
            domain: parts[0].clone(),
            user_group: parts[1].clone(),
            ldap_group: parts[2].clone(),
        };
        let found = ctx
            .client()
            .find_ldap_mapping(&wanted)
            .await?
            .ok_or_else(|| IMPORT.not_found("ldapmapping", id))?;
        let mut data = ResourceData::default();
        data.set_id(found.id());
        fill(&mut data, &found);
        Ok(data)
    }
}
