use crate::data::{Attributes, ResourceData};
use crate::resource::{DataSource, ProviderContext};
use crate::schema::{Attribute, Schema};
use crate::Result;
use async_trait::async_trait;
use bastion_core::Error;

/// `wallix-bastion_domain`
pub(crate) struct DomainDataSource;

#[async_trait]
impl DataSource for DomainDataSource {
    fn type_name(&self) -> &'static str {
        "wallix-bastion_domain"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("domain_name", Attribute::string().required())
            .attr("domain_real_name", Attribute::string().computed())
            .attr("admin_account", Attribute::string().computed())
            .attr("ca_public_key", Attribute::string().computed())
            .attr("description", Attribute::string().computed())
            .attr("enable_password_change", Attribute::bool().computed())
            .attr("password_change_policy", Attribute::string().computed())
            .attr("password_change_plugin", Attribute::string().computed())
            .attr("vault_plugin", Attribute::string().computed())
    }

    async fn read(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let name = data.get_str("domain_name");
        let domain = ctx
            .client()
            .domains()
            .find(&name)
            .await?
            .ok_or_else(|| Error::NotFound(format!("domain_name {name} doesn't exists")))?;
        data.set("domain_real_name", domain.domain_real_name.clone());
        data.set(
            "admin_account",
            domain.admin_account.clone().unwrap_or_default(),
        );
        data.set("ca_public_key", domain.ca_public_key.clone());
        data.set("description", domain.description.clone());
        data.set("enable_password_change", domain.enable_password_change);
        data.set("password_change_policy", domain.password_change_policy.clone());
        data.set("password_change_plugin", domain.password_change_plugin.clone());
        data.set("vault_plugin", domain.vault_plugin.clone());
        data.set_id(domain.id);
        Ok(())
    }
}
