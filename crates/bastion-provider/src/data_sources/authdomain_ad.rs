use crate::data::{Attributes, ResourceData};
use crate::resource::{DataSource, ProviderContext};
use crate::resources::common::strings_value;
use crate::schema::{Attribute, Schema};
use crate::Result;
use async_trait::async_trait;
use bastion_api::models::AuthDomainDirectory;
use bastion_core::Error;

/// `wallix-bastion_authdomain_ad`
pub(crate) struct AuthDomainAdDataSource;

#[async_trait]
impl DataSource for AuthDomainAdDataSource {
    fn type_name(&self) -> &'static str {
        "wallix-bastion_authdomain_ad"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("domain_name", Attribute::string().required())
            .attr("auth_domain_name", Attribute::string().computed())
            .attr("default_email_domain", Attribute::string().computed())
            .attr("default_language", Attribute::string().computed())
            .attr("external_auths", Attribute::string_list().computed())
            .attr("language_attribute", Attribute::string().computed())
            .attr("secondary_auth", Attribute::string_list().computed())
    }

    async fn read(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let name = data.get_str("domain_name");
        let domain = ctx
            .client()
            .auth_domains::<AuthDomainDirectory>()
            .find(&name)
            .await?
            .ok_or_else(|| Error::NotFound(format!("domain_name {name} doesn't exists")))?;
        data.set("auth_domain_name", domain.auth_domain_name.clone());
        data.set("default_email_domain", domain.default_email_domain.clone());
        data.set("default_language", domain.default_language.clone());
        data.set("external_auths", strings_value(&domain.external_auths));
        data.set("language_attribute", domain.language_attribute.clone());
        data.set("secondary_auth", strings_value(&domain.secondary_auth));
        data.set_id(domain.id);
        Ok(())
    }
}
