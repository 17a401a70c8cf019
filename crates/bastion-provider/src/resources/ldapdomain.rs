//! LDAP domains under `/ldapdomains`.

use super::common::{mark_gone, strings_value, LANGUAGES};
use crate::data::{Attributes, ResourceData};
use crate::import::ImportFormat;
use crate::resource::{ProviderContext, Resource};
use crate::schema::{Attribute, Schema, Validator};
use crate::Result;
use async_trait::async_trait;
use bastion_api::models::LdapDomain;
use bastion_core::Error;

const IMPORT: ImportFormat = ImportFormat("<domain_name>");

/// `wallix-bastion_ldapdomain`, addressed by name.
pub(crate) struct LdapDomainResource;

fn body(data: &ResourceData, creating: bool) -> LdapDomain {
    let mut domain = LdapDomain {
        check_x509_san_email: data.get_bool("check_x509_san_email"),
        default_email_domain: data.get_str("default_email_domain"),
        default_language: data.get_str("default_language"),
        description: data.get_str("description"),
        display_name_attribute: data.get_str("display_name_attribute"),
        email_attribute: data.get_str("email_attribute"),
        external_ldaps: data.get_strings("external_ldaps"),
        group_attribute: data.get_str("group_attribute"),
        is_default: data.get_bool("is_default"),
        language_attribute: data.get_str("language_attribute"),
        ldap_domain_name: data.get_str("ldap_domain_name"),
        san_domain_name: data.get_str("san_domain_name"),
        secondary_auth: data.get_strings("secondary_auth"),
        x509_condition: data.get_str("x509_condition"),
        x509_search_filter: data.get_str("x509_search_filter"),
        ..LdapDomain::default()
    };
    if creating {
        domain.domain_name = data.get_str("domain_name");
    }
    domain
}

fn fill(data: &mut ResourceData, name: &str, domain: &LdapDomain) {
    data.set("domain_name", name);
    data.set("ldap_domain_name", domain.ldap_domain_name.clone());
    data.set("external_ldaps", strings_value(&domain.external_ldaps));
    data.set("default_language", domain.default_language.clone());
    data.set("default_email_domain", domain.default_email_domain.clone());
    data.set("secondary_auth", strings_value(&domain.secondary_auth));
    data.set("description", domain.description.clone());
    data.set("check_x509_san_email", domain.check_x509_san_email);
    data.set("display_name_attribute", domain.display_name_attribute.clone());
    data.set("email_attribute", domain.email_attribute.clone());
    data.set("group_attribute", domain.group_attribute.clone());
    data.set("is_default", domain.is_default);
    data.set("language_attribute", domain.language_attribute.clone());
    data.set("san_domain_name", domain.san_domain_name.clone());
    data.set("x509_condition", domain.x509_condition.clone());
    data.set("x509_search_filter", domain.x509_search_filter.clone());
}

#[async_trait]
impl Resource for LdapDomainResource {
    fn type_name(&self) -> &'static str {
        "wallix-bastion_ldapdomain"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("domain_name", Attribute::string().required().force_new())
            .attr("ldap_domain_name", Attribute::string().required())
            .attr("external_ldaps", Attribute::string_list().required())
            .attr(
                "default_language",
                Attribute::string()
                    .required()
                    .validate(Validator::StringInSlice(LANGUAGES)),
            )
            .attr("default_email_domain", Attribute::string().required())
            .attr("secondary_auth", Attribute::string_list().optional())
            .attr("description", Attribute::string().optional())
            .attr("check_x509_san_email", Attribute::bool().optional())
            .attr("display_name_attribute", Attribute::string().optional())
            .attr("email_attribute", Attribute::string().optional())
            .attr("group_attribute", Attribute::string().optional())
            .attr("is_default", Attribute::bool().optional())
            .attr("language_attribute", Attribute::string().optional())
            .attr("san_domain_name", Attribute::string().optional())
            .attr("x509_condition", Attribute::string().optional())
            .attr("x509_search_filter", Attribute::string().optional())
    }

    async fn create(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let name = data.get_str("domain_name");
        let domains = ctx.client().ldap_domains();
        if domains.get(&name).await?.is_some() {
            return Err(Error::Conflict(format!("domain_name {name} already exists")));
        }
        domains.create(&body(data, true)).await?;
        data.set_id(name);
        self.read(ctx, data).await
    }

    async fn read(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let name = data.id().to_string();
        match ctx.client().ldap_domains().get(&name).await? {
            Some(domain) => fill(data, &name, &domain),
            None => mark_gone(data, self.type_name()),
        }
        Ok(())
    }

    async fn update(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        ctx.client()
            .ldap_domains()
            .update(data.id(), &body(data, false))
            .await?;
        self.read(ctx, data).await
    }

    async fn delete(&self, ctx: &ProviderContext, data: &ResourceData) -> Result<()> {
        ctx.client().ldap_domains().delete(data.id()).await
    }

    async fn import(&self, ctx: &ProviderContext, id: &str) -> Result<ResourceData> {
        let parts = IMPORT.parse(id)?;
        let domain = ctx
            .client()
            .ldap_domains()
            .get(&parts[0])
            .await?
            .ok_or_else(|| IMPORT.not_found("domain_name", id))?;
        let mut data = ResourceData::default();
        data.set_id(parts[0].clone());
        fill(&mut data, &parts[0], &domain);
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn name_sent_on_create_only() {
        let Value::Object(config) = json!({
            "domain_name": "corp",
            "ldap_domain_name": "corp.local",
            "external_ldaps": ["ldap1"],
            "default_language": "en",
            "default_email_domain": "corp.local"
        }) else {
            unreachable!()
        };
        let data = ResourceData::new(config);
        let created = serde_json::to_value(body(&data, true)).unwrap();
        assert_eq!(created["domain_name"], json!("corp"));
        assert_eq!(created["secondary_auth"], json!([]));
        let updated = serde_json::to_value(body(&data, false)).unwrap();
        assert!(updated.get("domain_name").is_none());
    }
}
