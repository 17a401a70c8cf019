use super::common::{
    create_named, credential_block_schema, credentials_value, fill_account_common, mark_gone,
    require_parent, strings_value, CHECKOUT_POLICY_DEFAULT,
};
use crate::data::{Attributes, ResourceData};
use crate::import::ImportFormat;
use crate::resource::{ProviderContext, Resource};
use crate::schema::{Attribute, Schema};
use crate::Result;
use async_trait::async_trait;
use bastion_api::models::Account;
use bastion_core::Error;

const IMPORT: ImportFormat = ImportFormat("<domain_id>/<account_name>");

/// `wallix-bastion_domain_account`
pub(crate) struct DomainAccountResource;

fn resources(data: &ResourceData) -> Result<Vec<String>> {
    let resources = data.get_strings("resources");
    if resources.iter().any(|r| r.split(':').count() != 2) {
        return Err(Error::ValidationError(
            "resource must have format device:service or application:APP".to_string(),
        ));
    }
    Ok(resources)
}

fn body(data: &ResourceData) -> Result<Account> {
    Ok(Account {
        account_name: data.get_str("account_name"),
        account_login: data.get_str("account_login"),
        checkout_policy: data.get_str("checkout_policy"),
        auto_change_password: data.get_bool("auto_change_password"),
        auto_change_ssh_key: Some(data.get_bool("auto_change_ssh_key")),
        certificate_validity: Some(data.get_str("certificate_validity")),
        description: data.get_str("description"),
        resources: if data.has_change("resources") {
            Some(resources(data)?)
        } else {
            None
        },
        ..Account::default()
    })
}

fn fill(data: &mut ResourceData, account: &Account) {
    fill_account_common(data, account);
    data.set(
        "auto_change_ssh_key",
        account.auto_change_ssh_key.unwrap_or_default(),
    );
    data.set(
        "certificate_validity",
        account.certificate_validity.clone().unwrap_or_default(),
    );
    data.set("credentials", credentials_value(account.credentials.as_ref()));
    data.set(
        "resources",
        strings_value(account.resources.as_deref().unwrap_or_default()),
    );
}

#[async_trait]
impl Resource for DomainAccountResource {
    fn type_name(&self) -> &'static str {
        "wallix-bastion_domain_account"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("domain_id", Attribute::string().required().force_new())
            .attr("account_name", Attribute::string().required())
            .attr("account_login", Attribute::string().required())
            .attr("auto_change_password", Attribute::bool().optional())
            .attr("auto_change_ssh_key", Attribute::bool().optional())
            .attr("certificate_validity", Attribute::string().optional())
            .attr(
                "checkout_policy",
                Attribute::string()
                    .optional()
                    .default(CHECKOUT_POLICY_DEFAULT),
            )
            .attr("description", Attribute::string().optional())
            .attr("resources", Attribute::string_set().optional().computed())
            .attr("domain_password_change", Attribute::bool().computed())
            .attr(
                "credentials",
                Attribute::block_list(credential_block_schema()).computed(),
            )
    }

    async fn create(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let domain_id = data.get_str("domain_id");
        let client = ctx.client();
        require_parent(client.domains().get(&domain_id).await?, || {
            format!("domain_id with ID {domain_id} doesn't exists")
        })?;

        let name = data.get_str("account_name");
        let id = create_named(
            &client.domain_accounts(&domain_id),
            &name,
            &body(data)?,
            &format!("account_name {name} on domain_id {domain_id}"),
        )
        .await?;
        data.set_id(id);
        self.read(ctx, data).await
    }

    async fn read(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let domain_id = data.get_str("domain_id");
        match ctx.client().domain_accounts(&domain_id).get(data.id()).await? {
            Some(account) => fill(data, &account),
            None => mark_gone(data, self.type_name()),
        }
        Ok(())
    }

    async fn update(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let domain_id = data.get_str("domain_id");
        ctx.client()
            .domain_accounts(&domain_id)
            .update(data.id(), &body(data)?)
            .await?;
        self.read(ctx, data).await
    }

    async fn delete(&self, ctx: &ProviderContext, data: &ResourceData) -> Result<()> {
        let domain_id = data.get_str("domain_id");
        ctx.client().domain_accounts(&domain_id).delete(data.id()).await
    }

    async fn import(&self, ctx: &ProviderContext, id: &str) -> Result<ResourceData> {
        let parts = IMPORT.parse(id)?;
        let account = ctx
            .client()
            .domain_accounts(&parts[0])
            .find(&parts[1])
            .await?
            .ok_or_else(|| IMPORT.not_found("account_name", id))?;
        let mut data = ResourceData::default();
        data.set_id(account.id.clone());
        data.set("domain_id", parts[0].clone());
        fill(&mut data, &account);
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
    fn resources_sent_only_when_changed() {
        let prior = state(json!({"id": "a1", "resources": ["srv:SSH"]}));
        let data = ResourceData::for_update(
            prior.clone(),
            state(json!({"account_name": "admin", "resources": ["srv:SSH"]})),
        );
        assert!(body(&data).unwrap().resources.is_none());

        let data = ResourceData::for_update(
            prior,
            state(json!({"account_name": "admin", "resources": ["srv:SSH", "application:APP"]})),
        );
        assert_eq!(body(&data).unwrap().resources.unwrap().len(), 2);
    }

    #[test]
    fn rejects_malformed_resource() {
        let data = ResourceData::new(state(json!({"resources": ["srv"]})));
        assert_eq!(
            body(&data).unwrap_err(),
            Error::ValidationError(
                "resource must have format device:service or application:APP".into()
            )
        );
    }
}
