use super::common::{
    create_named, fill_account_common, mark_gone, require_parent, CHECKOUT_POLICY_DEFAULT,
};
use crate::data::{Attributes, ResourceData};
use crate::import::ImportFormat;
use crate::resource::{ProviderContext, Resource};
use crate::schema::{Attribute, Schema};
use crate::Result;
use async_trait::async_trait;
use bastion_api::models::{Account, Credential};

const IMPORT: ImportFormat = ImportFormat("<application_id>/<domain_id>/<account_name>");

/// `wallix-bastion_application_localdomain_account`
pub(crate) struct ApplicationAccountResource;

fn body(data: &ResourceData) -> Account {
    let password = data.get_str("password");
    let credentials = if password.is_empty() {
        Vec::new()
    } else {
        vec![Credential::password(password)]
    };
    Account {
        account_name: data.get_str("account_name"),
        account_login: data.get_str("account_login"),
        checkout_policy: data.get_str("checkout_policy"),
        auto_change_password: data.get_bool("auto_change_password"),
        description: data.get_str("description"),
        credentials: Some(credentials),
        ..Account::default()
    }
}

#[async_trait]
impl Resource for ApplicationAccountResource {
    fn type_name(&self) -> &'static str {
        "wallix-bastion_application_localdomain_account"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("application_id", Attribute::string().required().force_new())
            .attr("domain_id", Attribute::string().required().force_new())
            .attr("account_name", Attribute::string().required())
            .attr("account_login", Attribute::string().required())
            .attr("auto_change_password", Attribute::bool().optional())
            .attr(
                "checkout_policy",
                Attribute::string()
                    .optional()
                    .default(CHECKOUT_POLICY_DEFAULT),
            )
            .attr("description", Attribute::string().optional())
            .attr("password", Attribute::string().optional().sensitive())
            .attr("domain_password_change", Attribute::bool().computed())
    }

    async fn create(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let application_id = data.get_str("application_id");
        let domain_id = data.get_str("domain_id");
        let client = ctx.client();
        require_parent(client.applications().get(&application_id).await?, || {
            format!("application with ID {application_id} doesn't exists")
        })?;
        require_parent(
            client
                .application_localdomains(&application_id)
                .get(&domain_id)
                .await?,
            || {
                format!(
                    "domain_id with ID {domain_id} on application_id {application_id} doesn't exists"
                )
            },
        )?;

        let name = data.get_str("account_name");
        let id = create_named(
            &client.application_localdomain_accounts(&application_id, &domain_id),
            &name,
            &body(data),
            &format!(
                "account_name {name} on domain_id {domain_id}, application_id {application_id}"
            ),
        )
        .await?;
        data.set_id(id);
        self.read(ctx, data).await
    }

    async fn read(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let application_id = data.get_str("application_id");
        let domain_id = data.get_str("domain_id");
        match ctx
            .client()
            .application_localdomain_accounts(&application_id, &domain_id)
            .get(data.id())
            .await?
        {
            Some(account) => fill_account_common(data, &account),
            None => mark_gone(data, self.type_name()),
        }
        Ok(())
    }

    async fn update(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let application_id = data.get_str("application_id");
        let domain_id = data.get_str("domain_id");
        ctx.client()
            .application_localdomain_accounts(&application_id, &domain_id)
            .update(data.id(), &body(data))
            .await?;
        self.read(ctx, data).await
    }

    async fn delete(&self, ctx: &ProviderContext, data: &ResourceData) -> Result<()> {
        let application_id = data.get_str("application_id");
        let domain_id = data.get_str("domain_id");
        ctx.client()
            .application_localdomain_accounts(&application_id, &domain_id)
            .delete(data.id())
            .await
    }

    async fn import(&self, ctx: &ProviderContext, id: &str) -> Result<ResourceData> {
        let parts = IMPORT.parse(id)?;
        let account = ctx
            .client()
            .application_localdomain_accounts(&parts[0], &parts[1])
            .find(&parts[2])
            .await?
            .ok_or_else(|| IMPORT.not_found("account_name", id))?;
        let mut data = ResourceData::default();
        data.set_id(account.id.clone());
        data.set("application_id", parts[0].clone());
        data.set("domain_id", parts[1].clone());
        fill_account_common(&mut data, &account);
        Ok(data)
    }
}
