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

const IMPORT: ImportFormat = ImportFormat("<device_id>/<domain_id>/<account_name>");

/// `wallix-bastion_device_localdomain_account`
pub(crate) struct DeviceAccountResource;

fn body(data: &ResourceData) -> Account {
    Account {
        account_name: data.get_str("account_name"),
        account_login: data.get_str("account_login"),
        checkout_policy: data.get_str("checkout_policy"),
        auto_change_password: data.get_bool("auto_change_password"),
        auto_change_ssh_key: Some(data.get_bool("auto_change_ssh_key")),
        certificate_validity: Some(data.get_str("certificate_validity")),
        description: data.get_str("description"),
        services: Some(data.get_strings("services")),
        ..Account::default()
    }
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
        "services",
        strings_value(account.services.as_deref().unwrap_or_default()),
    );
}

#[async_trait]
impl Resource for DeviceAccountResource {
    fn type_name(&self) -> &'static str {
        "wallix-bastion_device_localdomain_account"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("device_id", Attribute::string().required().force_new())
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
            .attr("services", Attribute::string_set().optional())
            .attr("domain_password_change", Attribute::bool().computed())
            .attr(
                "credentials",
                Attribute::block_list(credential_block_schema()).computed(),
            )
    }

    async fn create(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let device_id = data.get_str("device_id");
        let domain_id = data.get_str("domain_id");
        let client = ctx.client();
        require_parent(client.devices().get(&device_id).await?, || {
            format!("device with ID {device_id} doesn't exists")
        })?;
        require_parent(
            client.device_localdomains(&device_id).get(&domain_id).await?,
            || format!("domain_id with ID {domain_id} on device_id {device_id} doesn't exists"),
        )?;

        let name = data.get_str("account_name");
        let id = create_named(
            &client.device_localdomain_accounts(&device_id, &domain_id),
            &name,
            &body(data),
            &format!("account_name {name} on domain_id {domain_id}, device_id {device_id}"),
        )
        .await?;
        data.set_id(id);
        self.read(ctx, data).await
    }

    async fn read(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let device_id = data.get_str("device_id");
        let domain_id = data.get_str("domain_id");
        match ctx
            .client()
            .device_localdomain_accounts(&device_id, &domain_id)
            .get(data.id())
            .await?
        {
            Some(account) => fill(data, &account),
            None => mark_gone(data, self.type_name()),
        }
        Ok(())
    }

    async fn update(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let device_id = data.get_str("device_id");
        let domain_id = data.get_str("domain_id");
        ctx.client()
            .device_localdomain_accounts(&device_id, &domain_id)
            .update(data.id(), &body(data))
            .await?;
        self.read(ctx, data).await
    }

    async fn delete(&self, ctx: &ProviderContext, data: &ResourceData) -> Result<()> {
        let device_id = data.get_str("device_id");
        let domain_id = data.get_str("domain_id");
        ctx.client()
            .device_localdomain_accounts(&device_id, &domain_id)
            .delete(data.id())
            .await
    }

    async fn import(&self, ctx: &ProviderContext, id: &str) -> Result<ResourceData> {
        let parts = IMPORT.parse(id)?;
        let account = ctx
            .client()
            .device_localdomain_accounts(&parts[0], &parts[1])
            .find(&parts[2])
            .await?
            .ok_or_else(|| IMPORT.not_found("account_name", id))?;
        let mut data = ResourceData::default();
        data.set_id(account.id.clone());
        data.set("device_id", parts[0].clone());
        data.set("domain_id", parts[1].clone());
        fill(&mut data, &account);
        Ok(data)
    }
}
