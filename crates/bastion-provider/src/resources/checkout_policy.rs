use super::common::{create_named, mark_gone};
use crate::data::{Attributes, ResourceData};
use crate::import::ImportFormat;
use crate::resource::{ProviderContext, Resource};
use crate::schema::{Attribute, Schema};
use crate::Result;
use async_trait::async_trait;
use bastion_api::models::CheckoutPolicy;

const IMPORT: ImportFormat = ImportFormat("<checkout_policy_name>");

/// `wallix-bastion_checkout_policy`
pub(crate) struct CheckoutPolicyResource;

fn body(data: &ResourceData) -> CheckoutPolicy {
    CheckoutPolicy {
        checkout_policy_name: data.get_str("checkout_policy_name"),
        description: data.get_str("description"),
        enable_lock: data.get_bool("enable_lock"),
        change_credentials_at_checkin: data.get_bool("change_credentials_at_checkin"),
        duration: data.get_i64("duration"),
        extension: data.get_i64("extension"),
        max_duration: data.get_i64("max_duration"),
        ..CheckoutPolicy::default()
    }
}

fn fill(data: &mut ResourceData, policy: &CheckoutPolicy) {
    data.set("checkout_policy_name", policy.checkout_policy_name.clone());
    data.set("description", policy.description.clone());
    data.set("enable_lock", policy.enable_lock);
    data.set(
        "change_credentials_at_checkin",
        policy.change_credentials_at_checkin,
    );
    data.set("duration", policy.duration);
    data.set("extension", policy.extension);
    data.set("max_duration", policy.max_duration);
}

#[async_trait]
impl Resource for CheckoutPolicyResource {
    fn type_name(&self) -> &'static str {
        "wallix-bastion_checkout_policy"
    }

    fn schema(&self) -> Schema {
        let lock = &["enable_lock"];
        Schema::new()
            .attr("checkout_policy_name", Attribute::string().required())
            .attr("description", Attribute::string().optional())
            .attr(
                "enable_lock",
                Attribute::bool()
                    .optional()
                    .required_with(&["duration", "max_duration"]),
            )
            .attr(
                "change_credentials_at_checkin",
                Attribute::bool().optional().required_with(lock),
            )
            .attr("duration", Attribute::int().optional().required_with(lock))
            .attr("extension", Attribute::int().optional().required_with(lock))
            .attr(
                "max_duration",
                Attribute::int().optional().required_with(lock),
            )
    }

    async fn create(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let name = data.get_str("checkout_policy_name");
        let id = create_named(
            &ctx.client().checkout_policies(),
            &name,
            &body(data),
            &format!("checkout_policy_name {name}"),
        )
        .await?;
        data.set_id(id);
        self.read(ctx, data).await
    }

    async fn read(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        match ctx.client().checkout_policies().get(data.id()).await? {
            Some(policy) => fill(data, &policy),
            None => mark_gone(data, self.type_name()),
        }
        Ok(())
    }

    async fn update(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        ctx.client()
            .checkout_policies()
            .update(data.id(), &body(data))
            .await?;
        self.read(ctx, data).await
    }

    async fn delete(&self, ctx: &ProviderContext, data: &ResourceData) -> Result<()> {
        ctx.client().checkout_policies().delete(data.id()).await
    }

    async fn import(&self, ctx: &ProviderContext, id: &str) -> Result<ResourceData> {
        let parts = IMPORT.parse(id)?;
        let policy = ctx
            .client()
            .checkout_policies()
            .find(&parts[0])
            .await?
            .ok_or_else(|| IMPORT.not_found("checkout_policy_name", id))?;
        let mut data = ResourceData::default();
        data.set_id(policy.id.clone());
        fill(&mut data, &policy);
        Ok(data)
    }
}
