use super::common::{
    create_named, mark_gone, restriction_schema, restrictions_from, restrictions_value,
    strings_value,
};
use crate::data::{Attributes, ResourceData};
use crate::import::ImportFormat;
use crate::resource::{ProviderContext, Resource};
use crate::schema::{Attribute, Schema};
use crate::Result;
use async_trait::async_trait;
use bastion_api::models::UserGroup;

const IMPORT: ImportFormat = ImportFormat("<group_name>");

const RESTRICTION_SUBPROTOCOLS: &[&str] = &[
    "SSH_SHELL_SESSION",
    "SSH_REMOTE_COMMAND",
    "SSH_SCP_UP",
    "SSH_SCP_DOWN",
    "SFTP_SESSION",
    "RLOGIN",
    "TELNET",
    "RDP",
];

/// `wallix-bastion_usergroup`
pub(crate) struct UserGroupResource;

fn body(data: &ResourceData) -> UserGroup {
    UserGroup {
        group_name: data.get_str("group_name"),
        description: data.get_str("description"),
        profile: data.get_str("profile"),
        timeframes: data.get_strings("timeframes"),
        restrictions: restrictions_from(data),
        users: data
            .has_change("users")
            .then(|| data.get_strings("users")),
        ..UserGroup::default()
    }
}

fn fill(data: &mut ResourceData, group: &UserGroup) {
    data.set("group_name", group.group_name.clone());
    data.set("timeframes", strings_value(&group.timeframes));
    data.set("description", group.description.clone());
    data.set("profile", group.profile.clone());
    data.set("restrictions", restrictions_value(&group.restrictions));
    data.set(
        "users",
        strings_value(group.users.as_deref().unwrap_or_default()),
    );
}

#[async_trait]
impl Resource for UserGroupResource {
    fn type_name(&self) -> &'static str {
        "wallix-bastion_usergroup"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("group_name", Attribute::string().required())
            .attr("timeframes", Attribute::string_set().required())
            .attr("description", Attribute::string().optional())
            .attr("profile", Attribute::string().optional())
            .attr(
                "restrictions",
                Attribute::block_set(restriction_schema(RESTRICTION_SUBPROTOCOLS)).optional(),
            )
            .attr("users", Attribute::string_set().optional().computed())
    }

    async fn create(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let name = data.get_str("group_name");
        let id = create_named(
            &ctx.client().usergroups(),
            &name,
            &body(data),
            &format!("group_name {name}"),
        )
        .await?;
        data.set_id(id);
        self.read(ctx, data).await
    }

    async fn read(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        match ctx.client().usergroups().get(data.id()).await? {
            Some(group) => fill(data, &group),
            None => mark_gone(data, self.type_name()),
        }
        Ok(())
    }

    async fn update(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        ctx.client()
            .usergroups()
            .update(data.id(), &body(data))
            .await?;
        self.read(ctx, data).await
    }

    async fn delete(&self, ctx: &ProviderContext, data: &ResourceData) -> Result<()> {
        ctx.client().usergroups().delete(data.id()).await
    }

    async fn import(&self, ctx: &ProviderContext, id: &str) -> Result<ResourceData> {
        let parts = IMPORT.parse(id)?;
        let group = ctx
            .client()
            .usergroups()
            .find(&parts[0])
            .await?
            .ok_or_else(|| IMPORT.not_found("group_name", id))?;
        let mut data = ResourceData::default();
        data.set_id(group.id.clone());
        fill(&mut data, &group);
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn restrictions_always_sent() {
        let Value::Object(config) = json!({
            "group_name": "admins",
            "timeframes": ["allthetime"]
        }) else {
            unreachable!()
        };
        let value = serde_json::to_value(body(&ResourceData::new(config))).unwrap();
        assert_eq!(value["restrictions"], json!([]));
        assert!(value.get("users").is_none());
    }
}
