//! Users are addressed by name: the API has no separate identifier for them.

use super::common::{mark_gone, strings_value, LANGUAGES};
use crate::data::{Attributes, ResourceData};
use crate::import::ImportFormat;
use crate::resource::{ProviderContext, Resource};
use crate::schema::{Attribute, Schema, Validator};
use crate::Result;
use async_trait::async_trait;
use bastion_api::models::User;
use bastion_core::Error;

const IMPORT: ImportFormat = ImportFormat("<user_name>");

/// `wallix-bastion_user`
pub(crate) struct UserResource;

fn body(data: &ResourceData, creating: bool) -> User {
    let mut user = User {
        user_name: data.get_str("user_name"),
        display_name: data.get_str("display_name"),
        email: data.get_str("email"),
        ip_source: data.get_str("ip_source"),
        profile: data.get_str("profile"),
        ssh_public_key: data.get_str("ssh_public_key"),
        certificate_dn: data.get_str("certificate_dn"),
        expiration_date: data.get_str("expiration_date"),
        is_disabled: data.get_bool("is_disabled"),
        user_auths: data.get_strings("user_auths"),
        ..User::default()
    };
    if creating {
        user.preferred_language = data.get_str("preferred_language");
        user.password = data.get_str("password");
        if data.get_bool("force_change_pwd") {
            user.force_change_pwd = Some(true);
        }
    } else if data.has_change("password") && !data.get_bool("force_change_pwd") {
        user.password = data.get_str("password");
    }
    if data.has_change("groups") {
        user.groups = Some(data.get_strings("groups"));
    }
    user
}

fn fill(data: &mut ResourceData, user: &User) {
    data.set("user_name", user.user_name.clone());
    data.set("email", user.email.clone());
    data.set("profile", user.profile.clone());
    data.set("user_auths", strings_value(&user.user_auths));
    data.set("certificate_dn", user.certificate_dn.clone());
    data.set("display_name", user.display_name.clone());
    data.set("expiration_date", user.expiration_date.clone());
    data.set(
        "groups",
        strings_value(user.groups.as_deref().unwrap_or_default()),
    );
    data.set("ip_source", user.ip_source.clone());
    data.set("is_disabled", user.is_disabled);
    data.set("preferred_language", user.preferred_language.clone());
    data.set("ssh_public_key", user.ssh_public_key.clone());
}

#[async_trait]
impl Resource for UserResource {
    fn type_name(&self) -> &'static str {
        "wallix-bastion_user"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("user_name", Attribute::string().required().force_new())
            .attr("email", Attribute::string().required())
            .attr("profile", Attribute::string().required())
            .attr("user_auths", Attribute::string_set().required())
            .attr("certificate_dn", Attribute::string().optional())
            .attr("display_name", Attribute::string().optional())
            .attr("expiration_date", Attribute::string().optional())
            .attr("force_change_pwd", Attribute::bool().optional())
            .attr("groups", Attribute::string_set().optional().computed())
            .attr("ip_source", Attribute::string().optional())
            .attr("is_disabled", Attribute::bool().optional())
            .attr("password", Attribute::string().optional().sensitive())
            .attr(
                "preferred_language",
                Attribute::string()
                    .optional()
                    .computed()
                    .validate(Validator::StringInSlice(LANGUAGES)),
            )
            .attr("ssh_public_key", Attribute::string().optional())
    }

    async fn create(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let name = data.get_str("user_name");
        let users = ctx.client().users();
        if users.get(&name).await?.is_some() {
            return Err(Error::Conflict(format!("user_name {name} already exists")));
        }
        users.create(&body(data, true)).await?;
        data.set_id(name);
        self.read(ctx, data).await
    }

    async fn read(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let name = data.get_str("user_name");
        match ctx.client().users().get(&name).await? {
            Some(user) => fill(data, &user),
            None => mark_gone(data, self.type_name()),
        }
        Ok(())
    }

    async fn update(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        ctx.client()
            .users()
            .update(data.id(), &body(data, false))
            .await?;
        self.read(ctx, data).await
    }

    async fn delete(&self, ctx: &ProviderContext, data: &ResourceData) -> Result<()> {
        ctx.client().users().delete(data.id()).await
    }

    async fn import(&self, ctx: &ProviderContext, id: &str) -> Result<ResourceData> {
        let parts = IMPORT.parse(id)?;
        let user = ctx
            .client()
            .users()
            .get(&parts[0])
            .await?
            .ok_or_else(|| IMPORT.not_found("user_name", id))?;
        let mut data = ResourceData::default();
        data.set_id(user.user_name.clone());
        fill(&mut data, &user);
        Ok(data)
    }
}
