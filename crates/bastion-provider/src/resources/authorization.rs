use super::common::{create_named, mark_gone, strings_value};
use crate::data::{Attributes, ResourceData};
use crate::import::ImportFormat;
use crate::resource::{ProviderContext, Resource};
use crate::schema::{Attribute, Schema};
use crate::Result;
use async_trait::async_trait;
use bastion_api::models::Authorization;

const IMPORT: ImportFormat = ImportFormat("<authorization_name>");

const GRANTS: &[&str] = &["authorize_sessions", "authorize_password_retrieval"];

/// `wallix-bastion_authorization`
pub(crate) struct AuthorizationResource;

fn body(data: &ResourceData, creating: bool) -> Authorization {
    let mut auth = Authorization {
        authorization_name: data.get_str("authorization_name"),
        description: data.get_str("description"),
        authorize_password_retrieval: data.get_bool("authorize_password_retrieval"),
        authorize_sessions: data.get_bool("authorize_sessions"),
        approval_required: data.get_bool("approval_required"),
        is_critical: data.get_bool("is_critical"),
        is_recorded: data.get_bool("is_recorded"),
        ..Authorization::default()
    };
    if creating {
        auth.user_group = data.get_str("user_group");
        auth.target_group = data.get_str("target_group");
    }
    if auth.approval_required {
        auth.active_quorum = Some(data.get_i64("active_quorum"));
        auth.inactive_quorum = Some(data.get_i64("inactive_quorum"));
        auth.approval_timeout = Some(data.get_i64("approval_timeout"));
        auth.approvers = Some(data.get_strings("approvers"));
        auth.has_comment = Some(data.get_bool("has_comment"));
        auth.has_ticket = Some(data.get_bool("has_ticket"));
        auth.mandatory_comment = Some(data.get_bool("mandatory_comment"));
        auth.mandatory_ticket = Some(data.get_bool("mandatory_ticket"));
        auth.single_connection = Some(data.get_bool("single_connection"));
    }
    let subprotocols = data.get_strings("subprotocols");
    if !subprotocols.is_empty() {
        auth.subprotocols = Some(subprotocols);
    }
    auth
}

fn fill(data: &mut ResourceData, auth: &Authorization) {
    data.set("authorization_name", auth.authorization_name.clone());
    data.set("user_group", auth.user_group.clone());
    data.set("target_group", auth.target_group.clone());
    data.set("description", auth.description.clone());
    data.set("authorize_password_retrieval", auth.authorize_password_retrieval);
    data.set("authorize_sessions", auth.authorize_sessions);
    data.set(
        "subprotocols",
        strings_value(auth.subprotocols.as_deref().unwrap_or_default()),
    );
    data.set("is_critical", auth.is_critical);
    data.set("is_recorded", auth.is_recorded);
    data.set("approval_required", auth.approval_required);
    data.set(
        "approvers",
        strings_value(auth.approvers.as_deref().unwrap_or_default()),
    );
    data.set("active_quorum", auth.active_quorum.unwrap_or(-1));
    data.set("inactive_quorum", auth.inactive_quorum.unwrap_or(-1));
    data.set("approval_timeout", auth.approval_timeout.unwrap_or_default());
    data.set("has_comment", auth.has_comment.unwrap_or_default());
    data.set("has_ticket", auth.has_ticket.unwrap_or_default());
    data.set("mandatory_comment", auth.mandatory_comment.unwrap_or_default());
    data.set("mandatory_ticket", auth.mandatory_ticket.unwrap_or_default());
    data.set("single_connection", auth.single_connection.unwrap_or_default());
}

#[async_trait]
impl Resource for AuthorizationResource {
    fn type_name(&self) -> &'static str {
        "wallix-bastion_authorization"
    }

    fn schema(&self) -> Schema {
        let approval = |attr: Attribute| attr.optional().required_with(&["approval_required"]);

        Schema::new()
            .attr("authorization_name", Attribute::string().required())
            .attr("user_group", Attribute::string().required().force_new())
            .attr("target_group", Attribute::string().required().force_new())
            .attr("description", Attribute::string().optional())
            .attr(
                "authorize_password_retrieval",
                Attribute::bool().optional().at_least_one_of(GRANTS),
            )
            .attr(
                "authorize_sessions",
                Attribute::bool()
                    .optional()
                    .required_with(&["subprotocols"])
                    .at_least_one_of(GRANTS),
            )
            .attr("subprotocols", Attribute::string_set().optional())
            .attr("is_critical", Attribute::bool().optional())
            .attr("is_recorded", Attribute::bool().optional())
            .attr(
                "approval_required",
                Attribute::bool().optional().required_with(&["approvers"]),
            )
            .attr("approvers", approval(Attribute::string_set()))
            .attr("active_quorum", Attribute::int().optional().default(-1))
            .attr("inactive_quorum", Attribute::int().optional().default(-1))
            .attr("approval_timeout", approval(Attribute::int()))
            .attr("has_comment", approval(Attribute::bool()))
            .attr("has_ticket", approval(Attribute::bool()))
            .attr("mandatory_comment", approval(Attribute::bool()))
            .attr("mandatory_ticket", approval(Attribute::bool()))
            .attr("single_connection", approval(Attribute::bool()))
    }

    async fn create(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let name = data.get_str("authorization_name");
        let id = create_named(
            &ctx.client().authorizations(),
            &name,
            &body(data, true),
            &format!("authorization_name {name}"),
        )
        .await?;
        data.set_id(id);
        self.read(ctx, data).await
    }

    async fn read(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        match ctx.client().authorizations().get(data.id()).await? {
            Some(auth) => fill(data, &auth),
            None => mark_gone(data, self.type_name()),
        }
        Ok(())
    }

    async fn update(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        ctx.client()
            .authorizations()
            .update(data.id(), &body(data, false))
            .await?;
        self.read(ctx, data).await
    }

    async fn delete(&self, ctx: &ProviderContext, data: &ResourceData) -> Result<()> {
        ctx.client().authorizations().delete(data.id()).await
    }

    async fn import(&self, ctx: &ProviderContext, id: &str) -> Result<ResourceData> {
        let parts = IMPORT.parse(id)?;
        let auth = ctx
            .client()
            .authorizations()
            .find(&parts[0])
            .await?
            .ok_or_else(|| IMPORT.not_found("authorization_name", id))?;
        let mut data = ResourceData::default();
        data.set_id(auth.id.clone());
        fill(&mut data, &auth);
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn approval_fields_follow_approval_required() {
        let Value::Object(config) = json!({
            "authorization_name": "admins-linux",
            "user_group": "admins",
            "target_group": "linux",
            "authorize_sessions": true,
            "subprotocols": ["SSH_SHELL_SESSION"],
            "active_quorum": -1
        }) else {
            unreachable!()
        };
        let mut data = ResourceData::new(config);
        let auth = body(&data, true);
        assert_eq!(auth.user_group, "admins");
        assert!(auth.active_quorum.is_none());

        data.set("approval_required", true);
        data.set("approvers", json!(["security"]));
        let auth = body(&data, false);
        assert_eq!(auth.user_group, "");
        assert_eq!(auth.active_quorum, Some(-1));
        assert_eq!(auth.approvers, Some(vec!["security".to_string()]));
        assert_eq!(auth.has_ticket, Some(false));
    }
}
