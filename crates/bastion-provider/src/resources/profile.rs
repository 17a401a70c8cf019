use super::common::{create_named, mark_gone, non_empty, strings_value};
use crate::data::{Attributes, Block, ResourceData};
use crate::import::ImportFormat;
use crate::resource::{ProviderContext, Resource};
use crate::schema::{Attribute, Schema, Validator};
use crate::Result;
use async_trait::async_trait;
use bastion_api::models::{GuiRights, Profile, TargetGroupsLimitation, UserGroupsLimitation};
use serde_json::{json, Value};

const IMPORT: ImportFormat = ImportFormat("<profile_name>");

const VIEW: &[&str] = &["view"];
const VIEW_MODIFY: &[&str] = &["view", "modify"];
const MODIFY: &[&str] = &["modify"];
const EXECUTE: &[&str] = &["execute"];

/// GUI rights and the values each accepts.
const GUI_RIGHTS: &[(&str, &[&str])] = &[
    ("wab_audit", VIEW),
    ("system_audit", VIEW),
    ("users", VIEW_MODIFY),
    ("user_groups", VIEW_MODIFY),
    ("devices", VIEW_MODIFY),
    ("target_groups", VIEW_MODIFY),
    ("authorizations", VIEW_MODIFY),
    ("profiles", MODIFY),
    ("wab_settings", VIEW_MODIFY),
    ("system_settings", MODIFY),
    ("backup", EXECUTE),
    ("approval", VIEW_MODIFY),
    ("credential_recovery", EXECUTE),
];

/// `wallix-bastion_profile`
pub(crate) struct ProfileResource;

fn gui_schema(with_wab_audit: bool) -> Schema {
    GUI_RIGHTS
        .iter()
        .filter(|(name, _)| with_wab_audit || *name != "wab_audit")
        .fold(Schema::new(), |schema, &(name, values)| {
            schema.attr(
                name,
                Attribute::string()
                    .optional()
                    .validate(Validator::StringInSlice(values)),
            )
        })
}

fn gui_rights(block: Option<&Block<'_>>, with_wab_audit: bool) -> GuiRights {
    let right = |key: &str| block.and_then(|b| non_empty(b.get_str(key)));
    GuiRights {
        wab_audit: if with_wab_audit { right("wab_audit") } else { None },
        system_audit: right("system_audit"),
        users: right("users"),
        user_groups: right("user_groups"),
        devices: right("devices"),
        target_groups: right("target_groups"),
        authorizations: right("authorizations"),
        profiles: right("profiles"),
        wab_settings: right("wab_settings"),
        system_settings: right("system_settings"),
        backup: right("backup"),
        approval: right("approval"),
        credential_recovery: right("credential_recovery"),
    }
}

fn gui_value(rights: &GuiRights, with_wab_audit: bool) -> Value {
    let mut block = json!({
        "system_audit": rights.system_audit,
        "users": rights.users,
        "user_groups": rights.user_groups,
        "devices": rights.devices,
        "target_groups": rights.target_groups,
        "authorizations": rights.authorizations,
        "profiles": rights.profiles,
        "wab_settings": rights.wab_settings,
        "system_settings": rights.system_settings,
        "backup": rights.backup,
        "approval": rights.approval,
        "credential_recovery": rights.credential_recovery,
    });
    if with_wab_audit {
        block["wab_audit"] = json!(rights.wab_audit);
    }
    json!([block])
}

fn body(data: &ResourceData, creating: bool) -> Profile {
    let mut profile = Profile {
        description: data.get_str("description"),
        ip_limitation: data.get_str("ip_limitation"),
        target_access: data.get_bool("target_access"),
        gui_features: gui_rights(data.get_blocks("gui_features").first(), true),
        gui_transmission: gui_rights(data.get_blocks("gui_transmission").first(), false),
        ..Profile::default()
    };
    if creating {
        profile.profile_name = data.get_str("profile_name");
    }
    let dashboards = data.get_strings("dashboards");
    if !dashboards.is_empty() {
        profile.dashboards = Some(dashboards);
    }
    if let Some(limit) = data.get_blocks("target_groups_limitation").first() {
        profile.target_groups_limitation = TargetGroupsLimitation {
            enabled: true,
            default_target_group: Some(non_empty(limit.get_str("default_target_group"))),
            target_groups: Some(limit.get_strings("target_groups")),
        };
    }
    if let Some(limit) = data.get_blocks("user_groups_limitation").first() {
        profile.user_groups_limitation = UserGroupsLimitation {
            enabled: true,
            user_groups: Some(limit.get_strings("user_groups")),
        };
    }
    profile
}

fn fill(data: &mut ResourceData, profile: &Profile) {
    data.set("profile_name", profile.profile_name.clone());
    data.set("gui_features", gui_value(&profile.gui_features, true));
    data.set("gui_transmission", gui_value(&profile.gui_transmission, false));
    data.set("description", profile.description.clone());
    data.set(
        "dashboards",
        strings_value(profile.dashboards.as_deref().unwrap_or_default()),
    );
    data.set("ip_limitation", profile.ip_limitation.clone());
    data.set("target_access", profile.target_access);

    let targets = &profile.target_groups_limitation;
    let value = if targets.enabled {
        json!([{
            "default_target_group": targets.default_target_group.clone().flatten().unwrap_or_default(),
            "target_groups": strings_value(targets.target_groups.as_deref().unwrap_or_default()),
        }])
    } else {
        json!([])
    };
    data.set("target_groups_limitation", value);

    let users = &profile.user_groups_limitation;
    let value = if users.enabled {
        json!([{
            "user_groups": strings_value(users.user_groups.as_deref().unwrap_or_default()),
        }])
    } else {
        json!([])
    };
    data.set("user_groups_limitation", value);
}

#[async_trait]
impl Resource for ProfileResource {
    fn type_name(&self) -> &'static str {
        "wallix-bastion_profile"
    }

    fn schema(&self) -> Schema {
        let target_groups = Schema::new()
            .attr("default_target_group", Attribute::string().required())
            .attr("target_groups", Attribute::string_set().required());
        let user_groups = Schema::new().attr("user_groups", Attribute::string_set().required());

        Schema::new()
            .attr("profile_name", Attribute::string().required().force_new())
            .attr(
                "gui_features",
                Attribute::block_list(gui_schema(true))
                    .required()
                    .max_items(1),
            )
            .attr(
                "gui_transmission",
                Attribute::block_list(gui_schema(false))
                    .required()
                    .max_items(1),
            )
            .attr("description", Attribute::string().optional())
            .attr("dashboards", Attribute::string_set().optional())
            .attr("ip_limitation", Attribute::string().optional())
            .attr("target_access", Attribute::bool().optional())
            .attr(
                "target_groups_limitation",
                Attribute::block_list(target_groups).optional().max_items(1),
            )
            .attr(
                "user_groups_limitation",
                Attribute::block_list(user_groups).optional().max_items(1),
            )
    }

    async fn create(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let name = data.get_str("profile_name");
        let id = create_named(
            &ctx.client().profiles(),
            &name,
            &body(data, true),
            &format!("profile_name {name}"),
        )
        .await?;
        data.set_id(id);
        self.read(ctx, data).await
    }

    async fn read(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        match ctx.client().profiles().get(data.id()).await? {
            Some(profile) => fill(data, &profile),
            None => mark_gone(data, self.type_name()),
        }
        Ok(())
    }

    async fn update(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        ctx.client()
            .profiles()
            .update(data.id(), &body(data, false))
            .await?;
        self.read(ctx, data).await
    }

    async fn delete(&self, ctx: &ProviderContext, data: &ResourceData) -> Result<()> {
        ctx.client().profiles().delete(data.id()).await
    }

    async fn import(&self, ctx: &ProviderContext, id: &str) -> Result<ResourceData> {
        let parts = IMPORT.parse(id)?;
        let profile = ctx
            .client()
            .profiles()
            .find(&parts[0])
            .await?
            .ok_or_else(|| IMPORT.not_found("profile_name", id))?;
        let mut data = ResourceData::default();
        data.set_id(profile.id.clone());
        fill(&mut data, &profile);
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gui_rights_validated_per_feature() {
        let schema = ProfileResource.schema();
        let Value::Object(config) = json!({
            "profile_name": "auditor",
            "gui_features": [{"wab_audit": "modify", "backup": "execute"}],
            "gui_transmission": [{"wab_audit": "view"}]
        }) else {
            unreachable!()
        };
        let err = schema.validate(&config).unwrap_err().to_string();
        assert!(err.contains("gui_features.0.wab_audit"));
        assert!(err.contains("unknown attribute \"gui_transmission.0.wab_audit\""));
        assert!(!err.contains("backup"));
    }

    #[test]
    fn limitation_block_enables_limitation() {
        let Value::Object(config) = json!({
            "profile_name": "auditor",
            "gui_features": [{"users": "view"}],
            "gui_transmission": [{}],
            "target_groups_limitation": [{"default_target_group": "", "target_groups": ["tg"]}]
        }) else {
            unreachable!()
        };
        let profile = body(&ResourceData::new(config), true);
        assert_eq!(profile.profile_name, "auditor");
        assert_eq!(profile.gui_features.users.as_deref(), Some("view"));
        assert!(profile.target_groups_limitation.enabled);
        assert_eq!(profile.target_groups_limitation.default_target_group, Some(None));
        assert!(!profile.user_groups_limitation.enabled);
    }
}
