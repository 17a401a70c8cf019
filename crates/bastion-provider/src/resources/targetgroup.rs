use super::common::{
    create_named, mark_gone, restriction_schema, restrictions_from, restrictions_value,
};
use crate::data::{Attributes, Block, ResourceData};
use crate::import::ImportFormat;
use crate::resource::{ProviderContext, Resource};
use crate::schema::{Attribute, Schema, Validator};
use crate::Result;
use async_trait::async_trait;
use bastion_api::models::{
    PasswordRetrieval, TargetAccount, TargetEndpoint, TargetGroup, TargetSession,
};
use bastion_core::{ApiVersion, Error};
use serde_json::{json, Value};

const IMPORT: ImportFormat = ImportFormat("<group_name>");

const DOMAIN_LOCAL: &str = "local";
const DOMAIN_GLOBAL: &str = "global";

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

/// `wallix-bastion_targetgroup`
pub(crate) struct TargetGroupResource;

fn bad(section: &str, reason: impl AsRef<str>) -> Error {
    Error::ValidationError(format!("bad {section}: {}", reason.as_ref()))
}

/// Accounts scoped by `domain_type`: global domains take no target.
fn check_domain_account(section: &str, block: &Block<'_>) -> Result<()> {
    let device = block.get_str("device");
    let application = block.get_str("application");
    match block.get_str("domain_type").as_str() {
        DOMAIN_GLOBAL if !device.is_empty() || !application.is_empty() => Err(bad(
            section,
            "device and application need to be null with domain_type=global",
        )),
        DOMAIN_LOCAL if device.is_empty() && application.is_empty() => Err(bad(
            section,
            "device or application need to be set with domain_type=local",
        )),
        DOMAIN_GLOBAL | DOMAIN_LOCAL => Ok(()),
        _ if !device.is_empty() && !application.is_empty() => {
            Err(bad(section, "device and application mutually exclusive"))
        }
        _ => Ok(()),
    }
}

/// A device/service pair or an application; `required` forbids neither.
fn check_target(section: &str, block: &Block<'_>, required: bool) -> Result<()> {
    let device = block.get_str("device");
    let service = block.get_str("service");
    let application = block.get_str("application");
    if required && (device.is_empty() || service.is_empty()) && application.is_empty() {
        return Err(bad(section, "device/service or application need to be set"));
    }
    if !device.is_empty() && !application.is_empty() {
        return Err(bad(section, "device and application mutually exclusive"));
    }
    if !service.is_empty() && !application.is_empty() {
        return Err(bad(section, "service and application mutually exclusive"));
    }
    if !device.is_empty() && service.is_empty() {
        return Err(bad(section, format!("missing service for device {device}")));
    }
    if !service.is_empty() && device.is_empty() {
        return Err(bad(section, format!("missing device for service {service}")));
    }
    Ok(())
}

fn target_account(block: &Block<'_>, with_service: bool) -> TargetAccount {
    TargetAccount {
        account: block.get_str("account"),
        domain: block.get_str("domain"),
        domain_type: block.get_str("domain_type"),
        device: block.get_str("device"),
        service: with_service.then(|| block.get_str("service")),
        application: block.get_str("application"),
    }
}

fn target_endpoint(block: &Block<'_>) -> TargetEndpoint {
    TargetEndpoint {
        device: block.get_str("device"),
        service: block.get_str("service"),
        application: block.get_str("application"),
    }
}

fn body(data: &ResourceData) -> TargetGroup {
    let accounts = |key: &str, with_service: bool| -> Vec<TargetAccount> {
        data.get_blocks(key)
            .iter()
            .map(|b| target_account(b, with_service))
            .collect()
    };
    let endpoints = |key: &str| -> Vec<TargetEndpoint> {
        data.get_blocks(key).iter().map(target_endpoint).collect()
    };
    TargetGroup {
        group_name: data.get_str("group_name"),
        description: data.get_str("description"),
        password_retrieval: PasswordRetrieval {
            accounts: accounts("password_retrieval_accounts", false),
        },
        restrictions: restrictions_from(data),
        session: TargetSession {
            accounts: accounts("session_accounts", true),
            account_mappings: endpoints("session_account_mappings"),
            interactive_logins: endpoints("session_interactive_logins"),
            scenario_accounts: accounts("session_scenario_accounts", false),
        },
        ..TargetGroup::default()
    }
}

fn accounts_value(accounts: &[TargetAccount], with_service: bool) -> Value {
    Value::Array(
        accounts
            .iter()
            .map(|a| {
                let mut block = json!({
                    "account": a.account,
                    "domain": a.domain,
                    "domain_type": a.domain_type,
                    "device": a.device,
                    "application": a.application,
                });
                if with_service {
                    block["service"] = json!(a.service.clone().unwrap_or_default());
                }
                block
            })
            .collect(),
    )
}

fn endpoints_value(endpoints: &[TargetEndpoint]) -> Value {
    Value::Array(
        endpoints
            .iter()
            .map(|e| json!({"device": e.device, "service": e.service, "application": e.application}))
            .collect(),
    )
}

fn fill(data: &mut ResourceData, group: &TargetGroup) {
    data.set("group_name", group.group_name.clone());
    data.set("description", group.description.clone());
    data.set(
        "password_retrieval_accounts",
        accounts_value(&group.password_retrieval.accounts, false),
    );
    data.set("restrictions", restrictions_value(&group.restrictions));
    data.set(
        "session_accounts",
        accounts_value(&group.session.accounts, true),
    );
    data.set(
        "session_account_mappings",
        endpoints_value(&group.session.account_mappings),
    );
    data.set(
        "session_interactive_logins",
        endpoints_value(&group.session.interactive_logins),
    );
    data.set(
        "session_scenario_accounts",
        accounts_value(&group.session.scenario_accounts, false),
    );
}

fn account_schema(with_service: bool) -> Schema {
    let schema = Schema::new()
        .attr("account", Attribute::string().required())
        .attr("domain", Attribute::string().required())
        .attr(
            "domain_type",
            Attribute::string()
                .required()
                .validate(Validator::StringInSlice(&[DOMAIN_LOCAL, DOMAIN_GLOBAL])),
        )
        .attr("device", Attribute::string().optional().default(""))
        .attr("application", Attribute::string().optional().default(""));
    if with_service {
        schema.attr("service", Attribute::string().optional().default(""))
    } else {
        schema
    }
}

fn endpoint_schema() -> Schema {
    Schema::new()
        .attr("device", Attribute::string().optional().default(""))
        .attr("service", Attribute::string().optional().default(""))
        .attr("application", Attribute::string().optional().default(""))
}

#[async_trait]
impl Resource for TargetGroupResource {
    fn type_name(&self) -> &'static str {
        "wallix-bastion_targetgroup"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("group_name", Attribute::string().required())
            .attr("description", Attribute::string().optional())
            .attr(
                "password_retrieval_accounts",
                Attribute::block_set(account_schema(false)).optional(),
            )
            .attr(
                "restrictions",
                Attribute::block_set(restriction_schema(RESTRICTION_SUBPROTOCOLS)).optional(),
            )
            .attr(
                "session_accounts",
                Attribute::block_set(account_schema(true)).optional(),
            )
            .attr(
                "session_account_mappings",
                Attribute::block_set(endpoint_schema()).optional(),
            )
            .attr(
                "session_interactive_logins",
                Attribute::block_set(endpoint_schema()).optional(),
            )
            .attr(
                "session_scenario_accounts",
                Attribute::block_set(account_schema(false)).optional(),
            )
    }

    fn validate(&self, data: &ResourceData, _version: ApiVersion) -> Result<()> {
        for section in ["password_retrieval_accounts", "session_scenario_accounts"] {
            for block in data.get_blocks(section) {
                check_domain_account(section, &block)?;
            }
        }
        for block in data.get_blocks("session_accounts") {
            check_target("session_accounts", &block, true)?;
        }
        for section in ["session_account_mappings", "session_interactive_logins"] {
            for block in data.get_blocks(section) {
                check_target(section, &block, false)?;
            }
        }
        Ok(())
    }

    async fn create(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let name = data.get_str("group_name");
        let id = create_named(
            &ctx.client().targetgroups(),
            &name,
            &body(data),
            &format!("group_name {name}"),
        )
        .await?;
        data.set_id(id);
        self.read(ctx, data).await
    }

    async fn read(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        match ctx.client().targetgroups().get(data.id()).await? {
            Some(group) => fill(data, &group),
            None => mark_gone(data, self.type_name()),
        }
        Ok(())
    }

    async fn update(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        ctx.client()
            .targetgroups()
            .update(data.id(), &body(data))
            .await?;
        self.read(ctx, data).await
    }

    async fn delete(&self, ctx: &ProviderContext, data: &ResourceData) -> Result<()> {
        ctx.client().targetgroups().delete(data.id()).await
    }

    async fn import(&self, ctx: &ProviderContext, id: &str) -> Result<ResourceData> {
        let parts = IMPORT.parse(id)?;
        let group = ctx
            .client()
            .targetgroups()
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

    fn check(config: Value) -> Result<()> {
        let Value::Object(config) = config else {
            unreachable!()
        };
        TargetGroupResource.validate(&ResourceData::new(config), ApiVersion::V3_8)
    }

    #[test]
    fn global_accounts_take_no_target() {
        let err = check(json!({
            "group_name": "tg",
            "password_retrieval_accounts": [
                {"account": "admin", "domain": "corp", "domain_type": "global", "device": "srv"}
            ]
        }))
        .unwrap_err();
        assert_eq!(
            err,
            bad(
                "password_retrieval_accounts",
                "device and application need to be null with domain_type=global"
            )
        );
    }

    #[test]
    fn session_targets_pair_device_and_service() {
        let err = check(json!({
            "group_name": "tg",
            "session_account_mappings": [{"device": "srv"}]
        }))
        .unwrap_err();
        assert_eq!(
            err,
            bad("session_account_mappings", "missing service for device srv")
        );

        let err = check(json!({
            "group_name": "tg",
            "session_accounts": [
                {"account": "root", "domain": "local", "domain_type": "local", "application": "app", "service": "SSH"}
            ]
        }))
        .unwrap_err();
        assert_eq!(
            err,
            bad("session_accounts", "service and application mutually exclusive")
        );

        check(json!({
            "group_name": "tg",
            "session_interactive_logins": [{"device": "srv", "service": "SSH"}]
        }))
        .unwrap();
    }

    #[test]
    fn password_retrieval_omits_service() {
        let Value::Object(config) = json!({
            "group_name": "tg",
            "password_retrieval_accounts": [
                {"account": "root", "domain": "local", "domain_type": "local", "device": "srv", "application": ""}
            ]
        }) else {
            unreachable!()
        };
        let value = serde_json::to_value(body(&ResourceData::new(config))).unwrap();
        assert!(value["password_retrieval"]["accounts"][0].get("service").is_none());
        assert_eq!(value["session"]["accounts"], json!([]));
    }
}
