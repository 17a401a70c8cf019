use super::common::{create_named, mark_gone, non_empty, strings_value};
use crate::data::{Attributes, ResourceData};
use crate::import::ImportFormat;
use crate::resource::{ProviderContext, Resource};
use crate::schema::{Attribute, Schema, Validator};
use crate::Result;
use async_trait::async_trait;
use bastion_api::models::{Application, ApplicationPath};
use bastion_core::{ApiVersion, Error};
use serde_json::{json, Value};

const IMPORT: ImportFormat = ImportFormat("<application_name>");

const STANDARD: &str = "standard";
const JUMPHOST: &str = "jumphost";

/// `wallix-bastion_application`
pub(crate) struct ApplicationResource;

fn invalid(message: &str) -> Error {
    Error::ValidationError(message.to_string())
}

/// Attributes allowed or required by the application category.
fn check_category(data: &ResourceData, version: ApiVersion) -> Result<()> {
    match data.get_str("category").as_str() {
        JUMPHOST => {
            if version < ApiVersion::V3_12 {
                return Err(Error::ValidationError(format!(
                    "category = jumphost not available with api version {version}"
                )));
            }
            if data.is_set("target") {
                return Err(invalid("target cannot be configured when category = jumphost"));
            }
            if data.is_set("paths") {
                return Err(invalid("paths cannot be configured when category = jumphost"));
            }
            if data.is_set("global_domains") {
                return Err(invalid(
                    "global_domains cannot be configured when category = jumphost",
                ));
            }
            if !data.is_set("application_url") {
                return Err(invalid(
                    "application_url must be specified when category = jumphost",
                ));
            }
            if !data.is_set("browser") {
                return Err(invalid("browser must be specified when category = jumphost"));
            }
        }
        _ => {
            for key in ["application_url", "browser", "browser_version"] {
                if data.is_set(key) {
                    return Err(Error::ValidationError(format!(
                        "{key} cannot be configured when category = standard"
                    )));
                }
            }
            if !data.is_set("target") {
                return Err(invalid("target must be specified when category = standard"));
            }
            if !data.is_set("paths") {
                return Err(invalid("paths must be specified when category = standard"));
            }
        }
    }
    Ok(())
}

fn body(data: &ResourceData, version: ApiVersion, creating: bool) -> Application {
    let category = data.get_str("category");
    let mut app = Application {
        application_name: data.get_str("application_name"),
        connection_policy: data.get_str("connection_policy"),
        description: data.get_str("description"),
        parameters: data.get_str("parameters"),
        ..Application::default()
    };
    if creating && version >= ApiVersion::V3_12 {
        app.category = category.clone();
    }
    if category == JUMPHOST {
        app.application_url = Some(data.get_str("application_url"));
        app.browser = Some(data.get_str("browser"));
        app.browser_version = Some(data.get_str("browser_version"));
    } else {
        app.target = Some(data.get_str("target"));
        app.global_domains = Some(data.get_strings("global_domains"));
        app.paths = Some(
            data.get_blocks("paths")
                .iter()
                .map(|path| ApplicationPath {
                    target: path.get_str("target"),
                    program: path.get_str("program"),
                    working_dir: path.get_str("working_dir"),
                })
                .collect(),
        );
    }
    app
}

fn fill(data: &mut ResourceData, app: &Application) {
    data.set("application_name", app.application_name.clone());
    data.set("connection_policy", app.connection_policy.clone());
    data.set(
        "category",
        non_empty(app.category.clone()).unwrap_or_else(|| STANDARD.to_string()),
    );
    data.set("application_url", app.application_url.clone().unwrap_or_default());
    data.set("browser", app.browser.clone().unwrap_or_default());
    data.set("browser_version", app.browser_version.clone().unwrap_or_default());
    data.set("description", app.description.clone());
    data.set(
        "global_domains",
        strings_value(app.global_domains.as_deref().unwrap_or_default()),
    );
    data.set("parameters", app.parameters.clone());
    data.set("target", app.target.clone().unwrap_or_default());

    let paths: Vec<Value> = app
        .paths
        .iter()
        .flatten()
        .map(|p| json!({"target": p.target, "program": p.program, "working_dir": p.working_dir}))
        .collect();
    data.set("paths", paths);

    let local_domains: Vec<Value> = app
        .local_domains
        .iter()
        .flatten()
        .map(|d| {
            json!({
                "id": d.id,
                "domain_name": d.domain_name,
                "description": d.description,
                "admin_account": d.admin_account.clone().unwrap_or_default(),
                "enable_password_change": d.enable_password_change,
                "password_change_policy": d.password_change_policy,
                "password_change_plugin": d.password_change_plugin,
            })
        })
        .collect();
    data.set("local_domains", local_domains);
}

#[async_trait]
impl Resource for ApplicationResource {
    fn type_name(&self) -> &'static str {
        "wallix-bastion_application"
    }

    fn schema(&self) -> Schema {
        let path = Schema::new()
            .attr("target", Attribute::string().required())
            .attr("program", Attribute::string().required())
            .attr("working_dir", Attribute::string().optional().default(""));
        let local_domain = Schema::new()
            .attr("id", Attribute::string().computed())
            .attr("admin_account", Attribute::string().computed())
            .attr("domain_name", Attribute::string().computed())
            .attr("description", Attribute::string().computed())
            .attr("enable_password_change", Attribute::bool().computed())
            .attr("password_change_policy", Attribute::string().computed())
            .attr("password_change_plugin", Attribute::string().computed());

        Schema::new()
            .attr("application_name", Attribute::string().required())
            .attr("connection_policy", Attribute::string().required())
            .attr(
                "category",
                Attribute::string()
                    .optional()
                    .force_new()
                    .default(STANDARD)
                    .validate(Validator::StringInSlice(&[STANDARD, JUMPHOST])),
            )
            .attr("application_url", Attribute::string().optional())
            .attr("browser", Attribute::string().optional())
            .attr("browser_version", Attribute::string().optional())
            .attr("description", Attribute::string().optional())
            .attr("global_domains", Attribute::string_set().optional())
            .attr("parameters", Attribute::string().optional())
            .attr("paths", Attribute::block_set(path).optional())
            .attr("target", Attribute::string().optional())
            .attr("local_domains", Attribute::block_list(local_domain).computed())
    }

    fn validate(&self, data: &ResourceData, version: ApiVersion) -> Result<()> {
        check_category(data, version)
    }

    async fn create(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let name = data.get_str("application_name");
        let id = create_named(
            &ctx.client().applications(),
            &name,
            &body(data, ctx.version(), true),
            &format!("application_name {name}"),
        )
        .await?;
        data.set_id(id);
        self.read(ctx, data).await
    }

    async fn read(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        match ctx.client().applications().get(data.id()).await? {
            Some(app) => fill(data, &app),
            None => mark_gone(data, self.type_name()),
        }
        Ok(())
    }

    async fn update(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        ctx.client()
            .applications()
            .update(data.id(), &body(data, ctx.version(), false))
            .await?;
        self.read(ctx, data).await
    }

    async fn delete(&self, ctx: &ProviderContext, data: &ResourceData) -> Result<()> {
        ctx.client().applications().delete(data.id()).await
    }

    async fn import(&self, ctx: &ProviderContext, id: &str) -> Result<ResourceData> {
        let parts = IMPORT.parse(id)?;
        let app = ctx
            .client()
            .applications()
            .find(&parts[0])
            .await?
            .ok_or_else(|| IMPORT.not_found("application_name", id))?;
        let mut data = ResourceData::default();
        data.set_id(app.id.clone());
        fill(&mut data, &app);
        Ok(data)
    }
}
