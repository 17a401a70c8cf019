use crate::data::ResourceData;
use crate::resource::{DataSource, ProviderContext};
use crate::schema::{Attribute, Schema};
use crate::Result;
use async_trait::async_trait;
use bastion_api::models::VersionInfo;

const DECIMALS: &[&str] = &[
    "version_decimal",
    "wab_version_decimal",
    "wab_version_hotfix_decimal",
];

/// `wallix-bastion_version`
pub(crate) struct VersionDataSource;

/// Decimals are exposed as strings with six digits, e.g. `3.120000`.
fn decimal(value: f64) -> String {
    format!("{value:.6}")
}

fn fill(data: &mut ResourceData, info: &VersionInfo) {
    data.set("version", info.version.clone());
    data.set("version_decimal", decimal(info.version_decimal));
    data.set("wab_version", info.wab_version.clone());
    data.set("wab_version_decimal", decimal(info.wab_version_decimal));
    data.set("wab_version_hotfix", info.wab_version_hotfix.clone());
    data.set(
        "wab_version_hotfix_decimal",
        decimal(info.wab_version_hotfix_decimal),
    );
    data.set("wab_complete_version", info.wab_complete_version.clone());
}

#[async_trait]
impl DataSource for VersionDataSource {
    fn type_name(&self) -> &'static str {
        "wallix-bastion_version"
    }

    fn schema(&self) -> Schema {
        let schema = Schema::new()
            .attr("version", Attribute::string().computed())
            .attr("wab_version", Attribute::string().computed())
            .attr("wab_version_hotfix", Attribute::string().computed())
            .attr("wab_complete_version", Attribute::string().computed());
        DECIMALS
            .iter()
            .fold(schema, |schema, &key| {
                schema.attr(key, Attribute::string().computed())
            })
    }

    async fn read(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let info = ctx.client().version().await?;
        fill(data, &info);
        data.set_id("version");
        Ok(())
    }
}
