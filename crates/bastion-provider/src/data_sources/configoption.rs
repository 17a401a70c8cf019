use crate::data::{Attributes, ResourceData};
use crate::resource::{DataSource, ProviderContext};
use crate::schema::{Attribute, Schema};
use crate::Result;
use async_trait::async_trait;
use bastion_core::Error;
use serde_json::Value;

/// `wallix-bastion_configoption`
pub(crate) struct ConfigOptionDataSource;

#[async_trait]
impl DataSource for ConfigOptionDataSource {
    fn type_name(&self) -> &'static str {
        "wallix-bastion_configoption"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("config_id", Attribute::string().required())
            .attr("options_list", Attribute::string_set().optional())
            .attr("config_name", Attribute::string().computed())
            .attr("name", Attribute::string().computed())
            .attr("date", Attribute::string().computed())
            .attr("options", Attribute::string_list().computed())
    }

    async fn read(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let config_id = data.get_str("config_id");
        let config = ctx
            .client()
            .config_options(&config_id, data.get_strings("options_list"))
            .await?
            .ok_or_else(|| Error::NotFound(format!("config_id {config_id} doesn't exists")))?;
        // each option is an arbitrary object, kept as its JSON text
        let options: Vec<Value> = config
            .options
            .iter()
            .map(|option| Value::String(option.to_string()))
            .collect();
        data.set("config_name", config.config_name.clone());
        data.set("name", config.name.clone());
        data.set("date", config.date.clone());
        data.set("options", options);
        data.set_id(if config.id.is_empty() { config_id } else { config.id });
        Ok(())
    }
}
