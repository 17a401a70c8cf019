//! Singleton X509 authentication settings.

use super::common::mark_gone;
use crate::data::{Attributes, ResourceData};
use crate::resource::{ProviderContext, Resource};
use crate::schema::{Attribute, Schema};
use crate::Result;
use async_trait::async_trait;
use bastion_api::models::X509Config;
use bastion_core::Error;

const ID: &str = "x509Config";

/// `wallix-bastion_config_x509`
pub(crate) struct ConfigX509Resource;

fn body(data: &ResourceData) -> X509Config {
    X509Config {
        ca_certificate: data.get_str("ca_certificate"),
        server_public_key: data.get_str("server_public_key"),
        server_private_key: data.get_str("server_private_key"),
        enable: data.get_bool("enable"),
    }
}

fn fill(data: &mut ResourceData, config: &X509Config) {
    data.set("ca_certificate", config.ca_certificate.clone());
    data.set("server_public_key", config.server_public_key.clone());
    data.set("server_private_key", config.server_private_key.clone());
    data.set("enable", config.enable);
}

#[async_trait]
impl Resource for ConfigX509Resource {
    fn type_name(&self) -> &'static str {
        "wallix-bastion_config_x509"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("ca_certificate", Attribute::string().optional())
            .attr("server_public_key", Attribute::string().required())
            .attr("server_private_key", Attribute::string().required())
            .attr("enable", Attribute::bool().optional())
    }

    async fn create(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        ctx.client().create_x509_config(&body(data)).await?;
        data.set_id(ID);
        self.read(ctx, data).await
    }

    async fn read(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        match ctx.client().x509_config().await? {
            Some(config) => fill(data, &config),
            None => mark_gone(data, self.type_name()),
        }
        Ok(())
    }

    async fn update(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        ctx.client().update_x509_config(&body(data)).await?;
        self.read(ctx, data).await
    }

    async fn delete(&self, ctx: &ProviderContext, _data: &ResourceData) -> Result<()> {
        ctx.client().delete_x509_config().await
    }

    /// Any id adopts the appliance configuration.
    async fn import(&self, ctx: &ProviderContext, _id: &str) -> Result<ResourceData> {
        let config = ctx
            .client()
            .x509_config()
            .await?
            .ok_or_else(|| Error::NotFound("no X509 configuration on the appliance".into()))?;
        let mut data = ResourceData::default();
        data.set_id(ID);
        fill(&mut data, &config);
        Ok(data)
    }
}
