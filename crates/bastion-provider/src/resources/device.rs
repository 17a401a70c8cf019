use super::common::{create_named, mark_gone, strings_value};
use crate::data::{Attributes, ResourceData};
use crate::import::ImportFormat;
use crate::resource::{ProviderContext, Resource};
use crate::schema::{Attribute, Schema};
use crate::Result;
use async_trait::async_trait;
use bastion_api::models::Device;
use serde_json::{json, Value};

const IMPORT: ImportFormat = ImportFormat("<device_name>");

/// `wallix-bastion_device`
pub(crate) struct DeviceResource;

fn body(data: &ResourceData) -> Device {
    Device {
        device_name: data.get_str("device_name"),
        host: data.get_str("host"),
        alias: data.get_str("alias"),
        description: data.get_str("description"),
        ..Device::default()
    }
}

fn fill(data: &mut ResourceData, device: &Device) {
    data.set("device_name", device.device_name.clone());
    data.set("host", device.host.clone());
    data.set("alias", device.alias.clone());
    data.set("description", device.description.clone());

    let local_domains: Vec<Value> = device
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
                "ca_public_key": d.ca_public_key,
            })
        })
        .collect();
    data.set("local_domains", local_domains);

    let services: Vec<Value> = device
        .services
        .iter()
        .flatten()
        .map(|s| {
            json!({
                "id": s.id,
                "service_name": s.service_name,
                "connection_policy": s.connection_policy,
                "port": s.port,
                "protocol": s.protocol,
                "subprotocols": strings_value(s.subprotocols.as_deref().unwrap_or_default()),
                "global_domains": strings_value(&s.global_domains),
            })
        })
        .collect();
    data.set("services", services);
}

#[async_trait]
impl Resource for DeviceResource {
    fn type_name(&self) -> &'static str {
        "wallix-bastion_device"
    }

    fn schema(&self) -> Schema {
        let local_domain = Schema::new()
            .attr("id", Attribute::string().computed())
            .attr("domain_name", Attribute::string().computed())
            .attr("description", Attribute::string().computed())
            .attr("admin_account", Attribute::string().computed())
            .attr("enable_password_change", Attribute::bool().computed())
            .attr("password_change_policy", Attribute::string().computed())
            .attr("password_change_plugin", Attribute::string().computed())
            .attr("ca_public_key", Attribute::string().computed());
        let service = Schema::new()
            .attr("id", Attribute::string().computed())
            .attr("service_name", Attribute::string().computed())
            .attr("connection_policy", Attribute::string().computed())
            .attr("port", Attribute::int().computed())
            .attr("protocol", Attribute::string().computed())
            .attr("subprotocols", Attribute::string_list().computed())
            .attr("global_domains", Attribute::string_list().computed());

        Schema::new()
            .attr("device_name", Attribute::string().required())
            .attr("host", Attribute::string().required())
            .attr("alias", Attribute::string().optional())
            .attr("description", Attribute::string().optional())
            .attr("local_domains", Attribute::block_list(local_domain).computed())
            .attr("services", Attribute::block_list(service).computed())
    }

    async fn create(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let name = data.get_str("device_name");
        let id = create_named(
            &ctx.client().devices(),
            &name,
            &body(data),
            &format!("device_name {name}"),
        )
        .await?;
        data.set_id(id);
        self.read(ctx, data).await
    }

    async fn read(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        match ctx.client().devices().get(data.id()).await? {
            Some(device) => fill(data, &device),
            None => mark_gone(data, self.type_name()),
        }
        Ok(())
    }

    async fn update(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        ctx.client().devices().update(data.id(), &body(data)).await?;
        self.read(ctx, data).await
    }

    async fn delete(&self, ctx: &ProviderContext, data: &ResourceData) -> Result<()> {
        ctx.client().devices().delete(data.id()).await
    }

    async fn import(&self, ctx: &ProviderContext, id: &str) -> Result<ResourceData> {
        let parts = IMPORT.parse(id)?;
        let device = ctx
            .client()
            .devices()
            .find(&parts[0])
            .await?
            .ok_or_else(|| IMPORT.not_found("device_name", id))?;
        let mut data = ResourceData::default();
        data.set_id(device.id.clone());
        fill(&mut data, &device);
        Ok(data)
    }
}
