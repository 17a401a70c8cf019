use super::common::{create_named, mark_gone, require_parent, strings_value, PROTOCOLS};
use crate::data::{Attributes, ResourceData};
use crate::import::ImportFormat;
use crate::resource::{ProviderContext, Resource};
use crate::schema::{Attribute, Schema, Validator};
use crate::Result;
use async_trait::async_trait;
use bastion_api::models::DeviceService;
use bastion_core::{ApiVersion, Error};

const IMPORT: ImportFormat = ImportFormat("<device_id>/<service_name>");

const SSH_SUBPROTOCOLS: &[&str] = &[
    "SSH_SHELL_SESSION",
    "SSH_REMOTE_COMMAND",
    "SSH_SCP_UP",
    "SSH_SCP_DOWN",
    "SSH_X11",
    "SFTP_SESSION",
    "SSH_DIRECT_TCPIP",
    "SSH_REVERSE_TCPIP",
    "SSH_AUTH_AGENT",
];

const RDP_SUBPROTOCOLS: &[&str] = &[
    "RDP_CLIPBOARD_UP",
    "RDP_CLIPBOARD_DOWN",
    "RDP_CLIPBOARD_FILE",
    "RDP_PRINTER",
    "RDP_COM_PORT",
    "RDP_DRIVE",
    "RDP_SMARTCARD",
    "RDP_AUDIO_OUTPUT",
];

/// `wallix-bastion_device_service`
pub(crate) struct DeviceServiceResource;

fn check_subprotocols(protocol: &str, subprotocols: &[String]) -> Result<()> {
    for sub in subprotocols {
        let allowed = match protocol {
            "SSH" => SSH_SUBPROTOCOLS,
            "RDP" => RDP_SUBPROTOCOLS,
            other => {
                return Err(Error::ValidationError(format!(
                    "subprotocols need to not set for {other} service"
                )))
            }
        };
        if !allowed.contains(&sub.as_str()) {
            return Err(Error::ValidationError(format!(
                "subprotocols {sub} not valid for {protocol} service"
            )));
        }
    }
    Ok(())
}

fn body(data: &ResourceData, creating: bool) -> DeviceService {
    let subprotocols = data.get_strings("subprotocols");
    let mut service = DeviceService {
        connection_policy: data.get_str("connection_policy"),
        port: data.get_i64("port"),
        global_domains: data.get_strings("global_domains"),
        subprotocols: (!subprotocols.is_empty()).then_some(subprotocols),
        ..DeviceService::default()
    };
    if creating {
        service.service_name = data.get_str("service_name");
        service.protocol = data.get_str("protocol");
    }
    service
}

fn fill(data: &mut ResourceData, service: &DeviceService) {
    data.set("service_name", service.service_name.clone());
    data.set("connection_policy", service.connection_policy.clone());
    data.set("port", service.port);
    data.set("protocol", service.protocol.clone());
    data.set("global_domains", strings_value(&service.global_domains));
    data.set(
        "subprotocols",
        strings_value(service.subprotocols.as_deref().unwrap_or_default()),
    );
}

#[async_trait]
impl Resource for DeviceServiceResource {
    fn type_name(&self) -> &'static str {
        "wallix-bastion_device_service"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("device_id", Attribute::string().required().force_new())
            .attr("service_name", Attribute::string().required().force_new())
            .attr("connection_policy", Attribute::string().required())
            .attr(
                "port",
                Attribute::int()
                    .required()
                    .validate(Validator::IntBetween(1, 65535)),
            )
            .attr(
                "protocol",
                Attribute::string()
                    .required()
                    .force_new()
                    .validate(Validator::StringInSlice(PROTOCOLS)),
            )
            .attr("global_domains", Attribute::string_list().optional())
            .attr("subprotocols", Attribute::string_list().optional())
    }

    fn validate(&self, data: &ResourceData, _version: ApiVersion) -> Result<()> {
        check_subprotocols(&data.get_str("protocol"), &data.get_strings("subprotocols"))
    }

    async fn create(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let device_id = data.get_str("device_id");
        let client = ctx.client();
        require_parent(client.devices().get(&device_id).await?, || {
            format!("device with ID {device_id} doesn't exists")
        })?;

        let name = data.get_str("service_name");
        let id = create_named(
            &client.device_services(&device_id),
            &name,
            &body(data, true),
            &format!("service_name {name} on device_id {device_id}"),
        )
        .await?;
        data.set_id(id);
        self.read(ctx, data).await
    }

    async fn read(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let device_id = data.get_str("device_id");
        match ctx.client().device_services(&device_id).get(data.id()).await? {
            Some(service) => fill(data, &service),
            None => mark_gone(data, self.type_name()),
        }
        Ok(())
    }

    async fn update(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let device_id = data.get_str("device_id");
        ctx.client()
            .device_services(&device_id)
            .update(data.id(), &body(data, false))
            .await?;
        self.read(ctx, data).await
    }

    async fn delete(&self, ctx: &ProviderContext, data: &ResourceData) -> Result<()> {
        let device_id = data.get_str("device_id");
        ctx.client().device_services(&device_id).delete(data.id()).await
    }

    async fn import(&self, ctx: &ProviderContext, id: &str) -> Result<ResourceData> {
        let parts = IMPORT.parse(id)?;
        let service = ctx
            .client()
            .device_services(&parts[0])
            .find(&parts[1])
            .await?
            .ok_or_else(|| IMPORT.not_found("service_name", id))?;
        let mut data = ResourceData::default();
        data.set_id(service.id.clone());
        data.set("device_id", parts[0].clone());
        fill(&mut data, &service);
        Ok(data)
    }
}
