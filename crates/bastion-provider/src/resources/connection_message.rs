//! Login and MOTD banners. The messages always exist on the appliance, so
//! creating one overwrites it and deleting one only forgets it.

use super::common::mark_gone;
use crate::data::{Attributes, ResourceData};
use crate::import::ImportFormat;
use crate::resource::{ProviderContext, Resource};
use crate::schema::{Attribute, Schema, Validator};
use crate::Result;
use async_trait::async_trait;
use bastion_api::models::ConnectionMessage;
use tracing::debug;

const IMPORT: ImportFormat = ImportFormat("<message_name>");

const MESSAGE_NAMES: &[&str] = &[
    "login_en", "login_fr", "login_de", "login_es", "login_ru", "motd_en", "motd_fr", "motd_de",
    "motd_es", "motd_ru",
];

/// `wallix-bastion_connection_message`
pub(crate) struct ConnectionMessageResource;

fn fill(data: &mut ResourceData, name: &str, message: &ConnectionMessage) {
    data.set("message_name", name);
    data.set("message", message.message.clone());
}

#[async_trait]
impl Resource for ConnectionMessageResource {
    fn type_name(&self) -> &'static str {
        "wallix-bastion_connection_message"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr(
                "message_name",
                Attribute::string()
                    .required()
                    .force_new()
                    .validate(Validator::StringInSlice(MESSAGE_NAMES)),
            )
            .attr("message", Attribute::string().required())
    }

    async fn create(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let name = data.get_str("message_name");
        let message = ConnectionMessage {
            message: data.get_str("message"),
        };
        ctx.client().put_connection_message(&name, &message).await?;
        data.set_id(name);
        self.read(ctx, data).await
    }

    async fn read(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let name = data.id().to_string();
        match ctx.client().connection_message(&name).await? {
            Some(message) => fill(data, &name, &message),
            None => mark_gone(data, self.type_name()),
        }
        Ok(())
    }

    async fn update(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let message = ConnectionMessage {
            message: data.get_str("message"),
        };
        ctx.client()
            .put_connection_message(data.id(), &message)
            .await?;
        self.read(ctx, data).await
    }

    async fn delete(&self, _ctx: &ProviderContext, data: &ResourceData) -> Result<()> {
        debug!(message_name = data.id(), "connection message left in place");
        Ok(())
    }

    async fn import(&self, ctx: &ProviderContext, id: &str) -> Result<ResourceData> {
        let parts = IMPORT.parse(id)?;
        let message = ctx
            .client()
            .connection_message(&parts[0])
            .await?
            .ok_or_else(|| IMPORT.not_found("message_name", id))?;
        let mut data = ResourceData::default();
        data.set_id(parts[0].clone());
        fill(&mut data, &parts[0], &message);
        Ok(data)
    }
}
