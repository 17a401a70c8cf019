//! Appliance encryption passphrase. The API has no delete, so destroying the
//! resource only forgets it.

use super::common::mark_gone;
use crate::data::{Attributes, ResourceData};
use crate::resource::{ProviderContext, Resource};
use crate::schema::{Attribute, Schema};
use crate::Result;
use async_trait::async_trait;
use bastion_api::models::{EncryptionChange, EncryptionStatus};
use bastion_core::{ApiVersion, Error};
use tracing::debug;

const ID: &str = "encryption";

/// `wallix-bastion_encryption`
pub(crate) struct EncryptionResource;

/// Whether the vault is usable with the given API version.
fn is_ready(status: &EncryptionStatus, version: ApiVersion) -> bool {
    if version >= ApiVersion::V3_12 {
        status.sealed_state.as_deref() == Some("unsealed")
    } else {
        status.encryption.as_deref() == Some("ready")
    }
}

#[async_trait]
impl Resource for EncryptionResource {
    fn type_name(&self) -> &'static str {
        "wallix-bastion_encryption"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("current_passphrase", Attribute::string().optional().sensitive())
            .attr("new_passphrase", Attribute::string().required().sensitive())
    }

    async fn create(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let change = EncryptionChange {
            new_passphrase: data.get_str("new_passphrase"),
            ..EncryptionChange::default()
        };
        ctx.client().set_encryption(&change).await?;
        data.set_id(ID);
        self.read(ctx, data).await
    }

    async fn read(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let status = ctx.client().encryption_status().await?;
        if !is_ready(&status, ctx.version()) {
            mark_gone(data, self.type_name());
        }
        Ok(())
    }

    async fn update(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        if data.has_change("current_passphrase") || data.has_change("new_passphrase") {
            let change = EncryptionChange {
                passphrase: data.get_str("current_passphrase"),
                new_passphrase: data.get_str("new_passphrase"),
            };
            ctx.client().set_encryption(&change).await?;
        }
        self.read(ctx, data).await
    }

    async fn delete(&self, _ctx: &ProviderContext, _data: &ResourceData) -> Result<()> {
        debug!("encryption cannot be removed, forgetting it");
        Ok(())
    }

    async fn import(&self, ctx: &ProviderContext, _id: &str) -> Result<ResourceData> {
        let status = ctx.client().encryption_status().await?;
        if !is_ready(&status, ctx.version()) {
            return Err(Error::NotFound("encryption is not initialized".into()));
        }
        let mut data = ResourceData::default();
        data.set_id(ID);
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readiness_depends_on_version() {
        let legacy = EncryptionStatus {
            encryption: Some("ready".into()),
            sealed_state: None,
        };
        let vault = EncryptionStatus {
            encryption: None,
            sealed_state: Some("unsealed".into()),
        };
        assert!(is_ready(&legacy, ApiVersion::V3_8));
        assert!(!is_ready(&legacy, ApiVersion::V3_12));
        assert!(is_ready(&vault, ApiVersion::V3_12));
        assert!(!is_ready(&vault, ApiVersion::V3_3));
    }
}
