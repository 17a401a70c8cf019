//! Account credentials of device local domains and global domains.
//!
//! Credentials have no name of their own: an account holds at most one
//! credential per `type`, so the type is the natural key for search and import.

use super::common::{mark_gone, require_parent};
use crate::data::{Attributes, ResourceData};
use crate::import::ImportFormat;
use crate::resource::{ProviderContext, Resource};
use crate::schema::{Attribute, Schema, Validator};
use crate::Result;
use async_trait::async_trait;
use bastion_api::models::Credential;
use bastion_api::{BastionClient, Collection};
use bastion_core::Error;
use tracing::debug;

/// Account owning the credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CredentialOwner {
    /// Account of a device local domain.
    DeviceAccount,
    /// Account of a global domain.
    DomainAccount,
}

/// `wallix-bastion_device_localdomain_account_credential` and
/// `wallix-bastion_domain_account_credential`
pub(crate) struct CredentialResource {
    owner: CredentialOwner,
}

impl CredentialResource {
    pub(crate) const fn new(owner: CredentialOwner) -> Self {
        Self { owner }
    }

    fn import_format(&self) -> ImportFormat {
        match self.owner {
            CredentialOwner::DeviceAccount => {
                ImportFormat("<device_id>/<domain_id>/<account_id>/<type>")
            }
            CredentialOwner::DomainAccount => ImportFormat("<domain_id>/<account_id>/<type>"),
        }
    }

    /// Attributes locating the owning account, in path order.
    fn parent_keys(&self) -> &'static [&'static str] {
        match self.owner {
            CredentialOwner::DeviceAccount => &["device_id", "domain_id", "account_id"],
            CredentialOwner::DomainAccount => &["domain_id", "account_id"],
        }
    }

    fn collection<'a>(
        &self,
        client: &'a BastionClient,
        parents: &[String],
    ) -> Collection<'a, Credential> {
        match self.owner {
            CredentialOwner::DeviceAccount => {
                client.device_account_credentials(&parents[0], &parents[1], &parents[2])
            }
            CredentialOwner::DomainAccount => {
                client.domain_account_credentials(&parents[0], &parents[1])
            }
        }
    }

    fn parents(&self, data: &ResourceData) -> Vec<String> {
        self.parent_keys().iter().map(|k| data.get_str(k)).collect()
    }

    /// Location of the account, used in errors.
    fn owner_label(&self, parents: &[String]) -> String {
        match self.owner {
            CredentialOwner::DeviceAccount => format!(
                "account_id {}, domain_id {}, device_id {}",
                parents[2], parents[1], parents[0]
            ),
            CredentialOwner::DomainAccount => {
                format!("account_id {}, domain_id {}", parents[1], parents[0])
            }
        }
    }

    async fn check_parents(&self, client: &BastionClient, parents: &[String]) -> Result<()> {
        match self.owner {
            CredentialOwner::DeviceAccount => {
                let (device, domain, account) = (&parents[0], &parents[1], &parents[2]);
                require_parent(client.devices().get(device).await?, || {
                    format!("device with ID {device} doesn't exists")
                })?;
                require_parent(client.device_localdomains(device).get(domain).await?, || {
                    format!("domain_id with ID {domain} on device_id {device} doesn't exists")
                })?;
                require_parent(
                    client
                        .device_localdomain_accounts(device, domain)
                        .get(account)
                        .await?,
                    || {
                        format!(
                            "account_id with ID {account} on domain_id {domain}, device_id {device} doesn't exists"
                        )
                    },
                )?;
            }
            CredentialOwner::DomainAccount => {
                let (domain, account) = (&parents[0], &parents[1]);
                require_parent(client.domains().get(domain).await?, || {
                    format!("domain_id with ID {domain} doesn't exists")
                })?;
                require_parent(client.domain_accounts(domain).get(account).await?, || {
                    format!("account_id with ID {account} on domain_id {domain} doesn't exists")
                })?;
            }
        }
        Ok(())
    }
}

/// Id of the credential of the given type, if any.
async fn find_by_type(
    collection: &Collection<'_, Credential>,
    kind: &str,
) -> Result<Option<String>> {
    Ok(collection
        .list()
        .await?
        .into_iter()
        .find(|c| c.kind == kind)
        .map(|c| c.id))
}

/// Fetch a credential, ignoring one that is no longer linked to the account.
async fn get_linked(
    collection: &Collection<'_, Credential>,
    id: &str,
) -> Result<Option<Credential>> {
    let Some(credential) = collection.get(id).await? else {
        return Ok(None);
    };
    match find_by_type(collection, &credential.kind).await? {
        Some(linked) if linked == credential.id => Ok(Some(credential)),
        _ => {
            debug!(id, "credential exists but is not linked to the account");
            Ok(None)
        }
    }
}

fn body(data: &ResourceData) -> Credential {
    match data.get_str("type").as_str() {
        "ssh_key" => Credential::ssh_key(data.get_str("private_key"), data.get_str("passphrase")),
        "password" => Credential::password(data.get_str("password")),
        other => Credential {
            kind: other.to_string(),
            ..Credential::default()
        },
    }
}

fn fill(data: &mut ResourceData, credential: &Credential) {
    data.set("type", credential.kind.clone());
    data.set("public_key", credential.public_key.clone());
}

#[async_trait]
impl Resource for CredentialResource {
    fn type_name(&self) -> &'static str {
        match self.owner {
            CredentialOwner::DeviceAccount => {
                "wallix-bastion_device_localdomain_account_credential"
            }
            CredentialOwner::DomainAccount => "wallix-bastion_domain_account_credential",
        }
    }

    fn schema(&self) -> Schema {
        let mut schema = Schema::new();
        for key in self.parent_keys() {
            schema = schema.attr(*key, Attribute::string().required().force_new());
        }
        schema
            .attr(
                "type",
                Attribute::string()
                    .required()
                    .force_new()
                    .validate(Validator::StringInSlice(&["password", "ssh_key"])),
            )
            .attr(
                "passphrase",
                Attribute::string()
                    .optional()
                    .sensitive()
                    .required_with(&["private_key"]),
            )
            .attr("password", Attribute::string().optional().sensitive())
            .attr(
                "private_key",
                Attribute::string().optional().sensitive().force_new(),
            )
            .attr("public_key", Attribute::string().computed())
    }

    async fn create(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let client = ctx.client();
        let parents = self.parents(data);
        self.check_parents(client, &parents).await?;

        let kind = data.get_str("type");
        let what = format!("credential type {kind} on {}", self.owner_label(&parents));
        let collection = self.collection(client, &parents);
        if find_by_type(&collection, &kind).await?.is_some() {
            return Err(Error::Conflict(format!("{what} already exists")));
        }
        collection.create(&body(data)).await?;
        let id = find_by_type(&collection, &kind)
            .await?
            .ok_or_else(|| Error::NotFound(format!("{what} not found after POST")))?;
        data.set_id(id);
        self.read(ctx, data).await
    }

    async fn read(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let collection = self.collection(ctx.client(), &self.parents(data));
        match get_linked(&collection, data.id()).await? {
            Some(credential) => fill(data, &credential),
            None => mark_gone(data, self.type_name()),
        }
        Ok(())
    }

    async fn update(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        self.collection(ctx.client(), &self.parents(data))
            .update(data.id(), &body(data))
            .await?;
        self.read(ctx, data).await
    }

    async fn delete(&self, ctx: &ProviderContext, data: &ResourceData) -> Result<()> {
        self.collection(ctx.client(), &self.parents(data))
            .delete(data.id())
            .await
    }

    async fn import(&self, ctx: &ProviderContext, id: &str) -> Result<ResourceData> {
        let format = self.import_format();
        let mut parts = format.parse(id)?;
        let kind = parts.pop().unwrap_or_default();
        let collection = self.collection(ctx.client(), &parts);
        let credential_id = find_by_type(&collection, &kind)
            .await?
            .ok_or_else(|| format.not_found("credential", id))?;
        let credential = get_linked(&collection, &credential_id)
            .await?
            .ok_or_else(|| format.not_found("credential", id))?;

        let mut data = ResourceData::default();
        data.set_id(credential_id);
        for (key, value) in self.parent_keys().iter().zip(parts) {
            data.set(*key, value);
        }
        fill(&mut data, &credential);
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn body_depends_on_type() {
        let mut data = ResourceData::default();
        data.set("type", "ssh_key");
        data.set("private_key", "KEY");
        data.set("password", "ignored");
        assert_eq!(
            serde_json::to_value(body(&data)).unwrap(),
            json!({"type": "ssh_key", "private_key": "KEY"})
        );

        data.set("type", "password");
        assert_eq!(
            serde_json::to_value(body(&data)).unwrap(),
            json!({"type": "password", "password": "ignored"})
        );
    }

    #[test]
    fn schema_keys_follow_owner() {
        let device = CredentialResource::new(CredentialOwner::DeviceAccount).schema();
        assert!(device.get("device_id").is_some());
        let domain = CredentialResource::new(CredentialOwner::DomainAccount).schema();
        assert!(domain.get("device_id").is_none());
        assert!(domain.get("account_id").unwrap().is_force_new());
    }
}
