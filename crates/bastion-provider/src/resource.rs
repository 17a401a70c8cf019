//! Resource and data source traits.

use crate::data::ResourceData;
use crate::schema::Schema;
use crate::Result;
use async_trait::async_trait;
use bastion_api::BastionClient;
use bastion_core::{ApiVersion, Error};

/// API versions a resource type works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiSupport {
    /// Every supported version.
    All,
    /// Only the listed versions.
    Only(&'static [ApiVersion]),
    /// The given version and later.
    Since(ApiVersion),
}

impl ApiSupport {
    /// Whether `version` is allowed.
    #[must_use]
    pub fn allows(self, version: ApiVersion) -> bool {
        match self {
            Self::All => version.is_supported(),
            Self::Only(versions) => versions.contains(&version),
            Self::Since(min) => version.is_supported() && version >= min,
        }
    }
}

/// Shared state handed to every resource operation.
#[derive(Debug, Clone)]
pub struct ProviderContext {
    client: BastionClient,
    version: ApiVersion,
}

impl ProviderContext {
    /// Bundle a client with the API version it targets.
    #[must_use]
    pub fn new(client: BastionClient) -> Self {
        let version = client.api_version();
        Self { client, version }
    }

    /// Bastion client.
    #[must_use]
    pub fn client(&self) -> &BastionClient {
        &self.client
    }

    /// Configured API version.
    #[must_use]
    pub fn version(&self) -> ApiVersion {
        self.version
    }
}

/// A managed object type.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Resource: Send + Sync {
    /// Registered type name, e.g. `wallix-bastion_device`.
    fn type_name(&self) -> &'static str;

    /// Attribute schema.
    fn schema(&self) -> Schema;

    /// API versions this type works with.
    fn api_support(&self) -> ApiSupport {
        ApiSupport::All
    }

    /// Type to use instead when this one is gated out.
    fn successor(&self) -> Option<&'static str> {
        None
    }

    /// Checks that need more than the schema.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] when the configuration is rejected.
    fn validate(&self, _data: &ResourceData, _version: ApiVersion) -> Result<()> {
        Ok(())
    }

    /// Create the object and fill `data` from the API.
    async fn create(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()>;

    /// Refresh `data`; clears the id when the object is gone.
    async fn read(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()>;

    /// Update the object in place.
    async fn update(&self, _ctx: &ProviderContext, _data: &mut ResourceData) -> Result<()> {
        Err(Error::InvalidRequest(format!(
            "{} does not support in-place updates",
            self.type_name()
        )))
    }

    /// Delete the object.
    async fn delete(&self, ctx: &ProviderContext, data: &ResourceData) -> Result<()>;

    /// Adopt an existing object from its import id.
    async fn import(&self, ctx: &ProviderContext, id: &str) -> Result<ResourceData>;
}

/// A read-only lookup.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Registered type name.
    fn type_name(&self) -> &'static str;

    /// Attribute schema.
    fn schema(&self) -> Schema;

    /// API versions this type works with.
    fn api_support(&self) -> ApiSupport {
        ApiSupport::All
    }

    /// Fill computed attributes and the id.
    async fn read(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()>;
}
