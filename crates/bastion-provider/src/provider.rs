//! Type registry and lifecycle entry points.
//!
//! [`Provider`] owns one [`ProviderContext`] and every resource and data source,
//! keyed by their `wallix-bastion_*` name. Each operation takes and returns plain JSON
//! objects, so a host state engine only has to store what it gets back.

use crate::data::ResourceData;
use crate::resource::{ApiSupport, DataSource, ProviderContext, Resource};
use crate::schema::{Plan, PlanAction, Schema};
use crate::{data_sources, resources, Result};
use bastion_api::BastionClient;
use bastion_core::config::BastionConfig;
use bastion_core::Error;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// JSON object holding the attributes of one instance, `id` included.
pub type State = Map<String, Value>;

/// WALLIX Bastion provider.
pub struct Provider {
    ctx: ProviderContext,
    resources: BTreeMap<&'static str, Box<dyn Resource>>,
    data_sources: BTreeMap<&'static str, Box<dyn DataSource>>,
}

impl std::fmt::Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider")
            .field("ctx", &self.ctx)
            .field("resources", &self.resources.keys().collect::<Vec<_>>())
            .field("data_sources", &self.data_sources.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Provider {
    /// Validate `config`, build a client and register every type.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an invalid configuration or unsupported API version.
    pub fn new(config: BastionConfig) -> Result<Self> {
        let config = config.validated()?;
        let client = BastionClient::from_config(&config)?;
        Ok(Self::with_client(client))
    }

    /// Register every type on top of an existing client.
    #[must_use]
    pub fn with_client(client: BastionClient) -> Self {
        Self::with_types(
            ProviderContext::new(client),
            resources::all(),
            data_sources::all(),
        )
    }

    pub(crate) fn with_types(
        ctx: ProviderContext,
        resources: Vec<Box<dyn Resource>>,
        data_sources: Vec<Box<dyn DataSource>>,
    ) -> Self {
        Self {
            ctx,
            resources: resources.into_iter().map(|r| (r.type_name(), r)).collect(),
            data_sources: data_sources
                .into_iter()
                .map(|d| (d.type_name(), d))
                .collect(),
        }
    }

    /// Shared client and API version.
    #[must_use]
    pub fn context(&self) -> &ProviderContext {
        &self.ctx
    }

    /// Registered resource type names, sorted.
    pub fn resource_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.resources.keys().copied()
    }

    /// Registered data source type names, sorted.
    pub fn data_source_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.data_sources.keys().copied()
    }

    /// Attribute schema of a resource type.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown type.
    pub fn resource_schema(&self, type_name: &str) -> Result<Schema> {
        Ok(self.resource(type_name)?.schema())
    }

    /// Attribute schema of a data source type.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown type.
    pub fn data_source_schema(&self, type_name: &str) -> Result<Schema> {
        Ok(self.data_source(type_name)?.schema())
    }

    fn resource(&self, type_name: &str) -> Result<&dyn Resource> {
        let resource = self
            .resources
            .get(type_name)
            .ok_or_else(|| Error::NotFound(format!("unknown resource type {type_name}")))?;
        self.check_support(type_name, resource.api_support(), resource.successor())?;
        Ok(resource.as_ref())
    }

    fn data_source(&self, type_name: &str) -> Result<&dyn DataSource> {
        let source = self
            .data_sources
            .get(type_name)
            .ok_or_else(|| Error::NotFound(format!("unknown data source type {type_name}")))?;
        self.check_support(type_name, source.api_support(), None)?;
        Ok(source.as_ref())
    }

    fn check_support(
        &self,
        type_name: &str,
        support: ApiSupport,
        successor: Option<&str>,
    ) -> Result<()> {
        let version = self.ctx.version();
        if support.allows(version) {
            Ok(())
        } else {
            Err(Error::unsupported_version(type_name, version, successor))
        }
    }

    /// Schema checks, defaults, then the resource's own checks.
    fn prepare(&self, resource: &dyn Resource, mut config: State) -> Result<State> {
        let schema = resource.schema();
        schema.validate(&config)?;
        schema.apply_defaults(&mut config);
        resource.validate(&ResourceData::new(config.clone()), self.ctx.version())?;
        Ok(config)
    }

    /// Diff `config` against `prior` state without touching the API.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown type, `UnsupportedApiVersion` when the type
    /// is gated out, or `ValidationError` for a rejected configuration.
    pub fn plan(&self, type_name: &str, prior: Option<&State>, config: State) -> Result<Plan> {
        let resource = self.resource(type_name)?;
        let config = self.prepare(resource, config)?;
        let plan = resource.schema().plan(prior, &config);
        debug!(
            resource = type_name,
            action = ?plan.action,
            changed = ?plan.changed,
            "planned"
        );
        Ok(plan)
    }

    /// Create an instance from its configuration and return the new state.
    ///
    /// # Errors
    ///
    /// Returns validation errors before any call, or the API error that stopped
    /// the creation.
    pub async fn create(&self, type_name: &str, config: State) -> Result<State> {
        let resource = self.resource(type_name)?;
        let config = self.prepare(resource, config)?;
        let mut data = ResourceData::new(config);
        resource.create(&self.ctx, &mut data).await?;
        if data.is_gone() {
            return Err(Error::InternalError(format!(
                "{type_name} disappeared right after creation"
            )));
        }
        debug!(resource = type_name, id = %data.id(), "created");
        Ok(self.finish(type_name, &resource.schema(), data))
    }

    /// Refresh `state`; `None` means the instance is gone.
    ///
    /// # Errors
    ///
    /// Returns the API error for failures other than a missing instance.
    pub async fn read(&self, type_name: &str, state: State) -> Result<Option<State>> {
        let resource = self.resource(type_name)?;
        let mut data = ResourceData::from_state(state);
        resource.read(&self.ctx, &mut data).await?;
        if data.is_gone() {
            return Ok(None);
        }
        Ok(Some(self.finish(type_name, &resource.schema(), data)))
    }

    /// Apply `config` to the instance described by `prior` in place.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` when a changed attribute forces a replacement, which
    /// the caller handles with [`Provider::delete`] then [`Provider::create`].
    pub async fn update(&self, type_name: &str, prior: State, config: State) -> Result<State> {
        let resource = self.resource(type_name)?;
        let config = self.prepare(resource, config)?;
        let schema = resource.schema();
        let plan = schema.plan(Some(&prior), &config);
        match plan.action {
            PlanAction::NoOp => return Ok(prior),
            PlanAction::Replace => {
                return Err(Error::InvalidRequest(format!(
                    "{type_name}: changing {} requires replacement",
                    plan.requires_replace.join(", ")
                )))
            }
            PlanAction::Create | PlanAction::Update => {}
        }
        let changed = plan.changed.clone();
        let mut data = ResourceData::from_plan(prior, plan);
        resource.update(&self.ctx, &mut data).await?;
        if data.is_gone() {
            return Err(Error::NotFound(format!(
                "{type_name} disappeared during update"
            )));
        }
        debug!(resource = type_name, id = %data.id(), ?changed, "updated");
        Ok(self.finish(type_name, &schema, data))
    }

    /// Delete the instance described by `state`.
    ///
    /// # Errors
    ///
    /// Returns the API error that stopped the deletion.
    pub async fn delete(&self, type_name: &str, state: State) -> Result<()> {
        let resource = self.resource(type_name)?;
        let data = ResourceData::from_state(state);
        resource.delete(&self.ctx, &data).await?;
        debug!(resource = type_name, id = %data.id(), "deleted");
        Ok(())
    }

    /// Adopt an existing instance from its import id.
    ///
    /// # Errors
    ///
    /// Returns `InvalidImportId` for a malformed id or `NotFound` when nothing matches.
    pub async fn import(&self, type_name: &str, id: &str) -> Result<State> {
        let resource = self.resource(type_name)?;
        let data = resource.import(&self.ctx, id).await?;
        if data.is_gone() {
            return Err(Error::NotFound(format!("{type_name} {id} not found")));
        }
        debug!(resource = type_name, id = %data.id(), "imported");
        Ok(self.finish(type_name, &resource.schema(), data))
    }

    /// Run a data source lookup and return its state.
    ///
    /// # Errors
    ///
    /// Returns validation errors, or `NotFound` when the lookup matches nothing.
    pub async fn read_data_source(&self, type_name: &str, mut config: State) -> Result<State> {
        let source = self.data_source(type_name)?;
        let schema = source.schema();
        schema.validate(&config)?;
        schema.apply_defaults(&mut config);
        let mut data = ResourceData::new(config);
        source.read(&self.ctx, &mut data).await?;
        Ok(self.finish(type_name, &schema, data))
    }

    fn finish(&self, type_name: &str, schema: &Schema, data: ResourceData) -> State {
        let state = data.into_state();
        debug!(
            resource = type_name,
            version = %self.ctx.version(),
            state = ?schema.redact(&state),
            "state"
        );
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{MockDataSource, MockResource};
    use crate::schema::Attribute;
    use bastion_api::BastionClientBuilder;
    use bastion_core::ApiVersion;
    use serde_json::json;

    fn context(version: ApiVersion) -> ProviderContext {
        let client = BastionClientBuilder::new(
            format!("https://bastion.test/api/{version}/"),
            version,
        )
        .unwrap()
        .with_token("admin", "token")
        .build()
        .unwrap();
        ProviderContext::new(client)
    }

    fn object(value: Value) -> State {
        let Value::Object(map) = value else {
            unreachable!()
        };
        map
    }

    fn mock_resource(name: &'static str, support: ApiSupport) -> MockResource {
        let mut resource = MockResource::new();
        resource.expect_type_name().return_const(name);
        resource.expect_api_support().return_const(support);
        resource.expect_successor().return_const(None::<&'static str>);
        resource.expect_schema().returning(|| {
            Schema::new()
                .attr("name", Attribute::string().required().force_new())
                .attr("comment", Attribute::string().optional().default("none"))
                .attr("secret", Attribute::string().optional().sensitive())
        });
        resource
    }

    #[test]
    fn unknown_type_is_not_found() {
        let provider = Provider::with_types(context(ApiVersion::V3_8), Vec::new(), Vec::new());
        let err = provider.plan("wallix-bastion_nope", None, State::new()).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn gated_type_reports_version() {
        let mut resource = mock_resource("wallix-bastion_legacy", ApiSupport::Since(ApiVersion::V3_8));
        resource.expect_create().never();
        let provider = Provider::with_types(
            context(ApiVersion::V3_6),
            vec![Box::new(resource)],
            Vec::new(),
        );
        let err = provider
            .create("wallix-bastion_legacy", object(json!({"name": "a"})))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedApiVersion { .. }));
    }

    #[tokio::test]
    async fn create_applies_defaults_before_calling_resource() {
        let mut resource = mock_resource("wallix-bastion_thing", ApiSupport::All);
        resource.expect_validate().returning(|_, _| Ok(()));
        resource.expect_create().returning(|_, data| {
            assert_eq!(data.attrs()["comment"], json!("none"));
            data.set_id("42");
            Ok(())
        });
        let provider = Provider::with_types(
            context(ApiVersion::V3_8),
            vec![Box::new(resource)],
            Vec::new(),
        );
        let state = provider
            .create("wallix-bastion_thing", object(json!({"name": "a"})))
            .await
            .unwrap();
        assert_eq!(state["id"], json!("42"));
    }

    #[tokio::test]
    async fn import_uses_resource_lookup() {
        let mut resource = mock_resource("wallix-bastion_thing", ApiSupport::All);
        resource.expect_import().returning(|_, id| {
            let mut data = ResourceData::default();
            data.set_id(id);
            data.set("name", "a");
            Ok(data)
        });
        let provider = Provider::with_types(
            context(ApiVersion::V3_12),
            vec![Box::new(resource)],
            Vec::new(),
        );
        let state = provider.import("wallix-bastion_thing", "a").await.unwrap();
        assert_eq!(state["id"], json!("a"));
        assert_eq!(state["name"], json!("a"));
    }

    #[tokio::test]
    async fn replacement_is_not_done_in_place() {
        let mut resource = mock_resource("wallix-bastion_thing", ApiSupport::All);
        resource.expect_validate().returning(|_, _| Ok(()));
        resource.expect_update().never();
        let provider = Provider::with_types(
            context(ApiVersion::V3_8),
            vec![Box::new(resource)],
            Vec::new(),
        );
        let prior = object(json!({"id": "1", "name": "a", "comment": "none"}));
        let err = provider
            .update("wallix-bastion_thing", prior, object(json!({"name": "b"})))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(m) if m.contains("name")));
    }

    #[tokio::test]
    async fn unchanged_config_keeps_prior_state() {
        let mut resource = mock_resource("wallix-bastion_thing", ApiSupport::All);
        resource.expect_validate().returning(|_, _| Ok(()));
        resource.expect_update().never();
        let provider = Provider::with_types(
            context(ApiVersion::V3_8),
            vec![Box::new(resource)],
            Vec::new(),
        );
        let prior = object(json!({"id": "1", "name": "a", "comment": "none"}));
        let state = provider
            .update("wallix-bastion_thing", prior.clone(), object(json!({"name": "a"})))
            .await
            .unwrap();
        assert_eq!(state, prior);
    }

    #[tokio::test]
    async fn data_source_gets_defaults() {
        let mut source = MockDataSource::new();
        source.expect_type_name().return_const("wallix-bastion_lookup");
        source.expect_api_support().return_const(ApiSupport::All);
        source
            .expect_schema()
            .returning(|| Schema::new().attr("key", Attribute::string().optional().default("k")));
        source.expect_read().returning(|_, data| {
            let key = data.attrs()["key"].clone();
            data.set_id(key.as_str().unwrap_or_default());
            Ok(())
        });
        let provider = Provider::with_types(
            context(ApiVersion::V3_8),
            Vec::new(),
            vec![Box::new(source)],
        );
        let state = provider
            .read_data_source("wallix-bastion_lookup", State::new())
            .await
            .unwrap();
        assert_eq!(state["id"], json!("k"));
    }
}
