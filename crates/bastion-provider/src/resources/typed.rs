//! Resources sharing one collection that holds several object flavours,
//! told apart by the `type` field (`/externalauths`, `/authdomains`).

use super::common::{create_named, mark_gone};
use crate::data::{Attributes, ResourceData};
use crate::import::ImportFormat;
use crate::resource::{ApiSupport, ProviderContext, Resource};
use crate::schema::Schema;
use crate::Result;
use async_trait::async_trait;
use bastion_api::models::Named;
use bastion_api::{BastionClient, Collection};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;

/// One flavour of a typed collection.
pub(crate) trait Flavour: Send + Sync + 'static {
    type Model: Serialize + DeserializeOwned + Named + Send + Sync;

    const TYPE_NAME: &'static str;
    const IMPORT: ImportFormat;
    const SUPPORT: ApiSupport = ApiSupport::All;

    fn collection(client: &BastionClient) -> Collection<'_, Self::Model>;

    fn schema() -> Schema;

    fn body(data: &ResourceData) -> Self::Model;

    fn fill(data: &mut ResourceData, model: &Self::Model);
}

pub(crate) struct TypedResource<F>(PhantomData<fn() -> F>);

impl<F> TypedResource<F> {
    pub(crate) const fn new() -> Self {
        Self(PhantomData)
    }
}

#[async_trait]
impl<F: Flavour> Resource for TypedResource<F> {
    fn type_name(&self) -> &'static str {
        F::TYPE_NAME
    }

    fn schema(&self) -> Schema {
        F::schema()
    }

    fn api_support(&self) -> ApiSupport {
        F::SUPPORT
    }

    async fn create(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let field = <F::Model as Named>::NAME_FIELD;
        let name = data.get_str(field);
        let id = create_named(
            &F::collection(ctx.client()),
            &name,
            &F::body(data),
            &format!("{field} {name}"),
        )
        .await?;
        data.set_id(id);
        self.read(ctx, data).await
    }

    async fn read(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        match F::collection(ctx.client()).get(data.id()).await? {
            Some(model) => F::fill(data, &model),
            None => mark_gone(data, F::TYPE_NAME),
        }
        Ok(())
    }

    async fn update(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        F::collection(ctx.client())
            .update(data.id(), &F::body(data))
            .await?;
        self.read(ctx, data).await
    }

    async fn delete(&self, ctx: &ProviderContext, data: &ResourceData) -> Result<()> {
        F::collection(ctx.client()).delete(data.id()).await
    }

    async fn import(&self, ctx: &ProviderContext, id: &str) -> Result<ResourceData> {
        let parts = F::IMPORT.parse(id)?;
        let model = F::collection(ctx.client())
            .find(&parts[0])
            .await?
            .ok_or_else(|| F::IMPORT.not_found(<F::Model as Named>::NAME_FIELD, id))?;
        let mut data = ResourceData::default();
        data.set_id(model.id().to_string());
        F::fill(&mut data, &model);
        Ok(data)
    }
}
