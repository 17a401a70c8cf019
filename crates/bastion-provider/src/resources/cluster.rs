use super::common::{create_named, mark_gone, strings_value};
use crate::data::{Attributes, ResourceData};
use crate::import::ImportFormat;
use crate::resource::{ProviderContext, Resource};
use crate::schema::{Attribute, Schema};
use crate::Result;
use async_trait::async_trait;
use bastion_api::models::Cluster;

const IMPORT: ImportFormat = ImportFormat("<cluster_name>");

const TARGETS: &[&str] = &["accounts", "account_mappings", "interactive_logins"];

/// `wallix-bastion_cluster`
pub(crate) struct ClusterResource;

fn body(data: &ResourceData) -> Cluster {
    Cluster {
        cluster_name: data.get_str("cluster_name"),
        description: data.get_str("description"),
        accounts: data.get_strings("accounts"),
        account_mappings: data.get_strings("account_mappings"),
        interactive_logins: data.get_strings("interactive_logins"),
        ..Cluster::default()
    }
}

fn fill(data: &mut ResourceData, cluster: &Cluster) {
    data.set("cluster_name", cluster.cluster_name.clone());
    data.set("description", cluster.description.clone());
    data.set("accounts", strings_value(&cluster.accounts));
    data.set("account_mappings", strings_value(&cluster.account_mappings));
    data.set(
        "interactive_logins",
        strings_value(&cluster.interactive_logins),
    );
}

#[async_trait]
impl Resource for ClusterResource {
    fn type_name(&self) -> &'static str {
        "wallix-bastion_cluster"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .attr("cluster_name", Attribute::string().required())
            .attr("description", Attribute::string().optional())
            .attr(
                "accounts",
                Attribute::string_set().optional().at_least_one_of(TARGETS),
            )
            .attr(
                "account_mappings",
                Attribute::string_set().optional().at_least_one_of(TARGETS),
            )
            .attr(
                "interactive_logins",
                Attribute::string_set().optional().at_least_one_of(TARGETS),
            )
    }

    async fn create(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let name = data.get_str("cluster_name");
        let id = create_named(
            &ctx.client().clusters(),
            &name,
            &body(data),
            &format!("cluster_name {name}"),
        )
        .await?;
        data.set_id(id);
        self.read(ctx, data).await
    }

    async fn read(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        match ctx.client().clusters().get(data.id()).await? {
            Some(cluster) => fill(data, &cluster),
            None => mark_gone(data, self.type_name()),
        }
        Ok(())
    }

    async fn update(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        ctx.client()
            .clusters()
            .update(data.id(), &body(data))
            .await?;
        self.read(ctx, data).await
    }

    async fn delete(&self, ctx: &ProviderContext, data: &ResourceData) -> Result<()> {
        ctx.client().clusters().delete(data.id()).await
    }

    async fn import(&self, ctx: &ProviderContext, id: &str) -> Result<ResourceData> {
        let parts = IMPORT.parse(id)?;
        let cluster = ctx
            .client()
            .clusters()
            .find(&parts[0])
            .await?
            .ok_or_else(|| IMPORT.not_found("cluster_name", id))?;
        let mut data = ResourceData::default();
        data.set_id(cluster.id.clone());
        fill(&mut data, &cluster);
        Ok(data)
    }
}
