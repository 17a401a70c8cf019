//! # bastion-provider
//!
//! Declarative management of WALLIX Bastion objects.
//!
//! Every `wallix-bastion_*` resource and data source is registered in a [`Provider`],
//! which validates configurations against their [`schema::Schema`], plans changes,
//! and drives the create/read/update/delete/import lifecycle through
//! [`bastion_api::BastionClient`]. State is exchanged as plain JSON objects.
//!
//! ## Modules
//!
//! - [`schema`] - Attribute schemas, validation and planning
//! - [`data`] - Resource state handed to implementations
//! - [`resource`] - Resource and data source traits
//! - [`import`] - Import id formats
//! - [`provider`] - Type registry and lifecycle entry points

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod data;
mod data_sources;
pub mod import;
pub mod provider;
pub mod resource;
mod resources;
pub mod schema;

pub use data::{Attributes, ResourceData};
pub use provider::{Provider, State};
pub use resource::{ApiSupport, DataSource, ProviderContext, Resource};
pub use schema::{Attribute, Plan, PlanAction, Schema, Validator};

/// Convenient result alias matching the shared Bastion error type.
pub type Result<T> = bastion_core::Result<T>;
