//! Typed client and data models for the WALLIX Bastion REST API.
//!
//! [`BastionClient`] targets one versioned API root (`/api/v3.x/`) and exposes every
//! collection the provider manages as a [`Collection`] handle, plus the singleton
//! appliance endpoints (X509, encryption, configuration options, version).

#![deny(missing_docs)]

pub mod client;
mod endpoints;
pub mod models;

pub use client::{BastionClient, BastionClientBuilder, Collection};
pub use models::{Account, Credential, Named};

/// Convenient result alias matching the shared Bastion error type.
pub type Result<T> = bastion_core::Result<T>;
