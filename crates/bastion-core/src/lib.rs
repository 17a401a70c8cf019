//! # bastion-core
//!
//! Core types and utilities for working with the WALLIX Bastion REST API.
//!
//! This crate provides the shared error type, HTTP service client, configuration
//! and API version handling used by the Bastion client and provider crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and HTTP status code mapping
//! - [`client`] - HTTP client utilities, authentication and retry logic
//! - [`config`] - Connection configuration with environment defaults
//! - [`query`] - Query parameter builder for Bastion list filters
//! - [`version`] - Ordered Bastion API versions

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod query;
pub mod version;

// Re-export commonly used types
pub use error::{Error, Result};
pub use version::ApiVersion;
