//! Typed accessors for every Bastion endpoint family.
//!
//! Each submodule adds methods on [`crate::BastionClient`] returning a
//! [`crate::Collection`] bound to the right path, plus the few singleton
//! endpoints that do not follow the collection layout.

mod access;
mod appliance;
mod applications;
mod auth;
mod devices;
mod domains;
mod policies;
