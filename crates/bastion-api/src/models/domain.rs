//! Global domain models.

use super::named;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Representation of a global domain (`/domains`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Domain {
    /// Domain identifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Domain name.
    pub domain_name: String,
    /// Real (DNS) domain name.
    #[serde(default)]
    pub domain_real_name: String,
    /// Account used to change passwords.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_account: Option<String>,
    /// CA private key or `generate:<type>`, write only.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ca_private_key: String,
    /// CA public key, read only.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ca_public_key: String,
    /// Free text description.
    #[serde(default)]
    pub description: String,
    /// Whether password change is enabled.
    #[serde(default)]
    pub enable_password_change: bool,
    /// Passphrase of the CA private key.
    #[serde(default)]
    pub passphrase: String,
    /// Password change policy.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password_change_policy: String,
    /// Password change plugin.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password_change_plugin: String,
    /// Password change plugin parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_change_plugin_parameters: Option<Map<String, Value>>,
    /// External vault plugin.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub vault_plugin: String,
    /// External vault plugin parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vault_plugin_parameters: Option<Map<String, Value>>,
}

named!(Domain, domain_name);
