//! Device, device local domain and device service models.

use super::named;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Representation of a device (`/devices`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Device {
    /// Device identifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Device name.
    pub device_name: String,
    /// Host name or IP address.
    #[serde(default)]
    pub host: String,
    /// Alias.
    #[serde(default)]
    pub alias: String,
    /// Free text description.
    #[serde(default)]
    pub description: String,
    /// Date of the last connection, read only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_connection: Option<String>,
    /// Local domains of the device, read only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_domains: Option<Vec<DeviceLocalDomain>>,
    /// Services of the device, read only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<DeviceService>>,
}

named!(Device, device_name);

/// Local domain of a device (`/devices/{id}/localdomains`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DeviceLocalDomain {
    /// Domain identifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Domain name.
    pub domain_name: String,
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
}

named!(DeviceLocalDomain, domain_name);

/// Service exposed by a device (`/devices/{id}/services`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceService {
    /// Service identifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Service name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub service_name: String,
    /// Protocol (SSH, RDP, ...).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub protocol: String,
    /// TCP port.
    #[serde(default)]
    pub port: i64,
    /// Enabled subprotocols.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subprotocols: Option<Vec<String>>,
    /// Connection policy name.
    #[serde(default)]
    pub connection_policy: String,
    /// Global domains reachable through the service.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub global_domains: Vec<String>,
}

named!(DeviceService, service_name);
