//! Connection policies, checkout policies, clusters and connection messages.

use super::named;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Connection policy (`/connectionpolicies`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConnectionPolicy {
    /// Policy identifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Policy name.
    pub connection_policy_name: String,
    /// Free text description.
    #[serde(default)]
    pub description: String,
    /// Protocol the policy applies to.
    #[serde(default)]
    pub protocol: String,
    /// Protocol options.
    #[serde(default)]
    pub options: Map<String, Value>,
    /// Allowed authentication methods.
    #[serde(default)]
    pub authentication_methods: Vec<String>,
}

named!(ConnectionPolicy, connection_policy_name);

/// Checkout policy (`/checkoutpolicies`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckoutPolicy {
    /// Policy identifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Policy name.
    pub checkout_policy_name: String,
    /// Free text description.
    #[serde(default)]
    pub description: String,
    /// Change the credentials when checked in.
    #[serde(default)]
    pub change_credentials_at_checkin: bool,
    /// Lock the account while checked out.
    #[serde(default)]
    pub enable_lock: bool,
    /// Checkout duration in seconds.
    #[serde(default)]
    pub duration: i64,
    /// Extension duration in seconds.
    #[serde(default)]
    pub extension: i64,
    /// Maximum checkout duration in seconds.
    #[serde(default)]
    pub max_duration: i64,
}

named!(CheckoutPolicy, checkout_policy_name);

/// Cluster of targets (`/clusters`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cluster {
    /// Cluster identifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Cluster name.
    pub cluster_name: String,
    /// Free text description.
    #[serde(default)]
    pub description: String,
    /// Accounts, `account@domain@device:service`.
    #[serde(default)]
    pub accounts: Vec<String>,
    /// Account mappings, `device:service`.
    #[serde(default)]
    pub account_mappings: Vec<String>,
    /// Interactive logins, `device:service`.
    #[serde(default)]
    pub interactive_logins: Vec<String>,
}

named!(Cluster, cluster_name);

/// Login or MOTD message (`/connectionmessages/{message_name}`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectionMessage {
    /// Message text.
    #[serde(default)]
    pub message: String,
}
