//! Appliance-wide configuration: X509, encryption, options, password policies, version.

use super::is_false;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// X509 authentication configuration (`/config/x509`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct X509Config {
    /// CA certificate used to validate client certificates.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ca_certificate: String,
    /// Server certificate.
    #[serde(default)]
    pub server_public_key: String,
    /// Server private key.
    #[serde(default)]
    pub server_private_key: String,
    /// Enable X509 authentication.
    #[serde(default, skip_serializing_if = "is_false")]
    pub enable: bool,
}

impl X509Config {
    /// The appliance answers with empty keys when nothing is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.server_public_key.is_empty() && self.server_private_key.is_empty()
    }
}

/// Body of `PUT /encryption`.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct EncryptionChange {
    /// Current passphrase, sent when rotating.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub passphrase: String,
    /// New passphrase.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub new_passphrase: String,
}

/// Response of `GET /encryption`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct EncryptionStatus {
    /// Encryption state before API v3.12, `ready` once initialized.
    #[serde(default)]
    pub encryption: Option<String>,
    /// Vault state from API v3.12, `unsealed` once usable.
    #[serde(default)]
    pub sealed_state: Option<String>,
}

/// Configuration option set (`/configoptions/{config_id}`).
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ConfigOptions {
    /// Configuration identifier.
    #[serde(default)]
    pub id: String,
    /// Configuration name.
    #[serde(default)]
    pub config_name: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Last modification date.
    #[serde(default)]
    pub date: String,
    /// Options, each an arbitrary JSON object.
    #[serde(default)]
    pub options: Vec<Value>,
}

/// Local password policy (`/localpasswordpolicies`).
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct LocalPasswordPolicy {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub password_policy_name: String,
    #[serde(default)]
    pub allow_same_user_and_password: bool,
    #[serde(default)]
    pub forbidden_passwords: Vec<String>,
    #[serde(default)]
    pub last_passwords_to_reject: i64,
    #[serde(default)]
    pub max_auth_failures: i64,
    #[serde(default)]
    pub password_expiration: i64,
    #[serde(default)]
    pub password_min_digit_chars: i64,
    #[serde(default)]
    pub password_min_length: i64,
    #[serde(default)]
    pub password_min_lower_chars: i64,
    #[serde(default)]
    pub password_min_special_chars: i64,
    #[serde(default)]
    pub password_min_upper_chars: i64,
    #[serde(default)]
    pub password_warning_days: i64,
    #[serde(default)]
    pub ssh_key_algos_allowed: Vec<String>,
    #[serde(default)]
    pub ssh_rsa_min_length: i64,
}

/// Appliance and API versions (`/api/version`).
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct VersionInfo {
    /// Highest API version.
    #[serde(default)]
    pub version: String,
    /// Highest API version as a number.
    #[serde(default)]
    pub version_decimal: f64,
    /// Appliance version.
    #[serde(default)]
    pub wab_version: String,
    /// Appliance version as a number.
    #[serde(default)]
    pub wab_version_decimal: f64,
    /// Appliance hotfix version.
    #[serde(default)]
    pub wab_version_hotfix: String,
    /// Appliance hotfix version as a number.
    #[serde(default)]
    pub wab_version_hotfix_decimal: f64,
    /// Full appliance version string.
    #[serde(default)]
    pub wab_complete_version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn x509_omits_disabled_flag() {
        let config = X509Config {
            server_public_key: "PUB".into(),
            server_private_key: "PRIV".into(),
            ..X509Config::default()
        };
        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            json!({"server_public_key": "PUB", "server_private_key": "PRIV"})
        );
        assert!(!config.is_empty());
        assert!(X509Config::default().is_empty());
    }

    #[test]
    fn encryption_change_skips_empty_passphrase() {
        let body = EncryptionChange {
            new_passphrase: "new".into(),
            ..EncryptionChange::default()
        };
        assert_eq!(serde_json::to_value(body).unwrap(), json!({"new_passphrase": "new"}));
    }
}
