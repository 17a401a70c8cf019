//! Request and response bodies of the Bastion REST API.
//!
//! Fields the API always expects are plain values serialized as-is; fields it
//! treats as optional are `Option`s skipped when unset, so the same struct
//! serves as the create/update body and the read response.

mod access;
mod appliance;
mod application;
mod auth;
mod device;
mod domain;
mod policy;

pub use access::*;
pub use appliance::*;
pub use application::*;
pub use auth::*;
pub use device::*;
pub use domain::*;
pub use policy::*;

use serde::{Deserialize, Serialize};

/// Objects looked up by a natural name through the `q=` filter.
pub trait Named {
    /// Field the API filters on.
    const NAME_FIELD: &'static str;

    /// Natural name of this object.
    fn name(&self) -> &str;

    /// API identifier of this object.
    fn id(&self) -> &str;
}

macro_rules! named {
    ($ty:ty, $field:ident) => {
        impl $crate::models::Named for $ty {
            const NAME_FIELD: &'static str = stringify!($field);

            fn name(&self) -> &str {
                &self.$field
            }

            fn id(&self) -> &str {
                &self.id
            }
        }
    };
}
pub(crate) use named;

pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}

/// Account credential (password or SSH key).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credential {
    /// Credential identifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// `password` or `ssh_key`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Password value, write only.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
    /// SSH private key, write only.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub private_key: String,
    /// SSH public key derived by the appliance.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub public_key: String,
    /// Passphrase of the private key.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub passphrase: String,
}

impl Credential {
    /// Password credential.
    #[must_use]
    pub fn password(password: impl Into<String>) -> Self {
        Self {
            kind: "password".to_string(),
            password: password.into(),
            ..Self::default()
        }
    }

    /// SSH key credential.
    #[must_use]
    pub fn ssh_key(private_key: impl Into<String>, passphrase: impl Into<String>) -> Self {
        Self {
            kind: "ssh_key".to_string(),
            private_key: private_key.into(),
            passphrase: passphrase.into(),
            ..Self::default()
        }
    }
}

/// Session restriction attached to user groups.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Restriction {
    /// `kill` or `notify`.
    #[serde(default)]
    pub action: String,
    /// Matching rules.
    #[serde(default)]
    pub rules: String,
    /// Subprotocol the rule applies to.
    #[serde(default)]
    pub subprotocol: String,
}

/// Account shared by device, application and global domains.
///
/// The API only returns the fields relevant to the owning domain kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    /// Account identifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Account name.
    pub account_name: String,
    /// Login used on the target.
    #[serde(default)]
    pub account_login: String,
    /// Free text description.
    #[serde(default)]
    pub description: String,
    /// Whether the domain handles password change, read only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_password_change: Option<bool>,
    /// Rotate the password automatically.
    #[serde(default)]
    pub auto_change_password: bool,
    /// Rotate the SSH key automatically.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_change_ssh_key: Option<bool>,
    /// Checkout policy name.
    #[serde(default)]
    pub checkout_policy: String,
    /// Validity of generated certificates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_validity: Option<String>,
    /// Device services the account is usable on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<String>>,
    /// Global domain resources, `device:service` or `application:APP`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<String>>,
    /// Credentials bound to the account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Vec<Credential>>,
}

named!(Account, account_name);
