//! External authentication backends and authentication domains.

use super::named;
use serde::{Deserialize, Serialize};

/// Kerberos backend (`/externalauths`, type `KERBEROS` or `KERBEROS-PASSWORD`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExternalAuthKerberos {
    /// Backend identifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Backend name.
    pub authentication_name: String,
    /// Backend type.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Free text description.
    #[serde(default)]
    pub description: String,
    /// KDC host.
    #[serde(default)]
    pub host: String,
    /// Kerberos realm controller.
    #[serde(default)]
    pub ker_dom_controller: String,
    /// Attribute holding the login.
    #[serde(default)]
    pub login_attribute: String,
    /// KDC port.
    #[serde(default)]
    pub port: i64,
    /// Use the primary authentication domain.
    #[serde(default)]
    pub use_primary_auth_domain: bool,
}

named!(ExternalAuthKerberos, authentication_name);

/// LDAP backend (`/externalauths`, type `LDAP`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExternalAuthLdap {
    /// Backend identifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Backend name.
    pub authentication_name: String,
    /// Backend type.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// CA certificate for TLS.
    #[serde(default)]
    pub ca_certificate: String,
    /// Client certificate.
    #[serde(default)]
    pub certificate: String,
    /// Attribute holding the common name.
    #[serde(default)]
    pub cn_attribute: String,
    /// Free text description.
    #[serde(default)]
    pub description: String,
    /// LDAP server host.
    #[serde(default)]
    pub host: String,
    /// Backend is an Active Directory.
    #[serde(default)]
    pub is_active_directory: bool,
    /// Bind anonymously.
    #[serde(default)]
    pub is_anonymous_access: bool,
    /// Users are protected.
    #[serde(default)]
    pub is_protected_user: bool,
    /// Use LDAPS.
    #[serde(default)]
    pub is_ssl: bool,
    /// Use StartTLS.
    #[serde(default)]
    pub is_starttls: bool,
    /// Search base.
    #[serde(default)]
    pub ldap_base: String,
    /// Bind login.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub login: String,
    /// Attribute holding the login.
    #[serde(default)]
    pub login_attribute: String,
    /// Bind password, write only.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
    /// LDAP server port.
    #[serde(default)]
    pub port: i64,
    /// Client private key.
    #[serde(default)]
    pub private_key: String,
    /// Request timeout in seconds.
    #[serde(default)]
    pub timeout: f64,
    /// Use the primary authentication domain.
    #[serde(default)]
    pub use_primary_auth_domain: bool,
}

named!(ExternalAuthLdap, authentication_name);

/// RADIUS backend (`/externalauths`, type `RADIUS`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExternalAuthRadius {
    /// Backend identifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Backend name.
    pub authentication_name: String,
    /// Backend type.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Free text description.
    #[serde(default)]
    pub description: String,
    /// RADIUS server host.
    #[serde(default)]
    pub host: String,
    /// RADIUS server port.
    #[serde(default)]
    pub port: i64,
    /// Shared secret.
    #[serde(default)]
    pub secret: String,
    /// Request timeout in seconds.
    #[serde(default)]
    pub timeout: f64,
    /// Use the primary authentication domain.
    #[serde(default)]
    pub use_primary_auth_domain: bool,
}

named!(ExternalAuthRadius, authentication_name);

/// TACACS+ backend (`/externalauths`, type `TACACS+`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExternalAuthTacacs {
    /// Backend identifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Backend name.
    pub authentication_name: String,
    /// Backend type.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Free text description.
    #[serde(default)]
    pub description: String,
    /// TACACS+ server host.
    #[serde(default)]
    pub host: String,
    /// TACACS+ server port.
    #[serde(default)]
    pub port: i64,
    /// Shared secret.
    #[serde(default)]
    pub secret: String,
    /// Use the primary authentication domain.
    #[serde(default)]
    pub use_primary_auth_domain: bool,
}

named!(ExternalAuthTacacs, authentication_name);

/// SAML identity provider (`/externalauths`, type `SAML`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExternalAuthSaml {
    /// Backend identifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Backend name.
    pub authentication_name: String,
    /// Backend type.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// SP certificate.
    #[serde(default)]
    pub certificate: String,
    /// Free text description.
    #[serde(default)]
    pub description: String,
    /// IdP entity id, read only.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub idp_entity_id: String,
    /// IdP metadata XML.
    #[serde(default)]
    pub idp_metadata: String,
    /// Passphrase of the SP private key.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub passphrase: String,
    /// SP private key.
    #[serde(default)]
    pub private_key: String,
    /// SAML request method, read only.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub saml_request_method: String,
    /// SAML request URL, read only.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub saml_request_url: String,
    /// SP assertion consumer service, read only.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sp_assertion_consumer_service: String,
    /// SP entity id, read only.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sp_entity_id: String,
    /// SP metadata, read only.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sp_metadata: String,
    /// SP single logout service, read only.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sp_single_logout_service: String,
    /// Request timeout in seconds.
    #[serde(default)]
    pub timeout: f64,
}

named!(ExternalAuthSaml, authentication_name);

/// LDAP or Active Directory authentication domain (`/authdomains`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthDomainDirectory {
    /// Domain identifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Domain name in the Bastion.
    pub domain_name: String,
    /// `LDAP` or `AD`.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Directory domain name.
    #[serde(default)]
    pub auth_domain_name: String,
    /// Check the X509 SAN email.
    #[serde(default)]
    pub check_x509_san_email: bool,
    /// Default email domain.
    #[serde(default)]
    pub default_email_domain: String,
    /// Default language.
    #[serde(default)]
    pub default_language: String,
    /// Free text description.
    #[serde(default)]
    pub description: String,
    /// Attribute holding the display name.
    #[serde(default)]
    pub display_name_attribute: String,
    /// Attribute holding the email.
    #[serde(default)]
    pub email_attribute: String,
    /// External authentication backends.
    #[serde(default)]
    pub external_auths: Vec<String>,
    /// Attribute holding the groups.
    #[serde(default)]
    pub group_attribute: String,
    /// Default domain flag.
    #[serde(default)]
    pub is_default: bool,
    /// Attribute holding the language.
    #[serde(default)]
    pub language_attribute: String,
    /// Attribute holding the SSH public key.
    #[serde(default)]
    pub pubkey_attribute: String,
    /// Domain name in X509 SAN.
    #[serde(default)]
    pub san_domain_name: String,
    /// Secondary authentication backends.
    #[serde(default)]
    pub secondary_auth: Vec<String>,
    /// X509 condition.
    #[serde(default)]
    pub x509_condition: String,
    /// X509 search filter.
    #[serde(default)]
    pub x509_search_filter: String,
}

named!(AuthDomainDirectory, domain_name);

/// Azure AD authentication domain (`/authdomains`, type `AzureAD`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthDomainAzureAd {
    /// Domain identifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Domain name in the Bastion.
    pub domain_name: String,
    /// Always `AzureAD`.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Azure domain name.
    #[serde(default)]
    pub auth_domain_name: String,
    /// SP certificate.
    #[serde(default)]
    pub certificate: String,
    /// Application (client) id.
    #[serde(default)]
    pub client_id: String,
    /// Client secret.
    #[serde(default)]
    pub client_secret: String,
    /// Default email domain.
    #[serde(default)]
    pub default_email_domain: String,
    /// Default language.
    #[serde(default)]
    pub default_language: String,
    /// Free text description.
    #[serde(default)]
    pub description: String,
    /// Tenant entity id.
    #[serde(default)]
    pub entity_id: String,
    /// External authentication backends.
    #[serde(default)]
    pub external_auths: Vec<String>,
    /// Default domain flag.
    #[serde(default)]
    pub is_default: bool,
    /// Login page label.
    #[serde(default)]
    pub label: String,
    /// Passphrase of the private key.
    #[serde(default)]
    pub passphrase: String,
    /// SP private key, never returned.
    #[serde(default)]
    pub private_key: String,
    /// Secondary authentication backends.
    #[serde(default)]
    pub secondary_auth: Vec<String>,
}

named!(AuthDomainAzureAd, domain_name);

/// SAML authentication domain (`/authdomains`, type `SAML`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthDomainSaml {
    /// Domain identifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Domain name in the Bastion.
    pub domain_name: String,
    /// Always `SAML`.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// SAML domain name.
    #[serde(default)]
    pub auth_domain_name: String,
    /// Default email domain.
    #[serde(default)]
    pub default_email_domain: String,
    /// Default language.
    #[serde(default)]
    pub default_language: String,
    /// Free text description.
    #[serde(default)]
    pub description: String,
    /// External authentication backends.
    #[serde(default)]
    pub external_auths: Vec<String>,
    /// Force re-authentication at the IdP.
    #[serde(default)]
    pub force_authn: bool,
    /// Default domain flag.
    #[serde(default)]
    pub is_default: bool,
    /// Login page label.
    #[serde(default)]
    pub label: String,
    /// Secondary authentication backends.
    #[serde(default)]
    pub secondary_auth: Vec<String>,
    /// IdP initiated URL, read only.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub idp_initiated_url: String,
}

named!(AuthDomainSaml, domain_name);

/// Group mapping of an authentication domain (`/authdomains/{id}/mappings`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthDomainMapping {
    /// Mapping identifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Owning domain name, read only.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub domain: String,
    /// Bastion user group.
    pub user_group: String,
    /// Group in the external directory.
    #[serde(default)]
    pub external_group: String,
}

named!(AuthDomainMapping, user_group);

/// LDAP domain (`/ldapdomains/{domain_name}`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LdapDomain {
    /// Domain name, also the identifier; only sent on creation.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub domain_name: String,
    /// Check the X509 SAN email.
    #[serde(default)]
    pub check_x509_san_email: bool,
    /// Default email domain.
    #[serde(default)]
    pub default_email_domain: String,
    /// Default language.
    #[serde(default)]
    pub default_language: String,
    /// Free text description.
    #[serde(default)]
    pub description: String,
    /// Attribute holding the display name.
    #[serde(default)]
    pub display_name_attribute: String,
    /// Attribute holding the email.
    #[serde(default)]
    pub email_attribute: String,
    /// LDAP backends.
    #[serde(default)]
    pub external_ldaps: Vec<String>,
    /// Attribute holding the groups.
    #[serde(default)]
    pub group_attribute: String,
    /// Default domain flag.
    #[serde(default)]
    pub is_default: bool,
    /// Attribute holding the language.
    #[serde(default)]
    pub language_attribute: String,
    /// LDAP domain name.
    #[serde(default)]
    pub ldap_domain_name: String,
    /// Domain name in X509 SAN.
    #[serde(default)]
    pub san_domain_name: String,
    /// Secondary authentication backends.
    #[serde(default)]
    pub secondary_auth: Vec<String>,
    /// X509 condition.
    #[serde(default)]
    pub x509_condition: String,
    /// X509 search filter.
    #[serde(default)]
    pub x509_search_filter: String,
}

/// Legacy LDAP group mapping (`/ldapmappings`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LdapMapping {
    /// LDAP domain name.
    pub domain: String,
    /// Bastion user group.
    pub user_group: String,
    /// LDAP group.
    pub ldap_group: String,
}

impl LdapMapping {
    /// Composite identifier `<domain>/<user_group>/<ldap_group>`.
    #[must_use]
    pub fn id(&self) -> String {
        format!("{}/{}/{}", self.domain, self.user_group, self.ldap_group)
    }
}

/// Minimal view used to read the `type` of any external auth or auth domain.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TypedObject {
    /// Object identifier.
    #[serde(default)]
    pub id: String,
    /// Object type.
    #[serde(rename = "type", default)]
    pub kind: String,
}
