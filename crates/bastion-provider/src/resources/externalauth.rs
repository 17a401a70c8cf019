//! External authentication backends (`/externalauths`).

use super::typed::Flavour;
use crate::data::{Attributes, ResourceData};
use crate::import::ImportFormat;
use crate::resource::ApiSupport;
use crate::schema::{Attribute, Schema, Validator};
use bastion_api::models::{
    ExternalAuthKerberos, ExternalAuthLdap, ExternalAuthRadius, ExternalAuthSaml,
    ExternalAuthTacacs,
};
use bastion_api::{BastionClient, Collection};
use bastion_core::ApiVersion;

const IMPORT: ImportFormat = ImportFormat("<authentication_name>");

const KERBEROS: &str = "KERBEROS";
const KERBEROS_PASSWORD: &str = "KERBEROS-PASSWORD";

fn port() -> Attribute {
    Attribute::int()
        .required()
        .validate(Validator::IntBetween(1, 65535))
}

/// `wallix-bastion_externalauth_kerberos`
pub(crate) struct Kerberos;

impl Flavour for Kerberos {
    type Model = ExternalAuthKerberos;

    const TYPE_NAME: &'static str = "wallix-bastion_externalauth_kerberos";
    const IMPORT: ImportFormat = IMPORT;

    fn collection(client: &BastionClient) -> Collection<'_, Self::Model> {
        client.external_auths()
    }

    fn schema() -> Schema {
        Schema::new()
            .attr("authentication_name", Attribute::string().required())
            .attr("host", Attribute::string().required())
            .attr("ker_dom_controller", Attribute::string().required())
            .attr("port", port())
            .attr("kerberos_password", Attribute::bool().optional().force_new())
            .attr("description", Attribute::string().optional())
            .attr("login_attribute", Attribute::string().optional())
            .attr("use_primary_auth_domain", Attribute::bool().optional())
    }

    fn body(data: &ResourceData) -> Self::Model {
        let kind = if data.get_bool("kerberos_password") {
            KERBEROS_PASSWORD
        } else {
            KERBEROS
        };
        ExternalAuthKerberos {
            authentication_name: data.get_str("authentication_name"),
            kind: kind.to_string(),
            description: data.get_str("description"),
            host: data.get_str("host"),
            ker_dom_controller: data.get_str("ker_dom_controller"),
            login_attribute: data.get_str("login_attribute"),
            port: data.get_i64("port"),
            use_primary_auth_domain: data.get_bool("use_primary_auth_domain"),
            ..ExternalAuthKerberos::default()
        }
    }

    fn fill(data: &mut ResourceData, auth: &Self::Model) {
        data.set("authentication_name", auth.authentication_name.clone());
        data.set("host", auth.host.clone());
        data.set("ker_dom_controller", auth.ker_dom_controller.clone());
        data.set("port", auth.port);
        data.set("description", auth.description.clone());
        data.set("login_attribute", auth.login_attribute.clone());
        data.set("use_primary_auth_domain", auth.use_primary_auth_domain);
        data.set("kerberos_password", auth.kind == KERBEROS_PASSWORD);
    }
}

/// `wallix-bastion_externalauth_ldap`
pub(crate) struct Ldap;

impl Flavour for Ldap {
    type Model = ExternalAuthLdap;

    const TYPE_NAME: &'static str = "wallix-bastion_externalauth_ldap";
    const IMPORT: ImportFormat = IMPORT;

    fn collection(client: &BastionClient) -> Collection<'_, Self::Model> {
        client.external_auths()
    }

    fn schema() -> Schema {
        Schema::new()
            .attr("authentication_name", Attribute::string().required())
            .attr("cn_attribute", Attribute::string().required())
            .attr("host", Attribute::string().required())
            .attr("ldap_base", Attribute::string().required())
            .attr("login_attribute", Attribute::string().required())
            .attr("port", port())
            .attr("timeout", Attribute::float().required())
            .attr("ca_certificate", Attribute::string().optional())
            .attr("certificate", Attribute::string().optional())
            .attr("description", Attribute::string().optional())
            .attr("is_active_directory", Attribute::bool().optional())
            .attr("is_anonymous_access", Attribute::bool().optional())
            .attr("is_protected_user", Attribute::bool().optional())
            .attr("is_ssl", Attribute::bool().optional())
            .attr("is_starttls", Attribute::bool().optional())
            .attr("login", Attribute::string().optional())
            .attr("password", Attribute::string().optional().sensitive())
            .attr("private_key", Attribute::string().optional())
            .attr("use_primary_auth_domain", Attribute::bool().optional())
    }

    fn body(data: &ResourceData) -> Self::Model {
        ExternalAuthLdap {
            authentication_name: data.get_str("authentication_name"),
            kind: "LDAP".to_string(),
            ca_certificate: data.get_str("ca_certificate"),
            certificate: data.get_str("certificate"),
            cn_attribute: data.get_str("cn_attribute"),
            description: data.get_str("description"),
            host: data.get_str("host"),
            is_active_directory: data.get_bool("is_active_directory"),
            is_anonymous_access: data.get_bool("is_anonymous_access"),
            is_protected_user: data.get_bool("is_protected_user"),
            is_ssl: data.get_bool("is_ssl"),
            is_starttls: data.get_bool("is_starttls"),
            ldap_base: data.get_str("ldap_base"),
            login: data.get_str("login"),
            login_attribute: data.get_str("login_attribute"),
            password: data.get_str("password"),
            port: data.get_i64("port"),
            private_key: data.get_str("private_key"),
            timeout: data.get_f64("timeout"),
            use_primary_auth_domain: data.get_bool("use_primary_auth_domain"),
            ..ExternalAuthLdap::default()
        }
    }

    // the bind password is write only
    fn fill(data: &mut ResourceData, auth: &Self::Model) {
        data.set("authentication_name", auth.authentication_name.clone());
        data.set("cn_attribute", auth.cn_attribute.clone());
        data.set("host", auth.host.clone());
        data.set("ldap_base", auth.ldap_base.clone());
        data.set("login", auth.login.clone());
        data.set("login_attribute", auth.login_attribute.clone());
        data.set("port", auth.port);
        data.set("timeout", auth.timeout);
        data.set("ca_certificate", auth.ca_certificate.clone());
        data.set("certificate", auth.certificate.clone());
        data.set("description", auth.description.clone());
        data.set("is_active_directory", auth.is_active_directory);
        data.set("is_anonymous_access", auth.is_anonymous_access);
        data.set("is_protected_user", auth.is_protected_user);
        data.set("is_ssl", auth.is_ssl);
        data.set("is_starttls", auth.is_starttls);
        data.set("private_key", auth.private_key.clone());
        data.set("use_primary_auth_domain", auth.use_primary_auth_domain);
    }
}

/// `wallix-bastion_externalauth_radius`
pub(crate) struct Radius;

impl Flavour for Radius {
    type Model = ExternalAuthRadius;

    const TYPE_NAME: &'static str = "wallix-bastion_externalauth_radius";
    const IMPORT: ImportFormat = IMPORT;

    fn collection(client: &BastionClient) -> Collection<'_, Self::Model> {
        client.external_auths()
    }

    fn schema() -> Schema {
        Schema::new()
            .attr("authentication_name", Attribute::string().required())
            .attr("host", Attribute::string().required())
            .attr("port", port())
            .attr("secret", Attribute::string().required().sensitive())
            .attr("timeout", Attribute::float().required())
            .attr("description", Attribute::string().optional())
            .attr("use_primary_auth_domain", Attribute::bool().optional())
    }

    fn body(data: &ResourceData) -> Self::Model {
        ExternalAuthRadius {
            authentication_name: data.get_str("authentication_name"),
            kind: "RADIUS".to_string(),
            description: data.get_str("description"),
            host: data.get_str("host"),
            port: data.get_i64("port"),
            secret: data.get_str("secret"),
            timeout: data.get_f64("timeout"),
            use_primary_auth_domain: data.get_bool("use_primary_auth_domain"),
            ..ExternalAuthRadius::default()
        }
    }

    fn fill(data: &mut ResourceData, auth: &Self::Model) {
        data.set("authentication_name", auth.authentication_name.clone());
        data.set("host", auth.host.clone());
        data.set("port", auth.port);
        data.set("timeout", auth.timeout);
        data.set("description", auth.description.clone());
        data.set("use_primary_auth_domain", auth.use_primary_auth_domain);
    }
}

/// `wallix-bastion_externalauth_tacacs`
pub(crate) struct Tacacs;

impl Flavour for Tacacs {
    type Model = ExternalAuthTacacs;

    const TYPE_NAME: &'static str = "wallix-bastion_externalauth_tacacs";
    const IMPORT: ImportFormat = IMPORT;

    fn collection(client: &BastionClient) -> Collection<'_, Self::Model> {
        client.external_auths()
    }

    fn schema() -> Schema {
        Schema::new()
            .attr("authentication_name", Attribute::string().required())
            .attr("host", Attribute::string().required())
            .attr("port", port())
            .attr("secret", Attribute::string().required().sensitive())
            .attr("description", Attribute::string().optional())
            .attr("use_primary_auth_domain", Attribute::bool().optional())
    }

    fn body(data: &ResourceData) -> Self::Model {
        ExternalAuthTacacs {
            authentication_name: data.get_str("authentication_name"),
            kind: "TACACS+".to_string(),
            description: data.get_str("description"),
            host: data.get_str("host"),
            port: data.get_i64("port"),
            secret: data.get_str("secret"),
            use_primary_auth_domain: data.get_bool("use_primary_auth_domain"),
            ..ExternalAuthTacacs::default()
        }
    }

    fn fill(data: &mut ResourceData, auth: &Self::Model) {
        data.set("authentication_name", auth.authentication_name.clone());
        data.set("host", auth.host.clone());
        data.set("port", auth.port);
        data.set("description", auth.description.clone());
        data.set("use_primary_auth_domain", auth.use_primary_auth_domain);
    }
}

/// `wallix-bastion_externalauth_saml`
pub(crate) struct Saml;

impl Flavour for Saml {
    type Model = ExternalAuthSaml;

    const TYPE_NAME: &'static str = "wallix-bastion_externalauth_saml";
    const IMPORT: ImportFormat = IMPORT;
    const SUPPORT: ApiSupport = ApiSupport::Since(ApiVersion::V3_8);

    fn collection(client: &BastionClient) -> Collection<'_, Self::Model> {
        client.external_auths()
    }

    fn schema() -> Schema {
        Schema::new()
            .attr("authentication_name", Attribute::string().required())
            .attr("idp_metadata", Attribute::string().required())
            .attr(
                "timeout",
                Attribute::float()
                    .required()
                    .validate(Validator::FloatBetween(1.0, 900.0)),
            )
            .attr("certificate", Attribute::string().optional().sensitive())
            .attr("description", Attribute::string().optional())
            .attr(
                "passphrase",
                Attribute::string()
                    .optional()
                    .sensitive()
                    .required_with(&["private_key"]),
            )
            .attr("private_key", Attribute::string().optional().sensitive())
            .attr("idp_entity_id", Attribute::string().computed())
            .attr("saml_request_url", Attribute::string().computed())
            .attr("saml_request_method", Attribute::string().computed())
            .attr("sp_metadata", Attribute::string().computed())
            .attr("sp_entity_id", Attribute::string().computed())
            .attr("sp_assertion_consumer_service", Attribute::string().computed())
            .attr("sp_single_logout_service", Attribute::string().computed())
    }

    fn body(data: &ResourceData) -> Self::Model {
        ExternalAuthSaml {
            authentication_name: data.get_str("authentication_name"),
            kind: "SAML".to_string(),
            certificate: data.get_str("certificate"),
            description: data.get_str("description"),
            idp_metadata: data.get_str("idp_metadata"),
            passphrase: data.get_str("passphrase"),
            private_key: data.get_str("private_key"),
            timeout: data.get_f64("timeout"),
            ..ExternalAuthSaml::default()
        }
    }

    fn fill(data: &mut ResourceData, auth: &Self::Model) {
        data.set("authentication_name", auth.authentication_name.clone());
        data.set("idp_metadata", auth.idp_metadata.clone());
        data.set("timeout", auth.timeout);
        data.set("description", auth.description.clone());
        data.set("idp_entity_id", auth.idp_entity_id.clone());
        data.set("saml_request_url", auth.saml_request_url.clone());
        data.set("saml_request_method", auth.saml_request_method.clone());
        data.set("sp_metadata", auth.sp_metadata.clone());
        data.set("sp_entity_id", auth.sp_entity_id.clone());
        data.set(
            "sp_assertion_consumer_service",
            auth.sp_assertion_consumer_service.clone(),
        );
        data.set(
            "sp_single_logout_service",
            auth.sp_single_logout_service.clone(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn data(value: Value) -> ResourceData {
        let Value::Object(config) = value else {
            unreachable!()
        };
        ResourceData::new(config)
    }

    #[test]
    fn kerberos_type_follows_password_flag() {
        let config = json!({
            "authentication_name": "krb",
            "host": "kdc.corp",
            "ker_dom_controller": "CORP.LOCAL",
            "port": 88
        });
        assert_eq!(Kerberos::body(&data(config.clone())).kind, "KERBEROS");

        let mut with_password = config;
        with_password["kerberos_password"] = json!(true);
        let auth = Kerberos::body(&data(with_password));
        assert_eq!(auth.kind, "KERBEROS-PASSWORD");

        let mut read = ResourceData::default();
        Kerberos::fill(&mut read, &auth);
        assert!(read.get_bool("kerberos_password"));
    }

    #[test]
    fn secrets_not_read_back() {
        let auth = Radius::body(&data(json!({
            "authentication_name": "radius",
            "host": "10.0.0.5",
            "port": 1812,
            "secret": "s3cret",
            "timeout": 5.0
        })));
        assert_eq!(auth.kind, "RADIUS");
        assert_eq!(auth.secret, "s3cret");

        let mut read = ResourceData::default();
        Radius::fill(&mut read, &auth);
        assert_eq!(read.get_str("secret"), "");
        assert_eq!(read.get_f64("timeout"), 5.0);
    }

    #[test]
    fn saml_passphrase_needs_key() {
        let config = json!({
            "authentication_name": "idp",
            "idp_metadata": "<xml/>",
            "timeout": 30.0,
            "passphrase": "p"
        });
        let Value::Object(config) = config else {
            unreachable!()
        };
        let err = Saml::schema().validate(&config).unwrap_err().to_string();
        assert!(err.contains("all of `passphrase,private_key` must be specified"));
        assert!(!Saml::SUPPORT.allows(ApiVersion::V3_6));
    }
}
