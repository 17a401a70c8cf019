//! Authentication domains (`/authdomains`).

use super::common::{strings_value, LANGUAGES};
use super::typed::Flavour;
use crate::data::{Attributes, ResourceData};
use crate::import::ImportFormat;
use crate::resource::ApiSupport;
use crate::schema::{Attribute, Schema, Validator};
use bastion_api::models::{AuthDomainAzureAd, AuthDomainDirectory, AuthDomainSaml};
use bastion_api::{BastionClient, Collection};
use bastion_core::ApiVersion;

const IMPORT: ImportFormat = ImportFormat("<domain_name>");

/// Attributes every domain flavour has.
fn base_schema() -> Schema {
    Schema::new()
        .attr("domain_name", Attribute::string().required())
        .attr("auth_domain_name", Attribute::string().required())
        .attr("default_email_domain", Attribute::string().required())
        .attr(
            "default_language",
            Attribute::string()
                .required()
                .validate(Validator::StringInSlice(LANGUAGES)),
        )
        .attr("external_auths", Attribute::string_list().required())
        .attr("description", Attribute::string().optional())
        .attr("is_default", Attribute::bool().optional())
        .attr("secondary_auth", Attribute::string_list().optional())
}

fn directory_schema() -> Schema {
    base_schema()
        .attr("check_x509_san_email", Attribute::bool().optional())
        .attr("display_name_attribute", Attribute::string().optional())
        .attr("email_attribute", Attribute::string().optional())
        .attr("group_attribute", Attribute::string().optional())
        .attr("language_attribute", Attribute::string().optional())
        .attr("pubkey_attribute", Attribute::string().optional())
        .attr("san_domain_name", Attribute::string().optional())
        .attr("x509_condition", Attribute::string().optional())
        .attr("x509_search_filter", Attribute::string().optional())
}

fn directory_body(data: &ResourceData, kind: &str) -> AuthDomainDirectory {
    AuthDomainDirectory {
        domain_name: data.get_str("domain_name"),
        kind: kind.to_string(),
        auth_domain_name: data.get_str("auth_domain_name"),
        check_x509_san_email: data.get_bool("check_x509_san_email"),
        default_email_domain: data.get_str("default_email_domain"),
        default_language: data.get_str("default_language"),
        description: data.get_str("description"),
        display_name_attribute: data.get_str("display_name_attribute"),
        email_attribute: data.get_str("email_attribute"),
        external_auths: data.get_strings("external_auths"),
        group_attribute: data.get_str("group_attribute"),
        is_default: data.get_bool("is_default"),
        language_attribute: data.get_str("language_attribute"),
        pubkey_attribute: data.get_str("pubkey_attribute"),
        san_domain_name: data.get_str("san_domain_name"),
        secondary_auth: data.get_strings("secondary_auth"),
        x509_condition: data.get_str("x509_condition"),
        x509_search_filter: data.get_str("x509_search_filter"),
        ..AuthDomainDirectory::default()
    }
}

fn directory_fill(data: &mut ResourceData, domain: &AuthDomainDirectory) {
    data.set("domain_name", domain.domain_name.clone());
    data.set("auth_domain_name", domain.auth_domain_name.clone());
    data.set("check_x509_san_email", domain.check_x509_san_email);
    data.set("default_email_domain", domain.default_email_domain.clone());
    data.set("default_language", domain.default_language.clone());
    data.set("description", domain.description.clone());
    data.set("display_name_attribute", domain.display_name_attribute.clone());
    data.set("email_attribute", domain.email_attribute.clone());
    data.set("external_auths", strings_value(&domain.external_auths));
    data.set("group_attribute", domain.group_attribute.clone());
    data.set("is_default", domain.is_default);
    data.set("language_attribute", domain.language_attribute.clone());
    data.set("pubkey_attribute", domain.pubkey_attribute.clone());
    data.set("san_domain_name", domain.san_domain_name.clone());
    data.set("secondary_auth", strings_value(&domain.secondary_auth));
    data.set("x509_condition", domain.x509_condition.clone());
    data.set("x509_search_filter", domain.x509_search_filter.clone());
}

/// `wallix-bastion_authdomain_ldap`
pub(crate) struct Ldap;

impl Flavour for Ldap {
    type Model = AuthDomainDirectory;

    const TYPE_NAME: &'static str = "wallix-bastion_authdomain_ldap";
    const IMPORT: ImportFormat = IMPORT;
    const SUPPORT: ApiSupport = ApiSupport::Since(ApiVersion::V3_8);

    fn collection(client: &BastionClient) -> Collection<'_, Self::Model> {
        client.auth_domains()
    }

    fn schema() -> Schema {
        directory_schema()
    }

    fn body(data: &ResourceData) -> Self::Model {
        directory_body(data, "LDAP")
    }

    fn fill(data: &mut ResourceData, domain: &Self::Model) {
        directory_fill(data, domain);
    }
}

/// `wallix-bastion_authdomain_ad`
pub(crate) struct ActiveDirectory;

impl Flavour for ActiveDirectory {
    type Model = AuthDomainDirectory;

    const TYPE_NAME: &'static str = "wallix-bastion_authdomain_ad";
    const IMPORT: ImportFormat = IMPORT;
    const SUPPORT: ApiSupport = ApiSupport::Since(ApiVersion::V3_8);

    fn collection(client: &BastionClient) -> Collection<'_, Self::Model> {
        client.auth_domains()
    }

    fn schema() -> Schema {
        directory_schema()
    }

    fn body(data: &ResourceData) -> Self::Model {
        directory_body(data, "AD")
    }

    fn fill(data: &mut ResourceData, domain: &Self::Model) {
        directory_fill(data, domain);
    }
}

/// `wallix-bastion_authdomain_azuread`
pub(crate) struct AzureAd;

impl Flavour for AzureAd {
    type Model = AuthDomainAzureAd;

    const TYPE_NAME: &'static str = "wallix-bastion_authdomain_azuread";
    const IMPORT: ImportFormat = IMPORT;

    fn collection(client: &BastionClient) -> Collection<'_, Self::Model> {
        client.auth_domains()
    }

    fn schema() -> Schema {
        base_schema()
            .attr("client_id", Attribute::string().required())
            .attr("entity_id", Attribute::string().required())
            .attr("label", Attribute::string().required())
            .attr("certificate", Attribute::string().optional().sensitive())
            .attr("client_secret", Attribute::string().optional().sensitive())
            .attr(
                "passphrase",
                Attribute::string()
                    .optional()
                    .sensitive()
                    .required_with(&["private_key"]),
            )
            .attr("private_key", Attribute::string().optional().sensitive())
    }

    fn body(data: &ResourceData) -> Self::Model {
        AuthDomainAzureAd {
            domain_name: data.get_str("domain_name"),
            kind: "AzureAD".to_string(),
            auth_domain_name: data.get_str("auth_domain_name"),
            certificate: data.get_str("certificate"),
            client_id: data.get_str("client_id"),
            client_secret: data.get_str("client_secret"),
            default_email_domain: data.get_str("default_email_domain"),
            default_language: data.get_str("default_language"),
            description: data.get_str("description"),
            entity_id: data.get_str("entity_id"),
            external_auths: data.get_strings("external_auths"),
            is_default: data.get_bool("is_default"),
            label: data.get_str("label"),
            passphrase: data.get_str("passphrase"),
            private_key: data.get_str("private_key"),
            secondary_auth: data.get_strings("secondary_auth"),
            ..AuthDomainAzureAd::default()
        }
    }

    // private_key and passphrase are never returned
    fn fill(data: &mut ResourceData, domain: &Self::Model) {
        data.set("domain_name", domain.domain_name.clone());
        data.set("auth_domain_name", domain.auth_domain_name.clone());
        data.set("certificate", domain.certificate.clone());
        data.set("client_id", domain.client_id.clone());
        data.set("client_secret", domain.client_secret.clone());
        data.set("default_email_domain", domain.default_email_domain.clone());
        data.set("default_language", domain.default_language.clone());
        data.set("description", domain.description.clone());
        data.set("entity_id", domain.entity_id.clone());
        data.set("external_auths", strings_value(&domain.external_auths));
        data.set("is_default", domain.is_default);
        data.set("label", domain.label.clone());
        data.set("secondary_auth", strings_value(&domain.secondary_auth));
    }
}

/// `wallix-bastion_authdomain_saml`
pub(crate) struct Saml;

impl Flavour for Saml {
    type Model = AuthDomainSaml;

    const TYPE_NAME: &'static str = "wallix-bastion_authdomain_saml";
    const IMPORT: ImportFormat = IMPORT;

    fn collection(client: &BastionClient) -> Collection<'_, Self::Model> {
        client.auth_domains()
    }

    fn schema() -> Schema {
        base_schema()
            .attr("label", Attribute::string().required())
            .attr("force_authn", Attribute::bool().optional())
            .attr("idp_initiated_url", Attribute::string().computed())
    }

    fn body(data: &ResourceData) -> Self::Model {
        AuthDomainSaml {
            domain_name: data.get_str("domain_name"),
            kind: "SAML".to_string(),
            auth_domain_name: data.get_str("auth_domain_name"),
            default_email_domain: data.get_str("default_email_domain"),
            default_language: data.get_str("default_language"),
            description: data.get_str("description"),
            external_auths: data.get_strings("external_auths"),
            force_authn: data.get_bool("force_authn"),
            is_default: data.get_bool("is_default"),
            label: data.get_str("label"),
            secondary_auth: data.get_strings("secondary_auth"),
            ..AuthDomainSaml::default()
        }
    }

    fn fill(data: &mut ResourceData, domain: &Self::Model) {
        data.set("domain_name", domain.domain_name.clone());
        data.set("auth_domain_name", domain.auth_domain_name.clone());
        data.set("default_email_domain", domain.default_email_domain.clone());
        data.set("default_language", domain.default_language.clone());
        data.set("description", domain.description.clone());
        data.set("external_auths", strings_value(&domain.external_auths));
        data.set("force_authn", domain.force_authn);
        data.set("is_default", domain.is_default);
        data.set("label", domain.label.clone());
        data.set("secondary_auth", strings_value(&domain.secondary_auth));
        data.set("idp_initiated_url", domain.idp_initiated_url.clone());
    }
}
