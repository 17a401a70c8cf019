//! Managed resource types.

mod application;
mod application_account;
mod application_localdomain;
mod authdomain;
mod authdomain_mapping;
mod authorization;
mod checkout_policy;
mod cluster;
pub(crate) mod common;
mod config_x509;
mod connection_message;
mod connection_policy;
mod credential;
mod device;
mod device_account;
mod device_localdomain;
mod device_service;
mod domain;
mod domain_account;
mod encryption;
mod externalauth;
mod ldapdomain;
mod ldapmapping;
mod profile;
mod targetgroup;
mod timeframe;
mod typed;
mod user;
mod usergroup;

use crate::resource::Resource;
use credential::{CredentialOwner, CredentialResource};
use typed::TypedResource;

/// Every resource type, in registration order.
pub(crate) fn all() -> Vec<Box<dyn Resource>> {
    vec![
        Box::new(application::ApplicationResource),
        Box::new(application_localdomain::ApplicationLocalDomainResource),
        Box::new(application_account::ApplicationAccountResource),
        Box::new(TypedResource::<authdomain::ActiveDirectory>::new()),
        Box::new(TypedResource::<authdomain::AzureAd>::new()),
        Box::new(TypedResource::<authdomain::Ldap>::new()),
        Box::new(authdomain_mapping::AuthDomainMappingResource),
        Box::new(TypedResource::<authdomain::Saml>::new()),
        Box::new(authorization::AuthorizationResource),
        Box::new(checkout_policy::CheckoutPolicyResource),
        Box::new(cluster::ClusterResource),
        Box::new(config_x509::ConfigX509Resource),
        Box::new(connection_message::ConnectionMessageResource),
        Box::new(connection_policy::ConnectionPolicyResource),
        Box::new(device::DeviceResource),
        Box::new(device_localdomain::DeviceLocalDomainResource),
        Box::new(device_account::DeviceAccountResource),
        Box::new(CredentialResource::new(CredentialOwner::DeviceAccount)),
        Box::new(device_service::DeviceServiceResource),
        Box::new(domain::DomainResource),
        Box::new(domain_account::DomainAccountResource),
        Box::new(CredentialResource::new(CredentialOwner::DomainAccount)),
        Box::new(encryption::EncryptionResource),
        Box::new(TypedResource::<externalauth::Kerberos>::new()),
        Box::new(TypedResource::<externalauth::Ldap>::new()),
        Box::new(TypedResource::<externalauth::Radius>::new()),
        Box::new(TypedResource::<externalauth::Saml>::new()),
        Box::new(TypedResource::<externalauth::Tacacs>::new()),
        Box::new(ldapdomain::LdapDomainResource),
        Box::new(ldapmapping::LdapMappingResource),
        Box::new(profile::ProfileResource),
        Box::new(targetgroup::TargetGroupResource),
        Box::new(timeframe::TimeframeResource),
        Box::new(user::UserResource),
        Box::new(usergroup::UserGroupResource),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn type_names_are_unique() {
        let resources = all();
        let names: HashSet<&str> = resources.iter().map(|r| r.type_name()).collect();
        assert_eq!(names.len(), resources.len());
        assert_eq!(resources.len(), 35);
        assert!(names.contains("wallix-bastion_domain_account_credential"));
        assert!(names.contains("wallix-bastion_device_localdomain_account_credential"));
    }

    #[test]
    fn schemas_build() {
        for resource in all() {
            assert!(
                resource.schema().iter().next().is_some(),
                "{} has an empty schema",
                resource.type_name()
            );
        }
    }
}
