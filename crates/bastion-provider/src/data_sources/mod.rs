//! Read-only lookups.

mod authdomain_ad;
mod configoption;
mod domain;
mod local_password_policy;
mod version;

use crate::resource::DataSource;

/// Every data source type.
pub(crate) fn all() -> Vec<Box<dyn DataSource>> {
    vec![
        Box::new(authdomain_ad::AuthDomainAdDataSource),
        Box::new(configoption::ConfigOptionDataSource),
        Box::new(domain::DomainDataSource),
        Box::new(local_password_policy::LocalPasswordPolicyDataSource),
        Box::new(version::VersionDataSource),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_names() {
        let names: Vec<&str> = all().iter().map(|d| d.type_name()).collect();
        assert_eq!(
            names,
            [
                "wallix-bastion_authdomain_ad",
                "wallix-bastion_configoption",
                "wallix-bastion_domain",
                "wallix-bastion_local_password_policy",
                "wallix-bastion_version",
            ]
        );
    }

    #[test]
    fn password_policy_name_defaults() {
        let schema = local_password_policy::LocalPasswordPolicyDataSource.schema();
        let mut config = serde_json::Map::new();
        schema.apply_defaults(&mut config);
        assert_eq!(config["password_policy_name"], "default");
    }
}
