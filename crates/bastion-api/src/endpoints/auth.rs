use crate::client::{BastionClient, Collection};
use crate::models::{AuthDomainMapping, LdapDomain, LdapMapping, TypedObject};
use crate::Result;
use bastion_core::query::QueryParams;

impl BastionClient {
    /// `/externalauths`, typed by the caller for the backend kind.
    #[must_use]
    pub fn external_auths<T>(&self) -> Collection<'_, T> {
        self.collection("externalauths")
    }

    /// `/authdomains`, typed by the caller for the domain kind.
    #[must_use]
    pub fn auth_domains<T>(&self) -> Collection<'_, T> {
        self.collection("authdomains").with_force()
    }

    /// Read only the `type` of an authentication domain.
    ///
    /// # Errors
    ///
    /// Returns the mapped API error for failures other than 404.
    pub async fn auth_domain_type(&self, domain_id: &str) -> Result<Option<String>> {
        let object = self
            .collection::<TypedObject>("authdomains")
            .get(domain_id)
            .await?;
        Ok(object.map(|o| o.kind))
    }

    /// `/authdomains/{domain_id}/mappings`
    #[must_use]
    pub fn auth_domain_mappings(&self, domain_id: &str) -> Collection<'_, AuthDomainMapping> {
        self.collection(format!("authdomains/{domain_id}/mappings"))
    }

    /// `/ldapdomains`, addressed by domain name.
    #[must_use]
    pub fn ldap_domains(&self) -> Collection<'_, LdapDomain> {
        self.collection("ldapdomains").with_force()
    }

    /// Look up one LDAP mapping by its three components.
    ///
    /// # Errors
    ///
    /// Returns the mapped API error.
    pub async fn find_ldap_mapping(&self, mapping: &LdapMapping) -> Result<Option<LdapMapping>> {
        let found = self
            .ldap_mappings()
            .query(QueryParams::search_all(&[
                ("domain", &mapping.domain),
                ("user_group", &mapping.user_group),
            ]))
            .await?;
        Ok(found.into_iter().find(|m| m == mapping))
    }

    /// Create an LDAP mapping.
    ///
    /// # Errors
    ///
    /// Returns the mapped API error.
    pub async fn create_ldap_mapping(&self, mapping: &LdapMapping) -> Result<()> {
        self.ldap_mappings().create(mapping).await
    }

    /// Delete an LDAP mapping through `/ldapmappings/<domain>/<user_group>/<ldap_group>`.
    ///
    /// # Errors
    ///
    /// Returns the mapped API error.
    pub async fn delete_ldap_mapping(&self, mapping: &LdapMapping) -> Result<()> {
        self.ldap_mappings().delete(&mapping.id()).await
    }

    fn ldap_mappings(&self) -> Collection<'_, LdapMapping> {
        self.collection("ldapmappings")
    }
}
