use crate::client::{BastionClient, Collection};
use crate::models::{Account, Credential, Domain};

impl BastionClient {
    /// `/domains`
    #[must_use]
    pub fn domains(&self) -> Collection<'_, Domain> {
        self.collection("domains")
    }

    /// `/domains/{domain_id}/accounts`
    #[must_use]
    pub fn domain_accounts(&self, domain_id: &str) -> Collection<'_, Account> {
        self.collection(format!("domains/{domain_id}/accounts"))
            .with_force()
    }

    /// `/domains/{domain_id}/accounts/{account_id}/credentials`
    #[must_use]
    pub fn domain_account_credentials(
        &self,
        domain_id: &str,
        account_id: &str,
    ) -> Collection<'_, Credential> {
        self.collection(format!(
            "domains/{domain_id}/accounts/{account_id}/credentials"
        ))
    }
}
