use crate::client::{BastionClient, Collection};
use crate::models::{Account, Application, ApplicationLocalDomain};

impl BastionClient {
    /// `/applications`, updated with `force=true`.
    #[must_use]
    pub fn applications(&self) -> Collection<'_, Application> {
        self.collection("applications").with_force()
    }

    /// `/applications/{application_id}/localdomains`
    #[must_use]
    pub fn application_localdomains(
        &self,
        application_id: &str,
    ) -> Collection<'_, ApplicationLocalDomain> {
        self.collection(format!("applications/{application_id}/localdomains"))
    }

    /// `/applications/{application_id}/localdomains/{domain_id}/accounts`
    #[must_use]
    pub fn application_localdomain_accounts(
        &self,
        application_id: &str,
        domain_id: &str,
    ) -> Collection<'_, Account> {
        self.collection(format!(
            "applications/{application_id}/localdomains/{domain_id}/accounts"
        ))
        .with_force()
    }
}
