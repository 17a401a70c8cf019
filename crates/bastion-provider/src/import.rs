//! Import identifier parsing.

use crate::Result;
use bastion_core::Error;

/// Shape of an import id, e.g. `<device_id>/<domain_name>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportFormat(pub &'static str);

impl ImportFormat {
    /// Number of `/` separated components.
    #[must_use]
    pub fn parts(self) -> usize {
        self.0.split('/').count()
    }

    /// Split `id` into exactly [`Self::parts`] non-empty components.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidImportId`] with `id must be <fmt>` otherwise.
    pub fn parse(self, id: &str) -> Result<Vec<String>> {
        let parts: Vec<String> = id.split('/').map(str::to_string).collect();
        if parts.len() != self.parts() || parts.iter().any(String::is_empty) {
            return Err(Error::InvalidImportId(format!("id must be {}", self.0)));
        }
        Ok(parts)
    }

    /// Error for an import id that matches nothing.
    #[must_use]
    pub fn not_found(self, thing: &str, id: &str) -> Error {
        Error::NotFound(format!(
            "don't find {thing} with id {id} (id must be {})",
            self.0
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCOUNT: ImportFormat = ImportFormat("<device_id>/<domain_id>/<account_name>");

    #[test]
    fn parses_matching_ids() {
        assert_eq!(ACCOUNT.parts(), 3);
        assert_eq!(
            ACCOUNT.parse("d1/l1/root").unwrap(),
            vec!["d1".to_string(), "l1".to_string(), "root".to_string()]
        );
        assert_eq!(ImportFormat("<name>").parse("srv").unwrap(), vec!["srv"]);
    }

    #[test]
    fn rejects_wrong_shapes() {
        for id in ["d1/l1", "d1/l1/root/extra", "d1//root", ""] {
            assert_eq!(
                ACCOUNT.parse(id).unwrap_err(),
                Error::InvalidImportId(
                    "id must be <device_id>/<domain_id>/<account_name>".to_string()
                )
            );
        }
    }

    #[test]
    fn not_found_message() {
        let err = ACCOUNT.not_found("account_name", "d1/l1/root");
        assert_eq!(
            err.to_string(),
            "Not found: don't find account_name with id d1/l1/root \
             (id must be <device_id>/<domain_id>/<account_name>)"
        );
    }
}
