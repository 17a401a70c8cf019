//! Convenience builder for Bastion query parameters.
//!
//! The Bastion API filters collections with `q=<field>=<value>` and narrows
//! configuration options with `options=a,b`. This builder collects those pairs
//! for [`crate::client::ServiceClient::execute_with_retry`].

use std::fmt::Display;

/// Builder for assembling query parameter pairs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    /// Create a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Query matching a single field, `q=<field>=<value>`.
    #[must_use]
    pub fn search(field: &str, value: impl Display) -> Self {
        let mut params = Self::new();
        params.push("q", format!("{field}={value}"));
        params
    }

    /// Query matching several fields at once, joined with `&&`.
    #[must_use]
    pub fn search_all(filters: &[(&str, &str)]) -> Self {
        let expr = filters
            .iter()
            .map(|(field, value)| format!("{field}={value}"))
            .collect::<Vec<_>>()
            .join("&&");
        let mut params = Self::new();
        params.push("q", expr);
        params
    }

    /// `force=true`, required by some update endpoints.
    #[must_use]
    pub fn force() -> Self {
        let mut params = Self::new();
        params.push("force", true);
        params
    }

    /// Append a key/value pair when the value is present.
    pub fn push_opt<T>(&mut self, key: &'static str, value: Option<T>)
    where
        T: ToString,
    {
        if let Some(value) = value {
            self.pairs.push((key, value.to_string()));
        }
    }

    /// Append a comma separated list unless it is empty.
    pub fn push_list<I, T>(&mut self, key: &'static str, values: I)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let joined = values
            .into_iter()
            .map(|v| v.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(",");
        if !joined.is_empty() {
            self.pairs.push((key, joined));
        }
    }

    /// Append a required key/value pair.
    pub fn push<T>(&mut self, key: &'static str, value: T)
    where
        T: Display,
    {
        self.pairs.push((key, value.to_string()));
    }

    /// Borrow the collected pairs.
    #[must_use]
    pub fn as_pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    /// Return the collected key/value pairs.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(&'static str, String)> {
        self.pairs
    }

    /// Returns true if no parameters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
