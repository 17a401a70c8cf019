//! Ordered Bastion API versions.
//!
//! The Bastion REST API is mounted under `/api/v<major>.<minor>`. Several resources
//! and fields only exist for some versions, so versions compare numerically
//! (`v3.12` sorts after `v3.8`).

use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A Bastion REST API version such as `v3.8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApiVersion {
    /// Major component
    pub major: u16,
    /// Minor component
    pub minor: u16,
}

impl ApiVersion {
    /// API v3.3
    pub const V3_3: Self = Self::new(3, 3);
    /// API v3.6
    pub const V3_6: Self = Self::new(3, 6);
    /// API v3.8
    pub const V3_8: Self = Self::new(3, 8);
    /// API v3.12
    pub const V3_12: Self = Self::new(3, 12);

    /// Every version the provider knows how to talk to, oldest first.
    pub const SUPPORTED: &'static [Self] = &[Self::V3_3, Self::V3_6, Self::V3_8, Self::V3_12];

    /// Version used when none is configured.
    pub const DEFAULT: Self = Self::V3_3;

    /// Create a version from its components.
    #[must_use]
    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    /// Returns true if this version is part of [`Self::SUPPORTED`].
    #[must_use]
    pub fn is_supported(self) -> bool {
        Self::SUPPORTED.contains(&self)
    }

    /// Parse a version and reject the ones outside [`Self::SUPPORTED`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for malformed or unsupported versions.
    pub fn parse_supported(value: &str) -> Result<Self> {
        let version: Self = value.parse()?;
        if version.is_supported() {
            Ok(version)
        } else {
            let known: Vec<String> = Self::SUPPORTED.iter().map(ToString::to_string).collect();
            Err(Error::ConfigError(format!(
                "unsupported api version {version}, expected one of {}",
                known.join(", ")
            )))
        }
    }

    /// Path segment used in request URLs, e.g. `v3.12`.
    #[must_use]
    pub fn path_segment(self) -> String {
        self.to_string()
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}", self.major, self.minor)
    }
}

impl FromStr for ApiVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);

        let invalid = || Error::ConfigError(format!("invalid api version `{s}`"));
        let (major, minor) = digits.split_once('.').ok_or_else(invalid)?;
        let major = major.parse::<u16>().map_err(|_| invalid())?;
        let minor = minor.parse::<u16>().map_err(|_| invalid())?;

        Ok(Self::new(major, minor))
    }
}

impl Serialize for ApiVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ApiVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_and_without_prefix() {
        assert_eq!("v3.8".parse::<ApiVersion>().unwrap(), ApiVersion::V3_8);
        assert_eq!("3.12".parse::<ApiVersion>().unwrap(), ApiVersion::V3_12);
        assert_eq!(" v3.3 ".parse::<ApiVersion>().unwrap(), ApiVersion::V3_3);
    }

    #[test]
    fn rejects_garbage() {
        for value in ["", "v3", "v3.x", "three.three", "v.3"] {
            assert!(value.parse::<ApiVersion>().is_err(), "{value} should not parse");
        }
    }

    #[test]
    fn orders_numerically() {
        assert!(ApiVersion::V3_12 > ApiVersion::V3_8);
        assert!(ApiVersion::V3_6 < ApiVersion::V3_8);
        let mut versions = vec![ApiVersion::V3_12, ApiVersion::V3_3, ApiVersion::V3_8];
        versions.sort();
        assert_eq!(versions, vec![ApiVersion::V3_3, ApiVersion::V3_8, ApiVersion::V3_12]);
    }

    #[test]
    fn display_round_trips() {
        assert_eq!(ApiVersion::V3_12.to_string(), "v3.12");
        assert_eq!(ApiVersion::default().path_segment(), "v3.3");
    }

    #[test]
    fn parse_supported_rejects_unknown_versions() {
        assert_eq!(ApiVersion::parse_supported("v3.6").unwrap(), ApiVersion::V3_6);
        let err = ApiVersion::parse_supported("v3.4").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: unsupported api version v3.4, expected one of v3.3, v3.6, v3.8, v3.12"
        );
    }

    #[test]
    fn serde_uses_string_form() {
        let json = serde_json::to_string(&ApiVersion::V3_8).unwrap();
        assert_eq!(json, "\"v3.8\"");
        let back: ApiVersion = serde_json::from_str("\"3.12\"").unwrap();
        assert_eq!(back, ApiVersion::V3_12);
    }
}
