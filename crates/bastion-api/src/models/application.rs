//! Application and application local domain models.

use super::named;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Representation of an application (`/applications`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Application {
    /// Application identifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Application name.
    pub application_name: String,
    /// Connection policy name.
    #[serde(default)]
    pub connection_policy: String,
    /// `standard` or `jumphost`, only accepted by recent API versions.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category: String,
    /// Jumphost application URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_url: Option<String>,
    /// Jumphost browser.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser: Option<String>,
    /// Jumphost browser version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser_version: Option<String>,
    /// Free text description.
    #[serde(default)]
    pub description: String,
    /// Command line parameters.
    #[serde(default)]
    pub parameters: String,
    /// Target cluster or device.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Global domains available to the application.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_domains: Option<Vec<String>>,
    /// Program paths per target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paths: Option<Vec<ApplicationPath>>,
    /// Local domains of the application, read only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_domains: Option<Vec<ApplicationLocalDomain>>,
}

named!(Application, application_name);

/// Program path of a standard application.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApplicationPath {
    /// Target the path applies to.
    #[serde(default)]
    pub target: String,
    /// Program to run.
    #[serde(default)]
    pub program: String,
    /// Working directory.
    #[serde(default)]
    pub working_dir: String,
}

/// Local domain of an application (`/applications/{id}/localdomains`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ApplicationLocalDomain {
    /// Domain identifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Domain name.
    pub domain_name: String,
    /// Account used to change passwords.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_account: Option<String>,
    /// Free text description.
    #[serde(default)]
    pub description: String,
    /// Whether password change is enabled.
    #[serde(default)]
    pub enable_password_change: bool,
    /// Password change policy.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password_change_policy: String,
    /// Password change plugin.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password_change_plugin: String,
    /// Password change plugin parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_change_plugin_parameters: Option<Map<String, Value>>,
}

named!(ApplicationLocalDomain, domain_name);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn standard_application_body() {
        let app = Application {
            application_name: "notepad".into(),
            connection_policy: "RDP".into(),
            target: Some("cluster".into()),
            paths: Some(vec![ApplicationPath {
                target: "cluster".into(),
                program: "notepad.exe".into(),
                working_dir: String::new(),
            }]),
            ..Application::default()
        };
        assert_eq!(
            serde_json::to_value(app).unwrap(),
            json!({
                "application_name": "notepad",
                "connection_policy": "RDP",
                "description": "",
                "parameters": "",
                "target": "cluster",
                "paths": [{"target": "cluster", "program": "notepad.exe", "working_dir": ""}]
            })
        );
    }
}
