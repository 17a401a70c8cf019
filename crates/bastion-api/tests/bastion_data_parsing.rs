//! Integration tests for parsing Bastion API data.
//!
//! These tests validate that the bastion-api models can correctly deserialize
//! responses shaped like the ones a WALLIX Bastion appliance returns.

use bastion_api::models::{Device, Profile, TargetGroup, VersionInfo};
use std::fs;
use std::path::PathBuf;

/// Get the path to the test fixtures directory.
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn load_fixture(name: &str) -> String {
    let fixture_path = fixtures_dir().join(name);
    fs::read_to_string(&fixture_path).unwrap_or_else(|e| {
        panic!(
            "Failed to read fixture at {}: {}",
            fixture_path.display(),
            e
        )
    })
}

#[test]
fn test_deserialize_device_list() {
    let json_data = load_fixture("devices.json");

    let devices: Vec<Device> = serde_json::from_str(&json_data).unwrap_or_else(|e| {
        panic!("Failed to deserialize device list: {}\nJSON: {}", e, json_data)
    });

    assert_eq!(devices.len(), 2, "Expected 2 devices in test data");
}

#[test]
fn test_device_local_domain_plugin() {
    let json_data = load_fixture("devices.json");
    let devices: Vec<Device> = serde_json::from_str(&json_data).unwrap();

    let linux = devices
        .iter()
        .find(|d| d.device_name == "srv-linux-01")
        .expect("Should have the Linux device");
    assert_eq!(linux.last_connection.as_deref(), Some("2024-05-02 09:14:03"));

    let domains = linux.local_domains.as_ref().expect("local domains are returned");
    assert_eq!(domains.len(), 1);
    let local = &domains[0];
    assert_eq!(local.admin_account.as_deref(), Some("root"));
    assert!(local.enable_password_change);
    assert_eq!(local.password_change_plugin, "Unix");
    let params = local
        .password_change_plugin_parameters
        .as_ref()
        .expect("plugin parameters are returned");
    assert_eq!(params["port"], 22);
}

#[test]
fn test_device_services() {
    let json_data = load_fixture("devices.json");
    let devices: Vec<Device> = serde_json::from_str(&json_data).unwrap();

    let windows = devices
        .iter()
        .find(|d| d.device_name == "srv-win-02")
        .expect("Should have the Windows device");
    assert!(windows.alias.is_empty());
    assert_eq!(windows.local_domains.as_deref(), Some(&[][..]));

    let services = windows.services.as_ref().unwrap();
    assert_eq!(services[0].protocol, "RDP");
    assert_eq!(services[0].port, 3389);
    assert_eq!(
        services[0].subprotocols.as_deref(),
        Some(&["RDP_CLIPBOARD_UP".to_string(), "RDP_DRIVE".to_string()][..])
    );
    assert!(services[0].global_domains.is_empty());
}

#[test]
fn test_target_group_sections() {
    let json_data = load_fixture("targetgroups.json");
    let groups: Vec<TargetGroup> = serde_json::from_str(&json_data).unwrap();
    let group = &groups[0];

    assert_eq!(group.password_retrieval.accounts.len(), 1);
    assert_eq!(group.password_retrieval.accounts[0].domain_type, "global");
    assert!(group.password_retrieval.accounts[0].device.is_empty());

    assert_eq!(group.session.accounts.len(), 2);
    let app_account = &group.session.accounts[1];
    assert_eq!(app_account.application, "browser");
    assert_eq!(app_account.service, None);

    assert_eq!(group.session.account_mappings[0].service, "SSH");
    assert!(group.session.interactive_logins.is_empty());
    assert_eq!(group.restrictions[0].action, "kill");
}

#[test]
fn test_profile_rights_and_limitations() {
    let json_data = load_fixture("profile.json");
    let profile: Profile = serde_json::from_str(&json_data).unwrap();

    assert_eq!(profile.profile_name, "auditor");
    assert_eq!(profile.gui_features.wab_audit.as_deref(), Some("view"));
    assert_eq!(profile.gui_features.user_groups, None);
    assert_eq!(profile.gui_transmission.wab_audit, None);

    assert!(profile.target_groups_limitation.enabled);
    assert_eq!(
        profile.target_groups_limitation.target_groups.as_deref(),
        Some(&["linux-admins".to_string()][..])
    );
    assert!(!profile.user_groups_limitation.enabled);
    assert_eq!(profile.user_groups_limitation.user_groups, None);
}

#[test]
fn test_version_decimals() {
    let json_data = load_fixture("version.json");
    let version: VersionInfo = serde_json::from_str(&json_data).unwrap();

    assert_eq!(version.version, "3.12");
    assert_eq!(format!("{:.6}", version.wab_version_hotfix_decimal), "10.050000");
    assert_eq!(version.wab_complete_version, "10.0.5.1");
}
