//! Users, groups, profiles, timeframes, target groups and authorizations.

use super::{named, Restriction};
use serde::{Deserialize, Serialize};

/// Authorization linking a user group to a target group (`/authorizations`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Authorization {
    /// Authorization identifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Authorization name.
    pub authorization_name: String,
    /// Free text description.
    #[serde(default)]
    pub description: String,
    /// User group, only accepted on creation.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user_group: String,
    /// Target group, only accepted on creation.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub target_group: String,
    /// Require an approval before connecting.
    #[serde(default)]
    pub approval_required: bool,
    /// Allow password checkout.
    #[serde(default)]
    pub authorize_password_retrieval: bool,
    /// Allow sessions.
    #[serde(default)]
    pub authorize_sessions: bool,
    /// Mark the authorization critical.
    #[serde(default)]
    pub is_critical: bool,
    /// Record the sessions.
    #[serde(default)]
    pub is_recorded: bool,
    /// Ask a comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_comment: Option<bool>,
    /// Ask a ticket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_ticket: Option<bool>,
    /// Comment is mandatory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mandatory_comment: Option<bool>,
    /// Ticket is mandatory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mandatory_ticket: Option<bool>,
    /// Allow a single connection per approval.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub single_connection: Option<bool>,
    /// Quorum when approvers are active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_quorum: Option<i64>,
    /// Quorum when approvers are inactive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inactive_quorum: Option<i64>,
    /// Approval timeout in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval_timeout: Option<i64>,
    /// Approver groups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approvers: Option<Vec<String>>,
    /// Allowed subprotocols.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subprotocols: Option<Vec<String>>,
}

named!(Authorization, authorization_name);

/// Bastion user (`/users/{user_name}`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// User name, also the identifier.
    pub user_name: String,
    /// Certificate distinguished name.
    #[serde(default)]
    pub certificate_dn: String,
    /// Display name.
    #[serde(default)]
    pub display_name: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Expiration date, `YYYY-MM-DD HH:MM`.
    #[serde(default)]
    pub expiration_date: String,
    /// Force a password change at next login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_change_pwd: Option<bool>,
    /// Groups the user belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<String>>,
    /// Allowed source IPs.
    #[serde(default)]
    pub ip_source: String,
    /// Disabled flag.
    #[serde(default)]
    pub is_disabled: bool,
    /// Password, write only.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
    /// Preferred language.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub preferred_language: String,
    /// Profile name.
    #[serde(default)]
    pub profile: String,
    /// SSH public key.
    #[serde(default)]
    pub ssh_public_key: String,
    /// Authentication backends.
    #[serde(default)]
    pub user_auths: Vec<String>,
}

/// Group of users (`/usergroups`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserGroup {
    /// Group identifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Group name.
    pub group_name: String,
    /// Free text description.
    #[serde(default)]
    pub description: String,
    /// Profile name.
    #[serde(default)]
    pub profile: String,
    /// Timeframes during which the group may connect.
    #[serde(default)]
    pub timeframes: Vec<String>,
    /// Session restrictions.
    #[serde(default)]
    pub restrictions: Vec<Restriction>,
    /// Members.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<String>>,
}

named!(UserGroup, group_name);

/// GUI rights of a profile.
///
/// `wab_audit` only exists for GUI features, not for GUI transmission.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct GuiRights {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wab_audit: Option<String>,
    #[serde(default)]
    pub system_audit: Option<String>,
    #[serde(default)]
    pub users: Option<String>,
    #[serde(default)]
    pub user_groups: Option<String>,
    #[serde(default)]
    pub devices: Option<String>,
    #[serde(default)]
    pub target_groups: Option<String>,
    #[serde(default)]
    pub authorizations: Option<String>,
    #[serde(default)]
    pub profiles: Option<String>,
    #[serde(default)]
    pub wab_settings: Option<String>,
    #[serde(default)]
    pub system_settings: Option<String>,
    #[serde(default)]
    pub backup: Option<String>,
    #[serde(default)]
    pub approval: Option<String>,
    #[serde(default)]
    pub credential_recovery: Option<String>,
}

/// Target group restriction of a profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TargetGroupsLimitation {
    /// Whether the limitation applies.
    #[serde(default)]
    pub enabled: bool,
    /// Default target group, JSON null when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_target_group: Option<Option<String>>,
    /// Allowed target groups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_groups: Option<Vec<String>>,
}

/// User group restriction of a profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserGroupsLimitation {
    /// Whether the limitation applies.
    #[serde(default)]
    pub enabled: bool,
    /// Allowed user groups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_groups: Option<Vec<String>>,
}

/// User profile (`/profiles`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    /// Profile identifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Profile name, only accepted on creation.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub profile_name: String,
    /// Free text description.
    #[serde(default)]
    pub description: String,
    /// Allowed source IPs.
    #[serde(default)]
    pub ip_limitation: String,
    /// Grant target access.
    #[serde(default)]
    pub target_access: bool,
    /// Dashboards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashboards: Option<Vec<String>>,
    /// Rights on GUI features.
    #[serde(default)]
    pub gui_features: GuiRights,
    /// Rights transmitted to subordinate profiles.
    #[serde(default)]
    pub gui_transmission: GuiRights,
    /// Target group restriction.
    #[serde(default)]
    pub target_groups_limitation: TargetGroupsLimitation,
    /// User group restriction.
    #[serde(default)]
    pub user_groups_limitation: UserGroupsLimitation,
}

impl super::Named for Profile {
    const NAME_FIELD: &'static str = "profile_name";

    fn name(&self) -> &str {
        &self.profile_name
    }

    fn id(&self) -> &str {
        &self.id
    }
}

/// Time window of a timeframe.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Period {
    /// First day, `YYYY-MM-DD`.
    pub start_date: String,
    /// Last day, `YYYY-MM-DD`.
    pub end_date: String,
    /// Daily start, `HH:MM`.
    pub start_time: String,
    /// Daily end, `HH:MM`.
    pub end_time: String,
    /// Days of the week.
    #[serde(default)]
    pub week_days: Vec<String>,
}

/// Timeframe (`/timeframes/{timeframe_name}`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Timeframe {
    /// Timeframe name, also the identifier.
    pub timeframe_name: String,
    /// Free text description.
    #[serde(default)]
    pub description: String,
    /// Allow sessions to outlast the timeframe.
    #[serde(default)]
    pub is_overtimable: bool,
    /// Time windows.
    #[serde(default)]
    pub periods: Vec<Period>,
}

/// Account entry of a target group.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TargetAccount {
    /// Account name.
    #[serde(default)]
    pub account: String,
    /// Domain name.
    #[serde(default)]
    pub domain: String,
    /// `local` or `global`.
    #[serde(default)]
    pub domain_type: String,
    /// Device name.
    #[serde(default)]
    pub device: String,
    /// Service name, for session accounts only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    /// Application name.
    #[serde(default)]
    pub application: String,
}

/// Account mapping or interactive login entry of a target group.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TargetEndpoint {
    /// Device name.
    #[serde(default)]
    pub device: String,
    /// Service name.
    #[serde(default)]
    pub service: String,
    /// Application name.
    #[serde(default)]
    pub application: String,
}

/// Password retrieval section of a target group.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PasswordRetrieval {
    /// Accounts whose password may be retrieved.
    #[serde(default)]
    pub accounts: Vec<TargetAccount>,
}

/// Session section of a target group.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TargetSession {
    /// Session accounts.
    #[serde(default)]
    pub accounts: Vec<TargetAccount>,
    /// Account mappings.
    #[serde(default)]
    pub account_mappings: Vec<TargetEndpoint>,
    /// Interactive logins.
    #[serde(default)]
    pub interactive_logins: Vec<TargetEndpoint>,
    /// Scenario accounts.
    #[serde(default)]
    pub scenario_accounts: Vec<TargetAccount>,
}

/// Target group (`/targetgroups`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TargetGroup {
    /// Group identifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Group name.
    pub group_name: String,
    /// Free text description.
    #[serde(default)]
    pub description: String,
    /// Password retrieval targets.
    #[serde(default)]
    pub password_retrieval: PasswordRetrieval,
    /// Session restrictions.
    #[serde(default)]
    pub restrictions: Vec<Restriction>,
    /// Session targets.
    #[serde(default)]
    pub session: TargetSession,
}

named!(TargetGroup, group_name);
