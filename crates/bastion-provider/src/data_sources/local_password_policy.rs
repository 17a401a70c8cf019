use crate::data::{Attributes, ResourceData};
use crate::resource::{DataSource, ProviderContext};
use crate::resources::common::strings_value;
use crate::schema::{Attribute, Schema};
use crate::Result;
use async_trait::async_trait;
use bastion_api::models::LocalPasswordPolicy;
use bastion_core::Error;

const COUNTERS: &[&str] = &[
    "last_passwords_to_reject",
    "max_auth_failures",
    "password_expiration",
    "password_min_digit_chars",
    "password_min_length",
    "password_min_lower_chars",
    "password_min_special_chars",
    "password_min_upper_chars",
    "password_warning_days",
    "ssh_rsa_min_length",
];

/// `wallix-bastion_local_password_policy`
pub(crate) struct LocalPasswordPolicyDataSource;

fn fill(data: &mut ResourceData, policy: &LocalPasswordPolicy) {
    data.set(
        "allow_same_user_and_password",
        policy.allow_same_user_and_password,
    );
    data.set(
        "forbidden_passwords",
        strings_value(&policy.forbidden_passwords),
    );
    data.set("last_passwords_to_reject", policy.last_passwords_to_reject);
    data.set("max_auth_failures", policy.max_auth_failures);
    data.set("password_expiration", policy.password_expiration);
    data.set("password_min_digit_chars", policy.password_min_digit_chars);
    data.set("password_min_length", policy.password_min_length);
    data.set("password_min_lower_chars", policy.password_min_lower_chars);
    data.set(
        "password_min_special_chars",
        policy.password_min_special_chars,
    );
    data.set("password_min_upper_chars", policy.password_min_upper_chars);
    data.set("password_warning_days", policy.password_warning_days);
    data.set(
        "ssh_key_algos_allowed",
        strings_value(&policy.ssh_key_algos_allowed),
    );
    data.set("ssh_rsa_min_length", policy.ssh_rsa_min_length);
}

#[async_trait]
impl DataSource for LocalPasswordPolicyDataSource {
    fn type_name(&self) -> &'static str {
        "wallix-bastion_local_password_policy"
    }

    fn schema(&self) -> Schema {
        let schema = Schema::new()
            .attr(
                "password_policy_name",
                Attribute::string().optional().default("default"),
            )
            .attr("allow_same_user_and_password", Attribute::bool().computed())
            .attr("forbidden_passwords", Attribute::string_list().computed())
            .attr("ssh_key_algos_allowed", Attribute::string_list().computed());
        COUNTERS.iter().fold(schema, |schema, &key| {
            schema.attr(key, Attribute::int().computed())
        })
    }

    async fn read(&self, ctx: &ProviderContext, data: &mut ResourceData) -> Result<()> {
        let name = data.get_str("password_policy_name");
        let policy = ctx
            .client()
            .local_password_policy(&name)
            .await?
            .ok_or_else(|| Error::NotFound(format!("password_policy_name {name} not found")))?;
        fill(data, &policy);
        data.set_id(policy.id);
        Ok(())
    }
}
