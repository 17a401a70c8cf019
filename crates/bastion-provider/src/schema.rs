//! Attribute schemas, configuration validation and planning.
//!
//! A [`Schema`] describes the attributes of one resource or data source. It validates
//! a configuration object, fills defaults, and diffs a configuration against the prior
//! state to produce a [`Plan`].

use bastion_core::{Error, Result};
use chrono::NaiveDate;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Placeholder shown instead of sensitive values.
pub const SENSITIVE_PLACEHOLDER: &str = "(sensitive)";

/// Type of an attribute value.
#[derive(Debug, Clone)]
pub enum AttrType {
    /// JSON string.
    String,
    /// JSON integer.
    Int,
    /// JSON number.
    Float,
    /// JSON boolean.
    Bool,
    /// Ordered list of values.
    List(Box<AttrType>),
    /// Unordered set of values.
    Set(Box<AttrType>),
    /// Ordered list of nested blocks.
    BlockList(Schema),
    /// Unordered set of nested blocks.
    BlockSet(Schema),
}

impl AttrType {
    /// Ordered list of `elem`.
    #[must_use]
    pub fn list(elem: Self) -> Self {
        Self::List(Box::new(elem))
    }

    /// Unordered set of `elem`.
    #[must_use]
    pub fn set(elem: Self) -> Self {
        Self::Set(Box::new(elem))
    }

    fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::List(_) => "list",
            Self::Set(_) => "set",
            Self::BlockList(_) | Self::BlockSet(_) => "block",
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Int => value.is_i64() || value.is_u64(),
            Self::Float => value.is_number(),
            Self::Bool => value.is_boolean(),
            Self::List(_) | Self::Set(_) | Self::BlockList(_) | Self::BlockSet(_) => {
                value.is_array()
            }
        }
    }
}

/// Value validators, applied to scalars and to each element of scalar collections.
#[derive(Debug, Clone)]
pub enum Validator {
    /// Value must be one of the listed strings.
    StringInSlice(&'static [&'static str]),
    /// Integer within an inclusive range.
    IntBetween(i64, i64),
    /// Number within an inclusive range.
    FloatBetween(f64, f64),
    /// String holding a JSON document.
    StringIsJson,
    /// Non-empty string.
    StringIsNotEmpty,
    /// String matching a regular expression, compiled once.
    StringMatch {
        /// Regular expression.
        regex: &'static LazyLock<Regex>,
        /// Message reported on mismatch.
        message: &'static str,
    },
    /// Calendar date formatted `YYYY-MM-DD`.
    IsDate,
}

impl Validator {
    fn check(&self, key: &str, value: &Value) -> Option<String> {
        match self {
            Self::StringInSlice(allowed) => {
                let v = value.as_str()?;
                (!allowed.iter().any(|a| *a == v)).then(|| {
                    format!(
                        "expected {key} to be one of [{}], got {v}",
                        allowed.join(", ")
                    )
                })
            }
            Self::IntBetween(min, max) => {
                let v = value.as_i64()?;
                (v < *min || v > *max).then(|| {
                    format!("expected {key} to be in the range ({min} - {max}), got {v}")
                })
            }
            Self::FloatBetween(min, max) => {
                let v = value.as_f64()?;
                (v < *min || v > *max).then(|| {
                    format!("expected {key} to be in the range ({min} - {max}), got {v}")
                })
            }
            Self::StringIsJson => {
                let v = value.as_str()?;
                serde_json::from_str::<Value>(v)
                    .err()
                    .map(|e| format!("\"{key}\" contains an invalid JSON: {e}"))
            }
            Self::StringIsNotEmpty => {
                let v = value.as_str()?;
                v.is_empty()
                    .then(|| format!("expected \"{key}\" to not be an empty string"))
            }
            Self::StringMatch { regex, message } => {
                let v = value.as_str()?;
                (!regex.is_match(v)).then(|| format!("invalid value for {key} ({message})"))
            }
            Self::IsDate => {
                let v = value.as_str()?;
                let valid =
                    v.len() == 10 && NaiveDate::parse_from_str(v, "%Y-%m-%d").is_ok();
                (!valid).then(|| format!("expected \"{key}\" to be a date YYYY-MM-DD, got {v}"))
            }
        }
    }
}

/// One attribute of a schema.
#[derive(Debug, Clone)]
pub struct Attribute {
    kind: AttrType,
    required: bool,
    optional: bool,
    computed: bool,
    sensitive: bool,
    force_new: bool,
    default: Option<Value>,
    max_items: Option<usize>,
    validators: Vec<Validator>,
    required_with: Vec<&'static str>,
    conflicts_with: Vec<&'static str>,
    at_least_one_of: Vec<&'static str>,
}

impl Attribute {
    /// Attribute of the given type, neither required nor optional yet.
    #[must_use]
    pub fn new(kind: AttrType) -> Self {
        Self {
            kind,
            required: false,
            optional: false,
            computed: false,
            sensitive: false,
            force_new: false,
            default: None,
            max_items: None,
            validators: Vec::new(),
            required_with: Vec::new(),
            conflicts_with: Vec::new(),
            at_least_one_of: Vec::new(),
        }
    }

    /// String attribute.
    #[must_use]
    pub fn string() -> Self {
        Self::new(AttrType::String)
    }

    /// Integer attribute.
    #[must_use]
    pub fn int() -> Self {
        Self::new(AttrType::Int)
    }

    /// Float attribute.
    #[must_use]
    pub fn float() -> Self {
        Self::new(AttrType::Float)
    }

    /// Boolean attribute.
    #[must_use]
    pub fn bool() -> Self {
        Self::new(AttrType::Bool)
    }

    /// List of strings.
    #[must_use]
    pub fn string_list() -> Self {
        Self::new(AttrType::list(AttrType::String))
    }

    /// Set of strings.
    #[must_use]
    pub fn string_set() -> Self {
        Self::new(AttrType::set(AttrType::String))
    }

    /// List of nested blocks.
    #[must_use]
    pub fn block_list(schema: Schema) -> Self {
        Self::new(AttrType::BlockList(schema))
    }

    /// Set of nested blocks.
    #[must_use]
    pub fn block_set(schema: Schema) -> Self {
        Self::new(AttrType::BlockSet(schema))
    }

    /// Must be set in configuration.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// May be set in configuration.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Filled by the provider.
    #[must_use]
    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    /// Hidden from logs and plan output.
    #[must_use]
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Changing the value replaces the object.
    #[must_use]
    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    /// Value used when the configuration omits the attribute.
    #[must_use]
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Maximum number of elements.
    #[must_use]
    pub fn max_items(mut self, max: usize) -> Self {
        self.max_items = Some(max);
        self
    }

    /// Add a value validator.
    #[must_use]
    pub fn validate(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    /// All of `keys` must be set when this attribute is.
    #[must_use]
    pub fn required_with(mut self, keys: &[&'static str]) -> Self {
        self.required_with.extend_from_slice(keys);
        self
    }

    /// None of `keys` may be set when this attribute is.
    #[must_use]
    pub fn conflicts_with(mut self, keys: &[&'static str]) -> Self {
        self.conflicts_with.extend_from_slice(keys);
        self
    }

    /// At least one of `keys` must be set.
    #[must_use]
    pub fn at_least_one_of(mut self, keys: &[&'static str]) -> Self {
        self.at_least_one_of.extend_from_slice(keys);
        self
    }

    /// Attribute type.
    #[must_use]
    pub fn kind(&self) -> &AttrType {
        &self.kind
    }

    /// Whether the attribute is required.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Whether the attribute is computed.
    #[must_use]
    pub fn is_computed(&self) -> bool {
        self.computed
    }

    /// Whether the attribute is sensitive.
    #[must_use]
    pub fn is_sensitive(&self) -> bool {
        self.sensitive
    }

    /// Whether a change replaces the object.
    #[must_use]
    pub fn is_force_new(&self) -> bool {
        self.force_new
    }

    fn computed_only(&self) -> bool {
        self.computed && !self.optional && !self.required
    }
}

/// Outcome of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanAction {
    /// No prior state.
    Create,
    /// In-place update.
    Update,
    /// Destroy then create.
    Replace,
    /// Nothing to do.
    NoOp,
}

/// Difference between prior state and configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    /// Planned action.
    pub action: PlanAction,
    /// Attributes whose value changes.
    pub changed: Vec<String>,
    /// Changed attributes that force a replacement.
    pub requires_replace: Vec<String>,
    /// Planned state; computed attributes absent from config keep their prior value.
    pub planned: Map<String, Value>,
}

/// Set of attributes of a resource, data source or nested block.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    attributes: BTreeMap<&'static str, Attribute>,
}

impl Schema {
    /// Empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute.
    #[must_use]
    pub fn attr(mut self, name: &'static str, attribute: Attribute) -> Self {
        self.attributes.insert(name, attribute);
        self
    }

    /// Look up an attribute.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Iterate over attributes in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Attribute)> {
        self.attributes.iter().map(|(name, attr)| (*name, attr))
    }

    /// Validate a configuration object.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] listing every problem found.
    pub fn validate(&self, config: &Map<String, Value>) -> Result<()> {
        let mut errors = Vec::new();
        self.collect_errors("", config, &mut errors);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::ValidationError(errors.join("; ")))
        }
    }

    fn collect_errors(&self, prefix: &str, config: &Map<String, Value>, errors: &mut Vec<String>) {
        let push = |errors: &mut Vec<String>, message: String| {
            if !errors.contains(&message) {
                errors.push(message);
            }
        };

        for key in config.keys() {
            if !self.attributes.contains_key(key.as_str()) {
                push(errors, format!("unknown attribute \"{prefix}{key}\""));
            }
        }

        for (name, attr) in &self.attributes {
            let path = format!("{prefix}{name}");
            let value = config.get(*name).filter(|v| !v.is_null());

            if let Some(value) = value {
                if attr.computed_only() {
                    push(errors, format!("\"{path}\": computed attribute cannot be set"));
                    continue;
                }
                attr.check_value(&path, value, errors);
                for other in &attr.required_with {
                    if !is_present(config, other) {
                        push(
                            errors,
                            format!(
                                "\"{path}\": all of `{}` must be specified",
                                std::iter::once(*name)
                                    .chain(attr.required_with.iter().copied())
                                    .collect::<Vec<_>>()
                                    .join(",")
                            ),
                        );
                        break;
                    }
                }
                for other in &attr.conflicts_with {
                    if is_present(config, other) {
                        push(errors, format!("\"{path}\": conflicts with {prefix}{other}"));
                    }
                }
            } else if attr.required {
                push(errors, format!("the argument \"{path}\" is required"));
            }

            if !attr.at_least_one_of.is_empty()
                && !attr.at_least_one_of.iter().any(|k| is_present(config, k))
            {
                push(
                    errors,
                    format!(
                        "one of `{}` must be specified",
                        attr.at_least_one_of
                            .iter()
                            .map(|k| format!("{prefix}{k}"))
                            .collect::<Vec<_>>()
                            .join(",")
                    ),
                );
            }
        }
    }

    /// Fill defaults for attributes absent from `config`, including in nested blocks.
    pub fn apply_defaults(&self, config: &mut Map<String, Value>) {
        for (name, attr) in &self.attributes {
            match config.get_mut(*name) {
                Some(Value::Array(items)) => {
                    if let AttrType::BlockList(nested) | AttrType::BlockSet(nested) = &attr.kind {
                        for item in items.iter_mut() {
                            if let Value::Object(block) = item {
                                nested.apply_defaults(block);
                            }
                        }
                    }
                }
                Some(value) if !value.is_null() => {}
                _ => {
                    if let Some(default) = &attr.default {
                        config.insert((*name).to_string(), default.clone());
                    }
                }
            }
        }
    }

    /// Diff `config` against `prior`.
    #[must_use]
    pub fn plan(&self, prior: Option<&Map<String, Value>>, config: &Map<String, Value>) -> Plan {
        let Some(prior) = prior else {
            return Plan {
                action: PlanAction::Create,
                changed: config
                    .iter()
                    .filter(|(_, v)| !v.is_null())
                    .map(|(k, _)| k.clone())
                    .collect(),
                requires_replace: Vec::new(),
                planned: config.clone(),
            };
        };

        let mut planned = Map::new();
        if let Some(id) = prior.get("id") {
            planned.insert("id".to_string(), id.clone());
        }
        let mut changed = Vec::new();
        let mut requires_replace = Vec::new();

        for (name, attr) in &self.attributes {
            let new = config.get(*name).filter(|v| !v.is_null());
            let old = prior.get(*name).filter(|v| !v.is_null());

            if new.is_none() && attr.computed {
                if let Some(old) = old {
                    planned.insert((*name).to_string(), old.clone());
                }
                continue;
            }
            if let Some(new) = new {
                planned.insert((*name).to_string(), new.clone());
            }
            if !values_equal(&attr.kind, old, new) {
                changed.push((*name).to_string());
                if attr.force_new {
                    requires_replace.push((*name).to_string());
                }
            }
        }

        let action = if !requires_replace.is_empty() {
            PlanAction::Replace
        } else if !changed.is_empty() {
            PlanAction::Update
        } else {
            PlanAction::NoOp
        };

        Plan {
            action,
            changed,
            requires_replace,
            planned,
        }
    }

    /// Copy of `state` with sensitive values replaced by a placeholder.
    #[must_use]
    pub fn redact(&self, state: &Map<String, Value>) -> Map<String, Value> {
        state
            .iter()
            .map(|(key, value)| {
                let sensitive = self
                    .attributes
                    .get(key.as_str())
                    .is_some_and(|attr| attr.sensitive);
                if sensitive && !is_zero(value) {
                    (key.clone(), Value::String(SENSITIVE_PLACEHOLDER.to_string()))
                } else {
                    (key.clone(), value.clone())
                }
            })
            .collect()
    }

    fn normalize_block(&self, block: &Map<String, Value>) -> Value {
        let normalized: Map<String, Value> = self
            .attributes
            .iter()
            .filter_map(|(name, attr)| {
                let value = normalize(&attr.kind, block.get(*name)?);
                (!is_zero(&value)).then(|| ((*name).to_string(), value))
            })
            .collect();
        Value::Object(normalized)
    }
}

impl Attribute {
    fn check_value(&self, path: &str, value: &Value, errors: &mut Vec<String>) {
        if !self.kind.matches(value) {
            errors.push(format!("\"{path}\": expected {}", self.kind.name()));
            return;
        }

        match (&self.kind, value) {
            (AttrType::List(elem) | AttrType::Set(elem), Value::Array(items)) => {
                self.check_len(path, items.len(), errors);
                for (i, item) in items.iter().enumerate() {
                    if !elem.matches(item) {
                        errors.push(format!("\"{path}.{i}\": expected {}", elem.name()));
                        continue;
                    }
                    self.run_validators(path, item, errors);
                }
            }
            (AttrType::BlockList(nested) | AttrType::BlockSet(nested), Value::Array(items)) => {
                self.check_len(path, items.len(), errors);
                for (i, item) in items.iter().enumerate() {
                    match item {
                        Value::Object(block) => {
                            nested.collect_errors(&format!("{path}.{i}."), block, errors);
                        }
                        _ => errors.push(format!("\"{path}.{i}\": expected block")),
                    }
                }
            }
            _ => self.run_validators(path, value, errors),
        }
    }

    fn check_len(&self, path: &str, len: usize, errors: &mut Vec<String>) {
        if let Some(max) = self.max_items {
            if len > max {
                errors.push(format!("\"{path}\": no more than {max} item(s) allowed, got {len}"));
            }
        }
    }

    fn run_validators(&self, path: &str, value: &Value, errors: &mut Vec<String>) {
        errors.extend(self.validators.iter().filter_map(|v| v.check(path, value)));
    }
}

fn is_present(config: &Map<String, Value>, key: &str) -> bool {
    config.get(key).is_some_and(|v| !v.is_null())
}

/// Zero values are treated as unset when diffing.
pub(crate) fn is_zero(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

fn normalize(kind: &AttrType, value: &Value) -> Value {
    match (kind, value) {
        (AttrType::List(elem), Value::Array(items)) => {
            Value::Array(items.iter().map(|v| normalize(elem, v)).collect())
        }
        (AttrType::Set(elem), Value::Array(items)) => {
            let mut items: Vec<Value> = items.iter().map(|v| normalize(elem, v)).collect();
            items.sort_by_key(|v| v.to_string());
            items.dedup();
            Value::Array(items)
        }
        (AttrType::BlockList(nested), Value::Array(items)) => Value::Array(
            items
                .iter()
                .map(|v| match v {
                    Value::Object(block) => nested.normalize_block(block),
                    other => other.clone(),
                })
                .collect(),
        ),
        (AttrType::BlockSet(nested), Value::Array(items)) => {
            let mut items: Vec<Value> = items
                .iter()
                .map(|v| match v {
                    Value::Object(block) => nested.normalize_block(block),
                    other => other.clone(),
                })
                .collect();
            items.sort_by_key(|v| v.to_string());
            Value::Array(items)
        }
        _ => value.clone(),
    }
}

fn values_equal(kind: &AttrType, old: Option<&Value>, new: Option<&Value>) -> bool {
    let old = old.map(|v| normalize(kind, v)).unwrap_or(Value::Null);
    let new = new.map(|v| normalize(kind, v)).unwrap_or(Value::Null);
    (is_zero(&old) && is_zero(&new)) || old == new
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn sample() -> Schema {
        Schema::new()
            .attr("name", Attribute::string().required().force_new())
            .attr("description", Attribute::string().optional())
            .attr(
                "port",
                Attribute::int()
                    .required()
                    .validate(Validator::IntBetween(1, 65535)),
            )
            .attr(
                "protocol",
                Attribute::string()
                    .optional()
                    .default("SSH")
                    .validate(Validator::StringInSlice(&["SSH", "RDP"])),
            )
            .attr("tags", Attribute::string_set().optional())
            .attr("public_key", Attribute::string().computed())
            .attr("password", Attribute::string().optional().sensitive())
    }

    #[test]
    fn validate_accepts_valid_config() {
        let config = obj(json!({"name": "srv", "port": 22, "tags": ["a", "b"]}));
        sample().validate(&config).unwrap();
    }

    #[test]
    fn validate_reports_every_problem() {
        let config = obj(json!({
            "port": 70000,
            "protocol": "FTP",
            "public_key": "x",
            "bogus": true
        }));
        let Err(Error::ValidationError(message)) = sample().validate(&config) else {
            panic!("expected validation error");
        };
        assert!(message.contains("unknown attribute \"bogus\""));
        assert!(message.contains("the argument \"name\" is required"));
        assert!(message.contains("expected port to be in the range (1 - 65535), got 70000"));
        assert!(message.contains("expected protocol to be one of [SSH, RDP], got FTP"));
        assert!(message.contains("\"public_key\": computed attribute cannot be set"));
    }

    #[test]
    fn validate_checks_types() {
        let config = obj(json!({"name": 3, "port": "22", "tags": [1]}));
        let err = sample().validate(&config).unwrap_err().to_string();
        assert!(err.contains("\"name\": expected string"));
        assert!(err.contains("\"port\": expected int"));
        assert!(err.contains("\"tags.0\": expected string"));
    }

    #[test]
    fn cross_field_rules() {
        let schema = Schema::new()
            .attr(
                "private_key",
                Attribute::string().optional().conflicts_with(&["vault"]),
            )
            .attr(
                "passphrase",
                Attribute::string().optional().required_with(&["private_key"]),
            )
            .attr("vault", Attribute::string().optional())
            .attr(
                "sessions",
                Attribute::bool()
                    .optional()
                    .at_least_one_of(&["sessions", "retrieval"]),
            )
            .attr(
                "retrieval",
                Attribute::bool()
                    .optional()
                    .at_least_one_of(&["sessions", "retrieval"]),
            );

        let err = schema
            .validate(&obj(json!({"passphrase": "p", "private_key": null})))
            .unwrap_err()
            .to_string();
        assert!(err.contains("\"passphrase\": all of `passphrase,private_key` must be specified"));
        assert_eq!(err.matches("one of `sessions,retrieval` must be specified").count(), 1);

        let err = schema
            .validate(&obj(json!({"private_key": "k", "vault": "v", "sessions": true})))
            .unwrap_err()
            .to_string();
        assert!(err.contains("\"private_key\": conflicts with vault"));

        schema
            .validate(&obj(json!({"retrieval": false})))
            .unwrap();
    }

    #[test]
    fn validates_nested_blocks_and_max_items() {
        static HH_MM: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").unwrap());
        let period = Schema::new()
            .attr(
                "start_date",
                Attribute::string().required().validate(Validator::IsDate),
            )
            .attr(
                "start_time",
                Attribute::string().required().validate(Validator::StringMatch {
                    regex: &HH_MM,
                    message: "must be HH:MM",
                }),
            );
        let schema = Schema::new().attr(
            "periods",
            Attribute::block_list(period).optional().max_items(1),
        );

        let err = schema
            .validate(&obj(json!({"periods": [
                {"start_date": "2024-02-30", "start_time": "24:00"},
                {"start_date": "2024-02-29", "start_time": "08:00", "extra": 1}
            ]})))
            .unwrap_err()
            .to_string();
        assert!(err.contains("\"periods\": no more than 1 item(s) allowed, got 2"));
        assert!(err.contains("expected \"periods.0.start_date\" to be a date YYYY-MM-DD"));
        assert!(err.contains("invalid value for periods.0.start_time (must be HH:MM)"));
        assert!(err.contains("unknown attribute \"periods.1.extra\""));
    }

    #[test]
    fn json_and_not_empty_validators() {
        let schema = Schema::new()
            .attr(
                "params",
                Attribute::string().optional().validate(Validator::StringIsJson),
            )
            .attr(
                "label",
                Attribute::string()
                    .optional()
                    .validate(Validator::StringIsNotEmpty),
            )
            .attr(
                "timeout",
                Attribute::float()
                    .optional()
                    .validate(Validator::FloatBetween(1.0, 900.0)),
            );
        let err = schema
            .validate(&obj(json!({"params": "{bad", "label": "", "timeout": 0.5})))
            .unwrap_err()
            .to_string();
        assert!(err.contains("\"params\" contains an invalid JSON"));
        assert!(err.contains("expected \"label\" to not be an empty string"));
        assert!(err.contains("expected timeout to be in the range (1 - 900), got 0.5"));
    }

    #[test]
    fn apply_defaults_fills_missing_values() {
        let mut config = obj(json!({"name": "srv", "port": 22, "protocol": null}));
        sample().apply_defaults(&mut config);
        assert_eq!(config["protocol"], json!("SSH"));
    }

    #[test]
    fn plan_create_and_noop() {
        let schema = sample();
        let config = obj(json!({"name": "srv", "port": 22, "tags": ["a", "b"]}));
        let plan = schema.plan(None, &config);
        assert_eq!(plan.action, PlanAction::Create);

        let prior = obj(json!({
            "id": "1",
            "name": "srv",
            "port": 22,
            "tags": ["b", "a"],
            "description": "",
            "public_key": "ssh-rsa AAA"
        }));
        let plan = schema.plan(Some(&prior), &config);
        assert_eq!(plan.action, PlanAction::NoOp);
        assert_eq!(plan.planned["public_key"], json!("ssh-rsa AAA"));
        assert_eq!(plan.planned["id"], json!("1"));
    }

    #[test]
    fn plan_update_and_replace() {
        let schema = sample();
        let prior = obj(json!({"id": "1", "name": "srv", "port": 22}));

        let plan = schema.plan(Some(&prior), &obj(json!({"name": "srv", "port": 2222})));
        assert_eq!(plan.action, PlanAction::Update);
        assert_eq!(plan.changed, vec!["port".to_string()]);

        let plan = schema.plan(Some(&prior), &obj(json!({"name": "srv2", "port": 22})));
        assert_eq!(plan.action, PlanAction::Replace);
        assert_eq!(plan.requires_replace, vec!["name".to_string()]);
    }

    #[test]
    fn plan_compares_block_sets_unordered() {
        let block = Schema::new()
            .attr("device", Attribute::string().optional())
            .attr("service", Attribute::string().optional());
        let schema = Schema::new().attr("mappings", Attribute::block_set(block).optional());
        let prior = obj(json!({"mappings": [
            {"device": "a", "service": "SSH"},
            {"device": "b", "service": ""}
        ]}));
        let config = obj(json!({"mappings": [
            {"device": "b"},
            {"device": "a", "service": "SSH"}
        ]}));
        assert_eq!(schema.plan(Some(&prior), &config).action, PlanAction::NoOp);
    }

    #[test]
    fn redact_hides_sensitive_values() {
        let state = obj(json!({"name": "srv", "password": "s3cret"}));
        let redacted = sample().redact(&state);
        assert_eq!(redacted["password"], json!(SENSITIVE_PLACEHOLDER));
        assert_eq!(redacted["name"], json!("srv"));
    }
}
