//! Resource state as seen by resource implementations.

use crate::schema::{is_zero, Plan};
use serde_json::{Map, Value};

/// Typed read access to an attribute map.
pub trait Attributes {
    /// Raw value of an attribute, `None` when absent or null.
    fn raw(&self, key: &str) -> Option<&Value>;

    /// String value, empty when unset.
    fn get_str(&self, key: &str) -> String {
        self.raw(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }

    /// Integer value, zero when unset.
    fn get_i64(&self, key: &str) -> i64 {
        self.raw(key).and_then(Value::as_i64).unwrap_or_default()
    }

    /// Float value, zero when unset.
    fn get_f64(&self, key: &str) -> f64 {
        self.raw(key).and_then(Value::as_f64).unwrap_or_default()
    }

    /// Boolean value, false when unset.
    fn get_bool(&self, key: &str) -> bool {
        self.raw(key).and_then(Value::as_bool).unwrap_or_default()
    }

    /// String elements of a list or set.
    fn get_strings(&self, key: &str) -> Vec<String> {
        self.raw(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Nested blocks of a block list or set.
    fn get_blocks(&self, key: &str) -> Vec<Block<'_>> {
        self.raw(key)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_object).map(Block).collect())
            .unwrap_or_default()
    }

    /// Whether the attribute holds a non-zero value.
    fn is_set(&self, key: &str) -> bool {
        self.raw(key).is_some_and(|v| !is_zero(v))
    }
}

/// Borrowed view on one nested block.
#[derive(Debug, Clone, Copy)]
pub struct Block<'a>(&'a Map<String, Value>);

impl<'a> Block<'a> {
    /// Wrap an attribute map.
    #[must_use]
    pub fn new(attrs: &'a Map<String, Value>) -> Self {
        Self(attrs)
    }
}

impl Attributes for Block<'_> {
    fn raw(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }
}

/// Identifier and attributes of one resource instance.
///
/// An empty id means the object does not exist (anymore).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceData {
    id: String,
    attrs: Map<String, Value>,
    prior: Option<Map<String, Value>>,
    changed: Option<Vec<String>>,
}

impl ResourceData {
    /// Data for a new object built from its configuration.
    #[must_use]
    pub fn new(config: Map<String, Value>) -> Self {
        Self {
            id: String::new(),
            attrs: config,
            prior: None,
            changed: None,
        }
    }

    /// Data rebuilt from a stored state, which carries the `id`.
    #[must_use]
    pub fn from_state(mut state: Map<String, Value>) -> Self {
        let id = match state.remove("id") {
            Some(Value::String(id)) => id,
            _ => String::new(),
        };
        Self {
            id,
            attrs: state,
            prior: None,
            changed: None,
        }
    }

    /// Data for an in-place update: planned attributes plus the prior state.
    #[must_use]
    pub fn for_update(prior: Map<String, Value>, planned: Map<String, Value>) -> Self {
        let prior = Self::from_state(prior);
        let mut attrs = planned;
        attrs.remove("id");
        Self {
            id: prior.id,
            attrs,
            prior: Some(prior.attrs),
            changed: None,
        }
    }

    /// Data for an in-place update driven by a schema plan.
    ///
    /// [`ResourceData::has_change`] then follows the plan, so reordered sets and
    /// blocks are not reported as changes.
    #[must_use]
    pub fn from_plan(prior: Map<String, Value>, plan: Plan) -> Self {
        let mut data = Self::for_update(prior, plan.planned);
        data.changed = Some(plan.changed);
        data
    }

    /// Object identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Set the object identifier.
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    /// Mark the object as gone.
    pub fn clear_id(&mut self) {
        self.id.clear();
    }

    /// Whether the object is gone.
    #[must_use]
    pub fn is_gone(&self) -> bool {
        self.id.is_empty()
    }

    /// Current attributes.
    #[must_use]
    pub fn attrs(&self) -> &Map<String, Value> {
        &self.attrs
    }

    /// Set an attribute.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.attrs.insert(key.to_string(), value.into());
    }

    /// Whether the attribute differs from the prior state.
    ///
    /// Without prior state any non-zero value counts as a change.
    #[must_use]
    pub fn has_change(&self, key: &str) -> bool {
        if let Some(changed) = &self.changed {
            return changed.iter().any(|k| k == key);
        }
        let new = self.attrs.get(key).unwrap_or(&Value::Null);
        match &self.prior {
            Some(prior) => {
                let old = prior.get(key).unwrap_or(&Value::Null);
                !(is_zero(old) && is_zero(new)) && old != new
            }
            None => !is_zero(new),
        }
    }

    /// String value of the attribute in the prior state.
    #[must_use]
    pub fn old_str(&self, key: &str) -> String {
        self.prior
            .as_ref()
            .and_then(|prior| prior.get(key))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }

    /// Whether this is an update of an existing object.
    #[must_use]
    pub fn is_update(&self) -> bool {
        self.prior.is_some()
    }

    /// State object including `id`.
    #[must_use]
    pub fn into_state(self) -> Map<String, Value> {
        let mut state = self.attrs;
        state.insert("id".to_string(), Value::String(self.id));
        state
    }
}

impl Attributes for ResourceData {
    fn raw(&self, key: &str) -> Option<&Value> {
        self.attrs.get(key).filter(|v| !v.is_null())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Attribute, Schema};
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn typed_getters() {
        let data = ResourceData::new(obj(json!({
            "name": "srv",
            "port": 22,
            "timeout": 2.5,
            "enabled": true,
            "tags": ["a", "b"],
            "paths": [{"target": "t", "program": "p"}],
            "empty": ""
        })));
        assert_eq!(data.get_str("name"), "srv");
        assert_eq!(data.get_i64("port"), 22);
        assert!((data.get_f64("timeout") - 2.5).abs() < f64::EPSILON);
        assert!(data.get_bool("enabled"));
        assert_eq!(data.get_strings("tags"), vec!["a", "b"]);
        let blocks = data.get_blocks("paths");
        assert_eq!(blocks[0].get_str("program"), "p");
        assert!(!blocks[0].is_set("working_dir"));
        assert!(!data.is_set("empty"));
        assert_eq!(data.get_str("missing"), "");
    }

    #[test]
    fn state_round_trip_keeps_id() {
        let data = ResourceData::from_state(obj(json!({"id": "42", "name": "srv"})));
        assert_eq!(data.id(), "42");
        assert!(!data.attrs().contains_key("id"));
        let state = data.into_state();
        assert_eq!(state["id"], json!("42"));
        assert_eq!(state["name"], json!("srv"));
    }

    #[test]
    fn has_change_against_prior() {
        let data = ResourceData::for_update(
            obj(json!({"id": "1", "users": ["a"], "password": "", "description": "x"})),
            obj(json!({"users": ["a", "b"], "description": "x"})),
        );
        assert_eq!(data.id(), "1");
        assert!(data.is_update());
        assert!(data.has_change("users"));
        assert!(!data.has_change("password"));
        assert!(!data.has_change("description"));
        assert_eq!(data.old_str("description"), "x");

        let created = ResourceData::new(obj(json!({"users": ["a"]})));
        assert!(created.has_change("users"));
        assert!(!created.has_change("groups"));
    }

    #[test]
    fn has_change_follows_plan_for_sets() {
        let schema = Schema::new()
            .attr("users", Attribute::string_set().optional())
            .attr("description", Attribute::string().optional());
        let prior = obj(json!({"id": "1", "users": ["a", "b"], "description": "x"}));
        let config = obj(json!({"users": ["b", "a"], "description": "y"}));
        let plan = schema.plan(Some(&prior), &config);

        let data = ResourceData::from_plan(prior, plan);
        assert_eq!(data.id(), "1");
        assert!(!data.has_change("users"));
        assert!(data.has_change("description"));
        assert_eq!(data.get_strings("users"), vec!["b", "a"]);
    }

    #[test]
    fn clear_id_marks_gone() {
        let mut data = ResourceData::new(Map::new());
        data.set_id("x");
        assert!(!data.is_gone());
        data.clear_id();
        assert!(data.is_gone());
    }
}
