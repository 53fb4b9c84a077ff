//! Routing rule records and checked input.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::filter;

/// Untyped, already-parsed request data (e.g. a decoded form or JSON body).
pub type RawInput = Map<String, Value>;

/// Description stored when none (or an invalid one) is supplied.
pub const DEFAULT_DESCRIPTION: &str = "no description";

/// Bounds for the `rexp` pattern, in characters.
pub const REXP_LEN: (usize, usize) = (1, 127);

/// Bounds for the description, in characters.
pub const DESCRIPTION_LEN: (usize, usize) = (1, 64);

/// A row of the `routing` table: a pattern mapped to a channel group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingRule {
    pub id: i64,
    /// Matching pattern.
    pub rexp: String,
    /// Group id; `channels.gid` rows belong to it.
    pub target: i64,
    pub description: String,
}

/// A single column value bound into a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Int(i64),
}

/// Whitelisted, filtered rule fields.
///
/// `None` means the key was absent or did not pass its filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleFields {
    pub rexp: Option<String>,
    pub target: Option<i64>,
    pub description: Option<String>,
}

impl RuleFields {
    /// Keep only `rexp`, `target` and `description`, passing each through its filter.
    pub fn check_args(data: &RawInput) -> Self {
        let mut fields = Self::default();

        for (key, value) in data {
            match key.as_str() {
                "rexp" => {
                    fields.rexp = filter::string(value, None, REXP_LEN.0, REXP_LEN.1);
                }
                "target" => {
                    fields.target = filter::number(value, None, 1, i64::MAX);
                }
                "description" => {
                    fields.description = filter::string(
                        value,
                        Some(DEFAULT_DESCRIPTION),
                        DESCRIPTION_LEN.0,
                        DESCRIPTION_LEN.1,
                    );
                }
                _ => {}
            }
        }

        fields
    }

    /// Drop the fields that cannot change after creation.
    pub fn without_immutable(mut self) -> Self {
        self.rexp = None;
        self.target = None;
        self
    }

    /// Present fields as `(column, value)` pairs, in column order.
    pub fn assignments(&self) -> Vec<(&'static str, FieldValue)> {
        let mut out = Vec::with_capacity(3);
        if let Some(rexp) = &self.rexp {
            out.push(("rexp", FieldValue::Text(rexp.clone())));
        }
        if let Some(target) = self.target {
            out.push(("target", FieldValue::Int(target)));
        }
        if let Some(description) = &self.description {
            out.push(("description", FieldValue::Text(description.clone())));
        }
        out
    }

    /// Build the SET fragment for the present fields, e.g. `rexp = ?, description = ?`.
    ///
    /// Placeholders follow the order of [`RuleFields::assignments`].
    pub fn key_assembly(&self) -> String {
        self.assignments()
            .iter()
            .map(|(key, _)| format!("{} = ?", key))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn is_empty(&self) -> bool {
        self.rexp.is_none() && self.target.is_none() && self.description.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(value: Value) -> RawInput {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_check_args_drops_unknown_keys() {
        let fields = RuleFields::check_args(&input(json!({
            "rexp": "^1[38]",
            "target": "3",
            "id": 99,
            "weight": 5,
        })));
        assert_eq!(
            fields,
            RuleFields {
                rexp: Some("^1[38]".into()),
                target: Some(3),
                description: None,
            }
        );
    }

    #[test]
    fn test_check_args_invalid_values() {
        let fields = RuleFields::check_args(&input(json!({
            "rexp": "",
            "target": 0,
            "description": "d".repeat(65),
        })));
        assert_eq!(fields.rexp, None);
        assert_eq!(fields.target, None);
        assert_eq!(fields.description.as_deref(), Some(DEFAULT_DESCRIPTION));
    }

    #[test]
    fn test_key_assembly() {
        let fields = RuleFields {
            rexp: Some("^86".into()),
            target: None,
            description: Some("china mobile".into()),
        };
        assert_eq!(fields.key_assembly(), "rexp = ?, description = ?");
        assert_eq!(RuleFields::default().key_assembly(), "");
    }

    #[test]
    fn test_key_assembly_matches_assignment_order() {
        let fields = RuleFields {
            rexp: Some("^86".into()),
            target: Some(4),
            description: Some("x".into()),
        };
        let keys: Vec<_> = fields.assignments().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["rexp", "target", "description"]);
        assert_eq!(fields.key_assembly(), "rexp = ?, target = ?, description = ?");
    }

    #[test]
    fn test_without_immutable() {
        let fields = RuleFields {
            rexp: Some("^86".into()),
            target: Some(4),
            description: None,
        }
        .without_immutable();
        assert!(fields.is_empty());
    }
}
