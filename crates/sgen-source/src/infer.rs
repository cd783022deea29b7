//! # Sample Inference
//!
//! Builds a JSON Schema from a sample JSON instance, so a sample upload goes
//! through the same validation, keying and emission as a schema upload.
//!
//! - Scalars map to their JSON Schema type; integral numbers are `integer`.
//! - Objects list every member under `properties`, all of them `required`.
//! - Array `items` is the merge of every element. Objects merge member-wise
//!   and a member missing from some element is no longer required;
//!   `integer` widens to `number`; `null` makes the other side nullable;
//!   anything else becomes an `anyOf`.
//! - An empty array has unconstrained `items`.

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};

/// JSON Schema keywords whose presence marks a document as a schema.
const SCHEMA_KEYWORDS: &[&str] = &[
    "$schema",
    "$ref",
    "$defs",
    "definitions",
    "properties",
    "items",
    "enum",
    "const",
    "anyOf",
    "oneOf",
    "allOf",
];

const TYPE_NAMES: &[&str] = &[
    "null", "boolean", "object", "array", "number", "integer", "string",
];

/// Whether `value` reads as a JSON Schema rather than a data sample.
///
/// A `type` member only counts when it names JSON Schema types, so a sample
/// like `{"type": "invoice", "total": 3}` stays a sample.
pub fn looks_like_schema(value: &Value) -> bool {
    let Value::Object(map) = value else {
        return false;
    };
    if SCHEMA_KEYWORDS.iter().any(|k| map.contains_key(*k)) {
        return true;
    }
    match map.get("type") {
        Some(Value::String(t)) => TYPE_NAMES.contains(&t.as_str()),
        Some(Value::Array(ts)) => {
            !ts.is_empty()
                && ts
                    .iter()
                    .all(|t| t.as_str().is_some_and(|t| TYPE_NAMES.contains(&t)))
        }
        _ => false,
    }
}

/// Schema describing `sample`.
pub fn infer_schema(sample: &Value) -> Value {
    Shape::of(sample).into_schema()
}

#[derive(Debug, Clone, PartialEq)]
enum Shape {
    /// No evidence yet (items of an empty array).
    Unknown,
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Array(Box<Shape>),
    /// Member shape and whether every observed object had it.
    Object(BTreeMap<String, (Shape, bool)>),
    Nullable(Box<Shape>),
    Union(Vec<Shape>),
}

impl Shape {
    fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(n) if n.is_i64() || n.is_u64() => Self::Integer,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(items) => Self::Array(Box::new(
                items
                    .iter()
                    .map(Self::of)
                    .fold(Self::Unknown, Self::merge),
            )),
            Value::Object(map) => Self::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), (Self::of(v), true)))
                    .collect(),
            ),
        }
    }

    fn nullable(self) -> Self {
        match self {
            Self::Unknown | Self::Null => Self::Null,
            Self::Nullable(_) => self,
            other => Self::Nullable(Box::new(other)),
        }
    }

    fn same_kind(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::Integer | Self::Number, Self::Integer | Self::Number)
                | (Self::Boolean, Self::Boolean)
                | (Self::String, Self::String)
                | (Self::Array(_), Self::Array(_))
                | (Self::Object(_), Self::Object(_))
        )
    }

    fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::Unknown, x) | (x, Self::Unknown) => x,
            (Self::Null, x) | (x, Self::Null) => x.nullable(),
            (Self::Nullable(a), b) | (b, Self::Nullable(a)) => a.merge(b).nullable(),
            (Self::Integer, Self::Number) | (Self::Number, Self::Integer) => Self::Number,
            (Self::Array(a), Self::Array(b)) => Self::Array(Box::new(a.merge(*b))),
            (Self::Object(a), Self::Object(b)) => Self::Object(merge_members(a, b)),
            (Self::Union(items), x) | (x, Self::Union(items)) => union_with(items, x),
            (a, b) if a == b => a,
            (a, b) => union_with(vec![a], b),
        }
    }

    fn into_schema(self) -> Value {
        match self {
            Self::Unknown => json!({}),
            Self::Null => json!({"type": "null"}),
            Self::Boolean => json!({"type": "boolean"}),
            Self::Integer => json!({"type": "integer"}),
            Self::Number => json!({"type": "number"}),
            Self::String => json!({"type": "string"}),
            Self::Array(items) => json!({"type": "array", "items": items.into_schema()}),
            Self::Object(members) => {
                let required: Vec<Value> = members
                    .iter()
                    .filter(|(_, (_, required))| *required)
                    .map(|(k, _)| Value::String(k.clone()))
                    .collect();
                let properties: Map<String, Value> = members
                    .into_iter()
                    .map(|(k, (shape, _))| (k, shape.into_schema()))
                    .collect();
                let mut schema = Map::new();
                schema.insert("type".into(), json!("object"));
                schema.insert("properties".into(), Value::Object(properties));
                if !required.is_empty() {
                    schema.insert("required".into(), Value::Array(required));
                }
                Value::Object(schema)
            }
            Self::Nullable(inner) => json!({"anyOf": [inner.into_schema(), {"type": "null"}]}),
            Self::Union(items) => json!({
                "anyOf": items.into_iter().map(Self::into_schema).collect::<Vec<_>>()
            }),
        }
    }
}

fn merge_members(
    mut a: BTreeMap<String, (Shape, bool)>,
    b: BTreeMap<String, (Shape, bool)>,
) -> BTreeMap<String, (Shape, bool)> {
    for (_, (_, required)) in a.iter_mut().filter(|(k, _)| !b.contains_key(*k)) {
        *required = false;
    }
    for (key, (shape, required)) in b {
        match a.remove(&key) {
            Some((prev, prev_required)) => {
                a.insert(key, (prev.merge(shape), prev_required && required));
            }
            None => {
                a.insert(key, (shape, false));
            }
        }
    }
    a
}

fn union_with(mut items: Vec<Shape>, shape: Shape) -> Shape {
    let shapes = match shape {
        Shape::Union(more) => more,
        single => vec![single],
    };
    for shape in shapes {
        match items.iter().position(|existing| existing.same_kind(&shape)) {
            Some(i) => {
                let existing = items.remove(i);
                items.insert(i, existing.merge(shape));
            }
            None => items.push(shape),
        }
    }
    if items.len() == 1 {
        items.remove(0)
    } else {
        Shape::Union(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_schemas() {
        assert!(looks_like_schema(&json!({"type": "object"})));
        assert!(looks_like_schema(&json!({"type": ["string", "null"]})));
        assert!(looks_like_schema(&json!({"$ref": "#/$defs/a", "$defs": {}})));
        assert!(looks_like_schema(&json!({"anyOf": [{"type": "string"}]})));
    }

    #[test]
    fn detects_samples() {
        assert!(!looks_like_schema(&json!({"name": "Ada", "age": 36})));
        assert!(!looks_like_schema(&json!({"type": "invoice", "total": 3})));
        assert!(!looks_like_schema(&json!([1, 2, 3])));
        assert!(!looks_like_schema(&json!("type")));
        assert!(!looks_like_schema(&json!({})));
    }

    #[test]
    fn scalars() {
        assert_eq!(infer_schema(&json!(1)), json!({"type": "integer"}));
        assert_eq!(infer_schema(&json!(1.5)), json!({"type": "number"}));
        assert_eq!(infer_schema(&json!("x")), json!({"type": "string"}));
        assert_eq!(infer_schema(&json!(true)), json!({"type": "boolean"}));
        assert_eq!(infer_schema(&json!(null)), json!({"type": "null"}));
    }

    #[test]
    fn object_members_are_required() {
        assert_eq!(
            infer_schema(&json!({"name": "Ada", "tags": ["a"]})),
            json!({
                "type": "object",
                "properties": {
                    "name": {"type": "string"},
                    "tags": {"type": "array", "items": {"type": "string"}}
                },
                "required": ["name", "tags"]
            })
        );
    }

    #[test]
    fn array_elements_merge() {
        let schema = infer_schema(&json!([
            {"id": 1, "score": 2, "note": "a"},
            {"id": 2, "score": 2.5, "note": null},
            {"id": 3, "score": 3}
        ]));
        assert_eq!(
            schema,
            json!({
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "id": {"type": "integer"},
                        "note": {"anyOf": [{"type": "string"}, {"type": "null"}]},
                        "score": {"type": "number"}
                    },
                    "required": ["id", "score"]
                }
            })
        );
    }

    #[test]
    fn mixed_elements_become_a_union() {
        assert_eq!(
            infer_schema(&json!([1, "a", 2.5])),
            json!({
                "type": "array",
                "items": {"anyOf": [{"type": "number"}, {"type": "string"}]}
            })
        );
    }

    #[test]
    fn empty_array_items_are_unconstrained() {
        assert_eq!(infer_schema(&json!([])), json!({"type": "array", "items": {}}));
    }
}
