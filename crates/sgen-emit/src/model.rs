//! # Type Model
//!
//! Language-neutral description of the types a schema defines, and the
//! lowering from JSON Schema into it. Every built-in emitter renders this
//! model; none of them reads JSON Schema directly.
//!
//! ```text
//! JSON Schema ──lower()──> TypeModel ──render──> Go / TypeScript / Rust / Python
//! ```
//!
//! ## Lowering rules
//!
//! - The root type is named after the schema `title`, else the document id.
//! - Objects with `properties` become structs; nested ones are hoisted to
//!   top-level definitions named `<Parent><Property>` (or their own `title`).
//! - Objects without `properties` become string-keyed maps of
//!   `additionalProperties` (or of `Any`).
//! - String-only `enum`s become enums; other `enum`s degrade to their
//!   primitive type.
//! - `type: [T, "null"]` and `anyOf`/`oneOf` with a `null` branch become
//!   nullable; other multi-branch unions stay unions.
//! - `allOf` of object schemas is merged into one struct.
//! - Local `$ref`s (`#`, `#/definitions/..`, `#/$defs/..`, any local JSON
//!   pointer) become named definitions, emitted once, recursion included.
//!   External `$ref`s are [`EmitterError::UnsupportedSchema`].
//!
//! Only types reachable from the root are emitted. Struct fields are sorted
//! by their JSON name, so the model does not depend on object member order.

use std::collections::{BTreeSet, HashMap};

use serde_json::{Map, Value};
use sgen_core::AcronymStyle;

use crate::error::EmitterError;
use crate::naming::{legalize, pascal_case, upper_first, NameScope};

/// A type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    /// UTF-8 string.
    String,
    /// Integral number.
    Integer,
    /// Any JSON number.
    Number,
    /// `true` / `false`.
    Boolean,
    /// JSON `null` only.
    Null,
    /// Unconstrained value.
    Any,
    /// Homogeneous list.
    Array(Box<Type>),
    /// String-keyed map.
    Map(Box<Type>),
    /// Reference to a top-level definition by name.
    Named(String),
    /// The inner type or `null`.
    Nullable(Box<Type>),
    /// One of several non-null types.
    Union(Vec<Type>),
}

impl Type {
    fn nullable(inner: Type) -> Type {
        match inner {
            Type::Nullable(_) | Type::Null | Type::Any => inner,
            other => Type::Nullable(Box::new(other)),
        }
    }
}

/// One struct field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Property name exactly as it appears in JSON.
    pub json_name: String,
    /// Field type.
    pub ty: Type,
    /// Listed in `required`.
    pub required: bool,
    /// `description`, if any.
    pub docs: Option<String>,
}

/// Body of a top-level definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDefKind {
    /// Record with named fields.
    Struct(Vec<Field>),
    /// Closed set of string values, in schema order.
    Enum(Vec<String>),
    /// Another name for a type expression.
    Alias(Type),
}

/// A named top-level type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDef {
    /// Unique PascalCase name.
    pub name: String,
    /// `description`, if any.
    pub docs: Option<String>,
    /// Definition body.
    pub kind: TypeDefKind,
}

/// Every type a schema defines, root first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeModel {
    /// Definitions in discovery order; `definitions[0]` is the root.
    pub definitions: Vec<TypeDef>,
}

impl TypeModel {
    /// The root definition.
    pub fn root(&self) -> &TypeDef {
        &self.definitions[0]
    }

    /// Look up a definition by name.
    pub fn get(&self, name: &str) -> Option<&TypeDef> {
        self.definitions.iter().find(|d| d.name == name)
    }

    /// True if any type expression in the model satisfies `pred`.
    pub fn any_type(&self, pred: &dyn Fn(&Type) -> bool) -> bool {
        fn walk(ty: &Type, pred: &dyn Fn(&Type) -> bool) -> bool {
            if pred(ty) {
                return true;
            }
            match ty {
                Type::Array(inner) | Type::Map(inner) | Type::Nullable(inner) => walk(inner, pred),
                Type::Union(items) => items.iter().any(|t| walk(t, pred)),
                _ => false,
            }
        }
        self.definitions.iter().any(|d| match &d.kind {
            TypeDefKind::Struct(fields) => fields.iter().any(|f| walk(&f.ty, pred)),
            TypeDefKind::Alias(ty) => walk(ty, pred),
            TypeDefKind::Enum(_) => false,
        })
    }
}

/// Lower a JSON Schema into a [`TypeModel`].
pub fn lower(schema_id: &str, schema: &Value, style: AcronymStyle) -> Result<TypeModel, EmitterError> {
    let mut lowerer = Lowerer {
        root: schema,
        style,
        scope: NameScope::new(),
        ref_names: HashMap::new(),
        definitions: Vec::new(),
    };

    let title = schema.get("title").and_then(Value::as_str).unwrap_or(schema_id);
    let root_name = lowerer.claim(title);
    lowerer.ref_names.insert(String::new(), root_name.clone());
    lowerer.lower_named(root_name, schema)?;

    Ok(TypeModel {
        definitions: lowerer.definitions,
    })
}

struct Lowerer<'a> {
    root: &'a Value,
    style: AcronymStyle,
    scope: NameScope,
    /// Local JSON pointer (without the leading `#`) → definition name.
    ref_names: HashMap<String, String>,
    definitions: Vec<TypeDef>,
}

impl<'a> Lowerer<'a> {
    fn claim(&mut self, raw: &str) -> String {
        let base = legalize(upper_first(&pascal_case(raw, self.style)), "Root", "T", &[]);
        self.scope.claim(&base)
    }

    fn hint(&self, parent: &str, child: &str) -> String {
        format!("{parent} {child}")
    }

    /// Reserve a slot, lower the body, fill the slot. Keeps parents ahead of
    /// the types hoisted out of them.
    fn lower_named(&mut self, name: String, schema: &'a Value) -> Result<(), EmitterError> {
        let slot = self.definitions.len();
        self.definitions.push(TypeDef {
            name: name.clone(),
            docs: description(schema),
            kind: TypeDefKind::Alias(Type::Any),
        });

        let kind = if let Some(values) = string_enum(schema) {
            TypeDefKind::Enum(values)
        } else if is_struct_like(schema) {
            TypeDefKind::Struct(self.lower_fields(&name, schema)?)
        } else if let Some(parts) = mergeable_all_of(self.root, schema) {
            TypeDefKind::Struct(self.lower_merged(&name, &parts)?)
        } else {
            TypeDefKind::Alias(self.lower_type(schema, &name, true)?)
        };
        self.definitions[slot].kind = kind;
        Ok(())
    }

    fn lower_fields(&mut self, parent: &str, schema: &'a Value) -> Result<Vec<Field>, EmitterError> {
        let required: BTreeSet<&str> = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|r| r.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let mut props: Vec<(&'a String, &'a Value)> = schema
            .get("properties")
            .and_then(Value::as_object)
            .map(|p| p.iter().collect())
            .unwrap_or_default();
        props.sort_by(|a, b| a.0.cmp(b.0));

        let mut fields = Vec::with_capacity(props.len());
        for (json_name, prop) in props {
            let hint = self.hint(parent, json_name);
            fields.push(Field {
                json_name: json_name.clone(),
                ty: self.lower_type(prop, &hint, false)?,
                required: required.contains(json_name.as_str()),
                docs: description(prop),
            });
        }
        Ok(fields)
    }

    fn lower_merged(&mut self, parent: &str, parts: &[&'a Value]) -> Result<Vec<Field>, EmitterError> {
        let mut fields: Vec<Field> = Vec::new();
        for part in parts {
            for field in self.lower_fields(parent, part)? {
                match fields.iter_mut().find(|f| f.json_name == field.json_name) {
                    Some(existing) => existing.required |= field.required,
                    None => fields.push(field),
                }
            }
        }
        fields.sort_by(|a, b| a.json_name.cmp(&b.json_name));
        Ok(fields)
    }

    /// Lower a schema used in type position. `named` is true when the caller
    /// already owns a definition for this schema and only needs its body.
    fn lower_type(&mut self, schema: &'a Value, hint: &str, named: bool) -> Result<Type, EmitterError> {
        let obj = match schema {
            Value::Object(obj) => obj,
            _ => return Ok(Type::Any),
        };

        if let Some(reference) = obj.get("$ref").and_then(Value::as_str) {
            return self.resolve_ref(reference);
        }

        if let Some(values) = obj.get("enum").and_then(Value::as_array) {
            return self.lower_enum(schema, values, hint, named);
        }

        if let Some(c) = obj.get("const") {
            return Ok(primitive_of(c));
        }

        for key in ["anyOf", "oneOf"] {
            if let Some(branches) = obj.get(key).and_then(Value::as_array) {
                return self.lower_union(branches, hint);
            }
        }

        if let Some(branches) = obj.get("allOf").and_then(Value::as_array) {
            if branches.len() == 1 {
                return self.lower_type(&branches[0], hint, named);
            }
            if mergeable_all_of(self.root, schema).is_some() && !named {
                return self.hoist(schema, hint);
            }
            return Ok(Type::Any);
        }

        match obj.get("type") {
            Some(Value::String(t)) => self.lower_with_type(obj, schema, t, hint, named),
            Some(Value::Array(types)) => {
                let mut nullable = false;
                let mut items = Vec::new();
                for t in types.iter().filter_map(Value::as_str) {
                    if t == "null" {
                        nullable = true;
                    } else {
                        push_unique(&mut items, self.lower_with_type(obj, schema, t, hint, false)?);
                    }
                }
                Ok(finish_union(items, nullable))
            }
            Some(other) => Err(EmitterError::UnsupportedSchema(format!(
                "`type` must be a string or array, got {other}"
            ))),
            None if obj.contains_key("properties") => {
                self.lower_with_type(obj, schema, "object", hint, named)
            }
            None if obj.contains_key("items") => self.lower_with_type(obj, schema, "array", hint, named),
            None => Ok(Type::Any),
        }
    }

    fn lower_with_type(
        &mut self,
        obj: &'a Map<String, Value>,
        schema: &'a Value,
        t: &str,
        hint: &str,
        named: bool,
    ) -> Result<Type, EmitterError> {
        match t {
            "string" => Ok(Type::String),
            "integer" => Ok(Type::Integer),
            "number" => Ok(Type::Number),
            "boolean" => Ok(Type::Boolean),
            "null" => Ok(Type::Null),
            "array" => {
                let item_hint = self.hint(hint, "item");
                match obj.get("items") {
                    Some(items @ Value::Object(_)) => {
                        Ok(Type::Array(Box::new(self.lower_type(items, &item_hint, false)?)))
                    }
                    _ => Ok(Type::Array(Box::new(Type::Any))),
                }
            }
            "object" => {
                let has_props = obj
                    .get("properties")
                    .and_then(Value::as_object)
                    .is_some_and(|p| !p.is_empty());
                let closed = obj.get("additionalProperties") == Some(&Value::Bool(false));
                if (has_props || closed) && !named {
                    return self.hoist(schema, hint);
                }
                if has_props || closed {
                    // Caller owns the definition; `lower_named` handles structs.
                    return Ok(Type::Any);
                }
                match obj.get("additionalProperties") {
                    Some(ap @ Value::Object(_)) => {
                        let value_hint = self.hint(hint, "value");
                        Ok(Type::Map(Box::new(self.lower_type(ap, &value_hint, false)?)))
                    }
                    _ => Ok(Type::Map(Box::new(Type::Any))),
                }
            }
            other => Err(EmitterError::UnsupportedSchema(format!("unknown type {other:?}"))),
        }
    }

    fn lower_enum(
        &mut self,
        schema: &'a Value,
        values: &'a [Value],
        hint: &str,
        named: bool,
    ) -> Result<Type, EmitterError> {
        let has_null = values.iter().any(Value::is_null);
        let non_null: Vec<&Value> = values.iter().filter(|v| !v.is_null()).collect();

        if !non_null.is_empty() && non_null.iter().all(|v| v.is_string()) {
            if named && !has_null {
                // `lower_named` already turned this into an enum definition.
                return Ok(Type::String);
            }
            let name = self.claim(title_or(schema, hint));
            self.definitions.push(TypeDef {
                name: name.clone(),
                docs: description(schema),
                kind: TypeDefKind::Enum(
                    non_null.iter().filter_map(|v| v.as_str().map(str::to_string)).collect(),
                ),
            });
            let ty = Type::Named(name);
            return Ok(if has_null { Type::nullable(ty) } else { ty });
        }

        let mut items = Vec::new();
        for v in &non_null {
            push_unique(&mut items, primitive_of(v));
        }
        Ok(finish_union(items, has_null))
    }

    fn lower_union(&mut self, branches: &'a [Value], hint: &str) -> Result<Type, EmitterError> {
        let mut nullable = false;
        let mut items = Vec::new();
        for (i, branch) in branches.iter().enumerate() {
            if branch.get("type").and_then(Value::as_str) == Some("null") {
                nullable = true;
                continue;
            }
            let branch_hint = if branches.len() > 1 {
                self.hint(hint, &format!("option {}", i + 1))
            } else {
                hint.to_string()
            };
            match self.lower_type(branch, &branch_hint, false)? {
                Type::Null => nullable = true,
                Type::Nullable(inner) => {
                    nullable = true;
                    push_unique(&mut items, *inner);
                }
                other => push_unique(&mut items, other),
            }
        }
        Ok(finish_union(items, nullable))
    }

    fn hoist(&mut self, schema: &'a Value, hint: &str) -> Result<Type, EmitterError> {
        let name = self.claim(title_or(schema, hint));
        self.lower_named(name.clone(), schema)?;
        Ok(Type::Named(name))
    }

    fn resolve_ref(&mut self, reference: &str) -> Result<Type, EmitterError> {
        let Some(pointer) = reference.strip_prefix('#') else {
            return Err(EmitterError::UnsupportedSchema(format!(
                "external $ref {reference:?} is not supported"
            )));
        };
        if let Some(name) = self.ref_names.get(pointer) {
            return Ok(Type::Named(name.clone()));
        }
        let target = self.root.pointer(pointer).ok_or_else(|| {
            EmitterError::UnsupportedSchema(format!("$ref {reference:?} does not resolve"))
        })?;
        let last = pointer.rsplit('/').next().unwrap_or(pointer);
        let raw = target.get("title").and_then(Value::as_str).unwrap_or(last);
        let name = self.claim(raw);
        self.ref_names.insert(pointer.to_string(), name.clone());
        self.lower_named(name.clone(), target)?;
        Ok(Type::Named(name))
    }
}

fn description(schema: &Value) -> Option<String> {
    schema
        .get("description")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn title_or<'v>(schema: &'v Value, hint: &'v str) -> &'v str {
    schema.get("title").and_then(Value::as_str).unwrap_or(hint)
}

fn string_enum(schema: &Value) -> Option<Vec<String>> {
    let values = schema.get("enum")?.as_array()?;
    if values.is_empty() || !values.iter().all(Value::is_string) {
        return None;
    }
    Some(values.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
}

fn is_struct_like(schema: &Value) -> bool {
    let Some(obj) = schema.as_object() else {
        return false;
    };
    if obj.contains_key("$ref") || obj.contains_key("enum") {
        return false;
    }
    let typed_object = match obj.get("type") {
        Some(Value::String(t)) => t == "object",
        Some(_) => false,
        None => true,
    };
    let has_props = obj
        .get("properties")
        .and_then(Value::as_object)
        .is_some_and(|p| !p.is_empty());
    let closed = obj.get("additionalProperties") == Some(&Value::Bool(false))
        && obj.get("type").and_then(Value::as_str) == Some("object");
    typed_object && (has_props || closed)
}

/// `allOf` branches that are all objects (inline or via local `$ref`).
fn mergeable_all_of<'v>(root: &'v Value, schema: &'v Value) -> Option<Vec<&'v Value>> {
    let branches = schema.get("allOf")?.as_array()?;
    if branches.len() < 2 {
        return None;
    }
    let mut parts = Vec::with_capacity(branches.len());
    for branch in branches {
        let resolved = match branch.get("$ref").and_then(Value::as_str) {
            Some(r) => root.pointer(r.strip_prefix('#')?)?,
            None => branch,
        };
        if !resolved.get("properties").is_some_and(Value::is_object) {
            return None;
        }
        parts.push(resolved);
    }
    Some(parts)
}

fn primitive_of(v: &Value) -> Type {
    match v {
        Value::String(_) => Type::String,
        Value::Bool(_) => Type::Boolean,
        Value::Number(n) if n.is_i64() || n.is_u64() => Type::Integer,
        Value::Number(_) => Type::Number,
        Value::Null => Type::Null,
        Value::Array(_) | Value::Object(_) => Type::Any,
    }
}

fn push_unique(items: &mut Vec<Type>, ty: Type) {
    if !items.contains(&ty) {
        items.push(ty);
    }
}

fn finish_union(mut items: Vec<Type>, nullable: bool) -> Type {
    // integer ⊂ number
    if items.contains(&Type::Number) {
        items.retain(|t| *t != Type::Integer);
    }
    let ty = match items.len() {
        0 => return if nullable { Type::Null } else { Type::Any },
        1 => items.remove(0),
        _ if items.contains(&Type::Any) => Type::Any,
        _ => Type::Union(items),
    };
    if nullable {
        Type::nullable(ty)
    } else {
        ty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lower_pascal(id: &str, schema: Value) -> TypeModel {
        lower(id, &schema, AcronymStyle::Pascal).unwrap()
    }

    fn fields(def: &TypeDef) -> &[Field] {
        match &def.kind {
            TypeDefKind::Struct(f) => f,
            other => panic!("expected struct, got {other:?}"),
        }
    }

    #[test]
    fn simple_object() {
        let m = lower_pascal(
            "person",
            json!({"type": "object", "properties": {"name": {"type": "string"}, "age": {"type": "integer"}}, "required": ["name"]}),
        );
        assert_eq!(m.definitions.len(), 1);
        let root = m.root();
        assert_eq!(root.name, "Person");
        let f = fields(root);
        assert_eq!(f[0].json_name, "age");
        assert!(!f[0].required);
        assert_eq!(f[1].ty, Type::String);
        assert!(f[1].required);
    }

    #[test]
    fn title_names_root() {
        let m = lower_pascal("x", json!({"title": "user profile", "type": "string"}));
        assert_eq!(m.root().name, "UserProfile");
        assert_eq!(m.root().kind, TypeDefKind::Alias(Type::String));
    }

    #[test]
    fn nested_objects_are_hoisted() {
        let m = lower_pascal(
            "user",
            json!({"type": "object", "properties": {
                "address": {"type": "object", "properties": {"city": {"type": "string"}}}
            }}),
        );
        let names: Vec<&str> = m.definitions.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["User", "UserAddress"]);
        assert_eq!(fields(m.root())[0].ty, Type::Named("UserAddress".into()));
    }

    #[test]
    fn string_enum_hoisted_and_nullable() {
        let m = lower_pascal(
            "task",
            json!({"type": "object", "properties": {
                "status": {"enum": ["open", "done", null]}
            }}),
        );
        let status = m.get("TaskStatus").unwrap();
        assert_eq!(status.kind, TypeDefKind::Enum(vec!["open".into(), "done".into()]));
        assert_eq!(
            fields(m.root())[0].ty,
            Type::Nullable(Box::new(Type::Named("TaskStatus".into())))
        );
    }

    #[test]
    fn root_enum() {
        let m = lower_pascal("color", json!({"enum": ["red", "green"]}));
        assert_eq!(m.definitions.len(), 1);
        assert_eq!(m.root().kind, TypeDefKind::Enum(vec!["red".into(), "green".into()]));
    }

    #[test]
    fn numeric_enum_degrades_to_primitive() {
        let m = lower_pascal("n", json!({"enum": [1, 2, 3]}));
        assert_eq!(m.root().kind, TypeDefKind::Alias(Type::Integer));
    }

    #[test]
    fn nullable_type_array() {
        let m = lower_pascal("s", json!({"type": ["string", "null"]}));
        assert_eq!(m.root().kind, TypeDefKind::Alias(Type::Nullable(Box::new(Type::String))));
    }

    #[test]
    fn arrays_and_maps() {
        let m = lower_pascal(
            "bag",
            json!({"type": "object", "properties": {
                "tags": {"type": "array", "items": {"type": "string"}},
                "counts": {"type": "object", "additionalProperties": {"type": "integer"}},
                "anything": {"type": "array"}
            }}),
        );
        let f = fields(m.root());
        assert_eq!(f[0].ty, Type::Array(Box::new(Type::Any)));
        assert_eq!(f[1].ty, Type::Map(Box::new(Type::Integer)));
        assert_eq!(f[2].ty, Type::Array(Box::new(Type::String)));
    }

    #[test]
    fn local_refs_resolve_once() {
        let m = lower_pascal(
            "order",
            json!({
                "type": "object",
                "properties": {
                    "billing": {"$ref": "#/definitions/address"},
                    "shipping": {"$ref": "#/definitions/address"}
                },
                "definitions": {
                    "address": {"type": "object", "properties": {"street": {"type": "string"}}},
                    "unused": {"type": "string"}
                }
            }),
        );
        let names: Vec<&str> = m.definitions.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["Order", "Address"]);
        let f = fields(m.root());
        assert_eq!(f[0].ty, Type::Named("Address".into()));
        assert_eq!(f[1].ty, Type::Named("Address".into()));
    }

    #[test]
    fn defs_keyword_and_recursion() {
        let m = lower_pascal(
            "tree",
            json!({
                "$ref": "#/$defs/node",
                "$defs": {
                    "node": {"type": "object", "properties": {
                        "children": {"type": "array", "items": {"$ref": "#/$defs/node"}}
                    }}
                }
            }),
        );
        assert_eq!(m.root().kind, TypeDefKind::Alias(Type::Named("Node".into())));
        let node = m.get("Node").unwrap();
        assert_eq!(
            fields(node)[0].ty,
            Type::Array(Box::new(Type::Named("Node".into())))
        );
    }

    #[test]
    fn self_reference_to_root() {
        let m = lower_pascal(
            "list",
            json!({"type": "object", "properties": {"next": {"$ref": "#"}}}),
        );
        assert_eq!(fields(m.root())[0].ty, Type::Named("List".into()));
        assert_eq!(m.definitions.len(), 1);
    }

    #[test]
    fn external_ref_is_unsupported() {
        let err = lower(
            "x",
            &json!({"$ref": "https://example.com/other.json"}),
            AcronymStyle::Pascal,
        )
        .unwrap_err();
        assert!(matches!(err, EmitterError::UnsupportedSchema(_)));
    }

    #[test]
    fn dangling_local_ref_is_unsupported() {
        let err = lower("x", &json!({"$ref": "#/definitions/missing"}), AcronymStyle::Pascal)
            .unwrap_err();
        assert!(matches!(err, EmitterError::UnsupportedSchema(_)));
    }

    #[test]
    fn any_of_with_null() {
        let m = lower_pascal(
            "v",
            json!({"anyOf": [{"type": "integer"}, {"type": "null"}]}),
        );
        assert_eq!(m.root().kind, TypeDefKind::Alias(Type::Nullable(Box::new(Type::Integer))));
    }

    #[test]
    fn one_of_primitives_is_union() {
        let m = lower_pascal("v", json!({"oneOf": [{"type": "string"}, {"type": "boolean"}]}));
        assert_eq!(
            m.root().kind,
            TypeDefKind::Alias(Type::Union(vec![Type::String, Type::Boolean]))
        );
    }

    #[test]
    fn all_of_objects_merge() {
        let m = lower_pascal(
            "merged",
            json!({
                "allOf": [
                    {"$ref": "#/definitions/base"},
                    {"properties": {"extra": {"type": "boolean"}}, "required": ["extra"]}
                ],
                "definitions": {"base": {"properties": {"id": {"type": "string"}}, "required": ["id"]}}
            }),
        );
        let f = fields(m.root());
        let names: Vec<&str> = f.iter().map(|f| f.json_name.as_str()).collect();
        assert_eq!(names, ["extra", "id"]);
        assert!(f.iter().all(|f| f.required));
    }

    #[test]
    fn boolean_and_empty_schemas_are_any() {
        assert_eq!(lower_pascal("t", json!(true)).root().kind, TypeDefKind::Alias(Type::Any));
        assert_eq!(lower_pascal("e", json!({})).root().kind, TypeDefKind::Alias(Type::Any));
    }

    #[test]
    fn name_collisions_get_suffix() {
        let m = lower_pascal(
            "user",
            json!({"type": "object", "properties": {
                "a": {"title": "Thing", "type": "object", "properties": {"x": {"type": "string"}}},
                "b": {"title": "Thing", "type": "object", "properties": {"y": {"type": "string"}}}
            }}),
        );
        let names: Vec<&str> = m.definitions.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["User", "Thing", "Thing2"]);
    }

    #[test]
    fn unknown_type_is_unsupported() {
        let err = lower("x", &json!({"type": "decimal"}), AcronymStyle::Pascal).unwrap_err();
        assert!(matches!(err, EmitterError::UnsupportedSchema(_)));
    }

    #[test]
    fn any_type_walks_nested() {
        let m = lower_pascal(
            "m",
            json!({"type": "object", "properties": {"x": {"type": "array", "items": {"type": "number"}}}}),
        );
        assert!(m.any_type(&|t| *t == Type::Number));
        assert!(!m.any_type(&|t| *t == Type::Boolean));
    }
}
