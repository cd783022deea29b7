//! TypeScript interfaces, string enums and type aliases.

use sgen_core::{AcronymStyle, StyleOptions};

use super::{quoted, SourceWriter};
use crate::emitter::{EmitRequest, TypeEmitter};
use crate::error::EmitterError;
use crate::model::{lower, Type, TypeDef, TypeDefKind, TypeModel};
use crate::naming::{camel_case, legalize, pascal_case, upper_first, NameScope};

const RESERVED: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete", "do",
    "else", "enum", "export", "extends", "false", "finally", "for", "function", "if", "import",
    "in", "instanceof", "new", "null", "return", "super", "switch", "this", "throw", "true", "try",
    "typeof", "var", "void", "while", "with",
];

/// Emits one `.ts` module. Unless `justTypes` is set, a `Convert` class with
/// `to<Root>` / `<root>ToJson` helpers is appended.
#[derive(Debug, Default, Clone, Copy)]
pub struct TypeScriptEmitter;

impl TypeEmitter for TypeScriptEmitter {
    fn language(&self) -> &str {
        "typescript"
    }

    fn emit(&self, request: &EmitRequest<'_>) -> Result<String, EmitterError> {
        let model = lower(request.schema_id, request.schema, request.style.acronym_style())?;
        let namespace = match request.style.namespace() {
            Some(raw) => Some(namespace_name(raw)?),
            None => None,
        };
        Ok(render(request.schema_id, &model, request.style, namespace.as_deref()))
    }
}

fn namespace_name(raw: &str) -> Result<String, EmitterError> {
    let name = upper_first(&pascal_case(raw, AcronymStyle::Original));
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(EmitterError::InvalidOption {
            name: "namespace".into(),
            reason: format!("{raw:?} is not a usable TypeScript namespace"),
        });
    }
    Ok(name)
}

fn render(schema_id: &str, model: &TypeModel, style: &StyleOptions, namespace: Option<&str>) -> String {
    let acronyms = style.acronym_style();
    let root = &model.root().name;
    let mut w = SourceWriter::new("    ");

    w.line(format!("// Generated by sgen from schema {}. Do not edit.", quoted(schema_id)));
    if !style.just_types() {
        w.line("//");
        w.line("// To parse this data:");
        w.line("//");
        w.line(format!("//   const value = Convert.to{root}(json);"));
    }
    w.blank();

    if let Some(ns) = namespace {
        w.line(format!("export namespace {ns} {{"));
        w.indent();
    }

    for def in &model.definitions {
        render_def(&mut w, def, acronyms);
        w.blank();
    }

    if !style.just_types() {
        let lower_root = camel_case(root, acronyms);
        w.line("export class Convert {");
        w.indent();
        w.line(format!("public static to{root}(json: string): {root} {{"));
        w.indent();
        w.line("return JSON.parse(json);");
        w.dedent();
        w.line("}");
        w.blank();
        w.line(format!("public static {lower_root}ToJson(value: {root}): string {{"));
        w.indent();
        w.line("return JSON.stringify(value);");
        w.dedent();
        w.line("}");
        w.dedent();
        w.line("}");
    }

    if namespace.is_some() {
        w.dedent();
        w.line("}");
    }
    w.finish()
}

fn render_def(w: &mut SourceWriter, def: &TypeDef, acronyms: AcronymStyle) {
    if let Some(docs) = def.docs.as_deref() {
        w.line("/**");
        w.doc(" * ", Some(docs));
        w.line(" */");
    }
    match &def.kind {
        TypeDefKind::Struct(fields) => {
            w.line(format!("export interface {} {{", def.name));
            w.indent();
            for field in fields {
                if let Some(docs) = field.docs.as_deref() {
                    w.line("/**");
                    w.doc(" * ", Some(docs));
                    w.line(" */");
                }
                let optional = if field.required { "" } else { "?" };
                w.line(format!(
                    "{}{optional}: {};",
                    property_name(&field.json_name),
                    ts_type(&field.ty)
                ));
            }
            w.dedent();
            w.line("}");
        }
        TypeDefKind::Enum(values) => {
            w.line(format!("export enum {} {{", def.name));
            w.indent();
            let mut scope = NameScope::new();
            for value in values {
                let base = legalize(upper_first(&pascal_case(value, acronyms)), "Empty", "The", RESERVED);
                w.line(format!("{} = {},", scope.claim(&base), quoted(value)));
            }
            w.dedent();
            w.line("}");
        }
        TypeDefKind::Alias(ty) => {
            w.line(format!("export type {} = {};", def.name, ts_type(ty)));
        }
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn property_name(json_name: &str) -> String {
    if is_identifier(json_name) {
        json_name.to_string()
    } else {
        quoted(json_name)
    }
}

fn ts_type(ty: &Type) -> String {
    match ty {
        Type::String => "string".into(),
        Type::Integer | Type::Number => "number".into(),
        Type::Boolean => "boolean".into(),
        Type::Null => "null".into(),
        Type::Any => "any".into(),
        Type::Array(inner) => {
            let rendered = ts_type(inner);
            if matches!(**inner, Type::Union(_) | Type::Nullable(_)) {
                format!("({rendered})[]")
            } else {
                format!("{rendered}[]")
            }
        }
        Type::Map(inner) => format!("{{ [key: string]: {} }}", ts_type(inner)),
        Type::Named(name) => name.clone(),
        Type::Nullable(inner) => format!("{} | null", ts_type(inner)),
        Type::Union(items) => items.iter().map(ts_type).collect::<Vec<_>>().join(" | "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn emit(id: &str, schema: Value, style: &[(&str, Value)]) -> Result<String, EmitterError> {
        let style = StyleOptions::from_map(
            style.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
        )
        .unwrap();
        TypeScriptEmitter.emit(&EmitRequest {
            schema_id: id,
            schema: &schema,
            style: &style,
        })
    }

    #[test]
    fn interface_with_optional_and_quoted_names() {
        let out = emit(
            "person",
            json!({"type": "object", "properties": {
                "name": {"type": "string"},
                "first-name": {"type": "string"},
                "age": {"type": "integer", "description": "Years."}
            }, "required": ["name"]}),
            &[],
        )
        .unwrap();
        assert!(out.contains("export interface Person {"));
        assert!(out.contains("    name: string;"));
        assert!(out.contains("    age?: number;"));
        assert!(out.contains("    \"first-name\"?: string;"));
        assert!(out.contains("     * Years."));
        assert!(out.contains("public static toPerson(json: string): Person {"));
        assert!(out.contains("public static personToJson(value: Person): string {"));
    }

    #[test]
    fn just_types_has_no_convert_class() {
        let out = emit("p", json!({"type": "string"}), &[("justTypes", json!(true))]).unwrap();
        assert!(!out.contains("Convert"));
        assert!(out.contains("export type P = string;"));
    }

    #[test]
    fn namespace_wraps_everything() {
        let out = emit("p", json!({"type": "string"}), &[("namespace", json!("api models"))]).unwrap();
        assert!(out.contains("export namespace ApiModels {"));
        assert!(out.contains("    export type P = string;"));
        assert!(out.trim_end().ends_with('}'));
    }

    #[test]
    fn enum_members() {
        let out = emit("color", json!({"enum": ["dark red", "blue", "1st"]}), &[]).unwrap();
        assert!(out.contains("export enum Color {"));
        assert!(out.contains("DarkRed = \"dark red\","));
        assert!(out.contains("Blue = \"blue\","));
        assert!(out.contains("The1St = \"1st\","));
    }

    #[test]
    fn nullable_arrays_and_maps() {
        let out = emit(
            "m",
            json!({"type": "object", "properties": {
                "xs": {"type": "array", "items": {"type": ["string", "null"]}},
                "scores": {"additionalProperties": {"type": "number"}, "type": "object"}
            }, "required": ["xs", "scores"]}),
            &[],
        )
        .unwrap();
        assert!(out.contains("xs: (string | null)[];"));
        assert!(out.contains("scores: { [key: string]: number };"));
    }

    #[test]
    fn invalid_namespace_rejected() {
        let err = emit("p", json!({}), &[("namespace", json!("9lives"))]).unwrap_err();
        assert!(matches!(err, EmitterError::InvalidOption { .. }));
    }
}
