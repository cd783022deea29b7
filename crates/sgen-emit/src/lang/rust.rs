//! Rust structs and enums with serde attributes.

use std::collections::{HashMap, HashSet};

use sgen_core::{AcronymStyle, StyleOptions};

use super::SourceWriter;
use crate::emitter::{EmitRequest, TypeEmitter};
use crate::error::EmitterError;
use crate::model::{lower, Field, Type, TypeDef, TypeDefKind, TypeModel};
use crate::naming::{legalize, pascal_case, snake_case, upper_first, NameScope};

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub",
    "ref", "return", "self", "static", "struct", "super", "trait", "true", "type", "unsafe", "use",
    "where", "while", "abstract", "become", "box", "do", "final", "gen", "macro", "override",
    "priv", "try", "typeof", "unsized", "virtual", "yield",
];

/// Emits one Rust module. With `justTypes` the serde derives and
/// attributes are left out.
#[derive(Debug, Default, Clone, Copy)]
pub struct RustEmitter;

impl TypeEmitter for RustEmitter {
    fn language(&self) -> &str {
        "rust"
    }

    fn emit(&self, request: &EmitRequest<'_>) -> Result<String, EmitterError> {
        let model = lower(request.schema_id, request.schema, request.style.acronym_style())?;
        let module = match request.style.namespace() {
            Some(raw) => Some(module_name(raw)?),
            None => None,
        };
        Ok(render(request.schema_id, &model, request.style, module.as_deref()))
    }
}

fn module_name(raw: &str) -> Result<String, EmitterError> {
    let name = snake_case(raw);
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) || KEYWORDS.contains(&name.as_str()) {
        return Err(EmitterError::InvalidOption {
            name: "namespace".into(),
            reason: format!("{raw:?} is not a usable Rust module name"),
        });
    }
    Ok(name)
}

fn render(schema_id: &str, model: &TypeModel, style: &StyleOptions, module: Option<&str>) -> String {
    let serde = !style.just_types();
    let acronyms = style.acronym_style();
    let boxed = recursive_edges(model);
    let mut w = SourceWriter::new("    ");

    w.line(format!("// Generated by sgen from schema {schema_id:?}. Do not edit."));
    if serde {
        w.line("//");
        w.line(format!(
            "// let value: {} = serde_json::from_str(&json)?;",
            model.root().name
        ));
    }
    w.blank();

    if let Some(name) = module {
        w.line(format!("pub mod {name} {{"));
        w.indent();
    }

    let mut uses = Vec::new();
    if serde {
        uses.push("use serde::{Deserialize, Serialize};");
    }
    if model.any_type(&|t| matches!(t, Type::Map(_))) {
        uses.push("use std::collections::HashMap;");
    }
    for u in &uses {
        w.line(*u);
    }
    if !uses.is_empty() {
        w.blank();
    }

    for def in &model.definitions {
        render_def(&mut w, def, serde, acronyms, &boxed);
        w.blank();
    }

    if module.is_some() {
        w.dedent();
        w.line("}");
    }
    w.finish()
}

fn render_def(
    w: &mut SourceWriter,
    def: &TypeDef,
    serde: bool,
    acronyms: AcronymStyle,
    boxed: &HashSet<(String, String)>,
) {
    w.doc("/// ", def.docs.as_deref());
    match &def.kind {
        TypeDefKind::Struct(fields) => {
            if serde {
                w.line("#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]");
            } else {
                w.line("#[derive(Debug, Clone, PartialEq)]");
            }
            w.line(format!("pub struct {} {{", def.name));
            w.indent();
            let mut scope = NameScope::new();
            for field in fields {
                render_field(w, &def.name, field, serde, &mut scope, boxed);
            }
            w.dedent();
            w.line("}");
        }
        TypeDefKind::Enum(values) => {
            if serde {
                w.line("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]");
            } else {
                w.line("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]");
            }
            w.line(format!("pub enum {} {{", def.name));
            w.indent();
            let mut scope = NameScope::new();
            for value in values {
                let base = legalize(upper_first(&pascal_case(value, acronyms)), "Empty", "V", &["Self"]);
                let variant = scope.claim(&base);
                if serde && variant != *value {
                    w.line(format!("#[serde(rename = {value:?})]"));
                }
                w.line(format!("{variant},"));
            }
            w.dedent();
            w.line("}");
        }
        TypeDefKind::Alias(ty) => {
            w.line(format!("pub type {} = {};", def.name, rust_type(ty)));
        }
    }
}

fn render_field(
    w: &mut SourceWriter,
    owner: &str,
    field: &Field,
    serde: bool,
    scope: &mut NameScope,
    boxed: &HashSet<(String, String)>,
) {
    w.doc("/// ", field.docs.as_deref());
    let base = legalize(snake_case(&field.json_name), "field", "f", KEYWORDS);
    let name = scope.claim(&base);

    let inner = match &field.ty {
        Type::Named(target) if boxed.contains(&(owner.to_string(), target.clone())) => {
            format!("Box<{target}>")
        }
        Type::Nullable(inner) => match inner.as_ref() {
            Type::Named(target) if boxed.contains(&(owner.to_string(), target.clone())) => {
                format!("Option<Box<{target}>>")
            }
            _ => rust_type(&field.ty),
        },
        other => rust_type(other),
    };
    let optional = !field.required && !matches!(field.ty, Type::Nullable(_) | Type::Any | Type::Null);
    let ty = if optional { format!("Option<{inner}>") } else { inner };

    if serde {
        let mut attrs = Vec::new();
        if name != field.json_name {
            attrs.push(format!("rename = {:?}", field.json_name));
        }
        if !field.required {
            attrs.push("default".to_string());
            if ty.starts_with("Option<") {
                attrs.push("skip_serializing_if = \"Option::is_none\"".to_string());
            }
        }
        if !attrs.is_empty() {
            w.line(format!("#[serde({})]", attrs.join(", ")));
        }
    }
    w.line(format!("pub {name}: {ty},"));
}

/// `(owner, target)` pairs where `owner` holds `target` inline and
/// `target` leads back to `owner`; those fields need a `Box`.
fn recursive_edges(model: &TypeModel) -> HashSet<(String, String)> {
    let mut inline: HashMap<&str, Vec<&str>> = HashMap::new();
    for def in &model.definitions {
        let targets = inline.entry(def.name.as_str()).or_default();
        match &def.kind {
            TypeDefKind::Struct(fields) => {
                for field in fields {
                    if let Some(t) = inline_target(&field.ty) {
                        targets.push(t);
                    }
                }
            }
            TypeDefKind::Alias(ty) => {
                if let Some(t) = inline_target(ty) {
                    targets.push(t);
                }
            }
            TypeDefKind::Enum(_) => {}
        }
    }

    let reaches = |from: &str, to: &str| -> bool {
        let mut stack = vec![from];
        let mut seen = HashSet::new();
        while let Some(next) = stack.pop() {
            if next == to {
                return true;
            }
            if seen.insert(next) {
                if let Some(targets) = inline.get(next) {
                    stack.extend(targets.iter().copied());
                }
            }
        }
        false
    };

    let mut edges = HashSet::new();
    for (owner, targets) in &inline {
        for target in targets {
            if reaches(*target, *owner) {
                edges.insert((owner.to_string(), target.to_string()));
            }
        }
    }
    edges
}

fn inline_target(ty: &Type) -> Option<&str> {
    match ty {
        Type::Named(name) => Some(name),
        Type::Nullable(inner) => inline_target(inner),
        _ => None,
    }
}

fn rust_type(ty: &Type) -> String {
    match ty {
        Type::String => "String".into(),
        Type::Integer => "i64".into(),
        Type::Number => "f64".into(),
        Type::Boolean => "bool".into(),
        Type::Null => "Option<serde_json::Value>".into(),
        Type::Any | Type::Union(_) => "serde_json::Value".into(),
        Type::Array(inner) => format!("Vec<{}>", rust_type(inner)),
        Type::Map(inner) => format!("HashMap<String, {}>", rust_type(inner)),
        Type::Named(name) => name.clone(),
        Type::Nullable(inner) => format!("Option<{}>", rust_type(inner)),
    }
}
