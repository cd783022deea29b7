//! Go structs with `encoding/json` tags.

use sgen_core::{AcronymStyle, StyleOptions};

use super::{quoted, SourceWriter};
use crate::emitter::{EmitRequest, TypeEmitter};
use crate::error::EmitterError;
use crate::model::{lower, Field, Type, TypeDef, TypeDefKind, TypeModel};
use crate::naming::{legalize, pascal_case, upper_first, NameScope};

/// Emits a single Go file: one `type` per definition, plus
/// `Unmarshal<Root>` / `Marshal<Root>` helpers unless `justTypes` is set.
#[derive(Debug, Default, Clone, Copy)]
pub struct GoEmitter;

impl TypeEmitter for GoEmitter {
    fn language(&self) -> &str {
        "go"
    }

    fn emit(&self, request: &EmitRequest<'_>) -> Result<String, EmitterError> {
        let style = request.style.acronym_style();
        let model = lower(request.schema_id, request.schema, style)?;
        let package = package_name(request.style)?;
        Ok(render(request.schema_id, &model, request.style, &package))
    }
}

fn package_name(style: &StyleOptions) -> Result<String, EmitterError> {
    let Some(raw) = style.package_name() else {
        return Ok("main".to_string());
    };
    let name: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(EmitterError::InvalidOption {
            name: "packageName".into(),
            reason: format!("{raw:?} is not a usable Go package name"),
        });
    }
    Ok(name)
}

fn render(schema_id: &str, model: &TypeModel, style: &StyleOptions, package: &str) -> String {
    let acronyms = style.acronym_style();
    let root = &model.root().name;
    let mut w = SourceWriter::new("\t");

    w.line(format!("// Code generated by sgen from schema {}. DO NOT EDIT.", quoted(schema_id)));
    if !style.just_types() {
        w.line("//");
        w.line("// To parse and unparse this JSON data, add this code to your project and do:");
        w.line("//");
        w.line(format!("//    value, err := Unmarshal{root}(bytes)"));
        w.line(format!("//    bytes, err = Marshal{root}(value)"));
    }
    w.blank();
    w.line(format!("package {package}"));
    w.blank();

    if !style.just_types() {
        w.line("import \"encoding/json\"");
        w.blank();
        w.line(format!("func Unmarshal{root}(data []byte) ({root}, error) {{"));
        w.indent();
        w.line(format!("var r {root}"));
        w.line("err := json.Unmarshal(data, &r)");
        w.line("return r, err");
        w.dedent();
        w.line("}");
        w.blank();
        w.line(format!("func Marshal{root}(r {root}) ([]byte, error) {{"));
        w.indent();
        w.line("return json.Marshal(r)");
        w.dedent();
        w.line("}");
        w.blank();
    }

    // Enum constants share the package namespace with type names.
    let mut package_scope = NameScope::new();
    for def in &model.definitions {
        package_scope.claim(&def.name);
    }

    for def in &model.definitions {
        render_def(&mut w, def, acronyms, &mut package_scope);
        w.blank();
    }
    w.finish()
}

fn render_def(w: &mut SourceWriter, def: &TypeDef, acronyms: AcronymStyle, scope: &mut NameScope) {
    w.doc("// ", def.docs.as_deref());
    match &def.kind {
        TypeDefKind::Struct(fields) => {
            if fields.is_empty() {
                w.line(format!("type {} struct{{}}", def.name));
                return;
            }
            w.line(format!("type {} struct {{", def.name));
            w.indent();
            let rows = struct_rows(fields, acronyms);
            let name_width = rows.iter().map(|r| r.name.len()).max().unwrap_or(0);
            let type_width = rows.iter().map(|r| r.ty.len()).max().unwrap_or(0);
            for (row, field) in rows.iter().zip(fields) {
                w.doc("// ", field.docs.as_deref());
                w.line(format!(
                    "{:<nw$} {:<tw$} {}",
                    row.name,
                    row.ty,
                    row.tag,
                    nw = name_width,
                    tw = type_width
                ));
            }
            w.dedent();
            w.line("}");
        }
        TypeDefKind::Enum(values) => {
            w.line(format!("type {} string", def.name));
            w.blank();
            w.line("const (");
            w.indent();
            for value in values {
                let base = legalize(
                    format!("{}{}", def.name, upper_first(&pascal_case(value, acronyms))),
                    &def.name,
                    "V",
                    &[],
                );
                let name = if base == def.name {
                    scope.claim(&format!("{}Empty", def.name))
                } else {
                    scope.claim(&base)
                };
                w.line(format!("{name} {} = {}", def.name, quoted(value)));
            }
            w.dedent();
            w.line(")");
        }
        TypeDefKind::Alias(ty) => {
            w.line(format!("type {} {}", def.name, go_type(ty)));
        }
    }
}

struct Row {
    name: String,
    ty: String,
    tag: String,
}

fn struct_rows(fields: &[Field], acronyms: AcronymStyle) -> Vec<Row> {
    let mut scope = NameScope::new();
    fields
        .iter()
        .map(|field| {
            let base = legalize(
                upper_first(&pascal_case(&field.json_name, acronyms)),
                "Field",
                "F",
                &[],
            );
            let name = scope.claim(&base);
            let ty = if field.required {
                go_type(&field.ty)
            } else {
                go_type(&Type::Nullable(Box::new(field.ty.clone())))
            };
            let tag = if field.required {
                format!("`json:\"{}\"`", tag_name(&field.json_name))
            } else {
                format!("`json:\"{},omitempty\"`", tag_name(&field.json_name))
            };
            Row { name, ty, tag }
        })
        .collect()
}

/// Struct tags cannot contain `"` or `` ` ``; such names are left to the
/// default field matching.
fn tag_name(json_name: &str) -> String {
    json_name.replace(['"', '`', ','], "")
}

fn go_type(ty: &Type) -> String {
    match ty {
        Type::String => "string".into(),
        Type::Integer => "int64".into(),
        Type::Number => "float64".into(),
        Type::Boolean => "bool".into(),
        Type::Null | Type::Any | Type::Union(_) => "interface{}".into(),
        Type::Array(inner) => format!("[]{}", go_type(inner)),
        Type::Map(inner) => format!("map[string]{}", go_type(inner)),
        Type::Named(name) => name.clone(),
        Type::Nullable(inner) => {
            let rendered = go_type(inner);
            if rendered.starts_with('*')
                || rendered.starts_with("[]")
                || rendered.starts_with("map[")
                || rendered == "interface{}"
            {
                rendered
            } else {
                format!("*{rendered}")
            }
        }
    }
}
