//! Python dataclasses and `Enum`s.

use std::collections::BTreeSet;

use sgen_core::StyleOptions;

use super::{quoted, SourceWriter};
use crate::emitter::{EmitRequest, TypeEmitter};
use crate::error::EmitterError;
use crate::model::{lower, Field, Type, TypeDef, TypeDefKind, TypeModel};
use crate::naming::{legalize, screaming_snake_case, snake_case, NameScope};

const KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class", "continue",
    "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if", "import",
    "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try", "while",
    "with", "yield",
];

/// Alias chains longer than this are converted as plain values.
const MAX_ALIAS_DEPTH: usize = 8;

/// Emits one Python module. Unless `justTypes` is set, every dataclass gets
/// `from_dict` / `to_dict` and the module gets `<root>_from_dict` /
/// `<root>_to_dict` entry points.
#[derive(Debug, Default, Clone, Copy)]
pub struct PythonEmitter;

impl TypeEmitter for PythonEmitter {
    fn language(&self) -> &str {
        "python"
    }

    fn emit(&self, request: &EmitRequest<'_>) -> Result<String, EmitterError> {
        let model = lower(request.schema_id, request.schema, request.style.acronym_style())?;
        Ok(Renderer::new(&model, request.style).render(request.schema_id))
    }
}

struct Renderer<'m> {
    model: &'m TypeModel,
    helpers: bool,
    typing: BTreeSet<&'static str>,
}

impl<'m> Renderer<'m> {
    fn new(model: &'m TypeModel, style: &StyleOptions) -> Self {
        Self {
            model,
            helpers: !style.just_types(),
            typing: BTreeSet::new(),
        }
    }

    fn render(mut self, schema_id: &str) -> String {
        let model = self.model;
        let mut body = SourceWriter::new("    ");
        let (aliases, others): (Vec<&TypeDef>, Vec<&TypeDef>) = model
            .definitions
            .iter()
            .partition(|d| matches!(d.kind, TypeDefKind::Alias(_)));

        for def in &others {
            match &def.kind {
                TypeDefKind::Struct(fields) => self.render_struct(&mut body, def, fields),
                TypeDefKind::Enum(values) => render_enum(&mut body, def, values),
                TypeDefKind::Alias(_) => {}
            }
            body.blank();
        }
        for def in &aliases {
            if let TypeDefKind::Alias(ty) = &def.kind {
                let rendered = self.py_type(ty, true);
                body.doc("# ", def.docs.as_deref());
                body.line(format!("{} = {rendered}", def.name));
                body.blank();
            }
        }
        if self.helpers {
            self.render_entry_points(&mut body);
        }

        let mut head = SourceWriter::new("    ");
        head.line(format!("# Generated by sgen from schema {}. Do not edit.", quoted(schema_id)));
        head.blank();
        head.line("from __future__ import annotations");
        head.blank();
        if others.iter().any(|d| matches!(d.kind, TypeDefKind::Struct(_))) {
            head.line("from dataclasses import dataclass");
        }
        if others.iter().any(|d| matches!(d.kind, TypeDefKind::Enum(_))) {
            head.line("from enum import Enum");
        }
        if !self.typing.is_empty() {
            let names: Vec<&str> = self.typing.iter().copied().collect();
            head.line(format!("from typing import {}", names.join(", ")));
        }

        let mut out = head.finish();
        out.push_str("\n\n");
        out.push_str(&body.finish());
        out
    }

    fn render_struct(&mut self, w: &mut SourceWriter, def: &TypeDef, fields: &[Field]) {
        w.line("@dataclass");
        w.line(format!("class {}:", def.name));
        w.indent();
        if let Some(docs) = def.docs.as_deref() {
            w.line("\"\"\"");
            w.doc("", Some(docs));
            w.line("\"\"\"");
            w.blank();
        }

        let mut scope = NameScope::new();
        let mut ordered: Vec<(String, &Field)> = fields
            .iter()
            .map(|f| (scope.claim(&legalize(snake_case(&f.json_name), "field", "f_", KEYWORDS)), f))
            .collect();
        ordered.sort_by_key(|(_, f)| !f.required);

        if ordered.is_empty() && !self.helpers {
            w.line("pass");
        }
        for (name, field) in &ordered {
            let ty = self.py_type(&field.ty, false);
            if field.required {
                w.line(format!("{name}: {ty}"));
            } else {
                let ty = self.optional(ty, &field.ty);
                w.line(format!("{name}: {ty} = None"));
            }
            w.doc("# ", field.docs.as_deref());
        }

        if self.helpers {
            self.typing.insert("Any");
            self.typing.insert("Dict");
            if !ordered.is_empty() {
                w.blank();
            }
            w.line("@staticmethod");
            w.line(format!("def from_dict(obj: Dict[str, Any]) -> {}:", def.name));
            w.indent();
            for (name, field) in &ordered {
                let key = quoted(&field.json_name);
                if field.required {
                    w.line(format!("{name} = {}", self.from_expr(&field.ty, &format!("obj[{key}]"), 0)));
                } else {
                    let conv = self.from_expr(&field.ty, "value", 0);
                    if conv == "value" {
                        w.line(format!("{name} = obj.get({key})"));
                    } else {
                        w.line(format!("value = obj.get({key})"));
                        w.line(format!("{name} = None if value is None else {conv}"));
                    }
                }
            }
            let args: Vec<String> = ordered.iter().map(|(n, _)| format!("{n}={n}")).collect();
            w.line(format!("return {}({})", def.name, args.join(", ")));
            w.dedent();
            w.blank();
            w.line("def to_dict(self) -> Dict[str, Any]:");
            w.indent();
            w.line("result: Dict[str, Any] = {}");
            for (name, field) in &ordered {
                let key = quoted(&field.json_name);
                let conv = self.to_expr(&field.ty, &format!("self.{name}"), 0);
                if field.required {
                    w.line(format!("result[{key}] = {conv}"));
                } else {
                    w.line(format!("if self.{name} is not None:"));
                    w.indent();
                    w.line(format!("result[{key}] = {conv}"));
                    w.dedent();
                }
            }
            w.line("return result");
            w.dedent();
        }
        w.dedent();
    }

    fn render_entry_points(&mut self, w: &mut SourceWriter) {
        self.typing.insert("Any");
        let root = &self.model.root().name;
        let stem = snake_case(root);
        w.blank();
        w.line(format!("def {stem}_from_dict(s: Any) -> {root}:"));
        w.indent();
        w.line(format!("return {}", self.from_expr(&Type::Named(root.clone()), "s", 0)));
        w.dedent();
        w.blank();
        w.line(format!("def {stem}_to_dict(x: {root}) -> Any:"));
        w.indent();
        w.line(format!("return {}", self.to_expr(&Type::Named(root.clone()), "x", 0)));
        w.dedent();
    }

    fn optional(&mut self, rendered: String, ty: &Type) -> String {
        if matches!(ty, Type::Nullable(_) | Type::Any | Type::Null) {
            rendered
        } else {
            self.typing.insert("Optional");
            format!("Optional[{rendered}]")
        }
    }

    fn py_type(&mut self, ty: &Type, quote_names: bool) -> String {
        match ty {
            Type::String => "str".into(),
            Type::Integer => "int".into(),
            Type::Number => "float".into(),
            Type::Boolean => "bool".into(),
            Type::Null => "None".into(),
            Type::Any => {
                self.typing.insert("Any");
                "Any".into()
            }
            Type::Array(inner) => {
                self.typing.insert("List");
                format!("List[{}]", self.py_type(inner, quote_names))
            }
            Type::Map(inner) => {
                self.typing.insert("Dict");
                format!("Dict[str, {}]", self.py_type(inner, quote_names))
            }
            Type::Named(name) if quote_names => quoted(name),
            Type::Named(name) => name.clone(),
            Type::Nullable(inner) => {
                self.typing.insert("Optional");
                format!("Optional[{}]", self.py_type(inner, quote_names))
            }
            Type::Union(items) => {
                self.typing.insert("Union");
                let parts: Vec<String> = items.iter().map(|t| self.py_type(t, quote_names)).collect();
                format!("Union[{}]", parts.join(", "))
            }
        }
    }

    /// Expression converting JSON-shaped `var` into `ty`.
    fn from_expr(&self, ty: &Type, var: &str, depth: usize) -> String {
        match ty {
            Type::Array(inner) => {
                let item = format!("v{depth}");
                let conv = self.from_expr(inner, &item, depth + 1);
                if conv == item {
                    format!("list({var})")
                } else {
                    format!("[{conv} for {item} in {var}]")
                }
            }
            Type::Map(inner) => {
                let item = format!("v{depth}");
                let conv = self.from_expr(inner, &item, depth + 1);
                if conv == item {
                    format!("dict({var})")
                } else {
                    format!("{{k{depth}: {conv} for k{depth}, {item} in {var}.items()}}")
                }
            }
            Type::Nullable(inner) => {
                let conv = self.from_expr(inner, var, depth);
                if conv == var {
                    conv
                } else {
                    format!("(None if {var} is None else {conv})")
                }
            }
            Type::Number => format!("float({var})"),
            Type::Named(name) => match self.model.get(name).map(|d| &d.kind) {
                Some(TypeDefKind::Struct(_)) => format!("{name}.from_dict({var})"),
                Some(TypeDefKind::Enum(_)) => format!("{name}({var})"),
                Some(TypeDefKind::Alias(target)) if depth < MAX_ALIAS_DEPTH => {
                    self.from_expr(target, var, depth + 1)
                }
                _ => var.to_string(),
            },
            _ => var.to_string(),
        }
    }

    /// Expression converting `var` of type `ty` back into JSON-shaped data.
    fn to_expr(&self, ty: &Type, var: &str, depth: usize) -> String {
        match ty {
            Type::Array(inner) => {
                let item = format!("v{depth}");
                let conv = self.to_expr(inner, &item, depth + 1);
                if conv == item {
                    format!("list({var})")
                } else {
                    format!("[{conv} for {item} in {var}]")
                }
            }
            Type::Map(inner) => {
                let item = format!("v{depth}");
                let conv = self.to_expr(inner, &item, depth + 1);
                if conv == item {
                    format!("dict({var})")
                } else {
                    format!("{{k{depth}: {conv} for k{depth}, {item} in {var}.items()}}")
                }
            }
            Type::Nullable(inner) => {
                let conv = self.to_expr(inner, var, depth);
                if conv == var {
                    conv
                } else {
                    format!("(None if {var} is None else {conv})")
                }
            }
            Type::Named(name) => match self.model.get(name).map(|d| &d.kind) {
                Some(TypeDefKind::Struct(_)) => format!("{var}.to_dict()"),
                Some(TypeDefKind::Enum(_)) => format!("{var}.value"),
                Some(TypeDefKind::Alias(target)) if depth < MAX_ALIAS_DEPTH => {
                    self.to_expr(target, var, depth + 1)
                }
                _ => var.to_string(),
            },
            _ => var.to_string(),
        }
    }
}

fn render_enum(w: &mut SourceWriter, def: &TypeDef, values: &[String]) {
    w.line(format!("class {}(Enum):", def.name));
    w.indent();
    if let Some(docs) = def.docs.as_deref() {
        w.line("\"\"\"");
        w.doc("", Some(docs));
        w.line("\"\"\"");
        w.blank();
    }
    let mut scope = NameScope::new();
    for value in values {
        let member = scope.claim(&legalize(screaming_snake_case(value), "EMPTY", "V_", &[]));
        w.line(format!("{member} = {}", quoted(value)));
    }
    w.dedent();
}
