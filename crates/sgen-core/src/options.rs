//! # Generation Options
//!
//! `GenerationOptions` pairs a target language with style flags. Options are
//! part of the cache key, so two requests that mean the same thing must
//! produce byte-identical canonical options:
//!
//! - the language is resolved to its canonical name (`ts` → `typescript`);
//! - style flags are checked against the static [`STYLE_OPTIONS`] catalogue;
//! - flags set to their default value are dropped, so `{}` and
//!   `{"justTypes": false}` describe the same work.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::OptionsError;
use crate::language::canonical_language;

/// Accepted value shape of a style option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "values")]
pub enum StyleOptionKind {
    /// `true` / `false`.
    Bool,
    /// Free-form string; empty means unset.
    String,
    /// One of a fixed set of strings.
    Enum(&'static [&'static str]),
}

/// Static description of a recognized style option.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleOptionSpec {
    /// Option name as it appears in requests.
    pub name: &'static str,
    /// Accepted value shape.
    pub kind: StyleOptionKind,
    /// Default value rendered as a string (empty for "unset").
    pub default: &'static str,
    /// What the option changes in generated output.
    pub description: &'static str,
}

/// Every style option the service recognizes.
pub const STYLE_OPTIONS: &[StyleOptionSpec] = &[
    StyleOptionSpec {
        name: "justTypes",
        kind: StyleOptionKind::Bool,
        default: "false",
        description: "Emit only type declarations, without parse/serialize helpers.",
    },
    StyleOptionSpec {
        name: "acronymStyle",
        kind: StyleOptionKind::Enum(&["original", "pascal", "camel", "lowerCase"]),
        default: "pascal",
        description: "Casing applied to acronyms inside generated identifiers (URL → Url, url, URL).",
    },
    StyleOptionSpec {
        name: "packageName",
        kind: StyleOptionKind::String,
        default: "",
        description: "Package or module name for languages that declare one (Go `package`).",
    },
    StyleOptionSpec {
        name: "namespace",
        kind: StyleOptionKind::String,
        default: "",
        description: "Wrap declarations in a namespace or module (TypeScript `namespace`, Rust `mod`).",
    },
];

/// Look up a style option spec by name.
pub fn style_option(name: &str) -> Option<&'static StyleOptionSpec> {
    STYLE_OPTIONS.iter().find(|s| s.name == name)
}

/// How acronyms inside identifiers are cased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AcronymStyle {
    /// Keep the acronym exactly as written (`URLValue`).
    Original,
    /// Capitalize the first letter only (`UrlValue`).
    #[default]
    Pascal,
    /// Lowercase the whole acronym unless it starts the identifier (`urlValue` / `valueUrl`).
    Camel,
    /// Lowercase the whole acronym (`urlvalue`-style words).
    LowerCase,
}

impl AcronymStyle {
    /// Parse from the wire spelling.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "original" => Some(Self::Original),
            "pascal" => Some(Self::Pascal),
            "camel" => Some(Self::Camel),
            "lowerCase" => Some(Self::LowerCase),
            _ => None,
        }
    }
}

/// Validated, normalized style flags.
///
/// Only non-default values are stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StyleOptions(BTreeMap<String, Value>);

impl StyleOptions {
    /// Validate and normalize a raw option map.
    ///
    /// # Errors
    ///
    /// `OptionsError::UnknownOption` for names outside [`STYLE_OPTIONS`],
    /// `OptionsError::InvalidValue` for values of the wrong shape.
    pub fn from_map(raw: BTreeMap<String, Value>) -> Result<Self, OptionsError> {
        let mut normalized = BTreeMap::new();
        for (name, value) in raw {
            let spec =
                style_option(&name).ok_or_else(|| OptionsError::UnknownOption(name.clone()))?;
            if let Some(value) = normalize_value(spec, value)? {
                normalized.insert(name, value);
            }
        }
        Ok(Self(normalized))
    }

    /// Raw access to the normalized map.
    pub fn as_map(&self) -> &BTreeMap<String, Value> {
        &self.0
    }

    /// Whether helper code should be omitted.
    pub fn just_types(&self) -> bool {
        self.0.get("justTypes").and_then(Value::as_bool).unwrap_or(false)
    }

    /// Acronym casing for identifiers.
    pub fn acronym_style(&self) -> AcronymStyle {
        self.0
            .get("acronymStyle")
            .and_then(Value::as_str)
            .and_then(AcronymStyle::parse)
            .unwrap_or_default()
    }

    /// Package name, if set.
    pub fn package_name(&self) -> Option<&str> {
        self.0.get("packageName").and_then(Value::as_str)
    }

    /// Namespace, if set.
    pub fn namespace(&self) -> Option<&str> {
        self.0.get("namespace").and_then(Value::as_str)
    }
}

/// Returns `Ok(None)` when the value equals the option's default.
fn normalize_value(spec: &StyleOptionSpec, value: Value) -> Result<Option<Value>, OptionsError> {
    let invalid = |expected: String, value: &Value| OptionsError::InvalidValue {
        name: spec.name.to_string(),
        expected,
        actual: value.to_string(),
    };
    match spec.kind {
        StyleOptionKind::Bool => match value {
            Value::Bool(b) if b.to_string() == spec.default => Ok(None),
            Value::Bool(_) => Ok(Some(value)),
            other => Err(invalid("a boolean".into(), &other)),
        },
        StyleOptionKind::String => match value {
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() || trimmed == spec.default {
                    Ok(None)
                } else {
                    Ok(Some(Value::String(trimmed.to_string())))
                }
            }
            Value::Null => Ok(None),
            other => Err(invalid("a string".into(), &other)),
        },
        StyleOptionKind::Enum(allowed) => match value {
            Value::String(ref s) if allowed.contains(&s.as_str()) => {
                if s == spec.default {
                    Ok(None)
                } else {
                    Ok(Some(value))
                }
            }
            other => Err(invalid(format!("one of {allowed:?}"), &other)),
        },
    }
}

/// Target language plus style flags for one generation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawGenerationOptions")]
pub struct GenerationOptions {
    target_language: String,
    style: StyleOptions,
}

impl GenerationOptions {
    /// Build validated options.
    pub fn new(
        target_language: &str,
        style: BTreeMap<String, Value>,
    ) -> Result<Self, OptionsError> {
        let target_language = canonical_language(target_language);
        if target_language.is_empty() {
            return Err(OptionsError::EmptyLanguage);
        }
        Ok(Self {
            target_language,
            style: StyleOptions::from_map(style)?,
        })
    }

    /// Options with default style for a language.
    pub fn for_language(target_language: &str) -> Result<Self, OptionsError> {
        Self::new(target_language, BTreeMap::new())
    }

    /// Canonical target language name.
    pub fn target_language(&self) -> &str {
        &self.target_language
    }

    /// Normalized style flags.
    pub fn style(&self) -> &StyleOptions {
        &self.style
    }
}

impl fmt::Display for GenerationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.target_language)?;
        for (k, v) in self.style.as_map() {
            write!(f, " {k}={v}")?;
        }
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGenerationOptions {
    target_language: String,
    #[serde(default)]
    style: BTreeMap<String, Value>,
}

impl TryFrom<RawGenerationOptions> for GenerationOptions {
    type Error = OptionsError;

    fn try_from(raw: RawGenerationOptions) -> Result<Self, Self::Error> {
        Self::new(&raw.target_language, raw.style)
    }
}
