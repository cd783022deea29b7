//! Registry of type emitters, keyed by canonical language name.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use sgen_core::{canonical_language, extension_for, lookup_language};

use crate::emitter::TypeEmitter;
use crate::lang::{GoEmitter, PythonEmitter, RustEmitter, TypeScriptEmitter};

/// Introspection entry for one generatable language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageSummary {
    /// Canonical name.
    pub name: String,
    /// Human-readable name.
    pub display_name: String,
    /// Packaged file extension.
    pub extension: String,
    /// Accepted alternative spellings.
    pub aliases: Vec<String>,
}

/// Owned set of emitters.
///
/// Passed into the engine explicitly; tests build their own with stub
/// emitters.
#[derive(Clone, Default)]
pub struct EmitterRegistry {
    emitters: BTreeMap<String, Arc<dyn TypeEmitter>>,
}

impl fmt::Debug for EmitterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmitterRegistry")
            .field("languages", &self.emitters.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl EmitterRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in Go, TypeScript, Rust and Python emitters.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(GoEmitter));
        registry.register(Arc::new(TypeScriptEmitter));
        registry.register(Arc::new(RustEmitter));
        registry.register(Arc::new(PythonEmitter));
        registry
    }

    /// Add or replace the emitter for its language.
    pub fn register(&mut self, emitter: Arc<dyn TypeEmitter>) {
        let language = canonical_language(emitter.language());
        tracing::debug!(language = %language, "emitter registered");
        self.emitters.insert(language, emitter);
    }

    /// Emitter for a language name or alias.
    pub fn get(&self, language: &str) -> Option<Arc<dyn TypeEmitter>> {
        self.emitters.get(&canonical_language(language)).cloned()
    }

    /// Whether any emitter answers to `language`.
    pub fn supports(&self, language: &str) -> bool {
        self.emitters.contains_key(&canonical_language(language))
    }

    /// Every registered language, sorted by canonical name.
    pub fn languages(&self) -> Vec<LanguageSummary> {
        self.emitters
            .keys()
            .map(|name| match lookup_language(name) {
                Some(info) => LanguageSummary {
                    name: info.name.to_string(),
                    display_name: info.display_name.to_string(),
                    extension: info.extension.to_string(),
                    aliases: info.aliases.iter().map(|a| a.to_string()).collect(),
                },
                None => LanguageSummary {
                    name: name.clone(),
                    display_name: name.clone(),
                    extension: extension_for(name).to_string(),
                    aliases: Vec::new(),
                },
            })
            .collect()
    }
}
