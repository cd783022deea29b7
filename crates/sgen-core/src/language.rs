//! # Target Language Catalogue
//!
//! Static metadata for output languages: canonical name, accepted aliases,
//! and the file extension used when artifacts are packaged.
//!
//! The catalogue is broader than the set of languages with an installed
//! emitter. Whether a language can actually be generated is decided by the
//! emitter registry; this table only answers naming questions, so an
//! artifact produced by a third-party emitter still packages with the
//! right extension.

use serde::Serialize;

/// Metadata for one target language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageInfo {
    /// Canonical lowercase name used in options and cache keys.
    pub name: &'static str,
    /// Human-readable name.
    pub display_name: &'static str,
    /// File extension (without the dot).
    pub extension: &'static str,
    /// Alternative spellings accepted on input.
    pub aliases: &'static [&'static str],
}

/// Every language the service knows how to name.
pub const LANGUAGES: &[LanguageInfo] = &[
    LanguageInfo { name: "typescript", display_name: "TypeScript", extension: "ts", aliases: &["ts"] },
    LanguageInfo { name: "javascript", display_name: "JavaScript", extension: "js", aliases: &["js"] },
    LanguageInfo { name: "python", display_name: "Python", extension: "py", aliases: &["py"] },
    LanguageInfo { name: "go", display_name: "Go", extension: "go", aliases: &["golang"] },
    LanguageInfo { name: "rust", display_name: "Rust", extension: "rs", aliases: &["rs"] },
    LanguageInfo { name: "csharp", display_name: "C#", extension: "cs", aliases: &["cs", "c#"] },
    LanguageInfo { name: "java", display_name: "Java", extension: "java", aliases: &[] },
    LanguageInfo { name: "kotlin", display_name: "Kotlin", extension: "kt", aliases: &["kt"] },
    LanguageInfo { name: "swift", display_name: "Swift", extension: "swift", aliases: &[] },
    LanguageInfo { name: "php", display_name: "PHP", extension: "php", aliases: &[] },
    LanguageInfo { name: "ruby", display_name: "Ruby", extension: "rb", aliases: &["rb"] },
];

/// Extension used for languages missing from [`LANGUAGES`].
pub const FALLBACK_EXTENSION: &str = "txt";

/// Look up a language by canonical name or alias (case-insensitive).
pub fn lookup_language(name: &str) -> Option<&'static LanguageInfo> {
    let needle = name.trim().to_ascii_lowercase();
    LANGUAGES
        .iter()
        .find(|l| l.name == needle || l.aliases.contains(&needle.as_str()))
}

/// Resolve a user-supplied language name to its canonical spelling.
///
/// Unknown names are lowercased and trimmed but otherwise kept, so a custom
/// emitter registered under an unlisted name still round-trips.
pub fn canonical_language(name: &str) -> String {
    match lookup_language(name) {
        Some(info) => info.name.to_string(),
        None => name.trim().to_ascii_lowercase(),
    }
}

/// File extension for a language, falling back to `txt`.
pub fn extension_for(language: &str) -> &'static str {
    lookup_language(language)
        .map(|l| l.extension)
        .unwrap_or(FALLBACK_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_resolve_to_canonical_name() {
        assert_eq!(canonical_language("ts"), "typescript");
        assert_eq!(canonical_language("GoLang"), "go");
        assert_eq!(canonical_language(" Python "), "python");
    }

    #[test]
    fn unknown_language_is_normalized_not_rejected() {
        assert_eq!(canonical_language("Elm"), "elm");
        assert!(lookup_language("elm").is_none());
    }

    #[test]
    fn extensions() {
        assert_eq!(extension_for("go"), "go");
        assert_eq!(extension_for("typescript"), "ts");
        assert_eq!(extension_for("csharp"), "cs");
        assert_eq!(extension_for("elm"), "txt");
    }

    #[test]
    fn names_and_aliases_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for lang in LANGUAGES {
            assert!(seen.insert(lang.name), "duplicate name {}", lang.name);
            for alias in lang.aliases {
                assert!(seen.insert(alias), "duplicate alias {alias}");
            }
        }
    }
}
