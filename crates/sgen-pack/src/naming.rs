//! # Entry Naming
//!
//! Entry name = sanitized schema id + language extension. The first claim
//! of a name wins it; later claims get `-2`, `-3`, … before the extension.
//! Names are compared case-insensitively so an archive never holds two
//! entries that collide on a case-insensitive filesystem.

use std::collections::HashSet;

use sgen_core::extension_for;

use crate::archive::MANIFEST_NAME;

/// Hands out unique entry names in claim order.
#[derive(Debug, Clone)]
pub struct EntryNamer {
    taken: HashSet<String>,
}

impl Default for EntryNamer {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryNamer {
    /// A namer with only the manifest name reserved.
    pub fn new() -> Self {
        let mut taken = HashSet::new();
        taken.insert(MANIFEST_NAME.to_ascii_lowercase());
        Self { taken }
    }

    /// Claim a unique name for `schema_id` rendered in `language`.
    pub fn claim(&mut self, schema_id: &str, language: &str) -> String {
        let stem = sanitize(schema_id);
        let ext = extension_for(language);
        let mut candidate = format!("{stem}.{ext}");
        let mut n = 2u32;
        while !self.taken.insert(candidate.to_ascii_lowercase()) {
            candidate = format!("{stem}-{n}.{ext}");
            n += 1;
        }
        candidate
    }
}

/// Keep `[A-Za-z0-9._-]`, replace anything else with `_`, strip leading dots.
fn sanitize(id: &str) -> String {
    let cleaned: String = id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '_' })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "schema".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collisions_get_numbered_suffixes() {
        let mut namer = EntryNamer::new();
        assert_eq!(namer.claim("user", "go"), "user.go");
        assert_eq!(namer.claim("user", "go"), "user-2.go");
        assert_eq!(namer.claim("User", "golang"), "User-3.go");
        assert_eq!(namer.claim("user", "typescript"), "user.ts");
    }

    #[test]
    fn explicit_suffix_names_are_respected() {
        let mut namer = EntryNamer::new();
        assert_eq!(namer.claim("user-2", "go"), "user-2.go");
        assert_eq!(namer.claim("user", "go"), "user.go");
        assert_eq!(namer.claim("user", "go"), "user-3.go");
    }

    #[test]
    fn ids_are_sanitized() {
        let mut namer = EntryNamer::new();
        assert_eq!(namer.claim("../etc/passwd", "python"), "_etc_passwd.py");
        assert_eq!(namer.claim("", "rust"), "schema.rs");
        assert_eq!(namer.claim("a b", "cobol"), "a_b.txt");
    }

    #[test]
    fn manifest_name_is_never_handed_out() {
        let namer = EntryNamer::new();
        assert!(namer.taken.contains("readme.md"));
    }
}
