//! # Identifier Naming
//!
//! Turns schema titles, property names and enum values into identifiers.
//! Input is split into words at case changes, digit/letter boundaries and
//! any non-alphanumeric character, then re-joined in the target case.
//!
//! A word is an *acronym* when it was written in capitals (`URL` in
//! `userURL`) or is a well-known short form (`id`, `url`, `http`, ...).
//! [`AcronymStyle`] controls how acronyms render inside identifiers:
//!
//! | style       | `user_id`  | `userURL`  |
//! |-------------|------------|------------|
//! | `original`  | `UserId`   | `UserURL`  |
//! | `pascal`    | `UserID`   | `UserURL`  |
//! | `camel`     | `UserId`   | `UserUrl`  |
//! | `lowerCase` | `Userid`   | `Userurl`  |
//!
//! The first word of a camel identifier is always lowercase.

use sgen_core::AcronymStyle;

const KNOWN_ACRONYMS: &[&str] = &[
    "api", "csv", "did", "dns", "html", "http", "https", "id", "ip", "json", "jwt", "sql", "uri",
    "url", "uuid", "xml",
];

#[derive(Debug, Clone, PartialEq, Eq)]
struct Word {
    text: String,
    acronym: bool,
}

fn is_known_acronym(word: &str) -> bool {
    KNOWN_ACRONYMS.contains(&word.to_ascii_lowercase().as_str())
}

/// Split an arbitrary string into words.
///
/// `"userURLValue"` → `user`, `URL`, `Value`; `"http_server-2"` → `http`,
/// `server`, `2`.
pub fn split_words(input: &str) -> Vec<String> {
    words(input).into_iter().map(|w| w.text).collect()
}

fn words(input: &str) -> Vec<Word> {
    let mut out: Vec<Word> = Vec::new();
    let chars: Vec<char> = input.chars().collect();
    let mut current = String::new();

    let flush = |current: &mut String, out: &mut Vec<Word>| {
        if current.is_empty() {
            return;
        }
        let all_upper = current.chars().count() > 1
            && current.chars().all(|c| c.is_uppercase() || c.is_ascii_digit())
            && current.chars().any(char::is_uppercase);
        let acronym = all_upper || is_known_acronym(current);
        out.push(Word {
            text: std::mem::take(current),
            acronym,
        });
    };

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            flush(&mut current, &mut out);
            continue;
        }
        if let Some(prev) = current.chars().last() {
            let next = chars.get(i + 1).copied();
            let boundary = (prev.is_lowercase() && c.is_uppercase())
                || (prev.is_ascii_digit() != c.is_ascii_digit())
                // "URLValue": split before the last capital of a run
                || (prev.is_uppercase()
                    && c.is_uppercase()
                    && next.is_some_and(char::is_lowercase));
            if boundary {
                flush(&mut current, &mut out);
            }
        }
        current.push(c);
    }
    flush(&mut current, &mut out);
    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn render_acronym(word: &str, style: AcronymStyle, leading_camel: bool) -> String {
    if leading_camel {
        return word.to_lowercase();
    }
    match style {
        AcronymStyle::Original => upper_first(word),
        AcronymStyle::Pascal => word.to_uppercase(),
        AcronymStyle::Camel => capitalize(word),
        AcronymStyle::LowerCase => word.to_lowercase(),
    }
}

fn join(input: &str, style: AcronymStyle, camel: bool) -> String {
    let mut out = String::new();
    for (i, word) in words(input).iter().enumerate() {
        let leading_camel = camel && i == 0;
        if word.acronym {
            out.push_str(&render_acronym(&word.text, style, leading_camel));
        } else if leading_camel {
            out.push_str(&word.text.to_lowercase());
        } else {
            out.push_str(&capitalize(&word.text));
        }
    }
    out
}

/// `PascalCase` identifier.
pub fn pascal_case(input: &str, style: AcronymStyle) -> String {
    join(input, style, false)
}

/// `camelCase` identifier.
pub fn camel_case(input: &str, style: AcronymStyle) -> String {
    join(input, style, true)
}

/// `snake_case` identifier.
pub fn snake_case(input: &str) -> String {
    words(input)
        .iter()
        .map(|w| w.text.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// `SCREAMING_SNAKE_CASE` identifier.
pub fn screaming_snake_case(input: &str) -> String {
    snake_case(input).to_uppercase()
}

/// Upper-case the first character, leaving the rest untouched.
pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Make `candidate` a legal identifier start, then avoid reserved words.
///
/// Empty input becomes `fallback`; a leading digit gets `prefix`; a
/// reserved word gets `_` appended.
pub fn legalize(candidate: String, fallback: &str, prefix: &str, reserved: &[&str]) -> String {
    let mut name = if candidate.is_empty() {
        fallback.to_string()
    } else {
        candidate
    };
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name = format!("{prefix}{name}");
    }
    if reserved.contains(&name.as_str()) {
        name.push('_');
    }
    name
}

/// Hands out names that are unique within one scope by appending `2`, `3`, ...
#[derive(Debug, Default, Clone)]
pub struct NameScope {
    taken: std::collections::HashSet<String>,
}

impl NameScope {
    /// Empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `base`, or the first free `base2`, `base3`, ...
    pub fn claim(&mut self, base: &str) -> String {
        if self.taken.insert(base.to_string()) {
            return base.to_string();
        }
        let mut n = 2;
        loop {
            let candidate = format!("{base}{n}");
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_mixed_input() {
        assert_eq!(split_words("userURLValue"), ["user", "URL", "Value"]);
        assert_eq!(split_words("http_server-2"), ["http", "server", "2"]);
        assert_eq!(split_words("User Profile"), ["User", "Profile"]);
        assert_eq!(split_words("v2Item"), ["v", "2", "Item"]);
        assert!(split_words("--").is_empty());
    }

    #[test]
    fn pascal_and_camel() {
        assert_eq!(pascal_case("user profile", AcronymStyle::Pascal), "UserProfile");
        assert_eq!(camel_case("UserProfile", AcronymStyle::Pascal), "userProfile");
        assert_eq!(pascal_case("first_name", AcronymStyle::Pascal), "FirstName");
    }

    #[test]
    fn acronym_styles() {
        assert_eq!(pascal_case("user_id", AcronymStyle::Original), "UserId");
        assert_eq!(pascal_case("user_id", AcronymStyle::Pascal), "UserID");
        assert_eq!(pascal_case("user_id", AcronymStyle::Camel), "UserId");
        assert_eq!(pascal_case("user_id", AcronymStyle::LowerCase), "Userid");
        assert_eq!(pascal_case("userURL", AcronymStyle::Original), "UserURL");
        assert_eq!(pascal_case("userURL", AcronymStyle::Camel), "UserUrl");
        assert_eq!(camel_case("url_value", AcronymStyle::Pascal), "urlValue");
        assert_eq!(camel_case("my_url", AcronymStyle::LowerCase), "myurl");
        assert_eq!(camel_case("my_url", AcronymStyle::Pascal), "myURL");
    }

    #[test]
    fn snake_forms() {
        assert_eq!(snake_case("firstName"), "first_name");
        assert_eq!(snake_case("HTTPServer"), "http_server");
        assert_eq!(screaming_snake_case("in-progress"), "IN_PROGRESS");
    }

    #[test]
    fn legalize_handles_digits_empty_reserved() {
        assert_eq!(legalize(String::new(), "Empty", "V", &[]), "Empty");
        assert_eq!(legalize("2fa".into(), "Empty", "V", &[]), "V2fa");
        assert_eq!(legalize("type".into(), "x", "_", &["type"]), "type_");
    }

    #[test]
    fn scope_suffixes_duplicates() {
        let mut scope = NameScope::new();
        assert_eq!(scope.claim("User"), "User");
        assert_eq!(scope.claim("User"), "User2");
        assert_eq!(scope.claim("User"), "User3");
        assert_eq!(scope.claim("Item"), "Item");
    }
}
