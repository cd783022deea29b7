//! Built-in emitters.

mod go;
mod python;
mod rust;
mod typescript;

pub use go::GoEmitter;
pub use python::PythonEmitter;
pub use rust::RustEmitter;
pub use typescript::TypeScriptEmitter;

/// Line-oriented source builder with a fixed indent unit.
#[derive(Debug)]
pub(crate) struct SourceWriter {
    out: String,
    unit: &'static str,
    depth: usize,
}

impl SourceWriter {
    pub(crate) fn new(unit: &'static str) -> Self {
        Self {
            out: String::new(),
            unit,
            depth: 0,
        }
    }

    pub(crate) fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.out.push_str(self.unit);
            }
            self.out.push_str(text);
        }
        self.out.push('\n');
    }

    pub(crate) fn blank(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with("\n\n") {
            self.out.push('\n');
        }
    }

    pub(crate) fn indent(&mut self) {
        self.depth += 1;
    }

    pub(crate) fn dedent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Each line of `docs` prefixed with `marker`.
    pub(crate) fn doc(&mut self, marker: &str, docs: Option<&str>) {
        if let Some(docs) = docs {
            for l in docs.lines() {
                let l = l.trim_end();
                if l.is_empty() {
                    self.line(marker.trim_end());
                } else {
                    self.line(format!("{marker}{l}"));
                }
            }
        }
    }

    pub(crate) fn finish(mut self) -> String {
        while self.out.ends_with("\n\n") {
            self.out.pop();
        }
        self.out
    }
}

/// JSON string literal, which is also a valid string literal in Go,
/// TypeScript and Python.
pub(crate) fn quoted(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}
