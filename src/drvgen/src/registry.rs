// wrfsuewsrs-drvgen/src/registry.rs

//! Run-scoped registry of Fortran module definitions.
//!
//! Concatenating dozens of sources into one file exposes every module name
//! to a single program unit namespace. The registry records which file first
//! defined each module (case-insensitively, as Fortran resolves names) and
//! rewrites later colliding declarations to a file-derived identifier, so
//! the merged driver still compiles as long as nothing references the
//! shadowed definition.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::ops::Range;

lazy_static! {
    /// A module declaration line, e.g. `MODULE snow_module`. The identifier
    /// is captured; `module procedure` lines are screened out by name.
    static ref MODULE_DECL: Regex =
        Regex::new(r"(?i)^\s*module\s+([a-z][a-z0-9_]*)").unwrap();
    /// The matching end-of-module line, with or without the blank between
    /// `end` and `module`.
    static ref END_MODULE_DECL: Regex =
        Regex::new(r"(?i)^\s*end\s*module\s+([a-z][a-z0-9_]*)").unwrap();
}

/// Tracks module definitions across one merge run.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    /// Lowercased module name to the file that first defined it.
    defined_in: HashMap<String, String>,
    /// Definition order, for reporting.
    order: Vec<String>,
    /// Lowercased module name to its replacement identifier. Updated on
    /// every collision, so end-of-module lines in the file currently being
    /// merged resolve to the newest replacement.
    renames: HashMap<String, String>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one line through collision tracking and return the line to emit.
    ///
    /// Lines that neither open nor close a module come back unchanged. A
    /// declaration whose name was already defined by an earlier file is
    /// rewritten in place; only the identifier span changes, indentation,
    /// keyword casing and trailing text survive.
    pub fn process_line(&mut self, line: &str, filename: &str) -> String {
        if let Some(m) = MODULE_DECL.captures(line).and_then(|caps| caps.get(1)) {
            let ident = m.as_str();
            if ident.eq_ignore_ascii_case("procedure") {
                // `module procedure` inside a generic interface block.
                return line.to_string();
            }
            let key = ident.to_lowercase();
            return match self.defined_in.get(&key) {
                None => {
                    self.defined_in.insert(key.clone(), filename.to_string());
                    self.order.push(key);
                    line.to_string()
                }
                Some(first_file) if first_file == filename => line.to_string(),
                Some(first_file) => {
                    let replacement = renamed_identifier(ident, filename);
                    log::warn!(
                        "duplicate module '{}' in {} (first defined in {}); renamed to '{}'",
                        ident,
                        filename,
                        first_file,
                        replacement
                    );
                    self.renames.insert(key, replacement.clone());
                    splice(line, m.range(), &replacement)
                }
            };
        }

        if let Some(m) = END_MODULE_DECL.captures(line).and_then(|caps| caps.get(1)) {
            let key = m.as_str().to_lowercase();
            if let Some(replacement) = self.renames.get(&key) {
                return splice(line, m.range(), replacement);
            }
        }

        line.to_string()
    }

    /// File that first defined `module`, if any file has.
    pub fn defining_file(&self, module: &str) -> Option<&str> {
        self.defined_in
            .get(&module.to_lowercase())
            .map(String::as_str)
    }

    /// Lowercased module names in definition order.
    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Replacement identifier for a colliding module: the original name with a
/// suffix derived from the defining file, dots flattened to underscores so
/// the result stays a valid Fortran name.
fn renamed_identifier(original: &str, filename: &str) -> String {
    format!("{}_{}", original, filename.replace('.', "_"))
}

/// Replace `span` of `line` with `replacement`, keeping everything else.
fn splice(line: &str, span: Range<usize>, replacement: &str) -> String {
    let mut out = String::with_capacity(line.len() + replacement.len());
    out.push_str(&line[..span.start]);
    out.push_str(replacement);
    out.push_str(&line[span.end..]);
    out
}
