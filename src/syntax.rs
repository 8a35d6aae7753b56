//! Destination-language rendering of [`TypeDescriptor`]s.
//!
//! A [`TypeSyntax`] holds one text template per descriptor shape. Templates
//! use `{}` for the wrapped type and named markers (`{name}`, `{key}`,
//! `{type}`, `{tag}`) for composite fields. Unknown markers are left as-is.
//!
//! The default syntax is Go:
//!
//! | Descriptor | Rendered |
//! |------------|----------|
//! | `Primitive(Boolean)` | `bool` |
//! | `Primitive(Timestamp)` | `time.Time` |
//! | `Optional(String)` | `*string` |
//! | `List(Dynamic)` | `[]interface{}` |
//! | `Map(String)` | `map[string]string` |

use std::path::Path;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::types::{Field, Primitive, TypeDescriptor};

static MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(\w*)\}").expect("marker pattern is valid"));

/// Text templates for every descriptor shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeSyntax {
    pub boolean: String,
    pub string: String,
    pub timestamp: String,
    pub double: String,
    pub integer: String,
    pub dynamic: String,
    pub optional: String,
    pub list: String,
    pub map: String,
    pub error: String,
    pub composite: CompositeSyntax,
}

/// How inline records and their fields are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeSyntax {
    pub open: String,
    pub close: String,
    /// One line per field: `{name}`, `{type}` and `{tag}` are substituted.
    pub field: String,
    /// Serialization tag for required fields; `{key}` is the property name.
    pub tag: String,
    /// Serialization tag for fields that may be absent.
    pub tag_omit: String,
}

/// Named syntax presets selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Go,
    Rust,
}

impl Default for TypeSyntax {
    fn default() -> Self {
        Self::go()
    }
}

impl Default for CompositeSyntax {
    fn default() -> Self {
        Self {
            open: "struct {".into(),
            close: "}".into(),
            field: "{name} {type} {tag}".into(),
            tag: "`json:\"{key}\"`".into(),
            tag_omit: "`json:\"{key},omitempty\"`".into(),
        }
    }
}

impl TypeSyntax {
    /// Go bindings.
    pub fn go() -> Self {
        Self {
            boolean: "bool".into(),
            string: "string".into(),
            timestamp: "time.Time".into(),
            double: "float64".into(),
            integer: "int".into(),
            dynamic: "interface{}".into(),
            optional: "*{}".into(),
            list: "[]{}".into(),
            map: "map[string]{}".into(),
            error: "error".into(),
            composite: CompositeSyntax::default(),
        }
    }

    /// Rust bindings (serde + chrono flavored).
    pub fn rust() -> Self {
        Self {
            boolean: "bool".into(),
            string: "String".into(),
            timestamp: "chrono::DateTime<chrono::Utc>".into(),
            double: "f64".into(),
            integer: "i64".into(),
            dynamic: "serde_json::Value".into(),
            optional: "Option<{}>".into(),
            list: "Vec<{}>".into(),
            map: "std::collections::HashMap<String, {}>".into(),
            error: "Error".into(),
            composite: CompositeSyntax {
                open: "struct {".into(),
                close: "}".into(),
                field: "{tag} pub {name}: {type},".into(),
                tag: "#[serde(rename = \"{key}\")]".into(),
                tag_omit: "#[serde(rename = \"{key}\", skip_serializing_if = \"Option::is_none\")]"
                    .into(),
            },
        }
    }

    pub fn for_target(target: Target) -> Self {
        match target {
            Target::Go => Self::go(),
            Target::Rust => Self::rust(),
        }
    }

    /// Load a syntax from a JSON file. Missing keys fall back to the Go syntax.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::FileNotFound`, `LoadError::ReadError` or
    /// `LoadError::InvalidJson`.
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        if !path.exists() {
            return Err(LoadError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| LoadError::InvalidJson { source })
    }

    /// Render `ty` as destination-language text.
    pub fn render(&self, ty: &TypeDescriptor) -> String {
        match ty {
            TypeDescriptor::Primitive(p) => self.primitive(*p).to_string(),
            TypeDescriptor::Dynamic => self.dynamic.clone(),
            TypeDescriptor::Optional(inner) => wrap(&self.optional, &self.render(inner)),
            TypeDescriptor::List(inner) => wrap(&self.list, &self.render(inner)),
            TypeDescriptor::Map(inner) => wrap(&self.map, &self.render(inner)),
            TypeDescriptor::Composite(fields) => self.render_composite(fields),
            TypeDescriptor::Named(name) => name.clone(),
            TypeDescriptor::Error => self.error.clone(),
        }
    }

    fn primitive(&self, primitive: Primitive) -> &str {
        match primitive {
            Primitive::Boolean => &self.boolean,
            Primitive::String => &self.string,
            Primitive::Timestamp => &self.timestamp,
            Primitive::Double => &self.double,
            Primitive::Integer => &self.integer,
        }
    }

    fn render_composite(&self, fields: &[Field]) -> String {
        let mut out = self.composite.open.clone();
        for field in fields {
            let tag_template = if field.omit_if_absent() {
                &self.composite.tag_omit
            } else {
                &self.composite.tag
            };
            let tag = fill(tag_template, |marker| match marker {
                "key" => Some(field.key.clone()),
                _ => None,
            });
            let ty = self.render(&field.ty);
            let line = fill(&self.composite.field, |marker| match marker {
                "name" => Some(field.name.clone()),
                "key" => Some(field.key.clone()),
                "type" => Some(ty.clone()),
                "tag" => Some(tag.clone()),
                _ => None,
            });
            out.push('\n');
            out.push_str(&line);
        }
        out.push('\n');
        out.push_str(&self.composite.close);
        out
    }
}

fn wrap(template: &str, inner: &str) -> String {
    fill(template, |marker| marker.is_empty().then(|| inner.to_string()))
}

/// Substitute `{marker}` occurrences in one pass; unknown markers stay put.
fn fill(template: &str, value: impl Fn(&str) -> Option<String>) -> String {
    MARKER
        .replace_all(template, |caps: &Captures| {
            value(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
