//! Document loading from various sources.
//!
//! Handles loading hyper-schemas from files, strings and HTTP URLs, and
//! flattening the parsed JSON into a [`Document`].

use std::path::Path;

use serde_json::{Map, Value};

use crate::document::Document;
use crate::error::LoadError;
use crate::href::HRef;
use crate::link::Link;
use crate::pointer::Pointer;
use crate::schema::{Kind, Schema, SchemaArena, SchemaId};

#[cfg(feature = "remote")]
use std::time::Duration;

/// Default timeout for HTTP requests (10 seconds).
#[cfg(feature = "remote")]
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Load a document from a file path.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist,
/// `LoadError::InvalidJson` if the file isn't valid JSON, or
/// `LoadError::InvalidDocument` if a known keyword has the wrong shape.
pub fn load_document(path: &Path) -> Result<Document, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    load_document_str(&content)
}

/// Load a document from a JSON string.
///
/// # Errors
///
/// Returns `LoadError::InvalidJson` if the string isn't valid JSON.
pub fn load_document_str(content: &str) -> Result<Document, LoadError> {
    let value: Value =
        serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })?;
    load_document_value(&value)
}

/// Load a document from an HTTP/HTTPS URL.
///
/// Requires the `remote` feature (enabled by default).
///
/// # Errors
///
/// Returns `LoadError::NetworkError` if the request fails.
#[cfg(feature = "remote")]
pub fn load_document_url(url: &str) -> Result<Document, LoadError> {
    let network = |source: reqwest::Error| LoadError::NetworkError {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(network)?;

    // Check for HTTP errors before parsing
    let value: Value = client
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.json())
        .map_err(network)?;

    load_document_value(&value)
}

/// Check if a string looks like a URL (starts with http:// or https://).
pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Load a document from a file path or URL.
///
/// URL loading requires the `remote` feature.
pub fn load_document_auto(source: &str) -> Result<Document, LoadError> {
    if is_url(source) {
        #[cfg(feature = "remote")]
        {
            load_document_url(source)
        }
        #[cfg(not(feature = "remote"))]
        {
            Err(LoadError::FileNotFound {
                path: std::path::PathBuf::from(source),
            })
        }
    } else {
        load_document(Path::new(source))
    }
}

/// Build a document from already-parsed JSON.
///
/// # Errors
///
/// Returns `LoadError::InvalidDocument` if a known keyword has the wrong shape
/// (for example `type` that is neither a string nor an array of strings).
pub fn load_document_value(value: &Value) -> Result<Document, LoadError> {
    let mut arena = SchemaArena::new();
    let root = parse_schema(value, "#", &mut arena)?;
    tracing::debug!(nodes = arena.len(), "loaded document");
    Ok(Document::new(arena, root))
}

// --- Internal implementation ---

fn parse_schema(value: &Value, path: &str, arena: &mut SchemaArena) -> Result<SchemaId, LoadError> {
    let map = value
        .as_object()
        .ok_or_else(|| invalid(path, format!("expected object, got {}", json_type_name(value))))?;

    // Reserve first so a parent always precedes its children in the arena.
    let id = arena.reserve();
    let mut schema = Schema {
        location: path.to_string(),
        ..Schema::default()
    };

    for (key, value) in map {
        let child_path = format!("{}/{}", path, escape(key));
        match key.as_str() {
            "id" => schema.id = Some(expect_str(value, &child_path)?.to_string()),
            "title" => schema.title = Some(expect_str(value, &child_path)?.to_string()),
            "description" => {
                schema.description = Some(expect_str(value, &child_path)?.to_string())
            }
            "version" => schema.version = Some(scalar_text(value, &child_path)?),
            "type" => schema.types = parse_types(value, &child_path)?,
            "format" => schema.format = Some(expect_str(value, &child_path)?.to_string()),
            "items" => schema.items = Some(parse_schema(value, &child_path, arena)?),
            "properties" => {
                for (name, prop) in expect_object(value, &child_path)? {
                    let prop_path = format!("{}/{}", child_path, escape(name));
                    let prop_id = parse_schema(prop, &prop_path, arena)?;
                    schema.properties.insert(name.clone(), prop_id);
                }
            }
            "patternProperties" => {
                for (pattern, prop) in expect_object(value, &child_path)? {
                    let prop_path = format!("{}/{}", child_path, escape(pattern));
                    let prop_id = parse_schema(prop, &prop_path, arena)?;
                    schema.pattern_properties.push((pattern.clone(), prop_id));
                }
            }
            "definitions" => {
                for (name, def) in expect_object(value, &child_path)? {
                    let def_path = format!("{}/{}", child_path, escape(name));
                    let def_id = parse_schema(def, &def_path, arena)?;
                    schema.definitions.insert(name.clone(), def_id);
                }
            }
            "required" => schema.required = parse_strings(value, &child_path)?,
            "$ref" => schema.reference = Some(Pointer::parse(expect_str(value, &child_path)?)),
            "anyOf" => {
                for (i, alt) in expect_array(value, &child_path)?.iter().enumerate() {
                    let alt_id = parse_schema(alt, &format!("{}/{}", child_path, i), arena)?;
                    schema.any_of.push(alt_id);
                }
            }
            "links" => {
                for (i, link) in expect_array(value, &child_path)?.iter().enumerate() {
                    let link_path = format!("{}/{}", child_path, i);
                    schema.links.push(parse_link(link, &link_path, arena)?);
                }
            }
            // Everything else (examples, readOnly, pattern, ...) carries no
            // typing information.
            _ => {}
        }
    }

    arena.set(id, schema);
    Ok(id)
}

fn parse_link(value: &Value, path: &str, arena: &mut SchemaArena) -> Result<Link, LoadError> {
    let map = expect_object(value, path)?;
    let mut link = Link::default();

    for (key, value) in map {
        let child_path = format!("{}/{}", path, key);
        match key.as_str() {
            "title" => link.title = expect_str(value, &child_path)?.to_string(),
            "description" => {
                link.description = Some(expect_str(value, &child_path)?.to_string())
            }
            "rel" => link.rel = expect_str(value, &child_path)?.to_string(),
            "method" => link.method = expect_str(value, &child_path)?.to_string(),
            "href" => {
                let template = expect_str(value, &child_path)?;
                let href = HRef::parse(template).map_err(|e| invalid(&child_path, e.to_string()))?;
                link.href = Some(href);
            }
            "schema" => link.schema = Some(parse_schema(value, &child_path, arena)?),
            "targetSchema" => link.target_schema = Some(parse_schema(value, &child_path, arena)?),
            _ => {}
        }
    }

    Ok(link)
}

fn parse_types(value: &Value, path: &str) -> Result<Vec<Kind>, LoadError> {
    match value {
        Value::String(tag) => Ok(vec![Kind::parse(tag)]),
        Value::Array(_) => Ok(parse_strings(value, path)?
            .iter()
            .map(|tag| Kind::parse(tag))
            .collect()),
        other => Err(invalid(
            path,
            format!("expected string or array, got {}", json_type_name(other)),
        )),
    }
}

fn parse_strings(value: &Value, path: &str) -> Result<Vec<String>, LoadError> {
    expect_array(value, path)?
        .iter()
        .enumerate()
        .map(|(i, item)| expect_str(item, &format!("{}/{}", path, i)).map(String::from))
        .collect()
}

fn expect_str<'v>(value: &'v Value, path: &str) -> Result<&'v str, LoadError> {
    value
        .as_str()
        .ok_or_else(|| invalid(path, format!("expected string, got {}", json_type_name(value))))
}

fn expect_array<'v>(value: &'v Value, path: &str) -> Result<&'v Vec<Value>, LoadError> {
    value
        .as_array()
        .ok_or_else(|| invalid(path, format!("expected array, got {}", json_type_name(value))))
}

fn expect_object<'v>(value: &'v Value, path: &str) -> Result<&'v Map<String, Value>, LoadError> {
    value
        .as_object()
        .ok_or_else(|| invalid(path, format!("expected object, got {}", json_type_name(value))))
}

/// Versions appear both as `"3"` and as bare numbers.
fn scalar_text(value: &Value, path: &str) -> Result<String, LoadError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(invalid(
            path,
            format!("expected string or number, got {}", json_type_name(other)),
        )),
    }
}

fn escape(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

fn invalid(path: &str, message: String) -> LoadError {
    LoadError::InvalidDocument {
        path: path.to_string(),
        message,
    }
}

/// Returns the JSON type name for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
