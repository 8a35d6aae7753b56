//! The root hyper-schema and its named resources.

use std::collections::HashSet;

use crate::error::SchemaError;
use crate::ident::initial_cap;
use crate::link::Link;
use crate::pointer::Pointer;
use crate::schema::{Schema, SchemaArena, SchemaId};

/// A loaded hyper-schema document. Immutable once built.
#[derive(Debug, Clone)]
pub struct Document {
    arena: SchemaArena,
    root: SchemaId,
}

/// A top-level named resource: a root property that carries links or fields.
#[derive(Debug, Clone, Copy)]
pub struct Resource<'a> {
    pub name: &'a str,
    /// The resource's schema after resolution.
    pub schema: SchemaId,
    document: &'a Document,
}

impl<'a> Resource<'a> {
    pub fn definition(&self) -> &'a Schema {
        self.document.schema(self.schema)
    }

    pub fn links(&self) -> &'a [Link] {
        &self.definition().links
    }

    /// Exported type name, e.g. `ConfigVar` for `config-var`.
    pub fn type_name(&self) -> Result<String, SchemaError> {
        initial_cap(self.name)
    }
}

impl Document {
    pub fn new(arena: SchemaArena, root: SchemaId) -> Self {
        Self { arena, root }
    }

    pub fn root(&self) -> SchemaId {
        self.root
    }

    pub fn schema(&self, id: SchemaId) -> &Schema {
        self.arena.get(id)
    }

    pub fn arena(&self) -> &SchemaArena {
        &self.arena
    }

    pub fn title(&self) -> Option<&str> {
        self.schema(self.root).title.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.schema(self.root).version.as_deref()
    }

    /// Lower-cased first word of the title, used as the package name.
    pub fn service_name(&self) -> Option<String> {
        self.title()
            .and_then(|t| t.split(' ').next())
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
    }

    /// Base URL of the API: the root `self` link, else the first root link.
    pub fn base_url(&self) -> Option<&str> {
        let links = &self.schema(self.root).links;
        links
            .iter()
            .find(|l| l.rel == "self")
            .or_else(|| links.first())
            .and_then(|l| l.href.as_ref())
            .map(|h| h.as_str())
    }

    /// Follow `anyOf` and `$ref` until a concrete node is reached.
    ///
    /// The first `anyOf` alternative always wins; `$ref` targets are resolved
    /// in turn.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnresolvedPointer` for dangling references and
    /// `SchemaError::CyclicReference` when a chain revisits a node.
    pub fn resolve(&self, id: SchemaId) -> Result<SchemaId, SchemaError> {
        let mut active = HashSet::new();
        self.resolve_with(id, &mut active)
    }

    fn resolve_with(
        &self,
        id: SchemaId,
        active: &mut HashSet<SchemaId>,
    ) -> Result<SchemaId, SchemaError> {
        let schema = self.schema(id);
        if !active.insert(id) {
            return Err(SchemaError::CyclicReference {
                pointer: schema.location.clone(),
            });
        }

        let resolved = if let Some(&first) = schema.any_of.first() {
            self.resolve_with(first, active)
        } else if let Some(pointer) = &schema.reference {
            tracing::trace!(from = %schema.location, to = %pointer, "following $ref");
            self.lookup_with(pointer, active)
                .and_then(|target| self.resolve_with(target, active))
        } else {
            Ok(id)
        };

        active.remove(&id);
        resolved
    }

    /// Walk `pointer` from the root, resolving each intermediate node before
    /// descending. The final node is returned unresolved.
    ///
    /// Supported segments: `definitions/<name>`, `properties/<name>`,
    /// `patternProperties/<pattern>`, `items` and `anyOf/<index>`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnresolvedPointer` if any segment is missing.
    pub fn lookup(&self, pointer: &Pointer) -> Result<SchemaId, SchemaError> {
        self.lookup_with(pointer, &mut HashSet::new())
    }

    fn lookup_with(
        &self,
        pointer: &Pointer,
        active: &mut HashSet<SchemaId>,
    ) -> Result<SchemaId, SchemaError> {
        let unresolved = || SchemaError::UnresolvedPointer {
            pointer: pointer.to_string(),
        };

        let mut current = self.root;
        let mut segments = pointer.segments().iter();
        while let Some(segment) = segments.next() {
            // `anyOf/<n>` addresses the raw node; everything else descends
            // through the resolved one.
            if segment == "anyOf" {
                let index: usize = segments
                    .next()
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(unresolved)?;
                current = *self
                    .schema(current)
                    .any_of
                    .get(index)
                    .ok_or_else(unresolved)?;
                continue;
            }

            // The root is the pointer's base and is never itself dereferenced.
            let node = if current == self.root {
                self.schema(current)
            } else {
                self.schema(self.resolve_with(current, active)?)
            };
            current = match segment.as_str() {
                "items" => node.items,
                "definitions" | "properties" | "patternProperties" => {
                    let name = segments.next().ok_or_else(unresolved)?;
                    match segment.as_str() {
                        "definitions" => node.definitions.get(name).copied(),
                        "properties" => node.properties.get(name).copied(),
                        _ => node
                            .pattern_properties
                            .iter()
                            .find(|(pattern, _)| pattern == name)
                            .map(|(_, id)| *id),
                    }
                }
                _ => None,
            }
            .ok_or_else(unresolved)?;
        }
        Ok(current)
    }

    /// Top-level resources sorted by name, resolved.
    ///
    /// Root properties with neither links nor properties are plain
    /// definitions and are skipped.
    pub fn resources(&self) -> Result<Vec<Resource<'_>>, SchemaError> {
        let mut resources = Vec::new();
        for (name, &id) in &self.schema(self.root).properties {
            let schema = self.resolve(id)?;
            let definition = self.schema(schema);
            if definition.links.is_empty() && definition.properties.is_empty() {
                tracing::debug!(resource = %name, "skipping definition without links or properties");
                continue;
            }
            resources.push(Resource {
                name,
                schema,
                document: self,
            });
        }
        Ok(resources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_document_value;
    use crate::schema::Kind;
    use serde_json::json;

    fn document(value: serde_json::Value) -> Document {
        load_document_value(&value).unwrap()
    }

    #[test]
    fn resolve_plain_node_is_identity() {
        let doc = document(json!({ "type": "string" }));
        assert_eq!(doc.resolve(doc.root()).unwrap(), doc.root());
    }

    #[test]
    fn resolve_follows_ref_chain() {
        let doc = document(json!({
            "definitions": {
                "a": { "$ref": "#/definitions/b" },
                "b": { "$ref": "#/definitions/c" },
                "c": { "type": "integer" }
            },
            "properties": {
                "start": { "$ref": "#/definitions/a" }
            }
        }));
        let start = doc.schema(doc.root()).properties["start"];
        let resolved = doc.resolve(start).unwrap();
        assert_eq!(doc.schema(resolved).types, vec![Kind::Integer]);
        assert_eq!(doc.schema(resolved).location, "#/definitions/c");
    }

    #[test]
    fn resolve_takes_first_any_of() {
        let doc = document(json!({
            "anyOf": [
                { "type": "boolean" },
                { "type": "string" }
            ]
        }));
        let resolved = doc.resolve(doc.root()).unwrap();
        assert_eq!(doc.schema(resolved).types, vec![Kind::Boolean]);
    }

    #[test]
    fn resolve_any_of_through_ref() {
        let doc = document(json!({
            "definitions": {
                "identity": {
                    "anyOf": [
                        { "$ref": "#/definitions/id" },
                        { "$ref": "#/definitions/name" }
                    ]
                },
                "id": { "type": "string", "format": "uuid" },
                "name": { "type": "string" }
            }
        }));
        let ptr = Pointer::parse("#/definitions/identity");
        let resolved = doc.resolve(doc.lookup(&ptr).unwrap()).unwrap();
        assert_eq!(doc.schema(resolved).format.as_deref(), Some("uuid"));
    }

    #[test]
    fn resolve_dangling_ref_errors() {
        let doc = document(json!({ "$ref": "#/definitions/missing" }));
        assert_eq!(
            doc.resolve(doc.root()),
            Err(SchemaError::UnresolvedPointer {
                pointer: "#/definitions/missing".into()
            })
        );
    }

    #[test]
    fn resolve_cyclic_ref_errors() {
        let doc = document(json!({
            "definitions": {
                "a": { "$ref": "#/definitions/b" },
                "b": { "$ref": "#/definitions/a" }
            }
        }));
        let a = doc.lookup(&Pointer::parse("#/definitions/a")).unwrap();
        assert!(matches!(
            doc.resolve(a),
            Err(SchemaError::CyclicReference { .. })
        ));
    }

    #[test]
    fn resolve_self_ref_errors() {
        let doc = document(json!({ "$ref": "#" }));
        assert!(matches!(
            doc.resolve(doc.root()),
            Err(SchemaError::CyclicReference { .. })
        ));
    }

    #[test]
    fn lookup_descends_through_refs() {
        let doc = document(json!({
            "definitions": {
                "alias": { "$ref": "#/definitions/app" },
                "app": {
                    "properties": {
                        "name": { "type": "string" }
                    }
                }
            }
        }));
        let id = doc
            .lookup(&Pointer::parse("#/definitions/alias/properties/name"))
            .unwrap();
        assert_eq!(doc.schema(id).location, "#/definitions/app/properties/name");
    }

    #[test]
    fn lookup_items_pattern_and_any_of() {
        let doc = document(json!({
            "definitions": {
                "list": { "type": "array", "items": { "type": "integer" } },
                "map": {
                    "type": "object",
                    "patternProperties": { "^\\w+$": { "type": "string" } }
                },
                "either": { "anyOf": [{ "type": "null" }, { "type": "number" }] }
            }
        }));
        let items = doc.lookup(&Pointer::parse("#/definitions/list/items")).unwrap();
        assert_eq!(doc.schema(items).types, vec![Kind::Integer]);

        let value = doc
            .lookup(&Pointer::parse("#/definitions/map/patternProperties/^\\w+$"))
            .unwrap();
        assert_eq!(doc.schema(value).types, vec![Kind::String]);

        let second = doc
            .lookup(&Pointer::parse("#/definitions/either/anyOf/1"))
            .unwrap();
        assert_eq!(doc.schema(second).types, vec![Kind::Number]);
    }

    #[test]
    fn lookup_missing_segment_errors() {
        let doc = document(json!({ "definitions": { "app": {} } }));
        let result = doc.lookup(&Pointer::parse("#/definitions/app/definitions/id"));
        assert!(matches!(
            result,
            Err(SchemaError::UnresolvedPointer { pointer }) if pointer == "#/definitions/app/definitions/id"
        ));
    }

    #[test]
    fn resources_sorted_and_filtered() {
        let doc = document(json!({
            "title": "Heroku Platform API",
            "definitions": {
                "app": {
                    "type": "object",
                    "properties": { "name": { "type": "string" } },
                    "links": [{ "title": "Info", "rel": "self", "href": "/apps" }]
                }
            },
            "properties": {
                "zone": { "type": "string" },
                "app": { "$ref": "#/definitions/app" },
                "account": {
                    "type": "object",
                    "links": [{ "title": "Info", "rel": "self", "href": "/account" }]
                }
            }
        }));
        let resources = doc.resources().unwrap();
        let names: Vec<_> = resources.iter().map(|r| r.name).collect();
        assert_eq!(names, ["account", "app"]);
        assert_eq!(resources[1].type_name().unwrap(), "App");
        assert_eq!(resources[1].links()[0].title, "Info");
    }

    #[test]
    fn metadata_passthrough() {
        let doc = document(json!({
            "title": "Heroku Platform API",
            "version": "3",
            "links": [
                { "href": "https://example.com/docs", "rel": "describedby" },
                { "href": "https://api.heroku.com", "rel": "self" }
            ]
        }));
        assert_eq!(doc.service_name().as_deref(), Some("heroku"));
        assert_eq!(doc.version(), Some("3"));
        assert_eq!(doc.base_url(), Some("https://api.heroku.com"));
    }
}
