//! Links (API actions) and the signatures derived from them.

use std::collections::HashMap;

use crate::document::Document;
use crate::error::SchemaError;
use crate::href::HRef;
use crate::ident::initial_cap;
use crate::schema::{Kind, SchemaId};
use crate::types::TypeDescriptor;

/// Name of the synthetic request-body parameter.
pub const BODY_PARAM: &str = "o";

/// Name of the synthetic pagination parameter.
pub const RANGE_PARAM: &str = "lr";

/// One action on a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Link {
    pub title: String,
    pub description: Option<String>,
    /// Semantic relation: `create`, `update`, `destroy`, `instances`, `self`, ...
    pub rel: String,
    pub method: String,
    pub href: Option<HRef>,
    /// Request-body shape.
    pub schema: Option<SchemaId>,
    /// Response shape.
    pub target_schema: Option<SchemaId>,
}

/// Ordered parameter names with their types.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    pub order: Vec<String>,
    pub types: HashMap<String, TypeDescriptor>,
}

impl Parameters {
    fn push(&mut self, name: impl Into<String>, ty: TypeDescriptor) {
        let name = name.into();
        self.order.push(name.clone());
        self.types.insert(name, ty);
    }

    pub fn get(&self, name: &str) -> Option<&TypeDescriptor> {
        self.types.get(name)
    }

    /// `(name, type)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeDescriptor)> {
        self.order
            .iter()
            .filter_map(|name| self.types.get(name).map(|ty| (name.as_str(), ty)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Document {
    /// Derive the parameter list of `link`.
    ///
    /// Path placeholders come first in template order, then the request body
    /// as `o`, then the `lr` list range for collection responses.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::MissingHRef` if the link has no href, or any
    /// error from pointer resolution and type inference.
    pub fn link_parameters(&self, link: &Link) -> Result<Parameters, SchemaError> {
        let href = link.href.as_ref().ok_or_else(|| SchemaError::MissingHRef {
            title: link.title.clone(),
        })?;

        let mut params = Parameters::default();
        for binding in href.resolve(self)? {
            params.push(binding.name, self.type_of(binding.schema)?);
        }

        if let Some(body) = self.link_type(link)? {
            params.push(BODY_PARAM, body);
        }

        if self.is_collection(link)? {
            params.push(RANGE_PARAM, TypeDescriptor::list_range());
        }

        Ok(params)
    }

    /// Derive the return values of `link`. The error slot is always last.
    pub fn link_values(&self, link: &Link) -> Result<Vec<TypeDescriptor>, SchemaError> {
        let mut values = Vec::new();
        let named = link
            .target_schema
            .and_then(|id| self.schema(id).reference.as_ref())
            .and_then(|pointer| pointer.name());
        if let Some(name) = named {
            values.push(TypeDescriptor::Named(initial_cap(name)?));
        }
        values.push(TypeDescriptor::Error);
        Ok(values)
    }

    /// Whether the link lists a collection and so takes a list range.
    fn is_collection(&self, link: &Link) -> Result<bool, SchemaError> {
        if link.rel == "instances" {
            return Ok(true);
        }
        match link.target_schema {
            Some(target) => {
                let resolved = self.resolve(target)?;
                Ok(self.schema(resolved).has_kind(&Kind::Array))
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_document_value;
    use crate::types::Primitive;
    use serde_json::{json, Value};

    fn first_link(value: Value) -> (Document, Link) {
        let doc = load_document_value(&value).unwrap();
        let link = doc.schema(doc.root()).links[0].clone();
        (doc, link)
    }

    #[test]
    fn destroy_without_placeholders_has_no_params() {
        let (doc, link) = first_link(json!({
            "links": [{ "rel": "destroy", "href": "/destroy/" }]
        }));
        let params = doc.link_parameters(&link).unwrap();
        assert!(params.is_empty());
        assert!(params.types.is_empty());
        assert_eq!(doc.link_values(&link).unwrap(), [TypeDescriptor::Error]);
    }

    #[test]
    fn instances_rel_gets_list_range() {
        let (doc, link) = first_link(json!({
            "links": [{ "rel": "instances", "href": "/instances/" }]
        }));
        let params = doc.link_parameters(&link).unwrap();
        assert_eq!(params.order, ["lr"]);
        assert_eq!(params.get("lr"), Some(&TypeDescriptor::list_range()));
    }

    #[test]
    fn array_target_gets_list_range_once() {
        let (doc, link) = first_link(json!({
            "definitions": { "app": { "type": "object", "properties": {} } },
            "links": [{
                "rel": "instances",
                "href": "/apps",
                "targetSchema": { "type": "array", "items": { "$ref": "#/definitions/app" } }
            }]
        }));
        let params = doc.link_parameters(&link).unwrap();
        assert_eq!(params.order, ["lr"]);
    }

    #[test]
    fn update_body_becomes_o() {
        let (doc, link) = first_link(json!({
            "links": [{
                "rel": "update",
                "href": "/update/",
                "schema": { "type": "string" }
            }]
        }));
        let params = doc.link_parameters(&link).unwrap();
        assert_eq!(params.order, ["o"]);
        assert_eq!(
            params.get("o"),
            Some(&TypeDescriptor::Primitive(Primitive::String))
        );
    }

    #[test]
    fn body_fields_honor_required() {
        let (doc, link) = first_link(json!({
            "links": [{
                "rel": "create",
                "href": "/apps",
                "schema": {
                    "type": "object",
                    "required": ["string"],
                    "properties": {
                        "string": { "type": "string" },
                        "int": { "type": "integer" }
                    }
                }
            }]
        }));
        let body = doc.link_type(&link).unwrap().unwrap();
        let fields = body.fields().unwrap();
        assert_eq!(fields[0].key, "int");
        assert_eq!(
            fields[0].ty,
            TypeDescriptor::optional(TypeDescriptor::Primitive(Primitive::Integer))
        );
        assert_eq!(fields[1].ty, TypeDescriptor::Primitive(Primitive::String));
    }

    #[test]
    fn placeholder_resolves_nested_definition() {
        let (doc, link) = first_link(json!({
            "definitions": {
                "struct": {
                    "definitions": { "uuid": { "type": "string" } }
                }
            },
            "links": [{
                "href": "/results/{(%23%2Fdefinitions%2Fstruct%2Fdefinitions%2Fuuid)}"
            }]
        }));
        let params = doc.link_parameters(&link).unwrap();
        assert_eq!(params.order, ["structUUID"]);
        assert_eq!(
            params.types,
            HashMap::from([(
                "structUUID".to_string(),
                TypeDescriptor::Primitive(Primitive::String)
            )])
        );
    }

    #[test]
    fn placeholders_then_body_then_range() {
        let (doc, link) = first_link(json!({
            "definitions": {
                "app": {
                    "definitions": {
                        "identity": { "anyOf": [{ "$ref": "#/definitions/app/definitions/id" }] },
                        "id": { "type": "string", "format": "uuid" }
                    }
                }
            },
            "links": [{
                "rel": "instances",
                "href": "/apps/{(%23%2Fdefinitions%2Fapp%2Fdefinitions%2Fidentity)}/builds",
                "schema": { "type": "object", "properties": {} },
                "targetSchema": { "type": ["array"] }
            }]
        }));
        let params = doc.link_parameters(&link).unwrap();
        assert_eq!(params.order, ["appIdentity", "o", "lr"]);
        let names: Vec<_> = params.iter().map(|(name, _)| name).collect();
        assert_eq!(names, params.order);
    }

    #[test]
    fn missing_href_errors() {
        let (doc, link) = first_link(json!({
            "links": [{ "title": "Info", "rel": "self" }]
        }));
        assert_eq!(
            doc.link_parameters(&link),
            Err(SchemaError::MissingHRef {
                title: "Info".into()
            })
        );
    }

    #[test]
    fn dangling_placeholder_errors() {
        let (doc, link) = first_link(json!({
            "links": [{ "href": "/apps/{(%23%2Fdefinitions%2Fapp%2Fdefinitions%2Fidentity)}" }]
        }));
        assert!(matches!(
            doc.link_parameters(&link),
            Err(SchemaError::UnresolvedPointer { .. })
        ));
    }

    #[test]
    fn ref_target_named_in_values() {
        let (doc, link) = first_link(json!({
            "definitions": { "app": { "type": "object", "properties": {} } },
            "links": [{
                "rel": "self",
                "href": "/apps",
                "targetSchema": { "$ref": "#/definitions/app" }
            }]
        }));
        assert_eq!(
            doc.link_values(&link).unwrap(),
            [TypeDescriptor::named("App"), TypeDescriptor::Error]
        );
    }

    #[test]
    fn inline_target_returns_only_error() {
        let (doc, link) = first_link(json!({
            "links": [{
                "rel": "self",
                "href": "/apps",
                "targetSchema": { "type": "object", "properties": {} }
            }]
        }));
        assert_eq!(doc.link_values(&link).unwrap(), [TypeDescriptor::Error]);
    }
}
