//! Type inference: schema node → [`TypeDescriptor`].
//!
//! # Mapping
//!
//! | Schema kind | Descriptor |
//! |-------------|------------|
//! | `boolean` | `Primitive(Boolean)` |
//! | `string` | `Primitive(String)` |
//! | `string` + `date-time` | `Primitive(Timestamp)` |
//! | `number` | `Primitive(Double)` |
//! | `integer` | `Primitive(Integer)` |
//! | `any` | `Dynamic` |
//! | `array` | `List(items)`, `List(Dynamic)` without `items` |
//! | `object` + `patternProperties` | `Map(first pattern value)` |
//! | `object` | `Composite(fields sorted by name)` |
//! | `null` alongside a kind | `Optional(kind)` |

use std::collections::HashSet;

use crate::document::Document;
use crate::error::SchemaError;
use crate::ident::initial_cap;
use crate::link::Link;
use crate::schema::{Kind, Schema, SchemaId};
use crate::types::{Field, Primitive, TypeDescriptor};

impl Document {
    /// Type of a schema used as a field or parameter that is always present.
    pub fn type_of(&self, id: SchemaId) -> Result<TypeDescriptor, SchemaError> {
        self.infer(id, true, true)
    }

    /// Infer the descriptor for `id`.
    ///
    /// `required` reflects membership in the enclosing object's required set.
    /// `force` treats the value and every nested field as always present.
    ///
    /// # Errors
    ///
    /// - `UnknownType` for a tag outside the supported subset.
    /// - `TypeNotFound` when no non-null tag yields a type.
    /// - `UnresolvedPointer` / `CyclicReference` from resolution.
    pub fn infer(
        &self,
        id: SchemaId,
        required: bool,
        force: bool,
    ) -> Result<TypeDescriptor, SchemaError> {
        Inference {
            document: self,
            active: HashSet::new(),
        }
        .infer(id, required, force)
    }

    /// Request-body type of a link. Body fields honor their `required` set.
    pub fn link_type(&self, link: &Link) -> Result<Option<TypeDescriptor>, SchemaError> {
        link.schema.map(|id| self.infer(id, true, false)).transpose()
    }

    /// Response type of a link.
    pub fn target_type(&self, link: &Link) -> Result<Option<TypeDescriptor>, SchemaError> {
        link.target_schema.map(|id| self.type_of(id)).transpose()
    }
}

struct Inference<'a> {
    document: &'a Document,
    /// Resolved nodes currently being expanded; re-entry means a cycle.
    active: HashSet<SchemaId>,
}

impl Inference<'_> {
    fn infer(
        &mut self,
        id: SchemaId,
        required: bool,
        force: bool,
    ) -> Result<TypeDescriptor, SchemaError> {
        let document = self.document;
        let resolved = document.resolve(id)?;
        let schema = document.schema(resolved);
        if !self.active.insert(resolved) {
            return Err(SchemaError::CyclicReference {
                pointer: schema.location.clone(),
            });
        }
        let inferred = self.infer_resolved(schema, required, force);
        self.active.remove(&resolved);

        let inferred = inferred?.ok_or_else(|| SchemaError::TypeNotFound {
            types: schema.type_names(),
        })?;
        if schema.has_kind(&Kind::Null) || !(required || force) {
            Ok(TypeDescriptor::optional(inferred))
        } else {
            Ok(inferred)
        }
    }

    /// Candidate for each tag; later tags overwrite earlier ones.
    fn infer_resolved(
        &mut self,
        schema: &Schema,
        required: bool,
        force: bool,
    ) -> Result<Option<TypeDescriptor>, SchemaError> {
        let mut found = None;
        for kind in &schema.types {
            let candidate = match kind {
                Kind::Boolean => TypeDescriptor::Primitive(Primitive::Boolean),
                Kind::String => match schema.format.as_deref() {
                    Some("date-time") => TypeDescriptor::Primitive(Primitive::Timestamp),
                    _ => TypeDescriptor::Primitive(Primitive::String),
                },
                Kind::Number => TypeDescriptor::Primitive(Primitive::Double),
                Kind::Integer => TypeDescriptor::Primitive(Primitive::Integer),
                Kind::Any => TypeDescriptor::Dynamic,
                Kind::Array => match schema.items {
                    Some(items) => TypeDescriptor::list(self.infer(items, required, force)?),
                    None => TypeDescriptor::list(TypeDescriptor::Dynamic),
                },
                Kind::Object => self.infer_object(schema, force)?,
                Kind::Null => continue,
                Kind::Unknown(tag) => return Err(SchemaError::UnknownType { tag: tag.clone() }),
            };
            found = Some(candidate);
        }
        Ok(found)
    }

    fn infer_object(&mut self, schema: &Schema, force: bool) -> Result<TypeDescriptor, SchemaError> {
        // Only one pattern is supported; the first declared wins.
        if let Some((_, value)) = schema.pattern_properties.first() {
            return Ok(TypeDescriptor::map(self.infer(*value, true, true)?));
        }

        let mut fields = Vec::with_capacity(schema.properties.len());
        for (name, &prop) in &schema.properties {
            let required = schema.is_required(name) || force;
            let prop = self.document.resolve(prop)?;
            fields.push(Field {
                name: initial_cap(name)?,
                key: name.clone(),
                required,
                ty: self.infer(prop, required, force)?,
            });
        }
        Ok(TypeDescriptor::Composite(fields))
    }
}
