//! Schema nodes and the arena that owns them.
//!
//! A hyper-schema document is flattened into a [`SchemaArena`] at load time.
//! Nodes refer to their children by [`SchemaId`]; `$ref` pointers stay as
//! text and are only followed during resolution.

use std::collections::BTreeMap;

use crate::link::Link;
use crate::pointer::Pointer;

/// Stable index of a node inside its arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaId(pub(crate) usize);

impl SchemaId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Primitive kind tag from a schema's `type` keyword.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Kind {
    Boolean,
    String,
    Number,
    Integer,
    Array,
    Object,
    Any,
    Null,
    /// A tag outside the supported subset, kept so inference can report it.
    Unknown(String),
}

impl Kind {
    pub fn parse(tag: &str) -> Self {
        match tag {
            "boolean" => Kind::Boolean,
            "string" => Kind::String,
            "number" => Kind::Number,
            "integer" => Kind::Integer,
            "array" => Kind::Array,
            "object" => Kind::Object,
            "any" => Kind::Any,
            "null" => Kind::Null,
            other => Kind::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Kind::Boolean => "boolean",
            Kind::String => "string",
            Kind::Number => "number",
            Kind::Integer => "integer",
            Kind::Array => "array",
            Kind::Object => "object",
            Kind::Any => "any",
            Kind::Null => "null",
            Kind::Unknown(tag) => tag,
        }
    }
}

/// One node of the hyper-schema tree.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    /// JSON pointer to where this node sits in the document, e.g. `#/definitions/app`.
    pub location: String,
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,

    pub types: Vec<Kind>,
    pub format: Option<String>,
    pub items: Option<SchemaId>,
    /// Sorted by name so consumers visit fields deterministically.
    pub properties: BTreeMap<String, SchemaId>,
    /// Document order; only the first entry is honored by inference.
    pub pattern_properties: Vec<(String, SchemaId)>,
    pub required: Vec<String>,
    pub reference: Option<Pointer>,
    /// Alternatives in declared order; resolution always takes index 0.
    pub any_of: Vec<SchemaId>,
    pub definitions: BTreeMap<String, SchemaId>,

    pub links: Vec<Link>,
}

impl Schema {
    pub fn has_kind(&self, kind: &Kind) -> bool {
        self.types.contains(kind)
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    /// Tag names as written in the document, for error messages.
    pub fn type_names(&self) -> Vec<String> {
        self.types.iter().map(|k| k.as_str().to_string()).collect()
    }
}

/// Owner of every schema node in a document.
#[derive(Debug, Clone, Default)]
pub struct SchemaArena {
    nodes: Vec<Schema>,
}

impl SchemaArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move a node into the arena and return its id.
    pub fn alloc(&mut self, schema: Schema) -> SchemaId {
        self.nodes.push(schema);
        SchemaId(self.nodes.len() - 1)
    }

    /// Reserve a slot so children can be allocated before their parent is complete.
    pub fn reserve(&mut self) -> SchemaId {
        self.alloc(Schema::default())
    }

    pub fn set(&mut self, id: SchemaId, schema: Schema) {
        self.nodes[id.0] = schema;
    }

    pub fn get(&self, id: SchemaId) -> &Schema {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
