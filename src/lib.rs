//! Schematic
//!
//! Typed binding signatures from JSON hyper-schema resource descriptions.
//!
//! A hyper-schema describes resources, their fields and the links (actions)
//! available on them. This library resolves `$ref`/`anyOf` chains, infers a
//! [`TypeDescriptor`] for every schema node and derives ordered parameter and
//! return lists for each link. A template engine can then stitch the rendered
//! strings into client source code.
//!
//! # Example
//!
//! ```
//! use schematic::{load_document_str, TypeSyntax};
//!
//! let doc = load_document_str(r##"{
//!     "definitions": {
//!         "app": {
//!             "type": "object",
//!             "definitions": { "name": { "type": "string" } },
//!             "properties": { "name": { "$ref": "#/definitions/app/definitions/name" } },
//!             "links": [{
//!                 "title": "Info",
//!                 "rel": "self",
//!                 "href": "/apps/{(%23%2Fdefinitions%2Fapp%2Fdefinitions%2Fname)}",
//!                 "targetSchema": { "$ref": "#/definitions/app" }
//!             }]
//!         }
//!     },
//!     "properties": { "app": { "$ref": "#/definitions/app" } }
//! }"##).unwrap();
//!
//! let go = TypeSyntax::go();
//! let app = &doc.resources().unwrap()[0];
//! let link = &app.links()[0];
//!
//! let params = doc.link_parameters(link).unwrap();
//! assert_eq!(params.order, ["appName"]);
//! assert_eq!(go.render(params.get("appName").unwrap()), "string");
//!
//! let values: Vec<_> = doc
//!     .link_values(link)
//!     .unwrap()
//!     .iter()
//!     .map(|ty| go.render(ty))
//!     .collect();
//! assert_eq!(values, ["App", "error"]);
//! ```
//!
//! # Resolution Rules
//!
//! | Keyword | Rule |
//! |---------|------|
//! | `anyOf` | First alternative wins |
//! | `$ref` | Followed from the document root; cycles are rejected |
//! | `patternProperties` | First declared pattern wins; `properties` ignored |
//! | `type: [.., "null"]` | Result wrapped in a single optional marker |

mod bindings;
mod document;
mod error;
mod href;
mod ident;
mod infer;
mod link;
mod loader;
mod pointer;
mod schema;
mod syntax;
mod types;

pub use bindings::{ActionBinding, Bindings, ParameterBinding, ResourceBinding};
pub use document::{Document, Resource};
pub use error::{LoadError, SchemaError};
pub use href::{Binding, HRef, Placeholder};
pub use ident::{initial_cap, initial_low, method_cap, normalize};
pub use link::{Link, Parameters, BODY_PARAM, RANGE_PARAM};
pub use loader::{is_url, load_document, load_document_auto, load_document_str, load_document_value};
pub use pointer::Pointer;
pub use schema::{Kind, Schema, SchemaArena, SchemaId};
pub use syntax::{CompositeSyntax, Target, TypeSyntax};
pub use types::{Field, Primitive, TypeDescriptor};

#[cfg(feature = "remote")]
pub use loader::load_document_url;
