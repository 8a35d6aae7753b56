//! URI templates whose placeholders embed JSON pointers.
//!
//! Hyper-schema links describe path parameters by pointing at the schema
//! that types them:
//!
//! ```text
//! /apps/{(%23%2Fdefinitions%2Fapp%2Fdefinitions%2Fidentity)}
//! ```
//!
//! The placeholder above decodes to `#/definitions/app/definitions/identity`
//! and is exposed to callers as the identifier `appIdentity`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::Document;
use crate::error::SchemaError;
use crate::ident::initial_low;
use crate::pointer::Pointer;
use crate::schema::SchemaId;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\(([^)]+)\)\}").expect("placeholder pattern is valid"));

/// One `{(...)}` segment of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Identifier derived from the pointer's named segments.
    pub name: String,
    pub pointer: Pointer,
}

/// A placeholder bound to the schema node its pointer resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding<'a> {
    pub name: &'a str,
    pub schema: SchemaId,
}

/// A decomposed link template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HRef {
    template: String,
    placeholders: Vec<Placeholder>,
}

impl HRef {
    /// Decompose `template` into its placeholders, in template order.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::InvalidIdentifier` if a placeholder's pointer has
    /// no named segments to build an identifier from.
    pub fn parse(template: &str) -> Result<Self, SchemaError> {
        let mut placeholders = Vec::new();
        for caps in PLACEHOLDER.captures_iter(template) {
            let pointer = Pointer::parse(&caps[1]);
            let joined = pointer.named_segments().collect::<Vec<_>>().join("-");
            let name = initial_low(&joined)?;
            placeholders.push(Placeholder { name, pointer });
        }
        Ok(Self {
            template: template.to_string(),
            placeholders,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    /// Placeholder identifiers in template order.
    pub fn order(&self) -> Vec<&str> {
        self.placeholders.iter().map(|p| p.name.as_str()).collect()
    }

    /// The template with every placeholder replaced by `marker`
    /// (`/apps/{(...)}` with `%v` gives `/apps/%v`).
    pub fn path_template(&self, marker: &str) -> String {
        PLACEHOLDER
            .replace_all(&self.template, regex::NoExpand(marker))
            .into_owned()
    }

    /// Resolve every placeholder against `document`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnresolvedPointer` if a pointer segment is missing.
    pub fn resolve<'a>(&'a self, document: &Document) -> Result<Vec<Binding<'a>>, SchemaError> {
        self.placeholders
            .iter()
            .map(|placeholder| {
                let target = document.lookup(&placeholder.pointer)?;
                let schema = document.resolve(target)?;
                tracing::trace!(
                    placeholder = %placeholder.name,
                    pointer = %placeholder.pointer,
                    "bound href placeholder"
                );
                Ok(Binding {
                    name: &placeholder.name,
                    schema,
                })
            })
            .collect()
    }
}

impl std::fmt::Display for HRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_without_placeholders() {
        let href = HRef::parse("/account").unwrap();
        assert!(href.placeholders().is_empty());
        assert_eq!(href.path_template("%v"), "/account");
    }

    #[test]
    fn parse_nested_definition_placeholder() {
        let href =
            HRef::parse("/results/{(%23%2Fdefinitions%2Fstruct%2Fdefinitions%2Fuuid)}").unwrap();
        assert_eq!(href.order(), ["structUUID"]);
        assert_eq!(
            href.placeholders()[0].pointer.as_str(),
            "#/definitions/struct/definitions/uuid"
        );
    }

    #[test]
    fn parse_multiple_placeholders_in_order() {
        let href = HRef::parse(
            "/apps/{(%23%2Fdefinitions%2Fapp%2Fdefinitions%2Fidentity)}/config-vars/{(%23%2Fdefinitions%2Fconfig-var%2Fdefinitions%2Fkey)}",
        )
        .unwrap();
        assert_eq!(href.order(), ["appIdentity", "configVarKey"]);
        assert_eq!(href.path_template("%v"), "/apps/%v/config-vars/%v");
    }

    #[test]
    fn parse_properties_leaf_placeholder() {
        let href = HRef::parse("/apps/{(%23%2Fdefinitions%2Fapp%2Fproperties%2Fid)}").unwrap();
        assert_eq!(href.order(), ["appID"]);
    }

    #[test]
    fn parse_unencoded_placeholder() {
        let href = HRef::parse("/apps/{(#/definitions/app/definitions/name)}").unwrap();
        assert_eq!(href.order(), ["appName"]);
    }

    #[test]
    fn root_pointer_placeholder_is_invalid() {
        let result = HRef::parse("/{(%23)}");
        assert_eq!(result, Err(SchemaError::InvalidIdentifier));
    }
}
