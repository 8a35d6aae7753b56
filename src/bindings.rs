//! Per-resource, per-action signatures ready for a template engine.
//!
//! [`Bindings::build`] walks every resource of a [`Document`] in name order
//! and every link in declared order, rendering types with the supplied
//! [`TypeSyntax`]. Any failure aborts the whole walk.

use serde::Serialize;

use crate::document::{Document, Resource};
use crate::error::SchemaError;
use crate::ident::{initial_low, method_cap};
use crate::link::Link;
use crate::syntax::TypeSyntax;

/// Signatures for a whole document.
#[derive(Debug, Clone, Serialize)]
pub struct Bindings {
    /// Package name derived from the title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub resources: Vec<ResourceBinding>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceBinding {
    pub name: String,
    pub type_name: String,
    /// Rendered struct type, absent for link-only resources without a `type`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    pub actions: Vec<ActionBinding>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionBinding {
    pub title: String,
    pub method_name: String,
    pub rel: String,
    pub method: String,
    pub href: String,
    /// Href with placeholders replaced by `{}`.
    pub path: String,
    pub parameters: Vec<ParameterBinding>,
    pub returns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterBinding {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

impl Bindings {
    /// Derive signatures for every resource in `document`.
    ///
    /// # Errors
    ///
    /// Returns the first `SchemaError` raised by any resource or action.
    pub fn build(document: &Document, syntax: &TypeSyntax) -> Result<Self, SchemaError> {
        let resources = document
            .resources()?
            .into_iter()
            .map(|resource| resource_binding(document, syntax, resource))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: document.service_name(),
            title: document.title().map(String::from),
            version: document.version().map(String::from),
            url: document.base_url().map(String::from),
            resources,
        })
    }
}

fn resource_binding(
    document: &Document,
    syntax: &TypeSyntax,
    resource: Resource<'_>,
) -> Result<ResourceBinding, SchemaError> {
    tracing::debug!(resource = resource.name, links = resource.links().len(), "deriving signatures");

    let definition = if resource.definition().types.is_empty() {
        None
    } else {
        Some(syntax.render(&document.type_of(resource.schema)?))
    };

    let actions = resource
        .links()
        .iter()
        .map(|link| action_binding(document, syntax, link))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ResourceBinding {
        name: resource.name.to_string(),
        type_name: resource.type_name()?,
        definition,
        actions,
    })
}

fn action_binding(
    document: &Document,
    syntax: &TypeSyntax,
    link: &Link,
) -> Result<ActionBinding, SchemaError> {
    let params = document.link_parameters(link)?;
    let parameters = params
        .iter()
        .map(|(name, ty)| {
            Ok(ParameterBinding {
                name: initial_low(name)?,
                ty: syntax.render(ty),
            })
        })
        .collect::<Result<Vec<_>, SchemaError>>()?;

    let returns = document
        .link_values(link)?
        .iter()
        .map(|ty| syntax.render(ty))
        .collect();

    // link_parameters already rejected a missing href.
    let href = link.href.as_ref().map(|h| h.as_str()).unwrap_or_default();
    let path = link
        .href
        .as_ref()
        .map(|h| h.path_template("{}"))
        .unwrap_or_default();

    Ok(ActionBinding {
        title: link.title.clone(),
        method_name: method_cap(&link.title)?,
        rel: link.rel.clone(),
        method: link.method.clone(),
        href: href.to_string(),
        path,
        parameters,
        returns,
    })
}
