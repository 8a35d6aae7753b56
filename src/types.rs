//! Core output types of type inference and signature derivation.

/// Scalar kinds a schema can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Boolean,
    String,
    /// `string` with `format: date-time`.
    Timestamp,
    Double,
    Integer,
}

/// Canonical description of an inferred type.
///
/// Rendering to destination-language text happens only in
/// [`TypeSyntax::render`](crate::TypeSyntax::render).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    Primitive(Primitive),
    /// Untyped value (`any`, or array elements with no `items`).
    Dynamic,
    /// Nullable or omittable value. Never nested.
    Optional(Box<TypeDescriptor>),
    List(Box<TypeDescriptor>),
    /// Map keyed by string.
    Map(Box<TypeDescriptor>),
    /// Inline record with fields sorted by serialization key.
    Composite(Vec<Field>),
    /// A named type such as a resource struct (`App`) or `ListRange`.
    Named(String),
    /// Trailing error slot of every return list.
    Error,
}

impl TypeDescriptor {
    /// Wrap in `Optional` unless already optional.
    pub fn optional(inner: TypeDescriptor) -> Self {
        match inner {
            TypeDescriptor::Optional(_) => inner,
            other => TypeDescriptor::Optional(Box::new(other)),
        }
    }

    pub fn list(inner: TypeDescriptor) -> Self {
        TypeDescriptor::List(Box::new(inner))
    }

    pub fn map(inner: TypeDescriptor) -> Self {
        TypeDescriptor::Map(Box::new(inner))
    }

    pub fn named(name: impl Into<String>) -> Self {
        TypeDescriptor::Named(name.into())
    }

    /// Pagination parameter type appended to list actions.
    pub fn list_range() -> Self {
        TypeDescriptor::optional(TypeDescriptor::named("ListRange"))
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, TypeDescriptor::Optional(_))
    }

    /// The type with any optional wrapper removed.
    pub fn unwrapped(&self) -> &TypeDescriptor {
        match self {
            TypeDescriptor::Optional(inner) => inner,
            other => other,
        }
    }

    pub fn fields(&self) -> Option<&[Field]> {
        match self.unwrapped() {
            TypeDescriptor::Composite(fields) => Some(fields),
            _ => None,
        }
    }
}

/// One field of an inline composite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Exported identifier, e.g. `CreatedAt`.
    pub name: String,
    /// Original property name, used as the serialization key.
    pub key: String,
    pub required: bool,
    pub ty: TypeDescriptor,
}

impl Field {
    /// Whether serialization should skip the field when absent.
    pub fn omit_if_absent(&self) -> bool {
        !self.required
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_never_nests() {
        let once = TypeDescriptor::optional(TypeDescriptor::Primitive(Primitive::String));
        let twice = TypeDescriptor::optional(once.clone());
        assert_eq!(once, twice);
        assert!(twice.is_optional());
    }

    #[test]
    fn unwrapped_strips_optional() {
        let ty = TypeDescriptor::optional(TypeDescriptor::Dynamic);
        assert_eq!(ty.unwrapped(), &TypeDescriptor::Dynamic);
        assert_eq!(TypeDescriptor::Dynamic.unwrapped(), &TypeDescriptor::Dynamic);
    }

    #[test]
    fn list_range_is_optional_named() {
        assert_eq!(
            TypeDescriptor::list_range(),
            TypeDescriptor::Optional(Box::new(TypeDescriptor::Named("ListRange".into())))
        );
    }

    #[test]
    fn field_omit_if_absent() {
        let field = Field {
            name: "Name".into(),
            key: "name".into(),
            required: false,
            ty: TypeDescriptor::Primitive(Primitive::String),
        };
        assert!(field.omit_if_absent());
    }
}
