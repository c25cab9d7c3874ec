//! Type descriptors.
//!
//! A [`TypeDescriptor`] is the structural fact the host compiler hands us about one
//! use of a type: its nominal name, whether the use is nullable, and a kind tag.
//! Record structure is not inlined; it lives in the [`super::TypeModel`] catalog so
//! that recursive record graphs stay finite.
//!
//! # Examples
//!
//! ```rust,ignore
//! let names = TypeDescriptor::list(TypeDescriptor::scalar("String").nullable());
//! assert_eq!(names.to_string(), "List<String?>");
//! ```

use crate::naming::TypeName;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A type as seen at one use site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Nominal identity
    pub name: TypeName,
    /// Whether this use admits null
    #[serde(default)]
    pub nullable: bool,
    /// Structural kind
    #[serde(flatten)]
    pub kind: TypeKind,
}

/// Structural kind of a type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TypeKind {
    /// Opaque value type (`String`, `Int`, `UUID`, ...)
    Scalar,

    /// Enumeration with named variants in declaration order
    Enum { variants: Vec<String> },

    /// Record type; properties and constructors are looked up by name in the model
    Record,

    /// Single-element container
    Collection {
        collection: CollectionKind,
        element: Box<TypeDescriptor>,
    },

    /// Key/value container
    Map {
        #[serde(default)]
        mutable: bool,
        key: Box<TypeDescriptor>,
        value: Box<TypeDescriptor>,
    },
}

/// Flavor of a single-element container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CollectionKind {
    Iterable,
    List,
    MutableList,
    Set,
    MutableSet,
    Sequence,
    Array,
}

impl CollectionKind {
    /// Whether a value of kind `self` can be used where `target` is expected without
    /// copying.
    pub fn satisfies(self, target: CollectionKind) -> bool {
        use CollectionKind::*;
        match (self, target) {
            (s, t) if s == t => true,
            (List | MutableList | Set | MutableSet, Iterable) => true,
            (MutableList, List) => true,
            (MutableSet, Set) => true,
            _ => false,
        }
    }

    /// Function that copies any iterable into a fresh container of this kind.
    pub fn materializer(self) -> &'static str {
        match self {
            CollectionKind::Iterable | CollectionKind::List => "toList",
            CollectionKind::MutableList => "toMutableList",
            CollectionKind::Set => "toSet",
            CollectionKind::MutableSet => "toMutableSet",
            CollectionKind::Sequence => "asSequence",
            CollectionKind::Array => "toTypedArray",
        }
    }

    /// Kind of container produced by an element-wise `map` over this kind.
    pub fn mapped(self) -> CollectionKind {
        match self {
            CollectionKind::Sequence => CollectionKind::Sequence,
            _ => CollectionKind::List,
        }
    }

    /// Built-in type name for this container.
    pub fn type_name(self) -> TypeName {
        match self {
            CollectionKind::Iterable => TypeName::builtin("Iterable"),
            CollectionKind::List => TypeName::builtin("List"),
            CollectionKind::MutableList => TypeName::builtin("MutableList"),
            CollectionKind::Set => TypeName::builtin("Set"),
            CollectionKind::MutableSet => TypeName::builtin("MutableSet"),
            CollectionKind::Sequence => TypeName::builtin("Sequence"),
            CollectionKind::Array => TypeName::builtin("Array"),
        }
    }
}

impl TypeDescriptor {
    pub fn new(name: TypeName, kind: TypeKind) -> Self {
        TypeDescriptor {
            name,
            nullable: false,
            kind,
        }
    }

    /// Create a scalar type
    pub fn scalar(name: impl Into<TypeName>) -> Self {
        TypeDescriptor::new(name.into(), TypeKind::Scalar)
    }

    /// Create a record type reference
    pub fn record(name: impl Into<TypeName>) -> Self {
        TypeDescriptor::new(name.into(), TypeKind::Record)
    }

    /// Create an enum type
    pub fn enumeration<I, S>(name: impl Into<TypeName>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TypeDescriptor::new(
            name.into(),
            TypeKind::Enum {
                variants: variants.into_iter().map(Into::into).collect(),
            },
        )
    }

    /// Create a collection type
    pub fn collection(collection: CollectionKind, element: TypeDescriptor) -> Self {
        TypeDescriptor::new(
            collection.type_name(),
            TypeKind::Collection {
                collection,
                element: Box::new(element),
            },
        )
    }

    pub fn list(element: TypeDescriptor) -> Self {
        TypeDescriptor::collection(CollectionKind::List, element)
    }

    pub fn set(element: TypeDescriptor) -> Self {
        TypeDescriptor::collection(CollectionKind::Set, element)
    }

    /// Create a map type
    pub fn map(key: TypeDescriptor, value: TypeDescriptor, mutable: bool) -> Self {
        let name = if mutable { "MutableMap" } else { "Map" };
        TypeDescriptor::new(
            TypeName::builtin(name),
            TypeKind::Map {
                mutable,
                key: Box::new(key),
                value: Box::new(value),
            },
        )
    }

    /// The built-in `Unit` type
    pub fn unit() -> Self {
        TypeDescriptor::scalar(TypeName::builtin("Unit"))
    }

    /// Same type, admitting null
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Same type, excluding null
    pub fn non_null(&self) -> Self {
        let mut copy = self.clone();
        copy.nullable = false;
        copy
    }

    pub fn is_unit(&self) -> bool {
        self.name.is_unit()
    }

    pub fn is_record(&self) -> bool {
        matches!(self.kind, TypeKind::Record)
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.kind, TypeKind::Enum { .. })
    }

    pub fn enum_variants(&self) -> Option<&[String]> {
        match &self.kind {
            TypeKind::Enum { variants } => Some(variants),
            _ => None,
        }
    }

    /// Structural equality ignoring only the outermost nullability flag. Nested
    /// element nullability still has to agree.
    pub fn same_type_ignoring_nullability(&self, other: &TypeDescriptor) -> bool {
        if !self.name.same_as(&other.name) {
            return false;
        }
        match (&self.kind, &other.kind) {
            (TypeKind::Scalar, TypeKind::Scalar) | (TypeKind::Record, TypeKind::Record) => true,
            (TypeKind::Enum { variants: a }, TypeKind::Enum { variants: b }) => a == b,
            (
                TypeKind::Collection {
                    collection: ca,
                    element: ea,
                },
                TypeKind::Collection {
                    collection: cb,
                    element: eb,
                },
            ) => ca == cb && ea.same_type(eb),
            (
                TypeKind::Map {
                    mutable: ma,
                    key: ka,
                    value: va,
                },
                TypeKind::Map {
                    mutable: mb,
                    key: kb,
                    value: vb,
                },
            ) => ma == mb && ka.same_type(kb) && va.same_type(vb),
            _ => false,
        }
    }

    /// Full structural equality, nullability included, with built-in name equivalence.
    pub fn same_type(&self, other: &TypeDescriptor) -> bool {
        self.nullable == other.nullable && self.same_type_ignoring_nullability(other)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeKind::Collection { element, .. } => {
                write!(f, "{}<{}>", self.name.simple_name(), element)?
            }
            TypeKind::Map { key, value, .. } => {
                write!(f, "{}<{}, {}>", self.name.simple_name(), key, value)?
            }
            _ if self.name.is_builtin() => write!(f, "{}", self.name.simple_name())?,
            _ => write!(f, "{}", self.name)?,
        }
        if self.nullable {
            write!(f, "?")?;
        }
        Ok(())
    }
}
