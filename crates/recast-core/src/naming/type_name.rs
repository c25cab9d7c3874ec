use serde::{Deserialize, Serialize};
use std::fmt;

/// Packages whose types are treated as host built-ins (`String`, `Int`, `List`, ...).
const BUILTIN_PACKAGES: [&str; 3] = ["", "kotlin", "kotlin.collections"];

/// Nominal identity of a type: a dotted package path plus a simple name.
///
/// `com.example.User` parses to package `com.example` and simple name `User`.
/// A name without dots lives in the empty (built-in) package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct TypeName {
    package: String,
    simple: String,
}

impl TypeName {
    pub fn new(package: impl Into<String>, simple: impl Into<String>) -> Self {
        TypeName {
            package: package.into(),
            simple: simple.into(),
        }
    }

    /// Parse a dotted qualified name. The last segment is the simple name.
    pub fn parse(qualified: &str) -> Self {
        match qualified.rsplit_once('.') {
            Some((package, simple)) => TypeName::new(package, simple),
            None => TypeName::new("", qualified),
        }
    }

    /// A built-in type such as `String` or `Int`.
    pub fn builtin(simple: &str) -> Self {
        TypeName::new("", simple)
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn simple_name(&self) -> &str {
        &self.simple
    }

    pub fn qualified(&self) -> String {
        if self.package.is_empty() {
            self.simple.clone()
        } else {
            format!("{}.{}", self.package, self.simple)
        }
    }

    pub fn is_builtin(&self) -> bool {
        BUILTIN_PACKAGES.contains(&self.package.as_str())
    }

    /// True when this is the built-in type with the given simple name.
    pub fn is_builtin_named(&self, simple: &str) -> bool {
        self.is_builtin() && self.simple == simple
    }

    pub fn is_unit(&self) -> bool {
        self.is_builtin_named("Unit")
    }

    pub fn is_any(&self) -> bool {
        self.is_builtin_named("Any")
    }

    /// Two names denote the same type. Built-ins compare by simple name so that
    /// `String` and `kotlin.String` are interchangeable.
    pub fn same_as(&self, other: &TypeName) -> bool {
        if self.is_builtin() && other.is_builtin() {
            self.simple == other.simple
        } else {
            self == other
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.package.is_empty() {
            write!(f, "{}", self.simple)
        } else {
            write!(f, "{}.{}", self.package, self.simple)
        }
    }
}

impl From<String> for TypeName {
    fn from(value: String) -> Self {
        TypeName::parse(&value)
    }
}

impl From<&str> for TypeName {
    fn from(value: &str) -> Self {
        TypeName::parse(value)
    }
}

impl From<TypeName> for String {
    fn from(value: TypeName) -> Self {
        value.qualified()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("com.example.User", "com.example", "User")]
    #[case("String", "", "String")]
    #[case("kotlin.collections.List", "kotlin.collections", "List")]
    fn test_parse(#[case] input: &str, #[case] package: &str, #[case] simple: &str) {
        let name = TypeName::parse(input);
        assert_eq!(name.package(), package);
        assert_eq!(name.simple_name(), simple);
        assert_eq!(name.qualified(), input);
    }

    #[test]
    fn test_builtin_equivalence() {
        assert!(TypeName::parse("kotlin.String").same_as(&TypeName::builtin("String")));
        assert!(!TypeName::parse("com.example.String").same_as(&TypeName::builtin("String")));
    }

    #[test]
    fn test_serde_as_string() {
        let name: TypeName = serde_json::from_str(r#""com.example.User""#).unwrap();
        assert_eq!(name.simple_name(), "User");
        assert_eq!(serde_json::to_string(&name).unwrap(), r#""com.example.User""#);
    }
}
