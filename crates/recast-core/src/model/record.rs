//! Record shapes: properties, methods, constructors and their visibility.

use super::types::TypeDescriptor;
use crate::naming::TypeName;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Access control of a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "level", rename_all = "camelCase")]
pub enum Visibility {
    #[default]
    Public,
    /// Visible within one compilation module
    Internal { module: String },
    Protected,
    Private,
}

/// Where generated code lives; the consumer side of a visibility check.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccessContext {
    /// Compilation module of the generated code
    #[serde(default)]
    pub module: String,
}

impl AccessContext {
    pub fn new(module: impl Into<String>) -> Self {
        AccessContext {
            module: module.into(),
        }
    }
}

impl Visibility {
    /// Whether code generated in `consumer` may reference a declaration with this
    /// visibility. Generated code is never a subclass, so `Protected` is hidden.
    pub fn visible_to(&self, consumer: &AccessContext) -> bool {
        match self {
            Visibility::Public => true,
            Visibility::Internal { module } => *module == consumer.module,
            Visibility::Protected | Visibility::Private => false,
        }
    }
}

/// A stored property of a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub tpe: TypeDescriptor,
    /// `var`-like: assignable after construction
    #[serde(default)]
    pub mutable: bool,
    #[serde(default)]
    pub visibility: Visibility,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>, tpe: TypeDescriptor) -> Self {
        PropertyDescriptor {
            name: name.into(),
            tpe,
            mutable: false,
            visibility: Visibility::Public,
        }
    }

    pub fn mutable(mut self) -> Self {
        self.mutable = true;
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn visible_to(&self, consumer: &AccessContext) -> bool {
        self.visibility.visible_to(consumer)
    }
}

/// A function or constructor parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub tpe: TypeDescriptor,
    #[serde(default)]
    pub has_default: bool,
}

impl Parameter {
    pub fn new(name: impl Into<String>, tpe: TypeDescriptor) -> Self {
        Parameter {
            name: name.into(),
            tpe,
            has_default: false,
        }
    }

    pub fn defaulted(mut self) -> Self {
        self.has_default = true;
        self
    }

    /// Can be left out of a call: it has a default or accepts null.
    pub fn is_optional(&self) -> bool {
        self.has_default || self.tpe.nullable
    }
}

/// A member function of a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default = "TypeDescriptor::unit")]
    pub returns: TypeDescriptor,
    #[serde(default)]
    pub visibility: Visibility,
}

impl MethodDescriptor {
    pub fn new(name: impl Into<String>, parameters: Vec<Parameter>, returns: TypeDescriptor) -> Self {
        MethodDescriptor {
            name: name.into(),
            parameters,
            returns,
            visibility: Visibility::Public,
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Zero parameters and a non-`Unit` result.
    pub fn is_accessor_shaped(&self) -> bool {
        self.parameters.is_empty() && !self.returns.is_unit()
    }
}

/// One constructor of a target record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConstructorCandidate {
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub visibility: Visibility,
}

impl ConstructorCandidate {
    pub fn new(parameters: Vec<Parameter>) -> Self {
        ConstructorCandidate {
            parameters,
            visibility: Visibility::Public,
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn parameter_names(&self) -> Vec<String> {
        self.parameters.iter().map(|p| p.name.clone()).collect()
    }

    /// Whether the parameter types equal `signature` position by position.
    pub fn matches_signature(&self, signature: &[TypeName]) -> bool {
        self.parameters.len() == signature.len()
            && self
                .parameters
                .iter()
                .zip(signature)
                .all(|(p, t)| p.tpe.name.same_as(t))
    }
}

impl fmt::Display for ConstructorCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self
            .parameters
            .iter()
            .map(|p| {
                let default = if p.has_default { " = ..." } else { "" };
                format!("{}: {}{}", p.name, p.tpe, default)
            })
            .collect();
        write!(f, "({})", params.join(", "))
    }
}

/// Full structural description of a record type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordDefinition {
    pub name: TypeName,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub properties: Vec<PropertyDescriptor>,
    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,
    #[serde(default)]
    pub constructors: Vec<ConstructorCandidate>,
}

impl RecordDefinition {
    pub fn new(name: impl Into<TypeName>) -> Self {
        RecordDefinition {
            name: name.into(),
            visibility: Visibility::Public,
            properties: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    pub fn method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    pub fn constructor(mut self, constructor: ConstructorCandidate) -> Self {
        self.constructors.push(constructor);
        self
    }

    /// Convenience for data-class style records: one property and one constructor
    /// parameter per field.
    pub fn data<I, S>(name: impl Into<TypeName>, fields: I) -> Self
    where
        I: IntoIterator<Item = (S, TypeDescriptor)>,
        S: Into<String>,
    {
        let fields: Vec<(String, TypeDescriptor)> =
            fields.into_iter().map(|(n, t)| (n.into(), t)).collect();
        let mut record = RecordDefinition::new(name);
        for (field, tpe) in &fields {
            record.properties.push(PropertyDescriptor::new(field, tpe.clone()));
        }
        record.constructors.push(ConstructorCandidate::new(
            fields
                .into_iter()
                .map(|(n, t)| Parameter::new(n, t))
                .collect(),
        ));
        record
    }

    pub fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::record(self.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility() {
        let here = AccessContext::new("app");
        assert!(Visibility::Public.visible_to(&here));
        assert!(Visibility::Internal { module: "app".into() }.visible_to(&here));
        assert!(!Visibility::Internal { module: "lib".into() }.visible_to(&here));
        assert!(!Visibility::Protected.visible_to(&here));
        assert!(!Visibility::Private.visible_to(&here));
    }

    #[test]
    fn test_constructor_display() {
        let ctor = ConstructorCandidate::new(vec![
            Parameter::new("id", TypeDescriptor::scalar("String")),
            Parameter::new("age", TypeDescriptor::scalar("Int")).defaulted(),
        ]);
        assert_eq!(ctor.to_string(), "(id: String, age: Int = ...)");
    }

    #[test]
    fn test_accessor_shape() {
        let getter = MethodDescriptor::new("getName", vec![], TypeDescriptor::scalar("String"));
        let action = MethodDescriptor::new("reset", vec![], TypeDescriptor::unit());
        assert!(getter.is_accessor_shaped());
        assert!(!action.is_accessor_shaped());
    }
}
