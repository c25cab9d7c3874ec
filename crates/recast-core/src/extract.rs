//! Structural facts about the two ends of a mapping.
//!
//! Source extraction yields every readable datum: stored properties and zero-argument
//! accessors treated as virtual properties. Target extraction yields the ways a value
//! can be written: constructors, mutable properties and setter methods. Both only see
//! members visible from the generated code's [`AccessContext`].

use crate::code::Expr;
use crate::error::{MappingError, Result};
use crate::model::{
    AccessContext, ConstructorCandidate, PropertyDescriptor, RecordDefinition, TypeDescriptor,
    TypeModel,
};
use crate::naming::{property_name_for_accessor, property_name_for_setter, TypeName};
use serde::Serialize;

/// How a source datum is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "origin", rename_all = "camelCase")]
pub enum DatumOrigin {
    Property,
    Accessor { method: String },
}

/// One readable value of the source record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceDatum {
    pub name: String,
    #[serde(rename = "type")]
    pub tpe: TypeDescriptor,
    #[serde(flatten)]
    pub origin: DatumOrigin,
}

impl SourceDatum {
    /// Expression reading this datum from `receiver`.
    pub fn access(&self, receiver: Expr) -> Expr {
        match &self.origin {
            DatumOrigin::Property => receiver.property(&self.name),
            DatumOrigin::Accessor { method } => receiver.call(method, vec![]),
        }
    }
}

/// How the current value behind a setter can be read back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "getter", content = "name", rename_all = "camelCase")]
pub enum Getter {
    Property(String),
    Accessor(String),
}

/// A `setX(value)` method of the target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetterMethod {
    pub property: String,
    pub method: String,
    #[serde(rename = "type")]
    pub tpe: TypeDescriptor,
    pub getter: Option<Getter>,
}

/// Everything that can receive a value on the target record.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetData {
    pub name: TypeName,
    pub constructors: Vec<ConstructorCandidate>,
    pub mutable_properties: Vec<PropertyDescriptor>,
    pub setters: Vec<SetterMethod>,
}

impl TargetData {
    pub fn mutable_property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.mutable_properties.iter().find(|p| p.name == name)
    }

    pub fn setter(&self, name: &str) -> Option<&SetterMethod> {
        self.setters.iter().find(|s| s.property == name)
    }

    /// Assignable after construction
    pub fn is_settable(&self, name: &str) -> bool {
        self.mutable_property(name).is_some() || self.setter(name).is_some()
    }

    pub fn is_constructor_parameter(&self, name: &str) -> bool {
        self.constructors.iter().any(|c| c.parameter(name).is_some())
    }

    /// Whether some constructor or post-construction assignment can receive `name`.
    pub fn accepts(&self, name: &str) -> bool {
        self.is_constructor_parameter(name) || self.is_settable(name)
    }

    /// Receivable member names, first occurrence order.
    pub fn member_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        let candidates = self
            .constructors
            .iter()
            .flat_map(|c| c.parameters.iter().map(|p| &p.name))
            .chain(self.mutable_properties.iter().map(|p| &p.name))
            .chain(self.setters.iter().map(|s| &s.property));
        for name in candidates {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        names
    }
}

fn lookup<'m>(
    model: &'m dyn TypeModel,
    access: &AccessContext,
    tpe: &TypeDescriptor,
) -> Result<&'m RecordDefinition> {
    let record = model
        .record(&tpe.name)
        .filter(|_| tpe.is_record())
        .ok_or_else(|| MappingError::UnknownType {
            name: tpe.name.to_string(),
        })?;
    if !record.visibility.visible_to(access) {
        return Err(MappingError::InaccessibleType {
            name: record.name.to_string(),
        });
    }
    Ok(record)
}

/// Readable data of `source`: visible properties in declaration order, then visible
/// accessors. Names are not deduplicated.
pub fn extract_source_data(
    model: &dyn TypeModel,
    access: &AccessContext,
    source: &TypeDescriptor,
) -> Result<Vec<SourceDatum>> {
    let record = lookup(model, access, source)?;

    let properties = record
        .properties
        .iter()
        .filter(|p| p.visible_to(access))
        .map(|p| SourceDatum {
            name: p.name.clone(),
            tpe: p.tpe.clone(),
            origin: DatumOrigin::Property,
        });

    let accessors = record
        .methods
        .iter()
        .filter(|m| m.visibility.visible_to(access) && m.is_accessor_shaped())
        .map(|m| SourceDatum {
            name: property_name_for_accessor(&m.name),
            tpe: m.returns.clone(),
            origin: DatumOrigin::Accessor {
                method: m.name.clone(),
            },
        });

    Ok(properties.chain(accessors).collect())
}

/// Writable shape of `target`. Fails if the record itself is not visible.
pub fn extract_target_data(
    model: &dyn TypeModel,
    access: &AccessContext,
    target: &TypeDescriptor,
) -> Result<TargetData> {
    let record = lookup(model, access, target)?;

    let constructors = record
        .constructors
        .iter()
        .filter(|c| c.visibility.visible_to(access))
        .cloned()
        .collect();

    let mutable_properties = record
        .properties
        .iter()
        .filter(|p| p.mutable && p.visible_to(access))
        .cloned()
        .collect();

    let setters = record
        .methods
        .iter()
        .filter(|m| m.visibility.visible_to(access))
        .filter(|m| m.parameters.len() == 1 && m.returns.is_unit())
        .filter_map(|m| {
            let property = property_name_for_setter(&m.name)?;
            let getter = find_getter(record, access, &property);
            Some(SetterMethod {
                property,
                method: m.name.clone(),
                tpe: m.parameters[0].tpe.clone(),
                getter,
            })
        })
        .collect();

    Ok(TargetData {
        name: record.name.clone(),
        constructors,
        mutable_properties,
        setters,
    })
}

/// A visible property named `property`, else a `get`/`is` accessor for it.
fn find_getter(record: &RecordDefinition, access: &AccessContext, property: &str) -> Option<Getter> {
    if record
        .properties
        .iter()
        .any(|p| p.name == property && p.visible_to(access))
    {
        return Some(Getter::Property(property.to_string()));
    }
    record
        .methods
        .iter()
        .filter(|m| m.visibility.visible_to(access) && m.is_accessor_shaped())
        .find(|m| m.name != property && property_name_for_accessor(&m.name) == property)
        .map(|m| Getter::Accessor(m.name.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiagnosticKind;
    use crate::model::{MethodDescriptor, Parameter, TypeCatalog, Visibility};

    fn string() -> TypeDescriptor {
        TypeDescriptor::scalar("String")
    }

    fn catalog() -> TypeCatalog {
        TypeCatalog::new()
            .with(
                RecordDefinition::new("com.example.Person")
                    .property(PropertyDescriptor::new("name", string()))
                    .property(
                        PropertyDescriptor::new("secret", string())
                            .with_visibility(Visibility::Private),
                    )
                    .method(MethodDescriptor::new("getEmail", vec![], string()))
                    .method(MethodDescriptor::new("isActive", vec![], TypeDescriptor::scalar("Boolean")))
                    .method(MethodDescriptor::new("reset", vec![], TypeDescriptor::unit())),
            )
            .with(
                RecordDefinition::new("com.example.PersonDto")
                    .property(PropertyDescriptor::new("name", string()).mutable())
                    .property(PropertyDescriptor::new("id", string()))
                    .method(MethodDescriptor::new("getNickname", vec![], string()))
                    .method(MethodDescriptor::new(
                        "setNickname",
                        vec![Parameter::new("value", string())],
                        TypeDescriptor::unit(),
                    ))
                    .constructor(ConstructorCandidate::new(vec![Parameter::new("id", string())]))
                    .constructor(
                        ConstructorCandidate::new(vec![])
                            .with_visibility(Visibility::Private),
                    ),
            )
            .with(
                RecordDefinition::new("com.example.Hidden").with_visibility(Visibility::Internal {
                    module: "other".into(),
                }),
            )
    }

    #[test]
    fn test_source_data_includes_accessors() {
        let model = catalog();
        let data = extract_source_data(
            &model,
            &AccessContext::default(),
            &TypeDescriptor::record("com.example.Person"),
        )
        .unwrap();
        let names: Vec<&str> = data.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["name", "email", "active"]);
        assert_eq!(
            data[1].access(Expr::var("source")),
            Expr::var("source").call("getEmail", vec![])
        );
    }

    #[test]
    fn test_target_data() {
        let model = catalog();
        let target = extract_target_data(
            &model,
            &AccessContext::default(),
            &TypeDescriptor::record("com.example.PersonDto"),
        )
        .unwrap();
        assert_eq!(target.constructors.len(), 1);
        assert_eq!(target.mutable_properties.len(), 1);
        assert_eq!(target.setters.len(), 1);
        assert_eq!(
            target.setters[0].getter,
            Some(Getter::Accessor("getNickname".into()))
        );
        assert_eq!(target.member_names(), vec!["id", "name", "nickname"]);
        assert!(target.accepts("nickname"));
        assert!(!target.accepts("email"));
    }

    #[test]
    fn test_inaccessible_and_unknown_types() {
        let model = catalog();
        let access = AccessContext::new("app");
        let err = extract_target_data(&model, &access, &TypeDescriptor::record("com.example.Hidden"))
            .unwrap_err();
        assert_eq!(err.kind(), DiagnosticKind::InaccessibleType);

        let err = extract_source_data(&model, &access, &TypeDescriptor::record("com.example.Nope"))
            .unwrap_err();
        assert_eq!(err.kind(), DiagnosticKind::UnknownType);
    }
}
