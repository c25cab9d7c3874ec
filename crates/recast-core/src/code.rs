//! Abstract code fragments produced by the generator.
//!
//! Fragments describe *what* to emit (a constructor call, a safe call, an element-wise
//! transform) without committing to source text. A host renderer turns them into code.

use crate::model::TypeDescriptor;
use crate::naming::TypeName;
use serde::{Deserialize, Serialize};

/// An expression in the generated code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "expr", rename_all = "camelCase")]
pub enum Expr {
    /// A local name: the source parameter or a lambda binding
    Variable { name: String },

    /// Property read: `receiver.name`, or `receiver?.name` when `safe`
    Property {
        receiver: Box<Expr>,
        name: String,
        #[serde(default)]
        safe: bool,
    },

    /// Function call, optionally on a receiver
    Call {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        receiver: Option<Box<Expr>>,
        function: String,
        #[serde(default)]
        args: Vec<Expr>,
        #[serde(default)]
        safe: bool,
    },

    /// Constructor invocation with named arguments
    Construct {
        target: TypeName,
        args: Vec<Argument>,
    },

    /// Constant from a mapping entry, emitted verbatim
    Literal { text: String },

    /// Host expression from a mapping entry, emitted verbatim
    Raw { code: String },

    /// A rule template where `{it}` stands for the rendered argument
    Template { template: String, argument: Box<Expr> },

    /// The null literal
    Null,

    /// Non-null assertion of a nullable value
    NotNull { value: Box<Expr> },

    /// `subject?.let { binding -> body }`
    SafeLet {
        subject: Box<Expr>,
        binding: String,
        body: Box<Expr>,
    },

    /// Single-parameter lambda
    Lambda { parameter: String, body: Box<Expr> },

    /// Key/value pair
    Pair { first: Box<Expr>, second: Box<Expr> },

    /// Enum variant reference
    EnumValue { enum_type: TypeName, variant: String },

    /// Exhaustive dispatch on a subject
    When {
        subject: Box<Expr>,
        arms: Vec<WhenArm>,
    },
}

/// One named constructor argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    pub name: String,
    pub value: Expr,
}

/// One arm of a [`Expr::When`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhenArm {
    pub pattern: WhenPattern,
    pub value: Expr,
}

/// Pattern of a [`WhenArm`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "pattern", rename_all = "camelCase")]
pub enum WhenPattern {
    Null,
    EnumValue { enum_type: TypeName, variant: String },
}

impl Expr {
    pub fn var(name: impl Into<String>) -> Self {
        Expr::Variable { name: name.into() }
    }

    pub fn literal(text: impl Into<String>) -> Self {
        Expr::Literal { text: text.into() }
    }

    pub fn raw(code: impl Into<String>) -> Self {
        Expr::Raw { code: code.into() }
    }

    /// `self.name`
    pub fn property(self, name: impl Into<String>) -> Self {
        Expr::Property {
            receiver: Box::new(self),
            name: name.into(),
            safe: false,
        }
    }

    /// `self.function(args...)`
    pub fn call(self, function: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            receiver: Some(Box::new(self)),
            function: function.into(),
            args,
            safe: false,
        }
    }

    /// `self?.function(args...)`
    pub fn safe_call(self, function: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            receiver: Some(Box::new(self)),
            function: function.into(),
            args,
            safe: true,
        }
    }

    /// `function(args...)` with no receiver
    pub fn function(function: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            receiver: None,
            function: function.into(),
            args,
            safe: false,
        }
    }

    pub fn template(template: impl Into<String>, argument: Expr) -> Self {
        Expr::Template {
            template: template.into(),
            argument: Box::new(argument),
        }
    }

    pub fn not_null(self) -> Self {
        Expr::NotNull {
            value: Box::new(self),
        }
    }

    pub fn safe_let(self, binding: impl Into<String>, body: Expr) -> Self {
        Expr::SafeLet {
            subject: Box::new(self),
            binding: binding.into(),
            body: Box::new(body),
        }
    }

    pub fn lambda(parameter: impl Into<String>, body: Expr) -> Self {
        Expr::Lambda {
            parameter: parameter.into(),
            body: Box::new(body),
        }
    }

    pub fn pair(first: Expr, second: Expr) -> Self {
        Expr::Pair {
            first: Box::new(first),
            second: Box::new(second),
        }
    }

    /// Whether this is exactly the variable `name`.
    pub fn is_var(&self, name: &str) -> bool {
        matches!(self, Expr::Variable { name: n } if n == name)
    }

    /// Whether the variable `name` occurs anywhere in the expression.
    pub fn mentions(&self, name: &str) -> bool {
        match self {
            Expr::Variable { name: n } => n == name,
            Expr::Literal { .. }
            | Expr::Raw { .. }
            | Expr::Null
            | Expr::EnumValue { .. } => false,
            Expr::Property { receiver, .. } => receiver.mentions(name),
            Expr::Call { receiver, args, .. } => {
                receiver.as_ref().is_some_and(|r| r.mentions(name))
                    || args.iter().any(|a| a.mentions(name))
            }
            Expr::Construct { args, .. } => args.iter().any(|a| a.value.mentions(name)),
            Expr::Template { argument, .. } => argument.mentions(name),
            Expr::NotNull { value } => value.mentions(name),
            Expr::SafeLet {
                subject,
                binding,
                body,
            } => subject.mentions(name) || (binding != name && body.mentions(name)),
            Expr::Lambda { parameter, body } => parameter != name && body.mentions(name),
            Expr::Pair { first, second } => first.mentions(name) || second.mentions(name),
            Expr::When { subject, arms } => {
                subject.mentions(name) || arms.iter().any(|a| a.value.mentions(name))
            }
        }
    }

    /// Whether the expression contains a not-null assertion anywhere.
    pub fn asserts_not_null(&self) -> bool {
        match self {
            Expr::NotNull { .. } => true,
            Expr::Variable { .. }
            | Expr::Literal { .. }
            | Expr::Raw { .. }
            | Expr::Null
            | Expr::EnumValue { .. } => false,
            Expr::Property { receiver, .. } => receiver.asserts_not_null(),
            Expr::Call { receiver, args, .. } => {
                receiver.as_ref().is_some_and(|r| r.asserts_not_null())
                    || args.iter().any(Expr::asserts_not_null)
            }
            Expr::Construct { args, .. } => args.iter().any(|a| a.value.asserts_not_null()),
            Expr::Template { argument, .. } => argument.asserts_not_null(),
            Expr::SafeLet { subject, body, .. } => {
                subject.asserts_not_null() || body.asserts_not_null()
            }
            Expr::Lambda { body, .. } => body.asserts_not_null(),
            Expr::Pair { first, second } => first.asserts_not_null() || second.asserts_not_null(),
            Expr::When { subject, arms } => {
                subject.asserts_not_null() || arms.iter().any(|a| a.value.asserts_not_null())
            }
        }
    }
}

/// How a post-construction assignment writes its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "via", rename_all = "camelCase")]
pub enum AssignTarget {
    /// `target.name = value`
    Property { name: String },
    /// `target.setter(value)`
    Setter { method: String },
}

/// One statement of the post-construction block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyAssignment {
    pub target: AssignTarget,
    pub value: Expr,
}

/// Constructor call plus an optional trailing assignment block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Construction {
    pub constructor: Expr,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assignments: Vec<PropertyAssignment>,
}

/// A generated mapping function: `fun Source.name(): Target = body`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingFunction {
    pub name: String,
    /// Name under which the body refers to the source value
    pub parameter: String,
    pub source: TypeDescriptor,
    pub target: TypeDescriptor,
    pub body: Construction,
}
