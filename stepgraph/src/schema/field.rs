//! Field declarations: kind, merge policy and presence of one record field.

use std::fmt;

use serde_json::Value;

use super::merge::{Combine, MergePolicy};

/// JSON shape a field accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Any value, including `null`.
    Any,
    Bool,
    /// Whole numbers that fit in an `i64`.
    Integer,
    /// Any number.
    Number,
    String,
    List,
    Object,
}

impl FieldKind {
    /// Whether `value` has the shape of this kind.
    pub fn admits(&self, value: &Value) -> bool {
        match self {
            Self::Any => true,
            Self::Bool => value.is_boolean(),
            Self::Integer => value.is_i64(),
            Self::Number => value.is_number(),
            Self::String => value.is_string(),
            Self::List => value.is_array(),
            Self::Object => value.is_object(),
        }
    }

    /// Short name of the shape of `value`, used in error messages.
    pub fn describe(value: &Value) -> &'static str {
        match value {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(n) if n.is_i64() => "integer",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "list",
            Value::Object(_) => "object",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Any => "any",
            Self::Bool => "bool",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::String => "string",
            Self::List => "list",
            Self::Object => "object",
        };
        f.write_str(s)
    }
}

/// What happens when the caller does not supply the field.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Presence {
    /// Stays unset until a step writes it.
    #[default]
    Optional,
    /// Starts with this value.
    Default(Value),
    /// The run fails if the initial record lacks the field.
    Required,
}

/// Declaration of one record field.
///
/// ```rust
/// use serde_json::json;
/// use stepgraph::{Combine, Field};
///
/// let counter = Field::integer("counter").with_default(json!(0));
/// let results = Field::list("results").accumulate(Combine::Append);
/// # let _ = (counter, results);
/// ```
#[derive(Clone, Debug)]
pub struct Field {
    pub(crate) name: String,
    pub(crate) kind: FieldKind,
    pub(crate) policy: MergePolicy,
    pub(crate) presence: Presence,
}

impl Field {
    /// Declares a field of the given kind with overwrite policy and no default.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            policy: MergePolicy::Overwrite,
            presence: Presence::Optional,
        }
    }

    pub fn any(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Any)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Bool)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Number)
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::String)
    }

    pub fn list(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::List)
    }

    pub fn object(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Object)
    }

    /// Initial value used when the caller does not provide one.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.presence = Presence::Default(value.into());
        self
    }

    /// The caller must provide this field.
    pub fn required(mut self) -> Self {
        self.presence = Presence::Required;
        self
    }

    /// Switches the field to accumulate policy with the given rule.
    pub fn accumulate(mut self, combine: Combine) -> Self {
        self.policy = MergePolicy::Accumulate(combine);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn policy(&self) -> &MergePolicy {
        &self.policy
    }

    pub fn presence(&self) -> &Presence {
        &self.presence
    }
}
