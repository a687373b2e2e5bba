//! Merge policies: how a step's value for a field is folded into the record.

use std::fmt;
use std::sync::Arc;

use serde_json::{Number, Value};

use super::field::FieldKind;

/// Signature of a user-supplied combination rule: `(current, incoming) -> merged`.
pub type CombineFn = Arc<dyn Fn(Option<&Value>, Value) -> Result<Value, String> + Send + Sync>;

/// Declared combination rule of an accumulate field.
#[derive(Clone)]
pub enum Combine {
    /// List concatenation; order of writes is preserved.
    Append,
    /// List union without duplicates, kept in first-occurrence order.
    Union,
    /// Numeric addition. Integers stay integers unless the sum overflows.
    Sum,
    /// Caller-provided rule.
    Custom(CombineFn),
}

impl Combine {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(Option<&Value>, Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Whether this rule can be declared on a field of `kind`.
    pub(crate) fn supports(&self, kind: FieldKind) -> bool {
        match self {
            Self::Append | Self::Union => matches!(kind, FieldKind::List | FieldKind::Any),
            Self::Sum => matches!(
                kind,
                FieldKind::Integer | FieldKind::Number | FieldKind::Any
            ),
            Self::Custom(_) => true,
        }
    }

    /// Folds `incoming` into `current` (absent when the field is unset).
    pub(crate) fn apply(&self, current: Option<&Value>, incoming: Value) -> Result<Value, String> {
        match self {
            Self::Append => {
                let mut items = current_list(current)?;
                items.extend(incoming_list(incoming)?);
                Ok(Value::Array(items))
            }
            Self::Union => {
                let mut items = current_list(current)?;
                for item in incoming_list(incoming)? {
                    if !items.contains(&item) {
                        items.push(item);
                    }
                }
                Ok(Value::Array(items))
            }
            Self::Sum => {
                let base = match current {
                    None | Some(Value::Null) => Value::from(0),
                    Some(v) => v.clone(),
                };
                add_numbers(&base, &incoming)
            }
            Self::Custom(f) => f(current, incoming),
        }
    }
}

impl fmt::Debug for Combine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Append => write!(f, "Append"),
            Self::Union => write!(f, "Union"),
            Self::Sum => write!(f, "Sum"),
            Self::Custom(_) => write!(f, "Custom"),
        }
    }
}

/// Per-field merge policy, declared at registration time.
#[derive(Clone, Debug, Default)]
pub enum MergePolicy {
    /// New value replaces the old one.
    #[default]
    Overwrite,
    /// New value is combined with the old one by the declared rule.
    Accumulate(Combine),
}

impl MergePolicy {
    pub fn is_overwrite(&self) -> bool {
        matches!(self, Self::Overwrite)
    }
}

fn current_list(current: Option<&Value>) -> Result<Vec<Value>, String> {
    match current {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items.clone()),
        Some(other) => Err(format!("current value is not a list: {}", other)),
    }
}

fn incoming_list(incoming: Value) -> Result<Vec<Value>, String> {
    match incoming {
        Value::Array(items) => Ok(items),
        other => Err(format!("expected a list to accumulate, got {}", other)),
    }
}

fn add_numbers(a: &Value, b: &Value) -> Result<Value, String> {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        if let Some(sum) = x.checked_add(y) {
            return Ok(Value::from(sum));
        }
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => Number::from_f64(x + y)
            .map(Value::Number)
            .ok_or_else(|| format!("sum of {} and {} is not finite", a, b)),
        _ => Err(format!("cannot add {} and {}", a, b)),
    }
}
