//! Semantic value shapes and the structural subshape relation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Semantic type of an operation input or output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// No value (`null`)
    Unit,
    Bool,
    /// Any JSON number
    Number,
    /// Whole numbers only; a refinement of `Number`
    Integer,
    Text,
    List(Box<Shape>),
    /// Open record: declared fields must be present, extra fields are allowed
    Record(BTreeMap<String, Shape>),
    /// `null` or the inner shape
    Optional(Box<Shape>),
    Any,
}

impl Shape {
    pub fn list(item: Shape) -> Self {
        Shape::List(Box::new(item))
    }

    pub fn optional(inner: Shape) -> Self {
        Shape::Optional(Box::new(inner))
    }

    pub fn record<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Shape)>,
        K: Into<String>,
    {
        Shape::Record(fields.into_iter().map(|(k, s)| (k.into(), s)).collect())
    }

    /// Structural subtyping: every value accepted by `self` is accepted by `other`.
    pub fn is_subshape_of(&self, other: &Shape) -> bool {
        match (self, other) {
            (_, Shape::Any) => true,
            (Shape::Integer, Shape::Number) => true,
            (Shape::List(a), Shape::List(b)) => a.is_subshape_of(b),
            (Shape::Optional(a), Shape::Optional(b)) => a.is_subshape_of(b),
            (Shape::Unit, Shape::Optional(_)) => true,
            (a, Shape::Optional(b)) => a.is_subshape_of(b),
            (Shape::Record(sub), Shape::Record(sup)) => sup.iter().all(|(name, sup_field)| {
                sub.get(name)
                    .map(|sub_field| sub_field.is_subshape_of(sup_field))
                    .unwrap_or(false)
            }),
            (a, b) => a == b,
        }
    }

    /// Check a runtime value against this shape.
    pub fn accepts(&self, value: &Value) -> bool {
        self.check(value).is_ok()
    }

    /// Like [`Shape::accepts`], but reports where the value diverged.
    pub fn check(&self, value: &Value) -> Result<(), String> {
        self.check_at(value, "$")
    }

    fn check_at(&self, value: &Value, path: &str) -> Result<(), String> {
        let ok = match (self, value) {
            (Shape::Any, _) => true,
            (Shape::Unit, Value::Null) => true,
            (Shape::Bool, Value::Bool(_)) => true,
            (Shape::Number, Value::Number(_)) => true,
            (Shape::Integer, Value::Number(n)) => {
                n.is_i64() || n.is_u64() || n.as_f64().map(|f| f.fract() == 0.0).unwrap_or(false)
            }
            (Shape::Text, Value::String(_)) => true,
            (Shape::Optional(_), Value::Null) => true,
            (Shape::Optional(inner), v) => return inner.check_at(v, path),
            (Shape::List(item), Value::Array(values)) => {
                for (i, v) in values.iter().enumerate() {
                    item.check_at(v, &format!("{}[{}]", path, i))?;
                }
                true
            }
            (Shape::Record(fields), Value::Object(map)) => {
                for (name, field) in fields {
                    let field_path = format!("{}.{}", path, name);
                    match map.get(name) {
                        Some(v) => field.check_at(v, &field_path)?,
                        None if matches!(field, Shape::Optional(_)) => {}
                        None => return Err(format!("{}: missing field", field_path)),
                    }
                }
                true
            }
            _ => false,
        };

        if ok {
            Ok(())
        } else {
            Err(format!("{}: expected {}, got {}", path, self, kind_of(value)))
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "text",
        Value::Array(_) => "list",
        Value::Object(_) => "record",
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Unit => write!(f, "unit"),
            Shape::Bool => write!(f, "bool"),
            Shape::Number => write!(f, "number"),
            Shape::Integer => write!(f, "integer"),
            Shape::Text => write!(f, "text"),
            Shape::Any => write!(f, "any"),
            Shape::List(item) => write!(f, "list<{}>", item),
            Shape::Optional(inner) => write!(f, "{}?", inner),
            Shape::Record(fields) => {
                write!(f, "{{")?;
                for (i, (name, shape)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", name, shape)?;
                }
                write!(f, "}}")
            }
        }
    }
}
