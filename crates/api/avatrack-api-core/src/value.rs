//! Value: typed scalars carried by animator parameters, condition literals and curves.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse kind of a [`Value`]. Animator parameters are declared with one of these.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Bool,
    Int,
    Float,
}

impl ValueKind {
    /// Zero value of this kind (`false`, `0`, `0.0`).
    pub fn zero(self) -> Value {
        match self {
            ValueKind::Bool => Value::Bool(false),
            ValueKind::Int => Value::Int(0),
            ValueKind::Float => Value::Float(0.0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum Value {
    /// Boolean (trigger-free flag)
    Bool(bool),

    /// Integer index (e.g. a discrete pose)
    Int(i32),

    /// Scalar float
    Float(f32),
}

impl Value {
    /// Return the coarse kind of this value.
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
        }
    }

    /// Build a value of `kind` from the float encoding used by expression
    /// descriptors (bools are `0.0`/`1.0`, ints are rounded).
    pub fn from_f32(kind: ValueKind, raw: f32) -> Self {
        match kind {
            ValueKind::Bool => Value::Bool(raw != 0.0),
            ValueKind::Int => Value::Int(raw.round() as i32),
            ValueKind::Float => Value::Float(raw),
        }
    }

    /// Float encoding of this value, the inverse of [`Value::from_f32`].
    pub fn as_f32(&self) -> f32 {
        match *self {
            Value::Bool(b) => {
                if b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Int(i) => i as f32,
            Value::Float(f) => f,
        }
    }
}
