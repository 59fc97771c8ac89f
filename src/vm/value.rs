//! # Runtime values
//!
//! The closed set of values bytecode operates on, plus the dyadic operation
//! tables for `+ - * / % ==`. Each table is transcribed from the original
//! implementation's per-operator files (`value_add.go`, `value_sub.go`,
//! `value_mul.go`, `value_div.go`, `value_mod.go`), one match arm per
//! variant pair rather than the original's nested type switches.

use std::fmt;
use std::sync::Arc;

use crate::error::RuntimeError;
use crate::vm::class::Object;

#[derive(Debug, Clone)]
pub enum Value {
    Str(String),
    Num(i64),
    Bool(bool),
    Obj(Option<Arc<Object>>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Str(_) => "String",
            Value::Num(_) => "Number",
            Value::Bool(_) => "Boolean",
            Value::Obj(_) => "Object",
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Str(s) => !s.is_empty(),
            Value::Num(n) => *n != 0,
            Value::Bool(b) => *b,
            Value::Obj(o) => o.is_some(),
        }
    }

    /// Same-variant equality by value; Objects by reference identity.
    /// Any cross-variant comparison is `false`, never an error.
    pub fn equal(&self, other: &Value) -> Value {
        let eq = match (self, other) {
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Num(a), Value::Num(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Obj(a), Value::Obj(b)) => match (a, b) {
                (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                (None, None) => true,
                _ => false,
            },
            _ => false,
        };
        Value::Bool(eq)
    }

    pub fn add(&self, other: &Value) -> Result<Value, RuntimeError> {
        use Value::*;
        Ok(match (self, other) {
            (Str(a), Str(b)) => Str(format!("{a}{b}")),
            (Str(_), Obj(_)) => return Err(unsupported("+", self, other)),
            (Str(a), other) => Str(format!("{a}{}", other.display())),
            (Bool(a), Str(b)) => Str(format!("{}{b}", display_bool(*a))),
            (Bool(a), Bool(b)) => Bool(*a || *b),
            (Bool(a), Num(b)) => Bool(*a || *b != 0),
            (Num(a), Str(b)) => Str(format!("{a}{b}")),
            (Num(a), Bool(b)) => Bool(*a != 0 || *b),
            (Num(a), Num(b)) => Num(a + b),
            _ => return Err(unsupported("+", self, other)),
        })
    }

    pub fn sub(&self, other: &Value) -> Result<Value, RuntimeError> {
        match (self, other) {
            (Value::Num(a), Value::Num(b)) => Ok(Value::Num(a - b)),
            _ => Err(unsupported("-", self, other)),
        }
    }

    pub fn div(&self, other: &Value) -> Result<Value, RuntimeError> {
        match (self, other) {
            (Value::Num(a), Value::Num(b)) => Ok(Value::Num(a / b)),
            _ => Err(unsupported("/", self, other)),
        }
    }

    pub fn rem(&self, other: &Value) -> Result<Value, RuntimeError> {
        match (self, other) {
            (Value::Num(a), Value::Num(b)) => Ok(Value::Num(a % b)),
            _ => Err(unsupported("%", self, other)),
        }
    }

    pub fn mul(&self, other: &Value) -> Result<Value, RuntimeError> {
        use Value::*;
        Ok(match (self, other) {
            (Str(a), Bool(b)) => {
                if *b {
                    Str(a.clone())
                } else {
                    Str(String::new())
                }
            }
            (Str(a), Num(b)) => repeat(a, *b),
            (Obj(a), Bool(b)) => {
                if *b {
                    Obj(a.clone())
                } else {
                    Obj(None)
                }
            }
            (Bool(a), Str(b)) => {
                if *a {
                    Str(b.clone())
                } else {
                    Str(String::new())
                }
            }
            (Bool(a), Obj(b)) => {
                if *a {
                    Obj(b.clone())
                } else {
                    Obj(None)
                }
            }
            (Bool(a), Bool(b)) => Bool(*a && *b),
            (Bool(a), Num(b)) => {
                if *a {
                    Num(*b)
                } else {
                    Num(0)
                }
            }
            (Num(a), Str(b)) => repeat(b, *a),
            (Num(a), Bool(b)) => {
                if *b {
                    Num(*a)
                } else {
                    Num(0)
                }
            }
            (Num(a), Num(b)) => Num(a * b),
            _ => return Err(unsupported("*", self, other)),
        })
    }

    fn display(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            Value::Num(n) => n.to_string(),
            Value::Bool(b) => display_bool(*b).to_string(),
            Value::Obj(_) => "Object".to_string(),
        }
    }
}

fn display_bool(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}

/// `b < 0` repeats zero times, matching the original's "negative count →
/// empty string" rule rather than a panic.
fn repeat(s: &str, count: i64) -> Value {
    if count < 0 {
        Value::Str(String::new())
    } else {
        Value::Str(s.repeat(count as usize))
    }
}

fn unsupported(op: &'static str, a: &Value, b: &Value) -> RuntimeError {
    RuntimeError::UnsupportedOperation {
        op,
        lhs: a.type_name(),
        rhs: b.type_name(),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}
