//! Argument validation against declared operation signatures.
//!
//! Raw JSON arguments are checked and coerced here, before any resolver
//! runs. `null` is treated the same as an absent argument.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::error::{QueryError, Result};
use crate::schema::{OperationDef, Scalar};

/// A validated scalar argument value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    Id(String),
    String(String),
    Int(i32),
}

/// Arguments that satisfied an operation's signature.
#[derive(Debug, Clone)]
pub struct Arguments {
    operation: &'static str,
    values: HashMap<&'static str, ArgValue>,
}

impl Arguments {
    /// Check `raw` against `op`: no undeclared names, every required argument
    /// present, every value of the declared scalar type.
    pub fn validate(op: &'static OperationDef, raw: &Map<String, Value>) -> Result<Self> {
        if let Some(unknown) = raw.keys().find(|k| op.argument(k).is_none()) {
            return Err(QueryError::invalid(
                op.name,
                format!("unknown argument \"{unknown}\""),
            ));
        }

        let mut values = HashMap::with_capacity(op.arguments.len());
        for def in op.arguments {
            match raw.get(def.name) {
                None | Some(Value::Null) => {
                    if def.required {
                        return Err(QueryError::invalid(
                            op.name,
                            format!(
                                "argument \"{}\" of type {}! is required",
                                def.name,
                                def.ty.name()
                            ),
                        ));
                    }
                }
                Some(value) => {
                    let coerced = coerce(def.ty, value).ok_or_else(|| {
                        QueryError::invalid(
                            op.name,
                            format!(
                                "argument \"{}\" expects {}, got {value}",
                                def.name,
                                def.ty.name()
                            ),
                        )
                    })?;
                    values.insert(def.name, coerced);
                }
            }
        }

        Ok(Self {
            operation: op.name,
            values,
        })
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn opt_id(&self, name: &str) -> Option<String> {
        match self.values.get(name) {
            Some(ArgValue::Id(v)) => Some(v.clone()),
            _ => None,
        }
    }

    pub fn opt_string(&self, name: &str) -> Option<String> {
        match self.values.get(name) {
            Some(ArgValue::String(v)) => Some(v.clone()),
            _ => None,
        }
    }

    pub fn opt_int(&self, name: &str) -> Option<i32> {
        match self.values.get(name) {
            Some(ArgValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn id(&self, name: &str) -> Result<String> {
        self.opt_id(name).ok_or_else(|| self.missing(name))
    }

    pub fn string(&self, name: &str) -> Result<String> {
        self.opt_string(name).ok_or_else(|| self.missing(name))
    }

    pub fn int(&self, name: &str) -> Result<i32> {
        self.opt_int(name).ok_or_else(|| self.missing(name))
    }

    fn missing(&self, name: &str) -> QueryError {
        QueryError::invalid(self.operation, format!("argument \"{name}\" is required"))
    }
}

fn coerce(ty: Scalar, value: &Value) -> Option<ArgValue> {
    match (ty, value) {
        (Scalar::Id, Value::String(s)) => Some(ArgValue::Id(s.clone())),
        (Scalar::Id, Value::Number(n)) => n.as_i64().map(|i| ArgValue::Id(i.to_string())),
        (Scalar::String, Value::String(s)) => Some(ArgValue::String(s.clone())),
        (Scalar::Int, Value::Number(n)) => n
            .as_i64()
            .and_then(|i| i32::try_from(i).ok())
            .map(ArgValue::Int),
        _ => None,
    }
}
