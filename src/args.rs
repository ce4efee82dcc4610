//! Dynamically typed argument container
//!
//! Hosts that cannot call `core::add` with typed parameters hand over a
//! slice of `Value`s instead. Each argument is decoded into its expected
//! type explicitly; a mismatch becomes `Error::InvalidArgument`.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Error, Result};

/// A single call argument or result as seen across a dynamic boundary
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    /// Integer outside the `i64` range, as decimal text
    BigInt(String),
    Float(f64),
    Str(String),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) | Value::BigInt(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
        }
    }

    /// Build an integer from its decimal text, keeping values that do not
    /// fit in `i64` as `BigInt`.
    pub fn from_integer_digits(digits: &str) -> Value {
        match digits.parse::<i64>() {
            Ok(n) => Value::Int(n),
            Err(_) => Value::BigInt(digits.to_string()),
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("null, a boolean, a number or a string")
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Value, E> {
        Ok(Value::Nil)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Value, E> {
        Ok(Value::Nil)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Value, E> {
        Ok(Value::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Value, E> {
        Ok(i64::try_from(v).map_or_else(|_| Value::BigInt(v.to_string()), Value::Int))
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> std::result::Result<Value, E> {
        Ok(Value::from_integer_digits(&v.to_string()))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> std::result::Result<Value, E> {
        Ok(Value::from_integer_digits(&v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Value, E> {
        Ok(Value::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Value, E> {
        Ok(Value::Str(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Value, E> {
        Ok(Value::Str(v))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

/// Integer as reported by a host runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostInteger {
    Small(i64),
    /// Decimal text of an integer the host could not narrow to `i64`
    Digits(String),
}

/// Read-only view of one host runtime object.
///
/// Implementations must not coerce: `as_integer` answers only for objects
/// that are integers in the host, never for floats or strings that could be
/// converted to one.
pub trait HostArg {
    type Error;

    fn is_nil(&self) -> bool;
    fn as_bool(&self) -> Option<bool>;
    fn as_integer(&self) -> std::result::Result<Option<HostInteger>, Self::Error>;
    fn as_float(&self) -> Option<f64>;
    fn as_text(&self) -> std::result::Result<Option<String>, Self::Error>;
    fn unsupported(&self) -> Self::Error;

    /// Interned name, for hosts that have them
    fn as_symbol(&self) -> std::result::Result<Option<String>, Self::Error> {
        Ok(None)
    }
}

/// Decode the function name of a dynamic call: a symbol or a string
pub fn decode_function_name<H: HostArg>(arg: &H) -> std::result::Result<String, H::Error> {
    if let Some(name) = arg.as_symbol()? {
        return Ok(name);
    }
    arg.as_text()?.ok_or_else(|| arg.unsupported())
}

/// Turn a host object into a `Value`.
/// Booleans are checked before integers since some hosts treat them as ints.
pub fn decode_host_arg<H: HostArg>(arg: &H) -> std::result::Result<Value, H::Error> {
    if arg.is_nil() {
        return Ok(Value::Nil);
    }
    if let Some(b) = arg.as_bool() {
        return Ok(Value::Bool(b));
    }
    if let Some(i) = arg.as_integer()? {
        return Ok(match i {
            HostInteger::Small(n) => Value::Int(n),
            HostInteger::Digits(digits) => Value::from_integer_digits(&digits),
        });
    }
    if let Some(f) = arg.as_float() {
        return Ok(Value::Float(f));
    }
    if let Some(s) = arg.as_text()? {
        return Ok(Value::Str(s));
    }
    Err(arg.unsupported())
}

/// Fail unless exactly `arity` arguments were supplied
pub fn check_arity(function: &'static str, args: &[Value], arity: usize) -> Result<()> {
    if args.len() == arity {
        return Ok(());
    }
    trace!(function, expected = arity, given = args.len(), "arity mismatch");
    let noun = if arity == 1 { "argument" } else { "arguments" };
    Err(Error::invalid_argument(
        function,
        format!("takes exactly {} {} ({} given)", arity, noun, args.len()),
    ))
}

fn out_of_range(position: usize, negative: bool) -> String {
    let bound = if negative { "less than minimum" } else { "greater than maximum" };
    format!("argument {}: signed integer is {}", position, bound)
}

/// Decode the argument at 0-based `index` as a C `int`.
/// Booleans count as 0/1; anything else that is not an integer is rejected.
pub fn int_arg(function: &'static str, args: &[Value], index: usize) -> Result<i32> {
    let position = index + 1;
    let value = args.get(index).ok_or_else(|| {
        Error::invalid_argument(function, format!("missing argument {}", position))
    })?;

    let decoded = match value {
        Value::Int(n) => i32::try_from(*n).map_err(|_| out_of_range(position, *n < 0)),
        Value::BigInt(digits) => Err(out_of_range(position, digits.starts_with('-'))),
        Value::Bool(b) => Ok(i32::from(*b)),
        other => Err(format!(
            "argument {}: '{}' object cannot be interpreted as an integer",
            position,
            other.type_name()
        )),
    };

    decoded.map_err(|message| {
        trace!(function, position, %message, "rejected argument");
        Error::invalid_argument(function, message)
    })
}
