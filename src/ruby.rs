//! Ruby bindings
//!
//! `require "integration"` defines the `Integration` module:
//! - `Integration.add_numbers(a, b)`
//! - `Integration.invoke(name, *args)` dynamic dispatch through the registry
//! - `Integration::DOC` and `Integration::FUNCTIONS` (name => doc)
//!
//! Arguments are decoded strictly. magnus' own `i32` conversion goes through
//! `to_int`, which would truncate a Float, so every call takes raw `Value`s.

use magnus::{
    function, prelude::*, Error, Float, Integer, RString, Ruby, Symbol, Value,
};
use tracing::debug;

use crate::args::{decode_function_name, decode_host_arg, HostArg, HostInteger, Value as ArgValue};
use crate::error::Error as IntegrationError;
use crate::registry::{ADD_NUMBERS, MODULE};

struct RubyArg<'r> {
    ruby: &'r Ruby,
    value: Value,
}

impl HostArg for RubyArg<'_> {
    type Error = Error;

    fn is_nil(&self) -> bool {
        self.value.is_nil()
    }

    fn as_bool(&self) -> Option<bool> {
        if self.value.is_kind_of(self.ruby.class_true_class()) {
            Some(true)
        } else if self.value.is_kind_of(self.ruby.class_false_class()) {
            Some(false)
        } else {
            None
        }
    }

    fn as_integer(&self) -> Result<Option<HostInteger>, Error> {
        let Some(i) = Integer::from_value(self.value) else {
            return Ok(None);
        };
        match i.to_i64() {
            Ok(n) => Ok(Some(HostInteger::Small(n))),
            // Bignum
            Err(_) => {
                let digits: String = self.value.funcall("to_s", ())?;
                Ok(Some(HostInteger::Digits(digits)))
            }
        }
    }

    fn as_float(&self) -> Option<f64> {
        Float::from_value(self.value).map(|f| f.to_f64())
    }

    fn as_text(&self) -> Result<Option<String>, Error> {
        RString::from_value(self.value).map(|s| s.to_string()).transpose()
    }

    fn as_symbol(&self) -> Result<Option<String>, Error> {
        Symbol::from_value(self.value)
            .map(|sym| sym.name().map(|name| name.into_owned()))
            .transpose()
    }

    fn unsupported(&self) -> Error {
        Error::new(
            self.ruby.exception_type_error(),
            format!("unsupported argument type: {}", unsafe { self.value.classname() }),
        )
    }
}

fn to_ruby_error(ruby: &Ruby, err: IntegrationError) -> Error {
    let class = match err {
        IntegrationError::InvalidArgument { .. } => ruby.exception_arg_error(),
        IntegrationError::UnknownFunction(_) => ruby.exception_name_error(),
        IntegrationError::Overflow { .. } => ruby.exception_range_error(),
        IntegrationError::Json(_) => ruby.exception_runtime_error(),
    };
    Error::new(class, err.to_string())
}

fn to_ruby(ruby: &Ruby, value: ArgValue) -> Value {
    match value {
        ArgValue::Nil => ruby.qnil().as_value(),
        ArgValue::Bool(b) => ruby.into_value(b),
        ArgValue::Int(n) => ruby.into_value(n),
        ArgValue::Float(f) => ruby.into_value(f),
        ArgValue::BigInt(s) | ArgValue::Str(s) => ruby.str_new(&s).as_value(),
    }
}

fn call(ruby: &Ruby, name: &str, args: &[Value]) -> Result<Value, Error> {
    let decoded = args
        .iter()
        .map(|&value| decode_host_arg(&RubyArg { ruby, value }))
        .collect::<Result<Vec<_>, Error>>()?;

    MODULE
        .invoke(name, &decoded)
        .map(|result| to_ruby(ruby, result))
        .map_err(|e| to_ruby_error(ruby, e))
}

fn rb_add_numbers(ruby: &Ruby, a: Value, b: Value) -> Result<Value, Error> {
    call(ruby, ADD_NUMBERS, &[a, b])
}

fn rb_invoke(ruby: &Ruby, args: &[Value]) -> Result<Value, Error> {
    let (name, rest) = args.split_first().ok_or_else(|| {
        Error::new(ruby.exception_arg_error(), "wrong number of arguments (given 0, expected 1+)")
    })?;
    let name = decode_function_name(&RubyArg { ruby, value: *name })?;
    call(ruby, &name, rest)
}

#[magnus::init]
fn init(ruby: &Ruby) -> Result<(), Error> {
    // Define module Integration
    let module = ruby.define_module("Integration")?;

    module.define_module_function("add_numbers", function!(rb_add_numbers, 2))?;
    module.define_module_function("invoke", function!(rb_invoke, -1))?;

    let functions = ruby.hash_new();
    for def in MODULE.functions {
        functions.aset(def.name, def.doc)?;
    }
    module.const_set("DOC", MODULE.doc)?;
    module.const_set("FUNCTIONS", functions)?;

    debug!(module = MODULE.name, functions = MODULE.functions.len(), "ruby module initialized");
    Ok(())
}
