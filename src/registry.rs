//! Function-registration table for the `integration` module
//!
//! Hosts read `MODULE` once at initialization and expose every entry of
//! `MODULE.functions` under its name.

use crate::args::{check_arity, int_arg, Value};
use crate::core;
use crate::error::{Error, Result};

pub type NativeFn = fn(&[Value]) -> Result<Value>;

/// One exported function
#[derive(Debug, Clone, Copy)]
pub struct FunctionDef {
    pub name: &'static str,
    pub doc: &'static str,
    pub arity: usize,
    pub call: NativeFn,
}

/// A module as presented to a host at import time
#[derive(Debug)]
pub struct ModuleDef {
    pub name: &'static str,
    pub doc: &'static str,
    pub functions: &'static [FunctionDef],
}

pub const MODULE_NAME: &str = "integration";
pub const MODULE_DOC: &str = "A module to add numbers.";
pub const ADD_NUMBERS: &str = "add_numbers";
pub const ADD_NUMBERS_DOC: &str = "Add two numbers.";

pub static MODULE: ModuleDef = ModuleDef {
    name: MODULE_NAME,
    doc: MODULE_DOC,
    functions: &[FunctionDef {
        name: ADD_NUMBERS,
        doc: ADD_NUMBERS_DOC,
        arity: 2,
        call: add_numbers,
    }],
};

fn add_numbers(args: &[Value]) -> Result<Value> {
    let a = int_arg(ADD_NUMBERS, args, 0)?;
    let b = int_arg(ADD_NUMBERS, args, 1)?;
    Ok(Value::from(core::add(a, b)))
}

impl FunctionDef {
    /// Check the argument count against `arity`, then run the native function
    pub fn invoke(&self, args: &[Value]) -> Result<Value> {
        check_arity(self.name, args, self.arity)?;
        (self.call)(args)
    }
}

impl ModuleDef {
    pub fn lookup(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Dispatch a dynamic call by exported name
    pub fn invoke(&self, name: &str, args: &[Value]) -> Result<Value> {
        let function = self
            .lookup(name)
            .ok_or_else(|| Error::UnknownFunction(name.to_string()))?;
        function.invoke(args)
    }
}
