//! Native integer-add extension
//!
//! This is a pure Rust library with C ABI exports. Host bindings are
//! selected with cargo features.
//!
//! The crate is organized as:
//! - core.rs: typed integer operations and the overflow policy
//! - args.rs: dynamically typed argument container and its decoding
//! - registry.rs: function-registration table of the `integration` module
//! - ffi.rs: C ABI exports (ctypes / cffi / Fiddle)
//! - ruby.rs: Ruby module initialization (feature `ruby`)
//! - python.rs: Python module initialization (feature `python`)

pub mod args;
pub mod core;
mod error;
mod ffi;
pub mod registry;

#[cfg(feature = "python")]
mod python;
#[cfg(feature = "ruby")]
mod ruby;

pub use args::Value;
pub use self::core::{add_with, OverflowPolicy};
pub use error::{Error, Result};
pub use registry::{FunctionDef, ModuleDef, MODULE};

// Re-export FFI functions at crate root for easier linking
pub use ffi::*;
