//! Python bindings
//!
//! `import integration` exposes `add_numbers(a, b)`, `invoke(name, *args)`
//! for dynamic dispatch through the registry, and `FUNCTIONS` (name -> doc).

use pyo3::exceptions::{PyAttributeError, PyOverflowError, PyTypeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyDict, PyFloat, PyLong, PyString, PyTuple};
use tracing::debug;

use crate::args::{decode_host_arg, HostArg, HostInteger, Value};
use crate::error::Error;
use crate::registry::{ADD_NUMBERS, MODULE};

impl From<Error> for PyErr {
    fn from(err: Error) -> PyErr {
        match err {
            Error::InvalidArgument { .. } => PyTypeError::new_err(err.to_string()),
            Error::UnknownFunction(_) => PyAttributeError::new_err(err.to_string()),
            Error::Overflow { .. } => PyOverflowError::new_err(err.to_string()),
            Error::Json(_) => PyValueError::new_err(err.to_string()),
        }
    }
}

impl HostArg for Bound<'_, PyAny> {
    type Error = PyErr;

    fn is_nil(&self) -> bool {
        self.is_none()
    }

    // bool is a subclass of int, decode_host_arg asks for it first
    fn as_bool(&self) -> Option<bool> {
        self.downcast::<PyBool>().ok().map(|b| b.is_true())
    }

    fn as_integer(&self) -> PyResult<Option<HostInteger>> {
        if self.downcast::<PyLong>().is_err() {
            return Ok(None);
        }
        match self.extract::<i64>() {
            Ok(n) => Ok(Some(HostInteger::Small(n))),
            Err(_) => Ok(Some(HostInteger::Digits(self.str()?.to_str()?.to_owned()))),
        }
    }

    fn as_float(&self) -> Option<f64> {
        self.downcast::<PyFloat>().ok().map(|f| f.value())
    }

    fn as_text(&self) -> PyResult<Option<String>> {
        match self.downcast::<PyString>() {
            Ok(s) => Ok(Some(s.to_str()?.to_owned())),
            Err(_) => Ok(None),
        }
    }

    fn unsupported(&self) -> PyErr {
        let type_name = self
            .get_type()
            .name()
            .map(|n| n.to_string())
            .unwrap_or_else(|_| "object".to_string());
        PyTypeError::new_err(format!("unsupported argument type: {}", type_name))
    }
}

fn to_py(py: Python<'_>, value: Value) -> PyObject {
    match value {
        Value::Nil => py.None(),
        Value::Bool(b) => b.into_py(py),
        Value::Int(n) => n.into_py(py),
        Value::Float(f) => f.into_py(py),
        Value::BigInt(s) | Value::Str(s) => s.into_py(py),
    }
}

fn call<'py>(
    py: Python<'py>,
    name: &str,
    args: impl IntoIterator<Item = Bound<'py, PyAny>>,
) -> PyResult<PyObject> {
    let decoded = args
        .into_iter()
        .map(|arg| decode_host_arg(&arg))
        .collect::<PyResult<Vec<_>>>()?;
    let result = MODULE.invoke(name, &decoded)?;
    Ok(to_py(py, result))
}

#[pyfunction]
#[pyo3(name = "add_numbers")]
fn py_add_numbers<'py>(
    py: Python<'py>,
    a: Bound<'py, PyAny>,
    b: Bound<'py, PyAny>,
) -> PyResult<PyObject> {
    call(py, ADD_NUMBERS, [a, b])
}

/// Call a registered function by name.
#[pyfunction]
#[pyo3(signature = (name, *args))]
fn invoke<'py>(py: Python<'py>, name: &str, args: &Bound<'py, PyTuple>) -> PyResult<PyObject> {
    call(py, name, args.iter())
}

#[pymodule]
fn integration(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(py_add_numbers, m)?)?;
    m.add_function(wrap_pyfunction!(invoke, m)?)?;

    let functions = PyDict::new_bound(m.py());
    for def in MODULE.functions {
        functions.set_item(def.name, def.doc)?;
    }
    m.add("FUNCTIONS", functions)?;
    m.setattr("__doc__", MODULE.doc)?;

    debug!(module = MODULE.name, functions = MODULE.functions.len(), "python module initialized");
    Ok(())
}
