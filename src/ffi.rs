//! C ABI exports
//!
//! For hosts that load the shared library directly (ctypes, cffi, Fiddle).
//! Plain integer functions take and return C `int`; the dynamic entry point
//! exchanges JSON so any host with a JSON encoder can drive the registry.

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::slice;

use crate::args::Value;
use crate::core;
use crate::error::Result;
use crate::registry::MODULE;

fn into_c_string(s: String) -> *mut c_char {
    CString::new(s.replace('\0', ""))
        .unwrap_or_default()
        .into_raw()
}

unsafe fn write_out(out: *mut *mut c_char, s: String) {
    if !out.is_null() {
        *out = into_c_string(s);
    }
}

/// Add two ints, wrapping on overflow
#[no_mangle]
pub extern "C" fn add(a: c_int, b: c_int) -> c_int {
    core::add(a, b)
}

/// Multiply two ints, wrapping on overflow
#[no_mangle]
pub extern "C" fn multiply(a: c_int, b: c_int) -> c_int {
    core::multiply(a, b)
}

#[no_mangle]
pub extern "C" fn integration_add_numbers(a: c_int, b: c_int) -> c_int {
    core::add(a, b)
}

fn invoke_json(name: &str, args_json: &[u8]) -> Result<String> {
    let args: Vec<Value> = serde_json::from_slice(args_json)?;
    let result = MODULE.invoke(name, &args)?;
    Ok(serde_json::to_string(&result)?)
}

/// Call a registered function with a JSON array of arguments.
/// Returns 0 and writes the JSON result to result_out on success.
/// Returns -1 on error, error message written to error_out if provided.
/// Strings written to either out pointer must be released with
/// integration_free_string.
#[no_mangle]
pub unsafe extern "C" fn integration_invoke(
    name: *const c_char,
    args_json: *const c_char,
    args_len: usize,
    result_out: *mut *mut c_char,
    error_out: *mut *mut c_char,
) -> c_int {
    if name.is_null() || args_json.is_null() {
        write_out(error_out, "null pointer argument".to_string());
        return -1;
    }
    let name = match CStr::from_ptr(name).to_str() {
        Ok(s) => s,
        Err(e) => {
            write_out(error_out, format!("Invalid UTF-8 in function name: {}", e));
            return -1;
        }
    };
    let json = slice::from_raw_parts(args_json as *const u8, args_len);

    match invoke_json(name, json) {
        Ok(result) => {
            write_out(result_out, result);
            0
        }
        Err(e) => {
            write_out(error_out, e.to_string());
            -1
        }
    }
}

/// Free a string returned by integration_invoke
#[no_mangle]
pub unsafe extern "C" fn integration_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;

    fn invoke(name: &str, json: &str) -> (c_int, Option<String>, Option<String>) {
        let name = CString::new(name).unwrap();
        let mut result: *mut c_char = ptr::null_mut();
        let mut error: *mut c_char = ptr::null_mut();
        unsafe {
            let rc = integration_invoke(
                name.as_ptr(),
                json.as_ptr() as *const c_char,
                json.len(),
                &mut result,
                &mut error,
            );
            let take = |p: *mut c_char| {
                if p.is_null() {
                    None
                } else {
                    let s = CStr::from_ptr(p).to_string_lossy().into_owned();
                    integration_free_string(p);
                    Some(s)
                }
            };
            (rc, take(result), take(error))
        }
    }

    #[test]
    fn test_plain_exports() {
        assert_eq!(add(5, 3), 8);
        assert_eq!(multiply(4, 5), 20);
        assert_eq!(integration_add_numbers(2, 3), 5);
        assert_eq!(integration_add_numbers(c_int::MAX, 1), c_int::MIN);
    }

    #[test]
    fn test_invoke_success() {
        let (rc, result, error) = invoke("add_numbers", "[2, 3]");
        assert_eq!(rc, 0);
        assert_eq!(result.as_deref(), Some("5"));
        assert!(error.is_none());
    }

    #[test]
    fn test_invoke_invalid_argument() {
        let (rc, result, error) = invoke("add_numbers", r#"[1, "a"]"#);
        assert_eq!(rc, -1);
        assert!(result.is_none());
        assert!(error.unwrap().starts_with("add_numbers(): argument 2"));

        let (rc, _, error) = invoke("add_numbers", "[1]");
        assert_eq!(rc, -1);
        assert_eq!(error.as_deref(), Some("add_numbers(): takes exactly 2 arguments (1 given)"));
    }

    #[test]
    fn test_invoke_bad_json_and_unknown_name() {
        let (rc, _, error) = invoke("add_numbers", "[1, 2");
        assert_eq!(rc, -1);
        assert!(error.unwrap().starts_with("invalid JSON"));

        let (rc, _, error) = invoke("sub_numbers", "[1, 2]");
        assert_eq!(rc, -1);
        assert_eq!(error.as_deref(), Some("unknown function: sub_numbers"));
    }

    #[test]
    fn test_invoke_integer_beyond_i64() {
        let (rc, _, error) = invoke("add_numbers", "[18446744073709551615, 1]");
        assert_eq!(rc, -1);
        assert_eq!(
            error.as_deref(),
            Some("add_numbers(): argument 1: signed integer is greater than maximum")
        );
    }

    #[test]
    fn test_invoke_null_pointers() {
        let mut error: *mut c_char = ptr::null_mut();
        unsafe {
            let rc = integration_invoke(ptr::null(), ptr::null(), 0, ptr::null_mut(), &mut error);
            assert_eq!(rc, -1);
            assert!(!error.is_null());
            integration_free_string(error);
            // Out pointers are optional
            assert_eq!(integration_invoke(ptr::null(), ptr::null(), 0, ptr::null_mut(), ptr::null_mut()), -1);
            integration_free_string(ptr::null_mut());
        }
    }
}
