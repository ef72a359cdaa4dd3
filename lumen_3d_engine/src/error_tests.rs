//! Unit tests for error.rs
//!
//! Tests the Error variants, their Display output and the error macros.

use crate::error::{Error, Result};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_backend_error_display() {
    let err = Error::BackendError("program link failed".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Backend error"));
    assert!(display.contains("program link failed"));
}

#[test]
fn test_out_of_memory_display() {
    let err = Error::OutOfMemory;
    assert_eq!(format!("{}", err), "Out of GPU memory");
}

#[test]
fn test_resource_not_found_display() {
    let err = Error::ResourceNotFound("shaders/common.nsh".to_string());
    assert_eq!(format!("{}", err), "Resource not found: shaders/common.nsh");
}

#[test]
fn test_invalid_format_display() {
    let err = Error::InvalidFormat("empty vertex shader in water.nsh".to_string());
    let display = format!("{}", err);
    assert!(display.starts_with("Invalid format"));
    assert!(display.contains("water.nsh"));
}

#[test]
fn test_error_is_std_error() {
    let err = Error::InvalidResource("texture".to_string());
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_clone_keeps_message() {
    let err = Error::InitializationFailed("engine".to_string());
    let copy = err.clone();
    assert_eq!(format!("{}", err), format!("{}", copy));
}

// ============================================================================
// ERROR MACROS
// ============================================================================

#[test]
fn test_engine_err_builds_backend_error() {
    let err = crate::engine_err!("lumen3d::test", "slot {} is busy", 3);
    match err {
        Error::BackendError(msg) => assert_eq!(msg, "slot 3 is busy"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_engine_bail_returns_early() {
    fn check(value: u32) -> Result<u32> {
        if value == 0 {
            crate::engine_bail!("lumen3d::test", "value must not be zero");
        }
        Ok(value * 2)
    }

    assert_eq!(check(4).unwrap(), 8);
    assert!(matches!(check(0), Err(Error::BackendError(_))));
}

#[test]
fn test_error_propagation_with_question_mark() {
    fn inner() -> Result<i32> {
        Err(Error::ResourceNotFound("a.nsh".to_string()))
    }

    fn outer() -> Result<i32> {
        inner()?;
        Ok(42)
    }

    assert!(matches!(outer(), Err(Error::ResourceNotFound(_))));
}
