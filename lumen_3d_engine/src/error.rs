//! Error types for the Lumen3D engine
//!
//! This module defines the error types used throughout the engine,
//! including device calls, asset loading, and resource management.

use std::fmt;

/// Result type for Lumen3D engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Lumen3D engine errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (graphics device, driver)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (texture, buffer, shader, etc.)
    InvalidResource(String),

    /// Initialization failed (engine, subsystems)
    InitializationFailed(String),

    /// A resource could not be accessed through the resource provider
    ResourceNotFound(String),

    /// Asset data is malformed (bad magic, truncated file, empty shader stage)
    InvalidFormat(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::ResourceNotFound(path) => write!(f, "Resource not found: {}", path),
            Error::InvalidFormat(msg) => write!(f, "Invalid format: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Log an ERROR message and build an `Error::BackendError` from it
///
/// # Example
///
/// ```no_run
/// # use lumen_3d_engine::engine_err;
/// let err = engine_err!("lumen3d::Device", "Failed to create program: {}", "link error");
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::lumen3d::Error::BackendError(message)
    }};
}

/// Log an ERROR message and return early with an `Error::BackendError`
///
/// # Example
///
/// ```no_run
/// # use lumen_3d_engine::engine_bail;
/// fn check(count: u32) -> lumen_3d_engine::lumen3d::Result<()> {
///     if count == 0 {
///         engine_bail!("lumen3d::VertexBuffer", "Invalid vertex count {}", count);
///     }
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
