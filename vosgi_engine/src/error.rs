//! Error types for the Vosgi engine
//!
//! The scene core works on already-validated in-memory data, so the taxonomy
//! is narrow: stale handles, hierarchy misuse, and everything else.
//! Lookups that can simply miss (a behaviour type never attached, an unknown
//! name) return `Option` instead.

use std::fmt;

/// Result type for Vosgi engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Vosgi engine errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The entity handle is stale (entity destroyed) or was never issued by this scene
    InvalidEntity(String),

    /// Parent/child relationship does not hold (wrong parent, index out of range)
    InvalidHierarchy(String),

    /// Any other rejected operation
    InvalidOperation(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidEntity(msg) => write!(f, "Invalid entity: {}", msg),
            Error::InvalidHierarchy(msg) => write!(f, "Invalid hierarchy: {}", msg),
            Error::InvalidOperation(msg) => write!(f, "Invalid operation: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Log an error through the engine logger and build an `Error::InvalidOperation`
///
/// # Example
///
/// ```ignore
/// return Err(engine_err!("vosgi::Scene", "Entity {} has no camera", name));
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::vosgi::Error::InvalidOperation(message)
    }};
}

/// Log and return an `Error::InvalidOperation` from the current function
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
