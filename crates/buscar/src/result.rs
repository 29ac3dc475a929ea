//! Result and error types for Buscar.

use thiserror::Error;

/// Result type for Buscar operations
pub type BuscarResult<T> = Result<T, BuscarError>;

/// Errors that can occur while building a predicate.
///
/// Construction is all-or-nothing: any of these aborts the whole recursive
/// build, so a partially valid predicate tree is never returned.
#[derive(Debug, Error)]
pub enum BuscarError {
    /// A class name did not resolve against the type registry
    #[error("Unknown class \"{class_name}\"")]
    UnknownClass {
        /// The class name that failed to resolve
        class_name: String,
    },

    /// A React Native app exposes none of the known text component classes
    #[error("No React Native text class is registered (tried {tried})")]
    MissingTextClass {
        /// The candidate class names that were tried, in order
        tried: String,
    },

    /// An accessibility trait token is not part of the vocabulary
    #[error("Unknown or unsupported accessibility trait \"{token}\"")]
    UnknownTrait {
        /// The offending token
        token: String,
    },

    /// The description's `type` field names no known predicate kind
    #[error("Unknown predicate kind \"{kind}\"")]
    UnknownPredicateKind {
        /// The offending kind string
        kind: String,
    },

    /// A required field is absent from the structural description
    #[error("Predicate description is missing required field \"{field}\"")]
    MissingField {
        /// The missing field name
        field: &'static str,
    },

    /// A field is present but carries the wrong type of value
    #[error("Predicate description field \"{field}\" must be {expected}")]
    InvalidField {
        /// The offending field name
        field: &'static str,
        /// What the field was expected to hold
        expected: &'static str,
    },

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
