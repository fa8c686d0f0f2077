// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error type shared by publication, invocation and resolution.

use crate::type_uuid::Uuid;
use crate::value::SimpleTypeKind;

/// Errors returned by reflection operations.
///
/// Lookups that are expected to miss in normal operation (component
/// resolution, request creation) return `Option` instead of an error.
///
/// # Example
///
/// ```rust
/// use smp_reflect::{AnySimple, Error, HashMapTypeRegistry, Publication};
/// use std::cell::Cell;
/// use std::sync::Arc;
///
/// let counter = Cell::new(0i64);
/// let mut publication = Publication::new(Arc::new(HashMapTypeRegistry::new()));
/// publication.publish_field("counter", "Counter", &counter, Default::default()).unwrap();
///
/// match publication.set_field_value("counter", AnySimple::from(1i32)) {
///     Err(Error::TypeMismatch { path, .. }) => assert_eq!(path, "counter"),
///     other => panic!("unexpected: {:?}", other),
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    // ========================================================================
    // Publication Errors
    // ========================================================================
    /// A sibling with this name already exists in the scope.
    DuplicateName(String),
    /// Type identifier not known to the type registry.
    TypeNotRegistered(Uuid),
    /// Type is registered but cannot be used in this position.
    UnsupportedType(String),
    /// Published memory does not match the registered type layout.
    InvalidLayout(String),
    /// Type layout contains itself.
    RecursiveType(Uuid),

    // ========================================================================
    // Addressing Errors
    // ========================================================================
    /// Path does not resolve to an addressable field.
    InvalidFieldName(String),
    /// Value kind differs from the declared kind of the target.
    TypeMismatch {
        path: String,
        expected: SimpleTypeKind,
        actual: SimpleTypeKind,
    },
    /// Array transfer length differs from the published element count.
    LengthMismatch {
        path: String,
        expected: usize,
        actual: usize,
    },
    /// Property access kind forbids the requested direction.
    AccessDenied(String),
    /// Value rejected by the target (e.g. string longer than its buffer).
    InvalidValue(String),
    /// Typed extraction from an `AnySimple` of another kind.
    InvalidAnyType {
        expected: SimpleTypeKind,
        actual: SimpleTypeKind,
    },

    // ========================================================================
    // Invocation Errors
    // ========================================================================
    /// No operation with this name has been published.
    InvalidOperationName(String),
    /// Parameter index outside the operation signature.
    InvalidParameterIndex { operation: String, index: usize },
    /// Invocation attempted with an unbound parameter.
    MissingParameter { operation: String, parameter: String },
    /// Handler returned a value of the wrong kind.
    InvalidReturnValue {
        operation: String,
        expected: SimpleTypeKind,
        actual: SimpleTypeKind,
    },
    /// Return value requested from a void operation.
    VoidOperation(String),
    /// Request already invoked and not reset.
    AlreadyInvoked(String),
    /// Request is not in a state that permits the operation.
    InvalidState(String),
    /// Request handle was released (or never issued by this registry).
    UseAfterRelease,

    // ========================================================================
    // Other Errors
    // ========================================================================
    /// Text is not a canonical 8-4-4-4-12 identifier.
    InvalidUuid(String),
    /// Configuration rejected.
    Config(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // Publication
            Error::DuplicateName(name) => write!(f, "Duplicate name: '{}'", name),
            Error::TypeNotRegistered(uuid) => write!(f, "Type not registered: {}", uuid),
            Error::UnsupportedType(msg) => write!(f, "Unsupported type: {}", msg),
            Error::InvalidLayout(msg) => write!(f, "Invalid layout: {}", msg),
            Error::RecursiveType(uuid) => write!(f, "Recursive type layout: {}", uuid),
            // Addressing
            Error::InvalidFieldName(path) => write!(f, "Invalid field name: '{}'", path),
            Error::TypeMismatch {
                path,
                expected,
                actual,
            } => write!(
                f,
                "Type mismatch on '{}': expected {}, got {}",
                path, expected, actual
            ),
            Error::LengthMismatch {
                path,
                expected,
                actual,
            } => write!(
                f,
                "Length mismatch on '{}': published {}, requested {}",
                path, expected, actual
            ),
            Error::AccessDenied(msg) => write!(f, "Access denied: {}", msg),
            Error::InvalidValue(msg) => write!(f, "Invalid value: {}", msg),
            Error::InvalidAnyType { expected, actual } => {
                write!(f, "Invalid any type: expected {}, got {}", expected, actual)
            }
            // Invocation
            Error::InvalidOperationName(name) => write!(f, "Invalid operation name: '{}'", name),
            Error::InvalidParameterIndex { operation, index } => write!(
                f,
                "Invalid parameter index {} for operation '{}'",
                index, operation
            ),
            Error::MissingParameter {
                operation,
                parameter,
            } => write!(
                f,
                "Missing parameter '{}' for operation '{}'",
                parameter, operation
            ),
            Error::InvalidReturnValue {
                operation,
                expected,
                actual,
            } => write!(
                f,
                "Invalid return value for operation '{}': expected {}, got {}",
                operation, expected, actual
            ),
            Error::VoidOperation(name) => write!(f, "Operation '{}' is a void operation", name),
            Error::AlreadyInvoked(name) => {
                write!(f, "Request for '{}' already invoked (reset first)", name)
            }
            Error::InvalidState(msg) => write!(f, "Invalid request state: {}", msg),
            Error::UseAfterRelease => write!(f, "Request used after release"),
            // Other
            Error::InvalidUuid(text) => write!(f, "Invalid uuid: '{}'", text),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Result alias for reflection operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_offender() {
        let err = Error::MissingParameter {
            operation: "Compute".into(),
            parameter: "gain".into(),
        };
        let text = err.to_string();
        assert!(text.contains("gain"));
        assert!(text.contains("Compute"));

        let err = Error::LengthMismatch {
            path: "Samples".into(),
            expected: 4,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "Length mismatch on 'Samples': published 4, requested 3"
        );
    }
}
