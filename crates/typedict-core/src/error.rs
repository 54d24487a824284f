//! # Error Types
//!
//! Every fallible operation in the workspace returns [`DictError`]. Errors
//! are raised synchronously to the immediate caller; nothing is logged and
//! swallowed.
//!
//! Messages carry the offending key path so that a failure deep inside a
//! recursive write can be traced back to the leaf that rejected it.

use thiserror::Error;

use crate::path::KeyPath;

/// Top-level error type for typed dictionaries and their type registries.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DictError {
    /// A type spec referenced a kind no validator is registered for.
    #[error("Unknown type: {0}")]
    UnknownType(String),

    /// A built-in kind was given a configuration it cannot work with, or a
    /// custom kind or filter tried to take a built-in name.
    #[error("invalid type spec for {kind}: {reason}")]
    InvalidSpec {
        /// Kind name of the rejected spec.
        kind: String,
        /// Why the configuration was rejected.
        reason: String,
    },

    /// A path addresses a registry position that was never declared.
    #[error("Undefined key: {0}")]
    UndefinedKey(KeyPath),

    /// A key was re-declared with a conflicting type spec.
    #[error("Duplicate key: [{0}]")]
    DuplicateKey(KeyPath),

    /// A value failed the validator of its leaf.
    #[error("Field required: {path} must be {expected}, got {actual}")]
    TypeMismatch {
        /// Path of the rejecting leaf.
        path: KeyPath,
        /// Rendered type spec of the leaf.
        expected: String,
        /// Category of the rejected value.
        actual: &'static str,
    },

    /// A scalar was written where the registry expects a nested structure,
    /// or a write path runs through a stored scalar.
    #[error("Value must be a nested structure at: {0}")]
    ValueMustBeArray(KeyPath),

    /// A position-based stack mutation was attempted.
    #[error("TypedDictionary cannot be used as a stack: {op} is not supported")]
    UnsupportedOperation {
        /// Name of the rejected operation.
        op: &'static str,
    },

    /// A type descriptor document could not be turned into a registry.
    #[error("invalid type descriptor at {path}: {reason}")]
    InvalidDescriptor {
        /// Position inside the descriptor.
        path: KeyPath,
        /// Reason the descriptor was rejected.
        reason: String,
    },
}

impl DictError {
    /// Whether the error reports a value rejected by a validator.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undefined_key_uses_dotted_path() {
        let err = DictError::UndefinedKey(KeyPath::from(["foo", "bar"]));
        assert_eq!(err.to_string(), "Undefined key: foo.bar");
    }

    #[test]
    fn test_duplicate_key_is_bracketed() {
        let err = DictError::DuplicateKey(KeyPath::from("bar"));
        assert_eq!(err.to_string(), "Duplicate key: [bar]");
    }

    #[test]
    fn test_type_mismatch_mentions_required() {
        let err = DictError::TypeMismatch {
            path: KeyPath::from(["l1", "float"]),
            expected: "float".to_string(),
            actual: "string",
        };
        let msg = err.to_string();
        assert!(msg.contains("required"));
        assert!(msg.contains("l1.float"));
        assert!(err.is_type_mismatch());
    }

    #[test]
    fn test_stack_message() {
        let err = DictError::UnsupportedOperation { op: "push" };
        assert!(err
            .to_string()
            .contains("TypedDictionary cannot be used as a stack"));
    }
}
