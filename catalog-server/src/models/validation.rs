//! Validation error types

use std::fmt;

use super::Id;

/// Validation error for request input and catalog references
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field was not supplied
    Missing { field: &'static str },

    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// Numeric field outside its allowed range
    OutOfRange { field: &'static str, reason: &'static str },

    /// Value doesn't match required format
    InvalidFormat { field: &'static str, reason: &'static str },

    /// One or more referenced identifiers do not exist
    UnknownReference { resource: &'static str, ids: Vec<Id> },

    /// At least one of the listed identifiers does not exist
    SomeReferenceMissing { resource: &'static str, ids: Vec<Id> },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { field } => write!(f, "{} is required", field),
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::OutOfRange { field, reason } => write!(f, "{} {}", field, reason),
            Self::InvalidFormat { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
            Self::UnknownReference { resource, ids } => {
                let ids: Vec<String> = ids.iter().map(Id::to_string).collect();
                write!(f, "invalid {} id(s): {}", resource, ids.join(", "))
            }
            Self::SomeReferenceMissing { resource, ids } => {
                let ids: Vec<String> = ids.iter().map(Id::to_string).collect();
                write!(f, "one of {} id(s) {} does not exist", resource, ids.join(", "))
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::TooLong {
            field: "tag_name",
            max: 255,
        };
        assert_eq!(
            err.to_string(),
            "tag_name exceeds maximum length of 255 characters"
        );
    }

    #[test]
    fn unknown_reference_lists_ids() {
        let err = ValidationError::UnknownReference {
            resource: "tag",
            ids: vec![4, 9],
        };
        assert_eq!(err.to_string(), "invalid tag id(s): 4, 9");
    }

    #[test]
    fn partial_reference_failure_does_not_blame_every_id() {
        let err = ValidationError::SomeReferenceMissing {
            resource: "product",
            ids: vec![3, 5],
        };
        assert_eq!(err.to_string(), "one of product id(s) 3, 5 does not exist");
    }
}
