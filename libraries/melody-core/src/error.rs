/// Core error types for Melody
use thiserror::Error;

/// Result type alias using `MelodyError`
pub type Result<T> = std::result::Result<T, MelodyError>;

/// Domain data errors
///
/// Construction and setter violations (`EmptyValue`, `InvalidType`,
/// `InvalidElementType`, `InvalidEmail`, `InvalidValue`, `MissingField`) are
/// returned to the caller immediately. `InvalidIndex`, `UnknownTag` and
/// `MalformedReference` are also raised by batch operations, which log them
/// and keep going instead of aborting.
#[derive(Error, Debug)]
pub enum MelodyError {
    /// A required string field is blank
    #[error("Field \"{field}\" must not be empty")]
    EmptyValue { field: String },

    /// A value has the wrong runtime type for its field
    #[error("Invalid type for field \"{field}\": expected {expected}, got {actual}")]
    InvalidType {
        field: String,
        expected: String,
        actual: String,
    },

    /// An element of a homogeneous sequence has the wrong type
    #[error("Sequence \"{field}\" must only contain values of type {expected}")]
    InvalidElementType { field: String, expected: String },

    /// Out-of-range positional access
    #[error("Index {index} is out of range (length {len})")]
    InvalidIndex { index: usize, len: usize },

    /// A reference could not be resolved to an entity
    #[error("Malformed reference: {0}")]
    MalformedReference(String),

    /// A polymorphic record carries a tag no candidate is registered for
    #[error("Unknown type tag: {0}")]
    UnknownTag(String),

    /// A required field is absent from a serialized tree
    #[error("Missing required field \"{field}\" in {entity}")]
    MissingField { entity: String, field: String },

    /// An e-mail address without `@` or without a dot in its domain
    #[error("Invalid e-mail address: \"{0}\"")]
    InvalidEmail(String),

    /// A value of the right type but outside its allowed domain
    #[error("Invalid value for field \"{field}\": {reason}")]
    InvalidValue { field: String, reason: String },

    /// Tree (de)serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl MelodyError {
    /// Create an empty value error
    pub fn empty_value(field: impl Into<String>) -> Self {
        Self::EmptyValue {
            field: field.into(),
        }
    }

    /// Create an invalid type error
    pub fn invalid_type(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::InvalidType {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create an invalid element type error
    pub fn invalid_element_type(field: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::InvalidElementType {
            field: field.into(),
            expected: expected.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(entity: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            entity: entity.into(),
            field: field.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a malformed reference error
    pub fn malformed_reference(msg: impl Into<String>) -> Self {
        Self::MalformedReference(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_field() {
        let err = MelodyError::empty_value("title");
        assert_eq!(err.to_string(), "Field \"title\" must not be empty");

        let err = MelodyError::invalid_type("subscribed", "bool", "string");
        assert_eq!(
            err.to_string(),
            "Invalid type for field \"subscribed\": expected bool, got string"
        );
    }

    #[test]
    fn index_error_reports_length() {
        let err = MelodyError::InvalidIndex { index: 3, len: 0 };
        assert_eq!(err.to_string(), "Index 3 is out of range (length 0)");
    }
}
