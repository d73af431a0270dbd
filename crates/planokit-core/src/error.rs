//! Error handling for PlanoKit
//!
//! Provides error types for every layer of the layout engine:
//! - Geometry errors (element dimensions, placement input)
//! - Import errors (floor-plan and planogram documents)
//! - Matching errors (furniture to floor-plan pairing)
//! - Storage errors (key-value persistence)
//!
//! All error types use `thiserror` for ergonomic error handling.
//! Conditions the editor treats as recoverable (an invalid ghost, a
//! furniture with no compatible element) are modelled as values, not errors.

use thiserror::Error;

/// Geometry error type
///
/// Raised when an element or a geometric input breaks the model invariants.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A dimension is zero or negative
    #[error("Invalid {dimension} for element {element_id}: {value} (must be > 0)")]
    NonPositiveDimension {
        /// The offending element.
        element_id: String,
        /// Which dimension (width, height, depth).
        dimension: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A coordinate or angle is NaN or infinite
    #[error("Non-finite {field} for element {element_id}")]
    NonFinite {
        /// The offending element.
        element_id: String,
        /// The field holding the non-finite value.
        field: &'static str,
    },

    /// Rotation outside `[0, 360)`
    #[error("Rotation {rotation} of element {element_id} is outside [0, 360)")]
    RotationOutOfRange {
        /// The offending element.
        element_id: String,
        /// The stored rotation in degrees.
        rotation: f64,
    },

    /// Grid size must be positive
    #[error("Invalid grid size: {size}")]
    InvalidGridSize {
        /// The rejected grid size.
        size: f64,
    },

    /// Element type name is not recognised
    #[error("Unknown element type: {name}")]
    UnknownElementType {
        /// The unrecognised type name.
        name: String,
    },

    /// No element with this id exists
    #[error("Element not found: {element_id}")]
    ElementNotFound {
        /// The missing element id.
        element_id: String,
    },
}

/// Import error type
///
/// A structurally invalid document is rejected as a whole; nothing is applied.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImportError {
    /// The document is not valid JSON
    #[error("Malformed JSON: {reason}")]
    InvalidJson {
        /// Parser message.
        reason: String,
    },

    /// The floor plan has no `elements` array
    #[error("Floor plan document has no 'elements' array")]
    MissingElements,

    /// A required envelope section is absent or has the wrong shape
    #[error("Planogram document is missing section '{section}'")]
    MissingSection {
        /// The missing section name.
        section: &'static str,
    },

    /// An element inside the document breaks the model invariants
    #[error("Invalid element at index {index}: {reason}")]
    InvalidElement {
        /// Position in the `elements` array.
        index: usize,
        /// Why it was rejected.
        reason: String,
    },

    /// Nothing in the document can be applied
    #[error("Nothing to import: {reason}")]
    NothingToImport {
        /// Why the import is empty.
        reason: String,
    },
}

/// Matching error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchError {
    /// The furniture template is unknown
    #[error("Furniture not found: {furniture_id}")]
    FurnitureNotFound {
        /// The missing furniture id.
        furniture_id: String,
    },

    /// The element is not in the active plan
    #[error("Element not found in active plan: {element_id}")]
    ElementNotFound {
        /// The missing element id.
        element_id: String,
    },

    /// The element type cannot host furniture
    #[error("Element {element_id} of type {element_type} cannot host furniture")]
    NotFurnitureCapable {
        /// The rejected element.
        element_id: String,
        /// Its type name.
        element_type: String,
    },

    /// The furniture has no match and cannot be placed
    #[error("Furniture {furniture_id} is not matched to a floor-plan element")]
    NotMatched {
        /// The unmatched furniture id.
        furniture_id: String,
    },

    /// No floor plan is active
    #[error("No active floor plan")]
    NoActivePlan,
}

/// Storage error type
#[derive(Error, Debug)]
pub enum StorageError {
    /// The stored value could not be decoded
    #[error("Corrupted value under key '{key}': {reason}")]
    Corrupted {
        /// The storage key.
        key: String,
        /// Decoder message.
        reason: String,
    },

    /// The record does not exist
    #[error("No record '{id}' in '{collection}'")]
    NotFound {
        /// The collection key.
        collection: String,
        /// The missing record id.
        id: String,
    },

    /// Serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Main error type for PlanoKit
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Import error
    #[error(transparent)]
    Import(#[from] ImportError),

    /// Matching error
    #[error(transparent)]
    Match(#[from] MatchError),

    /// Storage error
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is an import error
    pub fn is_import_error(&self) -> bool {
        matches!(self, Error::Import(_))
    }

    /// Check if this is a storage error
    pub fn is_storage_error(&self) -> bool {
        matches!(self, Error::Storage(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_error_display() {
        let err = GeometryError::NonPositiveDimension {
            element_id: "element-1".to_string(),
            dimension: "width",
            value: 0.0,
        };
        assert_eq!(
            err.to_string(),
            "Invalid width for element element-1: 0 (must be > 0)"
        );
    }

    #[test]
    fn test_import_error_is_transparent() {
        let err: Error = ImportError::MissingElements.into();
        assert!(err.is_import_error());
        assert_eq!(
            err.to_string(),
            "Floor plan document has no 'elements' array"
        );
    }

    #[test]
    fn test_storage_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = StorageError::from(json_err).into();
        assert!(err.is_storage_error());
    }

    #[test]
    fn test_other() {
        let err = Error::other("boom");
        assert_eq!(err.to_string(), "boom");
    }
}
