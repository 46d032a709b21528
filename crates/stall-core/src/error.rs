//! Error types for the stall ordering system.

use thiserror::Error;

/// A shared error type for every stall crate.
///
/// User-facing replies never render these directly; the dialogue layer maps
/// them to fixed apology texts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StallError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Data access error (repository/storage layer)
    #[error("Data access error: {0}")]
    DataAccess(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The menu dataset could not be loaded or is corrupt
    #[error("Menu unavailable: {0}")]
    MenuUnavailable(String),

    /// A cart item has no canonical price
    #[error("Cannot price '{item}': {reason}")]
    Pricing { item: String, reason: String },

    /// LLM collaborator failure (timeout, HTTP, malformed reply)
    #[error("LLM error: {0}")]
    Llm(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StallError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a DataAccess error
    pub fn data_access(message: impl Into<String>) -> Self {
        Self::DataAccess(message.into())
    }

    /// Creates a MenuUnavailable error
    pub fn menu_unavailable(message: impl Into<String>) -> Self {
        Self::MenuUnavailable(message.into())
    }

    /// Creates a Pricing error for the given item label
    pub fn pricing(item: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Pricing {
            item: item.into(),
            reason: reason.into(),
        }
    }

    /// Creates an Llm error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a menu failure
    pub fn is_menu_unavailable(&self) -> bool {
        matches!(self, Self::MenuUnavailable(_))
    }

    /// Check if this is a pricing failure
    pub fn is_pricing(&self) -> bool {
        matches!(self, Self::Pricing { .. })
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for StallError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for StallError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for StallError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for StallError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from String (for error messages)
impl From<String> for StallError {
    fn from(err: String) -> Self {
        Self::Internal(err)
    }
}

/// Result type alias using StallError
pub type Result<T> = std::result::Result<T, StallError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "menu.json");
        let err: StallError = io_err.into();
        match err {
            StallError::Io { message } => {
                assert!(message.contains("menu.json"));
                assert!(message.contains("NotFound"));
            }
            other => panic!("expected Io, got {:?}", other),
        }
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: StallError = json_err.into();
        assert!(err.is_serialization());
        assert!(err.to_string().contains("JSON"));
    }

    #[test]
    fn test_pricing_display() {
        let err = StallError::pricing("醬燒肉片蛋吐司", "not on the menu");
        assert!(err.is_pricing());
        assert_eq!(
            err.to_string(),
            "Cannot price '醬燒肉片蛋吐司': not on the menu"
        );
    }
}
