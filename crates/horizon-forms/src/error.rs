//! Error types for form binding.

use horizon_forms_core::ControlError;

/// Result type alias for form binding operations.
pub type FormResult<T> = std::result::Result<T, FormError>;

/// Errors that can occur while binding, reading or writing a form.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// The binding root is not a form container.
    #[error("Element must be a valid form, found <{found}>")]
    NotAForm { found: &'static str },

    /// No control is indexed under the requested name.
    #[error("No form field named '{key}'")]
    UnknownField { key: String },

    /// The underlying control tree rejected an operation.
    #[error("Control error: {0}")]
    Control(#[from] ControlError),

    /// Model data could not be converted to or from JSON.
    #[error("Model data conversion failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FormError {
    /// Create an unknown-field error.
    pub fn unknown_field(key: impl Into<String>) -> Self {
        Self::UnknownField { key: key.into() }
    }
}
