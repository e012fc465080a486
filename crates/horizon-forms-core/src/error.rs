//! Error types for the control tree.

use std::fmt;

/// Errors that can occur during control tree operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlError {
    /// The control ID is invalid or was never part of this tree.
    InvalidControlId,
    /// The element does not accept the requested user interaction.
    NotInteractive {
        /// The tag name of the element that rejected the interaction.
        kind: &'static str,
    },
    /// The element's value cannot be assigned programmatically.
    ValueNotWritable {
        /// The tag name of the element that rejected the write.
        kind: &'static str,
    },
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidControlId => write!(f, "Invalid or unknown control ID"),
            Self::NotInteractive { kind } => {
                write!(f, "Element <{kind}> does not accept this user interaction")
            }
            Self::ValueNotWritable { kind } => {
                write!(f, "The value of <{kind}> cannot be assigned programmatically")
            }
        }
    }
}

impl std::error::Error for ControlError {}

/// Result type for control tree operations.
pub type ControlResult<T> = std::result::Result<T, ControlError>;
