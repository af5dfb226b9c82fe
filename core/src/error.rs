#![deny(missing_docs)]

//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// Every classification or resolution failure aborts the whole document build,
/// so these variants travel unchanged up to the caller.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// More than one parameter of a single operation was bound to the request body.
    #[from(ignore)]
    #[display(
        "Ambiguous body binding in operation '{operation_id}': parameters [{}] are all bound to the body",
        parameters.join(", ")
    )]
    AmbiguousBodyBinding {
        /// Identifier of the offending operation.
        operation_id: String,
        /// Names of every parameter classified as body.
        parameters: Vec<String>,
    },

    /// A type descriptor could not be classified into a shape.
    #[from(ignore)]
    #[display("Unresolvable type shape for '{type_name}': {reason}")]
    UnresolvableTypeShape {
        /// Identity of the type, rendered as a type expression.
        type_name: String,
        /// Why classification failed.
        reason: String,
    },

    /// The descriptor input itself is malformed.
    #[from(ignore)]
    #[display("Invalid descriptor: {_0}")]
    InvalidDescriptor(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

impl AppError {
    /// Shorthand for an [`AppError::UnresolvableTypeShape`].
    pub fn unresolvable(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::UnresolvableTypeShape {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }
}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
