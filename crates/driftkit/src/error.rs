//! Error types for document parsing.
//!
//! Only the parser can fail. Reconciliation, diffing and scoring are total
//! over their input, so there is one variant per input document.

use thiserror::Error;

/// Which input document an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// The declared (Terraform) state document
    Declared,
    /// The observed actual state document
    Actual,
}

impl DocumentKind {
    /// Get a user-friendly label for this document.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Declared => "Terraform state",
            Self::Actual => "actual state",
        }
    }

    /// Get actionable advice for resolving a malformed document.
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Declared => "Export the state with `terraform show -json` or use the raw .tfstate file",
            Self::Actual => "Provide a JSON array of resources or an object with a `resources` array",
        }
    }
}

/// Errors that can occur while parsing input documents.
///
/// The underlying JSON error is never carried across this boundary; the
/// messages are stable and meant to be shown to users as-is.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The declared state text is not a valid JSON document
    #[error("Invalid Terraform state file format. Please upload a valid JSON state file.")]
    InvalidDeclaredState,

    /// The actual state text is not a valid JSON document
    #[error("Invalid actual state file format. Please upload a valid JSON file.")]
    InvalidActualState,
}

impl Error {
    /// Get the document this error refers to.
    pub fn kind(&self) -> DocumentKind {
        match self {
            Error::InvalidDeclaredState => DocumentKind::Declared,
            Error::InvalidActualState => DocumentKind::Actual,
        }
    }

    /// Build the error for a given document kind.
    pub fn invalid(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::Declared => Error::InvalidDeclaredState,
            DocumentKind::Actual => Error::InvalidActualState,
        }
    }
}

/// Result type for drift detection operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_roundtrip() {
        assert_eq!(Error::invalid(DocumentKind::Declared).kind(), DocumentKind::Declared);
        assert_eq!(Error::invalid(DocumentKind::Actual).kind(), DocumentKind::Actual);
    }

    #[test]
    fn test_messages_are_distinct() {
        let declared = Error::InvalidDeclaredState.to_string();
        let actual = Error::InvalidActualState.to_string();
        assert!(declared.contains("Invalid Terraform state file format"));
        assert!(actual.contains("Invalid actual state file format"));
        assert_ne!(declared, actual);
    }
}
