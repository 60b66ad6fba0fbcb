//! Error types for namespace construction and identifier decoding.

use thiserror::Error;

use crate::ksuid::ParseError;

/// Errors that can occur when building a [`Namespace`](crate::Namespace) or decoding an
/// [`Id`](crate::Id).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The namespace input is not exactly 3 bytes long.
    #[error("valid namespaces are 3 bytes")]
    NamespaceSize,

    /// The string to parse is neither 30 (namespaced) nor 27 (bare) bytes long.
    #[error("valid encoded strings are 30 bytes")]
    StringSize,

    /// The embedded KSUID segment could not be decoded.
    #[error(transparent)]
    Ksuid(#[from] ParseError),
}

impl Error {
    /// Returns true if this error was caused by the length of the input rather than its content.
    pub fn is_size_error(&self) -> bool {
        match self {
            Error::NamespaceSize | Error::StringSize => true,
            Error::Ksuid(err) => err.is_size_error(),
        }
    }
}
