//! Error types for the rotorcrypt library.

use thiserror::Error;

/// Convenience alias used by every fallible operation in the crate.
pub type Result<T> = std::result::Result<T, EnigmaError>;

/// Errors produced by the rotorcrypt library.
///
/// Every error is raised at the point of violation. The machine never
/// repairs a bad configuration or skips an unknown symbol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnigmaError {
    /// Bad alphabet, bad cycle spec, invalid rotor assignment, reflector
    /// that is not a derangement, or plugboard over a different alphabet.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Setting string of the wrong length or with foreign symbols, or a
    /// malformed setting line.
    #[error("format error: {0}")]
    Format(String),
    /// A symbol outside the alphabet was found in a message.
    #[error("encoding error: '{0}' is not in the alphabet")]
    Encoding(char),
    /// A symbol was looked up in an alphabet that does not contain it.
    #[error("lookup error: '{0}' not found in alphabet")]
    Lookup(char),
}

impl EnigmaError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        EnigmaError::Configuration(msg.into())
    }

    pub(crate) fn format(msg: impl Into<String>) -> Self {
        EnigmaError::Format(msg.into())
    }
}
