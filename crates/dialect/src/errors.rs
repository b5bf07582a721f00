//! Conversion errors for the dialect's domain types.
//!
//! The URL builder and the payload normaliser are total functions and never
//! fail. [`DialectError`] only covers the edges where untyped input (a verb
//! read from the command line, an identifier read from a JSON payload) is
//! turned into one of this crate's types.

use thiserror::Error;

/// Errors produced while converting untyped input into dialect types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DialectError {
    /// The text does not name an HTTP verb the dialect knows about.
    #[error("Unsupported HTTP verb: '{verb}'")]
    UnsupportedVerb {
        /// The rejected input, as given.
        verb: String,
    },

    /// A JSON value could not be used as a record identifier.
    ///
    /// Only strings and numbers identify records.
    #[error("Value cannot identify a record: {found}")]
    InvalidIdentifier {
        /// Compact JSON rendering of the rejected value.
        found: String,
    },

    /// A name (model, attribute, relationship) was empty.
    #[error("{kind} must not be empty")]
    EmptyName {
        /// The kind of name that was rejected, e.g. `"ModelName"`.
        kind: &'static str,
    },
}
