//! `Try<T>`: a tagged outcome that is either uninitialized, a value, or a
//! failure.
//!
//! This is the value type a [`crate::core::Core`] completes with. It plays
//! the role `adv::Try<T>` plays in the C++ lineage this crate was distilled
//! from, but failures are represented as an [`Error`] rather than an
//! `exception_ptr` — the closest idiomatic Rust equivalent, since Rust has
//! no rethrow-from-anywhere mechanism.

use crate::error::Error;

/// Tagged outcome of a completed (or not-yet-completed) asynchronous value.
#[derive(Debug, Clone, Default)]
pub enum Try<T> {
    /// No value or failure has been recorded yet.
    #[default]
    Uninitialized,
    /// Completed successfully with `v`.
    Value(T),
    /// Completed with a failure.
    Failure(Error),
}

impl<T> Try<T> {
    /// Builds a successful `Try`.
    pub fn new_value(v: T) -> Self {
        Try::Value(v)
    }

    /// Builds a failed `Try`.
    pub fn new_failure(e: Error) -> Self {
        Try::Failure(e)
    }

    /// Builds an uninitialized `Try`.
    pub fn new_uninitialized() -> Self {
        Try::Uninitialized
    }

    /// Consumes the `Try`, returning the value, raising
    /// [`Error::UsingUninitializedTry`] if uninitialized, or re-raising the
    /// stored failure.
    pub fn get(self) -> Result<T, Error> {
        match self {
            Try::Uninitialized => Err(Error::UsingUninitializedTry),
            Try::Value(v) => Ok(v),
            Try::Failure(e) => Err(e),
        }
    }

    /// Borrows the value, with the same error behavior as [`Try::get`].
    pub fn get_ref(&self) -> Result<&T, Error> {
        match self {
            Try::Uninitialized => Err(Error::UsingUninitializedTry),
            Try::Value(v) => Ok(v),
            Try::Failure(e) => Err(e.clone()),
        }
    }

    /// True if this `Try` holds a value.
    pub fn has_value(&self) -> bool {
        matches!(self, Try::Value(_))
    }

    /// True if this `Try` holds a failure.
    pub fn has_exception(&self) -> bool {
        matches!(self, Try::Failure(_))
    }
}
