//! Error taxonomy for the futures-and-promises core.
//!
//! Mirrors the shape of [`crate::concurrency::ConcurrencyError`] in the
//! original interpreter this crate was distilled from: a flat
//! [`thiserror`]-derived enum plus a `boxed`/`From` convenience, rather than
//! the span-aware diagnostic machinery that codebase uses for its language
//! front-end (there is no source text here to point at).

use std::fmt;
use std::sync::Arc;

/// Result type alias used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Structural and user-propagated errors produced by this crate.
///
/// `Clone`-able so that a completed [`crate::try_value::Try::Failure`] can be
/// observed by reference and re-read any number of times (needed by
/// [`crate::shared_future::SharedFuture::get`], which may be called many
/// times from many threads) without losing the ability to re-raise the
/// original failure.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// [`crate::try_value::Try::get`] was called on a `Try` that was never
    /// completed with a value or a failure.
    #[error("using an uninitialized Try")]
    UsingUninitializedTry,

    /// The last [`crate::promise::Promise`] writing to a `Core` was dropped
    /// before the core completed.
    #[error("broken promise")]
    BrokenPromise,

    /// The predicate passed to [`crate::future::Future::guard`] returned
    /// `false`.
    #[error("predicate not fulfilled")]
    PredicateNotFulfilled,

    /// A second callback was registered on a unique [`crate::future::Future`]
    /// after one was already attached.
    #[error("only one callback may be registered per future")]
    OnlyOneCallbackPerFuture,

    /// An operation was attempted on a [`crate::future::Future`] that was
    /// already consumed by a previous operation.
    #[error("future is invalid")]
    FutureIsInvalid,

    /// `first_n`/`first_n_succ` were called with fewer input futures than
    /// requested completions.
    #[error("not enough futures: have {available}, need {required}")]
    NotEnoughFutures {
        /// Number of input futures actually supplied.
        available: usize,
        /// Number of completions requested.
        required: usize,
    },

    /// An opaque failure produced by user code (a callback passed to
    /// `then`/`guard`/`async`, or a value explicitly failed through a
    /// `Promise`). Reference-counted to preserve the concrete error's type
    /// identity across thread and executor boundaries while remaining
    /// cheaply cloneable, playing the role `std::exception_ptr` plays in
    /// the C++ lineage of this library.
    #[error(transparent)]
    User(UserError),
}

impl Error {
    /// Wraps an arbitrary user error in the `User` variant.
    pub fn user(e: impl std::error::Error + Send + Sync + 'static) -> Self {
        Error::User(UserError(Arc::new(e)))
    }

    /// Wraps an already-boxed user error without an extra allocation beyond
    /// the `Arc`.
    pub fn from_boxed(e: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Error::User(UserError(Arc::from(e)))
    }

    /// Converts a caught panic payload (as produced by
    /// `std::panic::catch_unwind`) into a `User` failure. Used wherever a
    /// user-supplied callback runs inside a combinator — `then`, `guard`,
    /// `async` — so a panicking callback fails its downstream `Core` instead
    /// of unwinding across the executor boundary.
    pub fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "callback panicked".to_string());
        Error::user(PanicError(message))
    }
}

/// Wraps the message recovered from a caught callback panic.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct PanicError(String);

/// Newtype over `Arc<dyn Error + Send + Sync>` so it can implement
/// `std::error::Error` itself (the orphan rules forbid implementing it
/// directly for the bare trait object) and so [`Error`] can stay `Clone`.
#[derive(Debug, Clone)]
pub struct UserError(pub Arc<dyn std::error::Error + Send + Sync>);

impl fmt::Display for UserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for UserError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}
