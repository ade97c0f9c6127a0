//! Marking errors whose message is fit for consumers.
//!
//! Most error messages describe internals and must not reach an API consumer
//! verbatim. Wrapping an error in [`Presentable`] declares that its message is
//! understandable and actionable by whoever made the request.
//!
//! # Outermost Value Only
//!
//! Presentability is a property of the value you hold, never of its causes.
//! [`is_presentable`] does not walk `source()`: when an internal layer wraps a
//! presentable validation error in a generic internal error, the detail is
//! hidden from the consumer.
//!
//! ```rust
//! use workshop_gadgets::{is_presentable, mark_presentable, presentable_message_or, TypedError};
//!
//! let shown = mark_presentable(TypedError::invalid_single_input("customerID", "must not be empty"));
//! assert!(is_presentable(&shown));
//! assert_eq!(
//!     presentable_message_or(&shown, "An internal error occurred"),
//!     "invalid input(s): customerID must not be empty"
//! );
//!
//! let hidden = TypedError::internal("handler failed").with_source(shown);
//! assert!(!is_presentable(&hidden));
//! assert_eq!(presentable_message_or(&hidden, "An internal error occurred"), "An internal error occurred");
//! ```

use crate::errors::BoxError;
use std::borrow::Cow;
use std::error::Error;
use std::fmt;

/// Wrapper declaring the inner error's message safe to surface.
///
/// `Display` and `source()` both forward to the inner error, so the wrapper
/// is transparent to anything that only reads messages.
pub struct Presentable {
    inner: BoxError,
}

impl Presentable {
    /// Message to hand to the consumer. Identical to `to_string()`.
    #[inline]
    pub fn presentable_message(&self) -> String {
        self.inner.to_string()
    }

    /// The wrapped error.
    #[inline]
    pub fn inner(&self) -> &(dyn Error + Send + Sync + 'static) {
        self.inner.as_ref()
    }

    /// Unwrap, discarding the marker.
    #[inline]
    pub fn into_inner(self) -> BoxError {
        self.inner
    }
}

impl fmt::Debug for Presentable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Presentable").field(&self.inner).finish()
    }
}

impl fmt::Display for Presentable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl Error for Presentable {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.inner.as_ref() as &(dyn Error + 'static))
    }
}

/// Mark `err` as presentable.
#[inline]
pub fn mark_presentable(err: impl Into<BoxError>) -> Presentable {
    Presentable { inner: err.into() }
}

/// True when `err` itself is a [`Presentable`]. Causes are not inspected.
#[inline]
pub fn is_presentable(err: &(dyn Error + 'static)) -> bool {
    err.is::<Presentable>()
}

/// `err`'s message when it is presentable, otherwise `fallback`.
pub fn presentable_message_or<'a>(err: &(dyn Error + 'static), fallback: &'a str) -> Cow<'a, str> {
    match err.downcast_ref::<Presentable>() {
        Some(presentable) => Cow::Owned(presentable.presentable_message()),
        None => Cow::Borrowed(fallback),
    }
}
