//! Stable per-variant identity for the error taxonomy.
//!
//! Callers that need to branch on "what went wrong" compare an [`ErrorKind`]
//! rather than inspecting the rendered message. Kinds are plain `Copy`
//! discriminants: cheap to pass around, hashable, and exhaustively matchable.
//!
//! # Example
//!
//! ```rust
//! use workshop_gadgets::{ErrorKind, TypedError};
//!
//! let err = TypedError::not_found("order", "id", "order-99");
//! assert_eq!(err.kind(), ErrorKind::NotFound);
//! assert!(!err.is(ErrorKind::Internal));
//! ```

use std::fmt;

/// Discriminant for every [`TypedError`](crate::TypedError) variant.
///
/// The set is closed, so downstream `match` statements can be exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorKind {
    /// Flexible base error whose message is supplied verbatim.
    Base,
    /// Non-actionable internal failure.
    Internal,
    /// An explicitly unexpected code path was reached.
    Unknown,
    /// Requested feature is not built yet.
    NotImplemented,
    /// Caller supplied data that failed validation.
    InvalidInput,
    /// Internal precondition was violated.
    InvalidParameter,
    /// Lookup of a resource by field/value failed.
    NotFound,
    /// Upstream dependency failed or timed out.
    ServiceUnavailable,
    /// Operation is invalid given the current state.
    StateConflict,
    /// Credentials were missing or invalid.
    Unauthenticated,
    /// Caller is authenticated but not authorised.
    Forbidden,
    /// Requested byte range exceeds the resource bounds.
    UnsatisfiableRange,
    /// A request-scoped value was missing or of the wrong type.
    InvalidCtxValue,
}

impl ErrorKind {
    /// Every kind, in declaration order.
    pub const ALL: [ErrorKind; 13] = [
        Self::Base,
        Self::Internal,
        Self::Unknown,
        Self::NotImplemented,
        Self::InvalidInput,
        Self::InvalidParameter,
        Self::NotFound,
        Self::ServiceUnavailable,
        Self::StateConflict,
        Self::Unauthenticated,
        Self::Forbidden,
        Self::UnsatisfiableRange,
        Self::InvalidCtxValue,
    ];

    /// Snake-case label, suitable as a structured log value or metric tag.
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Internal => "internal",
            Self::Unknown => "unknown",
            Self::NotImplemented => "not_implemented",
            Self::InvalidInput => "invalid_input",
            Self::InvalidParameter => "invalid_parameter",
            Self::NotFound => "not_found",
            Self::ServiceUnavailable => "service_unavailable",
            Self::StateConflict => "state_conflict",
            Self::Unauthenticated => "unauthenticated",
            Self::Forbidden => "forbidden",
            Self::UnsatisfiableRange => "unsatisfiable_range",
            Self::InvalidCtxValue => "invalid_ctx_value",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
