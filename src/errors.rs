//! Tagged error taxonomy.
//!
//! Every failure a service wants to describe to its callers is expressed as a
//! [`TypedError`]: a closed [`ErrorDetail`] payload, a message rendered once at
//! construction, and an optional owned cause.
//!
//! # Rendering
//!
//! The message is computed from a fixed per-variant template when the error is
//! built and never recomputed, so `to_string()` is pure and stable. Structured
//! data that is not part of the template (for example the retry interval of
//! [`ErrorDetail::ServiceUnavailable`]) is only reachable through
//! [`TypedError::detail`].
//!
//! # Wrapping
//!
//! [`TypedError::with_source`] takes ownership of an already-built cause. The
//! error being built can never be its own cause, so walking `source()` always
//! terminates for chains built through this API.
//!
//! ```rust
//! use workshop_gadgets::{ErrorKind, TypedError};
//!
//! let cause = TypedError::service_unavailable("inventory");
//! let err = TypedError::internal("failed to reserve stock").with_source(cause);
//!
//! assert_eq!(err.kind(), ErrorKind::Internal);
//! assert_eq!(err.to_string(), "an internal error occurred: failed to reserve stock");
//! assert!(workshop_gadgets::has_kind(&err, ErrorKind::ServiceUnavailable));
//! ```

use crate::combiner::chain;
use crate::ErrorKind;
use std::error::Error;
use std::fmt::{self, Write as _};
use std::io;

/// Boxed, thread-safe cause carried by a [`TypedError`].
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Pairs an invalid input identifier with the reason it was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InputAndMsg {
    /// Name of the offending input, e.g. `customerID`.
    pub input: String,
    /// Why the input was rejected, e.g. `must not be empty`.
    pub msg: String,
}

impl InputAndMsg {
    /// Build a pair from anything string-like.
    #[inline]
    pub fn new(input: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            msg: msg.into(),
        }
    }
}

/// Variant payloads of the taxonomy.
///
/// The payload keeps the semantic fields of each variant so call sites can
/// build structured responses without parsing the message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorDetail {
    /// Message supplied verbatim.
    Base {
        /// Message, used as the whole rendered text.
        msg: String,
    },
    /// Non-actionable internal failure. `msg` should not reach consumers raw.
    Internal {
        /// What went wrong.
        msg: String,
    },
    /// An explicitly unexpected code path was reached.
    Unknown {
        /// Description of the unexpected path.
        msg: String,
    },
    /// Feature has not been built yet.
    NotImplemented {
        /// Name of the missing feature.
        feature: String,
    },
    /// External caller supplied invalid data. The message is safe to surface.
    InvalidInput {
        /// Rejected inputs, in reporting order.
        inputs: Vec<InputAndMsg>,
    },
    /// Internal precondition check failed. Not caused by user input.
    InvalidParameter {
        /// Name of the offending parameter.
        parameter: String,
        /// Why it was rejected.
        msg: String,
    },
    /// Lookup of `resource` by `field == value` failed.
    NotFound {
        /// Kind of thing looked up.
        resource: String,
        /// Field the lookup matched on.
        field: String,
        /// Value that matched nothing.
        value: String,
    },
    /// Upstream dependency failed. The retry interval is structured data only.
    ServiceUnavailable {
        /// Name of the failing dependency.
        service: String,
        /// Suggested wait before retrying, in seconds.
        retry_interval_secs: Option<u32>,
    },
    /// Operation is valid in general but not in the current state.
    StateConflict {
        /// The conflicting state.
        msg: String,
    },
    /// Missing or invalid credentials.
    Unauthenticated {
        /// Why authentication failed.
        msg: String,
    },
    /// Authenticated, but not authorised.
    Forbidden {
        /// What was refused.
        msg: String,
    },
    /// Range request outside the complete length of the resource.
    UnsatisfiableRange {
        /// First requested byte.
        first_byte_pos: i64,
        /// Last requested byte, if bounded.
        last_byte_pos: Option<i64>,
        /// Full length of the resource.
        complete_length: i64,
    },
    /// Expected request-scoped value was missing or of the wrong type.
    InvalidCtxValue {
        /// Key of the missing value.
        key: String,
    },
}

impl ErrorDetail {
    /// Discriminant of this payload.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Base { .. } => ErrorKind::Base,
            Self::Internal { .. } => ErrorKind::Internal,
            Self::Unknown { .. } => ErrorKind::Unknown,
            Self::NotImplemented { .. } => ErrorKind::NotImplemented,
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::InvalidParameter { .. } => ErrorKind::InvalidParameter,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::ServiceUnavailable { .. } => ErrorKind::ServiceUnavailable,
            Self::StateConflict { .. } => ErrorKind::StateConflict,
            Self::Unauthenticated { .. } => ErrorKind::Unauthenticated,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::UnsatisfiableRange { .. } => ErrorKind::UnsatisfiableRange,
            Self::InvalidCtxValue { .. } => ErrorKind::InvalidCtxValue,
        }
    }

    /// Render the per-variant message template.
    fn render(&self) -> String {
        match self {
            Self::Base { msg } => msg.clone(),
            Self::Internal { msg } => format!("an internal error occurred: {msg}"),
            Self::Unknown { msg } => format!("an unexpected error occurred: {msg}"),
            Self::NotImplemented { feature } => format!("feature {feature} is not implemented"),
            Self::InvalidInput { inputs } => {
                let mut out = String::from("invalid input(s): ");
                for (i, pair) in inputs.iter().enumerate() {
                    if i != 0 {
                        out.push_str(", ");
                    }
                    // Writing into a String cannot fail.
                    let _ = write!(out, "{} {}", pair.input, pair.msg);
                }
                out
            }
            Self::InvalidParameter { parameter, msg } => {
                format!("invalid parameter {parameter}: {msg}")
            }
            Self::NotFound {
                resource,
                field,
                value,
            } => format!("{resource} was not found with {field}: {value}"),
            Self::ServiceUnavailable { service, .. } => format!("{service} service unavailable"),
            Self::StateConflict { msg } => {
                format!("operation not possible due to current state: {msg}")
            }
            Self::Unauthenticated { msg } => format!("unauthenticated: {msg}"),
            Self::Forbidden { msg } => format!("forbidden: {msg}"),
            Self::UnsatisfiableRange {
                first_byte_pos,
                last_byte_pos,
                complete_length,
            } => {
                let last = last_byte_pos.map(|pos| pos.to_string()).unwrap_or_default();
                format!(
                    "unsatisfiable range: {first_byte_pos}-{last} (complete length: {complete_length})"
                )
            }
            Self::InvalidCtxValue { key } => {
                format!("context value {key} was missing or not the expected type")
            }
        }
    }
}

/// Typed error with a rendered message and an optional owned cause.
#[must_use = "errors should be handled or logged"]
pub struct TypedError {
    detail: ErrorDetail,
    message: Box<str>,
    source: Option<BoxError>,
}

impl TypedError {
    /// Build an error from a payload. The message is rendered here, once.
    pub fn from_detail(detail: ErrorDetail) -> Self {
        let message = detail.render().into_boxed_str();
        Self {
            detail,
            message,
            source: None,
        }
    }

    /// Attach the cause this error wraps.
    ///
    /// The cause is moved in and never modified. Calling this again replaces
    /// the previous cause.
    #[inline]
    pub fn with_source(mut self, cause: impl Into<BoxError>) -> Self {
        self.source = Some(cause.into());
        self
    }

    /// Attach a cause if one is available.
    #[inline]
    pub fn with_optional_source(self, cause: Option<BoxError>) -> Self {
        match cause {
            Some(cause) => self.with_source(cause),
            None => self,
        }
    }

    /// Flexible error whose message is exactly `msg`.
    ///
    /// Prefer a specific variant; this exists for wrapping where a templated
    /// message would be redundant or confusing.
    pub fn base(msg: impl Into<String>) -> Self {
        Self::from_detail(ErrorDetail::Base { msg: msg.into() })
    }

    /// Logic error the caller cannot act on, e.g. a row that fails to scan.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::from_detail(ErrorDetail::Internal { msg: msg.into() })
    }

    /// Reached a code path that should be impossible, such as the fallback arm
    /// of a match over a known set. Usually worth an alert.
    pub fn unknown(msg: impl Into<String>) -> Self {
        Self::from_detail(ErrorDetail::Unknown { msg: msg.into() })
    }

    /// Functionality that was called but has not been built.
    pub fn not_implemented(feature: impl Into<String>) -> Self {
        Self::from_detail(ErrorDetail::NotImplemented {
            feature: feature.into(),
        })
    }

    /// Validation failure of consumer-supplied input.
    ///
    /// Pairs are rendered in order and comma-joined. An empty list is
    /// accepted and renders as `"invalid input(s): "`.
    pub fn invalid_input(inputs: impl IntoIterator<Item = InputAndMsg>) -> Self {
        Self::from_detail(ErrorDetail::InvalidInput {
            inputs: inputs.into_iter().collect(),
        })
    }

    /// Validation failure of a single consumer-supplied input.
    pub fn invalid_single_input(input: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::invalid_input([InputAndMsg::new(input, msg)])
    }

    /// Precondition on an internal parameter failed.
    pub fn invalid_parameter(parameter: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::from_detail(ErrorDetail::InvalidParameter {
            parameter: parameter.into(),
            msg: msg.into(),
        })
    }

    /// A required parameter was unexpectedly absent.
    pub fn nil_parameter(parameter: impl Into<String>) -> Self {
        Self::invalid_parameter(parameter, "must not be nil")
    }

    /// `resource` could not be found where `field == value`.
    pub fn not_found(
        resource: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::from_detail(ErrorDetail::NotFound {
            resource: resource.into(),
            field: field.into(),
            value: value.into(),
        })
    }

    /// Upstream `service` did not respond or could not complete the request.
    pub fn service_unavailable(service: impl Into<String>) -> Self {
        Self::from_detail(ErrorDetail::ServiceUnavailable {
            service: service.into(),
            retry_interval_secs: None,
        })
    }

    /// Like [`service_unavailable`](Self::service_unavailable), with the number
    /// of seconds a caller should wait before retrying.
    pub fn service_unavailable_with_retry(service: impl Into<String>, retry_interval_secs: u32) -> Self {
        Self::from_detail(ErrorDetail::ServiceUnavailable {
            service: service.into(),
            retry_interval_secs: Some(retry_interval_secs),
        })
    }

    /// Operation not possible in the current state of the system.
    pub fn state_conflict(msg: impl Into<String>) -> Self {
        Self::from_detail(ErrorDetail::StateConflict { msg: msg.into() })
    }

    /// Request had no credentials or an unexpected scheme.
    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        Self::from_detail(ErrorDetail::Unauthenticated { msg: msg.into() })
    }

    /// Credentials were accepted but lack permission.
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::from_detail(ErrorDetail::Forbidden { msg: msg.into() })
    }

    /// Syntactically valid range outside the resource's complete length.
    pub fn unsatisfiable_range(
        first_byte_pos: i64,
        last_byte_pos: Option<i64>,
        complete_length: i64,
    ) -> Self {
        Self::from_detail(ErrorDetail::UnsatisfiableRange {
            first_byte_pos,
            last_byte_pos,
            complete_length,
        })
    }

    /// Request-scoped value under `key` was absent or of the wrong type.
    pub fn invalid_ctx_value(key: impl Into<String>) -> Self {
        Self::from_detail(ErrorDetail::InvalidCtxValue { key: key.into() })
    }

    /// Variant discriminant.
    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        self.detail.kind()
    }

    /// True when this error (not its causes) is of `kind`.
    #[inline]
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind() == kind
    }

    /// Structured payload.
    #[inline]
    pub const fn detail(&self) -> &ErrorDetail {
        &self.detail
    }

    /// Message rendered at construction.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Directly wrapped cause, if any.
    #[inline]
    pub fn cause(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    /// Seconds to wait before retrying, for `ServiceUnavailable` errors that
    /// carry one.
    pub fn retry_interval_secs(&self) -> Option<u32> {
        match &self.detail {
            ErrorDetail::ServiceUnavailable {
                retry_interval_secs, ..
            } => *retry_interval_secs,
            _ => None,
        }
    }

    /// Split into payload and cause, dropping the rendered message.
    pub fn into_parts(self) -> (ErrorDetail, Option<BoxError>) {
        (self.detail, self.source)
    }
}

impl fmt::Debug for TypedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedError")
            .field("kind", &self.kind())
            .field("message", &self.message)
            .field("detail", &self.detail)
            .field("source", &self.source)
            .finish()
    }
}

impl fmt::Display for TypedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for TypedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_deref().map(|e| e as &(dyn Error + 'static))
    }
}

/// First [`TypedError`] in the chain starting at `err` (inclusive).
///
/// The walk is bounded by [`MAX_UNWRAP_DEPTH`](crate::MAX_UNWRAP_DEPTH).
pub fn find_typed<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a TypedError> {
    chain(err).find_map(as_typed)
}

/// True when any error in the chain starting at `err` is a [`TypedError`] of
/// `kind`.
pub fn has_kind(err: &(dyn Error + 'static), kind: ErrorKind) -> bool {
    chain(err).filter_map(as_typed).any(|typed| typed.is(kind))
}

// `io::Error::source` skips the custom payload, so look inside it explicitly.
fn as_typed<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a TypedError> {
    if let Some(typed) = err.downcast_ref::<TypedError>() {
        return Some(typed);
    }
    err.downcast_ref::<io::Error>()
        .and_then(|io_err| io_err.get_ref())
        .and_then(|inner| inner.downcast_ref::<TypedError>())
}
