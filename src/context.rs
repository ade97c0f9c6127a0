//! Explicit request-scoped carrier.
//!
//! A [`RequestContext`] travels through call signatures alongside a request.
//! It holds at most one logger plus the B3 trace identifiers of the request,
//! and hands the logger back already enriched with those identifiers.
//!
//! # Example
//!
//! ```rust
//! use workshop_gadgets::{ErrorKind, JsonLogger, Logger, LoggerOptions, NoopLogger, RequestContext, RingBufferSink};
//!
//! let sink = RingBufferSink::new(8);
//! let base = JsonLogger::new("info", LoggerOptions::default().sink(sink.clone()))?;
//!
//! let ctx = RequestContext::new()
//!     .with_logger(base)
//!     .with_trace("463ac35c9f6413ad", "a2fb4a1d1a96d312");
//!
//! let logger: JsonLogger = ctx.scoped_logger()?;
//! logger.info("handling request");
//! assert_eq!(sink.last_json().unwrap()["x-b3-traceid"], "463ac35c9f6413ad");
//!
//! // Asking for a logger of another type is an InvalidCtxValue error.
//! let err = ctx.logger::<NoopLogger>().unwrap_err();
//! assert!(err.is(ErrorKind::InvalidCtxValue));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::fields::{Fields, SPAN_ID_KEY, TRACE_ID_KEY};
use crate::logging::Logger;
use crate::TypedError;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Key reported by [`TypedError::invalid_ctx_value`] when no usable logger
/// is stored.
pub const LOGGER_CTX_KEY: &str = "logger";

// ============================================================================
// Request Context
// ============================================================================

/// Request-scoped values passed explicitly down the call stack.
///
/// Cloning is cheap; the stored logger is shared.
#[derive(Clone, Default)]
pub struct RequestContext {
    logger: Option<Arc<dyn Any + Send + Sync>>,
    trace_id: Option<Arc<str>>,
    span_id: Option<Arc<str>>,
}

impl RequestContext {
    /// Empty context.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `logger`, replacing any previously stored one.
    pub fn with_logger<L: Logger>(mut self, logger: L) -> Self {
        self.logger = Some(Arc::new(logger));
        self
    }

    /// Record the request's B3 trace and span identifiers.
    pub fn with_trace(mut self, trace_id: impl Into<Arc<str>>, span_id: impl Into<Arc<str>>) -> Self {
        self.trace_id = Some(trace_id.into());
        self.span_id = Some(span_id.into());
        self
    }

    /// B3 trace identifier of the request.
    #[inline]
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// B3 span identifier of the request.
    #[inline]
    pub fn span_id(&self) -> Option<&str> {
        self.span_id.as_deref()
    }

    /// True when a logger of any type is stored.
    #[inline]
    pub fn has_logger(&self) -> bool {
        self.logger.is_some()
    }

    /// The stored logger.
    ///
    /// # Errors
    ///
    /// An [`InvalidCtxValue`](crate::ErrorKind::InvalidCtxValue) error for
    /// [`LOGGER_CTX_KEY`] when no logger is stored or it is not an `L`.
    pub fn logger<L: Logger>(&self) -> crate::Result<L> {
        self.logger
            .as_deref()
            .and_then(|stored| stored.downcast_ref::<L>())
            .cloned()
            .ok_or_else(|| TypedError::invalid_ctx_value(LOGGER_CTX_KEY))
    }

    /// The stored logger, or `fallback` when none is usable.
    pub fn logger_or<L: Logger>(&self, fallback: L) -> L {
        self.logger().unwrap_or(fallback)
    }

    /// The stored logger with the trace identifiers attached as fields.
    ///
    /// # Errors
    ///
    /// Same as [`logger`](Self::logger).
    pub fn scoped_logger<L: Logger>(&self) -> crate::Result<L> {
        let logger: L = self.logger()?;

        let mut fields = Fields::new();
        if let Some(trace_id) = self.trace_id() {
            fields.insert(TRACE_ID_KEY, trace_id);
        }
        if let Some(span_id) = self.span_id() {
            fields.insert(SPAN_ID_KEY, span_id);
        }

        Ok(logger.with_fields(fields))
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("has_logger", &self.has_logger())
            .field("trace_id", &self.trace_id)
            .field("span_id", &self.span_id)
            .finish()
    }
}
