//! # Workshop Gadgets
//!
//! A tagged error taxonomy and a contextual structured logger for small HTTP
//! services.
//!
//! ## Design Philosophy
//!
//! 1. **Errors say what kind of failure happened**: a closed set of variants,
//!    told apart by [`ErrorKind`], never by matching message text
//! 2. **Messages are rendered once**: at construction, from a fixed template
//! 3. **Consumers only see what was marked for them**: [`mark_presentable`]
//!    applies to the outermost error only
//! 4. **Loggers are values**: deriving a logger with extra fields never
//!    changes the logger it came from
//! 5. **Context lives in fields**: IDs and errors are attached as structured
//!    fields, not formatted into messages
//!
//! ## Quick Start
//!
//! ```rust
//! use workshop_gadgets::{
//!     is_presentable, mark_presentable, presentable_message_or, JsonLogger, Logger,
//!     LoggerOptions, RingBufferSink, TypedError, CUSTOMER_ID_KEY,
//! };
//!
//! fn find_order(id: &str) -> workshop_gadgets::Result<()> {
//!     Err(TypedError::not_found("order", "id", id))
//! }
//!
//! let sink = RingBufferSink::new(16);
//! let logger = JsonLogger::new("info", LoggerOptions::default().name("orders").sink(sink.clone()))?;
//!
//! if let Err(err) = find_order("order-99") {
//!     logger
//!         .with_error(&err)
//!         .with_field(CUSTOMER_ID_KEY, "c-7")
//!         .warn("order lookup failed");
//!
//!     let shown = mark_presentable(err);
//!     assert!(is_presentable(&shown));
//!     assert_eq!(
//!         presentable_message_or(&shown, "An internal error occurred"),
//!         "order was not found with id: order-99"
//!     );
//! }
//!
//! let record = sink.last_json().unwrap();
//! assert_eq!(record["error"], "order was not found with id: order-99");
//! assert_eq!(record["customer-id"], "c-7");
//! logger.flush()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Modules
//!
//! - [`kind`], [`errors`]: the taxonomy
//! - [`presentable`]: consumer-safe marking
//! - [`combiner`]: flattening and combining cause chains
//! - [`logging`], [`json_logger`], [`noop`]: the logger trait and backends
//! - [`fields`], [`level`], [`sink`]: logger building blocks
//! - [`context`]: explicit request-scoped carrier
//! - [`config`]: deserializable and environment-driven logger settings
//!
//! ## Features
//!
//! - `tracing`: adds [`TracingLogger`], which forwards records to `tracing`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod combiner;
pub mod config;
pub mod context;
pub mod convenience;
pub mod errors;
pub mod fields;
pub mod json_logger;
pub mod kind;
pub mod level;
pub mod logging;
pub mod noop;
pub mod presentable;
pub mod sink;
#[cfg(feature = "tracing")]
pub mod tracing_bridge;

pub use combiner::*;
pub use config::*;
pub use context::*;
pub use errors::*;
pub use fields::*;
pub use json_logger::*;
pub use kind::*;
pub use level::*;
pub use logging::*;
pub use noop::*;
pub use presentable::*;
pub use sink::*;
#[cfg(feature = "tracing")]
pub use tracing_bridge::*;

/// Type alias for Results using the taxonomy's error type.
pub type Result<T> = std::result::Result<T, TypedError>;
