//! Convenience macros for building field sets and validation errors.
//!
//! # Usage
//!
//! ```rust
//! use workshop_gadgets::{fields, invalid_input, Logger, NoopLogger, CUSTOMER_ID_KEY};
//!
//! let logger = NoopLogger::new().with_fields(fields! {
//!     CUSTOMER_ID_KEY => "c-42",
//!     "attempt" => 3,
//! });
//!
//! let err = invalid_input! {
//!     "customerID" => "must not be empty",
//!     "limit" => format!("must be at most {}", 100),
//! };
//! assert_eq!(
//!     err.message(),
//!     "invalid input(s): customerID must not be empty, limit must be at most 100"
//! );
//! # let _ = logger;
//! ```

// ============================================================================
// Field Sets
// ============================================================================

/// Build a [`Fields`](crate::Fields) from `key => value` pairs.
///
/// Values may be anything `serde::Serialize`. Later pairs override earlier
/// ones with the same key.
#[macro_export]
macro_rules! fields {
    () => {
        $crate::Fields::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut fields = $crate::Fields::new();
        $( fields.insert($key, $value); )+
        fields
    }};
}

// ============================================================================
// Error Creation Macros
// ============================================================================

/// Build an InvalidInput [`TypedError`](crate::TypedError) from
/// `input => reason` pairs, keeping their order.
#[macro_export]
macro_rules! invalid_input {
    ($($input:expr => $msg:expr),+ $(,)?) => {
        $crate::TypedError::invalid_input([
            $( $crate::InputAndMsg::new($input, $msg) ),+
        ])
    };
}

#[cfg(test)]
mod tests {
    use crate::{ErrorKind, Fields, PANIC_KEY};
    use serde_json::json;

    #[test]
    fn fields_macro_keeps_order_and_overrides() {
        let built = fields! {
            "a" => 1,
            PANIC_KEY => "oops",
            "a" => 2,
        };
        assert_eq!(built.len(), 2);
        assert_eq!(built.get("a"), Some(&json!(2)));
        let keys: Vec<_> = built.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["a", "panic"]);

        let empty: Fields = fields!();
        assert!(empty.is_empty());
    }

    #[test]
    fn fields_macro_accepts_runtime_keys() {
        let key = String::from("dynamic");
        let built = fields! { key => vec![1, 2] };
        assert_eq!(built.get("dynamic"), Some(&json!([1, 2])));
    }

    #[test]
    fn invalid_input_macro_builds_ordered_message() {
        let err = invalid_input! {
            "customerID" => "must not be empty",
            "limit" => "must be positive",
        };
        assert!(err.is(ErrorKind::InvalidInput));
        assert_eq!(
            err.message(),
            "invalid input(s): customerID must not be empty, limit must be positive"
        );
    }
}
