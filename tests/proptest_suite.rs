//! Property-based tests for workshop_gadgets
//!
//! These tests use proptest to generate random inputs and verify invariants hold.

use proptest::prelude::*;
use workshop_gadgets::{
    error_chain_message, fields, has_kind, is_presentable, mark_presentable,
    presentable_message_or, ErrorKind, Fields, InputAndMsg, JsonLogger, Logger, LoggerOptions,
    LoggingError, RingBufferSink, TypedError,
};

fn text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 _.-]{0,24}"
}

/// Any variant, paired with the kind it must report.
fn any_typed_error() -> impl Strategy<Value = (ErrorKind, TypedError)> {
    prop_oneof![
        text().prop_map(|m| (ErrorKind::Base, TypedError::base(m))),
        text().prop_map(|m| (ErrorKind::Internal, TypedError::internal(m))),
        text().prop_map(|m| (ErrorKind::Unknown, TypedError::unknown(m))),
        text().prop_map(|f| (ErrorKind::NotImplemented, TypedError::not_implemented(f))),
        prop::collection::vec((text(), text()), 0..4).prop_map(|pairs| {
            let inputs = pairs.into_iter().map(|(i, m)| InputAndMsg::new(i, m));
            (ErrorKind::InvalidInput, TypedError::invalid_input(inputs))
        }),
        (text(), text()).prop_map(|(p, m)| (ErrorKind::InvalidParameter, TypedError::invalid_parameter(p, m))),
        (text(), text(), text())
            .prop_map(|(r, f, v)| (ErrorKind::NotFound, TypedError::not_found(r, f, v))),
        (text(), any::<Option<u32>>()).prop_map(|(s, retry)| {
            let err = match retry {
                Some(secs) => TypedError::service_unavailable_with_retry(s, secs),
                None => TypedError::service_unavailable(s),
            };
            (ErrorKind::ServiceUnavailable, err)
        }),
        text().prop_map(|m| (ErrorKind::StateConflict, TypedError::state_conflict(m))),
        text().prop_map(|m| (ErrorKind::Unauthenticated, TypedError::unauthenticated(m))),
        text().prop_map(|m| (ErrorKind::Forbidden, TypedError::forbidden(m))),
        (any::<i64>(), any::<Option<i64>>(), any::<i64>()).prop_map(|(first, last, len)| {
            (ErrorKind::UnsatisfiableRange, TypedError::unsatisfiable_range(first, last, len))
        }),
        text().prop_map(|k| (ErrorKind::InvalidCtxValue, TypedError::invalid_ctx_value(k))),
    ]
}

fn field_set() -> impl Strategy<Value = Vec<(String, i64)>> {
    prop::collection::vec(("[a-e]", any::<i64>()), 0..6)
}

fn to_fields(pairs: &[(String, i64)]) -> Fields {
    let mut fields = Fields::new();
    for (key, value) in pairs {
        fields.insert(key.clone(), *value);
    }
    fields
}

fn capture() -> (JsonLogger, RingBufferSink) {
    let sink = RingBufferSink::new(16);
    let logger = JsonLogger::new("debug", LoggerOptions::default().sink(sink.clone()))
        .expect("valid level");
    (logger, sink)
}

// ============================================================================
// TAXONOMY PROPERTIES
// ============================================================================

proptest! {
    /// Rendering is pure: the message never changes once built
    #[test]
    fn message_is_deterministic((_, err) in any_typed_error()) {
        let first = err.to_string();
        let second = err.to_string();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.as_str(), err.message());
    }

    /// Exactly one kind test passes for every constructed error
    #[test]
    fn kind_identity_is_exclusive((kind, err) in any_typed_error()) {
        prop_assert_eq!(err.kind(), kind);
        for other in ErrorKind::ALL {
            prop_assert_eq!(err.is(other), other == kind);
        }
    }

    /// Wrapping leaves the cause's message and kind untouched
    #[test]
    fn wrapping_preserves_cause((kind, cause) in any_typed_error(), msg in text()) {
        let expected = cause.to_string();
        let outer = TypedError::internal(msg).with_source(cause);

        let inner = outer.cause().expect("cause attached");
        prop_assert_eq!(inner.to_string(), expected);
        prop_assert!(has_kind(&outer, kind));
    }

    /// Retry interval never leaks into the message
    #[test]
    fn retry_interval_is_structured_only(service in text(), secs in any::<u32>()) {
        let plain = TypedError::service_unavailable(service.clone());
        let retry = TypedError::service_unavailable_with_retry(service, secs);
        prop_assert_eq!(plain.message(), retry.message());
        prop_assert_eq!(retry.retry_interval_secs(), Some(secs));
    }
}

// ============================================================================
// PRESENTABILITY PROPERTIES
// ============================================================================

proptest! {
    /// Marking makes an error presentable; the bare error never is
    #[test]
    fn marking_is_required((_, err) in any_typed_error()) {
        prop_assert!(!is_presentable(&err));
        let message = err.to_string();

        let marked = mark_presentable(err);
        prop_assert!(is_presentable(&marked));
        prop_assert_eq!(presentable_message_or(&marked, "fallback"), message);
    }

    /// A plain wrapper hides a presentable cause
    #[test]
    fn presentability_is_not_transitive((_, err) in any_typed_error(), msg in text()) {
        let outer = TypedError::internal(msg).with_source(mark_presentable(err));
        prop_assert!(!is_presentable(&outer));
        prop_assert_eq!(presentable_message_or(&outer, "fallback"), "fallback");
    }
}

// ============================================================================
// LOGGER FIELD PROPERTIES
// ============================================================================

proptest! {
    /// Successive derivations hold the union, later keys winning; the base is untouched
    #[test]
    fn derivation_unions_and_isolates(f1 in field_set(), f2 in field_set()) {
        let (base, sink) = capture();
        let derived = base.with_fields(to_fields(&f1)).with_fields(to_fields(&f2));

        derived.info("derived");
        base.info("base");

        let records = sink.get_all_json();
        prop_assert_eq!(records.len(), 2);

        let expected = to_fields(&f1).merged(&to_fields(&f2));
        for (key, value) in expected.iter() {
            prop_assert_eq!(&records[0][key], value);
        }
        for (key, _) in f1.iter().chain(f2.iter()) {
            prop_assert!(records[1].get(key.as_str()).is_none());
        }
        prop_assert!(base.fields().is_empty());
    }

    /// Flattening follows the chain up to the depth bound
    #[test]
    fn chain_flattening_respects_depth(a in text(), b in text(), c in text(), depth in 0usize..6) {
        let err = TypedError::base(a.clone())
            .with_source(TypedError::base(b.clone()).with_source(TypedError::base(c.clone())));

        let expected = match depth {
            0 | 1 => a.clone(),
            2 => format!("{a}: {b}"),
            _ => format!("{a}: {b}: {c}"),
        };
        prop_assert_eq!(error_chain_message(&err, depth), expected.clone());

        let (logger, sink) = capture();
        logger.with_error_depth(&err, depth).info("x");
        prop_assert_eq!(&sink.last_json().unwrap()["error"], expected.as_str());
    }

    /// Unknown level strings never build a logger
    #[test]
    fn unknown_levels_are_rejected(level in "[a-z]{1,8}") {
        let known = ["debug", "info", "warn", "error"].contains(&level.as_str());
        let built = JsonLogger::new(&level, LoggerOptions::default().sink(RingBufferSink::new(1)));
        match built {
            Ok(_) => prop_assert!(known),
            Err(LoggingError::InvalidLevel(raw)) => {
                prop_assert!(!known);
                prop_assert_eq!(raw, level);
            }
            Err(other) => prop_assert!(false, "unexpected error {other}"),
        }
    }
}

// ============================================================================
// CONCRETE SCENARIOS
// ============================================================================

#[test]
fn not_found_message() {
    let err = TypedError::not_found("order", "id", "order-99");
    assert_eq!(err.message(), "order was not found with id: order-99");
}

#[test]
fn invalid_input_message() {
    let err = TypedError::invalid_input([InputAndMsg::new("customerID", "must not be empty")]);
    assert_eq!(err.message(), "invalid input(s): customerID must not be empty");
}

#[test]
fn info_logger_filters_debug() {
    assert!(matches!(
        JsonLogger::new("bogus", LoggerOptions::default()),
        Err(LoggingError::InvalidLevel(_))
    ));

    let sink = RingBufferSink::new(4);
    let logger = JsonLogger::new("info", LoggerOptions::default().sink(sink.clone())).unwrap();
    logger.info("emitted");
    logger.debug("suppressed");

    let records = sink.get_all_json();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["message"], "emitted");
}

#[test]
fn with_error_three_level_chain() {
    let (logger, sink) = capture();
    let c = TypedError::service_unavailable("inventory");
    let b = TypedError::state_conflict("reservation pending").with_source(c);
    let a = TypedError::internal("checkout failed").with_source(b);

    logger.with_error(&a).error("request failed");
    logger.with_error_depth(&a, 1).warn("request failed");

    let records = sink.get_all_json();
    assert_eq!(
        records[0]["error"],
        "an internal error occurred: checkout failed: \
         operation not possible due to current state: reservation pending: \
         inventory service unavailable"
    );
    assert_eq!(records[1]["error"], "an internal error occurred: checkout failed");
}

#[test]
fn fields_macro_feeds_logger() {
    let (logger, sink) = capture();
    logger
        .with_fields(fields! { "customer-id" => "c-1", "attempt" => 2 })
        .info("retrying");

    let record = sink.last_json().unwrap();
    assert_eq!(record["customer-id"], "c-1");
    assert_eq!(record["attempt"], 2);
}
