//! Flattening and combining error chains into single messages.
//!
//! Log sinks want one string per error, but errors arrive as linked chains of
//! causes. These helpers walk `source()` up to a fixed depth so a malformed
//! (cyclic) chain can never hang the caller.

use crate::TypedError;
use std::error::Error;

/// Upper bound on how many links any chain walk in this crate will follow.
pub const MAX_UNWRAP_DEPTH: usize = 1000;

/// Separator placed between the messages of consecutive chain links.
pub const CHAIN_SEPARATOR: &str = ": ";

/// Iterator over an error and its causes, outermost first.
///
/// Yields at most [`MAX_UNWRAP_DEPTH`] items.
pub struct Chain<'a> {
    next: Option<&'a (dyn Error + 'static)>,
    remaining: usize,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn Error + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next?;
        self.remaining -= 1;
        self.next = current.source();
        Some(current)
    }
}

/// Walk `err` and its causes, outermost first.
#[inline]
pub fn chain<'a>(err: &'a (dyn Error + 'static)) -> Chain<'a> {
    Chain {
        next: Some(err),
        remaining: MAX_UNWRAP_DEPTH,
    }
}

/// Join the messages of `err` and up to `max_depth - 1` causes with `": "`.
///
/// The outermost message is always included, so a depth of `0` or `1` both
/// yield exactly `err.to_string()`.
///
/// ```rust
/// use workshop_gadgets::{error_chain_message, TypedError};
///
/// let err = TypedError::base("a").with_source(TypedError::base("b").with_source(TypedError::base("c")));
/// assert_eq!(error_chain_message(&err, 10), "a: b: c");
/// assert_eq!(error_chain_message(&err, 1), "a");
/// ```
pub fn error_chain_message<E>(err: &E, max_depth: usize) -> String
where
    E: Error + ?Sized,
{
    let mut out = err.to_string();
    let mut next = err.source();
    let mut depth = 1;

    while depth < max_depth {
        let Some(cause) = next else {
            break;
        };
        out.push_str(CHAIN_SEPARATOR);
        out.push_str(&cause.to_string());
        next = cause.source();
        depth += 1;
    }

    out
}

/// Reusable extractor that flattens a chain to `max_depth` links.
pub fn unwrap_info_extractor(max_depth: usize) -> impl Fn(&(dyn Error + 'static)) -> String {
    move |err| error_chain_message(err, max_depth)
}

/// Combine several errors into one [`Base`](crate::ErrorKind::Base) error.
///
/// The result reads `"<msg>: <e1>, <e2>, ..."`. Each error is rendered with
/// `extractor` when one is given, otherwise with its own `Display`. Returns
/// `None` when `errs` is empty.
pub fn combine_errors<E, F>(msg: &str, errs: &[E], extractor: Option<F>) -> Option<TypedError>
where
    E: AsRef<dyn Error + 'static>,
    F: Fn(&(dyn Error + 'static)) -> String,
{
    if errs.is_empty() {
        return None;
    }

    let mut out = format!("{msg}{CHAIN_SEPARATOR}");
    for (i, err) in errs.iter().enumerate() {
        if i != 0 {
            out.push_str(", ");
        }
        let err = err.as_ref();
        match &extractor {
            Some(extract) => out.push_str(&extract(err)),
            None => out.push_str(&err.to_string()),
        }
    }

    Some(TypedError::base(out))
}
