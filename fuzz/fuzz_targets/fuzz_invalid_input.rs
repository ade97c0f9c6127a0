#![no_main]

use libfuzzer_sys::fuzz_target;
use workshop_gadgets::{InputAndMsg, TypedError};

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let pairs: Vec<InputAndMsg> = text
        .split('\n')
        .map(|line| match line.split_once('=') {
            Some((input, msg)) => InputAndMsg::new(input, msg),
            None => InputAndMsg::new(line, ""),
        })
        .collect();

    let expected_pairs = pairs.len();
    let err = TypedError::invalid_input(pairs);

    assert!(err.message().starts_with("invalid input(s): "));
    assert_eq!(err.message(), err.to_string());
    assert!(err.message().matches(", ").count() >= expected_pairs - 1);
});
