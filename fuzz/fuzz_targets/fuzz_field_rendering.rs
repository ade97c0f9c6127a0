#![no_main]

use libfuzzer_sys::fuzz_target;
use workshop_gadgets::{JsonLogger, Logger, LoggerOptions, RingBufferSink};

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let (key, value) = text.split_once('\0').unwrap_or((&*text, ""));
    let max = data.first().map_or(64, |b| usize::from(*b));

    let sink = RingBufferSink::new(1);
    let logger = JsonLogger::new(
        "info",
        LoggerOptions::default().max_value_len(max).sink(sink.clone()),
    )
    .unwrap();

    logger
        .with_field(key.to_owned(), value)
        .info(&text);

    let raw = sink.get_recent(1).pop().expect("record captured");
    let record: serde_json::Value = serde_json::from_str(&raw).expect("record is valid JSON");
    assert_eq!(record["message"], &*text);
    assert_eq!(record["level"], "INFO");
    assert!(logger.flush().is_ok());
});
