//! Output sinks for rendered log records.
//!
//! A [`Sink`] receives one fully rendered record at a time. Records are
//! self-contained JSON objects, so a sink only has to keep each write atomic;
//! ordering across concurrent emitters is not preserved.
//!
//! # Provided Sinks
//!
//! - [`WriterSink`]: any `io::Write` behind a mutex. Use
//!   [`WriterSink::stdout`] or [`WriterSink::stderr`] for process streams.
//! - [`RingBufferSink`]: bounded in-memory capture with FIFO eviction, for
//!   tests and for inspecting the most recent records of a running process.
//!
//! # Example
//!
//! ```rust
//! use workshop_gadgets::{JsonLogger, Logger, LoggerOptions, RingBufferSink};
//!
//! let sink = RingBufferSink::new(16);
//! let logger = JsonLogger::new("info", LoggerOptions::default().sink(sink.clone())).unwrap();
//!
//! logger.info("ready");
//! assert_eq!(sink.len(), 1);
//! assert_eq!(sink.last_json().unwrap()["message"], "ready");
//! ```

use serde_json::Value;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Destination for rendered records.
pub trait Sink: Send + Sync + 'static {
    /// Write one record. `record` carries no trailing newline.
    fn write_record(&self, record: &str) -> io::Result<()>;

    /// Push buffered bytes to the underlying destination.
    fn flush(&self) -> io::Result<()>;
}

/// Sink over any writer. Each record is written as one line.
pub struct WriterSink<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send + 'static> WriterSink<W> {
    /// Wrap `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    #[inline]
    fn lock(&self) -> MutexGuard<'_, W> {
        match self.writer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Unwrap the writer.
    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl WriterSink<io::Stdout> {
    /// Sink writing to the process's standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl WriterSink<io::Stderr> {
    /// Sink writing to the process's standard error.
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write + Send + 'static> Sink for WriterSink<W> {
    fn write_record(&self, record: &str) -> io::Result<()> {
        let mut line = Vec::with_capacity(record.len() + 1);
        line.extend_from_slice(record.as_bytes());
        line.push(b'\n');

        let mut writer = self.lock();
        writer.write_all(&line)
    }

    fn flush(&self) -> io::Result<()> {
        self.lock().flush()
    }
}

/// Fixed-size ring of records. The slice is allocated once and never grows.
struct RingBuffer {
    slots: Box<[Option<Arc<str>>]>,
    /// Slot the next record goes into.
    next: usize,
    len: usize,
}

impl RingBuffer {
    fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity].into_boxed_slice(),
            next: 0,
            len: 0,
        }
    }

    /// Store `record`, returning the one it displaced once the ring is full.
    fn push(&mut self, record: Arc<str>) -> Option<Arc<str>> {
        let displaced = self.slots[self.next].replace(record);
        self.next = (self.next + 1) % self.slots.len();
        self.len = (self.len + 1).min(self.slots.len());
        displaced
    }

    /// Oldest first.
    fn iter(&self) -> impl DoubleEndedIterator<Item = &Arc<str>> {
        let cap = self.slots.len();
        let oldest = (self.next + cap - self.len) % cap;
        (0..self.len).filter_map(move |offset| self.slots[(oldest + offset) % cap].as_ref())
    }

    fn clear(&mut self) {
        self.slots.fill(None);
        self.next = 0;
        self.len = 0;
    }
}

/// Bounded in-memory record capture.
///
/// Holds at most `capacity` records; the oldest is dropped when a new one
/// arrives at capacity. Clones share the same buffer, so hand a clone to the
/// logger and keep one to read from.
#[derive(Clone)]
pub struct RingBufferSink {
    buffer: Arc<RwLock<RingBuffer>>,
    capacity: usize,
    eviction_count: Arc<AtomicU64>,
}

impl RingBufferSink {
    /// Capture up to `capacity` records (minimum one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buffer: Arc::new(RwLock::new(RingBuffer::new(capacity))),
            capacity,
            eviction_count: Arc::new(AtomicU64::new(0)),
        }
    }

    #[inline]
    fn read_buffer(&self) -> RwLockReadGuard<'_, RingBuffer> {
        match self.buffer.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[inline]
    fn write_buffer(&self) -> RwLockWriteGuard<'_, RingBuffer> {
        match self.buffer.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Up to `count` records, newest first.
    pub fn get_recent(&self, count: usize) -> Vec<Arc<str>> {
        self.read_buffer().iter().rev().take(count).cloned().collect()
    }

    /// Every held record in write order.
    pub fn get_all(&self) -> Vec<Arc<str>> {
        self.read_buffer().iter().cloned().collect()
    }

    /// Records matching `predicate`, in write order.
    pub fn get_filtered<F>(&self, predicate: F) -> Vec<Arc<str>>
    where
        F: Fn(&str) -> bool,
    {
        self.read_buffer()
            .iter()
            .filter(|record| predicate(record))
            .cloned()
            .collect()
    }

    /// Every held record parsed as JSON, in write order.
    ///
    /// Records that fail to parse are skipped.
    pub fn get_all_json(&self) -> Vec<Value> {
        self.read_buffer()
            .iter()
            .filter_map(|record| serde_json::from_str(record).ok())
            .collect()
    }

    /// Newest record parsed as JSON.
    pub fn last_json(&self) -> Option<Value> {
        let buffer = self.read_buffer();
        let last = buffer.iter().next_back()?;
        serde_json::from_str(last).ok()
    }

    /// Number of held records.
    #[inline]
    pub fn len(&self) -> usize {
        self.read_buffer().len
    }

    /// True when nothing is held.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of held records.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// True when the next record will evict the oldest.
    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }

    /// Records dropped to make room since creation.
    #[inline]
    pub fn eviction_count(&self) -> u64 {
        self.eviction_count.load(Ordering::Relaxed)
    }

    /// Drop every held record. The eviction count is kept.
    pub fn clear(&self) {
        self.write_buffer().clear();
    }
}

impl Sink for RingBufferSink {
    fn write_record(&self, record: &str) -> io::Result<()> {
        let mut buffer = self.write_buffer();
        if buffer.push(Arc::from(record)).is_some() {
            self.eviction_count.fetch_add(1, Ordering::Relaxed);
        }
        Ok(())
    }

    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_sink_appends_newline() {
        let sink = WriterSink::new(Vec::new());
        sink.write_record(r#"{"a":1}"#).unwrap();
        sink.write_record(r#"{"a":2}"#).unwrap();
        sink.flush().unwrap();

        let bytes = sink.into_inner();
        assert_eq!(String::from_utf8(bytes).unwrap(), "{\"a\":1}\n{\"a\":2}\n");
    }

    #[test]
    fn ring_buffer_evicts_oldest() {
        let sink = RingBufferSink::new(3);
        for i in 0..5 {
            sink.write_record(&format!("record {i}")).unwrap();
        }

        assert_eq!(sink.len(), 3);
        assert!(sink.is_full());
        assert_eq!(sink.eviction_count(), 2);

        let all = sink.get_all();
        assert_eq!(all[0].as_ref(), "record 2");
        assert_eq!(all[2].as_ref(), "record 4");

        let recent = sink.get_recent(2);
        assert_eq!(recent[0].as_ref(), "record 4");
        assert_eq!(recent[1].as_ref(), "record 3");
    }

    #[test]
    fn zero_capacity_holds_one() {
        let sink = RingBufferSink::new(0);
        assert_eq!(sink.capacity(), 1);
        sink.write_record("a").unwrap();
        sink.write_record("b").unwrap();
        assert_eq!(sink.get_all()[0].as_ref(), "b");
    }

    #[test]
    fn clone_shares_state() {
        let sink = RingBufferSink::new(8);
        let reader = sink.clone();
        sink.write_record("{}").unwrap();
        assert_eq!(reader.len(), 1);

        reader.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn filtering_and_json_views() {
        let sink = RingBufferSink::new(8);
        sink.write_record(r#"{"level":"INFO"}"#).unwrap();
        sink.write_record("not json").unwrap();
        sink.write_record(r#"{"level":"ERROR"}"#).unwrap();

        let errors = sink.get_filtered(|r| r.contains("ERROR"));
        assert_eq!(errors.len(), 1);

        let parsed = sink.get_all_json();
        assert_eq!(parsed.len(), 2);
        assert_eq!(sink.last_json().unwrap()["level"], "ERROR");
    }

    #[test]
    fn concurrent_writes_stay_bounded() {
        use std::thread;

        let sink = RingBufferSink::new(64);
        let mut handles = Vec::new();
        for t in 0..8 {
            let sink = sink.clone();
            handles.push(thread::spawn(move || {
                for i in 0..100 {
                    sink.write_record(&format!("t{t}-{i}")).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().expect("thread panicked");
        }

        assert_eq!(sink.len(), 64);
        assert_eq!(sink.eviction_count(), 800 - 64);
    }
}
