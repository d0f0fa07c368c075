//! Main logger implementation
//!
//! Every level method funnels into [`Logger::output`], which renders the line
//! into a pooled buffer and writes it to the sink in one call under the sink
//! lock:
//!
//! ```text
//! time="<ts>" level="<level>" caller="<file>:<line>" msg="<message>" k1="v1" k2="v2"
//! ```
//!
//! `time` and `caller` are present only when their flags are set; the order of
//! fields never changes.

use super::{
    buffer_pool::BufferPool,
    error::{LoggerError, Result},
    flags::LogFlags,
    log_arg::LogArg,
    log_level::LogLevel,
    log_map::write_escaped,
    metrics::LoggerMetrics,
    printf,
    timestamp::{system_clock, Clock, TimestampFormat},
};
use crate::appenders::FileSink;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::cell::Cell;
use std::fmt;
use std::io::{self, Write};
use std::panic::Location;
use std::path::Path;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Destination of rendered lines
pub type Sink = Box<dyn Write + Send>;

/// Called with every error that made the logger drop a line
pub type ErrorCallback = Arc<dyn Fn(&LoggerError) + Send + Sync>;

/// Placeholder rendered when no caller location is available
const UNKNOWN_CALLER: (&str, u32) = ("???", 0);

thread_local! {
    /// Set while an error callback runs on this thread
    static IN_ERROR_CALLBACK: Cell<bool> = const { Cell::new(false) };
}

/// Clears [`IN_ERROR_CALLBACK`] on drop, also when the callback panics
struct CallbackGuard;

impl CallbackGuard {
    fn enter() -> Option<Self> {
        IN_ERROR_CALLBACK.with(|active| {
            if active.replace(true) {
                None
            } else {
                Some(CallbackGuard)
            }
        })
    }
}

impl Drop for CallbackGuard {
    fn drop(&mut self) {
        IN_ERROR_CALLBACK.with(|active| active.set(false));
    }
}

pub struct Logger {
    /// Serializes writes so concurrent lines never interleave
    sink: Mutex<Sink>,
    /// Packed [`LogFlags`]
    flags: AtomicU8,
    pool: Arc<BufferPool>,
    clock: Clock,
    timestamp_format: TimestampFormat,
    metrics: LoggerMetrics,
    on_error: Option<ErrorCallback>,
}

impl Logger {
    /// Create a logger writing to `output` with the given flags
    pub fn new<W: Write + Send + 'static>(output: W, flags: LogFlags) -> Self {
        Self::builder().output(output).flags(flags).build()
    }

    /// Create a logger writing to standard error
    pub fn stderr(flags: LogFlags) -> Self {
        Self::builder().flags(flags).build()
    }

    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub fn flags(&self) -> LogFlags {
        LogFlags::from_bits(self.flags.load(Ordering::Relaxed))
    }

    /// Replace all flags at once; lines in flight see either the old or the new set
    pub fn set_flags(&self, flags: LogFlags) {
        self.flags.store(flags.bits(), Ordering::Relaxed);
    }

    pub fn has_debug(&self) -> bool {
        self.flags().debug_enabled
    }

    pub fn has_timestamp(&self) -> bool {
        self.flags().include_timestamp
    }

    /// Enable or disable debug lines together with the caller field
    pub fn set_debug(&self, enabled: bool) {
        let bits = LogFlags::DEBUG.bits();
        if enabled {
            self.flags.fetch_or(bits, Ordering::Relaxed);
        } else {
            self.flags.fetch_and(!bits, Ordering::Relaxed);
        }
    }

    /// Flip debug mode and return the new state
    pub fn toggle_debug(&self) -> bool {
        let debug = LogFlags::DEBUG.bits();
        let previous = self
            .flags
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |bits| {
                if LogFlags::from_bits(bits).debug_enabled {
                    Some(bits & !debug)
                } else {
                    Some(bits | debug)
                }
            })
            .unwrap_or_else(|bits| bits);
        !LogFlags::from_bits(previous).debug_enabled
    }

    /// Swap the sink; the previous sink is flushed and dropped
    pub fn set_output<W: Write + Send + 'static>(&self, output: W) {
        let mut sink = self.sink.lock();
        // Best effort: the old sink is being discarded anyway
        let _ = sink.flush();
        *sink = Box::new(output);
    }

    pub fn flush(&self) -> Result<()> {
        self.sink.lock().flush()?;
        Ok(())
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Log at debug level; does nothing unless debug is enabled
    #[track_caller]
    pub fn debug(&self, message: &str, args: &[LogArg<'_>]) {
        if self.has_debug() {
            self.output(Some(Location::caller()), LogLevel::Debug, message, args);
        }
    }

    #[track_caller]
    pub fn info(&self, message: &str, args: &[LogArg<'_>]) {
        self.output(Some(Location::caller()), LogLevel::Info, message, args);
    }

    #[track_caller]
    pub fn warning(&self, message: &str, args: &[LogArg<'_>]) {
        self.output(Some(Location::caller()), LogLevel::Warning, message, args);
    }

    #[track_caller]
    pub fn error(&self, message: &str, args: &[LogArg<'_>]) {
        self.output(Some(Location::caller()), LogLevel::Error, message, args);
    }

    /// Log at fatal level, flush the sink and exit the process with status 1
    #[track_caller]
    pub fn fatal(&self, message: &str, args: &[LogArg<'_>]) -> ! {
        self.output(Some(Location::caller()), LogLevel::Fatal, message, args);
        let _ = self.flush();
        std::process::exit(1)
    }

    /// Log at fatal level, then panic with the formatted message
    #[track_caller]
    pub fn panic(&self, message: &str, args: &[LogArg<'_>]) -> ! {
        self.output(Some(Location::caller()), LogLevel::Fatal, message, args);

        let mut text = self.pool.acquire();
        let rendered = match write_message(&mut text, &self.pool, message, args, false) {
            Ok(()) => String::from_utf8_lossy(&text).into_owned(),
            Err(_) => message.trim().to_string(),
        };
        panic!("{}", rendered)
    }

    /// Render one line and write it to the sink.
    ///
    /// `caller` is the location reported in the `caller` field; `None`
    /// renders as `???:0`. Failures are counted in [`metrics`](Self::metrics)
    /// and passed to the error callback, never returned.
    pub fn output(
        &self,
        caller: Option<&Location<'_>>,
        level: LogLevel,
        message: &str,
        args: &[LogArg<'_>],
    ) {
        let flags = self.flags();
        // Taken before anything else so the timestamp is close to the event
        let now = flags.include_timestamp.then(|| (self.clock)());

        let mut buf = self.pool.acquire();
        let line = Line {
            flags,
            now: now.as_ref(),
            caller,
            level,
            message,
            args,
        };
        if let Err(e) = self.render(&mut buf, &line) {
            self.metrics.record_format_error();
            self.report(&LoggerError::formatter("line", e.to_string()));
            return;
        }
        self.write_line(&buf);
    }

    fn render(&self, buf: &mut Vec<u8>, line: &Line<'_>) -> io::Result<()> {
        if let Some(now) = line.now {
            buf.extend_from_slice(b"time=\"");
            self.timestamp_format.write_to(buf, now)?;
            buf.extend_from_slice(b"\" ");
        }

        buf.extend_from_slice(b"level=\"");
        buf.extend_from_slice(line.level.as_str().as_bytes());
        buf.push(b'"');

        if line.flags.include_caller {
            let (file, number) = line
                .caller
                .map_or(UNKNOWN_CALLER, |loc| (loc.file(), loc.line()));
            let file = if line.flags.short_caller {
                short_file(file)
            } else {
                file
            };
            write!(buf, " caller=\"{}:{}\"", file, number)?;
        }

        buf.extend_from_slice(b" msg=\"");
        write_message(
            buf,
            &self.pool,
            line.message,
            line.args,
            line.flags.escape_values,
        )?;
        buf.push(b'"');

        let maps = line
            .args
            .iter()
            .filter_map(LogArg::as_map)
            .filter(|map| !map.is_empty());
        for map in maps {
            buf.push(b' ');
            map.write_entries(buf, line.flags.sort_keys, line.flags.escape_values)?;
        }

        buf.push(b'\n');
        Ok(())
    }

    fn write_line(&self, line: &[u8]) {
        let result = {
            let mut sink = self.sink.lock();
            sink.write_all(line)
        };

        match result {
            Ok(()) => self.metrics.record_written(line.len()),
            Err(e) => {
                self.metrics.record_write_error();
                let message = e.to_string();
                self.report(&LoggerError::io_operation("writing log line", message, e));
            }
        }
    }

    /// Hand `err` to the error callback.
    ///
    /// Failures raised while a callback is already running on this thread
    /// are only counted; reporting them would recurse through the callback.
    fn report(&self, err: &LoggerError) {
        let Some(ref callback) = self.on_error else {
            return;
        };
        if let Some(_guard) = CallbackGuard::enter() {
            callback(err);
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::stderr(LogFlags::NONE)
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        let _ = self.sink.get_mut().flush();
    }
}

/// Each `write` becomes one info line with `buf` as its message, so other
/// writers can be redirected into the log.
///
/// ```
/// use rust_kvlog::{LogFlags, Logger, MemorySink};
/// use std::io::Write;
///
/// let sink = MemorySink::new();
/// let logger = Logger::new(sink.clone(), LogFlags::NONE);
/// writeln!(&logger, "listening on {}", 8080).unwrap();
/// assert_eq!(sink.contents(), "level=\"info\" msg=\"listening on 8080\"\n");
/// ```
impl Write for &Logger {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let text = String::from_utf8_lossy(buf);
        self.output(None, LogLevel::Info, &text, &[]);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sink.lock().flush()
    }

    /// Formats the whole message first so `write!` produces a single line
    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        match args.as_str() {
            Some(text) => self.write_all(text.as_bytes()),
            None => self.write_all(args.to_string().as_bytes()),
        }
    }
}

impl Write for Logger {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Write::write(&mut &*self, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Write::flush(&mut &*self)
    }

    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        Write::write_fmt(&mut &*self, args)
    }
}

/// Inputs of one rendered line
struct Line<'a> {
    flags: LogFlags,
    now: Option<&'a DateTime<Utc>>,
    caller: Option<&'a Location<'a>>,
    level: LogLevel,
    message: &'a str,
    args: &'a [LogArg<'a>],
}

/// Append the trimmed message, printf-formatted when positional values exist
fn write_message(
    buf: &mut Vec<u8>,
    pool: &BufferPool,
    message: &str,
    args: &[LogArg<'_>],
    escape: bool,
) -> io::Result<()> {
    let mut values = args.iter().filter_map(LogArg::as_value).peekable();
    if values.peek().is_none() {
        return write_text(buf, message.trim(), escape);
    }

    let mut scratch = pool.acquire();
    printf::sprintf(&mut *scratch, message, values)?;
    let formatted = String::from_utf8_lossy(&scratch);
    write_text(buf, formatted.trim(), escape)
}

fn write_text(buf: &mut Vec<u8>, text: &str, escape: bool) -> io::Result<()> {
    if escape {
        write_escaped(buf, text)
    } else {
        buf.extend_from_slice(text.as_bytes());
        Ok(())
    }
}

fn short_file(file: &str) -> &str {
    file.rsplit(['/', '\\']).next().unwrap_or(file)
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_kvlog::prelude::*;
///
/// let sink = MemorySink::new();
/// let logger = Logger::builder()
///     .output(sink.clone())
///     .flags(LogFlags::SORT)
///     .build();
///
/// logger.info("started", &[LogArg::from(&LogMap::new().with("port", 8080))]);
/// assert_eq!(sink.contents(), "level=\"info\" msg=\"started\" port=\"8080\"\n");
/// ```
pub struct LoggerBuilder {
    output: Option<Sink>,
    flags: LogFlags,
    clock: Option<Clock>,
    timestamp_format: TimestampFormat,
    pool: Option<Arc<BufferPool>>,
    on_error: Option<ErrorCallback>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            output: None,
            flags: LogFlags::NONE,
            clock: None,
            timestamp_format: TimestampFormat::default(),
            pool: None,
            on_error: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn flags(mut self, flags: LogFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Write to `output`; standard error if never called
    #[must_use = "builder methods return a new value"]
    pub fn output<W: Write + Send + 'static>(mut self, output: W) -> Self {
        self.output = Some(Box::new(output));
        self
    }

    /// Append to the file at `path`, creating it if needed
    pub fn file(self, path: impl AsRef<Path>) -> Result<Self> {
        Ok(self.output(FileSink::open(path)?))
    }

    /// Replace the clock used for the `time` field
    #[must_use = "builder methods return a new value"]
    pub fn clock(mut self, clock: Clock) -> Self {
        self.clock = Some(clock);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Use a dedicated buffer pool instead of the process-wide one
    #[must_use = "builder methods return a new value"]
    pub fn buffer_pool(mut self, pool: Arc<BufferPool>) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Be notified of lines dropped because of write or render failures
    ///
    /// The callback runs outside the sink lock, so it may log through the
    /// same logger. Lines it drops are counted in the metrics but not
    /// reported to the callback again.
    #[must_use = "builder methods return a new value"]
    pub fn on_error(mut self, callback: ErrorCallback) -> Self {
        self.on_error = Some(callback);
        self
    }

    pub fn build(self) -> Logger {
        Logger {
            sink: Mutex::new(self.output.unwrap_or_else(|| Box::new(io::stderr()))),
            flags: AtomicU8::new(self.flags.bits()),
            pool: self.pool.unwrap_or_else(BufferPool::shared),
            clock: self.clock.unwrap_or_else(system_clock),
            timestamp_format: self.timestamp_format,
            metrics: LoggerMetrics::new(),
            on_error: self.on_error,
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
