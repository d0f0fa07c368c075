//! Logger metrics for observability
//!
//! Level methods never return errors, so failures to render or write a line
//! are only visible through these counters (and the optional error callback).

use std::sync::atomic::{AtomicU64, Ordering};

/// # Example
///
/// ```
/// use rust_kvlog::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_written(42);
/// metrics.record_write_error();
///
/// assert_eq!(metrics.lines_written(), 1);
/// assert_eq!(metrics.bytes_written(), 42);
/// assert_eq!(metrics.write_errors(), 1);
/// ```
#[derive(Debug, Default)]
pub struct LoggerMetrics {
    /// Lines handed to the sink successfully
    lines_written: AtomicU64,

    /// Bytes handed to the sink successfully
    bytes_written: AtomicU64,

    /// Lines lost because the sink returned an error
    write_errors: AtomicU64,

    /// Lines lost because rendering failed
    format_errors: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            lines_written: AtomicU64::new(0),
            bytes_written: AtomicU64::new(0),
            write_errors: AtomicU64::new(0),
            format_errors: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn lines_written(&self) -> u64 {
        self.lines_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_errors(&self) -> u64 {
        self.write_errors.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn format_errors(&self) -> u64 {
        self.format_errors.load(Ordering::Relaxed)
    }

    /// Lines lost for any reason
    #[inline]
    pub fn dropped_count(&self) -> u64 {
        self.write_errors() + self.format_errors()
    }

    #[inline]
    pub fn record_written(&self, bytes: usize) {
        self.lines_written.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_write_error(&self) -> u64 {
        self.write_errors.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_format_error(&self) -> u64 {
        self.format_errors.fetch_add(1, Ordering::Relaxed)
    }

    /// Percentage (0.0 - 100.0) of attempted lines that were lost
    ///
    /// Returns 0.0 if nothing has been logged yet.
    pub fn error_rate(&self) -> f64 {
        let dropped = self.dropped_count() as f64;
        let total = self.lines_written() as f64 + dropped;
        if total == 0.0 {
            0.0
        } else {
            (dropped / total) * 100.0
        }
    }

    pub fn reset(&self) {
        self.lines_written.store(0, Ordering::Relaxed);
        self.bytes_written.store(0, Ordering::Relaxed);
        self.write_errors.store(0, Ordering::Relaxed);
        self.format_errors.store(0, Ordering::Relaxed);
    }
}
