//! # Rust KV Log
//!
//! A small structured logger that writes one `key="value"` line per call.
//!
//! ```text
//! time="2025-01-08T10:30:45.123456" level="info" caller="src/main.rs:12" msg="served" path="/health"
//! ```
//!
//! ## Features
//!
//! - **Fixed field order**: time, level, caller, msg, then attributes
//! - **Printf messages**: positional values fill `%d`, `%s`, `%v`... placeholders
//! - **Attribute maps**: written as given or in sorted key order
//! - **Runtime flags**: switched atomically while other threads log
//! - **Pooled buffers**: each line is rendered into a reused buffer and written once
//!
//! ## Example
//!
//! ```
//! use rust_kvlog::prelude::*;
//!
//! let sink = MemorySink::new();
//! let logger = Logger::new(sink.clone(), LogFlags::SORT);
//!
//! let attrs = LogMap::new().with("user", "alice").with("id", 42);
//! logger.info("login %s", &[LogArg::from("ok"), LogArg::from(&attrs)]);
//!
//! assert_eq!(
//!     sink.contents(),
//!     "level=\"info\" msg=\"login ok\" id=\"42\" user=\"alice\"\n"
//! );
//! ```

pub mod appenders;
pub mod core;
pub mod global;
pub mod macros;

pub use crate::core::printf;

pub mod prelude {
    pub use crate::appenders::{FileSink, MemorySink};
    pub use crate::core::{
        FieldValue, LogArg, LogFlags, LogLevel, LogMap, Logger, LoggerBuilder, LoggerError,
        LoggerMetrics, Result, TimestampFormat,
    };
}

pub use crate::appenders::{FileSink, MemorySink};
pub use crate::core::{
    fixed_clock, system_clock, BufferPool, Clock, ErrorCallback, FieldValue, LogArg, LogFlags,
    LogLevel, LogMap, Logger, LoggerBuilder, LoggerError, LoggerMetrics, PooledBuffer, Result,
    Sink, TimestampFormat,
};
