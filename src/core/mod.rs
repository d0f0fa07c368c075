//! Core logger types

pub mod buffer_pool;
pub mod error;
pub mod flags;
pub mod log_arg;
pub mod log_level;
pub mod log_map;
pub mod logger;
pub mod metrics;
pub mod printf;
pub mod timestamp;

pub use buffer_pool::{BufferPool, PooledBuffer};
pub use error::{LoggerError, Result};
pub use flags::LogFlags;
pub use log_arg::LogArg;
pub use log_level::LogLevel;
pub use log_map::{FieldValue, LogMap};
pub use logger::{ErrorCallback, Logger, LoggerBuilder, Sink};
pub use metrics::LoggerMetrics;
pub use timestamp::{fixed_clock, system_clock, Clock, TimestampFormat};
