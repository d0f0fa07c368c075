//! Process-wide default logger
//!
//! Nothing is installed at load time. [`init`] installs a configured logger
//! once; if it is never called, the first use creates a stderr logger with
//! [`LogFlags::NONE`].
//!
//! ```
//! use rust_kvlog::{global, LogArg, LogMap};
//!
//! let request = LogMap::new().with("path", "/health");
//! global::info("served in %dms", &[LogArg::from(3), LogArg::from(&request)]);
//! ```

use crate::core::{LogArg, LogFlags, LogLevel, Logger, LoggerError, Result};
use std::io::Write;
use std::panic::Location;
use std::sync::OnceLock;

static DEFAULT: OnceLock<Logger> = OnceLock::new();

/// Install `logger` as the process-wide default.
///
/// Fails with [`LoggerError::AlreadyInitialized`] if a logger was installed
/// before, or if the default was already used and lazily created.
pub fn init(logger: Logger) -> Result<()> {
    DEFAULT
        .set(logger)
        .map_err(|_| LoggerError::AlreadyInitialized)
}

/// The process-wide logger
pub fn logger() -> &'static Logger {
    DEFAULT.get_or_init(Logger::default)
}

pub fn output(caller: Option<&Location<'_>>, level: LogLevel, message: &str, args: &[LogArg<'_>]) {
    logger().output(caller, level, message, args);
}

#[track_caller]
pub fn debug(message: &str, args: &[LogArg<'_>]) {
    logger().debug(message, args);
}

#[track_caller]
pub fn info(message: &str, args: &[LogArg<'_>]) {
    logger().info(message, args);
}

#[track_caller]
pub fn warning(message: &str, args: &[LogArg<'_>]) {
    logger().warning(message, args);
}

#[track_caller]
pub fn error(message: &str, args: &[LogArg<'_>]) {
    logger().error(message, args);
}

#[track_caller]
pub fn fatal(message: &str, args: &[LogArg<'_>]) -> ! {
    logger().fatal(message, args)
}

#[track_caller]
pub fn panic(message: &str, args: &[LogArg<'_>]) -> ! {
    logger().panic(message, args)
}

pub fn flags() -> LogFlags {
    logger().flags()
}

pub fn set_flags(flags: LogFlags) {
    logger().set_flags(flags);
}

pub fn has_debug() -> bool {
    logger().has_debug()
}

pub fn has_timestamp() -> bool {
    logger().has_timestamp()
}

pub fn set_debug(enabled: bool) {
    logger().set_debug(enabled);
}

pub fn toggle_debug() -> bool {
    logger().toggle_debug()
}

pub fn set_output<W: Write + Send + 'static>(output: W) {
    logger().set_output(output);
}

pub fn flush() -> Result<()> {
    logger().flush()
}
