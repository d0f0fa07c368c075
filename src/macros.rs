//! Call-site helpers for building attribute maps and logging.
//!
//! The level macros take a logger, a message and any number of arguments. Each
//! argument goes through [`LogArg::from`](crate::LogArg), so positional values
//! and `&LogMap` attributes can be mixed freely.
//!
//! # Examples
//!
//! ```
//! use rust_kvlog::prelude::*;
//! use rust_kvlog::{info, log_map};
//!
//! let sink = MemorySink::new();
//! let logger = Logger::new(sink.clone(), LogFlags::SORT);
//!
//! let request = log_map! { "method" => "GET", "status" => 200 };
//! info!(logger, "served %s in %dms", "/health", 3, &request);
//!
//! assert_eq!(
//!     sink.contents(),
//!     "level=\"info\" msg=\"served /health in 3ms\" method=\"GET\" status=\"200\"\n"
//! );
//! ```

/// Build a [`LogMap`](crate::LogMap) from `key => value` pairs.
///
/// ```
/// use rust_kvlog::log_map;
///
/// let map = log_map! { "user" => "alice", "id" => 42 };
/// assert_eq!(map.to_sorted_string(), "id=\"42\" user=\"alice\"");
/// ```
#[macro_export]
macro_rules! log_map {
    () => {
        $crate::LogMap::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::LogMap::new()$(.with($key, $value))+
    };
}

/// Log at an explicit level.
///
/// Unlike [`debug!`](crate::debug), this does not check whether debug is
/// enabled.
///
/// ```
/// # use rust_kvlog::prelude::*;
/// use rust_kvlog::log;
/// let logger = Logger::new(std::io::sink(), LogFlags::NONE);
/// log!(logger, LogLevel::Warning, "retry %d of %d", 3, 5);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $msg:expr $(, $arg:expr)* $(,)?) => {
        $logger.output(
            ::core::option::Option::Some(::core::panic::Location::caller()),
            $level,
            $msg,
            &[$($crate::LogArg::from($arg)),*],
        )
    };
}

/// Log a debug-level message; skipped unless debug is enabled.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $msg:expr $(, $arg:expr)* $(,)?) => {
        $logger.debug($msg, &[$($crate::LogArg::from($arg)),*])
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $msg:expr $(, $arg:expr)* $(,)?) => {
        $logger.info($msg, &[$($crate::LogArg::from($arg)),*])
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warning {
    ($logger:expr, $msg:expr $(, $arg:expr)* $(,)?) => {
        $logger.warning($msg, &[$($crate::LogArg::from($arg)),*])
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $msg:expr $(, $arg:expr)* $(,)?) => {
        $logger.error($msg, &[$($crate::LogArg::from($arg)),*])
    };
}

/// Log a fatal-level message and exit the process with status 1.
///
/// ```no_run
/// # use rust_kvlog::prelude::*;
/// use rust_kvlog::fatal;
/// let logger = Logger::stderr(LogFlags::TIME);
/// fatal!(logger, "unable to bind port %d", 8080);
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $msg:expr $(, $arg:expr)* $(,)?) => {
        $logger.fatal($msg, &[$($crate::LogArg::from($arg)),*])
    };
}

#[cfg(test)]
mod tests {
    use crate::appenders::MemorySink;
    use crate::core::{LogFlags, LogLevel, Logger};

    fn logger() -> (Logger, MemorySink) {
        let sink = MemorySink::new();
        (Logger::new(sink.clone(), LogFlags::SORT), sink)
    }

    #[test]
    fn test_log_map_macro() {
        let empty = log_map!();
        assert!(empty.is_empty());

        let map = log_map! { "b" => 2, "a" => "x", };
        assert_eq!(map.len(), 2);
        assert_eq!(map.to_sorted_string(), "a=\"x\" b=\"2\"");
    }

    #[test]
    fn test_log_macro_reports_invocation_site() {
        let sink = MemorySink::new();
        let logger = Logger::new(sink.clone(), LogFlags::CALLER);
        let line = line!() + 1;
        log!(logger, LogLevel::Error, "code %d", 500);
        assert_eq!(
            sink.contents(),
            format!(
                "level=\"error\" caller=\"{}:{}\" msg=\"code 500\"\n",
                file!(),
                line
            )
        );
    }

    #[test]
    fn test_debug_macro() {
        let (logger, sink) = logger();
        debug!(logger, "hidden %d", 5);
        assert!(sink.is_empty());

        logger.set_debug(true);
        debug!(logger, "count %d", 5);
        assert!(sink.contents().contains("level=\"debug\""));
        assert!(sink.contents().contains("msg=\"count 5\""));
    }

    #[test]
    fn test_level_macros() {
        let (logger, sink) = logger();
        let attrs = log_map! { "k" => "v" };
        info!(logger, "info message");
        warning!(logger, "retry %d of %d", 1, 3, &attrs);
        error!(logger, "code: %d", 500,);
        assert_eq!(
            sink.lines(),
            vec![
                "level=\"info\" msg=\"info message\"",
                "level=\"warning\" msg=\"retry 1 of 3\" k=\"v\"",
                "level=\"error\" msg=\"code: 500\"",
            ]
        );
    }
}
