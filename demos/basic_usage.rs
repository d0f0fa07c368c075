//! Basic logger usage example
//!
//! Demonstrates levels, attribute maps and runtime flag changes on stderr.
//!
//! Run with: cargo run --example basic_usage

use rust_kvlog::prelude::*;
use rust_kvlog::{global, info, log_map, warning};

fn main() -> Result<()> {
    println!("=== Rust KV Log - Basic Usage Example ===\n");

    let logger = Logger::stderr(LogFlags::TIME | LogFlags::SORT);

    println!("1. Logging at different levels:");
    logger.debug("This debug message is hidden", &[]);
    logger.info("This is an info message", &[]);
    logger.warning("This is a warning message", &[]);
    logger.error("This is an error message", &[]);

    println!("\n2. Positional values and attributes:");
    let request = log_map! { "method" => "GET", "path" => "/health", "status" => 200 };
    info!(logger, "served request in %dms", 3, &request);
    warning!(logger, "retry %d of %d", 2, 5, &log_map! { "backoff_ms" => 250 });

    println!("\n3. Enabling debug output at runtime:");
    logger.set_debug(true);
    logger.debug("Debug lines now carry the caller", &[]);
    logger.set_flags(logger.flags() | LogFlags::SHORT_CALLER);
    logger.debug("Caller shortened to the file name", &[]);

    println!("\n4. The process-wide logger:");
    global::init(Logger::stderr("time|sort".parse()?))?;
    global::info("hello from the default logger", &[LogArg::from(&request)]);

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
