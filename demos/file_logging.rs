//! File logging example
//!
//! Demonstrates writing lines to a file and reading the metrics afterwards.
//!
//! Run with: cargo run --example file_logging

use rust_kvlog::prelude::*;
use std::sync::Arc;

fn main() -> Result<()> {
    println!("=== Rust KV Log - File Logging Example ===\n");

    let logger = Logger::builder()
        .file("application.log")?
        .flags(LogFlags::TIME | LogFlags::SORT | LogFlags::ESCAPE)
        .timestamp_format(TimestampFormat::Rfc3339)
        .on_error(Arc::new(|err: &LoggerError| eprintln!("log line dropped: {}", err)))
        .build();

    println!("1. Logging to application.log:");
    let db = LogMap::new().with("host", "localhost").with("port", 5432);
    logger.info("Application started", &[]);
    logger.info("Connecting to database", &[LogArg::from(&db)]);
    logger.warning("Using default settings for %d options", &[LogArg::from(3)]);
    logger.error("Plugin \"metrics\" failed to load", &[]);
    logger.info("Application initialization complete", &[]);
    logger.flush()?;

    println!("\n2. Metrics:");
    let metrics = logger.metrics();
    println!("   Lines written: {}", metrics.lines_written());
    println!("   Bytes written: {}", metrics.bytes_written());
    println!("   Dropped lines: {}", metrics.dropped_count());

    println!("\n=== Example completed successfully! ===");
    println!("Check 'application.log' for the logged lines");

    Ok(())
}
