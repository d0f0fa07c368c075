//! Sink implementations
//!
//! Any `Write + Send` value can be a sink; these cover the common cases.

pub mod file;
pub mod memory;

pub use file::FileSink;
pub use memory::MemorySink;
