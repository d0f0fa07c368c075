//! Reusable line buffers
//!
//! Rendering a line needs a scratch `Vec<u8>`. Instead of allocating one per
//! call, the logger checks one out of a [`BufferPool`] and the returned
//! [`PooledBuffer`] guard hands it back when dropped, including when the
//! rendering code unwinds.

use parking_lot::Mutex;
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, OnceLock};

/// Capacity of freshly allocated buffers
pub const DEFAULT_BUFFER_CAPACITY: usize = 128;

/// Number of idle buffers the shared pool keeps around
pub const DEFAULT_MAX_RETAINED: usize = 64;

/// Buffers that grew beyond this are dropped instead of pooled
pub const MAX_RETAINED_CAPACITY: usize = 64 * 1024;

static SHARED_POOL: OnceLock<Arc<BufferPool>> = OnceLock::new();

/// Thread-safe free-list of growable byte buffers.
///
/// # Example
///
/// ```
/// use rust_kvlog::BufferPool;
///
/// let pool = BufferPool::new(128, 4);
/// {
///     let mut buf = pool.acquire();
///     buf.extend_from_slice(b"level=\"info\"");
/// }
/// // The buffer went back to the pool, emptied
/// assert_eq!(pool.available(), 1);
/// assert!(pool.acquire().is_empty());
/// ```
#[derive(Debug)]
pub struct BufferPool {
    free: Mutex<Vec<Vec<u8>>>,
    initial_capacity: usize,
    max_retained: usize,
}

impl BufferPool {
    #[must_use]
    pub fn new(initial_capacity: usize, max_retained: usize) -> Self {
        Self {
            free: Mutex::new(Vec::with_capacity(max_retained)),
            initial_capacity,
            max_retained,
        }
    }

    /// Process-wide pool shared by every logger that was not given its own
    pub fn shared() -> Arc<BufferPool> {
        Arc::clone(SHARED_POOL.get_or_init(|| {
            Arc::new(BufferPool::new(DEFAULT_BUFFER_CAPACITY, DEFAULT_MAX_RETAINED))
        }))
    }

    /// Check out an empty buffer, allocating one if none is idle
    pub fn acquire(&self) -> PooledBuffer<'_> {
        let buf = self
            .free
            .lock()
            .pop()
            .unwrap_or_else(|| Vec::with_capacity(self.initial_capacity));

        PooledBuffer { pool: self, buf }
    }

    /// Number of idle buffers currently held
    pub fn available(&self) -> usize {
        self.free.lock().len()
    }

    fn release(&self, mut buf: Vec<u8>) {
        if buf.capacity() > MAX_RETAINED_CAPACITY {
            return;
        }
        buf.clear();

        let mut free = self.free.lock();
        if free.len() < self.max_retained {
            free.push(buf);
        }
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_CAPACITY, DEFAULT_MAX_RETAINED)
    }
}

/// A buffer checked out of a [`BufferPool`]; returned to it on drop.
pub struct PooledBuffer<'a> {
    pool: &'a BufferPool,
    buf: Vec<u8>,
}

impl Deref for PooledBuffer<'_> {
    type Target = Vec<u8>;

    fn deref(&self) -> &Vec<u8> {
        &self.buf
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.buf
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.buf));
    }
}
