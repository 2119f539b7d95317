use std::fmt;
use std::ops::{Deref, DerefMut};

use parking_lot::{Mutex, const_mutex};

/// Buffers that grew past this capacity go back to the allocator.
pub const MAX_RETAINED_CAPACITY: usize = 64 << 10;

/// Idle buffers kept per pool.
pub const MAX_IDLE_BUFFERS: usize = 16;

static GLOBAL: BufferPool = BufferPool::new();

/// The process-wide pool the scanners draw from.
#[must_use]
pub fn global() -> &'static BufferPool {
    &GLOBAL
}

/// A bounded pool of scratch buffers.
///
/// Scanning a large file only needs one tag's worth of buffer at a time,
/// and a program that scans many files would otherwise allocate that
/// buffer again per file. Buffers are handed out as [`PooledBuffer`]
/// guards that come back to the pool when dropped, whichever way the
/// scan ends.
///
/// ```text
///   acquire ──► reuse an idle buffer, or allocate
///   drop    ──► clear, then keep it if capacity ≤ MAX_RETAINED_CAPACITY
///               and fewer than MAX_IDLE_BUFFERS are idle
/// ```
#[derive(Debug)]
pub struct BufferPool {
    idle: Mutex<Vec<Vec<u8>>>,
}

impl BufferPool {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            idle: const_mutex(Vec::new()),
        }
    }

    /// Take an empty buffer with at least `capacity` bytes reserved.
    pub fn acquire(&self, capacity: usize) -> PooledBuffer<'_> {
        let mut buf = self.idle.lock().pop().unwrap_or_default();
        buf.reserve(capacity);

        PooledBuffer { pool: self, buf }
    }

    /// Number of buffers waiting to be reused.
    #[must_use]
    pub fn idle_count(&self) -> usize {
        self.idle.lock().len()
    }

    fn release(&self, mut buf: Vec<u8>) {
        if buf.capacity() == 0 || buf.capacity() > MAX_RETAINED_CAPACITY {
            return;
        }

        buf.clear();
        let mut idle = self.idle.lock();
        if idle.len() < MAX_IDLE_BUFFERS {
            idle.push(buf);
        }
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new()
    }
}

/// A scratch buffer on loan from a [`BufferPool`].
pub struct PooledBuffer<'a> {
    pool: &'a BufferPool,
    buf: Vec<u8>,
}

impl fmt::Debug for PooledBuffer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PooledBuffer")
            .field("len", &self.buf.len())
            .field("capacity", &self.buf.capacity())
            .finish_non_exhaustive()
    }
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
