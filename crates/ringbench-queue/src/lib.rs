#![forbid(unsafe_code)]

//! Fixed-capacity circular queue addressed purely by two wrap-around indices.
//!
//! The queue owns `N` storage slots but never fills the last free one: that
//! sentinel slot is what lets index comparison alone tell the two boundary
//! states apart.
//!
//! | Condition                     | Meaning |
//! |-------------------------------|---------|
//! | `write == read`               | empty   |
//! | `next(write) == read`         | full    |
//!
//! There is no element count. Everything the queue reports is derived from
//! the two indices, so `N` slots hold at most `N - 1` live values.
//!
//! # Example
//!
//! ```
//! use ringbench_queue::{ByteQueue, QueueError};
//!
//! let mut q = ByteQueue::new();
//! q.enqueue(10).unwrap();
//! assert_eq!(q.dequeue(), Ok(10));
//! assert_eq!(q.dequeue(), Err(QueueError::Empty));
//! ```

use thiserror::Error;

/// Storage slots of the queue used by the standard suite.
pub const QUEUE_SLOTS: usize = 10;

/// Byte queue with [`QUEUE_SLOTS`] slots (nine usable).
pub type ByteQueue = CircularQueue<u8, QUEUE_SLOTS>;

/// Status returned by a queue operation that could not proceed.
///
/// `Full` and `Empty` are ordinary outcomes that callers are expected to
/// branch on; neither leaves the queue modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    /// No free slot is left for another value.
    #[error("queue is full")]
    Full,
    /// No live value is available to read.
    #[error("queue is empty")]
    Empty,
    /// A fixture index lies outside the storage.
    #[error("index {index} is out of range for {slots} slots")]
    IndexOutOfRange { index: usize, slots: usize },
}

/// FIFO ring over `N` slots of `T`, holding at most `N - 1` values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircularQueue<T, const N: usize> {
    storage: [T; N],
    write: usize,
    read: usize,
}

impl<T: Copy, const N: usize> CircularQueue<T, N> {
    const AT_LEAST_TWO_SLOTS: () = assert!(N >= 2, "a circular queue needs at least two slots");

    /// Create a queue whose storage is pre-filled with `fill`.
    ///
    /// Usable in `static`/`const` context.
    #[must_use]
    pub const fn new_with(fill: T) -> Self {
        let () = Self::AT_LEAST_TWO_SLOTS;
        Self {
            storage: [fill; N],
            write: 0,
            read: 0,
        }
    }

    /// Reset both indices to zero.
    ///
    /// Stored values are left in place; they become unreachable because
    /// reads are gated by the indices.
    pub fn init(&mut self) {
        self.write = 0;
        self.read = 0;
    }

    /// Append `value` at the write index.
    ///
    /// Fails with [`QueueError::Full`] without touching storage or indices
    /// when the next write position would collide with the read index.
    pub fn enqueue(&mut self, value: T) -> Result<(), QueueError> {
        if self.is_full() {
            return Err(QueueError::Full);
        }
        self.storage[self.write] = value;
        self.write = Self::next(self.write);
        Ok(())
    }

    /// Remove and return the oldest value.
    ///
    /// Fails with [`QueueError::Empty`] without moving the read index when
    /// both indices coincide.
    pub fn dequeue(&mut self) -> Result<T, QueueError> {
        if self.is_empty() {
            return Err(QueueError::Empty);
        }
        let value = self.storage[self.read];
        self.read = Self::next(self.read);
        Ok(value)
    }

    /// Oldest value without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<T> {
        if self.is_empty() {
            None
        } else {
            Some(self.storage[self.read])
        }
    }

    /// `true` when no value can be dequeued (`write == read`).
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.write == self.read
    }

    /// `true` when no value can be enqueued (`next(write) == read`).
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        Self::next(self.write) == self.read
    }

    /// Number of live values, derived from the index distance.
    #[must_use]
    pub fn len(&self) -> usize {
        (self.write + N - self.read) % N
    }

    /// Maximum number of live values (`N - 1`).
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    /// Number of storage slots, including the sentinel.
    #[inline]
    #[must_use]
    pub const fn slots(&self) -> usize {
        N
    }

    /// Current write (enqueue) index.
    #[inline]
    #[must_use]
    pub const fn write_index(&self) -> usize {
        self.write
    }

    /// Current read (dequeue) index.
    #[inline]
    #[must_use]
    pub const fn read_index(&self) -> usize {
        self.read
    }

    /// Raw storage, including unreachable slots.
    #[must_use]
    pub fn storage(&self) -> &[T] {
        &self.storage
    }

    /// Force both indices, bypassing enqueue/dequeue.
    ///
    /// Fixture hook for establishing boundary preconditions such as
    /// `write = N - 1, read = 0` (full). Both indices must address storage.
    pub fn set_indices(&mut self, write: usize, read: usize) -> Result<(), QueueError> {
        Self::check_index(write)?;
        Self::check_index(read)?;
        self.write = write;
        self.read = read;
        Ok(())
    }

    /// Overwrite a storage slot directly, bypassing the indices.
    pub fn write_slot(&mut self, index: usize, value: T) -> Result<(), QueueError> {
        Self::check_index(index)?;
        self.storage[index] = value;
        Ok(())
    }

    /// Wrap-around successor of `index`. Wraps at exactly `N`.
    #[inline]
    const fn next(index: usize) -> usize {
        if index + 1 >= N { 0 } else { index + 1 }
    }

    fn check_index(index: usize) -> Result<(), QueueError> {
        if index < N {
            Ok(())
        } else {
            Err(QueueError::IndexOutOfRange { index, slots: N })
        }
    }
}

impl<T: Copy + Default, const N: usize> CircularQueue<T, N> {
    /// Create an empty queue with default-filled storage.
    #[must_use]
    pub fn new() -> Self {
        Self::new_with(T::default())
    }
}

impl<T: Copy + Default, const N: usize> Default for CircularQueue<T, N> {
    fn default() -> Self {
        Self::new()
    }
}
