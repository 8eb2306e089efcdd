// Copyright 2026 the Keyquell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deferred-call queue: schedule, cancel, and drain batched payloads.

use alloc::vec::Vec;
use core::fmt;

/// Opaque handle to a scheduled entry in a [`DeferQueue`].
///
/// Tokens are issued by [`DeferQueue::schedule`] and are never reused by the
/// queue that issued them, so a stale token can always be detected. A token
/// is only meaningful to the queue that created it.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct DeferToken(u64);

impl fmt::Debug for DeferToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DeferToken").field(&self.0).finish()
    }
}

/// One scheduled entry. The payload is taken on cancellation so the slot
/// keeps its position (and sequence number) until the batch drains.
#[derive(Debug)]
struct Entry<T> {
    seq: u64,
    payload: Option<T>,
}

/// A queue of deferred payloads with cancellable entries.
///
/// `DeferQueue` models the "run after the current event batch" primitive of
/// a cooperative event loop. Payloads are yielded in schedule order; an
/// entry that was cancelled before its batch drained is never yielded.
///
/// # Example
///
/// ```
/// use keyquell_defer::DeferQueue;
///
/// let mut queue = DeferQueue::new();
/// let token = queue.schedule(42);
///
/// assert!(queue.is_scheduled(token));
/// assert_eq!(queue.len(), 1);
///
/// // First cancel succeeds, second is a stale no-op.
/// assert!(queue.cancel(token));
/// assert!(!queue.cancel(token));
/// assert!(queue.is_empty());
/// ```
#[derive(Debug)]
pub struct DeferQueue<T> {
    /// Pending entries, in schedule order (sequence numbers ascending).
    entries: Vec<Entry<T>>,
    /// Next sequence number to issue.
    next_seq: u64,
    /// Count of non-cancelled entries.
    live: usize,
}

impl<T> Default for DeferQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DeferQueue<T> {
    /// Creates an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
            live: 0,
        }
    }

    /// Schedules a payload for the next drain and returns its token.
    pub fn schedule(&mut self, payload: T) -> DeferToken {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry {
            seq,
            payload: Some(payload),
        });
        self.live += 1;
        DeferToken(seq)
    }

    /// Cancels a scheduled entry.
    ///
    /// Returns `true` if the entry was still pending and is now withdrawn.
    /// Returns `false` if the token is stale: the entry already drained, was
    /// already cancelled, or was never issued by this queue. Stale
    /// cancellation is a no-op, never an error.
    pub fn cancel(&mut self, token: DeferToken) -> bool {
        match self.entries.binary_search_by_key(&token.0, |e| e.seq) {
            Ok(index) => {
                let cancelled = self.entries[index].payload.take().is_some();
                if cancelled {
                    self.live -= 1;
                    // A fully-cancelled batch can never yield anything, and
                    // hosts may not run a drain at all when nothing is
                    // pending; drop the dead slots now instead of buffering
                    // them until the next drain.
                    if self.live == 0 {
                        self.entries.clear();
                    }
                }
                cancelled
            }
            Err(_) => false,
        }
    }

    /// Returns `true` if the token refers to an entry that is still pending.
    #[must_use]
    pub fn is_scheduled(&self, token: DeferToken) -> bool {
        match self.entries.binary_search_by_key(&token.0, |e| e.seq) {
            Ok(index) => self.entries[index].payload.is_some(),
            Err(_) => false,
        }
    }

    /// Returns the number of pending (non-cancelled) entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live
    }

    /// Returns `true` if no entries are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Removes the current batch and returns an iterator over its surviving
    /// payloads, in schedule order.
    ///
    /// The iterator owns the batch: entries scheduled on the queue while it
    /// is being consumed belong to the *next* batch and are not yielded.
    pub fn drain(&mut self) -> Drain<T> {
        self.live = 0;
        Drain {
            inner: core::mem::take(&mut self.entries).into_iter(),
        }
    }
}

/// Owned iterator over one drained batch of a [`DeferQueue`].
///
/// Returned by [`DeferQueue::drain`]. Yields only payloads that were not
/// cancelled before the drain.
#[derive(Debug)]
pub struct Drain<T> {
    inner: alloc::vec::IntoIter<Entry<T>>,
}

impl<T> Iterator for Drain<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.find_map(|entry| entry.payload)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // Cancelled slots are skipped, so only the upper bound is exact.
        (0, Some(self.inner.len()))
    }
}
