// Copyright 2026 the Keyquell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Repeat filter: collapse a noisy auto-repeat key stream into one genuine
//! press and one genuine release per physical keystroke.
//!
//! While a key is held, hosts re-fire key-down notifications at the OS
//! repeat rate, and some interleave a synthetic key-up before each repeated
//! key-down. The filter reconciles that stream without guessing any timer
//! duration: a raw release is never delivered synchronously, it is parked on
//! a [`DeferQueue`] until the current event batch drains. A repeat press
//! arriving in the same batch cancels the parked release, collapsing the
//! synthetic up/down pair into silence; a genuine release has no following
//! press and survives to the drain.
//!
//! ## Usage
//!
//! 1) Feed every raw key-down into [`RepeatFilter::press`]; deliver a press
//!    to the application only when it returns `true`.
//! 2) Feed every raw key-up into [`RepeatFilter::release`]; deliver nothing
//!    yet.
//! 3) Once the host's queued events have drained (a zero-delay deferred
//!    callback), call [`RepeatFilter::drain_releases`] and deliver a release
//!    for every key it yields.
//!
//! ## Minimal example
//!
//! ```
//! use keyquell_debounce::filter::RepeatFilter;
//!
//! let mut filter = RepeatFilter::new();
//!
//! // Key goes down: genuine press.
//! assert!(filter.press('a'));
//!
//! // One auto-repeat tick arrives as a synthetic up/down pair.
//! filter.release('a');
//! assert!(!filter.press('a')); // cancels the parked release
//!
//! // The key actually comes up, then the batch drains.
//! filter.release('a');
//! let mut released = Vec::new();
//! filter.drain_releases(|key| released.push(key));
//! assert_eq!(released, vec!['a']);
//! assert!(!filter.is_pressed('a'));
//! ```

use core::fmt;
use core::hash::Hash;

use hashbrown::{HashMap, HashSet};
use keyquell_defer::{DeferQueue, DeferToken};

/// Per-key debouncing state machine over raw press/release notifications.
///
/// The filter runs one algorithm for every key it sees; which callback (if
/// any) a genuine transition maps to is the caller's concern. State per key
/// is two bits of bookkeeping:
///
/// - whether a genuine press has been delivered and not yet matched by a
///   genuine release, and
/// - at most one outstanding deferred-release token, cancelled before it is
///   ever replaced.
pub struct RepeatFilter<K>
where
    K: Copy + Eq + Hash,
{
    /// Keys between a delivered press and its matching delivered release.
    pressed: HashSet<K>,
    /// Outstanding deferred-release token per key.
    pending: HashMap<K, DeferToken>,
    /// Parked releases, drained once the host's event batch has been
    /// processed.
    queue: DeferQueue<K>,
}

impl<K> fmt::Debug for RepeatFilter<K>
where
    K: Copy + Eq + Hash + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepeatFilter")
            .field("pressed", &self.pressed)
            .field("pending", &self.pending)
            .field("queue", &self.queue)
            .finish()
    }
}

impl<K> Default for RepeatFilter<K>
where
    K: Copy + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> RepeatFilter<K>
where
    K: Copy + Eq + Hash,
{
    /// Creates a filter with no keys tracked.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pressed: HashSet::new(),
            pending: HashMap::new(),
            queue: DeferQueue::new(),
        }
    }

    /// Processes a raw key-down notification.
    ///
    /// Returns `true` exactly when this is a genuine press that should be
    /// delivered to the application:
    ///
    /// - A deferred release is outstanding for `key`: this down is the
    ///   second half of a repeat-induced synthetic up/down pair. The parked
    ///   release is cancelled and the press is suppressed (`false`).
    /// - No deferred release and the key is not currently pressed: genuine
    ///   press (`true`).
    /// - Already pressed: ordinary OS auto-repeat, suppressed (`false`).
    pub fn press(&mut self, key: K) -> bool {
        if let Some(token) = self.pending.remove(&key) {
            self.queue.cancel(token);
            return false;
        }
        self.pressed.insert(key)
    }

    /// Processes a raw key-up notification.
    ///
    /// The release is never delivered synchronously; it is parked until
    /// [`drain_releases`](Self::drain_releases). If a release is already
    /// parked for `key`, it is cancelled before the new one is recorded, so
    /// at most one deferred release is outstanding per key.
    pub fn release(&mut self, key: K) {
        if let Some(old) = self.pending.remove(&key) {
            self.queue.cancel(old);
        }
        let token = self.queue.schedule(key);
        self.pending.insert(key, token);
    }

    /// Delivers the parked releases that survived the current batch.
    ///
    /// Call this once the host has processed all queued raw events (its
    /// zero-delay deferred callback). For each surviving key, the pending
    /// token is cleared, the key is marked not pressed, and `deliver` is
    /// invoked. Releases parked during delivery belong to the next batch.
    pub fn drain_releases(&mut self, mut deliver: impl FnMut(K)) {
        for key in self.queue.drain() {
            self.pending.remove(&key);
            self.pressed.remove(&key);
            deliver(key);
        }
    }

    /// Returns `true` if a genuine press for `key` has been delivered and
    /// its genuine release has not.
    #[must_use]
    pub fn is_pressed(&self, key: K) -> bool {
        self.pressed.contains(&key)
    }

    /// Returns `true` if a deferred release is outstanding for `key`.
    #[must_use]
    pub fn has_pending_release(&self, key: K) -> bool {
        self.pending.contains_key(&key)
    }

    /// Returns the number of keys with an outstanding deferred release.
    #[must_use]
    pub fn pending_release_count(&self) -> usize {
        self.pending.len()
    }
}
