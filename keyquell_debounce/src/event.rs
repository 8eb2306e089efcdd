// Copyright 2026 the Keyquell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed key event vocabulary shared by the filter and the registrar.
//!
//! Hosts report raw keyboard activity as [`KeyEvent`] values; application
//! callbacks receive the same type once the filter has decided an event is
//! genuine. Registration targets either a specific key or the wildcard
//! bucket via [`Target`]. The key type `K` is opaque to this crate: any
//! `Copy + Eq + Hash` identifier works (a keysym enum, a `&'static str`
//! name, an integer code).

/// The logical direction of a key transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// The key went down.
    Press,
    /// The key went up.
    Release,
}

/// A key transition, either raw (from the host) or delivered (to a callback).
///
/// # Example
///
/// ```
/// use keyquell_debounce::event::{Direction, KeyEvent};
///
/// let ev = KeyEvent::press("a");
/// assert_eq!(ev.key, "a");
/// assert_eq!(ev.direction, Direction::Press);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyEvent<K> {
    /// Identifier of the physical key.
    pub key: K,
    /// Whether the key went down or up.
    pub direction: Direction,
}

impl<K> KeyEvent<K> {
    /// Creates an event with the given direction.
    pub const fn new(key: K, direction: Direction) -> Self {
        Self { key, direction }
    }

    /// Creates a press event.
    pub const fn press(key: K) -> Self {
        Self::new(key, Direction::Press)
    }

    /// Creates a release event.
    pub const fn release(key: K) -> Self {
        Self::new(key, Direction::Release)
    }
}

/// What a registration applies to: one key, or every key without its own
/// specific registration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Target<K> {
    /// A specific key.
    Key(K),
    /// The wildcard bucket: any key with no specific binding.
    Any,
}
