// Copyright 2026 the Keyquell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyquell Debounce: one press and one release per physical keystroke.
//!
//! Desktop toolkits report noisy keyboard streams: while a key is held, the
//! host re-fires key-down notifications at the OS auto-repeat rate, and many
//! hosts interleave a synthetic key-up before each repeated key-down.
//! Application code that wants "the key actually went down" and "the key
//! actually came up" — games, shortcut handlers, musical keyboards — has to
//! reconcile that stream itself. This crate does the reconciliation:
//!
//! - [`filter::RepeatFilter`]: the state machine. Classifies raw press and
//!   release notifications as genuine or repeat noise, with no callbacks
//!   attached.
//! - [`debouncer::Debouncer`]: the registrar. Stores per-key and wildcard
//!   callbacks, feeds raw events through the filter, and invokes exactly one
//!   press and one release callback per physical keystroke. Registrations
//!   can opt out of filtering per key and direction.
//! - [`event`]: the typed vocabulary ([`event::KeyEvent`],
//!   [`event::Direction`], [`event::Target`]) shared by both.
//!
//! ## How the suppression works
//!
//! No timer duration is guessed. A raw release is parked on a deferred
//! queue ([`keyquell_defer::DeferQueue`]) instead of being delivered; the
//! host runs the drain once its currently queued events have been
//! processed (a zero-delay deferred callback). If the release was the
//! synthetic half of an auto-repeat tick, the matching synthetic press
//! arrives in the same batch and cancels it before the drain — the pair
//! collapses into silence. A genuine release has no following press, so it
//! survives to the drain and is delivered exactly once.
//!
//! ## Host integration
//!
//! The crate knows nothing about widgets, windows, or any particular
//! toolkit. A window wrapper owns a [`debouncer::Debouncer`] and does three
//! things:
//!
//! 1. Forward every raw key notification into
//!    [`Debouncer::raw_event`](debouncer::Debouncer::raw_event).
//! 2. After ingesting a batch, if
//!    [`Debouncer::has_deferred_releases`](debouncer::Debouncer::has_deferred_releases),
//!    schedule the toolkit's zero-delay deferred call (e.g. an idle
//!    callback) to run
//!    [`Debouncer::drain_deferred`](debouncer::Debouncer::drain_deferred).
//! 3. Expose [`Debouncer::register`](debouncer::Debouncer::register) /
//!    [`Debouncer::register_raw`](debouncer::Debouncer::register_raw) to
//!    application code.
//!
//! ## Minimal example
//!
//! ```
//! use keyquell_debounce::{Debouncer, Direction, KeyEvent, Target};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let log = Rc::new(RefCell::new(Vec::new()));
//! let mut debouncer: Debouncer<char> = Debouncer::new();
//!
//! for direction in [Direction::Press, Direction::Release] {
//!     let log = Rc::clone(&log);
//!     debouncer.register(Target::Key('a'), direction, move |ev| {
//!         log.borrow_mut().push((ev.key, ev.direction));
//!     });
//! }
//!
//! // The host reports a held key: press, two repeat up/down pairs, then
//! // the genuine release in a later batch.
//! debouncer.raw_event(KeyEvent::press('a'));
//! debouncer.raw_event(KeyEvent::release('a'));
//! debouncer.raw_event(KeyEvent::press('a'));
//! debouncer.raw_event(KeyEvent::release('a'));
//! debouncer.raw_event(KeyEvent::press('a'));
//! debouncer.drain_deferred();
//!
//! debouncer.raw_event(KeyEvent::release('a'));
//! debouncer.drain_deferred();
//!
//! assert_eq!(
//!     *log.borrow(),
//!     vec![('a', Direction::Press), ('a', Direction::Release)]
//! );
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod debouncer;
pub mod event;
pub mod filter;

pub use debouncer::{Debouncer, KeyCallback};
pub use event::{Direction, KeyEvent, Target};
pub use filter::RepeatFilter;
