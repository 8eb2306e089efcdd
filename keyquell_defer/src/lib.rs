// Copyright 2026 the Keyquell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyquell Defer: host-agnostic deferred-call queue primitives.
//!
//! Cooperative, single-threaded UI runtimes usually expose some form of
//! "run this after the current batch of queued events has been processed"
//! primitive (a zero-delay timer, an idle callback, a microtask). This crate
//! models that primitive as a plain data structure, [`DeferQueue`], so that
//! code which *schedules* deferred work can be written and tested without a
//! host event loop.
//!
//! The host owns the loop; this crate owns the bookkeeping:
//!
//! 1. Producers call [`DeferQueue::schedule`] and hold on to the returned
//!    [`DeferToken`].
//! 2. Anything that runs before the batch drains may call
//!    [`DeferQueue::cancel`] with that token to withdraw the entry.
//! 3. When the host's deferred callback fires, it calls
//!    [`DeferQueue::drain`] and processes the surviving payloads.
//!
//! ## Minimal example
//!
//! ```
//! use keyquell_defer::DeferQueue;
//!
//! let mut queue = DeferQueue::new();
//!
//! let a = queue.schedule("first");
//! let b = queue.schedule("second");
//!
//! // Something decided "first" should not run after all.
//! assert!(queue.cancel(a));
//!
//! // The host's deferred callback drains the batch.
//! let ran: Vec<_> = queue.drain().collect();
//! assert_eq!(ran, vec!["second"]);
//!
//! // Cancelling after the fact is a harmless no-op.
//! assert!(!queue.cancel(b));
//! ```
//!
//! ## Batch semantics
//!
//! [`DeferQueue::drain`] removes the entries present at the moment of the
//! call and returns an *owned* iterator over them. Entries scheduled while
//! the batch is being processed land in the next batch. This mirrors the
//! ordering guarantee of a cooperative event loop: a deferred call observes
//! every event that was queued before it, and nothing that arrives later can
//! retroactively join its batch.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod queue;

pub use queue::{DeferQueue, DeferToken, Drain};
