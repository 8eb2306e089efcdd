// Copyright 2026 the Keyquell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registrar and dispatch: per-key and wildcard callbacks over the filter.
//!
//! [`Debouncer`] is what a widget or window wrapper owns. Application code
//! registers one callback per `(target, direction)`; the wrapper forwards
//! every raw host notification into [`Debouncer::raw_event`] and wires the
//! host's zero-delay deferred callback to [`Debouncer::drain_deferred`].
//! The filter decides which transitions are genuine; the registrar decides
//! which callback they map to.
//!
//! Resolution picks the specific binding for the event's key when one
//! exists, otherwise the wildcard binding, otherwise the event is dropped.
//! A key with a specific binding never falls back to the wildcard, even for
//! a direction the specific binding leaves unregistered.
//!
//! ## Minimal example
//!
//! ```
//! use keyquell_debounce::debouncer::Debouncer;
//! use keyquell_debounce::event::{Direction, KeyEvent, Target};
//!
//! let mut debouncer: Debouncer<&str> = Debouncer::new();
//! debouncer.register(Target::Key("a"), Direction::Press, |ev| {
//!     // exactly once per physical press of "a"
//!     assert_eq!(ev.key, "a");
//! });
//!
//! // One physical press with two auto-repeat up/down pairs.
//! debouncer.raw_event(KeyEvent::press("a"));
//! debouncer.raw_event(KeyEvent::release("a"));
//! debouncer.raw_event(KeyEvent::press("a"));
//! debouncer.raw_event(KeyEvent::release("a"));
//! debouncer.raw_event(KeyEvent::press("a"));
//! debouncer.drain_deferred();
//!
//! assert!(debouncer.is_pressed("a"));
//! ```

use core::fmt;
use core::hash::Hash;

use alloc::boxed::Box;
use hashbrown::HashMap;

use crate::event::{Direction, KeyEvent, Target};
use crate::filter::RepeatFilter;

/// Boxed callback invoked with each delivered key transition.
pub type KeyCallback<K> = Box<dyn FnMut(&KeyEvent<K>)>;

/// One registered callback plus whether it goes through the filter.
struct Hook<K> {
    callback: KeyCallback<K>,
    debounce: bool,
}

/// Callbacks for one target, registered per direction independently.
struct Binding<K> {
    press: Option<Hook<K>>,
    release: Option<Hook<K>>,
}

impl<K> Binding<K> {
    const fn empty() -> Self {
        Self {
            press: None,
            release: None,
        }
    }

    fn is_bound(&self) -> bool {
        self.press.is_some() || self.release.is_some()
    }

    fn hook(&self, direction: Direction) -> Option<&Hook<K>> {
        match direction {
            Direction::Press => self.press.as_ref(),
            Direction::Release => self.release.as_ref(),
        }
    }

    fn hook_mut(&mut self, direction: Direction) -> Option<&mut Hook<K>> {
        match direction {
            Direction::Press => self.press.as_mut(),
            Direction::Release => self.release.as_mut(),
        }
    }

    fn install(&mut self, direction: Direction, hook: Hook<K>) {
        match direction {
            Direction::Press => self.press = Some(hook),
            Direction::Release => self.release = Some(hook),
        }
    }
}

/// Key-event registrar that delivers one press and one release callback per
/// physical keystroke.
///
/// Owns a [`RepeatFilter`] (composition, not inheritance: the widget owns
/// the debouncer, the debouncer owns the filter). Bindings are looked up by
/// typed key, decided once per event. Registering a callback for a
/// `(target, direction)` that already has one replaces it; the other
/// direction is unaffected. Events for targets with no binding at all are
/// dropped silently.
pub struct Debouncer<K>
where
    K: Copy + Eq + Hash,
{
    filter: RepeatFilter<K>,
    bindings: HashMap<K, Binding<K>>,
    generic: Binding<K>,
}

impl<K> fmt::Debug for Debouncer<K>
where
    K: Copy + Eq + Hash + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debouncer")
            .field("filter", &self.filter)
            .field("specific_bindings", &self.bindings.len())
            .field("generic_bound", &self.generic.is_bound())
            .finish()
    }
}

impl<K> Default for Debouncer<K>
where
    K: Copy + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Debouncer<K>
where
    K: Copy + Eq + Hash,
{
    /// Creates a debouncer with no registrations.
    #[must_use]
    pub fn new() -> Self {
        Self {
            filter: RepeatFilter::new(),
            bindings: HashMap::new(),
            generic: Binding::empty(),
        }
    }

    /// Registers a debounced callback for `(target, direction)`.
    ///
    /// The callback fires once per genuine transition; auto-repeat noise is
    /// suppressed. Any callback previously registered for the same target
    /// and direction is replaced.
    pub fn register(
        &mut self,
        target: Target<K>,
        direction: Direction,
        callback: impl FnMut(&KeyEvent<K>) + 'static,
    ) {
        self.install(target, direction, Box::new(callback), true);
    }

    /// Registers a pass-through callback for `(target, direction)`.
    ///
    /// The callback fires on every raw notification, repeats included; no
    /// filtering and no state tracking is applied for it.
    pub fn register_raw(
        &mut self,
        target: Target<K>,
        direction: Direction,
        callback: impl FnMut(&KeyEvent<K>) + 'static,
    ) {
        self.install(target, direction, Box::new(callback), false);
    }

    fn install(
        &mut self,
        target: Target<K>,
        direction: Direction,
        callback: KeyCallback<K>,
        debounce: bool,
    ) {
        let binding = match target {
            Target::Key(key) => self.bindings.entry(key).or_insert_with(Binding::empty),
            Target::Any => &mut self.generic,
        };
        binding.install(direction, Hook { callback, debounce });
    }

    /// Ingests one raw notification from the host.
    ///
    /// Presses may deliver a press callback synchronously; releases are
    /// always parked until [`drain_deferred`](Self::drain_deferred).
    pub fn raw_event(&mut self, event: KeyEvent<K>) {
        let key = event.key;
        let passthrough = match self.resolve(key) {
            // Unbound key or direction: drop, never an error.
            None => return,
            Some(binding) => binding
                .hook(event.direction)
                .is_some_and(|hook| !hook.debounce),
        };

        if passthrough {
            if let Some(binding) = self.resolve_mut(key)
                && let Some(hook) = binding.hook_mut(event.direction)
            {
                (hook.callback)(&event);
            }
            return;
        }

        match event.direction {
            Direction::Press => {
                if self.filter.press(key)
                    && let Some(binding) = self.resolve_mut(key)
                    && let Some(hook) = binding.hook_mut(Direction::Press)
                {
                    (hook.callback)(&event);
                }
            }
            Direction::Release => self.filter.release(key),
        }
    }

    /// Delivers the releases that survived the current event batch.
    ///
    /// Wire the host's zero-delay deferred callback here. Bindings are
    /// re-resolved at delivery time, so a callback replaced between the raw
    /// release and the drain gets the event.
    pub fn drain_deferred(&mut self) {
        let bindings = &mut self.bindings;
        let generic = &mut self.generic;
        self.filter.drain_releases(|key| {
            let binding = match bindings.get_mut(&key) {
                Some(binding) => binding,
                None if generic.is_bound() => generic,
                None => return,
            };
            if let Some(hook) = binding.hook_mut(Direction::Release)
                && hook.debounce
            {
                (hook.callback)(&KeyEvent::release(key));
            }
        });
    }

    /// Returns `true` if a genuine press for `key` has been delivered and
    /// its genuine release has not.
    #[must_use]
    pub fn is_pressed(&self, key: K) -> bool {
        self.filter.is_pressed(key)
    }

    /// Returns `true` if any deferred release is waiting for a drain.
    ///
    /// Hosts can skip scheduling a deferred callback when this is `false`.
    #[must_use]
    pub fn has_deferred_releases(&self) -> bool {
        self.filter.pending_release_count() > 0
    }

    fn resolve(&self, key: K) -> Option<&Binding<K>> {
        if let Some(binding) = self.bindings.get(&key) {
            Some(binding)
        } else if self.generic.is_bound() {
            Some(&self.generic)
        } else {
            None
        }
    }

    fn resolve_mut(&mut self, key: K) -> Option<&mut Binding<K>> {
        if let Some(binding) = self.bindings.get_mut(&key) {
            Some(binding)
        } else if self.generic.is_bound() {
            Some(&mut self.generic)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    type Log = Rc<RefCell<Vec<(char, Direction)>>>;

    fn recorder(log: &Log) -> impl FnMut(&KeyEvent<char>) + 'static {
        let log = Rc::clone(log);
        move |ev| log.borrow_mut().push((ev.key, ev.direction))
    }

    fn bind_both(debouncer: &mut Debouncer<char>, key: char, log: &Log) {
        debouncer.register(Target::Key(key), Direction::Press, recorder(log));
        debouncer.register(Target::Key(key), Direction::Release, recorder(log));
    }

    #[test]
    fn press_then_release_across_batches() {
        // Scenario A: [Press(a)], drain, [Release(a)], drain.
        let log: Log = Rc::default();
        let mut debouncer = Debouncer::new();
        bind_both(&mut debouncer, 'a', &log);

        debouncer.raw_event(KeyEvent::press('a'));
        debouncer.drain_deferred();
        debouncer.raw_event(KeyEvent::release('a'));
        debouncer.drain_deferred();

        assert_eq!(
            *log.borrow(),
            vec![('a', Direction::Press), ('a', Direction::Release)]
        );
    }

    #[test]
    fn repeat_triples_collapse_to_one_press_one_release() {
        // Scenario B: [P, R, P, R, P] in one batch, then a lone [R].
        let log: Log = Rc::default();
        let mut debouncer = Debouncer::new();
        bind_both(&mut debouncer, 'a', &log);

        for ev in [
            KeyEvent::press('a'),
            KeyEvent::release('a'),
            KeyEvent::press('a'),
            KeyEvent::release('a'),
            KeyEvent::press('a'),
        ] {
            debouncer.raw_event(ev);
        }
        debouncer.drain_deferred();
        assert_eq!(*log.borrow(), vec![('a', Direction::Press)]);
        assert!(debouncer.is_pressed('a'));

        debouncer.raw_event(KeyEvent::release('a'));
        debouncer.drain_deferred();
        assert_eq!(
            *log.borrow(),
            vec![('a', Direction::Press), ('a', Direction::Release)]
        );
        assert!(!debouncer.is_pressed('a'));
    }

    #[test]
    fn passthrough_sees_every_raw_event() {
        // Scenario C: debounce opted out for 'b'.
        let log: Log = Rc::default();
        let mut debouncer = Debouncer::new();
        debouncer.register_raw(Target::Key('b'), Direction::Press, recorder(&log));
        debouncer.register_raw(Target::Key('b'), Direction::Release, recorder(&log));

        for ev in [
            KeyEvent::press('b'),
            KeyEvent::release('b'),
            KeyEvent::press('b'),
            KeyEvent::release('b'),
        ] {
            debouncer.raw_event(ev);
        }
        debouncer.drain_deferred();

        assert_eq!(
            *log.borrow(),
            vec![
                ('b', Direction::Press),
                ('b', Direction::Release),
                ('b', Direction::Press),
                ('b', Direction::Release),
            ]
        );
    }

    #[test]
    fn wildcard_debounces_like_specific() {
        let log: Log = Rc::default();
        let mut debouncer = Debouncer::new();
        debouncer.register(Target::Any, Direction::Press, recorder(&log));
        debouncer.register(Target::Any, Direction::Release, recorder(&log));

        // One repeat pair, then the genuine release.
        debouncer.raw_event(KeyEvent::press('x'));
        debouncer.raw_event(KeyEvent::release('x'));
        debouncer.raw_event(KeyEvent::press('x'));
        debouncer.drain_deferred();
        debouncer.raw_event(KeyEvent::release('x'));
        debouncer.drain_deferred();

        assert_eq!(
            *log.borrow(),
            vec![('x', Direction::Press), ('x', Direction::Release)]
        );
    }

    #[test]
    fn specific_binding_shadows_wildcard() {
        let specific: Log = Rc::default();
        let generic: Log = Rc::default();
        let mut debouncer = Debouncer::new();
        debouncer.register(Target::Any, Direction::Press, recorder(&generic));
        debouncer.register(Target::Key('a'), Direction::Press, recorder(&specific));

        debouncer.raw_event(KeyEvent::press('a'));
        debouncer.raw_event(KeyEvent::press('z'));

        assert_eq!(*specific.borrow(), vec![('a', Direction::Press)]);
        assert_eq!(*generic.borrow(), vec![('z', Direction::Press)]);
    }

    #[test]
    fn specific_binding_never_falls_back_per_direction() {
        // 'a' has only a press binding; its releases must not reach the
        // wildcard release callback.
        let generic: Log = Rc::default();
        let mut debouncer = Debouncer::new();
        debouncer.register(Target::Any, Direction::Release, recorder(&generic));
        debouncer.register(Target::Key('a'), Direction::Press, |_| {});

        debouncer.raw_event(KeyEvent::press('a'));
        debouncer.raw_event(KeyEvent::release('a'));
        debouncer.drain_deferred();

        assert_eq!(*generic.borrow(), vec![]);
    }

    #[test]
    fn unbound_keys_are_dropped_silently() {
        let mut debouncer: Debouncer<char> = Debouncer::new();
        debouncer.raw_event(KeyEvent::press('q'));
        debouncer.raw_event(KeyEvent::release('q'));
        debouncer.drain_deferred();
        assert!(!debouncer.is_pressed('q'));
    }

    #[test]
    fn reregistration_replaces_callback() {
        let first: Log = Rc::default();
        let second: Log = Rc::default();
        let mut debouncer = Debouncer::new();

        debouncer.register(Target::Key('a'), Direction::Press, recorder(&first));
        debouncer.register(Target::Key('a'), Direction::Press, recorder(&second));

        debouncer.raw_event(KeyEvent::press('a'));

        assert_eq!(*first.borrow(), vec![]);
        assert_eq!(*second.borrow(), vec![('a', Direction::Press)]);
    }

    #[test]
    fn reregistration_leaves_other_direction_alone() {
        let presses: Log = Rc::default();
        let releases: Log = Rc::default();
        let mut debouncer = Debouncer::new();

        debouncer.register(Target::Key('a'), Direction::Press, recorder(&presses));
        debouncer.register(Target::Key('a'), Direction::Release, recorder(&releases));
        // Replace only the press callback mid-stream.
        debouncer.raw_event(KeyEvent::press('a'));
        debouncer.register(Target::Key('a'), Direction::Press, |_| {});

        debouncer.raw_event(KeyEvent::release('a'));
        debouncer.drain_deferred();

        assert_eq!(*presses.borrow(), vec![('a', Direction::Press)]);
        assert_eq!(*releases.borrow(), vec![('a', Direction::Release)]);
    }

    #[test]
    fn callback_replaced_before_drain_gets_the_release() {
        let late: Log = Rc::default();
        let mut debouncer = Debouncer::new();
        debouncer.register(Target::Key('a'), Direction::Release, |_| {});

        debouncer.raw_event(KeyEvent::press('a'));
        debouncer.raw_event(KeyEvent::release('a'));
        // Swap the callback while the release is parked.
        debouncer.register(Target::Key('a'), Direction::Release, recorder(&late));
        debouncer.drain_deferred();

        assert_eq!(*late.borrow(), vec![('a', Direction::Release)]);
    }

    #[test]
    fn press_only_binding_still_tracks_state() {
        let log: Log = Rc::default();
        let mut debouncer = Debouncer::new();
        debouncer.register(Target::Key('a'), Direction::Press, recorder(&log));

        // Repeat pair must still be suppressed even with no release callback.
        debouncer.raw_event(KeyEvent::press('a'));
        debouncer.raw_event(KeyEvent::release('a'));
        debouncer.raw_event(KeyEvent::press('a'));
        debouncer.drain_deferred();

        assert_eq!(*log.borrow(), vec![('a', Direction::Press)]);
        assert!(debouncer.is_pressed('a'));
    }

    #[test]
    fn has_deferred_releases_reports_parked_work() {
        let mut debouncer = Debouncer::new();
        debouncer.register(Target::Key('a'), Direction::Release, |_| {});

        assert!(!debouncer.has_deferred_releases());
        debouncer.raw_event(KeyEvent::press('a'));
        assert!(!debouncer.has_deferred_releases());
        debouncer.raw_event(KeyEvent::release('a'));
        assert!(debouncer.has_deferred_releases());
        debouncer.drain_deferred();
        assert!(!debouncer.has_deferred_releases());
    }

    #[test]
    fn callbacks_can_own_state() {
        // Callbacks are FnMut; typing into a buffer is the common case.
        let typed: Rc<RefCell<String>> = Rc::default();
        let sink = Rc::clone(&typed);
        let mut debouncer = Debouncer::new();
        debouncer.register(Target::Any, Direction::Press, move |ev| {
            sink.borrow_mut().push(ev.key);
        });

        for key in ['h', 'i'] {
            debouncer.raw_event(KeyEvent::press(key));
            debouncer.raw_event(KeyEvent::release(key));
            debouncer.drain_deferred();
        }

        assert_eq!(*typed.borrow(), "hi");
    }
}
