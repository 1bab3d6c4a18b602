// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A scale shared between several axes, with change notification.

extern crate alloc;

use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

type Listener = Rc<dyn Fn()>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

/// A reference-counted handle to a scale.
///
/// Cloning the handle shares the scale. Every mutation through [`SharedScale::update`] notifies
/// the subscribed listeners after the mutation completes.
pub struct SharedScale<S> {
    scale: Rc<RefCell<S>>,
    listeners: Rc<RefCell<Listeners>>,
}

impl<S> Clone for SharedScale<S> {
    fn clone(&self) -> Self {
        Self {
            scale: Rc::clone(&self.scale),
            listeners: Rc::clone(&self.listeners),
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for SharedScale<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedScale")
            .field("scale", &self.scale)
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl<S> SharedScale<S> {
    /// Wraps `scale`.
    pub fn new(scale: S) -> Self {
        Self {
            scale: Rc::new(RefCell::new(scale)),
            listeners: Rc::new(RefCell::new(Listeners::default())),
        }
    }

    /// Runs `f` with shared access to the scale.
    pub fn with<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.scale.borrow())
    }

    /// Runs `f` with exclusive access to the scale, then notifies every listener.
    ///
    /// Listeners run after the borrow is released, so they may read the scale.
    pub fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let out = f(&mut self.scale.borrow_mut());
        self.notify();
        out
    }

    /// Registers `listener`; it stays registered until the returned [`Subscription`] drops.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, listener: impl Fn() + 'static) -> Subscription {
        let mut listeners = self.listeners.borrow_mut();
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.push((id, Rc::new(listener)));
        Subscription {
            list: Rc::downgrade(&self.listeners),
            id,
        }
    }

    /// Returns the number of live subscriptions.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().entries.len()
    }

    /// Returns `true` if both handles share the same scale.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.scale, &other.scale)
    }

    fn notify(&self) {
        // Listeners may subscribe or unsubscribe while running, so call a snapshot.
        let snapshot: Vec<Listener> = self
            .listeners
            .borrow()
            .entries
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in snapshot {
            listener();
        }
    }
}

impl Listeners {
    fn remove(&mut self, id: u64) {
        self.entries.retain(|(entry, _)| *entry != id);
    }
}

/// Keeps a scale listener registered. Dropping it unsubscribes.
pub struct Subscription {
    list: Weak<RefCell<Listeners>>,
    id: u64,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("live", &(self.list.strong_count() > 0))
            .finish_non_exhaustive()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(list) = self.list.upgrade() {
            list.borrow_mut().remove(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;

    use super::*;
    use crate::scale::{Scale, ScaleLinear};

    #[test]
    fn update_notifies_until_unsubscribed() {
        let shared = SharedScale::new(ScaleLinear::new((0.0, 1.0)));
        let hits = Rc::new(Cell::new(0));
        let sub = {
            let hits = Rc::clone(&hits);
            shared.subscribe(move || hits.set(hits.get() + 1))
        };
        assert_eq!(shared.listener_count(), 1);

        shared.update(|s| s.set_range((0.0, 100.0)));
        assert_eq!(hits.get(), 1);
        assert_eq!(shared.with(|s| s.scale(0.5)), 50.0);

        drop(sub);
        assert_eq!(shared.listener_count(), 0);
        shared.update(|s| s.set_domain((0.0, 2.0)));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn listeners_may_read_the_scale() {
        let shared = SharedScale::new(ScaleLinear::new((0.0, 1.0)));
        let seen = Rc::new(Cell::new(0.0));
        let _sub = {
            let seen = Rc::clone(&seen);
            let reader = shared.clone();
            shared.subscribe(move || seen.set(reader.with(|s| s.domain().1)))
        };
        shared.update(|s| s.set_domain((0.0, 4.0)));
        assert_eq!(seen.get(), 4.0);
    }

    #[test]
    fn subscription_outliving_the_scale_is_harmless() {
        let shared = SharedScale::new(ScaleLinear::new((0.0, 1.0)));
        let sub = shared.subscribe(|| {});
        let clone = shared.clone();
        assert!(clone.ptr_eq(&shared));
        drop(shared);
        drop(clone);
        drop(sub);
    }
}
