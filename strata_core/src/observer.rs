// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fan-out of scene events to weakly-held subscribers.
//!
//! [`ObserverMultiplexer`] never extends a subscriber's lifetime: it stores
//! [`Weak`] handles and upgrades them for the duration of one callback.
//! Broadcasts walk a snapshot of the registration list, so a subscriber may
//! register or unregister itself (or anyone else) from inside a callback.
//!
//! Once [`unregister_interest`](ObserverMultiplexer::unregister_interest)
//! returns, the subscriber receives no further calls. A callback already
//! running on another thread is waited for first.

use std::cell::Cell;
use std::fmt;
use std::ptr;
use std::sync::{Arc, Weak};

use parking_lot::{ReentrantMutex, RwLock};

use crate::surface::{SharedSurface, SurfaceSet};

/// Receives structural scene events.
///
/// Every method defaults to a no-op.
pub trait Observer: Send + Sync {
    /// A surface joined the scene.
    fn surface_added(&self, surface: &SharedSurface) {
        _ = surface;
    }

    /// A surface left the scene.
    fn surface_removed(&self, surface: &SharedSurface) {
        _ = surface;
    }

    /// The stacking order of `surfaces` changed.
    fn surfaces_reordered(&self, surfaces: &SurfaceSet) {
        _ = surfaces;
    }

    /// Something on screen changed and a recomposite is needed.
    fn scene_changed(&self) {}

    /// Replayed once per present surface when the observer is added.
    fn surface_exists(&self, surface: &SharedSurface) {
        _ = surface;
    }

    /// The observer is being removed from the scene.
    fn end_observation(&self) {}
}

/// Receives session lock transitions.
pub trait SessionLockObserver: Send + Sync {
    /// The session was locked.
    fn on_lock(&self) {}

    /// The session was unlocked.
    fn on_unlock(&self) {}
}

struct Slot<O: ?Sized> {
    observer: Weak<O>,
    /// Held for the duration of each callback. Set once unregistered.
    expired: ReentrantMutex<Cell<bool>>,
}

impl<O: ?Sized> Slot<O> {
    fn is(&self, observer: &O) -> bool {
        ptr::addr_eq(self.observer.as_ptr(), ptr::from_ref(observer))
    }
}

/// A thread-safe list of weakly-held observers of type `O`.
pub struct ObserverMultiplexer<O: ?Sized> {
    slots: RwLock<Vec<Arc<Slot<O>>>>,
}

impl<O: ?Sized> Default for ObserverMultiplexer<O> {
    fn default() -> Self {
        Self {
            slots: RwLock::new(Vec::new()),
        }
    }
}

impl<O: ?Sized> ObserverMultiplexer<O> {
    /// Creates an empty multiplexer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `observer`. It receives every broadcast that starts afterwards.
    pub fn register_interest(&self, observer: Weak<O>) {
        self.slots.write().push(Arc::new(Slot {
            observer,
            expired: ReentrantMutex::new(Cell::new(false)),
        }));
    }

    /// Removes every registration of `observer`.
    ///
    /// Blocks until any callback into `observer` running on another thread
    /// has returned. Calling this from inside one of `observer`'s own
    /// callbacks is allowed.
    pub fn unregister_interest(&self, observer: &O) {
        let removed: Vec<_> = {
            let mut slots = self.slots.write();
            let (removed, kept) = slots.drain(..).partition(|slot| slot.is(observer));
            *slots = kept;
            removed
        };
        for slot in removed {
            slot.expired.lock().set(true);
        }
    }

    /// Returns `true` if no live observer is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots
            .read()
            .iter()
            .all(|slot| slot.observer.strong_count() == 0)
    }

    /// Calls `f` once for every live observer, in registration order.
    pub fn for_each_observer(&self, mut f: impl FnMut(&O)) {
        let snapshot = self.slots.read().clone();
        let mut saw_dead = false;
        for slot in snapshot {
            let Some(observer) = slot.observer.upgrade() else {
                saw_dead = true;
                continue;
            };
            let expired = slot.expired.lock();
            if !expired.get() {
                f(&*observer);
            }
        }
        if saw_dead {
            self.slots
                .write()
                .retain(|slot| slot.observer.strong_count() > 0);
        }
    }
}

impl<O: ?Sized> fmt::Debug for ObserverMultiplexer<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverMultiplexer")
            .field("registered", &self.slots.read().len())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Typed broadcasts
// ---------------------------------------------------------------------------

impl ObserverMultiplexer<dyn Observer> {
    /// Broadcasts [`Observer::surface_added`].
    pub fn surface_added(&self, surface: &SharedSurface) {
        self.for_each_observer(|o| o.surface_added(surface));
    }

    /// Broadcasts [`Observer::surface_removed`].
    pub fn surface_removed(&self, surface: &SharedSurface) {
        self.for_each_observer(|o| o.surface_removed(surface));
    }

    /// Broadcasts [`Observer::surfaces_reordered`].
    pub fn surfaces_reordered(&self, surfaces: &SurfaceSet) {
        self.for_each_observer(|o| o.surfaces_reordered(surfaces));
    }

    /// Broadcasts [`Observer::scene_changed`].
    pub fn scene_changed(&self) {
        self.for_each_observer(|o| o.scene_changed());
    }

    /// Broadcasts [`Observer::surface_exists`].
    pub fn surface_exists(&self, surface: &SharedSurface) {
        self.for_each_observer(|o| o.surface_exists(surface));
    }

    /// Broadcasts [`Observer::end_observation`].
    pub fn end_observation(&self) {
        self.for_each_observer(|o| o.end_observation());
    }
}

impl ObserverMultiplexer<dyn SessionLockObserver> {
    /// Broadcasts [`SessionLockObserver::on_lock`].
    pub fn on_lock(&self) {
        self.for_each_observer(|o| o.on_lock());
    }

    /// Broadcasts [`SessionLockObserver::on_unlock`].
    pub fn on_unlock(&self) {
        self.for_each_observer(|o| o.on_unlock());
    }
}
