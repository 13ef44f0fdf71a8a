// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene graph operations.

use std::collections::{HashMap, HashSet};
use std::ptr;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Weak};

use kurbo::Point;

use super::{Entry, SceneGraph, order};
use crate::depth::DepthLayer;
use crate::element::SceneElement;
use crate::error::SceneError;
use crate::id::{RenderPassId, SurfaceKey};
use crate::observer::{Observer, SessionLockObserver};
use crate::surface::{
    InputReceptionMode, SharedRenderable, SharedSurface, Surface, SurfaceObserver, SurfaceSet,
};
use crate::tracker::RenderingTracker;

/// A surface takes part in rendering and hit-testing unless the session is
/// locked and it does not opt in.
fn can_be_shown(locked: bool, surface: &dyn Surface) -> bool {
    !locked || surface.visible_on_lock_screen()
}

fn log_deferred(op: &str, result: Result<(), SceneError>) {
    if let Err(err) = result {
        tracing::warn!(%err, op, "deferred scene mutation failed");
    }
}

// ---------------------------------------------------------------------------
// Membership
// ---------------------------------------------------------------------------

impl SceneGraph {
    /// Adds `surface` at the top of the tier it currently reports.
    ///
    /// The surface gets a [`RenderingTracker`] seeded with the active render
    /// passes, and `mode` is applied to it. Adding a surface that is already
    /// present is not supported.
    pub fn add_surface(&self, surface: SharedSurface, mode: InputReceptionMode) {
        if self.is_dispatching() {
            self.enqueue(move |scene| scene.add_surface(surface, mode));
            return;
        }
        let key = SurfaceKey::of(&*surface);
        let layer = self.dispatching(|| {
            let layer = surface.depth_layer();
            let tracker = Arc::new(RenderingTracker::new(Arc::downgrade(&surface)));
            {
                let mut state = self.state.write();
                tracker.seed(&state.passes);
                order::push_top(
                    &mut state.layers,
                    layer.index(),
                    Entry {
                        key,
                        surface: surface.clone(),
                        tracker: tracker.clone(),
                    },
                );
            }
            self.scene_changed.store(true, Ordering::Release);
            tracker.settle();
            let observer: Weak<dyn SurfaceObserver> = Arc::downgrade(&self.depth_observer) as _;
            surface.register_interest(observer);
            surface.set_reception_mode(mode);
            layer
        });
        let name = surface.name();
        tracing::debug!(?key, %name, ?layer, "surface added");
        self.observers.surface_added(&surface);
        self.report.surface_added(key, &name, layer);
    }

    /// Removes `surface` and destroys its tracker.
    ///
    /// An expired reference or a surface that is not in the graph is logged
    /// and otherwise ignored, since surfaces can legitimately be removed twice
    /// during teardown.
    pub fn remove_surface(&self, surface: &Weak<dyn Surface>) {
        let Some(surface) = surface.upgrade() else {
            tracing::debug!("remove_surface: surface already expired");
            return;
        };
        if self.is_dispatching() {
            self.enqueue(move |scene| scene.remove_surface(&Arc::downgrade(&surface)));
            return;
        }
        let key = SurfaceKey::of(&*surface);
        let Some(entry) = self.state.write().remove(key) else {
            tracing::debug!(?key, "remove_surface: surface not in the scene");
            return;
        };
        self.scene_changed.store(true, Ordering::Release);
        self.dispatching(|| surface.unregister_interest(&*self.depth_observer));
        drop(entry);

        let name = surface.name();
        tracing::debug!(?key, %name, "surface removed");
        self.observers.surface_removed(&surface);
        self.report.surface_removed(key, &name);
    }

    /// The tracker of `surface`, if it is in the graph.
    #[must_use]
    pub fn rendering_tracker(&self, surface: &dyn Surface) -> Option<Arc<RenderingTracker>> {
        let state = self.state.read_recursive();
        state
            .find(SurfaceKey::of(surface))
            .map(|entry| entry.tracker.clone())
    }
}

// ---------------------------------------------------------------------------
// Reordering
// ---------------------------------------------------------------------------

impl SceneGraph {
    /// Moves `surface` to the top of its current tier.
    ///
    /// Always notifies `surfaces_reordered`, even if the surface was already
    /// on top.
    ///
    /// # Errors
    ///
    /// [`SceneError::UnknownSurface`] if `surface` is not in the graph.
    pub fn raise(&self, surface: &dyn Surface) -> Result<(), SceneError> {
        let layer = surface.depth_layer();
        self.raise_key(SurfaceKey::of(surface), layer)
    }

    pub(super) fn raise_key(&self, key: SurfaceKey, layer: DepthLayer) -> Result<(), SceneError> {
        if self.is_dispatching() {
            if self.state.read_recursive().find(key).is_none() {
                return Err(SceneError::UnknownSurface);
            }
            self.enqueue(move |scene| log_deferred("raise", scene.raise_key(key, layer)));
            return Ok(());
        }
        let raised = {
            let mut state = self.state.write();
            if order::raise_one(&mut state.layers, |entry| entry.key, key, layer.index()) {
                state.layers[layer.index()]
                    .last()
                    .map(|entry| entry.surface.clone())
            } else {
                None
            }
        };
        let surface = raised.ok_or(SceneError::UnknownSurface)?;
        self.scene_changed.store(true, Ordering::Release);
        let affected: SurfaceSet = [surface].into_iter().collect();
        self.observers.surfaces_reordered(&affected);
        self.report.surfaces_reordered(affected.len());
        Ok(())
    }

    /// Moves every member of `surfaces` to the top of its current tier,
    /// keeping their relative order.
    ///
    /// Notifies only if the stacking order actually changed.
    pub fn raise_set(&self, surfaces: &SurfaceSet) {
        if self.is_dispatching() {
            let surfaces = surfaces.clone();
            self.enqueue(move |scene| scene.raise_set(&surfaces));
            return;
        }
        let targets: HashMap<SurfaceKey, usize> = self.dispatching(|| {
            surfaces
                .iter()
                .map(|s| (SurfaceKey::of(&**s), s.depth_layer().index()))
                .collect()
        });
        let changed = order::raise_members(
            &mut self.state.write().layers,
            |entry| entry.key,
            |entry| targets.get(&entry.key).copied(),
        );
        if changed {
            self.reordered(surfaces);
        }
    }

    /// Exchanges the Z-order of `first` and `second` within each tier.
    ///
    /// Notifies `surfaces_reordered(first)` then
    /// `surfaces_reordered(second)`, whether or not anything moved.
    pub fn swap_z_order(&self, first: &SurfaceSet, second: &SurfaceSet) {
        if self.is_dispatching() {
            let (first, second) = (first.clone(), second.clone());
            self.enqueue(move |scene| scene.swap_z_order(&first, &second));
            return;
        }
        {
            let mut state = self.state.write();
            for layer in &mut state.layers {
                order::swap_z_order(
                    layer.as_mut_slice(),
                    |entry| first.contains_key(entry.key),
                    |entry| second.contains_key(entry.key),
                    first.len(),
                    second.len(),
                );
            }
        }
        self.reordered(first);
        self.reordered(second);
    }

    /// Moves the members of `surfaces` to the bottom of their tiers.
    ///
    /// Does nothing, and notifies nobody, if they are already there.
    pub fn send_to_back(&self, surfaces: &SurfaceSet) {
        if self.is_dispatching() {
            let surfaces = surfaces.clone();
            self.enqueue(move |scene| scene.send_to_back(&surfaces));
            return;
        }
        let changed = {
            let mut state = self.state.write();
            let mut changed = false;
            for layer in &mut state.layers {
                changed |= order::send_to_back(layer, |entry| surfaces.contains_key(entry.key));
            }
            changed
        };
        if changed {
            self.reordered(surfaces);
        }
    }

    /// The members of `surfaces` present in the graph, bottom to top.
    #[must_use]
    pub fn stacking_order_of(&self, surfaces: &SurfaceSet) -> Vec<SharedSurface> {
        let state = self.state.read_recursive();
        state
            .entries()
            .filter(|entry| surfaces.contains_key(entry.key))
            .map(|entry| entry.surface.clone())
            .collect()
    }

    fn reordered(&self, surfaces: &SurfaceSet) {
        self.scene_changed.store(true, Ordering::Release);
        self.observers.surfaces_reordered(surfaces);
        self.report.surfaces_reordered(surfaces.len());
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

impl SceneGraph {
    /// The topmost shown surface whose input area contains `point`.
    #[must_use]
    pub fn surface_at(&self, point: Point) -> Option<SharedSurface> {
        let locked = self.screen_is_locked();
        self.dispatching(|| {
            let state = self.state.read_recursive();
            state
                .layers
                .iter()
                .rev()
                .flat_map(|layer| layer.iter().rev())
                .find(|entry| {
                    can_be_shown(locked, &*entry.surface) && entry.surface.input_area_contains(point)
                })
                .map(|entry| entry.surface.clone())
        })
    }

    /// Everything render pass `pass` should paint this frame, bottom to top.
    ///
    /// Surface elements come first, tier by tier; overlays come last. Safe to
    /// call from several render-pass threads at once. Clears the
    /// scene-changed flag read by [`frames_pending`](Self::frames_pending).
    #[must_use]
    pub fn scene_elements_for(&self, pass: RenderPassId) -> Vec<SceneElement> {
        let locked = self.screen_is_locked();
        self.dispatching(|| {
            let state = self.state.read_recursive();
            self.scene_changed.store(false, Ordering::Release);
            let mut elements = Vec::new();
            for entry in state.entries() {
                if can_be_shown(locked, &*entry.surface) && entry.surface.visible() {
                    elements.extend(
                        entry
                            .surface
                            .generate_renderables(pass)
                            .into_iter()
                            .map(|r| SceneElement::tracked(r, &entry.tracker, pass)),
                    );
                }
            }
            elements.extend(
                state
                    .overlays
                    .iter()
                    .map(|r| SceneElement::overlay(r.clone(), pass)),
            );
            elements
        })
    }

    /// How many frames render pass `pass` has waiting.
    ///
    /// `1` if the scene changed since the last
    /// [`scene_elements_for`](Self::scene_elements_for), otherwise the most
    /// buffers any shown surface has ready.
    #[must_use]
    pub fn frames_pending(&self, pass: RenderPassId) -> u32 {
        if self.scene_changed.load(Ordering::Acquire) {
            return 1;
        }
        let locked = self.screen_is_locked();
        self.dispatching(|| {
            let state = self.state.read_recursive();
            state
                .entries()
                .filter(|entry| can_be_shown(locked, &*entry.surface) && entry.surface.visible())
                .map(|entry| entry.surface.buffers_ready_for(pass))
                .max()
                .unwrap_or(0)
        })
    }
}

// ---------------------------------------------------------------------------
// Render passes and overlays
// ---------------------------------------------------------------------------

impl SceneGraph {
    /// Activates render pass `pass` and re-seeds every tracker.
    pub fn register_compositor(&self, pass: RenderPassId) {
        if self.is_dispatching() {
            self.enqueue(move |scene| scene.register_compositor(pass));
            return;
        }
        self.update_passes(|passes| passes.insert(pass));
        tracing::debug!(?pass, "render pass registered");
        self.report.render_pass_registered(pass);
    }

    /// Deactivates render pass `pass` and re-seeds every tracker, dropping
    /// occlusion reports it made.
    pub fn unregister_compositor(&self, pass: RenderPassId) {
        if self.is_dispatching() {
            self.enqueue(move |scene| scene.unregister_compositor(pass));
            return;
        }
        self.update_passes(|passes| passes.remove(&pass));
        tracing::debug!(?pass, "render pass unregistered");
        self.report.render_pass_unregistered(pass);
    }

    fn update_passes(&self, update: impl FnOnce(&mut HashSet<RenderPassId>) -> bool) {
        let trackers: Vec<_> = {
            let mut state = self.state.write();
            let state = &mut *state;
            if !update(&mut state.passes) {
                tracing::debug!("render pass set unchanged");
            }
            state
                .layers
                .iter()
                .flatten()
                .map(|entry| {
                    entry.tracker.seed(&state.passes);
                    entry.tracker.clone()
                })
                .collect()
        };
        self.dispatching(|| {
            for tracker in &trackers {
                tracker.settle();
            }
        });
    }

    /// Adds an overlay renderable, painted above every surface.
    pub fn add_input_visualization(&self, overlay: SharedRenderable) {
        if self.is_dispatching() {
            self.enqueue(move |scene| scene.add_input_visualization(overlay));
            return;
        }
        let total = {
            let mut state = self.state.write();
            state.overlays.push(overlay);
            state.overlays.len()
        };
        self.emit_scene_changed();
        self.report.overlay_added(total);
    }

    /// Removes an overlay added with
    /// [`add_input_visualization`](Self::add_input_visualization).
    ///
    /// # Errors
    ///
    /// [`SceneError::UnknownOverlay`] if `overlay` was never added or was
    /// already removed.
    pub fn remove_input_visualization(&self, overlay: &SharedRenderable) -> Result<(), SceneError> {
        if self.is_dispatching() {
            let known = self
                .state
                .read_recursive()
                .overlays
                .iter()
                .any(|o| ptr::addr_eq(Arc::as_ptr(o), Arc::as_ptr(overlay)));
            if !known {
                return Err(SceneError::UnknownOverlay);
            }
            let overlay = overlay.clone();
            self.enqueue(move |scene| {
                log_deferred(
                    "remove_input_visualization",
                    scene.remove_input_visualization(&overlay),
                );
            });
            return Ok(());
        }
        let total = {
            let mut state = self.state.write();
            let pos = state
                .overlays
                .iter()
                .position(|o| ptr::addr_eq(Arc::as_ptr(o), Arc::as_ptr(overlay)))
                .ok_or(SceneError::UnknownOverlay)?;
            state.overlays.remove(pos);
            state.overlays.len()
        };
        self.emit_scene_changed();
        self.report.overlay_removed(total);
        Ok(())
    }

    fn emit_scene_changed(&self) {
        self.scene_changed.store(true, Ordering::Release);
        self.observers.scene_changed();
    }
}

// ---------------------------------------------------------------------------
// Session lock
// ---------------------------------------------------------------------------

impl SceneGraph {
    /// Locks the session. Only surfaces visible on the lock screen stay shown.
    pub fn lock(&self) {
        if self.is_dispatching() {
            self.enqueue(Self::lock);
            return;
        }
        if self
            .locked
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            tracing::info!("session is now locked and listeners are being notified");
            self.emit_scene_changed();
            self.lock_observers.on_lock();
            self.report.session_locked();
        } else {
            tracing::debug!("session received duplicate lock request");
        }
    }

    /// Unlocks the session.
    pub fn unlock(&self) {
        if self.is_dispatching() {
            self.enqueue(Self::unlock);
            return;
        }
        if self
            .locked
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            tracing::info!("session is now unlocked and listeners are being notified");
            self.emit_scene_changed();
            self.lock_observers.on_unlock();
            self.report.session_unlocked();
        } else {
            tracing::debug!("session received duplicate unlock request");
        }
    }

    /// Returns whether the session is locked.
    #[must_use]
    pub fn screen_is_locked(&self) -> bool {
        self.locked.load(Ordering::Acquire)
    }

    /// Subscribes `observer` to lock transitions.
    pub fn register_lock_observer(&self, observer: Weak<dyn SessionLockObserver>) {
        self.lock_observers.register_interest(observer);
    }

    /// Unsubscribes `observer` from lock transitions.
    pub fn unregister_lock_observer(&self, observer: &(dyn SessionLockObserver + 'static)) {
        self.lock_observers.unregister_interest(observer);
    }
}

// ---------------------------------------------------------------------------
// Observers
// ---------------------------------------------------------------------------

impl SceneGraph {
    /// Subscribes `observer` and replays `surface_exists` for every surface
    /// already present, bottom to top, before returning.
    ///
    /// Called from inside a surface callback, the subscription and replay
    /// happen once the scene is done dispatching.
    pub fn add_observer(&self, observer: &Arc<dyn Observer>) {
        if self.is_dispatching() {
            let observer = observer.clone();
            self.enqueue(move |scene| scene.add_observer(&observer));
            return;
        }
        self.observers.register_interest(Arc::downgrade(observer));
        let present: Vec<SharedSurface> = {
            let state = self.state.read_recursive();
            state.entries().map(|entry| entry.surface.clone()).collect()
        };
        for surface in &present {
            observer.surface_exists(surface);
        }
    }

    /// Ends `observer`'s subscription, calling its `end_observation` first.
    ///
    /// # Errors
    ///
    /// [`SceneError::ExpiredObserver`] if the observer was already destroyed.
    pub fn remove_observer(&self, observer: &Weak<dyn Observer>) -> Result<(), SceneError> {
        let observer = observer.upgrade().ok_or(SceneError::ExpiredObserver)?;
        observer.end_observation();
        self.observers.unregister_interest(&*observer);
        Ok(())
    }
}
