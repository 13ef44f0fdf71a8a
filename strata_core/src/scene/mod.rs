// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scene graph: who is on screen, in which order.
//!
//! [`SceneGraph`] keeps one Z-ordered list per [`DepthLayer`], a list of
//! overlay renderables painted above everything, the set of active render
//! passes and the session-lock flag. Every surface in the graph owns a
//! [`RenderingTracker`] seeded with the active render passes.
//!
//! ## Ordering
//!
//! Lists are ordered bottom to top. Lower tiers always paint before higher
//! ones; within a tier, the last mutation decides. A surface whose tier
//! changes (reported through [`SurfaceObserver::depth_layer_set_to`]) moves
//! to the top of its new tier.
//!
//! ## Locking
//!
//! State lives behind one reader-writer lock. Write sections never call out
//! to surfaces. Calls out to surfaces and trackers run inside a *dispatch*;
//! mutations requested from within one (for instance a surface changing its
//! own tier while generating renderables) are queued and applied once the
//! outermost dispatching call returns. Observers and reports are notified
//! after the lock is released and outside any dispatch, so they may call
//! straight back into the graph.

mod dispatch;
mod order;
mod stack;

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::depth::DepthLayer;
use crate::id::{RenderPassId, SurfaceKey};
use crate::observer::{Observer, ObserverMultiplexer, SessionLockObserver};
use crate::report::{NullReport, SceneReport};
use crate::surface::{SharedRenderable, SharedSurface, Surface, SurfaceObserver};
use crate::tracker::RenderingTracker;

struct Entry {
    key: SurfaceKey,
    surface: SharedSurface,
    tracker: Arc<RenderingTracker>,
}

#[derive(Default)]
struct StackState {
    /// Indexed by [`DepthLayer::index`], grown lazily.
    layers: Vec<Vec<Entry>>,
    overlays: Vec<SharedRenderable>,
    passes: HashSet<RenderPassId>,
}

impl StackState {
    fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.layers.iter().flatten()
    }

    fn find(&self, key: SurfaceKey) -> Option<&Entry> {
        self.entries().find(|entry| entry.key == key)
    }

    fn remove(&mut self, key: SurfaceKey) -> Option<Entry> {
        self.layers.iter_mut().find_map(|layer| {
            let pos = layer.iter().position(|entry| entry.key == key)?;
            Some(layer.remove(pos))
        })
    }
}

/// Moves a surface to the top of its new tier when the tier changes.
struct DepthLayerObserver {
    scene: Weak<SceneGraph>,
}

impl SurfaceObserver for DepthLayerObserver {
    fn depth_layer_set_to(&self, surface: &dyn Surface, layer: DepthLayer) {
        if let Some(scene) = self.scene.upgrade()
            && let Err(err) = scene.raise_key(SurfaceKey::of(surface), layer)
        {
            tracing::warn!(%err, ?layer, "could not move surface to its new depth layer");
        }
    }
}

/// The authoritative stacking order of every surface on screen.
///
/// Created behind an [`Arc`], since every surface in the graph holds a weak
/// reference back to it.
pub struct SceneGraph {
    state: RwLock<StackState>,
    locked: AtomicBool,
    /// Set by any change, cleared by `scene_elements_for`.
    scene_changed: AtomicBool,
    observers: ObserverMultiplexer<dyn Observer>,
    lock_observers: ObserverMultiplexer<dyn SessionLockObserver>,
    depth_observer: Arc<DepthLayerObserver>,
    report: Arc<dyn SceneReport>,
}

impl SceneGraph {
    /// Creates an empty graph that reports nowhere.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Self::with_report(Arc::new(NullReport))
    }

    /// Creates an empty graph that sends lifecycle events to `report`.
    #[must_use]
    pub fn with_report(report: Arc<dyn SceneReport>) -> Arc<Self> {
        Arc::new_cyclic(|scene| Self {
            state: RwLock::new(StackState::default()),
            locked: AtomicBool::new(false),
            scene_changed: AtomicBool::new(false),
            observers: ObserverMultiplexer::new(),
            lock_observers: ObserverMultiplexer::new(),
            depth_observer: Arc::new(DepthLayerObserver {
                scene: scene.clone(),
            }),
            report,
        })
    }
}

impl Drop for SceneGraph {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        for entry in state.layers.iter().flatten() {
            entry.surface.unregister_interest(&*self.depth_observer);
        }
    }
}

impl fmt::Debug for SceneGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read_recursive();
        let layers: Vec<usize> = state.layers.iter().map(Vec::len).collect();
        f.debug_struct("SceneGraph")
            .field("layers", &layers)
            .field("overlays", &state.overlays.len())
            .field("passes", &state.passes)
            .field("locked", &self.locked)
            .finish_non_exhaustive()
    }
}
