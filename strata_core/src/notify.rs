// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Folding fine-grained surface callbacks into two coarse signals.
//!
//! A compositor loop does not care *which* surface property changed, only
//! that it has to recomposite, and which rectangles got new content.
//! [`SceneChangeNotification`] is a scene [`Observer`] that installs one
//! [`SurfaceChangeNotification`] on every surface in the scene and raises:
//!
//! - `on_scene_changed()` for any structural or visual change, and
//! - `on_damage(rect)` for posted frames, in global coordinates.

use std::collections::HashMap;
use std::fmt;
use std::mem;
use std::sync::{Arc, Weak};

use kurbo::{Affine, Point, Rect, Size};
use parking_lot::Mutex;

use crate::id::SurfaceKey;
use crate::observer::Observer;
use crate::surface::{SharedSurface, Surface, SurfaceObserver, SurfaceSet};

type SceneChangedFn = dyn Fn() + Send + Sync;
type DamageFn = dyn Fn(Rect) + Send + Sync;

// ---------------------------------------------------------------------------
// Per surface
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug)]
struct Cached {
    top_left: Point,
    shown: bool,
}

/// Watches one surface and raises the coarse signals for it.
pub struct SurfaceChangeNotification {
    cached: Mutex<Cached>,
    on_scene_changed: Arc<SceneChangedFn>,
    on_damage: Arc<DamageFn>,
}

impl SurfaceChangeNotification {
    fn new(
        surface: &dyn Surface,
        on_scene_changed: Arc<SceneChangedFn>,
        on_damage: Arc<DamageFn>,
    ) -> Self {
        Self {
            cached: Mutex::new(Cached {
                top_left: surface.top_left(),
                shown: surface.visible(),
            }),
            on_scene_changed,
            on_damage,
        }
    }

    fn recomposite(&self) {
        (self.on_scene_changed)();
    }
}

impl SurfaceObserver for SurfaceChangeNotification {
    fn resized_to(&self, _surface: &dyn Surface, _size: Size) {
        self.recomposite();
    }

    fn moved_to(&self, _surface: &dyn Surface, top_left: Point) {
        self.cached.lock().top_left = top_left;
        self.recomposite();
    }

    fn hidden_set_to(&self, _surface: &dyn Surface, hidden: bool) {
        let was_shown = {
            let mut cached = self.cached.lock();
            mem::replace(&mut cached.shown, !hidden)
        };
        // Hidden to hidden changes nothing on screen.
        if was_shown || !hidden {
            self.recomposite();
        }
    }

    fn frame_posted(&self, _surface: &dyn Surface, damage: Rect) {
        let top_left = self.cached.lock().top_left;
        (self.on_damage)(damage + top_left.to_vec2());
    }

    fn alpha_set_to(&self, _surface: &dyn Surface, _alpha: f32) {
        self.recomposite();
    }

    fn transformation_set_to(&self, _surface: &dyn Surface, _transformation: Affine) {
        self.recomposite();
    }

    fn renamed(&self, _surface: &dyn Surface, _name: &str) {
        self.recomposite();
    }
}

impl fmt::Debug for SurfaceChangeNotification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfaceChangeNotification")
            .field("cached", &*self.cached.lock())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Scene wide
// ---------------------------------------------------------------------------

struct Installed {
    surface: Weak<dyn Surface>,
    notification: Arc<SurfaceChangeNotification>,
}

/// A scene [`Observer`] that turns every change into one of two callbacks.
///
/// Register it with [`SceneGraph::add_observer`](crate::SceneGraph::add_observer).
pub struct SceneChangeNotification {
    on_scene_changed: Arc<SceneChangedFn>,
    on_damage: Arc<DamageFn>,
    installed: Mutex<HashMap<SurfaceKey, Installed>>,
}

impl SceneChangeNotification {
    /// Creates an adapter raising `on_scene_changed` for recomposites and
    /// `on_damage` for damaged rectangles.
    pub fn new(
        on_scene_changed: impl Fn() + Send + Sync + 'static,
        on_damage: impl Fn(Rect) + Send + Sync + 'static,
    ) -> Self {
        Self {
            on_scene_changed: Arc::new(on_scene_changed),
            on_damage: Arc::new(on_damage),
            installed: Mutex::new(HashMap::new()),
        }
    }

    /// Number of surfaces currently watched.
    #[must_use]
    pub fn watched(&self) -> usize {
        self.installed.lock().len()
    }

    fn install(&self, surface: &SharedSurface) {
        let notification = Arc::new(SurfaceChangeNotification::new(
            &**surface,
            self.on_scene_changed.clone(),
            self.on_damage.clone(),
        ));
        let weak: Weak<dyn SurfaceObserver> = Arc::downgrade(&notification) as _;
        surface.register_interest(weak);
        let replaced = self.installed.lock().insert(
            SurfaceKey::of(&**surface),
            Installed {
                surface: Arc::downgrade(surface),
                notification,
            },
        );
        if let Some(old) = replaced {
            surface.unregister_interest(&*old.notification);
        }
    }

    fn uninstall(&self, surface: &SharedSurface) {
        let removed = self.installed.lock().remove(&SurfaceKey::of(&**surface));
        if let Some(installed) = removed {
            surface.unregister_interest(&*installed.notification);
        }
    }

    fn recomposite(&self) {
        (self.on_scene_changed)();
    }
}

impl Observer for SceneChangeNotification {
    fn surface_added(&self, surface: &SharedSurface) {
        self.install(surface);
        self.recomposite();
    }

    fn surface_removed(&self, surface: &SharedSurface) {
        self.uninstall(surface);
        self.recomposite();
    }

    fn surfaces_reordered(&self, _surfaces: &SurfaceSet) {
        self.recomposite();
    }

    fn scene_changed(&self) {
        self.recomposite();
    }

    fn surface_exists(&self, surface: &SharedSurface) {
        self.install(surface);
    }

    fn end_observation(&self) {
        let drained: Vec<_> = self.installed.lock().drain().map(|(_, i)| i).collect();
        for installed in drained {
            if let Some(surface) = installed.surface.upgrade() {
                surface.unregister_interest(&*installed.notification);
            }
        }
    }
}

impl Drop for SceneChangeNotification {
    fn drop(&mut self) {
        self.end_observation();
    }
}

impl fmt::Debug for SceneChangeNotification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneChangeNotification")
            .field("watched", &self.watched())
            .finish_non_exhaustive()
    }
}
