// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capability traits for the scene graph's external collaborators.
//!
//! Surfaces and renderables are owned elsewhere (by the shell and the buffer
//! pipeline). The scene graph holds them through `Arc<dyn …>` handles and
//! identifies them by allocation address, see [`SurfaceKey`].

use std::collections::HashMap;
use std::collections::hash_map;
use std::fmt;
use std::sync::{Arc, Weak};

use kurbo::{Affine, Point, Rect, Size};

use crate::depth::DepthLayer;
use crate::id::{RenderPassId, SurfaceKey};

/// Shared handle to a surface.
pub type SharedSurface = Arc<dyn Surface>;

/// Shared handle to a renderable.
pub type SharedRenderable = Arc<dyn Renderable>;

/// Whether a surface currently contributes visible pixels to any output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Occluded in every active render pass.
    Occluded,
    /// Visible in at least one active render pass.
    Exposed,
}

/// A surface attribute pushed to the surface by the compositor core.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceAttrib {
    /// Occlusion state aggregated over every active render pass.
    Visibility(Visibility),
}

/// How a surface takes part in input dispatch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InputReceptionMode {
    /// Receives input only when under the pointer or focused.
    #[default]
    Normal,
    /// Receives all input regardless of position.
    ReceivesAllInput,
    /// Consumes input without passing it further down.
    Blocking,
}

/// One paintable unit produced by a surface (or an overlay) for one frame.
pub trait Renderable: Send + Sync {
    /// Position and size on screen, in global coordinates.
    fn screen_position(&self) -> Rect;

    /// Overall opacity in `0.0..=1.0`.
    fn alpha(&self) -> f32 {
        1.0
    }

    /// Whether the content has per-pixel transparency.
    fn shaped(&self) -> bool {
        false
    }

    /// Transformation applied around the renderable's center.
    fn transformation(&self) -> Affine {
        Affine::IDENTITY
    }
}

/// A window surface as seen by the scene graph.
pub trait Surface: Send + Sync {
    /// Human-readable name, for diagnostics.
    fn name(&self) -> String;

    /// Whether the surface wants to be drawn at all.
    fn visible(&self) -> bool;

    /// Whether the surface stays shown while the session is locked.
    fn visible_on_lock_screen(&self) -> bool {
        false
    }

    /// Current stacking tier.
    fn depth_layer(&self) -> DepthLayer;

    /// Top-left corner in global coordinates.
    fn top_left(&self) -> Point;

    /// Current size.
    fn size(&self) -> Size;

    /// Whether `point` (global coordinates) hits the surface's input area.
    fn input_area_contains(&self, point: Point) -> bool;

    /// Produces the renderables to draw for `pass` this frame.
    fn generate_renderables(&self, pass: RenderPassId) -> Vec<SharedRenderable>;

    /// Number of frames the surface has queued for `pass`.
    fn buffers_ready_for(&self, pass: RenderPassId) -> u32 {
        _ = pass;
        0
    }

    /// Applies an attribute pushed by the compositor.
    fn configure(&self, attrib: SurfaceAttrib);

    /// Sets how the surface takes part in input dispatch.
    fn set_reception_mode(&self, mode: InputReceptionMode) {
        _ = mode;
    }

    /// Registers a weakly-held observer for this surface's changes.
    fn register_interest(&self, observer: Weak<dyn SurfaceObserver>);

    /// Unregisters a previously registered observer.
    fn unregister_interest(&self, observer: &dyn SurfaceObserver);
}

/// Receives change callbacks from a [`Surface`].
///
/// All methods default to no-ops, so implementors only override the changes
/// they care about. Coordinates are global except for
/// [`frame_posted`](Self::frame_posted), whose damage is surface-local.
pub trait SurfaceObserver: Send + Sync {
    /// The surface content was resized.
    fn resized_to(&self, surface: &dyn Surface, size: Size) {
        _ = (surface, size);
    }

    /// The surface moved.
    fn moved_to(&self, surface: &dyn Surface, top_left: Point) {
        _ = (surface, top_left);
    }

    /// The surface was hidden or shown.
    fn hidden_set_to(&self, surface: &dyn Surface, hidden: bool) {
        _ = (surface, hidden);
    }

    /// A new frame was posted, damaging `damage` in surface-local coordinates.
    fn frame_posted(&self, surface: &dyn Surface, damage: Rect) {
        _ = (surface, damage);
    }

    /// The surface opacity changed.
    fn alpha_set_to(&self, surface: &dyn Surface, alpha: f32) {
        _ = (surface, alpha);
    }

    /// The surface transformation changed.
    fn transformation_set_to(&self, surface: &dyn Surface, transformation: Affine) {
        _ = (surface, transformation);
    }

    /// The surface was renamed.
    fn renamed(&self, surface: &dyn Surface, name: &str) {
        _ = (surface, name);
    }

    /// The surface moved to another stacking tier.
    fn depth_layer_set_to(&self, surface: &dyn Surface, layer: DepthLayer) {
        _ = (surface, layer);
    }
}

/// An identity-keyed set of surfaces.
///
/// Used by the multi-surface reorder operations and by the
/// `surfaces_reordered` notification.
#[derive(Clone, Default)]
pub struct SurfaceSet {
    members: HashMap<SurfaceKey, SharedSurface>,
}

impl SurfaceSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `surface`, returning `false` if it was already present.
    pub fn insert(&mut self, surface: SharedSurface) -> bool {
        match self.members.entry(SurfaceKey::of(&*surface)) {
            hash_map::Entry::Occupied(_) => false,
            hash_map::Entry::Vacant(slot) => {
                slot.insert(surface);
                true
            }
        }
    }

    /// Returns whether `surface` is a member.
    #[must_use]
    pub fn contains(&self, surface: &dyn Surface) -> bool {
        self.members.contains_key(&SurfaceKey::of(surface))
    }

    /// Returns whether the surface with `key` is a member.
    #[must_use]
    pub fn contains_key(&self, key: SurfaceKey) -> bool {
        self.members.contains_key(&key)
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the set has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterates over the members in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &SharedSurface> {
        self.members.values()
    }
}

impl FromIterator<SharedSurface> for SurfaceSet {
    fn from_iter<I: IntoIterator<Item = SharedSurface>>(iter: I) -> Self {
        let mut set = Self::new();
        for surface in iter {
            set.insert(surface);
        }
        set
    }
}

impl fmt::Debug for SurfaceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.members.keys()).finish()
    }
}
