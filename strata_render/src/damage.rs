// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spatial damage tracking for partial re-rendering.

use std::fmt;
use std::sync::Arc;

use kurbo::Rect;
use parking_lot::Mutex;
use strata_core::SceneChangeNotification;

/// A region of the output that needs re-rendering.
///
/// Backends can use this to minimize GPU work by only redrawing areas
/// that changed since the last frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum DamageRegion {
    /// The entire output needs redrawing.
    #[default]
    Full,
    /// A list of rectangles, in global coordinates, that need redrawing.
    Rects(Vec<Rect>),
    /// Nothing changed; the previous frame can be reused.
    None,
}

impl DamageRegion {
    /// Returns `true` if no region needs redrawing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Merges another damage region into this one.
    pub fn merge(&mut self, other: &Self) {
        match (&mut *self, other) {
            (Self::Full, _) | (_, Self::Full) => *self = Self::Full,
            (Self::None, _) => *self = other.clone(),
            (_, Self::None) => {}
            (Self::Rects(a), Self::Rects(b)) => a.extend_from_slice(b),
        }
    }

    /// Adds one damaged rectangle. Rectangles without area are ignored.
    pub fn add_rect(&mut self, rect: Rect) {
        if rect.area() <= 0.0 {
            return;
        }
        match self {
            Self::Full => {}
            Self::Rects(rects) => rects.push(rect),
            Self::None => *self = Self::Rects(vec![rect]),
        }
    }

    /// The smallest rectangle within `area` covering the damage, if any.
    #[must_use]
    pub fn bounds(&self, area: Rect) -> Option<Rect> {
        let bounds = match self {
            Self::Full => area,
            Self::Rects(rects) => rects
                .iter()
                .copied()
                .reduce(|a, b| a.union(b))?
                .intersect(area),
            Self::None => return None,
        };
        (bounds.area() > 0.0).then_some(bounds)
    }
}

/// Accumulates damage reported by the scene between two frames.
///
/// The tracker starts at [`DamageRegion::Full`] so that the first frame
/// repaints everything. Structural scene changes (surfaces added, removed,
/// moved, restacked, resized) escalate to a full repaint; posted frames add
/// their damaged rectangle.
///
/// Clones share the same pending region.
#[derive(Clone, Default)]
pub struct DamageTracker {
    pending: Arc<Mutex<DamageRegion>>,
}

impl DamageTracker {
    /// Creates a tracker with a full repaint pending.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A scene observer feeding this tracker.
    ///
    /// Register it with [`SceneGraph::add_observer`] and keep the `Arc`
    /// alive for as long as damage should be collected.
    ///
    /// [`SceneGraph::add_observer`]: strata_core::SceneGraph::add_observer
    #[must_use]
    pub fn notification(&self) -> SceneChangeNotification {
        let full = self.pending.clone();
        let partial = self.pending.clone();
        SceneChangeNotification::new(
            move || *full.lock() = DamageRegion::Full,
            move |rect| partial.lock().add_rect(rect),
        )
    }

    /// Returns the damage accumulated so far and resets it to nothing.
    pub fn take(&self) -> DamageRegion {
        std::mem::replace(&mut *self.pending.lock(), DamageRegion::None)
    }

    /// Records damage from outside the scene, for example an output mode
    /// change.
    pub fn damage(&self, region: &DamageRegion) {
        self.pending.lock().merge(region);
    }

    /// Returns `true` if nothing needs repainting.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.pending.lock().is_empty()
    }
}

impl fmt::Debug for DamageTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DamageTracker")
            .field("pending", &*self.pending.lock())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use strata_core::{InputReceptionMode, Observer, SceneGraph};

    use super::*;
    use crate::testing::{Quad, Window};

    #[test]
    fn merge_full_wins() {
        let mut region = DamageRegion::Rects(vec![Rect::new(0.0, 0.0, 1.0, 1.0)]);
        region.merge(&DamageRegion::Full);
        assert_eq!(region, DamageRegion::Full);

        let mut region = DamageRegion::Full;
        region.merge(&DamageRegion::None);
        assert_eq!(region, DamageRegion::Full);
    }

    #[test]
    fn merge_concatenates_rects() {
        let a = Rect::new(0.0, 0.0, 1.0, 1.0);
        let b = Rect::new(5.0, 5.0, 6.0, 6.0);
        let mut region = DamageRegion::None;
        region.merge(&DamageRegion::Rects(vec![a]));
        region.merge(&DamageRegion::None);
        region.merge(&DamageRegion::Rects(vec![b]));
        assert_eq!(region, DamageRegion::Rects(vec![a, b]));
    }

    #[test]
    fn add_rect_skips_empty_rects() {
        let mut region = DamageRegion::None;
        region.add_rect(Rect::new(3.0, 3.0, 3.0, 10.0));
        assert!(region.is_empty());
        region.add_rect(Rect::new(0.0, 0.0, 2.0, 2.0));
        assert_eq!(region, DamageRegion::Rects(vec![Rect::new(0.0, 0.0, 2.0, 2.0)]));
    }

    #[test]
    fn bounds_are_clipped_to_the_area() {
        let area = Rect::new(0.0, 0.0, 100.0, 100.0);
        let region = DamageRegion::Rects(vec![
            Rect::new(10.0, 10.0, 20.0, 20.0),
            Rect::new(90.0, 50.0, 150.0, 60.0),
        ]);
        assert_eq!(region.bounds(area), Some(Rect::new(10.0, 10.0, 100.0, 60.0)));
        assert_eq!(DamageRegion::Full.bounds(area), Some(area));
        assert_eq!(DamageRegion::None.bounds(area), None);

        let outside = DamageRegion::Rects(vec![Rect::new(200.0, 200.0, 210.0, 210.0)]);
        assert_eq!(outside.bounds(area), None);
    }

    #[test]
    fn tracker_collects_frames_and_escalates_on_structure() {
        let scene = SceneGraph::new();
        let tracker = DamageTracker::new();
        let observer: Arc<dyn Observer> = Arc::new(tracker.notification());
        scene.add_observer(&observer);

        // Nothing drawn yet.
        assert_eq!(tracker.take(), DamageRegion::Full);
        assert!(tracker.is_clean());

        let window = Window::new("term", Quad::opaque(Rect::new(10.0, 20.0, 110.0, 120.0)));
        scene.add_surface(Window::shared(&window), InputReceptionMode::Normal);
        assert_eq!(tracker.take(), DamageRegion::Full);

        window.post_frame(Rect::new(0.0, 0.0, 5.0, 5.0));
        window.post_frame(Rect::new(50.0, 50.0, 60.0, 60.0));
        assert_eq!(
            tracker.take(),
            DamageRegion::Rects(vec![
                Rect::new(10.0, 20.0, 15.0, 25.0),
                Rect::new(60.0, 70.0, 70.0, 80.0),
            ])
        );

        window.post_frame(Rect::new(0.0, 0.0, 5.0, 5.0));
        tracker.damage(&DamageRegion::Full);
        assert_eq!(tracker.take(), DamageRegion::Full);
        assert!(tracker.is_clean());
    }
}
