// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-surface occlusion bookkeeping.
//!
//! Each surface in the scene owns one [`RenderingTracker`]. Render passes
//! report their per-frame outcome for the surface (`rendered_in` /
//! `occluded_in`), and the tracker folds those reports into a single
//! [`Visibility`] pushed to the surface: `Occluded` only once *every* active
//! render pass has reported occlusion, `Exposed` as soon as any one of them
//! renders it again.
//!
//! Pushes happen only on an edge, and never while the tracker's state lock is
//! held, so a surface may react to a visibility change by calling straight
//! back into its tracker.

use std::cell::Cell;
use std::collections::HashSet;
use std::fmt;
use std::sync::Weak;

use parking_lot::{Mutex, ReentrantMutex};

use crate::error::SceneError;
use crate::id::RenderPassId;
use crate::surface::{Surface, SurfaceAttrib, Visibility};

#[derive(Debug, Default)]
struct TrackerState {
    active: HashSet<RenderPassId>,
    /// Always a subset of `active`.
    occluded: HashSet<RenderPassId>,
}

impl TrackerState {
    fn check_active(&self, id: RenderPassId) -> Result<(), SceneError> {
        if self.active.contains(&id) {
            Ok(())
        } else {
            Err(SceneError::InactiveRenderPass(id))
        }
    }

    fn visibility(&self) -> Visibility {
        if self.occluded == self.active {
            Visibility::Occluded
        } else {
            Visibility::Exposed
        }
    }
}

/// Aggregates per-render-pass occlusion reports for one surface.
pub struct RenderingTracker {
    surface: Weak<dyn Surface>,
    state: Mutex<TrackerState>,
    /// Last visibility pushed to the surface. Held while pushing, so pushes
    /// for one surface are serialised and the last one wins.
    pushed: ReentrantMutex<Cell<Option<Visibility>>>,
}

impl RenderingTracker {
    /// Creates a tracker for `surface` with no active render passes.
    ///
    /// Nothing is pushed until the first state change.
    #[must_use]
    pub fn new(surface: Weak<dyn Surface>) -> Self {
        Self {
            surface,
            state: Mutex::new(TrackerState::default()),
            pushed: ReentrantMutex::new(Cell::new(None)),
        }
    }

    /// Records that render pass `id` drew the surface this frame.
    ///
    /// # Errors
    ///
    /// [`SceneError::InactiveRenderPass`] if `id` is not an active pass.
    pub fn rendered_in(&self, id: RenderPassId) -> Result<(), SceneError> {
        {
            let mut state = self.state.lock();
            state.check_active(id)?;
            state.occluded.remove(&id);
        }
        self.settle();
        Ok(())
    }

    /// Records that render pass `id` found the surface fully occluded.
    ///
    /// # Errors
    ///
    /// [`SceneError::InactiveRenderPass`] if `id` is not an active pass.
    pub fn occluded_in(&self, id: RenderPassId) -> Result<(), SceneError> {
        {
            let mut state = self.state.lock();
            state.check_active(id)?;
            state.occluded.insert(id);
        }
        self.settle();
        Ok(())
    }

    /// Replaces the set of active render passes.
    ///
    /// Occlusion reports from passes that are no longer active are dropped.
    pub fn active_compositors(&self, active: &HashSet<RenderPassId>) {
        self.seed(active);
        self.settle();
    }

    /// Returns whether the surface is exposed to render pass `id`.
    ///
    /// # Errors
    ///
    /// [`SceneError::InactiveRenderPass`] if `id` is not an active pass.
    pub fn is_exposed_in(&self, id: RenderPassId) -> Result<bool, SceneError> {
        let state = self.state.lock();
        state.check_active(id)?;
        Ok(!state.occluded.contains(&id))
    }

    /// Returns the aggregate visibility over every active render pass.
    #[must_use]
    pub fn visibility(&self) -> Visibility {
        self.state.lock().visibility()
    }

    /// Replaces the active set without pushing. Callers follow up with
    /// [`settle`](Self::settle) once they no longer hold their own locks.
    pub(crate) fn seed(&self, active: &HashSet<RenderPassId>) {
        let mut state = self.state.lock();
        state.active.clone_from(active);
        state.occluded.retain(|id| active.contains(id));
    }

    /// Pushes the current aggregate visibility if it differs from the last
    /// one pushed.
    pub(crate) fn settle(&self) {
        let Some(surface) = self.surface.upgrade() else {
            return;
        };
        let pushed = self.pushed.lock();
        loop {
            let wanted = self.state.lock().visibility();
            if pushed.get() == Some(wanted) {
                return;
            }
            pushed.set(Some(wanted));
            surface.configure(SurfaceAttrib::Visibility(wanted));
        }
    }
}

impl fmt::Debug for RenderingTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("RenderingTracker")
            .field("active", &state.active)
            .field("occluded", &state.occluded)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::depth::DepthLayer;
    use crate::testing::StubSurface;

    const A: RenderPassId = RenderPassId(1);
    const B: RenderPassId = RenderPassId(2);

    fn tracked(passes: &[RenderPassId]) -> (Arc<StubSurface>, RenderingTracker) {
        let surface = StubSurface::new("s", DepthLayer::Application);
        let weak: Weak<dyn Surface> = Arc::downgrade(&StubSurface::shared(&surface));
        let tracker = RenderingTracker::new(weak);
        tracker.active_compositors(&passes.iter().copied().collect());
        (surface, tracker)
    }

    #[test]
    fn exposed_right_after_activation() {
        let (surface, tracker) = tracked(&[A, B]);
        assert_eq!(tracker.is_exposed_in(A), Ok(true));
        assert_eq!(tracker.is_exposed_in(B), Ok(true));
        assert_eq!(surface.visibility_pushes(), [Visibility::Exposed]);
    }

    #[test]
    fn occluded_only_once_every_pass_agrees() {
        let (surface, tracker) = tracked(&[A, B]);

        tracker.occluded_in(A).unwrap();
        assert_eq!(tracker.visibility(), Visibility::Exposed);
        assert_eq!(tracker.is_exposed_in(A), Ok(false));
        assert_eq!(tracker.is_exposed_in(B), Ok(true));

        tracker.occluded_in(B).unwrap();
        assert_eq!(tracker.visibility(), Visibility::Occluded);
        assert_eq!(
            surface.visibility_pushes(),
            [Visibility::Exposed, Visibility::Occluded]
        );

        tracker.rendered_in(B).unwrap();
        assert_eq!(tracker.is_exposed_in(B), Ok(true));
        assert_eq!(
            surface.visibility_pushes(),
            [Visibility::Exposed, Visibility::Occluded, Visibility::Exposed]
        );
    }

    #[test]
    fn repeated_reports_push_nothing_new() {
        let (surface, tracker) = tracked(&[A]);
        tracker.occluded_in(A).unwrap();
        tracker.occluded_in(A).unwrap();
        tracker.rendered_in(A).unwrap();
        tracker.rendered_in(A).unwrap();
        assert_eq!(
            surface.visibility_pushes(),
            [Visibility::Exposed, Visibility::Occluded, Visibility::Exposed]
        );
    }

    #[test]
    fn inactive_pass_is_rejected() {
        let (_surface, tracker) = tracked(&[A]);
        assert_eq!(tracker.rendered_in(B), Err(SceneError::InactiveRenderPass(B)));
        assert_eq!(tracker.occluded_in(B), Err(SceneError::InactiveRenderPass(B)));
        assert_eq!(tracker.is_exposed_in(B), Err(SceneError::InactiveRenderPass(B)));
    }

    #[test]
    fn deactivation_drops_stale_occlusion() {
        let (surface, tracker) = tracked(&[A, B]);
        tracker.occluded_in(A).unwrap();

        // Only A is left, and A already reported occlusion.
        tracker.active_compositors(&[A].into_iter().collect());
        assert_eq!(tracker.visibility(), Visibility::Occluded);

        // B comes back without its old report.
        tracker.active_compositors(&[A, B].into_iter().collect());
        assert_eq!(tracker.is_exposed_in(B), Ok(true));
        assert_eq!(
            surface.visibility_pushes(),
            [Visibility::Exposed, Visibility::Occluded, Visibility::Exposed]
        );
    }

    #[test]
    fn expired_surface_is_not_pushed_to() {
        let (surface, tracker) = tracked(&[A]);
        drop(surface);
        tracker.occluded_in(A).unwrap();
        assert_eq!(tracker.visibility(), Visibility::Occluded);
    }

    #[test]
    fn concurrent_reports_settle_on_final_state() {
        let (surface, tracker) = tracked(&[A, B]);
        std::thread::scope(|s| {
            s.spawn(|| {
                for _ in 0..200 {
                    tracker.occluded_in(A).unwrap();
                }
            });
            s.spawn(|| {
                for _ in 0..200 {
                    tracker.occluded_in(B).unwrap();
                }
            });
        });
        assert_eq!(tracker.visibility(), Visibility::Occluded);
        assert_eq!(surface.visibility_pushes().last(), Some(&Visibility::Occluded));
    }
}
