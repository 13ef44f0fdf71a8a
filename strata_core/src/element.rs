// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame paintable units handed to a render pass.

use std::fmt;
use std::sync::{Arc, Weak};

use crate::id::RenderPassId;
use crate::surface::SharedRenderable;
use crate::tracker::RenderingTracker;

/// One renderable produced for one render pass, plus the path back to the
/// owning surface's [`RenderingTracker`].
///
/// Elements are built fresh by every
/// [`scene_elements_for`](crate::SceneGraph::scene_elements_for) call and are
/// not meant to be stored across frames. The tracker is held weakly, so an
/// element outliving its surface's removal reports into nothing.
#[derive(Clone)]
pub struct SceneElement {
    renderable: SharedRenderable,
    tracker: Option<Weak<RenderingTracker>>,
    pass: RenderPassId,
}

impl SceneElement {
    pub(crate) fn tracked(
        renderable: SharedRenderable,
        tracker: &Arc<RenderingTracker>,
        pass: RenderPassId,
    ) -> Self {
        Self {
            renderable,
            tracker: Some(Arc::downgrade(tracker)),
            pass,
        }
    }

    pub(crate) fn overlay(renderable: SharedRenderable, pass: RenderPassId) -> Self {
        Self {
            renderable,
            tracker: None,
            pass,
        }
    }

    /// The renderable to paint.
    #[inline]
    #[must_use]
    pub fn renderable(&self) -> &SharedRenderable {
        &self.renderable
    }

    /// The render pass this element was produced for.
    #[inline]
    #[must_use]
    pub fn render_pass(&self) -> RenderPassId {
        self.pass
    }

    /// Returns `true` for overlay elements, which belong to no surface.
    #[inline]
    #[must_use]
    pub fn is_overlay(&self) -> bool {
        self.tracker.is_none()
    }

    /// The owning surface's tracker, if the surface is still in the scene.
    #[must_use]
    pub fn tracker(&self) -> Option<Arc<RenderingTracker>> {
        self.tracker.as_ref().and_then(Weak::upgrade)
    }

    /// Reports that the render pass drew this element.
    pub fn rendered(&self) {
        if let Some(tracker) = self.tracker()
            && let Err(err) = tracker.rendered_in(self.pass)
        {
            tracing::debug!(%err, "dropping rendered report");
        }
    }

    /// Reports that the render pass found this element fully occluded.
    pub fn occluded(&self) {
        if let Some(tracker) = self.tracker()
            && let Err(err) = tracker.occluded_in(self.pass)
        {
            tracing::debug!(%err, "dropping occluded report");
        }
    }
}

impl fmt::Debug for SceneElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneElement")
            .field("screen_position", &self.renderable.screen_position())
            .field("pass", &self.pass)
            .field("overlay", &self.is_overlay())
            .finish_non_exhaustive()
    }
}
