// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structured instrumentation for scene lifecycle events.
//!
//! [`SceneReport`] has one method per event, all defaulting to no-ops, so a
//! report only implements what it records. The scene graph calls it after
//! releasing its own lock. Free-form diagnostics go through `tracing`
//! instead; a report is for consumers that want the events as data (see the
//! `strata_debug` crate for a recorder, a Chrome trace exporter and a
//! pretty-printer).

use crate::depth::DepthLayer;
use crate::id::{RenderPassId, SurfaceKey};

/// Receives scene lifecycle events.
pub trait SceneReport: Send + Sync {
    /// A surface joined the scene in `layer`.
    fn surface_added(&self, surface: SurfaceKey, name: &str, layer: DepthLayer) {
        _ = (surface, name, layer);
    }

    /// A surface left the scene.
    fn surface_removed(&self, surface: SurfaceKey, name: &str) {
        _ = (surface, name);
    }

    /// `count` surfaces changed stacking order.
    fn surfaces_reordered(&self, count: usize) {
        _ = count;
    }

    /// The session was locked.
    fn session_locked(&self) {}

    /// The session was unlocked.
    fn session_unlocked(&self) {}

    /// A render pass became active.
    fn render_pass_registered(&self, pass: RenderPassId) {
        _ = pass;
    }

    /// A render pass stopped.
    fn render_pass_unregistered(&self, pass: RenderPassId) {
        _ = pass;
    }

    /// An overlay was added. `total` is the overlay count afterwards.
    fn overlay_added(&self, total: usize) {
        _ = total;
    }

    /// An overlay was removed. `total` is the overlay count afterwards.
    fn overlay_removed(&self, total: usize) {
        _ = total;
    }
}

/// A report that discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullReport;

impl SceneReport for NullReport {}
