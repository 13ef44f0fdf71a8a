// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene graph, stacking order and occlusion tracking for a display-server
//! compositor.
//!
//! `strata_core` decides *what is on screen, in what order, and whether it is
//! actually visible*. Surfaces, renderables and the render pipeline are
//! external collaborators reached through the traits in [`surface`].
//!
//! # Architecture
//!
//! ```text
//!   client requests ──► SceneGraph ◄── window-management policy
//!                          │  ▲
//!          ┌───────────────┘  └──────────────┐
//!          ▼                                 │
//!   scene_elements_for(pass) ──► SceneElement::rendered / occluded
//!                                            │
//!                                            ▼
//!                                   RenderingTracker ──► Surface::configure
//! ```
//!
//! **[`depth`]** — The closed set of stacking tiers and their dense index.
//!
//! **[`tracker`]** — Per-surface occlusion bookkeeping across every active
//! render pass.
//!
//! **[`observer`]** — Weakly-held subscriber fan-out that tolerates
//! registration changes from inside a callback.
//!
//! **[`notify`]** — Adapter that folds fine-grained surface callbacks into
//! "recomposite" and "damaged rectangle" signals.
//!
//! **[`scene`]** — The [`SceneGraph`] itself: layered Z-order lists,
//! overlays, active render passes and the session lock.
//!
//! **[`report`]** — [`SceneReport`](report::SceneReport) instrumentation hook
//! with no-op defaults.
//!
//! # Locking
//!
//! The graph keeps its state behind a single reader-writer lock and never
//! calls out to surface or observer code while holding it for writing. Calls
//! that re-enter the graph from a surface callback the graph itself is
//! dispatching are queued and applied as soon as the outer call returns.

pub mod depth;
pub mod element;
pub mod error;
pub mod id;
pub mod notify;
pub mod observer;
pub mod report;
pub mod scene;
pub mod surface;
pub mod tracker;

#[cfg(test)]
mod testing;

pub use kurbo;

pub use depth::DepthLayer;
pub use element::SceneElement;
pub use error::SceneError;
pub use id::{RenderPassId, SurfaceKey};
pub use notify::{SceneChangeNotification, SurfaceChangeNotification};
pub use observer::{Observer, ObserverMultiplexer, SessionLockObserver};
pub use report::{NullReport, SceneReport};
pub use scene::SceneGraph;
pub use surface::{
    InputReceptionMode, Renderable, SharedRenderable, SharedSurface, Surface, SurfaceAttrib,
    SurfaceObserver, SurfaceSet, Visibility,
};
pub use tracker::RenderingTracker;
