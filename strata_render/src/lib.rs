// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render-side consumers of the strata scene graph.
//!
//! This crate sits between [`strata_core`]'s [`SceneGraph`] and a backend
//! that actually draws. It provides:
//!
//! - [`filter_occlusions`] — splits a frame's scene elements into what must be
//!   painted and what is hidden behind opaque content
//! - [`RenderItem`] — a single draw command in the render plan
//! - [`RenderPlan`] — an ordered list of draw commands for one render pass,
//!   built from the scene and reporting visibility back to every surface
//! - [`DamageRegion`] — spatial damage for partial re-rendering
//! - [`DamageTracker`] — accumulates damage from scene change notifications
//!   between frames
//!
//! [`SceneGraph`]: strata_core::SceneGraph

mod damage;
mod occlusion;
mod plan;

#[cfg(test)]
mod testing;

pub use damage::{DamageRegion, DamageTracker};
pub use occlusion::filter_occlusions;
pub use plan::{RenderItem, RenderPlan};
