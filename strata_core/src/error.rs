// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contract-violation errors.
//!
//! Every variant is a programmer error surfaced at the call site. None are
//! retried, and none leave a partial mutation behind: the operation either
//! completes or fails before touching scene state.

use thiserror::Error;

use crate::id::RenderPassId;

/// Errors reported by the scene graph and rendering trackers.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    /// The surface is not present in the scene.
    #[error("invalid surface: not present in the scene")]
    UnknownSurface,
    /// The overlay was never added, or has already been removed.
    #[error("attempt to remove an overlay which was never added or which has been previously removed")]
    UnknownOverlay,
    /// A tracker call named a render pass outside the active set.
    #[error("no active compositor with supplied id {0:?}")]
    InactiveRenderPass(RenderPassId),
    /// `remove_observer` was called after the subscriber was destroyed.
    #[error("invalid observer (destroyed)")]
    ExpiredObserver,
}
