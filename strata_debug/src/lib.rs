// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and Chrome trace export for strata scene
//! reports.
//!
//! This crate provides [`SceneReport`](strata_core::SceneReport)
//! implementations for development and post-mortem analysis. Install one
//! with [`SceneGraph::with_report`](strata_core::SceneGraph::with_report).
//!
//! - [`pretty::PrettyReport`] — human-readable one-line-per-event output.
//! - [`recorder::RecorderReport`] — compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`chrome::export`] — writes Chrome Trace Event Format JSON from recorded
//!   bytes.

pub mod chrome;
pub mod pretty;
pub mod recorder;

#[cfg(test)]
mod testing;
