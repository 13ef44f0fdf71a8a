// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable scene event output.
//!
//! [`PrettyReport`] implements [`SceneReport`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Write errors
//! are ignored.

use std::io::Write;

use parking_lot::Mutex;
use strata_core::{DepthLayer, RenderPassId, SceneReport, SurfaceKey};

/// Writes human-readable event lines to a [`Write`](std::io::Write) destination.
pub struct PrettyReport<W: Write + Send = Box<dyn Write + Send>> {
    writer: Mutex<W>,
}

impl<W: Write + Send> std::fmt::Debug for PrettyReport<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyReport").finish_non_exhaustive()
    }
}

impl PrettyReport {
    /// Creates a report that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a report that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }
}

impl<W: Write + Send> PrettyReport<W> {
    /// Creates a report that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the report and returns its writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn line(&self, args: std::fmt::Arguments<'_>) {
        let _ = writeln!(self.writer.lock(), "{args}");
    }
}

impl<W: Write + Send> SceneReport for PrettyReport<W> {
    fn surface_added(&self, surface: SurfaceKey, name: &str, layer: DepthLayer) {
        self.line(format_args!(
            "[surface:add] {:#x} \"{name}\" layer={layer:?}",
            surface.addr()
        ));
    }

    fn surface_removed(&self, surface: SurfaceKey, name: &str) {
        self.line(format_args!(
            "[surface:remove] {:#x} \"{name}\"",
            surface.addr()
        ));
    }

    fn surfaces_reordered(&self, count: usize) {
        self.line(format_args!("[reorder] surfaces={count}"));
    }

    fn session_locked(&self) {
        self.line(format_args!("[session] locked"));
    }

    fn session_unlocked(&self) {
        self.line(format_args!("[session] unlocked"));
    }

    fn render_pass_registered(&self, pass: RenderPassId) {
        self.line(format_args!("[pass:register] id={}", pass.0));
    }

    fn render_pass_unregistered(&self, pass: RenderPassId) {
        self.line(format_args!("[pass:unregister] id={}", pass.0));
    }

    fn overlay_added(&self, total: usize) {
        self.line(format_args!("[overlay:add] total={total}"));
    }

    fn overlay_removed(&self, total: usize) {
        self.line(format_args!("[overlay:remove] total={total}"));
    }
}
