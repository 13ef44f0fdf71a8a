// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderReport`] implements [`SceneReport`] and encodes events into a
//! `Vec<u8>` as little-endian records, each a tag byte, a timestamp in
//! microseconds since the recorder was created, and the event payload.
//! [`decode`] reads them back as an iterator of [`RecordedEvent`].
//!
//! Surface names are stored with a `u32` length prefix; every other field
//! is fixed-size.

use std::time::Instant;

use parking_lot::Mutex;
use strata_core::{DepthLayer, RenderPassId, SceneReport, SurfaceKey};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_SURFACE_ADDED: u8 = 1;
const TAG_SURFACE_REMOVED: u8 = 2;
const TAG_SURFACES_REORDERED: u8 = 3;
const TAG_SESSION_LOCKED: u8 = 4;
const TAG_SESSION_UNLOCKED: u8 = 5;
const TAG_RENDER_PASS_REGISTERED: u8 = 6;
const TAG_RENDER_PASS_UNREGISTERED: u8 = 7;
const TAG_OVERLAY_ADDED: u8 = 8;
const TAG_OVERLAY_REMOVED: u8 = 9;

// ---------------------------------------------------------------------------
// RecorderReport
// ---------------------------------------------------------------------------

/// A [`SceneReport`] that encodes events into a compact binary buffer.
///
/// Share it with the scene as an `Arc<RecorderReport>`; the buffer is
/// guarded internally, so events from several threads interleave as whole
/// records.
#[derive(Debug)]
pub struct RecorderReport {
    start: Instant,
    buf: Mutex<Vec<u8>>,
}

impl Default for RecorderReport {
    fn default() -> Self {
        Self::new()
    }
}

impl RecorderReport {
    /// Creates an empty recorder. Timestamps count from now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            buf: Mutex::new(Vec::new()),
        }
    }

    /// Returns a copy of the bytes recorded so far.
    #[must_use]
    pub fn as_bytes(&self) -> Vec<u8> {
        self.buf.lock().clone()
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf.into_inner()
    }

    fn record(&self, tag: u8, payload: impl FnOnce(&mut Writer<'_>)) {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "u64 microseconds cover half a million years"
        )]
        let ts = self.start.elapsed().as_micros() as u64;
        let mut buf = self.buf.lock();
        let mut writer = Writer { buf: &mut buf };
        writer.u8(tag);
        writer.u64(ts);
        payload(&mut writer);
    }
}

// -- encoding helpers ------------------------------------------------------

struct Writer<'a> {
    buf: &'a mut Vec<u8>,
}

impl Writer<'_> {
    fn u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn count(&mut self, v: usize) {
        self.u32(u32::try_from(v).unwrap_or(u32::MAX));
    }

    fn key(&mut self, key: SurfaceKey) {
        self.u64(key.addr() as u64);
    }

    fn string(&mut self, s: &str) {
        self.count(s.len());
        let len = s.len().min(u32::MAX as usize);
        self.buf.extend_from_slice(&s.as_bytes()[..len]);
    }

    fn layer(&mut self, layer: DepthLayer) {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "tier indices are below DepthLayer::COUNT"
        )]
        self.u8(layer.index() as u8);
    }
}

impl SceneReport for RecorderReport {
    fn surface_added(&self, surface: SurfaceKey, name: &str, layer: DepthLayer) {
        self.record(TAG_SURFACE_ADDED, |w| {
            w.key(surface);
            w.layer(layer);
            w.string(name);
        });
    }

    fn surface_removed(&self, surface: SurfaceKey, name: &str) {
        self.record(TAG_SURFACE_REMOVED, |w| {
            w.key(surface);
            w.string(name);
        });
    }

    fn surfaces_reordered(&self, count: usize) {
        self.record(TAG_SURFACES_REORDERED, |w| w.count(count));
    }

    fn session_locked(&self) {
        self.record(TAG_SESSION_LOCKED, |_| {});
    }

    fn session_unlocked(&self) {
        self.record(TAG_SESSION_UNLOCKED, |_| {});
    }

    fn render_pass_registered(&self, pass: RenderPassId) {
        self.record(TAG_RENDER_PASS_REGISTERED, |w| w.u32(pass.0));
    }

    fn render_pass_unregistered(&self, pass: RenderPassId) {
        self.record(TAG_RENDER_PASS_UNREGISTERED, |w| w.u32(pass.0));
    }

    fn overlay_added(&self, total: usize) {
        self.record(TAG_OVERLAY_ADDED, |w| w.count(total));
    }

    fn overlay_removed(&self, total: usize) {
        self.record(TAG_OVERLAY_REMOVED, |w| w.count(total));
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedEvent {
    /// A surface joined the scene.
    SurfaceAdded {
        /// Microseconds since the recorder was created.
        ts: u64,
        /// Raw [`SurfaceKey`] address.
        surface: u64,
        /// Surface name at the time.
        name: String,
        /// Tier the surface was added to.
        layer: DepthLayer,
    },
    /// A surface left the scene.
    SurfaceRemoved {
        /// Microseconds since the recorder was created.
        ts: u64,
        /// Raw [`SurfaceKey`] address.
        surface: u64,
        /// Surface name at the time.
        name: String,
    },
    /// Surfaces changed stacking order.
    SurfacesReordered {
        /// Microseconds since the recorder was created.
        ts: u64,
        /// Number of surfaces involved.
        count: u32,
    },
    /// The session was locked.
    SessionLocked {
        /// Microseconds since the recorder was created.
        ts: u64,
    },
    /// The session was unlocked.
    SessionUnlocked {
        /// Microseconds since the recorder was created.
        ts: u64,
    },
    /// A render pass became active.
    RenderPassRegistered {
        /// Microseconds since the recorder was created.
        ts: u64,
        /// The pass.
        pass: RenderPassId,
    },
    /// A render pass stopped.
    RenderPassUnregistered {
        /// Microseconds since the recorder was created.
        ts: u64,
        /// The pass.
        pass: RenderPassId,
    },
    /// An overlay was added.
    OverlayAdded {
        /// Microseconds since the recorder was created.
        ts: u64,
        /// Overlay count afterwards.
        total: u32,
    },
    /// An overlay was removed.
    OverlayRemoved {
        /// Microseconds since the recorder was created.
        ts: u64,
        /// Overlay count afterwards.
        total: u32,
    },
}

impl RecordedEvent {
    /// Microseconds since the recorder was created.
    #[must_use]
    pub fn ts(&self) -> u64 {
        match self {
            Self::SurfaceAdded { ts, .. }
            | Self::SurfaceRemoved { ts, .. }
            | Self::SurfacesReordered { ts, .. }
            | Self::SessionLocked { ts }
            | Self::SessionUnlocked { ts }
            | Self::RenderPassRegistered { ts, .. }
            | Self::RenderPassUnregistered { ts, .. }
            | Self::OverlayAdded { ts, .. }
            | Self::OverlayRemoved { ts, .. } => *ts,
        }
    }
}

/// Decodes a byte slice produced by [`RecorderReport`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
///
/// Stops at the first unknown tag or truncated record.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn bytes(&mut self, len: usize) -> Option<&[u8]> {
        let end = self.pos.checked_add(len)?;
        let bytes = self.data.get(self.pos..end)?;
        self.pos = end;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        Some(self.bytes(1)?[0])
    }

    fn read_u32(&mut self) -> Option<u32> {
        Some(u32::from_le_bytes(self.bytes(4)?.try_into().ok()?))
    }

    fn read_u64(&mut self) -> Option<u64> {
        Some(u64::from_le_bytes(self.bytes(8)?.try_into().ok()?))
    }

    fn read_str(&mut self) -> Option<String> {
        let len = self.read_u32()? as usize;
        Some(String::from_utf8_lossy(self.bytes(len)?).into_owned())
    }

    fn read_layer(&mut self) -> Option<DepthLayer> {
        DepthLayer::from_index(usize::from(self.read_u8()?))
    }

    fn decode_surface_added(&mut self, ts: u64) -> Option<RecordedEvent> {
        Some(RecordedEvent::SurfaceAdded {
            ts,
            surface: self.read_u64()?,
            layer: self.read_layer()?,
            name: self.read_str()?,
        })
    }

    fn decode_surface_removed(&mut self, ts: u64) -> Option<RecordedEvent> {
        Some(RecordedEvent::SurfaceRemoved {
            ts,
            surface: self.read_u64()?,
            name: self.read_str()?,
        })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        let ts = self.read_u64()?;
        match tag {
            TAG_SURFACE_ADDED => self.decode_surface_added(ts),
            TAG_SURFACE_REMOVED => self.decode_surface_removed(ts),
            TAG_SURFACES_REORDERED => Some(RecordedEvent::SurfacesReordered {
                ts,
                count: self.read_u32()?,
            }),
            TAG_SESSION_LOCKED => Some(RecordedEvent::SessionLocked { ts }),
            TAG_SESSION_UNLOCKED => Some(RecordedEvent::SessionUnlocked { ts }),
            TAG_RENDER_PASS_REGISTERED => Some(RecordedEvent::RenderPassRegistered {
                ts,
                pass: RenderPassId(self.read_u32()?),
            }),
            TAG_RENDER_PASS_UNREGISTERED => Some(RecordedEvent::RenderPassUnregistered {
                ts,
                pass: RenderPassId(self.read_u32()?),
            }),
            TAG_OVERLAY_ADDED => Some(RecordedEvent::OverlayAdded {
                ts,
                total: self.read_u32()?,
            }),
            TAG_OVERLAY_REMOVED => Some(RecordedEvent::OverlayRemoved {
                ts,
                total: self.read_u32()?,
            }),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
