// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderReport`](super::recorder::RecorderReport)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Every scene event becomes an instant event. Surface membership events are
/// scoped to a per-surface track (`tid` is the surface key) so a surface's
/// lifetime reads as one row; everything else is global.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let events: Vec<Value> = decode(bytes).map(|recorded| to_json(&recorded)).collect();
    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn to_json(recorded: &RecordedEvent) -> Value {
    let ts = recorded.ts();
    match recorded {
        RecordedEvent::SurfaceAdded {
            surface,
            name,
            layer,
            ..
        } => json!({
            "ph": "i",
            "name": "SurfaceAdded",
            "cat": "Surface",
            "ts": ts,
            "pid": 0,
            "tid": surface,
            "s": "t",
            "args": {
                "name": name,
                "layer": format!("{layer:?}"),
            }
        }),
        RecordedEvent::SurfaceRemoved { surface, name, .. } => json!({
            "ph": "i",
            "name": "SurfaceRemoved",
            "cat": "Surface",
            "ts": ts,
            "pid": 0,
            "tid": surface,
            "s": "t",
            "args": {
                "name": name,
            }
        }),
        RecordedEvent::SurfacesReordered { count, .. } => global(
            "SurfacesReordered",
            "Stacking",
            ts,
            json!({ "count": count }),
        ),
        RecordedEvent::SessionLocked { .. } => global("SessionLocked", "Session", ts, json!({})),
        RecordedEvent::SessionUnlocked { .. } => {
            global("SessionUnlocked", "Session", ts, json!({}))
        }
        RecordedEvent::RenderPassRegistered { pass, .. } => global(
            "RenderPassRegistered",
            "RenderPass",
            ts,
            json!({ "pass": pass.0 }),
        ),
        RecordedEvent::RenderPassUnregistered { pass, .. } => global(
            "RenderPassUnregistered",
            "RenderPass",
            ts,
            json!({ "pass": pass.0 }),
        ),
        RecordedEvent::OverlayAdded { total, .. } => {
            global("OverlayAdded", "Overlay", ts, json!({ "total": total }))
        }
        RecordedEvent::OverlayRemoved { total, .. } => {
            global("OverlayRemoved", "Overlay", ts, json!({ "total": total }))
        }
    }
}

fn global(name: &str, cat: &str, ts: u64, args: Value) -> Value {
    json!({
        "ph": "i",
        "name": name,
        "cat": cat,
        "ts": ts,
        "pid": 0,
        "tid": 0,
        "s": "g",
        "args": args,
    })
}

#[cfg(test)]
mod tests {
    use strata_core::{DepthLayer, RenderPassId, SceneReport, SurfaceKey};

    use super::*;
    use crate::recorder::RecorderReport;
    use crate::testing::Named;

    #[test]
    fn export_produces_valid_json() {
        let rec = RecorderReport::new();
        let surface = Named::new("panel");
        let key = SurfaceKey::of(&*surface);
        rec.render_pass_registered(RenderPassId(2));
        rec.surface_added(key, "panel", DepthLayer::Above);
        rec.session_locked();

        let mut out = Vec::new();
        export(&rec.into_bytes(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        // Should parse as a JSON array.
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 3);

        assert_eq!(parsed[0]["name"], "RenderPassRegistered");
        assert_eq!(parsed[0]["s"], "g");
        assert_eq!(parsed[0]["args"]["pass"], 2);

        // Surface events live on the surface's own track.
        assert_eq!(parsed[1]["ph"], "i");
        assert_eq!(parsed[1]["name"], "SurfaceAdded");
        assert_eq!(parsed[1]["tid"], key.addr() as u64);
        assert_eq!(parsed[1]["args"]["name"], "panel");
        assert_eq!(parsed[1]["args"]["layer"], "Above");

        assert_eq!(parsed[2]["name"], "SessionLocked");
        assert_eq!(parsed[2]["cat"], "Session");
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
