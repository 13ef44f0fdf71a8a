// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Occlusion filtering of a frame's scene elements.

use kurbo::{Affine, Rect};
use strata_core::{Renderable, SceneElement};

/// Splits `elements` (bottom to top) into those worth painting within `area`
/// and those that would not contribute a single pixel.
///
/// Elements are visited top to bottom. An element is occluded if its screen
/// position lies entirely outside `area`, or if its clipped position is fully
/// covered by a single opaque element above it. Opaque means full alpha, no
/// shape and an identity transformation. Elements with any other
/// transformation are never considered occluded and never cover anything.
///
/// Both returned lists keep the bottom-to-top order of the input.
#[must_use]
pub fn filter_occlusions(
    elements: Vec<SceneElement>,
    area: Rect,
) -> (Vec<SceneElement>, Vec<SceneElement>) {
    let mut coverage: Vec<Rect> = Vec::new();
    let mut visible = Vec::with_capacity(elements.len());
    let mut occluded = Vec::new();
    for element in elements.into_iter().rev() {
        if is_occluded(&**element.renderable(), area, &mut coverage) {
            occluded.push(element);
        } else {
            visible.push(element);
        }
    }
    visible.reverse();
    occluded.reverse();
    (visible, occluded)
}

fn is_occluded(renderable: &dyn Renderable, area: Rect, coverage: &mut Vec<Rect>) -> bool {
    if renderable.transformation() != Affine::IDENTITY {
        return false;
    }
    let clipped = renderable.screen_position().intersect(area);
    if clipped.area() <= 0.0 {
        return true;
    }
    if coverage.iter().any(|cover| contains(*cover, clipped)) {
        return true;
    }
    if renderable.alpha() >= 1.0 && !renderable.shaped() {
        coverage.push(clipped);
    }
    false
}

fn contains(outer: Rect, inner: Rect) -> bool {
    outer.x0 <= inner.x0 && outer.y0 <= inner.y0 && outer.x1 >= inner.x1 && outer.y1 >= inner.y1
}
