// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render plan: an ordered sequence of draw items for one render pass.

use std::fmt;

use kurbo::{Affine, Rect};
use strata_core::{RenderPassId, SceneElement, SceneGraph, SharedRenderable};

use crate::occlusion::filter_occlusions;

/// A single draw command in the render plan.
///
/// Items are produced in back-to-front order, matching the scene's stacking
/// order.
#[derive(Clone)]
pub struct RenderItem {
    /// The renderable to draw.
    pub renderable: SharedRenderable,
    /// Screen position, before `transformation`.
    pub screen_position: Rect,
    /// Opacity (0.0 to 1.0).
    pub alpha: f32,
    /// Transform applied around the renderable's position.
    pub transformation: Affine,
    /// Whether the item must be blended with what lies beneath it.
    pub blended: bool,
    /// Whether the item is an overlay rather than surface content.
    pub overlay: bool,
}

impl RenderItem {
    fn from_element(element: &SceneElement) -> Self {
        let renderable = element.renderable();
        let alpha = renderable.alpha();
        Self {
            renderable: renderable.clone(),
            screen_position: renderable.screen_position(),
            alpha,
            transformation: renderable.transformation(),
            blended: alpha < 1.0 || renderable.shaped(),
            overlay: element.is_overlay(),
        }
    }
}

impl fmt::Debug for RenderItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderItem")
            .field("screen_position", &self.screen_position)
            .field("alpha", &self.alpha)
            .field("transformation", &self.transformation)
            .field("blended", &self.blended)
            .field("overlay", &self.overlay)
            .finish_non_exhaustive()
    }
}

/// An ordered list of draw commands for a single render pass.
///
/// Backends translate this into native compositor operations or GPU draw
/// calls depending on their rendering strategy.
#[derive(Clone, Debug)]
pub struct RenderPlan {
    /// The render pass this plan is for.
    pub pass: RenderPassId,
    /// Draw items in back-to-front order.
    pub items: Vec<RenderItem>,
    /// How many elements were left out as occluded.
    pub occluded: usize,
}

impl RenderPlan {
    /// Creates an empty render plan for the given pass.
    #[must_use]
    pub fn new(pass: RenderPassId) -> Self {
        Self {
            pass,
            items: Vec::new(),
            occluded: 0,
        }
    }

    /// Builds the plan for `elements` within `area`.
    ///
    /// Every element is reported back to its surface: occluded elements
    /// through [`SceneElement::occluded`], painted ones through
    /// [`SceneElement::rendered`]. That is what drives each surface's
    /// [`Visibility`](strata_core::Visibility).
    #[must_use]
    pub fn build(pass: RenderPassId, elements: Vec<SceneElement>, area: Rect) -> Self {
        let (visible, occluded) = filter_occlusions(elements, area);
        for element in &occluded {
            element.occluded();
        }
        let items = visible
            .iter()
            .map(|element| {
                element.rendered();
                RenderItem::from_element(element)
            })
            .collect::<Vec<_>>();
        tracing::trace!(
            ?pass,
            items = items.len(),
            occluded = occluded.len(),
            "render plan built"
        );
        Self {
            pass,
            items,
            occluded: occluded.len(),
        }
    }

    /// Pulls this frame's elements for `pass` from `scene` and builds the
    /// plan from them.
    #[must_use]
    pub fn for_scene(scene: &SceneGraph, pass: RenderPassId, area: Rect) -> Self {
        Self::build(pass, scene.scene_elements_for(pass), area)
    }

    /// Clears the plan for reuse.
    pub fn clear(&mut self) {
        self.items.clear();
        self.occluded = 0;
    }
}

#[cfg(test)]
mod tests {
    use strata_core::{InputReceptionMode, Visibility};

    use super::*;
    use crate::testing::{Quad, Window};

    const SCREEN: Rect = Rect::new(0.0, 0.0, 1000.0, 1000.0);

    #[test]
    fn plan_reports_visibility_back_to_surfaces() {
        let pass = RenderPassId(7);
        let scene = SceneGraph::new();
        scene.register_compositor(pass);

        let hidden = Window::new("hidden", Quad::opaque(Rect::new(10.0, 10.0, 50.0, 50.0)));
        let shown = Window::new("shown", Quad::opaque(Rect::new(0.0, 0.0, 500.0, 500.0)));
        scene.add_surface(Window::shared(&hidden), InputReceptionMode::Normal);
        scene.add_surface(Window::shared(&shown), InputReceptionMode::Normal);

        let plan = RenderPlan::for_scene(&scene, pass, SCREEN);
        assert_eq!(plan.pass, pass);
        assert_eq!(plan.items.len(), 1);
        assert_eq!(plan.occluded, 1);
        assert!(!plan.items[0].blended);

        assert_eq!(hidden.visibility_pushes().last(), Some(&Visibility::Occluded));
        assert_eq!(shown.visibility_pushes().last(), Some(&Visibility::Exposed));
    }

    #[test]
    fn overlays_are_painted_last_and_blended() {
        let pass = RenderPassId(1);
        let scene = SceneGraph::new();
        let window = Window::new("w", Quad::opaque(Rect::new(0.0, 0.0, 100.0, 100.0)));
        scene.add_surface(Window::shared(&window), InputReceptionMode::Normal);
        scene.add_input_visualization(
            Quad {
                alpha: 0.5,
                ..Quad::opaque(Rect::new(40.0, 40.0, 44.0, 44.0))
            }
            .shared(),
        );

        let plan = RenderPlan::for_scene(&scene, pass, SCREEN);
        assert_eq!(plan.items.len(), 2);
        assert!(!plan.items[0].overlay);
        assert!(plan.items[1].overlay);
        assert!(plan.items[1].blended);
    }

    #[test]
    fn clear_keeps_the_pass() {
        let mut plan = RenderPlan::build(RenderPassId(3), Vec::new(), SCREEN);
        assert!(plan.items.is_empty());
        plan.occluded = 2;
        plan.clear();
        assert_eq!(plan.pass, RenderPassId(3));
        assert_eq!(plan.occluded, 0);
        assert!(RenderPlan::new(RenderPassId(3)).items.is_empty());
    }
}
