// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::{Arc, Weak};

use strata_core::kurbo::{Point, Rect, Size};
use strata_core::{
    DepthLayer, RenderPassId, SharedRenderable, Surface, SurfaceAttrib, SurfaceObserver,
};

/// A surface that is nothing but a name.
pub(crate) struct Named {
    name: String,
}

impl Named {
    pub(crate) fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_owned(),
        })
    }
}

impl Surface for Named {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn visible(&self) -> bool {
        true
    }

    fn depth_layer(&self) -> DepthLayer {
        DepthLayer::Application
    }

    fn top_left(&self) -> Point {
        Point::ZERO
    }

    fn size(&self) -> Size {
        Size::new(10.0, 10.0)
    }

    fn input_area_contains(&self, point: Point) -> bool {
        Rect::from_origin_size(Point::ZERO, self.size()).contains(point)
    }

    fn generate_renderables(&self, _pass: RenderPassId) -> Vec<SharedRenderable> {
        Vec::new()
    }

    fn configure(&self, _attrib: SurfaceAttrib) {}

    fn register_interest(&self, _observer: Weak<dyn SurfaceObserver>) {}

    fn unregister_interest(&self, _observer: &dyn SurfaceObserver) {}
}
