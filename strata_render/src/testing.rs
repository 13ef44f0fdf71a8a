// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal surfaces and renderables for driving a real scene in tests.

use std::ptr;
use std::sync::{Arc, Weak};

use kurbo::{Affine, Point, Rect, Size};
use parking_lot::Mutex;
use strata_core::{
    DepthLayer, RenderPassId, Renderable, SharedRenderable, SharedSurface, Surface,
    SurfaceAttrib, SurfaceObserver, Visibility,
};

#[derive(Debug)]
pub(crate) struct Quad {
    pub(crate) rect: Rect,
    pub(crate) alpha: f32,
    pub(crate) shaped: bool,
    pub(crate) transformation: Affine,
}

impl Quad {
    pub(crate) fn opaque(rect: Rect) -> Self {
        Self {
            rect,
            alpha: 1.0,
            shaped: false,
            transformation: Affine::IDENTITY,
        }
    }

    pub(crate) fn shared(self) -> SharedRenderable {
        Arc::new(self)
    }
}

impl Renderable for Quad {
    fn screen_position(&self) -> Rect {
        self.rect
    }

    fn alpha(&self) -> f32 {
        self.alpha
    }

    fn shaped(&self) -> bool {
        self.shaped
    }

    fn transformation(&self) -> Affine {
        self.transformation
    }
}

/// A surface painting exactly one renderable.
pub(crate) struct Window {
    name: String,
    quad: SharedRenderable,
    observers: Mutex<Vec<Weak<dyn SurfaceObserver>>>,
    pushed: Mutex<Vec<Visibility>>,
}

impl Window {
    pub(crate) fn new(name: &str, quad: Quad) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_owned(),
            quad: quad.shared(),
            observers: Mutex::new(Vec::new()),
            pushed: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn shared(this: &Arc<Self>) -> SharedSurface {
        this.clone()
    }

    pub(crate) fn visibility_pushes(&self) -> Vec<Visibility> {
        self.pushed.lock().clone()
    }

    pub(crate) fn post_frame(&self, damage: Rect) {
        let observers: Vec<_> = self.observers.lock().iter().filter_map(Weak::upgrade).collect();
        for observer in observers {
            observer.frame_posted(self, damage);
        }
    }
}

impl Surface for Window {
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
        self.quad.screen_position().origin()
    }

    fn size(&self) -> Size {
        self.quad.screen_position().size()
    }

    fn input_area_contains(&self, point: Point) -> bool {
        self.quad.screen_position().contains(point)
    }

    fn generate_renderables(&self, _pass: RenderPassId) -> Vec<SharedRenderable> {
        vec![self.quad.clone()]
    }

    fn configure(&self, attrib: SurfaceAttrib) {
        let SurfaceAttrib::Visibility(visibility) = attrib;
        self.pushed.lock().push(visibility);
    }

    fn register_interest(&self, observer: Weak<dyn SurfaceObserver>) {
        self.observers.lock().push(observer);
    }

    fn unregister_interest(&self, observer: &dyn SurfaceObserver) {
        self.observers
            .lock()
            .retain(|weak| !ptr::addr_eq(weak.as_ptr(), ptr::from_ref(observer)));
    }
}
