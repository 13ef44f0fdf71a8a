// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hand-written test doubles shared by the unit tests.

use std::ptr;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Weak};

use kurbo::{Point, Rect, Size};
use parking_lot::Mutex;

use crate::depth::DepthLayer;
use crate::id::RenderPassId;
use crate::surface::{
    InputReceptionMode, Renderable, SharedRenderable, SharedSurface, Surface, SurfaceAttrib,
    SurfaceObserver, Visibility,
};

pub(crate) struct StubRenderable {
    rect: Rect,
}

impl StubRenderable {
    pub(crate) fn new(rect: Rect) -> SharedRenderable {
        Arc::new(Self { rect })
    }
}

impl Renderable for StubRenderable {
    fn screen_position(&self) -> Rect {
        self.rect
    }
}

type Hook = Box<dyn Fn(&StubSurface) + Send + Sync>;

/// A surface that records what the scene graph does to it.
pub(crate) struct StubSurface {
    name: String,
    layer: Mutex<DepthLayer>,
    visible: AtomicBool,
    on_lock_screen: AtomicBool,
    top_left: Mutex<Point>,
    size: Mutex<Size>,
    renderable: SharedRenderable,
    buffers: AtomicU32,
    configured: Mutex<Vec<SurfaceAttrib>>,
    reception: Mutex<Option<InputReceptionMode>>,
    observers: Mutex<Vec<Weak<dyn SurfaceObserver>>>,
    on_generate: Mutex<Option<Hook>>,
}

impl StubSurface {
    pub(crate) fn new(name: &str, layer: DepthLayer) -> Arc<Self> {
        let size = Size::new(100.0, 100.0);
        Arc::new(Self {
            name: name.to_owned(),
            layer: Mutex::new(layer),
            visible: AtomicBool::new(true),
            on_lock_screen: AtomicBool::new(false),
            top_left: Mutex::new(Point::ORIGIN),
            size: Mutex::new(size),
            renderable: StubRenderable::new(Rect::from_origin_size(Point::ORIGIN, size)),
            buffers: AtomicU32::new(0),
            configured: Mutex::new(Vec::new()),
            reception: Mutex::new(None),
            observers: Mutex::new(Vec::new()),
            on_generate: Mutex::new(None),
        })
    }

    pub(crate) fn shared(this: &Arc<Self>) -> SharedSurface {
        this.clone()
    }

    /// The single renderable this surface hands out for every pass.
    pub(crate) fn renderable(&self) -> SharedRenderable {
        self.renderable.clone()
    }

    pub(crate) fn visibility_pushes(&self) -> Vec<Visibility> {
        self.configured
            .lock()
            .iter()
            .map(|SurfaceAttrib::Visibility(v)| *v)
            .collect()
    }

    pub(crate) fn reception_mode(&self) -> Option<InputReceptionMode> {
        *self.reception.lock()
    }

    pub(crate) fn observer_count(&self) -> usize {
        self.observers
            .lock()
            .iter()
            .filter(|o| o.strong_count() > 0)
            .count()
    }

    pub(crate) fn set_buffers_ready(&self, count: u32) {
        self.buffers.store(count, Ordering::Relaxed);
    }

    pub(crate) fn set_visible_on_lock_screen(&self, shown: bool) {
        self.on_lock_screen.store(shown, Ordering::Relaxed);
    }

    /// Runs `hook` every time the surface is asked for renderables.
    pub(crate) fn on_generate(&self, hook: impl Fn(&Self) + Send + Sync + 'static) {
        *self.on_generate.lock() = Some(Box::new(hook));
    }

    pub(crate) fn set_depth_layer(&self, layer: DepthLayer) {
        *self.layer.lock() = layer;
        self.notify(|o| o.depth_layer_set_to(self, layer));
    }

    pub(crate) fn move_to(&self, top_left: Point) {
        *self.top_left.lock() = top_left;
        self.notify(|o| o.moved_to(self, top_left));
    }

    pub(crate) fn resize(&self, size: Size) {
        *self.size.lock() = size;
        self.notify(|o| o.resized_to(self, size));
    }

    pub(crate) fn set_hidden(&self, hidden: bool) {
        self.visible.store(!hidden, Ordering::Relaxed);
        self.notify(|o| o.hidden_set_to(self, hidden));
    }

    pub(crate) fn post_frame(&self, damage: Rect) {
        self.notify(|o| o.frame_posted(self, damage));
    }

    pub(crate) fn set_alpha(&self, alpha: f32) {
        self.notify(|o| o.alpha_set_to(self, alpha));
    }

    fn notify(&self, f: impl Fn(&dyn SurfaceObserver)) {
        let observers: Vec<_> = self
            .observers
            .lock()
            .iter()
            .filter_map(Weak::upgrade)
            .collect();
        for observer in observers {
            f(&*observer);
        }
    }
}

impl Surface for StubSurface {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn visible(&self) -> bool {
        self.visible.load(Ordering::Relaxed)
    }

    fn visible_on_lock_screen(&self) -> bool {
        self.on_lock_screen.load(Ordering::Relaxed)
    }

    fn depth_layer(&self) -> DepthLayer {
        *self.layer.lock()
    }

    fn top_left(&self) -> Point {
        *self.top_left.lock()
    }

    fn size(&self) -> Size {
        *self.size.lock()
    }

    fn input_area_contains(&self, point: Point) -> bool {
        Rect::from_origin_size(self.top_left(), self.size()).contains(point)
    }

    fn generate_renderables(&self, _pass: RenderPassId) -> Vec<SharedRenderable> {
        if let Some(hook) = &*self.on_generate.lock() {
            hook(self);
        }
        vec![self.renderable.clone()]
    }

    fn buffers_ready_for(&self, _pass: RenderPassId) -> u32 {
        self.buffers.load(Ordering::Relaxed)
    }

    fn configure(&self, attrib: SurfaceAttrib) {
        self.configured.lock().push(attrib);
    }

    fn set_reception_mode(&self, mode: InputReceptionMode) {
        *self.reception.lock() = Some(mode);
    }

    fn register_interest(&self, observer: Weak<dyn SurfaceObserver>) {
        self.observers.lock().push(observer);
    }

    fn unregister_interest(&self, observer: &dyn SurfaceObserver) {
        self.observers
            .lock()
            .retain(|o| !ptr::addr_eq(o.as_ptr(), ptr::from_ref(observer)));
    }
}
