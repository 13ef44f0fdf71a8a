// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deferral of scene mutations requested from inside a dispatch.
//!
//! While the graph calls out to surface or tracker code, the current thread
//! may hold the scene lock for reading. A callback that tries to mutate the
//! scene from there would deadlock, so mutating entry points check
//! [`SceneGraph::is_dispatching`] first and, if set, queue themselves with
//! [`SceneGraph::enqueue`]. The outermost [`SceneGraph::dispatching`] call
//! runs the queue, in order, once its closure has returned.

use std::cell::RefCell;
use std::mem;
use std::ptr;

use super::SceneGraph;

type Command = Box<dyn FnOnce(&SceneGraph)>;

struct Scope {
    scene: usize,
    queue: Vec<Command>,
}

thread_local! {
    static SCOPES: RefCell<Vec<Scope>> = const { RefCell::new(Vec::new()) };
}

fn scene_id(scene: &SceneGraph) -> usize {
    ptr::from_ref(scene).addr()
}

/// Pops its scope on drop, including on unwind.
struct ScopeGuard {
    scene: usize,
}

impl ScopeGuard {
    fn enter(scene: usize) -> Self {
        SCOPES.with_borrow_mut(|scopes| {
            scopes.push(Scope {
                scene,
                queue: Vec::new(),
            });
        });
        Self { scene }
    }

    fn exit(self) -> Vec<Command> {
        SCOPES.with_borrow_mut(|scopes| {
            scopes
                .iter_mut()
                .rev()
                .find(|scope| scope.scene == self.scene)
                .map(|scope| mem::take(&mut scope.queue))
                .unwrap_or_default()
        })
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        SCOPES.with_borrow_mut(|scopes| {
            if let Some(pos) = scopes.iter().rposition(|scope| scope.scene == self.scene) {
                scopes.remove(pos);
            }
        });
    }
}

impl SceneGraph {
    /// Returns `true` if this thread is inside a dispatch of this graph.
    pub(super) fn is_dispatching(&self) -> bool {
        let id = scene_id(self);
        SCOPES.with_borrow(|scopes| scopes.iter().any(|scope| scope.scene == id))
    }

    /// Runs `f` with this graph marked as dispatching on the current thread,
    /// then applies whatever mutations were queued meanwhile.
    ///
    /// `f` must release every scene lock before returning.
    pub(super) fn dispatching<R>(&self, f: impl FnOnce() -> R) -> R {
        if self.is_dispatching() {
            return f();
        }
        let scope = ScopeGuard::enter(scene_id(self));
        let result = f();
        let queued = scope.exit();
        if !queued.is_empty() {
            tracing::debug!(count = queued.len(), "applying deferred scene mutations");
        }
        for command in queued {
            command(self);
        }
        result
    }

    /// Queues `command` to run when the outermost dispatch returns, or runs
    /// it right away if there is no dispatch in progress.
    pub(super) fn enqueue(&self, command: impl FnOnce(&Self) + 'static) {
        let id = scene_id(self);
        let unqueued = SCOPES.with_borrow_mut(|scopes| {
            match scopes.iter_mut().rev().find(|scope| scope.scene == id) {
                Some(scope) => {
                    scope.queue.push(Box::new(command));
                    None
                }
                None => Some(command),
            }
        });
        if let Some(command) = unqueued {
            command(self);
        }
    }
}
