// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render-pass and surface identity types.

use core::fmt;
use core::ptr;

use crate::surface::Surface;

/// An opaque token identifying one render pass (one compositor).
///
/// Several passes may run concurrently, typically one per output. The scene
/// graph never interprets the value; it only compares and hashes it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RenderPassId(pub u32);

impl fmt::Debug for RenderPassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RenderPassId({})", self.0)
    }
}

/// Identity of a surface: the address of its shared allocation.
///
/// Two handles to the same `Arc<dyn Surface>` produce equal keys. A key is
/// only meaningful while the surface it was taken from is alive.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SurfaceKey(usize);

impl SurfaceKey {
    /// Returns the key for `surface`.
    #[inline]
    #[must_use]
    pub fn of(surface: &dyn Surface) -> Self {
        Self(ptr::from_ref(surface).cast::<()>().addr())
    }

    /// Returns the raw address (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn addr(self) -> usize {
        self.0
    }
}

impl fmt::Debug for SurfaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SurfaceKey({:#x})", self.0)
    }
}
