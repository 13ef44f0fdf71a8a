// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stacking tiers.
//!
//! A surface always paints above every surface in a lower tier and below
//! every surface in a higher one, whatever the order in which they were
//! added. Within a tier, order is decided by the scene graph's raise and
//! reorder operations.

/// A coarse stacking category with its own independently ordered Z-stack.
///
/// Variants are declared lowest first; [`index`](Self::index) maps them onto a
/// dense `0..COUNT` range suitable for indexing a per-tier list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DepthLayer {
    /// Desktop backgrounds and the like (lowest tier).
    Background,
    /// Panels or other controls below normal windows.
    Below,
    /// Normal application windows.
    #[default]
    Application,
    /// Always-on-top application windows.
    AlwaysOnTop,
    /// Panels or notifications that sit above normal windows.
    Above,
    /// Lock screens and similar overlays (highest tier).
    Overlay,
}

impl DepthLayer {
    /// Number of tiers.
    pub const COUNT: usize = 6;

    /// Every tier, lowest first.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Background,
        Self::Below,
        Self::Application,
        Self::AlwaysOnTop,
        Self::Above,
        Self::Overlay,
    ];

    /// Returns the dense index of this tier (`0` is the lowest).
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Background => 0,
            Self::Below => 1,
            Self::Application => 2,
            Self::AlwaysOnTop => 3,
            Self::Above => 4,
            Self::Overlay => 5,
        }
    }

    /// Returns the tier at `index`, or `None` if out of range.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::COUNT {
            Some(Self::ALL[index])
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_dense_and_ordered() {
        for (i, layer) in DepthLayer::ALL.iter().enumerate() {
            assert_eq!(layer.index(), i);
            assert_eq!(DepthLayer::from_index(i), Some(*layer));
        }
        assert_eq!(DepthLayer::from_index(DepthLayer::COUNT), None);
    }

    #[test]
    fn ordering_matches_index() {
        assert!(DepthLayer::Background < DepthLayer::Application);
        assert!(DepthLayer::Overlay > DepthLayer::Above);
        assert!(DepthLayer::Below.index() < DepthLayer::AlwaysOnTop.index());
    }
}
