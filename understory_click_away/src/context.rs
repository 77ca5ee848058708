// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Inherited context values.
//!
//! Every component carries the [`Scope`] it provides to its descendants. A component that
//! establishes nothing new provides its parent's scope unchanged; detectors, layers and
//! overlays derive a new value. Values are plain data compared by content, so a scope that
//! did not change compares equal to the one it was derived from.

use crate::component::ComponentId;
use crate::detector::DetectorId;
use crate::layer::LayerId;
use crate::types::PhaseMode;

/// Click-away propagation context.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct PropagationContext {
    /// Nearest ancestor detector, which relayed events are forwarded to.
    pub relay: Option<DetectorId>,
    /// True below any capture-mode detector.
    pub use_capture: bool,
    /// Overlay whose element replaces the default outside boundary.
    pub owner: Option<ComponentId>,
    /// Nesting level of `relay`; `-1` when there is no detector above.
    pub level: i32,
}

impl Default for PropagationContext {
    fn default() -> Self {
        Self {
            relay: None,
            use_capture: false,
            owner: None,
            level: -1,
        }
    }
}

impl PropagationContext {
    /// Context a detector provides to its descendants.
    #[must_use]
    pub fn derive(self, detector: DetectorId, mode: PhaseMode) -> Self {
        Self {
            relay: Some(detector),
            use_capture: self.use_capture || mode == PhaseMode::Capture,
            owner: self.owner,
            level: self.level + 1,
        }
    }

    /// Context an overlay provides to its descendants.
    #[must_use]
    pub fn with_owner(self, owner: ComponentId) -> Self {
        Self {
            owner: Some(owner),
            ..self
        }
    }
}

/// Layer context.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct LayerContext {
    /// Nearest enclosing layer.
    pub own_layer: Option<LayerId>,
    /// True if a root layer encloses this point of the tree.
    pub has_root: bool,
}

impl LayerContext {
    /// Context a layer provides to its descendants.
    #[must_use]
    pub fn enter(self, layer: LayerId, root: bool) -> Self {
        Self {
            own_layer: Some(layer),
            has_root: self.has_root || root,
        }
    }
}

/// Everything a component inherits from its ancestors.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Scope {
    /// Click-away propagation context.
    pub propagation: PropagationContext,
    /// Layer context.
    pub layer: LayerContext,
}
