// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer stack: nested disablement scopes for click-away detectors.
//!
//! A non-root layer disables its nearest ancestor layer for as long as it is mounted.
//! Detectors consult their own nearest layer before deciding, so everything underneath
//! the topmost layer stays quiet. A layer's element is also the default outside boundary
//! for the detectors inside it.
//!
//! The disabled state is a count of mounted child layers, so sibling layers compose: the
//! parent is enabled again only once the last of them unmounts.

use understory_dom::NodeId;

use crate::arena::{Arena, Key};
use crate::boundary::NodeRef;
use crate::context::LayerContext;
use crate::diagnostics::UsageWarning;

/// Identifier of a mounted layer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct LayerId(pub(crate) Key);

#[derive(Debug)]
struct LayerState {
    root: bool,
    node: NodeRef,
    parent: Option<LayerId>,
    disabled_by: u32,
}

/// Mounted layers.
#[derive(Default)]
pub struct LayerStack {
    layers: Arena<LayerState>,
}

impl core::fmt::Debug for LayerStack {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LayerStack")
            .field("layers", &self.layers.len())
            .finish_non_exhaustive()
    }
}

impl LayerStack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a layer below the layer context `parent`.
    ///
    /// A non-root layer disables `parent.own_layer` until it is popped. The returned
    /// warning, if any, should be reported but does not prevent the layer from working.
    pub fn push(
        &mut self,
        parent: LayerContext,
        root: bool,
        node: NodeRef,
    ) -> (LayerId, Option<UsageWarning>) {
        let id = LayerId(self.layers.insert(LayerState {
            root,
            node,
            parent: parent.own_layer,
            disabled_by: 0,
        }));
        let warning = match (root, parent.has_root) {
            (false, false) => Some(UsageWarning::MissingRootLayer { layer: id }),
            (true, true) => Some(UsageWarning::NestedRootLayer { layer: id }),
            _ => None,
        };
        if !root {
            if let Some(state) = parent.own_layer.and_then(|p| self.layers.get_mut(p.0)) {
                state.disabled_by += 1;
            }
        }
        (id, warning)
    }

    /// Unmount a layer, enabling its parent again if no other child layer remains.
    ///
    /// Returns false if `id` was not mounted.
    pub fn pop(&mut self, id: LayerId) -> bool {
        let Some(state) = self.layers.remove(id.0) else {
            return false;
        };
        if !state.root {
            if let Some(parent) = state.parent.and_then(|p| self.layers.get_mut(p.0)) {
                parent.disabled_by = parent.disabled_by.saturating_sub(1);
            }
        }
        true
    }

    /// True while a child layer of `id` is mounted. Unmounted layers are never disabled.
    pub fn is_disabled(&self, id: LayerId) -> bool {
        self.layers.get(id.0).is_some_and(|s| s.disabled_by > 0)
    }

    /// True if `id` is a root layer.
    pub fn is_root(&self, id: LayerId) -> bool {
        self.layers.get(id.0).is_some_and(|s| s.root)
    }

    /// The layer's own element, once bound.
    pub fn node(&self, id: LayerId) -> Option<NodeId> {
        self.layers.get(id.0).and_then(|s| s.node.get())
    }

    /// True if `id` is mounted.
    pub fn contains(&self, id: LayerId) -> bool {
        self.layers.contains(id.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root_stack() -> (LayerStack, LayerContext) {
        let mut stack = LayerStack::new();
        let (root, warning) = stack.push(LayerContext::default(), true, NodeRef::new());
        assert_eq!(warning, None);
        (stack, LayerContext::default().enter(root, true))
    }

    #[test]
    fn child_disables_parent_while_mounted() {
        let (mut stack, root_ctx) = root_stack();
        let root = root_ctx.own_layer.unwrap();
        let (child, warning) = stack.push(root_ctx, false, NodeRef::new());
        assert_eq!(warning, None);
        assert!(stack.is_disabled(root));
        assert!(!stack.is_disabled(child));
        assert!(stack.pop(child));
        assert!(!stack.is_disabled(root));
        assert!(!stack.pop(child), "double pop must be ignored");
    }

    #[test]
    fn siblings_compose() {
        let (mut stack, root_ctx) = root_stack();
        let root = root_ctx.own_layer.unwrap();
        let (a, _) = stack.push(root_ctx, false, NodeRef::new());
        let (b, _) = stack.push(root_ctx, false, NodeRef::new());
        stack.pop(a);
        assert!(stack.is_disabled(root), "b is still mounted");
        stack.pop(b);
        assert!(!stack.is_disabled(root));
    }

    #[test]
    fn missing_and_nested_roots_warn() {
        let mut stack = LayerStack::new();
        let (orphan, warning) = stack.push(LayerContext::default(), false, NodeRef::new());
        assert_eq!(
            warning,
            Some(UsageWarning::MissingRootLayer { layer: orphan })
        );
        let (mut stack, root_ctx) = root_stack();
        let (nested, warning) = stack.push(root_ctx, true, NodeRef::new());
        assert_eq!(warning, Some(UsageWarning::NestedRootLayer { layer: nested }));
    }

    #[test]
    fn root_layer_does_not_disable_anything() {
        let (mut stack, root_ctx) = root_stack();
        let root = root_ctx.own_layer.unwrap();
        let (inner_root, _) = stack.push(root_ctx, true, NodeRef::new());
        assert!(!stack.is_disabled(root));
        stack.pop(inner_root);
        assert!(!stack.is_disabled(root));
        assert!(stack.is_root(root));
    }
}
