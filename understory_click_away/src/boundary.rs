// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Region boundary helpers: root scrollbar detection and node references.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::Cell;

use understory_dom::{Document, NodeId};

use crate::event::NativeEvent;

/// True if the pointer of `event` landed on a root scrollbar of `document`.
///
/// The root element's client size excludes its scrollbars, so any coordinate beyond it
/// belongs to one. Events without coordinates, such as key presses, never do.
pub fn clicked_root_scrollbar(event: &NativeEvent, document: &Document) -> bool {
    let Some(client) = event.client() else {
        return false;
    };
    let size = document.client_size();
    size.width < client.x || size.height < client.y
}

/// A shared slot receiving the document node of a mounted element.
///
/// Clones share the slot. The host fills it when the element mounts, updates it when the
/// element's node is replaced, and clears it on unmount.
#[derive(Clone, Debug, Default)]
pub struct NodeRef(Rc<Cell<Option<NodeId>>>);

impl NodeRef {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current node, if the element is mounted.
    pub fn get(&self) -> Option<NodeId> {
        self.0.get()
    }

    /// True if both handles share one slot.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn set(&self, node: Option<NodeId>) {
        self.0.set(node);
    }
}

/// Several node refs bound to one element.
///
/// Every ref receives every update; adding a ref never displaces another.
#[derive(Clone, Debug, Default)]
pub(crate) struct ForkedRef {
    refs: Vec<NodeRef>,
}

impl ForkedRef {
    pub(crate) fn push(&mut self, node_ref: NodeRef) {
        if !self.refs.iter().any(|r| r.ptr_eq(&node_ref)) {
            self.refs.push(node_ref);
        }
    }

    pub(crate) fn set(&self, node: Option<NodeId>) {
        for r in &self.refs {
            r.set(node);
        }
    }
}
