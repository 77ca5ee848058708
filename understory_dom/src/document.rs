// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core document implementation: structure, relocation, and queries.

use alloc::vec::Vec;
use kurbo::Size;

use crate::types::{NodeId, Tag};

/// A headless document tree.
///
/// Every document starts with three nodes: the document node itself, the root element
/// ([`Tag::Html`]) and a [`Tag::Body`] element below it.
pub struct Document {
    nodes: Vec<Option<Node>>, // slots
    generations: Vec<u32>,    // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    document: NodeId,
    document_element: NodeId,
    body: NodeId,
    client_size: Size,
}

impl core::fmt::Debug for Document {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Document")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("client_size", &self.client_size)
            .finish_non_exhaustive()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Size::new(1024.0, 768.0))
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    tag: Tag,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(generation: u32, tag: Tag) -> Self {
        Self {
            generation,
            tag,
            parent: None,
            children: Vec::new(),
        }
    }
}

impl Document {
    /// Create a document whose root element has the given client (content box) size.
    ///
    /// The client size excludes the root scrollbars; points beyond it land on a scrollbar.
    pub fn new(client_size: Size) -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            document: NodeId::new(0, 0),
            document_element: NodeId::new(0, 0),
            body: NodeId::new(0, 0),
            client_size,
        };
        doc.document = doc.alloc(Tag::Document);
        doc.document_element = doc.alloc(Tag::Html);
        doc.link_parent(doc.document_element, doc.document);
        doc.body = doc.alloc(Tag::Body);
        doc.link_parent(doc.body, doc.document_element);
        doc
    }

    /// The document node. It is the root of every dispatch path.
    pub fn document_node(&self) -> NodeId {
        self.document
    }

    /// The root element (`documentElement`).
    pub fn document_element(&self) -> NodeId {
        self.document_element
    }

    /// The body element.
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Client size of the root element.
    pub fn client_size(&self) -> Size {
        self.client_size
    }

    /// Update the client size, e.g. after the viewport resized or scrollbars appeared.
    pub fn set_client_size(&mut self, size: Size) {
        self.client_size = size;
    }

    /// Insert a new element as the last child of `parent`.
    ///
    /// If `parent` is stale the element is created detached.
    pub fn insert(&mut self, parent: NodeId, tag: Tag) -> NodeId {
        let id = self.alloc(tag);
        if self.is_alive(parent) {
            self.link_parent(id, parent);
        }
        id
    }

    /// Remove a node and its subtree.
    ///
    /// The document node, root element and body are permanent and cannot be removed.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) || self.is_permanent(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        self.free_subtree(id);
    }

    /// Move `id` (with its subtree) under `new_parent`.
    ///
    /// Moves that would create a cycle, or that involve stale or permanent nodes, are ignored.
    pub fn reparent(&mut self, id: NodeId, new_parent: NodeId) {
        if !self.is_alive(id) || !self.is_alive(new_parent) || self.is_permanent(id) {
            return;
        }
        if self.contains(id, new_parent) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        self.link_parent(id, new_parent);
    }

    /// Returns true if `id` refers to a live node.
    ///
    /// A node is live if its slot is occupied and the generation of the handle matches
    /// the current generation stored in that slot.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .map(|n| n.generation == id.1)
            .unwrap_or(false)
    }

    /// Tag of a live node.
    pub fn tag(&self, id: NodeId) -> Option<Tag> {
        self.node_opt(id).map(|n| n.tag)
    }

    /// Parent of a live node, or `None` for the document node and detached nodes.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Children of a live node in insertion order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Inclusive containment: true if `node` is `ancestor` or one of its descendants.
    ///
    /// Stale ids are never contained, and never contain anything.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        if !self.is_alive(ancestor) || !self.is_alive(node) {
            return false;
        }
        let mut cur = Some(node);
        while let Some(id) = cur {
            if id == ancestor {
                return true;
            }
            cur = self.node(id).parent;
        }
        false
    }

    /// True if `id` is attached to this document (reachable from the document node).
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.contains(self.document, id)
    }

    /// Path from the topmost ancestor to `id` (inclusive). Empty if `id` is stale.
    pub fn path_to_root(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.is_alive(id) {
            return out;
        }
        let mut cur = Some(id);
        while let Some(n) = cur {
            out.push(n);
            cur = self.node(n).parent;
        }
        out.reverse();
        out
    }

    /// Nearest common inclusive ancestor of `a` and `b`, if they share a tree.
    pub fn common_ancestor(&self, a: NodeId, b: NodeId) -> Option<NodeId> {
        let pa = self.path_to_root(a);
        let pb = self.path_to_root(b);
        let mut last = None;
        for (x, y) in pa.iter().zip(pb.iter()) {
            if x != y {
                break;
            }
            last = Some(*x);
        }
        last
    }

    fn is_permanent(&self, id: NodeId) -> bool {
        id == self.document || id == self.document_element || id == self.body
    }

    fn alloc(&mut self, tag: Tag) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, tag));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, tag)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        NodeId::new(idx, generation)
    }

    fn free_subtree(&mut self, id: NodeId) {
        let children = core::mem::take(&mut self.node_mut(id).children);
        for child in children {
            self.free_subtree(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Access a node; panics if `id` is stale.
    fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    /// Access a node mutably; panics if `id` is stale.
    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId) {
        self.node_mut(parent).children.push(id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        self.node_mut(parent).children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }
}
