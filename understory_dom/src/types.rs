// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the document: node identifiers and element tags.

/// Identifier for a node in the document.
///
/// This is a small, copyable handle that stays stable while the node is attached
/// but becomes invalid when the node is removed and its slot is reused.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `NodeId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// ### Liveness
///
/// Use [`Document::is_alive`](crate::Document::is_alive) to check whether a `NodeId` still refers
/// to a live node. Stale `NodeId`s never alias a different live node because the generation must
/// match. Containment queries treat stale ids as detached: nothing contains them.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Tag name of an element, or the document itself.
///
/// Tags are informational; the document applies no per-tag behavior.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Tag {
    /// The document node at the top of every path.
    Document,
    /// The root element (`documentElement`).
    Html,
    /// The body element.
    Body,
    /// Any other element, named for debugging.
    Element(&'static str),
}
