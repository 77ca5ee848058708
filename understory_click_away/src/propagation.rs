// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Propagation sequences shared by native and synthetic dispatch.
//!
//! Both trees deliver an event the same way: capture from the root down to the target's
//! parent, the target itself once, then bubble from the target's parent back to the root.
//! [`emit_path`] builds that sequence from a root→target path; [`path_to_root`] builds the
//! path from any [`ParentLookup`].

use alloc::vec::Vec;

use understory_dom::{Document, NodeId};

use crate::types::{Dispatch, ParentLookup, Phase};

/// Walk parents from `target` and return the path root→target (inclusive).
pub fn path_to_root<K: Copy>(target: K, parent_lookup: &impl ParentLookup<K>) -> Vec<K> {
    let mut out = Vec::new();
    let mut cur = target;
    // Collect to root; caller ensures acyclic ancestry.
    loop {
        out.push(cur);
        match parent_lookup.parent_of(&cur) {
            Some(p) => cur = p,
            None => break,
        }
    }
    out.reverse();
    out
}

/// Expand a root→target path into capture, target and bubble steps.
///
/// Returns an empty sequence for an empty path.
pub fn emit_path<K: Copy>(path: &[K]) -> Vec<Dispatch<K>> {
    let Some((&target, ancestors)) = path.split_last() else {
        return Vec::new();
    };
    let mut out = Vec::with_capacity(path.len() * 2 - 1);
    // Capture: root→parent
    for &node in ancestors {
        out.push(Dispatch {
            phase: Phase::Capture,
            node,
        });
    }
    out.push(Dispatch {
        phase: Phase::Target,
        node: target,
    });
    // Bubble: parent→root
    for &node in ancestors.iter().rev() {
        out.push(Dispatch {
            phase: Phase::Bubble,
            node,
        });
    }
    out
}

impl ParentLookup<NodeId> for Document {
    fn parent_of(&self, node: &NodeId) -> Option<NodeId> {
        Document::parent_of(self, *node)
    }
}
