// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_dom --heading-base-level=0

//! Understory DOM: a headless, generational document tree.
//!
//! Understory DOM models the part of a browser document that event routing depends on:
//! which node is inside which, where a node currently lives, and whether a handle still
//! refers to a live node.
//!
//! - Represents a hierarchy of elements below a document node, a root element and a body.
//! - Supports relocation ([`Document::reparent`]) so content can live at a different point
//!   in the document than its logical owner (portals).
//! - Answers inclusive containment ([`Document::contains`]), root→node paths
//!   ([`Document::path_to_root`]) and nearest common ancestors.
//! - Carries the root element's client size, which callers use to tell content clicks from
//!   root scrollbar clicks.
//!
//! ## Not a renderer
//!
//! There is no layout, styling or hit testing here. Callers decide event targets themselves
//! and use the tree to reason about propagation and containment.
//!
//! ## API overview
//!
//! - [`Document`]: container managing nodes, liveness and structure.
//! - [`NodeId`]: generational handle of a node.
//! - [`Tag`]: informational element tag.
//!
//! ### Minimal usage
//!
//! ```
//! use understory_dom::{Document, Tag};
//!
//! let mut doc = Document::default();
//! let menu = doc.insert(doc.body(), Tag::Element("menu"));
//! let item = doc.insert(menu, Tag::Element("li"));
//!
//! assert!(doc.contains(menu, item));
//! assert!(!doc.contains(item, menu));
//!
//! // Relocate the item to the body, as a portal would.
//! doc.reparent(item, doc.body());
//! assert!(!doc.contains(menu, item));
//!
//! // Removed nodes are stale and contained by nothing.
//! doc.remove(item);
//! assert!(!doc.contains(doc.document_element(), item));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod document;
mod types;

pub use document::Document;
pub use types::{NodeId, Tag};
