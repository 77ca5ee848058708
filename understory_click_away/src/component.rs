// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The component tree: logical structure, ownership of document nodes, and handlers.
//!
//! Components form the tree as authored. A component may own one element in the document,
//! and the element of a child normally lives inside its parent's element. Portals break
//! that rule: the children of a portal component live inside an arbitrary container node,
//! while remaining logical descendants of the portal's parent.

use alloc::boxed::Box;
use alloc::vec::Vec;

use hashbrown::HashMap;
use understory_dom::{Document, NodeId};

use crate::arena::{Arena, Key};
use crate::boundary::{ForkedRef, NodeRef};
use crate::context::Scope;
use crate::detector::DetectorId;
use crate::event::SyntheticEvent;
use crate::layer::LayerId;
use crate::propagation::path_to_root;
use crate::stop_propagation::StopPropagation;
use crate::types::{EventKind, ParentLookup};

/// Identifier of a mounted component.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ComponentId(pub(crate) Key);

/// How a new element is created.
#[derive(Clone, Debug)]
pub struct ElementOptions {
    /// Element tag, informational.
    pub tag: &'static str,
    /// Caller ref bound to the element's node, alongside any internal ref.
    pub node_ref: Option<NodeRef>,
}

impl Default for ElementOptions {
    fn default() -> Self {
        Self {
            tag: "div",
            node_ref: None,
        }
    }
}

impl ElementOptions {
    /// Options for an element with the given tag.
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            node_ref: None,
        }
    }

    /// Also bind `node_ref` to the element.
    #[must_use]
    pub fn with_node_ref(mut self, node_ref: NodeRef) -> Self {
        self.node_ref = Some(node_ref);
        self
    }
}

/// A mounted element: its component and its document node.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Element {
    /// Component owning the element.
    pub component: ComponentId,
    /// Document node of the element.
    pub node: NodeId,
}

/// Built-in behavior attached to a component, run after the caller's handlers.
#[derive(Copy, Clone, Debug)]
pub(crate) enum Behavior {
    Root,
    Element,
    ClickAway(DetectorId),
    Layer(LayerId),
    Overlay,
    Portal(NodeId),
    StopPropagation(StopPropagation),
}

pub(crate) struct Handler {
    pub(crate) kind: EventKind,
    pub(crate) capture: bool,
    pub(crate) callback: Box<dyn FnMut(&mut SyntheticEvent<'_>)>,
}

pub(crate) struct Component {
    pub(crate) parent: Option<ComponentId>,
    pub(crate) children: Vec<ComponentId>,
    /// Own element.
    pub(crate) node: Option<NodeId>,
    /// Where children's elements go when this component has no element of its own.
    pub(crate) container: Option<NodeId>,
    /// Scope provided to children.
    pub(crate) scope: Scope,
    pub(crate) behavior: Behavior,
    pub(crate) handlers: Vec<Handler>,
    pub(crate) refs: ForkedRef,
}

impl Component {
    pub(crate) fn new(behavior: Behavior, scope: Scope) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            node: None,
            container: None,
            scope,
            behavior,
            handlers: Vec::new(),
            refs: ForkedRef::default(),
        }
    }
}

#[derive(Default)]
pub(crate) struct ComponentTree {
    arena: Arena<Component>,
    owners: HashMap<NodeId, ComponentId>,
}

impl core::fmt::Debug for ComponentTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ComponentTree")
            .field("components", &self.arena.len())
            .field("owned_nodes", &self.owners.len())
            .finish_non_exhaustive()
    }
}

impl ComponentTree {
    pub(crate) fn insert(
        &mut self,
        parent: Option<ComponentId>,
        mut component: Component,
    ) -> ComponentId {
        component.parent = parent;
        let node = component.node;
        let id = ComponentId(self.arena.insert(component));
        if let Some(node) = node {
            self.owners.insert(node, id);
        }
        self.link(parent, id);
        id
    }

    fn link(&mut self, parent: Option<ComponentId>, id: ComponentId) {
        if let Some(p) = parent.and_then(|p| self.arena.get_mut(p.0)) {
            p.children.push(id);
        }
    }

    /// Remove a single component; children must already be gone.
    pub(crate) fn remove(&mut self, id: ComponentId) -> Option<Component> {
        let component = self.arena.remove(id.0)?;
        if let Some(node) = component.node {
            self.owners.remove(&node);
        }
        if let Some(p) = component.parent.and_then(|p| self.arena.get_mut(p.0)) {
            p.children.retain(|c| *c != id);
        }
        Some(component)
    }

    pub(crate) fn contains(&self, id: ComponentId) -> bool {
        self.arena.contains(id.0)
    }

    pub(crate) fn get(&self, id: ComponentId) -> Option<&Component> {
        self.arena.get(id.0)
    }

    pub(crate) fn get_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        self.arena.get_mut(id.0)
    }

    /// Point `component`'s element at `node`, updating ownership and refs.
    pub(crate) fn rebind(&mut self, id: ComponentId, node: NodeId) {
        let Some(component) = self.arena.get_mut(id.0) else {
            return;
        };
        if let Some(old) = component.node.replace(node) {
            self.owners.remove(&old);
        }
        component.refs.set(Some(node));
        self.owners.insert(node, id);
    }

    /// Document node that elements of `id`'s children are inserted under.
    pub(crate) fn dom_parent(&self, id: ComponentId) -> Option<NodeId> {
        let mut cur = Some(id);
        while let Some(c) = cur {
            let component = self.arena.get(c.0)?;
            if let Some(node) = component.container.or(component.node) {
                return Some(node);
            }
            cur = component.parent;
        }
        None
    }

    /// Component owning `node` or its nearest owned ancestor in the document.
    pub(crate) fn owner_of(&self, document: &Document, node: NodeId) -> Option<ComponentId> {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if let Some(&owner) = self.owners.get(&n) {
                return Some(owner);
            }
            cur = document.parent_of(n);
        }
        None
    }

    /// Path root→`target` through the component tree.
    pub(crate) fn path(&self, target: ComponentId) -> Vec<ComponentId> {
        path_to_root(target, self)
    }

    /// `id` and its descendants, children before parents, later siblings first.
    pub(crate) fn post_order(&self, id: ComponentId) -> Vec<ComponentId> {
        let mut out = Vec::new();
        let mut stack = alloc::vec![(id, false)];
        while let Some((c, expanded)) = stack.pop() {
            if expanded {
                out.push(c);
                continue;
            }
            stack.push((c, true));
            if let Some(component) = self.arena.get(c.0) {
                // Pushed in order, so the last child is expanded first.
                stack.extend(component.children.iter().map(|&child| (child, false)));
            }
        }
        out
    }
}

impl ParentLookup<ComponentId> for ComponentTree {
    fn parent_of(&self, node: &ComponentId) -> Option<ComponentId> {
        self.arena.get(node.0).and_then(|c| c.parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use understory_dom::Tag;

    fn element(doc: &mut Document, tree: &ComponentTree, parent: ComponentId) -> Component {
        let dom_parent = tree.dom_parent(parent).unwrap();
        let mut component = Component::new(Behavior::Element, Scope::default());
        component.node = Some(doc.insert(dom_parent, Tag::Element("div")));
        component
    }

    fn root(doc: &Document, tree: &mut ComponentTree) -> ComponentId {
        let mut component = Component::new(Behavior::Root, Scope::default());
        component.container = Some(doc.body());
        tree.insert(None, component)
    }

    #[test]
    fn elements_nest_in_the_document() {
        let mut doc = Document::default();
        let mut tree = ComponentTree::default();
        let root = root(&doc, &mut tree);
        let a = element(&mut doc, &tree, root);
        let a = tree.insert(Some(root), a);
        let b = element(&mut doc, &tree, a);
        let b = tree.insert(Some(a), b);
        let a_node = tree.get(a).unwrap().node.unwrap();
        let b_node = tree.get(b).unwrap().node.unwrap();
        assert_eq!(doc.parent_of(a_node), Some(doc.body()));
        assert_eq!(doc.parent_of(b_node), Some(a_node));
        assert_eq!(tree.path(b), vec![root, a, b]);
        assert_eq!(tree.owner_of(&doc, b_node), Some(b));
        assert_eq!(tree.owner_of(&doc, doc.body()), None);
    }

    #[test]
    fn portal_children_use_the_container() {
        let mut doc = Document::default();
        let mut tree = ComponentTree::default();
        let root = root(&doc, &mut tree);
        let host = doc.insert(doc.body(), Tag::Element("aside"));
        let mut portal = Component::new(Behavior::Portal(host), Scope::default());
        portal.container = Some(host);
        let portal = tree.insert(Some(root), portal);
        let child = element(&mut doc, &tree, portal);
        let child = tree.insert(Some(portal), child);
        let child_node = tree.get(child).unwrap().node.unwrap();
        assert_eq!(doc.parent_of(child_node), Some(host));
        assert_eq!(tree.path(child), vec![root, portal, child]);
        // Plain text inside the element resolves to its owner.
        let text = doc.insert(child_node, Tag::Element("span"));
        assert_eq!(tree.owner_of(&doc, text), Some(child));
    }

    #[test]
    fn post_order_visits_children_first() {
        let mut doc = Document::default();
        let mut tree = ComponentTree::default();
        let root = root(&doc, &mut tree);
        let a = element(&mut doc, &tree, root);
        let a = tree.insert(Some(root), a);
        let b = element(&mut doc, &tree, root);
        let b = tree.insert(Some(root), b);
        let c = element(&mut doc, &tree, a);
        let c = tree.insert(Some(a), c);
        assert_eq!(tree.post_order(root), vec![b, c, a, root]);

        for id in tree.post_order(a) {
            tree.remove(id);
        }
        assert!(!tree.contains(c));
        assert_eq!(tree.get(root).unwrap().children, vec![b]);
        assert_eq!(tree.post_order(root), vec![b, root]);
    }

    #[test]
    fn rebind_moves_ownership() {
        let mut doc = Document::default();
        let mut tree = ComponentTree::default();
        let root = root(&doc, &mut tree);
        let a = element(&mut doc, &tree, root);
        let a = tree.insert(Some(root), a);
        let caller = NodeRef::new();
        tree.get_mut(a).unwrap().refs.push(caller.clone());
        let old = tree.get(a).unwrap().node.unwrap();
        let new = doc.insert(doc.body(), Tag::Element("div"));
        tree.rebind(a, new);
        assert_eq!(caller.get(), Some(new));
        assert_eq!(tree.owner_of(&doc, new), Some(a));
        assert_eq!(tree.owner_of(&doc, old), None);
    }
}
