// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Native and synthetic event records.
//!
//! A [`NativeEvent`] travels through the document. While it passes the synthetic root that
//! hosts the component tree, each component sees it wrapped in a [`SyntheticEvent`], whose
//! propagation control is independent of the native one.

use alloc::vec::Vec;

use kurbo::Point;
use understory_dom::NodeId;

use crate::component::ComponentId;
use crate::types::{EventKind, Phase};

/// A native event dispatched through the document.
#[derive(Clone, Debug, PartialEq)]
pub struct NativeEvent {
    kind: EventKind,
    target: NodeId,
    client: Option<Point>,
    path: Option<Vec<NodeId>>,
    phase: Option<Phase>,
    current_target: Option<NodeId>,
    gesture: u64,
    propagation_stopped: bool,
    immediate_stopped: bool,
    default_prevented: bool,
}

impl NativeEvent {
    /// Create an event of `kind` targeted at `target`, without pointer coordinates.
    pub fn new(kind: EventKind, target: NodeId) -> Self {
        Self {
            kind,
            target,
            client: None,
            path: None,
            phase: None,
            current_target: None,
            gesture: 0,
            propagation_stopped: false,
            immediate_stopped: false,
            default_prevented: false,
        }
    }

    /// Attach viewport (client) coordinates.
    #[must_use]
    pub fn with_client(mut self, client: Point) -> Self {
        self.client = Some(client);
        self
    }

    /// Event kind.
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Node the event was dispatched to.
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Viewport coordinates, if this is a pointer event that carries them.
    pub fn client(&self) -> Option<Point> {
        self.client
    }

    /// Root→target path recorded at dispatch time.
    ///
    /// `None` when the platform does not record dispatch paths, or before dispatch.
    pub fn composed_path(&self) -> Option<&[NodeId]> {
        self.path.as_deref()
    }

    /// Phase of the step currently being delivered, `None` outside dispatch.
    pub fn phase(&self) -> Option<Phase> {
        self.phase
    }

    /// Node whose listeners are currently running.
    pub fn current_target(&self) -> Option<NodeId> {
        self.current_target
    }

    /// Sequence number assigned when the event was dispatched.
    pub fn gesture(&self) -> u64 {
        self.gesture
    }

    /// Stop propagation after the listeners of the current node.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Stop propagation at once, skipping the remaining listeners of the current node.
    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_stopped = true;
    }

    /// Mark the default action as cancelled. Click-away detection ignores this flag.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// True once [`stop_propagation`](Self::stop_propagation) or
    /// [`stop_immediate_propagation`](Self::stop_immediate_propagation) was called.
    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    /// True once [`stop_immediate_propagation`](Self::stop_immediate_propagation) was called.
    pub fn is_immediate_propagation_stopped(&self) -> bool {
        self.immediate_stopped
    }

    /// True once [`prevent_default`](Self::prevent_default) was called.
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub(crate) fn begin_dispatch(&mut self, gesture: u64, path: Option<Vec<NodeId>>) {
        self.gesture = gesture;
        self.path = path;
        self.propagation_stopped = false;
        self.immediate_stopped = false;
    }

    pub(crate) fn set_position(&mut self, phase: Option<Phase>, node: Option<NodeId>) {
        self.phase = phase;
        self.current_target = node;
    }
}

/// A native event as seen by one component of the component tree.
///
/// Synthetic propagation follows the component tree, which may differ from the document
/// tree when content is relocated into a portal.
#[derive(Debug)]
pub struct SyntheticEvent<'a> {
    native: &'a mut NativeEvent,
    target: ComponentId,
    current: ComponentId,
    phase: Phase,
    propagation_stopped: bool,
    relay_requested: bool,
}

impl<'a> SyntheticEvent<'a> {
    pub(crate) fn new(native: &'a mut NativeEvent, target: ComponentId) -> Self {
        Self {
            native,
            target,
            current: target,
            phase: Phase::Target,
            propagation_stopped: false,
            relay_requested: false,
        }
    }

    /// Event kind.
    pub fn kind(&self) -> EventKind {
        self.native.kind
    }

    /// Underlying native event.
    pub fn native(&self) -> &NativeEvent {
        &*self.native
    }

    /// Underlying native event, for native propagation control.
    pub fn native_mut(&mut self) -> &mut NativeEvent {
        &mut *self.native
    }

    /// Component owning the native target.
    pub fn target(&self) -> ComponentId {
        self.target
    }

    /// Component whose handlers are currently running.
    pub fn current_target(&self) -> ComponentId {
        self.current
    }

    /// Phase of the component-tree walk.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Stop the component-tree walk after the current component.
    ///
    /// Native propagation is unaffected.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// True once [`stop_propagation`](Self::stop_propagation) was called.
    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    /// Tell the click-away detectors above the current component that this event
    /// originated inside them.
    ///
    /// The relay runs once the current handler returns, regardless of synthetic
    /// propagation state.
    pub fn propagate_click_away(&mut self) {
        self.relay_requested = true;
    }

    pub(crate) fn visit(&mut self, current: ComponentId, phase: Phase) {
        self.current = current;
        self.phase = phase;
    }

    pub(crate) fn take_relay_request(&mut self) -> bool {
        core::mem::take(&mut self.relay_requested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use understory_dom::{Document, Tag};

    #[test]
    fn immediate_stop_implies_stop() {
        let mut doc = Document::default();
        let div = doc.insert(doc.body(), Tag::Element("div"));
        let mut event = NativeEvent::new(EventKind::MouseDown, div);
        assert!(!event.is_propagation_stopped());
        event.stop_immediate_propagation();
        assert!(event.is_propagation_stopped());
        assert!(event.is_immediate_propagation_stopped());
        event.prevent_default();
        assert!(event.is_default_prevented());
    }

    #[test]
    fn begin_dispatch_resets_propagation_state() {
        let doc = Document::default();
        let mut event =
            NativeEvent::new(EventKind::Click, doc.body()).with_client(Point::new(4.0, 2.0));
        event.stop_propagation();
        event.begin_dispatch(3, Some(doc.path_to_root(doc.body())));
        assert!(!event.is_propagation_stopped());
        assert_eq!(event.gesture(), 3);
        assert_eq!(event.composed_path().map(<[NodeId]>::len), Some(3));
        assert_eq!(event.client(), Some(Point::new(4.0, 2.0)));
    }
}
