// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host: document, component tree, listeners, detectors, layers and the task queue.
//!
//! ## Dispatch order
//!
//! [`Host::dispatch`] delivers a native event along its document path: capture from the
//! document node down to the target's parent, the target (capture listeners, then bubble
//! listeners), and bubble back up. The component tree is hooked into the deepest synthetic
//! root on that path (the app container, or a portal container): its capture walk runs just
//! before the root's native capture listeners, its bubble walk just before the root's
//! native bubble listeners.
//!
//! Every detector owns one capture listener on the document node, so it observes a trigger
//! before the component tree does. The resolution it schedules runs only from
//! [`Host::run_pending`], after the whole dispatch has returned.

use alloc::boxed::Box;
use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::Size;
use understory_dom::{Document, NodeId, Tag};

use crate::arena::{Arena, Key};
use crate::boundary::NodeRef;
use crate::component::{
    Behavior, Component, ComponentId, ComponentTree, Element, ElementOptions, Handler,
};
use crate::context::Scope;
use crate::detector::{ClickAwayConfig, Detector, DetectorId};
use crate::diagnostics::{Decision, DiagnosticSink, NoopSink, UsageWarning, Verdict};
use crate::error::UsageError;
use crate::event::{NativeEvent, SyntheticEvent};
use crate::layer::{LayerId, LayerStack};
use crate::propagation::emit_path;
use crate::scheduler::TaskQueue;
use crate::stop_propagation::{StopPropagation, StopPropagationConfig};
use crate::types::{EventKind, Phase, PhaseMode};

/// Identifier of a native event listener.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ListenerId(Key);

/// Platform options.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HostOptions {
    /// Client size of the root element.
    pub client_size: Size,
    /// Whether dispatch records the event path.
    ///
    /// Without it, containment falls back to ancestor checks against the boundary.
    pub composed_path: bool,
}

impl Default for HostOptions {
    fn default() -> Self {
        Self {
            client_size: Size::new(1024.0, 768.0),
            composed_path: true,
        }
    }
}

impl HostOptions {
    /// Set the root element's client size.
    #[must_use]
    pub fn with_client_size(mut self, size: Size) -> Self {
        self.client_size = size;
        self
    }

    /// Enable or disable dispatch path recording.
    #[must_use]
    pub fn with_composed_path(mut self, enabled: bool) -> Self {
        self.composed_path = enabled;
        self
    }
}

/// A mounted click-away detector and its guarded element.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ClickAway {
    /// The detector.
    pub detector: DetectorId,
    /// The guarded element. Children mounted under it are inside the detector.
    pub element: Element,
}

/// A mounted layer.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct LayerMount {
    /// The layer.
    pub layer: LayerId,
    /// Component to mount the layer's content under.
    pub component: ComponentId,
    /// The layer's element. Root layers have none.
    pub node: Option<NodeId>,
}

enum ListenerAction {
    Detector(DetectorId),
    Custom(Box<dyn FnMut(&mut NativeEvent)>),
}

struct Listener {
    node: NodeId,
    kind: Option<EventKind>,
    capture: bool,
    action: ListenerAction,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Task {
    Arm(DetectorId),
    Resolve { detector: DetectorId, gesture: u64 },
}

/// Headless runtime for click-away detection.
///
/// The host owns a [`Document`] with an app container below the body, and a component tree
/// rooted at [`Host::root`] whose elements live in that container.
pub struct Host<S = NoopSink> {
    document: Document,
    components: ComponentTree,
    detectors: Arena<Detector>,
    layers: LayerStack,
    listeners: Arena<Listener>,
    listener_order: Vec<ListenerId>,
    queue: TaskQueue<Task>,
    synthetic_roots: HashMap<NodeId, u32>,
    options: HostOptions,
    last_gesture: u64,
    sink: S,
    root: ComponentId,
    container: NodeId,
}

impl<S> core::fmt::Debug for Host<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Host")
            .field("document", &self.document)
            .field("components", &self.components)
            .field("detectors", &self.detectors.len())
            .field("layers", &self.layers)
            .field("listeners", &self.listeners.len())
            .field("queued_tasks", &self.queue.len())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::new()
    }
}

impl Host {
    /// Create a host with default options that discards diagnostics.
    pub fn new() -> Self {
        Self::with_options(HostOptions::default())
    }

    /// Create a host with `options` that discards diagnostics.
    pub fn with_options(options: HostOptions) -> Self {
        Self::with_sink(options, NoopSink)
    }
}

impl<S: DiagnosticSink> Host<S> {
    /// Create a host reporting diagnostics to `sink`.
    pub fn with_sink(options: HostOptions, sink: S) -> Self {
        let mut document = Document::new(options.client_size);
        let container = document.insert(document.body(), Tag::Element("div"));
        let mut components = ComponentTree::default();
        let mut root = Component::new(Behavior::Root, Scope::default());
        root.container = Some(container);
        let root = components.insert(None, root);
        let mut synthetic_roots = HashMap::new();
        synthetic_roots.insert(container, 1);
        Self {
            document,
            components,
            detectors: Arena::default(),
            layers: LayerStack::new(),
            listeners: Arena::default(),
            listener_order: Vec::new(),
            queue: TaskQueue::new(),
            synthetic_roots,
            options,
            last_gesture: 0,
            sink,
            root,
            container,
        }
    }

    /// The document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The document, for structural changes made outside the component tree.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Root of the component tree.
    pub fn root(&self) -> ComponentId {
        self.root
    }

    /// Document node hosting the root's elements.
    pub fn container(&self) -> NodeId {
        self.container
    }

    /// Platform options.
    pub fn options(&self) -> &HostOptions {
        &self.options
    }

    /// Diagnostics sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Diagnostics sink, mutably.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// True if `component` is mounted.
    pub fn is_mounted(&self, component: ComponentId) -> bool {
        self.components.contains(component)
    }

    /// Element node of `component`, if it has one.
    pub fn node_of(&self, component: ComponentId) -> Option<NodeId> {
        self.components.get(component).and_then(|c| c.node)
    }

    /// Scope `component` provides to its children.
    pub fn scope(&self, component: ComponentId) -> Option<Scope> {
        self.components.get(component).map(|c| c.scope)
    }

    /// True once the detector's arming task has run. Unmounted detectors are disarmed.
    pub fn detector_is_armed(&self, detector: DetectorId) -> bool {
        self.detectors.get(detector.0).is_some_and(Detector::is_armed)
    }

    /// Guarded node of the detector.
    pub fn detector_node(&self, detector: DetectorId) -> Option<NodeId> {
        self.detectors.get(detector.0).and_then(|d| d.node.get())
    }

    /// True while a nested layer disables `layer`.
    pub fn is_layer_disabled(&self, layer: LayerId) -> bool {
        self.layers.is_disabled(layer)
    }

    /// Number of queued tasks.
    pub fn pending_tasks(&self) -> usize {
        self.queue.len()
    }

    // --- Mounting ---

    /// Mount a plain element under `parent`.
    pub fn mount_element(
        &mut self,
        parent: ComponentId,
        tag: &'static str,
    ) -> Result<Element, UsageError> {
        self.mount_element_with(parent, ElementOptions::new(tag))
    }

    /// Mount a plain element under `parent` with `options`.
    pub fn mount_element_with(
        &mut self,
        parent: ComponentId,
        options: ElementOptions,
    ) -> Result<Element, UsageError> {
        let scope = self.parent_scope(parent)?;
        self.create_element(parent, options, Behavior::Element, scope, None)
    }

    /// Mount a click-away detector guarding a new `div` under `parent`.
    ///
    /// The detector ignores everything until the queue has run once after mounting.
    pub fn mount_click_away(
        &mut self,
        parent: ComponentId,
        config: ClickAwayConfig,
        on_away: impl FnMut(&NativeEvent) + 'static,
    ) -> Result<ClickAway, UsageError> {
        self.mount_click_away_with(parent, config, ElementOptions::default(), on_away)
    }

    /// Mount a click-away detector guarding a new element created with `options`.
    pub fn mount_click_away_with(
        &mut self,
        parent: ComponentId,
        config: ClickAwayConfig,
        options: ElementOptions,
        on_away: impl FnMut(&NativeEvent) + 'static,
    ) -> Result<ClickAway, UsageError> {
        let inherited = self.parent_scope(parent)?;
        let node_ref = NodeRef::new();
        let detector = DetectorId(self.detectors.insert(Detector::new(
            config,
            inherited,
            node_ref.clone(),
            Box::new(on_away),
        )));
        if config.phase_mode == PhaseMode::Bubble && inherited.propagation.use_capture {
            self.sink.warning(&UsageWarning::MixedPhaseNesting {
                detector,
                ancestor: inherited.propagation.relay,
            });
        }
        let scope = Scope {
            propagation: inherited.propagation.derive(detector, config.phase_mode),
            ..inherited
        };
        let element = self.create_element(
            parent,
            options,
            Behavior::ClickAway(detector),
            scope,
            Some(node_ref),
        )?;
        let document = self.document.document_node();
        let listener = self.insert_listener(Listener {
            node: document,
            kind: None,
            capture: true,
            action: ListenerAction::Detector(detector),
        });
        if let Some(state) = self.detectors.get_mut(detector.0) {
            state.listener = Some(listener);
        }
        self.queue.schedule(Task::Arm(detector));
        Ok(ClickAway { detector, element })
    }

    /// Mount a layer under `parent`.
    ///
    /// A non-root layer owns an element, which becomes the default boundary of the detectors
    /// inside it, and disables the enclosing layer while mounted.
    pub fn mount_layer(
        &mut self,
        parent: ComponentId,
        root: bool,
    ) -> Result<LayerMount, UsageError> {
        let inherited = self.parent_scope(parent)?;
        let node_ref = NodeRef::new();
        let (layer, warning) = self.layers.push(inherited.layer, root, node_ref.clone());
        if let Some(warning) = warning {
            self.sink.warning(&warning);
        }
        let scope = Scope {
            layer: inherited.layer.enter(layer, root),
            ..inherited
        };
        if root {
            let component = self
                .components
                .insert(Some(parent), Component::new(Behavior::Layer(layer), scope));
            return Ok(LayerMount {
                layer,
                component,
                node: None,
            });
        }
        let element = self.create_element(
            parent,
            ElementOptions::default(),
            Behavior::Layer(layer),
            scope,
            Some(node_ref),
        )?;
        Ok(LayerMount {
            layer,
            component: element.component,
            node: Some(element.node),
        })
    }

    /// Mount an overlay element under `parent`.
    ///
    /// Detectors inside the overlay use its element as their default boundary.
    pub fn mount_overlay(&mut self, parent: ComponentId) -> Result<Element, UsageError> {
        let scope = self.parent_scope(parent)?;
        let element = self.create_element(
            parent,
            ElementOptions::default(),
            Behavior::Overlay,
            scope,
            None,
        )?;
        if let Some(component) = self.components.get_mut(element.component) {
            component.scope.propagation = scope.propagation.with_owner(element.component);
        }
        Ok(element)
    }

    /// Mount a portal under `parent`: its children's elements go into `container`.
    pub fn mount_portal(
        &mut self,
        parent: ComponentId,
        container: NodeId,
    ) -> Result<ComponentId, UsageError> {
        let scope = self.parent_scope(parent)?;
        if !self.document.is_alive(container) {
            return Err(UsageError::StaleNode(container));
        }
        let mut component = Component::new(Behavior::Portal(container), scope);
        component.container = Some(container);
        let id = self.components.insert(Some(parent), component);
        *self.synthetic_roots.entry(container).or_insert(0) += 1;
        Ok(id)
    }

    /// Mount an element that stops the configured events in the component tree.
    pub fn mount_stop_propagation(
        &mut self,
        parent: ComponentId,
        config: StopPropagationConfig,
    ) -> Result<Element, UsageError> {
        let stop = StopPropagation::new(&config)?;
        let scope = self.parent_scope(parent)?;
        self.create_element(
            parent,
            ElementOptions::default(),
            Behavior::StopPropagation(stop),
            scope,
            None,
        )
    }

    /// Unmount `component` and everything below it.
    ///
    /// Detectors are disarmed and their pending resolutions become no-ops. Unmounting the
    /// root unmounts its children only.
    pub fn unmount(&mut self, component: ComponentId) -> Result<(), UsageError> {
        if !self.components.contains(component) {
            return Err(UsageError::StaleComponent(component));
        }
        if component == self.root {
            let children = self
                .components
                .get(component)
                .map(|c| c.children.clone())
                .unwrap_or_default();
            for child in children.into_iter().rev() {
                self.unmount(child)?;
            }
            return Ok(());
        }
        for id in self.components.post_order(component) {
            let Some(removed) = self.components.remove(id) else {
                continue;
            };
            removed.refs.set(None);
            match removed.behavior {
                Behavior::ClickAway(detector) => {
                    if let Some(listener) = self
                        .detectors
                        .remove(detector.0)
                        .and_then(|state| state.listener)
                    {
                        self.remove_event_listener(listener);
                    }
                }
                Behavior::Layer(layer) => {
                    self.layers.pop(layer);
                }
                Behavior::Portal(container) => {
                    if let Some(count) = self.synthetic_roots.get_mut(&container) {
                        *count -= 1;
                        if *count == 0 {
                            self.synthetic_roots.remove(&container);
                        }
                    }
                }
                Behavior::Root
                | Behavior::Element
                | Behavior::Overlay
                | Behavior::StopPropagation(_) => {}
            }
            if let Some(node) = removed.node {
                self.document.remove(node);
            }
        }
        Ok(())
    }

    /// Replace the element node of `component` with a fresh one in the same place.
    ///
    /// Child nodes move to the new node and every ref bound to the element is updated.
    pub fn replace_node(&mut self, component: ComponentId) -> Result<NodeId, UsageError> {
        let old = self
            .components
            .get(component)
            .ok_or(UsageError::StaleComponent(component))?
            .node
            .ok_or(UsageError::NoElement(component))?;
        let tag = self.document.tag(old).unwrap_or(Tag::Element("div"));
        let parent = self.document.parent_of(old).unwrap_or(self.container);
        let new = self.document.insert(parent, tag);
        for child in self.document.children(old).to_vec() {
            self.document.reparent(child, new);
        }
        self.document.remove(old);
        self.components.rebind(component, new);
        Ok(new)
    }

    // --- Handlers and listeners ---

    /// Add a bubble-phase handler for `kind` to `component`.
    ///
    /// Handlers run before the component's built-in behavior, in the order they were added.
    pub fn on(
        &mut self,
        component: ComponentId,
        kind: EventKind,
        handler: impl FnMut(&mut SyntheticEvent<'_>) + 'static,
    ) -> Result<(), UsageError> {
        self.add_handler(component, kind, false, Box::new(handler))
    }

    /// Add a capture-phase handler for `kind` to `component`.
    pub fn on_capture(
        &mut self,
        component: ComponentId,
        kind: EventKind,
        handler: impl FnMut(&mut SyntheticEvent<'_>) + 'static,
    ) -> Result<(), UsageError> {
        self.add_handler(component, kind, true, Box::new(handler))
    }

    /// Add a native listener for `kind` on `node`.
    pub fn add_event_listener(
        &mut self,
        node: NodeId,
        kind: EventKind,
        capture: bool,
        listener: impl FnMut(&mut NativeEvent) + 'static,
    ) -> ListenerId {
        self.insert_listener(Listener {
            node,
            kind: Some(kind),
            capture,
            action: ListenerAction::Custom(Box::new(listener)),
        })
    }

    /// Remove a native listener. Returns false if it was already removed.
    pub fn remove_event_listener(&mut self, id: ListenerId) -> bool {
        if self.listeners.remove(id.0).is_none() {
            return false;
        }
        self.listener_order.retain(|l| *l != id);
        true
    }

    // --- Dispatch and scheduling ---

    /// Dispatch `event` synchronously and return it with its final propagation state.
    ///
    /// Resolutions scheduled by detectors stay queued; see [`run_pending`](Self::run_pending).
    /// Events targeting removed nodes are not delivered.
    pub fn dispatch(&mut self, mut event: NativeEvent) -> NativeEvent {
        let path = self.document.path_to_root(event.target());
        self.last_gesture += 1;
        let recorded = self.options.composed_path.then(|| path.clone());
        event.begin_dispatch(self.last_gesture, recorded);
        if path.is_empty() {
            return event;
        }

        let hook = path
            .iter()
            .rev()
            .copied()
            .find(|n| self.synthetic_roots.contains_key(n));
        let synthetic_path = hook
            .and_then(|_| self.components.owner_of(&self.document, event.target()))
            .map(|target| self.components.path(target))
            .unwrap_or_default();
        let mut synthetic_done = synthetic_path.is_empty();

        for step in emit_path(&path) {
            event.set_position(Some(step.phase), Some(step.node));
            let at_hook = hook == Some(step.node);
            if matches!(step.phase, Phase::Capture | Phase::Target) {
                if at_hook && !synthetic_done {
                    synthetic_done = self.dispatch_synthetic(&mut event, &synthetic_path, true);
                }
                self.run_listeners(&mut event, step.node, true);
            }
            if matches!(step.phase, Phase::Target | Phase::Bubble)
                && !event.is_immediate_propagation_stopped()
            {
                if at_hook && !synthetic_done {
                    synthetic_done = self.dispatch_synthetic(&mut event, &synthetic_path, false);
                }
                self.run_listeners(&mut event, step.node, false);
            }
            if event.is_propagation_stopped() {
                break;
            }
        }
        event.set_position(None, None);
        event
    }

    /// Run queued tasks until the queue is empty. Returns how many ran.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while self.run_next_task() {
            ran += 1;
        }
        ran
    }

    /// Run the next queued task. Returns false if the queue was empty.
    pub fn run_next_task(&mut self) -> bool {
        let Some(task) = self.queue.pop() else {
            return false;
        };
        match task {
            Task::Arm(detector) => {
                if let Some(state) = self.detectors.get_mut(detector.0) {
                    state.arm();
                }
            }
            Task::Resolve { detector, gesture } => self.resolve(detector, gesture),
        }
        true
    }

    /// Dispatch `event`, then run the queue.
    pub fn fire(&mut self, event: NativeEvent) -> NativeEvent {
        let event = self.dispatch(event);
        self.run_pending();
        event
    }

    /// Fire mousedown, mouseup and click on `target`.
    pub fn click(&mut self, target: NodeId) {
        self.click_between(target, target);
    }

    /// Fire mousedown on `down` and mouseup on `up`, then click on their nearest common
    /// ancestor.
    pub fn click_between(&mut self, down: NodeId, up: NodeId) {
        self.fire(NativeEvent::new(EventKind::MouseDown, down));
        self.fire(NativeEvent::new(EventKind::MouseUp, up));
        if let Some(common) = self.document.common_ancestor(down, up) {
            self.fire(NativeEvent::new(EventKind::Click, common));
        }
    }

    /// Fire touchstart and touchend on `target`.
    pub fn tap(&mut self, target: NodeId) {
        self.fire(NativeEvent::new(EventKind::TouchStart, target));
        self.fire(NativeEvent::new(EventKind::TouchEnd, target));
    }

    /// Tell the detectors above `component` that the event of `kind` being dispatched
    /// originated inside them.
    pub fn propagate_click_away(
        &mut self,
        component: ComponentId,
        kind: EventKind,
    ) -> Result<(), UsageError> {
        let relay = self
            .components
            .get(component)
            .ok_or(UsageError::StaleComponent(component))?
            .scope
            .propagation
            .relay;
        self.relay(relay, kind, self.last_gesture);
        Ok(())
    }

    // --- Internals ---

    fn parent_scope(&self, parent: ComponentId) -> Result<Scope, UsageError> {
        self.components
            .get(parent)
            .map(|c| c.scope)
            .ok_or(UsageError::StaleComponent(parent))
    }

    fn create_element(
        &mut self,
        parent: ComponentId,
        options: ElementOptions,
        behavior: Behavior,
        scope: Scope,
        own_ref: Option<NodeRef>,
    ) -> Result<Element, UsageError> {
        let dom_parent = self
            .components
            .dom_parent(parent)
            .ok_or(UsageError::StaleComponent(parent))?;
        let node = self.document.insert(dom_parent, Tag::Element(options.tag));
        let mut component = Component::new(behavior, scope);
        component.node = Some(node);
        for node_ref in options.node_ref.into_iter().chain(own_ref) {
            component.refs.push(node_ref);
        }
        component.refs.set(Some(node));
        let component = self.components.insert(Some(parent), component);
        Ok(Element { component, node })
    }

    fn add_handler(
        &mut self,
        component: ComponentId,
        kind: EventKind,
        capture: bool,
        callback: Box<dyn FnMut(&mut SyntheticEvent<'_>)>,
    ) -> Result<(), UsageError> {
        let state = self
            .components
            .get_mut(component)
            .ok_or(UsageError::StaleComponent(component))?;
        state.handlers.push(Handler {
            kind,
            capture,
            callback,
        });
        Ok(())
    }

    fn insert_listener(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.listeners.insert(listener));
        self.listener_order.push(id);
        id
    }

    fn run_listeners(&mut self, event: &mut NativeEvent, node: NodeId, capture: bool) {
        let kind = event.kind();
        let due: Vec<ListenerId> = self
            .listener_order
            .iter()
            .copied()
            .filter(|id| {
                self.listeners.get(id.0).is_some_and(|l| {
                    l.node == node && l.capture == capture && l.kind.is_none_or(|k| k == kind)
                })
            })
            .collect();
        for id in due {
            if event.is_immediate_propagation_stopped() {
                break;
            }
            let detector = match self.listeners.get_mut(id.0).map(|l| &mut l.action) {
                Some(ListenerAction::Custom(callback)) => {
                    callback(event);
                    None
                }
                Some(ListenerAction::Detector(detector)) => Some(*detector),
                None => None,
            };
            if let Some(detector) = detector {
                self.observe(detector, event);
            }
        }
    }

    /// Walk the component path. Returns true if synthetic propagation was stopped.
    fn dispatch_synthetic(
        &mut self,
        event: &mut NativeEvent,
        path: &[ComponentId],
        capture: bool,
    ) -> bool {
        let Some(&target) = path.last() else {
            return true;
        };
        let kind = event.kind();
        let gesture = event.gesture();
        let order: Vec<ComponentId> = if capture {
            path.to_vec()
        } else {
            path.iter().rev().copied().collect()
        };
        for id in order {
            let Some(component) = self.components.get_mut(id) else {
                continue;
            };
            let behavior = component.behavior;
            let relay_from = component.scope.propagation.relay;
            let phase = if id == target {
                Phase::Target
            } else if capture {
                Phase::Capture
            } else {
                Phase::Bubble
            };
            let mut synthetic = SyntheticEvent::new(event, target);
            synthetic.visit(id, phase);
            let mut relay = false;
            for handler in component
                .handlers
                .iter_mut()
                .filter(|h| h.kind == kind && h.capture == capture)
            {
                (handler.callback)(&mut synthetic);
                relay |= synthetic.take_relay_request();
            }
            match behavior {
                Behavior::ClickAway(detector) => {
                    let records = self.detectors.get(detector.0).is_some_and(|state| {
                        (state.config.phase_mode == PhaseMode::Capture) == capture
                            && state.config.triggers(kind)
                    });
                    if records {
                        self.relay(Some(detector), kind, gesture);
                    }
                }
                Behavior::StopPropagation(stop) if !capture => {
                    stop.handle(&mut synthetic);
                    relay |= synthetic.take_relay_request();
                }
                _ => {}
            }
            if relay {
                self.relay(relay_from, kind, gesture);
            }
            if synthetic.is_propagation_stopped() {
                return true;
            }
        }
        false
    }

    /// Mark `start` and every detector above it that waits for this gesture.
    fn relay(&mut self, start: Option<DetectorId>, kind: EventKind, gesture: u64) {
        let mut cur = start;
        while let Some(id) = cur {
            let Some(state) = self.detectors.get_mut(id.0) else {
                break;
            };
            state.corroborate(kind, gesture);
            cur = state.scope.propagation.relay;
        }
    }

    fn observe(&mut self, detector: DetectorId, event: &NativeEvent) {
        let layer_disabled = self.layer_disabled_for(detector);
        let Some(state) = self.detectors.get_mut(detector.0) else {
            return;
        };
        if state.observe(event, layer_disabled) {
            self.queue.schedule(Task::Resolve {
                detector,
                gesture: event.gesture(),
            });
        }
    }

    fn resolve(&mut self, detector: DetectorId, gesture: u64) {
        let layer_disabled = self.layer_disabled_for(detector);
        let boundary = self.boundary_for(detector);
        let Some(state) = self.detectors.get_mut(detector.0) else {
            return;
        };
        let Some(pending) = state.take_pending(gesture) else {
            return;
        };
        let verdict = state.decide(&pending, &self.document, layer_disabled, boundary);
        if verdict == Verdict::Fired {
            state.fire(&pending.event);
        }
        let decision = Decision {
            detector,
            label: state.config.label,
            depth: state.scope.propagation.level + 1,
            kind: pending.event.kind(),
            verdict,
        };
        self.sink.decision(&decision);
    }

    fn layer_disabled_for(&self, detector: DetectorId) -> bool {
        self.detectors
            .get(detector.0)
            .and_then(|state| state.scope.layer.own_layer)
            .is_some_and(|layer| self.layers.is_disabled(layer))
    }

    /// Explicit boundary, else the enclosing overlay, else the enclosing layer, else the
    /// root element.
    fn boundary_for(&self, detector: DetectorId) -> NodeId {
        let fallback = self.document.document_element();
        let Some(state) = self.detectors.get(detector.0) else {
            return fallback;
        };
        state
            .config
            .boundary
            .or_else(|| {
                state
                    .scope
                    .propagation
                    .owner
                    .and_then(|owner| self.components.get(owner))
                    .and_then(|owner| owner.node)
            })
            .or_else(|| {
                state
                    .scope
                    .layer
                    .own_layer
                    .and_then(|layer| self.layers.node(layer))
            })
            .unwrap_or(fallback)
    }
}
