// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Click-away detector state and decision.
//!
//! ## Lifecycle of a gesture
//!
//! 1. A document capture listener sees the native event first and [`observe`]s it. If the
//!    event is a trigger, it is stored as the pending event and the host schedules one
//!    resolution task.
//! 2. The component tree handles the same event. If it passes the guarded element, or a
//!    descendant relays it, the pending event is [`corroborate`]d.
//! 3. Once the dispatch has returned, the resolution task runs [`decide`] and the host calls
//!    the away handler on [`Verdict::Fired`].
//!
//! A new trigger before resolution overwrites the pending event; the task scheduled for the
//! overwritten one finds a different gesture number and does nothing.
//!
//! [`observe`]: Detector::observe
//! [`corroborate`]: Detector::corroborate
//! [`decide`]: Detector::decide

use alloc::boxed::Box;

use understory_dom::{Document, NodeId};

use crate::arena::Key;
use crate::boundary::{NodeRef, clicked_root_scrollbar};
use crate::context::Scope;
use crate::diagnostics::{SuppressReason, Verdict};
use crate::event::NativeEvent;
use crate::host::ListenerId;
use crate::types::{EventKind, MouseTrigger, PhaseMode, TouchTrigger};

/// Identifier of a mounted click-away detector.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct DetectorId(pub(crate) Key);

/// Per-detector configuration.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ClickAwayConfig {
    /// Mouse interaction treated as a click.
    pub mouse_event: MouseTrigger,
    /// Touch interaction treated as a tap.
    pub touch_event: TouchTrigger,
    /// Only consult the document. Portal content then counts as outside.
    pub ignore_component_tree: bool,
    /// Do not fire for clicks on the root scrollbars.
    pub ignore_scrollbar_clicks: bool,
    /// Element outside of which clicks are ignored when dispatch paths are unavailable.
    ///
    /// Defaults to the enclosing overlay, then the enclosing layer, then the root element.
    pub boundary: Option<NodeId>,
    /// Component-tree phase in which the guarded element records events.
    pub phase_mode: PhaseMode,
    /// Name used in diagnostics.
    pub label: Option<&'static str>,
}

impl Default for ClickAwayConfig {
    fn default() -> Self {
        Self {
            mouse_event: MouseTrigger::default(),
            touch_event: TouchTrigger::default(),
            ignore_component_tree: false,
            ignore_scrollbar_clicks: true,
            boundary: None,
            phase_mode: PhaseMode::default(),
            label: None,
        }
    }
}

impl ClickAwayConfig {
    /// Set the mouse trigger.
    #[must_use]
    pub fn with_mouse_event(mut self, trigger: MouseTrigger) -> Self {
        self.mouse_event = trigger;
        self
    }

    /// Set the touch trigger.
    #[must_use]
    pub fn with_touch_event(mut self, trigger: TouchTrigger) -> Self {
        self.touch_event = trigger;
        self
    }

    /// Ignore (or trust) component-tree corroboration.
    #[must_use]
    pub fn with_ignore_component_tree(mut self, ignore: bool) -> Self {
        self.ignore_component_tree = ignore;
        self
    }

    /// Ignore (or count) root scrollbar clicks.
    #[must_use]
    pub fn with_ignore_scrollbar_clicks(mut self, ignore: bool) -> Self {
        self.ignore_scrollbar_clicks = ignore;
        self
    }

    /// Set an explicit outside boundary.
    #[must_use]
    pub fn with_boundary(mut self, boundary: NodeId) -> Self {
        self.boundary = Some(boundary);
        self
    }

    /// Set the phase mode.
    #[must_use]
    pub fn with_phase_mode(mut self, mode: PhaseMode) -> Self {
        self.phase_mode = mode;
        self
    }

    /// Set the diagnostics label.
    #[must_use]
    pub fn with_label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    /// True if `kind` is one of the configured triggers.
    pub fn triggers(&self, kind: EventKind) -> bool {
        self.mouse_event.kind() == Some(kind) || self.touch_event.kind() == Some(kind)
    }

    fn tracks_touch(&self) -> bool {
        self.touch_event != TouchTrigger::Disabled
    }
}

/// A trigger event waiting for its resolution task.
#[derive(Clone, Debug)]
pub(crate) struct PendingEvent {
    pub(crate) event: NativeEvent,
    pub(crate) corroborated: bool,
}

pub(crate) struct Detector {
    pub(crate) config: ClickAwayConfig,
    /// Scope inherited from the parent component.
    pub(crate) scope: Scope,
    pub(crate) node: NodeRef,
    pub(crate) listener: Option<ListenerId>,
    on_away: Box<dyn FnMut(&NativeEvent)>,
    armed: bool,
    moved: bool,
    pending: Option<PendingEvent>,
}

impl core::fmt::Debug for Detector {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Detector")
            .field("config", &self.config)
            .field("node", &self.node.get())
            .field("armed", &self.armed)
            .field("moved", &self.moved)
            .field("pending", &self.pending.is_some())
            .finish_non_exhaustive()
    }
}

impl Detector {
    pub(crate) fn new(
        config: ClickAwayConfig,
        scope: Scope,
        node: NodeRef,
        on_away: Box<dyn FnMut(&NativeEvent)>,
    ) -> Self {
        Self {
            config,
            scope,
            node,
            listener: None,
            on_away,
            armed: false,
            moved: false,
            pending: None,
        }
    }

    pub(crate) fn arm(&mut self) {
        self.armed = true;
    }

    pub(crate) fn is_armed(&self) -> bool {
        self.armed
    }

    /// Record a native event seen by the document capture listener.
    ///
    /// Returns true if the event became the pending trigger and needs a resolution task.
    pub(crate) fn observe(&mut self, event: &NativeEvent, layer_disabled: bool) -> bool {
        let kind = event.kind();
        if self.config.tracks_touch() {
            match kind {
                EventKind::TouchMove => self.moved = true,
                EventKind::TouchStart => self.moved = false,
                _ => {}
            }
        }
        if !self.config.triggers(kind) || !self.armed || layer_disabled {
            return false;
        }
        self.pending = Some(PendingEvent {
            event: event.clone(),
            corroborated: false,
        });
        true
    }

    /// Mark the pending event of `kind` from `gesture` as seen inside the component tree.
    pub(crate) fn corroborate(&mut self, kind: EventKind, gesture: u64) -> bool {
        match &mut self.pending {
            Some(p) if p.event.kind() == kind && p.event.gesture() == gesture => {
                p.corroborated = true;
                true
            }
            _ => false,
        }
    }

    /// Take the pending event if it still belongs to `gesture`.
    pub(crate) fn take_pending(&mut self, gesture: u64) -> Option<PendingEvent> {
        if self.pending.as_ref()?.event.gesture() != gesture {
            return None;
        }
        self.pending.take()
    }

    /// Decide whether `pending` happened outside.
    ///
    /// `boundary` is only consulted when the event carries no dispatch path.
    pub(crate) fn decide(
        &mut self,
        pending: &PendingEvent,
        document: &Document,
        layer_disabled: bool,
        boundary: NodeId,
    ) -> Verdict {
        use SuppressReason::*;

        let event = &pending.event;
        if layer_disabled {
            return Verdict::Suppressed(LayerDisabled);
        }
        if event.kind().is_touch() && core::mem::take(&mut self.moved) {
            return Verdict::Suppressed(TouchMoved);
        }
        if self.config.ignore_scrollbar_clicks && clicked_root_scrollbar(event, document) {
            return Verdict::Suppressed(ScrollbarClick);
        }
        let Some(node) = self.node.get() else {
            return Verdict::Suppressed(Unbound);
        };
        let inside_dom = match event.composed_path() {
            Some(path) => path.contains(&node),
            None => {
                let target = event.target();
                !document.contains(boundary, target) || document.contains(node, target)
            }
        };
        if inside_dom {
            return Verdict::Suppressed(InsideDom);
        }
        if !self.config.ignore_component_tree && pending.corroborated {
            return Verdict::Suppressed(InsideComponentTree);
        }
        Verdict::Fired
    }

    pub(crate) fn fire(&mut self, event: &NativeEvent) {
        (self.on_away)(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use core::cell::Cell;
    use kurbo::Point;
    use understory_dom::Tag;

    struct Fixture {
        doc: Document,
        guarded: NodeId,
        outside: NodeId,
        detector: Detector,
        calls: Rc<Cell<u32>>,
    }

    fn fixture(config: ClickAwayConfig) -> Fixture {
        let mut doc = Document::default();
        let guarded = doc.insert(doc.body(), Tag::Element("div"));
        let outside = doc.insert(doc.body(), Tag::Element("p"));
        let node = NodeRef::new();
        node.set(Some(guarded));
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        let mut detector = Detector::new(
            config,
            Scope::default(),
            node,
            Box::new(move |_| seen.set(seen.get() + 1)),
        );
        detector.arm();
        Fixture {
            doc,
            guarded,
            outside,
            detector,
            calls,
        }
    }

    fn dispatched(doc: &Document, kind: EventKind, target: NodeId, gesture: u64) -> NativeEvent {
        let mut event = NativeEvent::new(kind, target);
        event.begin_dispatch(gesture, Some(doc.path_to_root(target)));
        event
    }

    fn resolve(f: &mut Fixture, gesture: u64) -> Option<Verdict> {
        let pending = f.detector.take_pending(gesture)?;
        let boundary = f.doc.document_element();
        let verdict = f.detector.decide(&pending, &f.doc, false, boundary);
        if verdict == Verdict::Fired {
            f.detector.fire(&pending.event);
        }
        Some(verdict)
    }

    #[test]
    fn outside_fires_and_inside_does_not() {
        let mut f = fixture(ClickAwayConfig::default());
        let inside = dispatched(&f.doc, EventKind::MouseDown, f.guarded, 1);
        assert!(f.detector.observe(&inside, false));
        assert_eq!(
            resolve(&mut f, 1),
            Some(Verdict::Suppressed(SuppressReason::InsideDom))
        );
        let outside = dispatched(&f.doc, EventKind::MouseDown, f.outside, 2);
        assert!(f.detector.observe(&outside, false));
        assert_eq!(resolve(&mut f, 2), Some(Verdict::Fired));
        assert_eq!(f.calls.get(), 1);
    }

    #[test]
    fn disarmed_and_disabled_observations_are_ignored() {
        let mut f = fixture(ClickAwayConfig::default());
        let event = dispatched(&f.doc, EventKind::MouseDown, f.outside, 1);
        assert!(!f.detector.observe(&event, true));
        let mut fresh = fixture(ClickAwayConfig::default());
        fresh.detector.armed = false;
        assert!(!fresh.detector.observe(&event, false));
        assert!(fresh.detector.take_pending(1).is_none());
    }

    #[test]
    fn non_trigger_kinds_are_not_pending() {
        let mut f = fixture(ClickAwayConfig::default().with_mouse_event(MouseTrigger::Click));
        let down = dispatched(&f.doc, EventKind::MouseDown, f.outside, 1);
        assert!(!f.detector.observe(&down, false));
        let click = dispatched(&f.doc, EventKind::Click, f.outside, 2);
        assert!(f.detector.observe(&click, false));
    }

    #[test]
    fn corroboration_needs_matching_gesture_and_kind() {
        let mut f = fixture(ClickAwayConfig::default());
        let event = dispatched(&f.doc, EventKind::MouseDown, f.outside, 4);
        f.detector.observe(&event, false);
        assert!(!f.detector.corroborate(EventKind::MouseDown, 3));
        assert!(!f.detector.corroborate(EventKind::Click, 4));
        assert!(f.detector.corroborate(EventKind::MouseDown, 4));
        assert_eq!(
            resolve(&mut f, 4),
            Some(Verdict::Suppressed(SuppressReason::InsideComponentTree))
        );
        // Corroboration is consumed with the pending event.
        let again = dispatched(&f.doc, EventKind::MouseDown, f.outside, 5);
        f.detector.observe(&again, false);
        assert_eq!(resolve(&mut f, 5), Some(Verdict::Fired));
    }

    #[test]
    fn ignoring_component_tree_fires_despite_corroboration() {
        let mut f = fixture(ClickAwayConfig::default().with_ignore_component_tree(true));
        let event = dispatched(&f.doc, EventKind::MouseDown, f.outside, 1);
        f.detector.observe(&event, false);
        f.detector.corroborate(EventKind::MouseDown, 1);
        assert_eq!(resolve(&mut f, 1), Some(Verdict::Fired));
    }

    #[test]
    fn newer_gesture_overwrites_pending() {
        let mut f = fixture(ClickAwayConfig::default());
        let first = dispatched(&f.doc, EventKind::MouseDown, f.guarded, 1);
        let second = dispatched(&f.doc, EventKind::MouseDown, f.outside, 2);
        f.detector.observe(&first, false);
        f.detector.observe(&second, false);
        assert_eq!(resolve(&mut f, 1), None, "stale task must not resolve");
        assert_eq!(resolve(&mut f, 2), Some(Verdict::Fired));
    }

    #[test]
    fn touch_move_is_consumed_by_next_touch_resolution() {
        let config = ClickAwayConfig::default().with_touch_event(TouchTrigger::TouchEnd);
        let mut f = fixture(config);
        let target = f.outside;
        f.detector
            .observe(&dispatched(&f.doc, EventKind::TouchStart, target, 1), false);
        f.detector
            .observe(&dispatched(&f.doc, EventKind::TouchMove, target, 2), false);
        f.detector
            .observe(&dispatched(&f.doc, EventKind::TouchEnd, target, 3), false);
        assert_eq!(
            resolve(&mut f, 3),
            Some(Verdict::Suppressed(SuppressReason::TouchMoved))
        );
        f.detector
            .observe(&dispatched(&f.doc, EventKind::TouchEnd, target, 4), false);
        assert_eq!(resolve(&mut f, 4), Some(Verdict::Fired));
    }

    #[test]
    fn fallback_containment_uses_boundary() {
        let mut f = fixture(ClickAwayConfig::default());
        let region = f.doc.insert(f.doc.body(), Tag::Element("section"));
        let inside_region = f.doc.insert(region, Tag::Element("p"));
        // No recorded path: containment comes from the tree.
        let pending = PendingEvent {
            event: NativeEvent::new(EventKind::MouseDown, f.outside),
            corroborated: false,
        };
        assert_eq!(
            f.detector.decide(&pending, &f.doc, false, region),
            Verdict::Suppressed(SuppressReason::InsideDom),
            "targets outside the boundary count as inside"
        );
        let pending = PendingEvent {
            event: NativeEvent::new(EventKind::MouseDown, inside_region),
            corroborated: false,
        };
        assert_eq!(
            f.detector.decide(&pending, &f.doc, false, region),
            Verdict::Fired
        );
    }

    #[test]
    fn scrollbar_clicks_follow_configuration() {
        let mut f = fixture(ClickAwayConfig::default());
        let boundary = f.doc.document_element();
        let far = Point::new(2000.0, 10.0);
        let pending = PendingEvent {
            event: dispatched(&f.doc, EventKind::MouseDown, f.doc.document_element(), 1)
                .with_client(far),
            corroborated: false,
        };
        assert_eq!(
            f.detector.decide(&pending, &f.doc, false, boundary),
            Verdict::Suppressed(SuppressReason::ScrollbarClick)
        );
        f.detector.config.ignore_scrollbar_clicks = false;
        assert_eq!(
            f.detector.decide(&pending, &f.doc, false, boundary),
            Verdict::Fired
        );
    }

    #[test]
    fn layer_and_unbound_checks() {
        let mut f = fixture(ClickAwayConfig::default());
        let boundary = f.doc.document_element();
        let pending = PendingEvent {
            event: dispatched(&f.doc, EventKind::MouseDown, f.outside, 1),
            corroborated: false,
        };
        assert_eq!(
            f.detector.decide(&pending, &f.doc, true, boundary),
            Verdict::Suppressed(SuppressReason::LayerDisabled)
        );
        f.detector.node.set(None);
        assert_eq!(
            f.detector.decide(&pending, &f.doc, false, boundary),
            Verdict::Suppressed(SuppressReason::Unbound)
        );
    }
}
