// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types: phases, event kinds and groups, trigger selection, and dispatch steps.
//!
//! ## Overview
//!
//! These types describe the propagation protocol shared by the document and the component
//! tree, and the closed set of interactions a detector can be configured to treat as a click.

/// Phases of event propagation.
///
/// Appears on each [`Dispatch`] item produced by
/// [`emit_path`](crate::propagation::emit_path).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Phase {
    /// Root-to-target traversal, excluding the target.
    Capture,
    /// Target node.
    Target,
    /// Target-to-root traversal, excluding the target.
    Bubble,
}

/// Kind of a native or synthetic event.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum EventKind {
    /// Primary button click (after mousedown and mouseup).
    Click,
    /// Mouse button pressed.
    MouseDown,
    /// Mouse button released.
    MouseUp,
    /// Mouse moved.
    MouseMove,
    /// Context menu requested.
    ContextMenu,
    /// Double click.
    DoubleClick,
    /// Touch point placed.
    TouchStart,
    /// Touch point moved.
    TouchMove,
    /// Touch point lifted.
    TouchEnd,
    /// Touch interrupted by the platform.
    TouchCancel,
    /// Drag started.
    DragStart,
    /// Drag in progress.
    Drag,
    /// Drag finished.
    DragEnd,
    /// Dragged content dropped.
    Drop,
    /// Key pressed.
    KeyDown,
    /// Key released.
    KeyUp,
}

impl EventKind {
    /// Group this kind belongs to.
    pub const fn group(self) -> EventGroups {
        match self {
            Self::Click
            | Self::MouseDown
            | Self::MouseUp
            | Self::MouseMove
            | Self::ContextMenu
            | Self::DoubleClick => EventGroups::MOUSE,
            Self::TouchStart | Self::TouchMove | Self::TouchEnd | Self::TouchCancel => {
                EventGroups::TOUCH
            }
            Self::DragStart | Self::Drag | Self::DragEnd | Self::Drop => EventGroups::DRAG,
            Self::KeyDown | Self::KeyUp => EventGroups::KEYBOARD,
        }
    }

    /// True for touch kinds.
    pub const fn is_touch(self) -> bool {
        matches!(self.group(), EventGroups::TOUCH)
    }

    /// True for the kinds a detector can be triggered by.
    pub const fn is_click_away_kind(self) -> bool {
        matches!(
            self,
            Self::Click | Self::MouseDown | Self::MouseUp | Self::TouchStart | Self::TouchEnd
        )
    }
}

bitflags::bitflags! {
    /// Groups of event kinds, used to select what a stop-propagation element swallows.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct EventGroups: u8 {
        /// Mouse button, click and motion events.
        const MOUSE    = 0b0000_0001;
        /// Touch events.
        const TOUCH    = 0b0000_0010;
        /// Drag and drop events.
        const DRAG     = 0b0000_0100;
        /// Keyboard events.
        const KEYBOARD = 0b0000_1000;
    }
}

/// Mouse interaction treated as a click by a detector.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum MouseTrigger {
    /// Button press.
    #[default]
    MouseDown,
    /// Button release.
    MouseUp,
    /// Full click.
    Click,
    /// Ignore mouse events.
    Disabled,
}

impl MouseTrigger {
    /// Event kind this trigger listens to, or `None` when disabled.
    pub const fn kind(self) -> Option<EventKind> {
        match self {
            Self::MouseDown => Some(EventKind::MouseDown),
            Self::MouseUp => Some(EventKind::MouseUp),
            Self::Click => Some(EventKind::Click),
            Self::Disabled => None,
        }
    }
}

/// Touch interaction treated as a tap by a detector.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum TouchTrigger {
    /// Touch placed.
    #[default]
    TouchStart,
    /// Touch lifted. Lifts after a touch move are not taps.
    TouchEnd,
    /// Ignore touch events.
    Disabled,
}

impl TouchTrigger {
    /// Event kind this trigger listens to, or `None` when disabled.
    pub const fn kind(self) -> Option<EventKind> {
        match self {
            Self::TouchStart => Some(EventKind::TouchStart),
            Self::TouchEnd => Some(EventKind::TouchEnd),
            Self::Disabled => None,
        }
    }
}

/// Component-tree phase in which a detector records that an event came from inside.
///
/// Capture mode records corroboration before descendants get a chance to stop synthetic
/// propagation. A capture-mode detector should not have bubble-mode descendants.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum PhaseMode {
    /// Record in the bubble phase (target to root).
    #[default]
    Bubble,
    /// Record in the capture phase (root to target).
    Capture,
}

/// Look up the parent of a node to reconstruct a root→target path for propagation.
pub trait ParentLookup<K> {
    /// Returns the parent of `node`, or `None` if `node` is a root.
    fn parent_of(&self, node: &K) -> Option<K>;
}

/// A single dispatch step.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Dispatch<K> {
    /// Propagation phase for this step.
    pub phase: Phase,
    /// Node visited by this step.
    pub node: K,
}
