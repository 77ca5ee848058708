// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stop propagation elements.
//!
//! An element mounted with [`Host::mount_stop_propagation`](crate::Host::mount_stop_propagation)
//! swallows the selected groups of events in the component tree. Click-away detectors above
//! it can still be told that the event came from inside through `exclude_click_away`.

use crate::error::UsageError;
use crate::event::SyntheticEvent;
use crate::types::EventGroups;

/// Selection of swallowed events.
///
/// At least one of the group fields must be set, even if only to `false`.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct StopPropagationConfig {
    /// Mouse, touch, drag and keyboard events.
    pub all: Option<bool>,
    /// Mouse events.
    pub mouse: Option<bool>,
    /// Touch events.
    pub touch: Option<bool>,
    /// Drag events.
    pub drag: Option<bool>,
    /// Keyboard events.
    pub keyboard: Option<bool>,
    /// Leave native propagation alone.
    pub exclude_native_events: bool,
    /// Relay click-away triggers to the detectors above.
    pub exclude_click_away: bool,
}

impl StopPropagationConfig {
    /// Swallow every group.
    pub fn all() -> Self {
        Self {
            all: Some(true),
            ..Self::default()
        }
    }

    /// Swallow the given groups.
    pub fn groups(groups: EventGroups) -> Self {
        Self {
            mouse: Some(groups.contains(EventGroups::MOUSE)),
            touch: Some(groups.contains(EventGroups::TOUCH)),
            drag: Some(groups.contains(EventGroups::DRAG)),
            keyboard: Some(groups.contains(EventGroups::KEYBOARD)),
            ..Self::default()
        }
    }

    /// Leave native propagation alone.
    #[must_use]
    pub fn with_exclude_native_events(mut self, exclude: bool) -> Self {
        self.exclude_native_events = exclude;
        self
    }

    /// Relay click-away triggers to the detectors above.
    #[must_use]
    pub fn with_exclude_click_away(mut self, exclude: bool) -> Self {
        self.exclude_click_away = exclude;
        self
    }

    /// Groups selected by this configuration.
    pub fn resolve(&self) -> Result<EventGroups, UsageError> {
        let fields = [
            (self.mouse, EventGroups::MOUSE),
            (self.touch, EventGroups::TOUCH),
            (self.drag, EventGroups::DRAG),
            (self.keyboard, EventGroups::KEYBOARD),
        ];
        if self.all.is_none() && fields.iter().all(|(set, _)| set.is_none()) {
            return Err(UsageError::NoStopPropagationGroups);
        }
        if self.all == Some(true) {
            return Ok(EventGroups::all());
        }
        Ok(fields
            .into_iter()
            .filter(|(set, _)| *set == Some(true))
            .fold(EventGroups::empty(), |acc, (_, group)| acc | group))
    }
}

/// Behavior of a mounted stop propagation element.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct StopPropagation {
    groups: EventGroups,
    exclude_native_events: bool,
    exclude_click_away: bool,
}

impl StopPropagation {
    /// Validate `config`.
    pub fn new(config: &StopPropagationConfig) -> Result<Self, UsageError> {
        Ok(Self {
            groups: config.resolve()?,
            exclude_native_events: config.exclude_native_events,
            exclude_click_away: config.exclude_click_away,
        })
    }

    /// Swallowed groups.
    pub fn groups(&self) -> EventGroups {
        self.groups
    }

    /// Handle an event bubbling through the element.
    pub fn handle(&self, event: &mut SyntheticEvent<'_>) {
        let kind = event.kind();
        if !self.groups.contains(kind.group()) {
            return;
        }
        event.stop_propagation();
        if !self.exclude_native_events {
            event.native_mut().stop_immediate_propagation();
        }
        if self.exclude_click_away && kind.is_click_away_kind() {
            event.propagate_click_away();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::component::ComponentId;
    use crate::event::NativeEvent;
    use crate::types::EventKind;
    use understory_dom::Document;

    #[test]
    fn no_group_is_an_error() {
        assert_eq!(
            StopPropagation::new(&StopPropagationConfig::default()),
            Err(UsageError::NoStopPropagationGroups)
        );
        // An explicit `false` is a valid, empty selection.
        let off = StopPropagationConfig {
            all: Some(false),
            ..Default::default()
        };
        assert_eq!(off.resolve(), Ok(EventGroups::empty()));
    }

    #[test]
    fn groups_resolve() {
        assert_eq!(StopPropagationConfig::all().resolve(), Ok(EventGroups::all()));
        let config = StopPropagationConfig {
            touch: Some(true),
            drag: Some(false),
            ..Default::default()
        };
        assert_eq!(config.resolve(), Ok(EventGroups::TOUCH));
        assert_eq!(
            StopPropagationConfig::groups(EventGroups::MOUSE | EventGroups::KEYBOARD).resolve(),
            Ok(EventGroups::MOUSE | EventGroups::KEYBOARD)
        );
    }

    #[test]
    fn handle_stops_selected_groups() {
        let doc = Document::default();
        let mut arena = Arena::default();
        let component = ComponentId(arena.insert(()));
        let stop = StopPropagation::new(
            &StopPropagationConfig::groups(EventGroups::MOUSE).with_exclude_click_away(true),
        )
        .unwrap();

        let mut native = NativeEvent::new(EventKind::MouseDown, doc.body());
        let mut event = SyntheticEvent::new(&mut native, component);
        stop.handle(&mut event);
        assert!(event.is_propagation_stopped());
        assert!(event.take_relay_request());
        assert!(native.is_immediate_propagation_stopped());

        let mut native = NativeEvent::new(EventKind::TouchStart, doc.body());
        let mut event = SyntheticEvent::new(&mut native, component);
        stop.handle(&mut event);
        assert!(!event.is_propagation_stopped());
        assert!(!native.is_propagation_stopped());
    }

    #[test]
    fn native_events_can_be_left_alone() {
        let doc = Document::default();
        let mut arena = Arena::default();
        let component = ComponentId(arena.insert(()));
        let stop =
            StopPropagation::new(&StopPropagationConfig::all().with_exclude_native_events(true))
                .unwrap();
        let mut native = NativeEvent::new(EventKind::KeyDown, doc.body());
        let mut event = SyntheticEvent::new(&mut native, component);
        stop.handle(&mut event);
        assert!(event.is_propagation_stopped());
        assert!(!event.take_relay_request(), "key events are not relayed");
        assert!(!native.is_propagation_stopped());
    }
}
