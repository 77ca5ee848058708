// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Usage errors.

use understory_dom::NodeId;

use crate::component::ComponentId;

/// A configuration or call that cannot work.
///
/// Discouraged-but-functional setups are reported as
/// [`UsageWarning`](crate::diagnostics::UsageWarning) instead.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum UsageError {
    /// A stop-propagation element was configured without any event group.
    NoStopPropagationGroups,
    /// The component is not mounted (never was, or was unmounted).
    StaleComponent(ComponentId),
    /// The document node was removed.
    StaleNode(NodeId),
    /// The component has no element of its own.
    NoElement(ComponentId),
}

impl core::fmt::Display for UsageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NoStopPropagationGroups => f.write_str(
                "stop propagation requires at least one of `all`, `mouse`, `touch`, `drag` or `keyboard`",
            ),
            Self::StaleComponent(id) => write!(f, "component {id:?} is not mounted"),
            Self::StaleNode(id) => write!(f, "node {id:?} is not in the document"),
            Self::NoElement(id) => write!(f, "component {id:?} has no element"),
        }
    }
}

impl core::error::Error for UsageError {}
