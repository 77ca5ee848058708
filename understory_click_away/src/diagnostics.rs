// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Developer diagnostics.
//!
//! The host reports two things through a [`DiagnosticSink`]:
//!
//! - [`UsageWarning`]s for setups that work but are probably mistakes, such as a layer
//!   mounted without a root layer above it.
//! - One [`Decision`] per resolved gesture and detector, explaining why the away handler
//!   was or was not called.
//!
//! The default sink, [`NoopSink`], discards everything. [`RecordingSink`] keeps what it is
//! given, which is mostly useful in tests.

use alloc::vec::Vec;

use crate::detector::DetectorId;
use crate::layer::LayerId;
use crate::types::EventKind;

/// A discouraged but functional setup.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum UsageWarning {
    /// A non-root layer was mounted with no root layer above it.
    MissingRootLayer {
        /// The offending layer.
        layer: LayerId,
    },
    /// A root layer was mounted below another root layer.
    NestedRootLayer {
        /// The offending layer.
        layer: LayerId,
    },
    /// A bubble-mode detector was mounted below a capture-mode detector.
    MixedPhaseNesting {
        /// The bubble-mode detector.
        detector: DetectorId,
        /// Nearest detector above it.
        ancestor: Option<DetectorId>,
    },
}

impl core::fmt::Display for UsageWarning {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingRootLayer { .. } => {
                f.write_str("wrap the app in a root layer to use nested layers")
            }
            Self::NestedRootLayer { .. } => f.write_str("only one root layer may exist per tree"),
            Self::MixedPhaseNesting { .. } => f.write_str(
                "a bubble-mode click-away detector is nested inside a capture-mode detector",
            ),
        }
    }
}

/// Why a resolution did not call the away handler.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SuppressReason {
    /// The detector's layer is disabled by a nested layer.
    LayerDisabled,
    /// The touch moved since it started.
    TouchMoved,
    /// The pointer landed on the root scrollbar.
    ScrollbarClick,
    /// The guarded element has no node.
    Unbound,
    /// The target is inside the guarded element in the document.
    InsideDom,
    /// A component-tree descendant handled the event.
    InsideComponentTree,
}

/// Outcome of one resolution.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Verdict {
    /// The away handler was called.
    Fired,
    /// The away handler was not called.
    Suppressed(SuppressReason),
}

/// A resolved gesture for one detector.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Decision {
    /// Detector that resolved.
    pub detector: DetectorId,
    /// Label from the detector's configuration.
    pub label: Option<&'static str>,
    /// Nesting depth of the detector, `0` for outermost.
    pub depth: i32,
    /// Kind of the triggering event.
    pub kind: EventKind,
    /// Outcome.
    pub verdict: Verdict,
}

/// Receiver for diagnostics.
pub trait DiagnosticSink {
    /// Called when a discouraged setup is mounted.
    fn warning(&mut self, warning: &UsageWarning);

    /// Called after each resolution. Ignored by default.
    fn decision(&mut self, decision: &Decision) {
        let _ = decision;
    }
}

/// Discards all diagnostics.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn warning(&mut self, _warning: &UsageWarning) {}
}

/// Keeps all diagnostics in order of arrival.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    /// Warnings received.
    pub warnings: Vec<UsageWarning>,
    /// Decisions received.
    pub decisions: Vec<Decision>,
}

impl RecordingSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears everything recorded so far.
    pub fn clear(&mut self) {
        self.warnings.clear();
        self.decisions.clear();
    }

    /// Decisions recorded for `detector`.
    pub fn decisions_for(&self, detector: DetectorId) -> impl Iterator<Item = &Decision> + '_ {
        self.decisions
            .iter()
            .filter(move |d| d.detector == detector)
    }
}

impl DiagnosticSink for RecordingSink {
    fn warning(&mut self, warning: &UsageWarning) {
        self.warnings.push(*warning);
    }

    fn decision(&mut self, decision: &Decision) {
        self.decisions.push(*decision);
    }
}
