// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_click_away --heading-base-level=0

//! Understory Click Away: detect interactions outside a region of a component tree.
//!
//! ## Overview
//!
//! A click-away detector guards one element and calls a handler when the user clicks or taps
//! somewhere else. "Somewhere else" is decided by two independent sources of evidence:
//!
//! - The document: was the guarded node on the event's dispatch path?
//! - The component tree: did the event pass through the guarded element, or through one of
//!   its logical descendants, while the component tree handled it?
//!
//! The two disagree whenever content is relocated (portals): a menu rendered into a container
//! at the end of the body is outside its owner in the document, but inside it in the component
//! tree. The handler fires only if both agree the event came from outside, unless the detector
//! is configured to ignore the component tree.
//!
//! ## Timing
//!
//! Each detector listens on the document in the capture phase, so it sees a trigger before the
//! component tree does, and defers its decision by one task. By the time the task runs, the
//! component tree has handled the event and any corroboration has been recorded. Detectors do
//! not react to anything until one task has run after they were mounted.
//!
//! ## Supporting pieces
//!
//! - Nested detectors relay corroboration to the detectors above them, so an inner element that
//!   stops synthetic propagation can still tell its ancestors it was hit.
//! - [Layers](Host::mount_layer) disable the detectors below the topmost layer and supply a
//!   default boundary.
//! - [Stop propagation elements](Host::mount_stop_propagation) swallow groups of events and may
//!   relay click-away triggers on the way.
//! - [`boundary::clicked_root_scrollbar`] keeps scrollbar clicks from counting as outside.
//!
//! ## Headless platform
//!
//! There is no browser here. [`Host`] owns a small document model from `understory_dom`, a
//! component tree, native listeners and a task queue, and reproduces standard capture → target
//! → bubble dispatch with the component tree hooked into its root container.
//!
//! ## Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use understory_click_away::{ClickAwayConfig, Host};
//!
//! let mut host = Host::new();
//! let calls = Rc::new(Cell::new(0));
//! let seen = calls.clone();
//! let away = host
//!     .mount_click_away(host.root(), ClickAwayConfig::default(), move |_event| {
//!         seen.set(seen.get() + 1);
//!     })
//!     .unwrap();
//! let child = host.mount_element(away.element.component, "span").unwrap();
//!
//! // Arm the detector.
//! host.run_pending();
//!
//! host.click(child.node);
//! assert_eq!(calls.get(), 0);
//!
//! let body = host.document().body();
//! host.click(body);
//! assert_eq!(calls.get(), 1);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod arena;

pub mod boundary;
pub mod component;
pub mod context;
pub mod detector;
pub mod diagnostics;
pub mod error;
pub mod event;
pub mod host;
pub mod layer;
pub mod propagation;
pub mod scheduler;
pub mod stop_propagation;
pub mod types;

pub use boundary::{NodeRef, clicked_root_scrollbar};
pub use component::{ComponentId, Element, ElementOptions};
pub use detector::{ClickAwayConfig, DetectorId};
pub use diagnostics::{DiagnosticSink, NoopSink, RecordingSink, UsageWarning};
pub use error::UsageError;
pub use event::{NativeEvent, SyntheticEvent};
pub use host::{ClickAway, Host, HostOptions, LayerMount};
pub use layer::LayerId;
pub use stop_propagation::StopPropagationConfig;
pub use types::{EventKind, MouseTrigger, PhaseMode, TouchTrigger};
pub use understory_dom::{Document, NodeId, Tag};
