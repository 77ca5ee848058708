// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Click-away basics.
//!
//! Mounts a detector around a small menu, arms it, then clicks inside, outside and on the
//! root scrollbar. Every resolution is printed through a diagnostics sink.
//!
//! Run:
//! - `cargo run -p understory_click_away_demos --example click_away_basics`

use kurbo::Point;
use understory_click_away::diagnostics::Decision;
use understory_click_away::{
    ClickAwayConfig, DiagnosticSink, EventKind, Host, HostOptions, NativeEvent, UsageWarning,
};

struct PrintSink;

impl DiagnosticSink for PrintSink {
    fn warning(&mut self, warning: &UsageWarning) {
        println!("  warning: {warning}");
    }

    fn decision(&mut self, decision: &Decision) {
        println!(
            "  {:<6} depth={} {:?} -> {:?}",
            decision.label.unwrap_or("?"),
            decision.depth,
            decision.kind,
            decision.verdict
        );
    }
}

fn main() {
    let mut host = Host::with_sink(HostOptions::default(), PrintSink);
    let menu = host
        .mount_click_away(
            host.root(),
            ClickAwayConfig::default().with_label("menu"),
            |event| println!("  away! target={:?}", event.target()),
        )
        .unwrap();
    let item = host.mount_element(menu.element.component, "li").unwrap();

    println!("== Before arming ==");
    let body = host.document().body();
    host.dispatch(NativeEvent::new(EventKind::MouseDown, body));
    host.run_pending();

    println!("== Click inside ==");
    host.click(item.node);

    println!("== Click outside ==");
    host.click(body);

    println!("== Click on the root scrollbar ==");
    let html = host.document().document_element();
    host.fire(NativeEvent::new(EventKind::MouseDown, html).with_client(Point::new(1030.0, 10.0)));
}
