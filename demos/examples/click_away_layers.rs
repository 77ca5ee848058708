// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layers.
//!
//! A dialog opened from a page disables the page's detectors until it closes.
//!
//! Run:
//! - `cargo run -p understory_click_away_demos --example click_away_layers`

use understory_click_away::{ClickAwayConfig, Host};

fn main() {
    let mut host = Host::new();
    let app = host.mount_layer(host.root(), true).unwrap();
    host.mount_click_away(app.component, ClickAwayConfig::default(), |_| {
        println!("  popover: closed");
    })
    .unwrap();
    let dialog = host.mount_layer(app.component, false).unwrap();
    let panel = host
        .mount_click_away(dialog.component, ClickAwayConfig::default(), |_| {
            println!("  dialog: closed");
        })
        .unwrap();
    host.run_pending();
    let body = host.document().body();

    println!("== Click inside the dialog ==");
    host.click(panel.element.node);

    println!("== Click outside with the dialog open ==");
    host.click(body);

    println!("== Close the dialog, click outside ==");
    host.unmount(dialog.component).unwrap();
    host.click(body);
}
