// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Nested detectors and portals.
//!
//! A dropdown renders its submenu into a container at the end of the body. The submenu is
//! outside the dropdown in the document but inside it in the component tree, so clicking it
//! does not close the dropdown. A second dropdown that ignores the component tree does close.
//!
//! Run:
//! - `cargo run -p understory_click_away_demos --example click_away_portal`

use understory_click_away::{ClickAwayConfig, Host, Tag};

fn main() {
    let mut host = Host::new();
    let body = host.document().body();
    let portal_root = host.document_mut().insert(body, Tag::Element("aside"));

    let dropdown = host
        .mount_click_away(host.root(), ClickAwayConfig::default(), |_| {
            println!("  dropdown: closed");
        })
        .unwrap();
    let strict = host
        .mount_click_away(
            host.root(),
            ClickAwayConfig::default().with_ignore_component_tree(true),
            |_| println!("  strict dropdown: closed"),
        )
        .unwrap();
    let inner = host
        .mount_click_away(dropdown.element.component, ClickAwayConfig::default(), |_| {
            println!("  submenu: closed");
        })
        .unwrap();
    let portal = host
        .mount_portal(inner.element.component, portal_root)
        .unwrap();
    let entry = host.mount_element(portal, "li").unwrap();
    let strict_portal = host
        .mount_portal(strict.element.component, portal_root)
        .unwrap();
    let strict_entry = host.mount_element(strict_portal, "li").unwrap();
    host.run_pending();

    println!("== Click the portaled submenu entry ==");
    host.click(entry.node);

    println!("== Click the strict dropdown's portaled entry ==");
    host.click(strict_entry.node);

    println!("== Click inside the dropdown, outside the submenu ==");
    host.click(dropdown.element.node);
}
