// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_click_away::{ClickAwayConfig, EventKind, Host, NativeEvent, NodeId, Tag};

/// `depth` detectors nested inside each other, armed. Returns the innermost guarded node.
fn nested_detectors(depth: usize) -> (Host, NodeId) {
    let mut host = Host::new();
    let mut parent = host.root();
    let mut node = host.container();
    for _ in 0..depth {
        let away = host
            .mount_click_away(parent, ClickAwayConfig::default(), |event| {
                black_box(event.target());
            })
            .unwrap();
        parent = away.element.component;
        node = away.element.node;
    }
    host.run_pending();
    (host, node)
}

/// Like [`nested_detectors`], with the innermost element rendered through a portal.
fn nested_detectors_portal(depth: usize) -> (Host, NodeId) {
    let mut host = Host::new();
    let body = host.document().body();
    let outside = host.document_mut().insert(body, Tag::Element("aside"));
    let mut parent = host.root();
    for _ in 0..depth {
        let away = host
            .mount_click_away(parent, ClickAwayConfig::default(), |event| {
                black_box(event.target());
            })
            .unwrap();
        parent = away.element.component;
    }
    let portal = host.mount_portal(parent, outside).unwrap();
    let leaf = host.mount_element(portal, "li").unwrap();
    host.run_pending();
    (host, leaf.node)
}

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    for &n in &[8_usize, 32, 128] {
        group.throughput(Throughput::Elements(n as u64));

        let (mut host, inner) = nested_detectors(n);
        group.bench_function(format!("mousedown_inside_n{n}"), |b| {
            b.iter(|| {
                host.fire(NativeEvent::new(EventKind::MouseDown, inner));
            });
        });

        let body = host.document().body();
        group.bench_function(format!("mousedown_outside_n{n}"), |b| {
            b.iter(|| {
                host.fire(NativeEvent::new(EventKind::MouseDown, body));
            });
        });

        let (mut host, leaf) = nested_detectors_portal(n);
        group.bench_function(format!("mousedown_portal_n{n}"), |b| {
            b.iter(|| {
                host.fire(NativeEvent::new(EventKind::MouseDown, leaf));
            });
        });
    }
    group.finish();
}

fn bench_mount(c: &mut Criterion) {
    let mut group = c.benchmark_group("mount");
    for &n in &[8_usize, 32, 128] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("mount_arm_unmount_n{n}"), |b| {
            b.iter_batched(
                Host::new,
                |mut host| {
                    let root = host.root();
                    let mut parent = root;
                    for _ in 0..n {
                        parent = host
                            .mount_click_away(parent, ClickAwayConfig::default(), |_| {})
                            .unwrap()
                            .element
                            .component;
                    }
                    black_box(host.run_pending());
                    host.unmount(root).unwrap();
                    host
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_dispatch, bench_mount);
criterion_main!(benches);
