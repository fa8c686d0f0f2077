// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Path Access Benchmark
//!
//! Measures the parse-and-walk cost paid by every tooling access:
//! - Scalar get/set at increasing nesting depth
//! - Bulk array transfer
//! - Request create/invoke/delete cycle
//! - Absolute component resolution

#![allow(clippy::uninlined_format_args)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use smp_reflect::{
    AnySimple, Composite, FieldFlags, HashMapTypeRegistry, Publication, Resolver, UUID_FLOAT64,
};
use std::cell::Cell;
use std::sync::Arc;

fn bench_nested_field(c: &mut Criterion) {
    let mut group = c.benchmark_group("nested_field");
    let leaf = Cell::new(0.0f64);

    for depth in [1usize, 4, 8] {
        let mut publication = Publication::new(Arc::new(HashMapTypeRegistry::new()));
        let mut path = String::new();
        {
            let mut scopes = Vec::new();
            let mut publisher = publication.publisher();
            for level in 1..depth {
                let name = format!("s{}", level);
                path.push_str(&name);
                path.push('.');
                scopes.push(name);
            }
            // Publishers borrow their parent, so nest by recursion.
            fn nest<'a>(
                publisher: &mut smp_reflect::Publisher<'_, 'a>,
                names: &[String],
                leaf: &'a Cell<f64>,
            ) {
                match names.split_first() {
                    Some((name, rest)) => {
                        let mut child = publisher.publish_structure(name, "").expect("scope");
                        nest(&mut child, rest, leaf);
                    }
                    None => publisher
                        .publish_field("value", "", leaf, FieldFlags::default())
                        .expect("leaf"),
                }
            }
            nest(&mut publisher, &scopes, &leaf);
        }
        path.push_str("value");

        group.bench_with_input(BenchmarkId::new("get", depth), &path, |b, path| {
            b.iter(|| black_box(publication.get_field_value(black_box(path)).expect("get")));
        });
        group.bench_with_input(BenchmarkId::new("set", depth), &path, |b, path| {
            b.iter(|| {
                publication
                    .set_field_value(black_box(path), AnySimple::Float64(1.0))
                    .expect("set")
            });
        });
    }
    group.finish();
}

fn bench_array_transfer(c: &mut Criterion) {
    let samples: Vec<Cell<f64>> = (0..256).map(|i| Cell::new(f64::from(i))).collect();
    let mut publication = Publication::new(Arc::new(HashMapTypeRegistry::new()));
    publication
        .publish_array("Samples", "", samples.as_slice(), FieldFlags::default())
        .expect("publish");
    let values: Vec<AnySimple> = (0..256).map(|i| AnySimple::from(f64::from(i))).collect();
    let mut out = vec![AnySimple::None; 256];

    c.bench_function("array_set_256", |b| {
        b.iter(|| {
            publication
                .set_array_value("Samples", black_box(&values), 256)
                .expect("set")
        });
    });
    c.bench_function("array_get_256", |b| {
        b.iter(|| {
            publication
                .get_array_value("Samples", &mut out, 256)
                .expect("get")
        });
    });
}

fn bench_request_cycle(c: &mut Criterion) {
    let mut publication = Publication::new(Arc::new(HashMapTypeRegistry::new()));
    publication
        .publish_operation("Square", "", UUID_FLOAT64, |args| {
            let x = f64::try_from(&args[0])?;
            Ok(AnySimple::from(x * x))
        })
        .expect("publish")
        .publish_parameter("x", "", UUID_FLOAT64)
        .expect("param");

    c.bench_function("request_cycle", |b| {
        b.iter(|| {
            let handle = publication.create_request("Square").expect("request");
            publication
                .request_mut(handle)
                .expect("live")
                .set_parameter_value(0, 3.0f64)
                .expect("bind");
            publication.invoke(handle).expect("invoke");
            let value = publication
                .request_mut(handle)
                .expect("live")
                .return_value()
                .expect("return");
            publication.delete_request(handle).expect("delete");
            black_box(value)
        });
    });
}

fn bench_resolver(c: &mut Criterion) {
    let root = Composite::root("Sim");
    let mut node = root.clone();
    for level in 0..6 {
        for sibling in 0..8 {
            node.add_child(&format!("n{}_{}", level, sibling)).expect("child");
        }
        node = node.add_child(&format!("deep{}", level)).expect("deep");
    }
    let resolver = Resolver::new(root);
    let path = "deep0.deep1.deep2.deep3.deep4.deep5";

    c.bench_function("resolve_absolute_depth6", |b| {
        b.iter(|| black_box(resolver.resolve_absolute(black_box(path)).is_some()));
    });
}

criterion_group!(
    benches,
    bench_nested_field,
    bench_array_transfer,
    bench_request_cycle,
    bench_resolver
);
criterion_main!(benches);
