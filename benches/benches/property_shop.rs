// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `understory_property_shop`.

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use std::sync::Once;

use understory_property_shop::{PropertyOptions, Shop, Value};

fn cell_name(i: usize) -> String {
    format!("c{i:05}")
}

/// A shop with `len` plain cells plus a formula and a computed getter.
fn sheet(len: usize) -> Shop {
    let ss = Shop::new();
    let names: Vec<String> = (0..len).map(cell_name).collect();
    ss.add_property(names, PropertyOptions::new().value(1_i64))
        .unwrap();
    ss.add_property(
        "formula",
        PropertyOptions::new()
            .value(0_i64)
            .write(|ss, new| {
                let first = ss.get_as::<i64>("c00000")?;
                Ok(Value::from(2 * first + new.cast::<i64>()?))
            }),
    )
    .unwrap();
    ss.add_property(
        "getter",
        PropertyOptions::new().read(|ss, _| {
            let first = ss.get_as::<i64>("c00000")?;
            Ok(Value::from(first + 1))
        }),
    )
    .unwrap();
    ss
}

fn bench_access(c: &mut Criterion) {
    static PRINT_SIZES: Once = Once::new();
    PRINT_SIZES.call_once(|| {
        eprintln!(
            "sizes: Shop={} Value={} PropertyOptions={}",
            core::mem::size_of::<Shop>(),
            core::mem::size_of::<Value>(),
            core::mem::size_of::<PropertyOptions>(),
        );
    });

    let mut group = c.benchmark_group("property_shop/access");

    for len in [8_usize, 64, 512] {
        let ss = sheet(len);
        let last = cell_name(len - 1);

        group.bench_with_input(BenchmarkId::new("get_plain", len), &last, |b, name| {
            b.iter(|| black_box(ss.get(name).unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("set_plain", len), &last, |b, name| {
            b.iter(|| ss.set(name, black_box(7_i64)).unwrap());
        });

        group.bench_function(BenchmarkId::new("set_formula", len), |b| {
            b.iter(|| ss.set("formula", black_box(23_i64)).unwrap());
        });

        group.bench_function(BenchmarkId::new("get_computed", len), |b| {
            b.iter(|| black_box(ss.get("getter").unwrap()));
        });
    }

    group.finish();
}

fn bench_define(c: &mut Criterion) {
    let mut group = c.benchmark_group("property_shop/define");

    for len in [8_usize, 64, 512] {
        let names: Vec<String> = (0..len).map(cell_name).collect();
        group.throughput(Throughput::Elements(len as u64));

        group.bench_with_input(BenchmarkId::new("fan_out", len), &names, |b, names| {
            b.iter_batched(
                || (Shop::new(), names.clone()),
                |(ss, names)| {
                    ss.add_property(names, PropertyOptions::new().value(0_i64))
                        .unwrap();
                    black_box(ss);
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("inventory", len), &names, |b, names| {
            let ss = Shop::new();
            ss.add_simple(names.as_slice()).unwrap();
            b.iter(|| black_box(ss.inventory().unwrap()));
        });
    }

    group.finish();
}

fn bench_recalculate(c: &mut Criterion) {
    let mut group = c.benchmark_group("property_shop/recalculate");

    for len in [8_usize, 64, 512] {
        let ss = Shop::new();
        let names: Vec<String> = (0..len).map(cell_name).collect();
        ss.add_property(
            names,
            PropertyOptions::new()
                .value(0_i64)
                .write(|_, v| Ok(Value::from(v.cast::<i64>()? + 1)))
                .recalc(true)
                .producer(|_| Ok(Value::from(1_i64))),
        )
        .unwrap();
        group.throughput(Throughput::Elements(len as u64));

        group.bench_function(BenchmarkId::new("one_pass", len), |b| {
            b.iter(|| ss.recalculate(black_box(1)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_access, bench_define, bench_recalculate);
criterion_main!(benches);
