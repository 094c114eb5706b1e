// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spreadsheet-style formulas.
//!
//! Plain cells, formulas over other cells and over their own previous value,
//! computed getters, and a formula that captures outside state.
//!
//! Run:
//! - `cargo run -p understory_demos --example spreadsheet`
//! - `RUST_LOG=understory_property_shop=trace cargo run -p understory_demos --example spreadsheet`

use std::cell::Cell;
use std::rc::Rc;

use understory_demos::{init_logging, print_inventory};
use understory_property_shop::{PropertyOptions, Shop, ShopError, Value};

fn int(ss: &Shop, name: &str) -> Result<i64, ShopError> {
    ss.get_as::<i64>(name)
}

fn print_sums(ss: &Shop) -> Result<(), ShopError> {
    let [s1, s2, s3, s4] = ["s1", "s2", "s3", "s4"].map(|name| ss.get(name));
    println!("{:?} {:?} {:?} {:?}", s1?, s2?, s3?, s4?);
    Ok(())
}

fn main() -> Result<(), ShopError> {
    init_logging();

    let ss = Shop::new();
    ss.add_simple(["v1", "v2", "v3"])?;
    ss.set("v1", 1_i64)?;
    ss.set("v2", 2_i64)?;
    ss.set("v3", 3_i64)?;
    println!("{} {} {}", int(&ss, "v1")?, int(&ss, "v2")?, int(&ss, "v3")?);

    ss.add_property(
        "s1",
        PropertyOptions::new().write(|ss, _| Ok(Value::from(2 * ss.get_as::<i64>("v1")?))),
    )?;
    ss.add_property(
        "s2",
        PropertyOptions::new()
            .value(0_i64)
            .write(|ss, new| {
                let v1 = ss.get_as::<i64>("v1")?;
                Ok(Value::from(2 * v1 + new.cast::<i64>()?))
            }),
    )?;
    // `s3` must exist before its formula can refer to it.
    ss.add_property("s3", PropertyOptions::new().value(100_i64))?;
    ss.add_property(
        "s3",
        PropertyOptions::new().value(1000_i64).write(|ss, new| {
            Ok(Value::from(
                2 * ss.get_as::<i64>("v1")? + new.cast::<i64>()? + ss.get_as::<i64>("s3")?,
            ))
        }),
    )?;

    let local = Rc::new(Cell::new(314.5_f64));
    let captured = Rc::clone(&local);
    ss.add_property(
        "s4",
        PropertyOptions::new().value(0.0_f64).write(move |ss, new| {
            let v1 = ss.get_as::<i64>("v1")? as f64;
            Ok(Value::from(2.0 * v1 + new.cast::<f64>()? + captured.get()))
        }),
    )?;

    ss.set("s1", 22_i64)?;
    ss.set("s2", 23_i64)?;
    ss.set("s3", 24_i64)?;
    print_sums(&ss)?;

    local.set(3314.5);
    ss.set("s4", 0.0_f64)?;
    ss.set("s3", 10_000_i64)?;
    print_sums(&ss)?;

    ss.set("v1", 12_i64)?;
    // Writing anything recomputes `s1`; its formula ignores the input.
    ss.set("s1", 0_i64)?;
    ss.set("s2", 23_i64)?;
    ss.set("s3", 10_000_i64)?;
    print_sums(&ss)?;

    ss.add_property(
        "g1",
        PropertyOptions::new()
            .value(0_i64)
            .read(|ss, _| {
                let sum = ss.get_as::<i64>("v1")? + ss.get_as::<i64>("v2")?;
                Ok(Value::from(sum))
            }),
    )?;
    ss.add_property(
        "g2",
        PropertyOptions::new()
            .value(1000_i64)
            .read(|ss, pv| Ok(Value::from(pv.cast::<i64>()? + ss.get_as::<i64>("v1")?))),
    )?;
    ss.set("v1", 10_i64)?;
    ss.set("v2", 20_i64)?;
    ss.set("g2", 100_000_i64)?;
    println!("g1 = {:?}, g2 = {:?}", ss.get("g1")?, ss.get("g2")?);

    ss.add_property(
        "im1",
        PropertyOptions::new().write(|_, _| Ok(Value::from("immutable value"))),
    )?;
    ss.set("im1", "I changed")?;
    println!("im1 = {:?}", ss.get("im1")?);

    print_inventory("ss", &ss)?;
    ss.empty();
    print_inventory("ss after emptying", &ss)?;
    Ok(())
}
