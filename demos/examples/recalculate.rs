// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bulk recalculation.
//!
//! Members of the recalculation set are rewritten, in name order, with the
//! output of their producers. Other shops are unaffected.
//!
//! Run:
//! - `cargo run -p understory_demos --example recalculate`

use tracing::info;
use understory_demos::{init_logging, print_inventory};
use understory_property_shop::{PropertyOptions, Shop, ShopError, Value};

fn main() -> Result<(), ShopError> {
    init_logging();

    let ps = Shop::new();
    ps.add_property("r1", PropertyOptions::new().value("r1 was recalculated"))?;
    ps.add_property("r2", PropertyOptions::new().value(10_i64))?;
    ps.add_property(
        "r2",
        PropertyOptions::new()
            .value(10_i64)
            .write(|ps, _| Ok(Value::from(ps.get_as::<i64>("r2")? + 1)))
            .recalc(true),
    )?;
    ps.add_property(
        "clock",
        PropertyOptions::new()
            .value(0_i64)
            .write(|_, tick| Ok(tick))
            .recalc(true)
            .producer(|ps| Ok(Value::from(ps.get_as::<i64>("r2")? * 100))),
    )?;

    let a = Shop::new();
    a.add_property(["a", "b"], PropertyOptions::new().value(10_i64))?;
    let x = Shop::new();
    x.add_property(["y", "z"], PropertyOptions::new().value("a string"))?;

    print_inventory("ps", &ps)?;
    print_inventory("a", &a)?;
    print_inventory("x", &x)?;

    for i in 0..3 {
        let (r1, r2, clock) = (ps.get("r1")?, ps.get("r2")?, ps.get("clock")?);
        println!("{i} : {r1:?} {r2:?} {clock:?}");
        info!(pass = i, members = ?ps.recalc_names(), "recalculating");
        ps.recalculate(1)?;
    }

    println!("recalc set: {:?}", ps.recalc_names());
    ps.remove("r2")?;
    println!("recalc set after removing r2: {:?}", ps.recalc_names());
    Ok(())
}
