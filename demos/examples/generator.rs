// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Read transforms with side effects.
//!
//! A getter that writes back to its own property acts like a generator of
//! sequential numbers.
//!
//! Run:
//! - `cargo run -p understory_demos --example generator`

use understory_demos::init_logging;
use understory_property_shop::{PropertyOptions, Shop, ShopError, Value};

/// Every read bumps the stored value of `name` and returns the new value.
///
/// The stored value comes in as `raw`; reading `name` from inside the
/// transform would recurse forever.
fn incrementor(name: &'static str) -> PropertyOptions {
    PropertyOptions::new().read(move |ps, raw| {
        let next = raw.cast::<i64>()? + 1;
        ps.set(name, next)?;
        Ok(Value::from(next))
    })
}

fn next(ps: &Shop, name: &str) -> Result<i64, ShopError> {
    ps.get_as::<i64>(name)
}

fn main() -> Result<(), ShopError> {
    init_logging();

    let ps = Shop::new();
    ps.add_property("g", incrementor("g").value(-1_i64))?;
    ps.set("g", -1_i64)?;
    println!("g: {} {} {}", next(&ps, "g")?, next(&ps, "g")?, next(&ps, "g")?);

    ps.add_property("gp", incrementor("gp").value(99_i64))?;
    println!("gp: {} {} {}", next(&ps, "gp")?, next(&ps, "gp")?, next(&ps, "gp")?);

    if let (Some(g), Some(gp)) = (ps.prop_obj("g"), ps.prop_obj("gp")) {
        println!("prop_obj g: {g:?}");
        println!("prop_obj gp: {gp:?}");
    }
    Ok(())
}
