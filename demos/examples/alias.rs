// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Aliases and cross-shop formulas.
//!
//! An alias binds one property under a second name on another shop; both
//! names share one value. Formulas can also read other shops directly.
//!
//! Run:
//! - `cargo run -p understory_demos --example alias`

use understory_demos::{init_logging, print_inventory};
use understory_property_shop::{PropertyOptions, Shop, ShopError, Value};

fn main() -> Result<(), ShopError> {
    init_logging();

    let a = Shop::new();
    let b = Shop::new();

    b.add_property(
        "x",
        PropertyOptions::new()
            .value(3.5e20_f64)
            .write(|_, v| Ok(Value::from(v.cast::<f64>()?))),
    )?;
    let b_reader = b.clone();
    a.add_property(
        "x",
        PropertyOptions::new().read(move |_, _| {
            let whole = b_reader.get_as::<f64>("x")?.trunc();
            Ok(Value::from(whole))
        }),
    )?;
    println!("b.x = {:?}, a.x = {:?}", b.get("x")?, a.get("x")?);

    b.make_alias("x", &a, "bx")?;
    a.set("bx", 2.5_f64)?;
    println!("after a.bx = 2.5: b.x = {:?}, a.x = {:?}", b.get("x")?, a.get("x")?);

    print_inventory("a", &a)?;
    print_inventory("b", &b)?;

    // Both names hand back the same descriptor.
    if let (Some(source), Some(alias)) = (b.prop_obj("x"), a.prop_obj("bx")) {
        println!("shared descriptor: {}", std::rc::Rc::ptr_eq(&source, &alias));
    }

    // A second instance of `a` sees the alias too.
    let a2 = a.new_instance();
    println!("a2.bx = {:?}", a2.get("bx")?);
    Ok(())
}
