// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared helpers for the `understory_demos` examples.

use tracing_subscriber::EnvFilter;
use understory_property_shop::{InventoryRow, Shop, ShopError};

/// Installs a `fmt` subscriber filtered by `RUST_LOG`, defaulting to
/// `understory_property_shop=debug`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("understory_property_shop=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Prints a titled inventory of `shop`, one row per line.
pub fn print_inventory(title: &str, shop: &Shop) -> Result<(), ShopError> {
    println!("--- {title} ---");
    let rows: Vec<InventoryRow> = shop.inventory()?;
    if rows.is_empty() {
        println!("(no properties)");
    }
    for row in rows {
        println!("{row}");
    }
    Ok(())
}
