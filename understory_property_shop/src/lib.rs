// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Property Shop: runtime-defined, spreadsheet-like properties.
//!
//! A [`Shop`] is a container whose properties are defined at runtime, each
//! with a backing value, an optional write transform (a "formula" that turns
//! what is written into what is stored), an optional read transform (computed
//! on every read), documentation, and optional membership in a bulk
//! recalculation set.
//!
//! ## Core Concepts
//!
//! ### Shop types
//!
//! [`Shop::new`] allocates a fresh shop *type* and returns one instance of it.
//! Property state belongs to the type: further instances from
//! [`Shop::new_instance`] share every property with the first one.
//!
//! ### Descriptors
//!
//! Each property name is bound to a [`PropertyDescriptor`] holding its
//! transforms, doc, and cached raw value. [`Shop::make_alias`] binds the same
//! descriptor onto another shop under another name; the two names then share
//! one value.
//!
//! ### Reads and writes
//!
//! - `get(name)`: the read transform over the cached raw value, or the raw value
//! - `set(name, value)`: the write transform's result (or the value itself)
//!   becomes the new raw value, committed only after the transform returns, so
//!   formulas that read their own property see the pre-write value
//!
//! ### Recalculation
//!
//! [`Shop::recalculate`] visits the recalculation set in lexicographic name
//! order and writes each member's producer output through its write accessor.
//! There is no dependency tracking between properties.
//!
//! ## Quick Start
//!
//! ```rust
//! use understory_property_shop::{PropertyOptions, Shop, Value};
//!
//! let ss = Shop::new();
//!
//! // Plain cells; the value of an unconfigured property is its own name.
//! ss.add_simple(["v1", "v2", "v3"]).unwrap();
//! assert_eq!(ss.get("v1").unwrap(), Value::from("v1"));
//! ss.set("v1", 1_i64).unwrap();
//!
//! // A formula over another cell and the written value.
//! ss.add_property(
//!     "s2",
//!     PropertyOptions::new()
//!         .value(0_i64)
//!         .write(|ss, new| Ok(Value::from(2 * ss.get_as::<i64>("v1")? + new.cast::<i64>()?))),
//! )
//! .unwrap();
//! ss.set("s2", 23_i64).unwrap();
//! assert_eq!(ss.get_as::<i64>("s2").unwrap(), 25);
//!
//! // A computed read that ignores its own stored value.
//! ss.set("v2", 2_i64).unwrap();
//! ss.add_property(
//!     "g1",
//!     PropertyOptions::new()
//!         .value(0_i64)
//!         .read(|ss, _| Ok(Value::from(ss.get_as::<i64>("v1")? + ss.get_as::<i64>("v2")?))),
//! )
//! .unwrap();
//! assert_eq!(ss.get_as::<i64>("g1").unwrap(), 3);
//!
//! // Bulk recalculation.
//! ss.add_property(
//!     "r2",
//!     PropertyOptions::new()
//!         .value(10_i64)
//!         .write(|ss, _| Ok(Value::from(ss.get_as::<i64>("r2")? + 1)))
//!         .recalc(true),
//! )
//! .unwrap_err(); // `r2` is not defined yet, so the formula cannot read it.
//!
//! ss.add_property("r2", PropertyOptions::new().value(10_i64)).unwrap();
//! ss.add_property(
//!     "r2",
//!     PropertyOptions::new()
//!         .value(10_i64)
//!         .write(|ss, _| Ok(Value::from(ss.get_as::<i64>("r2")? + 1)))
//!         .recalc(true),
//! )
//! .unwrap();
//! assert_eq!(ss.get_as::<i64>("r2").unwrap(), 11);
//! ss.recalculate(2).unwrap();
//! assert_eq!(ss.get_as::<i64>("r2").unwrap(), 13);
//! ```
//!
//! ## Shared state
//!
//! | State | Owner |
//! |-------|-------|
//! | **Descriptor, cached raw value** | shared `Rc`, reachable from every binding |
//! | **Backing slot** | the shop type that defined the property |
//! | **Recalculation set, producers** | each shop type |
//!
//! Shops are single-threaded (`Rc` + `RefCell`). Recalculation is not
//! transactional: a failure part-way leaves earlier updates in place.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. It does not depend on `std`.

#![no_std]

extern crate alloc;

mod descriptor;
mod error;
mod id;
mod inventory;
mod names;
mod options;
mod recalc;
mod shop;
mod table;
mod value;

pub use descriptor::PropertyDescriptor;
pub use error::ShopError;
pub use id::ShopTypeId;
pub use inventory::{ALIAS_MARKER, InventoryRow};
pub use names::{NameList, PropertyNames};
pub use options::{Producer, PropertyOptions, ReadTransform, WriteTransform};
pub use shop::Shop;
pub use value::Value;
