// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shop types and instances.
//!
//! [`Shop::new`] allocates a fresh shop *type* and returns one instance of it.
//! All property state (descriptors, backing slots, the recalculation set and
//! producers) belongs to the type, not the instance: instances made with
//! [`Shop::new_instance`] observe and mutate exactly the same properties.
//!
//! # Re-entrancy
//!
//! No internal borrow is held while a transform or producer runs. Callbacks
//! may freely read, write, define, or remove properties, on this shop or any
//! other.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use tracing::{debug, trace};

use crate::descriptor::PropertyDescriptor;
use crate::error::ShopError;
use crate::id::ShopTypeId;
use crate::names::PropertyNames;
use crate::options::{Producer, PropertyOptions};
use crate::recalc::RecalcRegistry;
use crate::table::{Binding, PropertyTable};
use crate::value::Value;

/// A shop type: the owner of all property state.
pub(crate) struct ShopType {
    id: ShopTypeId,
    pub(crate) state: RefCell<TypeState>,
}

#[derive(Debug, Default)]
pub(crate) struct TypeState {
    pub(crate) table: PropertyTable,
    pub(crate) recalc: RecalcRegistry,
}

impl ShopType {
    /// Writes the backing slot for `descriptor` if this type still defines it.
    pub(crate) fn store_backing(&self, descriptor: &PropertyDescriptor, raw: Value) {
        if !self.state.borrow_mut().table.store_backing(descriptor, raw) {
            trace!(shop = %self.id, property = descriptor.name(), "backing slot gone");
        }
    }

    /// Removes the defining binding of `descriptor` with its recalculation
    /// state, if this type still binds it.
    ///
    /// The removed parts are handed back so they can be dropped outside of
    /// any borrow.
    pub(crate) fn remove_defining(
        &self,
        descriptor: &PropertyDescriptor,
    ) -> Option<(Binding, Option<Producer>)> {
        let mut state = self.state.borrow_mut();
        let binding = state.table.remove_defining(descriptor)?;
        state.recalc.exclude(descriptor.name());
        let producer = state.recalc.remove_producer(descriptor.name());
        debug!(
            shop = %self.id,
            property = descriptor.name(),
            had_producer = producer.is_some(),
            "removed aliased property"
        );
        Some((binding, producer))
    }
}

/// An instance of a shop type.
///
/// Cloning a `Shop` (or calling [`Shop::new_instance`]) yields another handle
/// onto the same type; property state is never copied.
///
/// # Example
///
/// ```rust
/// use understory_property_shop::{PropertyOptions, Shop, Value};
///
/// let ss = Shop::new();
/// ss.add_property(["v1", "v2"], PropertyOptions::new().value(1_i64)).unwrap();
/// ss.add_property(
///     "s2",
///     PropertyOptions::new()
///         .value(0_i64)
///         .write(|ss, new| Ok(Value::from(2 * ss.get_as::<i64>("v1")? + new.cast::<i64>()?))),
/// )
/// .unwrap();
///
/// ss.set("s2", 23_i64).unwrap();
/// assert_eq!(ss.get_as::<i64>("s2").unwrap(), 25);
///
/// ss.set("v1", 12_i64).unwrap();
/// ss.set("s2", 23_i64).unwrap();
/// assert_eq!(ss.get_as::<i64>("s2").unwrap(), 47);
/// ```
#[derive(Clone)]
pub struct Shop {
    ty: Rc<ShopType>,
}

impl Default for Shop {
    fn default() -> Self {
        Self::new()
    }
}

impl Shop {
    /// Allocates a new shop type, with no properties, and returns an instance
    /// of it.
    #[must_use]
    pub fn new() -> Self {
        let id = ShopTypeId::next();
        debug!(shop = %id, "allocated shop type");
        Self {
            ty: Rc::new(ShopType {
                id,
                state: RefCell::new(TypeState::default()),
            }),
        }
    }

    /// Returns another instance of this shop's type.
    ///
    /// The new instance shares every property with `self`.
    #[must_use]
    pub fn new_instance(&self) -> Self {
        Self {
            ty: Rc::clone(&self.ty),
        }
    }

    /// Returns the identity of this shop's type.
    #[must_use]
    #[inline]
    pub fn type_id(&self) -> ShopTypeId {
        self.ty.id
    }

    /// Returns `true` if both shops are instances of the same type.
    #[must_use]
    #[inline]
    pub fn same_type(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.ty, &other.ty)
    }

    pub(crate) fn ty(&self) -> &ShopType {
        &self.ty
    }

    // =========================================================================
    // Definition
    // =========================================================================

    /// Defines (or redefines) one or more properties.
    ///
    /// With a collection of names, every name is defined with the same
    /// `options`, in the collection's order. A failing definition stops the
    /// fan-out; names before it remain defined.
    ///
    /// Per name:
    /// 1. Recalculation membership is set from `options` alone; an earlier
    ///    definition's membership is never merged in.
    /// 2. If a write transform is set, it runs on the initial value and its
    ///    result becomes the stored value, and a producer (the configured one,
    ///    or one returning `0_i64`) is registered for the name.
    /// 3. The new descriptor replaces any previous definition.
    ///
    /// While the write transform runs, the new definition is not yet
    /// installed: reads of the same name see the previous definition, or fail
    /// with [`ShopError::UnknownProperty`] if there is none.
    ///
    /// # Errors
    ///
    /// Returns whatever the write transform returns on failure.
    pub fn add_property(
        &self,
        names: impl PropertyNames,
        options: PropertyOptions,
    ) -> Result<(), ShopError> {
        for name in names.into_names() {
            self.define(name, &options)?;
        }
        Ok(())
    }

    /// Defines one or more properties with default options: each value and
    /// doc is the property's own name.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the signature mirrors [`Shop::add_property`].
    pub fn add_simple(&self, names: impl PropertyNames) -> Result<(), ShopError> {
        self.add_property(names, PropertyOptions::new())
    }

    fn define(&self, name: String, options: &PropertyOptions) -> Result<(), ShopError> {
        debug!(
            shop = %self.ty.id,
            property = %name,
            recalc = options.is_recalc(),
            write = options.has_write_transform(),
            read = options.has_read_transform(),
            "defining property"
        );
        {
            let mut state = self.ty.state.borrow_mut();
            if options.is_recalc() {
                state.recalc.include(&name);
            } else {
                state.recalc.exclude(&name);
            }
        }

        let initial = options.initial_value(&name);
        let raw = match options.write_transform() {
            Some(write) => {
                let raw = write(self, initial)?;
                self.ty
                    .state
                    .borrow_mut()
                    .recalc
                    .register_producer(&name, options.producer_or_default());
                raw
            }
            None => initial,
        };

        let descriptor = Rc::new(PropertyDescriptor::new(
            name.clone(),
            options.doc_for(&name),
            options.read_transform().cloned(),
            options.write_transform().cloned(),
            raw.clone(),
            Rc::downgrade(&self.ty),
        ));
        self.ty
            .state
            .borrow_mut()
            .table
            .insert(Binding::home(name, descriptor, raw));
        Ok(())
    }

    // =========================================================================
    // Attribute access
    // =========================================================================

    pub(crate) fn descriptor(&self, name: &str) -> Option<Rc<PropertyDescriptor>> {
        self.ty
            .state
            .borrow()
            .table
            .get(name)
            .map(|binding| Rc::clone(&binding.descriptor))
    }

    /// Reads a property through its read accessor.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::UnknownProperty`] if `name` is not defined, or the
    /// read transform's failure.
    pub fn get(&self, name: &str) -> Result<Value, ShopError> {
        let descriptor = self
            .descriptor(name)
            .ok_or_else(|| ShopError::unknown(name))?;
        descriptor.read(self)
    }

    /// Reads a property and clones it out as a `T`.
    ///
    /// # Errors
    ///
    /// As [`Shop::get`], plus [`ShopError::TypeMismatch`] if the value read is
    /// not a `T`.
    pub fn get_as<T: Clone + 'static>(&self, name: &str) -> Result<T, ShopError> {
        self.get(name)?.cast()
    }

    /// Writes a property through its write accessor.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::UnknownProperty`] if `name` is not defined, or the
    /// write transform's failure, in which case nothing is stored.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<(), ShopError> {
        let descriptor = self
            .descriptor(name)
            .ok_or_else(|| ShopError::unknown(name))?;
        descriptor.write(self, value.into())
    }

    /// Removes a property: its binding, its backing slot, its recalculation
    /// membership, and its producer (if any).
    ///
    /// Removing an alias name also removes the aliased property from the
    /// shop type that defined it, along with its recalculation membership
    /// and producer there, provided that type still binds the same
    /// descriptor under its defining name. Other aliases of the descriptor
    /// stay bound.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::UnknownProperty`] if `name` is not defined.
    pub fn remove(&self, name: &str) -> Result<(), ShopError> {
        let (binding, producer) = {
            let mut state = self.ty.state.borrow_mut();
            let binding = state
                .table
                .remove(name)
                .ok_or_else(|| ShopError::unknown(name))?;
            state.recalc.exclude(name);
            (binding, state.recalc.remove_producer(name))
        };
        let alias = binding.backing.is_none();
        debug!(
            shop = %self.ty.id,
            property = name,
            alias,
            had_producer = producer.is_some(),
            "removed property"
        );
        let removed_at_home = match binding.descriptor.home() {
            Some(home) if alias => home.remove_defining(&binding.descriptor),
            _ => None,
        };
        drop((binding, producer, removed_at_home));
        Ok(())
    }

    /// Returns the backing slot of a property defined by this shop's type.
    ///
    /// Returns `None` if `name` is undefined or is an alias whose backing
    /// slot lives on another type.
    #[must_use]
    pub fn backing(&self, name: &str) -> Option<Value> {
        self.ty
            .state
            .borrow()
            .table
            .get(name)
            .and_then(|binding| binding.backing.clone())
    }

    // =========================================================================
    // Recalculation
    // =========================================================================

    /// Recomputes every recalculation member, `times` times over.
    ///
    /// Members are visited in lexicographic name order, fixed when the call
    /// starts. For each, its producer is called and the result is written
    /// through the property's write accessor, so write transforms run as
    /// usual.
    ///
    /// # Errors
    ///
    /// The first failure aborts the remaining work and is returned; updates
    /// already applied are kept. [`ShopError::MissingProducer`] is returned
    /// for a member with no producer.
    pub fn recalculate(&self, times: usize) -> Result<(), ShopError> {
        let order = self.ty.state.borrow().recalc.sorted_members();
        for pass in 0..times {
            debug!(shop = %self.ty.id, pass, members = order.len(), "recalculation pass");
            for name in &order {
                let producer = self
                    .ty
                    .state
                    .borrow()
                    .recalc
                    .producer(name)
                    .ok_or_else(|| ShopError::MissingProducer { name: name.clone() })?;
                let value = producer(self)?;
                trace!(property = %name, value = ?value, "recalculated");
                self.set(name, value)?;
            }
        }
        Ok(())
    }

    /// Returns the recalculation members in the order
    /// [`Shop::recalculate`] visits them.
    #[must_use]
    pub fn recalc_names(&self) -> Vec<String> {
        self.ty.state.borrow().recalc.sorted_members()
    }

    /// Returns `true` if `name` is a recalculation member.
    #[must_use]
    pub fn is_recalc(&self, name: &str) -> bool {
        self.ty.state.borrow().recalc.contains(name)
    }

    /// Returns `true` if a producer is registered for `name`, member or not.
    #[must_use]
    pub fn has_producer(&self, name: &str) -> bool {
        self.ty.state.borrow().recalc.has_producer(name)
    }

    // =========================================================================
    // Aliasing
    // =========================================================================

    /// Binds this shop's `source_name` descriptor onto `target`'s type as
    /// `alias_name`.
    ///
    /// The descriptor is shared, not copied: reads and writes through either
    /// name observe the same state. If `source_name` is a recalculation
    /// member here, `alias_name` becomes one on the target, with the same
    /// producer.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::AliasSourceMissing`] if `source_name` is not
    /// defined on this shop, or [`ShopError::MissingProducer`] if it is a
    /// recalculation member without a producer. Nothing is bound on failure.
    pub fn make_alias(
        &self,
        source_name: &str,
        target: &Self,
        alias_name: &str,
    ) -> Result<(), ShopError> {
        let (descriptor, recalc_producer) = {
            let state = self.ty.state.borrow();
            let Some(binding) = state.table.get(source_name) else {
                return Err(ShopError::AliasSourceMissing {
                    name: source_name.into(),
                });
            };
            let recalc_producer = if state.recalc.contains(source_name) {
                let producer = state
                    .recalc
                    .producer(source_name)
                    .ok_or_else(|| ShopError::MissingProducer {
                        name: source_name.into(),
                    })?;
                Some(producer)
            } else {
                None
            };
            (Rc::clone(&binding.descriptor), recalc_producer)
        };
        debug!(
            source = %self.ty.id,
            target = %target.ty.id,
            property = source_name,
            alias = alias_name,
            "aliasing property"
        );

        let replaced = {
            let mut state = target.ty.state.borrow_mut();
            let replaced = state
                .table
                .insert(Binding::alias(alias_name.into(), descriptor));
            if let Some(producer) = recalc_producer {
                state.recalc.include(alias_name);
                state.recalc.register_producer(alias_name, producer);
            }
            replaced
        };
        drop(replaced);
        Ok(())
    }

    // =========================================================================
    // Bulk state
    // =========================================================================

    /// Removes every property and clears the recalculation set and
    /// producers. The shop's type stays the same and is ready for new
    /// definitions.
    pub fn empty(&self) {
        let (bindings, producers) = {
            let mut state = self.ty.state.borrow_mut();
            (state.table.take_all(), state.recalc.clear())
        };
        debug!(
            shop = %self.ty.id,
            properties = bindings.len(),
            producers = producers.len(),
            "emptied shop"
        );
        drop((bindings, producers));
    }

    /// Returns the number of defined properties, aliases included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ty.state.borrow().table.len()
    }

    /// Returns `true` if no properties are defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ty.state.borrow().table.is_empty()
    }

    /// Returns `true` if `name` is defined.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.ty.state.borrow().table.get(name).is_some()
    }

    /// Returns the defined names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.ty
            .state
            .borrow()
            .table
            .iter()
            .map(|binding| binding.name.clone())
            .collect()
    }
}

impl fmt::Debug for Shop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.ty.state.borrow();
        f.debug_struct("Shop")
            .field("type_id", &self.ty.id)
            .field(
                "properties",
                &state
                    .table
                    .iter()
                    .map(|binding| binding.name.as_str())
                    .collect::<Vec<_>>(),
            )
            .field("recalc", &state.recalc)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::vec;

    fn add_i64(shop: &Shop, name: &str, n: i64) {
        shop.add_property(name, PropertyOptions::new().value(n)).unwrap();
    }

    #[test]
    fn default_value_and_doc_are_the_name() {
        let shop = Shop::new();
        shop.add_simple("x").unwrap();
        assert_eq!(shop.get("x"), Ok(Value::from("x")));
        assert_eq!(shop.backing("x"), Some(Value::from("x")));
        assert_eq!(shop.descriptor("x").unwrap().doc(), "x");
    }

    #[test]
    fn fan_out_defines_each_name() {
        let shop = Shop::new();
        shop.add_property(["a", "b"], PropertyOptions::new().value(10_i64))
            .unwrap();
        assert_eq!(shop.get_as::<i64>("a"), Ok(10));
        assert_eq!(shop.get_as::<i64>("b"), Ok(10));
        assert_eq!(shop.names(), ["a", "b"]);
    }

    #[test]
    fn fan_out_shares_options_but_not_defaults() {
        let shop = Shop::new();
        shop.add_simple(vec!["y", "z"]).unwrap();
        assert_eq!(shop.get("y"), Ok(Value::from("y")));
        assert_eq!(shop.get("z"), Ok(Value::from("z")));
    }

    #[test]
    fn unknown_names_fail() {
        let shop = Shop::new();
        assert_eq!(shop.get("nope"), Err(ShopError::unknown("nope")));
        assert_eq!(shop.set("nope", 1_i64), Err(ShopError::unknown("nope")));
        assert_eq!(shop.remove("nope"), Err(ShopError::unknown("nope")));
    }

    #[test]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "truncation is what the transform does"
    )]
    fn write_transform_runs_at_definition() {
        let shop = Shop::new();
        shop.add_property(
            "p3",
            PropertyOptions::new()
                .value(12.6_f64)
                .write(|_, v| Ok(Value::from(v.cast::<f64>()? as i64))),
        )
        .unwrap();
        assert_eq!(shop.get_as::<i64>("p3"), Ok(12));
        assert_eq!(shop.backing("p3"), Some(Value::from(12_i64)));
        assert!(shop.has_producer("p3"));
        assert!(!shop.is_recalc("p3"));
    }

    #[test]
    fn definition_reads_previous_definition() {
        let shop = Shop::new();
        add_i64(&shop, "v1", 1);
        add_i64(&shop, "s3", 100);
        shop.add_property(
            "s3",
            PropertyOptions::new().value(1000_i64).write(|ss, new| {
                Ok(Value::from(
                    2 * ss.get_as::<i64>("v1")? + new.cast::<i64>()? + ss.get_as::<i64>("s3")?,
                ))
            }),
        )
        .unwrap();
        assert_eq!(shop.get_as::<i64>("s3"), Ok(1102));
    }

    #[test]
    fn self_reference_without_previous_definition_fails() {
        let shop = Shop::new();
        let result = shop.add_property(
            "s",
            PropertyOptions::new()
                .value(1_i64)
                .write(|ss, new| Ok(Value::from(new.cast::<i64>()? + ss.get_as::<i64>("s")?))),
        );
        assert_eq!(result, Err(ShopError::unknown("s")));
        assert!(!shop.contains("s"));
        assert!(!shop.has_producer("s"));
    }

    #[test]
    fn redefinition_resets_recalc_membership() {
        let shop = Shop::new();
        shop.add_property(
            "r",
            PropertyOptions::new().write(|_, v| Ok(v)).recalc(true),
        )
        .unwrap();
        assert!(shop.is_recalc("r"));
        shop.add_property("r", PropertyOptions::new()).unwrap();
        assert!(!shop.is_recalc("r"));
        // Producers are only replaced, never dropped, by redefinition.
        assert!(shop.has_producer("r"));
    }

    #[test]
    fn failed_write_keeps_previous_value() {
        let shop = Shop::new();
        shop.add_property(
            "n",
            PropertyOptions::new().value(1_i64).write(|_, v| {
                let n = v.cast::<i64>()?;
                if n < 0 {
                    Err(ShopError::transform("negative"))
                } else {
                    Ok(v)
                }
            }),
        )
        .unwrap();
        assert_eq!(shop.set("n", -5_i64), Err(ShopError::transform("negative")));
        assert_eq!(shop.get_as::<i64>("n"), Ok(1));
        assert_eq!(shop.backing("n"), Some(Value::from(1_i64)));
    }

    #[test]
    fn instances_share_type_state() {
        let first = Shop::new();
        let second = first.new_instance();
        assert!(first.same_type(&second));
        add_i64(&first, "shared", 1);
        second.set("shared", 2_i64).unwrap();
        assert_eq!(first.get_as::<i64>("shared"), Ok(2));
        assert!(!first.same_type(&Shop::new()));
    }

    #[test]
    fn remove_purges_everything() {
        let shop = Shop::new();
        shop.add_property(
            "r1",
            PropertyOptions::new().write(|_, v| Ok(v)).recalc(true),
        )
        .unwrap();
        shop.remove("r1").unwrap();
        assert!(!shop.contains("r1"));
        assert!(!shop.is_recalc("r1"));
        assert!(!shop.has_producer("r1"));
        assert!(shop.backing("r1").is_none());
    }

    #[test]
    fn remove_through_alias_on_same_type() {
        let shop = Shop::new();
        add_i64(&shop, "p", 1);
        shop.make_alias("p", &shop, "q").unwrap();
        assert_eq!(shop.names(), ["p", "q"]);
        shop.remove("q").unwrap();
        assert!(shop.is_empty());
    }

    #[test]
    fn alias_failure_binds_nothing() {
        let source = Shop::new();
        let target = Shop::new();
        source
            .add_property("p", PropertyOptions::new().recalc(true))
            .unwrap();
        assert_eq!(
            source.make_alias("p", &target, "q"),
            Err(ShopError::MissingProducer { name: "p".into() })
        );
        assert!(target.is_empty());
        assert!(target.recalc_names().is_empty());
    }

    #[test]
    fn recalculate_without_producer_fails() {
        let shop = Shop::new();
        shop.add_property("r", PropertyOptions::new().recalc(true))
            .unwrap();
        assert_eq!(
            shop.recalculate(1),
            Err(ShopError::MissingProducer { name: "r".into() })
        );
    }

    #[test]
    fn recalculate_zero_times_is_a_no_op() {
        let shop = Shop::new();
        shop.add_property("r", PropertyOptions::new().recalc(true))
            .unwrap();
        assert_eq!(shop.recalculate(0), Ok(()));
    }

    #[test]
    fn empty_clears_but_keeps_type() {
        let shop = Shop::new();
        let id = shop.type_id();
        shop.add_property(
            ["a", "b"],
            PropertyOptions::new().write(|_, v| Ok(v)).recalc(true),
        )
        .unwrap();
        shop.empty();
        assert!(shop.is_empty());
        assert!(shop.recalc_names().is_empty());
        assert!(!shop.has_producer("a"));
        assert_eq!(shop.type_id(), id);
        add_i64(&shop, "c", 3);
        assert_eq!(shop.len(), 1);
    }

    #[test]
    fn shop_debug() {
        let shop = Shop::new();
        add_i64(&shop, "b", 1);
        add_i64(&shop, "a", 2);
        let debug = format!("{:?}", shop);
        assert!(debug.contains("Shop"));
        assert!(debug.contains(r#"properties: ["a", "b"]"#));
    }
}
