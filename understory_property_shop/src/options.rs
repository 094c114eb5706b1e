// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-property configuration.
//!
//! This module provides [`PropertyOptions`], the optional arguments of
//! [`Shop::add_property`](crate::Shop::add_property), and the callback types
//! used for read transforms, write transforms, and recalculation producers.

use alloc::rc::Rc;
use alloc::string::String;

use crate::error::ShopError;
use crate::shop::Shop;
use crate::value::Value;

/// Callback that turns a written value into the stored raw value.
///
/// It receives the shop being accessed and the incoming value. Reads of any
/// property made from inside the callback observe pre-write state.
pub type WriteTransform = Rc<dyn Fn(&Shop, Value) -> Result<Value, ShopError>>;

/// Callback that computes what a read returns from the stored raw value.
///
/// It runs on every read; nothing is cached.
pub type ReadTransform = Rc<dyn Fn(&Shop, &Value) -> Result<Value, ShopError>>;

/// Callback that supplies the next value of a property during
/// [`Shop::recalculate`](crate::Shop::recalculate).
pub type Producer = Rc<dyn Fn(&Shop) -> Result<Value, ShopError>>;

/// Configuration for one property definition.
///
/// Every field is optional:
/// - `value`: the initial value, defaults to the property's own name (as a `String`)
/// - `write`: write transform, defaults to storing the value verbatim
/// - `read`: read transform, defaults to returning the stored value
/// - `doc`: documentation text, defaults to the property's name
/// - `recalc`: recalculation-set membership, defaults to `false`
/// - `producer`: recalculation producer, defaults to one returning `0_i64`
///
/// Options are cheap to clone; a fan-out definition reuses them verbatim for
/// every name.
///
/// # Example
///
/// ```rust
/// use understory_property_shop::{PropertyOptions, Value};
///
/// let options = PropertyOptions::new()
///     .value(12.34_f64)
///     .write(|_, v| Ok(Value::from(v.cast::<f64>()?.round())))
///     .doc("rounded on write")
///     .recalc(true)
///     .producer(|_| Ok(Value::from(1.0_f64)));
///
/// assert!(options.has_write_transform());
/// assert!(!options.has_read_transform());
/// assert!(options.is_recalc());
/// ```
#[derive(Clone, Default)]
pub struct PropertyOptions {
    value: Option<Value>,
    write: Option<WriteTransform>,
    read: Option<ReadTransform>,
    doc: Option<String>,
    recalc: bool,
    producer: Option<Producer>,
}

impl PropertyOptions {
    /// Creates options with every field at its default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial value.
    #[must_use]
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Sets the write transform.
    ///
    /// The transform also runs once while the property is being defined, with
    /// the initial value as input.
    #[must_use]
    pub fn write<F>(mut self, transform: F) -> Self
    where
        F: Fn(&Shop, Value) -> Result<Value, ShopError> + 'static,
    {
        self.write = Some(Rc::new(transform));
        self
    }

    /// Sets the read transform.
    #[must_use]
    pub fn read<F>(mut self, transform: F) -> Self
    where
        F: Fn(&Shop, &Value) -> Result<Value, ShopError> + 'static,
    {
        self.read = Some(Rc::new(transform));
        self
    }

    /// Sets the documentation text.
    #[must_use]
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Sets whether the property joins the recalculation set.
    ///
    /// `false` removes the name from the set if an earlier definition added it.
    #[must_use]
    pub fn recalc(mut self, recalc: bool) -> Self {
        self.recalc = recalc;
        self
    }

    /// Sets the recalculation producer.
    ///
    /// The producer is only registered when a write transform is also set.
    #[must_use]
    pub fn producer<F>(mut self, producer: F) -> Self
    where
        F: Fn(&Shop) -> Result<Value, ShopError> + 'static,
    {
        self.producer = Some(Rc::new(producer));
        self
    }

    /// Returns whether a write transform is set.
    #[must_use]
    #[inline]
    pub fn has_write_transform(&self) -> bool {
        self.write.is_some()
    }

    /// Returns whether a read transform is set.
    #[must_use]
    #[inline]
    pub fn has_read_transform(&self) -> bool {
        self.read.is_some()
    }

    /// Returns whether the property joins the recalculation set.
    #[must_use]
    #[inline]
    pub fn is_recalc(&self) -> bool {
        self.recalc
    }

    pub(crate) fn initial_value(&self, name: &str) -> Value {
        self.value.clone().unwrap_or_else(|| Value::from(name))
    }

    pub(crate) fn doc_for(&self, name: &str) -> String {
        self.doc.clone().unwrap_or_else(|| String::from(name))
    }

    pub(crate) fn write_transform(&self) -> Option<&WriteTransform> {
        self.write.as_ref()
    }

    pub(crate) fn read_transform(&self) -> Option<&ReadTransform> {
        self.read.as_ref()
    }

    pub(crate) fn producer_or_default(&self) -> Producer {
        match &self.producer {
            Some(producer) => Rc::clone(producer),
            None => Rc::new(produce_zero),
        }
    }
}

fn produce_zero(_: &Shop) -> Result<Value, ShopError> {
    Ok(Value::from(0_i64))
}

// Manual Debug impl since callbacks aren't Debug
impl core::fmt::Debug for PropertyOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PropertyOptions")
            .field("value", &self.value)
            .field("doc", &self.doc)
            .field("recalc", &self.recalc)
            .field("has_write_transform", &self.write.is_some())
            .field("has_read_transform", &self.read.is_some())
            .field("has_producer", &self.producer.is_some())
            .finish()
    }
}
