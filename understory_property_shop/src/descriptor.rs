// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property descriptors.
//!
//! A [`PropertyDescriptor`] bundles everything behind one property name: the
//! transforms, the documentation, and the cached raw value that reads start
//! from. Descriptors live behind an `Rc` owned by the shop *type*, so every
//! instance of that type, and every alias of the property on other types,
//! reaches the same cached value.

use alloc::rc::{Rc, Weak};
use alloc::string::String;
use core::cell::RefCell;
use core::fmt;

use tracing::trace;

use crate::error::ShopError;
use crate::options::{ReadTransform, WriteTransform};
use crate::shop::{Shop, ShopType};
use crate::value::Value;

/// The shared state and accessors behind one property.
///
/// Obtained through [`Shop::prop_obj`](crate::Shop::prop_obj). Two names
/// that report [`Rc::ptr_eq`] descriptors are aliases of one another.
///
/// # Example
///
/// ```rust
/// use std::rc::Rc;
/// use understory_property_shop::{PropertyOptions, Shop};
///
/// let source = Shop::new();
/// let target = Shop::new();
/// source.add_property("p", PropertyOptions::new().value(1_i64)).unwrap();
/// source.make_alias("p", &target, "q").unwrap();
///
/// let p = source.prop_obj("p").unwrap();
/// let q = target.prop_obj("q").unwrap();
/// assert!(Rc::ptr_eq(&p, &q));
/// assert_eq!(q.name(), "p");
/// ```
pub struct PropertyDescriptor {
    name: String,
    doc: String,
    read: Option<ReadTransform>,
    write: Option<WriteTransform>,
    cached: RefCell<Value>,
    home: Weak<ShopType>,
}

impl PropertyDescriptor {
    pub(crate) fn new(
        name: String,
        doc: String,
        read: Option<ReadTransform>,
        write: Option<WriteTransform>,
        raw: Value,
        home: Weak<ShopType>,
    ) -> Self {
        Self {
            name,
            doc,
            read,
            write,
            cached: RefCell::new(raw),
            home,
        }
    }

    /// Returns the name the property was defined under.
    ///
    /// Aliases keep reporting the defining name.
    #[must_use]
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the documentation text.
    #[must_use]
    #[inline]
    pub fn doc(&self) -> &str {
        &self.doc
    }

    /// Returns a copy of the cached raw value, without running the read
    /// transform.
    #[must_use]
    pub fn cached_value(&self) -> Value {
        self.cached.borrow().clone()
    }

    /// Returns whether reads run a transform.
    #[must_use]
    #[inline]
    pub fn has_read_transform(&self) -> bool {
        self.read.is_some()
    }

    /// Returns whether writes run a transform.
    #[must_use]
    #[inline]
    pub fn has_write_transform(&self) -> bool {
        self.write.is_some()
    }

    /// Returns whether the shop type that defined this property still exists.
    #[must_use]
    pub fn home_is_alive(&self) -> bool {
        self.home.strong_count() > 0
    }

    /// The shop type that defined this property, if it still exists.
    pub(crate) fn home(&self) -> Option<Rc<ShopType>> {
        self.home.upgrade()
    }

    /// Runs the read path: the read transform over the cached raw value, or
    /// the raw value itself.
    pub(crate) fn read(&self, shop: &Shop) -> Result<Value, ShopError> {
        let raw = self.cached_value();
        match &self.read {
            Some(transform) => transform(shop, &raw),
            None => Ok(raw),
        }
    }

    /// Runs the write path.
    ///
    /// The transform sees pre-write state; the result is committed only after
    /// it returns.
    pub(crate) fn write(&self, shop: &Shop, value: Value) -> Result<(), ShopError> {
        let raw = match &self.write {
            Some(transform) => transform(shop, value)?,
            None => value,
        };
        self.commit(raw);
        Ok(())
    }

    /// Stores `raw` as the cached value and in the home type's backing slot.
    fn commit(&self, raw: Value) {
        trace!(property = %self.name, value = ?raw, "commit");
        *self.cached.borrow_mut() = raw.clone();
        if let Some(home) = self.home() {
            home.store_backing(self, raw);
        }
    }
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .field("doc", &self.doc)
            .field("cached", &*self.cached.borrow())
            .field("has_read_transform", &self.read.is_some())
            .field("has_write_transform", &self.write.is_some())
            .field("home_is_alive", &self.home_is_alive())
            .finish()
    }
}

/// Returns `true` if `descriptor` is the allocation behind `rc`.
pub(crate) fn is_same(rc: &Rc<PropertyDescriptor>, descriptor: &PropertyDescriptor) -> bool {
    core::ptr::eq(Rc::as_ptr(rc), descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::PropertyOptions;
    use alloc::format;

    fn detached(raw: Value, options: &PropertyOptions) -> PropertyDescriptor {
        PropertyDescriptor::new(
            "p".into(),
            "doc".into(),
            options.read_transform().cloned(),
            options.write_transform().cloned(),
            raw,
            Weak::new(),
        )
    }

    #[test]
    fn plain_read_returns_cached() {
        let shop = Shop::new();
        let descriptor = detached(Value::from(5_i64), &PropertyOptions::new());
        assert_eq!(descriptor.read(&shop), Ok(Value::from(5_i64)));
        assert!(!descriptor.has_read_transform());
    }

    #[test]
    fn read_transform_runs_every_time() {
        let shop = Shop::new();
        let options = PropertyOptions::new()
            .read(|_, raw| Ok(Value::from(raw.cast::<i64>()? * 2)));
        let descriptor = detached(Value::from(5_i64), &options);
        assert_eq!(descriptor.read(&shop), Ok(Value::from(10_i64)));
        assert_eq!(descriptor.read(&shop), Ok(Value::from(10_i64)));
        assert_eq!(descriptor.cached_value(), Value::from(5_i64));
    }

    #[test]
    fn write_transform_result_is_cached() {
        let shop = Shop::new();
        let options = PropertyOptions::new()
            .write(|_, v| Ok(Value::from(v.cast::<i64>()? + 1)));
        let descriptor = detached(Value::from(0_i64), &options);
        descriptor.write(&shop, Value::from(41_i64)).unwrap();
        assert_eq!(descriptor.cached_value(), Value::from(42_i64));
    }

    #[test]
    fn failed_write_leaves_cache_untouched() {
        let shop = Shop::new();
        let options = PropertyOptions::new()
            .write(|_, _| Err(ShopError::transform("nope")));
        let descriptor = detached(Value::from(1_i64), &options);
        assert_eq!(
            descriptor.write(&shop, Value::from(2_i64)),
            Err(ShopError::transform("nope"))
        );
        assert_eq!(descriptor.cached_value(), Value::from(1_i64));
    }

    #[test]
    fn detached_descriptor_still_caches() {
        let shop = Shop::new();
        let descriptor = detached(Value::from("a"), &PropertyOptions::new());
        assert!(!descriptor.home_is_alive());
        descriptor.write(&shop, Value::from("b")).unwrap();
        assert_eq!(descriptor.cached_value(), Value::from("b"));
    }

    #[test]
    fn descriptor_debug() {
        let descriptor = detached(Value::from(3_u8), &PropertyOptions::new());
        let debug = format!("{:?}", descriptor);
        assert!(debug.contains("PropertyDescriptor"));
        assert!(debug.contains("cached: 3"));
    }
}
