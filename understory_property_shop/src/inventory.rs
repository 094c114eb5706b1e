// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Introspection of a shop's properties.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::descriptor::PropertyDescriptor;
use crate::error::ShopError;
use crate::shop::Shop;
use crate::value::Value;

/// Rendered in place of a backing value for aliases, whose backing slot lives
/// on another shop type.
pub const ALIAS_MARKER: &str = " must be an alias ";

/// One property as seen by [`Shop::inventory`].
#[derive(Clone, Debug, PartialEq)]
pub struct InventoryRow {
    /// The name the property is bound under on this shop.
    pub name: String,
    /// This type's backing slot, or `None` for an alias.
    pub backing: Option<Value>,
    /// The descriptor's cached raw value.
    pub cached: Value,
    /// The value returned by the read accessor.
    pub effective: Value,
    /// Documentation text.
    pub doc: String,
    /// Whether the name is a recalculation member on this shop.
    pub in_recalc: bool,
}

impl InventoryRow {
    /// Returns `true` if the property's backing slot lives on another type.
    #[must_use]
    pub fn is_alias(&self) -> bool {
        self.backing.is_none()
    }

    /// Type tag of the backing value; `None` for aliases.
    #[must_use]
    pub fn backing_type(&self) -> Option<&'static str> {
        self.backing.as_ref().map(Value::type_name)
    }

    /// Type tag of the value returned by the read accessor.
    #[must_use]
    pub fn effective_type(&self) -> &'static str {
        self.effective.type_name()
    }

    /// `"IsInRecalcset"` or `"NotInRecalcset"`.
    #[must_use]
    pub fn recalc_status(&self) -> &'static str {
        if self.in_recalc {
            "IsInRecalcset"
        } else {
            "NotInRecalcset"
        }
    }
}

impl fmt::Display for InventoryRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}, ", self.name)?;
        match &self.backing {
            Some(backing) => write!(f, "{backing:?}, {}, ", backing.type_name())?,
            None => write!(f, "{ALIAS_MARKER:?}, -, ")?,
        }
        write!(
            f,
            "{:?}, {:?}, {}, {:?}, \" {}\"]",
            self.cached,
            self.effective,
            self.effective_type(),
            self.doc,
            self.recalc_status()
        )
    }
}

impl Shop {
    /// Lists every defined property in name order.
    ///
    /// Each row carries the effective value, which is obtained through the
    /// ordinary read accessor, so read transforms run (with whatever side
    /// effects they have).
    ///
    /// # Errors
    ///
    /// Returns the first read transform failure.
    ///
    /// # Example
    ///
    /// ```rust
    /// use understory_property_shop::{PropertyOptions, Shop, Value};
    ///
    /// let ss = Shop::new();
    /// ss.add_property(
    ///     "b1",
    ///     PropertyOptions::new()
    ///         .value(12.5_f64)
    ///         .read(|_, raw| Ok(Value::from(format!("{:?}", raw))))
    ///         .doc("b1 custom doc"),
    /// )
    /// .unwrap();
    ///
    /// let rows = ss.inventory().unwrap();
    /// assert_eq!(rows.len(), 1);
    /// assert_eq!(rows[0].cached, Value::from(12.5_f64));
    /// assert_eq!(rows[0].effective, Value::from("12.5"));
    /// assert_eq!(rows[0].doc, "b1 custom doc");
    /// assert_eq!(rows[0].recalc_status(), "NotInRecalcset");
    /// ```
    pub fn inventory(&self) -> Result<Vec<InventoryRow>, ShopError> {
        let snapshot: Vec<_> = self
            .ty()
            .state
            .borrow()
            .table
            .iter()
            .map(|binding| (binding.name.clone(), Rc::clone(&binding.descriptor)))
            .collect();

        // Raw state is captured before the read accessor runs, so a read
        // transform with side effects shows up in `effective` only.
        snapshot
            .into_iter()
            .map(|(name, descriptor)| {
                let backing = self.backing(&name);
                let cached = descriptor.cached_value();
                let effective = descriptor.read(self)?;
                Ok(InventoryRow {
                    in_recalc: self.is_recalc(&name),
                    doc: String::from(descriptor.doc()),
                    name,
                    backing,
                    cached,
                    effective,
                })
            })
            .collect()
    }

    /// Returns the documentation text of `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::UnknownProperty`] if `name` is not defined.
    pub fn prop_doc(&self, name: &str) -> Result<String, ShopError> {
        self.descriptor(name)
            .map(|descriptor| String::from(descriptor.doc()))
            .ok_or_else(|| ShopError::unknown(name))
    }

    /// Returns the descriptor bound to `name`, or `None` if it is undefined.
    #[must_use]
    pub fn prop_obj(&self, name: &str) -> Option<Rc<PropertyDescriptor>> {
        self.descriptor(name)
    }
}
