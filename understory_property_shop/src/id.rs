// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shop type identification.
//!
//! Every call to [`Shop::new`](crate::Shop::new) allocates a fresh, nominal
//! shop type. [`ShopTypeId`] is the runtime identity of that type.

use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

static NEXT_SHOP_TYPE: AtomicU64 = AtomicU64::new(1);

/// The identity of a shop type.
///
/// Instances created with [`Shop::new_instance`](crate::Shop::new_instance)
/// report the same id as the shop they were created from; every
/// [`Shop::new`](crate::Shop::new) call yields a new one.
///
/// # Example
///
/// ```rust
/// use understory_property_shop::Shop;
///
/// let a = Shop::new();
/// let b = Shop::new();
/// assert_ne!(a.type_id(), b.type_id());
/// assert_eq!(a.type_id(), a.new_instance().type_id());
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShopTypeId(u64);

impl ShopTypeId {
    /// Allocates the next unused id.
    pub(crate) fn next() -> Self {
        Self(NEXT_SHOP_TYPE.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the underlying index of this id.
    #[must_use]
    #[inline]
    pub const fn index(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ShopTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ShopTypeId").field(&self.0).finish()
    }
}

impl fmt::Display for ShopTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShopType({})", self.0)
    }
}
