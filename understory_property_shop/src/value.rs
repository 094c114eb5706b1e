// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Type-erased property values.
//!
//! This module provides [`Value`], the dynamic value stored in backing slots,
//! handed to transforms, and returned by reads. Properties impose no type
//! constraint on what they hold, so every read, write, and producer speaks
//! `Value`.

use alloc::boxed::Box;
use alloc::string::String;
use core::any::{Any, TypeId};
use core::fmt;

use crate::error::ShopError;

/// A type-erased property value.
///
/// This wraps a value of any `'static + Clone + PartialEq + Debug` type,
/// storing it on the heap together with its runtime type tag.
///
/// # Example
///
/// ```rust
/// use understory_property_shop::Value;
///
/// let value = Value::from(42_i64);
/// assert!(value.is::<i64>());
/// assert_eq!(value.downcast_ref::<i64>(), Some(&42));
/// assert_eq!(value.type_name(), "i64");
///
/// let name = Value::from("x");
/// assert_eq!(name.cast::<String>().unwrap(), "x");
/// assert!(name.cast::<i64>().is_err());
/// ```
pub struct Value {
    inner: Box<dyn DynValue>,
    type_id: TypeId,
    type_name: &'static str,
}

impl Value {
    /// Creates a new value from a concrete value.
    ///
    /// Wrapping a [`Value`] in another [`Value`] returns a copy of the inner
    /// value rather than nesting it.
    #[must_use]
    pub fn new<T: Clone + PartialEq + fmt::Debug + 'static>(value: T) -> Self {
        if let Some(value) = (&value as &dyn Any).downcast_ref::<Self>() {
            return value.clone();
        }
        Self {
            inner: Box::new(value),
            type_id: TypeId::of::<T>(),
            type_name: core::any::type_name::<T>(),
        }
    }

    /// Returns the [`TypeId`] of the contained value.
    #[must_use]
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the runtime type tag of the contained value.
    #[must_use]
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns `true` if the contained value is of type `T`.
    #[must_use]
    #[inline]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Attempts to downcast to a reference of type `T`.
    ///
    /// Returns `None` if the contained value is not of type `T`.
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        if self.is::<T>() {
            self.inner.as_any().downcast_ref()
        } else {
            None
        }
    }

    /// Clones the contained value out as a `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::TypeMismatch`] if the contained value is not a `T`.
    pub fn cast<T: Clone + 'static>(&self) -> Result<T, ShopError> {
        self.downcast_ref::<T>()
            .cloned()
            .ok_or(ShopError::TypeMismatch {
                expected: core::any::type_name::<T>(),
                found: self.type_name,
            })
    }
}

impl Clone for Value {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone_boxed(),
            type_id: self.type_id,
            type_name: self.type_name,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && self.inner.dyn_eq(other.inner.as_any())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.dyn_fmt(f)
    }
}

macro_rules! impl_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(value: $ty) -> Self {
                    Self::new(value)
                }
            }
        )*
    };
}

impl_from!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char, String,
);

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Self::new(String::from(value))
    }
}

/// Object-safe view of a stored value.
trait DynValue: Any {
    fn as_any(&self) -> &dyn Any;
    fn clone_boxed(&self) -> Box<dyn DynValue>;
    fn dyn_eq(&self, other: &dyn Any) -> bool;
    fn dyn_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl<T: Clone + PartialEq + fmt::Debug + 'static> DynValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_boxed(&self) -> Box<dyn DynValue> {
        Box::new(self.clone())
    }

    fn dyn_eq(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<T>().is_some_and(|other| self == other)
    }

    fn dyn_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
