// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single names and name collections accepted by
//! [`Shop::add_property`](crate::Shop::add_property).

use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;
use smallvec::SmallVec;

/// Names collected for one `add_property` call.
pub type NameList = SmallVec<[String; 4]>;

/// One property name or a collection of property names.
///
/// A collection fans out: each name receives the same
/// [`PropertyOptions`](crate::PropertyOptions).
pub trait PropertyNames {
    /// Collects the names in the order they should be defined.
    fn into_names(self) -> NameList;
}

impl PropertyNames for &str {
    fn into_names(self) -> NameList {
        smallvec::smallvec![String::from(self)]
    }
}

impl PropertyNames for String {
    fn into_names(self) -> NameList {
        smallvec::smallvec![self]
    }
}

impl PropertyNames for &String {
    fn into_names(self) -> NameList {
        smallvec::smallvec![self.clone()]
    }
}

impl PropertyNames for &[&str] {
    fn into_names(self) -> NameList {
        self.iter().map(|name| String::from(*name)).collect()
    }
}

impl PropertyNames for &[String] {
    fn into_names(self) -> NameList {
        self.iter().cloned().collect()
    }
}

impl<const N: usize> PropertyNames for [&str; N] {
    fn into_names(self) -> NameList {
        self.iter().map(|name| String::from(*name)).collect()
    }
}

impl PropertyNames for Vec<&str> {
    fn into_names(self) -> NameList {
        self.into_iter().map(String::from).collect()
    }
}

impl PropertyNames for Vec<String> {
    fn into_names(self) -> NameList {
        self.into_iter().collect()
    }
}

impl PropertyNames for BTreeSet<String> {
    fn into_names(self) -> NameList {
        self.into_iter().collect()
    }
}
