// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-type property table.
//!
//! [`PropertyTable`] maps names to descriptor bindings, and holds the backing
//! slot of every property the type defined itself.
//!
//! # Implementation
//!
//! Like the sparse per-object stores elsewhere in Understory, bindings live in
//! a `SmallVec` sorted by name and searched with binary search. Shops usually
//! carry a handful to a few dozen properties, and enumeration in name order
//! falls out for free.

use alloc::rc::Rc;
use alloc::string::String;
use smallvec::SmallVec;

use crate::descriptor::{self, PropertyDescriptor};
use crate::value::Value;

/// Inline capacity for bindings before spilling to the heap.
const INLINE_CAPACITY: usize = 8;

/// One name bound to a descriptor on a shop type.
#[derive(Debug)]
pub(crate) struct Binding {
    pub(crate) name: String,
    pub(crate) descriptor: Rc<PropertyDescriptor>,
    /// The type's own backing slot. `None` for aliases, whose slot lives on the
    /// type that defined the descriptor.
    pub(crate) backing: Option<Value>,
}

impl Binding {
    /// A binding on the type that defined the descriptor.
    pub(crate) fn home(name: String, descriptor: Rc<PropertyDescriptor>, raw: Value) -> Self {
        Self {
            name,
            descriptor,
            backing: Some(raw),
        }
    }

    /// A binding to a descriptor defined elsewhere.
    pub(crate) fn alias(name: String, descriptor: Rc<PropertyDescriptor>) -> Self {
        Self {
            name,
            descriptor,
            backing: None,
        }
    }
}

/// Name-sorted bindings for one shop type.
#[derive(Debug, Default)]
pub(crate) struct PropertyTable {
    entries: SmallVec<[Binding; INLINE_CAPACITY]>,
}

impl PropertyTable {
    #[inline]
    fn find(&self, name: &str) -> Result<usize, usize> {
        self.entries
            .binary_search_by(|binding| binding.name.as_str().cmp(name))
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn get(&self, name: &str) -> Option<&Binding> {
        self.find(name).ok().map(|idx| &self.entries[idx])
    }

    /// Inserts `binding`, returning the binding it replaced.
    pub(crate) fn insert(&mut self, binding: Binding) -> Option<Binding> {
        match self.find(&binding.name) {
            Ok(idx) => Some(core::mem::replace(&mut self.entries[idx], binding)),
            Err(idx) => {
                self.entries.insert(idx, binding);
                None
            }
        }
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<Binding> {
        self.find(name).ok().map(|idx| self.entries.remove(idx))
    }

    /// Removes every binding, handing them back so they can be dropped
    /// outside of any borrow.
    pub(crate) fn take_all(&mut self) -> SmallVec<[Binding; INLINE_CAPACITY]> {
        core::mem::take(&mut self.entries)
    }

    /// Writes the backing slot of `descriptor`, if this type still binds it
    /// under its defining name.
    ///
    /// Returns `false` when the name was removed or rebound to another
    /// descriptor.
    pub(crate) fn store_backing(&mut self, descriptor: &PropertyDescriptor, raw: Value) -> bool {
        match self.find(descriptor.name()) {
            Ok(idx) if descriptor::is_same(&self.entries[idx].descriptor, descriptor) => {
                self.entries[idx].backing = Some(raw);
                true
            }
            _ => false,
        }
    }

    /// Removes the binding that defines `descriptor`, if this type still binds
    /// it under its defining name.
    pub(crate) fn remove_defining(&mut self, descriptor: &PropertyDescriptor) -> Option<Binding> {
        match self.find(descriptor.name()) {
            Ok(idx) if descriptor::is_same(&self.entries[idx].descriptor, descriptor) => {
                Some(self.entries.remove(idx))
            }
            _ => None,
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Binding> + '_ {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Weak;
    use alloc::vec::Vec;

    fn descriptor(name: &str, raw: i64) -> Rc<PropertyDescriptor> {
        Rc::new(PropertyDescriptor::new(
            name.into(),
            name.into(),
            None,
            None,
            Value::from(raw),
            Weak::new(),
        ))
    }

    fn names(table: &PropertyTable) -> Vec<&str> {
        table.iter().map(|b| b.name.as_str()).collect()
    }

    #[test]
    fn table_starts_empty() {
        let table = PropertyTable::default();
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
        assert!(table.get("x").is_none());
    }

    #[test]
    fn table_keeps_name_order() {
        let mut table = PropertyTable::default();
        for name in ["r2", "b", "r1", "a"] {
            table.insert(Binding::home(name.into(), descriptor(name, 0), Value::from(0_i64)));
        }
        assert_eq!(names(&table), ["a", "b", "r1", "r2"]);
    }

    #[test]
    fn table_insert_replaces() {
        let mut table = PropertyTable::default();
        let first = descriptor("x", 1);
        assert!(
            table
                .insert(Binding::home("x".into(), first.clone(), Value::from(1_i64)))
                .is_none()
        );
        let replaced = table
            .insert(Binding::home("x".into(), descriptor("x", 2), Value::from(2_i64)))
            .unwrap();
        assert!(Rc::ptr_eq(&replaced.descriptor, &first));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("x").unwrap().backing, Some(Value::from(2_i64)));
    }

    #[test]
    fn table_remove() {
        let mut table = PropertyTable::default();
        table.insert(Binding::home("x".into(), descriptor("x", 1), Value::from(1_i64)));
        assert!(table.remove("x").is_some());
        assert!(table.remove("x").is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn store_backing_only_for_bound_descriptor() {
        let mut table = PropertyTable::default();
        let bound = descriptor("x", 1);
        let stale = descriptor("x", 0);
        table.insert(Binding::home("x".into(), bound.clone(), Value::from(1_i64)));

        assert!(!table.store_backing(&stale, Value::from(9_i64)));
        assert_eq!(table.get("x").unwrap().backing, Some(Value::from(1_i64)));

        assert!(table.store_backing(&bound, Value::from(5_i64)));
        assert_eq!(table.get("x").unwrap().backing, Some(Value::from(5_i64)));
    }

    #[test]
    fn alias_bindings_have_no_backing() {
        let mut table = PropertyTable::default();
        let source = descriptor("p", 1);
        table.insert(Binding::alias("q".into(), source.clone()));
        assert!(table.get("q").unwrap().backing.is_none());
        // The descriptor's defining name is `p`, which this table does not bind.
        assert!(!table.store_backing(&source, Value::from(2_i64)));
    }

    #[test]
    fn remove_defining_skips_rebound_names() {
        let mut table = PropertyTable::default();
        let stale = descriptor("x", 0);
        let bound = descriptor("x", 1);
        table.insert(Binding::home("x".into(), bound.clone(), Value::from(1_i64)));

        assert!(table.remove_defining(&stale).is_none());
        assert_eq!(table.len(), 1);

        let removed = table.remove_defining(&bound).unwrap();
        assert!(Rc::ptr_eq(&removed.descriptor, &bound));
        assert!(table.is_empty());
    }

    #[test]
    fn take_all_empties() {
        let mut table = PropertyTable::default();
        table.insert(Binding::home("a".into(), descriptor("a", 1), Value::from(1_i64)));
        table.insert(Binding::home("b".into(), descriptor("b", 2), Value::from(2_i64)));
        assert_eq!(table.take_all().len(), 2);
        assert!(table.is_empty());
    }
}
