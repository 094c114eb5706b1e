// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recalculation registry.
//!
//! [`RecalcRegistry`] holds the set of names that take part in bulk
//! recalculation, and the producers that supply their next values. The two
//! are independent: a producer may be registered for a name that is not a
//! member, and such a producer is never called.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use hashbrown::{HashMap, HashSet};

use crate::options::Producer;

/// Recalculation members and producers for one shop type.
#[derive(Default)]
pub(crate) struct RecalcRegistry {
    members: HashSet<String>,
    producers: HashMap<String, Producer>,
}

impl RecalcRegistry {
    pub(crate) fn include(&mut self, name: &str) {
        if !self.members.contains(name) {
            self.members.insert(name.into());
        }
    }

    /// Returns `true` if `name` was a member.
    pub(crate) fn exclude(&mut self, name: &str) -> bool {
        self.members.remove(name)
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.members.contains(name)
    }

    pub(crate) fn register_producer(&mut self, name: &str, producer: Producer) {
        self.producers.insert(name.into(), producer);
    }

    /// Removes the producer for `name`, if any.
    pub(crate) fn remove_producer(&mut self, name: &str) -> Option<Producer> {
        self.producers.remove(name)
    }

    pub(crate) fn producer(&self, name: &str) -> Option<Producer> {
        self.producers.get(name).map(Rc::clone)
    }

    pub(crate) fn has_producer(&self, name: &str) -> bool {
        self.producers.contains_key(name)
    }

    /// Members in lexicographic order; the order bulk recalculation uses.
    pub(crate) fn sorted_members(&self) -> Vec<String> {
        let mut members: Vec<String> = self.members.iter().cloned().collect();
        members.sort_unstable();
        members
    }

    /// Empties both the member set and the producers, handing the producers
    /// back so they can be dropped outside of any borrow.
    pub(crate) fn clear(&mut self) -> HashMap<String, Producer> {
        self.members.clear();
        core::mem::take(&mut self.producers)
    }
}

impl core::fmt::Debug for RecalcRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut producers: Vec<&str> = self.producers.keys().map(String::as_str).collect();
        producers.sort_unstable();
        f.debug_struct("RecalcRegistry")
            .field("members", &self.sorted_members())
            .field("producers", &producers)
            .finish()
    }
}
