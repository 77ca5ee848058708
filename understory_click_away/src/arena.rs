// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generational slot storage shared by components, detectors, layers and listeners.

use alloc::vec::Vec;

/// Slot index plus generation. Stale keys never alias a newer entry.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub(crate) struct Key(u32, u32);

pub(crate) struct Arena<T> {
    entries: Vec<Option<T>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
        }
    }
}

impl<T> Arena<T> {
    pub(crate) fn insert(&mut self, value: T) -> Key {
        if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.entries[idx] = Some(value);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "Keys use 32-bit indices by design."
            )]
            Key(idx as u32, generation)
        } else {
            self.entries.push(Some(value));
            self.generations.push(1);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "Keys use 32-bit indices by design."
            )]
            Key((self.entries.len() - 1) as u32, 1)
        }
    }

    pub(crate) fn remove(&mut self, key: Key) -> Option<T> {
        if !self.contains(key) {
            return None;
        }
        let idx = key.0 as usize;
        self.free_list.push(idx);
        self.entries[idx].take()
    }

    pub(crate) fn contains(&self, key: Key) -> bool {
        let idx = key.0 as usize;
        self.generations.get(idx) == Some(&key.1)
            && self.entries.get(idx).is_some_and(Option::is_some)
    }

    pub(crate) fn get(&self, key: Key) -> Option<&T> {
        if !self.contains(key) {
            return None;
        }
        self.entries[key.0 as usize].as_ref()
    }

    pub(crate) fn get_mut(&mut self, key: Key) -> Option<&mut T> {
        if !self.contains(key) {
            return None;
        }
        self.entries[key.0 as usize].as_mut()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len() - self.free_list.len()
    }
}
