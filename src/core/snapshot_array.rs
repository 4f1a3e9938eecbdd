// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! A copy on write list, typically of listeners.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::sync::*;
use crate::trace_lock;

/// A list that is replaced as a whole on every change. Readers take a snapshot, an `Arc` of the
/// current contents, without locking, and the snapshot never changes however the list is
/// modified afterwards. Writers are serialized with each other so no change is lost.
#[derive(Debug)]
pub struct SnapshotArray<T> {
    array: ArcSwap<Vec<T>>,
    writer: Mutex<()>,
}

impl<T> Default for SnapshotArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SnapshotArray<T> {
    pub fn new() -> SnapshotArray<T> {
        SnapshotArray {
            array: ArcSwap::from_pointee(Vec::new()),
            writer: Mutex::new(()),
        }
    }

    /// Returns the current contents. The snapshot is unaffected by later changes.
    pub fn get_array(&self) -> Arc<Vec<T>> {
        self.array.load_full()
    }

    pub fn len(&self) -> usize {
        self.array.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes everything
    pub fn clear(&self) {
        let _writer = trace_lock!(self.writer);
        self.array.store(Arc::new(Vec::new()));
    }
}

impl<T> SnapshotArray<T>
where
    T: Clone,
{
    /// Appends the item to a new copy of the list
    pub fn add(&self, item: T) {
        let _writer = trace_lock!(self.writer);
        let current = self.array.load();
        let mut items = Vec::with_capacity(current.len() + 1);
        items.extend_from_slice(&current);
        items.push(item);
        self.array.store(Arc::new(items));
    }

    /// Removes the first item matching the predicate. Returns false if nothing matched.
    pub fn remove_where<F>(&self, f: F) -> bool
    where
        F: Fn(&T) -> bool,
    {
        let _writer = trace_lock!(self.writer);
        let current = self.array.load_full();
        match current.iter().position(f) {
            Some(pos) => {
                let mut items = Vec::with_capacity(current.len() - 1);
                items.extend_from_slice(&current[..pos]);
                items.extend_from_slice(&current[pos + 1..]);
                self.array.store(Arc::new(items));
                true
            }
            None => false,
        }
    }
}

impl<T> SnapshotArray<T>
where
    T: Clone + PartialEq,
{
    /// Removes the first item equal to the supplied item. Returns false if there was none.
    pub fn remove(&self, item: &T) -> bool {
        self.remove_where(|i| i == item)
    }

    pub fn contains(&self, item: &T) -> bool {
        self.array.load().contains(item)
    }
}

impl<T: ?Sized> SnapshotArray<Arc<T>> {
    /// Removes the item that is the same allocation as the supplied one.
    pub fn remove_ptr(&self, item: &Arc<T>) -> bool {
        self.remove_where(|i| Arc::ptr_eq(i, item))
    }
}
