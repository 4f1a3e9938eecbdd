// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! A one to one map that can be looked up from either side.

use std::{
    collections::{HashMap, HashSet},
    fmt,
    hash::Hash,
};

/// A map of left values to right values where each left value has exactly one right value and
/// vice versa. Both directions are held in their own hash map so a lookup from either side is
/// a single hash lookup.
#[derive(Debug, Clone)]
pub struct BijectionMap<L, R>
where
    L: Eq + Hash + Clone,
    R: Eq + Hash + Clone,
{
    left_to_right: HashMap<L, R>,
    right_to_left: HashMap<R, L>,
}

impl<L, R> Default for BijectionMap<L, R>
where
    L: Eq + Hash + Clone,
    R: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<L, R> PartialEq for BijectionMap<L, R>
where
    L: Eq + Hash + Clone,
    R: Eq + Hash + Clone,
{
    fn eq(&self, other: &Self) -> bool {
        self.left_to_right == other.left_to_right
    }
}

impl<L, R> fmt::Display for BijectionMap<L, R>
where
    L: Eq + Hash + Clone + fmt::Display,
    R: Eq + Hash + Clone + fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, (l, r)) in self.left_to_right.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", l, r)?;
        }
        write!(f, "]")
    }
}

impl<L, R> FromIterator<(L, R)> for BijectionMap<L, R>
where
    L: Eq + Hash + Clone,
    R: Eq + Hash + Clone,
{
    fn from_iter<T: IntoIterator<Item = (L, R)>>(iter: T) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<L, R> Extend<(L, R)> for BijectionMap<L, R>
where
    L: Eq + Hash + Clone,
    R: Eq + Hash + Clone,
{
    /// Maps each pair in turn, so later pairs override earlier bindings.
    fn extend<T: IntoIterator<Item = (L, R)>>(&mut self, iter: T) {
        for (l, r) in iter {
            self.map(l, r);
        }
    }
}

impl<L, R> BijectionMap<L, R>
where
    L: Eq + Hash + Clone,
    R: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            left_to_right: HashMap::new(),
            right_to_left: HashMap::new(),
        }
    }

    /// Binds the left value to the right value. Any existing binding of either value is removed
    /// first, so a conflicting binding is silently replaced rather than rejected.
    pub fn map(&mut self, left: L, right: R) {
        if let Some(old_right) = self.left_to_right.remove(&left) {
            if old_right != right {
                trace!("Bijection map drops the previous right binding of a remapped left value");
            }
            self.right_to_left.remove(&old_right);
        }
        if let Some(old_left) = self.right_to_left.remove(&right) {
            self.left_to_right.remove(&old_left);
        }
        self.left_to_right.insert(left.clone(), right.clone());
        self.right_to_left.insert(right, left);
    }

    pub fn get_right(&self, left: &L) -> Option<&R> {
        self.left_to_right.get(left)
    }

    pub fn get_left(&self, right: &R) -> Option<&L> {
        self.right_to_left.get(right)
    }

    pub fn contains_left(&self, left: &L) -> bool {
        self.left_to_right.contains_key(left)
    }

    pub fn contains_right(&self, right: &R) -> bool {
        self.right_to_left.contains_key(right)
    }

    /// Tests if the left value is bound to the right value
    pub fn contains(&self, left: &L, right: &R) -> bool {
        self.left_to_right.get(left) == Some(right)
    }

    /// Removes the binding of the left value, returning the right value it was bound to
    pub fn remove_with_left(&mut self, left: &L) -> Option<R> {
        let right = self.left_to_right.remove(left)?;
        self.right_to_left.remove(&right);
        Some(right)
    }

    /// Removes the binding of the right value, returning the left value it was bound to
    pub fn remove_with_right(&mut self, right: &R) -> Option<L> {
        let left = self.right_to_left.remove(right)?;
        self.left_to_right.remove(&left);
        Some(left)
    }

    /// Removes every binding whose left value is not in the set. Returns true if anything was
    /// removed.
    pub fn retain_left(&mut self, keep: &HashSet<L>) -> bool {
        let before = self.len();
        self.left_to_right.retain(|l, _| keep.contains(l));
        let left_to_right = &self.left_to_right;
        self.right_to_left.retain(|_, l| left_to_right.contains_key(l));
        before != self.len()
    }

    /// Removes every binding whose right value is not in the set. Returns true if anything was
    /// removed.
    pub fn retain_right(&mut self, keep: &HashSet<R>) -> bool {
        let before = self.len();
        self.right_to_left.retain(|r, _| keep.contains(r));
        let right_to_left = &self.right_to_left;
        self.left_to_right.retain(|_, r| right_to_left.contains_key(r));
        before != self.len()
    }

    pub fn left_set(&self) -> HashSet<L> {
        self.left_to_right.keys().cloned().collect()
    }

    pub fn right_set(&self) -> HashSet<R> {
        self.right_to_left.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&L, &R)> {
        self.left_to_right.iter()
    }

    pub fn len(&self) -> usize {
        self.left_to_right.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left_to_right.is_empty()
    }

    pub fn clear(&mut self) {
        self.left_to_right.clear();
        self.right_to_left.clear();
    }
}
