// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! A first in first out queue whose items can only leave once they have hatched.

use std::{
    collections::{HashMap, VecDeque},
    hash::Hash,
    time::{Duration, Instant},
};

use crate::sync::*;
use crate::trace_lock;
use crate::types::status_code::StatusCode;

struct Inner<T> {
    /// Items in the order they were incubated
    order: VecDeque<T>,
    /// Item to hatched flag
    hatched: HashMap<T, bool>,
}

impl<T> Inner<T>
where
    T: Eq + Hash + Clone,
{
    fn head_if_hatched(&self) -> Option<T> {
        self.order
            .front()
            .filter(|head| self.hatched.get(*head) == Some(&true))
            .cloned()
    }

    fn pop_head(&mut self) -> Option<T> {
        let head = self.order.pop_front()?;
        self.hatched.remove(&head);
        Some(head)
    }

    fn is_incubating(&self, item: &T) -> bool {
        self.hatched.get(item) == Some(&false)
    }
}

/// Items are incubated in order and later hatched in any order, but they are only handed out
/// in the order they were incubated. An item that hatches early waits until every item ahead of
/// it has hatched and been removed. This is how responses to pipelined requests are delivered
/// in request order even when they complete out of order.
///
/// All operations take a single lock and every change wakes all waiters, which then recheck
/// their own condition.
pub struct IncubationQueue<T> {
    inner: Mutex<Inner<T>>,
    changed: Condvar,
}

impl<T> Default for IncubationQueue<T>
where
    T: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IncubationQueue<T>
where
    T: Eq + Hash + Clone,
{
    pub fn new() -> IncubationQueue<T> {
        IncubationQueue {
            inner: Mutex::new(Inner {
                order: VecDeque::new(),
                hatched: HashMap::new(),
            }),
            changed: Condvar::new(),
        }
    }

    /// Adds an item to the back of the queue in the incubating state. Fails if the item is
    /// already in the queue.
    pub fn incubate(&self, item: T) -> Result<(), StatusCode> {
        let mut inner = trace_lock!(self.inner);
        if inner.hatched.contains_key(&item) {
            error!("Item is already in the incubation queue");
            return Err(StatusCode::BadInvalidArgument);
        }
        inner.hatched.insert(item.clone(), false);
        inner.order.push_back(item);
        self.changed.notify_all();
        Ok(())
    }

    /// Marks an item as hatched. Returns true if it was incubating, false if it had already
    /// hatched or is not in the queue.
    pub fn hatch(&self, item: &T) -> bool {
        let mut inner = trace_lock!(self.inner);
        match inner.hatched.get_mut(item) {
            Some(hatched) => {
                let was_incubating = !*hatched;
                *hatched = true;
                self.changed.notify_all();
                was_incubating
            }
            None => {
                debug!("Cannot hatch an item that is not in the incubation queue");
                false
            }
        }
    }

    /// Removes the head of the queue if it has hatched, otherwise returns `None` without
    /// waiting.
    pub fn remove_next_hatched_if_available(&self) -> Option<T> {
        let mut inner = trace_lock!(self.inner);
        inner.head_if_hatched()?;
        let head = inner.pop_head();
        self.changed.notify_all();
        head
    }

    /// Waits until the head of the queue has hatched and removes it.
    pub fn remove_next_hatched(&self) -> T {
        let mut inner = trace_lock!(self.inner);
        loop {
            if inner.head_if_hatched().is_some() {
                if let Some(head) = inner.pop_head() {
                    self.changed.notify_all();
                    return head;
                }
            }
            self.changed.wait(&mut inner);
        }
    }

    /// Waits up to the timeout for the head of the queue to hatch and removes it. Fails with
    /// `BadTimeout` if it did not hatch in time.
    pub fn remove_next_hatched_timeout(&self, timeout: Duration) -> Result<T, StatusCode> {
        let deadline = Instant::now() + timeout;
        let mut inner = trace_lock!(self.inner);
        loop {
            if inner.head_if_hatched().is_some() {
                if let Some(head) = inner.pop_head() {
                    self.changed.notify_all();
                    return Ok(head);
                }
            }
            if self.changed.wait_until(&mut inner, deadline).timed_out()
                && inner.head_if_hatched().is_none()
            {
                debug!("Timed out waiting for the next item to hatch");
                return Err(StatusCode::BadTimeout);
            }
        }
    }

    /// Returns the head of the queue if it has hatched, without removing it
    pub fn get_next_hatched_if_available(&self) -> Option<T> {
        trace_lock!(self.inner).head_if_hatched()
    }

    /// Waits until the head of the queue has hatched and returns it without removing it.
    pub fn get_next_hatched(&self) -> T {
        let mut inner = trace_lock!(self.inner);
        loop {
            if let Some(head) = inner.head_if_hatched() {
                return head;
            }
            self.changed.wait(&mut inner);
        }
    }

    /// Waits until the queue holds something and returns its head, hatched or not.
    pub fn get_next(&self) -> T {
        let mut inner = trace_lock!(self.inner);
        loop {
            if let Some(head) = inner.order.front() {
                return head.clone();
            }
            self.changed.wait(&mut inner);
        }
    }

    /// Tests if the head of the queue has hatched
    pub fn next_is_hatched(&self) -> bool {
        trace_lock!(self.inner).head_if_hatched().is_some()
    }

    /// Waits while the item is incubating. Returns straight away if the item has hatched or is
    /// not in the queue.
    pub fn wait_until_incubated(&self, item: &T) {
        let mut inner = trace_lock!(self.inner);
        while inner.is_incubating(item) {
            self.changed.wait(&mut inner);
        }
    }

    pub fn contains(&self, item: &T) -> bool {
        trace_lock!(self.inner).hatched.contains_key(item)
    }

    pub fn is_hatched(&self, item: &T) -> bool {
        trace_lock!(self.inner).hatched.get(item) == Some(&true)
    }

    pub fn is_incubating(&self, item: &T) -> bool {
        trace_lock!(self.inner).is_incubating(item)
    }

    pub fn len(&self) -> usize {
        trace_lock!(self.inner).order.len()
    }

    pub fn is_empty(&self) -> bool {
        trace_lock!(self.inner).order.is_empty()
    }

    /// Removes everything from the queue and wakes any waiters
    pub fn clear(&self) {
        let mut inner = trace_lock!(self.inner);
        inner.order.clear();
        inner.hatched.clear();
        self.changed.notify_all();
    }

    /// A copy of the items in queue order
    pub fn snapshot(&self) -> Vec<T> {
        trace_lock!(self.inner).order.iter().cloned().collect()
    }
}
