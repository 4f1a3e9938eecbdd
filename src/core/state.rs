// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! An observable state machine that threads can wait on.

use std::{
    any::Any,
    fmt,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
    time::{Duration, Instant},
};

use crate::core::{
    snapshot_array::SnapshotArray,
    thread_pool::{spawn_detached, Executor},
};
use crate::sync::*;
use crate::trace_lock;

/// Receives state transitions. Any `Fn(&S, &S)` closure is a listener.
pub trait StateListener<S>: Send + Sync {
    fn on_state_transition(&self, old_state: &S, new_state: &S);
}

impl<S, F> StateListener<S> for F
where
    F: Fn(&S, &S) + Send + Sync,
{
    fn on_state_transition(&self, old_state: &S, new_state: &S) {
        self(old_state, new_state)
    }
}

/// Why a wait for a state did not produce a state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError<E> {
    /// The state was not reached in time
    Timeout,
    /// The state was reached but an error is recorded on the state machine
    Failed(E),
}

impl<E: fmt::Display> fmt::Display for StateError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::Timeout => write!(f, "timeout"),
            StateError::Failed(e) => write!(f, "failed, {}", e),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for StateError<E> {}

type TransitionGuard<S> = Box<dyn Fn(&S, &S) -> bool + Send + Sync>;
type TransitionHook<S> = Box<dyn Fn(&S, &S) + Send + Sync>;
type ListenerPanicHook = Box<dyn Fn(Box<dyn Any + Send>) + Send + Sync>;

struct Inner<S, E> {
    state: S,
    error: Option<E>,
}

/// A state holder whose transitions are checked, observed by listeners and awaited by threads.
///
/// Two kinds of listener are supported. State listeners run on the thread that made the
/// transition, or on an executor supplied for that transition. Notifiable listeners always run
/// asynchronously on the notifiable executor, or on a thread of their own if there is none.
pub struct StateMachine<S, E> {
    inner: Mutex<Inner<S, E>>,
    changed: Condvar,
    error_state: Option<S>,
    listeners: SnapshotArray<Arc<dyn StateListener<S>>>,
    notifiables: SnapshotArray<Arc<dyn StateListener<S>>>,
    notifiable_executor: Option<Arc<dyn Executor>>,
    transition_guard: Option<TransitionGuard<S>>,
    transition_hook: Option<TransitionHook<S>>,
    listener_panic_hook: Option<Arc<ListenerPanicHook>>,
}

impl<S, E> fmt::Debug for StateMachine<S, E>
where
    S: fmt::Debug,
    E: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = trace_lock!(self.inner);
        f.debug_struct("StateMachine")
            .field("state", &inner.state)
            .field("error", &inner.error)
            .field("error_state", &self.error_state)
            .finish()
    }
}

impl<S, E> StateMachine<S, E>
where
    S: Clone + PartialEq + fmt::Debug + Send + Sync + 'static,
    E: Clone + Send + 'static,
{
    pub fn new(initial_state: S) -> StateMachine<S, E> {
        StateMachine {
            inner: Mutex::new(Inner {
                state: initial_state,
                error: None,
            }),
            changed: Condvar::new(),
            error_state: None,
            listeners: SnapshotArray::new(),
            notifiables: SnapshotArray::new(),
            notifiable_executor: None,
            transition_guard: None,
            transition_hook: None,
            listener_panic_hook: None,
        }
    }

    /// Sets the state that `set_error` moves to
    pub fn with_error_state(mut self, error_state: S) -> Self {
        self.error_state = Some(error_state);
        self
    }

    /// Sets a check that every transition must pass. It is called with the old and new state.
    pub fn with_transition_guard<F>(mut self, guard: F) -> Self
    where
        F: Fn(&S, &S) -> bool + Send + Sync + 'static,
    {
        self.transition_guard = Some(Box::new(guard));
        self
    }

    /// Sets a hook that runs after every transition, before any listener.
    pub fn with_transition_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&S, &S) + Send + Sync + 'static,
    {
        self.transition_hook = Some(Box::new(hook));
        self
    }

    /// Sets the handler of listener panics. Without one a panic is logged.
    pub fn with_listener_panic_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(Box<dyn Any + Send>) + Send + Sync + 'static,
    {
        self.listener_panic_hook = Some(Arc::new(Box::new(hook)));
        self
    }

    /// Sets the executor that notifiable listeners run on, typically a runtime's blocking pool.
    pub fn with_notifiable_executor(mut self, executor: Arc<dyn Executor>) -> Self {
        self.notifiable_executor = Some(executor);
        self
    }

    pub fn state(&self) -> S {
        trace_lock!(self.inner).state.clone()
    }

    pub fn add_state_listener(&self, listener: Arc<dyn StateListener<S>>) {
        self.listeners.add(listener);
    }

    /// Removes a listener previously added. Returns false if it was not there.
    pub fn remove_state_listener(&self, listener: &Arc<dyn StateListener<S>>) -> bool {
        self.listeners.remove_ptr(listener)
    }

    pub fn add_state_notifiable(&self, listener: Arc<dyn StateListener<S>>) {
        self.notifiables.add(listener);
    }

    pub fn remove_state_notifiable(&self, listener: &Arc<dyn StateListener<S>>) -> bool {
        self.notifiables.remove_ptr(listener)
    }

    /// Moves to the new state, running state listeners on this thread. Returns true if the
    /// state changed.
    pub fn set_state(&self, new_state: S) -> bool {
        self.set_state_with(new_state, None, None)
    }

    /// Moves to the new state only if the current state is one of the prerequisites. Returns
    /// true if the state changed.
    pub fn attempt_set_state(&self, prerequisites: &[S], new_state: S) -> bool {
        self.set_state_with(new_state, None, Some(prerequisites))
    }

    /// Moves to the new state. The transition is refused if the machine is already in that
    /// state, if prerequisites are given and the current state is not one of them, or if the
    /// transition guard rejects it. On a transition every waiter wakes, then the transition
    /// hook and the listeners run outside of the lock. State listeners run on the executor if
    /// one is given, otherwise on this thread.
    pub fn set_state_with(
        &self,
        new_state: S,
        listener_executor: Option<&dyn Executor>,
        prerequisites: Option<&[S]>,
    ) -> bool {
        let old_state = {
            let mut inner = trace_lock!(self.inner);
            if inner.state == new_state {
                return false;
            }
            if let Some(prerequisites) = prerequisites {
                if !prerequisites.contains(&inner.state) {
                    trace!(
                        "State {:?} is not a prerequisite of {:?}",
                        inner.state,
                        new_state
                    );
                    return false;
                }
            }
            if let Some(ref guard) = self.transition_guard {
                if !guard(&inner.state, &new_state) {
                    debug!(
                        "Transition from {:?} to {:?} is not allowed",
                        inner.state, new_state
                    );
                    return false;
                }
            }
            std::mem::replace(&mut inner.state, new_state.clone())
        };
        self.changed.notify_all();

        if let Some(ref hook) = self.transition_hook {
            hook(&old_state, &new_state);
        }
        self.fire_listeners(&old_state, &new_state, listener_executor);
        self.fire_notifiables(&old_state, &new_state);
        true
    }

    fn fire_listeners(&self, old_state: &S, new_state: &S, executor: Option<&dyn Executor>) {
        for listener in self.listeners.get_array().iter() {
            match executor {
                Some(executor) => {
                    let task = self.listener_task(listener.clone(), old_state, new_state);
                    if let Err(task) = executor.execute(task) {
                        warn!("Listener executor rejected a state listener, running it inline");
                        task();
                    }
                }
                None => {
                    let result = panic::catch_unwind(AssertUnwindSafe(|| {
                        listener.on_state_transition(old_state, new_state)
                    }));
                    if let Err(err) = result {
                        Self::on_listener_panic(self.listener_panic_hook.as_deref(), err);
                    }
                }
            }
        }
    }

    fn fire_notifiables(&self, old_state: &S, new_state: &S) {
        for listener in self.notifiables.get_array().iter() {
            let task = self.listener_task(listener.clone(), old_state, new_state);
            match self.notifiable_executor {
                Some(ref executor) => {
                    if let Err(task) = executor.execute(task) {
                        warn!("Notifiable executor rejected a listener, running it on its own thread");
                        spawn_detached("State-Notifiable".to_string(), task);
                    }
                }
                None => spawn_detached("State-Notifiable".to_string(), task),
            }
        }
    }

    fn listener_task(
        &self,
        listener: Arc<dyn StateListener<S>>,
        old_state: &S,
        new_state: &S,
    ) -> Box<dyn FnOnce() + Send + 'static> {
        let old_state = old_state.clone();
        let new_state = new_state.clone();
        let panic_hook = self.listener_panic_hook.clone();
        Box::new(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                listener.on_state_transition(&old_state, &new_state)
            }));
            if let Err(err) = result {
                Self::on_listener_panic(panic_hook.as_deref(), err);
            }
        })
    }

    fn on_listener_panic(hook: Option<&ListenerPanicHook>, err: Box<dyn Any + Send>) {
        match hook {
            Some(hook) => hook(err),
            None => {
                let message = err
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| err.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                error!("State listener panicked, reason = {}", message);
            }
        }
    }

    /// Records the error. The machine moves to the error state if it has one, and in any case
    /// every waiter wakes. Waiters for the state the machine is in fail with the error, the
    /// others keep waiting.
    pub fn set_error(&self, error: E) {
        trace_lock!(self.inner).error = Some(error);
        let moved = match self.error_state {
            Some(ref error_state) => self.set_state(error_state.clone()),
            None => false,
        };
        if !moved {
            self.changed.notify_all();
        }
    }

    pub fn clear_error(&self) {
        trace_lock!(self.inner).error = None;
    }

    pub fn error(&self) -> Option<E> {
        trace_lock!(self.inner).error.clone()
    }

    pub fn has_error(&self) -> bool {
        trace_lock!(self.inner).error.is_some()
    }

    /// Fails with the recorded error, if there is one
    pub fn assert_no_error(&self) -> Result<(), E> {
        match self.error() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Waits until the state is one of the given states and returns it. Fails with
    /// `StateError::Failed` if an error is recorded once the state is reached.
    pub fn wait_for_state(&self, states: &[S]) -> Result<S, StateError<E>> {
        let mut inner = trace_lock!(self.inner);
        loop {
            if let Some(result) = Self::check_wait(&inner, states) {
                return result;
            }
            self.changed.wait(&mut inner);
        }
    }

    /// Waits up to the timeout until the state is one of the given states and returns it. Fails
    /// with `StateError::Timeout` if the time runs out, leaving the state untouched, or
    /// `StateError::Failed` if an error is recorded once the state is reached.
    pub fn wait_for_state_timeout(
        &self,
        states: &[S],
        timeout: Duration,
    ) -> Result<S, StateError<E>> {
        let deadline = Instant::now() + timeout;
        let mut inner = trace_lock!(self.inner);
        loop {
            if let Some(result) = Self::check_wait(&inner, states) {
                return result;
            }
            if self.changed.wait_until(&mut inner, deadline).timed_out() {
                return Self::check_wait(&inner, states).unwrap_or(Err(StateError::Timeout));
            }
        }
    }

    fn check_wait(inner: &Inner<S, E>, states: &[S]) -> Option<Result<S, StateError<E>>> {
        if !states.contains(&inner.state) {
            return None;
        }
        match inner.error {
            Some(ref error) => Some(Err(StateError::Failed(error.clone()))),
            None => Some(Ok(inner.state.clone())),
        }
    }
}
