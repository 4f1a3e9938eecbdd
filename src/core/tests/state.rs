use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::thread;
use std::time::Duration;

use crate::core::{
    state::{StateError, StateListener, StateMachine},
    thread_pool::CurrentThreadExecutor,
};
use crate::sync::*;
use crate::types::StatusCode;

use super::wait_for;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Connecting,
    Connected,
    Closed,
    Failed,
}

type Machine = StateMachine<Phase, StatusCode>;

fn recorder() -> (Arc<Mutex<Vec<(Phase, Phase)>>>, Arc<dyn StateListener<Phase>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let listener: Arc<dyn StateListener<Phase>> = {
        let seen = seen.clone();
        Arc::new(move |old: &Phase, new: &Phase| seen.lock().push((*old, *new)))
    };
    (seen, listener)
}

#[test]
fn set_state() {
    let machine = Machine::new(Phase::Idle);
    assert_eq!(machine.state(), Phase::Idle);
    assert!(machine.set_state(Phase::Connecting));
    assert_eq!(machine.state(), Phase::Connecting);
    // Same state is not a transition
    assert!(!machine.set_state(Phase::Connecting));
}

#[test]
fn attempt_set_state() {
    let machine = Machine::new(Phase::Idle);
    assert!(!machine.attempt_set_state(&[Phase::Connecting], Phase::Connected));
    assert_eq!(machine.state(), Phase::Idle);
    assert!(machine.attempt_set_state(&[Phase::Idle, Phase::Closed], Phase::Connecting));
    assert_eq!(machine.state(), Phase::Connecting);
}

#[test]
fn transition_guard() {
    let machine = Machine::new(Phase::Idle)
        .with_transition_guard(|old, new| !(*old == Phase::Closed && *new != Phase::Idle));
    assert!(machine.set_state(Phase::Closed));
    assert!(!machine.set_state(Phase::Connected));
    assert_eq!(machine.state(), Phase::Closed);
    assert!(machine.set_state(Phase::Idle));
}

#[test]
fn transition_hook_runs_before_listeners() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let machine = {
        let order = order.clone();
        Machine::new(Phase::Idle).with_transition_hook(move |_, _| order.lock().push("hook"))
    };
    let listener: Arc<dyn StateListener<Phase>> = {
        let order = order.clone();
        Arc::new(move |_: &Phase, _: &Phase| order.lock().push("listener"))
    };
    machine.add_state_listener(listener);
    machine.set_state(Phase::Connecting);
    assert_eq!(*order.lock(), vec!["hook", "listener"]);
}

#[test]
fn listeners() {
    let machine = Machine::new(Phase::Idle);
    let (seen, listener) = recorder();
    machine.add_state_listener(listener.clone());
    machine.set_state(Phase::Connecting);
    machine.set_state(Phase::Connecting);
    machine.set_state(Phase::Connected);
    assert_eq!(
        *seen.lock(),
        vec![
            (Phase::Idle, Phase::Connecting),
            (Phase::Connecting, Phase::Connected)
        ]
    );

    assert!(machine.remove_state_listener(&listener));
    assert!(!machine.remove_state_listener(&listener));
    machine.set_state(Phase::Closed);
    assert_eq!(seen.lock().len(), 2);
}

#[test]
fn listener_on_executor() {
    let machine = Machine::new(Phase::Idle);
    let (seen, listener) = recorder();
    machine.add_state_listener(listener);
    assert!(machine.set_state_with(Phase::Connected, Some(&CurrentThreadExecutor), None));
    assert_eq!(*seen.lock(), vec![(Phase::Idle, Phase::Connected)]);
}

#[test]
fn listener_panic_is_contained() {
    let panics = Arc::new(AtomicUsize::new(0));
    let machine = {
        let panics = panics.clone();
        Machine::new(Phase::Idle).with_listener_panic_hook(move |_| {
            panics.fetch_add(1, Ordering::SeqCst);
        })
    };
    let bad: Arc<dyn StateListener<Phase>> = Arc::new(|_: &Phase, _: &Phase| panic!("listener"));
    let (seen, good) = recorder();
    machine.add_state_listener(bad);
    machine.add_state_listener(good);
    assert!(machine.set_state(Phase::Connecting));
    assert_eq!(panics.load(Ordering::SeqCst), 1);
    // Listeners after the one that panicked still run
    assert_eq!(seen.lock().len(), 1);
    assert_eq!(machine.state(), Phase::Connecting);
}

#[test]
fn notifiables_run_asynchronously() {
    let machine = Machine::new(Phase::Idle);
    let (seen, listener) = recorder();
    machine.add_state_notifiable(listener.clone());
    machine.set_state(Phase::Connecting);
    assert!(wait_for(Duration::from_secs(5), || seen.lock().len() == 1));
    assert_eq!(*seen.lock(), vec![(Phase::Idle, Phase::Connecting)]);

    assert!(machine.remove_state_notifiable(&listener));
    machine.set_state(Phase::Connected);
    thread::sleep(Duration::from_millis(20));
    assert_eq!(seen.lock().len(), 1);
}

#[test]
fn notifiables_on_executor() {
    let machine = Machine::new(Phase::Idle).with_notifiable_executor(Arc::new(CurrentThreadExecutor));
    let (seen, listener) = recorder();
    machine.add_state_notifiable(listener);
    machine.set_state(Phase::Connected);
    assert_eq!(*seen.lock(), vec![(Phase::Idle, Phase::Connected)]);
}

#[test]
fn errors() {
    let machine = Machine::new(Phase::Idle).with_error_state(Phase::Failed);
    assert!(!machine.has_error());
    assert_eq!(machine.assert_no_error(), Ok(()));
    machine.set_error(StatusCode::BadTimeout);
    assert!(machine.has_error());
    assert_eq!(machine.error(), Some(StatusCode::BadTimeout));
    assert_eq!(machine.assert_no_error(), Err(StatusCode::BadTimeout));
    assert_eq!(machine.state(), Phase::Failed);
    machine.clear_error();
    assert!(!machine.has_error());
    // Clearing the error leaves the state alone
    assert_eq!(machine.state(), Phase::Failed);
}

#[test]
fn wait_for_state() {
    let machine = Arc::new(Machine::new(Phase::Idle));
    // Already there
    assert_eq!(machine.wait_for_state(&[Phase::Idle]), Ok(Phase::Idle));

    let waiter = {
        let machine = machine.clone();
        thread::spawn(move || machine.wait_for_state(&[Phase::Connected, Phase::Closed]))
    };
    thread::sleep(Duration::from_millis(20));
    machine.set_state(Phase::Connecting);
    machine.set_state(Phase::Connected);
    assert_eq!(waiter.join().unwrap(), Ok(Phase::Connected));
}

#[test]
fn wait_for_state_timeout() {
    let machine = Machine::new(Phase::Idle);
    assert_eq!(
        machine.wait_for_state_timeout(&[Phase::Connected], Duration::from_millis(20)),
        Err(StateError::Timeout)
    );
    assert_eq!(machine.state(), Phase::Idle);
}

#[test]
fn error_without_error_state_keeps_waiting() {
    let machine = Arc::new(Machine::new(Phase::Idle));
    let waiter = {
        let machine = machine.clone();
        thread::spawn(move || {
            machine.wait_for_state_timeout(&[Phase::Connected], Duration::from_millis(200))
        })
    };
    thread::sleep(Duration::from_millis(20));
    machine.set_error(StatusCode::BadNodeIdUnknown);
    // The state never matched so the error is not raised
    assert_eq!(waiter.join().unwrap(), Err(StateError::Timeout));
    assert_eq!(machine.state(), Phase::Idle);

    // Reaching the state raises the error
    assert_eq!(
        machine.wait_for_state(&[Phase::Idle]),
        Err(StateError::Failed(StatusCode::BadNodeIdUnknown))
    );
    machine.clear_error();
    assert_eq!(machine.wait_for_state(&[Phase::Idle]), Ok(Phase::Idle));
}

#[test]
fn error_state_ends_wait() {
    let machine = Arc::new(Machine::new(Phase::Idle).with_error_state(Phase::Failed));
    let waiter = {
        let machine = machine.clone();
        thread::spawn(move || {
            machine.wait_for_state_timeout(&[Phase::Connected, Phase::Failed], Duration::from_secs(5))
        })
    };
    thread::sleep(Duration::from_millis(20));
    machine.set_error(StatusCode::BadNodeIdUnknown);
    assert_eq!(
        waiter.join().unwrap(),
        Err(StateError::Failed(StatusCode::BadNodeIdUnknown))
    );
    assert_eq!(machine.state(), Phase::Failed);
}

#[test]
fn display_error() {
    assert_eq!(StateError::<StatusCode>::Timeout.to_string(), "timeout");
    assert_eq!(
        StateError::Failed(StatusCode::BadTimeout).to_string(),
        "failed, BadTimeout"
    );
}
