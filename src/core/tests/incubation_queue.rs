use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::core::incubation_queue::IncubationQueue;
use crate::types::StatusCode;

#[test]
fn hatched_in_incubation_order() {
    let queue = IncubationQueue::new();
    queue.incubate(1).unwrap();
    queue.incubate(2).unwrap();
    queue.incubate(3).unwrap();
    assert_eq!(queue.len(), 3);
    assert_eq!(queue.snapshot(), vec![1, 2, 3]);

    // 2 hatches first but 1 is still ahead of it
    assert!(queue.hatch(&2));
    assert!(!queue.next_is_hatched());
    assert_eq!(queue.remove_next_hatched_if_available(), None);
    assert_eq!(queue.get_next_hatched_if_available(), None);

    assert!(queue.hatch(&1));
    assert!(queue.next_is_hatched());
    assert_eq!(queue.get_next_hatched_if_available(), Some(1));
    assert_eq!(queue.remove_next_hatched_if_available(), Some(1));
    assert_eq!(queue.remove_next_hatched_if_available(), Some(2));
    assert_eq!(queue.remove_next_hatched_if_available(), None);
    assert!(queue.is_incubating(&3));
    assert_eq!(queue.len(), 1);
}

#[test]
fn incubate_twice() {
    let queue = IncubationQueue::new();
    queue.incubate("a").unwrap();
    assert_eq!(queue.incubate("a").unwrap_err(), StatusCode::BadInvalidArgument);
    assert_eq!(queue.len(), 1);
}

#[test]
fn hatch_states() {
    let queue = IncubationQueue::new();
    // Not in the queue
    assert!(!queue.hatch(&7));
    assert!(!queue.contains(&7));

    queue.incubate(7).unwrap();
    assert!(queue.contains(&7));
    assert!(queue.is_incubating(&7));
    assert!(!queue.is_hatched(&7));
    assert!(queue.hatch(&7));
    // Already hatched
    assert!(!queue.hatch(&7));
    assert!(queue.is_hatched(&7));
    assert!(!queue.is_incubating(&7));
}

#[test]
fn remove_next_hatched_timeout() {
    let queue = IncubationQueue::new();
    assert_eq!(
        queue
            .remove_next_hatched_timeout(Duration::from_millis(20))
            .unwrap_err(),
        StatusCode::BadTimeout
    );
    queue.incubate(1).unwrap();
    assert!(queue
        .remove_next_hatched_timeout(Duration::from_millis(20))
        .is_err());
    queue.hatch(&1);
    assert_eq!(
        queue.remove_next_hatched_timeout(Duration::from_millis(20)),
        Ok(1)
    );
    assert!(queue.is_empty());
}

#[test]
fn waiters_wake_on_hatch() {
    let queue = Arc::new(IncubationQueue::new());
    queue.incubate(1).unwrap();
    queue.incubate(2).unwrap();

    let consumer = {
        let queue = queue.clone();
        thread::spawn(move || {
            let first = queue.remove_next_hatched();
            let second = queue.remove_next_hatched();
            vec![first, second]
        })
    };

    // Hatch out of order, the consumer still sees incubation order
    thread::sleep(Duration::from_millis(20));
    queue.hatch(&2);
    thread::sleep(Duration::from_millis(20));
    queue.hatch(&1);

    assert_eq!(consumer.join().unwrap(), vec![1, 2]);
    assert!(queue.is_empty());
}

#[test]
fn get_next_waits_for_an_item() {
    let queue = Arc::new(IncubationQueue::new());
    let peeker = {
        let queue = queue.clone();
        thread::spawn(move || {
            let next = queue.get_next();
            let hatched = queue.get_next_hatched();
            (next, hatched)
        })
    };
    thread::sleep(Duration::from_millis(20));
    queue.incubate(9).unwrap();
    thread::sleep(Duration::from_millis(20));
    queue.hatch(&9);
    assert_eq!(peeker.join().unwrap(), (9, 9));
    // Peeking does not remove
    assert_eq!(queue.len(), 1);
}

#[test]
fn wait_until_incubated() {
    let queue = Arc::new(IncubationQueue::new());
    // Returns at once for an item that is not there
    queue.wait_until_incubated(&5);

    queue.incubate(5).unwrap();
    let waiter = {
        let queue = queue.clone();
        thread::spawn(move || {
            queue.wait_until_incubated(&5);
            queue.is_hatched(&5)
        })
    };
    thread::sleep(Duration::from_millis(20));
    queue.hatch(&5);
    assert!(waiter.join().unwrap());
}

#[test]
fn clear() {
    let queue = IncubationQueue::new();
    queue.incubate(1).unwrap();
    queue.incubate(2).unwrap();
    queue.hatch(&1);
    queue.clear();
    assert!(queue.is_empty());
    assert!(!queue.contains(&1));
    // Items can be incubated again after a clear
    queue.incubate(1).unwrap();
}
