use std::time::{Duration, Instant};

mod bijection_map;
mod incubation_queue;
mod runtime;
mod state;

/// Polls the condition until it holds or the timeout expires. Returns the final result.
pub fn wait_for<F>(timeout: Duration, f: F) -> bool
where
    F: Fn() -> bool,
{
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if f() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    f()
}
