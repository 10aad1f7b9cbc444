//! Trailing-edge debouncing on top of tokio timers.
//!
//! A [`Debouncer`] collapses a burst of [`Debouncer::trigger`] calls into a
//! single invocation of its action, fired `delay` after the most recent
//! trigger. Pending invocations are discarded, never queued.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::trace;

pub type DebouncedAction = Arc<dyn Fn() + Send + Sync>;

pub struct Debouncer {
    action: DebouncedAction,
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(action: DebouncedAction, delay: Duration) -> Self {
        Self {
            action,
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancels any pending invocation and schedules a new one. A zero delay
    /// still fires from a spawned task, never inside this call.
    ///
    /// Must be called from within a tokio runtime.
    pub fn trigger(&mut self) {
        self.cancel_pending();

        let action = Arc::clone(&self.action);
        let delay = self.delay;
        let deadline = Instant::now() + delay;
        self.pending = Some(tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep_until(deadline).await;
            }
            action();
        }));
        trace!(delay_ms = delay.as_millis() as u64, "debounce armed");
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Cancels the pending invocation without firing it. Safe to call twice.
    pub fn teardown(&mut self) {
        if self.cancel_pending() {
            trace!("debounce cancelled");
        }
    }

    fn cancel_pending(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    fn matches(&self, action: &DebouncedAction, delay: Duration) -> bool {
        same_action(&self.action, action) && self.delay == delay
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Holds at most one debouncer, memoized on `(action, delay)`.
///
/// Asking for the same pair returns the same instance with its pending state
/// intact. A different pair tears the old instance down first, so timers armed
/// under the old configuration can never fire the new action.
#[derive(Default)]
pub struct DebounceCell {
    current: Option<Debouncer>,
}

impl DebounceCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, action: &DebouncedAction, delay: Duration) -> &mut Debouncer {
        if self
            .current
            .as_ref()
            .is_some_and(|d| !d.matches(action, delay))
        {
            // Drop tears it down.
            self.current = None;
        }
        self.current
            .get_or_insert_with(|| Debouncer::new(Arc::clone(action), delay))
    }

    pub fn is_pending(&self) -> bool {
        self.current.as_ref().is_some_and(Debouncer::is_pending)
    }

    pub fn teardown(&mut self) {
        if let Some(debouncer) = &mut self.current {
            debouncer.teardown();
        }
    }
}

// Data pointers only; vtable addresses are not stable across codegen units.
fn same_action(a: &DebouncedAction, b: &DebouncedAction) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a).cast::<()>(),
        Arc::as_ptr(b).cast::<()>(),
    )
}
