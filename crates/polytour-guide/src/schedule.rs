//! One-shot scheduled deferrals.
//!
//! The tour needs two kinds of bounded timers: a settle delay before a step
//! advance (letting the renderer finish its own update before the next popup
//! attaches), and a one-shot idle check. Both are fire-and-forget deferrals
//! whose callbacks must become no-ops if the run ends first, so every
//! scheduled task gets a cancellable [`TimerHandle`] tied to the run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// A deferred task accepted by a [`Scheduler`].
pub type ScheduledTask = Box<dyn FnOnce() + Send>;

/// Handle for a scheduled one-shot task.
///
/// Cancelling is advisory: a task that already ran is unaffected, and a
/// cancelled task is simply skipped when its timer fires.
#[derive(Debug, Clone)]
pub struct TimerHandle {
    cancelled: Arc<AtomicBool>,
}

impl TimerHandle {
    /// Create a fresh, uncancelled handle.
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Prevent the task from running if it has not fired yet.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether the task has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl Default for TimerHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Timer facility for one-shot deferrals.
///
/// Implementations must not run the task synchronously inside `schedule`;
/// callers may hold locks the task itself acquires.
pub trait Scheduler: Send + Sync {
    /// Run `task` after `delay`, unless the returned handle is cancelled first.
    fn schedule(&self, delay: Duration, task: ScheduledTask) -> TimerHandle;
}

/// Tokio-backed scheduler.
///
/// Spawns one task per deferral; must be used from within a tokio runtime.
/// Under a paused-clock test runtime the sleeps auto-advance, which keeps
/// the tour's 500 ms / 20 s timers deterministic in tests.
#[derive(Debug, Clone, Default)]
pub struct TokioScheduler;

impl TokioScheduler {
    /// Create a new tokio-backed scheduler.
    pub fn new() -> Self {
        Self
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: ScheduledTask) -> TimerHandle {
        let handle = TimerHandle::new();
        let guard = handle.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if !guard.is_cancelled() {
                task();
            }
        });
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test(start_paused = true)]
    async fn test_scheduled_task_fires() {
        let scheduler = TokioScheduler::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let fired_clone = fired.clone();

        let _handle = scheduler.schedule(
            Duration::from_millis(500),
            Box::new(move || {
                fired_clone.fetch_add(1, Ordering::SeqCst);
            }),
        );

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_task_is_skipped() {
        let scheduler = TokioScheduler::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let fired_clone = fired.clone();

        let handle = scheduler.schedule(
            Duration::from_millis(500),
            Box::new(move || {
                fired_clone.fetch_add(1, Ordering::SeqCst);
            }),
        );
        handle.cancel();

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
