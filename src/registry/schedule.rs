//! Per-unit scheduled-task handles.
//!
//! The registry owns one optional handle per unit and guarantees
//! cancellation when the unit deactivates. No periodic-callback policy is
//! imposed here; hosts decide what, if anything, to schedule.

use tokio::task::JoinHandle;

/// Abort-on-cancel wrapper around a spawned task.
pub struct ScheduleHandle {
    task: JoinHandle<()>,
}

impl ScheduleHandle {
    /// Wrap a spawned task.
    pub fn new(task: JoinHandle<()>) -> Self {
        Self { task }
    }

    /// Cancel the task.
    pub fn cancel(&self) {
        self.task.abort();
    }

    /// Whether the task has finished (completed or cancelled).
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for ScheduleHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_cancel_aborts_task() {
        let handle = ScheduleHandle::new(tokio::spawn(std::future::pending::<()>()));
        assert!(!handle.is_finished());

        handle.cancel();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(handle.is_finished());
    }

    #[tokio::test]
    async fn test_drop_aborts_task() {
        let task = tokio::spawn(std::future::pending::<()>());
        let probe = task.abort_handle();
        drop(ScheduleHandle::new(task));

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(probe.is_finished());
    }
}
