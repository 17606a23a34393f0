//! Single-threaded deferred task queue.
//!
//! The engine runs on one logical thread. Work that would be asynchronous in
//! a browser (image decoding, simulated network latency) is modelled as a
//! closure scheduled on this queue and run later by the host loop, never
//! overlapping with other work.
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use std::time::Duration;
//! use kick_core::TaskQueue;
//!
//! let queue = TaskQueue::new();
//! let hits = Rc::new(Cell::new(0));
//!
//! let counter = hits.clone();
//! queue.defer(Duration::from_millis(250), move || counter.set(counter.get() + 1));
//!
//! assert_eq!(queue.run_due(Duration::from_millis(100)), 0);
//! assert_eq!(queue.run_due(Duration::from_millis(250)), 1);
//! assert_eq!(hits.get(), 1);
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::time::Duration;

use tracing::trace;

type Task = Box<dyn FnOnce()>;

struct Scheduled {
    due: Duration,
    seq: u64,
    task: Task,
}

/// Queue of closures keyed by the time they become due.
///
/// All methods take `&self` so the queue can be shared through an `Rc`
/// by providers and the host loop. Tasks run in due order; ties run in
/// scheduling order. A running task may schedule further tasks.
#[derive(Default)]
pub struct TaskQueue {
    tasks: RefCell<Vec<Scheduled>>,
    next_seq: Cell<u64>,
    now: Cell<Duration>,
}

impl TaskQueue {
    /// Create an empty queue at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `task` to run `delay` after the queue's current time.
    pub fn defer(&self, delay: Duration, task: impl FnOnce() + 'static) {
        let seq = self.next_seq.get();
        self.next_seq.set(seq + 1);
        let due = self.now.get() + delay;
        trace!("Deferred task {} due at {:?}", seq, due);
        self.tasks.borrow_mut().push(Scheduled {
            due,
            seq,
            task: Box::new(task),
        });
    }

    /// Schedule `task` to run on the next pump.
    pub fn post(&self, task: impl FnOnce() + 'static) {
        self.defer(Duration::ZERO, task);
    }

    /// Current queue time.
    pub fn now(&self) -> Duration {
        self.now.get()
    }

    /// Number of tasks not yet run.
    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// True when nothing is scheduled.
    pub fn is_idle(&self) -> bool {
        self.tasks.borrow().is_empty()
    }

    /// Move the queue time forward to `now` and run every task due by then.
    ///
    /// Returns the number of tasks run. Time never moves backwards.
    pub fn run_due(&self, now: Duration) -> usize {
        if now > self.now.get() {
            self.now.set(now);
        }
        let mut ran = 0;
        while let Some(task) = self.pop_next(Some(self.now.get())) {
            task();
            ran += 1;
        }
        ran
    }

    /// Run every task, jumping the queue time forward as needed.
    pub fn run_all(&self) -> usize {
        let mut ran = 0;
        while let Some(task) = self.pop_next(None) {
            task();
            ran += 1;
        }
        ran
    }

    // The borrow ends before the task runs so tasks can schedule more work.
    fn pop_next(&self, limit: Option<Duration>) -> Option<Task> {
        let mut tasks = self.tasks.borrow_mut();
        let index = tasks
            .iter()
            .enumerate()
            .filter(|(_, s)| limit.is_none_or(|limit| s.due <= limit))
            .min_by_key(|(_, s)| (s.due, s.seq))
            .map(|(i, _)| i)?;
        let scheduled = tasks.swap_remove(index);
        if scheduled.due > self.now.get() {
            self.now.set(scheduled.due);
        }
        Some(scheduled.task)
    }
}

impl fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskQueue")
            .field("pending", &self.pending())
            .field("now", &self.now.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_tasks_run_in_due_order() {
        let queue = TaskQueue::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for (delay, name) in [(30, "c"), (10, "a"), (20, "b")] {
            let log = log.clone();
            queue.defer(Duration::from_millis(delay), move || {
                log.borrow_mut().push(name)
            });
        }

        assert_eq!(queue.run_all(), 3);
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
        assert_eq!(queue.now(), Duration::from_millis(30));
    }

    #[test]
    fn test_ties_keep_scheduling_order() {
        let queue = TaskQueue::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for name in ["first", "second", "third"] {
            let log = log.clone();
            queue.post(move || log.borrow_mut().push(name));
        }

        queue.run_due(Duration::ZERO);
        assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_run_due_leaves_future_tasks() {
        let queue = TaskQueue::new();
        queue.defer(Duration::from_millis(250), || {});
        queue.post(|| {});

        assert_eq!(queue.run_due(Duration::from_millis(100)), 1);
        assert_eq!(queue.pending(), 1);
        assert_eq!(queue.run_due(Duration::from_millis(250)), 1);
        assert!(queue.is_idle());
    }

    #[test]
    fn test_task_can_schedule_more_work() {
        let queue = Rc::new(TaskQueue::new());
        let hits = Rc::new(Cell::new(0));

        let inner_queue = queue.clone();
        let inner_hits = hits.clone();
        queue.post(move || {
            inner_hits.set(inner_hits.get() + 1);
            let hits = inner_hits.clone();
            inner_queue.post(move || hits.set(hits.get() + 1));
        });

        assert_eq!(queue.run_due(Duration::ZERO), 2);
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_time_never_moves_backwards() {
        let queue = TaskQueue::new();
        queue.run_due(Duration::from_millis(50));
        queue.run_due(Duration::from_millis(10));
        assert_eq!(queue.now(), Duration::from_millis(50));
    }
}
