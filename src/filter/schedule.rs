//! Deferred steps with a fixed delay.
//!
//! Steps are never cancelled: once scheduled they all run, in due order.
//! Time comes from `tokio::time::Instant` so tests can pause and advance it.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug)]
struct Scheduled<T> {
    due: Instant,
    step: T,
}

/// FIFO queue of steps ordered by due time.
#[derive(Debug)]
pub struct Scheduler<T> {
    queue: VecDeque<Scheduled<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `step` to run `delay` from now.
    pub fn schedule(&mut self, delay: Duration, step: T) {
        self.schedule_at(Instant::now() + delay, step);
    }

    /// Queue `step` at an absolute time. Steps with equal due times keep
    /// their insertion order.
    pub fn schedule_at(&mut self, due: Instant, step: T) {
        let pos = self
            .queue
            .iter()
            .position(|s| s.due > due)
            .unwrap_or(self.queue.len());
        self.queue.insert(pos, Scheduled { due, step });
    }

    /// Pop the earliest step if it is due at or before `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<T> {
        if self.queue.front().is_some_and(|s| s.due <= now) {
            self.queue.pop_front().map(|s| s.step)
        } else {
            None
        }
    }

    /// Pop the earliest step regardless of its due time.
    pub fn pop_next(&mut self) -> Option<T> {
        self.queue.pop_front().map(|s| s.step)
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.queue.front().map(|s| s.due)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pop_due_respects_time() {
        tokio::time::pause();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(Duration::from_millis(300), "filter");

        assert_eq!(scheduler.pop_due(Instant::now()), None);

        tokio::time::advance(Duration::from_millis(299)).await;
        assert_eq!(scheduler.pop_due(Instant::now()), None);

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(scheduler.pop_due(Instant::now()), Some("filter"));
        assert!(scheduler.is_empty());
    }

    #[tokio::test]
    async fn test_steps_run_in_schedule_order() {
        tokio::time::pause();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(Duration::from_millis(300), 1);
        tokio::time::advance(Duration::from_millis(100)).await;
        scheduler.schedule(Duration::from_millis(300), 2);

        tokio::time::advance(Duration::from_secs(1)).await;
        let now = Instant::now();
        assert_eq!(scheduler.pop_due(now), Some(1));
        assert_eq!(scheduler.pop_due(now), Some(2));
        assert_eq!(scheduler.pop_due(now), None);
    }

    #[test]
    fn test_equal_due_keeps_insertion_order() {
        let mut scheduler = Scheduler::new();
        let at = Instant::now();
        scheduler.schedule_at(at, 'a');
        scheduler.schedule_at(at, 'b');
        scheduler.schedule_at(at, 'c');
        assert_eq!(scheduler.pop_next(), Some('a'));
        assert_eq!(scheduler.pop_next(), Some('b'));
        assert_eq!(scheduler.pop_next(), Some('c'));
        assert_eq!(scheduler.pop_next(), None);
    }

    #[test]
    fn test_next_due_is_earliest() {
        let mut scheduler = Scheduler::new();
        let now = Instant::now();
        scheduler.schedule_at(now + Duration::from_secs(5), 1);
        scheduler.schedule_at(now + Duration::from_secs(1), 2);
        assert_eq!(scheduler.next_due(), Some(now + Duration::from_secs(1)));
        assert_eq!(scheduler.len(), 2);
    }
}
