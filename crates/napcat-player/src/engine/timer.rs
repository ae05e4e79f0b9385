//! Virtual-clock timer scheduler
//!
//! One-shot (`after`) and repeating (`every`) timers over an arbitrary task
//! type. Time only moves when the owner advances it, so the engine drives it
//! with a fixed frame duration and tests drive it with whatever jumps they
//! need.
//!
//! Firing is pull-based: the owner calls `pop_due(deadline)` in a loop and
//! dispatches each task before asking for the next one. While a task is
//! being dispatched the clock reads that task's due time, so a timer
//! scheduled from inside a callback is relative to when the callback was
//! due, not to the end of the frame.

/// Handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Timer<T> {
    id: TimerId,
    due: u64,
    /// Tie-breaker: equal due times fire in scheduling order
    seq: u64,
    interval: Option<u64>,
    task: T,
}

#[derive(Debug)]
pub struct Scheduler<T> {
    now: u64,
    next_id: u64,
    next_seq: u64,
    timers: Vec<Timer<T>>,
}

impl<T: Clone> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: 0,
            next_id: 0,
            next_seq: 0,
            timers: Vec::new(),
        }
    }

    /// Current virtual time in ms
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Run `task` once, `delay_ms` from now. A zero delay fires on the next pull.
    pub fn after(&mut self, delay_ms: u64, task: T) -> TimerId {
        self.insert(delay_ms, None, task)
    }

    /// Run `task` every `interval_ms`, first firing one interval from now.
    pub fn every(&mut self, interval_ms: u64, task: T) -> TimerId {
        let interval = interval_ms.max(1);
        self.insert(interval, Some(interval), task)
    }

    fn insert(&mut self, delay_ms: u64, interval: Option<u64>, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let seq = self.bump_seq();
        self.timers.push(Timer {
            id,
            due: self.now + delay_ms,
            seq,
            interval,
            task,
        });
        id
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Cancel a timer. Returns false if it already fired or was cancelled;
    /// calling it again is harmless.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    #[cfg(test)]
    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    /// Number of scheduled timers
    #[cfg(test)]
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// The clock value `dt_ms` from now
    pub fn deadline(&self, dt_ms: u64) -> u64 {
        self.now + dt_ms
    }

    /// Take the earliest timer due at or before `deadline`, moving the clock
    /// to its due time. Repeating timers are re-armed one interval later.
    pub fn pop_due(&mut self, deadline: u64) -> Option<T> {
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= deadline)
            .min_by_key(|(_, t)| (t.due, t.seq))
            .map(|(i, _)| i)?;

        let due = self.timers[idx].due;
        self.now = self.now.max(due);

        match self.timers[idx].interval {
            Some(interval) => {
                let seq = self.bump_seq();
                let timer = &mut self.timers[idx];
                timer.due += interval;
                timer.seq = seq;
                Some(timer.task.clone())
            }
            None => Some(self.timers.remove(idx).task),
        }
    }

    /// Move the clock to `deadline` once everything due has been popped.
    pub fn settle(&mut self, deadline: u64) {
        self.now = self.now.max(deadline);
    }
}

impl<T: Clone> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Advance by `dt`, collecting (fire time, task) pairs
    fn run(s: &mut Scheduler<&'static str>, dt: u64) -> Vec<(u64, &'static str)> {
        let deadline = s.deadline(dt);
        let mut fired = Vec::new();
        while let Some(task) = s.pop_due(deadline) {
            fired.push((s.now(), task));
        }
        s.settle(deadline);
        fired
    }

    #[test]
    fn one_shots_fire_in_due_order() {
        let mut s = Scheduler::new();
        s.after(700, "c");
        s.after(0, "a");
        s.after(350, "b");
        assert_eq!(run(&mut s, 699), vec![(0, "a"), (350, "b")]);
        assert_eq!(run(&mut s, 1), vec![(700, "c")]);
        assert_eq!(s.pending(), 0);
        assert_eq!(s.now(), 700);
    }

    #[test]
    fn equal_due_fires_in_scheduling_order() {
        let mut s = Scheduler::new();
        s.after(10, "first");
        s.after(10, "second");
        s.after(10, "third");
        let fired: Vec<_> = run(&mut s, 10).into_iter().map(|(_, t)| t).collect();
        assert_eq!(fired, vec!["first", "second", "third"]);
    }

    #[test]
    fn nested_timer_is_relative_to_parent_due_time() {
        let mut s = Scheduler::new();
        s.after(700, "parent");
        let deadline = s.deadline(5000);
        let mut fired = Vec::new();
        while let Some(task) = s.pop_due(deadline) {
            fired.push((s.now(), task));
            if task == "parent" {
                s.after(300, "child");
            }
        }
        s.settle(deadline);
        assert_eq!(fired, vec![(700, "parent"), (1000, "child")]);
        assert_eq!(s.now(), 5000);
    }

    #[test]
    fn interval_fires_every_period_within_one_advance() {
        let mut s = Scheduler::new();
        s.every(750, "tick");
        let fired = run(&mut s, 3000);
        let times: Vec<u64> = fired.iter().map(|(t, _)| *t).collect();
        assert_eq!(times, vec![750, 1500, 2250, 3000]);
        assert_eq!(s.pending(), 1);
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut s = Scheduler::new();
        let id = s.every(100, "tick");
        assert!(s.is_active(id));
        assert!(s.cancel(id));
        assert!(!s.cancel(id));
        assert!(!s.is_active(id));
        assert!(run(&mut s, 1000).is_empty());
    }

    #[test]
    fn cancel_after_fire_is_noop() {
        let mut s = Scheduler::new();
        let id = s.after(5, "once");
        assert_eq!(run(&mut s, 5).len(), 1);
        assert!(!s.cancel(id));
    }

    #[test]
    fn zero_interval_is_clamped() {
        let mut s = Scheduler::new();
        s.every(0, "spin");
        assert_eq!(run(&mut s, 3).len(), 3);
    }
}
