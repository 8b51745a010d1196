//! Named recurring tasks and one-shot timers on a virtual clock.
//!
//! Replaces the browser's implicit animation-frame and `setTimeout`
//! plumbing with something that can be started, stopped and advanced by
//! hand. The scheduler never runs work itself: callers ask which jobs are
//! due and dispatch them.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy)]
struct Task {
    /// 0 = every tick.
    interval_ms: f64,
    next_due_ms: f64,
}

/// Owner of all recurring tasks and pending timers for one map instance.
#[derive(Debug)]
pub struct Scheduler<K> {
    tasks: BTreeMap<K, Task>,
    timers: BTreeMap<K, f64>,
}

impl<K: Copy + Ord> Scheduler<K> {
    pub fn new() -> Self {
        Self {
            tasks: BTreeMap::new(),
            timers: BTreeMap::new(),
        }
    }

    /// Start a recurring task. An interval of 0 makes it due on every tick.
    /// Starting a task that is already running keeps its current schedule.
    pub fn start(&mut self, kind: K, interval_ms: f64, now_ms: f64) {
        self.tasks.entry(kind).or_insert(Task {
            interval_ms: interval_ms.max(0.0),
            next_due_ms: now_ms + interval_ms.max(0.0),
        });
    }

    /// Stop a recurring task. Returns true if it was running.
    pub fn stop(&mut self, kind: K) -> bool {
        self.tasks.remove(&kind).is_some()
    }

    pub fn is_running(&self, kind: K) -> bool {
        self.tasks.contains_key(&kind)
    }

    /// Tasks due at `now_ms`, in key order. Each due task is rescheduled.
    /// A task that fell several intervals behind fires once, not once per
    /// missed interval.
    pub fn due(&mut self, now_ms: f64) -> Vec<K> {
        let mut due = Vec::new();
        for (&kind, task) in self.tasks.iter_mut() {
            if now_ms < task.next_due_ms {
                continue;
            }
            due.push(kind);
            task.next_due_ms = if task.interval_ms <= 0.0 {
                now_ms
            } else {
                let next = task.next_due_ms + task.interval_ms;
                if next <= now_ms {
                    now_ms + task.interval_ms
                } else {
                    next
                }
            };
        }
        due
    }

    /// Arm a one-shot timer `delay_ms` from now. Re-arming an armed timer
    /// restarts it instead of queueing a second one.
    /// Returns true if the timer was already armed.
    pub fn arm(&mut self, kind: K, delay_ms: f64, now_ms: f64) -> bool {
        self.timers.insert(kind, now_ms + delay_ms.max(0.0)).is_some()
    }

    pub fn disarm(&mut self, kind: K) -> bool {
        self.timers.remove(&kind).is_some()
    }

    pub fn is_armed(&self, kind: K) -> bool {
        self.timers.contains_key(&kind)
    }

    /// Remove and return every timer whose deadline has passed.
    pub fn fired(&mut self, now_ms: f64) -> Vec<K> {
        let fired: Vec<K> = self
            .timers
            .iter()
            .filter(|(_, deadline)| **deadline <= now_ms)
            .map(|(&k, _)| k)
            .collect();
        for k in &fired {
            self.timers.remove(k);
        }
        fired
    }

    /// Teardown: drop every task and timer.
    pub fn cancel_all(&mut self) {
        self.tasks.clear();
        self.timers.clear();
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn timer_count(&self) -> usize {
        self.timers.len()
    }
}

impl<K: Copy + Ord> Default for Scheduler<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    enum Job {
        Frame,
        Slow,
        Flash,
    }

    #[test]
    fn every_tick_task_is_always_due() {
        let mut s = Scheduler::new();
        s.start(Job::Frame, 0.0, 0.0);
        for t in 0..5 {
            assert_eq!(s.due(t as f64 * 16.0), vec![Job::Frame]);
        }
    }

    #[test]
    fn interval_task_waits_for_its_period() {
        let mut s = Scheduler::new();
        s.start(Job::Slow, 500.0, 0.0);
        assert!(s.due(100.0).is_empty());
        assert_eq!(s.due(500.0), vec![Job::Slow]);
        assert!(s.due(900.0).is_empty());
        assert_eq!(s.due(1000.0), vec![Job::Slow]);
    }

    #[test]
    fn late_task_fires_once() {
        let mut s = Scheduler::new();
        s.start(Job::Slow, 100.0, 0.0);
        assert_eq!(s.due(1000.0), vec![Job::Slow]);
        assert!(s.due(1050.0).is_empty());
        assert_eq!(s.due(1100.0), vec![Job::Slow]);
    }

    #[test]
    fn stopped_task_never_fires() {
        let mut s = Scheduler::new();
        s.start(Job::Frame, 0.0, 0.0);
        assert!(s.stop(Job::Frame));
        assert!(!s.stop(Job::Frame));
        assert!(s.due(10.0).is_empty());
    }

    #[test]
    fn rearming_restarts_timer() {
        let mut s = Scheduler::new();
        assert!(!s.arm(Job::Flash, 200.0, 0.0));
        assert!(s.arm(Job::Flash, 200.0, 150.0));
        assert!(s.fired(200.0).is_empty());
        assert_eq!(s.fired(350.0), vec![Job::Flash]);
        assert!(!s.is_armed(Job::Flash));
    }

    #[test]
    fn cancel_all_clears_everything() {
        let mut s = Scheduler::new();
        s.start(Job::Frame, 0.0, 0.0);
        s.start(Job::Slow, 100.0, 0.0);
        s.arm(Job::Flash, 10.0, 0.0);
        s.cancel_all();
        assert_eq!(s.task_count(), 0);
        assert_eq!(s.timer_count(), 0);
        assert!(s.due(1e6).is_empty());
        assert!(s.fired(1e6).is_empty());
    }
}
