/// Deterministic delayed-task queue. The page never sleeps; the web layer
/// arms a timer for each delay handed out by `take_wakeups` and calls
/// `drain_due` once per timer that fires.
#[derive(Debug)]
pub struct Scheduler<T> {
    tasks: Vec<Scheduled<T>>,
    wakeups: Vec<f64>,
    /// Absolute times of wakeups handed out whose timer has not fired yet.
    armed: Vec<f64>,
    next_seq: u64,
}

#[derive(Debug)]
struct Scheduled<T> {
    due_ms: f64,
    seq: u64,
    task: T,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            wakeups: Vec::new(),
            armed: Vec::new(),
            next_seq: 0,
        }
    }

    pub fn schedule(&mut self, now_ms: f64, delay_ms: f64, task: T) {
        let delay_ms = delay_ms.max(0.0);
        self.tasks.push(Scheduled {
            due_ms: now_ms + delay_ms,
            seq: self.next_seq,
            task,
        });
        self.next_seq += 1;
        self.arm(now_ms + delay_ms, delay_ms);
    }

    fn arm(&mut self, due_ms: f64, delay_ms: f64) {
        self.wakeups.push(delay_ms);
        let at = self.armed.partition_point(|armed| *armed <= due_ms);
        self.armed.insert(at, due_ms);
    }

    /// Removes and returns every task due at or before `now_ms`, ordered by
    /// due time and then by the order they were scheduled in. Each call
    /// consumes the earliest armed wakeup, since timers fire in due order.
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<T> {
        if !self.armed.is_empty() {
            self.armed.remove(0);
        }
        let mut due = Vec::new();
        let mut pending = Vec::with_capacity(self.tasks.len());
        for scheduled in self.tasks.drain(..) {
            if scheduled.due_ms <= now_ms {
                due.push(scheduled);
            } else {
                pending.push(scheduled);
            }
        }
        self.tasks = pending;
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|scheduled| scheduled.task).collect()
    }

    /// Delays (ms from scheduling time) registered since the last call.
    pub fn take_wakeups(&mut self) -> Vec<f64> {
        std::mem::take(&mut self.wakeups)
    }

    /// Arms one more wakeup when tasks are pending but no timer is left to
    /// run them, which happens when a timer fires before its due time.
    pub fn rearm(&mut self, now_ms: f64) {
        if !self.armed.is_empty() {
            return;
        }
        if let Some(due_ms) = self.next_due() {
            self.arm(due_ms, (due_ms - now_ms).max(0.0));
        }
    }

    pub fn next_due(&self) -> Option<f64> {
        self.tasks.iter().map(|s| s.due_ms).min_by(|a, b| a.total_cmp(b))
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_only_due_tasks_in_time_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(0.0, 300.0, "c");
        scheduler.schedule(0.0, 100.0, "a");
        scheduler.schedule(0.0, 200.0, "b");
        scheduler.schedule(0.0, 900.0, "late");

        assert!(scheduler.drain_due(50.0).is_empty());
        assert_eq!(scheduler.drain_due(300.0), vec!["a", "b", "c"]);
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.next_due(), Some(900.0));
        assert_eq!(scheduler.drain_due(1000.0), vec!["late"]);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn equal_due_times_keep_scheduling_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(10.0, 0.0, 1);
        scheduler.schedule(0.0, 10.0, 2);
        scheduler.schedule(5.0, 5.0, 3);
        assert_eq!(scheduler.drain_due(10.0), vec![1, 2, 3]);
    }

    #[test]
    fn wakeups_are_handed_out_once() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(0.0, 800.0, ());
        scheduler.schedule(0.0, -5.0, ());
        assert_eq!(scheduler.take_wakeups(), vec![800.0, 0.0]);
        assert!(scheduler.take_wakeups().is_empty());
    }

    #[test]
    fn early_fire_rearms_for_the_remaining_delay() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(0.0, 800.0, "settle");
        scheduler.take_wakeups();

        assert!(scheduler.drain_due(799.5).is_empty());
        scheduler.rearm(799.5);
        assert_eq!(scheduler.take_wakeups(), vec![0.5]);
        assert_eq!(scheduler.drain_due(800.0), vec!["settle"]);
    }

    #[test]
    fn no_rearm_while_a_timer_is_still_armed() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(0.0, 100.0, "a");
        scheduler.schedule(0.0, 200.0, "b");
        scheduler.take_wakeups();

        assert_eq!(scheduler.drain_due(100.0), vec!["a"]);
        scheduler.rearm(100.0);
        assert!(scheduler.take_wakeups().is_empty());

        assert_eq!(scheduler.drain_due(200.0), vec!["b"]);
        scheduler.rearm(200.0);
        assert!(scheduler.take_wakeups().is_empty());
    }
}
