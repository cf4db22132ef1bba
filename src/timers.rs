/// Virtual-clock timer registry.
///
/// Each timer is keyed by its purpose, so there is at most one pending timer
/// of any kind. Scheduling a kind that is already pending replaces it.
/// Time only moves when the owner calls `pop_due` / `settle`, which makes
/// every timed effect testable without real waiting.

use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimerKind {
    RapidFireExpiry,
    BossGunExpiry,
    ShotCooldown,
    BossEntry,
    BossAttack,
    ObstacleSpawn,
    PowerUpSpawn,
}

#[derive(Clone, Debug, PartialEq)]
struct Timer {
    due: u64,
    /// `Some` for repeating timers.
    period: Option<u64>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimerRegistry {
    now: u64,
    timers: BTreeMap<TimerKind, Timer>,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Fire once, `delay` ms from now.
    pub fn schedule_once(&mut self, kind: TimerKind, delay: u64) {
        let due = self.now + delay;
        if self.timers.insert(kind, Timer { due, period: None }).is_some() {
            log::trace!("timer {kind:?} replaced");
        }
    }

    /// Fire every `period` ms, first firing one period from now.
    pub fn schedule_every(&mut self, kind: TimerKind, period: u64) {
        let period = period.max(1);
        let due = self.now + period;
        if self
            .timers
            .insert(kind, Timer { due, period: Some(period) })
            .is_some()
        {
            log::trace!("timer {kind:?} replaced");
        }
    }

    pub fn cancel(&mut self, kind: TimerKind) {
        self.timers.remove(&kind);
    }

    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.timers.contains_key(&kind)
    }

    /// Milliseconds until `kind` next fires, if pending.
    pub fn remaining(&self, kind: TimerKind) -> Option<u64> {
        self.timers.get(&kind).map(|t| t.due.saturating_sub(self.now))
    }

    /// Period of a repeating timer.
    pub fn period(&self, kind: TimerKind) -> Option<u64> {
        self.timers.get(&kind).and_then(|t| t.period)
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to
    /// its due time. Repeating timers are re-armed; one-shots are removed.
    ///
    /// Call in a loop and dispatch each kind before popping the next, so a
    /// callback that cancels another timer prevents it from firing.
    pub fn pop_due(&mut self, until: u64) -> Option<TimerKind> {
        let (kind, due) = self
            .timers
            .iter()
            .filter(|(_, t)| t.due <= until)
            .min_by_key(|(kind, t)| (t.due, **kind))
            .map(|(kind, t)| (*kind, t.due))?;

        self.now = self.now.max(due);
        match self.timers.get(&kind).and_then(|t| t.period) {
            Some(period) => {
                if let Some(timer) = self.timers.get_mut(&kind) {
                    timer.due += period;
                }
            }
            None => {
                self.timers.remove(&kind);
            }
        }
        Some(kind)
    }

    /// Move the clock forward to `until` once every due timer has been popped.
    pub fn settle(&mut self, until: u64) {
        self.now = self.now.max(until);
    }
}
