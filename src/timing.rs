use crate::config::Span;

/// Named deadlines the hunter keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TimerKey {
    /// Hold still until this instant.
    Pause = 0,
    /// Do not engage the pointer before this instant.
    IgnorePointer = 1,
    /// Attention window is open until this instant...
    AttentionOpenUntil = 2,
    /// ...then closed until this one, when a new cycle starts.
    AttentionClosedUntil = 3,
}

impl TimerKey {
    pub const ALL: [TimerKey; 4] = [
        Self::Pause,
        Self::IgnorePointer,
        Self::AttentionOpenUntil,
        Self::AttentionClosedUntil,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Pause => "pause",
            Self::IgnorePointer => "ignore-pointer",
            Self::AttentionOpenUntil => "attention-open",
            Self::AttentionClosedUntil => "attention-closed",
        }
    }
}

/// Absolute deadlines (seconds on the simulation clock), indexed by key.
#[derive(Debug, Clone)]
pub struct Timers {
    deadlines: [f64; 4],
}

impl Timers {
    /// Every deadline starts in the past.
    pub fn new() -> Self {
        Self { deadlines: [0.0; 4] }
    }

    pub fn get(&self, key: TimerKey) -> f64 {
        self.deadlines[key as usize]
    }

    /// Set an absolute deadline.
    pub fn set(&mut self, key: TimerKey, at: f64) {
        self.deadlines[key as usize] = at;
    }

    /// Deadline `secs` after `now`. Negative durations are treated as zero.
    pub fn set_after(&mut self, key: TimerKey, now: f64, secs: f32) {
        self.set(key, now + secs.max(0.0) as f64);
    }

    /// Sample a duration from `span` and schedule it after `now`.
    pub fn schedule(&mut self, key: TimerKey, now: f64, span: Span, rng: &mut fastrand::Rng) {
        self.set_after(key, now, span.sample(rng));
    }

    /// True once `now` is strictly past the deadline.
    pub fn passed(&self, key: TimerKey, now: f64) -> bool {
        now > self.get(key)
    }

    /// True while the deadline still lies ahead.
    pub fn pending(&self, key: TimerKey, now: f64) -> bool {
        now < self.get(key)
    }

    /// Start a fresh open/closed attention cycle at `now`.
    pub fn reset_attention(
        &mut self,
        now: f64,
        open: Span,
        closed: Span,
        rng: &mut fastrand::Rng,
    ) {
        self.schedule(TimerKey::AttentionOpenUntil, now, open, rng);
        let open_until = self.get(TimerKey::AttentionOpenUntil);
        self.set(
            TimerKey::AttentionClosedUntil,
            open_until + closed.sample(rng).max(0.0) as f64,
        );
    }

    /// Whether the pointer may attract attention right now. Rolls over to a
    /// new cycle once the closed phase ends, and resamples any window whose
    /// bounds are out of order.
    pub fn attention_open(
        &mut self,
        now: f64,
        open: Span,
        closed: Span,
        rng: &mut fastrand::Rng,
    ) -> bool {
        let open_until = self.get(TimerKey::AttentionOpenUntil);
        let closed_until = self.get(TimerKey::AttentionClosedUntil);
        if now >= closed_until || open_until > closed_until {
            self.reset_attention(now, open, closed, rng);
        }
        now < self.get(TimerKey::AttentionOpenUntil)
    }
}

impl Default for Timers {
    fn default() -> Self {
        Self::new()
    }
}
