/// Most fixed steps one frame may run. A stalled frame drops the time beyond
/// this instead of stepping the simulation in a burst.
const MAX_CATCH_UP: u32 = 10;

/// Splits variable frame time into whole fixed steps, carrying the rest.
pub struct FixedTimestep {
    step: f32,
    carry: f32,
}

impl FixedTimestep {
    pub fn new(step: f32) -> Self {
        Self { step, carry: 0.0 }
    }

    /// Add one frame's time and return how many fixed steps are due.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        let budget = self.step * MAX_CATCH_UP as f32;
        self.carry = (self.carry + frame_dt).min(budget);
        let due = (self.carry / self.step).floor();
        self.carry -= due * self.step;
        due as u32
    }
}

/// Elapsed-time accumulator polled once per update tick.
///
/// `tick` returns `true` once every `period` seconds of accumulated time.
#[derive(Debug, Clone)]
pub struct Interval {
    period: f64,
    elapsed: f64,
}

impl Interval {
    pub fn new(period: f64) -> Self {
        Self {
            period,
            elapsed: 0.0,
        }
    }

    pub fn tick(&mut self, dt: f64) -> bool {
        self.elapsed += dt;
        if self.period <= 0.0 || self.elapsed < self.period {
            return false;
        }
        // One fire per tick even after a long stall.
        self.elapsed %= self.period;
        true
    }
}
