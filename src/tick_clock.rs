/// Discrete tick clock
///
/// A counter advanced explicitly by its owner, one tick per call. It reports
/// the subdivision within the current cycle and the number of completed
/// cycles, for pacing display and playback against simulation progress.
///
/// The clock's cycle length is its own setting. It has no relation to the
/// engine's evaluation window and never drives the engine.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickClock {
    ticks: u64,
    subdivisions: u64,
}

/// Default number of ticks in one clock cycle
pub const SUBDIVISIONS_PER_CYCLE: u64 = 16;

impl TickClock {
    /// Clock with `subdivisions` ticks per cycle (0 is raised to 1)
    pub fn new(subdivisions: u64) -> Self {
        Self {
            ticks: 0,
            subdivisions: subdivisions.max(1),
        }
    }

    /// Advance by one tick, returning the new tick count
    pub fn advance(&mut self) -> u64 {
        self.ticks += 1;
        self.ticks
    }

    /// Ticks since creation or the last reset
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Position within the current cycle
    pub fn subdivision(&self) -> u64 {
        self.ticks % self.subdivisions
    }

    /// Completed cycles
    pub fn cycle(&self) -> u64 {
        self.ticks / self.subdivisions
    }

    pub fn subdivisions_per_cycle(&self) -> u64 {
        self.subdivisions
    }

    /// True when the last advance completed a cycle
    pub fn on_downbeat(&self) -> bool {
        self.ticks > 0 && self.subdivision() == 0
    }

    pub fn reset(&mut self) {
        self.ticks = 0;
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new(SUBDIVISIONS_PER_CYCLE)
    }
}
