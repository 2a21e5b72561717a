use rand::Rng;
use std::time::Instant;

/// Cycle Clock
///
/// Owns the timing of one light's phase cycle: a duration drawn uniformly at
/// random from an inclusive millisecond range, measured against a start instant.
/// A fresh duration is drawn on every restart, so no two cycles need to match.
#[derive(Debug)]
pub struct CycleClock {
    min_ms: u64,
    max_ms: u64,
    started: Instant,
    cycle_ms: u64,
}

impl CycleClock {
    /// Create a clock over `[min_ms, max_ms]` (inclusive) with an initial draw
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        assert!(min_ms <= max_ms, "Cycle range must be non-empty");
        let cycle_ms = Self::draw(min_ms, max_ms);
        Self {
            min_ms,
            max_ms,
            started: Instant::now(),
            cycle_ms,
        }
    }

    fn draw(min_ms: u64, max_ms: u64) -> u64 {
        rand::thread_rng().gen_range(min_ms..=max_ms)
    }

    /// Milliseconds elapsed since the current cycle started
    pub fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// The duration drawn for the current cycle
    pub fn cycle_ms(&self) -> u64 {
        self.cycle_ms
    }

    /// Has the current cycle run for its full drawn duration?
    pub fn expired(&self) -> bool {
        self.elapsed_ms() >= self.cycle_ms
    }

    /// Begin the next cycle: reset the start instant and draw a new duration
    pub fn restart(&mut self) {
        self.started = Instant::now();
        self.cycle_ms = Self::draw(self.min_ms, self.max_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn drawn_duration_stays_in_range() {
        for _ in 0..50 {
            let clock = CycleClock::new(40, 60);
            assert!((40..=60).contains(&clock.cycle_ms()));
        }
    }

    #[test]
    fn restart_resets_elapsed_and_redraws() {
        let mut clock = CycleClock::new(10, 20);
        thread::sleep(Duration::from_millis(30));
        assert!(clock.expired());

        clock.restart();
        assert!(!clock.expired());
        assert!((10..=20).contains(&clock.cycle_ms()));
    }

    #[test]
    fn expires_only_after_the_drawn_duration() {
        let clock = CycleClock::new(50, 50);
        assert!(!clock.expired());
        thread::sleep(Duration::from_millis(60));
        assert!(clock.expired());
    }
}
