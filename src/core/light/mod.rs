pub use crate::core::{
    clock::CycleClock,
    log::{LogEntry, Logger, SafeLogger},
    queue::{BlockingQueue, SafeQueue},
};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Randomized cycle duration range, inclusive milliseconds
pub const CYCLE_MIN_MS: u64 = 4000;
pub const CYCLE_MAX_MS: u64 = 6000;

/// How long the cycling thread sleeps between expiry checks
const POLL_QUANTUM: Duration = Duration::from_millis(1);

/// The discrete state of a light
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Red,
    Green,
}

impl Phase {
    /// The other phase
    pub fn toggled(self) -> Phase {
        match self {
            Phase::Red => Phase::Green,
            Phase::Green => Phase::Red,
        }
    }
}

/// One traffic light: the authoritative current phase plus the notification
/// queue its cycling thread feeds.
///
/// `simulate` starts the cycling thread; the light stops and joins it on
/// `stop` or on drop, so the thread never outlives the light.
pub struct TrafficLight {
    light_id: String,
    phase: Arc<Mutex<Phase>>,
    queue: SafeQueue<Phase>,
    logger: SafeLogger,
    running: Arc<AtomicBool>,
    cycle_range: (u64, u64),
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl TrafficLight {
    /// Create a new light, initially Red, cycling every 4-6 seconds
    pub fn new(light_id: String) -> Self {
        Self::with_cycle_range(light_id, CYCLE_MIN_MS, CYCLE_MAX_MS)
    }

    pub(crate) fn with_cycle_range(light_id: String, min_ms: u64, max_ms: u64) -> Self {
        Self {
            phase: Arc::new(Mutex::new(Phase::Red)),
            queue: Arc::new(BlockingQueue::new()),
            logger: Arc::new(Mutex::new(Logger::new(light_id.clone()))),
            running: Arc::new(AtomicBool::new(false)),
            cycle_range: (min_ms, max_ms),
            worker: Mutex::new(None),
            light_id,
        }
    }

    /// Start the cycling thread and return immediately.
    /// Must be called at most once per light.
    pub fn simulate(&self) {
        let mut worker = self.worker.lock().unwrap();
        // --- Negative-space assertion: one cycling thread per light ---
        assert!(
            worker.is_none(),
            "simulate must be called at most once per light"
        );

        let phase = Arc::clone(&self.phase);
        let queue = Arc::clone(&self.queue);
        let logger = Arc::clone(&self.logger);
        let running = Arc::clone(&self.running);
        let (min_ms, max_ms) = self.cycle_range;

        running.store(true, Ordering::SeqCst);
        *worker = Some(thread::spawn(move || {
            cycle_through_phases(&phase, &queue, &logger, &running, min_ms, max_ms);
        }));
    }

    /// Read the authoritative phase without blocking.
    /// The value may be about to change; it is not ordered against queue delivery.
    pub fn current_phase(&self) -> Phase {
        *self.phase.lock().unwrap()
    }

    /// Block until a Green notification is dequeued.
    ///
    /// Consumes queued transition history in order, discarding Red values; it
    /// never consults the current phase, so a caller arriving after a Green
    /// notification was already consumed waits for the next one. Each
    /// notification is delivered to exactly one waiter.
    pub fn wait_for_green(&self) {
        loop {
            if self.queue.receive() == Phase::Green {
                return;
            }
        }
    }

    /// Stop the cycling thread and join it. Safe to call when never started.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.worker.lock().unwrap().take() {
            handle.join().unwrap();
        }
    }

    /// Transition notifications queued but not yet consumed by any waiter
    pub fn pending_notifications(&self) -> usize {
        self.queue.len()
    }

    /// Expose the transition history
    pub fn logs(&self) -> Vec<LogEntry> {
        let logger = self.logger.lock().unwrap();
        logger.entries.clone()
    }

    /// Get light ID
    pub fn light_id(&self) -> &str {
        &self.light_id
    }
}

impl Drop for TrafficLight {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The cycling loop, run on the light's worker thread until `running` clears.
///
/// Each iteration sleeps one poll quantum; once the drawn cycle duration has
/// elapsed it toggles the authoritative phase, then enqueues the new value.
/// The phase write always precedes the matching send, on this same thread, so
/// queue consumers never see a phase announced before it became true.
fn cycle_through_phases(
    phase: &Mutex<Phase>,
    queue: &BlockingQueue<Phase>,
    logger: &Mutex<Logger>,
    running: &AtomicBool,
    min_ms: u64,
    max_ms: u64,
) {
    let mut clock = CycleClock::new(min_ms, max_ms);
    let started = Instant::now();

    while running.load(Ordering::SeqCst) {
        thread::sleep(POLL_QUANTUM);
        if !clock.expired() {
            continue;
        }

        let new_phase = {
            let mut current = phase.lock().unwrap();
            *current = current.toggled();
            *current
        };
        queue.send(new_phase);

        let mut logger = logger.lock().unwrap();
        logger.log(
            new_phase,
            clock.cycle_ms(),
            started.elapsed().as_millis() as u64,
        );
        drop(logger);

        clock.restart();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_fresh_light_is_red() {
        let light = TrafficLight::new("L1".to_string());
        assert_eq!(light.current_phase(), Phase::Red);
        assert_eq!(light.pending_notifications(), 0);
        assert!(light.logs().is_empty());
    }

    #[test]
    fn phases_alternate_starting_with_green() {
        let light = TrafficLight::with_cycle_range("L1".to_string(), 20, 40);
        light.simulate();
        thread::sleep(Duration::from_millis(400));
        light.stop();

        let logs = light.logs();
        assert!(logs.len() >= 4, "expected several transitions, got {}", logs.len());
        assert_eq!(logs[0].phase, Phase::Green);
        for pair in logs.windows(2) {
            assert_ne!(pair[0].phase, pair[1].phase);
        }
    }

    #[test]
    fn wait_for_green_observes_only_green() {
        let light = TrafficLight::with_cycle_range("L1".to_string(), 20, 40);
        light.simulate();
        light.wait_for_green();
        light.stop();

        let logs = light.logs();
        assert!(logs.iter().any(|e| e.phase == Phase::Green));
    }

    #[test]
    fn two_waiters_each_consume_a_distinct_green() {
        let light = Arc::new(TrafficLight::with_cycle_range("L1".to_string(), 20, 40));
        light.simulate();

        let mut waiters = Vec::new();
        for _ in 0..2 {
            let light = Arc::clone(&light);
            waiters.push(thread::spawn(move || light.wait_for_green()));
        }
        for waiter in waiters {
            waiter.join().unwrap();
        }
        light.stop();

        // Two returns require two Green transitions; one notification is
        // never duplicated across waiters
        let greens = light
            .logs()
            .iter()
            .filter(|e| e.phase == Phase::Green)
            .count();
        assert!(greens >= 2);
    }

    #[test]
    fn stop_halts_toggling_and_joins_the_worker() {
        let light = TrafficLight::with_cycle_range("L1".to_string(), 20, 40);
        light.simulate();
        thread::sleep(Duration::from_millis(150));
        light.stop();

        let len_at_stop = light.logs().len();
        thread::sleep(Duration::from_millis(150));
        assert_eq!(light.logs().len(), len_at_stop);
    }

    #[test]
    fn stop_without_simulate_is_a_no_op() {
        let light = TrafficLight::new("L1".to_string());
        light.stop();
        assert_eq!(light.current_phase(), Phase::Red);
    }

    #[test]
    fn queued_history_is_kept_until_consumed() {
        let light = TrafficLight::with_cycle_range("L1".to_string(), 20, 40);
        light.simulate();
        thread::sleep(Duration::from_millis(300));
        light.stop();

        // Nobody consumed, so every logged transition is still queued
        assert_eq!(light.pending_notifications(), light.logs().len());
    }
}
