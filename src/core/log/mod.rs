use crate::core::light::Phase;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

static LOG_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Log entry recording one phase transition
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LogEntry {
    pub local_log_id: u64,
    pub light_id: String,
    pub phase: Phase,    // The phase the light switched *to*
    pub cycle_ms: u64,   // The randomized duration drawn for the finished cycle
    pub at_ms: u64,      // Elapsed milliseconds since the light started cycling
}

impl Display for LogEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LogEntry {{ local_log_id: {}, light_id: {}, phase: {:?}, cycle_ms: {}, at_ms: {} }}",
            self.local_log_id, self.light_id, self.phase, self.cycle_ms, self.at_ms,
        )
    }
}

#[derive(Clone, Debug)]
/// Logger storing all transitions of one light
pub struct Logger {
    pub(crate) entries: Vec<LogEntry>,
    light_id: String,
}

impl Logger {
    pub fn new(light_id: String) -> Self {
        Self {
            entries: Vec::new(),
            light_id,
        }
    }

    /// Log a phase transition
    pub fn log(&mut self, phase: Phase, cycle_ms: u64, at_ms: u64) {
        // --- Negative-space assertion: phases strictly alternate ---
        if let Some(last) = self.entries.last() {
            assert_ne!(
                last.phase, phase,
                "Consecutive transitions must not repeat a phase"
            );
        }

        let local_log_id = LOG_ID_COUNTER.fetch_add(1, Ordering::SeqCst);

        // --- Log entry insertion ---
        let before = self.entries.len();
        self.entries.push(LogEntry {
            local_log_id,
            light_id: self.light_id.clone(),
            phase,
            cycle_ms,
            at_ms,
        });

        // --- Negative-space assertion: log length increased exactly by 1 ---
        assert_eq!(
            self.entries.len(),
            before + 1,
            "Logger must increase by exactly one entry"
        );
    }

    /// Transitions recorded at or after the given elapsed time
    pub fn entries_since(&self, at_ms: u64) -> Vec<LogEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.at_ms >= at_ms)
            .cloned()
            .collect()
    }
}

/// Append a transition history to a file as NDJSON, one object per line
pub fn append_logs(log: &[LogEntry], path: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().append(true).create(true).open(path)?;

    for entry in log {
        let json = serde_json::to_string(entry).expect("Serialization failed");
        writeln!(file, "{}", json)?;
    }
    Ok(())
}

/// Thread-safe wrapper
pub type SafeLogger = Arc<Mutex<Logger>>;
