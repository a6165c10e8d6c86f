use std::time::Instant;

/// Monotonic millisecond stopwatch used to gate duration-based transitions.
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    started: Instant,
}

impl Timer {
    /// A timer that is already running.
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn start(&mut self) {
        self.started = Instant::now();
    }

    /// Whole milliseconds since the last `start()`.
    pub fn elapsed_time(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
