use std::time::{Duration, Instant};

/// Fixed-timestep accumulator driving auto-step.
#[derive(Debug, Clone)]
pub(crate) struct StepTimer {
    timestep: Duration,
    max_substeps: u32,
    accumulator: Duration,
    last_update: Option<Instant>,
}

impl StepTimer {
    pub fn new(timestep: Duration, max_substeps: u32) -> Self {
        StepTimer {
            timestep,
            max_substeps,
            accumulator: Duration::ZERO,
            last_update: None,
        }
    }

    pub fn start(&mut self, now: Instant) {
        self.accumulator = Duration::ZERO;
        self.last_update = Some(now);
    }

    pub fn stop(&mut self) {
        self.last_update = None;
    }

    pub fn is_running(&self) -> bool {
        self.last_update.is_some()
    }

    /// Accumulates the time since the previous call and returns the number of
    /// fixed substeps now due. Returns 0 while stopped.
    pub fn advance(&mut self, now: Instant) -> u32 {
        let Some(last) = self.last_update else {
            return 0;
        };
        self.accumulator += now.saturating_duration_since(last);
        self.last_update = Some(now);

        let mut substeps = 0;
        while self.accumulator >= self.timestep && substeps < self.max_substeps {
            self.accumulator -= self.timestep;
            substeps += 1;
        }
        if self.accumulator >= self.timestep {
            log::warn!(
                "Dropping {:?} of simulation time after {} substeps",
                self.accumulator,
                substeps
            );
            self.accumulator = Duration::ZERO;
        }
        substeps
    }
}
