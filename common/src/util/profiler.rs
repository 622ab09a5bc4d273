use std::time::{Duration, Instant};

/// Logs how long a routing stage ran when dropped.
pub struct StageTimer {
    stage: String,
    start: Instant,
}

impl StageTimer {
    pub fn new(stage: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for StageTimer {
    fn drop(&mut self) {
        log::info!(
            "{} finished in {:.1}ms",
            self.stage,
            self.start.elapsed().as_secs_f64() * 1e3
        );
    }
}
