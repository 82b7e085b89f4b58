use std::time::Instant;

use tracing::info;

/// Stopwatch for one pipeline stage. Without `perf_timing` it never reads the clock.
#[derive(Clone, Copy, Debug)]
pub struct StageTimer {
    started: Option<Instant>,
}

impl StageTimer {
    #[inline]
    pub fn start() -> Self {
        #[cfg(feature = "perf_timing")]
        {
            Self {
                started: Some(Instant::now()),
            }
        }
        #[cfg(not(feature = "perf_timing"))]
        {
            Self { started: None }
        }
    }

    #[inline]
    pub fn elapsed_ms(&self) -> f64 {
        self.started
            .map(|t| t.elapsed().as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }

    /// Logs the elapsed time under `stage`.
    pub fn finish(self, stage: &'static str) {
        if self.started.is_some() {
            info!(stage, ms = self.elapsed_ms(), "stage finished");
        }
    }
}
