use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Counters for one pipeline stage
pub struct StageMetrics {
    stage_id: String,
    runs: AtomicU64,
    errors_count: AtomicU64,
    total_latency_us: AtomicU64,
    latency_samples: AtomicU64,
    output_samples: AtomicU64,
}

impl StageMetrics {
    pub fn new(stage_id: impl Into<String>) -> Self {
        Self {
            stage_id: stage_id.into(),
            runs: AtomicU64::new(0),
            errors_count: AtomicU64::new(0),
            total_latency_us: AtomicU64::new(0),
            latency_samples: AtomicU64::new(0),
            output_samples: AtomicU64::new(0),
        }
    }

    pub fn stage_id(&self) -> &str {
        &self.stage_id
    }

    pub fn runs(&self) -> u64 {
        self.runs.load(Ordering::Relaxed)
    }

    pub fn errors_count(&self) -> u64 {
        self.errors_count.load(Ordering::Relaxed)
    }

    /// Total samples across all channels of the last frame the stage emitted
    pub fn output_samples(&self) -> u64 {
        self.output_samples.load(Ordering::Relaxed)
    }

    pub fn record_run(&self, output_samples: usize) {
        self.runs.fetch_add(1, Ordering::Relaxed);
        self.output_samples
            .store(output_samples as u64, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.errors_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn start_processing(&self) -> Instant {
        Instant::now()
    }

    pub fn finish_processing(&self, start: Instant) {
        let latency_us = start.elapsed().as_micros() as u64;
        self.total_latency_us.fetch_add(latency_us, Ordering::Relaxed);
        self.latency_samples.fetch_add(1, Ordering::Relaxed);
    }

    pub fn avg_latency_us(&self) -> u64 {
        let samples = self.latency_samples.load(Ordering::Relaxed);
        if samples == 0 {
            return 0;
        }
        self.total_latency_us.load(Ordering::Relaxed) / samples
    }
}
