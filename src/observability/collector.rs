use super::StageMetrics;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSnapshot {
    pub stage_id: String,
    pub runs: u64,
    pub errors_count: u64,
    pub avg_latency_us: u64,
    pub output_samples: u64,
}

/// Holds the metrics of every stage in chain order
#[derive(Clone, Default)]
pub struct MetricsCollector {
    metrics: Vec<Arc<StageMetrics>>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, metrics: Arc<StageMetrics>) {
        self.metrics.push(metrics);
    }

    pub fn snapshot(&self) -> Vec<MetricsSnapshot> {
        self.metrics
            .iter()
            .map(|metrics| MetricsSnapshot {
                stage_id: metrics.stage_id().to_string(),
                runs: metrics.runs(),
                errors_count: metrics.errors_count(),
                avg_latency_us: metrics.avg_latency_us(),
                output_samples: metrics.output_samples(),
            })
            .collect()
    }

    pub fn get_stage_metrics(&self, stage_id: &str) -> Option<Arc<StageMetrics>> {
        self.metrics
            .iter()
            .find(|m| m.stage_id() == stage_id)
            .cloned()
    }
}
