use super::MetricsCollector;

pub struct PipelineMonitor {
    collector: MetricsCollector,
}

impl PipelineMonitor {
    pub fn new(collector: MetricsCollector) -> Self {
        Self { collector }
    }

    pub fn generate_report(&self) -> String {
        let snapshot = self.collector.snapshot();

        if snapshot.is_empty() {
            return "No stages registered".to_string();
        }

        let mut report = String::from("=== Pipeline Metrics ===\n");

        for metrics in &snapshot {
            report.push_str(&format!(
                "\n[{}]\n  Runs: {}\n  Errors: {}\n  Avg Latency: {}μs\n  Output Samples: {}\n",
                metrics.stage_id,
                metrics.runs,
                match metrics.errors_count {
                    0 => "0 errors".to_string(),
                    1 => "1 error".to_string(),
                    n => format!("{} errors", n),
                },
                metrics.avg_latency_us,
                metrics.output_samples,
            ));
        }

        report
    }

    pub fn collector(&self) -> &MetricsCollector {
        &self.collector
    }
}
