use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::{MismatchConfig, SpectrumOptions};
use crate::core::{ProcessingStage, SignalFrame};
use crate::nodes::{ErrorProbe, Reconstructor, SpectrumAnalyzer, ToneGenerator};
use crate::observability::{MetricsCollector, PipelineMonitor, StageMetrics};
use crate::registry;

struct StageSlot {
    id: String,
    stage: Box<dyn ProcessingStage>,
    metrics: Arc<StageMetrics>,
}

/// A linear chain of stages run one after another on a single frame
pub struct Pipeline {
    stages: Vec<StageSlot>,
    collector: MetricsCollector,
    runs: u64,
}

impl Pipeline {
    /// Chain already configured stages in the given order
    pub fn new(stages: Vec<(String, Box<dyn ProcessingStage>)>) -> Result<Self> {
        if stages.is_empty() {
            bail!("Pipeline has no stages");
        }

        let mut seen = HashSet::new();
        let mut collector = MetricsCollector::new();
        let mut slots = Vec::with_capacity(stages.len());

        for (id, stage) in stages {
            if !seen.insert(id.clone()) {
                bail!("Duplicate stage id: {}", id);
            }
            let metrics = Arc::new(StageMetrics::new(&id));
            collector.register(metrics.clone());
            slots.push(StageSlot { id, stage, metrics });
        }

        Ok(Self {
            stages: slots,
            collector,
            runs: 0,
        })
    }

    /// The standard chain: generate, reconstruct, measure error, compare spectra
    pub fn mismatch_chain(config: &MismatchConfig, spectrum: &SpectrumOptions) -> Result<Self> {
        let generator: Box<dyn ProcessingStage> = Box::new(ToneGenerator::from_config(config)?);
        let reconstructor: Box<dyn ProcessingStage> = Box::new(Reconstructor::new(config.policy));
        let error_probe: Box<dyn ProcessingStage> = Box::new(ErrorProbe);
        let analyzer: Box<dyn ProcessingStage> = Box::new(SpectrumAnalyzer::new(spectrum));

        let stages = vec![
            ("generator".to_string(), generator),
            ("reconstructor".to_string(), reconstructor),
            ("error_probe".to_string(), error_probe),
            ("spectrum".to_string(), analyzer),
        ];
        Self::new(stages)
    }

    /// Build a chain from `{"nodes": [...], "connections": [...]}`.
    ///
    /// Node `type`s are resolved through the stage registry. The connections
    /// must form a single path that visits every node.
    pub fn from_json(config: Value) -> Result<Self> {
        let nodes_array = config["nodes"]
            .as_array()
            .ok_or(anyhow!("Pipeline config missing nodes array"))?;

        let mut nodes: HashMap<String, Box<dyn ProcessingStage>> = HashMap::new();
        let mut declared = Vec::new();

        for node_config in nodes_array {
            let id = node_config["id"]
                .as_str()
                .ok_or(anyhow!("Node missing id"))?
                .to_string();
            let stage_type = node_config["type"]
                .as_str()
                .ok_or_else(|| anyhow!("Node {} missing type", id))?;

            let metadata = registry::find_stage(stage_type)
                .ok_or_else(|| anyhow!("Unknown stage type: {}", stage_type))?;

            let mut stage = metadata.create_instance();
            stage
                .on_create(node_config["config"].clone())
                .with_context(|| format!("Failed to configure stage '{}' ({})", id, metadata.id))?;

            debug!(stage = %id, kind = %metadata.id, "stage created");
            if nodes.insert(id.clone(), stage).is_some() {
                bail!("Duplicate stage id: {}", id);
            }
            declared.push(id);
        }

        let mut connections = Vec::new();
        if let Some(conns_array) = config["connections"].as_array() {
            for conn in conns_array {
                let from = conn["from"]
                    .as_str()
                    .ok_or(anyhow!("Connection missing from"))?
                    .to_string();
                let to = conn["to"]
                    .as_str()
                    .ok_or(anyhow!("Connection missing to"))?
                    .to_string();
                for endpoint in [&from, &to] {
                    if !nodes.contains_key(endpoint) {
                        bail!("Connection references unknown stage: {}", endpoint);
                    }
                }
                connections.push((from, to));
            }
        }

        let order = execution_order(&declared, &connections)?;
        let stages = order
            .into_iter()
            .map(|id| {
                let stage = nodes
                    .remove(&id)
                    .ok_or_else(|| anyhow!("Stage {} listed twice in chain", id))?;
                Ok((id, stage))
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(stages)
    }

    /// Run every stage once on a fresh frame and return the final frame.
    /// The first failing stage aborts the run.
    pub fn execute_once(&mut self) -> Result<SignalFrame> {
        let mut frame = SignalFrame::new(self.runs);

        for slot in &mut self.stages {
            let start = slot.metrics.start_processing();
            match slot.stage.process(frame) {
                Ok(output) => {
                    slot.metrics.finish_processing(start);
                    slot.metrics.record_run(output.total_samples());
                    frame = output;
                }
                Err(e) => {
                    slot.metrics.record_error();
                    return Err(e.context(format!("Stage '{}' failed", slot.id)));
                }
            }
        }

        self.runs += 1;
        info!(run = frame.sequence_id, stages = self.stages.len(), "pipeline run complete");
        debug!("\n{}", self.monitor().generate_report());
        Ok(frame)
    }

    pub fn stage_ids(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn monitor(&self) -> PipelineMonitor {
        PipelineMonitor::new(self.collector.clone())
    }
}

/// Walk the connections from the single source to produce a linear order.
fn execution_order(declared: &[String], connections: &[(String, String)]) -> Result<Vec<String>> {
    if declared.len() == 1 && connections.is_empty() {
        return Ok(declared.to_vec());
    }

    let mut next: HashMap<&str, &str> = HashMap::new();
    let mut has_incoming: HashSet<&str> = HashSet::new();
    for (from, to) in connections {
        if next.insert(from.as_str(), to.as_str()).is_some() {
            bail!("Stage {} has more than one outgoing connection", from);
        }
        if !has_incoming.insert(to.as_str()) {
            bail!("Stage {} has more than one incoming connection", to);
        }
    }

    let sources: Vec<&String> = declared
        .iter()
        .filter(|id| !has_incoming.contains(id.as_str()))
        .collect();
    let source = match sources.as_slice() {
        [source] => source.as_str(),
        [] => bail!("Pipeline has no source stage (cycle in connections)"),
        many => bail!(
            "Pipeline must have exactly one source stage, found {}",
            many.len()
        ),
    };

    let mut order = vec![source.to_string()];
    let mut visited: HashSet<&str> = HashSet::from([source]);
    let mut current = source;
    while let Some(&to) = next.get(current) {
        if !visited.insert(to) {
            bail!("Connections form a cycle at stage {}", to);
        }
        order.push(to.to_string());
        current = to;
    }

    if order.len() != declared.len() {
        let missing: Vec<&str> = declared
            .iter()
            .map(String::as_str)
            .filter(|id| !visited.contains(id))
            .collect();
        bail!("Stages not connected to the chain: {}", missing.join(", "));
    }

    Ok(order)
}
