use crate::core::ProcessingStage;
use serde::{Deserialize, Serialize};

/// Schema for a configurable parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
    pub default: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// Factory function type for creating stage instances
pub type StageFactory = fn() -> Box<dyn ProcessingStage>;

/// Complete metadata for a stage type
#[derive(Clone, Serialize)]
pub struct StageMetadata {
    /// Lowercased struct name, used as the `type` in pipeline documents
    pub id: String,
    pub name: String,
    pub category: String,
    /// Frame channels the stage expects
    pub reads: Vec<String>,
    /// Frame channels the stage produces
    pub writes: Vec<String>,
    pub parameters: Vec<ParameterSchema>,
    #[serde(skip)]
    pub factory: StageFactory,
}

impl StageMetadata {
    /// Create a new instance of this stage type
    pub fn create_instance(&self) -> Box<dyn ProcessingStage> {
        (self.factory)()
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterSchema> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Whether `type_name` refers to this stage, by id or display name
    pub fn matches(&self, type_name: &str) -> bool {
        self.id.eq_ignore_ascii_case(type_name)
            || self.name.eq_ignore_ascii_case(type_name)
            || self.name.replace(' ', "").eq_ignore_ascii_case(type_name)
    }
}

impl std::fmt::Debug for StageMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageMetadata")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("category", &self.category)
            .field("reads", &self.reads)
            .field("writes", &self.writes)
            .finish()
    }
}

/// Inventory submission emitted by `#[derive(PipelineStage)]`
pub struct StageMetadataFactory(pub fn() -> StageMetadata);

inventory::collect!(StageMetadataFactory);
