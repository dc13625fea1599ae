//! Registry of the stage types available to pipeline documents.
//!
//! Stages register themselves through `#[derive(PipelineStage)]`; lookups go
//! through [`all_stages`] and [`find_stage`].

pub mod metadata;

pub use metadata::{ParameterSchema, StageFactory, StageMetadata, StageMetadataFactory};

/// Every registered stage, sorted by id
pub fn all_stages() -> Vec<StageMetadata> {
    crate::nodes::link_builtin_stages();

    let mut stages: Vec<StageMetadata> = inventory::iter::<StageMetadataFactory>
        .into_iter()
        .map(|wrapper| (wrapper.0)())
        .collect();
    stages.sort_by(|a, b| a.id.cmp(&b.id));
    stages
}

/// Look up a stage by registry id or display name (case-insensitive)
pub fn find_stage(type_name: &str) -> Option<StageMetadata> {
    all_stages().into_iter().find(|s| s.matches(type_name))
}
