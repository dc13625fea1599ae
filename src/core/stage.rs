use super::SignalFrame;
use anyhow::Result;
use serde_json::Value;

/// Base trait for every stage of the mismatch pipeline
pub trait ProcessingStage: Send {
    /// Called once when the stage is instantiated with its JSON config.
    /// Keys that are absent keep the stage's defaults.
    fn on_create(&mut self, config: Value) -> Result<()>;

    /// Transform one frame. Stages run strictly one after another.
    fn process(&mut self, input: SignalFrame) -> Result<SignalFrame>;
}
