pub mod error;
pub mod frame;
pub mod params;
pub mod stage;

pub use error::PreconditionError;
pub use frame::{channels, SignalFrame};
pub use stage::ProcessingStage;
