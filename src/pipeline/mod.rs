pub mod orchestrator;
pub mod state;
pub mod phase;
pub mod metrics;

pub use orchestrator::{PipelineOrchestrator, PipelineOutcome};
pub use state::{PhaseName, PipelineState, PipelineStatus, PipelineSummary};
