pub mod charts;
pub mod report;
pub mod writer;
pub mod summary;

pub use report::{assemble_report, total_savings, RunContext};
pub use writer::{write_outputs, WrittenFiles};
