//! The scan pipeline: snapshot assembly, cycle orchestration, and async
//! job tracking.

pub mod assemble;
pub mod orchestrator;
pub mod status;

pub use assemble::build_metrics;
pub use orchestrator::Scanner;
pub use status::{JobRegistry, JobState, JobTracker, ScanPhase};
