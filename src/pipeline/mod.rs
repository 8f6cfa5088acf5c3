//! Pipeline entry points.
//!
//! - `Orchestrator`: the per-run state machine
//! - `run_analysis`: build the real collaborators and analyze one run

pub mod orchestrator;
pub mod run;

pub use orchestrator::Orchestrator;
pub use run::run_analysis;
