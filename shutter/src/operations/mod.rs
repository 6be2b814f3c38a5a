// File: shutter/src/operations/mod.rs

pub mod backup;
pub mod report;

pub use backup::{Orchestrator, RunState};
pub use report::RunReport;
