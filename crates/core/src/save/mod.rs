//! Explicit multi-step save pipelines

mod orchestrator;

pub use orchestrator::SaveOrchestrator;
