//! Planner/executor/verifier orchestration pipeline: a per-task state
//! machine with step-level retry, plus a concurrency gate bounding how
//! many pipelines run at once.

pub mod concurrency;
pub mod phase;
pub mod pipeline;
pub mod step;
pub mod verifier;

pub use concurrency::ConcurrencyGate;
pub use phase::PipelinePhase;
pub use pipeline::{should_bypass, Executor, Pipeline, PipelineEvent, PipelineObserver, Planner, TaskRecord};
pub use step::{StepRecord, StepStatus};
pub use verifier::{VerifyOutcome, Verifier};
