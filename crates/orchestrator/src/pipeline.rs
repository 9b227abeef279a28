use std::collections::HashMap;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use nc_domain::config::orchestrator::PipelineConfig;
use nc_domain::{Error, Result};
use nc_reliability::delay_for_attempt;
use parking_lot::RwLock;
use serde::Serialize;
use uuid::Uuid;

use crate::phase::PipelinePhase;
use crate::verifier::{VerifyOutcome, Verifier};

/// Current state of one task moving through the pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct TaskRecord {
    pub id: Uuid,
    pub phase: PipelinePhase,
    pub steps_total: usize,
    pub steps_completed: usize,
    pub current_step: usize,
    pub total_retries: u32,
    pub last_error: Option<String>,
}

impl TaskRecord {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            phase: PipelinePhase::Idle,
            steps_total: 0,
            steps_completed: 0,
            current_step: 0,
            total_retries: 0,
            last_error: None,
        }
    }
}

impl Default for TaskRecord {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineEvent {
    PhaseChanged { task_id: Uuid, phase: PipelinePhase },
    StepPassed { task_id: Uuid, step_index: usize },
    StepRetried { task_id: Uuid, step_index: usize, attempt: u32 },
    Failed { task_id: Uuid, message: String },
}

/// Fire-and-forget observer for pipeline events.
pub trait PipelineObserver: Send + Sync {
    fn on_event(&self, event: &PipelineEvent);
}

/// Produces a plan — the number of steps a task decomposes into.
pub trait Planner: Send + Sync {
    fn plan(&self, task_id: Uuid) -> usize;
}

/// Executes one step, returning its output or an error message.
pub trait Executor: Send + Sync {
    fn execute(&self, step_index: usize) -> std::result::Result<serde_json::Value, String>;
}

/// Single task's pipeline state machine plus the step retry bookkeeping
/// it needs to apply `PipelineConfig.step_retry`.
pub struct Pipeline {
    config: PipelineConfig,
    task: RwLock<TaskRecord>,
    step_retries: RwLock<HashMap<usize, u32>>,
    observers: RwLock<Vec<Arc<dyn PipelineObserver>>>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            task: RwLock::new(TaskRecord::new()),
            step_retries: RwLock::new(HashMap::new()),
            observers: RwLock::new(Vec::new()),
        }
    }

    pub fn register_observer(&self, observer: Arc<dyn PipelineObserver>) {
        self.observers.write().push(observer);
    }

    pub fn snapshot(&self) -> TaskRecord {
        self.task.read().clone()
    }

    fn emit(&self, event: PipelineEvent) {
        for observer in self.observers.read().iter() {
            observer.on_event(&event);
        }
    }

    fn guard_active(&self, task: &TaskRecord, expected: PipelinePhase) -> Result<()> {
        if task.phase.is_terminal() {
            return Err(Error::StateMachine(format!(
                "pipeline {} is terminal ({:?}), no transition permitted",
                task.id, task.phase
            )));
        }
        if task.phase != expected {
            return Err(Error::StateMachine(format!(
                "pipeline {} expected phase {:?}, found {:?}",
                task.id, expected, task.phase
            )));
        }
        Ok(())
    }

    pub fn begin_planning(&self) -> Result<()> {
        let mut task = self.task.write();
        self.guard_active(&task, PipelinePhase::Idle)?;
        task.phase = PipelinePhase::Planning;
        let id = task.id;
        let phase = task.phase;
        drop(task);
        self.emit(PipelineEvent::PhaseChanged { task_id: id, phase });
        Ok(())
    }

    pub fn plan_ready(&self, n: usize) -> Result<()> {
        let mut task = self.task.write();
        self.guard_active(&task, PipelinePhase::Planning)?;
        task.steps_total = n;
        task.phase = if n > 0 {
            PipelinePhase::Executing
        } else {
            PipelinePhase::Completed
        };
        let id = task.id;
        let phase = task.phase;
        drop(task);
        self.emit(PipelineEvent::PhaseChanged { task_id: id, phase });
        Ok(())
    }

    pub fn begin_verifying(&self) -> Result<()> {
        let mut task = self.task.write();
        self.guard_active(&task, PipelinePhase::Executing)?;
        task.phase = PipelinePhase::Verifying;
        let id = task.id;
        let phase = task.phase;
        drop(task);
        self.emit(PipelineEvent::PhaseChanged { task_id: id, phase });
        Ok(())
    }

    pub fn step_passed(&self) -> Result<()> {
        let mut task = self.task.write();
        self.guard_active(&task, PipelinePhase::Verifying)?;
        let finished_step = task.current_step;
        task.steps_completed += 1;
        task.phase = if task.steps_completed >= task.steps_total {
            PipelinePhase::Completed
        } else {
            task.current_step += 1;
            PipelinePhase::Executing
        };
        let id = task.id;
        let phase = task.phase;
        drop(task);
        self.emit(PipelineEvent::StepPassed {
            task_id: id,
            step_index: finished_step,
        });
        self.emit(PipelineEvent::PhaseChanged { task_id: id, phase });
        Ok(())
    }

    pub fn step_retried(&self) -> Result<()> {
        let mut task = self.task.write();
        self.guard_active(&task, PipelinePhase::Verifying)?;
        task.total_retries += 1;
        task.phase = PipelinePhase::Executing;
        let id = task.id;
        let step_index = task.current_step;
        let attempt = task.total_retries;
        drop(task);
        self.emit(PipelineEvent::StepRetried {
            task_id: id,
            step_index,
            attempt,
        });
        Ok(())
    }

    pub fn fail(&self, message: impl Into<String>) -> Result<()> {
        let message = message.into();
        let mut task = self.task.write();
        if task.phase.is_terminal() {
            return Err(Error::StateMachine(format!(
                "pipeline {} is terminal ({:?}), no transition permitted",
                task.id, task.phase
            )));
        }
        task.phase = PipelinePhase::Failed;
        task.last_error = Some(message.clone());
        let id = task.id;
        drop(task);
        self.emit(PipelineEvent::Failed {
            task_id: id,
            message,
        });
        Ok(())
    }

    fn retries_for(&self, step_index: usize) -> u32 {
        *self.step_retries.read().get(&step_index).unwrap_or(&0)
    }

    fn bump_retries(&self, step_index: usize) -> u32 {
        let mut retries = self.step_retries.write();
        let count = retries.entry(step_index).or_insert(0);
        *count += 1;
        *count
    }

    /// Run one step to its conclusion — execute, verify, and apply the
    /// step retry policy — sleeping between retries using the same
    /// backoff math as the tool reliability envelope.
    fn run_step(&self, step_index: usize, executor: &dyn Executor, verifier: &dyn Verifier) -> Result<()> {
        let retry_cfg = &self.config.step_retry;
        loop {
            let output = match executor.execute(step_index) {
                Ok(output) => output,
                Err(message) => {
                    self.fail(message.clone())?;
                    return Err(Error::StateMachine(message));
                }
            };

            self.begin_verifying()?;
            let outcome = verifier.verify(step_index, &output);
            match outcome {
                VerifyOutcome::Passed | VerifyOutcome::Skipped => {
                    self.step_passed()?;
                    return Ok(());
                }
                VerifyOutcome::Failed(msg) | VerifyOutcome::VerifierError(msg) => {
                    let attempt = self.retries_for(step_index);
                    if attempt >= retry_cfg.max_retries {
                        self.fail(msg.clone())?;
                        return Err(Error::StateMachine(msg));
                    }
                    self.bump_retries(step_index);
                    self.step_retried()?;
                    let delay_ms = delay_for_attempt(
                        retry_cfg.backoff,
                        retry_cfg.base_delay_ms,
                        retry_cfg.max_delay_ms,
                        retry_cfg.multiplier_fp,
                        attempt,
                    );
                    if delay_ms > 0 {
                        thread::sleep(Duration::from_millis(delay_ms));
                    }
                }
            }
        }
    }

    /// Drive the whole pipeline to completion: plan, then execute/verify
    /// every step in order. Returns the final snapshot whether the task
    /// completed or failed.
    pub fn run(&self, planner: &dyn Planner, executor: &dyn Executor, verifier: &dyn Verifier) -> TaskRecord {
        let id = self.task.read().id;
        if let Err(err) = self.begin_planning() {
            tracing::warn!(%err, "pipeline could not begin planning");
            return self.snapshot();
        }
        let n = planner.plan(id);
        if let Err(err) = self.plan_ready(n) {
            tracing::warn!(%err, "pipeline could not accept plan");
            return self.snapshot();
        }
        for step_index in 0..n {
            if self.snapshot().phase.is_terminal() {
                break;
            }
            if self.run_step(step_index, executor, verifier).is_err() {
                break;
            }
        }
        self.snapshot()
    }
}

/// Whether orchestration should be bypassed in favor of the direct
/// dispatch path — true when disabled, or either hook is missing.
pub fn should_bypass(config: &PipelineConfig, planner: Option<&dyn Planner>, executor: Option<&dyn Executor>) -> bool {
    !config.enabled || planner.is_none() || executor.is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    struct FixedPlanner(usize);
    impl Planner for FixedPlanner {
        fn plan(&self, _task_id: Uuid) -> usize {
            self.0
        }
    }

    struct OkExecutor;
    impl Executor for OkExecutor {
        fn execute(&self, step_index: usize) -> std::result::Result<serde_json::Value, String> {
            Ok(serde_json::json!({"step": step_index}))
        }
    }

    struct AlwaysPass;
    impl Verifier for AlwaysPass {
        fn verify(&self, _step_index: usize, _output: &serde_json::Value) -> VerifyOutcome {
            VerifyOutcome::Passed
        }
    }

    struct FailNTimesThenPass {
        remaining: Mutex<HashMap<usize, u32>>,
    }
    impl Verifier for FailNTimesThenPass {
        fn verify(&self, step_index: usize, _output: &serde_json::Value) -> VerifyOutcome {
            let mut remaining = self.remaining.lock().unwrap();
            let count = remaining.entry(step_index).or_insert(0);
            if *count > 0 {
                *count -= 1;
                VerifyOutcome::Failed("not yet".into())
            } else {
                VerifyOutcome::Passed
            }
        }
    }

    fn fast_config(max_retries: u32) -> PipelineConfig {
        PipelineConfig {
            enabled: true,
            step_retry: nc_domain::config::orchestrator::StepRetryConfig {
                max_retries,
                base_delay_ms: 0,
                max_delay_ms: 0,
                ..Default::default()
            },
            ..PipelineConfig::default()
        }
    }

    #[test]
    fn zero_steps_completes_immediately() {
        let pipeline = Pipeline::new(fast_config(2));
        let record = pipeline.run(&FixedPlanner(0), &OkExecutor, &AlwaysPass);
        assert_eq!(record.phase, PipelinePhase::Completed);
        assert_eq!(record.steps_completed, 0);
    }

    #[test]
    fn all_steps_pass_completes_with_correct_counts() {
        let pipeline = Pipeline::new(fast_config(2));
        let record = pipeline.run(&FixedPlanner(3), &OkExecutor, &AlwaysPass);
        assert_eq!(record.phase, PipelinePhase::Completed);
        assert_eq!(record.steps_completed, 3);
        assert_eq!(record.total_retries, 0);
    }

    #[test]
    fn verification_failure_retries_then_passes() {
        let pipeline = Pipeline::new(fast_config(2));
        let mut remaining = HashMap::new();
        remaining.insert(0, 1);
        let verifier = FailNTimesThenPass {
            remaining: Mutex::new(remaining),
        };
        let record = pipeline.run(&FixedPlanner(1), &OkExecutor, &verifier);
        assert_eq!(record.phase, PipelinePhase::Completed);
        assert_eq!(record.total_retries, 1);
    }

    #[test]
    fn exhausted_retries_fails_the_pipeline() {
        let pipeline = Pipeline::new(fast_config(1));
        let mut remaining = HashMap::new();
        remaining.insert(0, 99);
        let verifier = FailNTimesThenPass {
            remaining: Mutex::new(remaining),
        };
        let record = pipeline.run(&FixedPlanner(1), &OkExecutor, &verifier);
        assert_eq!(record.phase, PipelinePhase::Failed);
        assert!(record.last_error.is_some());
    }

    #[test]
    fn steps_completed_never_exceeds_steps_total() {
        let pipeline = Pipeline::new(fast_config(0));
        let record = pipeline.run(&FixedPlanner(4), &OkExecutor, &AlwaysPass);
        assert!(record.steps_completed <= record.steps_total);
    }

    #[test]
    fn terminal_phase_rejects_further_transitions() {
        let pipeline = Pipeline::new(fast_config(0));
        pipeline.begin_planning().unwrap();
        pipeline.plan_ready(0).unwrap();
        assert_eq!(pipeline.snapshot().phase, PipelinePhase::Completed);
        assert!(pipeline.begin_planning().is_err());
        assert!(pipeline.fail("late").is_err());
    }

    #[test]
    fn observers_receive_phase_changes() {
        let pipeline = Pipeline::new(fast_config(0));
        let count = Arc::new(AtomicU32::new(0));
        struct Counter(Arc<AtomicU32>);
        impl PipelineObserver for Counter {
            fn on_event(&self, _event: &PipelineEvent) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
        pipeline.register_observer(Arc::new(Counter(count.clone())));
        pipeline.run(&FixedPlanner(1), &OkExecutor, &AlwaysPass);
        assert!(count.load(Ordering::SeqCst) > 0);
    }

    #[test]
    fn bypass_when_disabled() {
        let config = PipelineConfig::default();
        assert!(should_bypass(&config, Some(&FixedPlanner(1)), Some(&OkExecutor)));
    }

    #[test]
    fn bypass_when_hooks_missing() {
        let config = fast_config(0);
        assert!(should_bypass(&config, None, Some(&OkExecutor)));
        assert!(should_bypass(&config, Some(&FixedPlanner(1)), None));
    }

    #[test]
    fn no_bypass_when_enabled_and_hooks_present() {
        let config = fast_config(0);
        assert!(!should_bypass(&config, Some(&FixedPlanner(1)), Some(&OkExecutor)));
    }
}
