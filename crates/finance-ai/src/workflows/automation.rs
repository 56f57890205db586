//! Timed step sequencer behind the assistant's "Run Automation" action.
//!
//! Step `i` is delivered at `start + i * interval`; the evaluation lands one interval after the
//! last step. Deliveries are driven from a single task so listeners always observe steps in
//! order.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::evaluation::{generate_evaluation, EvaluationResult};

pub const AUTOMATION_STEPS: [&str; 5] = [
    "Reading documents...",
    "Running OCR extraction...",
    "Checking credit bureau...",
    "Calculating FOIR...",
    "Generating AI risk score...",
];

/// Share of the progress bar spread across the steps; the remainder is granted on completion.
const STEP_PROGRESS_BUDGET: usize = 90;
pub const COMPLETE_PROGRESS: u8 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepUpdate {
    pub index: usize,
    pub label: String,
    pub progress: u8,
}

/// Receives sequencer deliveries. Calls arrive from the sequencer task, never concurrently.
pub trait AutomationListener: Send + Sync {
    fn on_step(&self, update: StepUpdate);
    fn on_complete(&self, result: EvaluationResult);
}

#[derive(Debug, Clone, PartialEq)]
pub enum AutomationOutcome {
    Completed(EvaluationResult),
    Cancelled { delivered: usize },
}

pub fn progress_increment(step_count: usize) -> u8 {
    if step_count == 0 {
        return 0;
    }
    (STEP_PROGRESS_BUDGET / step_count) as u8
}

/// Progress shown once the step at `index` has been delivered.
pub fn step_progress(index: usize, step_count: usize) -> u8 {
    let progress = (index + 1) * usize::from(progress_increment(step_count));
    progress.min(STEP_PROGRESS_BUDGET) as u8
}

#[derive(Debug, Clone)]
pub struct StepSequencer {
    interval: Duration,
    generator: fn() -> EvaluationResult,
}

impl StepSequencer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            generator: generate_evaluation,
        }
    }

    /// Replace the evaluation source, mainly so tests can pin the final result.
    pub fn with_generator(mut self, generator: fn() -> EvaluationResult) -> Self {
        self.generator = generator;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Offset from invocation at which the completion is delivered.
    pub fn completion_offset(&self, step_count: usize) -> Duration {
        self.interval * (step_count as u32 + 1)
    }

    /// Spawn the sequence onto the runtime.
    pub fn spawn<L>(
        &self,
        steps: Vec<String>,
        listener: Arc<L>,
        cancel: CancellationToken,
    ) -> JoinHandle<AutomationOutcome>
    where
        L: AutomationListener + ?Sized + 'static,
    {
        let sequencer = self.clone();
        tokio::spawn(async move { sequencer.run(steps, listener, cancel).await })
    }

    pub async fn run<L>(
        &self,
        steps: Vec<String>,
        listener: Arc<L>,
        cancel: CancellationToken,
    ) -> AutomationOutcome
    where
        L: AutomationListener + ?Sized,
    {
        let start = Instant::now();
        let step_count = steps.len();
        let result = (self.generator)();
        info!(steps = step_count, "automation run started");

        for (index, label) in steps.into_iter().enumerate() {
            let deadline = start + self.interval * index as u32;
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(delivered = index, "automation run cancelled");
                    return AutomationOutcome::Cancelled { delivered: index };
                }
                _ = sleep_until(deadline) => {}
            }

            let progress = step_progress(index, step_count);
            debug!(index, %label, progress, "automation step delivered");
            listener.on_step(StepUpdate {
                index,
                label,
                progress,
            });
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(delivered = step_count, "automation run cancelled before completion");
                return AutomationOutcome::Cancelled { delivered: step_count };
            }
            _ = sleep_until(start + self.completion_offset(step_count)) => {}
        }

        info!(%result, "automation run complete");
        listener.on_complete(result);
        AutomationOutcome::Completed(result)
    }
}

impl Default for StepSequencer {
    fn default() -> Self {
        Self::new(Duration::from_millis(900))
    }
}

pub fn default_steps() -> Vec<String> {
    AUTOMATION_STEPS.iter().map(|step| step.to_string()).collect()
}
