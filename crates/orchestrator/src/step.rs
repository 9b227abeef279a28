use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    Passed,
    Failed,
    Skipped,
}

/// Per-step bookkeeping: how many retries it has consumed and its
/// current status, tracked independently from the overall task record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    pub index: usize,
    pub status: StepStatus,
    pub retries: u32,
    pub last_error: Option<String>,
}

impl StepRecord {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            status: StepStatus::Pending,
            retries: 0,
            last_error: None,
        }
    }
}
