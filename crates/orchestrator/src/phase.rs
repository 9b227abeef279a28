use serde::{Deserialize, Serialize};

/// Pipeline lifecycle phase. `completed` and `failed` are terminal —
/// no transition out of them is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelinePhase {
    Idle,
    Planning,
    Executing,
    Verifying,
    Completed,
    Failed,
}

impl PipelinePhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_completed_and_failed_are_terminal() {
        assert!(!PipelinePhase::Idle.is_terminal());
        assert!(!PipelinePhase::Planning.is_terminal());
        assert!(!PipelinePhase::Executing.is_terminal());
        assert!(!PipelinePhase::Verifying.is_terminal());
        assert!(PipelinePhase::Completed.is_terminal());
        assert!(PipelinePhase::Failed.is_terminal());
    }
}
