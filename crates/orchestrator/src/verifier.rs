/// Outcome of verifying a step's output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    Passed,
    Failed(String),
    Skipped,
    VerifierError(String),
}

/// Pure check run after a step executes. Implementations are expected
/// to be collaborators defined elsewhere — this core only needs the
/// call surface.
pub trait Verifier: Send + Sync {
    fn verify(&self, step_index: usize, output: &serde_json::Value) -> VerifyOutcome;
}
