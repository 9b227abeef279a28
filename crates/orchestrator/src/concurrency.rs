use std::sync::{Condvar, Mutex};

/// Counting gate bounding how many pipelines may run concurrently.
/// Plays the role the teacher's per-session `tokio::sync::Semaphore`
/// plays for task concurrency, but blocking/synchronous — this core
/// assumes OS threads, not a cooperative scheduler.
pub struct ConcurrencyGate {
    max: usize,
    state: Mutex<usize>,
    condvar: Condvar,
}

/// RAII permit; dropping it releases a slot.
pub struct Permit<'a> {
    gate: &'a ConcurrencyGate,
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        let mut in_use = self.gate.state.lock().unwrap();
        *in_use -= 1;
        self.gate.condvar.notify_one();
    }
}

impl ConcurrencyGate {
    /// `max_concurrent_tasks` is clamped to `1..=20`, mirroring
    /// `PipelineConfig::clamped`.
    pub fn new(max_concurrent_tasks: usize) -> Self {
        Self {
            max: max_concurrent_tasks.clamp(1, 20),
            state: Mutex::new(0),
            condvar: Condvar::new(),
        }
    }

    pub fn max(&self) -> usize {
        self.max
    }

    /// Block until a slot is free, then hold it until the returned
    /// permit is dropped.
    pub fn acquire(&self) -> Permit<'_> {
        let mut in_use = self.state.lock().unwrap();
        while *in_use >= self.max {
            in_use = self.condvar.wait(in_use).unwrap();
        }
        *in_use += 1;
        Permit { gate: self }
    }

    /// Non-blocking variant: `None` if no slot is currently free.
    pub fn try_acquire(&self) -> Option<Permit<'_>> {
        let mut in_use = self.state.lock().unwrap();
        if *in_use >= self.max {
            return None;
        }
        *in_use += 1;
        Some(Permit { gate: self })
    }

    pub fn in_use(&self) -> usize {
        *self.state.lock().unwrap()
    }
}
