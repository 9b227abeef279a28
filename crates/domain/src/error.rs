/// Shared error type used across all nullclaw crates.
///
/// Most component-level outcomes (policy denials, conflict resolutions,
/// state-machine transitions) are not modeled as errors — they are
/// structured values returned on the `Ok` path. This enum only covers
/// kinds that actually abort an operation: I/O, (de)serialization,
/// protocol violations, state-machine violations, resource exhaustion,
/// and the explicit bus-closed signal.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("protocol violation: {0}")]
    Protocol(String),

    #[error("state machine: {0}")]
    StateMachine(String),

    #[error("resource exhausted: {0}")]
    Resource(String),

    #[error("bus closed")]
    BusClosed,

    #[error("config: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
