//! `nc-domain` — shared types, error handling, and configuration for the
//! nullclaw coordination substrate.
//!
//! Every other `nc-*` crate depends on this one for its config struct,
//! its slice of the shared [`error::Error`] enum, and the small set of
//! cross-cutting id/time newtypes in [`ids`].

pub mod config;
pub mod error;
pub mod ids;
pub mod trace;

pub use error::{Error, Result};
