//! Outbound channel dispatch: a concurrent producer/consumer bus that
//! routes agent replies to the channel transport named in each message.
//!
//! Many producers publish; a single dispatcher consumes and fans out to
//! the registered [`ChannelTransport`]s. The dispatcher is not [`Clone`] —
//! "one consumer" is enforced by the type system, not a runtime check.

pub mod dispatch;
pub mod message;
pub mod registry;

pub use dispatch::{new_bus, BusHandle, DispatchStats, Dispatcher};
pub use message::OutboundMessage;
pub use registry::{ChannelRegistry, ChannelTransport};
