use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use nc_domain::{Error, Result};

use crate::message::OutboundMessage;
use crate::registry::ChannelRegistry;

/// How long a single `recv` attempt waits before re-checking the closed
/// and stop-requested flags. Keeps `consume_outbound` responsive to
/// cancellation without busy-spinning.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

struct Shared {
    closed: AtomicBool,
    dispatched: AtomicU64,
    errors: AtomicU64,
    channel_not_found: AtomicU64,
}

/// Snapshot of dispatch counters for introspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchStats {
    pub dispatched: u64,
    pub errors: u64,
    pub channel_not_found: u64,
}

/// Clone-able producer handle. Many producers may hold one of these;
/// publishing never blocks on the outcome.
#[derive(Clone)]
pub struct BusHandle {
    sender: Sender<OutboundMessage>,
    shared: Arc<Shared>,
}

impl BusHandle {
    /// Publish a message for dispatch. Fails with [`Error::BusClosed`]
    /// when the bus has been closed; otherwise this call does not block.
    pub fn publish_outbound(&self, message: OutboundMessage) -> Result<()> {
        if self.shared.closed.load(Ordering::Acquire) {
            return Err(Error::BusClosed);
        }
        self.sender
            .send(message)
            .map_err(|_| Error::BusClosed)
    }

    /// Shut the bus down. Idempotent — closing twice is a no-op.
    pub fn close(&self) {
        self.shared.closed.store(true, Ordering::Release);
    }

    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::Acquire)
    }
}

/// Single consumer. Deliberately not `Clone` — "many producers, one
/// dispatcher" is enforced by the type system.
pub struct Dispatcher {
    receiver: Receiver<OutboundMessage>,
    shared: Arc<Shared>,
    registry: Arc<ChannelRegistry>,
}

/// Build a fresh bus: a clone-able producer handle and its single
/// dispatcher, wired to `registry` for outbound routing.
pub fn new_bus(registry: Arc<ChannelRegistry>) -> (BusHandle, Dispatcher) {
    let (tx, rx) = channel();
    let shared = Arc::new(Shared {
        closed: AtomicBool::new(false),
        dispatched: AtomicU64::new(0),
        errors: AtomicU64::new(0),
        channel_not_found: AtomicU64::new(0),
    });
    (
        BusHandle {
            sender: tx,
            shared: shared.clone(),
        },
        Dispatcher {
            receiver: rx,
            shared,
            registry,
        },
    )
}

impl Dispatcher {
    /// Blocking, cancellable pop. Returns `None` iff the bus is closed
    /// and drained, or `stop_requested` is observed set before a message
    /// arrives.
    pub fn consume_outbound(&self, stop_requested: &AtomicBool) -> Option<OutboundMessage> {
        loop {
            match self.receiver.recv_timeout(POLL_INTERVAL) {
                Ok(message) => return Some(message),
                Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {
                    if stop_requested.load(Ordering::Acquire) {
                        return None;
                    }
                    continue;
                }
                Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => return None,
            }
        }
    }

    /// Route one message to its named channel, updating counters.
    /// Channel send errors are isolated — they never poison the loop.
    pub fn dispatch_one(&self, message: OutboundMessage) {
        match self.registry.get(&message.channel) {
            None => {
                self.shared.channel_not_found.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(channel = %message.channel, "outbound channel not found");
            }
            Some(transport) => match transport.send(&message.chat_id, &message.content) {
                Ok(()) => {
                    self.shared.dispatched.fetch_add(1, Ordering::Relaxed);
                }
                Err(err) => {
                    self.shared.errors.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!(channel = %message.channel, error = %err, "outbound send failed");
                }
            },
        }
    }

    /// Drain all pending messages, dispatching each, then return. Intended
    /// to be called after the bus has been closed so the dispatcher
    /// thread can exit cleanly.
    pub fn drain(&self) {
        let stop = AtomicBool::new(true);
        while let Ok(message) = self.receiver.try_recv() {
            self.dispatch_one(message);
        }
        let _ = stop;
    }

    pub fn stats(&self) -> DispatchStats {
        DispatchStats {
            dispatched: self.shared.dispatched.load(Ordering::Relaxed),
            errors: self.shared.errors.load(Ordering::Relaxed),
            channel_not_found: self.shared.channel_not_found.load(Ordering::Relaxed),
        }
    }
}
