//! Peer-to-peer sync protocol: delta envelopes, conflict resolution,
//! the federation state machine, and hub snapshot import/export.

pub mod conflict;
pub mod message;
pub mod peer;
pub mod snapshot;

pub use conflict::{resolve, resolve_with_rule, ConflictRule, ConflictSide, ConflictResolution, Winner};
pub use message::{
    DeltaHeader, DeltaKind, DeltaOp, EventDelta, MemoryDelta, SyncCursor, SyncMessage, TaskDelta,
};
pub use peer::{
    respond_to_handshake, HandshakeRequest, HandshakeResponse, HandshakeResult, Heartbeat, PeerInfo, PeerState,
    PeerTable,
};
pub use snapshot::{export_snapshot, import_snapshot, HubSnapshot, HubSnapshotEntry, HubSnapshotMeta, ImportOutcome};
