use std::collections::HashMap;

use nc_domain::config::sync::{HeartbeatConfig, SCHEMA_VERSION};
use nc_domain::{Error, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeerState {
    Disconnected,
    HandshakePending,
    Connected,
    Degraded,
    Offline,
}

impl PeerState {
    /// Edge set from §4.5.3. Self-transitions are always invalid.
    fn can_transition_to(self, target: PeerState) -> bool {
        use PeerState::*;
        if self == target {
            return false;
        }
        matches!(
            (self, target),
            (Disconnected, HandshakePending)
                | (HandshakePending, Connected)
                | (HandshakePending, Disconnected)
                | (Connected, Degraded)
                | (Connected, Disconnected)
                | (Degraded, Connected)
                | (Degraded, Offline)
                | (Degraded, Disconnected)
                | (Offline, Disconnected)
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandshakeRequest {
    pub source_node: String,
    pub schema_version: u32,
    pub timestamp: i64,
    pub last_seen_sequence: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandshakeResult {
    Accepted,
    Rejected,
    VersionMismatch,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandshakeResponse {
    pub source_node: String,
    pub schema_version: u32,
    pub timestamp: i64,
    pub result: HandshakeResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub last_seen_sequence: u64,
}

/// Respond to an inbound handshake request. Equal schema versions are
/// accepted; any mismatch is rejected with `version_mismatch`.
pub fn respond_to_handshake(
    responder_node: &str,
    request: &HandshakeRequest,
    now: i64,
    last_seen_sequence: u64,
) -> HandshakeResponse {
    let (result, reason) = if request.schema_version == SCHEMA_VERSION {
        (HandshakeResult::Accepted, None)
    } else {
        (
            HandshakeResult::VersionMismatch,
            Some(format!(
                "peer schema version {} != {}",
                request.schema_version, SCHEMA_VERSION
            )),
        )
    };
    HandshakeResponse {
        source_node: responder_node.into(),
        schema_version: SCHEMA_VERSION,
        timestamp: now,
        result,
        reason,
        last_seen_sequence,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Heartbeat {
    pub source_node: String,
    pub timestamp: i64,
    pub sequence: u64,
    pub uptime_ms: u64,
}

/// Tracking state for one remote peer. Owned by the federation loop
/// that mutates it; readers should take a [`PeerInfo::clone`] snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerInfo {
    pub node: String,
    pub state: PeerState,
    pub last_heartbeat_ts: i64,
    pub missed_heartbeats: u32,
    pub connected_at: i64,
    pub last_received_sequence: u64,
}

impl PeerInfo {
    pub fn new(node: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            state: PeerState::Disconnected,
            last_heartbeat_ts: 0,
            missed_heartbeats: 0,
            connected_at: 0,
            last_received_sequence: 0,
        }
    }

    pub fn transition_to(&mut self, target: PeerState) -> Result<()> {
        if !self.state.can_transition_to(target) {
            return Err(Error::StateMachine(format!(
                "peer {}: invalid transition {:?} -> {:?}",
                self.node, self.state, target
            )));
        }
        if target == PeerState::Connected && self.state == PeerState::HandshakePending {
            self.connected_at = self.last_heartbeat_ts;
        }
        self.state = target;
        Ok(())
    }

    /// Receiving any heartbeat while degraded restores `connected` and
    /// resets the miss counter.
    pub fn record_heartbeat(&mut self, heartbeat: &Heartbeat) {
        self.last_heartbeat_ts = heartbeat.timestamp;
        self.last_received_sequence = heartbeat.sequence;
        self.missed_heartbeats = 0;
        if self.state == PeerState::Degraded {
            self.state = PeerState::Connected;
        }
    }

    /// Apply one missed heartbeat interval, escalating state per the
    /// configured thresholds.
    pub fn record_missed_heartbeat(&mut self, config: &HeartbeatConfig) {
        self.missed_heartbeats += 1;
        if self.state == PeerState::Connected && self.missed_heartbeats >= config.degraded_after_missed {
            self.state = PeerState::Degraded;
        } else if self.state == PeerState::Degraded && self.missed_heartbeats >= config.offline_after_missed {
            self.state = PeerState::Offline;
        }
    }

    /// Clear all tracking but preserve node identity.
    pub fn reset(&mut self) {
        let node = self.node.clone();
        *self = Self::new(node);
    }
}

/// Thread-safe table of peer tracking state, one entry per remote node.
#[derive(Default)]
pub struct PeerTable {
    peers: RwLock<HashMap<String, PeerInfo>>,
}

impl PeerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&self, node: &str) {
        self.peers
            .write()
            .entry(node.to_string())
            .or_insert_with(|| PeerInfo::new(node));
    }

    pub fn snapshot(&self, node: &str) -> Option<PeerInfo> {
        self.peers.read().get(node).cloned()
    }

    pub fn snapshot_all(&self) -> Vec<PeerInfo> {
        self.peers.read().values().cloned().collect()
    }

    pub fn transition(&self, node: &str, target: PeerState) -> Result<()> {
        let mut peers = self.peers.write();
        let peer = peers
            .entry(node.to_string())
            .or_insert_with(|| PeerInfo::new(node));
        peer.transition_to(target)
    }

    pub fn record_heartbeat(&self, heartbeat: &Heartbeat) {
        let mut peers = self.peers.write();
        let peer = peers
            .entry(heartbeat.source_node.clone())
            .or_insert_with(|| PeerInfo::new(heartbeat.source_node.clone()));
        peer.record_heartbeat(heartbeat);
    }

    pub fn record_missed_heartbeat(&self, node: &str, config: &HeartbeatConfig) {
        let mut peers = self.peers.write();
        if let Some(peer) = peers.get_mut(node) {
            peer.record_missed_heartbeat(config);
        }
    }

    pub fn reset(&self, node: &str) {
        let mut peers = self.peers.write();
        if let Some(peer) = peers.get_mut(node) {
            peer.reset();
        }
    }

    /// Drop every peer currently in [`PeerState::Offline`], returning the
    /// removed node names. Keeps a long-lived table from accumulating
    /// entries for peers that disconnected and never came back.
    pub fn sweep_offline(&self) -> Vec<String> {
        let mut peers = self.peers.write();
        let offline: Vec<String> = peers
            .iter()
            .filter(|(_, info)| info.state == PeerState::Offline)
            .map(|(node, _)| node.clone())
            .collect();
        for node in &offline {
            peers.remove(node);
        }
        offline
    }
}
