//! Wires the core subsystems from a resolved [`nc_domain::config::Config`].
//!
//! There's no HTTP/channel front end here — that's an external
//! collaborator's job (§6, §9). `Runtime` is the in-process composition
//! root: construct it once at startup and hand its handles to whatever
//! surface (CLI, embedder, test harness) drives the agent loop.

use std::sync::Arc;

use nc_bus::{new_bus, BusHandle, ChannelRegistry, Dispatcher};
use nc_domain::config::Config;
use nc_domain::Result;
use nc_memory::RecallRanker;
use nc_orchestrator::{ConcurrencyGate, Pipeline};
use nc_policy::PolicyEngine;
use nc_reliability::{CircuitBreakerTracker, ToolCache, ToolHealthTracker};
use nc_sync::PeerTable;
use nc_timeline::TimelineStore;

/// Holds every subsystem handle the runtime needs, fully wired from
/// config. Cheap to clone — everything inside is already `Arc`/interior-
/// mutable.
pub struct Runtime {
    pub bus: BusHandle,
    pub channels: Arc<ChannelRegistry>,
    pub policy: Arc<PolicyEngine>,
    pub breaker: Arc<CircuitBreakerTracker>,
    pub tool_health: Arc<ToolHealthTracker>,
    pub tool_cache: Arc<ToolCache>,
    pub pipeline: Arc<Pipeline>,
    pub concurrency: Arc<ConcurrencyGate>,
    pub peers: Arc<PeerTable>,
    pub recall: Arc<RecallRanker>,
    pub timeline: Arc<TimelineStore>,
}

impl Runtime {
    /// Construct every subsystem from `config`. The outbound bus
    /// dispatcher is returned detached — the caller decides whether and
    /// when to run it (e.g. on its own thread), mirroring
    /// [`nc_bus::new_bus`]'s split of handle from dispatcher.
    pub fn bootstrap(config: &Config) -> Result<(Self, Dispatcher)> {
        let channels = Arc::new(ChannelRegistry::new());
        let (bus, dispatcher) = new_bus(channels.clone());

        let policy = Arc::new(PolicyEngine::new(config.policy.clone()));
        let breaker = Arc::new(CircuitBreakerTracker::new(config.reliability.breaker.clone()));
        let tool_health = Arc::new(ToolHealthTracker::new());
        let tool_cache = Arc::new(ToolCache::new(config.reliability.cache.capacity));

        let pipeline = Arc::new(Pipeline::new(config.orchestrator.clone()));
        let concurrency = Arc::new(ConcurrencyGate::new(config.orchestrator.max_concurrent_tasks));

        let peers = Arc::new(PeerTable::new());
        let recall = Arc::new(RecallRanker::new(config.memory.decay.clone(), 0.5));

        let timeline = Arc::new(TimelineStore::new(
            config.timeline.path.clone(),
            config.timeline.max_event_bytes,
        ));

        let runtime = Self {
            bus,
            channels,
            policy,
            breaker,
            tool_health,
            tool_cache,
            pipeline,
            concurrency,
            peers,
            recall,
            timeline,
        };

        Ok((runtime, dispatcher))
    }
}
