use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

/// External channel transport: Telegram, Discord, Slack, etc. Actual
/// implementations are collaborators outside this core (§6); the bus only
/// needs enough surface to route a send.
pub trait ChannelTransport: Send + Sync {
    fn name(&self) -> &str;
    fn send(&self, chat_id: &str, content: &str) -> Result<(), String>;
}

/// Registered transports, looked up by exact name.
#[derive(Default)]
pub struct ChannelRegistry {
    transports: RwLock<HashMap<String, Arc<dyn ChannelTransport>>>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, transport: Arc<dyn ChannelTransport>) {
        self.transports
            .write()
            .insert(transport.name().to_string(), transport);
    }

    pub fn unregister(&self, name: &str) -> Option<Arc<dyn ChannelTransport>> {
        self.transports.write().remove(name)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ChannelTransport>> {
        self.transports.read().get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.transports.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
