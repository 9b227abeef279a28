use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, VecDeque};
use std::hash::{Hash, Hasher};

use parking_lot::Mutex;
use serde::Serialize;

use crate::envelope::ToolResult;
use crate::now_ns;

/// Identifies a cached call: tool name plus a fingerprint of its
/// arguments (a hash of their canonical JSON form).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub tool_name: String,
    pub args_fingerprint: u64,
}

impl CacheKey {
    pub fn new(tool_name: &str, args: &serde_json::Value) -> Self {
        let mut hasher = DefaultHasher::new();
        args.to_string().hash(&mut hasher);
        Self {
            tool_name: tool_name.to_string(),
            args_fingerprint: hasher.finish(),
        }
    }
}

struct CacheEntry {
    result: ToolResult,
    created_ns: i128,
    ttl_ns: u64,
}

impl CacheEntry {
    fn is_valid_at(&self, now: i128) -> bool {
        if self.ttl_ns == 0 {
            return true;
        }
        let elapsed = now - self.created_ns;
        // A clock that appears to move backwards is treated as not yet
        // expired rather than faulted.
        elapsed < 0 || (elapsed as u128) <= self.ttl_ns as u128
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

struct Inner {
    entries: HashMap<CacheKey, CacheEntry>,
    order: VecDeque<CacheKey>,
    stats: CacheStats,
}

/// Capacity-bounded cache of prior tool results, keyed by `(tool_name,
/// args fingerprint)`. Eviction is oldest-first once `capacity` is
/// reached; a `ttl_ns` of zero means an entry never expires on its own.
pub struct ToolCache {
    capacity: usize,
    inner: Mutex<Inner>,
}

impl ToolCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                order: VecDeque::new(),
                stats: CacheStats::default(),
            }),
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<ToolResult> {
        self.get_at(key, now_ns())
    }

    pub fn get_at(&self, key: &CacheKey, now: i128) -> Option<ToolResult> {
        let mut inner = self.inner.lock();
        match inner.entries.get(key) {
            Some(entry) if entry.is_valid_at(now) => {
                let result = entry.result.clone();
                inner.stats.hits += 1;
                Some(result)
            }
            Some(_) => {
                inner.entries.remove(key);
                inner.order.retain(|k| k != key);
                inner.stats.misses += 1;
                None
            }
            None => {
                inner.stats.misses += 1;
                None
            }
        }
    }

    pub fn insert(&self, key: CacheKey, result: ToolResult, ttl_ns: u64) {
        self.insert_at(key, result, ttl_ns, now_ns());
    }

    pub fn insert_at(&self, key: CacheKey, result: ToolResult, ttl_ns: u64, now: i128) {
        let mut inner = self.inner.lock();
        if !inner.entries.contains_key(&key) {
            if inner.order.len() >= self.capacity {
                if let Some(oldest) = inner.order.pop_front() {
                    inner.entries.remove(&oldest);
                    inner.stats.evictions += 1;
                }
            }
            inner.order.push_back(key.clone());
        }
        inner.entries.insert(
            key,
            CacheEntry {
                result,
                created_ns: now,
                ttl_ns,
            },
        );
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
