//! Result cache.
//!
//! Maps `(script identifier, canonical parameter serialization)` to a
//! previously computed [`ExecutionResult`] with a fixed TTL. Expired
//! entries are evicted lazily when looked up; there is no background
//! sweep. `put` always overwrites. Growth is bounded only by the variety
//! of (script, parameters) pairs, which is acceptable for the intended
//! low-volume deployment.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::engine::outcome::ExecutionResult;
use crate::ParameterSet;

struct CacheEntry {
    result: ExecutionResult,
    created: Instant,
}

/// Administrative view of the cache.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub size: usize,
    pub keys: Vec<String>,
    pub ttl_secs: u64,
}

/// Shared result cache, owned by the engine and mutated under a mutex.
pub struct ResultCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl ResultCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Build the cache key for a script + parameter set.
    ///
    /// `ParameterSet` is a `BTreeMap`, so serialization is key-sorted and
    /// logically identical parameter sets always share a key.
    pub fn key(script: &str, parameters: &ParameterSet) -> String {
        let params = serde_json::to_string(parameters).unwrap_or_default();
        format!("{script}:{params}")
    }

    /// Look up a fresh entry, lazily evicting it if it has expired.
    pub fn get(&self, key: &str) -> Option<ExecutionResult> {
        self.get_at(key, Instant::now())
    }

    /// Store a result snapshot, overwriting any previous entry.
    pub fn put(&self, key: String, result: ExecutionResult) {
        self.put_at(key, result, Instant::now());
    }

    /// Clock-injected lookup; `get` passes the real time.
    pub fn get_at(&self, key: &str, now: Instant) -> Option<ExecutionResult> {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        match entries.get(key) {
            Some(entry) if now.duration_since(entry.created) < self.ttl => {
                Some(entry.result.clone())
            }
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Clock-injected insert; `put` passes the real time.
    pub fn put_at(&self, key: String, result: ExecutionResult, now: Instant) {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        entries.insert(
            key,
            CacheEntry {
                result,
                created: now,
            },
        );
    }

    pub fn clear(&self) {
        self.entries.lock().expect("cache mutex poisoned").clear();
    }

    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.lock().expect("cache mutex poisoned");
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();
        CacheStats {
            size: entries.len(),
            keys,
            ttl_secs: self.ttl.as_secs(),
        }
    }
}
