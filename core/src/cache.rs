//! Bounded cache of compiled expressions, keyed by exact source text.

use hashbrown::HashMap;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Number of compiled expressions kept by a new cache.
pub const DEFAULT_CACHE_LIMIT: usize = 100;

struct Entry<T> {
    value: Arc<T>,
    tick: u64,
}

/// Least-recently-used cache.
///
/// `entries` owns the values; `recency` orders their keys by last use, so
/// the first recency entry is the eviction candidate. Every access takes a
/// fresh tick from a monotonic counter.
pub struct ExpressionCache<T> {
    limit: usize,
    clock: u64,
    entries: HashMap<String, Entry<T>>,
    recency: BTreeMap<u64, String>,
}

impl<T> ExpressionCache<T> {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            clock: 0,
            entries: HashMap::new(),
            recency: BTreeMap::new(),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.entries.contains_key(text)
    }

    /// Changes the capacity, evicting least-recently-used entries until the
    /// cache fits. A limit of `0` disables caching.
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
        self.evict_to(limit);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
    }

    fn next_tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Returns the cached value for `text`, promoting it to most recently
    /// used.
    pub fn get(&mut self, text: &str) -> Option<Arc<T>> {
        let tick = self.next_tick();
        let entry = self.entries.get_mut(text)?;
        self.recency.remove(&entry.tick);
        entry.tick = tick;
        self.recency.insert(tick, text.to_string());
        Some(Arc::clone(&entry.value))
    }

    /// Stores `value` under `text`, evicting the least-recently-used entry
    /// when full. Does nothing when caching is disabled.
    pub fn insert(&mut self, text: &str, value: Arc<T>) {
        if self.limit == 0 {
            return;
        }
        let tick = self.next_tick();
        if let Some(previous) = self.entries.insert(text.to_string(), Entry { value, tick }) {
            self.recency.remove(&previous.tick);
        }
        self.recency.insert(tick, text.to_string());
        self.evict_to(self.limit);
    }

    /// Cache hit: promote and return. Miss: run `compile`, store its result
    /// and return it. Compile failures are returned and not cached.
    pub fn get_or_compile<E, F>(&mut self, text: &str, compile: F) -> Result<Arc<T>, E>
    where
        F: FnOnce(&str) -> Result<T, E>,
    {
        if let Some(value) = self.get(text) {
            tracing::debug!(expression = text, "cache hit");
            return Ok(value);
        }
        tracing::debug!(expression = text, "cache miss");
        let value = Arc::new(compile(text)?);
        self.insert(text, Arc::clone(&value));
        Ok(value)
    }

    fn evict_to(&mut self, limit: usize) {
        while self.entries.len() > limit {
            let Some((_, key)) = self.recency.pop_first() else {
                break;
            };
            tracing::debug!(expression = %key, "cache eviction");
            self.entries.remove(&key);
        }
    }
}

impl<T> Default for ExpressionCache<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_LIMIT)
    }
}
