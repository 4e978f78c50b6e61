//! Memoization of compiled selector groups.

use std::sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;
use linden_common::Result;

use crate::{SelectorGroup, compile};

/// Number of distinct selector strings a cache keeps by default.
pub const DEFAULT_CAPACITY: usize = 100;

/// The process-wide cache used by the string-taking query methods.
static GLOBAL_CACHE: LazyLock<Mutex<SelectorCache>> =
    LazyLock::new(|| Mutex::new(SelectorCache::default()));

/// Counters describing a [`SelectorCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that had to compile.
    pub misses: u64,
    /// Entries currently stored.
    pub len: usize,
    /// Maximum number of entries.
    pub capacity: usize,
}

/// Bounded cache of compiled selector groups keyed by their exact source.
///
/// When full, the oldest inserted entry is evicted before a new one is
/// stored. Lookups do not refresh an entry's age.
#[derive(Debug)]
pub struct SelectorCache {
    /// Entries in insertion order, oldest first.
    entries: IndexMap<String, Arc<SelectorGroup>>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl Default for SelectorCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl SelectorCache {
    /// Create an empty cache holding at most `capacity` groups. A capacity
    /// of zero disables storage but still counts misses.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
            capacity,
            hits: 0,
            misses: 0,
        }
    }

    /// Return the compiled group for `selector`, compiling and storing it on
    /// a miss.
    ///
    /// # Errors
    ///
    /// Returns [`linden_common::Error::InvalidSelector`] if the selector does
    /// not compile. Failed compilations are not cached.
    pub fn compile(&mut self, selector: &str) -> Result<Arc<SelectorGroup>> {
        if let Some(group) = self.entries.get(selector) {
            self.hits += 1;
            return Ok(Arc::clone(group));
        }

        self.misses += 1;
        let group = Arc::new(compile(selector)?);
        if self.capacity == 0 {
            return Ok(group);
        }

        while self.entries.len() >= self.capacity {
            let _ = self.entries.shift_remove_index(0);
        }
        let _ = self
            .entries
            .insert(selector.to_string(), Arc::clone(&group));
        Ok(group)
    }

    /// Whether `selector` is currently cached. Does not count as a lookup.
    #[must_use]
    pub fn contains(&self, selector: &str) -> bool {
        self.entries.contains_key(selector)
    }

    /// Number of cached groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookups answered from the cache since creation or the last [`clear`](Self::clear).
    #[must_use]
    pub const fn hits(&self) -> u64 {
        self.hits
    }

    /// Lookups that compiled since creation or the last [`clear`](Self::clear).
    #[must_use]
    pub const fn misses(&self) -> u64 {
        self.misses
    }

    /// Snapshot of the counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            len: self.entries.len(),
            capacity: self.capacity,
        }
    }

    /// Drop every entry and reset both counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }
}

/// Lock the process-wide cache.
///
/// A poisoned lock is recovered rather than propagated.
pub fn global_cache() -> MutexGuard<'static, SelectorCache> {
    GLOBAL_CACHE.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Compile `selector` through the process-wide cache.
///
/// # Errors
///
/// Returns [`linden_common::Error::InvalidSelector`] if the selector does not
/// compile.
pub fn compile_cached(selector: &str) -> Result<Arc<SelectorGroup>> {
    global_cache().compile(selector)
}
