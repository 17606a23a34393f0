//! Reference-counted resource cache keyed by URL.
//!
//! # Invariants
//!
//! - An entry exists if and only if its reference count is at least one.
//!   A count is never observable as zero: the release that reaches zero
//!   tears the resource down and removes the entry in the same call.
//! - At most one live resource object exists per URL.
//! - A get after a full release never sees the old object again.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, info};

use crate::resource::{Handle, Resource};

struct CacheEntry<R> {
    resource: Handle<R>,
    ref_count: usize,
}

/// URL → (resource, reference count) map for one resource kind.
pub struct ResourceCache<R> {
    entries: HashMap<String, CacheEntry<R>>,
}

impl<R: Resource> ResourceCache<R> {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Look up `url`, taking a new reference on a hit.
    ///
    /// A miss has no side effects.
    pub fn try_get(&mut self, url: &str) -> Option<Handle<R>> {
        let entry = self.entries.get_mut(url)?;
        entry.ref_count += 1;
        debug!(
            "Cache hit for {} '{}' (refs: {})",
            R::KIND,
            url,
            entry.ref_count
        );
        Some(Rc::clone(&entry.resource))
    }

    /// Store a freshly created resource with one reference.
    ///
    /// Callers must only insert after a `try_get` miss for the same URL.
    /// Inserting over a live entry is a logic error: debug builds panic,
    /// release builds replace the entry without tearing the old one down.
    pub fn insert(&mut self, url: &str, resource: Handle<R>) {
        debug_assert!(
            !self.entries.contains_key(url),
            "{} '{}' inserted while still cached",
            R::KIND,
            url
        );
        debug!("Caching {} '{}'", R::KIND, url);
        self.entries.insert(
            url.to_string(),
            CacheEntry {
                resource,
                ref_count: 1,
            },
        );
    }

    /// Drop one reference to `url`.
    ///
    /// When the last reference goes, the resource is destroyed and the entry
    /// removed. Unknown URLs are ignored. Returns true if an entry was found.
    pub fn release(&mut self, url: &str) -> bool {
        let Some(entry) = self.entries.get_mut(url) else {
            return false;
        };
        entry.ref_count = entry.ref_count.saturating_sub(1);
        if entry.ref_count > 0 {
            debug!(
                "Released {} '{}' (refs: {})",
                R::KIND,
                url,
                entry.ref_count
            );
            return true;
        }
        if let Some(entry) = self.entries.remove(url) {
            entry.resource.borrow_mut().destroy();
            info!("Destroyed {} '{}'", R::KIND, url);
        }
        true
    }

    /// Current reference count, or `None` if `url` is not cached.
    pub fn ref_count(&self, url: &str) -> Option<usize> {
        self.entries.get(url).map(|e| e.ref_count)
    }

    /// True if `url` has a live entry.
    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// URLs with live entries, in no particular order.
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<R: Resource> Default for ResourceCache<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Resource> fmt::Debug for ResourceCache<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(url, e)| (url, e.ref_count)))
            .finish()
    }
}
