// SPDX-FileCopyrightText: 2026 Triago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vector-indexed semantic cache for prior (query, response) pairs.
//!
//! Lookups run a linear cosine-similarity scan restricted to non-expired
//! entries and return the single best match at or above the configured
//! similarity threshold. Expiry is checked lazily at lookup time; a
//! [`SemanticCache::sweep_expired`] pass may additionally reclaim space but
//! is not required for correctness. At capacity, inserting evicts exactly
//! one least-recently-hit entry.
//!
//! The cache is shared across all sessions: concurrent lookups scan under a
//! read lock, while insert/evict and hit-metadata updates take the write
//! lock. Slightly stale reads during a concurrent write are acceptable.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};
use metrics::counter;
use tracing::{debug, info};
use triago_config::model::CacheConfig;
use triago_core::types::cosine_similarity;

/// A cached (query, response) pair with its embedding and hit bookkeeping.
#[derive(Debug, Clone)]
struct StoredEntry {
    id: u64,
    embedding: Vec<f32>,
    query_text: String,
    response_text: String,
    model_used: String,
    created_at: DateTime<Utc>,
    last_hit_at: DateTime<Utc>,
    hit_count: u64,
}

/// A successful cache lookup.
#[derive(Debug, Clone)]
pub struct CacheHit {
    /// Cached response text, served in place of a model call.
    pub response_text: String,
    /// Model that produced the cached response.
    pub model_used: String,
    /// Similarity between the probe embedding and the cached entry.
    pub similarity: f64,
    /// Query text of the cached entry (may differ from the probe query).
    pub query_text: String,
    /// Hit count after this lookup.
    pub hit_count: u64,
}

/// Point-in-time cache statistics for the ops surface.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheStats {
    pub total_entries: usize,
    pub active_entries: usize,
    pub expired_entries: usize,
    pub capacity: usize,
    pub similarity_threshold: f64,
    pub ttl_seconds: u64,
}

/// Similarity-indexed cache with TTL expiry and LRU eviction.
pub struct SemanticCache {
    config: CacheConfig,
    entries: RwLock<Vec<StoredEntry>>,
    next_id: AtomicU64,
}

impl SemanticCache {
    /// Create an empty cache with the given configuration.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            entries: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    fn ttl(&self) -> Duration {
        Duration::seconds(self.config.ttl_seconds as i64)
    }

    fn is_expired(&self, entry: &StoredEntry, now: DateTime<Utc>) -> bool {
        now - entry.created_at >= self.ttl()
    }

    /// Find the best non-expired entry with similarity at or above the
    /// configured threshold. A hit bumps `hit_count` and `last_hit_at`.
    pub fn lookup(&self, embedding: &[f32]) -> Option<CacheHit> {
        self.lookup_at(embedding, Utc::now())
    }

    fn lookup_at(&self, embedding: &[f32], now: DateTime<Utc>) -> Option<CacheHit> {
        let best = {
            let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
            let mut best: Option<(u64, f64, DateTime<Utc>)> = None;
            for entry in entries.iter() {
                if self.is_expired(entry, now) {
                    continue;
                }
                let similarity = f64::from(cosine_similarity(embedding, &entry.embedding));
                if similarity < self.config.similarity_threshold {
                    continue;
                }
                let better = match best {
                    None => true,
                    Some((_, best_sim, best_hit_at)) => {
                        similarity > best_sim
                            || (similarity == best_sim && entry.last_hit_at > best_hit_at)
                    }
                };
                if better {
                    best = Some((entry.id, similarity, entry.last_hit_at));
                }
            }
            best
        };

        let Some((id, similarity, _)) = best else {
            counter!("triago_cache_misses_total").increment(1);
            return None;
        };

        self.complete_hit(id, similarity, now)
    }

    // Re-find under the write lock; the entry may have been evicted by a
    // concurrent insert since the scan. A lost entry counts as a miss so
    // hits + misses always sum to lookups.
    fn complete_hit(&self, id: u64, similarity: f64, now: DateTime<Utc>) -> Option<CacheHit> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let Some(entry) = entries.iter_mut().find(|e| e.id == id) else {
            counter!("triago_cache_misses_total").increment(1);
            return None;
        };
        entry.hit_count += 1;
        entry.last_hit_at = now;

        counter!("triago_cache_hits_total").increment(1);
        debug!(similarity, hit_count = entry.hit_count, "semantic cache hit");
        Some(CacheHit {
            response_text: entry.response_text.clone(),
            model_used: entry.model_used.clone(),
            similarity,
            query_text: entry.query_text.clone(),
            hit_count: entry.hit_count,
        })
    }

    /// Insert a new entry, evicting the least-recently-hit entry first when
    /// at capacity.
    pub fn insert(
        &self,
        embedding: Vec<f32>,
        query_text: impl Into<String>,
        response_text: impl Into<String>,
        model_used: impl Into<String>,
    ) {
        self.insert_at(
            embedding,
            query_text.into(),
            response_text.into(),
            model_used.into(),
            Utc::now(),
        );
    }

    fn insert_at(
        &self,
        embedding: Vec<f32>,
        query_text: String,
        response_text: String,
        model_used: String,
        now: DateTime<Utc>,
    ) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());

        if entries.len() >= self.config.max_cache_size {
            // Evict exactly one least-recently-hit entry.
            if let Some(oldest) = entries
                .iter()
                .enumerate()
                .min_by_key(|(_, e)| e.last_hit_at)
                .map(|(i, _)| i)
            {
                let evicted = entries.swap_remove(oldest);
                counter!("triago_cache_evictions_total").increment(1);
                debug!(
                    query = %evicted.query_text,
                    last_hit_at = %evicted.last_hit_at,
                    "evicted least-recently-hit cache entry"
                );
            }
        }

        entries.push(StoredEntry {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            embedding,
            query_text,
            response_text,
            model_used,
            created_at: now,
            last_hit_at: now,
            hit_count: 0,
        });
    }

    /// Remove expired entries eagerly and return how many were reclaimed.
    ///
    /// Optional space reclamation; lookup correctness never depends on it.
    pub fn sweep_expired(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let before = entries.len();
        entries.retain(|e| !self.is_expired(e, now));
        let removed = before - entries.len();
        if removed > 0 {
            info!(removed, "swept expired cache entries");
        }
        removed
    }

    /// Current entry counts and configuration snapshot.
    pub fn stats(&self) -> CacheStats {
        let now = Utc::now();
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let expired = entries.iter().filter(|e| self.is_expired(e, now)).count();
        CacheStats {
            total_entries: entries.len(),
            active_entries: entries.len() - expired,
            expired_entries: expired,
            capacity: self.config.max_cache_size,
            similarity_threshold: self.config.similarity_threshold,
            ttl_seconds: self.config.ttl_seconds,
        }
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// True when the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn cache_with(threshold: f64, capacity: usize, ttl_seconds: u64) -> SemanticCache {
        SemanticCache::new(CacheConfig {
            similarity_threshold: threshold,
            ttl_seconds,
            max_cache_size: capacity,
        })
    }

    #[test]
    fn identical_embedding_is_a_hit() {
        let cache = cache_with(0.85, 10, 3600);
        cache.insert(vec![0.1, 0.9, 0.2], "q", "cached answer", "simple-model");
        let hit = cache.lookup(&[0.1, 0.9, 0.2]).expect("hit");
        assert_eq!(hit.response_text, "cached answer");
        assert!((hit.similarity - 1.0).abs() < 1e-6);
        assert_eq!(hit.hit_count, 1);
    }

    #[test]
    fn similarity_below_threshold_is_a_miss() {
        let cache = cache_with(0.85, 10, 3600);
        cache.insert(vec![1.0, 0.0], "q", "a", "m");
        // Orthogonal probe: similarity 0.0.
        assert!(cache.lookup(&[0.0, 1.0]).is_none());
    }

    #[test]
    fn similar_enough_embedding_hits_without_exact_match() {
        let cache = cache_with(0.85, 10, 3600);
        cache.insert(vec![1.0, 0.0], "original", "a", "m");
        // cos = 1/sqrt(1.04) ~ 0.98 with a small second component.
        let hit = cache.lookup(&[1.0, 0.2]).expect("hit");
        assert!(hit.similarity >= 0.85);
        assert_eq!(hit.query_text, "original");
    }

    #[test]
    fn stricter_threshold_rejects_borderline_similarity() {
        let cache = cache_with(0.95, 10, 3600);
        cache.insert(vec![1.0, 0.0], "q", "a", "m");
        // cos ~ 0.92: above the default 0.85 but below 0.95.
        assert!(cache.lookup(&[1.0, 0.43]).is_none());
    }

    #[test]
    fn expired_entries_are_invisible_to_lookup() {
        let cache = cache_with(0.85, 10, 60);
        let created = Utc::now() - Duration::seconds(120);
        cache.insert_at(
            vec![1.0, 0.0],
            "q".into(),
            "a".into(),
            "m".into(),
            created,
        );
        assert!(cache.lookup_at(&[1.0, 0.0], Utc::now()).is_none());
        // Still stored until swept.
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.sweep_expired(), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn entry_exactly_at_ttl_is_expired() {
        let cache = cache_with(0.85, 10, 60);
        let now = Utc::now();
        cache.insert_at(
            vec![1.0, 0.0],
            "q".into(),
            "a".into(),
            "m".into(),
            now - Duration::seconds(60),
        );
        assert!(cache.lookup_at(&[1.0, 0.0], now).is_none());
    }

    #[test]
    fn capacity_eviction_removes_exactly_one_lru_entry() {
        let cache = cache_with(0.85, 2, 3600);
        let now = Utc::now();
        cache.insert_at(vec![1.0, 0.0, 0.0], "oldest".into(), "a".into(), "m".into(), now);
        cache.insert_at(
            vec![0.0, 1.0, 0.0],
            "newer".into(),
            "b".into(),
            "m".into(),
            now + Duration::seconds(1),
        );
        // Hitting "oldest" refreshes its last_hit_at, so "newer" becomes LRU.
        cache
            .lookup_at(&[1.0, 0.0, 0.0], now + Duration::seconds(2))
            .expect("hit");

        cache.insert_at(
            vec![0.0, 0.0, 1.0],
            "third".into(),
            "c".into(),
            "m".into(),
            now + Duration::seconds(3),
        );
        assert_eq!(cache.len(), 2);
        // "oldest" survived because it was recently hit; "newer" was evicted.
        assert!(cache.lookup_at(&[1.0, 0.0, 0.0], now + Duration::seconds(4)).is_some());
        assert!(cache.lookup_at(&[0.0, 1.0, 0.0], now + Duration::seconds(4)).is_none());
    }

    #[test]
    fn tie_break_prefers_most_recently_hit() {
        let cache = cache_with(0.85, 10, 3600);
        let now = Utc::now();
        cache.insert_at(vec![1.0, 0.0], "first".into(), "a1".into(), "m".into(), now);
        cache.insert_at(
            vec![1.0, 0.0],
            "second".into(),
            "a2".into(),
            "m".into(),
            now + Duration::seconds(5),
        );
        // Both entries have identical similarity 1.0; the most recently
        // touched one wins.
        let hit = cache.lookup_at(&[1.0, 0.0], now + Duration::seconds(10)).expect("hit");
        assert_eq!(hit.query_text, "second");
    }

    #[test]
    fn entry_evicted_between_scan_and_update_is_a_miss() {
        let cache = cache_with(0.85, 1, 3600);
        let now = Utc::now();
        cache.insert_at(vec![1.0, 0.0], "q".into(), "a".into(), "m".into(), now);
        // At capacity 1, the second insert evicts the first entry. Resolving
        // the first entry's id afterwards models a lookup whose best match
        // was evicted between the read scan and the write-lock re-find.
        cache.insert_at(
            vec![0.0, 1.0],
            "other".into(),
            "b".into(),
            "m".into(),
            now + Duration::seconds(1),
        );
        assert!(cache.complete_hit(0, 1.0, now + Duration::seconds(2)).is_none());
        // The surviving entry keeps its hit bookkeeping intact.
        let hit = cache
            .lookup_at(&[0.0, 1.0], now + Duration::seconds(3))
            .expect("hit");
        assert_eq!(hit.hit_count, 1);
    }

    #[test]
    fn hit_updates_metadata() {
        let cache = cache_with(0.85, 10, 3600);
        cache.insert(vec![1.0, 0.0], "q", "a", "m");
        let first = cache.lookup(&[1.0, 0.0]).expect("hit");
        let second = cache.lookup(&[1.0, 0.0]).expect("hit");
        assert_eq!(first.hit_count, 1);
        assert_eq!(second.hit_count, 2);
    }

    #[test]
    fn stats_report_expired_and_active() {
        let cache = cache_with(0.85, 10, 60);
        let now = Utc::now();
        cache.insert_at(
            vec![1.0, 0.0],
            "old".into(),
            "a".into(),
            "m".into(),
            now - Duration::seconds(120),
        );
        cache.insert_at(vec![0.0, 1.0], "fresh".into(), "b".into(), "m".into(), now);
        let stats = cache.stats();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.active_entries, 1);
        assert_eq!(stats.expired_entries, 1);
        assert_eq!(stats.capacity, 10);
    }

    proptest! {
        #[test]
        fn size_never_exceeds_capacity(
            capacity in 1usize..8,
            inserts in prop::collection::vec((0.0f32..1.0, 0.0f32..1.0), 0..40),
        ) {
            let cache = cache_with(0.99, capacity, 3600);
            for (i, (x, y)) in inserts.iter().enumerate() {
                cache.insert(vec![*x, *y], format!("q{i}"), "a", "m");
                prop_assert!(cache.len() <= capacity);
            }
        }
    }
}
