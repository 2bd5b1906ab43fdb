//! Pool/quota assignment tracker
//!
//! Distributes a stream of assignment opportunities (cases being generated)
//! across a fixed pool of entities (repeat-subject employees, hotspot
//! managers), respecting each entry's quota. Selection is greedy first-match:
//! given an affinity tag, the first non-exhausted entry carrying that tag
//! wins; otherwise the first non-exhausted entry in pool order. No
//! backtracking, no load balancing.
//!
//! Mutations are lenient by default (unknown ids are ignored) so a best-effort
//! batch run never aborts over bookkeeping; strict mode upgrades them to typed
//! errors for callers that need the validation.

use crate::error::{Error, Result};
use crate::rng::SeedRng;

/// Chance that an affinity tag is drawn from the preferred subset rather than
/// the full universe. Clusters affinities realistically without making them
/// exclusive.
const PREFERRED_TAG_BIAS: f64 = 0.6;

/// One pool member: an entity id with a bounded assignment quota.
#[derive(Debug, Clone)]
pub struct PoolEntry {
    pub id: String,
    pub target_quota: u32,
    pub assigned: u32,
    pub affinities: Vec<String>,
}

impl PoolEntry {
    pub fn is_exhausted(&self) -> bool {
        self.assigned >= self.target_quota
    }

    pub fn remaining(&self) -> u32 {
        self.target_quota.saturating_sub(self.assigned)
    }
}

/// Fixed pool of quota-bounded entries, built once per seeding run.
#[derive(Debug, Clone)]
pub struct AssignmentPool {
    entries: Vec<PoolEntry>,
    strict: bool,
}

impl AssignmentPool {
    /// Select `min(pool_size, |candidates|)` distinct ids without replacement,
    /// each with a quota drawn uniformly from `quota_range` (inclusive) and an
    /// assignment count of zero. No affinity tags are attached.
    pub fn build(
        rng: &mut SeedRng,
        candidate_ids: &[String],
        pool_size: usize,
        quota_range: (u32, u32),
    ) -> Self {
        Self::build_with_affinities(rng, candidate_ids, pool_size, quota_range, &[], &[])
    }

    /// As [`AssignmentPool::build`], additionally attaching 1-3 affinity tags
    /// per entry. Each tag is drawn from `preferred_tags` with probability 0.6
    /// and from `all_tags` otherwise, so affinities cluster around the
    /// preferred subset without being limited to it.
    pub fn build_with_affinities(
        rng: &mut SeedRng,
        candidate_ids: &[String],
        pool_size: usize,
        quota_range: (u32, u32),
        preferred_tags: &[&str],
        all_tags: &[&str],
    ) -> Self {
        let members = rng.sample_distinct(candidate_ids, pool_size);
        let entries = members
            .into_iter()
            .map(|id| {
                let target_quota =
                    rng.random_int(quota_range.0 as i64, quota_range.1 as i64) as u32;
                let affinities = draw_affinities(rng, preferred_tags, all_tags);
                PoolEntry {
                    id,
                    target_quota,
                    assigned: 0,
                    affinities,
                }
            })
            .collect();
        Self {
            entries,
            strict: false,
        }
    }

    /// Upgrade unknown-id mutations from silent no-ops to typed errors.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// First non-exhausted entry whose affinities include `affinity` (when
    /// given), else the first non-exhausted entry in pool order. `None` once
    /// every entry is at quota.
    pub fn request_assignment(&self, affinity: Option<&str>) -> Option<&PoolEntry> {
        if let Some(tag) = affinity {
            if let Some(entry) = self
                .entries
                .iter()
                .find(|e| !e.is_exhausted() && e.affinities.iter().any(|a| a == tag))
            {
                return Some(entry);
            }
        }
        self.entries.iter().find(|e| !e.is_exhausted())
    }

    /// Record one assignment against `id`. Returns whether the assignment was
    /// recorded: `Ok(false)` when the entry is already at quota (the
    /// assignment is dropped) or, in lenient mode, when the id is unknown.
    /// Unknown ids are an error in strict mode; callers are expected to pass
    /// an id obtained from [`AssignmentPool::request_assignment`].
    pub fn mark_assigned(&mut self, id: &str) -> Result<bool> {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                // Quota invariant: never step past the target.
                if entry.is_exhausted() {
                    return Ok(false);
                }
                entry.assigned += 1;
                Ok(true)
            }
            None if self.strict => Err(Error::UnknownPoolMember(id.to_string())),
            None => Ok(false),
        }
    }

    pub fn is_member(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Remaining quota for `id`; 0 for unknown ids.
    pub fn remaining_quota(&self, id: &str) -> u32 {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.remaining())
            .unwrap_or(0)
    }

    /// Sum of all target quotas.
    pub fn total_capacity(&self) -> u32 {
        self.entries.iter().map(|e| e.target_quota).sum()
    }

    /// Sum of remaining slots across all entries.
    pub fn remaining_capacity(&self) -> u32 {
        self.entries.iter().map(|e| e.remaining()).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PoolEntry] {
        &self.entries
    }
}

fn draw_affinities(rng: &mut SeedRng, preferred: &[&str], all: &[&str]) -> Vec<String> {
    if all.is_empty() && preferred.is_empty() {
        return Vec::new();
    }
    let count = rng.random_int(1, 3) as usize;
    let mut tags: Vec<String> = Vec::with_capacity(count);
    for _ in 0..count {
        let source = if !preferred.is_empty() && (all.is_empty() || rng.chance(PREFERRED_TAG_BIAS))
        {
            preferred
        } else {
            all
        };
        if let Some(tag) = rng.pick(source) {
            let tag = tag.to_string();
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("emp-{i}")).collect()
    }

    #[test]
    fn build_caps_pool_size_at_candidates() {
        let mut rng = SeedRng::new(42);
        let pool = AssignmentPool::build(&mut rng, &ids(3), 10, (2, 5));
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn members_are_distinct() {
        let mut rng = SeedRng::new(42);
        let pool = AssignmentPool::build(&mut rng, &ids(20), 8, (2, 5));
        let mut members: Vec<&str> = pool.entries().iter().map(|e| e.id.as_str()).collect();
        members.sort_unstable();
        members.dedup();
        assert_eq!(members.len(), 8);
    }

    #[test]
    fn quotas_fall_in_range() {
        let mut rng = SeedRng::new(42);
        let pool = AssignmentPool::build(&mut rng, &ids(30), 30, (2, 5));
        for entry in pool.entries() {
            assert!((2..=5).contains(&entry.target_quota));
            assert_eq!(entry.assigned, 0);
        }
    }

    #[test]
    fn exhaustion_after_exactly_total_capacity() {
        // Five members with fixed quota 2: exactly 10 grants, then the
        // sentinel.
        let mut rng = SeedRng::new(42);
        let mut pool = AssignmentPool::build(&mut rng, &ids(5), 5, (2, 2));
        assert_eq!(pool.total_capacity(), 10);

        let mut granted = 0;
        while let Some(entry) = pool.request_assignment(None) {
            let id = entry.id.clone();
            pool.mark_assigned(&id).unwrap();
            granted += 1;
            assert!(granted <= 10, "pool granted past its capacity");
        }
        assert_eq!(granted, 10);
        assert!(pool.request_assignment(None).is_none());
        assert_eq!(pool.remaining_capacity(), 0);
    }

    #[test]
    fn quota_invariant_holds_throughout() {
        let mut rng = SeedRng::new(7);
        let mut pool = AssignmentPool::build(&mut rng, &ids(6), 6, (1, 4));
        while let Some(entry) = pool.request_assignment(None) {
            assert!(!entry.is_exhausted());
            let id = entry.id.clone();
            pool.mark_assigned(&id).unwrap();
            for e in pool.entries() {
                assert!(e.assigned <= e.target_quota);
            }
        }
    }

    #[test]
    fn affinity_prefers_first_matching_entry() {
        let mut rng = SeedRng::new(42);
        let mut pool = AssignmentPool::build(&mut rng, &ids(3), 3, (1, 1));
        // Hand the second entry a tag; first-match on the tag must skip the
        // first entry even though it has remaining quota.
        pool.entries[1].affinities = vec!["fraud".to_string()];
        let picked = pool.request_assignment(Some("fraud")).unwrap();
        assert_eq!(picked.id, pool.entries[1].id);
    }

    #[test]
    fn affinity_miss_falls_back_to_pool_order() {
        let mut rng = SeedRng::new(42);
        let pool = AssignmentPool::build(&mut rng, &ids(3), 3, (1, 1));
        let picked = pool.request_assignment(Some("no_such_tag")).unwrap();
        assert_eq!(picked.id, pool.entries()[0].id);
    }

    #[test]
    fn mark_assigned_reports_dropped_assignment_at_quota() {
        let mut rng = SeedRng::new(42);
        let mut pool = AssignmentPool::build(&mut rng, &ids(1), 1, (1, 1));
        let id = pool.entries()[0].id.clone();

        assert!(pool.mark_assigned(&id).unwrap());
        // A direct second mark against the exhausted entry is dropped and
        // signaled, not silently swallowed.
        assert!(!pool.mark_assigned(&id).unwrap());
        assert_eq!(pool.entries()[0].assigned, 1);
    }

    #[test]
    fn unknown_id_is_noop_when_lenient() {
        let mut rng = SeedRng::new(42);
        let mut pool = AssignmentPool::build(&mut rng, &ids(2), 2, (1, 1));
        assert!(!pool.mark_assigned("ghost").unwrap());
        assert_eq!(pool.remaining_capacity(), 2);
    }

    #[test]
    fn unknown_id_errors_when_strict() {
        let mut rng = SeedRng::new(42);
        let mut pool = AssignmentPool::build(&mut rng, &ids(2), 2, (1, 1)).strict(true);
        match pool.mark_assigned("ghost") {
            Err(Error::UnknownPoolMember(id)) => assert_eq!(id, "ghost"),
            other => panic!("expected UnknownPoolMember, got {other:?}"),
        }
    }

    #[test]
    fn read_queries_are_lenient_for_unknown_ids() {
        let mut rng = SeedRng::new(42);
        let pool = AssignmentPool::build(&mut rng, &ids(2), 2, (3, 3));
        assert!(!pool.is_member("ghost"));
        assert_eq!(pool.remaining_quota("ghost"), 0);
        let known = &pool.entries()[0].id;
        assert!(pool.is_member(known));
        assert_eq!(pool.remaining_quota(known), 3);
    }

    #[test]
    fn affinity_tags_attach_one_to_three() {
        let mut rng = SeedRng::new(42);
        let preferred = ["fraud", "harassment"];
        let all = ["fraud", "harassment", "safety", "gifts", "privacy"];
        let pool = AssignmentPool::build_with_affinities(
            &mut rng,
            &ids(20),
            20,
            (2, 5),
            &preferred,
            &all,
        );
        for entry in pool.entries() {
            assert!((1..=3).contains(&entry.affinities.len()));
        }
        // The 60/40 bias should leave preferred tags clearly over-represented.
        let preferred_hits = pool
            .entries()
            .iter()
            .flat_map(|e| e.affinities.iter())
            .filter(|t| preferred.contains(&t.as_str()))
            .count();
        let total: usize = pool.entries().iter().map(|e| e.affinities.len()).sum();
        assert!(preferred_hits * 2 > total, "{preferred_hits}/{total}");
    }

    #[test]
    fn build_is_reproducible() {
        let snapshot = |seed: u64| {
            let mut rng = SeedRng::new(seed);
            let pool = AssignmentPool::build(&mut rng, &ids(30), 10, (2, 5));
            pool.entries()
                .iter()
                .map(|e| (e.id.clone(), e.target_quota))
                .collect::<Vec<_>>()
        };
        assert_eq!(snapshot(42), snapshot(42));
    }
}
