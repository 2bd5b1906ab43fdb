//! Assignment-chain linker for follow-up patterns
//!
//! A chain links an originating record (a seeded case) to a follow-up record
//! that does not exist yet (the retaliation report the case generator will
//! create later). Chains are built up front with a category, a delay, and a
//! rendered narrative fragment; the consumer fulfills each chain once the
//! follow-up record has been created.
//!
//! Fulfilling a chain twice is an error unless the caller explicitly asks to
//! overwrite, so an accidental double-link fails loudly instead of silently
//! replacing the follow-up id.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::placeholder::PlaceholderSet;
use crate::rng::SeedRng;
use crate::template::{pick_weighted, TemplateRegistry};

/// One origin → follow-up link.
#[derive(Debug, Clone)]
pub struct Chain {
    pub origin_id: String,
    pub follow_up_id: Option<String>,
    pub category: String,
    pub delay_days: i64,
    pub narrative: String,
}

impl Chain {
    pub fn is_fulfilled(&self) -> bool {
        self.follow_up_id.is_some()
    }
}

/// Aggregate view over a chain set, for run-report logging only.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainStats {
    pub total: usize,
    pub fulfilled: usize,
    pub by_category: BTreeMap<String, usize>,
    pub average_delay_days: f64,
}

/// The set of chains created for one seeding run.
#[derive(Debug, Clone)]
pub struct ChainSet {
    chains: Vec<Chain>,
    strict: bool,
}

impl ChainSet {
    /// Sample `min(target_count, |origin_ids|)` distinct origins and draw each
    /// one a category (weighted roulette over `category_weights`), a delay in
    /// `delay_range_days` (inclusive), and a narrative rendered from
    /// `registry` for the drawn category.
    pub fn build(
        rng: &mut SeedRng,
        origin_ids: &[String],
        target_count: usize,
        category_weights: &[(&str, f64)],
        registry: &TemplateRegistry,
        placeholders: &PlaceholderSet,
        delay_range_days: (i64, i64),
    ) -> Self {
        let origins = rng.sample_distinct(origin_ids, target_count);
        let weighted: Vec<(String, f64)> = category_weights
            .iter()
            .map(|(k, w)| (k.to_string(), *w))
            .collect();

        let chains = origins
            .into_iter()
            .map(|origin_id| {
                let category = pick_weighted(rng, &weighted)
                    .cloned()
                    .unwrap_or_else(|| registry.default_key().to_string());
                let delay_days = rng.random_int(delay_range_days.0, delay_range_days.1);
                let rendered = registry.render(&category, placeholders, rng);
                Chain {
                    origin_id,
                    follow_up_id: None,
                    category: rendered.category,
                    delay_days,
                    narrative: rendered.text,
                }
            })
            .collect();

        Self {
            chains,
            strict: false,
        }
    }

    /// Upgrade unknown-origin fulfillment from a no-op to a typed error.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set the follow-up id for the chain with this origin, exactly once.
    ///
    /// Returns `Ok(true)` when the chain was fulfilled, `Ok(false)` when the
    /// origin is unknown (lenient mode), `Err(ChainAlreadyFulfilled)` when the
    /// chain already carries a follow-up id.
    pub fn fulfill(&mut self, origin_id: &str, follow_up_id: &str) -> Result<bool> {
        self.fulfill_inner(origin_id, follow_up_id, false)
    }

    /// As [`ChainSet::fulfill`], but explicitly allowed to replace an existing
    /// follow-up id (correction path).
    pub fn fulfill_overwrite(&mut self, origin_id: &str, follow_up_id: &str) -> Result<bool> {
        self.fulfill_inner(origin_id, follow_up_id, true)
    }

    fn fulfill_inner(&mut self, origin_id: &str, follow_up_id: &str, overwrite: bool) -> Result<bool> {
        match self.chains.iter_mut().find(|c| c.origin_id == origin_id) {
            Some(chain) => {
                if chain.is_fulfilled() && !overwrite {
                    return Err(Error::ChainAlreadyFulfilled(origin_id.to_string()));
                }
                chain.follow_up_id = Some(follow_up_id.to_string());
                Ok(true)
            }
            None if self.strict => Err(Error::UnknownChainOrigin(origin_id.to_string())),
            None => Ok(false),
        }
    }

    /// Chains whose follow-up id is still unset.
    pub fn unfulfilled(&self) -> Vec<&Chain> {
        self.chains.iter().filter(|c| !c.is_fulfilled()).collect()
    }

    pub fn get(&self, origin_id: &str) -> Option<&Chain> {
        self.chains.iter().find(|c| c.origin_id == origin_id)
    }

    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// Per-category counts and average delay. Reporting only; no behavioral
    /// effect on the run.
    pub fn stats(&self) -> ChainStats {
        let mut by_category: BTreeMap<String, usize> = BTreeMap::new();
        let mut delay_sum = 0i64;
        for chain in &self.chains {
            *by_category.entry(chain.category.clone()).or_default() += 1;
            delay_sum += chain.delay_days;
        }
        let average_delay_days = if self.chains.is_empty() {
            0.0
        } else {
            delay_sum as f64 / self.chains.len() as f64
        };
        ChainStats {
            total: self.chains.len(),
            fulfilled: self.chains.iter().filter(|c| c.is_fulfilled()).count(),
            by_category,
            average_delay_days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> TemplateRegistry {
        TemplateRegistry::new(
            "policy_violation",
            0.40,
            &["Follow-up concern about {topic}."],
        )
        .category("demotion", 0.5, &["Sudden demotion after {topic}."])
        .category("exclusion", 0.5, &["Excluded from meetings about {topic}."])
    }

    fn placeholders() -> PlaceholderSet {
        PlaceholderSet::new().fixed("topic", &["the audit", "the report", "the review"])
    }

    fn build(seed: u64, origins: usize, target: usize) -> ChainSet {
        let ids: Vec<String> = (0..origins).map(|i| format!("case-{i}")).collect();
        let mut rng = SeedRng::new(seed);
        ChainSet::build(
            &mut rng,
            &ids,
            target,
            &[("demotion", 0.6), ("exclusion", 0.4)],
            &registry(),
            &placeholders(),
            (7, 45),
        )
    }

    #[test]
    fn build_caps_at_origin_count_and_keeps_origins_distinct() {
        let set = build(42, 4, 10);
        assert_eq!(set.len(), 4);
        let mut origins: Vec<&str> = set.chains().iter().map(|c| c.origin_id.as_str()).collect();
        origins.sort_unstable();
        origins.dedup();
        assert_eq!(origins.len(), 4);
    }

    #[test]
    fn chains_carry_category_delay_and_narrative() {
        let set = build(42, 30, 12);
        for chain in set.chains() {
            assert!(chain.category == "demotion" || chain.category == "exclusion");
            assert!((7..=45).contains(&chain.delay_days));
            assert!(!chain.narrative.contains('{'));
            assert!(!chain.narrative.is_empty());
            assert!(!chain.is_fulfilled());
        }
    }

    #[test]
    fn fulfill_removes_from_unfulfilled() {
        let mut set = build(42, 10, 5);
        let origin = set.chains()[0].origin_id.clone();
        assert_eq!(set.unfulfilled().len(), 5);

        assert!(set.fulfill(&origin, "case-f1").unwrap());
        assert_eq!(set.unfulfilled().len(), 4);
        assert!(set.unfulfilled().iter().all(|c| c.origin_id != origin));
        assert_eq!(
            set.get(&origin).unwrap().follow_up_id.as_deref(),
            Some("case-f1")
        );
    }

    #[test]
    fn double_fulfill_fails_loudly() {
        let mut set = build(42, 10, 5);
        let origin = set.chains()[0].origin_id.clone();
        set.fulfill(&origin, "case-f1").unwrap();
        match set.fulfill(&origin, "case-f2") {
            Err(Error::ChainAlreadyFulfilled(id)) => assert_eq!(id, origin),
            other => panic!("expected ChainAlreadyFulfilled, got {other:?}"),
        }
        // Original link untouched.
        assert_eq!(
            set.get(&origin).unwrap().follow_up_id.as_deref(),
            Some("case-f1")
        );
    }

    #[test]
    fn overwrite_is_the_explicit_escape_hatch() {
        let mut set = build(42, 10, 5);
        let origin = set.chains()[0].origin_id.clone();
        set.fulfill(&origin, "case-f1").unwrap();
        assert!(set.fulfill_overwrite(&origin, "case-f2").unwrap());
        assert_eq!(
            set.get(&origin).unwrap().follow_up_id.as_deref(),
            Some("case-f2")
        );
    }

    #[test]
    fn unknown_origin_lenient_vs_strict() {
        let mut set = build(42, 10, 5);
        assert!(!set.fulfill("ghost", "x").unwrap());

        let mut strict = build(42, 10, 5).strict(true);
        match strict.fulfill("ghost", "x") {
            Err(Error::UnknownChainOrigin(id)) => assert_eq!(id, "ghost"),
            other => panic!("expected UnknownChainOrigin, got {other:?}"),
        }
    }

    #[test]
    fn stats_aggregate_counts_and_delay() {
        let mut set = build(42, 20, 8);
        let origin = set.chains()[0].origin_id.clone();
        set.fulfill(&origin, "f").unwrap();

        let stats = set.stats();
        assert_eq!(stats.total, 8);
        assert_eq!(stats.fulfilled, 1);
        assert_eq!(stats.by_category.values().sum::<usize>(), 8);
        assert!((7.0..=45.0).contains(&stats.average_delay_days));
    }

    #[test]
    fn empty_stats_do_not_divide_by_zero() {
        let set = build(42, 0, 5);
        let stats = set.stats();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.average_delay_days, 0.0);
    }

    #[test]
    fn build_is_reproducible() {
        let snapshot = |seed: u64| {
            build(seed, 30, 12)
                .chains()
                .iter()
                .map(|c| {
                    (
                        c.origin_id.clone(),
                        c.category.clone(),
                        c.delay_days,
                        c.narrative.clone(),
                    )
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(snapshot(42), snapshot(42));
        assert_ne!(snapshot(42), snapshot(43));
    }
}
