//! Weighted template selection
//!
//! A [`TemplateRegistry`] maps a canonical category key to a set of narrative
//! templates plus a category-level scalar rate (the seeders use it as the
//! suggested anonymity rate for generated reports). Lookup of an unknown
//! category falls back to the registry's default category instead of failing,
//! so adding data for a new category name can never break a batch run.

use std::collections::BTreeMap;

use crate::placeholder::PlaceholderSet;
use crate::rng::SeedRng;

/// One candidate text fragment. `weight` defaults to 1.0; equal weights give
/// the uniform selection the seeders use, unequal weights give roulette
/// selection for callers that want skew.
#[derive(Debug, Clone)]
pub struct Template {
    pub text: String,
    pub weight: f64,
}

impl Template {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            weight: 1.0,
        }
    }

    pub fn weighted(text: &str, weight: f64) -> Self {
        Self {
            text: text.to_string(),
            weight,
        }
    }
}

/// Templates plus the category-level scalar rate.
#[derive(Debug, Clone)]
pub struct CategorySpec {
    pub rate: f64,
    pub templates: Vec<Template>,
}

/// Result of a render: the resolved category key, the expanded narrative text,
/// and the category's rate. Returned together so callers never re-look-up the
/// category.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedNarrative {
    pub category: String,
    pub text: String,
    pub rate: f64,
}

/// Canonical form of a category key: ASCII-lowercased, with every run of
/// characters outside `[a-z0-9_]` collapsed to a single `_`.
///
/// `"Retaliation!!"` becomes `"retaliation_"`; an empty or all-punctuation key
/// normalizes to a string the registry will miss on, which resolves to the
/// default category rather than an empty-string lookup.
pub fn canonical_key(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut last_was_filler = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            out.push(ch.to_ascii_lowercase());
            last_was_filler = false;
        } else if !last_was_filler {
            out.push('_');
            last_was_filler = true;
        }
    }
    out
}

/// Cumulative-probability roulette over `(item, weight)` pairs.
///
/// Non-positive weights are skipped. If floating-point rounding leaves the
/// wheel short, the last weighted entry wins, so a non-empty input always
/// yields a result.
pub fn pick_weighted<'a, T>(rng: &mut SeedRng, entries: &'a [(T, f64)]) -> Option<&'a T> {
    let total: f64 = entries.iter().map(|(_, w)| w.max(0.0)).sum();
    if total <= 0.0 {
        return entries.last().map(|(item, _)| item);
    }

    let mut roll = rng.unit() * total;
    let mut last = None;
    for (item, weight) in entries {
        if *weight <= 0.0 {
            continue;
        }
        last = Some(item);
        if roll < *weight {
            return Some(item);
        }
        roll -= weight;
    }
    last
}

/// Registry mapping canonical category key to [`CategorySpec`].
///
/// Constructed with its default category, so fallback can never miss.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    default_key: String,
    categories: BTreeMap<String, CategorySpec>,
}

impl TemplateRegistry {
    /// Build a registry whose default category is `default_key`. The default
    /// spec is registered immediately; additional categories are added with
    /// [`TemplateRegistry::category`].
    pub fn new(default_key: &str, default_rate: f64, default_templates: &[&str]) -> Self {
        let key = canonical_key(default_key);
        let mut categories = BTreeMap::new();
        categories.insert(
            key.clone(),
            CategorySpec {
                rate: default_rate,
                templates: default_templates.iter().map(|t| Template::new(t)).collect(),
            },
        );
        Self {
            default_key: key,
            categories,
        }
    }

    /// Register a category with uniform-weight templates.
    pub fn category(mut self, key: &str, rate: f64, templates: &[&str]) -> Self {
        self.categories.insert(
            canonical_key(key),
            CategorySpec {
                rate,
                templates: templates.iter().map(|t| Template::new(t)).collect(),
            },
        );
        self
    }

    /// Register a category with explicit per-template weights.
    pub fn category_weighted(mut self, key: &str, rate: f64, templates: Vec<Template>) -> Self {
        self.categories
            .insert(canonical_key(key), CategorySpec { rate, templates });
        self
    }

    pub fn default_key(&self) -> &str {
        &self.default_key
    }

    /// Resolve a raw key to `(canonical key, spec)`, falling back to the
    /// default category when the key is unknown.
    pub fn resolve(&self, raw_key: &str) -> (&str, &CategorySpec) {
        let key = canonical_key(raw_key);
        match self.categories.get_key_value(&key) {
            Some((k, spec)) => (k.as_str(), spec),
            None => {
                let spec = self
                    .categories
                    .get(&self.default_key)
                    .unwrap_or_else(|| unreachable!("default category registered in new()"));
                (self.default_key.as_str(), spec)
            }
        }
    }

    /// Pick a template for the category (roulette over template weights) and
    /// expand its placeholders. Returns the resolved category, text, and rate
    /// together.
    pub fn render(
        &self,
        raw_key: &str,
        placeholders: &PlaceholderSet,
        rng: &mut SeedRng,
    ) -> RenderedNarrative {
        let (key, spec) = self.resolve(raw_key);
        let weighted: Vec<(&Template, f64)> =
            spec.templates.iter().map(|t| (t, t.weight)).collect();
        let text = match pick_weighted(rng, &weighted) {
            Some(template) => placeholders.expand(&template.text, rng),
            None => String::new(),
        };
        RenderedNarrative {
            category: key.to_string(),
            text,
            rate: spec.rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> TemplateRegistry {
        TemplateRegistry::new("policy_violation", 0.40, &["Policy concern raised."])
            .category("harassment", 0.55, &["Harassment report filed."])
            .category("retaliation_", 0.62, &["Retaliation concern."])
    }

    #[test]
    fn canonical_key_lowercases_and_collapses() {
        assert_eq!(canonical_key("Retaliation!!"), "retaliation_");
        assert_eq!(canonical_key("Code of Conduct"), "code_of_conduct");
        assert_eq!(canonical_key("gifts&entertainment"), "gifts_entertainment");
        assert_eq!(canonical_key("already_fine_1"), "already_fine_1");
    }

    #[test]
    fn canonical_key_unicode_and_empty() {
        assert_eq!(canonical_key(""), "");
        assert_eq!(canonical_key("!!!"), "_");
        assert_eq!(canonical_key("héläs"), "h_l_s");
        assert_eq!(canonical_key("日本語"), "_");
    }

    #[test]
    fn unknown_key_falls_back_to_default() {
        let reg = registry();
        let (key, spec) = reg.resolve("no_such_category");
        assert_eq!(key, "policy_violation");
        assert_eq!(spec.rate, 0.40);
    }

    #[test]
    fn empty_key_falls_back_to_default() {
        let reg = registry();
        let (key, _) = reg.resolve("");
        assert_eq!(key, "policy_violation");
        let (key, _) = reg.resolve("!!!");
        assert_eq!(key, "policy_violation");
    }

    #[test]
    fn punctuated_key_resolves_to_its_normalized_category() {
        let reg = registry();
        let (key, spec) = reg.resolve("Retaliation!!");
        assert_eq!(key, "retaliation_");
        assert_eq!(spec.rate, 0.62);
    }

    #[test]
    fn render_returns_rate_with_text() {
        let reg = registry();
        let mut rng = SeedRng::new(42);
        let out = reg.render("harassment", &PlaceholderSet::new(), &mut rng);
        assert_eq!(out.category, "harassment");
        assert_eq!(out.rate, 0.55);
        assert_eq!(out.text, "Harassment report filed.");
    }

    #[test]
    fn render_is_reproducible() {
        let reg = TemplateRegistry::new("d", 0.1, &["a", "b", "c", "d", "e"]);
        let a: Vec<String> = {
            let mut rng = SeedRng::new(42);
            (0..20)
                .map(|_| reg.render("d", &PlaceholderSet::new(), &mut rng).text)
                .collect()
        };
        let b: Vec<String> = {
            let mut rng = SeedRng::new(42);
            (0..20)
                .map(|_| reg.render("d", &PlaceholderSet::new(), &mut rng).text)
                .collect()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn pick_weighted_skips_non_positive_and_always_yields() {
        let mut rng = SeedRng::new(5);
        let entries = [("never", 0.0), ("always", 1.0)];
        for _ in 0..50 {
            assert_eq!(pick_weighted(&mut rng, &entries), Some(&"always"));
        }
        // All-zero weights still resolve to the last entry rather than None.
        let zeros = [("a", 0.0), ("b", 0.0)];
        assert_eq!(pick_weighted(&mut rng, &zeros), Some(&"b"));
        let empty: [(&str, f64); 0] = [];
        assert_eq!(pick_weighted(&mut rng, &empty), None);
    }

    #[test]
    fn pick_weighted_respects_skew() {
        let mut rng = SeedRng::new(7);
        let entries = [("rare", 1.0), ("common", 9.0)];
        let mut common = 0;
        for _ in 0..1000 {
            if pick_weighted(&mut rng, &entries) == Some(&"common") {
                common += 1;
            }
        }
        assert!(common > 800, "expected heavy skew, got {common}/1000");
    }
}
