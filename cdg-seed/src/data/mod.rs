//! Static demo vocabulary
//!
//! Declarative tables the seeders draw from. Everything here is data; the
//! selection logic lives in `cdg_common` and the seeders.

pub mod templates;

/// Demo tenants.
pub const ORGS: &[(&str, &str, &str)] = &[
    ("meridian-health", "Meridian Health Systems", "healthcare"),
    ("northwind-industrial", "Northwind Industrial Group", "manufacturing"),
];

pub const DEPARTMENTS: &[&str] = &[
    "Finance",
    "Human Resources",
    "Engineering",
    "Sales",
    "Operations",
    "Legal",
    "Procurement",
    "Customer Support",
];

pub const LOCATIONS: &[&str] = &[
    "Chicago",
    "Austin",
    "Denver",
    "Toronto",
    "Manchester",
    "Singapore",
];

pub const FIRST_NAMES: &[&str] = &[
    "Ava", "Liam", "Maya", "Noah", "Priya", "Diego", "Elena", "Marcus", "Ingrid", "Tomas",
    "Amara", "Felix", "Nadia", "Oscar", "Lena", "Ravi", "Sofia", "Jonas", "Wei", "Camille",
    "Hassan", "Greta", "Mateo", "Yuki",
];

pub const LAST_NAMES: &[&str] = &[
    "Alvarez", "Bennett", "Chen", "Dubois", "Eriksson", "Fontaine", "Gupta", "Hoffman",
    "Ibrahim", "Jensen", "Kowalski", "Larsen", "Marino", "Nguyen", "Okafor", "Petrov",
    "Quinn", "Rossi", "Santos", "Tanaka", "Ueda", "Vargas", "Weber", "Zhang",
];

pub const MANAGER_TITLES: &[&str] = &[
    "Director",
    "Senior Manager",
    "Regional Manager",
    "Department Head",
];

pub const STAFF_TITLES: &[&str] = &[
    "Analyst",
    "Senior Analyst",
    "Specialist",
    "Coordinator",
    "Associate",
    "Team Lead",
];

/// Weighted risk tiers; most employees sit in the low tier.
pub const RISK_TIERS: &[(&str, f64)] = &[("low", 0.6), ("medium", 0.3), ("high", 0.1)];

/// Case category distribution used for generated cases and pool affinities.
pub const CASE_CATEGORIES: &[(&str, f64)] = &[
    ("harassment", 0.22),
    ("policy_violation", 0.20),
    ("fraud", 0.15),
    ("conflict_of_interest", 0.12),
    ("retaliation", 0.10),
    ("safety", 0.09),
    ("discrimination", 0.07),
    ("data_privacy", 0.05),
];

/// Categories the repeat-subject pool prefers when drawing affinity tags.
pub const PREFERRED_PATTERN_CATEGORIES: &[&str] = &["harassment", "retaliation", "policy_violation"];

pub const KB_ARTICLES: &[(&str, &str)] = &[
    ("policy_violation", "Understanding Our Code of Conduct"),
    ("policy_violation", "When and How to Report a Concern"),
    ("policy_violation", "What Happens After You File a Report"),
    ("harassment", "Recognizing Workplace Harassment"),
    ("harassment", "Bystander Intervention Basics"),
    ("harassment", "Respectful Communication Guidelines"),
    ("retaliation", "Your Protection Against Retaliation"),
    ("retaliation", "Signs of Retaliatory Behavior"),
    ("fraud", "Expense Reporting Red Flags"),
    ("fraud", "Procurement Fraud Awareness"),
    ("fraud", "Financial Controls Every Manager Should Know"),
    ("conflict_of_interest", "Declaring a Conflict of Interest"),
    ("conflict_of_interest", "Outside Employment Guidelines"),
    ("conflict_of_interest", "Gifts and Entertainment Limits"),
    ("safety", "Incident Reporting Requirements"),
    ("safety", "Workplace Safety Walkthroughs"),
    ("discrimination", "Fair Hiring Practices"),
    ("discrimination", "Accommodations Request Process"),
    ("data_privacy", "Handling Personal Data Requests"),
    ("data_privacy", "Data Classification Quick Reference"),
    ("data_privacy", "Responding to a Suspected Data Breach"),
    ("policy_violation", "Social Media Guidelines for Employees"),
    ("harassment", "Manager Responsibilities in Harassment Cases"),
    ("fraud", "Third-Party Due Diligence Checklist"),
    ("conflict_of_interest", "Board Service and Investments"),
    ("safety", "Contractor Safety Orientation"),
    ("discrimination", "Pay Equity Review Process"),
    ("data_privacy", "Records Retention Schedules"),
    ("policy_violation", "Anti-Bribery and Corruption Basics"),
    ("retaliation", "Case Study: Anonymous Reporting Done Right"),
];

pub const KB_TAGS: &[&str] = &[
    "training",
    "managers",
    "new-hires",
    "quick-reference",
    "required-reading",
    "investigations",
    "hotline",
    "faq",
];

pub const POLICY_TOPICS: &[(&str, &str)] = &[
    ("code-of-conduct", "Code of Conduct"),
    ("anti-harassment", "Anti-Harassment Policy"),
    ("anti-retaliation", "Anti-Retaliation Policy"),
    ("gifts-entertainment", "Gifts and Entertainment Policy"),
    ("conflict-of-interest", "Conflict of Interest Policy"),
    ("whistleblower", "Whistleblower Protection Policy"),
    ("data-privacy", "Data Privacy Policy"),
    ("workplace-safety", "Workplace Safety Policy"),
    ("anti-bribery", "Anti-Bribery and Corruption Policy"),
    ("travel-expense", "Travel and Expense Policy"),
];

/// Fixed translation language set: code plus a canned lead-in used to mark the
/// translated body in demo data.
pub const LANGUAGES: &[(&str, &str)] = &[
    ("es", "Traducción al español"),
    ("fr", "Traduction française"),
    ("de", "Deutsche Übersetzung"),
];

pub const POLICY_STATUSES: &[(&str, f64)] = &[
    ("published", 0.75),
    ("draft", 0.15),
    ("archived", 0.10),
];

pub const CASE_STATUSES: &[(&str, f64)] = &[
    ("open", 0.35),
    ("investigating", 0.30),
    ("closed", 0.35),
];

pub const ACTIVITY_ACTIONS: &[(&str, f64)] = &[
    ("viewed", 0.40),
    ("updated", 0.15),
    ("commented", 0.15),
    ("exported", 0.08),
    ("assigned", 0.10),
    ("status_changed", 0.12),
];

pub const ACTIVITY_ENTITY_TYPES: &[&str] = &["case", "policy", "kb_article", "disclosure"];

pub const DISCLOSURE_TYPES: &[(&str, f64)] = &[
    ("conflict_of_interest", 0.35),
    ("gift", 0.30),
    ("outside_employment", 0.20),
    ("financial_interest", 0.15),
];

pub const DISCLOSURE_STATUSES: &[(&str, f64)] = &[
    ("submitted", 0.20),
    ("under_review", 0.25),
    ("approved", 0.40),
    ("denied", 0.10),
    ("expired", 0.05),
];

/// URL-safe slug: lowercase, runs of non-alphanumerics collapsed to single
/// hyphens, trimmed at both ends.
pub fn slugify(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_hyphen = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_basic() {
        assert_eq!(slugify("Understanding Our Code of Conduct"), "understanding-our-code-of-conduct");
        assert_eq!(slugify("  Gifts & Entertainment!  "), "gifts-entertainment");
        assert_eq!(slugify("already-fine"), "already-fine");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn kb_titles_slugify_uniquely() {
        let mut slugs: Vec<String> = KB_ARTICLES.iter().map(|(_, t)| slugify(t)).collect();
        let total = slugs.len();
        slugs.sort();
        slugs.dedup();
        assert_eq!(slugs.len(), total, "duplicate kb article slugs");
    }

    #[test]
    fn weighted_tables_have_positive_weights() {
        for (name, table) in [
            ("RISK_TIERS", RISK_TIERS),
            ("CASE_CATEGORIES", CASE_CATEGORIES),
            ("POLICY_STATUSES", POLICY_STATUSES),
            ("CASE_STATUSES", CASE_STATUSES),
            ("ACTIVITY_ACTIONS", ACTIVITY_ACTIONS),
            ("DISCLOSURE_TYPES", DISCLOSURE_TYPES),
            ("DISCLOSURE_STATUSES", DISCLOSURE_STATUSES),
        ] {
            assert!(
                table.iter().all(|(_, w)| *w > 0.0),
                "{name} has a non-positive weight"
            );
        }
    }
}
