//! Narrative template registries and placeholder values
//!
//! Templates use `{token}` placeholders resolved by `cdg_common::placeholder`.
//! Category rates are the suggested anonymity rates surfaced on generated
//! cases.

use chrono::{DateTime, Duration, Utc};

use cdg_common::placeholder::PlaceholderSet;
use cdg_common::template::TemplateRegistry;

/// Shared placeholder vocabulary for every narrative template. `anchor` is the
/// run's reference time; relative-date tokens count back from it so a fixed
/// seed and anchor reproduce identical text.
pub fn narrative_placeholders(anchor: DateTime<Utc>) -> PlaceholderSet {
    PlaceholderSet::new()
        .fixed(
            "subject_role",
            &[
                "a direct supervisor",
                "a coworker",
                "a senior manager",
                "a contractor",
                "a vendor representative",
                "a team lead",
            ],
        )
        .fixed(
            "department",
            &[
                "Finance",
                "Human Resources",
                "Engineering",
                "Sales",
                "Operations",
                "Procurement",
            ],
        )
        .fixed(
            "communication_channel",
            &["email", "a team meeting", "a private message", "a hallway conversation"],
        )
        .fixed(
            "frequency",
            &["repeatedly", "on several occasions", "twice in the past month", "almost weekly"],
        )
        .fixed(
            "policy_area",
            &[
                "expense reporting",
                "gift acceptance",
                "data handling",
                "safety procedures",
                "hiring practices",
            ],
        )
        .dynamic("date_reference", move |rng| {
            let days_ago = rng.random_int(1, 30);
            (anchor - Duration::days(days_ago)).format("%B %-d").to_string()
        })
        .dynamic("amount", |rng| format!("${}", rng.random_int(50, 2500)))
}

/// Case narrative registry. Default category is `policy_violation`.
pub fn case_registry() -> TemplateRegistry {
    TemplateRegistry::new(
        "policy_violation",
        0.40,
        &[
            "Employee observed {subject_role} disregarding {policy_area} rules {frequency}.",
            "A concern about {policy_area} in {department} was raised on {date_reference}.",
            "Reported that {subject_role} bypassed required approvals via {communication_channel}.",
        ],
    )
    .category(
        "harassment",
        0.55,
        &[
            "Reported unwelcome comments from {subject_role} during {communication_channel} on {date_reference}.",
            "Employee described {frequency} demeaning remarks from {subject_role} in {department}.",
            "A hostile exchange with {subject_role} was reported following {communication_channel}.",
        ],
    )
    .category(
        "retaliation",
        0.62,
        &[
            "Employee believes schedule changes since {date_reference} are linked to an earlier report.",
            "After raising a concern, the reporter was excluded from {department} meetings {frequency}.",
            "Performance criticism from {subject_role} escalated shortly after a hotline report.",
        ],
    )
    .category(
        "fraud",
        0.48,
        &[
            "Irregular {policy_area} entries totaling {amount} were flagged in {department}.",
            "Suspected falsified invoices involving {subject_role} surfaced on {date_reference}.",
            "Duplicate reimbursement claims of {amount} were reported through {communication_channel}.",
        ],
    )
    .category(
        "conflict_of_interest",
        0.35,
        &[
            "Undisclosed relationship between {subject_role} and a supplier was reported in {department}.",
            "Employee reported that {subject_role} steered a contract to a relative on {date_reference}.",
        ],
    )
    .category(
        "safety",
        0.30,
        &[
            "A near-miss incident in {department} on {date_reference} went unreported by {subject_role}.",
            "Blocked exits and missing equipment checks were reported {frequency}.",
        ],
    )
    .category(
        "discrimination",
        0.58,
        &[
            "Employee reported biased assignment decisions by {subject_role} in {department}.",
            "Concerns about unequal treatment after {date_reference} were raised via {communication_channel}.",
        ],
    )
    .category(
        "data_privacy",
        0.33,
        &[
            "Customer records were shared over {communication_channel} contrary to {policy_area} rules.",
            "Employee reported {subject_role} exporting personal data on {date_reference}.",
        ],
    )
}

/// Retaliation follow-up categories with roulette weights.
pub const RETALIATION_CATEGORIES: &[(&str, f64)] = &[
    ("demotion", 0.20),
    ("exclusion", 0.30),
    ("schedule_change", 0.25),
    ("negative_review", 0.15),
    ("termination_threat", 0.10),
];

/// Follow-up narrative registry for retaliation chains. Default category is
/// `exclusion`.
pub fn retaliation_registry() -> TemplateRegistry {
    TemplateRegistry::new(
        "exclusion",
        0.70,
        &[
            "Reporter was removed from {department} planning meetings after {date_reference}.",
            "Invitations from {subject_role} stopped {frequency} following the original report.",
        ],
    )
    .category(
        "demotion",
        0.72,
        &[
            "Reporter was reassigned to a lesser role by {subject_role} on {date_reference}.",
            "Title and responsibilities were reduced without documented cause in {department}.",
        ],
    )
    .category(
        "schedule_change",
        0.65,
        &[
            "Shifts were moved to undesirable hours {frequency} after the report.",
            "Approved time off was revoked by {subject_role} on {date_reference}.",
        ],
    )
    .category(
        "negative_review",
        0.60,
        &[
            "An unexpectedly negative review cited vague {policy_area} concerns.",
            "Performance rating dropped two levels with no interim feedback from {subject_role}.",
        ],
    )
    .category(
        "termination_threat",
        0.80,
        &[
            "Reporter was told via {communication_channel} that their position was at risk.",
            "{subject_role} referenced restructuring while discussing the reporter's future.",
        ],
    )
}

/// Knowledge-base article paragraphs; 2-3 are joined per article body.
pub const KB_BODY_TEMPLATES: &[&str] = &[
    "This guide explains how {policy_area} expectations apply to day-to-day work in {department}.",
    "If you observe a concern, report it promptly; most reports in this area arrive within days of an incident like the one on {date_reference}.",
    "Managers should document conversations held over {communication_channel} and escalate unresolved issues.",
    "Questions about edge cases, including amounts near {amount}, belong with the compliance team.",
    "Retaliation for good-faith reporting is prohibited; protections apply from the moment a report is filed.",
    "Training on this topic is refreshed annually and tracked for every {department} employee.",
];

/// Policy body paragraphs; joined per document.
pub const POLICY_BODY_TEMPLATES: &[&str] = &[
    "This policy establishes minimum standards for {policy_area} across all business units.",
    "Violations may result in corrective action up to and including termination.",
    "Exceptions require written approval and are reviewed quarterly by the compliance committee.",
    "Employees must complete acknowledgment within 30 days of the effective date.",
];

/// Audit-event detail line per action type.
pub fn activity_detail_template(action: &str) -> &'static str {
    match action {
        "viewed" => "Viewed from {department} workstation.",
        "updated" => "Edited fields related to {policy_area}.",
        "commented" => "Added a note about the {date_reference} conversation.",
        "exported" => "Exported a summary for {department} leadership.",
        "assigned" => "Routed to {subject_role} for review.",
        "status_changed" => "Status advanced after review via {communication_channel}.",
        _ => "Activity recorded.",
    }
}

/// Disclosure description template per disclosure type.
pub fn disclosure_template(disclosure_type: &str) -> &'static str {
    match disclosure_type {
        "conflict_of_interest" => {
            "Disclosed a personal relationship with {subject_role} involved in {department} decisions."
        }
        "gift" => "Received a gift valued at {amount} from a vendor on {date_reference}.",
        "outside_employment" => {
            "Reported consulting work outside {department} averaging a few hours {frequency}."
        }
        "financial_interest" => {
            "Declared a financial interest of {amount} in a supplier used by {department}."
        }
        _ => "General disclosure: {policy_area}.",
    }
}
