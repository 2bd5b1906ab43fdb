//! Database models
//!
//! Plain in-memory records produced by the seeders. Generation never touches
//! the database; these are handed to the chunked writer afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub guid: Uuid,
    pub slug: String,
    pub name: String,
    pub industry: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub guid: Uuid,
    pub org_id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub guid: Uuid,
    pub org_id: Uuid,
    pub department_id: Uuid,
    pub email: String,
    pub full_name: String,
    pub title: String,
    pub manager_id: Option<Uuid>,
    pub location: String,
    pub risk_tier: String,
    pub hired_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KbArticle {
    pub guid: Uuid,
    pub slug: String,
    pub title: String,
    pub category: String,
    pub body: String,
    /// JSON array of tag strings.
    pub tags: String,
    pub view_count: i64,
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    pub guid: Uuid,
    pub org_id: Uuid,
    pub slug: String,
    pub version: i64,
    pub title: String,
    pub status: String,
    pub effective_at: DateTime<Utc>,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyTranslation {
    pub policy_id: Uuid,
    pub language: String,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub guid: Uuid,
    pub actor_id: Uuid,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Uuid,
    pub detail: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Disclosure {
    pub guid: Uuid,
    pub employee_id: Uuid,
    pub disclosure_type: String,
    pub status: String,
    pub description: String,
    pub amount: Option<f64>,
    pub submitted_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseRecord {
    pub guid: Uuid,
    pub org_id: Uuid,
    pub category: String,
    pub subject_employee_id: Option<Uuid>,
    pub involved_manager_id: Option<Uuid>,
    pub narrative: String,
    pub anonymity_rate: f64,
    pub status: String,
    pub opened_at: DateTime<Utc>,
}

/// Persisted membership row for an analytical pattern pool (repeat subjects,
/// manager hotspots). Consumed by the case generator on later runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternPoolRow {
    pub pool_kind: String,
    pub member_id: Uuid,
    pub target_quota: i64,
    pub assigned: i64,
    /// JSON array of affinity tags.
    pub affinities: String,
}

/// Persisted retaliation chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetaliationChainRow {
    pub origin_case_id: Uuid,
    pub follow_up_case_id: Option<Uuid>,
    pub category: String,
    pub delay_days: i64,
    pub narrative: String,
}
