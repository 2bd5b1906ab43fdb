//! Organizational hierarchy seeder
//!
//! Creates the demo tenants, their departments, and an employee tree: one
//! manager per department with a handful of direct reports. Employees are
//! keyed by email, so re-runs update titles and risk tiers in place.

use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use cdg_common::config::SeedConfig;
use cdg_common::db::models::{Department, Employee, Organization};
use cdg_common::db::{upsert_departments, upsert_employees, upsert_organizations};
use cdg_common::rng::offsets;
use cdg_common::template::pick_weighted;
use cdg_common::{Result, SeedRng};

use crate::data;
use crate::seeders::anchor;

pub async fn run(pool: &SqlitePool, config: &SeedConfig) -> Result<usize> {
    let mut rng = SeedRng::with_offset(config.master_seed, offsets::ORG);
    let anchor = anchor();

    let mut orgs = Vec::new();
    let mut departments = Vec::new();
    let mut employees = Vec::new();
    let mut email_index = 0u32;

    for (slug, name, industry) in data::ORGS {
        let org = Organization {
            guid: rng.uuid(),
            slug: slug.to_string(),
            name: name.to_string(),
            industry: industry.to_string(),
        };

        for dept_name in data::DEPARTMENTS {
            let dept = Department {
                guid: rng.uuid(),
                org_id: org.guid,
                name: dept_name.to_string(),
            };

            let manager = new_employee(
                &mut rng,
                &org,
                &dept,
                data::MANAGER_TITLES,
                None,
                &mut email_index,
                anchor,
            );
            let manager_id = manager.guid;
            employees.push(manager);

            let report_count = rng.random_int(4, 9);
            for _ in 0..report_count {
                employees.push(new_employee(
                    &mut rng,
                    &org,
                    &dept,
                    data::STAFF_TITLES,
                    Some(manager_id),
                    &mut email_index,
                    anchor,
                ));
            }

            departments.push(dept);
        }

        orgs.push(org);
    }

    let mut written = 0;
    written += upsert_organizations(pool, &orgs, config.chunk_size).await?;
    written += upsert_departments(pool, &departments, config.chunk_size).await?;
    written += upsert_employees(pool, &employees, config.chunk_size).await?;

    info!(
        organizations = orgs.len(),
        departments = departments.len(),
        employees = employees.len(),
        "Seeded organizational hierarchy"
    );
    Ok(written)
}

fn new_employee(
    rng: &mut SeedRng,
    org: &Organization,
    dept: &Department,
    titles: &[&str],
    manager_id: Option<Uuid>,
    email_index: &mut u32,
    anchor: DateTime<Utc>,
) -> Employee {
    let first = rng.pick(data::FIRST_NAMES).copied().unwrap_or("Alex");
    let last = rng.pick(data::LAST_NAMES).copied().unwrap_or("Smith");
    *email_index += 1;
    let email = format!(
        "{}.{}{}@{}.example.com",
        first.to_ascii_lowercase(),
        last.to_ascii_lowercase(),
        email_index,
        org.slug
    );

    Employee {
        guid: rng.uuid(),
        org_id: org.guid,
        department_id: dept.guid,
        email,
        full_name: format!("{first} {last}"),
        title: rng.pick(titles).copied().unwrap_or("Associate").to_string(),
        manager_id,
        location: rng.pick(data::LOCATIONS).copied().unwrap_or("Chicago").to_string(),
        risk_tier: pick_weighted(rng, data::RISK_TIERS)
            .copied()
            .unwrap_or("low")
            .to_string(),
        hired_at: anchor - Duration::days(rng.random_int(90, 2900)),
    }
}
