//! Demo data for local development.

use crate::app::{
    case_create, case_update, client_create, CaseCreateReq, CaseUpdateReq, ClientCreateReq,
};
use crate::domain::{timestamp, CaseStatus};
use crate::error::AppError;
use crate::infra::{get_connection, DbPool};
use chrono::Duration;
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded { clients: usize, cases: usize },
    AlreadyPopulated { clients: i64, cases: i64 },
}

fn table_counts(pool: &DbPool) -> Result<(i64, i64), AppError> {
    let conn = get_connection(pool);
    let clients = conn.query_row("SELECT COUNT(*) FROM clients", [], |r| r.get(0))?;
    let cases = conn.query_row("SELECT COUNT(*) FROM cases", [], |r| r.get(0))?;
    Ok((clients, cases))
}

fn first_client_ids(pool: &DbPool, n: i64) -> Result<Vec<i64>, AppError> {
    let conn = get_connection(pool);
    let mut stmt = conn.prepare("SELECT id FROM clients ORDER BY id ASC LIMIT ?1")?;
    let ids = stmt
        .query_map([n], |r| r.get(0))?
        .collect::<Result<Vec<i64>, _>>()?;
    Ok(ids)
}

/// Clients are seeded into an empty clients table and cases into an empty
/// cases table, so a run that failed halfway can be repeated.
pub fn seed_demo_data(pool: &DbPool) -> Result<SeedOutcome, AppError> {
    let (existing_clients, existing_cases) = table_counts(pool)?;
    if existing_clients > 0 && existing_cases > 0 {
        return Ok(SeedOutcome::AlreadyPopulated {
            clients: existing_clients,
            cases: existing_cases,
        });
    }

    let mut clients_added = 0;
    if existing_clients == 0 {
        let clients = [
            ("Acme Corporation", "contact@acme.com", "+91-9876543210", "Acme Corp"),
            ("Tech Solutions Ltd", "info@techsol.com", "+91-8765432109", "Tech Solutions"),
            ("Global Industries", "sales@globalinc.com", "+91-7654321098", "Global Inc"),
        ];
        for (name, email, phone, company) in clients {
            client_create(
                pool,
                ClientCreateReq {
                    name: name.into(),
                    email: Some(email.into()),
                    phone: Some(phone.into()),
                    company: Some(company.into()),
                },
            )?;
            clients_added += 1;
        }
    }

    let mut cases_added = 0;
    if existing_cases == 0 {
        let ids = first_client_ids(pool, 2)?;
        let (Some(&first), Some(&second)) = (ids.first(), ids.last()) else {
            return Ok(SeedOutcome::Seeded {
                clients: clients_added,
                cases: 0,
            });
        };

        let now = timestamp::now();
        let overdue = case_create(
            pool,
            CaseCreateReq {
                client_id: first,
                invoice_number: "INV-2026-001".into(),
                invoice_date: now - Duration::days(30),
                due_date: now - Duration::days(15),
                amount: Decimal::new(12_500_000, 2),
                follow_up_notes: Some("Awaiting payment confirmation".into()),
            },
        )?;
        case_update(
            pool,
            overdue.id,
            CaseUpdateReq {
                status: Some(CaseStatus::InFollowUp),
                follow_up_notes: None,
            },
        )?;
        case_create(
            pool,
            CaseCreateReq {
                client_id: second,
                invoice_number: "INV-2026-002".into(),
                invoice_date: now - Duration::days(20),
                due_date: now + Duration::days(10),
                amount: Decimal::new(8_500_000, 2),
                follow_up_notes: None,
            },
        )?;
        cases_added = 2;
    }

    Ok(SeedOutcome::Seeded {
        clients: clients_added,
        cases: cases_added,
    })
}
