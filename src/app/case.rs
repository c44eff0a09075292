//! Case use cases: create, list, get, update, delete.

use crate::app::client::{client_from_row, find_client, ClientDto};
use crate::app::patch;
use crate::domain::{timestamp, validation, CaseSortBy, CaseStatus, SortOrder};
use crate::error::AppError;
use crate::infra::db::{amount_from_row, amount_to_sql, ts_from_row, ts_to_sql};
use crate::infra::{get_connection, DbPool};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const CASE_SELECT: &str = "SELECT c.id, c.client_id, c.invoice_number, c.invoice_date, c.due_date, c.amount, c.status, c.follow_up_notes, c.created_at, c.updated_at, \
     cl.id, cl.name, cl.email, cl.phone, cl.company, cl.created_at, cl.updated_at \
     FROM cases c JOIN clients cl ON cl.id = c.client_id";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseDto {
    pub id: i64,
    pub client_id: i64,
    pub invoice_number: String,
    pub invoice_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub amount: Decimal,
    pub status: CaseStatus,
    pub follow_up_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub client: ClientDto,
}

/// There is deliberately no `status` field: new cases always start as `New`,
/// and a `status` key in the request body is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct CaseCreateReq {
    pub client_id: i64,
    pub invoice_number: String,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub invoice_date: DateTime<Utc>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub due_date: DateTime<Utc>,
    pub amount: Decimal,
    #[serde(default)]
    pub follow_up_notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaseUpdateReq {
    pub status: Option<CaseStatus>,
    #[serde(default, deserialize_with = "patch::some")]
    pub follow_up_notes: Option<Option<String>>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct CaseListReq {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<CaseStatus>,
    pub sort_by: Option<CaseSortBy>,
    pub order: Option<SortOrder>,
}

fn case_from_row(row: &Row<'_>) -> rusqlite::Result<CaseDto> {
    Ok(CaseDto {
        id: row.get(0)?,
        client_id: row.get(1)?,
        invoice_number: row.get(2)?,
        invoice_date: ts_from_row(row, 3)?,
        due_date: ts_from_row(row, 4)?,
        amount: amount_from_row(row, 5)?,
        status: row.get(6)?,
        follow_up_notes: row.get(7)?,
        created_at: ts_from_row(row, 8)?,
        updated_at: ts_from_row(row, 9)?,
        client: client_from_row(row, 10)?,
    })
}

fn load_case(conn: &Connection, id: i64) -> Result<CaseDto, AppError> {
    let sql = format!("{CASE_SELECT} WHERE c.id = ?1");
    conn.query_row(&sql, [id], case_from_row)
        .optional()?
        .ok_or_else(|| {
            tracing::debug!(case_id = id, "case not found");
            AppError::NotFound("Case")
        })
}

/// Rolled-back write: log the cause, report only the generic message.
fn persistence_failure(message: &'static str, err: rusqlite::Error) -> AppError {
    tracing::error!(error = %err, "{message}");
    AppError::Persistence(message)
}

pub fn case_create(pool: &DbPool, req: CaseCreateReq) -> Result<CaseDto, AppError> {
    validation::required_text(
        "invoice_number",
        &req.invoice_number,
        validation::INVOICE_NUMBER_MAX,
    )?;
    let amount = validation::amount(req.amount)?;

    let conn = get_connection(pool);
    if find_client(&conn, req.client_id)?.is_none() {
        tracing::debug!(client_id = req.client_id, "case create for unknown client");
        return Err(AppError::NotFound("Client"));
    }

    let now = ts_to_sql(&timestamp::now());
    let insert = || -> rusqlite::Result<i64> {
        let tx = conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO cases (client_id, invoice_number, invoice_date, due_date, amount, status, follow_up_notes, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
            params![
                req.client_id,
                req.invoice_number,
                ts_to_sql(&req.invoice_date),
                ts_to_sql(&req.due_date),
                amount_to_sql(&amount),
                CaseStatus::New,
                req.follow_up_notes,
                now,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(id)
    };
    let id = insert().map_err(|e| persistence_failure("Failed to create case", e))?;
    tracing::info!(case_id = id, client_id = req.client_id, "case created");

    load_case(&conn, id)
}

pub fn case_get(pool: &DbPool, id: i64) -> Result<CaseDto, AppError> {
    let conn = get_connection(pool);
    load_case(&conn, id)
}

/// Filter by status, then sort, then paginate.
pub fn case_list(pool: &DbPool, req: CaseListReq) -> Result<Vec<CaseDto>, AppError> {
    use rusqlite::types::Value;

    let (skip, limit) = validation::page(req.skip, req.limit)?;
    let sort_by = req.sort_by.unwrap_or_default();
    let order = req.order.unwrap_or_default();

    let mut conditions: Vec<&str> = Vec::new();
    let mut bind_values: Vec<Value> = Vec::new();

    if let Some(status) = req.status {
        conditions.push("c.status = ?");
        bind_values.push(Value::Text(status.as_str().to_string()));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    // id as tie-breaker keeps pages stable when timestamps collide
    let dir = order.as_sql();
    let sql = format!(
        "{CASE_SELECT}{where_clause} ORDER BY c.{col} {dir}, c.id {dir} LIMIT ? OFFSET ?",
        col = sort_by.column(),
    );
    bind_values.push(Value::Integer(limit));
    bind_values.push(Value::Integer(skip));

    let conn = get_connection(pool);
    let mut stmt = conn.prepare(&sql)?;
    let bind_params: Vec<&dyn rusqlite::types::ToSql> = bind_values
        .iter()
        .map(|v| v as &dyn rusqlite::types::ToSql)
        .collect();
    let rows = stmt.query_map(bind_params.as_slice(), case_from_row)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Only status and follow_up_notes can change after creation.
pub fn case_update(pool: &DbPool, id: i64, req: CaseUpdateReq) -> Result<CaseDto, AppError> {
    let conn = get_connection(pool);
    let current = load_case(&conn, id)?;

    let status = req.status.unwrap_or(current.status);
    let follow_up_notes = patch::apply(req.follow_up_notes, current.follow_up_notes);
    let updated_at = timestamp::touch(current.updated_at);

    let update = || -> rusqlite::Result<()> {
        let tx = conn.unchecked_transaction()?;
        tx.execute(
            "UPDATE cases SET status = ?1, follow_up_notes = ?2, updated_at = ?3 WHERE id = ?4",
            params![status, follow_up_notes, ts_to_sql(&updated_at), id],
        )?;
        tx.commit()
    };
    update().map_err(|e| persistence_failure("Failed to update case", e))?;
    tracing::info!(case_id = id, status = status.as_str(), "case updated");

    load_case(&conn, id)
}

pub fn case_delete(pool: &DbPool, id: i64) -> Result<(), AppError> {
    let conn = get_connection(pool);
    let exists = conn
        .query_row("SELECT 1 FROM cases WHERE id = ?1", [id], |_| Ok(()))
        .optional()?
        .is_some();
    if !exists {
        tracing::debug!(case_id = id, "case not found");
        return Err(AppError::NotFound("Case"));
    }

    let delete = || -> rusqlite::Result<()> {
        let tx = conn.unchecked_transaction()?;
        tx.execute("DELETE FROM cases WHERE id = ?1", [id])?;
        tx.commit()
    };
    delete().map_err(|e| persistence_failure("Failed to delete case", e))?;
    tracing::info!(case_id = id, "case deleted");
    Ok(())
}
