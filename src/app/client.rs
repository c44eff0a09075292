//! Client use cases.

use crate::app::patch;
use crate::domain::{timestamp, validation};
use crate::error::AppError;
use crate::infra::db::{ts_from_row, ts_to_sql};
use crate::infra::{get_connection, DbPool};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

const CLIENT_COLUMNS: &str = "id, name, email, phone, company, created_at, updated_at";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientDto {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientCreateReq {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientUpdateReq {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "patch::some")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::some")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::some")]
    pub company: Option<Option<String>>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ClientListReq {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

pub(crate) fn client_from_row(row: &Row<'_>, base: usize) -> rusqlite::Result<ClientDto> {
    Ok(ClientDto {
        id: row.get(base)?,
        name: row.get(base + 1)?,
        email: row.get(base + 2)?,
        phone: row.get(base + 3)?,
        company: row.get(base + 4)?,
        created_at: ts_from_row(row, base + 5)?,
        updated_at: ts_from_row(row, base + 6)?,
    })
}

/// Returns the email as it should be stored.
fn validate_fields(
    name: &str,
    email: Option<&str>,
    phone: Option<&str>,
    company: Option<&str>,
) -> Result<Option<String>, AppError> {
    validation::required_text("name", name, validation::NAME_MAX)?;
    let email = validation::email(email)?;
    validation::optional_text("phone", phone, validation::PHONE_MAX)?;
    validation::optional_text("company", company, validation::COMPANY_MAX)?;
    Ok(email)
}

/// Internal helper to load a single client on an already-held connection.
pub(crate) fn find_client(conn: &Connection, id: i64) -> Result<Option<ClientDto>, AppError> {
    let sql = format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = ?1");
    let client = conn
        .query_row(&sql, [id], |row| client_from_row(row, 0))
        .optional()?;
    Ok(client)
}

fn load_client(conn: &Connection, id: i64) -> Result<ClientDto, AppError> {
    find_client(conn, id)?.ok_or_else(|| {
        tracing::debug!(client_id = id, "client not found");
        AppError::NotFound("Client")
    })
}

pub fn client_create(pool: &DbPool, req: ClientCreateReq) -> Result<ClientDto, AppError> {
    let email = validate_fields(
        &req.name,
        req.email.as_deref(),
        req.phone.as_deref(),
        req.company.as_deref(),
    )?;
    let now = timestamp::now();
    let now_sql = ts_to_sql(&now);

    let conn = get_connection(pool);
    conn.execute(
        "INSERT INTO clients (name, email, phone, company, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
        params![req.name, email, req.phone, req.company, now_sql],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(client_id = id, "client created");

    Ok(ClientDto {
        id,
        name: req.name,
        email,
        phone: req.phone,
        company: req.company,
        created_at: now,
        updated_at: now,
    })
}

pub fn client_get(pool: &DbPool, id: i64) -> Result<ClientDto, AppError> {
    let conn = get_connection(pool);
    load_client(&conn, id)
}

/// Page of clients in insertion order.
pub fn client_list(pool: &DbPool, req: ClientListReq) -> Result<Vec<ClientDto>, AppError> {
    let (skip, limit) = validation::page(req.skip, req.limit)?;
    let conn = get_connection(pool);
    let sql = format!("SELECT {CLIENT_COLUMNS} FROM clients ORDER BY id ASC LIMIT ?1 OFFSET ?2");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![limit, skip], |row| client_from_row(row, 0))?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn client_update(pool: &DbPool, id: i64, req: ClientUpdateReq) -> Result<ClientDto, AppError> {
    let conn = get_connection(pool);
    let tx = conn.unchecked_transaction()?;

    let current = load_client(&tx, id)?;

    let name = req.name.unwrap_or(current.name);
    let email = patch::apply(req.email, current.email);
    let phone = patch::apply(req.phone, current.phone);
    let company = patch::apply(req.company, current.company);
    let email = validate_fields(&name, email.as_deref(), phone.as_deref(), company.as_deref())?;

    let updated_at = timestamp::touch(current.updated_at);
    tx.execute(
        "UPDATE clients SET name = ?1, email = ?2, phone = ?3, company = ?4, updated_at = ?5 WHERE id = ?6",
        params![name, email, phone, company, ts_to_sql(&updated_at), id],
    )?;
    let updated = load_client(&tx, id)?;
    tx.commit()?;
    tracing::info!(client_id = id, "client updated");
    Ok(updated)
}

/// Deletes the client together with every case that references it.
pub fn client_delete(pool: &DbPool, id: i64) -> Result<(), AppError> {
    let conn = get_connection(pool);
    let tx = conn.unchecked_transaction()?;

    let exists = tx
        .query_row("SELECT 1 FROM clients WHERE id = ?1", [id], |_| Ok(()))
        .optional()?
        .is_some();
    if !exists {
        tracing::debug!(client_id = id, "client not found");
        return Err(AppError::NotFound("Client"));
    }

    let cases = tx.execute("DELETE FROM cases WHERE client_id = ?1", [id])?;
    tx.execute("DELETE FROM clients WHERE id = ?1", [id])?;
    tx.commit()?;
    tracing::info!(client_id = id, cases_removed = cases, "client deleted");
    Ok(())
}
