//! `/api/clients` handlers.

use super::{run_blocking, AppState, MessageResponse};
use crate::app::{
    client_create, client_delete, client_get, client_list, client_update, ClientCreateReq,
    ClientDto, ClientListReq, ClientUpdateReq,
};
use crate::error::AppError;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};

pub fn client_routes() -> Router<AppState> {
    Router::new()
        .route("/api/clients", get(list_clients).post(create_client))
        .route(
            "/api/clients/:client_id",
            get(get_client).put(update_client).delete(delete_client),
        )
}

async fn list_clients(
    State(state): State<AppState>,
    query: Result<Query<ClientListReq>, QueryRejection>,
) -> Result<Json<Vec<ClientDto>>, AppError> {
    let Query(req) = query?;
    let clients = run_blocking(&state, move |db| client_list(db, req)).await?;
    Ok(Json(clients))
}

async fn get_client(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<ClientDto>, AppError> {
    let Path(id) = path?;
    let client = run_blocking(&state, move |db| client_get(db, id)).await?;
    Ok(Json(client))
}

async fn create_client(
    State(state): State<AppState>,
    body: Result<Json<ClientCreateReq>, JsonRejection>,
) -> Result<Json<ClientDto>, AppError> {
    let Json(req) = body?;
    let client = run_blocking(&state, move |db| client_create(db, req)).await?;
    Ok(Json(client))
}

async fn update_client(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<ClientUpdateReq>, JsonRejection>,
) -> Result<Json<ClientDto>, AppError> {
    let Path(id) = path?;
    let Json(req) = body?;
    let client = run_blocking(&state, move |db| client_update(db, id, req)).await?;
    Ok(Json(client))
}

async fn delete_client(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Path(id) = path?;
    run_blocking(&state, move |db| client_delete(db, id)).await?;
    Ok(Json(MessageResponse {
        message: "Client deleted successfully",
    }))
}
