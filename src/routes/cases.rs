//! `/api/cases` handlers.

use super::{run_blocking, AppState, MessageResponse};
use crate::app::{
    case_create, case_delete, case_get, case_list, case_update, CaseCreateReq, CaseDto,
    CaseListReq, CaseUpdateReq,
};
use crate::error::AppError;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};

pub fn case_routes() -> Router<AppState> {
    Router::new()
        .route("/api/cases", get(list_cases).post(create_case))
        .route(
            "/api/cases/:case_id",
            get(get_case).put(update_case).delete(delete_case),
        )
}

async fn list_cases(
    State(state): State<AppState>,
    query: Result<Query<CaseListReq>, QueryRejection>,
) -> Result<Json<Vec<CaseDto>>, AppError> {
    let Query(req) = query?;
    let cases = run_blocking(&state, move |db| case_list(db, req)).await?;
    Ok(Json(cases))
}

async fn get_case(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<CaseDto>, AppError> {
    let Path(id) = path?;
    let case = run_blocking(&state, move |db| case_get(db, id)).await?;
    Ok(Json(case))
}

async fn create_case(
    State(state): State<AppState>,
    body: Result<Json<CaseCreateReq>, JsonRejection>,
) -> Result<Json<CaseDto>, AppError> {
    let Json(req) = body?;
    let case = run_blocking(&state, move |db| case_create(db, req)).await?;
    Ok(Json(case))
}

async fn update_case(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<CaseUpdateReq>, JsonRejection>,
) -> Result<Json<CaseDto>, AppError> {
    let Path(id) = path?;
    let Json(req) = body?;
    let case = run_blocking(&state, move |db| case_update(db, id, req)).await?;
    Ok(Json(case))
}

async fn delete_case(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Path(id) = path?;
    run_blocking(&state, move |db| case_delete(db, id)).await?;
    Ok(Json(MessageResponse {
        message: "Case deleted successfully",
    }))
}
