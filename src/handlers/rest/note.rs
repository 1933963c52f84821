use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_macros::debug_handler;

use std::sync::Arc;

use crate::{
    dto::{NoteQuery, NoteResponse},
    service::NoteService,
};

#[utoipa::path(
    get,
    path = "/note/{id}",
    params(
        ("id" = String, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note found", body = NoteResponse),
        (status = 404, description = "Note not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_note(State(service): State<Arc<NoteService>>, Path(id): Path<String>) -> Response {
    match service.get(&id).await {
        Ok(Some(note)) => (StatusCode::OK, Json(NoteResponse::from(note))).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Note not found").into_response(),
        Err(e) => {
            tracing::error!("failed to get note entry: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to get note").into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/note/query",
    params(NoteQuery),
    responses(
        (status = 200, description = "Notes whose content contains the query", body = Vec<NoteResponse>),
        (status = 400, description = "Missing query parameter"),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn query_notes(
    State(service): State<Arc<NoteService>>,
    Query(params): Query<NoteQuery>,
) -> Response {
    match service.query_by_content(Some(params.query.as_str())).await {
        Ok(notes) => {
            let notes: Vec<NoteResponse> = notes.into_iter().map(NoteResponse::from).collect();
            (StatusCode::OK, Json(notes)).into_response()
        }
        Err(e) => {
            tracing::error!("failed to query note entries: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to query notes").into_response()
        }
    }
}
