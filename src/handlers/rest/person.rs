use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_macros::debug_handler;

use std::sync::Arc;

use crate::{
    dto::{CreateNoteRequest, CreatePersonRequest, NoteResponse, PersonQuery, PersonResponse},
    models::Person,
    service::PersonService,
};

fn to_responses(persons: Vec<Person>) -> Vec<PersonResponse> {
    persons.into_iter().map(PersonResponse::from).collect()
}

#[utoipa::path(
    get,
    path = "/person/",
    responses(
        (status = 200, description = "List of all persons", body = Vec<PersonResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "persons"
)]
#[debug_handler]
pub async fn list_persons(State(service): State<Arc<PersonService>>) -> Response {
    match service.get_all().await {
        Ok(persons) => (StatusCode::OK, Json(to_responses(persons))).into_response(),
        Err(e) => {
            tracing::error!("failed to get person entries: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to get all persons").into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/person/{id}",
    params(
        ("id" = String, Path, description = "Person ID")
    ),
    responses(
        (status = 200, description = "Person found", body = PersonResponse),
        (status = 404, description = "Person not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "persons"
)]
#[debug_handler]
pub async fn get_person(
    State(service): State<Arc<PersonService>>,
    Path(id): Path<String>,
) -> Response {
    match service.get(&id).await {
        Ok(Some(person)) => (StatusCode::OK, Json(PersonResponse::from(person))).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Person not found").into_response(),
        Err(e) => {
            tracing::error!("failed to get person entry: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to get person").into_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/person/",
    request_body = CreatePersonRequest,
    responses(
        (status = 200, description = "Person created successfully", body = PersonResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "persons"
)]
#[debug_handler]
pub async fn create_person(
    State(service): State<Arc<PersonService>>,
    Json(payload): Json<CreatePersonRequest>,
) -> Response {
    match service.create(payload.into()).await {
        Ok(person) => (StatusCode::OK, Json(PersonResponse::from(person))).into_response(),
        Err(e) => {
            tracing::error!("failed to create person entry: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create person").into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/person/query",
    params(PersonQuery),
    responses(
        (status = 200, description = "Persons matching the given names", body = Vec<PersonResponse>),
        (status = 400, description = "Missing firstName or lastName parameter"),
        (status = 500, description = "Internal server error")
    ),
    tag = "persons"
)]
#[debug_handler]
pub async fn query_persons(
    State(service): State<Arc<PersonService>>,
    Query(params): Query<PersonQuery>,
) -> Response {
    match service
        .find_by_name(Some(params.first_name.as_str()), Some(params.last_name.as_str()))
        .await
    {
        Ok(persons) => (StatusCode::OK, Json(to_responses(persons))).into_response(),
        Err(e) => {
            tracing::error!("failed to query person entries: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to query persons").into_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/person/{id}/note",
    params(
        ("id" = String, Path, description = "ID of the person owning the note")
    ),
    request_body = CreateNoteRequest,
    responses(
        (status = 200, description = "Note created successfully", body = NoteResponse),
        (status = 404, description = "Person not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "persons"
)]
#[debug_handler]
pub async fn create_note(
    State(service): State<Arc<PersonService>>,
    Path(id): Path<String>,
    Json(payload): Json<CreateNoteRequest>,
) -> Response {
    match service.create_note(&id, payload.into()).await {
        Ok(Some(note)) => (StatusCode::OK, Json(NoteResponse::from(note))).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Person not found").into_response(),
        Err(e) => {
            tracing::error!("failed to create note entry: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create note").into_response()
        }
    }
}
