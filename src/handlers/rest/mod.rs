pub mod note;
pub mod person;

use axum::{
    Router,
    routing::{get, post},
};
use axum_macros::FromRef;
use utoipa::OpenApi;

use std::sync::Arc;

use crate::{
    dto::{CreateNoteRequest, CreatePersonRequest, NoteResponse, PersonResponse},
    repository::{NoteRepository, PersonRepository},
    service::{NoteService, PersonService},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        note::get_note,
        note::query_notes,
        person::list_persons,
        person::get_person,
        person::create_person,
        person::query_persons,
        person::create_note
    ),
    components(schemas(
        NoteResponse,
        PersonResponse,
        CreateNoteRequest,
        CreatePersonRequest
    )),
    tags(
        (name = "notes", description = "Note lookup and search"),
        (name = "persons", description = "Person management and note creation")
    )
)]
pub struct ApiDoc;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub notes: Arc<NoteService>,
    pub persons: Arc<PersonService>,
}

impl AppState {
    /// Wires both services over one storage backend.
    pub fn over<R>(repo: Arc<R>) -> Self
    where
        R: PersonRepository + NoteRepository + 'static,
    {
        let notes = Arc::new(NoteService::new(repo.clone()));
        let persons = Arc::new(PersonService::new(repo, notes.clone()));
        Self { notes, persons }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/note/query", get(note::query_notes))
        .route("/note/{id}", get(note::get_note))
        .route(
            "/person/",
            get(person::list_persons).post(person::create_person),
        )
        .route("/person/query", get(person::query_persons))
        .route("/person/{id}", get(person::get_person))
        .route("/person/{id}/note", post(person::create_note))
        .with_state(state)
}
