use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::{Note, Person};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PersonResponse {
    /// Person ID
    pub id: String,
    /// First name
    pub first_name: Option<String>,
    /// Last name
    pub last_name: Option<String>,
    /// Notes owned by the person, in creation order
    pub notes: Vec<NoteResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    /// Note ID
    pub id: String,
    /// Note content
    pub content: Option<String>,
    /// ID of the owning person
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePersonRequest {
    /// First name
    #[serde(default)]
    pub first_name: Option<String>,
    /// Last name
    #[serde(default)]
    pub last_name: Option<String>,
    /// Notes stored together with the person
    #[serde(default)]
    pub notes: Vec<CreateNoteRequest>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteRequest {
    /// Note content
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NoteQuery {
    /// Substring to look for in note content
    pub query: String,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PersonQuery {
    /// Exact first name, ignored when empty
    pub first_name: String,
    /// Exact last name, ignored when empty
    pub last_name: String,
}

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        Self {
            id: note.id.unwrap_or_default(),
            content: note.content,
            person_id: note.person_id,
        }
    }
}

impl From<Person> for PersonResponse {
    fn from(person: Person) -> Self {
        Self {
            id: person.id.unwrap_or_default(),
            first_name: person.first_name,
            last_name: person.last_name,
            notes: person.notes.into_iter().map(NoteResponse::from).collect(),
        }
    }
}

impl From<CreateNoteRequest> for Note {
    fn from(request: CreateNoteRequest) -> Self {
        Self {
            id: None,
            content: request.content,
            person_id: None,
        }
    }
}

impl From<CreatePersonRequest> for Person {
    fn from(request: CreatePersonRequest) -> Self {
        Self {
            id: None,
            first_name: request.first_name,
            last_name: request.last_name,
            notes: request.notes.into_iter().map(Note::from).collect(),
        }
    }
}
