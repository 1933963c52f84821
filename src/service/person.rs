use std::sync::Arc;

use crate::{
    models::{Note, Person},
    repository::{PersonRepository, RepositoryError},
    service::NoteService,
};

#[derive(Clone)]
pub struct PersonService {
    repo: Arc<dyn PersonRepository>,
    notes: Arc<NoteService>,
}

impl PersonService {
    pub fn new(repo: Arc<dyn PersonRepository>, notes: Arc<NoteService>) -> Self {
        Self { repo, notes }
    }

    pub async fn get_all(&self) -> Result<Vec<Person>, RepositoryError> {
        self.repo.find_all().await
    }

    pub async fn get(&self, id: &str) -> Result<Option<Person>, RepositoryError> {
        let person = self.repo.find_by_id(id).await?;
        if person.is_none() {
            tracing::debug!("person {} not found", id);
        }

        Ok(person)
    }

    pub async fn create(&self, person: Person) -> Result<Person, RepositoryError> {
        self.repo.save(person).await
    }

    /// Exact-match search on whichever names are given. Empty strings count as
    /// missing; with neither name given nothing is looked up.
    pub async fn find_by_name(
        &self,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<Vec<Person>, RepositoryError> {
        let first_name = first_name.filter(|name| !name.is_empty());
        let last_name = last_name.filter(|name| !name.is_empty());

        match (first_name, last_name) {
            (Some(first), Some(last)) => {
                self.repo
                    .find_by_first_name_and_last_name(first, last)
                    .await
            }
            (Some(first), None) => self.repo.find_by_first_name(first).await,
            (None, Some(last)) => self.repo.find_by_last_name(last).await,
            (None, None) => Ok(Vec::new()),
        }
    }

    /// Stores `note` as owned by the person `person_id`. Returns `None` without
    /// touching note storage when that person does not exist.
    pub async fn create_note(
        &self,
        person_id: &str,
        note: Note,
    ) -> Result<Option<Note>, RepositoryError> {
        let Some(person) = self.get(person_id).await? else {
            return Ok(None);
        };

        let note = Note {
            person_id: person.id,
            ..note
        };

        self.notes.create(note).await.map(Some)
    }
}
