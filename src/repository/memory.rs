use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use super::{NoteRepository, PersonRepository, RepositoryError, new_id};
use crate::models::{Note, Person};

/// Process-local storage, kept in insertion order. Used for `storage: memory`
/// and as the fake behind service and handler tests.
#[derive(Default)]
pub struct InMemoryRepository {
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    persons: Vec<PersonRecord>,
    notes: Vec<Note>,
}

struct PersonRecord {
    id: String,
    first_name: Option<String>,
    last_name: Option<String>,
}

impl State {
    fn materialize(&self, record: &PersonRecord) -> Person {
        Person {
            id: Some(record.id.clone()),
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            notes: self
                .notes
                .iter()
                .filter(|note| note.person_id.as_deref() == Some(record.id.as_str()))
                .cloned()
                .collect(),
        }
    }

    fn persons_where(&self, predicate: impl Fn(&PersonRecord) -> bool) -> Vec<Person> {
        self.persons
            .iter()
            .filter(|record| predicate(record))
            .map(|record| self.materialize(record))
            .collect()
    }

    fn check_note_id(&self, id: &str) -> Result<(), RepositoryError> {
        if self.notes.iter().any(|n| n.id.as_deref() == Some(id)) {
            return Err(RepositoryError::Duplicate(id.to_string()));
        }

        Ok(())
    }

    fn insert_note(&mut self, note: Note) -> Result<Note, RepositoryError> {
        let id = note.id.clone().unwrap_or_else(new_id);
        self.check_note_id(&id)?;

        let stored = Note {
            id: Some(id),
            ..note
        };
        self.notes.push(stored.clone());

        Ok(stored)
    }
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, RepositoryError> {
        self.state.read().map_err(|_| RepositoryError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, RepositoryError> {
        self.state.write().map_err(|_| RepositoryError::Poisoned)
    }
}

#[async_trait]
impl PersonRepository for InMemoryRepository {
    async fn find_all(&self) -> Result<Vec<Person>, RepositoryError> {
        Ok(self.read()?.persons_where(|_| true))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Person>, RepositoryError> {
        let state = self.read()?;
        Ok(state
            .persons
            .iter()
            .find(|record| record.id == id)
            .map(|record| state.materialize(record)))
    }

    async fn save(&self, person: Person) -> Result<Person, RepositoryError> {
        let mut state = self.write()?;

        let id = person.id.unwrap_or_else(new_id);
        if state.persons.iter().any(|r| r.id == id) {
            return Err(RepositoryError::Duplicate(id));
        }
        // A rejected save must leave the store untouched.
        for note_id in person.notes.iter().filter_map(|n| n.id.as_deref()) {
            state.check_note_id(note_id)?;
        }

        let record = PersonRecord {
            id: id.clone(),
            first_name: person.first_name,
            last_name: person.last_name,
        };
        state.persons.push(record);

        for note in person.notes {
            state.insert_note(Note {
                person_id: Some(id.clone()),
                ..note
            })?;
        }

        let record = state.persons.last().ok_or(RepositoryError::Poisoned)?;
        Ok(state.materialize(record))
    }

    async fn find_by_first_name(&self, first_name: &str) -> Result<Vec<Person>, RepositoryError> {
        Ok(self
            .read()?
            .persons_where(|r| r.first_name.as_deref() == Some(first_name)))
    }

    async fn find_by_last_name(&self, last_name: &str) -> Result<Vec<Person>, RepositoryError> {
        Ok(self
            .read()?
            .persons_where(|r| r.last_name.as_deref() == Some(last_name)))
    }

    async fn find_by_first_name_and_last_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Vec<Person>, RepositoryError> {
        Ok(self.read()?.persons_where(|r| {
            r.first_name.as_deref() == Some(first_name) && r.last_name.as_deref() == Some(last_name)
        }))
    }
}

#[async_trait]
impl NoteRepository for InMemoryRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Note>, RepositoryError> {
        Ok(self
            .read()?
            .notes
            .iter()
            .find(|note| note.id.as_deref() == Some(id))
            .cloned())
    }

    async fn save(&self, note: Note) -> Result<Note, RepositoryError> {
        self.write()?.insert_note(note)
    }

    async fn find_by_content_containing(
        &self,
        content: &str,
    ) -> Result<Vec<Note>, RepositoryError> {
        Ok(self
            .read()?
            .notes
            .iter()
            .filter(|note| note.content.as_deref().is_some_and(|c| c.contains(content)))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(first_name: &str, last_name: &str) -> Person {
        Person {
            first_name: Some(first_name.to_string()),
            last_name: Some(last_name.to_string()),
            ..Person::default()
        }
    }

    #[tokio::test]
    async fn save_never_replaces_an_existing_person() {
        let repo = InMemoryRepository::new();

        let saved = PersonRepository::save(&repo, person("Jane", "Doe")).await.unwrap();
        let id = saved.id.clone().unwrap();
        assert!(saved.notes.is_empty());

        let again = PersonRepository::save(
            &repo,
            Person {
                id: Some(id.clone()),
                ..person("Janet", "Doe")
            },
        )
        .await;

        assert!(matches!(&again, Err(RepositoryError::Duplicate(dup)) if *dup == id));
        assert_eq!(PersonRepository::find_all(&repo).await.unwrap().len(), 1);
        let found = PersonRepository::find_by_id(&repo, &id).await.unwrap().unwrap();
        assert_eq!(found.first_name.as_deref(), Some("Jane"));
    }

    #[tokio::test]
    async fn save_never_replaces_an_existing_note() {
        let repo = InMemoryRepository::new();
        let owner = PersonRepository::save(&repo, person("John", "Doe")).await.unwrap();

        let note = NoteRepository::save(
            &repo,
            Note {
                content: Some("original".to_string()),
                person_id: owner.id.clone(),
                ..Note::default()
            },
        )
        .await
        .unwrap();

        let again = NoteRepository::save(
            &repo,
            Note {
                content: Some("replaced".to_string()),
                ..note.clone()
            },
        )
        .await;
        assert!(matches!(again, Err(RepositoryError::Duplicate(_))));

        let with_stolen_note = PersonRepository::save(
            &repo,
            Person {
                notes: vec![note.clone()],
                ..person("Eve", "Doe")
            },
        )
        .await;
        assert!(matches!(with_stolen_note, Err(RepositoryError::Duplicate(_))));
        assert!(repo.find_by_first_name("Eve").await.unwrap().is_empty());

        let stored = NoteRepository::find_by_id(&repo, note.id.as_deref().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored, note);
    }

    #[tokio::test]
    async fn saving_person_with_notes_attaches_them() {
        let repo = InMemoryRepository::new();

        let saved = PersonRepository::save(
            &repo,
            Person {
                notes: vec![
                    Note {
                        content: Some("first".to_string()),
                        ..Note::default()
                    },
                    Note {
                        content: Some("second".to_string()),
                        ..Note::default()
                    },
                ],
                ..person("John", "Doe")
            },
        )
        .await
        .unwrap();

        let contents: Vec<_> = saved.notes.iter().map(|n| n.content.as_deref()).collect();
        assert_eq!(contents, vec![Some("first"), Some("second")]);
        assert!(saved.notes.iter().all(|n| n.person_id == saved.id));
    }

    #[tokio::test]
    async fn content_search_is_case_sensitive_and_skips_empty_content() {
        let repo = InMemoryRepository::new();
        for content in [Some("Buy milk"), Some("buy bread"), None] {
            NoteRepository::save(
                &repo,
                Note {
                    content: content.map(str::to_string),
                    ..Note::default()
                },
            )
            .await
            .unwrap();
        }

        let hits = repo.find_by_content_containing("buy").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].content.as_deref(), Some("buy bread"));

        assert_eq!(repo.find_by_content_containing("").await.unwrap().len(), 2);
    }
}
