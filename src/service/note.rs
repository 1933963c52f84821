use std::sync::Arc;

use crate::{
    models::Note,
    repository::{NoteRepository, RepositoryError},
};

#[derive(Clone)]
pub struct NoteService {
    repo: Arc<dyn NoteRepository>,
}

impl NoteService {
    pub fn new(repo: Arc<dyn NoteRepository>) -> Self {
        Self { repo }
    }

    pub async fn get(&self, id: &str) -> Result<Option<Note>, RepositoryError> {
        let note = self.repo.find_by_id(id).await?;
        if note.is_none() {
            tracing::debug!("note {} not found", id);
        }

        Ok(note)
    }

    pub async fn create(&self, note: Note) -> Result<Note, RepositoryError> {
        self.repo.save(note).await
    }

    /// A missing query counts as empty, which matches every note with content.
    pub async fn query_by_content(&self, query: Option<&str>) -> Result<Vec<Note>, RepositoryError> {
        self.repo
            .find_by_content_containing(query.unwrap_or_default())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryRepository;

    fn note(content: &str) -> Note {
        Note {
            content: Some(content.to_string()),
            ..Note::default()
        }
    }

    fn service() -> NoteService {
        NoteService::new(Arc::new(InMemoryRepository::new()))
    }

    #[tokio::test]
    async fn get_unknown_id_is_absent() {
        let service = service();

        assert!(service.get("missing").await.unwrap().is_none());
        assert!(service.get("").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_then_get_returns_same_content() {
        let service = service();

        let created = service.create(note("remember the milk")).await.unwrap();
        let id = created.id.clone().expect("id assigned on save");
        assert!(created.person_id.is_none());

        let fetched = service.get(&id).await.unwrap().unwrap();
        assert_eq!(fetched.content.as_deref(), Some("remember the milk"));
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn create_keeps_person_association() {
        let service = service();

        let created = service
            .create(Note {
                person_id: Some("p-1".to_string()),
                ..note("owned")
            })
            .await
            .unwrap();

        assert_eq!(created.person_id.as_deref(), Some("p-1"));
    }

    #[tokio::test]
    async fn query_by_content_matches_substrings() {
        let service = service();
        service.create(note("meeting at noon")).await.unwrap();
        service.create(note("lunch at noon")).await.unwrap();
        service.create(note("dinner")).await.unwrap();

        let hits = service.query_by_content(Some("noon")).await.unwrap();
        assert_eq!(hits.len(), 2);

        assert!(service.query_by_content(Some("breakfast")).await.unwrap().is_empty());
        assert!(service.query_by_content(Some("NOON")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_or_missing_query_matches_every_note_with_content() {
        let service = service();
        service.create(note("one")).await.unwrap();
        service.create(note("two")).await.unwrap();
        service.create(Note::default()).await.unwrap();

        assert_eq!(service.query_by_content(Some("")).await.unwrap().len(), 2);
        assert_eq!(service.query_by_content(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn wildcard_characters_in_query_match_literally() {
        let service = service();
        service.create(note("discount 50% off")).await.unwrap();
        service.create(note("discount 50 off")).await.unwrap();
        service.create(note("file_name.txt")).await.unwrap();
        service.create(note("filename.txt")).await.unwrap();

        let percent = service.query_by_content(Some("50%")).await.unwrap();
        assert_eq!(percent.len(), 1);
        assert_eq!(percent[0].content.as_deref(), Some("discount 50% off"));

        let underscore = service.query_by_content(Some("file_name")).await.unwrap();
        assert_eq!(underscore.len(), 1);
        assert_eq!(underscore[0].content.as_deref(), Some("file_name.txt"));

        assert_eq!(service.query_by_content(Some("%")).await.unwrap().len(), 1);
    }
}
