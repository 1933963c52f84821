mod embedded;
mod memory;
mod postgres;

pub use memory::InMemoryRepository;
pub use postgres::PgRepository;

use async_trait::async_trait;

use crate::models::{Note, Person};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] refinery::Error),

    #[error("Entity with id '{0}' already exists")]
    Duplicate(String),

    #[error("In-memory store lock poisoned")]
    Poisoned,
}

/// Storage for persons. Persons are always returned with their notes attached.
#[async_trait]
pub trait PersonRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Person>, RepositoryError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Person>, RepositoryError>;

    /// Inserts a new person, generating an id when absent. Notes carried by
    /// `person` are inserted as owned by it. Existing rows are never replaced.
    async fn save(&self, person: Person) -> Result<Person, RepositoryError>;

    async fn find_by_first_name(&self, first_name: &str) -> Result<Vec<Person>, RepositoryError>;

    async fn find_by_last_name(&self, last_name: &str) -> Result<Vec<Person>, RepositoryError>;

    async fn find_by_first_name_and_last_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Vec<Person>, RepositoryError>;
}

/// Storage for notes.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Note>, RepositoryError>;

    /// Inserts a new note, generating an id when absent.
    async fn save(&self, note: Note) -> Result<Note, RepositoryError>;

    /// Notes whose content contains `content` verbatim (case-sensitive).
    /// Notes without content never match.
    async fn find_by_content_containing(&self, content: &str)
    -> Result<Vec<Note>, RepositoryError>;
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
