use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio_postgres::{Client, GenericClient, NoTls, Row, error::SqlState, types::ToSql};

use super::{NoteRepository, PersonRepository, RepositoryError, embedded::migrations, new_id};
use crate::models::{Note, Person};

/// PostgreSQL storage for both persons and notes.
///
/// The client sits behind a mutex because saving a person opens a transaction,
/// which needs exclusive access to the connection.
pub struct PgRepository {
    client: Mutex<Client>,
}

impl PgRepository {
    pub async fn new(database_dsn: &str) -> Result<Self, tokio_postgres::Error> {
        let (client, con) = tokio_postgres::connect(database_dsn, NoTls).await?;

        tokio::spawn(async move {
            if let Err(e) = con.await {
                tracing::error!("connection error: {}", e);
            }
        });

        Ok(Self {
            client: Mutex::new(client),
        })
    }

    pub async fn migrate(&self) -> Result<(), RepositoryError> {
        let mut client = self.client.lock().await;
        let migrations_report = migrations::runner().run_async(&mut *client).await?;

        for migration in migrations_report.applied_migrations() {
            tracing::info!(
                "Migration Applied -  Name: {}, Version: {}",
                migration.name(),
                migration.version()
            );
        }

        tracing::info!("DB migrations finished!");

        Ok(())
    }

    async fn query_persons(
        &self,
        filter: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Person>, RepositoryError> {
        let sql = format!("SELECT id, first_name, last_name FROM persons {filter} ORDER BY seq");

        let client = self.client.lock().await;
        let rows = client.query(&*sql, params).await?;

        let persons = rows.iter().map(person_from_row).collect();
        with_notes(&*client, persons).await
    }
}

fn person_from_row(row: &Row) -> Person {
    Person {
        id: Some(row.get("id")),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        notes: Vec::new(),
    }
}

fn note_from_row(row: &Row) -> Note {
    Note {
        id: Some(row.get("id")),
        content: row.get("content"),
        person_id: row.get("person_id"),
    }
}

fn duplicate_or_database(id: &str) -> impl FnOnce(tokio_postgres::Error) -> RepositoryError + '_ {
    move |e| {
        if e.code() == Some(&SqlState::UNIQUE_VIOLATION) {
            RepositoryError::Duplicate(id.to_string())
        } else {
            RepositoryError::Database(e)
        }
    }
}

async fn insert_note<C>(client: &C, note: Note) -> Result<Note, RepositoryError>
where
    C: GenericClient + Sync,
{
    let id = note.id.unwrap_or_else(new_id);
    let row = client
        .query_one(
            "INSERT INTO notes (id, content, person_id) VALUES ($1, $2, $3) \
             RETURNING id, content, person_id",
            &[&id, &note.content, &note.person_id],
        )
        .await
        .map_err(duplicate_or_database(&id))?;

    Ok(note_from_row(&row))
}

/// Attaches stored notes to every given person in one round trip.
async fn with_notes<C>(client: &C, mut persons: Vec<Person>) -> Result<Vec<Person>, RepositoryError>
where
    C: GenericClient + Sync,
{
    let ids: Vec<String> = persons.iter().filter_map(|p| p.id.clone()).collect();
    if ids.is_empty() {
        return Ok(persons);
    }

    let rows = client
        .query(
            "SELECT id, content, person_id FROM notes WHERE person_id = ANY($1) ORDER BY seq",
            &[&ids],
        )
        .await?;

    let mut by_person: HashMap<String, Vec<Note>> = HashMap::new();
    for row in rows {
        let note = note_from_row(&row);
        if let Some(person_id) = note.person_id.clone() {
            by_person.entry(person_id).or_default().push(note);
        }
    }

    for person in &mut persons {
        if let Some(id) = &person.id {
            person.notes = by_person.remove(id).unwrap_or_default();
        }
    }

    Ok(persons)
}

#[async_trait]
impl PersonRepository for PgRepository {
    async fn find_all(&self) -> Result<Vec<Person>, RepositoryError> {
        self.query_persons("", &[]).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Person>, RepositoryError> {
        let mut persons = self.query_persons("WHERE id = $1", &[&id]).await?;
        Ok(persons.pop())
    }

    async fn save(&self, person: Person) -> Result<Person, RepositoryError> {
        let mut client = self.client.lock().await;
        let tx = client.transaction().await?;

        let id = person.id.unwrap_or_else(new_id);
        let row = tx
            .query_one(
                "INSERT INTO persons (id, first_name, last_name) VALUES ($1, $2, $3) \
                 RETURNING id, first_name, last_name",
                &[&id, &person.first_name, &person.last_name],
            )
            .await
            .map_err(duplicate_or_database(&id))?;

        for note in person.notes {
            let note = Note {
                person_id: Some(id.clone()),
                ..note
            };
            insert_note(&tx, note).await?;
        }

        let notes = tx
            .query(
                "SELECT id, content, person_id FROM notes WHERE person_id = $1 ORDER BY seq",
                &[&id],
            )
            .await?;

        let mut saved = person_from_row(&row);
        saved.notes = notes.iter().map(note_from_row).collect();

        tx.commit().await?;

        Ok(saved)
    }

    async fn find_by_first_name(&self, first_name: &str) -> Result<Vec<Person>, RepositoryError> {
        self.query_persons("WHERE first_name = $1", &[&first_name])
            .await
    }

    async fn find_by_last_name(&self, last_name: &str) -> Result<Vec<Person>, RepositoryError> {
        self.query_persons("WHERE last_name = $1", &[&last_name])
            .await
    }

    async fn find_by_first_name_and_last_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Vec<Person>, RepositoryError> {
        self.query_persons(
            "WHERE first_name = $1 AND last_name = $2",
            &[&first_name, &last_name],
        )
        .await
    }
}

#[async_trait]
impl NoteRepository for PgRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Note>, RepositoryError> {
        let client = self.client.lock().await;
        let row = client
            .query_opt(
                "SELECT id, content, person_id FROM notes WHERE id = $1",
                &[&id],
            )
            .await?;

        Ok(row.as_ref().map(note_from_row))
    }

    async fn save(&self, note: Note) -> Result<Note, RepositoryError> {
        let client = self.client.lock().await;
        insert_note(&*client, note).await
    }

    // strpos keeps `%` and `_` literal, and an empty needle matches every non-null content.
    async fn find_by_content_containing(
        &self,
        content: &str,
    ) -> Result<Vec<Note>, RepositoryError> {
        let client = self.client.lock().await;
        let rows = client
            .query(
                "SELECT id, content, person_id FROM notes WHERE strpos(content, $1) > 0 ORDER BY seq",
                &[&content],
            )
            .await?;

        Ok(rows.iter().map(note_from_row).collect())
    }
}
