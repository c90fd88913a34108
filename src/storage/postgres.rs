use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool, Postgres, QueryBuilder};

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{generate_id, Contact, ContactChanges, NewContact, Patch},
};

use super::ContactStore;

const PRIMARY_KEY: &str = "contacts_pkey";
const EMAIL_INDEX: &str = "uq_contacts_email";
const MAX_ID_ATTEMPTS: usize = 3;

#[derive(Debug, PartialEq, Eq)]
enum UniqueKey {
    Id,
    Email,
}

/// Which unique constraint, if any, rejected a write.
fn unique_violation(err: &sqlx::Error) -> Option<UniqueKey> {
    let db_err = err.as_database_error()?;
    if !db_err.is_unique_violation() {
        return None;
    }

    Some(unique_key(db_err.constraint()))
}

/// Maps a violated constraint name to the key it guards. The email index is
/// the only unique constraint besides the primary key.
fn unique_key(constraint: Option<&str>) -> UniqueKey {
    match constraint {
        Some(PRIMARY_KEY) => UniqueKey::Id,
        Some(EMAIL_INDEX) => UniqueKey::Email,
        other => {
            tracing::warn!("Unexpected unique constraint {:?}, treating as email", other);
            UniqueKey::Email
        }
    }
}

/// Escapes LIKE metacharacters so the term matches literally.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn push_change(qb: &mut QueryBuilder<'_, Postgres>, column: &str, change: Patch<String>) {
    match change {
        Patch::Unset => {}
        Patch::Null => {
            qb.push(", ").push(column).push(" = NULL");
        }
        Patch::Value(value) => {
            qb.push(", ").push(column).push(" = ").push_bind(value);
        }
    }
}

#[derive(Clone)]
pub struct PgContactStore {
    db: PgPool,
}

impl PgContactStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Opens the shared connection pool.
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let db = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .connect(&config.database_url())
            .await?;

        Ok(Self::new(db))
    }

    /// Creates the contacts table and its indexes if they are missing.
    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.db).await?;
        Ok(())
    }

    /// Inserts under the first id the primary key accepts.
    async fn insert_with_ids<I>(&self, contact: NewContact, ids: I) -> AppResult<Contact>
    where
        I: IntoIterator<Item = String>,
    {
        for id in ids {
            let result: Result<Contact, sqlx::Error> = sqlx::query_as(
                r#"
                INSERT INTO contacts
                    (id, first_name, last_name, email, phone, company, avatar_url, notes)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING *
                "#,
            )
            .bind(&id)
            .bind(&contact.first_name)
            .bind(&contact.last_name)
            .bind(&contact.email)
            .bind(&contact.phone)
            .bind(&contact.company)
            .bind(&contact.avatar_url)
            .bind(&contact.notes)
            .fetch_one(&self.db)
            .await;

            match result {
                Ok(created) => return Ok(created),
                Err(e) => match unique_violation(&e) {
                    Some(UniqueKey::Email) => return Err(AppError::DuplicateEmail),
                    Some(UniqueKey::Id) => {
                        tracing::warn!("Contact id {} already taken, regenerating", id);
                    }
                    None => return Err(e.into()),
                },
            }
        }

        Err(AppError::Internal(anyhow::anyhow!(
            "could not allocate a unique contact id"
        )))
    }
}

#[async_trait]
impl ContactStore for PgContactStore {
    async fn list(&self, search: Option<&str>) -> AppResult<Vec<Contact>> {
        let contacts: Vec<Contact> = match search {
            Some(term) => {
                sqlx::query_as(
                    r#"
                    SELECT * FROM contacts
                    WHERE first_name ILIKE $1 ESCAPE '\'
                       OR last_name ILIKE $1 ESCAPE '\'
                       OR email ILIKE $1 ESCAPE '\'
                       OR phone ILIKE $1 ESCAPE '\'
                       OR company ILIKE $1 ESCAPE '\'
                    ORDER BY created_at DESC
                    "#,
                )
                .bind(like_pattern(term))
                .fetch_all(&self.db)
                .await?
            }
            None => {
                sqlx::query_as("SELECT * FROM contacts ORDER BY created_at DESC")
                    .fetch_all(&self.db)
                    .await?
            }
        };

        Ok(contacts)
    }

    async fn get(&self, id: &str) -> AppResult<Contact> {
        let contact: Option<Contact> = sqlx::query_as("SELECT * FROM contacts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        contact.ok_or(AppError::ContactNotFound)
    }

    async fn insert(&self, contact: NewContact) -> AppResult<Contact> {
        let ids = std::iter::repeat_with(generate_id).take(MAX_ID_ATTEMPTS);
        self.insert_with_ids(contact, ids).await
    }

    async fn update(&self, id: &str, changes: ContactChanges) -> AppResult<Contact> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE contacts SET updated_at = NOW()");
        push_change(&mut qb, "first_name", changes.first_name);
        push_change(&mut qb, "last_name", changes.last_name);
        push_change(&mut qb, "email", changes.email);
        push_change(&mut qb, "phone", changes.phone);
        push_change(&mut qb, "company", changes.company);
        push_change(&mut qb, "avatar_url", changes.avatar_url);
        push_change(&mut qb, "notes", changes.notes);
        qb.push(" WHERE id = ").push_bind(id.to_string());
        qb.push(" RETURNING *");

        let contact: Option<Contact> = qb
            .build_query_as()
            .fetch_optional(&self.db)
            .await
            .map_err(|e| match unique_violation(&e) {
                // The id is never rewritten, so only the email index can reject this
                Some(_) => AppError::DuplicateEmail,
                None => AppError::Database(e),
            })?;

        contact.ok_or(AppError::ContactNotFound)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ContactNotFound);
        }

        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.db)
            .await
            .map_err(|e| {
                tracing::warn!("Health check query failed: {}", e);
                AppError::StoreUnavailable
            })?;

        Ok(())
    }
}
