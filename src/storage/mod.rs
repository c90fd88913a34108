use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{Contact, ContactChanges, NewContact},
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryContactStore;
pub use postgres::PgContactStore;

/// Durable storage for contacts.
///
/// Implementations enforce case-insensitive email uniqueness and report it as
/// `AppError::DuplicateEmail`; lookups on a missing id report
/// `AppError::ContactNotFound`.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Newest first. `search` is a non-empty, already trimmed term matched as a
    /// case-insensitive substring of first/last name, email, phone or company.
    async fn list(&self, search: Option<&str>) -> AppResult<Vec<Contact>>;

    async fn get(&self, id: &str) -> AppResult<Contact>;

    async fn insert(&self, contact: NewContact) -> AppResult<Contact>;

    async fn update(&self, id: &str, changes: ContactChanges) -> AppResult<Contact>;

    async fn delete(&self, id: &str) -> AppResult<()>;

    /// Liveness probe against the backend.
    async fn ping(&self) -> AppResult<()>;
}

pub type SharedStore = Arc<dyn ContactStore>;
