use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::{generate_id, Contact, ContactChanges, NewContact, Patch},
};

use super::ContactStore;

/// Process-local store with the same contract as the Postgres one.
///
/// Contacts are kept in insertion order, so the newest contact is last.
#[derive(Default)]
pub struct MemoryContactStore {
    contacts: RwLock<Vec<Contact>>,
}

impl MemoryContactStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn same_email(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn matches_term(contact: &Contact, term: &str) -> bool {
    let contains = |field: &str| field.to_lowercase().contains(term);

    contains(&contact.first_name)
        || contact.last_name.as_deref().is_some_and(contains)
        || contains(&contact.email)
        || contact.phone.as_deref().is_some_and(contains)
        || contact.company.as_deref().is_some_and(contains)
}

#[async_trait]
impl ContactStore for MemoryContactStore {
    async fn list(&self, search: Option<&str>) -> AppResult<Vec<Contact>> {
        let contacts = self.contacts.read().await;
        let term = search.map(str::to_lowercase);

        let mut result: Vec<Contact> = contacts
            .iter()
            .rev()
            .filter(|c| term.as_deref().map_or(true, |t| matches_term(c, t)))
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(result)
    }

    async fn get(&self, id: &str) -> AppResult<Contact> {
        let contacts = self.contacts.read().await;
        contacts
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(AppError::ContactNotFound)
    }

    async fn insert(&self, contact: NewContact) -> AppResult<Contact> {
        let mut contacts = self.contacts.write().await;

        if contacts.iter().any(|c| same_email(&c.email, &contact.email)) {
            return Err(AppError::DuplicateEmail);
        }

        let mut id = generate_id();
        while contacts.iter().any(|c| c.id == id) {
            id = generate_id();
        }

        let created = Contact {
            id,
            first_name: contact.first_name,
            last_name: contact.last_name,
            email: contact.email,
            phone: contact.phone,
            company: contact.company,
            avatar_url: contact.avatar_url,
            notes: contact.notes,
            created_at: Utc::now(),
            updated_at: None,
        };
        contacts.push(created.clone());

        Ok(created)
    }

    async fn update(&self, id: &str, changes: ContactChanges) -> AppResult<Contact> {
        let mut contacts = self.contacts.write().await;

        let index = contacts
            .iter()
            .position(|c| c.id == id)
            .ok_or(AppError::ContactNotFound)?;

        if let Patch::Value(email) = &changes.email {
            if contacts
                .iter()
                .any(|c| c.id != id && same_email(&c.email, email))
            {
                return Err(AppError::DuplicateEmail);
            }
        }

        let contact = &mut contacts[index];
        contact.merge(changes);

        // Keep updated_at strictly increasing across quick successive updates
        let now = Utc::now();
        contact.updated_at = match contact.updated_at {
            Some(previous) if previous >= now => Some(previous + Duration::microseconds(1)),
            _ => Some(now),
        };

        Ok(contact.clone())
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let mut contacts = self.contacts.write().await;
        let before = contacts.len();
        contacts.retain(|c| c.id != id);

        if contacts.len() == before {
            return Err(AppError::ContactNotFound);
        }

        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
