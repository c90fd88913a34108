use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use contacts_api::{
    client::{ClientError, ClientResult, ContactBook, ContactsApi},
    models::{Contact, ContactInput},
};
use tokio_test::assert_ok;

/// In-process stand-in for the HTTP API that records every call.
#[derive(Default)]
struct FakeApi {
    contacts: Mutex<Vec<Contact>>,
    calls: Mutex<Vec<String>>,
}

impl FakeApi {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn blank_to_none(value: &Option<String>) -> Option<String> {
        value.clone().filter(|v| !v.trim().is_empty())
    }
}

#[async_trait]
impl ContactsApi for FakeApi {
    async fn list(&self, q: Option<&str>) -> ClientResult<Vec<Contact>> {
        self.record(format!("list {}", q.unwrap_or("")));
        let contacts = self.contacts.lock().unwrap();
        let term = q.map(str::to_lowercase);

        Ok(contacts
            .iter()
            .rev()
            .filter(|c| {
                term.as_deref()
                    .map_or(true, |t| c.first_name.to_lowercase().contains(t))
            })
            .cloned()
            .collect())
    }

    async fn get(&self, id: &str) -> ClientResult<Contact> {
        self.record(format!("get {}", id));
        let contacts = self.contacts.lock().unwrap();
        contacts
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(ClientError::NotFound)
    }

    async fn create(&self, body: &ContactInput) -> ClientResult<Contact> {
        self.record("create".to_string());
        let mut contacts = self.contacts.lock().unwrap();
        let email = body.email.clone().unwrap_or_default();
        if contacts.iter().any(|c| c.email.eq_ignore_ascii_case(&email)) {
            return Err(ClientError::DuplicateEmail);
        }

        let contact = Contact {
            id: format!("id{:06}", contacts.len()),
            first_name: body.first_name.clone().unwrap_or_default(),
            last_name: Self::blank_to_none(&body.last_name),
            email,
            phone: Self::blank_to_none(&body.phone),
            company: Self::blank_to_none(&body.company),
            avatar_url: Self::blank_to_none(&body.avatar_url),
            notes: Self::blank_to_none(&body.notes),
            created_at: Utc::now(),
            updated_at: None,
        };
        contacts.push(contact.clone());
        Ok(contact)
    }

    async fn update(&self, id: &str, body: &ContactInput) -> ClientResult<Contact> {
        self.record(format!("update {}", id));
        let mut contacts = self.contacts.lock().unwrap();
        let contact = contacts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(ClientError::NotFound)?;

        if let Some(first_name) = &body.first_name {
            contact.first_name = first_name.clone();
        }
        if let Some(email) = &body.email {
            contact.email = email.clone();
        }
        if body.company.is_some() {
            contact.company = Self::blank_to_none(&body.company);
        }
        if body.last_name.is_some() {
            contact.last_name = Self::blank_to_none(&body.last_name);
        }
        contact.updated_at = Some(Utc::now());
        Ok(contact.clone())
    }

    async fn remove(&self, id: &str) -> ClientResult<()> {
        self.record(format!("remove {}", id));
        let mut contacts = self.contacts.lock().unwrap();
        let before = contacts.len();
        contacts.retain(|c| c.id != id);
        if contacts.len() == before {
            return Err(ClientError::NotFound);
        }
        Ok(())
    }
}

async fn book_with(names: &[&str]) -> ContactBook<FakeApi> {
    let mut book = ContactBook::new(FakeApi::default());
    for name in names {
        let form = book.form_mut();
        form.first_name = name.to_string();
        form.email = format!("{}@x.com", name.to_lowercase());
        book.submit().await.unwrap();
    }
    book
}

#[tokio::test]
async fn submit_creates_resets_form_and_reloads() {
    let mut book = ContactBook::new(FakeApi::default());
    book.form_mut().first_name = "Ana".to_string();
    book.form_mut().email = "ana@x.com".to_string();
    book.form_mut().company = "Acme".to_string();

    let created = book.submit().await.unwrap();

    assert_eq!(created.company.as_deref(), Some("Acme"));
    assert_eq!(created.last_name, None);
    assert_eq!(book.form().first_name, "");
    assert!(!book.is_editing());
    assert_eq!(book.contacts().len(), 1);
    assert_eq!(book.api().calls(), ["create", "list "]);
}

#[tokio::test]
async fn incomplete_form_is_not_submitted() {
    let mut book = ContactBook::new(FakeApi::default());
    book.form_mut().first_name = "Ana".to_string();
    book.form_mut().email = "   ".to_string();

    let err = book.submit().await.unwrap_err();

    assert!(matches!(err, ClientError::IncompleteForm));
    assert!(book.api().calls().is_empty());
    assert_eq!(book.form().first_name, "Ana");
}

#[tokio::test]
async fn edit_then_submit_updates_the_edited_contact() {
    let mut book = book_with(&["Ana", "Bob"]).await;
    let ana = book
        .contacts()
        .iter()
        .find(|c| c.first_name == "Ana")
        .cloned()
        .unwrap();

    book.edit(&ana);
    assert!(book.is_editing());
    assert_eq!(book.form().email, "ana@x.com");

    book.form_mut().company = "Acme".to_string();
    let updated = book.submit().await.unwrap();

    assert_eq!(updated.id, ana.id);
    assert_eq!(updated.company.as_deref(), Some("Acme"));
    assert!(updated.updated_at.is_some());
    assert!(!book.is_editing());
    assert_eq!(book.form().company, "");
    assert!(book
        .api()
        .calls()
        .contains(&format!("update {}", ana.id)));
}

#[tokio::test]
async fn cancel_discards_the_edit() {
    let mut book = book_with(&["Ana"]).await;
    let ana = book.contacts()[0].clone();

    book.edit(&ana);
    book.form_mut().first_name = "Changed".to_string();
    book.cancel();

    assert!(book.editing().is_none());
    assert_eq!(book.form().first_name, "");
    assert_eq!(book.api().get(&ana.id).await.unwrap().first_name, "Ana");
}

#[tokio::test]
async fn delete_asks_for_confirmation() {
    let mut book = book_with(&["Ana", "Bob"]).await;
    let bob_id = book.contacts()[0].id.clone();

    let removed = book.delete(&bob_id, |_| false).await.unwrap();
    assert!(!removed);
    assert_eq!(book.contacts().len(), 2);

    let mut asked_for = None;
    let removed = book
        .delete(&bob_id, |id| {
            asked_for = Some(id.to_string());
            true
        })
        .await
        .unwrap();
    assert!(removed);
    assert_eq!(asked_for.as_deref(), Some(bob_id.as_str()));
    assert_eq!(book.contacts().len(), 1);
    assert_eq!(book.contacts()[0].first_name, "Ana");
}

#[tokio::test]
async fn search_trims_the_query() {
    let mut book = book_with(&["Ana", "Bob"]).await;

    let found = book.search("  bo ").await.unwrap().to_vec();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].first_name, "Bob");
    assert_eq!(book.query(), "  bo ");

    assert_ok!(book.search("").await.map(|c| c.len()));
    assert_eq!(book.contacts().len(), 2);
    assert_eq!(book.api().calls().last().unwrap(), "list ");
}

#[tokio::test]
async fn duplicate_email_keeps_the_form() {
    let mut book = book_with(&["Ana"]).await;
    book.form_mut().first_name = "Other".to_string();
    book.form_mut().email = "ANA@x.com".to_string();

    let err = book.submit().await.unwrap_err();

    assert!(matches!(err, ClientError::DuplicateEmail));
    assert_eq!(book.form().first_name, "Other");
}
