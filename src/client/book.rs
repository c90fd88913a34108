use crate::models::Contact;

use super::{
    api::ContactsApi,
    error::{ClientError, ClientResult},
    form::ContactForm,
};

/// Client-side state for browsing and editing contacts.
///
/// The book is either idle or editing a single contact; `submit` creates a
/// contact while idle and updates the edited one otherwise.
pub struct ContactBook<A> {
    api: A,
    contacts: Vec<Contact>,
    query: String,
    form: ContactForm,
    editing: Option<Contact>,
}

impl<A: ContactsApi> ContactBook<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            contacts: Vec::new(),
            query: String::new(),
            form: ContactForm::default(),
            editing: None,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ContactForm {
        &mut self.form
    }

    pub fn editing(&self) -> Option<&Contact> {
        self.editing.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Re-fetch the list using the current search text.
    pub async fn load(&mut self) -> ClientResult<&[Contact]> {
        let query = self.query.trim();
        let q = (!query.is_empty()).then_some(query);

        self.contacts = self.api.list(q).await?;
        Ok(&self.contacts)
    }

    pub async fn search(&mut self, query: impl Into<String>) -> ClientResult<&[Contact]> {
        self.set_query(query);
        self.load().await
    }

    /// Save the form, then reset it and reload the list.
    pub async fn submit(&mut self) -> ClientResult<Contact> {
        if !self.form.is_complete() {
            return Err(ClientError::IncompleteForm);
        }

        let editing_id = self.editing.as_ref().map(|c| c.id.clone());
        let saved = match editing_id {
            Some(id) => {
                let saved = self.api.update(&id, &self.form.to_update_body()).await?;
                self.cancel();
                saved
            }
            None => {
                let saved = self.api.create(&self.form.to_create_body()).await?;
                self.reset();
                saved
            }
        };

        self.load().await?;
        Ok(saved)
    }

    pub fn edit(&mut self, contact: &Contact) {
        self.form = ContactForm::from_contact(contact);
        self.editing = Some(contact.clone());
    }

    /// Delete after `confirm` agrees; returns whether anything was removed.
    pub async fn delete<F>(&mut self, id: &str, confirm: F) -> ClientResult<bool>
    where
        F: FnOnce(&str) -> bool,
    {
        if !confirm(id) {
            return Ok(false);
        }

        self.api.remove(id).await?;
        if self.editing.as_ref().is_some_and(|c| c.id == id) {
            self.cancel();
        }
        self.load().await?;

        Ok(true)
    }

    /// Drop the in-progress edit.
    pub fn cancel(&mut self) {
        self.editing = None;
        self.reset();
    }

    pub fn reset(&mut self) {
        self.form = ContactForm::default();
    }
}
