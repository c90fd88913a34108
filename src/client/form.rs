use crate::models::{Contact, ContactInput};

/// In-progress contact form. Every field is plain text; an empty string
/// means the user left it blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub notes: String,
    pub avatar_url: String,
}

impl ContactForm {
    /// A form pre-filled from an existing contact.
    pub fn from_contact(contact: &Contact) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();

        Self {
            first_name: contact.first_name.clone(),
            last_name: text(&contact.last_name),
            email: contact.email.clone(),
            phone: text(&contact.phone),
            company: text(&contact.company),
            notes: text(&contact.notes),
            avatar_url: text(&contact.avatar_url),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.first_name.trim().is_empty() && !self.email.trim().is_empty()
    }

    /// Body for a create request; blank fields are left out.
    pub fn to_create_body(&self) -> ContactInput {
        let filled = |value: &str| Some(value.to_string()).filter(|v| !v.trim().is_empty());

        ContactInput {
            first_name: filled(&self.first_name),
            last_name: filled(&self.last_name),
            email: filled(&self.email),
            phone: filled(&self.phone),
            company: filled(&self.company),
            avatar_url: filled(&self.avatar_url),
            notes: filled(&self.notes),
        }
    }

    /// Body for an update request. Every field is sent so that blanking a
    /// field clears it on the server.
    pub fn to_update_body(&self) -> ContactInput {
        ContactInput {
            first_name: Some(self.first_name.clone()),
            last_name: Some(self.last_name.clone()),
            email: Some(self.email.clone()),
            phone: Some(self.phone.clone()),
            company: Some(self.company.clone()),
            avatar_url: Some(self.avatar_url.clone()),
            notes: Some(self.notes.clone()),
        }
    }
}
