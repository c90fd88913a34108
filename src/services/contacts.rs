use crate::{
    error::{AppError, AppResult},
    models::{Contact, ContactChanges, ContactInput, ContactPatch, NewContact, Patch},
    storage::SharedStore,
};

const REQUIRED_FIELDS: &str = "firstName and email are required";

/// Trims a field; blank becomes `None`.
fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Notes are stored verbatim unless they are blank.
fn notes(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Normalizes an optional field on update. Absent and `null` leave the stored
/// value alone, a blank string clears it.
fn optional_change(patch: Patch<String>, keep_whitespace: bool) -> Patch<String> {
    match patch {
        Patch::Unset | Patch::Null => Patch::Unset,
        Patch::Value(v) if v.trim().is_empty() => Patch::Null,
        Patch::Value(v) if keep_whitespace => Patch::Value(v),
        Patch::Value(v) => Patch::Value(v.trim().to_string()),
    }
}

fn required_change(patch: Patch<String>, field: &str) -> AppResult<Patch<String>> {
    match patch {
        Patch::Unset | Patch::Null => Ok(Patch::Unset),
        Patch::Value(v) => {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                return Err(AppError::Validation(format!("{} cannot be empty", field)));
            }
            Ok(Patch::Value(trimmed.to_string()))
        }
    }
}

pub struct ContactsService {
    store: SharedStore,
}

impl ContactsService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// List contacts, optionally filtered by a free-text search term
    pub async fn list_contacts(&self, query: Option<&str>) -> AppResult<Vec<Contact>> {
        let term = query.map(str::trim).filter(|q| !q.is_empty());
        self.store.list(term).await
    }

    pub async fn get_contact(&self, id: &str) -> AppResult<Contact> {
        self.store.get(id).await
    }

    /// Create a contact from a wire body
    pub async fn create_contact(&self, input: ContactInput) -> AppResult<Contact> {
        let new_contact = Self::validate_new(input)?;
        let contact = self.store.insert(new_contact).await?;

        tracing::info!("Created contact {}", contact.id);
        Ok(contact)
    }

    /// Merge the supplied fields into an existing contact
    pub async fn update_contact(&self, id: &str, patch: ContactPatch) -> AppResult<Contact> {
        let changes = Self::validate_changes(patch)?;
        let contact = self.store.update(id, changes).await?;

        tracing::info!("Updated contact {}", contact.id);
        Ok(contact)
    }

    pub async fn delete_contact(&self, id: &str) -> AppResult<()> {
        self.store.delete(id).await?;

        tracing::info!("Deleted contact {}", id);
        Ok(())
    }

    pub fn validate_new(input: ContactInput) -> AppResult<NewContact> {
        let (Some(first_name), Some(email)) = (trimmed(input.first_name), trimmed(input.email))
        else {
            return Err(AppError::Validation(REQUIRED_FIELDS.to_string()));
        };

        Ok(NewContact {
            first_name,
            last_name: trimmed(input.last_name),
            email,
            phone: trimmed(input.phone),
            company: trimmed(input.company),
            avatar_url: trimmed(input.avatar_url),
            notes: notes(input.notes),
        })
    }

    pub fn validate_changes(patch: ContactPatch) -> AppResult<ContactChanges> {
        Ok(ContactChanges {
            first_name: required_change(patch.first_name, "firstName")?,
            last_name: optional_change(patch.last_name, false),
            email: required_change(patch.email, "email")?,
            phone: optional_change(patch.phone, false),
            company: optional_change(patch.company, false),
            avatar_url: optional_change(patch.avatar_url, false),
            notes: optional_change(patch.notes, true),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_first_name_and_email() {
        let input = ContactInput {
            first_name: Some("   ".to_string()),
            email: Some("ana@x.com".to_string()),
            ..Default::default()
        };

        let err = ContactsService::validate_new(input).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == REQUIRED_FIELDS));
    }

    #[test]
    fn create_trims_and_nulls_blank_optionals() {
        let input = ContactInput {
            first_name: Some(" Ana ".to_string()),
            last_name: Some("  ".to_string()),
            email: Some(" ana@x.com".to_string()),
            company: Some(" Acme ".to_string()),
            notes: Some("  keep my spacing ".to_string()),
            ..Default::default()
        };

        let new_contact = ContactsService::validate_new(input).unwrap();
        assert_eq!(new_contact.first_name, "Ana");
        assert_eq!(new_contact.email, "ana@x.com");
        assert_eq!(new_contact.last_name, None);
        assert_eq!(new_contact.company.as_deref(), Some("Acme"));
        assert_eq!(new_contact.notes.as_deref(), Some("  keep my spacing "));
        assert_eq!(new_contact.phone, None);
    }

    #[test]
    fn update_null_means_unchanged_and_blank_means_cleared() {
        let patch = ContactPatch {
            first_name: Patch::Null,
            last_name: Patch::Value(" ".to_string()),
            phone: Patch::Null,
            company: Patch::Value(" Acme ".to_string()),
            ..Default::default()
        };

        let changes = ContactsService::validate_changes(patch).unwrap();
        assert_eq!(changes.first_name, Patch::Unset);
        assert_eq!(changes.last_name, Patch::Null);
        assert_eq!(changes.phone, Patch::Unset);
        assert_eq!(changes.company, Patch::Value("Acme".to_string()));
        assert_eq!(changes.email, Patch::Unset);
    }

    #[test]
    fn update_rejects_blank_required_fields() {
        let patch = ContactPatch {
            email: Patch::Value("   ".to_string()),
            ..Default::default()
        };

        let err = ContactsService::validate_changes(patch).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "email cannot be empty"));
    }
}
