//! Client side of the contacts API: an HTTP binding and the form-backed
//! contact book that drives it.

pub mod api;
pub mod book;
pub mod error;
pub mod form;

pub use api::{ContactsApi, HttpContactsApi, DEFAULT_API_URL};
pub use book::ContactBook;
pub use error::{ClientError, ClientResult};
pub use form::ContactForm;
