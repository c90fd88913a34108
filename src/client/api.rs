use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;

use crate::models::{Contact, ContactInput};

use super::error::{ClientError, ClientResult};

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api/contacts";

/// Remote operations the contact book needs.
#[async_trait]
pub trait ContactsApi: Send + Sync {
    async fn list(&self, q: Option<&str>) -> ClientResult<Vec<Contact>>;
    async fn get(&self, id: &str) -> ClientResult<Contact>;
    async fn create(&self, body: &ContactInput) -> ClientResult<Contact>;
    async fn update(&self, id: &str, body: &ContactInput) -> ClientResult<Contact>;
    async fn remove(&self, id: &str) -> ClientResult<()>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// `ContactsApi` over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpContactsApi {
    client: Client,
    base_url: String,
}

impl HttpContactsApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn contact_url(&self, id: &str) -> String {
        format!("{}/{}", self.base_url, id)
    }

    /// Turns non-success statuses into typed errors.
    async fn check(response: Response) -> ClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status.canonical_reason().unwrap_or("unknown").to_string(),
        };

        Err(match status {
            StatusCode::BAD_REQUEST => ClientError::Validation(message),
            StatusCode::NOT_FOUND => ClientError::NotFound,
            StatusCode::CONFLICT => ClientError::DuplicateEmail,
            _ => ClientError::Server {
                status: status.as_u16(),
                message,
            },
        })
    }
}

#[async_trait]
impl ContactsApi for HttpContactsApi {
    async fn list(&self, q: Option<&str>) -> ClientResult<Vec<Contact>> {
        let mut request = self.client.get(&self.base_url);
        if let Some(q) = q.map(str::trim).filter(|q| !q.is_empty()) {
            request = request.query(&[("q", q)]);
        }

        let response = Self::check(request.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn get(&self, id: &str) -> ClientResult<Contact> {
        let response = self.client.get(self.contact_url(id)).send().await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    async fn create(&self, body: &ContactInput) -> ClientResult<Contact> {
        let response = self.client.post(&self.base_url).json(body).send().await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    async fn update(&self, id: &str, body: &ContactInput) -> ClientResult<Contact> {
        let response = self
            .client
            .put(self.contact_url(id))
            .json(body)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    async fn remove(&self, id: &str) -> ClientResult<()> {
        let response = self.client.delete(self.contact_url(id)).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_drops_trailing_slash() {
        let api = HttpContactsApi::new("http://localhost:3000/api/contacts/");
        assert_eq!(api.base_url(), DEFAULT_API_URL);
        assert_eq!(
            api.contact_url("abcd1234"),
            "http://localhost:3000/api/contacts/abcd1234"
        );
    }
}
