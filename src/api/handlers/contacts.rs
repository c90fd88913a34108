use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde::de::DeserializeOwned;

use crate::{
    error::{AppError, AppResult},
    models::{Contact, ContactInput, ContactPatch},
    services::contacts::ContactsService,
    AppState,
};

/// Decodes a JSON request body. An empty body decodes to `T::default()`.
fn json_body<T>(headers: &HeaderMap, body: &Bytes) -> AppResult<T>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim_start().to_ascii_lowercase().starts_with("application/json"))
        .unwrap_or(false);
    if !is_json {
        return Err(AppError::BadRequest(
            "Expected request with `Content-Type: application/json`".to_string(),
        ));
    }

    let Json(value) = Json::<T>::from_bytes(body)?;
    Ok(value)
}

pub async fn list_contacts(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> AppResult<Json<Vec<Contact>>> {
    let Query(params) = query?;
    // A repeated `q` uses its first value
    let search = params
        .into_iter()
        .find(|(key, _)| key == "q")
        .map(|(_, value)| value);

    let contacts_service = ContactsService::new(state.store);
    let contacts = contacts_service.list_contacts(search.as_deref()).await?;

    Ok(Json(contacts))
}

pub async fn get_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Contact>> {
    let contacts_service = ContactsService::new(state.store);
    let contact = contacts_service.get_contact(&id).await?;

    Ok(Json(contact))
}

pub async fn create_contact(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<(StatusCode, Json<Contact>)> {
    let input: ContactInput = json_body(&headers, &body)?;

    let contacts_service = ContactsService::new(state.store);
    let contact = contacts_service.create_contact(input).await?;

    Ok((StatusCode::CREATED, Json(contact)))
}

pub async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<Contact>> {
    let patch: ContactPatch = json_body(&headers, &body)?;

    let contacts_service = ContactsService::new(state.store);
    let contact = contacts_service.update_contact(&id, patch).await?;

    Ok(Json(contact))
}

pub async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let contacts_service = ContactsService::new(state.store);
    contacts_service.delete_contact(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}
