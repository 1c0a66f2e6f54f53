//! Registration and account deletion handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::{StoredAccount, StubState};

/// JSON body of a registration request.
#[derive(Debug, Deserialize)]
pub struct RegistrationRequest {
    /// Email address, required.
    pub email: String,
    /// Username; defaults to the email address.
    pub username: Option<String>,
    /// Password, required.
    pub password: String,
    /// Given name.
    #[serde(rename = "givenName")]
    pub given_name: Option<String>,
    /// Surname.
    pub surname: Option<String>,
}

/// POST `/register` — creates an account and returns its representation.
pub async fn register(
    State(state): State<StubState>,
    Json(request): Json<RegistrationRequest>,
) -> Response {
    if request.email.is_empty() || request.password.is_empty() {
        return ApiError::bad_request("invalid_request", "email and password are required.")
            .into_response();
    }

    let account = StoredAccount {
        id: Uuid::new_v4().simple().to_string(),
        username: request
            .username
            .clone()
            .unwrap_or_else(|| request.email.clone()),
        email: request.email,
        password: request.password,
        given_name: request.given_name.unwrap_or_default(),
        surname: request.surname.unwrap_or_default(),
    };
    let view = account.view();
    tracing::debug!(href = %view.href, "registered account");
    state.insert(account);

    (StatusCode::OK, Json(json!({"account": view}))).into_response()
}

/// DELETE `/accounts/{id}` — removes an account.
pub async fn delete_account(State(state): State<StubState>, Path(id): Path<String>) -> Response {
    if state.remove(&id) {
        tracing::debug!(%id, "deleted account");
        StatusCode::NO_CONTENT.into_response()
    } else {
        ApiError::not_found(format!("No account with id {id}.")).into_response()
    }
}
