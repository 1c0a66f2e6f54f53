//! Route table.

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::StubState;
use crate::{accounts, oauth, ui};

/// Builds the stub application router.
///
/// Method routing doubles as part of the contract: a `GET` against the
/// token route answers 405 because only `POST` is registered.
pub fn create_router(state: StubState) -> Router {
    Router::new()
        .route("/", get(ui::home))
        .route("/health", get(ui::health))
        .route("/login", get(ui::login_page).post(ui::login_submit))
        .route("/logout", get(ui::logout).post(ui::logout))
        .route("/oauth/token", post(oauth::token))
        .route("/register", post(accounts::register))
        .route("/accounts/{id}", delete(accounts::delete_account))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
