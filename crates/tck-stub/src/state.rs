//! In-memory account store and fixed client credentials.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

/// Client ID accepted for the client-credentials grant.
pub const CLIENT_ID: &str = "tck-client";

/// Client secret accepted for the client-credentials grant.
pub const CLIENT_SECRET: &str = "tck-secret";

/// Secret used to sign stub tokens.
pub(crate) const SIGNING_SECRET: &str = "tck-stub-signing-secret";

/// A registered account.
#[derive(Debug, Clone)]
pub struct StoredAccount {
    /// Opaque account identifier.
    pub id: String,
    /// Email address.
    pub email: String,
    /// Username.
    pub username: String,
    /// Plaintext password; the stub is a test fixture, not a vault.
    pub password: String,
    /// Given name.
    pub given_name: String,
    /// Surname.
    pub surname: String,
}

impl StoredAccount {
    /// Resource path of this account.
    #[must_use]
    pub fn href(&self) -> String {
        format!("/accounts/{}", self.id)
    }

    /// The account representation returned by login and registration.
    #[must_use]
    pub fn view(&self) -> AccountView {
        AccountView {
            href: self.href(),
            email: self.email.clone(),
            username: self.username.clone(),
            given_name: self.given_name.clone(),
            surname: self.surname.clone(),
        }
    }
}

/// Wire representation of an account.
#[derive(Debug, Clone, Serialize)]
pub struct AccountView {
    /// Resource identifier.
    pub href: String,
    /// Email address.
    pub email: String,
    /// Username.
    pub username: String,
    /// Given name.
    #[serde(rename = "givenName")]
    pub given_name: String,
    /// Surname.
    pub surname: String,
}

/// Shared stub state.
#[derive(Debug, Clone, Default)]
pub struct StubState {
    accounts: Arc<Mutex<HashMap<String, StoredAccount>>>,
}

impl StubState {
    /// Stores an account, replacing any with the same id.
    pub fn insert(&self, account: StoredAccount) {
        self.lock().insert(account.id.clone(), account);
    }

    /// Removes an account by id; returns whether it existed.
    pub fn remove(&self, id: &str) -> bool {
        self.lock().remove(id).is_some()
    }

    /// Looks up an account by username or email and checks its password.
    #[must_use]
    pub fn authenticate(&self, login: &str, password: &str) -> Option<StoredAccount> {
        self.lock()
            .values()
            .find(|a| (a.username == login || a.email == login) && a.password == password)
            .cloned()
    }

    /// Looks up an account by its resource path.
    #[must_use]
    pub fn find_by_href(&self, href: &str) -> Option<StoredAccount> {
        let id = href.rsplit('/').next()?;
        self.lock().get(id).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, StoredAccount>> {
        self.accounts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
