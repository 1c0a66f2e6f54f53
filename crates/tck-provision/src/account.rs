//! Account data and unique-value generation.

use rand::distr::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

/// Values used to register an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSpec {
    /// Email address, unique per spec.
    pub email: String,
    /// Username, unique per spec.
    pub username: String,
    /// Plaintext password.
    pub password: String,
    /// Given name.
    pub given_name: String,
    /// Surname.
    pub surname: String,
}

impl AccountSpec {
    /// Generates a spec with collision-free email and username.
    ///
    /// Uniqueness comes from an embedded v4 UUID, not from coordination:
    /// concurrently running suites each generate their own identifiers.
    #[must_use]
    pub fn generate() -> Self {
        let unique = Uuid::new_v4().simple().to_string();
        let password = random_password();
        Self {
            email: format!("tck-{unique}@example.com"),
            username: format!("tck-{unique}"),
            password,
            given_name: "Tck".to_string(),
            surname: "Test".to_string(),
        }
    }

    /// The JSON body sent to the registration route.
    #[must_use]
    pub fn registration_body(&self) -> Value {
        json!({
            "email": self.email,
            "username": self.username,
            "password": self.password,
            "givenName": self.given_name,
            "surname": self.surname,
        })
    }
}

/// A registered account as the target reported it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestAccount {
    /// Resource identifier returned by the registration route.
    pub href: String,
    /// Email address.
    pub email: String,
    /// Username.
    pub username: String,
    /// Plaintext password (kept so scenarios can log in).
    pub password: String,
    /// Given name.
    pub given_name: String,
    /// Surname.
    pub surname: String,
}

/// Generates a password satisfying common complexity rules.
fn random_password() -> String {
    let tail: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect();
    // Fixed prefix guarantees upper, lower, and digit classes.
    format!("Tck1{tail}")
}
