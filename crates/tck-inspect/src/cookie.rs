//! Cookie deletion check.
//!
//! A framework "deletes" a session cookie by re-setting it with an empty
//! value and an expiry in the past (conventionally the Unix epoch) or a
//! non-positive `Max-Age`. Logout scenarios use this check to verify that
//! `access_token` and `refresh_token` were actually cleared rather than
//! merely re-issued.

use std::time::{Duration, SystemTime};

/// Reports whether a cookie set with the given attributes deletes it.
///
/// A cookie is deleted when its value is empty AND its expiry is at or
/// before `now` (or its `Max-Age` is zero). A cookie with a non-empty
/// value is never considered deleted, whatever its expiry. An absent
/// cookie counts as deleted; callers handle that case before reaching
/// here.
#[must_use]
pub fn is_deleted(
    value: &str,
    expires: Option<SystemTime>,
    max_age: Option<Duration>,
) -> bool {
    is_deleted_at(value, expires, max_age, SystemTime::now())
}

/// [`is_deleted`] with an explicit comparison instant.
#[must_use]
pub fn is_deleted_at(
    value: &str,
    expires: Option<SystemTime>,
    max_age: Option<Duration>,
    now: SystemTime,
) -> bool {
    if !value.is_empty() {
        return false;
    }
    let expired = expires.is_some_and(|at| at <= now);
    let max_age_elapsed = max_age.is_some_and(|age| age.is_zero());
    expired || max_age_elapsed
}
