//! Account records.

use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// A storefront account as stored.
///
/// Deliberately not `Serialize`: responses go through [`UserProfile`], which
/// has no password field.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    /// Argon2 PHC string (salt embedded).
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl User {
    /// Build the stored record from an insert and its assigned ID.
    #[must_use]
    pub fn from_new(id: UserId, new: NewUser) -> Self {
        Self {
            id,
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            first_name: new.first_name,
            last_name: new.last_name,
            phone: new.phone,
            address: new.address,
            city: new.city,
            state: new.state,
            zip_code: new.zip_code,
        }
    }

    /// Shallow-merge a partial update: only fields present in `update` change.
    pub fn apply(&mut self, update: UserUpdate) {
        let UserUpdate {
            username,
            email,
            first_name,
            last_name,
            phone,
            address,
            city,
            state,
            zip_code,
        } = update;

        if let Some(v) = username {
            self.username = v;
        }
        if let Some(v) = email {
            self.email = v;
        }
        merge(&mut self.first_name, first_name);
        merge(&mut self.last_name, last_name);
        merge(&mut self.phone, phone);
        merge(&mut self.address, address);
        merge(&mut self.city, city);
        merge(&mut self.state, state);
        merge(&mut self.zip_code, zip_code);
    }
}

fn merge(slot: &mut Option<String>, value: Option<String>) {
    if value.is_some() {
        *slot = value;
    }
}

/// Fields for creating an account.
#[derive(Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

/// Partial update of an account. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

impl UserUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.zip_code.is_none()
    }
}

/// Public view of a [`User`] with the password stripped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
            address: user.address,
            city: user.city,
            state: user.state,
            zip_code: user.zip_code,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> User {
        User::from_new(
            UserId::new(1),
            NewUser {
                username: "testuser".into(),
                email: "test@example.com".into(),
                password_hash: "$argon2id$v=19$...".into(),
                first_name: Some("Test".into()),
                last_name: Some("User".into()),
                ..NewUser::default()
            },
        )
    }

    #[test]
    fn test_apply_keeps_unspecified_fields() {
        let mut user = sample();
        user.apply(UserUpdate {
            city: Some("Erode".into()),
            ..UserUpdate::default()
        });

        assert_eq!(user.city.as_deref(), Some("Erode"));
        assert_eq!(user.first_name.as_deref(), Some("Test"));
        assert_eq!(user.last_name.as_deref(), Some("User"));
        assert_eq!(user.username, "testuser");
    }

    #[test]
    fn test_profile_has_no_password() {
        let json = serde_json::to_value(UserProfile::from(sample())).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["firstName"], "Test");
        assert_eq!(json["zipCode"], serde_json::Value::Null);
    }

    #[test]
    fn test_debug_redacts_hash() {
        let debug = format!("{:?}", sample());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("argon2"));
    }

    #[test]
    fn test_update_is_empty() {
        assert!(UserUpdate::default().is_empty());
        let update: UserUpdate = serde_json::from_str(r#"{"zipCode":"638001"}"#).unwrap();
        assert!(!update.is_empty());
        assert_eq!(update.zip_code.as_deref(), Some("638001"));
    }
}
