//! User accounts.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Error;

/// Authorisation level of an account.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  #[default]
  User,
  Admin,
}

impl Role {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::User => "user",
      Self::Admin => "admin",
    }
  }

  pub fn is_admin(&self) -> bool { matches!(self, Self::Admin) }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Role {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "user" => Ok(Self::User),
      "admin" => Ok(Self::Admin),
      other => Err(Error::Validation(format!("unknown role: {other:?}"))),
    }
  }
}

/// A stored account. Soft-deleted rows are never returned by the store, so
/// `deleted_at` is only ever observed as `None` outside of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id:            Uuid,
  pub username:      String,
  pub email:         String,
  /// argon2 PHC string; never leaves the server.
  #[serde(skip_serializing, default)]
  pub password_hash: String,
  pub full_name:     Option<String>,
  pub avatar_url:    Option<String>,
  pub bio:           Option<String>,
  pub role:          Role,
  pub is_active:     bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub last_login:    Option<i64>,
  pub created_at:    i64,
  pub updated_at:    i64,
  #[serde(skip_serializing, default)]
  pub deleted_at:    Option<i64>,
}

/// Input to [`crate::store::UserStore::create_user`].
#[derive(Debug, Clone)]
pub struct NewUser {
  pub username:      String,
  pub email:         String,
  pub password_hash: String,
  pub full_name:     Option<String>,
  pub role:          Role,
}

/// Profile fields a user may edit on their own account.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
  pub full_name:  Option<String>,
  pub avatar_url: Option<String>,
  pub bio:        Option<String>,
}

impl UserPatch {
  pub fn is_empty(&self) -> bool {
    self.full_name.is_none() && self.avatar_url.is_none() && self.bio.is_none()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn role_round_trips_through_str() {
    for role in [Role::User, Role::Admin] {
      assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
    }
    assert!("root".parse::<Role>().is_err());
  }

  #[test]
  fn password_hash_is_not_serialised() {
    let user = User {
      id:            Uuid::new_v4(),
      username:      "ann_01".into(),
      email:         "a@b.com".into(),
      password_hash: "$argon2id$secret".into(),
      full_name:     None,
      avatar_url:    None,
      bio:           None,
      role:          Role::User,
      is_active:     true,
      last_login:    None,
      created_at:    0,
      updated_at:    0,
      deleted_at:    None,
    };
    let json = serde_json::to_string(&user).unwrap();
    assert!(!json.contains("argon2"));
    assert!(json.contains("\"role\":\"user\""));
  }
}
