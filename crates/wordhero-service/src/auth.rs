//! Registration, login and token lifecycle.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wordhero_core::{
  Error as CoreError, now_millis,
  store::UserStore,
  user::{NewUser, Role, User},
};

use crate::{
  error::storage,
  password::{hash_password, verify_password},
  token::TokenIssuer,
  Result,
};

pub const MIN_PASSWORD_LEN: usize = 6;

static USERNAME_RE: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_]{3,50}$").expect("username pattern"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern")
});

// ─── Requests & responses ────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
  pub username:  String,
  pub email:     String,
  pub password:  String,
  #[serde(default)]
  pub full_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
  /// Username or email.
  pub username: String,
  pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
  pub current_password: String,
  pub new_password:     String,
}

/// A freshly issued token and the account it belongs to.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
  pub token:      String,
  pub expires_in: i64,
  pub user:       User,
}

fn validate_password(password: &str) -> Result<(), CoreError> {
  if password.chars().count() < MIN_PASSWORD_LEN {
    return Err(CoreError::Validation(format!(
      "password must be at least {MIN_PASSWORD_LEN} characters"
    )));
  }
  Ok(())
}

/// Check the format of a new account's credentials.
pub fn validate_registration(
  username: &str,
  email: &str,
  password: &str,
) -> Result<(), CoreError> {
  if !USERNAME_RE.is_match(username) {
    return Err(CoreError::Validation(
      "username must be 3-50 letters, digits or underscores".into(),
    ));
  }
  if !EMAIL_RE.is_match(email) {
    return Err(CoreError::Validation("invalid email format".into()));
  }
  validate_password(password)
}

// ─── Service ─────────────────────────────────────────────────────────────────

pub struct AuthService<S> {
  store:  Arc<S>,
  tokens: Arc<TokenIssuer>,
}

impl<S> Clone for AuthService<S> {
  fn clone(&self) -> Self {
    Self { store: self.store.clone(), tokens: self.tokens.clone() }
  }
}

impl<S: UserStore> AuthService<S> {
  pub fn new(store: Arc<S>, tokens: Arc<TokenIssuer>) -> Self { Self { store, tokens } }

  fn session(&self, user: User) -> Result<AuthSession> {
    Ok(AuthSession {
      token: self.tokens.issue(&user)?,
      expires_in: self.tokens.expires_in_secs(),
      user,
    })
  }

  async fn create_account(
    &self,
    username: &str,
    email: &str,
    password: &str,
    full_name: Option<String>,
    role: Role,
  ) -> Result<User> {
    validate_registration(username, email, password)?;

    if self.store.username_exists(username.to_owned()).await.map_err(storage)? {
      return Err(CoreError::AlreadyExists("username".into()).into());
    }
    if self.store.email_exists(email.to_owned()).await.map_err(storage)? {
      return Err(CoreError::AlreadyExists("email".into()).into());
    }

    let password_hash = hash_password(password)?;
    let created = self
      .store
      .create_user(NewUser {
        username: username.to_owned(),
        email: email.to_owned(),
        password_hash,
        full_name,
        role,
      })
      .await;

    match created {
      Ok(user) => Ok(user),
      // A concurrent registration took the name or email after the checks.
      Err(e) if S::is_conflict(&e) => {
        let field =
          if self.store.username_exists(username.to_owned()).await.map_err(storage)? {
            "username"
          } else {
            "email"
          };
        Err(CoreError::AlreadyExists(field.into()).into())
      }
      Err(e) => Err(storage(e)),
    }
  }

  /// Create a `user`-role account and sign a token for it.
  pub async fn register(&self, req: RegisterRequest) -> Result<AuthSession> {
    let username = req.username.trim();
    let email = req.email.trim();
    let full_name = req
      .full_name
      .map(|n| n.trim().to_owned())
      .filter(|n| !n.is_empty());

    let user = self
      .create_account(username, email, &req.password, full_name, Role::User)
      .await?;
    tracing::info!(user_id = %user.id, username = %user.username, "user registered");
    self.session(user)
  }

  /// Resolve by username or email, check the password and sign a token.
  pub async fn login(&self, req: LoginRequest) -> Result<AuthSession> {
    let login = req.username.trim().to_owned();
    let Some(mut user) = self.store.find_by_login(login.clone()).await.map_err(storage)?
    else {
      tracing::warn!(%login, "login for unknown account");
      return Err(CoreError::InvalidCredentials.into());
    };

    if !user.is_active {
      tracing::warn!(user_id = %user.id, "login to disabled account");
      return Err(CoreError::AccountDisabled.into());
    }
    if !verify_password(&req.password, &user.password_hash) {
      tracing::warn!(user_id = %user.id, "login with wrong password");
      return Err(CoreError::InvalidCredentials.into());
    }

    let now = now_millis();
    match self.store.touch_last_login(user.id, now).await {
      Ok(()) => user.last_login = Some(now),
      Err(e) => tracing::warn!(user_id = %user.id, error = %e, "failed to record last login"),
    }

    tracing::info!(user_id = %user.id, username = %user.username, "user logged in");
    self.session(user)
  }

  /// Verify a token and re-resolve its user so deactivation after issuance
  /// takes effect immediately.
  pub async fn validate_token(&self, token: &str) -> Result<User> {
    let claims = self.tokens.verify(token)?;
    let user = self
      .store
      .get_user(claims.user_id)
      .await
      .map_err(storage)?
      .ok_or_else(|| CoreError::Unauthorized("account no longer exists".into()))?;
    if !user.is_active {
      return Err(CoreError::AccountDisabled.into());
    }
    Ok(user)
  }

  /// Re-issue a token for a still-valid one.
  pub async fn refresh_token(&self, token: &str) -> Result<AuthSession> {
    let user = self.validate_token(token).await?;
    self.session(user)
  }

  pub async fn change_password(
    &self,
    user_id: Uuid,
    req: ChangePasswordRequest,
  ) -> Result<()> {
    let user = self
      .store
      .get_user(user_id)
      .await
      .map_err(storage)?
      .ok_or(CoreError::UserNotFound(user_id))?;

    if !verify_password(&req.current_password, &user.password_hash) {
      return Err(CoreError::InvalidCredentials.into());
    }
    validate_password(&req.new_password)?;

    let hash = hash_password(&req.new_password)?;
    if !self.store.update_password(user_id, hash).await.map_err(storage)? {
      return Err(CoreError::UserNotFound(user_id).into());
    }
    tracing::info!(%user_id, "password changed");
    Ok(())
  }

  /// Create an admin account if no user exists yet. Returns the new account,
  /// or `None` when users are already present.
  pub async fn ensure_default_admin(
    &self,
    username: &str,
    email: &str,
    password: &str,
  ) -> Result<Option<User>> {
    if self.store.count_users().await.map_err(storage)? > 0 {
      return Ok(None);
    }
    let admin = self
      .create_account(username, email, password, None, Role::Admin)
      .await?;
    tracing::info!(user_id = %admin.id, username = %admin.username, "default admin created");
    Ok(Some(admin))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn registration_rules() {
    assert!(validate_registration("ann_01", "a@b.com", "secret1").is_ok());
    assert!(validate_registration("an", "a@b.com", "secret1").is_err());
    assert!(validate_registration("ann-01", "a@b.com", "secret1").is_err());
    assert!(validate_registration(&"a".repeat(51), "a@b.com", "secret1").is_err());
    assert!(validate_registration("ann_01", "a@b", "secret1").is_err());
    assert!(validate_registration("ann_01", "a@b.com", "12345").is_err());
  }
}
