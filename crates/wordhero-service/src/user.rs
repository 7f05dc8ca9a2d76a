//! Account administration and self-service profile edits.

use std::sync::Arc;

use uuid::Uuid;
use wordhero_core::{
  Error as CoreError,
  page::{Page, Pagination},
  store::UserStore,
  user::{Role, User, UserPatch},
};

use crate::{error::storage, Result};

/// Admin-side account operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
  Activate,
  Deactivate,
  Promote,
  Demote,
}

impl std::str::FromStr for UserAction {
  type Err = CoreError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "activate" => Ok(Self::Activate),
      "deactivate" => Ok(Self::Deactivate),
      "promote" => Ok(Self::Promote),
      "demote" => Ok(Self::Demote),
      other => Err(CoreError::Validation(format!("unknown user action: {other:?}"))),
    }
  }
}

pub struct UserService<S> {
  store: Arc<S>,
}

impl<S> Clone for UserService<S> {
  fn clone(&self) -> Self { Self { store: self.store.clone() } }
}

impl<S: UserStore> UserService<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  pub async fn get_profile(&self, id: Uuid) -> Result<User> {
    self
      .store
      .get_user(id)
      .await
      .map_err(storage)?
      .ok_or_else(|| CoreError::UserNotFound(id).into())
  }

  /// Update the editable profile fields. Blank strings are stored as given
  /// so a user can clear a field.
  pub async fn update_profile(&self, id: Uuid, patch: UserPatch) -> Result<User> {
    if patch.is_empty() {
      return self.get_profile(id).await;
    }
    let patch = UserPatch {
      full_name:  patch.full_name.map(|s| s.trim().to_owned()),
      avatar_url: patch.avatar_url.map(|s| s.trim().to_owned()),
      bio:        patch.bio,
    };
    let user = self
      .store
      .update_profile(id, patch)
      .await
      .map_err(storage)?
      .ok_or(CoreError::UserNotFound(id))?;
    tracing::info!(user_id = %id, "profile updated");
    Ok(user)
  }

  pub async fn list_users(&self, page: Option<Pagination>) -> Result<Page<User>> {
    let (users, total) = self.store.list_users(page).await.map_err(storage)?;
    Ok(Page::new(users, total, page))
  }

  /// Apply an admin action and return the updated account.
  pub async fn apply(&self, id: Uuid, action: UserAction) -> Result<User> {
    let changed = match action {
      UserAction::Activate => self.store.set_active(id, true).await,
      UserAction::Deactivate => self.store.set_active(id, false).await,
      UserAction::Promote => self.store.set_role(id, Role::Admin).await,
      UserAction::Demote => self.store.set_role(id, Role::User).await,
    }
    .map_err(storage)?;
    if !changed {
      return Err(CoreError::UserNotFound(id).into());
    }
    tracing::info!(user_id = %id, ?action, "user updated by admin");
    self.get_profile(id).await
  }

  /// Soft-delete an account. Its username and email become available again.
  pub async fn delete_user(&self, id: Uuid) -> Result<()> {
    if !self.store.soft_delete(id).await.map_err(storage)? {
      return Err(CoreError::UserNotFound(id).into());
    }
    tracing::info!(user_id = %id, "user deleted");
    Ok(())
  }

  pub async fn count_users(&self) -> Result<u64> {
    self.store.count_users().await.map_err(storage)
  }
}
