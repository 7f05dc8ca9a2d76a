//! Signed bearer tokens (HS256 JWT).

use chrono::Utc;
use jsonwebtoken::{
  decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wordhero_core::user::{Role, User};

use crate::Result;

/// Claims carried by every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
  pub user_id:  Uuid,
  pub username: String,
  pub email:    String,
  pub role:     Role,
  /// Issued-at, epoch seconds.
  pub iat:      i64,
  /// Expiry, epoch seconds.
  pub exp:      i64,
  pub iss:      String,
  /// The user id again, as the standard subject claim.
  pub sub:      String,
}

#[derive(Debug, Clone)]
pub struct TokenConfig {
  pub secret:          String,
  pub expires_in_secs: i64,
  pub issuer:          String,
}

/// Issues and verifies tokens with one symmetric secret.
#[derive(Clone)]
pub struct TokenIssuer {
  encoding:        EncodingKey,
  decoding:        DecodingKey,
  validation:      Validation,
  expires_in_secs: i64,
  issuer:          String,
}

impl TokenIssuer {
  pub fn new(config: &TokenConfig) -> Self {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[config.issuer.as_str()]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);

    Self {
      encoding: EncodingKey::from_secret(config.secret.as_bytes()),
      decoding: DecodingKey::from_secret(config.secret.as_bytes()),
      validation,
      expires_in_secs: config.expires_in_secs,
      issuer: config.issuer.clone(),
    }
  }

  pub fn expires_in_secs(&self) -> i64 { self.expires_in_secs }

  /// Sign a fresh token for `user`.
  pub fn issue(&self, user: &User) -> Result<String> {
    let now = Utc::now().timestamp();
    self.sign(&Claims {
      user_id:  user.id,
      username: user.username.clone(),
      email:    user.email.clone(),
      role:     user.role,
      iat:      now,
      exp:      now + self.expires_in_secs,
      iss:      self.issuer.clone(),
      sub:      user.id.to_string(),
    })
  }

  pub(crate) fn sign(&self, claims: &Claims) -> Result<String> {
    Ok(encode(&Header::new(Algorithm::HS256), claims, &self.encoding)?)
  }

  /// Check the signature, expiry and issuer and return the claims.
  pub fn verify(&self, token: &str) -> Result<Claims> {
    Ok(decode::<Claims>(token, &self.decoding, &self.validation)?.claims)
  }
}
