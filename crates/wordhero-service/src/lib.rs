//! Business logic for Word Hero.
//!
//! Every service is generic over the store traits in [`wordhero_core::store`]
//! and receives its store as an `Arc` at construction time. Nothing here
//! knows about HTTP or SQL.

pub mod auth;
pub mod error;
pub mod password;
pub mod token;
pub mod user;
pub mod vocabulary;
pub mod word_tag;

pub use auth::AuthService;
pub use error::{Error, Result};
pub use token::{Claims, TokenConfig, TokenIssuer};
pub use user::UserService;
pub use vocabulary::VocabularyService;
pub use word_tag::WordTagService;
