//! Router tests against an in-memory `SqliteStore`.

use std::sync::Arc;

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;
use wordhero_core::{store::WordStore, word::NewWord};
use wordhero_service::{TokenConfig, TokenIssuer};
use wordhero_store_sqlite::SqliteStore;

use crate::{AppState, PagingConfig, error::code, router};

async fn make_state() -> AppState<SqliteStore> {
  let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
  store
    .bulk_import(vec![
      NewWord::new("apple", "苹果"),
      NewWord::new("banana", "香蕉"),
      NewWord::new("cherry", "樱桃"),
      NewWord::new("grape", "葡萄"),
      NewWord::new("pineapple", "菠萝"),
    ])
    .await
    .unwrap();
  let tokens = Arc::new(TokenIssuer::new(&TokenConfig {
    secret:          "api-test-secret".into(),
    expires_in_secs: 3600,
    issuer:          "word-hero".into(),
  }));
  AppState::new(store, tokens, PagingConfig::default())
}

async fn send(
  state:  &AppState<SqliteStore>,
  method: &str,
  uri:    &str,
  token:  Option<&str>,
  body:   Option<Value>,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  if let Some(token) = token {
    builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
  }
  let req = match body {
    Some(body) => builder
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body.to_string()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  };
  let resp = router(state.clone()).oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  (status, serde_json::from_slice(&bytes).unwrap())
}

async fn register(state: &AppState<SqliteStore>, username: &str) -> String {
  let (status, body) = send(
    state,
    "POST",
    "/api/auth/register",
    None,
    Some(json!({
      "username": username,
      "email":    format!("{username}@example.com"),
      "password": "secret123",
    })),
  )
  .await;
  assert_eq!(status, StatusCode::OK, "{body}");
  body["data"]["token"].as_str().unwrap().to_owned()
}

async fn admin_token(state: &AppState<SqliteStore>) -> String {
  state
    .auth
    .ensure_default_admin("admin", "admin@example.com", "admin123")
    .await
    .unwrap();
  let (_, body) = send(
    state,
    "POST",
    "/api/auth/login",
    None,
    Some(json!({ "username": "admin", "password": "admin123" })),
  )
  .await;
  body["data"]["token"].as_str().unwrap().to_owned()
}

async fn first_word_id(state: &AppState<SqliteStore>) -> String {
  let (_, body) = send(state, "GET", "/api/words?pageNum=1&pageSize=1", None, None).await;
  body["data"]["items"][0]["id"].as_str().unwrap().to_owned()
}

// ── Accounts ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn register_login_and_profile() {
  let state = make_state().await;
  let token = register(&state, "alice").await;

  let (status, body) = send(&state, "GET", "/api/user/profile", Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["code"], 0);
  assert_eq!(body["data"]["username"], "alice");
  assert!(body["data"].get("passwordHash").is_none());

  let (status, body) = send(
    &state,
    "POST",
    "/api/auth/login",
    None,
    Some(json!({ "username": "alice@example.com", "password": "secret123" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"]["user"]["username"], "alice");
  assert_eq!(body["data"]["expiresIn"], 3600);
}

#[tokio::test]
async fn wrong_password_is_invalid_credentials() {
  let state = make_state().await;
  register(&state, "alice").await;

  let (status, body) = send(
    &state,
    "POST",
    "/api/auth/login",
    None,
    Some(json!({ "username": "alice", "password": "nope-nope" })),
  )
  .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert_eq!(body["code"], code::INVALID_CREDENTIALS);
  assert!(body.get("data").is_none());
}

#[tokio::test]
async fn duplicate_username_conflicts() {
  let state = make_state().await;
  register(&state, "alice").await;

  let (status, body) = send(
    &state,
    "POST",
    "/api/auth/register",
    None,
    Some(json!({ "username": "alice", "email": "other@example.com", "password": "secret123" })),
  )
  .await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(body["code"], code::USER_ALREADY_EXISTS);
}

#[tokio::test]
async fn missing_and_garbage_tokens_are_rejected() {
  let state = make_state().await;

  let (status, body) = send(&state, "GET", "/api/word-tags/progress", None, None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert_eq!(body["code"], code::UNAUTHORIZED);

  let (status, body) = send(&state, "GET", "/api/word-tags/progress", Some("garbage"), None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert_eq!(body["code"], code::INVALID_TOKEN);
}

#[tokio::test]
async fn refresh_issues_a_working_token() {
  let state = make_state().await;
  let token = register(&state, "alice").await;

  let (status, body) = send(&state, "POST", "/api/auth/refresh", Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);
  let fresh = body["data"]["token"].as_str().unwrap().to_owned();

  let (status, _) = send(&state, "GET", "/api/user/profile", Some(&fresh), None).await;
  assert_eq!(status, StatusCode::OK);
}

// ── Words ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn words_are_paged() {
  let state = make_state().await;

  let (status, body) = send(&state, "GET", "/api/words?pageNum=2&pageSize=2", None, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"]["total"], 5);
  assert_eq!(body["data"]["totalPages"], 3);
  assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);

  let (_, body) = send(&state, "GET", "/api/words?pageNum=9&pageSize=2", None, None).await;
  assert_eq!(body["code"], 0);
  assert!(body["data"]["items"].as_array().unwrap().is_empty());
  assert_eq!(body["data"]["total"], 5);
}

#[tokio::test]
async fn malformed_query_is_an_enveloped_bad_request() {
  let state = make_state().await;
  let (status, body) = send(&state, "GET", "/api/words?pageNum=abc", None, None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["code"], code::INVALID_REQUEST);
}

#[tokio::test]
async fn search_substring_and_regex() {
  let state = make_state().await;

  let (_, body) = send(&state, "GET", "/api/words/search?q=APPLE", None, None).await;
  let hits = body["data"]["items"].as_array().unwrap();
  assert_eq!(hits.len(), 2);

  let (_, body) = send(&state, "GET", "/api/words/search?q=a", None, None).await;
  assert!(body["data"]["items"].as_array().unwrap().is_empty());

  let (_, body) = send(&state, "GET", "/api/words/search?q=%5Eap&regex=true", None, None).await;
  let hits = body["data"]["items"].as_array().unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0]["english"], "apple");

  let (status, body) = send(&state, "GET", "/api/words/search?q=%28ab&regex=true", None, None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["code"], code::INVALID_SEARCH_QUERY);
}

#[tokio::test]
async fn unknown_word_is_not_found() {
  let state = make_state().await;
  let uri = format!("/api/words/{}", uuid::Uuid::new_v4());
  let (status, body) = send(&state, "GET", &uri, None, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["code"], code::WORD_NOT_FOUND);
}

#[tokio::test]
async fn count_and_random() {
  let state = make_state().await;

  let (_, body) = send(&state, "GET", "/api/words/count", None, None).await;
  assert_eq!(body["data"]["total"], 5);

  let (_, body) = send(&state, "GET", "/api/words/random?count=3", None, None).await;
  assert_eq!(body["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn unrouted_path_is_enveloped() {
  let state = make_state().await;
  let (status, body) = send(&state, "GET", "/api/nope", None, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["code"], code::NOT_FOUND);
}

// ── Word tags ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn mark_status_progress_and_marked_page() {
  let state = make_state().await;
  let token = register(&state, "alice").await;
  let word_id = first_word_id(&state).await;

  let (status, body) = send(
    &state,
    "POST",
    "/api/word-tags/mark",
    Some(&token),
    Some(json!({ "wordId": word_id })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"]["isMarked"], true);
  assert_eq!(body["data"]["markCount"], 1);

  let uri = format!("/api/word-tags/status/{word_id}");
  let (_, body) = send(&state, "GET", &uri, Some(&token), None).await;
  assert_eq!(body["data"]["isMarked"], true);

  let (_, body) = send(&state, "GET", "/api/word-tags/progress", Some(&token), None).await;
  assert_eq!(body["data"]["knownWords"], 1);
  assert_eq!(body["data"]["totalWords"], 5);
  assert_eq!(body["data"]["progressRate"], 20.0);

  let (_, body) = send(&state, "GET", "/api/words/marked?pageNum=1&pageSize=5", Some(&token), None)
    .await;
  let marked: Vec<_> = body["data"]["items"]
    .as_array()
    .unwrap()
    .iter()
    .filter(|w| w["isMarked"] == true)
    .collect();
  assert_eq!(marked.len(), 1);
  assert_eq!(marked[0]["id"], word_id.as_str());

  let (_, body) = send(&state, "GET", "/api/word-tags/known-ids", Some(&token), None).await;
  assert_eq!(body["data"]["totalCount"], 1);
}

#[tokio::test]
async fn batch_status_and_forget() {
  let state = make_state().await;
  let token = register(&state, "alice").await;
  let word_id = first_word_id(&state).await;

  send(&state, "POST", "/api/word-tags/mark", Some(&token), Some(json!({ "wordId": word_id })))
    .await;

  let (_, body) = send(
    &state,
    "POST",
    "/api/word-tags/status",
    Some(&token),
    Some(json!({ "wordIds": [word_id] })),
  )
  .await;
  assert_eq!(body["data"]["wordMarkStatuses"][0]["isMarked"], true);

  let (status, body) = send(
    &state,
    "POST",
    "/api/word-tags/forget",
    Some(&token),
    Some(json!({ "wordIds": [] })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["code"], code::VALIDATION_ERROR);

  let (_, body) = send(
    &state,
    "POST",
    "/api/word-tags/forget",
    Some(&token),
    Some(json!({ "wordIds": [word_id] })),
  )
  .await;
  assert_eq!(body["data"]["forgottenCount"], 1);
}

#[tokio::test]
async fn forget_all_requires_confirmation() {
  let state = make_state().await;
  let token = register(&state, "alice").await;

  let (status, body) = send(
    &state,
    "POST",
    "/api/word-tags/forget-all",
    Some(&token),
    Some(json!({})),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["code"], code::INVALID_OPERATION);

  let (status, body) = send(
    &state,
    "POST",
    "/api/word-tags/forget-all",
    Some(&token),
    Some(json!({ "confirm": true })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"]["forgottenCount"], 0);
}

// ── Admin ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn admin_routes_refuse_plain_users() {
  let state = make_state().await;
  let token = register(&state, "alice").await;

  let (status, body) = send(&state, "GET", "/api/admin/users", Some(&token), None).await;
  assert_eq!(status, StatusCode::FORBIDDEN);
  assert_eq!(body["code"], code::FORBIDDEN);

  let (status, _) = send(&state, "GET", "/api/word-tags/stats", Some(&token), None).await;
  assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_edits_words() {
  let state = make_state().await;
  let token = admin_token(&state).await;

  let (status, body) = send(
    &state,
    "POST",
    "/api/admin/words",
    Some(&token),
    Some(json!({ "english": " kiwi ", "chinese": "猕猴桃", "category": "fruit" })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["data"]["english"], "kiwi");
  let id = body["data"]["id"].as_str().unwrap().to_owned();

  let uri = format!("/api/admin/words/{id}");
  let (status, body) = send(&state, "PUT", &uri, Some(&token), Some(json!({ "chinese": "奇异果" })))
    .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"]["chinese"], "奇异果");

  let (_, body) = send(&state, "GET", "/api/words/category/fruit", None, None).await;
  assert_eq!(body["data"].as_array().unwrap().len(), 1);

  let (status, _) = send(&state, "DELETE", &uri, Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);

  let (status, body) = send(&state, "DELETE", &uri, Some(&token), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["code"], code::WORD_NOT_FOUND);
}

#[tokio::test]
async fn deactivated_user_is_locked_out() {
  let state = make_state().await;
  let admin = admin_token(&state).await;
  let token = register(&state, "alice").await;

  let (_, body) = send(&state, "GET", "/api/user/profile", Some(&token), None).await;
  let alice_id = body["data"]["id"].as_str().unwrap().to_owned();

  let uri = format!("/api/admin/users/{alice_id}/deactivate");
  let (status, body) = send(&state, "POST", &uri, Some(&admin), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"]["isActive"], false);

  let (status, body) = send(&state, "GET", "/api/user/profile", Some(&token), None).await;
  assert_eq!(status, StatusCode::FORBIDDEN);
  assert_eq!(body["code"], code::USER_DISABLED);

  let (_, body) = send(&state, "GET", "/api/admin/users", Some(&admin), None).await;
  assert_eq!(body["data"]["total"], 2);
}
