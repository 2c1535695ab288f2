//! HTTP server for the crew team directory.
//!
//! Wraps the [`crew_api`] router with the transport concerns it leaves to
//! its caller: request tracing, CORS and a request body limit.

pub mod seed;

use std::{path::{Path, PathBuf}, sync::Arc};

use axum::{
  Router,
  extract::DefaultBodyLimit,
  http::{HeaderValue, Method, header},
};
use crew_core::store::PersonStore;
use serde::Deserialize;
use tower_http::{
  cors::{AllowOrigin, Any, CorsLayer},
  trace::TraceLayer,
};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Profile images travel inline as data URLs, so bodies can be large.
pub const DEFAULT_BODY_LIMIT: usize = 50 * 1024 * 1024;

/// Runtime server configuration, deserialised from `crew.toml` and `CREW_*`
/// environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:             String,
  pub port:             u16,
  pub store_path:       PathBuf,
  /// Origins allowed by CORS. Empty means any origin.
  #[serde(default)]
  pub allowed_origins:  Vec<String>,
  pub body_limit_bytes: usize,
}

impl ServerConfig {
  /// Layer defaults, then the (optional) file at `path`, then the
  /// environment.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> { Self::load_with_env(path, None) }

  /// As [`ServerConfig::load`], reading `CREW_*` variables from `env`
  /// instead of the process environment when given.
  pub fn load_with_env(
    path: &Path,
    env: Option<config::Map<String, String>>,
  ) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 3001_i64)?
      .set_default("store_path", "crew.db")?
      .set_default("body_limit_bytes", DEFAULT_BODY_LIMIT as i64)?
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("CREW")
          .try_parsing(true)
          .list_separator(",")
          .with_list_parse_key("allowed_origins")
          .source(env),
      )
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application: the API under `/api` plus middleware.
pub fn router<S>(store: Arc<S>, config: &ServerConfig) -> Router
where
  S: PersonStore + 'static,
{
  Router::new()
    .nest("/api", crew_api::api_router(store))
    .layer(DefaultBodyLimit::max(config.body_limit_bytes))
    .layer(cors_layer(&config.allowed_origins))
    .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
  let layer = CorsLayer::new()
    .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
    .allow_headers([header::CONTENT_TYPE]);

  if origins.is_empty() {
    return layer.allow_origin(Any);
  }

  let values: Vec<HeaderValue> = origins
    .iter()
    .filter_map(|origin| match HeaderValue::from_str(origin) {
      Ok(v) => Some(v),
      Err(_) => {
        tracing::warn!(%origin, "ignoring unparsable CORS origin");
        None
      }
    })
    .collect();
  layer.allow_origin(AllowOrigin::list(values))
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
  };
  use crew_core::person::NewPerson;
  use crew_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use uuid::Uuid;

  fn test_config() -> ServerConfig {
    ServerConfig {
      host:             "127.0.0.1".to_string(),
      port:             3001,
      store_path:       PathBuf::from(":memory:"),
      allowed_origins:  vec!["https://dmcademy.com".to_string()],
      body_limit_bytes: DEFAULT_BODY_LIMIT,
    }
  }

  fn env(vars: &[(&str, &str)]) -> Option<config::Map<String, String>> {
    Some(vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
  }

  async fn make_store() -> Arc<SqliteStore> {
    Arc::new(SqliteStore::open_in_memory().await.unwrap())
  }

  async fn oneshot_raw(
    store:  Arc<SqliteStore>,
    method: &str,
    uri:    &str,
    body:   Option<&str>,
  ) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    let req = builder
      .body(Body::from(body.unwrap_or_default().to_string()))
      .unwrap();
    router(store, &test_config()).oneshot(req).await.unwrap()
  }

  async fn json_body(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  async fn create(store: &Arc<SqliteStore>, body: Value) -> Value {
    let resp = oneshot_raw(
      store.clone(),
      "POST",
      "/api/people",
      Some(&body.to_string()),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    json_body(resp).await
  }

  // ── List ─────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn list_empty_store_returns_empty_array() {
    let store = make_store().await;
    let resp = oneshot_raw(store, "GET", "/api/people", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, json!([]));
  }

  // ── Create ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_returns_201_with_generated_fields() {
    let store = make_store().await;
    let created = create(
      &store,
      json!({ "name": "Alex Johnson", "department": "Upper Management",
              "hobbies": ["Hiking", "Reading"] }),
    )
    .await;

    assert!(Uuid::parse_str(created["id"].as_str().unwrap()).is_ok());
    assert!(created["createdAt"].is_string());
    assert!(created["updatedAt"].is_string());
    assert_eq!(created["hobbies"], json!(["Hiking", "Reading"]));

    let resp = oneshot_raw(store, "GET", "/api/people", None).await;
    let all = json_body(resp).await;
    assert_eq!(all.as_array().unwrap().len(), 1);
    assert_eq!(all[0], created);
  }

  #[tokio::test]
  async fn create_without_name_returns_400() {
    let store = make_store().await;
    let resp = oneshot_raw(
      store.clone(),
      "POST",
      "/api/people",
      Some(r#"{"department":"Design"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(resp).await["message"].is_string());

    let resp = oneshot_raw(store, "GET", "/api/people", None).await;
    assert_eq!(json_body(resp).await, json!([]));
  }

  #[tokio::test]
  async fn create_with_null_hobbies_stores_empty_list() {
    let store = make_store().await;
    let created = create(&store, json!({ "name": "Ada", "hobbies": null })).await;
    assert_eq!(created["hobbies"], json!([]));
  }

  #[tokio::test]
  async fn malformed_json_returns_400_with_message() {
    let store = make_store().await;
    let resp = oneshot_raw(store, "POST", "/api/people", Some("{not json")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(resp).await["message"].is_string());
  }

  #[tokio::test]
  async fn repeated_post_creates_duplicates() {
    let store = make_store().await;
    let a = create(&store, json!({ "name": "Twin" })).await;
    let b = create(&store, json!({ "name": "Twin" })).await;
    assert_ne!(a["id"], b["id"]);
  }

  // ── Get one ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn get_one_returns_person_or_404() {
    let store = make_store().await;
    let created = create(&store, json!({ "name": "Ada" })).await;
    let id = created["id"].as_str().unwrap();

    let resp = oneshot_raw(store.clone(), "GET", &format!("/api/people/{id}"), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, created);

    let missing = Uuid::new_v4();
    let resp = oneshot_raw(store, "GET", &format!("/api/people/{missing}"), None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  // ── Update ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn partial_update_changes_only_named_field() {
    let store = make_store().await;
    let created = create(
      &store,
      json!({ "name": "David Lee", "department": "Engineering",
              "specialty": "Lead Software Engineer", "startDate": "2020-06-20" }),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let resp = oneshot_raw(
      store,
      "PUT",
      &format!("/api/people/{id}"),
      Some(r#"{"specialty":"X"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = json_body(resp).await;

    assert_eq!(updated["specialty"], "X");
    for field in ["id", "name", "department", "startDate", "createdAt", "hobbies"] {
      assert_eq!(updated[field], created[field], "{field} changed");
    }
  }

  #[tokio::test]
  async fn update_unknown_id_returns_404_and_changes_nothing() {
    let store = make_store().await;
    let created = create(&store, json!({ "name": "Ada" })).await;

    let resp = oneshot_raw(
      store.clone(),
      "PUT",
      &format!("/api/people/{}", Uuid::new_v4()),
      Some(r#"{"name":"Grace"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(resp).await["message"], "Person not found");

    let resp = oneshot_raw(store, "GET", "/api/people", None).await;
    assert_eq!(json_body(resp).await, json!([created]));
  }

  #[tokio::test]
  async fn update_with_blank_name_returns_400() {
    let store = make_store().await;
    let created = create(&store, json!({ "name": "Ada" })).await;
    let id = created["id"].as_str().unwrap();

    let resp = oneshot_raw(
      store.clone(),
      "PUT",
      &format!("/api/people/{id}"),
      Some(r#"{"name":""}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = oneshot_raw(store, "GET", &format!("/api/people/{id}"), None).await;
    assert_eq!(json_body(resp).await, created);
  }

  // ── Delete ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn delete_returns_204_then_404() {
    let store = make_store().await;
    let created = create(&store, json!({ "name": "Ada" })).await;
    let uri = format!("/api/people/{}", created["id"].as_str().unwrap());

    let resp = oneshot_raw(store.clone(), "DELETE", &uri, None).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.is_empty());

    let resp = oneshot_raw(store.clone(), "GET", "/api/people", None).await;
    assert_eq!(json_body(resp).await, json!([]));

    let resp = oneshot_raw(store, "DELETE", &uri, None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn non_uuid_id_returns_404() {
    let store = make_store().await;
    let resp = oneshot_raw(store, "DELETE", "/api/people/64b0c0ffee", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  // ── Middleware ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn cors_allows_configured_origin() {
    let store = make_store().await;
    let req = Request::builder()
      .method("GET")
      .uri("/api/people")
      .header(header::ORIGIN, "https://dmcademy.com")
      .body(Body::empty())
      .unwrap();
    let resp = router(store, &test_config()).oneshot(req).await.unwrap();
    assert_eq!(
      resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
      "https://dmcademy.com"
    );
  }

  #[tokio::test]
  async fn cors_omits_header_for_unknown_origin() {
    let store = make_store().await;
    let req = Request::builder()
      .method("GET")
      .uri("/api/people")
      .header(header::ORIGIN, "https://evil.example")
      .body(Body::empty())
      .unwrap();
    let resp = router(store, &test_config()).oneshot(req).await.unwrap();
    assert!(!resp.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
  }

  #[tokio::test]
  async fn oversized_body_is_rejected() {
    let store = make_store().await;
    let config = ServerConfig { body_limit_bytes: 64, ..test_config() };
    let big = json!({ "name": "A", "imageUrl": "x".repeat(1024) }).to_string();
    let req = Request::builder()
      .method("POST")
      .uri("/api/people")
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(big))
      .unwrap();
    let resp = router(store, &config).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
  }

  // ── Configuration ────────────────────────────────────────────────────────────

  #[test]
  fn load_uses_defaults_without_file_or_env() {
    let dir = tempfile::tempdir().unwrap();
    let config = ServerConfig::load_with_env(&dir.path().join("missing.toml"), env(&[])).unwrap();

    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 3001);
    assert_eq!(config.store_path, PathBuf::from("crew.db"));
    assert!(config.allowed_origins.is_empty());
    assert_eq!(config.body_limit_bytes, DEFAULT_BODY_LIMIT);
  }

  #[test]
  fn load_layers_env_over_file_over_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("crew.toml");
    std::fs::write(
      &path,
      "port = 4000\nstore_path = \"/srv/crew/crew.db\"\nallowed_origins = [\"http://file.example\"]\n",
    )
    .unwrap();

    let config = ServerConfig::load_with_env(
      &path,
      env(&[
        ("CREW_PORT", "8080"),
        ("CREW_ALLOWED_ORIGINS", "http://a.example,http://b.example"),
      ]),
    )
    .unwrap();

    assert_eq!(config.port, 8080);
    assert_eq!(config.store_path, PathBuf::from("/srv/crew/crew.db"));
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.allowed_origins, vec!["http://a.example", "http://b.example"]);
    assert_eq!(config.body_limit_bytes, DEFAULT_BODY_LIMIT);
  }

  // ── Seeding ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn seed_replaces_existing_records() {
    let store = make_store().await;
    store.create_person(NewPerson::named("Old")).await.unwrap();

    let report = seed::seed(
      store.as_ref(),
      vec![NewPerson::named("Alex Johnson"), NewPerson::named("David Lee")],
    )
    .await
    .unwrap();
    assert_eq!(report, seed::SeedReport { removed: 1, inserted: 2 });

    let names: Vec<_> = store
      .list_people()
      .await
      .unwrap()
      .into_iter()
      .map(|p| p.profile.name)
      .collect();
    assert_eq!(names, vec!["Alex Johnson", "David Lee"]);
  }

  #[tokio::test]
  async fn seed_with_invalid_entry_keeps_existing_records() {
    let store = make_store().await;
    store.create_person(NewPerson::named("Old")).await.unwrap();

    let err = seed::seed(
      store.as_ref(),
      vec![NewPerson::named("Fine"), NewPerson::default()],
    )
    .await
    .unwrap_err();
    assert!(matches!(err, seed::SeedError::Invalid { index: 1, .. }));
    assert_eq!(store.list_people().await.unwrap().len(), 1);
  }

  #[test]
  fn bundled_seed_file_parses() {
    let drafts: Vec<NewPerson> =
      serde_json::from_str(include_str!("../seed.json")).unwrap();
    assert_eq!(drafts.len(), 2);
    assert!(drafts.into_iter().all(|d| d.validate().is_ok()));
  }
}
