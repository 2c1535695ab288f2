//! Async HTTP client wrapping the crew JSON API.

use anyhow::{Context, Result, anyhow};
use crew_core::person::{NewPerson, Person, PersonPatch};
use reqwest::{Client, Response};
use serde::Deserialize;
use std::time::Duration;
use uuid::Uuid;

/// Connection settings for the crew API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Async HTTP client for the crew JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

/// Error body returned by the server.
#[derive(Deserialize)]
struct ErrorBody {
  message: String,
}

/// Turn a non-2xx response into an error carrying the server's message.
async fn failure(what: &str, resp: Response) -> anyhow::Error {
  let status = resp.status();
  match resp.json::<ErrorBody>().await {
    Ok(body) => anyhow!("{what} → {status}: {}", body.message),
    Err(_) => anyhow!("{what} → {status}"),
  }
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  pub fn base_url(&self) -> &str { &self.config.base_url }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  // ── People ────────────────────────────────────────────────────────────────

  /// `GET /api/people`
  pub async fn list_people(&self) -> Result<Vec<Person>> {
    let resp = self
      .client
      .get(self.url("/people"))
      .send()
      .await
      .context("GET /people failed")?;

    if !resp.status().is_success() {
      return Err(failure("GET /people", resp).await);
    }
    resp.json().await.context("deserialising people")
  }

  /// `POST /api/people`
  pub async fn create_person(&self, draft: &NewPerson) -> Result<Person> {
    let resp = self
      .client
      .post(self.url("/people"))
      .json(draft)
      .send()
      .await
      .context("POST /people failed")?;

    if !resp.status().is_success() {
      return Err(failure("POST /people", resp).await);
    }
    resp.json().await.context("deserialising created person")
  }

  /// `PUT /api/people/<id>`
  pub async fn update_person(&self, id: Uuid, patch: &PersonPatch) -> Result<Person> {
    let resp = self
      .client
      .put(self.url(&format!("/people/{id}")))
      .json(patch)
      .send()
      .await
      .context("PUT /people failed")?;

    if !resp.status().is_success() {
      return Err(failure("PUT /people", resp).await);
    }
    resp.json().await.context("deserialising updated person")
  }

  /// `DELETE /api/people/<id>`
  pub async fn delete_person(&self, id: Uuid) -> Result<()> {
    let resp = self
      .client
      .delete(self.url(&format!("/people/{id}")))
      .send()
      .await
      .context("DELETE /people failed")?;

    if !resp.status().is_success() {
      return Err(failure("DELETE /people", resp).await);
    }
    Ok(())
  }
}
