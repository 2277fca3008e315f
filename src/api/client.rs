//! Blocking HTTP client for the project-management backend.
//!
//! One `HttpClient` serves both the stage endpoints and the read-only
//! reference enumerations. Every request carries the bearer token from
//! `ApiConfig` (when set) and an `X-Request-Id` header that is also logged.

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use crate::api::{ApiConfig, ApiError};
use crate::models::{ReferenceItem, Stage, StageDraft, StagePatch};
use crate::models::wire::ser_id;
use crate::repo::{ReferenceRepository, StageRepository};

const HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Body of `POST /etapes-projet`
#[derive(Serialize)]
struct NewStageRequest<'a> {
    #[serde(rename = "projetId", serialize_with = "ser_id")]
    project_id: &'a str,
    #[serde(flatten)]
    draft: &'a StageDraft,
}

pub struct HttpClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ApiError::Backend(format!("invalid API URL '{}': {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Backend(format!("invalid API URL '{}'", config.base_url)));
        }

        let http = Client::builder()
            .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("stagectl/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            token: config.token.clone(),
        })
    }

    /// Join path segments onto the base URL, percent-encoding each one
    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Backend(format!("invalid API URL '{}'", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<(RequestBuilder, String), ApiError> {
        let url = self.url(segments)?;
        let request_id = uuid::Uuid::new_v4().to_string();
        log::debug!("{} {} (request {})", method, url.path(), request_id);

        let mut builder = self
            .http
            .request(method, url.clone())
            .header("X-Request-Id", &request_id)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        Ok((builder, url.path().to_string()))
    }

    fn check(response: Response, path: &str) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        log::debug!("{} answered HTTP {}", path, status.as_u16());
        Err(ApiError::from_status(status.as_u16(), path, &body))
    }

    fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let body = response.text()?;
        Ok(serde_json::from_str(&body)?)
    }

    fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        let (builder, path) = self.request(Method::GET, segments)?;
        let response = Self::check(builder.send()?, &path)?;
        Self::decode(response)
    }

    fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ApiError> {
        let (builder, path) = self.request(method, segments)?;
        let response = Self::check(builder.json(body).send()?, &path)?;
        Self::decode(response)
    }
}

impl StageRepository for HttpClient {
    fn list_by_project(&self, project_id: &str) -> Result<Vec<Stage>, ApiError> {
        self.get(&["projets", project_id, "etapes"])
    }

    fn create(&self, project_id: &str, draft: &StageDraft) -> Result<Stage, ApiError> {
        let body = NewStageRequest { project_id, draft };
        self.send_json(Method::POST, &["etapes-projet"], &body)
    }

    fn update(&self, id: &str, patch: &StagePatch) -> Result<Stage, ApiError> {
        self.send_json(Method::PUT, &["etapes-projet", id], patch)
    }

    fn delete(&self, id: &str) -> Result<(), ApiError> {
        let (builder, path) = self.request(Method::DELETE, &["etapes-projet", id])?;
        Self::check(builder.send()?, &path)?;
        Ok(())
    }
}

impl ReferenceRepository for HttpClient {
    fn stage_statuses(&self) -> Result<Vec<ReferenceItem>, ApiError> {
        self.get(&["statuts-etape"])
    }

    fn stage_types(&self) -> Result<Vec<ReferenceItem>, ApiError> {
        self.get(&["types-etape"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> HttpClient {
        let config = ApiConfig {
            base_url: base.to_string(),
            ..ApiConfig::default()
        };
        HttpClient::new(&config).unwrap()
    }

    #[test]
    fn test_url_joins_segments() {
        let c = client("http://localhost:8080/api/");
        let url = c.url(&["projets", "42", "etapes"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/projets/42/etapes");
    }

    #[test]
    fn test_url_encodes_ids() {
        let c = client("http://localhost:8080/api");
        let url = c.url(&["etapes-projet", "a b/c"]).unwrap();
        assert_eq!(url.path(), "/api/etapes-projet/a%20b%2Fc");
    }

    #[test]
    fn test_invalid_base_url() {
        let config = ApiConfig {
            base_url: "not a url".to_string(),
            ..ApiConfig::default()
        };
        assert!(HttpClient::new(&config).is_err());
    }

    #[test]
    fn test_create_body_includes_project() {
        let draft = StageDraft {
            title: "Kickoff".to_string(),
            status_id: "1".to_string(),
            stage_type_id: "2".to_string(),
            ..StageDraft::at_order(3)
        };
        let body = serde_json::to_value(NewStageRequest { project_id: "7", draft: &draft }).unwrap();
        assert_eq!(body["projetId"], 7);
        assert_eq!(body["ordre"], 3);
        assert_eq!(body["titre"], "Kickoff");
    }
}
