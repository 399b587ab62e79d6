//! GitHub REST client
//!
//! Talks to `/repos/{owner}/{repo}/issues` with a bearer token.
//! One request per call: no retries, no pagination, no caching.

use super::*;
use crate::config::GitHubApiConfig;
use crate::credentials::GithubCredentials;
use reqwest::{Client, RequestBuilder, Response, StatusCode};

/// GitHub Issues API client bound to one repository
pub struct GitHubClient {
    client: Client,
    base_url: String,
    credentials: GithubCredentials,
}

impl GitHubClient {
    /// Create a client for the repository named in `credentials`
    pub fn new(
        config: &GitHubApiConfig,
        credentials: GithubCredentials,
    ) -> Result<Self, StoreError> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub fn credentials(&self) -> &GithubCredentials {
        &self.credentials
    }

    fn repo_url(&self) -> String {
        format!(
            "{}/repos/{}/{}",
            self.base_url,
            urlencoding::encode(&self.credentials.owner),
            urlencoding::encode(&self.credentials.repo)
        )
    }

    fn issues_url(&self) -> String {
        format!("{}/issues", self.repo_url())
    }

    fn issue_url(&self, number: u64) -> String {
        format!("{}/issues/{}", self.repo_url(), number)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.credentials.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    /// Check that the token can read the repository
    pub async fn validate(&self) -> bool {
        let result = self
            .authorized(self.client.get(self.repo_url()))
            .send()
            .await
            .map_err(StoreError::from);

        let result = match result {
            Ok(response) => check_status(response, None).await.map(|_| ()),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Validation failed for {}: {}", self.credentials.slug(), e);
                false
            }
        }
    }

    async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        request: RequestBuilder,
        number: Option<u64>,
    ) -> Result<T, StoreError> {
        let response = self.authorized(request).send().await?;
        let response = check_status(response, number).await?;

        response
            .json()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))
    }
}

/// Map non-success statuses to `StoreError`
async fn check_status(response: Response, number: Option<u64>) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::UNAUTHORIZED {
        return Err(StoreError::AuthFailed("Invalid GitHub token".into()));
    }

    if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
        let headers = response.headers();
        let remaining = headers
            .get("X-RateLimit-Remaining")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        if remaining == Some(0) || status == StatusCode::TOO_MANY_REQUESTS {
            let reset = headers
                .get("X-RateLimit-Reset")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<i64>().ok())
                .map(|ts| (ts - Utc::now().timestamp()).max(0))
                .unwrap_or(3600) as u64;
            return Err(StoreError::RateLimited(reset));
        }
    }

    if let Some(number) = number {
        if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
            return Err(StoreError::NotFound(number));
        }
    }

    let message = response.text().await.unwrap_or_default();
    Err(StoreError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl IssueStore for GitHubClient {
    async fn list_issues(&self, query: &IssueQuery) -> Result<Vec<Issue>, StoreError> {
        let request = self.client.get(self.issues_url()).query(&query.to_pairs());
        let issues: Vec<Issue> = self.send_json(request, None).await?;
        tracing::debug!(
            "Fetched {} issues from {}",
            issues.len(),
            self.credentials.slug()
        );
        Ok(issues)
    }

    async fn get_issue(&self, number: u64) -> Result<Issue, StoreError> {
        let request = self.client.get(self.issue_url(number));
        self.send_json(request, Some(number)).await
    }

    async fn create_issue(&self, issue: &NewIssue) -> Result<Issue, StoreError> {
        let request = self.client.post(self.issues_url()).json(issue);
        self.send_json(request, None).await
    }

    async fn update_issue(&self, number: u64, update: &IssueUpdate) -> Result<Issue, StoreError> {
        let request = self.client.patch(self.issue_url(number)).json(update);
        self.send_json(request, Some(number)).await
    }
}

/// One authenticated `GET /repos/{owner}/{repo}`.
///
/// Bad token, missing repository and unreachable host all yield `false`.
pub async fn validate_credentials(config: &GitHubApiConfig, credentials: &GithubCredentials) -> bool {
    match GitHubClient::new(config, credentials.clone()) {
        Ok(client) => client.validate().await,
        Err(e) => {
            tracing::warn!("Could not build HTTP client: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Path, Query, State},
        http::{HeaderMap, StatusCode as AxumStatus},
        routing::get,
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    const TOKEN: &str = "ghp_test";

    #[derive(Clone, Default)]
    struct FakeGitHub {
        last_query: Arc<Mutex<HashMap<String, String>>>,
        last_body: Arc<Mutex<Option<Value>>>,
    }

    fn authorized(headers: &HeaderMap) -> bool {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(|v| v == format!("Bearer {}", TOKEN))
            .unwrap_or(false)
    }

    fn issue_json(number: u64, state: &str, body: &str) -> Value {
        json!({
            "number": number,
            "title": format!("Issue {}", number),
            "body": body,
            "labels": [{"name": "activity"}],
            "state": state,
            "created_at": "2025-01-15T08:30:00Z"
        })
    }

    async fn repo(headers: HeaderMap, Path((owner, repo)): Path<(String, String)>) -> AxumStatus {
        if !authorized(&headers) {
            return AxumStatus::UNAUTHORIZED;
        }
        if owner == "ada" && repo == "fitness" {
            AxumStatus::OK
        } else {
            AxumStatus::NOT_FOUND
        }
    }

    async fn list(
        State(fake): State<FakeGitHub>,
        headers: HeaderMap,
        Query(params): Query<HashMap<String, String>>,
    ) -> Result<Json<Value>, AxumStatus> {
        if !authorized(&headers) {
            return Err(AxumStatus::UNAUTHORIZED);
        }
        *fake.last_query.lock().unwrap() = params;
        Ok(Json(json!([
            issue_json(2, "open", r#"{"type":"Gym","_type":"workout"}"#),
            issue_json(1, "open", "not json"),
        ])))
    }

    async fn create(
        State(fake): State<FakeGitHub>,
        Json(body): Json<Value>,
    ) -> (AxumStatus, Json<Value>) {
        *fake.last_body.lock().unwrap() = Some(body.clone());
        let text = body["body"].as_str().unwrap_or_default().to_string();
        (AxumStatus::CREATED, Json(issue_json(3, "open", &text)))
    }

    async fn fetch(Path((_, _, number)): Path<(String, String, u64)>) -> Result<Json<Value>, AxumStatus> {
        match number {
            9 => Ok(Json(issue_json(9, "closed", "{}"))),
            410 => Err(AxumStatus::GONE),
            _ => Err(AxumStatus::NOT_FOUND),
        }
    }

    async fn update(
        State(fake): State<FakeGitHub>,
        Path((_, _, number)): Path<(String, String, u64)>,
        Json(body): Json<Value>,
    ) -> Json<Value> {
        *fake.last_body.lock().unwrap() = Some(body.clone());
        let state = body["state"].as_str().unwrap_or("open").to_string();
        Json(issue_json(number, &state, "{}"))
    }

    async fn spawn_fake() -> (String, FakeGitHub) {
        let fake = FakeGitHub::default();
        let app = Router::new()
            .route("/repos/:owner/:repo", get(repo))
            .route("/repos/:owner/:repo/issues", get(list).post(create))
            .route("/repos/:owner/:repo/issues/:number", get(fetch).patch(update))
            .with_state(fake.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), fake)
    }

    fn api_config(url: &str) -> GitHubApiConfig {
        GitHubApiConfig {
            api_url: url.to_string(),
            ..GitHubApiConfig::default()
        }
    }

    fn client(url: &str) -> GitHubClient {
        GitHubClient::new(
            &api_config(url),
            GithubCredentials::new(TOKEN, "ada", "fitness"),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_validate_credentials() {
        let (url, _) = spawn_fake().await;
        let config = api_config(&url);

        assert!(validate_credentials(&config, &GithubCredentials::new(TOKEN, "ada", "fitness")).await);
        assert!(!validate_credentials(&config, &GithubCredentials::new("wrong", "ada", "fitness")).await);
        assert!(!validate_credentials(&config, &GithubCredentials::new(TOKEN, "ada", "missing")).await);
    }

    #[tokio::test]
    async fn test_validate_unreachable_host() {
        let config = api_config("http://127.0.0.1:1");
        assert!(!validate_credentials(&config, &GithubCredentials::new(TOKEN, "ada", "fitness")).await);
    }

    #[tokio::test]
    async fn test_list_sends_query_parameters() {
        let (url, fake) = spawn_fake().await;
        let client = client(&url);

        let issues = client
            .list_issues(&IssueQuery::open().newest_first())
            .await
            .unwrap();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].number, 2);

        let query = fake.last_query.lock().unwrap().clone();
        assert_eq!(query.get("state").map(String::as_str), Some("open"));
        assert_eq!(query.get("sort").map(String::as_str), Some("created"));
        assert_eq!(query.get("direction").map(String::as_str), Some("desc"));
        assert_eq!(query.get("per_page").map(String::as_str), Some("100"));
        assert!(!query.contains_key("labels"));
    }

    #[tokio::test]
    async fn test_list_with_bad_token() {
        let (url, _) = spawn_fake().await;
        let client = GitHubClient::new(
            &api_config(&url),
            GithubCredentials::new("nope", "ada", "fitness"),
        )
        .unwrap();

        let err = client.list_issues(&IssueQuery::open()).await.unwrap_err();
        assert!(matches!(err, StoreError::AuthFailed(_)));
    }

    #[tokio::test]
    async fn test_create_posts_title_body_labels() {
        let (url, fake) = spawn_fake().await;
        let client = client(&url);

        let created = client
            .create_issue(&NewIssue {
                title: "Profile: Ada".into(),
                body: "{}".into(),
                labels: vec!["profile".into()],
            })
            .await
            .unwrap();
        assert_eq!(created.number, 3);

        let body = fake.last_body.lock().unwrap().clone().unwrap();
        assert_eq!(
            body,
            json!({ "title": "Profile: Ada", "body": "{}", "labels": ["profile"] })
        );
    }

    #[tokio::test]
    async fn test_close_patches_state() {
        let (url, fake) = spawn_fake().await;
        let client = client(&url);

        let closed = client.update_issue(5, &IssueUpdate::close()).await.unwrap();
        assert_eq!(closed.state, IssueState::Closed);
        assert_eq!(
            fake.last_body.lock().unwrap().clone().unwrap(),
            json!({ "state": "closed" })
        );
    }

    #[tokio::test]
    async fn test_get_issue_states() {
        let (url, _) = spawn_fake().await;
        let client = client(&url);

        let closed = client.get_issue(9).await.unwrap();
        assert_eq!(closed.state, IssueState::Closed);

        assert!(matches!(client.get_issue(404).await, Err(StoreError::NotFound(404))));
        assert!(matches!(client.get_issue(410).await, Err(StoreError::NotFound(410))));
    }

    #[test]
    fn test_urls_encode_path_segments() {
        let client = GitHubClient::new(
            &api_config("https://api.github.com/"),
            GithubCredentials::new(TOKEN, "ada", "my repo"),
        )
        .unwrap();
        assert_eq!(
            client.issue_url(4),
            "https://api.github.com/repos/ada/my%20repo/issues/4"
        );
    }
}
