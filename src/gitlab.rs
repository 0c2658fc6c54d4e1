//! # Remote Repository Client
//!
//! This module talks to the GitLab REST API (v4). It is built around the
//! `RemoteClient` trait so the project resolver and the commit orchestrator
//! never depend on the transport:
//!
//! - **`RemoteClient`**: list groups, list the projects of a group, and
//!   commit one file as a [`CommitAction`].
//! - **`GitLabClient`**: the default implementation, a blocking `reqwest`
//!   client authenticated with a private token.
//!
//! Tests swap in a recording mock, the same way repository operations are
//! mocked elsewhere.
//!
//! A create on a path that already exists is rejected by GitLab with
//! `400 A file with this name already exists`. Recognizing that is the job
//! of a [`ConflictPredicate`], so the match can be adjusted without touching
//! the client.

use crate::error::{Error, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::debug;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Page size requested from list endpoints.
const PER_PAGE: &str = "100";

/// Upper bound for one request, connect to last body byte.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A group visible to the configured credentials.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Group {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub full_path: String,
}

/// A remote repository selected for editing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TargetRepository {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub path_with_namespace: String,
}

/// Transport encoding of a file's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    Base64,
}

/// Path and payload of one file write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub file_path: String,
    pub content: String,
    pub encoding: Encoding,
}

impl FileChange {
    /// A change carrying `bytes` base64-encoded.
    pub fn base64(file_path: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            file_path: file_path.into(),
            content: STANDARD.encode(bytes),
            encoding: Encoding::Base64,
        }
    }
}

/// One file write against one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitAction {
    Create(FileChange),
    Update(FileChange),
}

impl CommitAction {
    pub fn change(&self) -> &FileChange {
        match self {
            CommitAction::Create(change) | CommitAction::Update(change) => change,
        }
    }

    pub fn file_path(&self) -> &str {
        &self.change().file_path
    }

    /// The same write, issued as an update.
    pub fn into_update(self) -> Self {
        match self {
            CommitAction::Create(change) | CommitAction::Update(change) => {
                CommitAction::Update(change)
            }
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            CommitAction::Create(_) => "create",
            CommitAction::Update(_) => "update",
        }
    }
}

/// Branch and message shared by every commit of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSettings {
    pub branch: String,
    pub message: String,
}

/// Operations the edit pipeline needs from the remote host.
pub trait RemoteClient: Send + Sync {
    /// All groups visible to the configured credentials.
    fn list_groups(&self) -> Result<Vec<Group>>;

    /// All projects of one group, optionally including nested subgroups.
    fn list_group_projects(&self, group_id: u64, include_subgroups: bool)
        -> Result<Vec<TargetRepository>>;

    /// Write one file as its own commit.
    fn commit_file(
        &self,
        repository: &TargetRepository,
        settings: &CommitSettings,
        action: &CommitAction,
    ) -> Result<()>;
}

/// Decides whether a failed create means "file already exists".
pub type ConflictPredicate = Box<dyn Fn(&Error) -> bool + Send + Sync>;

/// A predicate matching a 400 response whose message contains `marker`.
pub fn conflict_marker_predicate(marker: impl Into<String>) -> ConflictPredicate {
    let marker = marker.into().to_lowercase();
    Box::new(move |error: &Error| match error {
        Error::Remote {
            status: Some(400),
            message,
            ..
        } => message.to_lowercase().contains(&marker),
        _ => false,
    })
}

#[derive(Serialize)]
struct FileRequest<'a> {
    branch: &'a str,
    commit_message: &'a str,
    content: &'a str,
    encoding: Encoding,
}

/// Blocking GitLab API client.
pub struct GitLabClient {
    http: Client,
    api: Url,
    token: String,
}

impl GitLabClient {
    /// Client for the GitLab instance at `host`, e.g. `https://gitlab.example.com`.
    pub fn new(host: &str, token: impl Into<String>) -> Result<Self> {
        Self::with_timeout(host, token, REQUEST_TIMEOUT)
    }

    /// Like [`GitLabClient::new`], failing any request that takes longer than `timeout`.
    pub fn with_timeout(host: &str, token: impl Into<String>, timeout: Duration) -> Result<Self> {
        let host = if host.contains("://") {
            host.to_string()
        } else {
            format!("https://{}", host)
        };
        let mut api = Url::parse(&host)?;
        api.path_segments_mut()
            .map_err(|_| Error::Remote {
                url: host.clone(),
                status: None,
                message: "host URL cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .extend(["api", "v4"]);

        let http = Client::builder()
            .user_agent(concat!("repo-editor/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            api,
            token: token.into(),
        })
    }

    /// The API URL for the given path segments; each segment is percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.extend(segments);
        }
        url
    }

    fn send(&self, request: RequestBuilder, url: &Url) -> Result<Response> {
        let response = request
            .header("PRIVATE-TOKEN", &self.token)
            .header("Accept", "application/json")
            .send()?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        Err(Error::Remote {
            url: url.to_string(),
            status: Some(status.as_u16()),
            message: error_message(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string()),
        })
    }

    /// GET every page of a list endpoint.
    fn get_all<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut page = "1".to_string();
        loop {
            let request = self
                .http
                .get(url.clone())
                .query(query)
                .query(&[("per_page", PER_PAGE), ("page", page.as_str())]);
            let response = self.send(request, &url)?;
            let next = next_page(&response);
            let batch: Vec<T> = serde_json::from_str(&response.text()?)?;
            debug!("{}: page {} returned {} items", url, page, batch.len());
            items.extend(batch);
            match next {
                Some(next) => page = next,
                None => return Ok(items),
            }
        }
    }
}

impl RemoteClient for GitLabClient {
    fn list_groups(&self) -> Result<Vec<Group>> {
        self.get_all(self.endpoint(&["groups"]), &[])
    }

    fn list_group_projects(
        &self,
        group_id: u64,
        include_subgroups: bool,
    ) -> Result<Vec<TargetRepository>> {
        let id = group_id.to_string();
        let subgroups = if include_subgroups { "true" } else { "false" };
        self.get_all(
            self.endpoint(&["groups", &id, "projects"]),
            &[("include_subgroups", subgroups)],
        )
    }

    fn commit_file(
        &self,
        repository: &TargetRepository,
        settings: &CommitSettings,
        action: &CommitAction,
    ) -> Result<()> {
        let id = repository.id.to_string();
        let change = action.change();
        let url = self.endpoint(&["projects", &id, "repository", "files", &change.file_path]);
        let body = FileRequest {
            branch: &settings.branch,
            commit_message: &settings.message,
            content: &change.content,
            encoding: change.encoding,
        };
        let request = match action {
            CommitAction::Create(_) => self.http.post(url.clone()),
            CommitAction::Update(_) => self.http.put(url.clone()),
        };
        self.send(request.json(&body), &url)?;
        Ok(())
    }
}

fn next_page(response: &Response) -> Option<String> {
    response
        .headers()
        .get("x-next-page")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Pull a readable message out of a GitLab error body.
///
/// GitLab answers with `{"message": "..."}`, `{"message": {"field": ["..."]}}`
/// or `{"error": "..."}`.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let field = value.get("message").or_else(|| value.get("error"))?;
    match field {
        serde_json::Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}
