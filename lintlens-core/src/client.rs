//! Read-only client for the analysis backend.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::domain::{RepositoryInfo, ResultsBundle, StoredResults};
use crate::error::{LintLensError, Result};
use crate::stored::{RawSourceView, highlighted_lines, render_highlighted_source};

/// Backend used when none is configured.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080";
/// User agent sent with every backend request.
pub const DEFAULT_USER_AGENT: &str = "lintlens";

/// Where and how to reach the analysis backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
    user_agent: String,
}

impl ApiConfig {
    /// Build a configuration for a backend base URL.
    pub fn new(base_url: &str) -> Result<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(LintLensError::Other("api url is required".to_string()));
        }
        Ok(Self {
            base_url: trimmed.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }

    /// Override the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Normalized base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// User agent sent with requests.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Absolute URL of a backend path.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Identifier of a stored analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultId {
    /// Database identifier.
    Database(String),
    /// Human-readable identifier; these always contain a `-`.
    Custom(String),
}

impl ResultId {
    /// Classify a raw identifier.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LintLensError::Other(
                "a database id or custom id is required".to_string(),
            ));
        }
        if trimmed.contains('-') {
            Ok(Self::Custom(trimmed.to_string()))
        } else {
            Ok(Self::Database(trimmed.to_string()))
        }
    }

    /// The identifier text.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Database(id) | Self::Custom(id) => id,
        }
    }

    /// Backend path serving this identifier.
    pub fn endpoint_path(&self) -> String {
        match self {
            Self::Database(id) => format!("/api/results-all/{}", urlencoding::encode(id)),
            Self::Custom(id) => format!("/api/results-all/custom/{}", urlencoding::encode(id)),
        }
    }
}

impl FromStr for ResultId {
    type Err = LintLensError;

    fn from_str(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

impl fmt::Display for ResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boxed future returned by [`ResultsSource`] methods.
pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Source of analysis results.
pub trait ResultsSource: Send + Sync {
    /// Every stored run of every file.
    fn all_results(&self) -> SourceFuture<'_, ResultsBundle>;

    /// Runs of files matching `path`.
    fn results_for_path<'a>(&'a self, path: &'a str) -> SourceFuture<'a, ResultsBundle>;

    /// A single stored analysis.
    fn stored_results<'a>(&'a self, id: &'a ResultId) -> SourceFuture<'a, StoredResults>;

    /// Raw text of an analysed file.
    fn raw_source<'a>(&'a self, info: &'a RepositoryInfo) -> SourceFuture<'a, String>;
}

/// Reqwest-backed results source.
#[derive(Debug, Clone)]
pub struct HttpResultsSource {
    client: Client,
    config: ApiConfig,
}

impl HttpResultsSource {
    /// Build a source for the configured backend.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = Client::builder().user_agent(config.user_agent()).build()?;
        Ok(Self { client, config })
    }

    /// Configuration the source was built with.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }
}

async fn fetch_json<T: DeserializeOwned>(client: &Client, url: String) -> Result<T> {
    log::debug!("GET {url}");
    let response = client
        .get(&url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .inspect_err(|err| log::warn!("request to {url} failed: {err}"))?;
    let body = response.text().await?;
    serde_json::from_str(&body)
        .inspect_err(|err| log::warn!("unreadable payload from {url}: {err}"))
        .map_err(LintLensError::from)
}

async fn fetch_raw(client: &Client, url: String, info: &RepositoryInfo) -> Result<String> {
    let field = |value: &Option<String>| value.clone().unwrap_or_default();
    let query = [
        ("username", field(&info.username)),
        ("repo", field(&info.repo)),
        ("commitId", field(&info.commit_id)),
        ("path", field(&info.path)),
    ];
    log::debug!("GET {url} for {}", query[3].1);
    let response = client
        .get(&url)
        .query(&query)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .inspect_err(|err| log::warn!("raw source request failed: {err}"))?;
    Ok(response.text().await?)
}

impl ResultsSource for HttpResultsSource {
    fn all_results(&self) -> SourceFuture<'_, ResultsBundle> {
        Box::pin(fetch_json(
            &self.client,
            self.config.endpoint("/api/combined-results/all"),
        ))
    }

    fn results_for_path<'a>(&'a self, path: &'a str) -> SourceFuture<'a, ResultsBundle> {
        let url = self.config.endpoint(&format!(
            "/api/combined-results/all/path/{}",
            urlencoding::encode(path)
        ));
        Box::pin(fetch_json(&self.client, url))
    }

    fn stored_results<'a>(&'a self, id: &'a ResultId) -> SourceFuture<'a, StoredResults> {
        Box::pin(fetch_json(
            &self.client,
            self.config.endpoint(&id.endpoint_path()),
        ))
    }

    fn raw_source<'a>(&'a self, info: &'a RepositoryInfo) -> SourceFuture<'a, String> {
        Box::pin(fetch_raw(
            &self.client,
            self.config.endpoint("/raw/githubusercontent"),
            info,
        ))
    }
}

/// Fetch a stored analysis and the raw source it was run against, with issue
/// lines highlighted.
pub async fn raw_source_view(source: &dyn ResultsSource, id: &ResultId) -> Result<RawSourceView> {
    let stored = source.stored_results(id).await?;
    let Some(info) = stored.repository_info().cloned() else {
        return Err(LintLensError::Other(format!(
            "no repository information available to fetch raw code for {id}"
        )));
    };
    let text = source.raw_source(&info).await?;
    let lines = render_highlighted_source(&text, &highlighted_lines(&stored));
    Ok(RawSourceView {
        repository_info: info,
        lines,
    })
}
