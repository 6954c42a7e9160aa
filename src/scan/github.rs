//! GitHub-backed discovery source.
//!
//! GitHub already partitions code into repositories, so there is no tree to
//! walk: the source lists an owner's repositories and probes each one's
//! default branch for a recognizable descriptor through the contents API.
//! The boundary with GitHub is intentionally minimal (list repositories,
//! fetch a file, read the default branch) and sits behind the
//! [`GithubApi`] trait so tests can substitute a mock.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::scan::project::{DescriptorSet, ProjectRoot};
use crate::scan::queue::ProjectQueue;
use crate::scan::Source;
use crate::scm::{ScmKind, ScmUrl};

/// One repository from a listing response.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteRepo {
    pub name: String,
    pub clone_url: String,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub pushed_at: Option<String>,
}

/// Minimal GitHub boundary: list repositories, check a file, read the
/// default branch (delivered inline with the listing).
pub trait GithubApi: Send + Sync {
    fn list_repositories(&self, owner: &str) -> Result<Vec<RemoteRepo>>;
    fn file_exists(&self, owner: &str, repo: &str, branch: &str, path: &str) -> Result<bool>;
}

/// `GithubApi` implementation against the REST v3 API.
pub struct HttpGithubApi {
    http: reqwest::blocking::Client,
    api_root: String,
    token: Option<String>,
}

impl HttpGithubApi {
    pub fn new(api_root: impl Into<String>, token: Option<String>) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            api_root: api_root.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    fn get(&self, url: &str) -> reqwest::blocking::RequestBuilder {
        let mut request = self
            .http
            .get(url)
            .header("User-Agent", "repo-scout")
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }
        request
    }
}

impl GithubApi for HttpGithubApi {
    fn list_repositories(&self, owner: &str) -> Result<Vec<RemoteRepo>> {
        let mut repositories = Vec::new();
        for page in 1.. {
            let url = format!(
                "{}/users/{}/repos?per_page=100&page={}",
                self.api_root, owner, page
            );
            let response = self.get(&url).send()?;
            if !response.status().is_success() {
                return Err(Error::Listing {
                    url,
                    message: format!("unexpected status {}", response.status()),
                });
            }
            let batch: Vec<RemoteRepo> = response.json()?;
            if batch.is_empty() {
                break;
            }
            repositories.extend(batch);
        }
        Ok(repositories)
    }

    fn file_exists(&self, owner: &str, repo: &str, branch: &str, path: &str) -> Result<bool> {
        let url = format!(
            "{}/repos/{}/{}/contents/{}?ref={}",
            self.api_root, owner, repo, path, branch
        );
        let response = self.get(&url).send()?;
        match response.status() {
            status if status.is_success() => Ok(true),
            reqwest::StatusCode::NOT_FOUND => Ok(false),
            status => Err(Error::Listing {
                url,
                message: format!("unexpected status {status}"),
            }),
        }
    }
}

/// Discovery source over one GitHub owner (user or organization).
pub struct GithubSource {
    owner: String,
    api: Box<dyn GithubApi>,
    descriptors: DescriptorSet,
}

impl GithubSource {
    pub fn new(owner: impl Into<String>, api: Box<dyn GithubApi>, descriptors: DescriptorSet) -> Self {
        Self {
            owner: owner.into(),
            api,
            descriptors,
        }
    }

    /// Probe one repository for a descriptor; first literal pattern wins.
    /// Glob descriptor patterns cannot be probed through the contents API
    /// and are skipped for remote sources.
    fn classify(&self, repo: &RemoteRepo, branch: &str) -> Result<Option<String>> {
        for descriptor in self.descriptors.entries() {
            if !descriptor.is_literal() {
                log::debug!(
                    "skipping glob descriptor {:?} for remote repository {}",
                    descriptor.pattern_str(),
                    repo.name
                );
                continue;
            }
            if self
                .api
                .file_exists(&self.owner, &repo.name, branch, descriptor.pattern_str())?
            {
                return Ok(Some(descriptor.kind().to_string()));
            }
        }
        Ok(None)
    }
}

impl Source for GithubSource {
    fn scan(&self, destination: &ProjectQueue) -> Result<()> {
        for repo in self.api.list_repositories(&self.owner)? {
            let branch = repo.default_branch.as_deref().unwrap_or("main");
            let Some(kind) = self.classify(&repo, branch)? else {
                log::debug!("no descriptor in {}/{}", self.owner, repo.name);
                continue;
            };
            let url = ScmUrl::parse(ScmKind::Git, &repo.clone_url)?;
            destination.push(ProjectRoot {
                origin: repo.clone_url.clone(),
                revision: repo.pushed_at.clone().unwrap_or_default(),
                scm_url: Some(url.url()),
                kind,
            })?;
        }
        Ok(())
    }

    fn add_exclude(&mut self, pattern: &str) -> Result<()> {
        Err(Error::UnsupportedOption {
            option: format!("exclude:{pattern}"),
            message: "a flat repository listing cannot be crawled selectively".to_string(),
        })
    }

    fn set_option(&mut self, key: &str, _value: &str) -> Result<()> {
        Err(Error::UnsupportedOption {
            option: key.to_string(),
            message: "a flat repository listing cannot be crawled selectively".to_string(),
        })
    }
}
