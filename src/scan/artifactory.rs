//! Artifactory-backed discovery source.
//!
//! An Artifactory repository is a plain folder tree served over the
//! storage API, so discovery reuses the generic [`NodeSource`] walker: the
//! source lists the top-level entries and roots a walk at each folder.
//! Entries that directly carry a recognizable descriptor are enqueued
//! without a walk. The API sits behind the [`ArtifactoryApi`] trait so
//! tests can substitute a mock.

use std::sync::Arc;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::scan::node::{Node, NodeSource};
use crate::scan::project::{DescriptorSet, ProjectRoot};
use crate::scan::queue::ProjectQueue;
use crate::scan::Source;

/// Storage-API listing of one folder.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct StorageListing {
    #[serde(default)]
    pub children: Vec<StorageChild>,
    #[serde(default, rename = "lastModified")]
    pub last_modified: Option<String>,
}

/// One entry of a folder listing. The `uri` is relative and starts with a
/// slash.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageChild {
    pub uri: String,
    #[serde(default)]
    pub folder: bool,
}

/// Minimal Artifactory boundary: list one folder of the storage tree.
pub trait ArtifactoryApi: Send + Sync {
    /// List the folder at `path` (empty string for the repository root).
    fn list(&self, path: &str) -> Result<StorageListing>;

    /// Browsable identifier of the folder at `path`, used as a project
    /// record's origin.
    fn origin(&self, path: &str) -> String;
}

/// `ArtifactoryApi` implementation against the storage REST API.
///
/// `base` points at the repository inside the storage API, e.g.
/// `https://repo.example.org/artifactory/api/storage/libs-release-local`.
pub struct HttpArtifactoryApi {
    http: reqwest::blocking::Client,
    base: String,
    token: Option<String>,
}

impl HttpArtifactoryApi {
    pub fn new(base: impl Into<String>, token: Option<String>) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            base: base.into().trim_end_matches('/').to_string(),
            token,
        }
    }
}

impl ArtifactoryApi for HttpArtifactoryApi {
    fn list(&self, path: &str) -> Result<StorageListing> {
        let url = self.origin(path);
        let mut request = self.http.get(&url).header("User-Agent", "repo-scout");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }
        let response = request.send()?;
        if !response.status().is_success() {
            return Err(Error::Listing {
                url,
                message: format!("unexpected status {}", response.status()),
            });
        }
        Ok(response.json()?)
    }

    fn origin(&self, path: &str) -> String {
        if path.is_empty() {
            self.base.clone()
        } else {
            format!("{}/{}", self.base, path)
        }
    }
}

/// A node in an Artifactory folder tree.
struct ArtifactoryNode {
    api: Arc<dyn ArtifactoryApi>,
    path: String,
    name: String,
    folder: bool,
}

impl ArtifactoryNode {
    fn new(api: Arc<dyn ArtifactoryApi>, path: String, folder: bool) -> Self {
        let name = path.rsplit('/').next().unwrap_or_default().to_string();
        Self {
            api,
            path,
            name,
            folder,
        }
    }
}

impl Node for ArtifactoryNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn origin(&self) -> String {
        self.api.origin(&self.path)
    }

    fn is_container(&self) -> bool {
        self.folder
    }

    fn children(&self) -> Result<Vec<Box<dyn Node>>> {
        let listing = self.api.list(&self.path)?;
        let mut children: Vec<Box<dyn Node>> = listing
            .children
            .into_iter()
            .map(|child| {
                let name = child.uri.trim_start_matches('/');
                let path = if self.path.is_empty() {
                    name.to_string()
                } else {
                    format!("{}/{}", self.path, name)
                };
                Box::new(ArtifactoryNode::new(self.api.clone(), path, child.folder))
                    as Box<dyn Node>
            })
            .collect();
        children.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(children)
    }

    fn revision(&self) -> Result<String> {
        Ok(self
            .api
            .list(&self.path)?
            .last_modified
            .unwrap_or_default())
    }

    fn scm_url(&self) -> Result<Option<String>> {
        // Artifact trees carry no source-control identity.
        Ok(None)
    }
}

/// Discovery source over one Artifactory repository.
pub struct ArtifactorySource {
    api: Arc<dyn ArtifactoryApi>,
    descriptors: DescriptorSet,
}

impl ArtifactorySource {
    pub fn new(api: Arc<dyn ArtifactoryApi>, descriptors: DescriptorSet) -> Self {
        Self { api, descriptors }
    }
}

impl Source for ArtifactorySource {
    fn scan(&self, destination: &ProjectQueue) -> Result<()> {
        let root = self.api.list("")?;
        for child in root.children {
            let name = child.uri.trim_start_matches('/').to_string();
            if child.folder {
                let node = ArtifactoryNode::new(self.api.clone(), name, true);
                let walker = NodeSource::new(Box::new(node), self.descriptors.clone());
                walker.scan(destination)?;
            } else if let Some(kind) = self.descriptors.classify(&name) {
                // A descriptor sitting at the repository root makes the
                // repository itself one project.
                destination.push(ProjectRoot {
                    origin: self.api.origin(""),
                    revision: root.last_modified.clone().unwrap_or_default(),
                    scm_url: None,
                    kind: kind.to_string(),
                })?;
                return Ok(());
            }
        }
        Ok(())
    }

    fn add_exclude(&mut self, pattern: &str) -> Result<()> {
        Err(Error::UnsupportedOption {
            option: format!("exclude:{pattern}"),
            message: "an artifact listing cannot be crawled selectively".to_string(),
        })
    }

    fn set_option(&mut self, key: &str, _value: &str) -> Result<()> {
        Err(Error::UnsupportedOption {
            option: key.to_string(),
            message: "an artifact listing cannot be crawled selectively".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::queue;
    use std::collections::HashMap;

    /// In-memory folder tree keyed by path.
    struct MockArtifactoryApi {
        folders: HashMap<String, Vec<(String, bool)>>,
    }

    impl MockArtifactoryApi {
        fn new(folders: &[(&str, &[(&str, bool)])]) -> Self {
            Self {
                folders: folders
                    .iter()
                    .map(|(path, children)| {
                        (
                            path.to_string(),
                            children
                                .iter()
                                .map(|(name, folder)| (name.to_string(), *folder))
                                .collect(),
                        )
                    })
                    .collect(),
            }
        }
    }

    impl ArtifactoryApi for MockArtifactoryApi {
        fn list(&self, path: &str) -> Result<StorageListing> {
            let children = self
                .folders
                .get(path)
                .map(|children| {
                    children
                        .iter()
                        .map(|(name, folder)| StorageChild {
                            uri: format!("/{name}"),
                            folder: *folder,
                        })
                        .collect()
                })
                .unwrap_or_default();
            Ok(StorageListing {
                children,
                last_modified: Some("2026-08-01T12:00:00Z".to_string()),
            })
        }

        fn origin(&self, path: &str) -> String {
            if path.is_empty() {
                "https://repo.example.org/artifactory/api/storage/libs".to_string()
            } else {
                format!("https://repo.example.org/artifactory/api/storage/libs/{path}")
            }
        }
    }

    fn scan(api: MockArtifactoryApi) -> Vec<ProjectRoot> {
        let source = ArtifactorySource::new(Arc::new(api), DescriptorSet::builtin());
        let (queue, receiver) = queue::bounded(16);
        source.scan(&queue).unwrap();
        drop(queue);
        receiver.drain()
    }

    #[test]
    fn test_folders_are_walked_for_descriptors() {
        let api = MockArtifactoryApi::new(&[
            ("", &[("puc", true), ("misc", true)]),
            ("puc", &[("pom.xml", false), ("src", true)]),
            ("misc", &[("README.md", false)]),
        ]);
        let roots = scan(api);
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].kind, "maven");
        assert!(roots[0].origin.ends_with("/libs/puc"));
        assert!(roots[0].scm_url.is_none());
    }

    #[test]
    fn test_nested_projects_are_found() {
        let api = MockArtifactoryApi::new(&[
            ("", &[("group", true)]),
            ("group", &[("tool", true)]),
            ("group/tool", &[("Cargo.toml", false)]),
        ]);
        let roots = scan(api);
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].kind, "cargo");
        assert!(roots[0].origin.ends_with("group/tool"));
    }

    #[test]
    fn test_root_descriptor_enqueues_directly() {
        let api = MockArtifactoryApi::new(&[("", &[("pom.xml", false), ("sub", true)])]);
        let roots = scan(api);
        assert_eq!(roots.len(), 1);
        assert!(roots[0].origin.ends_with("/libs"));
    }

    #[test]
    fn test_configuration_is_rejected() {
        let api = MockArtifactoryApi::new(&[]);
        let mut source = ArtifactorySource::new(Arc::new(api), DescriptorSet::builtin());
        assert!(matches!(
            source.add_exclude("target"),
            Err(Error::UnsupportedOption { .. })
        ));
        assert!(matches!(
            source.set_option("branches", "false"),
            Err(Error::UnsupportedOption { .. })
        ));
    }
}
