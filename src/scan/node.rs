//! # Tree Walking
//!
//! [`NodeSource`] is the generic tree scanner: it walks any hierarchy that
//! can present itself through the [`Node`] trait, whether a local directory
//! tree (`FsNode`), a remote Subversion repository (`SvnNode`), or an
//! API-backed artifact tree, applying the same layout heuristics to all
//! of them.
//!
//! The walk is depth-first and makes irreversible structural decisions as
//! it goes:
//!
//! 1. An excluded node is never descended into.
//! 2. A node directly containing a recognizable project descriptor is a
//!    project root; it is enqueued and its descendants are never scanned.
//! 3. A `trunk` child is scanned for a project root but not re-expanded;
//!    with branch scanning enabled, each immediate child of a `branches`
//!    child is treated the same way. When either convention is present the
//!    walk stops there.
//! 4. A node with a `src` child but no layout convention is a legacy build
//!    layout, not a project worth indexing; the walk stops.
//! 5. Otherwise every child is visited in turn.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use glob::Pattern;

use crate::error::{Error, Result};
use crate::scan::project::{DescriptorSet, ProjectRoot};
use crate::scan::queue::ProjectQueue;
use crate::scan::Source;
use crate::scm::process::Invocation;
use crate::scm::svn::SVN_GLOBAL_ARGS;
use crate::scm::{ScmKind, ScmUrl};

/// One position in a scannable tree.
pub trait Node: Send {
    /// Leaf name of this node.
    fn name(&self) -> &str;

    /// Origin identifier for project records: an absolute URI or path.
    fn origin(&self) -> String;

    /// Whether the node can have children.
    fn is_container(&self) -> bool;

    /// The node's immediate children, in a stable order.
    fn children(&self) -> Result<Vec<Box<dyn Node>>>;

    /// Revision marker for project records: a last-modified timestamp or a
    /// VCS revision number.
    fn revision(&self) -> Result<String>;

    /// Canonical SCM location of this node, when the tree knows one.
    /// Normalization failures propagate; they are never skipped silently.
    fn scm_url(&self) -> Result<Option<String>>;
}

/// Generic depth-first tree scanner over a [`Node`] hierarchy.
pub struct NodeSource {
    root: Box<dyn Node>,
    excludes: Vec<Pattern>,
    with_branches: bool,
    descriptors: DescriptorSet,
}

impl NodeSource {
    pub fn new(root: Box<dyn Node>, descriptors: DescriptorSet) -> Self {
        Self {
            root,
            excludes: Vec::new(),
            with_branches: true,
            descriptors,
        }
    }

    fn excluded(&self, name: &str, rel: &str) -> bool {
        self.excludes
            .iter()
            .any(|pattern| pattern.matches(name) || pattern.matches(rel))
    }

    fn scan_node(
        &self,
        node: &dyn Node,
        rel: &str,
        recurse: bool,
        destination: &ProjectQueue,
    ) -> Result<()> {
        if self.excluded(node.name(), rel) {
            log::debug!("excluded: {}", node.origin());
            return Ok(());
        }
        if !node.is_container() {
            return Ok(());
        }

        let children = node.children()?;
        if children.is_empty() {
            return Ok(());
        }

        // First descriptor match wins; descendants of a recognized project
        // are never scanned independently.
        for child in &children {
            if child.is_container() {
                continue;
            }
            if let Some(kind) = self.descriptors.classify(child.name()) {
                let root = ProjectRoot {
                    origin: node.origin(),
                    revision: node.revision()?,
                    scm_url: node.scm_url()?,
                    kind: kind.to_string(),
                };
                destination.push(root)?;
                return Ok(());
            }
        }

        if !recurse {
            return Ok(());
        }

        let child_named = |name: &str| {
            children
                .iter()
                .find(|child| child.is_container() && child.name() == name)
        };

        let trunk = child_named("trunk");
        let branches = child_named("branches");
        if trunk.is_some() || branches.is_some() {
            if let Some(trunk) = trunk {
                self.scan_node(trunk.as_ref(), &join_rel(rel, "trunk"), false, destination)?;
            }
            if self.with_branches {
                if let Some(branches) = branches {
                    let branches_rel = join_rel(rel, "branches");
                    for branch in branches.children()? {
                        if branch.is_container() {
                            let branch_rel = join_rel(&branches_rel, branch.name());
                            self.scan_node(branch.as_ref(), &branch_rel, false, destination)?;
                        }
                    }
                }
            }
            return Ok(());
        }

        // Legacy build layout: a bare `src` directory without trunk or
        // branches is not a project worth indexing.
        if child_named("src").is_some() {
            return Ok(());
        }

        for child in &children {
            if child.is_container() {
                self.scan_node(
                    child.as_ref(),
                    &join_rel(rel, child.name()),
                    true,
                    destination,
                )?;
            }
        }
        Ok(())
    }
}

impl Source for NodeSource {
    fn scan(&self, destination: &ProjectQueue) -> Result<()> {
        self.scan_node(self.root.as_ref(), "", true, destination)
    }

    fn add_exclude(&mut self, pattern: &str) -> Result<()> {
        if pattern.starts_with('/') || pattern.ends_with('/') {
            return Err(Error::UnsupportedOption {
                option: format!("exclude:{pattern}"),
                message: "exclude patterns must not start or end with a path separator"
                    .to_string(),
            });
        }
        self.excludes.push(Pattern::new(pattern)?);
        Ok(())
    }

    fn set_option(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "branches" => {
                self.with_branches = value.parse().map_err(|_| Error::UnsupportedOption {
                    option: key.to_string(),
                    message: format!("expected true or false, got {value:?}"),
                })?;
                Ok(())
            }
            _ => Err(Error::UnsupportedOption {
                option: key.to_string(),
                message: "unknown scanner option".to_string(),
            }),
        }
    }
}

fn join_rel(rel: &str, name: &str) -> String {
    if rel.is_empty() {
        name.to_string()
    } else {
        format!("{rel}/{name}")
    }
}

/// A node in the local filesystem.
pub struct FsNode {
    path: PathBuf,
    name: String,
}

impl FsNode {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        Self { path, name }
    }
}

impl Node for FsNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn origin(&self) -> String {
        self.path.display().to_string()
    }

    fn is_container(&self) -> bool {
        self.path.is_dir()
    }

    fn children(&self) -> Result<Vec<Box<dyn Node>>> {
        let mut entries: Vec<PathBuf> = fs::read_dir(&self.path)?
            .collect::<std::io::Result<Vec<_>>>()?
            .into_iter()
            .map(|entry| entry.path())
            .collect();
        entries.sort();
        Ok(entries
            .into_iter()
            .map(|path| Box::new(FsNode::new(path)) as Box<dyn Node>)
            .collect())
    }

    fn revision(&self) -> Result<String> {
        let modified = fs::metadata(&self.path)?.modified()?;
        let stamp: DateTime<Utc> = modified.into();
        Ok(stamp.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    fn scm_url(&self) -> Result<Option<String>> {
        // Plain directory trees are a loosely-typed source.
        Ok(None)
    }
}

/// A node in a remote Subversion tree, listed through the `svn` command.
pub struct SvnNode {
    url: String,
    name: String,
    dir: bool,
}

impl SvnNode {
    /// Root node of a remote tree.
    pub fn root(url: impl Into<String>) -> Self {
        let url = url.into();
        let name = url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();
        Self {
            url: url.trim_end_matches('/').to_string(),
            name,
            dir: true,
        }
    }

    fn svn(&self) -> Invocation {
        Invocation::new("svn", std::env::temp_dir()).args(SVN_GLOBAL_ARGS)
    }
}

impl Node for SvnNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn origin(&self) -> String {
        self.url.clone()
    }

    fn is_container(&self) -> bool {
        self.dir
    }

    fn children(&self) -> Result<Vec<Box<dyn Node>>> {
        let output = self.svn().arg("ls").arg(&self.url).run_checked()?;
        let listing = String::from_utf8_lossy(&output.stdout);
        Ok(parse_svn_listing(&self.url, &listing)
            .into_iter()
            .map(|node| Box::new(node) as Box<dyn Node>)
            .collect())
    }

    fn revision(&self) -> Result<String> {
        let output = self
            .svn()
            .args(["info", "--show-item", "last-changed-revision"])
            .arg(&self.url)
            .run_checked()?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn scm_url(&self) -> Result<Option<String>> {
        let url = ScmUrl::parse(ScmKind::Subversion, &self.url)?;
        Ok(Some(url.url()))
    }
}

/// Turn `svn ls` output into child nodes. Directory entries carry a
/// trailing slash.
pub(crate) fn parse_svn_listing(base_url: &str, listing: &str) -> Vec<SvnNode> {
    let mut children: Vec<SvnNode> = listing
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let dir = line.ends_with('/');
            let name = line.trim_end_matches('/').to_string();
            SvnNode {
                url: format!("{}/{}", base_url.trim_end_matches('/'), name),
                name,
                dir,
            }
        })
        .collect();
    children.sort_by(|a, b| a.name.cmp(&b.name));
    children
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::queue;
    use std::fs;
    use tempfile::TempDir;

    fn scan_tree(temp: &TempDir) -> Vec<ProjectRoot> {
        scan_tree_with(temp, |_| {})
    }

    fn scan_tree_with(temp: &TempDir, configure: impl FnOnce(&mut NodeSource)) -> Vec<ProjectRoot> {
        let mut source = NodeSource::new(
            Box::new(FsNode::new(temp.path())),
            DescriptorSet::builtin(),
        );
        configure(&mut source);
        let (queue, receiver) = queue::bounded(64);
        source.scan(&queue).unwrap();
        drop(queue);
        receiver.drain()
    }

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_descriptor_directory_is_a_project_root() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("puc/pom.xml"));

        let roots = scan_tree(&temp);
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].kind, "maven");
        assert!(roots[0].origin.ends_with("puc"));
        assert!(roots[0].scm_url.is_none());
        assert!(!roots[0].revision.is_empty());
    }

    #[test]
    fn test_project_root_descendants_are_not_scanned() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("puc/pom.xml"));
        touch(&temp.path().join("puc/module/pom.xml"));
        touch(&temp.path().join("puc/deep/nested/package.json"));

        let roots = scan_tree(&temp);
        assert_eq!(roots.len(), 1);
    }

    #[test]
    fn test_trunk_and_branches_each_yield_a_root() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("puc/trunk/pom.xml"));
        touch(&temp.path().join("puc/branches/puc-3/pom.xml"));
        touch(&temp.path().join("puc/branches/puc-4/pom.xml"));
        // A src-only sibling never becomes a project root.
        touch(&temp.path().join("puc/src/main.c"));

        let mut roots = scan_tree(&temp);
        roots.sort_by(|a, b| a.origin.cmp(&b.origin));
        assert_eq!(roots.len(), 3);
        assert!(roots.iter().all(|root| root.kind == "maven"));
        assert!(roots.iter().any(|root| root.origin.ends_with("trunk")));
        assert!(roots.iter().any(|root| root.origin.ends_with("puc-3")));
        assert!(roots.iter().any(|root| root.origin.ends_with("puc-4")));
    }

    #[test]
    fn test_branches_can_be_disabled() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("puc/trunk/pom.xml"));
        touch(&temp.path().join("puc/branches/puc-4/pom.xml"));

        let roots = scan_tree_with(&temp, |source| {
            source.set_option("branches", "false").unwrap();
        });
        assert_eq!(roots.len(), 1);
        assert!(roots[0].origin.ends_with("trunk"));
    }

    #[test]
    fn test_trunk_is_not_re_expanded() {
        let temp = TempDir::new().unwrap();
        // No descriptor directly in trunk; a nested trunk layout below it
        // must not be expanded.
        touch(&temp.path().join("puc/trunk/sub/trunk/pom.xml"));

        let roots = scan_tree(&temp);
        assert!(roots.is_empty());
    }

    #[test]
    fn test_src_only_directory_stops_the_walk() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("legacy/src/deep/pom.xml"));

        let roots = scan_tree(&temp);
        assert!(roots.is_empty());
    }

    #[test]
    fn test_excluded_directory_is_skipped() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("keep/pom.xml"));
        touch(&temp.path().join("skip/pom.xml"));

        let roots = scan_tree_with(&temp, |source| {
            source.add_exclude("skip").unwrap();
        });
        assert_eq!(roots.len(), 1);
        assert!(roots[0].origin.ends_with("keep"));
    }

    #[test]
    fn test_exclude_matches_relative_path() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("a/vendor/pom.xml"));
        touch(&temp.path().join("b/pom.xml"));

        let roots = scan_tree_with(&temp, |source| {
            source.add_exclude("a/*").unwrap();
        });
        assert_eq!(roots.len(), 1);
        assert!(roots[0].origin.ends_with("b"));
    }

    #[test]
    fn test_exclude_affix_separator_is_rejected() {
        let temp = TempDir::new().unwrap();
        let mut source = NodeSource::new(
            Box::new(FsNode::new(temp.path())),
            DescriptorSet::builtin(),
        );
        assert!(matches!(
            source.add_exclude("/abs"),
            Err(Error::UnsupportedOption { .. })
        ));
        assert!(matches!(
            source.add_exclude("trailing/"),
            Err(Error::UnsupportedOption { .. })
        ));
    }

    #[test]
    fn test_unknown_option_is_rejected() {
        let temp = TempDir::new().unwrap();
        let mut source = NodeSource::new(
            Box::new(FsNode::new(temp.path())),
            DescriptorSet::builtin(),
        );
        let err = source.set_option("depth", "3").unwrap_err();
        assert!(matches!(err, Error::UnsupportedOption { .. }));
    }

    #[test]
    fn test_empty_tree_yields_nothing() {
        let temp = TempDir::new().unwrap();
        assert!(scan_tree(&temp).is_empty());
    }

    #[test]
    fn test_missing_root_propagates_io_error() {
        let temp = TempDir::new().unwrap();
        let gone = temp.path().join("gone");
        let source = NodeSource::new(Box::new(FsNode::new(&gone)), DescriptorSet::builtin());
        let (queue, _receiver) = queue::bounded(4);
        // The root claims to be a container only if it exists; a vanished
        // root is simply empty.
        assert!(source.scan(&queue).is_ok());

        // A listing failure below the root propagates.
        fs::create_dir_all(gone.join("child")).unwrap();
        let unreadable = FsNode::new(gone.join("child"));
        fs::remove_dir_all(&gone).unwrap();
        assert!(unreadable.children().is_err());
    }

    #[test]
    fn test_parse_svn_listing_splits_dirs_and_files() {
        let listing = "branches/\npom.xml\ntrunk/\n";
        let children = parse_svn_listing("https://svn.example.org/puc", listing);
        assert_eq!(children.len(), 3);

        let branches = &children[0];
        assert_eq!(branches.name(), "branches");
        assert!(branches.is_container());
        assert_eq!(branches.origin(), "https://svn.example.org/puc/branches");

        let pom = &children[1];
        assert_eq!(pom.name(), "pom.xml");
        assert!(!pom.is_container());
    }

    #[test]
    fn test_svn_node_scm_url_folds_layout() {
        let node = SvnNode::root("https://svn.example.org/repos/puc/trunk");
        let url = node.scm_url().unwrap().unwrap();
        assert_eq!(url, "https://svn.example.org/repos/puc");
    }
}
