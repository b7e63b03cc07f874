//! Immutable file and directory nodes.
//!
//! A node is identified by its path alone. Parent and child links are stored
//! as paths and resolved through the [`FsTree`](super::tree::FsTree) arena that
//! owns every node of a walk, so no node ever holds another node.

use std::borrow::Cow;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::error::{CoreError, CoreResult};

/// What a node is, together with the data only that kind carries.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// `content` is `None` while the file is lazy.
    File { content: Option<Arc<str>> },
    /// Child paths, sorted ascending by display name.
    Directory { children: Vec<PathBuf> },
}

/// A file or directory found by a walk.
///
/// Nodes never change after construction. The `with_*` methods and
/// [`Node::materialize_content`] hand back new values.
#[derive(Debug, Clone)]
pub struct Node {
    path: PathBuf,
    parent: Option<PathBuf>,
    kind: NodeKind,
}

impl Node {
    /// Creates a file whose content is already known.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is a file.
    pub fn file(path: impl Into<PathBuf>, content: impl Into<Arc<str>>, parent: Option<&Node>) -> Self {
        Self {
            path: path.into(),
            parent: Self::parent_id(parent),
            kind: NodeKind::File {
                content: Some(content.into()),
            },
        }
    }

    /// Creates a file whose content has not been read yet.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is a file.
    pub fn lazy_file(path: impl Into<PathBuf>, parent: Option<&Node>) -> Self {
        Self {
            path: path.into(),
            parent: Self::parent_id(parent),
            kind: NodeKind::File { content: None },
        }
    }

    /// Creates a directory. Children are ordered by display name regardless of
    /// the order they are passed in.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is a file.
    pub fn directory(path: impl Into<PathBuf>, children: &[Node], parent: Option<&Node>) -> Self {
        let mut children: Vec<PathBuf> = children.iter().map(|child| child.path.clone()).collect();
        children.sort_by(|a, b| display_name(a).cmp(&display_name(b)));

        Self {
            path: path.into(),
            parent: Self::parent_id(parent),
            kind: NodeKind::Directory { children },
        }
    }

    fn parent_id(parent: Option<&Node>) -> Option<PathBuf> {
        parent.map(|parent| {
            assert!(parent.is_directory(), "the parent of a node must be a directory");
            parent.path.clone()
        })
    }

    /// Returns a copy of this node attached to `parent`.
    pub fn with_parent(&self, parent: &Node) -> CoreResult<Node> {
        if !parent.is_directory() {
            return Err(CoreError::ContractViolation("the parent of a node must be a directory"));
        }

        Ok(Self {
            path: self.path.clone(),
            parent: Some(parent.path.clone()),
            kind: self.kind.clone(),
        })
    }

    /// Returns a new directory with the same path and parent but `children`.
    pub fn with_children(&self, children: &[Node]) -> CoreResult<Node> {
        if !self.is_directory() {
            return Err(CoreError::ContractViolation("only directories hold children"));
        }

        let mut directory = Self::directory(self.path.clone(), children, None);
        directory.parent = self.parent.clone();
        Ok(directory)
    }

    /// Reads a lazy file from disk and returns the loaded node.
    ///
    /// An already loaded file is returned as is. A failed read is reported as
    /// [`CoreError::Io`]; it never yields empty content.
    pub async fn materialize_content(&self) -> CoreResult<Node> {
        match &self.kind {
            NodeKind::Directory { .. } => Err(CoreError::ContractViolation("only files have content")),
            NodeKind::File { content: Some(_) } => Ok(self.clone()),
            NodeKind::File { content: None } => {
                let content = tokio::fs::read_to_string(&self.path)
                    .await
                    .map_err(|e| CoreError::io(e, &self.path))?;
                tracing::debug!("Materialized {} ({} bytes)", self.path.display(), content.len());

                Ok(Self {
                    path: self.path.clone(),
                    parent: self.parent.clone(),
                    kind: NodeKind::File {
                        content: Some(content.into()),
                    },
                })
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The last path component, or the whole path for a filesystem root.
    pub fn name(&self) -> Cow<'_, str> {
        display_name(&self.path)
    }

    pub fn parent_path(&self) -> Option<&Path> {
        self.parent.as_deref()
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File { .. })
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    /// True for a file whose content has not been read. Always false for
    /// directories.
    pub fn is_lazy(&self) -> bool {
        matches!(self.kind, NodeKind::File { content: None })
    }

    pub fn try_content(&self) -> CoreResult<&str> {
        match &self.kind {
            NodeKind::File { content: Some(content) } => Ok(content),
            NodeKind::File { content: None } => Err(CoreError::ContractViolation(
                "lazy file content must be materialized before it is read",
            )),
            NodeKind::Directory { .. } => Err(CoreError::ContractViolation("only files have content")),
        }
    }

    /// # Panics
    ///
    /// Panics on a directory or on a lazy file; see [`Node::try_content`].
    pub fn content(&self) -> &str {
        match self.try_content() {
            Ok(content) => content,
            Err(e) => panic!("{e}: {}", self.path.display()),
        }
    }

    pub fn try_children(&self) -> CoreResult<&[PathBuf]> {
        match &self.kind {
            NodeKind::Directory { children } => Ok(children),
            NodeKind::File { .. } => Err(CoreError::ContractViolation("only directories hold children")),
        }
    }

    /// # Panics
    ///
    /// Panics on a file; see [`Node::try_children`].
    pub fn children(&self) -> &[PathBuf] {
        match self.try_children() {
            Ok(children) => children,
            Err(e) => panic!("{e}: {}", self.path.display()),
        }
    }

    /// A file is empty when its content is, a directory when it has no
    /// children.
    ///
    /// # Panics
    ///
    /// Panics on a lazy file.
    pub fn is_empty(&self) -> bool {
        match &self.kind {
            NodeKind::File { .. } => self.content().is_empty(),
            NodeKind::Directory { children } => children.is_empty(),
        }
    }

    /// 1 for a file, the number of direct children for a directory.
    pub fn count(&self) -> usize {
        match &self.kind {
            NodeKind::File { .. } => 1,
            NodeKind::Directory { children } => children.len(),
        }
    }

    /// Compares everything a walk decides: path, parent, kind, child order.
    /// Loaded content is not compared.
    pub fn same_structure(&self, other: &Node) -> bool {
        if self.path != other.path || self.parent != other.parent {
            return false;
        }

        match (&self.kind, &other.kind) {
            (NodeKind::File { .. }, NodeKind::File { .. }) => true,
            (NodeKind::Directory { children: a }, NodeKind::Directory { children: b }) => a == b,
            _ => false,
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

/// A file read directly from disk, outside of any walk.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileItem {
    pub path: PathBuf,
    pub content: String,
}

impl FileItem {
    pub fn name(&self) -> Cow<'_, str> {
        display_name(&self.path)
    }
}

pub(crate) fn display_name(path: &Path) -> Cow<'_, str> {
    match path.file_name() {
        Some(name) => name.to_string_lossy(),
        None => path.to_string_lossy(),
    }
}
