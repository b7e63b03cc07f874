//! Path-keyed arena holding every node produced by one walk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::error::{CoreError, CoreResult};
use super::node::Node;

/// A node together with everything below it. This is what each concurrent
/// sub-walk hands back to its parent.
#[derive(Debug, Clone)]
pub(crate) struct Subtree {
    pub node: Node,
    pub descendants: Vec<Node>,
    pub omitted: Vec<PathBuf>,
}

impl Subtree {
    pub fn leaf(node: Node) -> Self {
        Self {
            node,
            descendants: Vec::new(),
            omitted: Vec::new(),
        }
    }

    /// Moves `child` and its descendants under this subtree's bookkeeping.
    pub fn absorb(&mut self, child: Subtree) {
        self.descendants.push(child.node);
        self.descendants.extend(child.descendants);
        self.omitted.extend(child.omitted);
    }
}

/// The result of a walk.
///
/// Nodes reference each other by path; this map resolves those references.
/// The root's containing folder is kept as a childless placeholder so that
/// parent lookups from the root succeed.
#[derive(Debug, Clone)]
pub struct FsTree {
    root: PathBuf,
    container: Option<PathBuf>,
    nodes: HashMap<PathBuf, Node>,
    omitted: Vec<PathBuf>,
}

impl FsTree {
    pub(crate) fn new(container: Option<Node>, subtree: Subtree) -> Self {
        let Subtree {
            node,
            descendants,
            mut omitted,
        } = subtree;
        omitted.sort();

        let root = node.path().to_path_buf();
        let container_path = container.as_ref().map(|c| c.path().to_path_buf());
        let nodes = container
            .into_iter()
            .chain(std::iter::once(node))
            .chain(descendants)
            .map(|n| (n.path().to_path_buf(), n))
            .collect();

        Self {
            root,
            container: container_path,
            nodes,
            omitted,
        }
    }

    pub fn root(&self) -> &Node {
        &self.nodes[&self.root]
    }

    /// The synthetic directory standing for the folder that holds the root.
    /// It never lists the root's siblings.
    pub fn container(&self) -> Option<&Node> {
        self.container.as_ref().and_then(|path| self.nodes.get(path))
    }

    pub fn get(&self, path: &Path) -> Option<&Node> {
        self.nodes.get(path)
    }

    pub fn parent_of(&self, node: &Node) -> Option<&Node> {
        node.parent_path().and_then(|path| self.nodes.get(path))
    }

    /// Walks upward from `node`, nearest parent first, ending at the container.
    pub fn ancestors<'a>(&'a self, node: &'a Node) -> impl Iterator<Item = &'a Node> + 'a {
        std::iter::successors(self.parent_of(node), move |current| self.parent_of(current))
    }

    /// Children of a directory in display-name order.
    ///
    /// # Panics
    ///
    /// Panics if `node` is a file.
    pub fn children_of<'a>(&'a self, node: &'a Node) -> impl Iterator<Item = &'a Node> + 'a {
        node.children().iter().filter_map(move |path| self.nodes.get(path))
    }

    /// All nodes from the root down, depth first, parents before children.
    pub fn preorder(&self) -> Vec<&Node> {
        let mut visited = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];

        while let Some(node) = stack.pop() {
            visited.push(node);
            if node.is_directory() {
                let children: Vec<&Node> = self.children_of(node).collect();
                stack.extend(children.into_iter().rev());
            }
        }

        visited
    }

    /// `node`'s path relative to the folder that contains the root, so the
    /// root itself shows up under its own name.
    pub fn relative_path<'a>(&self, node: &'a Node) -> &'a Path {
        match &self.container {
            Some(container) => node.path().strip_prefix(container).unwrap_or(node.path()),
            None => node.path(),
        }
    }

    /// Number of nodes reachable from the root, the root included.
    pub fn len(&self) -> usize {
        self.nodes.len() - usize::from(self.container.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries dropped during the walk because they could not be read.
    pub fn omitted(&self) -> &[PathBuf] {
        &self.omitted
    }

    /// Loads the content of the file at `path` and returns the new node. The
    /// tree keeps the node it already had.
    pub async fn materialize(&self, path: &Path) -> CoreResult<Node> {
        let node = self
            .nodes
            .get(path)
            .ok_or_else(|| CoreError::PathDoesNotExist(path.to_path_buf()))?;
        node.materialize_content().await
    }

    /// Consumes the tree and returns one whose node at `path` has its content
    /// loaded.
    pub async fn with_materialized(mut self, path: &Path) -> CoreResult<FsTree> {
        let loaded = self.materialize(path).await?;
        self.nodes.insert(path.to_path_buf(), loaded);
        Ok(self)
    }

    /// True if both trees hold the same paths wired the same way with the same
    /// child order. Loaded content is not compared.
    pub fn same_shape(&self, other: &FsTree) -> bool {
        self.root == other.root
            && self.container == other.container
            && self.nodes.len() == other.nodes.len()
            && self.nodes.iter().all(|(path, node)| {
                other
                    .nodes
                    .get(path)
                    .is_some_and(|theirs| node.same_structure(theirs))
            })
    }
}
