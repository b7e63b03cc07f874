//! Concurrent directory walker.
//!
//! Each directory level lists its entries, folds any ignore-rule files it
//! holds into the ignore set it inherited, and spawns one task per surviving
//! entry. The level waits for all of them and assembles its node once every
//! child is known.

use std::collections::BTreeSet;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;

use super::error::{CoreError, CoreResult};
use super::ignore::IgnoreSet;
use super::node::{FileItem, Node};
use super::tree::{FsTree, Subtree};

pub const DEFAULT_IGNORE_RULE_FILENAME: &str = ".gitignore";

/// When file content is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadingPolicy {
    /// Read every file during the walk.
    Eager,
    /// Leave files lazy; read them with [`Node::materialize_content`].
    #[default]
    Lazy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkOptions {
    pub loading: LoadingPolicy,
    /// Basenames of files whose lines are ignore rules for their directory.
    pub ignore_rule_filenames: BTreeSet<String>,
    /// Extra rules, in ignore-file syntax, applied from the root down.
    pub ignore_patterns: String,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            loading: LoadingPolicy::default(),
            ignore_rule_filenames: BTreeSet::from([DEFAULT_IGNORE_RULE_FILENAME.to_string()]),
            ignore_patterns: String::new(),
        }
    }
}

impl WalkOptions {
    pub fn with_loading(mut self, loading: LoadingPolicy) -> Self {
        self.loading = loading;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    File,
    Directory,
}

type Visit = Pin<Box<dyn Future<Output = CoreResult<Subtree>> + Send>>;

pub struct Walker {
    options: Arc<WalkOptions>,
}

impl Walker {
    pub fn new(options: WalkOptions) -> Self {
        Self {
            options: Arc::new(options),
        }
    }

    pub fn options(&self) -> &WalkOptions {
        &self.options
    }

    /// Walks `root`, which may be a file or a directory. A relative `root` is
    /// resolved against the working directory first.
    ///
    /// Failures on the root itself are returned. Failures on anything below it
    /// drop that entry and are listed in [`FsTree::omitted`].
    pub async fn walk(&self, root: &Path) -> CoreResult<FsTree> {
        let root = &absolute_root(root)?;
        let metadata = tokio::fs::metadata(root).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => CoreError::PathDoesNotExist(root.to_path_buf()),
            _ => CoreError::io(e, root),
        })?;

        let container = root
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(|parent| Node::directory(parent, &[], None));

        tracing::info!(
            "Walking {} ({:?} loading)",
            root.display(),
            self.options.loading
        );

        if metadata.is_file() {
            let node = load_file_node(root, container.as_ref(), self.options.loading).await?;
            return Ok(FsTree::new(container, Subtree::leaf(node)));
        }
        if !metadata.is_dir() {
            return Err(CoreError::NotADirectory(root.to_path_buf()));
        }

        let inherited = IgnoreSet::from_rules(&self.options.ignore_patterns);
        let subtree = visit_directory(
            root.to_path_buf(),
            container.clone(),
            inherited,
            Arc::clone(&self.options),
        )
        .await?;

        let tree = FsTree::new(container, subtree);
        tracing::info!(
            "Walk of {} finished: {} nodes, {} omitted",
            root.display(),
            tree.len(),
            tree.omitted().len()
        );
        Ok(tree)
    }

    /// Like [`Walker::walk`], but `root` must be a directory.
    pub async fn walk_directory(&self, root: &Path) -> CoreResult<FsTree> {
        let root = &absolute_root(root)?;
        if !item_exists(root).await {
            return Err(CoreError::PathDoesNotExist(root.to_path_buf()));
        }
        if !is_directory(root).await {
            return Err(CoreError::NotADirectory(root.to_path_buf()));
        }
        self.walk(root).await
    }

    /// Reads a single file outside of any walk.
    pub async fn load_file(path: &Path) -> CoreResult<FileItem> {
        let path = &absolute_root(path)?;
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => CoreError::PathDoesNotExist(path.to_path_buf()),
                _ => CoreError::io(e, path),
            })?;

        Ok(FileItem {
            path: path.to_path_buf(),
            content,
        })
    }
}

/// Node paths are absolute; `std::path::absolute` keeps symlinks and `..`
/// untouched, so the walked names stay the ones the caller gave.
fn absolute_root(root: &Path) -> CoreResult<PathBuf> {
    std::path::absolute(root).map_err(|e| CoreError::io(e, root))
}

pub async fn item_exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

pub async fn is_directory(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|metadata| metadata.is_dir())
        .unwrap_or(false)
}

pub async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|metadata| metadata.is_file())
        .unwrap_or(false)
}

fn visit_directory(
    path: PathBuf,
    parent: Option<Node>,
    inherited: IgnoreSet,
    options: Arc<WalkOptions>,
) -> Visit {
    Box::pin(async move {
        // Children point at this placeholder; only its path matters to them.
        let placeholder = Node::directory(path.clone(), &[], parent.as_ref());

        let (entries, unreadable) = list_entries(&path).await?;
        let ignores = scope_ignores(&entries, inherited, &options).await;

        let mut tasks = JoinSet::new();
        for (entry_path, kind) in entries {
            if is_hidden(&entry_path) || ignores.is_ignored(&entry_path) {
                continue;
            }

            let parent = placeholder.clone();
            match kind {
                EntryKind::Directory => {
                    let visit = visit_directory(
                        entry_path.clone(),
                        Some(parent),
                        ignores.clone(),
                        Arc::clone(&options),
                    );
                    tasks.spawn(async move { (entry_path, visit.await) });
                }
                EntryKind::File => {
                    let loading = options.loading;
                    tasks.spawn(async move {
                        let result = load_file_node(&entry_path, Some(&parent), loading)
                            .await
                            .map(Subtree::leaf);
                        (entry_path, result)
                    });
                }
            }
        }

        let mut children = Vec::with_capacity(tasks.len());
        let mut subtree = Subtree::leaf(placeholder.clone());
        subtree.omitted.extend(unreadable);
        while let Some(joined) = tasks.join_next().await {
            let (entry_path, result) = joined?;
            match result {
                Ok(child) => {
                    children.push(child.node.clone());
                    subtree.absorb(child);
                }
                Err(e) => {
                    tracing::warn!("Omitting {}: {}", entry_path.display(), e);
                    subtree.omitted.push(entry_path);
                }
            }
        }

        subtree.node = placeholder.with_children(&children)?;
        Ok(subtree)
    })
}

type Listing = (Vec<(PathBuf, EntryKind)>, Vec<PathBuf>);

/// Lists `dir`, splitting entries into walkable ones and ones whose type
/// could not be read.
async fn list_entries(dir: &Path) -> CoreResult<Listing> {
    let mut read_dir = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| CoreError::io(e, dir))?;

    let mut entries = Vec::new();
    let mut unreadable = Vec::new();
    while let Some(entry) = read_dir
        .next_entry()
        .await
        .map_err(|e| CoreError::io(e, dir))?
    {
        let path = entry.path();
        match classify(&entry).await {
            Ok(Some(kind)) => entries.push((path, kind)),
            Ok(None) => tracing::debug!("Skipping {}: not a file or directory", path.display()),
            Err(e) if is_hidden(&path) => {
                tracing::debug!("Skipping {}: {}", path.display(), e);
            }
            Err(e) => {
                tracing::warn!("Omitting {}: {}", path.display(), e);
                unreadable.push(path);
            }
        }
    }

    Ok((entries, unreadable))
}

async fn classify(entry: &tokio::fs::DirEntry) -> std::io::Result<Option<EntryKind>> {
    let file_type = entry.file_type().await?;
    if file_type.is_dir() {
        return Ok(Some(EntryKind::Directory));
    }
    if file_type.is_file() {
        return Ok(Some(EntryKind::File));
    }
    // Linked directories are not followed, which keeps link cycles out.
    // Dangling links are skipped like any other non-file.
    if file_type.is_symlink() {
        let target_is_file = tokio::fs::metadata(entry.path())
            .await
            .is_ok_and(|target| target.is_file());
        if target_is_file {
            return Ok(Some(EntryKind::File));
        }
    }
    Ok(None)
}

/// The ignore set for one directory: `inherited` plus every rule file found
/// among `entries`, applied in name order.
async fn scope_ignores(
    entries: &[(PathBuf, EntryKind)],
    inherited: IgnoreSet,
    options: &WalkOptions,
) -> IgnoreSet {
    let mut rule_files: Vec<&PathBuf> = entries
        .iter()
        .filter(|(path, kind)| {
            *kind == EntryKind::File
                && path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| options.ignore_rule_filenames.contains(name))
        })
        .map(|(path, _)| path)
        .collect();
    rule_files.sort();

    let mut ignores = inherited;
    for rule_file in rule_files {
        match tokio::fs::read_to_string(rule_file).await {
            Ok(content) => ignores = ignores.merge_rules(&content),
            Err(e) => tracing::warn!("Skipping unreadable ignore file {}: {}", rule_file.display(), e),
        }
    }
    ignores
}

async fn load_file_node(path: &Path, parent: Option<&Node>, loading: LoadingPolicy) -> CoreResult<Node> {
    match loading {
        LoadingPolicy::Lazy => Ok(Node::lazy_file(path, parent)),
        LoadingPolicy::Eager => {
            let content = tokio::fs::read_to_string(path)
                .await
                .map_err(|e| CoreError::io(e, path))?;
            Ok(Node::file(path, content, parent))
        }
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with('.'))
}
