//! Assembles selected files of a walked tree into one plain-text document
//! that can be handed to an LLM provider.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::{CoreError, CoreResult};
use super::tree::FsTree;
use super::tree_generator::TreeGenerator;

const FILE_START: &str = "=====================FILE-START==================";
const FILE_END: &str = "----------------------FILE-END-------------------";
const TREE_RULE: &str = "====================================================";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextOptions {
    /// Append an ASCII rendering of the whole tree after the files.
    pub include_tree: bool,
    /// Label files relative to the folder containing the root instead of by
    /// absolute path.
    pub use_relative_paths: bool,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            include_tree: true,
            use_relative_paths: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextDocument {
    pub content: String,
    pub file_count: usize,
    pub byte_size: u64,
    pub line_count: usize,
}

pub struct ContextBuilder {
    options: ContextOptions,
}

impl ContextBuilder {
    pub fn new(options: ContextOptions) -> Self {
        Self { options }
    }

    /// Builds a document from every file in `tree`, in tree order.
    pub async fn build_all(&self, tree: &FsTree) -> CoreResult<ContextDocument> {
        let selection: Vec<PathBuf> = tree
            .preorder()
            .into_iter()
            .filter(|node| node.is_file())
            .map(|node| node.path().to_path_buf())
            .collect();
        self.build(tree, &selection).await
    }

    /// Builds a document from `selection`, in the order given.
    ///
    /// Lazy files are materialized on the way. Directories in the selection
    /// are skipped. A path that is not part of `tree`, or a file that cannot be
    /// read, fails the whole build.
    pub async fn build(&self, tree: &FsTree, selection: &[PathBuf]) -> CoreResult<ContextDocument> {
        let mut blocks = String::new();
        let mut file_count = 0;

        for path in selection {
            let node = tree
                .get(path)
                .ok_or_else(|| CoreError::PathDoesNotExist(path.clone()))?;
            if node.is_directory() {
                continue;
            }

            let loaded = node.materialize_content().await?;
            let content = loaded.try_content()?;

            blocks.push_str(&format!("{}\n", self.display_path(tree, node.path())));
            blocks.push_str(FILE_START);
            blocks.push('\n');
            blocks.push_str(content);
            if !content.ends_with('\n') {
                blocks.push('\n');
            }
            blocks.push_str(FILE_END);
            blocks.push_str("\n\n");

            file_count += 1;
            if file_count % 10 == 0 {
                tokio::task::yield_now().await;
            }
        }

        let mut content = String::new();
        content.push_str("# AITransformer Context\n");
        content.push_str(&format!(
            "# Generated: {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ));
        content.push_str(&format!("# Total files: {}\n", file_count));
        content.push('\n');
        content.push_str(&blocks);

        if self.options.include_tree {
            content.push_str("# DIRECTORY TREE\n");
            content.push_str(TREE_RULE);
            content.push('\n');
            content.push_str(&TreeGenerator::generate_tree(tree));
            content.push_str(TREE_RULE);
            content.push('\n');
        }

        let byte_size = content.len() as u64;
        let line_count = content.lines().count();
        tracing::info!(
            "Assembled context: {} files, {} bytes, {} lines",
            file_count,
            byte_size,
            line_count
        );

        Ok(ContextDocument {
            content,
            file_count,
            byte_size,
            line_count,
        })
    }

    fn display_path(&self, tree: &FsTree, path: &Path) -> String {
        let shown = match tree.get(path) {
            Some(node) if self.options.use_relative_paths => tree.relative_path(node),
            _ => path,
        };
        shown.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::walker::{WalkOptions, Walker};
    use std::fs;
    use tempfile::TempDir;

    async fn project() -> (TempDir, PathBuf, FsTree) {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("demo");
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/lib.rs"), "pub fn demo() {}").unwrap();
        fs::write(root.join("README.md"), "# Demo\n").unwrap();
        let tree = Walker::new(WalkOptions::default()).walk(&root).await.unwrap();
        (temp, root, tree)
    }

    #[tokio::test]
    async fn test_build_selection_with_relative_paths() {
        let (_temp, root, tree) = project().await;
        let builder = ContextBuilder::new(ContextOptions {
            include_tree: false,
            use_relative_paths: true,
        });

        let selection = vec![root.join("src/lib.rs"), root.join("src")];
        let doc = builder.build(&tree, &selection).await.unwrap();

        assert_eq!(doc.file_count, 1);
        assert!(doc.content.starts_with("# AITransformer Context\n# Generated: "));
        assert!(doc.content.contains("# Total files: 1\n"));

        let expected_block = format!(
            "{}\n{FILE_START}\npub fn demo() {{}}\n{FILE_END}\n\n",
            Path::new("demo").join("src").join("lib.rs").display()
        );
        assert!(doc.content.ends_with(&expected_block));
        assert_eq!(doc.byte_size, doc.content.len() as u64);
        assert_eq!(doc.line_count, doc.content.lines().count());
    }

    #[tokio::test]
    async fn test_build_all_includes_tree() {
        let (_temp, root, tree) = project().await;
        let builder = ContextBuilder::new(ContextOptions {
            include_tree: true,
            use_relative_paths: false,
        });

        let doc = builder.build_all(&tree).await.unwrap();
        assert_eq!(doc.file_count, 2);
        assert!(doc.content.contains(&format!("{}\n{FILE_START}", root.join("README.md").display())));
        assert!(doc.content.contains("# DIRECTORY TREE\n"));
        assert!(doc.content.contains("└── 📄 lib.rs"));

        let readme = doc.content.find("README.md\n").unwrap();
        let lib = doc.content.find("lib.rs\n").unwrap();
        assert!(readme < lib);
    }

    #[tokio::test]
    async fn test_build_fails_on_deleted_file() {
        let (_temp, root, tree) = project().await;
        fs::remove_file(root.join("README.md")).unwrap();

        let err = ContextBuilder::new(ContextOptions::default())
            .build_all(&tree)
            .await
            .unwrap_err();
        assert!(err.is_read_failure());
    }

    #[tokio::test]
    async fn test_build_rejects_unknown_path() {
        let (_temp, root, tree) = project().await;
        let err = ContextBuilder::new(ContextOptions::default())
            .build(&tree, &[root.join("missing.rs")])
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::PathDoesNotExist(_)));
    }
}
