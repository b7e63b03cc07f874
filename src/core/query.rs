//! Read-only lookups over a walked tree.

use rayon::prelude::*;

use super::node::Node;
use super::tree::FsTree;

/// A utility struct for searching the directories of an [`FsTree`].
///
/// This struct is stateless and provides methods as associated functions.
pub struct DirectoryQuery;

impl DirectoryQuery {
    /// Every directory below `from`, depth first, each directory before its
    /// own subdirectories. Files and `from` itself are not included.
    pub fn list_nested_directories<'a>(tree: &'a FsTree, from: &'a Node) -> Vec<&'a Node> {
        let mut directories = Vec::new();
        if from.is_directory() {
            Self::collect_directories(tree, from, &mut directories);
        }
        directories
    }

    fn collect_directories<'a>(tree: &'a FsTree, directory: &'a Node, out: &mut Vec<&'a Node>) {
        for child in tree.children_of(directory).filter(|child| child.is_directory()) {
            out.push(child);
            Self::collect_directories(tree, child, out);
        }
    }

    /// Nested directories of `from` whose path below `from` contains
    /// `fragment`. Plain substring match, in [`Self::list_nested_directories`]
    /// order.
    pub fn find_directories<'a>(fragment: &str, tree: &'a FsTree, from: &'a Node) -> Vec<&'a Node> {
        Self::list_nested_directories(tree, from)
            .into_par_iter()
            .filter(|directory| {
                let relative = directory
                    .path()
                    .strip_prefix(from.path())
                    .unwrap_or(directory.path());
                relative.to_string_lossy().contains(fragment)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::walker::{WalkOptions, Walker};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn create_test_tree(root: &Path) {
        for dir in [
            "src/module/nested",
            "src/sub",
            "docs",
            "target/debug",
        ] {
            fs::create_dir_all(root.join(dir)).unwrap();
        }
        fs::write(root.join("src/main.rs"), "fn main() {}").unwrap();
        fs::write(root.join("README.md"), "# readme").unwrap();
    }

    fn relative(root: &Path, nodes: &[&Node]) -> Vec<String> {
        nodes
            .iter()
            .map(|n| {
                n.path()
                    .strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[tokio::test]
    async fn test_list_nested_directories_preorder() {
        let temp = TempDir::new().unwrap();
        create_test_tree(temp.path());
        let tree = Walker::new(WalkOptions::default()).walk(temp.path()).await.unwrap();

        let dirs = DirectoryQuery::list_nested_directories(&tree, tree.root());
        assert_eq!(
            relative(temp.path(), &dirs),
            [
                "docs",
                "src",
                "src/module",
                "src/module/nested",
                "src/sub",
                "target",
                "target/debug",
            ]
        );
    }

    #[tokio::test]
    async fn test_list_nested_directories_of_file_is_empty() {
        let temp = TempDir::new().unwrap();
        create_test_tree(temp.path());
        let tree = Walker::new(WalkOptions::default()).walk(temp.path()).await.unwrap();

        let readme = tree.get(&temp.path().join("README.md")).unwrap();
        assert!(DirectoryQuery::list_nested_directories(&tree, readme).is_empty());
    }

    #[tokio::test]
    async fn test_find_directories_substring() {
        let temp = TempDir::new().unwrap();
        create_test_tree(temp.path());
        let tree = Walker::new(WalkOptions::default()).walk(temp.path()).await.unwrap();

        let found = DirectoryQuery::find_directories("sub", &tree, tree.root());
        assert_eq!(relative(temp.path(), &found), ["src/sub"]);

        let found = DirectoryQuery::find_directories("module", &tree, tree.root());
        assert_eq!(
            relative(temp.path(), &found),
            ["src/module", "src/module/nested"]
        );

        assert!(DirectoryQuery::find_directories("*", &tree, tree.root()).is_empty());
    }

    #[tokio::test]
    async fn test_find_directories_ignores_root_prefix() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("docs-site");
        create_test_tree(&root);
        let tree = Walker::new(WalkOptions::default()).walk(&root).await.unwrap();

        let found = DirectoryQuery::find_directories("docs", &tree, tree.root());
        assert_eq!(relative(&root, &found), ["docs"]);
    }
}
