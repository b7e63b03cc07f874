//! Integration tests for the walk → query → context pipeline, driven only
//! through the public API the desktop front-end uses.

use ai_transformer::config::AppConfig;
use ai_transformer::core::{
    ContextBuilder, ContextOptions, DirectoryQuery, FsTree, LoadingPolicy, Walker,
};
use ai_transformer::utils::test_helpers::{setup_test_logging, write_file};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Contains the test infrastructure.
mod helpers {
    use super::*;

    /// `TestHarness` owns an isolated project directory for one test case.
    pub struct TestHarness {
        pub root_path: PathBuf,
        _temp_dir: TempDir,
    }

    impl TestHarness {
        pub fn new() -> Self {
            setup_test_logging();
            let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
            let root_path = temp_dir.path().join("project");
            std::fs::create_dir_all(&root_path).expect("Failed to create project dir");

            Self {
                root_path,
                _temp_dir: temp_dir,
            }
        }

        pub fn create_file(&self, path: &str, content: &str) -> PathBuf {
            write_file(&self.root_path, path, content)
        }

        /// Sets up a standard project structure for testing.
        pub fn setup_basic_project(&self) {
            self.create_file("src/main.rs", "fn main() {}");
            self.create_file("src/lib.rs", "// Library code");
            self.create_file("README.md", "# My Project");
            self.create_file("Cargo.toml", "[package]\nname = \"test\"");
            self.create_file("docs/guide.txt", "User guide content");
            self.create_file("target/debug/app", "binary");
            self.create_file(".gitignore", "target/\n");
        }

        pub async fn walk(&self, config: &AppConfig) -> FsTree {
            Walker::new(config.walk_options())
                .walk(&self.root_path)
                .await
                .expect("Walk failed")
        }

        pub fn relative_paths(&self, tree: &FsTree) -> Vec<String> {
            tree.preorder()
                .iter()
                .skip(1)
                .map(|node| relative(&self.root_path, node.path()))
                .collect()
        }
    }

    pub fn relative(root: &Path, path: &Path) -> String {
        path.strip_prefix(root)
            .expect("Path outside root")
            .to_string_lossy()
            .replace('\\', "/")
    }
}

#[tokio::test]
async fn test_lazy_walk_then_materialize_on_demand() {
    // --- ARRANGE ---
    let harness = helpers::TestHarness::new();
    harness.setup_basic_project();

    // --- ACT ---
    let tree = harness.walk(&AppConfig::default()).await;

    // --- ASSERT ---
    assert_eq!(
        harness.relative_paths(&tree),
        [
            "Cargo.toml",
            "README.md",
            "docs",
            "docs/guide.txt",
            "src",
            "src/lib.rs",
            "src/main.rs",
        ]
    );
    assert!(tree.omitted().is_empty());

    let main_rs = harness.root_path.join("src/main.rs");
    assert!(tree.get(&main_rs).unwrap().is_lazy());

    let tree = tree.with_materialized(&main_rs).await.unwrap();
    let loaded = tree.get(&main_rs).unwrap();
    assert!(!loaded.is_lazy());
    assert_eq!(loaded.content(), "fn main() {}");
}

#[tokio::test]
async fn test_materialize_after_delete_reports_read_failure() {
    let harness = helpers::TestHarness::new();
    harness.setup_basic_project();
    let tree = harness.walk(&AppConfig::default()).await;

    let readme = harness.root_path.join("README.md");
    std::fs::remove_file(&readme).unwrap();

    let err = tree.materialize(&readme).await.unwrap_err();
    assert!(err.is_read_failure(), "unexpected error: {err}");
}

#[tokio::test]
async fn test_config_patterns_and_eager_loading() {
    let harness = helpers::TestHarness::new();
    harness.setup_basic_project();

    let config = AppConfig {
        loading: LoadingPolicy::Eager,
        ignore_patterns: "docs/\nCargo.toml".to_string(),
        ..AppConfig::default()
    };
    let tree = harness.walk(&config).await;

    assert_eq!(
        harness.relative_paths(&tree),
        ["README.md", "src", "src/lib.rs", "src/main.rs"]
    );
    assert!(tree.preorder().iter().filter(|n| n.is_file()).all(|n| !n.is_lazy()));
}

#[tokio::test]
async fn test_find_directories_in_nested_project() {
    let harness = helpers::TestHarness::new();
    harness.create_file("a/sub/file.txt", "x");
    harness.create_file("b/other.txt", "y");

    let tree = harness.walk(&AppConfig::default()).await;
    let found = DirectoryQuery::find_directories("sub", &tree, tree.root());

    assert_eq!(found.len(), 1);
    assert_eq!(helpers::relative(&harness.root_path, found[0].path()), "a/sub");

    let file = tree.get(&harness.root_path.join("a/sub/file.txt")).unwrap();
    assert_eq!(tree.parent_of(file), Some(found[0]));
}

#[tokio::test]
async fn test_walk_is_deterministic() {
    let harness = helpers::TestHarness::new();
    for i in (0..40).rev() {
        harness.create_file(&format!("dir{}/file{:02}.txt", i % 4, i), "x");
    }

    let config = AppConfig::default();
    let first = harness.walk(&config).await;
    let second = harness.walk(&config).await;

    assert!(first.same_shape(&second));
    assert_eq!(harness.relative_paths(&first), harness.relative_paths(&second));

    let names: Vec<_> = first
        .children_of(first.root())
        .map(|n| n.name().into_owned())
        .collect();
    assert_eq!(names, ["dir0", "dir1", "dir2", "dir3"]);
}

#[tokio::test]
async fn test_context_from_lazy_tree() {
    let harness = helpers::TestHarness::new();
    harness.setup_basic_project();
    let tree = harness.walk(&AppConfig::default()).await;

    let builder = ContextBuilder::new(ContextOptions {
        include_tree: true,
        use_relative_paths: true,
    });
    let doc = builder
        .build(&tree, &[harness.root_path.join("src/main.rs")])
        .await
        .unwrap();

    assert_eq!(doc.file_count, 1);
    assert!(doc.content.contains("fn main() {}\n"));
    assert!(doc.content.contains("project/\n"));
    assert!(!doc.content.contains("target"));
}
