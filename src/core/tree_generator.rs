//! Generates an ASCII representation of a walked tree.

use std::cmp::Ordering;

use super::node::Node;
use super::tree::FsTree;

/// A utility struct for generating an ASCII directory tree.
///
/// This struct is stateless and provides methods as associated functions.
pub struct TreeGenerator;

impl TreeGenerator {
    /// Renders `tree` starting at its root. Directories are listed before
    /// files at every level.
    pub fn generate_tree(tree: &FsTree) -> String {
        let root = tree.root();
        let mut result = String::new();

        if root.is_directory() {
            result.push_str(&format!("{}/\n", root.name()));
            Self::render_children(tree, root, &mut result, "");
        } else {
            result.push_str(&format!("{}\n", root.name()));
        }

        result
    }

    /// Renders the children of a directory node.
    fn render_children(tree: &FsTree, directory: &Node, result: &mut String, prefix: &str) {
        let mut sorted_children: Vec<&Node> = tree.children_of(directory).collect();
        sorted_children.sort_by(|a, b| match (a.is_directory(), b.is_directory()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => a.name().cmp(&b.name()),
        });

        for (i, node) in sorted_children.iter().enumerate() {
            let is_last = i == sorted_children.len() - 1;

            let connector = if is_last { "└── " } else { "├── " };
            let icon = if node.is_directory() { "📁 " } else { "📄 " };

            result.push_str(&format!("{prefix}{connector}{icon}{}\n", node.name()));

            if node.is_directory() {
                let new_prefix = if is_last {
                    format!("{prefix}    ")
                } else {
                    format!("{prefix}│   ")
                };

                Self::render_children(tree, node, result, &new_prefix);
            }
        }
    }
}
