pub mod context;
pub mod error;
pub mod ignore;
pub mod node;
pub mod query;
pub mod tree;
pub mod tree_generator;
pub mod walker;

pub use context::{ContextBuilder, ContextDocument, ContextOptions};
pub use error::{CoreError, CoreResult};
pub use ignore::IgnoreSet;
pub use node::{FileItem, Node, NodeKind};
pub use query::DirectoryQuery;
pub use tree::FsTree;
pub use tree_generator::TreeGenerator;
pub use walker::{LoadingPolicy, WalkOptions, Walker};
