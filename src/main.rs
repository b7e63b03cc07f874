use ai_transformer::config::{self, AppConfig};
use ai_transformer::core::{ContextBuilder, LoadingPolicy, TreeGenerator, Walker};
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// Walk a file or folder the way the desktop app does and print the result.
#[derive(Debug, Parser)]
#[command(name = "ai-transformer", version, about)]
struct Cli {
    /// File or directory to open.
    path: PathBuf,

    /// Read every file during the walk instead of on demand.
    #[arg(long)]
    eager: bool,

    /// Print the assembled LLM context instead of the tree.
    #[arg(long)]
    context: bool,

    /// Name of a file holding ignore rules (repeatable). Replaces the
    /// configured names.
    #[arg(long = "ignore-file", value_name = "NAME")]
    ignore_files: Vec<String>,

    /// Extra ignore rule applied to the whole tree (repeatable).
    #[arg(long = "ignore", value_name = "PATTERN")]
    ignore_patterns: Vec<String>,

    /// Directory holding config.json, instead of the platform default.
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut app_config = config::settings::load_config(cli.config_dir.as_deref()).unwrap_or_else(|e| {
        tracing::warn!("Using default config: {}", e);
        AppConfig::default()
    });

    let mut options = app_config.walk_options();
    if cli.eager {
        options.loading = LoadingPolicy::Eager;
    }
    if !cli.ignore_files.is_empty() {
        options.ignore_rule_filenames = cli.ignore_files.iter().cloned().collect();
    }
    for pattern in &cli.ignore_patterns {
        options.ignore_patterns.push('\n');
        options.ignore_patterns.push_str(pattern);
    }

    let tree = Walker::new(options).walk(&cli.path).await?;

    if cli.context {
        let document = ContextBuilder::new(app_config.context).build_all(&tree).await?;
        print!("{}", document.content);
    } else {
        print!("{}", TreeGenerator::generate_tree(&tree));
    }

    for omitted in tree.omitted() {
        eprintln!("omitted: {}", omitted.display());
    }

    app_config.last_path = Some(tree.root().path().to_path_buf());
    if let Err(e) = config::settings::save_config(&app_config, cli.config_dir.as_deref()) {
        tracing::error!("Failed to save config: {}", e);
    }

    Ok(())
}
