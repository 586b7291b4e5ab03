//! CLI tool to build the article collection from Markdown sources.
//!
//! Usage:
//!   build-articles
//!   build-articles --content posts --output site/assets/articles.json --no-html
//!
//! Settings come from `blog.toml` and `BLOG_*` variables; flags win.

use std::path::PathBuf;
use std::process;

use blog_rs::{BuildConfig, build_collection};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Render `*.md` posts into the JSON collection the blog client loads.
#[derive(Parser)]
#[command(name = "build-articles")]
struct Cli {
    /// Config file (default: blog.toml in the working directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory of Markdown sources
    #[arg(long)]
    content: Option<PathBuf>,

    /// Article collection JSON to update
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory for standalone preview pages
    #[arg(long)]
    articles_dir: Option<PathBuf>,

    /// Skip the standalone preview pages
    #[arg(long)]
    no_html: bool,

    /// Log each built article
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match BuildConfig::load_from(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };
    if let Some(content) = cli.content {
        config.content_dir = content;
    }
    if let Some(output) = cli.output {
        config.output = output;
    }
    if let Some(articles_dir) = cli.articles_dir {
        config.articles_dir = articles_dir;
    }
    if cli.no_html {
        config.generate_html = false;
    }

    info!(
        content = %config.content_dir.display(),
        output = %config.output.display(),
        html = config.generate_html,
        "building articles"
    );

    match build_collection(&config) {
        Ok(report) => {
            for (path, reason) in &report.skipped {
                warn!("skipped {}: {reason}", path.display());
            }
            info!(
                "updated {} article(s), {} in {}",
                report.updated,
                report.total,
                config.output.display()
            );
            if config.generate_html {
                info!("preview pages in {}", config.articles_dir.display());
            }
        }
        Err(e) => {
            error!("build failed: {e}");
            process::exit(1);
        }
    }
}
