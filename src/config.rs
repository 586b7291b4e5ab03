//! Configuration for the `build-articles` tool.
//!
//! Loaded with figment from, in order of precedence (highest first):
//! 1. Environment variables prefixed with `BLOG_` (e.g. `BLOG_CONTENT_DIR`)
//! 2. A TOML file, `blog.toml` in the working directory by default
//! 3. Built-in defaults
//!
//! Command-line flags are applied on top by the binary.

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::error::{BlogError, Result};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "blog.toml";

/// Prefix for configuration environment variables.
pub const ENV_PREFIX: &str = "BLOG_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Directory scanned for `*.md` sources.
    pub content_dir: PathBuf,
    /// Article collection JSON written for the client.
    pub output: PathBuf,
    /// Directory for standalone `<slug>.html` preview pages.
    pub articles_dir: PathBuf,
    /// Write the preview pages.
    pub generate_html: bool,
    /// Category for sources that do not name one.
    pub default_category: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content"),
            output: PathBuf::from("assets/articles.json"),
            articles_dir: PathBuf::from("assets/articles"),
            generate_html: true,
            default_category: "Showcase".to_string(),
        }
    }
}

impl BuildConfig {
    /// Load defaults, `config_path` (or `blog.toml`) and `BLOG_*` variables.
    ///
    /// A missing file is not an error.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(|| Path::new(CONFIG_FILE_NAME));

        let config: BuildConfig = Figment::new()
            .merge(Serialized::defaults(BuildConfig::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.content_dir.as_os_str().is_empty() {
            return Err(BlogError::Config("content_dir must not be empty".into()));
        }
        if self.output.as_os_str().is_empty() {
            return Err(BlogError::Config("output must not be empty".into()));
        }
        if self.generate_html && self.articles_dir.as_os_str().is_empty() {
            return Err(BlogError::Config(
                "articles_dir must be set when generate_html is on".into(),
            ));
        }
        Ok(())
    }
}
