//! Site configuration management for `folio.toml`.
//!
//! # Sections
//!
//! | Section                | Purpose                                  |
//! |------------------------|------------------------------------------|
//! | `[base]`               | Site metadata (title, default author)    |
//! | `[build]`              | Content/output paths, drafts, prefix     |
//! | `[layout]`             | Base layout rule                         |
//! | `[[layout.breakpoints]]` | Responsive overrides by min width      |
//! | `[extra]`              | User-defined fields copied to manifest   |
//!
//! # Example
//!
//! ```toml
//! [base]
//! title = "Dev Notes"
//! author = "Jane"
//!
//! [build]
//! content = "content"
//! output = "public"
//!
//! [[layout.breakpoints]]
//! threshold = 800
//! nav = "horizontal"
//!
//! [extra]
//! analytics_id = "UA-12345"
//! ```

mod base;
mod build;
pub mod defaults;
mod error;
pub mod layout;

use base::BaseConfig;
use build::BuildConfig;
use error::ConfigError;
use layout::LayoutConfig;

use crate::cli::{Cli, Commands};
use anyhow::{Result, bail};
use educe::Educe;
use folio_core::{BuildOptions, ParseOptions, RouteResolver};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing folio.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Basic site information
    #[serde(default)]
    pub base: BaseConfig,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Responsive layout table
    #[serde(default)]
    pub layout: LayoutConfig,

    /// User-defined extra fields
    #[serde(default)]
    pub extra: toml::Table,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.build.root = Some(path.to_path_buf())
    }

    /// Options for one core build run.
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            parse: ParseOptions {
                default_author: self.base.author.clone(),
            },
            routes: RouteResolver::with_prefix(&self.build.path_prefix),
            include_drafts: self.build.drafts,
        }
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let base = cli
            .root
            .as_deref()
            .map(expand_tilde)
            .unwrap_or_else(|| self.get_root().to_owned());
        let root = match &cli.command {
            Commands::Init { name: Some(name) } => base.join(name),
            _ => base,
        };

        Self::update_option(&mut self.build.content, cli.content.as_ref());
        Self::update_option(&mut self.build.output, cli.output.as_ref());

        if let Some(args) = cli.build_args() {
            Self::update_option(&mut self.build.drafts, args.drafts.as_ref());
            Self::update_option(&mut self.build.path_prefix, args.path_prefix.as_ref());
        }

        self.update_path_with_root(&root, &cli.config);
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Resolve all paths against the root and make them absolute
    fn update_path_with_root(&mut self, root: &Path, config: &Path) {
        let root = Self::normalize_path(root);
        self.set_root(&root);

        self.config_path = Self::normalize_path(&root.join(config));
        self.build.content = Self::normalize_path(&root.join(expand_tilde(&self.build.content)));
        self.build.output = Self::normalize_path(&root.join(expand_tilde(&self.build.output)));
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration for the current command
    pub fn validate(&self, cli: &Cli) -> Result<()> {
        if !self.config_path.exists() {
            bail!("Config file not found");
        }

        self.validate_settings()?;

        if cli.build_args().is_some() && !self.build.content.is_dir() {
            bail!(ConfigError::Validation(format!(
                "[build.content] `{}` is not a directory",
                self.build.content.display()
            )));
        }

        Ok(())
    }

    /// Checks that do not touch the filesystem
    fn validate_settings(&self) -> Result<()> {
        let manifest = Path::new(&self.build.manifest);
        if self.build.manifest.is_empty()
            || manifest.file_name() != Some(manifest.as_os_str())
        {
            bail!(ConfigError::Validation(format!(
                "[build.manifest] must be a plain file name, got `{}`",
                self.build.manifest
            )));
        }

        if self.build.extensions.is_empty() {
            bail!(ConfigError::Validation(
                "[build.extensions] must have at least one element".into()
            ));
        }

        let duplicates = self.layout.duplicate_thresholds();
        if let Some(threshold) = duplicates.first() {
            bail!(ConfigError::Validation(format!(
                "[[layout.breakpoints]] threshold `{threshold}` is listed more than once"
            )));
        }

        Ok(())
    }
}

/// Expand a leading `~` to the home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(shellexpand::tilde(s).into_owned()),
        None => path.to_path_buf(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_from_str() {
        let config = SiteConfig::from_str(
            r#"
            [base]
            title = "My Blog"
            author = "Test Author"
        "#,
        )
        .unwrap();

        assert_eq!(config.base.title, "My Blog");
        assert_eq!(config.base.author.as_deref(), Some("Test Author"));
    }

    #[test]
    fn test_from_str_invalid_toml() {
        let result = SiteConfig::from_str("[base\ntitle = \"My Blog\"");
        let err = result.unwrap_err();
        assert!(err.downcast_ref::<ConfigError>().is_some());
    }

    #[test]
    fn test_from_str_unknown_section() {
        assert!(SiteConfig::from_str("[serve]\nport = 8080").is_err());
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = SiteConfig::from_path(Path::new("/nonexistent/folio.toml")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Io(..))
        ));
    }

    #[test]
    fn test_extra_fields() {
        let config = SiteConfig::from_str(
            r#"
            [extra]
            analytics_id = "UA-12345"
            show_comments = true
        "#,
        )
        .unwrap();

        assert_eq!(
            config.extra.get("analytics_id").and_then(|v| v.as_str()),
            Some("UA-12345")
        );
        assert_eq!(
            config.extra.get("show_comments").and_then(|v| v.as_bool()),
            Some(true)
        );
    }

    #[test]
    fn test_get_root_default() {
        let config = SiteConfig::default();
        assert_eq!(config.get_root(), Path::new("./"));
    }

    #[test]
    fn test_set_root() {
        let mut config = SiteConfig::default();
        config.set_root(Path::new("/custom/path"));
        assert_eq!(config.get_root(), Path::new("/custom/path"));
    }

    #[test]
    fn test_default_config_roundtrips_through_toml() {
        let text = toml::to_string_pretty(&SiteConfig::default()).unwrap();
        let parsed = SiteConfig::from_str(&text).unwrap();

        assert_eq!(parsed.base.title, "My Blog");
        assert_eq!(parsed.layout.breakpoints.len(), 3);
        assert_eq!(
            parsed.layout.to_breakpoints().unwrap(),
            folio_core::Breakpoints::default()
        );
    }

    #[test]
    fn test_update_with_cli_resolves_paths() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_str().unwrap();
        let cli = Cli::parse_from([
            "folio", "--root", root, "--output", "dist", "build", "--drafts", "--path-prefix", "blog",
        ]);

        let mut config = SiteConfig::default();
        config.update_with_cli(&cli);

        let root = dir.path().canonicalize().unwrap();
        assert_eq!(config.get_root(), root);
        assert_eq!(config.config_path, root.join("folio.toml"));
        assert_eq!(config.build.content, root.join("content"));
        assert_eq!(config.build.output, root.join("dist"));
        assert!(config.build.drafts);
        assert_eq!(config.build.path_prefix, "blog");
    }

    #[test]
    fn test_update_with_cli_init_name() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_str().unwrap();
        let cli = Cli::parse_from(["folio", "--root", root, "init", "site"]);

        let mut config = SiteConfig::default();
        config.update_with_cli(&cli);

        assert_eq!(
            config.get_root(),
            dir.path().canonicalize().unwrap().join("site")
        );
    }

    #[test]
    fn test_build_options_from_config() {
        let config = SiteConfig::from_str(
            r#"
            [base]
            author = "Jane"
            [build]
            path_prefix = "blog"
            drafts = true
        "#,
        )
        .unwrap();

        let options = config.build_options();
        assert_eq!(options.parse.default_author.as_deref(), Some("Jane"));
        assert!(options.include_drafts);
        assert_eq!(options.routes, RouteResolver::with_prefix("blog"));
    }

    #[test]
    fn test_validate_settings_manifest_name() {
        let mut config = SiteConfig::default();
        assert!(config.validate_settings().is_ok());

        config.build.manifest = "nested/manifest.json".into();
        assert!(config.validate_settings().is_err());

        config.build.manifest = String::new();
        assert!(config.validate_settings().is_err());
    }

    #[test]
    fn test_validate_settings_duplicate_thresholds() {
        let config = SiteConfig::from_str(
            r#"
            [[layout.breakpoints]]
            threshold = 800
            [[layout.breakpoints]]
            threshold = 800
        "#,
        )
        .unwrap();

        let err = config.validate_settings().unwrap_err().to_string();
        assert!(err.contains("800"));
    }

    #[test]
    fn test_validate_settings_empty_extensions() {
        let config = SiteConfig::from_str("[build]\nextensions = []").unwrap();
        assert!(config.validate_settings().is_err());
    }

    #[test]
    fn test_validate_missing_content_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("folio.toml"), "").unwrap();
        let cli = Cli::parse_from(["folio", "--root", dir.path().to_str().unwrap(), "check"]);

        let mut config = SiteConfig::default();
        config.update_with_cli(&cli);
        assert!(config.validate(&cli).is_err());

        fs::create_dir(dir.path().join("content")).unwrap();
        config.update_with_cli(&cli);
        assert!(config.validate(&cli).is_ok());
    }

    #[test]
    fn test_validate_layout_without_content_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("folio.toml"), "").unwrap();
        let cli = Cli::parse_from(["folio", "--root", dir.path().to_str().unwrap(), "layout", "800"]);

        let mut config = SiteConfig::default();
        config.update_with_cli(&cli);
        assert!(config.validate(&cli).is_ok());
    }
}
