//! `[build]` section configuration.
//!
//! Content location, output location and what gets picked up.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// `[build]` section in folio.toml - build pipeline configuration.
///
/// # Example
/// ```toml
/// [build]
/// content = "content"          # Markdown sources
/// output = "public"            # Where the manifest goes
/// manifest = "manifest.json"
/// path_prefix = "blog"         # Routes become /blog/<collection>/<slug>
/// drafts = false
/// extensions = ["md", "markdown"]
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Project root directory (usually set via CLI `--root`).
    #[serde(default = "defaults::build::root", skip_serializing)]
    #[educe(Default = defaults::build::root())]
    pub root: Option<PathBuf>,

    /// Content source directory.
    #[serde(default = "defaults::build::content")]
    #[educe(Default = defaults::build::content())]
    pub content: PathBuf,

    /// Output directory.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// Manifest file name inside `output`.
    #[serde(default = "defaults::build::manifest")]
    #[educe(Default = defaults::build::manifest())]
    pub manifest: String,

    /// URL path prefix for subdirectory deployment (e.g., "blog" → `/blog/...`).
    #[serde(default = "defaults::build::path_prefix")]
    #[educe(Default = defaults::build::path_prefix())]
    pub path_prefix: String,

    /// Include documents marked `draft: true`.
    #[serde(default)]
    pub drafts: bool,

    /// File extensions treated as documents, without the dot.
    #[serde(default = "defaults::build::extensions")]
    #[educe(Default = defaults::build::extensions())]
    pub extensions: Vec<String>,
}

impl BuildConfig {
    /// Full path of the manifest file.
    pub fn manifest_path(&self) -> PathBuf {
        self.output.join(&self.manifest)
    }

    /// Whether `path` has one of the configured extensions (case-insensitive).
    pub fn is_document(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;
    use std::path::{Path, PathBuf};

    #[test]
    fn test_build_config_defaults() {
        let config: SiteConfig = toml::from_str("").unwrap();

        assert_eq!(config.build.content, PathBuf::from("content"));
        assert_eq!(config.build.output, PathBuf::from("public"));
        assert_eq!(config.build.manifest, "manifest.json");
        assert_eq!(config.build.path_prefix, "");
        assert!(!config.build.drafts);
        assert_eq!(config.build.extensions, vec!["md", "markdown"]);
    }

    #[test]
    fn test_build_config_custom() {
        let config = r#"
            [build]
            content = "posts"
            output = "dist"
            manifest = "site.json"
            path_prefix = "blog"
            drafts = true
            extensions = ["md"]
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.build.content, PathBuf::from("posts"));
        assert_eq!(config.build.manifest_path(), PathBuf::from("dist/site.json"));
        assert_eq!(config.build.path_prefix, "blog");
        assert!(config.build.drafts);
        assert_eq!(config.build.extensions, vec!["md"]);
    }

    #[test]
    fn test_is_document() {
        let config = SiteConfig::default();

        assert!(config.build.is_document(Path::new("posts/a.md")));
        assert!(config.build.is_document(Path::new("posts/a.MD")));
        assert!(config.build.is_document(Path::new("b.markdown")));
        assert!(!config.build.is_document(Path::new("image.png")));
        assert!(!config.build.is_document(Path::new("README")));
    }

    #[test]
    fn test_build_config_unknown_field() {
        let result: Result<SiteConfig, _> = toml::from_str("[build]\nminify = true");
        assert!(result.is_err());
    }
}
