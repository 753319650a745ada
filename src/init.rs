//! Site initialization module.
//!
//! Creates a new site with the default configuration and a first post.

use crate::config::SiteConfig;
use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

/// Files to write ignore patterns to
const IGNORE_FILES: &[&str] = &[".gitignore", ".ignore"];

/// Sample post, relative to the content directory
const SAMPLE_POST: &str = "posts/hello-world.md";

/// Create a new site with default structure
pub fn new_site(config: &SiteConfig, has_name: bool) -> Result<()> {
    let root = config.get_root();

    // Without a name we init in place, so the directory must be empty
    if !has_name && !is_dir_empty(root)? {
        bail!(
            "Current directory is not empty. Use `folio init <SITE_NAME>` to create in a subdirectory."
        );
    }
    if has_name && root.exists() {
        bail!("Path `{}` already exists", root.display());
    }

    init_site_structure(config)?;
    init_default_config(&config.config_path)?;
    init_sample_post(config)?;

    let output = config.build.output.strip_prefix(root).unwrap_or(&config.build.output);
    init_ignored_files(root, &[&Path::new("/").join(output)])?;

    crate::log!("init"; "created site at {}", root.display());
    Ok(())
}

/// Check if a directory is completely empty
fn is_dir_empty(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    Ok(fs::read_dir(path)?.next().is_none())
}

/// Write default configuration to `path`
fn init_default_config(path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(&SiteConfig::default())?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

/// Create the content directory tree
fn init_site_structure(config: &SiteConfig) -> Result<()> {
    let posts = config.build.content.join("posts");
    fs::create_dir_all(&posts).with_context(|| format!("Failed to create {}", posts.display()))
}

/// Write a first post dated today
fn init_sample_post(config: &SiteConfig) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let content = format!(
        "---\n\
         title: Hello, World\n\
         author: {author}\n\
         date: {today}\n\
         category: notes\n\
         tags: [welcome]\n\
         excerpt: The first post on this blog.\n\
         ---\n\
         \n\
         Edit or delete this file, then run `folio build`.\n",
        author = config.base.author.as_deref().unwrap_or("Anonymous"),
        today = today.format("%Y-%m-%d"),
    );
    fs::write(config.build.content.join(SAMPLE_POST), content)?;
    Ok(())
}

/// Initialize .gitignore and .ignore files with specified paths
fn init_ignored_files(root: &Path, paths: &[&Path]) -> Result<()> {
    let content = paths
        .iter()
        .filter_map(|p| p.to_str())
        .collect::<Vec<_>>()
        .join("\n");

    for filename in IGNORE_FILES {
        let path = root.join(filename);
        if !path.exists() {
            fs::write(&path, &content)?;
        }
    }

    Ok(())
}
