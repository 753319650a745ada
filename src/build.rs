//! Build, check and layout commands.
//!
//! # Architecture
//!
//! ```text
//! build_site()
//!     │
//!     ├── collect_documents()  walk content dir, filter by extension
//!     ├── read_sources()       parallel read ──► SourceDocument[]
//!     ├── to_breakpoints()     [layout] ──► Breakpoints
//!     │
//!     └── folio_core::build_with()
//!             │
//!             ├── Ok(manifest) ──► write_manifest()   (build only)
//!             └── Err(failure) ──► report_failure(), nothing written
//! ```

use crate::{
    config::SiteConfig,
    log,
    logger::ReadProgress,
    source::{collect_documents, read_sources},
};
use anyhow::{Context, Result, bail};
use folio_core::{BuildFailure, Manifest, build_with};
use serde::Serialize;
use std::{fs, path::PathBuf};

/// Manifest file layout: site metadata next to the core manifest.
#[derive(Serialize)]
struct SiteManifest<'a> {
    site: SiteInfo<'a>,
    #[serde(flatten)]
    manifest: &'a Manifest,
}

#[derive(Serialize)]
struct SiteInfo<'a> {
    title: &'a str,
    description: &'a str,
    extra: &'a toml::Table,
}

/// Load all content and run one build.
///
/// On failure every error is logged and the run bails; nothing is written.
pub fn build_site(config: &SiteConfig) -> Result<Manifest> {
    let content = &config.build.content;
    let paths = collect_documents(config)?;
    log!("build"; "loading {} documents from {}", paths.len(), content.display());

    let progress = ReadProgress::start(paths.len());
    let sources = read_sources(content, &paths, || {
        if let Some(progress) = &progress {
            progress.tick();
        }
    })?;
    drop(progress);

    let breakpoints = config.layout.to_breakpoints()?;

    match build_with(&sources, &breakpoints, &config.build_options()) {
        Ok(manifest) => {
            log!(
                "build";
                "{} routes in {} collections",
                manifest.len(),
                manifest.collections.len()
            );
            Ok(manifest)
        }
        Err(failure) => {
            report_failure(&failure);
            bail!(failure)
        }
    }
}

/// Write the manifest as pretty JSON, returning the file path.
pub fn write_manifest(config: &SiteConfig, manifest: &Manifest) -> Result<PathBuf> {
    let output = &config.build.output;
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    let site = SiteManifest {
        site: SiteInfo {
            title: &config.base.title,
            description: &config.base.description,
            extra: &config.extra,
        },
        manifest,
    };
    let json = serde_json::to_string_pretty(&site)?;

    let path = config.build.manifest_path();
    fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    log!("done"; "wrote {}", path.display());
    Ok(path)
}

/// Run a build without writing anything.
pub fn check_site(config: &SiteConfig) -> Result<()> {
    let manifest = build_site(config)?;
    for entry in manifest.iter() {
        log!("check"; "{} -> {}", entry.source, entry.route);
    }
    log!("check"; "{} documents ok", manifest.len());
    Ok(())
}

/// Print the layout resolved for `width` as JSON.
pub fn print_layout(config: &SiteConfig, width: u32) -> Result<()> {
    let breakpoints = config.layout.to_breakpoints()?;
    let state = breakpoints.resolve(width);
    match state.breakpoint {
        Some(threshold) => log!("layout"; "{width}px uses the {threshold}px rule"),
        None => log!("layout"; "{width}px uses the base rule"),
    }
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}

fn report_failure(failure: &BuildFailure) {
    for error in &failure.errors {
        log!("error"; "[{}] {error}", error.kind());
    }
    for path in &failure.valid {
        log!("valid"; "{}", path.display());
    }
    log!("error"; "{failure}");
}
