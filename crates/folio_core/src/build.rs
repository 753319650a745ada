//! Build orchestration: raw sources in, manifest or aggregated failure out.
//!
//! ```text
//! build()
//!     │
//!     ├── parse_all()        Document::parse_with per source
//!     │                      (parallel with the `parallel` feature)
//!     │        ── barrier: indexing needs the complete set ──
//!     ├── index()            group by collection, newest first
//!     ├── resolve_all()      routes + global collision check
//!     │
//!     └── errors? ──► BuildFailure { errors, valid }
//!                 └─► Manifest (base layout attached to every entry)
//! ```

use crate::{
    collection::{index, index_tags},
    document::{Document, ParseOptions},
    error::{BuildError, BuildFailure},
    layout::Breakpoints,
    manifest::{Manifest, ManifestEntry},
    route::{Route, RouteResolver, resolve_all},
};
use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
};

/// Raw content unit as read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// Identity of the document, usually relative to the content root.
    pub path: PathBuf,
    pub raw: String,
}

impl SourceDocument {
    pub fn new(path: impl Into<PathBuf>, raw: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            raw: raw.into(),
        }
    }
}

/// Knobs for a build run.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub parse: ParseOptions,
    pub routes: RouteResolver,
    /// Keep documents marked `draft: true`.
    pub include_drafts: bool,
}

/// Build with default options.
pub fn build(sources: &[SourceDocument], breakpoints: &Breakpoints) -> Result<Manifest, BuildFailure> {
    build_with(sources, breakpoints, &BuildOptions::default())
}

/// Run one build over a fixed input set.
///
/// # Errors
///
/// Returns every parse, slug and collision error of the run together, plus
/// the documents that were valid on their own. No partial manifest is
/// returned.
pub fn build_with(
    sources: &[SourceDocument],
    breakpoints: &Breakpoints,
    options: &BuildOptions,
) -> Result<Manifest, BuildFailure> {
    let mut errors = shared_identities(sources);
    let mut documents = Vec::with_capacity(sources.len());
    for result in parse_all(sources, &options.parse) {
        match result {
            Ok(doc) => documents.push(doc),
            Err(e) => errors.push(e),
        }
    }

    let published: Vec<&Document> = documents
        .iter()
        .filter(|d| options.include_drafts || !d.meta().draft)
        .collect();
    let collections = index(published.iter().copied());

    let routed = match resolve_all(&collections, &options.routes) {
        Ok(routed) => routed,
        Err(route_errors) => {
            errors.extend(route_errors);
            Vec::new()
        }
    };

    if !errors.is_empty() {
        return Err(failure(errors, &documents));
    }

    let routes: BTreeMap<&Path, &Route> = routed
        .iter()
        .map(|r| (r.document.source(), &r.route))
        .collect();

    let mut manifest = Manifest::default();
    for collection in collections.iter() {
        manifest.collections.insert(
            collection.name().to_owned(),
            collection
                .documents()
                .iter()
                .map(|d| routes[d.source()].clone())
                .collect(),
        );
    }
    for (tag, docs) in index_tags(published.iter().copied()) {
        manifest
            .tags
            .insert(tag, docs.iter().map(|d| routes[d.source()].clone()).collect());
    }

    let layout = breakpoints.base().clone();
    manifest.entries = routed
        .into_iter()
        .map(|r| ManifestEntry {
            route: r.route,
            collection: r.collection.to_owned(),
            source: r.document.source().to_string_lossy().replace('\\', "/"),
            meta: r.document.meta().clone(),
            layout: layout.clone(),
            body: r.document.body().to_owned(),
        })
        .collect();

    Ok(manifest)
}

/// Parse every source independently, preserving input order.
#[cfg(feature = "parallel")]
fn parse_all(sources: &[SourceDocument], options: &ParseOptions) -> Vec<Result<Document, BuildError>> {
    use rayon::prelude::*;
    sources
        .par_iter()
        .map(|s| Document::parse_with(&s.path, &s.raw, options))
        .collect()
}

/// Parse every source independently, preserving input order.
#[cfg(not(feature = "parallel"))]
fn parse_all(sources: &[SourceDocument], options: &ParseOptions) -> Vec<Result<Document, BuildError>> {
    sources
        .iter()
        .map(|s| Document::parse_with(&s.path, &s.raw, options))
        .collect()
}

/// One error per source path claimed by more than one input.
fn shared_identities(sources: &[SourceDocument]) -> Vec<BuildError> {
    let mut counts: BTreeMap<&Path, usize> = BTreeMap::new();
    for source in sources {
        *counts.entry(source.path.as_path()).or_default() += 1;
    }
    counts
        .into_iter()
        .filter(|&(_, count)| count > 1)
        .map(|(path, count)| {
            BuildError::malformed(path, format!("source path is shared by {count} documents"))
        })
        .collect()
}

/// Sort errors into a stable order and list the documents no error touches.
fn failure(mut errors: Vec<BuildError>, documents: &[Document]) -> BuildFailure {
    errors.sort_by(|a, b| {
        let rank = |e: &BuildError| matches!(e, BuildError::RouteCollision { .. });
        rank(a)
            .cmp(&rank(b))
            .then_with(|| a.paths().cmp(b.paths()))
            .then_with(|| a.to_string().cmp(&b.to_string()))
    });

    let implicated: BTreeSet<&Path> = errors
        .iter()
        .flat_map(|e| e.paths().iter().map(PathBuf::as_path))
        .collect();
    let mut valid: Vec<PathBuf> = documents
        .iter()
        .map(Document::source)
        .filter(|p| !implicated.contains(p))
        .map(Path::to_path_buf)
        .collect();
    valid.sort();

    BuildFailure { errors, valid }
}
