//! Content-to-page model for static blog builds.
//!
//! Turns a loose set of Markdown documents with front matter into an ordered
//! manifest of routes, collections and default layouts for an external
//! renderer. Nothing here touches the filesystem.
//!
//! ```text
//! SourceDocument[] ──► Document ──► CollectionIndex ──► Route ──┐
//!                                                               ├──► Manifest
//!                      Breakpoints ──► LayoutState (base) ──────┘
//! ```
//!
//! # Example
//!
//! ```
//! use folio_core::{Breakpoints, SourceDocument, build};
//!
//! let sources = [SourceDocument::new(
//!     "posts/js.md",
//!     "---\ntitle: JavaScript Fundamentals\nauthor: Jane\ndate: 2025-01-12\ncategory: javascript\n---\nHi.\n",
//! )];
//! let manifest = build(&sources, &Breakpoints::default()).unwrap();
//! assert!(manifest.get("/javascript/javascript-fundamentals").is_some());
//! ```

pub mod build;
pub mod collection;
pub mod date;
pub mod document;
pub mod error;
pub mod layout;
pub mod manifest;
pub mod route;

pub use build::{BuildOptions, SourceDocument, build, build_with};
pub use collection::{Collection, CollectionIndex, TagIndex, index, index_tags};
pub use date::PublishDate;
pub use document::{Document, DocumentMeta, FrontMatterFormat, ParseOptions, UNCATEGORIZED};
pub use error::{BuildError, BuildFailure};
pub use layout::{
    BreakpointRule, Breakpoints, ContainerWidth, LayoutProperties, LayoutState, NavArrangement,
    resolve,
};
pub use manifest::{Manifest, ManifestEntry, RenderContext};
pub use route::{Route, RouteResolver, route, slugify};
