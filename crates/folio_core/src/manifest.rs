//! The site manifest handed to an external renderer.
//!
//! # JSON Shape
//!
//! ```json
//! {
//!   "entries": [
//!     {
//!       "route": "/javascript/javascript-fundamentals",
//!       "collection": "javascript",
//!       "source": "posts/js.md",
//!       "meta": { "title": "...", "author": "...", "date": "2025-01-12", "toc": false },
//!       "layout": { "breakpoint": null, "container_width": "100%", ... }
//!     }
//!   ],
//!   "collections": { "javascript": ["/javascript/javascript-fundamentals"] },
//!   "tags": { "basics": ["/javascript/javascript-fundamentals"] }
//! }
//! ```
//!
//! Bodies stay out of the JSON; the renderer gets them through
//! [`Manifest::render_context`].
//!
//! # Default Layout
//!
//! Each entry's `layout` is the base state, i.e. what applies below the
//! smallest breakpoint. With the built-in table that is the sub-500px
//! mobile layout (`"breakpoint": null`, 100% width, collapsed nav, site
//! title hidden, one column). Wider viewports need
//! [`Manifest::render_context`] with the actual width.

use crate::{
    document::DocumentMeta,
    layout::{Breakpoints, LayoutState},
    route::Route,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// One resolved document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManifestEntry {
    pub route: Route,
    pub collection: String,
    /// Source path with `/` separators.
    pub source: String,
    pub meta: DocumentMeta,
    /// Base layout, the state below the smallest breakpoint.
    pub layout: LayoutState,
    #[serde(skip)]
    pub body: String,
}

/// Everything the renderer needs for one route at one viewport width.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext<'a> {
    pub route: &'a Route,
    pub collection: &'a str,
    pub meta: &'a DocumentMeta,
    pub body: &'a str,
    pub layout: LayoutState,
}

/// Ordered result of a successful build.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Manifest {
    /// Entries grouped by collection name, newest first within a collection.
    pub entries: Vec<ManifestEntry>,
    /// Collection name to member routes.
    pub collections: BTreeMap<String, Vec<Route>>,
    /// Tag to routes.
    pub tags: BTreeMap<String, Vec<Route>>,
}

impl Manifest {
    pub fn iter(&self) -> impl Iterator<Item = &ManifestEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, route: &str) -> Option<&ManifestEntry> {
        self.entries.iter().find(|e| e.route.as_str() == route)
    }

    /// Render context for `route`, with the layout resolved for `viewport`.
    pub fn render_context(
        &self,
        route: &str,
        viewport: u32,
        breakpoints: &Breakpoints,
    ) -> Option<RenderContext<'_>> {
        self.get(route).map(|entry| RenderContext {
            route: &entry.route,
            collection: &entry.collection,
            meta: &entry.meta,
            body: &entry.body,
            layout: breakpoints.resolve(viewport),
        })
    }

    /// Pretty JSON; identical input always gives identical bytes.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
