//! Route resolution.
//!
//! A route is derived, never stored in source: `/<collection>/<title>`, each
//! part slugified. A document's `slug` field replaces the title part.
//!
//! | Collection   | Title / slug                 | Route                                 |
//! |--------------|------------------------------|---------------------------------------|
//! | `javascript` | `JavaScript Fundamentals`    | `/javascript/javascript-fundamentals` |
//! | `C++ Notes`  | `Templates: The Good Parts!` | `/c-notes/templates-the-good-parts`   |
//! | `rust`       | slug `intro`                 | `/rust/intro`                         |
//!
//! Routes share one flat URL space, so collisions are detected across the
//! whole site rather than per collection.

use crate::{collection::CollectionIndex, document::Document, error::BuildError};
use serde::Serialize;
use std::{collections::BTreeMap, fmt};

/// Lowercase ASCII slug. Runs of anything that is not a letter or digit
/// become a single hyphen; leading and trailing hyphens are dropped.
/// Non-ASCII text is transliterated first.
pub fn slugify(text: &str) -> String {
    let ascii = deunicode::deunicode(text);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_hyphen = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Canonical output path of a document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Route(String);

impl Route {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Route {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Maps `(collection, document)` to a [`Route`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteResolver {
    /// Slugified prefix segments, e.g. `["blog"]` for `/blog/...`.
    prefix: Vec<String>,
}

impl RouteResolver {
    /// Resolver that places every route under `prefix` (`"blog"`, `"/a/b/"`).
    pub fn with_prefix(prefix: &str) -> Self {
        let prefix = prefix
            .split('/')
            .map(slugify)
            .filter(|s| !s.is_empty())
            .collect();
        Self { prefix }
    }

    /// Resolve the route of `document` inside `collection`.
    ///
    /// # Errors
    ///
    /// [`BuildError::MalformedDocument`] when the collection name or the
    /// title (or slug override) has no characters left after slugification.
    pub fn resolve(&self, collection: &str, document: &Document) -> Result<Route, BuildError> {
        let collection_slug = slugify(collection);
        if collection_slug.is_empty() {
            return Err(BuildError::malformed(
                document.source(),
                format!("collection `{collection}` produces an empty slug"),
            ));
        }

        let meta = document.meta();
        let name = meta.slug.as_deref().unwrap_or(&meta.title);
        let document_slug = slugify(name);
        if document_slug.is_empty() {
            return Err(BuildError::malformed(
                document.source(),
                format!("`{name}` produces an empty slug"),
            ));
        }

        let mut path = String::new();
        for segment in self.prefix.iter().chain([&collection_slug, &document_slug]) {
            path.push('/');
            path.push_str(segment);
        }
        Ok(Route(path))
    }
}

/// Resolve a route with no prefix.
pub fn route(collection: &str, document: &Document) -> Result<Route, BuildError> {
    RouteResolver::default().resolve(collection, document)
}

/// A document paired with its collection and route.
#[derive(Debug, Clone)]
pub struct RoutedDocument<'a> {
    pub route: Route,
    pub collection: &'a str,
    pub document: &'a Document,
}

/// Resolve routes for every indexed document, in index order.
///
/// All problems are collected: slug failures for individual documents plus
/// one [`BuildError::RouteCollision`] per contested route, listing every
/// document that claims it.
pub fn resolve_all<'a>(
    index: &'a CollectionIndex<'a>,
    resolver: &RouteResolver,
) -> Result<Vec<RoutedDocument<'a>>, Vec<BuildError>> {
    let mut errors = Vec::new();
    let mut routed = Vec::with_capacity(index.document_count());
    let mut claims: BTreeMap<Route, Vec<&Document>> = BTreeMap::new();

    for collection in index.iter() {
        for &document in collection.documents() {
            match resolver.resolve(collection.name(), document) {
                Ok(route) => {
                    claims.entry(route.clone()).or_default().push(document);
                    routed.push(RoutedDocument {
                        route,
                        collection: collection.name(),
                        document,
                    });
                }
                Err(e) => errors.push(e),
            }
        }
    }

    errors.extend(
        claims
            .into_iter()
            .filter(|(_, docs)| docs.len() > 1)
            .map(|(route, docs)| {
                let mut paths: Vec<_> = docs.iter().map(|d| d.source().to_path_buf()).collect();
                paths.sort();
                BuildError::RouteCollision {
                    route: route.0,
                    paths,
                }
            }),
    );

    if errors.is_empty() {
        Ok(routed)
    } else {
        Err(errors)
    }
}
