//! Build error taxonomy.
//!
//! Per-document problems never abort a run on their own. They are gathered
//! into a [`BuildFailure`] that is reported once the whole input set has been
//! examined.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// A single problem found during a build.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// Required metadata is missing, or a recognized field has the wrong shape.
    #[error("{}: malformed document: {reason}", .path.display())]
    MalformedDocument { path: PathBuf, reason: String },

    /// The `date` field could not be parsed.
    #[error("{}: invalid date `{value}`", .path.display())]
    InvalidDate { path: PathBuf, value: String },

    /// Two or more documents resolve to the same route.
    #[error("route collision at `{route}`: {}", join_paths(.paths))]
    RouteCollision { route: String, paths: Vec<PathBuf> },

    /// The base layout rule leaves a property without a value.
    #[error("layout property `{property}` is not set by the base rule")]
    UnresolvedViewport { property: &'static str },
}

impl BuildError {
    pub(crate) fn malformed(path: &Path, reason: impl Into<String>) -> Self {
        Self::MalformedDocument {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Source paths this error refers to.
    pub fn paths(&self) -> &[PathBuf] {
        match self {
            Self::MalformedDocument { path, .. } | Self::InvalidDate { path, .. } => {
                std::slice::from_ref(path)
            }
            Self::RouteCollision { paths, .. } => paths,
            Self::UnresolvedViewport { .. } => &[],
        }
    }

    /// Short lowercase kind name, used as a log prefix.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MalformedDocument { .. } => "malformed",
            Self::InvalidDate { .. } => "date",
            Self::RouteCollision { .. } => "collision",
            Self::UnresolvedViewport { .. } => "layout",
        }
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Aggregated report of a failed build.
///
/// A build is all-or-nothing: when any error is present no manifest is
/// produced, but every document that passed on its own is still listed in
/// `valid`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("build failed with {} error(s), {} document(s) valid", .errors.len(), .valid.len())]
pub struct BuildFailure {
    pub errors: Vec<BuildError>,
    pub valid: Vec<PathBuf>,
}

impl BuildFailure {
    /// Whether `path` was reported as independently valid.
    pub fn is_valid(&self, path: &Path) -> bool {
        self.valid.iter().any(|p| p == path)
    }
}
