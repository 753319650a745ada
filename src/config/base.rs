//! `[base]` section configuration.
//!
//! Site-wide metadata copied into the manifest.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[base]` section in folio.toml - basic site metadata.
///
/// # Example
/// ```toml
/// [base]
/// title = "My Blog"
/// description = "Notes on JavaScript and Python"
/// author = "Jane"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BaseConfig {
    /// Site title.
    #[serde(default = "defaults::base::title")]
    #[educe(Default = defaults::base::title())]
    pub title: String,

    /// Site description.
    #[serde(default)]
    pub description: String,

    /// Author used for documents whose front matter has none.
    #[serde(default = "defaults::base::author", skip_serializing_if = "Option::is_none")]
    #[educe(Default = defaults::base::author())]
    pub author: Option<String>,
}
