//! `[layout]` section configuration.
//!
//! The responsive layout table: a base rule and any number of breakpoints.
//! Each breakpoint applies from its `threshold` (in pixels) upward until the
//! next wider breakpoint takes over.

use super::defaults;
use educe::Educe;
use folio_core::{
    BreakpointRule, Breakpoints, BuildError, ContainerWidth, LayoutProperties, NavArrangement,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// `[layout]` section in folio.toml.
///
/// # Example
/// ```toml
/// [layout.base]
/// container_width = "100%"
/// nav = "collapsed"
/// hidden = ["site-title"]
/// columns = 1
///
/// [[layout.breakpoints]]
/// threshold = 1024
/// container_width = "960px"
/// nav = "horizontal"
/// hidden = []
/// columns = 2
/// ```
///
/// Properties missing from `[layout.base]` fall back to the built-in base.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct LayoutConfig {
    /// Layout used below the smallest threshold.
    #[serde(default = "defaults::layout::base")]
    #[educe(Default = defaults::layout::base())]
    pub base: LayoutProperties,

    #[serde(default = "defaults::layout::breakpoints")]
    #[educe(Default = defaults::layout::breakpoints())]
    pub breakpoints: Vec<BreakpointConfig>,
}

/// One `[[layout.breakpoints]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BreakpointConfig {
    /// Minimum viewport width in pixels, inclusive.
    pub threshold: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_width: Option<ContainerWidth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nav: Option<NavArrangement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<u8>,
}

impl From<&BreakpointRule> for BreakpointConfig {
    fn from(rule: &BreakpointRule) -> Self {
        let props = &rule.properties;
        Self {
            threshold: rule.threshold,
            container_width: props.container_width,
            nav: props.nav,
            hidden: props.hidden.clone(),
            columns: props.columns,
        }
    }
}

impl From<&BreakpointConfig> for BreakpointRule {
    fn from(config: &BreakpointConfig) -> Self {
        Self::new(
            config.threshold,
            LayoutProperties {
                container_width: config.container_width,
                nav: config.nav,
                hidden: config.hidden.clone(),
                columns: config.columns,
            },
        )
    }
}

impl LayoutConfig {
    /// Thresholds that appear more than once, ascending.
    pub fn duplicate_thresholds(&self) -> Vec<u32> {
        let mut seen = BTreeSet::new();
        let mut duplicates = BTreeSet::new();
        for bp in &self.breakpoints {
            if !seen.insert(bp.threshold) {
                duplicates.insert(bp.threshold);
            }
        }
        duplicates.into_iter().collect()
    }

    /// The base rule with unset properties filled from the built-in base.
    pub fn resolved_base(&self) -> LayoutProperties {
        let fallback = defaults::layout::base();
        LayoutProperties {
            container_width: self.base.container_width.or(fallback.container_width),
            nav: self.base.nav.or(fallback.nav),
            hidden: self.base.hidden.clone().or(fallback.hidden),
            columns: self.base.columns.or(fallback.columns),
        }
    }

    /// Compile into the immutable layout table.
    pub fn to_breakpoints(&self) -> Result<Breakpoints, BuildError> {
        let rules = self.breakpoints.iter().map(BreakpointRule::from).collect();
        Breakpoints::new(&self.resolved_base(), rules)
    }
}
