//! Responsive layout resolution.
//!
//! A layout table is a complete base state plus breakpoint rules that each
//! override a subset of properties. For a viewport width the active rule is
//! the one with the largest threshold that is `<=` the width (inclusive).
//! When no threshold qualifies the base state applies as-is.
//!
//! ```text
//! rules (descending):   1024        800        500
//!                  ──────┼──────────┼──────────┼──────────
//! width 1280  ──►  rule 1024
//! width  800  ──►             rule 800   (inclusive bound)
//! width  799  ──►                        rule 500
//! width  320  ──►  base
//! ```
//!
//! Only the active rule is overlaid on the base. Rules never stack: a
//! property the active rule leaves unset takes its base value, not the value
//! of a wider rule.

use crate::error::BuildError;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt, str::FromStr};
use thiserror::Error;

/// Element hidden by the built-in narrow layout.
pub const SITE_TITLE: &str = "site-title";

/// Main container width: `960px` or `90%`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ContainerWidth {
    /// Fixed width in pixels.
    Fixed(u32),
    /// Percentage of the viewport, 1 to 100.
    Fluid(u8),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid container width `{0}`, expected e.g. `960px` or `90%`")]
pub struct ParseWidthError(String);

impl FromStr for ContainerWidth {
    type Err = ParseWidthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let err = || ParseWidthError(s.to_owned());

        if let Some(px) = trimmed.strip_suffix("px") {
            let px = px.trim().parse::<u32>().map_err(|_| err())?;
            return if px == 0 { Err(err()) } else { Ok(Self::Fixed(px)) };
        }
        if let Some(percent) = trimmed.strip_suffix('%') {
            let percent = percent.trim().parse::<u8>().map_err(|_| err())?;
            return if (1..=100).contains(&percent) {
                Ok(Self::Fluid(percent))
            } else {
                Err(err())
            };
        }
        Err(err())
    }
}

impl TryFrom<String> for ContainerWidth {
    type Error = ParseWidthError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ContainerWidth> for String {
    fn from(value: ContainerWidth) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ContainerWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(px) => write!(f, "{px}px"),
            Self::Fluid(percent) => write!(f, "{percent}%"),
        }
    }
}

/// How the navigation links are arranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavArrangement {
    /// Single row next to the title.
    Horizontal,
    /// One link per row below the title.
    Stacked,
    /// Hidden behind a toggle.
    Collapsed,
}

/// A partial set of layout properties. `None` means "not set by this rule".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_width: Option<ContainerWidth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nav: Option<NavArrangement>,
    /// Elements hidden at this size, e.g. `site-title`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<u8>,
}

/// One breakpoint: properties applied from `threshold` pixels upward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakpointRule {
    pub threshold: u32,
    pub properties: LayoutProperties,
}

impl BreakpointRule {
    pub const fn new(threshold: u32, properties: LayoutProperties) -> Self {
        Self {
            threshold,
            properties,
        }
    }
}

/// Fully resolved layout handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutState {
    /// Threshold of the active rule, `None` when the base rule applies.
    pub breakpoint: Option<u32>,
    pub container_width: ContainerWidth,
    pub nav: NavArrangement,
    pub hidden: BTreeSet<String>,
    pub columns: u8,
}

impl LayoutState {
    /// Build the base state. Every property must be set.
    ///
    /// # Errors
    ///
    /// [`BuildError::UnresolvedViewport`] naming the first unset property.
    pub fn from_base(base: &LayoutProperties) -> Result<Self, BuildError> {
        let unresolved = |property| BuildError::UnresolvedViewport { property };
        Ok(Self {
            breakpoint: None,
            container_width: base.container_width.ok_or_else(|| unresolved("container_width"))?,
            nav: base.nav.ok_or_else(|| unresolved("nav"))?,
            hidden: base.hidden.clone().ok_or_else(|| unresolved("hidden"))?,
            columns: base.columns.ok_or_else(|| unresolved("columns"))?,
        })
    }

    /// Apply the properties `rule` sets, keeping the rest.
    fn overlay(&self, rule: &BreakpointRule) -> Self {
        let props = &rule.properties;
        Self {
            breakpoint: Some(rule.threshold),
            container_width: props.container_width.unwrap_or(self.container_width),
            nav: props.nav.unwrap_or(self.nav),
            hidden: props.hidden.clone().unwrap_or_else(|| self.hidden.clone()),
            columns: props.columns.unwrap_or(self.columns),
        }
    }

    pub fn is_visible(&self, element: &str) -> bool {
        !self.hidden.contains(element)
    }
}

impl From<&LayoutState> for LayoutProperties {
    fn from(state: &LayoutState) -> Self {
        Self {
            container_width: Some(state.container_width),
            nav: Some(state.nav),
            hidden: Some(state.hidden.clone()),
            columns: Some(state.columns),
        }
    }
}

/// Ordered, immutable layout table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breakpoints {
    base: LayoutState,
    /// Sorted by threshold, descending, thresholds unique.
    rules: Vec<BreakpointRule>,
}

impl Breakpoints {
    /// Build a table from a base rule and breakpoint rules in any order.
    ///
    /// When two rules share a threshold the one listed first is kept.
    ///
    /// # Errors
    ///
    /// [`BuildError::UnresolvedViewport`] if `base` leaves a property unset.
    pub fn new(base: &LayoutProperties, mut rules: Vec<BreakpointRule>) -> Result<Self, BuildError> {
        let base = LayoutState::from_base(base)?;
        rules.sort_by(|a, b| b.threshold.cmp(&a.threshold));
        rules.dedup_by_key(|rule| rule.threshold);
        Ok(Self { base, rules })
    }

    pub const fn base(&self) -> &LayoutState {
        &self.base
    }

    /// Rules in evaluation order (widest threshold first).
    pub fn rules(&self) -> &[BreakpointRule] {
        &self.rules
    }

    /// The first rule, widest first, whose threshold is `<= width`.
    pub fn active_rule(&self, width: u32) -> Option<&BreakpointRule> {
        self.rules.iter().find(|rule| rule.threshold <= width)
    }

    /// Resolve the layout for a viewport width.
    pub fn resolve(&self, width: u32) -> LayoutState {
        match self.active_rule(width) {
            Some(rule) => self.base.overlay(rule),
            None => self.base.clone(),
        }
    }

    /// Built-in base state: single column, collapsed navigation, no site title.
    fn default_state() -> LayoutState {
        LayoutState {
            breakpoint: None,
            container_width: ContainerWidth::Fluid(100),
            nav: NavArrangement::Collapsed,
            hidden: BTreeSet::from([SITE_TITLE.to_owned()]),
            columns: 1,
        }
    }

    /// Built-in base rule, as a fully set property list.
    pub fn default_base() -> LayoutProperties {
        LayoutProperties::from(&Self::default_state())
    }

    /// Built-in rules at 1024, 800 and 500 pixels.
    pub fn default_rules() -> Vec<BreakpointRule> {
        vec![
            BreakpointRule::new(
                1024,
                LayoutProperties {
                    container_width: Some(ContainerWidth::Fixed(960)),
                    nav: Some(NavArrangement::Horizontal),
                    hidden: Some(BTreeSet::new()),
                    columns: Some(2),
                },
            ),
            BreakpointRule::new(
                800,
                LayoutProperties {
                    container_width: Some(ContainerWidth::Fluid(90)),
                    nav: Some(NavArrangement::Horizontal),
                    hidden: Some(BTreeSet::new()),
                    ..LayoutProperties::default()
                },
            ),
            BreakpointRule::new(
                500,
                LayoutProperties {
                    nav: Some(NavArrangement::Stacked),
                    hidden: Some(BTreeSet::new()),
                    ..LayoutProperties::default()
                },
            ),
        ]
    }
}

impl Default for Breakpoints {
    fn default() -> Self {
        let base = Self::default_state();
        let mut rules = Self::default_rules();
        rules.sort_by(|a, b| b.threshold.cmp(&a.threshold));
        Self { base, rules }
    }
}

/// Resolve the layout for `width` against `rules`.
pub fn resolve(width: u32, rules: &Breakpoints) -> LayoutState {
    rules.resolve(width)
}
