//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// [base] Section Defaults
// ============================================================================

pub mod base {
    pub fn title() -> String {
        "My Blog".into()
    }

    pub fn author() -> Option<String> {
        None
    }
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::path::PathBuf;

    pub fn root() -> Option<PathBuf> {
        None
    }

    pub fn content() -> PathBuf {
        "content".into()
    }

    pub fn output() -> PathBuf {
        "public".into()
    }

    pub fn manifest() -> String {
        "manifest.json".into()
    }

    pub fn path_prefix() -> String {
        String::new()
    }

    pub fn extensions() -> Vec<String> {
        vec!["md".into(), "markdown".into()]
    }
}

// ============================================================================
// [layout] Section Defaults
// ============================================================================

pub mod layout {
    use crate::config::layout::BreakpointConfig;
    use folio_core::{Breakpoints, LayoutProperties};

    pub fn base() -> LayoutProperties {
        Breakpoints::default_base()
    }

    pub fn breakpoints() -> Vec<BreakpointConfig> {
        Breakpoints::default_rules()
            .iter()
            .map(BreakpointConfig::from)
            .collect()
    }
}
