//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Folio blog content builder CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Output directory path (relative to project root)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Content directory path (relative to project root)
    #[arg(short, long)]
    pub content: Option<PathBuf>,

    /// Config file name (default: folio.toml)
    #[arg(short = 'C', long, default_value = "folio.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared arguments for Build and Check commands
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Include documents marked `draft: true`
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub drafts: Option<bool>,

    /// Override the URL prefix put in front of every route.
    ///
    /// Useful when the blog is deployed under a subdirectory, e.g.:
    ///   folio build --path-prefix blog
    #[arg(long = "path-prefix")]
    pub path_prefix: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Init a template site
    Init {
        /// the name(path) of site directory, related to `root`
        name: Option<PathBuf>,
    },

    /// Build the manifest and write it to the output directory
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Validate all content without writing anything
    Check {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Print the resolved layout for a viewport width
    Layout {
        /// Viewport width in pixels
        width: u32,
    },
}

impl Cli {
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Commands::Init { .. })
    }

    /// Build arguments of `build`/`check`, if any.
    pub const fn build_args(&self) -> Option<&BuildArgs> {
        match &self.command {
            Commands::Build { build_args } | Commands::Check { build_args } => Some(build_args),
            _ => None,
        }
    }
}
