//! Command-line argument definitions for the Almanac CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. A subcommand selects what to do with the loaded catalog;
//! global options control configuration file selection and logging verbosity.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command-line arguments for the Almanac catalog tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load and validate a catalog, then print entity counts per kind
    Check {
        /// Catalog files or directories; defaults to the configured paths
        paths: Vec<PathBuf>,
    },

    /// Print one entity with its forward and inverse relations
    Show {
        /// Entity reference, e.g. `component:shop/web`
        reference: String,

        /// Catalog files or directories; defaults to the configured paths
        paths: Vec<PathBuf>,
    },

    /// List entities of a kind whose qualified name contains a query
    Find {
        /// Entity kind (domain, system, component, api, resource, group)
        kind: String,

        /// Substring to match against `namespace/name`
        #[arg(short, long, default_value = "")]
        query: String,

        /// Catalog files or directories; defaults to the configured paths
        paths: Vec<PathBuf>,
    },
}

impl Command {
    /// Catalog paths given on the command line.
    pub fn paths(&self) -> &[PathBuf] {
        match self {
            Command::Check { paths } | Command::Show { paths, .. } | Command::Find { paths, .. } => {
                paths
            }
        }
    }
}
