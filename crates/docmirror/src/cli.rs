use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser};
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(
    name = "docmirror",
    version = env!("CARGO_PKG_VERSION"),
    about = "Mirror a documentation site listed in an llms.txt manifest",
    long_about = None
)]
#[command(group(ArgGroup::new("mode").required(true).args(["init", "update"])))]
pub struct Cli {
    /// Initial build: back up and rebuild a stale tree, then download everything
    #[arg(long)]
    pub init: bool,

    /// Refresh existing files older than the cache window and fetch missing ones
    #[arg(long)]
    pub update: bool,

    /// Configuration file (default: docmirror.toml, if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging unless RUST_LOG says otherwise
    #[arg(short, long)]
    pub verbose: bool,

    /// Also append log output to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: Overrides,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Init,
    Update,
}

impl Cli {
    pub fn mode(&self) -> Mode {
        if self.init { Mode::Init } else { Mode::Update }
    }
}

/// Flags that take precedence over the file and environment layers.
///
/// Unset flags are skipped so they never mask a lower layer.
#[derive(Debug, Clone, Args, Serialize)]
pub struct Overrides {
    /// Root of the mirrored tree
    #[arg(short, long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    /// Manifest URL
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest_url: Option<String>,

    /// Requests per second across all downloads
    #[arg(short, long = "rate", value_name = "RPS")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requests_per_second: Option<u32>,

    /// Files younger than this many hours are not re-downloaded
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_hours: Option<u64>,

    /// Retries after the first failed attempt
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,

    /// Cap on simultaneously running downloads
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_concurrent: Option<usize>,

    /// Skip the archive normally taken before a rebuild
    #[arg(long = "no-backup", action = clap::ArgAction::SetFalse)]
    #[serde(skip_serializing_if = "is_true")]
    pub backup: bool,
}

impl Default for Overrides {
    fn default() -> Self {
        Self {
            output_dir: None,
            manifest_url: None,
            requests_per_second: None,
            cache_hours: None,
            max_retries: None,
            max_concurrent: None,
            backup: true,
        }
    }
}

fn is_true(value: &bool) -> bool {
    *value
}
