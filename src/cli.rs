//! CLI argument parsing for the three binaries

use crate::vcs::ChangeMode;
use crate::version::toolchain::parse_go_flag;
use clap::Parser;
use std::path::PathBuf;

/// Clean up the Go module download cache
#[derive(Parser, Debug, Clone)]
#[command(name = "modclean", version, about = "Clean up Go module download cache")]
pub struct ModcleanArgs {
    /// Directory searched for go.mod files
    pub path: PathBuf,

    /// Perform a dry run without making changes
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Module cache root (default: go env GOMODCACHE)
    #[arg(long, env = "GOMODCACHE")]
    pub modcache: Option<PathBuf>,
}

/// Upgrade go.mod requirements to the latest compatible versions
#[derive(Parser, Debug, Clone)]
#[command(
    name = "modup",
    version,
    about = "Upgrade go.mod requirements to the latest compatible versions"
)]
pub struct ModupArgs {
    /// go.mod file, or a directory containing one
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Write result to the source file instead of stdout
    #[arg(short, long)]
    pub write: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Also upgrade requirements marked // indirect
    #[arg(long)]
    pub indirect: bool,

    /// Module proxy URL (default: go env GOPROXY)
    #[arg(long, env = "GOPROXY")]
    pub proxy: Option<String>,

    /// Target go version, replacing the go directive
    #[arg(long, value_parser = parse_go_flag)]
    pub go: Option<String>,
}

/// Sort Go imports
#[derive(Parser, Debug, Clone)]
#[command(
    name = "sortimports",
    version,
    about = "Sort Go imports into standard library, third-party and local groups"
)]
pub struct SortImportsArgs {
    /// Project root
    pub path: PathBuf,

    /// Write result to the source file instead of stdout
    #[arg(short, long)]
    pub write: bool,

    /// Local module path (default: module directive of <path>/go.mod)
    #[arg(short, long)]
    pub module: Option<String>,

    /// Only process files changed in git
    #[arg(long, value_enum)]
    pub mode: Option<ChangeMode>,

    /// Do not run goimports before sorting
    #[arg(long)]
    pub no_goimports: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
