//! gomodtools - Go module maintenance library
//!
//! This library provides the core functionality behind three tools:
//! - modclean: prune unused versions from the module cache
//! - modup: upgrade go.mod requirements to the latest compatible versions
//! - sortimports: group and sort Go imports

pub mod cli;
pub mod error;
pub mod imports;
pub mod logging;
pub mod manifest;
pub mod output;
pub mod package_manager;
pub mod progress;
pub mod proxy;
pub mod prune;
pub mod update;
pub mod vcs;
pub mod version;
