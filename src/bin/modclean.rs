//! modclean - remove module cache entries no local go.mod refers to

use clap::Parser;
use gomodtools::cli::ModcleanArgs;
use gomodtools::logging;
use gomodtools::output::TextFormatter;
use gomodtools::package_manager::SystemGo;
use gomodtools::progress::Progress;
use gomodtools::prune::{resolve_mod_cache, CachePruner, PruneOptions};
use std::io::{self, IsTerminal};
use std::process::ExitCode;
use tracing::debug;

fn main() -> ExitCode {
    let args = ModcleanArgs::parse();
    logging::init(args.verbose);

    match run(args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
fn run(args: ModcleanArgs) -> anyhow::Result<ExitCode> {
    let toolchain = SystemGo::new();
    let options = PruneOptions {
        dry_run: args.dry_run,
        verbose: args.verbose,
    };
    let pruner = CachePruner::new(&toolchain, options);

    let stderr = io::stderr();
    let mut progress = Progress::new(!args.verbose && stderr.is_terminal());
    progress.spinner("Listing required modules...");
    let retained = pruner.retained_modules(&args.path);
    progress.finish_and_clear();
    let (keep, manifests) = retained?;

    let cache_root = resolve_mod_cache(args.modcache.as_deref(), &toolchain)?;
    debug!("module cache at {}", cache_root.display());

    let mut report = pruner.prune_cache(&cache_root, &keep)?;
    report.manifests = manifests;

    let formatter = TextFormatter::new(stderr.is_terminal());
    formatter.format_prune(&report, &mut stderr.lock())?;

    Ok(ExitCode::SUCCESS)
}
