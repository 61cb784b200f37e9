//! sortimports - group Go imports into standard library, third-party and
//! local blocks

use clap::Parser;
use gomodtools::cli::SortImportsArgs;
use gomodtools::imports::{
    find_go_files, local_prefix, FileOutcome, Goimports, ImportNormalizer, ImportSorter,
    Passthrough,
};
use gomodtools::logging;
use gomodtools::manifest::{ChangeWriter, WriteOutcome};
use gomodtools::vcs::changed_files;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::{debug, info};

fn main() -> ExitCode {
    let args = SortImportsArgs::parse();
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
fn run(args: SortImportsArgs) -> anyhow::Result<ExitCode> {
    let prefix = local_prefix(&args.path, args.module.as_deref())?;
    debug!("local import prefix {}", prefix);

    let files = match args.mode {
        Some(mode) => changed_files(&args.path, mode)?,
        None => find_go_files(&args.path)?,
    };

    let goimports = Goimports::new();
    let normalizer: &dyn ImportNormalizer = if args.no_goimports {
        &Passthrough
    } else {
        &goimports
    };
    let sorter = ImportSorter::new(normalizer, prefix, ChangeWriter::new(args.write));

    let mut stdout = io::stdout().lock();
    let mut changed = 0;
    for file in &files {
        match sorter.process_file(file, &mut stdout)? {
            FileOutcome::Processed(WriteOutcome::Unchanged) => {}
            FileOutcome::Processed(_) => changed += 1,
            FileOutcome::SkippedCgo => {}
        }
    }
    stdout.flush()?;

    info!("{} of {} files changed", changed, files.len());
    Ok(ExitCode::SUCCESS)
}
