//! modup - upgrade go.mod requirements to their latest compatible versions
//!
//! Only versions in the pinned major whose go directive the target
//! toolchain satisfies are considered.

use clap::Parser;
use gomodtools::cli::ModupArgs;
use gomodtools::logging;
use gomodtools::manifest::{resolve_manifest_path, ChangeWriter};
use gomodtools::output::TextFormatter;
use gomodtools::package_manager::SystemGo;
use gomodtools::proxy::{GoProxyClient, HttpClient, ProxyConfig};
use gomodtools::update::{UpgradeOptions, Upgrader};
use std::io::{self, IsTerminal, Read, Write};
use std::path::Path;
use std::process::ExitCode;
use tracing::debug;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = ModupArgs::parse();
    logging::init(args.verbose);

    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run(args: ModupArgs) -> anyhow::Result<ExitCode> {
    let config = ProxyConfig::resolve(args.proxy.as_deref(), &SystemGo::new());
    debug!("using proxy {}", config.url());
    let proxy = GoProxyClient::new(HttpClient::new()?, config);

    let mut options = UpgradeOptions::new().with_indirect(args.indirect);
    if let Some(go) = &args.go {
        options = options.with_go_version(go.clone());
    }
    let upgrader = Upgrader::new(&proxy, options);

    let mut stdout = io::stdout().lock();
    let report = if args.path == Path::new("-") {
        // Manifest on stdin, result on stdout
        let mut data = Vec::new();
        io::stdin().read_to_end(&mut data)?;
        let report = upgrader.upgrade(Path::new("go.mod"), &data).await?;
        if report.is_changed() {
            stdout.write_all(&report.updated)?;
        }
        report
    } else {
        let path = resolve_manifest_path(&args.path);
        let (report, _) = upgrader
            .run(&path, ChangeWriter::new(args.write), &mut stdout)
            .await?;
        report
    };
    stdout.flush()?;

    if args.verbose {
        let stderr = io::stderr();
        let formatter = TextFormatter::new(stderr.is_terminal());
        formatter.format_upgrade(&report, &mut stderr.lock())?;
    }

    Ok(ExitCode::SUCCESS)
}
