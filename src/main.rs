// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use tallybook::ledger::Ledger;
use tallybook::store::SheetStore;
use tallybook::{cli, commands, config, utils};

fn init_logging() {
    let filter =
        EnvFilter::try_from_env("TALLYBOOK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    if matches.subcommand().is_none() {
        cli::build_cli().print_help()?;
        println!();
        return Ok(());
    }

    let mut cfg = config::load()?;
    if let Some(url) = matches.get_one::<String>("api_url") {
        cfg.api_url = Some(url.trim().to_string());
    }
    let store = SheetStore::new(cfg.api_url()?, cfg.timeout())?;
    let mut ledger = Ledger::new(store);
    utils::print_refresh_warnings(&ledger.refresh());

    match matches.subcommand() {
        Some(("summary", sub)) => commands::summary::handle(&ledger, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&mut ledger, sub)?,
        Some(("recurring", sub)) => commands::recurring::handle(&mut ledger, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&ledger, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&ledger)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
