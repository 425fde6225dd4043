// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Linkstamp — attach link annotations to the pages of a PDF and export a copy
// with every link written onto every page.
//
// Entry point. Initialises logging, loads settings, and launches the shell.

mod command;
mod services;
mod session;
mod shell;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use linkstamp_core::human_errors::humanize_error;

use services::{config_store, downloads};
use shell::Shell;

#[derive(Debug, Parser)]
#[command(name = "linkstamp", version, about = "Stamp link annotations onto the pages of a PDF")]
struct Args {
    /// PDF to open at startup.
    file: Option<PathBuf>,

    /// Directory exported files are written to.
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Settings file (JSON).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Page to start on.
    #[arg(long, value_name = "N")]
    page: Option<u32>,

    /// Write the effective settings to the settings file and exit.
    #[arg(long)]
    init_config: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    tracing::info!("Linkstamp starting");

    let config_path = args.config.clone().unwrap_or_else(config_store::config_path);
    let config = config_store::load_config(&config_path);

    if args.init_config {
        return match config_store::persist_config(&config_path, &config) {
            Ok(()) => {
                println!("Settings written to {}", config_path.display());
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("{}", humanize_error(&err));
                ExitCode::FAILURE
            }
        };
    }

    let download_dir = args
        .out_dir
        .or_else(|| config.download_dir.clone())
        .unwrap_or_else(downloads::download_dir);

    let shell = Shell::new(&config, download_dir);
    match shell.run(args.file, args.page).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "shell stopped with an error");
            eprintln!("{}", humanize_error(&err));
            ExitCode::FAILURE
        }
    }
}
