//! bundleup - scoped updates for Ruby gem bundles
//!
//! Re-resolves a locked bundle either completely or for a chosen set of
//! gems, sources and groups, then installs the result through RubyGems.

use clap::Parser;
use miette::Diagnostic;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cache;
mod cli;
mod command;
mod commands;
mod common;
mod config;
mod definition;
mod error;
mod fetcher;
mod installer;
mod operations;
mod project;
mod ui;

use cli::{Cli, Commands};

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "bundleup=debug" } else { "bundleup=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Update(args) => commands::update::run(cli.gemfile, args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        if let Some(help) = e.help() {
            eprintln!("Help: {help}");
        }
        std::process::exit(1);
    }
}
