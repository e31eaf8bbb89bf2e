mod app;
mod commands;
mod output;

use anyhow::Context;
use clap::Parser;

use crate::app::{Cli, Command};

fn main() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        eprintln!("\nCancelled.");
        std::process::exit(130);
    })
    .context("failed to set Ctrl+C handler")?;

    let cli = Cli::parse();

    // Decoder diagnostics go to stderr; --verbose shows placeholders and unresolved backrefs
    let level = if cli.global.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_module("undname", level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    match (&cli.command, &cli.symbol) {
        (Some(Command::Decode { symbol }), _) => commands::decode::run(symbol, &cli.global),
        (Some(Command::Classify { path }), _) => commands::classify::run(path, &cli.global),
        (Some(Command::Verify { paths }), _) => commands::verify::run(paths, &cli.global),
        (None, Some(symbol)) => commands::decode::run(symbol, &cli.global),
        (None, None) => anyhow::bail!("no symbol given, see --help"),
    }
}
