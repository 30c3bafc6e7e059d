//! boost-ndk CLI - cross-compiles Boost for Android

use std::io::{self, IsTerminal};

use anyhow::Result;
use boost_ndk::util::diagnostic::emit;
use boost_ndk::util::errors::Error;
use boost_ndk::util::shell::ColorChoice;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = match cli.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => io::stderr().is_terminal(),
    };

    if let Err(e) = run(cli) {
        match e.downcast_ref::<Error>() {
            Some(err) => {
                let mut diagnostic = err.to_diagnostic();
                for cause in e.chain().take_while(|c| c.downcast_ref::<Error>().is_none()) {
                    diagnostic = diagnostic.with_context(cause.to_string());
                }
                emit(&diagnostic, color);
            }
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("boost_ndk=debug")
    } else if cli.quiet {
        EnvFilter::new("boost_ndk=error")
    } else {
        EnvFilter::new("boost_ndk=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .init();

    // Completions must work without a readable config.
    if let Commands::Completions(args) = &cli.command {
        return commands::completions::execute(args);
    }

    let ctx = commands::Context::new(&cli)?;

    match cli.command {
        Commands::Build(args) => commands::build::execute(args, &ctx),
        Commands::Config(args) => commands::config::execute(args, &ctx),
        Commands::Patch => commands::patch::execute(&ctx),
        Commands::Restore => commands::restore::execute(&ctx),
        Commands::Check(args) => commands::check::execute(args, &ctx),
        Commands::Completions(_) => Ok(()),
    }
}
