//! What's Cooking CLI - tell what food is in a photo.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{Cli, Commands, ExitCode, Settings};
use config::AppConfig;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = match cli.global.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = AppConfig::load();
    let settings = Settings::resolve(&cli.global, &config);

    let result = match cli.command {
        Some(Commands::Classify(ref args)) => commands::classify::run(args, &settings),
        Some(Commands::Batch(args)) => commands::batch::run(&args.with_config(&config), &settings),
        Some(Commands::Model(ref args)) => {
            commands::model::run(args, &settings).map(|()| ExitCode::Success)
        }
        // Default behavior: run batch with flattened args
        None => commands::batch::run(&cli.batch.with_config(&config), &settings),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::Error
        }
    };

    exit_code.into()
}
