mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{Cli, Commands};
use commands::App;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json);

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            tracing::error!("Fatal error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Logs go to stderr so stdout carries only command output.
fn init_logging(verbose: bool, json: bool) {
    // RUST_LOG wins over --verbose
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            "ffactory=debug,ffactory_core=debug".into()
        } else {
            "info".into()
        }
    });

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run(cli: Cli) -> Result<i32> {
    let app = App::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Watch {
            factory,
            once,
            interval,
            workers,
        } => commands::watch_factory(&app, &factory, once, interval, workers).await,
        Commands::Run {
            file,
            factory,
            workers,
        } => commands::run_file(&app, &file, factory.as_deref(), workers).await,
        Commands::List { json } => commands::list(&app, json),
        Commands::Command {
            factory,
            file,
            preview,
        } => commands::command(&app, &factory, &file, preview),
        Commands::Preview {
            factory,
            file,
            out_dir,
        } => commands::preview(&app, &factory, &file, out_dir).await,
        Commands::Stream {
            factory,
            video,
            audio,
            dest,
        } => commands::stream(&app, &factory, &video, audio.as_deref(), &dest).await,
        Commands::Check => commands::check(&app).await,
    }
}
