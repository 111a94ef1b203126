//! Subcommand handlers. Each returns the process exit status.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use ffactory_core::{
    command::{output_path, synthesize},
    config::expand_path,
    engine::{EncoderCapabilities, Engine, FfmpegEngine},
    load_config_or_default,
    processor::{BatchReport, JobOutcome, ProcessorConfig, WorkerPool},
    validate_config,
    watch::{run_single, WatchLoop, WatchMode, WatchOptions},
    Config, Profile, ProfileStore,
};

pub const EXIT_OK: i32 = 0;
pub const EXIT_JOB_FAILED: i32 = 2;

/// Loaded configuration plus the collaborators every command needs.
pub struct App {
    config: Config,
    store: ProfileStore,
    engine: FfmpegEngine,
}

impl App {
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config =
            load_config_or_default(config_path).context("Failed to load configuration")?;
        validate_config(&config).context("Configuration validation failed")?;

        let store = ProfileStore::new(config.factories_dir());
        let engine = FfmpegEngine::new(expand_path(&config.engine.path));
        tracing::debug!(
            "Factories in {:?}, engine {:?}",
            store.dir(),
            engine.path()
        );

        Ok(Self {
            config,
            store,
            engine,
        })
    }

    fn profile(&self, name: &str) -> Result<Arc<Profile>> {
        let profile = self
            .store
            .load(name)
            .with_context(|| format!("Failed to load factory '{name}'"))?;
        Ok(Arc::new(profile))
    }

    /// Engine for commands that run in the foreground: Ctrl-C stops the
    /// conversion along with this process.
    fn foreground_engine(&self) -> Arc<FfmpegEngine> {
        Arc::new(self.engine.clone().inherit_process_group())
    }

    fn options(&self, workers: Option<usize>) -> WatchOptions {
        let mut options = WatchOptions::from_config(&self.config);
        options.limits = options.limits.with_override(workers);
        options
    }

    fn pool(&self, workers: usize) -> WorkerPool<FfmpegEngine> {
        WorkerPool::new(
            ProcessorConfig::default()
                .with_log_dir(self.config.log_dir())
                .with_max_parallel(workers),
            self.foreground_engine(),
        )
    }
}

fn print_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a JobOutcome>) -> i32 {
    let mut code = EXIT_OK;
    for outcome in outcomes {
        println!("{outcome}");
        if !outcome.succeeded() {
            code = EXIT_JOB_FAILED;
        }
    }
    code
}

fn print_report(report: &BatchReport) -> i32 {
    let code = print_outcomes(&report.outcomes);
    if !report.is_empty() {
        println!("{} converted, {} failed", report.succeeded(), report.failed());
    }
    code
}

pub async fn watch_factory(
    app: &App,
    factory: &str,
    once: bool,
    interval: Option<u64>,
    workers: Option<usize>,
) -> Result<i32> {
    let profile = app.profile(factory)?;
    // conversions keep their own process group so Ctrl-C only drains the batch
    let engine = Arc::new(app.engine.clone());
    let mut watcher = WatchLoop::new(profile, engine, app.options(workers))
        .with_context(|| format!("Cannot watch with factory '{factory}'"))?;

    let mode = if once {
        WatchMode::Once
    } else {
        let secs = interval.unwrap_or(app.config.watch.interval_secs).max(1);
        WatchMode::Interval(Duration::from_secs(secs))
    };

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, finishing the current batch");
            let _ = shutdown_tx.send(true);
        }
    });

    let report = watcher.run(mode, shutdown_rx).await?;
    Ok(print_report(&report))
}

pub async fn run_file(
    app: &App,
    file: &Path,
    factory: Option<&str>,
    workers: Option<usize>,
) -> Result<i32> {
    if !file.is_file() {
        bail!("Input file not found: {}", file.display());
    }

    let profile = match factory {
        Some(name) => app.profile(name)?,
        None => Arc::new(
            app.store
                .auto_match(file)
                .context("Failed to pick a factory for the file")?,
        ),
    };
    tracing::info!("Converting {:?} with factory '{}'", file, profile.name());

    let outcome = run_single(profile, file, app.foreground_engine(), &app.options(workers)).await;
    Ok(print_outcomes([&outcome]))
}

#[derive(Debug, Serialize)]
struct FactorySummary {
    name: String,
    path: PathBuf,
    enabled: bool,
    notify_directory: Option<PathBuf>,
}

pub fn list(app: &App, json: bool) -> Result<i32> {
    let descriptors = app
        .store
        .discover()
        .context("Failed to list factories")?;

    let mut summaries = Vec::with_capacity(descriptors.len());
    for descriptor in descriptors {
        let profile = app.profile(&descriptor.name)?;
        summaries.push(FactorySummary {
            name: descriptor.name,
            path: descriptor.path,
            enabled: profile.is_enabled(),
            notify_directory: profile.notify_dir(),
        });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(EXIT_OK);
    }

    if summaries.is_empty() {
        println!("No factories in {}", app.store.dir().display());
    }
    for summary in &summaries {
        println!(
            "{:<24} {:<8} {}",
            summary.name,
            if summary.enabled { "enabled" } else { "disabled" },
            summary
                .notify_directory
                .as_ref()
                .map(|d| d.display().to_string())
                .unwrap_or_else(|| "-".to_string())
        );
    }
    Ok(EXIT_OK)
}

pub fn command(app: &App, factory: &str, file: &Path, preview: bool) -> Result<i32> {
    let profile = app.profile(factory)?;
    let args = synthesize(&profile, file, preview);
    println!("{}", app.engine.command_line(&args));
    Ok(EXIT_OK)
}

pub async fn preview(app: &App, factory: &str, file: &Path, out_dir: Option<PathBuf>) -> Result<i32> {
    if !file.is_file() {
        bail!("Input file not found: {}", file.display());
    }

    let profile = app.profile(factory)?;
    let out_dir = out_dir.unwrap_or_else(|| std::env::temp_dir().join("ffactory-preview"));
    let output = out_dir.join(output_path(&profile, file, true));

    let outcome = app.pool(1).run_preview(profile, file, &out_dir).await;
    let code = print_outcomes([&outcome]);
    if outcome.succeeded() {
        println!("Preview written to {}", output.display());
    }
    Ok(code)
}

pub async fn stream(
    app: &App,
    factory: &str,
    video: &str,
    audio: Option<&str>,
    dest: &str,
) -> Result<i32> {
    let profile = app.profile(factory)?;
    let outcome = app
        .pool(1)
        .run_stream(profile, video, audio, Some(dest))
        .await
        .with_context(|| format!("Cannot stream with factory '{factory}'"))?;
    Ok(print_outcomes([&outcome]))
}

pub async fn check(app: &App) -> Result<i32> {
    app.engine
        .validate()
        .await
        .context("Engine check failed")?;
    println!("engine:            {} (ok)", app.engine.path().display());

    let fragments = app.options(None).limits.accelerator_codecs;
    let capabilities = EncoderCapabilities::detect(app.engine.path(), &fragments).await;
    if capabilities.has_hardware_encoder() {
        println!(
            "hardware encoders: {}",
            capabilities.hardware_encoders.join(", ")
        );
    } else {
        println!("hardware encoders: none");
    }

    println!("factories:         {}", app.store.dir().display());
    println!("logs:              {}", app.config.log_dir().display());
    Ok(EXIT_OK)
}
