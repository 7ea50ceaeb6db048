//! CLI entrypoint for paper-consensus
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use clap::Parser;
use consensus_application::{
    ConsensusProgress, ConsensusRequest, DEFAULT_SYSTEM_PROMPT, NoProgress, RunConsensusUseCase,
    build_user_prompt,
};
use consensus_domain::{Model, OutputFormat, Stage};
use consensus_infrastructure::{ConfigLoader, JsonlResultRecorder, ProviderFactory};
use consensus_presentation::{Cli, ProgressReporter, SimpleProgress, formatter_for};
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // _guard must live until main() returns to flush the log file
    let _guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    if cli.show_config {
        for line in ConfigLoader::describe_sources(cli.config.as_deref()) {
            println!("{}", line);
        }
        return Ok(());
    }

    info!("Starting paper-consensus");

    // === Configuration ===
    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())?
    };
    let config = file_config.consensus_config()?;

    if let Some(color) = file_config.output.color {
        colored::control::set_override(color);
    }

    // === Inputs ===
    let prompt = match (&cli.prompt, &cli.prompt_file) {
        (Some(prompt), _) => prompt.clone(),
        (None, Some(path)) => read_file(path, "prompt")?,
        (None, None) => anyhow::bail!("A prompt or --prompt-file is required"),
    };
    let system_prompt = match &cli.system_file {
        Some(path) => read_file(path, "system prompt")?,
        None => DEFAULT_SYSTEM_PROMPT.to_string(),
    };
    let user_prompt = match &cli.data_file {
        Some(path) => build_user_prompt(&prompt, &read_file(path, "data")?),
        None => prompt,
    };

    if cli.stage.parse::<Stage>().is_err() {
        warn!("Unknown stage '{}': no extractors will run", cli.stage);
    }
    let n = cli.runs.unwrap_or_else(|| config.stage_n(&cli.stage));

    // === Dependency Injection ===
    let provider_name = cli
        .provider
        .as_deref()
        .unwrap_or(file_config.providers.default.as_str());
    let model = cli.model.as_deref().map(Model::from);
    let provider = ProviderFactory::create(provider_name, model, &file_config.providers)?;

    let mut use_case = RunConsensusUseCase::new(provider, config);
    if let Some(path) = &cli.record {
        match JsonlResultRecorder::new(path) {
            Some(recorder) => use_case = use_case.with_recorder(Arc::new(recorder)),
            None => warn!("Results will not be recorded to {}", path.display()),
        }
    }

    let request = ConsensusRequest::new(system_prompt, user_prompt, n)
        .with_extractors(Stage::extractors_for(&cli.stage))
        .with_stage(cli.stage.clone());

    let progress: Box<dyn ConsensusProgress> = if cli.quiet {
        Box::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::with_label(cli.stage.clone()))
    } else {
        Box::new(SimpleProgress)
    };

    let result = use_case
        .execute_with_progress(request, progress.as_ref())
        .await;

    if result.n_runs == 0 {
        warn!("No run succeeded; all ratings are UNKNOWN");
    }

    // === Output ===
    let format: OutputFormat = cli
        .output
        .map(OutputFormat::from)
        .unwrap_or(file_config.output.format);
    println!("{}", formatter_for(format).format(&result));

    Ok(())
}

/// Initialize logging based on verbosity level.
///
/// Logs go to stderr, or to `log_file` through a non-blocking writer.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let name = path
                .file_name()
                .context("--log-file must name a file")?;
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
            Ok(None)
        }
    }
}

fn read_file(path: &Path, what: &str) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} file {}", what, path.display()))
}
