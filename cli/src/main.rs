//! CLI entrypoint for Sideview
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use sideview_application::{
    AnalysisProgressNotifier, ConversationLogger, FeedbackOrchestrator, NoProgress,
    RunAnalysisError,
};
use sideview_domain::{ConfigIssue, OutputFormat, RunStatus};
use sideview_infrastructure::{
    ConfigLoader, FileConfig, FilePromptStore, JsonlConversationLogger, ProviderOverrides,
    TextDocument, create_feedback_client,
};
use sideview_presentation::{
    AnalyzeArgs, Cli, Command, ConsoleFormatter, OutputFormatter, ProgressReporter,
    SimpleProgress,
};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };

    let _log_guard = init_logging(cli.verbose, &config);
    ConsoleFormatter::set_color(config.output.color);

    info!("Starting Sideview");

    match cli.command {
        Command::Analyze(args) => analyze(args, &config).await,
        Command::Clear { document } => clear(&document, &config).await,
        Command::Show { document } => show(&document).await,
        Command::Personas => {
            print!("{}", ConsoleFormatter::format_personas());
            Ok(ExitCode::SUCCESS)
        }
        Command::Config => {
            show_config(cli.config.as_ref(), cli.no_config, &config);
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Install the tracing subscriber: stderr at the `-v` level, plus a daily
/// log file when `[logging] log_dir` is set.
fn init_logging(verbose: u8, config: &FileConfig) -> Option<WorkerGuard> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let (file_layer, guard) = match &config.logging.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "sideview.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    guard
}

/// Log every issue; fail if any is an error.
fn check_config(issues: &[ConfigIssue]) -> Result<()> {
    for issue in issues {
        warn!("{}", issue.message);
    }
    let errors: Vec<_> = issues.iter().filter(|i| i.is_error()).collect();
    if !errors.is_empty() {
        eprint!("{}", ConsoleFormatter::format_config_issues(issues));
        bail!("Invalid configuration ({} errors)", errors.len());
    }
    Ok(())
}

fn build_orchestrator(
    config: &FileConfig,
    overrides: &ProviderOverrides,
    document: Arc<TextDocument>,
) -> Result<FeedbackOrchestrator> {
    let client = create_feedback_client(config, overrides)?;
    Ok(FeedbackOrchestrator::new(client, document))
}

async fn analyze(args: AnalyzeArgs, config: &FileConfig) -> Result<ExitCode> {
    check_config(&config.validate())?;

    let overrides = ProviderOverrides {
        provider: args.provider.map(Into::into),
        model: args.model.clone(),
    };
    let format: OutputFormat = args
        .output
        .map(Into::into)
        .or(config.output.format)
        .unwrap_or_default();

    let prompt_dir = args.prompts.clone().or_else(|| config.prompts.dir.clone());
    let prompts = FilePromptStore::new(prompt_dir)
        .load(&config.prompts)
        .await?;

    let document = Arc::new(
        TextDocument::open(&args.document)
            .await
            .with_context(|| format!("Cannot open {}", args.document.display()))?,
    );

    let mut orchestrator = build_orchestrator(config, &overrides, document)?;
    if let Some(logger) = transcript_logger(config, &args.document) {
        info!("Writing transcript to {}", logger.path().display());
        let logger: Arc<dyn ConversationLogger> = Arc::new(logger);
        orchestrator = orchestrator.with_conversation_logger(logger);
    }

    // Bars draw on stderr; plain lines go to stdout and would corrupt JSON
    let reporter = ProgressReporter::new();
    let progress: &dyn AnalysisProgressNotifier = if args.quiet {
        &NoProgress
    } else if std::io::stderr().is_terminal() {
        &reporter
    } else if format != OutputFormat::Json {
        &SimpleProgress
    } else {
        &NoProgress
    };

    let run = match orchestrator
        .run_analysis_with_progress(&prompts, progress)
        .await
    {
        Ok(run) => run,
        // Precondition failures are recorded on the run and reported below
        Err(RunAnalysisError::Run(error)) => {
            warn!("{}", error);
            orchestrator.snapshot()
        }
        Err(error) => bail!(error),
    };

    println!("{}", ConsoleFormatter.format_as(&run, format));

    Ok(if run.status() == RunStatus::Failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn transcript_logger(config: &FileConfig, document: &Path) -> Option<JsonlConversationLogger> {
    if !config.logging.transcript {
        return None;
    }
    let dir = config.logging.resolve_log_dir()?;
    JsonlConversationLogger::for_document(&dir, document)
}

async fn clear(path: &Path, config: &FileConfig) -> Result<ExitCode> {
    let document = Arc::new(
        TextDocument::open(path)
            .await
            .with_context(|| format!("Cannot open {}", path.display()))?,
    );
    let orchestrator = build_orchestrator(config, &ProviderOverrides::default(), document)?;
    orchestrator.clear_analysis().await?;
    println!("Cleared feedback from {}", path.display());
    Ok(ExitCode::SUCCESS)
}

async fn show(path: &Path) -> Result<ExitCode> {
    let document = TextDocument::open(path)
        .await
        .with_context(|| format!("Cannot open {}", path.display()))?;
    print!(
        "{}",
        ConsoleFormatter::format_annotated(document.text(), &document.annotations())
    );
    Ok(ExitCode::SUCCESS)
}

fn show_config(explicit: Option<&PathBuf>, no_config: bool, config: &FileConfig) {
    println!("Configuration sources (in priority order):");
    if no_config {
        println!("  (config files disabled by --no-config)");
    } else {
        println!("  [env  ] SIDEVIEW_* environment variables");
        for (label, path, found) in ConfigLoader::config_sources(explicit) {
            let mark = if found { "FOUND" } else { "     " };
            println!("  [{}] {:<8} {}", mark, format!("{}:", label), path.display());
        }
    }
    println!("  [     ] Default: built-in defaults");
    println!();

    let (provider, _) = config.provider.parse_provider();
    println!("Provider: {}", provider);
    println!();
    print!("{}", ConsoleFormatter::format_config_issues(&config.validate()));
}
