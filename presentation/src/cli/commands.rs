//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use sideview_domain::{ApiProvider, OutputFormat as DomainOutputFormat};
use std::path::PathBuf;

/// Output format for analysis results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Scores, comments and summary for every persona
    Full,
    /// One line per persona
    Summary,
    /// JSON output
    Json,
}

impl From<OutputFormat> for DomainOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => DomainOutputFormat::Full,
            OutputFormat::Summary => DomainOutputFormat::Summary,
            OutputFormat::Json => DomainOutputFormat::Json,
        }
    }
}

/// Model provider selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderArg {
    /// Local Ollama server
    Ollama,
    /// OpenRouter API (needs OPENROUTER_API_KEY)
    Openrouter,
}

impl From<ProviderArg> for ApiProvider {
    fn from(provider: ProviderArg) -> Self {
        match provider {
            ProviderArg::Ollama => ApiProvider::Ollama,
            ProviderArg::Openrouter => ApiProvider::OpenRouter,
        }
    }
}

/// CLI arguments for sideview
#[derive(Parser, Debug)]
#[command(name = "sideview")]
#[command(author, version, about = "Multi-persona feedback on business documents")]
#[command(long_about = r#"
Sideview asks a model to review a document from five viewpoints
(Management, Technical, HR, Legal, Junior) and writes the feedback back
as comments plus one summary section per viewpoint.

Annotations are stored next to the document in <file>.sideview.json;
the document itself is never modified.

Configuration files are loaded from (in priority order):
1. --config <path>                 Explicit config file
2. ./sideview.toml                 Project-level config
3. ~/.config/sideview/config.toml  Global config

Example:
  sideview analyze proposal.txt
  sideview analyze --provider openrouter --model openai/gpt-4o-mini proposal.txt
  sideview show proposal.txt
  sideview clear proposal.txt
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Review a document with every persona and annotate it
    Analyze(AnalyzeArgs),

    /// Remove all feedback from a document
    Clear {
        /// Text document
        document: PathBuf,
    },

    /// Print a document with its feedback inline
    Show {
        /// Text document
        document: PathBuf,
    },

    /// List the reviewing personas
    Personas,

    /// Show configuration sources and problems
    Config,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Text document to review
    pub document: PathBuf,

    /// Model provider (overrides config)
    #[arg(short, long, value_enum)]
    pub provider: Option<ProviderArg>,

    /// Model name (overrides config)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Directory with systemPrompt.txt and <persona>.txt prompt files
    #[arg(long, value_name = "DIR")]
    pub prompts: Option<PathBuf>,

    /// Output format (overrides config)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze_with_options() {
        let cli = Cli::try_parse_from([
            "sideview",
            "-vv",
            "analyze",
            "plan.txt",
            "--provider",
            "openrouter",
            "--model",
            "openai/gpt-4o-mini",
            "--output",
            "json",
            "--quiet",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.document, PathBuf::from("plan.txt"));
        assert_eq!(args.provider.map(ApiProvider::from), Some(ApiProvider::OpenRouter));
        assert_eq!(args.model.as_deref(), Some("openai/gpt-4o-mini"));
        assert_eq!(args.output, Some(OutputFormat::Json));
        assert!(args.quiet);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["sideview", "show", "plan.txt", "--no-config"]).unwrap();
        assert!(cli.no_config);
        assert!(matches!(cli.command, Command::Show { .. }));
    }

    #[test]
    fn test_analyze_requires_document() {
        assert!(Cli::try_parse_from(["sideview", "analyze"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
