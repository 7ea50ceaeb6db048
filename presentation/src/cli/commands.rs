//! CLI command definitions

use clap::{Parser, ValueEnum};
use consensus_domain::OutputFormat;
use std::path::PathBuf;

/// Output format for consensus results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputArg {
    /// Markdown confidence assessment
    Markdown,
    /// Colored one-screen summary
    Summary,
    /// JSON output
    Json,
}

impl From<OutputArg> for OutputFormat {
    fn from(arg: OutputArg) -> Self {
        match arg {
            OutputArg::Markdown => OutputFormat::Markdown,
            OutputArg::Summary => OutputFormat::Summary,
            OutputArg::Json => OutputFormat::Json,
        }
    }
}

/// CLI arguments for paper-consensus
#[derive(Parser, Debug)]
#[command(name = "paper-consensus")]
#[command(author, version, about = "Run an analysis prompt N times and rate how stable the findings are")]
#[command(long_about = r#"
paper-consensus sends the same analysis prompt to an LLM several times,
extracts metrics and quotes from every response, and reports how stable
each finding is across runs (HIGH / MEDIUM / LOW / UNKNOWN).

Stages pick the extractors and the default run count:
  hunt_patterns   effect sizes (r, OR, beta, ...)
  mine_qual       attributed quotes
  verify_claims   effect sizes, final check

Configuration files are loaded from (in priority order):
1. PAPER_CONSENSUS_* environment variables
2. --config <path>        Explicit config file
3. ./consensus.toml       Project-level config
4. ~/.config/paper-consensus/config.toml   Global config

Example:
  paper-consensus --stage hunt_patterns --data-file survey.csv "Report effect sizes"
  paper-consensus --stage mine_qual -n 5 --prompt-file mine.md --data-file interviews.txt
"#)]
pub struct Cli {
    /// Analysis prompt (or use --prompt-file)
    #[arg(required_unless_present_any = ["prompt_file", "show_config"])]
    pub prompt: Option<String>,

    /// Read the analysis prompt from a file
    #[arg(long, value_name = "PATH", conflicts_with = "prompt")]
    pub prompt_file: Option<PathBuf>,

    /// Read the system prompt from a file
    #[arg(long, value_name = "PATH")]
    pub system_file: Option<PathBuf>,

    /// Data appended to the prompt under a DATA: header
    #[arg(long, value_name = "PATH")]
    pub data_file: Option<PathBuf>,

    /// Pipeline stage (hunt_patterns, mine_qual, verify_claims)
    #[arg(short, long, default_value = "hunt_patterns")]
    pub stage: String,

    /// Number of runs (defaults to the stage's configured count)
    #[arg(short = 'n', long = "runs", value_name = "N")]
    pub runs: Option<usize>,

    /// LLM provider (anthropic, openai)
    #[arg(short, long)]
    pub provider: Option<String>,

    /// Model identifier (defaults to the provider's configured model)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Output format (defaults to the configured format)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputArg>,

    /// Append the result as a JSON line to this file
    #[arg(long, value_name = "PATH")]
    pub record: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["paper-consensus", "Report effect sizes"]).unwrap();
        assert_eq!(cli.prompt.as_deref(), Some("Report effect sizes"));
        assert_eq!(cli.stage, "hunt_patterns");
        assert_eq!(cli.runs, None);
        assert_eq!(cli.output, None);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_full_invocation() {
        let cli = Cli::try_parse_from([
            "paper-consensus",
            "--prompt-file",
            "mine.md",
            "--data-file",
            "interviews.txt",
            "--stage",
            "mine_qual",
            "-n",
            "5",
            "--provider",
            "openai",
            "--output",
            "json",
            "--record",
            "runs.jsonl",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.prompt, None);
        assert_eq!(cli.prompt_file, Some(PathBuf::from("mine.md")));
        assert_eq!(cli.stage, "mine_qual");
        assert_eq!(cli.runs, Some(5));
        assert_eq!(cli.provider.as_deref(), Some("openai"));
        assert_eq!(cli.output.map(OutputFormat::from), Some(OutputFormat::Json));
        assert_eq!(cli.record, Some(PathBuf::from("runs.jsonl")));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_prompt_required() {
        assert!(Cli::try_parse_from(["paper-consensus"]).is_err());
        assert!(Cli::try_parse_from(["paper-consensus", "--show-config"]).is_ok());
    }
}
