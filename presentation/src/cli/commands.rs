//! CLI command definitions

use clap::{Parser, ValueEnum};
use council_domain::CouncilMode;
use std::path::PathBuf;

/// Output format for council results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// All three stages plus the aggregate ranking
    Full,
    /// Only the chairman's final answer
    Final,
    /// JSON output
    Json,
}

impl From<OutputFormat> for council_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => Self::Full,
            OutputFormat::Final => Self::Final,
            OutputFormat::Json => Self::Json,
        }
    }
}

/// Council mode selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// General questions, with web search for current events
    Chat,
    /// Programming questions judged on correctness and efficiency
    Code,
    /// Image generation and critique
    Image,
}

impl From<ModeArg> for CouncilMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Chat => CouncilMode::Chat,
            ModeArg::Code => CouncilMode::Code,
            ModeArg::Image => CouncilMode::Image,
        }
    }
}

/// CLI arguments for llm-council
#[derive(Parser, Debug)]
#[command(name = "llm-council")]
#[command(author, version, about = "LLM Council - Multiple LLMs answer, rank each other, and a chairman synthesizes")]
#[command(long_about = r#"
LLM Council asks a council of LLMs the same question and combines their work.

The process has three stages:
1. Collect Responses: All models answer your question in parallel
2. Peer Rankings: Each model ranks the anonymized answers
3. Chairman Synthesis: A chairman model writes the final answer

Configuration files are loaded from (in priority order):
1. COUNCIL_* environment variables
2. --config <path>     Explicit config file
3. ./council.toml      Project-level config
4. ~/.config/llm-council/config.toml   Global config

Example:
  llm-council "What's the best way to handle errors in Rust?"
  llm-council --mode code -m anthropic/claude-sonnet-4.5 -m qwen/qwen3-coder "Write a trie"
  llm-council --chat
"#)]
pub struct Cli {
    /// The question to ask the council (not required in chat mode)
    pub question: Option<String>,

    /// Council mode (defaults to council.default_mode from config)
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Models to include in the council (can be specified multiple times)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Vec<String>,

    /// Model to use as chairman for the final synthesis
    #[arg(long, value_name = "MODEL")]
    pub chairman: Option<String>,

    /// Output format (defaults to output.format from config, then final)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Print council events as `data: {json}` lines instead of formatted output
    #[arg(long)]
    pub stream: bool,

    /// Run inside a stored conversation
    #[arg(long, value_name = "ID")]
    pub conversation: Option<String>,

    /// List stored conversations and exit
    #[arg(long)]
    pub list_conversations: bool,

    /// Show a stored conversation and exit
    #[arg(long, value_name = "ID")]
    pub show_conversation: Option<String>,

    /// List models available on OpenRouter and exit
    #[arg(long)]
    pub list_models: bool,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

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
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_council_flags() {
        let cli = Cli::parse_from([
            "llm-council",
            "--mode",
            "code",
            "-m",
            "a/one",
            "-m",
            "b/two",
            "--chairman",
            "a/one",
            "-o",
            "json",
            "-vv",
            "How do I reverse a list?",
        ]);
        assert_eq!(cli.mode.map(CouncilMode::from), Some(CouncilMode::Code));
        assert_eq!(cli.model, vec!["a/one", "b/two"]);
        assert_eq!(cli.chairman.as_deref(), Some("a/one"));
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.question.as_deref(), Some("How do I reverse a list?"));
    }

    #[test]
    fn test_defaults_leave_config_in_charge() {
        let cli = Cli::parse_from(["llm-council", "--stream", "hello"]);
        assert!(cli.mode.is_none());
        assert!(cli.output.is_none());
        assert!(cli.stream);
        assert!(!cli.chat);
    }

    #[test]
    fn test_output_format_conversion() {
        assert_eq!(
            council_domain::OutputFormat::from(OutputFormat::Final),
            council_domain::OutputFormat::Final
        );
    }
}
