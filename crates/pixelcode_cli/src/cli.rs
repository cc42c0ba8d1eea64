//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use pixelcode_llms::Model;

/// Turn screenshots and prompts into HTML with streaming LLM completions
#[derive(Parser)]
#[command(name = "pixelcode", about, version, propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format: text (human-readable) or json (machine-readable)
    #[arg(short, long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Serve canned responses instead of calling providers (also MOCK=true)
    #[arg(long, global = true)]
    pub mock: bool,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    /// Colored terminal output for humans
    #[default]
    Text,
    /// Structured JSON for machine consumption
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate code with one or more models; several models run concurrently
    Generate(GenerateArgs),
    /// Run the multi-pass refinement loop on an Anthropic model
    Refine(RefineArgs),
    /// List supported models and their request parameters
    Models,
}

/// Where the conversation comes from.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// JSON file with OpenAI-style chat messages (system turn first)
    #[arg(long, conflicts_with_all = ["prompt", "system", "image"])]
    pub conversation: Option<PathBuf>,

    /// User instruction
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// System prompt (defaults to the built-in HTML/Tailwind prompt)
    #[arg(long)]
    pub system: Option<String>,

    /// Screenshot: local PNG/JPEG/GIF/WEBP file, http(s) URL or data URL
    #[arg(long)]
    pub image: Option<String>,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Model id, repeat for variants (e.g. -m gpt-4o-2024-11-20 -m claude-3-5-sonnet-20241022)
    #[arg(short, long = "model", required = true)]
    pub models: Vec<Model>,

    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Args, Debug)]
pub struct RefineArgs {
    /// Anthropic model id
    #[arg(short, long, default_value = "claude-3-5-sonnet-20241022")]
    pub model: Model,

    /// Number of request/response passes
    #[arg(long, default_value_t = 2)]
    pub passes: usize,

    /// Prefill each pass with a <thinking> section
    #[arg(long)]
    pub thinking: bool,

    /// Write per-pass artifacts under this directory (overrides IS_DEBUG_ENABLED/DEBUG_DIR)
    #[arg(long)]
    pub debug_dir: Option<PathBuf>,

    #[command(flatten)]
    pub input: InputArgs,
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
    fn test_generate_accepts_several_models() {
        let cli = Cli::try_parse_from([
            "pixelcode",
            "generate",
            "-m",
            "gpt-4o-2024-11-20",
            "--model",
            "claude-3-5-sonnet-20241022",
            "--prompt",
            "a todo app",
        ])
        .unwrap();
        match cli.command {
            Command::Generate(args) => {
                assert_eq!(
                    args.models,
                    vec![Model::Gpt4o20241120, Model::Claude35Sonnet20241022]
                );
                assert_eq!(args.input.prompt.as_deref(), Some("a todo app"));
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_unknown_model_rejected() {
        assert!(Cli::try_parse_from(["pixelcode", "generate", "-m", "gpt-5", "-p", "x"]).is_err());
    }

    #[test]
    fn test_refine_defaults() {
        let cli = Cli::try_parse_from(["pixelcode", "--mock", "refine", "-p", "x"]).unwrap();
        assert!(cli.mock);
        match cli.command {
            Command::Refine(args) => {
                assert_eq!(args.model, Model::Claude35Sonnet20241022);
                assert_eq!(args.passes, 2);
                assert!(!args.thinking);
            }
            _ => panic!("expected refine"),
        }
    }

    #[test]
    fn test_conversation_conflicts_with_prompt() {
        assert!(
            Cli::try_parse_from([
                "pixelcode",
                "generate",
                "-m",
                "deepseek-coder",
                "--conversation",
                "c.json",
                "--prompt",
                "x"
            ])
            .is_err()
        );
    }
}
