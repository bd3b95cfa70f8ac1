use clap::Parser;
use std::path::PathBuf;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `moodtask` binary.
#[derive(Debug, Parser)]
#[command(name = "moodtask", version, about = "Read your mood from the camera, get a task for it")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Extra TOML config file layered over the project and user files
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            config: self.config.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use mood_core::Emotion;
    use pretty_assertions::assert_eq;

    use super::{Cli, Commands, OutputFormat};
    use crate::cli::subcommands::TaskCommands;

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["moodtask", "--format", "table", "--verbose", "emotions"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Table);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Emotions));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["moodtask", "emotions", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        assert!(Cli::try_parse_from(["moodtask", "--format", "xml", "emotions"]).is_err());
    }

    #[test]
    fn analyze_defaults_to_one_cycle() {
        let cli = Cli::try_parse_from(["moodtask", "analyze"]).expect("cli should parse");
        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.cycles, 1);
        assert!(args.image.is_none());
    }

    #[test]
    fn analyze_rejects_zero_cycles() {
        assert!(Cli::try_parse_from(["moodtask", "analyze", "--cycles", "0"]).is_err());
    }

    #[test]
    fn suggest_parses_emotion_case_insensitively() {
        let cli = Cli::try_parse_from(["moodtask", "suggest", "HAPPY"]).expect("cli should parse");
        let Commands::Suggest(args) = cli.command else {
            panic!("expected suggest");
        };
        assert_eq!(args.emotion, Emotion::Happy);
    }

    #[test]
    fn suggest_rejects_unknown_emotion() {
        assert!(Cli::try_parse_from(["moodtask", "suggest", "bored"]).is_err());
    }

    #[test]
    fn task_create_collects_repeated_emotions() {
        let cli = Cli::try_parse_from([
            "moodtask",
            "task",
            "create",
            "--description",
            "Take a walk",
            "--emotion",
            "sad",
            "--emotion",
            "angry",
        ])
        .expect("cli should parse");

        let Commands::Task {
            action: TaskCommands::Create { description, emotions },
        } = cli.command
        else {
            panic!("expected task create");
        };
        assert_eq!(description, "Take a walk");
        assert_eq!(emotions, vec![Emotion::Sad, Emotion::Angry]);
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from(["moodtask", "task", "list", "--config", "/tmp/mood.toml"])
            .expect("cli should parse");
        assert_eq!(
            cli.global_flags().config.as_deref(),
            Some(std::path::Path::new("/tmp/mood.toml"))
        );
    }
}
