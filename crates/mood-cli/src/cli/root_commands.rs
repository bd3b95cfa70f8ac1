use clap::{Args, Subcommand};
use mood_core::Emotion;
use std::path::PathBuf;

use crate::cli::subcommands::TaskCommands;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Capture frames, read the dominant emotion, and suggest a task.
    Analyze(AnalyzeArgs),
    /// Look up a task suggestion for an emotion.
    Suggest(SuggestArgs),
    /// Tasks stored by the task service.
    Task {
        #[command(subcommand)]
        action: TaskCommands,
    },
    /// List the emotion labels the service understands.
    Emotions,
}

#[derive(Clone, Debug, Args)]
pub struct AnalyzeArgs {
    /// Serve this image file instead of the configured camera.
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Number of capture, analyze, suggest cycles to run.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub cycles: u32,
}

#[derive(Clone, Debug, Args)]
pub struct SuggestArgs {
    /// Emotion label (case-insensitive).
    pub emotion: Emotion,
}
