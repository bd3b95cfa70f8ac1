use clap::Subcommand;
use mood_core::Emotion;

/// Task commands.
#[derive(Clone, Debug, Subcommand)]
pub enum TaskCommands {
    /// Create a task.
    Create {
        #[arg(long)]
        description: String,
        /// Associated emotion; repeat for several.
        #[arg(long = "emotion", num_args = 1..)]
        emotions: Vec<Emotion>,
    },
    /// List tasks.
    List,
}
