use mood_config::MoodConfig;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    config: &MoodConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Analyze(args) => commands::analyze::handle(&args, config, flags).await,
        Commands::Suggest(args) => commands::suggest::handle(&args, config, flags).await,
        Commands::Task { action } => commands::task::handle(&action, config, flags).await,
        Commands::Emotions => commands::emotions::handle(flags),
    }
}
