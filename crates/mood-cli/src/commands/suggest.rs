use mood_client::ApiClient;
use mood_config::MoodConfig;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SuggestArgs;
use crate::output::output;
use crate::progress::Progress;

/// Handle `moodtask suggest`.
///
/// Lookup failures are not errors here either: the fallback suggestion is
/// printed like any other.
pub async fn handle(
    args: &SuggestArgs,
    config: &MoodConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let api = ApiClient::from_config(&config.api)?;
    let progress = Progress::spinner(&format!("finding a task for {}", args.emotion));
    let suggestion = api.suggest_task(args.emotion).await;
    progress.finish_clear();
    output(&suggestion, flags.format)
}
