use mood_client::ApiClient;
use mood_config::MoodConfig;
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::TaskCommands;
use crate::output::output;
use crate::progress::Progress;

/// Handle `moodtask task`.
pub async fn handle(
    action: &TaskCommands,
    config: &MoodConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let api = ApiClient::from_config(&config.api)?;
    match action {
        TaskCommands::Create {
            description,
            emotions,
        } => {
            let progress = Progress::spinner("creating task");
            let created = api.create_task_from_form(description, emotions).await;
            progress.finish_clear();
            match created? {
                Some(task) => output(&task, flags.format),
                None => output(&json!({ "created": true }), flags.format),
            }
        }
        TaskCommands::List => {
            let progress = Progress::spinner("loading tasks");
            let tasks = api.list_tasks().await;
            progress.finish_clear();
            output(&tasks?, flags.format)
        }
    }
}
