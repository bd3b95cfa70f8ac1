use anyhow::Context;
use mood_config::MoodConfig;

use crate::cli::GlobalFlags;

/// Load `.env`, then the layered configuration plus any `--config` file.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<MoodConfig> {
    if let Some(path) = flags.config.as_deref() {
        anyhow::ensure!(path.is_file(), "config file {} does not exist", path.display());
    }
    let config = MoodConfig::load_with_dotenv(flags.config.as_deref())
        .context("failed to load moodtask configuration")?;
    tracing::debug!(
        base_url = %config.api.base_url,
        source = ?config.camera.source,
        "configuration loaded"
    );
    Ok(config)
}
