use mood_core::Emotion;

use crate::cli::GlobalFlags;
use crate::output::output;

/// Handle `moodtask emotions`.
pub fn handle(flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&Emotion::ALL, flags.format)
}
