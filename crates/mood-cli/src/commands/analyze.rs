use anyhow::Context;
use mood_capture::{CameraBackend, SessionId};
use mood_client::ApiClient;
use mood_config::{CameraSource, MoodConfig};
use mood_core::{Emotion, TaskSuggestion};
use mood_workflow::{ConfiguredCamera, CycleReport, WorkflowController, stream_request};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AnalyzeArgs;
use crate::output::output;
use crate::progress::Progress;

/// One analyze cycle as printed.
#[derive(Debug, Serialize)]
struct CycleView {
    cycle: u32,
    session: SessionId,
    frame: String,
    dominant_emotion: Emotion,
    score: f64,
    suggested_task: Option<String>,
    message: String,
    emotions: BTreeMap<Emotion, f64>,
}

impl CycleView {
    fn new(cycle: u32, report: CycleReport) -> Self {
        let CycleReport {
            session,
            frame,
            analysis,
            suggestion,
        } = report;
        let TaskSuggestion {
            suggested_task,
            message,
        } = suggestion;
        Self {
            cycle,
            session,
            frame: format!("{}x{}", frame.width, frame.height),
            dominant_emotion: analysis.dominant_emotion(),
            score: analysis.dominant_score(),
            suggested_task: suggested_task.map(|task| task.description),
            message,
            emotions: analysis.emotions().clone(),
        }
    }
}

/// Handle `moodtask analyze`.
///
/// The device is released before returning, whatever the outcome.
pub async fn handle(
    args: &AnalyzeArgs,
    config: &MoodConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let mut camera_config = config.camera.clone();
    if let Some(image) = &args.image {
        camera_config.source = CameraSource::StillImage;
        camera_config.image_path = image.display().to_string();
    }

    let camera = ConfiguredCamera::from_config(&camera_config)?;
    let api = ApiClient::from_config(&config.api)?;
    let workflow = WorkflowController::new(
        camera,
        stream_request(&camera_config),
        api,
        camera_config.ready_timeout(),
    );

    let result = run_cycles(&workflow, args.cycles).await;
    workflow.stop().await;

    let views = result?;
    if let [single] = views.as_slice() {
        output(single, flags.format)
    } else {
        output(&views, flags.format)
    }
}

async fn run_cycles<B: CameraBackend>(
    workflow: &WorkflowController<B>,
    cycles: u32,
) -> anyhow::Result<Vec<CycleView>> {
    let progress = Progress::spinner("starting camera");

    if let Err(error) = workflow.start().await {
        progress.finish_err("camera unavailable");
        return Err(error).context(mood_workflow::CAMERA_ERROR_MESSAGE);
    }

    progress.set_message("waiting for video");
    let size = workflow.await_ready().await.inspect_err(|_| {
        progress.finish_err("video never became ready");
    })?;
    tracing::debug!(%size, "camera ready");

    let mut views = Vec::with_capacity(usize::try_from(cycles).unwrap_or_default());
    for cycle in 1..=cycles {
        progress.set_message(&format!("analyzing frame {cycle}/{cycles}"));
        match workflow.analyze().await {
            Ok(report) => views.push(CycleView::new(cycle, report)),
            Err(error) => {
                progress.finish_err("analysis failed");
                let state = workflow.snapshot();
                let detail = state
                    .errors
                    .iter()
                    .map(|(domain, message)| format!("{domain} error: {message}"))
                    .collect::<Vec<_>>()
                    .join("; ");
                if detail.is_empty() {
                    return Err(error.into());
                }
                anyhow::bail!("cycle {cycle} failed: {detail}");
            }
        }
    }

    progress.finish_clear();
    Ok(views)
}
