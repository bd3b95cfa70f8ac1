//! # mood-workflow
//!
//! End-to-end capture, analyze, suggest workflow.
//!
//! [`WorkflowController`] owns the device session and the single
//! [`WorkflowState`] the user sees. A cycle moves through
//! `Ready -> Capturing -> Analyzing -> Suggesting -> Ready`; failures land in
//! a per-domain error slot and never end the workflow.
//!
//! ```no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use mood_capture::{StreamRequest, TestPatternCamera};
//! use mood_client::ApiClient;
//! use mood_config::MoodConfig;
//! use mood_workflow::WorkflowController;
//!
//! let config = MoodConfig::load(None)?;
//! let api = ApiClient::from_config(&config.api)?;
//! let workflow = WorkflowController::new(
//!     TestPatternCamera::new(),
//!     StreamRequest::default(),
//!     api,
//!     config.camera.ready_timeout(),
//! );
//! workflow.start().await?;
//! workflow.await_ready().await?;
//! let report = workflow.analyze().await?;
//! println!("{}: {}", report.analysis.dominant_emotion(), report.suggestion.headline());
//! workflow.stop().await;
//! # Ok(())
//! # }
//! ```

pub mod camera;
pub mod controller;
pub mod error;
pub mod state;

pub use camera::{ConfiguredCamera, ConfiguredStream, stream_request};
pub use controller::{CAMERA_ERROR_MESSAGE, CycleReport, NOT_READY_MESSAGE, WorkflowController};
pub use error::WorkflowError;
pub use state::{ErrorDomain, ErrorSlots, Phase, WorkflowState};
