//! The capture, analyze, suggest state machine.
//!
//! State lives behind a plain mutex that is never held across an await; the
//! device manager lives behind an async mutex because acquisition awaits.
//! Lock order is devices, then state. Anything that changes the session
//! updates the state before releasing the device lock.
//!
//! An analyze cycle remembers the session it started on and that session's
//! cancellation token. Every write it makes re-checks both, so a cycle
//! overtaken by `stop` or a restart ends with [`WorkflowError::Superseded`]
//! and leaves the state alone.

use mood_capture::{
    CameraBackend, CaptureError, DeviceSessionManager, FrameSize, FrameSummary, SessionId,
    StreamRequest, encode_png, grab_raster,
};
use mood_client::ApiClient;
use mood_core::{EmotionAnalysis, TaskSuggestion};
use serde::Serialize;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::error::WorkflowError;
use crate::state::{ErrorDomain, Phase, WorkflowState};

/// Shown when the device cannot be acquired.
pub const CAMERA_ERROR_MESSAGE: &str =
    "Could not access camera. Please ensure permissions are granted.";

/// Shown when analyze is requested before capture is enabled.
pub const NOT_READY_MESSAGE: &str =
    "Camera not ready, stream not available, or video metadata not loaded.";

/// Everything one successful analyze cycle produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleReport {
    pub session: SessionId,
    pub frame: FrameSummary,
    pub analysis: EmotionAnalysis,
    pub suggestion: TaskSuggestion,
}

/// Orchestrates device sessions, capture, analysis, and suggestion.
///
/// Cheap to clone; clones drive the same workflow.
pub struct WorkflowController<B: CameraBackend> {
    inner: Arc<Inner<B>>,
}

impl<B: CameraBackend> Clone for WorkflowController<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<B: CameraBackend> {
    devices: tokio::sync::Mutex<DeviceSessionManager<B>>,
    state: Mutex<WorkflowState>,
    api: ApiClient,
    ready_timeout: Duration,
}

impl<B: CameraBackend> WorkflowController<B> {
    #[must_use]
    pub fn new(
        backend: B,
        request: StreamRequest,
        api: ApiClient,
        ready_timeout: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                devices: tokio::sync::Mutex::new(DeviceSessionManager::new(backend, request)),
                state: Mutex::new(WorkflowState::default()),
                api,
                ready_timeout,
            }),
        }
    }

    /// A copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> WorkflowState {
        self.state().clone()
    }

    /// Acquire the device, replacing any current session.
    ///
    /// Clears previous results and errors first. The new session is not
    /// capture-ready until [`Self::await_ready`] succeeds.
    ///
    /// # Errors
    ///
    /// [`WorkflowError::Capture`] with [`CaptureError::DeviceUnavailable`];
    /// the camera error slot is set and the workflow is `Idle`.
    pub async fn start(&self) -> Result<SessionId, WorkflowError> {
        let mut devices = self.inner.devices.lock().await;
        {
            let mut state = self.state();
            state.reset();
            state.phase = Phase::Acquiring;
        }

        let acquired = devices.start().await.map(|session| session.id());

        let mut state = self.state();
        let outcome = match acquired {
            Ok(id) => {
                state.phase = Phase::Ready;
                state.session = Some(id);
                state.errors.clear(ErrorDomain::Camera);
                tracing::debug!(session = id, "workflow: acquiring -> ready");
                Ok(id)
            }
            Err(error) => {
                state.reset();
                state.errors.set(ErrorDomain::Camera, CAMERA_ERROR_MESSAGE);
                tracing::warn!(%error, "camera could not be acquired");
                Err(error.into())
            }
        };
        drop(state);
        drop(devices);
        outcome
    }

    /// Wait for the stream to report usable dimensions, then enable capture.
    ///
    /// # Errors
    ///
    /// - [`CaptureError::StreamNotReady`] if there is no session or the
    ///   signal does not arrive within the ready timeout (camera slot set).
    /// - [`WorkflowError::Superseded`] if the session goes away meanwhile.
    pub async fn await_ready(&self) -> Result<FrameSize, WorkflowError> {
        let (id, mut readiness) = {
            let devices = self.inner.devices.lock().await;
            let session = devices.session().ok_or_else(|| {
                CaptureError::StreamNotReady("no active capture session".to_string())
            })?;
            (session.id(), session.readiness())
        };

        let waited = tokio::time::timeout(self.inner.ready_timeout, async {
            readiness
                .wait_for(|size| size.is_some_and(FrameSize::is_usable))
                .await
                .map(|size| *size)
        })
        .await;

        let mut devices = self.inner.devices.lock().await;
        let current = devices.session().map(|session| session.id()) == Some(id);
        let marked = match waited {
            Ok(Ok(_)) if current => devices.mark_ready(),
            Ok(_) => return Err(WorkflowError::Superseded),
            Err(_) => Err(CaptureError::StreamNotReady(format!(
                "no usable dimensions reported within {}s",
                self.inner.ready_timeout.as_secs_f32()
            ))),
        };

        let mut state = self.state();
        if state.session != Some(id) {
            return Err(WorkflowError::Superseded);
        }
        let outcome = match marked {
            Ok(size) => {
                state.capture_ready = true;
                state.errors.clear(ErrorDomain::Camera);
                tracing::debug!(session = id, %size, "capture enabled");
                Ok(size)
            }
            Err(error) => {
                state.errors.set(ErrorDomain::Camera, error.to_string());
                Err(error.into())
            }
        };
        drop(state);
        drop(devices);
        outcome
    }

    /// Run one capture, analyze, suggest cycle.
    ///
    /// Suggestion failures never fail the cycle; they show up as the
    /// fallback suggestion.
    ///
    /// # Errors
    ///
    /// - [`WorkflowError::Busy`] if a cycle is already running (state untouched).
    /// - [`WorkflowError::Capture`] if capture is not enabled or the frame
    ///   cannot be taken (analysis slot set).
    /// - [`WorkflowError::Api`] if analysis fails (network or analysis slot set).
    /// - [`WorkflowError::Superseded`] if the session is stopped or replaced
    ///   mid-cycle.
    pub async fn analyze(&self) -> Result<CycleReport, WorkflowError> {
        let id = self.claim_cycle()?;
        let _guard = CycleGuard {
            state: &self.inner.state,
            session: id,
        };

        let (token, raster) = {
            let mut devices = self.inner.devices.lock().await;
            let session = devices
                .session_mut()
                .filter(|session| session.id() == id)
                .ok_or(WorkflowError::Superseded)?;
            (session.cancellation(), grab_raster(session))
        };

        let raster = match raster {
            Ok(raster) => raster,
            Err(error) => return self.fail(id, &token, error.into()),
        };
        let frame = match until_cancelled(&token, encode_png(raster)).await? {
            Ok(frame) => frame,
            Err(error) => return self.fail(id, &token, error.into()),
        };
        let summary = frame.summary();
        self.commit(id, &token, |state| {
            state.frame = Some(summary);
            state.phase = Phase::Analyzing;
        })?;

        let upload = self.inner.api.analyze_frame(frame.into_png());
        let analysis = match until_cancelled(&token, upload).await? {
            Ok(analysis) => analysis,
            Err(error) => return self.fail(id, &token, error.into()),
        };
        self.commit(id, &token, |state| {
            state.analysis = Some(analysis.clone());
            state.errors.clear(ErrorDomain::Analysis);
            state.errors.clear(ErrorDomain::Network);
            state.phase = Phase::Suggesting;
        })?;

        let suggestion = until_cancelled(
            &token,
            self.inner.api.suggest_task(analysis.dominant_emotion()),
        )
        .await?;
        self.commit(id, &token, |state| {
            state.suggestion = Some(suggestion.clone());
            state.phase = Phase::Ready;
        })?;

        tracing::debug!(
            session = id,
            dominant = %analysis.dominant_emotion(),
            "analysis cycle complete"
        );
        Ok(CycleReport {
            session: id,
            frame: summary,
            analysis,
            suggestion,
        })
    }

    /// Release the device and clear all results and errors.
    ///
    /// Returns whether a session was active. Safe to call at any time.
    pub async fn stop(&self) -> bool {
        let mut devices = self.inner.devices.lock().await;
        let released = devices.stop();
        self.state().reset();
        drop(devices);
        if released {
            tracing::debug!("workflow: stopped");
        }
        released
    }

    fn state(&self) -> MutexGuard<'_, WorkflowState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Check preconditions and move to `Capturing` in one step.
    fn claim_cycle(&self) -> Result<SessionId, WorkflowError> {
        let mut state = self.state();
        if state.phase.is_cycle_in_flight() {
            tracing::debug!(phase = %state.phase, "analyze ignored: cycle in flight");
            return Err(WorkflowError::Busy);
        }
        let Some(id) = state.session.filter(|_| state.capture_ready) else {
            state.errors.set(ErrorDomain::Analysis, NOT_READY_MESSAGE);
            return Err(CaptureError::StreamNotReady(NOT_READY_MESSAGE.to_string()).into());
        };
        state.clear_cycle();
        state.errors.clear(ErrorDomain::Analysis);
        state.errors.clear(ErrorDomain::Network);
        state.phase = Phase::Capturing;
        Ok(id)
    }

    /// Apply `update` if the cycle still owns the state.
    fn commit(
        &self,
        id: SessionId,
        token: &CancellationToken,
        update: impl FnOnce(&mut WorkflowState),
    ) -> Result<(), WorkflowError> {
        let mut state = self.state();
        if token.is_cancelled() || state.session != Some(id) {
            return Err(WorkflowError::Superseded);
        }
        update(&mut state);
        Ok(())
    }

    /// Record a cycle failure in its domain's slot and return to `Ready`.
    fn fail<T>(
        &self,
        id: SessionId,
        token: &CancellationToken,
        error: WorkflowError,
    ) -> Result<T, WorkflowError> {
        if let Some(domain) = error.cycle_domain() {
            let message = error.to_string();
            self.commit(id, token, |state| {
                state.errors.set(domain, message);
                state.phase = Phase::Ready;
            })?;
            tracing::warn!(%domain, %error, "analysis cycle failed");
        }
        Err(error)
    }
}

/// Race `work` against the session's cancellation.
async fn until_cancelled<T>(
    token: &CancellationToken,
    work: impl Future<Output = T>,
) -> Result<T, WorkflowError> {
    tokio::select! {
        biased;
        () = token.cancelled() => Err(WorkflowError::Superseded),
        out = work => Ok(out),
    }
}

/// Returns the workflow to `Ready` if a cycle ends without doing so itself,
/// e.g. when its future is dropped.
struct CycleGuard<'a> {
    state: &'a Mutex<WorkflowState>,
    session: SessionId,
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.session == Some(self.session) && state.phase.is_cycle_in_flight() {
            state.phase = Phase::Ready;
        }
    }
}
