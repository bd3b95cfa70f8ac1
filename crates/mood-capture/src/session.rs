//! Device session lifecycle.
//!
//! [`DeviceSessionManager`] owns at most one [`DeviceSession`]. Starting a new
//! session releases the previous one first, and a session releases its stream
//! when dropped, so every exit path gives the device back.

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::backend::{CameraBackend, FrameSize, LiveStream, StreamRequest};
use crate::error::CaptureError;

/// Identifies one acquisition. Never reused within a manager.
pub type SessionId = u64;

/// One live acquisition of the capture device.
pub struct DeviceSession<S: LiveStream> {
    id: SessionId,
    stream: S,
    metadata: watch::Receiver<Option<FrameSize>>,
    ready: bool,
    cancel: CancellationToken,
}

impl<S: LiveStream> DeviceSession<S> {
    fn new(id: SessionId, stream: S) -> Self {
        let metadata = stream.metadata();
        Self {
            id,
            stream,
            metadata,
            ready: false,
            cancel: CancellationToken::new(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// Whether [`Self::mark_ready`] has succeeded.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.ready
    }

    /// The stream's natural size, if it has reported one.
    #[must_use]
    pub fn natural_size(&self) -> Option<FrameSize> {
        *self.metadata.borrow()
    }

    /// A fresh subscription to the readiness signal.
    #[must_use]
    pub fn readiness(&self) -> watch::Receiver<Option<FrameSize>> {
        self.metadata.clone()
    }

    /// Token cancelled when this session is released.
    #[must_use]
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Flip the readiness flag once the stream has usable dimensions.
    ///
    /// # Errors
    ///
    /// [`CaptureError::StreamNotReady`] if no usable size has been reported.
    pub fn mark_ready(&mut self) -> Result<FrameSize, CaptureError> {
        match self.natural_size() {
            Some(size) if size.is_usable() => {
                self.ready = true;
                Ok(size)
            }
            Some(size) => Err(CaptureError::StreamNotReady(format!(
                "stream reported unusable dimensions {size}"
            ))),
            None => Err(CaptureError::StreamNotReady(
                "stream has not reported its dimensions yet".to_string(),
            )),
        }
    }

    pub(crate) fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }
}

impl<S: LiveStream> Drop for DeviceSession<S> {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.stream.release();
        tracing::debug!(session = self.id, "device session released");
    }
}

/// Acquires and releases the capture device on behalf of one workflow.
pub struct DeviceSessionManager<B: CameraBackend> {
    backend: B,
    request: StreamRequest,
    session: Option<DeviceSession<B::Stream>>,
    next_id: SessionId,
}

impl<B: CameraBackend> DeviceSessionManager<B> {
    #[must_use]
    pub fn new(backend: B, request: StreamRequest) -> Self {
        Self {
            backend,
            request,
            session: None,
            next_id: 1,
        }
    }

    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Release any current session, then request the device.
    ///
    /// On failure no session exists afterwards.
    ///
    /// # Errors
    ///
    /// [`CaptureError::DeviceUnavailable`] if the backend refuses the device.
    pub async fn start(&mut self) -> Result<&DeviceSession<B::Stream>, CaptureError> {
        if self.stop() {
            tracing::debug!("replaced an active device session");
        }

        let stream = self.backend.open(self.request).await.map_err(|error| match error {
            CaptureError::DeviceUnavailable(_) => error,
            other => CaptureError::DeviceUnavailable(other.to_string()),
        })?;

        let id = self.next_id;
        self.next_id += 1;
        tracing::info!(
            session = id,
            requested = %self.request.resolution,
            "capture device acquired"
        );
        Ok(self.session.insert(DeviceSession::new(id, stream)))
    }

    /// Release the current session. Returns whether one was active.
    pub fn stop(&mut self) -> bool {
        self.session.take().is_some()
    }

    /// Mark the current session ready.
    ///
    /// # Errors
    ///
    /// [`CaptureError::StreamNotReady`] if there is no session or it has no
    /// usable dimensions yet.
    pub fn mark_ready(&mut self) -> Result<FrameSize, CaptureError> {
        self.session
            .as_mut()
            .ok_or_else(|| CaptureError::StreamNotReady("no active device session".to_string()))?
            .mark_ready()
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub const fn session(&self) -> Option<&DeviceSession<B::Stream>> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut DeviceSession<B::Stream>> {
        self.session.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_pattern::TestPatternCamera;

    #[tokio::test]
    async fn start_returns_unready_session() {
        let mut manager =
            DeviceSessionManager::new(TestPatternCamera::new(), StreamRequest::default());
        let session = manager.start().await.unwrap();
        assert!(!session.is_ready());
        assert_eq!(session.id(), 1);
        assert_eq!(manager.backend().open_streams(), 1);
    }

    #[tokio::test]
    async fn mark_ready_without_session_fails() {
        let mut manager =
            DeviceSessionManager::new(TestPatternCamera::new(), StreamRequest::default());
        assert!(matches!(
            manager.mark_ready(),
            Err(CaptureError::StreamNotReady(_))
        ));
    }

    #[tokio::test]
    async fn mark_ready_flips_flag() {
        let mut manager =
            DeviceSessionManager::new(TestPatternCamera::new(), StreamRequest::default());
        manager.start().await.unwrap();
        let size = manager.mark_ready().unwrap();
        assert_eq!(size, FrameSize::new(640, 480));
        assert!(manager.session().is_some_and(DeviceSession::is_ready));
    }

    #[tokio::test]
    async fn stop_cancels_session_token() {
        let mut manager =
            DeviceSessionManager::new(TestPatternCamera::new(), StreamRequest::default());
        let token = manager.start().await.unwrap().cancellation();
        assert!(!token.is_cancelled());
        assert!(manager.stop());
        assert!(token.is_cancelled());
        assert!(!manager.stop());
    }

    #[tokio::test]
    async fn session_ids_increase() {
        let mut manager =
            DeviceSessionManager::new(TestPatternCamera::new(), StreamRequest::default());
        let first = manager.start().await.unwrap().id();
        let second = manager.start().await.unwrap().id();
        assert!(second > first);
    }
}
