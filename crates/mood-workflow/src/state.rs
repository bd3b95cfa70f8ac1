//! The controller's aggregate, user-visible state.

use mood_capture::{FrameSummary, SessionId};
use mood_core::{EmotionAnalysis, TaskSuggestion};
use serde::Serialize;
use std::fmt;

/// Where the workflow is in its capture, analyze, suggest loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Acquiring,
    Ready,
    Capturing,
    Analyzing,
    Suggesting,
}

impl Phase {
    /// An analyze cycle owns the state.
    #[must_use]
    pub const fn is_cycle_in_flight(self) -> bool {
        matches!(self, Self::Capturing | Self::Analyzing | Self::Suggesting)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Acquiring => "acquiring",
            Self::Ready => "ready",
            Self::Capturing => "capturing",
            Self::Analyzing => "analyzing",
            Self::Suggesting => "suggesting",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Independent failure domains, each with its own error slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorDomain {
    Camera,
    Analysis,
    Network,
}

impl ErrorDomain {
    pub const ALL: [Self; 3] = [Self::Camera, Self::Analysis, Self::Network];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Camera => "camera",
            Self::Analysis => "analysis",
            Self::Network => "network",
        }
    }
}

impl fmt::Display for ErrorDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Latest error message per domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorSlots {
    pub camera: Option<String>,
    pub analysis: Option<String>,
    pub network: Option<String>,
}

impl ErrorSlots {
    #[must_use]
    pub fn get(&self, domain: ErrorDomain) -> Option<&str> {
        match domain {
            ErrorDomain::Camera => self.camera.as_deref(),
            ErrorDomain::Analysis => self.analysis.as_deref(),
            ErrorDomain::Network => self.network.as_deref(),
        }
    }

    pub fn set(&mut self, domain: ErrorDomain, message: impl Into<String>) {
        *self.slot_mut(domain) = Some(message.into());
    }

    pub fn clear(&mut self, domain: ErrorDomain) {
        *self.slot_mut(domain) = None;
    }

    pub fn clear_all(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.camera.is_none() && self.analysis.is_none() && self.network.is_none()
    }

    /// Occupied slots in domain order.
    pub fn iter(&self) -> impl Iterator<Item = (ErrorDomain, &str)> {
        ErrorDomain::ALL
            .into_iter()
            .filter_map(|domain| self.get(domain).map(|message| (domain, message)))
    }

    fn slot_mut(&mut self, domain: ErrorDomain) -> &mut Option<String> {
        match domain {
            ErrorDomain::Camera => &mut self.camera,
            ErrorDomain::Analysis => &mut self.analysis,
            ErrorDomain::Network => &mut self.network,
        }
    }
}

/// Snapshot of everything the workflow shows the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorkflowState {
    pub phase: Phase,
    /// The stream reported usable dimensions; capture is enabled.
    pub capture_ready: bool,
    pub session: Option<SessionId>,
    pub frame: Option<FrameSummary>,
    pub analysis: Option<EmotionAnalysis>,
    pub suggestion: Option<TaskSuggestion>,
    pub errors: ErrorSlots,
}

impl WorkflowState {
    /// Whether an analyze request would be accepted right now.
    #[must_use]
    pub const fn can_analyze(&self) -> bool {
        self.session.is_some() && self.capture_ready && !self.phase.is_cycle_in_flight()
    }

    /// Drop the results of the last cycle.
    pub(crate) fn clear_cycle(&mut self) {
        self.frame = None;
        self.analysis = None;
        self.suggestion = None;
    }

    /// Back to `Idle` with nothing to show.
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}
