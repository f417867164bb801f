//! Device adapters.
//!
//! Exactly one backend is active at a time. Adapters own the full
//! device-to-world transformation; everything above this module consumes
//! the device-agnostic hand model only.

mod camera;
mod receiver;
mod skeletal;

pub use camera::CameraTracker;
pub use receiver::{CameraReceiver, RECEIVE_TIMEOUT};
pub use skeletal::{SkeletalBone, SkeletalFrame, SkeletalHand, SkeletalTracker};

#[cfg(test)]
pub use skeletal::make_native_hand;

use std::fmt;

use crate::hand::{Hand, Handedness};
use crate::player::PlayerFrame;

/// Which tracking backend drives the hand model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    /// Native skeletal tracking service, full pose with velocity.
    Skeletal,
    /// 2D camera estimator over UDP, positions only.
    Camera,
}

impl DeviceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Skeletal => "skeletal",
            Self::Camera => "camera",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The active tracking backend.
pub enum Tracker {
    Skeletal(SkeletalTracker),
    Camera(CameraTracker),
}

impl Tracker {
    pub fn device(&self) -> DeviceKind {
        match self {
            Self::Skeletal(_) => DeviceKind::Skeletal,
            Self::Camera(_) => DeviceKind::Camera,
        }
    }

    /// Rebuild hand state from whatever data arrived since the last frame.
    pub fn refresh(&mut self, player: &PlayerFrame) {
        match self {
            Self::Skeletal(t) => t.refresh(player),
            Self::Camera(t) => t.refresh(player),
        }
    }

    pub fn hand(&self, handedness: Handedness) -> Option<&Hand> {
        match self {
            Self::Skeletal(t) => t.hand(handedness),
            Self::Camera(t) => t.hand(handedness),
        }
    }

    /// Forward a native skeletal pose to the skeletal backend. Ignored
    /// (with a log line) while the camera backend is active.
    pub fn submit_skeletal(&mut self, frame: SkeletalFrame) {
        match self {
            Self::Skeletal(t) => t.submit_frame(frame),
            Self::Camera(_) => {
                tracing::debug!("skeletal frame ignored while camera tracking is active");
            }
        }
    }

    /// Whether the backend's data source is currently delivering. The
    /// skeletal service pushes frames in-process and counts as always
    /// streaming.
    pub fn is_streaming(&self) -> bool {
        match self {
            Self::Skeletal(_) => true,
            Self::Camera(t) => t.is_streaming(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_skeletal_reaches_skeletal_backend() {
        let mut tracker = Tracker::Skeletal(SkeletalTracker::new());
        tracker.submit_skeletal(SkeletalFrame {
            left: None,
            right: Some(make_native_hand()),
        });
        tracker.refresh(&PlayerFrame::default());
        assert!(tracker.hand(Handedness::Right).is_some());
        assert!(tracker.is_streaming());
    }

    #[test]
    fn submit_skeletal_is_ignored_on_camera_backend() {
        let mut tracker = Tracker::Camera(CameraTracker::detached());
        tracker.submit_skeletal(SkeletalFrame::default());
        tracker.refresh(&PlayerFrame::default());
        assert!(tracker.hand(Handedness::Right).is_none());
        assert_eq!(tracker.device(), DeviceKind::Camera);
    }
}
