//! Pose-triple gesture evaluators.
//!
//! Every spell is driven by a gesture with three pose predicates: the
//! start pose arms it, the break pose aborts it, and the cast pose fires
//! it. Evaluators read hand state exclusively through [`HandQuery`] and
//! are device-specific where the two backends report different data (the
//! camera path has no velocity, so its gestures are orientation-only).

mod fireball;
mod force;
mod lightning;
mod shield;

pub use fireball::{FireballCamera, FireballSkeletal};
pub use force::{ForceLift, ForcePush, ForceStop};
pub use lightning::{LightningCamera, LightningSkeletal};
pub use shield::Shield;

use thiserror::Error;

use crate::query::HandQuery;
use crate::tracking::DeviceKind;

/// A gesture requested for a device that cannot express it.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{gesture} gesture is not available on the {device} device")]
pub struct UnsupportedGesture {
    pub gesture: &'static str,
    pub device: DeviceKind,
}

/// One gesture's three pose predicates. `now` is the session clock in
/// seconds; stateful gestures (charge timers) key off it.
///
/// Every evaluator treats a missing hand the fail-safe way: the start and
/// cast poses are never formed, and the break pose is.
pub trait Gesture {
    fn start_pose(&mut self, q: &HandQuery, now: f64) -> bool;
    fn break_pose(&mut self, q: &HandQuery, now: f64) -> bool;
    fn cast_pose(&mut self, q: &HandQuery, now: f64) -> bool;
}

impl core::fmt::Debug for dyn Gesture {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("dyn Gesture")
    }
}

// ── Factory ────────────────────────────────────────────────

pub fn fireball(device: DeviceKind) -> Result<Box<dyn Gesture>, UnsupportedGesture> {
    Ok(match device {
        DeviceKind::Skeletal => Box::new(FireballSkeletal::default()),
        DeviceKind::Camera => Box::new(FireballCamera::default()),
    })
}

pub fn lightning(device: DeviceKind) -> Result<Box<dyn Gesture>, UnsupportedGesture> {
    Ok(match device {
        DeviceKind::Skeletal => Box::new(LightningSkeletal::default()),
        DeviceKind::Camera => Box::new(LightningCamera::default()),
    })
}

/// The force gestures key off palm velocity, which the camera estimator
/// does not measure.
pub fn force_lift(device: DeviceKind) -> Result<Box<dyn Gesture>, UnsupportedGesture> {
    skeletal_only(device, "force lift", || Box::new(ForceLift::default()))
}

pub fn force_push(device: DeviceKind) -> Result<Box<dyn Gesture>, UnsupportedGesture> {
    skeletal_only(device, "force push", || Box::new(ForcePush::default()))
}

pub fn force_stop(device: DeviceKind) -> Result<Box<dyn Gesture>, UnsupportedGesture> {
    skeletal_only(device, "force stop", || Box::new(ForceStop::default()))
}

/// The shield pose is orientation-only and works on both backends.
pub fn shield(device: DeviceKind) -> Result<Box<dyn Gesture>, UnsupportedGesture> {
    let _ = device;
    Ok(Box::new(Shield::default()))
}

fn skeletal_only(
    device: DeviceKind,
    gesture: &'static str,
    build: impl FnOnce() -> Box<dyn Gesture>,
) -> Result<Box<dyn Gesture>, UnsupportedGesture> {
    match device {
        DeviceKind::Skeletal => Ok(build()),
        DeviceKind::Camera => Err(UnsupportedGesture { gesture, device }),
    }
}

/// Palm height above the player's base, in meters.
pub(crate) fn palm_height(q: &HandQuery, handedness: crate::hand::Handedness) -> f32 {
    q.palm_position(handedness).y - q.player().position.y
}

// ── Tests ──────────────────────────────────────────────────
