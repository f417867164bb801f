//! Outbound collaborator seams.
//!
//! The core never renders, plays audio, or mutates scene physics itself;
//! it emits typed commands through these traits and the embedding engine
//! decides what they look like. The logging implementations make the demo
//! binary observable without any engine attached.

use glam::Vec3;
use tracing::{debug, info};

use crate::aim::TargetId;

/// Visual side effects requested by spells, one command per frame event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectCommand {
    /// Conjuring feedback smoke at the casting palm.
    SpawnSmoke { at: Vec3 },
    MoveSmoke { to: Vec3 },
    /// Fade the smoke out over the given duration instead of cutting it.
    FadeSmoke { secs: f32 },
    /// Lightning bolt between two points, with a beam width.
    Bolt { start: Vec3, end: Vec3, width: f32 },
    ClearBolt,
    /// Show or hide the aim indicator line.
    AimIndicator { visible: bool },
    LaunchProjectile { origin: Vec3, velocity: Vec3 },
    /// Shield mesh stretched over the forearms: left elbow, left wrist,
    /// right elbow, right wrist.
    RaiseShield { points: [Vec3; 4] },
    MoveShield { points: [Vec3; 4] },
    DropShield,
    /// Telekinesis: pull the held target toward a point.
    HoldAt { target: TargetId, position: Vec3 },
    Impulse { target: TargetId, impulse: Vec3 },
    /// Zero the target's motion.
    Halt { target: TargetId },
    /// Run the chain-lightning damage reaction on the target.
    Electrify { target: TargetId },
}

pub trait EffectSink {
    fn submit(&mut self, cmd: EffectCommand);
}

/// Named one-shot and loopable clips.
pub trait AudioSink {
    fn play(&mut self, clip: &'static str);
    /// Spatialized one-shot at a world position.
    fn play_at(&mut self, clip: &'static str, at: Vec3);
    fn stop(&mut self, clip: &'static str);
}

/// Tutorial checkpoint control, driven by confirmation gestures.
pub trait CheckpointSink {
    /// Player confirmed the current step.
    fn advance(&mut self);
    /// Player asked for the current step again.
    fn repeat(&mut self);
}

// ── Logging implementations ────────────────────────────────

/// Collaborator that logs every command, for the demo binary.
#[derive(Default)]
pub struct LogCollab;

impl EffectSink for LogCollab {
    fn submit(&mut self, cmd: EffectCommand) {
        debug!(?cmd, "effect");
    }
}

impl AudioSink for LogCollab {
    fn play(&mut self, clip: &'static str) {
        debug!(clip, "audio play");
    }

    fn play_at(&mut self, clip: &'static str, at: Vec3) {
        debug!(clip, ?at, "audio play at");
    }

    fn stop(&mut self, clip: &'static str) {
        debug!(clip, "audio stop");
    }
}

impl CheckpointSink for LogCollab {
    fn advance(&mut self) {
        info!("checkpoint advanced");
    }

    fn repeat(&mut self) {
        info!("checkpoint repeated");
    }
}

// ── Test recorder ──────────────────────────────────────────

/// Captures every emitted command for assertions.
#[cfg(test)]
#[derive(Default)]
pub struct Recorder {
    pub effects: Vec<EffectCommand>,
    pub played: Vec<&'static str>,
    pub stopped: Vec<&'static str>,
    pub advanced: usize,
    pub repeated: usize,
}

#[cfg(test)]
impl Recorder {
    pub fn has_effect(&self, pred: impl Fn(&EffectCommand) -> bool) -> bool {
        self.effects.iter().any(pred)
    }
}

#[cfg(test)]
impl EffectSink for Recorder {
    fn submit(&mut self, cmd: EffectCommand) {
        self.effects.push(cmd);
    }
}

#[cfg(test)]
impl AudioSink for Recorder {
    fn play(&mut self, clip: &'static str) {
        self.played.push(clip);
    }

    fn play_at(&mut self, clip: &'static str, _at: Vec3) {
        self.played.push(clip);
    }

    fn stop(&mut self, clip: &'static str) {
        self.stopped.push(clip);
    }
}

#[cfg(test)]
impl CheckpointSink for Recorder {
    fn advance(&mut self) {
        self.advanced += 1;
    }

    fn repeat(&mut self) {
        self.repeated += 1;
    }
}
