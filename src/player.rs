//! Player reference frame.
//!
//! Every component that needs the player's pose receives it explicitly per
//! tick; nothing reaches for global state.

use glam::{Quat, Vec3};

/// The player's pose for the current frame, in world space.
#[derive(Debug, Clone, Copy)]
pub struct PlayerFrame {
    /// Head/body origin position.
    pub position: Vec3,
    /// Body orientation.
    pub rotation: Quat,
    /// Whether the player is currently locomoting (suppresses some spells).
    pub moving: bool,
}

impl Default for PlayerFrame {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            moving: false,
        }
    }
}

impl PlayerFrame {
    /// Facing direction.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Lateral axis.
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Vertical axis.
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Transform a point from player-local space to world space.
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.rotation * p + self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_frame_axes() {
        let frame = PlayerFrame::default();
        assert_eq!(frame.forward(), Vec3::Z);
        assert_eq!(frame.right(), Vec3::X);
        assert_eq!(frame.up(), Vec3::Y);
    }

    #[test]
    fn transform_point_applies_rotation_then_translation() {
        let frame = PlayerFrame {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            moving: false,
        };
        let p = frame.transform_point(Vec3::Z);
        assert!((p - Vec3::new(2.0, 2.0, 3.0)).length() < 1e-5);
    }
}
