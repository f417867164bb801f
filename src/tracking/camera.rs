//! Camera-estimator backend: 2D hand data reconstructed into 3D.
//!
//! Consumes the textual wire payload produced by the external camera
//! estimator (see `receiver`), reconstructs up to 21 joints per hand into
//! the player's world frame, and builds hand model instances from fixed
//! joint-index pairs.

use glam::{Mat3, Quat, Vec3};
use tracing::warn;

use crate::hand::{Bone, BoneKind, Finger, FingerKind, Hand, Handedness, FINGER_COUNT};
use crate::player::PlayerFrame;

use super::receiver::CameraReceiver;

/// Joints per hand in the wire format.
pub const JOINT_COUNT: usize = 21;

/// Assumed source resolution of the estimator's camera image.
const SOURCE_WIDTH: f32 = 600.0;
const SOURCE_HEIGHT: f32 = 600.0;
/// Depth values are scaled down by this factor during normalization.
const DEPTH_SCALE: f32 = 1000.0;
/// The normalized range is too small for world units; joints are scaled up.
const HAND_SCALE: f32 = 3.0;
/// Empirically tuned lateral/vertical correction, in player axes.
const OFFSET_RIGHT: f32 = -0.8;
const OFFSET_UP: f32 = -0.9;
/// Reconstructed hands sit this far in front of the player's body.
const OFFSET_FORWARD: f32 = 1.0;

/// Wrist and knuckle landmarks that define the palm plane.
const WRIST: usize = 0;
const UNDER_INDEX: usize = 5;
const UNDER_PINKY: usize = 17;

// ── Wire payload parsing ───────────────────────────────────

/// Joint triples per hand, split on the hand-identifier tokens.
#[derive(Debug, Default, PartialEq)]
pub struct ParsedPayload {
    pub left: Vec<Vec3>,
    pub right: Vec<Vec3>,
}

/// Parse a wire payload into per-hand joint lists.
///
/// A `'R'` or `'L'` token introduces a run of flat `x,y,depth` float
/// triples consumed until the next identifier or end of payload. A token
/// that fails numeric parse is skipped with a logged warning; the rest of
/// the payload still parses. Depth is negated: the camera depth axis is
/// mirrored relative to world forward.
pub fn parse_payload(payload: &str) -> ParsedPayload {
    let mut parsed = ParsedPayload::default();
    let mut current: Option<Handedness> = None;
    let mut values: Vec<f32> = Vec::new();

    let mut flush = |hand: Option<Handedness>, values: &mut Vec<f32>| {
        let Some(hand) = hand else {
            values.clear();
            return;
        };
        let joints: Vec<Vec3> = values
            .chunks_exact(3)
            .map(|c| Vec3::new(c[0], c[1], -c[2]))
            .collect();
        if values.len() % 3 != 0 {
            warn!(
                hand = hand.as_str(),
                count = values.len(),
                "camera payload has a truncated joint triple"
            );
        }
        match hand {
            Handedness::Left => parsed.left = joints,
            Handedness::Right => parsed.right = joints,
        }
        values.clear();
    };

    for token in payload
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
    {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        match token {
            "'R'" => {
                flush(current, &mut values);
                current = Some(Handedness::Right);
            }
            "'L'" => {
                flush(current, &mut values);
                current = Some(Handedness::Left);
            }
            _ => match token.parse::<f32>() {
                Ok(v) => values.push(v),
                Err(_) => warn!(token, "skipping unparseable camera payload token"),
            },
        }
    }
    flush(current, &mut values);

    parsed
}

// ── Palm reconstruction ────────────────────────────────────

/// The three landmarks defining the palm plane, already in world space.
#[derive(Debug, Clone, Copy)]
struct Palm {
    wrist: Vec3,
    under_index: Vec3,
    under_pinky: Vec3,
    handedness: Handedness,
}

impl Palm {
    /// Palm center. As observed in the estimator's reference rig, the
    /// under-index landmark is weighted twice and under-pinky not at all;
    /// kept as-is rather than silently averaging all three points.
    fn center(&self) -> Vec3 {
        (self.wrist + 2.0 * self.under_index) / 3.0
    }

    /// Palm orientation from the three landmarks. The handedness
    /// coefficient flips the lateral and up axes so the derived rotation
    /// is consistent across both hands.
    fn rotation(&self) -> Quat {
        let qb = self.under_index - self.wrist;
        let qc = self.under_pinky - self.wrist;
        let n = qb.cross(qc);

        let unit_y = n.normalize_or_zero();
        let midpoint = (self.under_index + self.under_pinky) / 2.0;
        let unit_z = (midpoint - self.wrist).normalize_or_zero();
        let unit_x = unit_y.cross(unit_z);

        let coeff = match self.handedness {
            Handedness::Left => -1.0,
            Handedness::Right => 1.0,
        };
        look_rotation(-unit_x * coeff, unit_y * coeff)
    }
}

/// Rotation whose forward axis is `forward` and whose up axis is the
/// component of `up` orthogonal to it.
fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    let z = forward.normalize_or_zero();
    if z == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    let x = up.cross(z).normalize_or_zero();
    if x == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    let y = z.cross(x);
    Quat::from_mat3(&Mat3::from_cols(x, y, z))
}

// ── Reconstruction pipeline ────────────────────────────────

/// Transform raw joint samples into the player's world frame:
/// normalize by source resolution and depth scale, scale to world units,
/// move into player space, then apply the tuned lateral/vertical and
/// forward offsets.
fn to_world(joints: &mut [Vec3], player: &PlayerFrame) {
    let correction =
        player.right() * OFFSET_RIGHT + player.up() * OFFSET_UP + player.forward() * OFFSET_FORWARD;
    for joint in joints.iter_mut() {
        let normalized = Vec3::new(
            joint.x / SOURCE_WIDTH,
            joint.y / SOURCE_HEIGHT,
            joint.z / DEPTH_SCALE,
        );
        *joint = player.transform_point(normalized * HAND_SCALE) + correction;
    }
}

/// Bone segments from fixed joint-index pairs: the thumb has three, every
/// other finger four with a metacarpal rooted at the wrist joint.
fn build_finger(joints: &[Vec3], kind: FingerKind) -> Finger {
    let chain: [usize; 4] = match kind {
        // The first index is unused for the thumb (no metacarpal root).
        FingerKind::Thumb => [1, 1, 2, 3],
        FingerKind::Index => [5, 6, 7, 8],
        FingerKind::Middle => [9, 10, 11, 12],
        FingerKind::Ring => [13, 14, 15, 16],
        FingerKind::Pinky => [17, 18, 19, 20],
    };
    let bone = |a: usize, b: usize, bone_kind: BoneKind| {
        Bone::new(joints[a], joints[b], bone_kind)
    };
    match kind {
        FingerKind::Thumb => Finger::new(
            None,
            bone(1, 2, BoneKind::Proximal),
            bone(2, 3, BoneKind::Intermediate),
            bone(3, 4, BoneKind::Distal),
            kind,
        ),
        _ => Finger::new(
            Some(bone(WRIST, chain[0], BoneKind::Metacarpal)),
            bone(chain[0], chain[1], BoneKind::Proximal),
            bone(chain[1], chain[2], BoneKind::Intermediate),
            bone(chain[2], chain[3], BoneKind::Distal),
            kind,
        ),
    }
}

fn build_hand(joints: &[Vec3], handedness: Handedness) -> Hand {
    let palm = Palm {
        wrist: joints[WRIST],
        under_index: joints[UNDER_INDEX],
        under_pinky: joints[UNDER_PINKY],
        handedness,
    };
    let rotation = palm.rotation();
    let fingers: [Finger; FINGER_COUNT] = FingerKind::ALL.map(|kind| build_finger(joints, kind));
    Hand {
        handedness,
        palm_position: palm.center(),
        // The estimator reports positions only; velocity is unmeasured.
        palm_velocity: Vec3::ZERO,
        palm_normal: rotation * Vec3::NEG_Y,
        direction: rotation * Vec3::Z,
        wrist: joints[WRIST],
        rotation,
        elbow: None,
        fingers,
    }
}

fn reconstruct(mut joints: Vec<Vec3>, handedness: Handedness, player: &PlayerFrame) -> Option<Hand> {
    if joints.is_empty() {
        return None;
    }
    if joints.len() < JOINT_COUNT {
        warn!(
            hand = handedness.as_str(),
            count = joints.len(),
            "camera payload has too few joints; dropping hand"
        );
        return None;
    }
    to_world(&mut joints, player);
    Some(build_hand(&joints, handedness))
}

// ── Adapter ────────────────────────────────────────────────

/// Camera backend: pulls the latest wire payload and rebuilds both hands.
pub struct CameraTracker {
    receiver: Option<CameraReceiver>,
    left: Option<Hand>,
    right: Option<Hand>,
}

impl CameraTracker {
    /// Bind the UDP receiver and start listening.
    pub fn bind(port: u16) -> anyhow::Result<Self> {
        Ok(Self {
            receiver: Some(CameraReceiver::bind(port)?),
            left: None,
            right: None,
        })
    }

    /// Tracker without a network receiver; payloads are fed via `ingest`.
    pub fn detached() -> Self {
        Self {
            receiver: None,
            left: None,
            right: None,
        }
    }

    /// Whether fresh payloads are arriving on the receiver.
    pub fn is_streaming(&self) -> bool {
        self.receiver.as_ref().is_some_and(|r| r.is_streaming())
    }

    /// Rebuild both hands from the latest payload; no payload within the
    /// receive timeout means both hands are absent this frame.
    pub fn refresh(&mut self, player: &PlayerFrame) {
        match self.receiver.as_ref().and_then(|r| r.latest()) {
            Some(payload) => self.ingest(&payload, player),
            None => {
                self.left = None;
                self.right = None;
            }
        }
    }

    /// Decode one payload and rebuild hand state from it.
    pub fn ingest(&mut self, payload: &str, player: &PlayerFrame) {
        if payload.trim() == "[]" {
            self.left = None;
            self.right = None;
            return;
        }
        let parsed = parse_payload(payload);
        self.left = reconstruct(parsed.left, Handedness::Left, player);
        self.right = reconstruct(parsed.right, Handedness::Right, player);
    }

    pub fn hand(&self, handedness: Handedness) -> Option<&Hand> {
        match handedness {
            Handedness::Left => self.left.as_ref(),
            Handedness::Right => self.right.as_ref(),
        }
    }
}

// ── Test helpers ───────────────────────────────────────────

/// Encode joints into the wire format for one hand.
#[cfg(test)]
pub fn encode_payload(hand: char, joints: &[(f32, f32, f32)]) -> String {
    let mut out = format!("['{hand}'");
    for (x, y, z) in joints {
        out.push_str(&format!(",{x},{y},{z}"));
    }
    out.push(']');
    out
}

/// A flat synthetic hand in source-image coordinates: wrist at the bottom,
/// fingers fanning upward, all at depth zero.
#[cfg(test)]
pub fn synthetic_joints() -> Vec<(f32, f32, f32)> {
    let mut joints = vec![(300.0, 300.0, 0.0)]; // wrist
    // Thumb: 1-4.
    for i in 1..=4 {
        joints.push((300.0 - 15.0 * i as f32, 300.0 + 20.0 * i as f32, 0.0));
    }
    // Index, middle, ring, pinky: bases at 5, 9, 13, 17, straight up.
    for f in 0..4 {
        let base_x = 330.0 - 20.0 * f as f32;
        for i in 0..4 {
            joints.push((base_x, 360.0 + 25.0 * i as f32, 0.0));
        }
    }
    assert_eq!(joints.len(), JOINT_COUNT);
    joints
}

// ── Tests ──────────────────────────────────────────────────
