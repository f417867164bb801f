//! Targeting: where a cast spell goes.
//!
//! Two strategies, matched to what each tracking backend can deliver. The
//! skeletal backend is precise enough for ray aiming along the left index
//! finger; the camera backend snap-targets the best enemy inside a swept
//! volume around the left palm normal instead.
//!
//! Scene geometry stays behind the [`Scene`] trait; the embedding engine
//! owns colliders and layers, this module only asks questions about them.

use glam::Vec3;

use crate::hand::{FingerKind, Handedness};
use crate::query::HandQuery;
use crate::tracking::DeviceKind;

/// Volume aiming sweep.
pub const SPHERE_CAST_RADIUS: f32 = 3.0;
pub const SPHERE_CAST_RANGE: f32 = 50.0;

/// Angle slack (degrees) inside which two volume-aim candidates count as
/// tied and the nearer one wins.
pub const ANGLE_EPS_DEG: f32 = 1e-3;

/// Enemy pivots sit at the ground; aim points are lifted to the torso.
const ENEMY_AIM_LIFT: f32 = 1.0;

/// Stable identity of a scene entity, assigned by the embedding engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetId(pub u64);

/// What the scene knows about a hit entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetInfo {
    pub id: TargetId,
    pub position: Vec3,
    pub is_enemy: bool,
    /// Downed enemies are no longer valid snap targets.
    pub is_downed: bool,
    pub is_grabbable: bool,
}

/// One raycast result: the hit point, plus the entity when the ray hit
/// something with an identity (terrain hits carry none).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec3,
    pub entity: Option<TargetInfo>,
}

/// Scene queries answered by the embedding engine. Both casts already
/// exclude the player's own body.
pub trait Scene {
    fn raycast(&self, origin: Vec3, direction: Vec3) -> Option<RayHit>;

    /// Everything touched by a sphere of `radius` swept from `origin`
    /// along `direction` for `range` meters.
    fn sphere_cast(&self, origin: Vec3, direction: Vec3, radius: f32, range: f32)
        -> Vec<TargetInfo>;
}

/// Current aim, refreshed once per tick before spells run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AimState {
    /// World-space aim point, when aiming at anything.
    pub target: Option<Vec3>,
    /// The aimed-at entity, when the target has one.
    pub entity: Option<TargetInfo>,
    /// Last known aiming direction, unit length or zero.
    pub direction: Vec3,
}

pub trait AimStrategy {
    fn update(&mut self, q: &HandQuery, scene: &dyn Scene) -> AimState;
}

/// Strategy for the backend's capabilities.
pub fn for_device(device: DeviceKind) -> Box<dyn AimStrategy> {
    match device {
        DeviceKind::Skeletal => Box::new(RayAim::default()),
        DeviceKind::Camera => Box::new(VolumeAim),
    }
}

// ── Ray aiming ─────────────────────────────────────────────

/// Ray along the pointing left index finger. A lost hand keeps the last
/// aim rather than yanking the target away mid-cast.
#[derive(Default)]
pub struct RayAim {
    last: AimState,
}

impl AimStrategy for RayAim {
    fn update(&mut self, q: &HandQuery, scene: &dyn Scene) -> AimState {
        if !q.is_present(Handedness::Left) {
            return self.last;
        }

        if !q.is_pointing_tolerant(Handedness::Left) {
            self.last = AimState {
                direction: self.last.direction,
                ..AimState::default()
            };
            return self.last;
        }

        let tip = q.tip_position(Handedness::Left, FingerKind::Index);
        let direction = q.pointing_direction(Handedness::Left);

        self.last = match scene.raycast(tip, direction) {
            Some(hit) => AimState {
                target: Some(hit.point),
                entity: hit.entity,
                direction,
            },
            None => AimState {
                target: None,
                entity: None,
                direction,
            },
        };
        self.last
    }
}

// ── Volume aiming ──────────────────────────────────────────

/// Sweep a sphere along the left palm normal and snap to the enemy
/// closest to the aim axis. With no enemy in the volume, fall back to a
/// plain ray along the palm normal.
pub struct VolumeAim;

impl VolumeAim {
    fn best_enemy(hits: &[TargetInfo], palm: Vec3, normal: Vec3) -> Option<TargetInfo> {
        let mut best: Option<(f32, f32, TargetInfo)> = None;
        for hit in hits {
            if !hit.is_enemy || hit.is_downed {
                continue;
            }
            let offset = hit.position - palm;
            let distance = offset.length();
            let angle = normal
                .angle_between(offset.normalize_or_zero())
                .to_degrees();

            let closer = match &best {
                None => true,
                Some((best_angle, best_distance, _)) => {
                    angle + ANGLE_EPS_DEG < *best_angle
                        || ((angle - best_angle).abs() <= ANGLE_EPS_DEG
                            && distance < *best_distance)
                }
            };
            if closer {
                best = Some((angle, distance, *hit));
            }
        }
        best.map(|(_, _, hit)| hit)
    }
}

impl AimStrategy for VolumeAim {
    fn update(&mut self, q: &HandQuery, scene: &dyn Scene) -> AimState {
        if !q.is_present(Handedness::Left) || !q.is_open(Handedness::Left) {
            return AimState::default();
        }

        let palm = q.palm_position(Handedness::Left);
        let normal = q.palm_normal(Handedness::Left);

        let hits = scene.sphere_cast(palm, normal, SPHERE_CAST_RADIUS, SPHERE_CAST_RANGE);
        if let Some(enemy) = Self::best_enemy(&hits, palm, normal) {
            return AimState {
                target: Some(enemy.position + Vec3::Y * ENEMY_AIM_LIFT),
                entity: Some(enemy),
                direction: (enemy.position - palm).normalize_or_zero(),
            };
        }

        AimState {
            target: scene.raycast(palm, normal).map(|hit| hit.point),
            entity: None,
            direction: normal.normalize_or_zero(),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::make_hand;
    use crate::player::PlayerFrame;

    /// Scene with fixed sphere-cast hits and one flat wall raycast.
    struct FakeScene {
        hits: Vec<TargetInfo>,
        wall: Option<RayHit>,
    }

    impl Scene for FakeScene {
        fn raycast(&self, _origin: Vec3, _direction: Vec3) -> Option<RayHit> {
            self.wall
        }

        fn sphere_cast(&self, _o: Vec3, _d: Vec3, _r: f32, _range: f32) -> Vec<TargetInfo> {
            self.hits.clone()
        }
    }

    fn enemy(id: u64, position: Vec3) -> TargetInfo {
        TargetInfo {
            id: TargetId(id),
            position,
            is_enemy: true,
            is_downed: false,
            is_grabbable: false,
        }
    }

    fn pointing_left() -> HandQuery {
        HandQuery::from_hands(
            Some(make_hand(
                Handedness::Left,
                [false, true, false, false, false],
            )),
            None,
            PlayerFrame::default(),
        )
    }

    fn open_left() -> HandQuery {
        HandQuery::from_hands(
            Some(make_hand(Handedness::Left, [true; 5])),
            None,
            PlayerFrame::default(),
        )
    }

    #[test]
    fn ray_aim_targets_the_hit_point() {
        let scene = FakeScene {
            hits: vec![],
            wall: Some(RayHit {
                point: Vec3::new(0.0, 5.0, 0.0),
                entity: Some(enemy(7, Vec3::new(0.0, 5.0, 0.0))),
            }),
        };
        let mut aim = RayAim::default();
        let state = aim.update(&pointing_left(), &scene);
        assert_eq!(state.target, Some(Vec3::new(0.0, 5.0, 0.0)));
        assert_eq!(state.entity.unwrap().id, TargetId(7));
        // make_hand fingers grow along +Y.
        assert!(state.direction.y > 0.9);
    }

    #[test]
    fn ray_aim_clears_target_when_not_pointing() {
        let scene = FakeScene {
            hits: vec![],
            wall: Some(RayHit {
                point: Vec3::ONE,
                entity: None,
            }),
        };
        let mut aim = RayAim::default();
        aim.update(&pointing_left(), &scene);

        let fist = HandQuery::from_hands(
            Some(make_hand(Handedness::Left, [false; 5])),
            None,
            PlayerFrame::default(),
        );
        let state = aim.update(&fist, &scene);
        assert_eq!(state.target, None);
        assert_eq!(state.entity, None);
    }

    #[test]
    fn ray_aim_keeps_last_state_when_hand_is_lost() {
        let scene = FakeScene {
            hits: vec![],
            wall: Some(RayHit {
                point: Vec3::new(1.0, 2.0, 3.0),
                entity: None,
            }),
        };
        let mut aim = RayAim::default();
        let before = aim.update(&pointing_left(), &scene);
        let after = aim.update(&HandQuery::default(), &scene);
        assert_eq!(before, after);
        assert_eq!(after.target, Some(Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn volume_aim_picks_smallest_angle() {
        // Palm normal is -Z for make_hand; put one enemy on the axis and
        // one well off it.
        let on_axis = enemy(1, Vec3::new(0.04, 0.0, -10.0));
        let off_axis = enemy(2, Vec3::new(6.0, 0.0, -6.0));
        let scene = FakeScene {
            hits: vec![off_axis, on_axis],
            wall: None,
        };
        let state = VolumeAim.update(&open_left(), &scene);
        assert_eq!(state.entity.unwrap().id, TargetId(1));
        // Enemy aim point is lifted off the ground pivot.
        assert_eq!(state.target, Some(on_axis.position + Vec3::Y));
    }

    #[test]
    fn volume_aim_ties_break_by_distance() {
        // Both enemies sit exactly on the aim axis; angles tie.
        let near = enemy(1, Vec3::new(0.04, 0.0, -5.0));
        let far = enemy(2, Vec3::new(0.04, 0.0, -20.0));
        let scene = FakeScene {
            hits: vec![far, near],
            wall: None,
        };
        let state = VolumeAim.update(&open_left(), &scene);
        assert_eq!(state.entity.unwrap().id, TargetId(1));
    }

    #[test]
    fn volume_aim_skips_downed_enemies() {
        let mut downed = enemy(1, Vec3::new(0.04, 0.0, -5.0));
        downed.is_downed = true;
        let standing = enemy(2, Vec3::new(3.0, 0.0, -5.0));
        let scene = FakeScene {
            hits: vec![downed, standing],
            wall: None,
        };
        let state = VolumeAim.update(&open_left(), &scene);
        assert_eq!(state.entity.unwrap().id, TargetId(2));
    }

    #[test]
    fn volume_aim_falls_back_to_palm_ray() {
        let scene = FakeScene {
            hits: vec![],
            wall: Some(RayHit {
                point: Vec3::new(0.0, 0.0, -30.0),
                entity: None,
            }),
        };
        let state = VolumeAim.update(&open_left(), &scene);
        assert_eq!(state.target, Some(Vec3::new(0.0, 0.0, -30.0)));
        assert_eq!(state.entity, None);
        assert!(state.direction.z < -0.9);
    }

    #[test]
    fn volume_aim_requires_an_open_hand() {
        let scene = FakeScene {
            hits: vec![enemy(1, Vec3::NEG_Z)],
            wall: None,
        };
        let fist = HandQuery::from_hands(
            Some(make_hand(Handedness::Left, [false; 5])),
            None,
            PlayerFrame::default(),
        );
        assert_eq!(VolumeAim.update(&fist, &scene), AimState::default());
        assert_eq!(
            VolumeAim.update(&HandQuery::default(), &scene),
            AimState::default()
        );
    }
}
