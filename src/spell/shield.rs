//! Shield: a barrier stretched across both forearms, held up for as long
//! as the fists stay turned inward.

use glam::Vec3;

use crate::collab::EffectCommand;
use crate::gesture::Gesture;
use crate::hand::Handedness;

use super::engine::{LastingBehavior, SpellBehavior, SpellCx};

pub struct Shield {
    gesture: Box<dyn Gesture>,
}

impl Shield {
    pub fn new(gesture: Box<dyn Gesture>) -> Self {
        Self { gesture }
    }

    /// Corner points for the barrier mesh: left elbow, left wrist, right
    /// elbow, right wrist.
    fn arm_points(cx: &SpellCx) -> [Vec3; 4] {
        let [left_elbow, left_wrist] = cx.q.elbow_line(Handedness::Left);
        let [right_elbow, right_wrist] = cx.q.elbow_line(Handedness::Right);
        [left_elbow, left_wrist, right_elbow, right_wrist]
    }
}

impl SpellBehavior for Shield {
    fn name(&self) -> &'static str {
        "shield"
    }

    fn detect_start(&mut self, cx: &mut SpellCx) -> bool {
        !cx.q.player().moving && self.gesture.start_pose(cx.q, cx.now)
    }

    fn is_broken(&mut self, cx: &mut SpellCx) -> bool {
        self.gesture.break_pose(cx.q, cx.now) || cx.q.player().moving
    }

    fn should_cast(&mut self, cx: &mut SpellCx) -> bool {
        self.gesture.cast_pose(cx.q, cx.now)
    }

    fn cast(&mut self, cx: &mut SpellCx) {
        let points = Self::arm_points(cx);
        cx.effects.submit(EffectCommand::RaiseShield { points });
    }

    fn after_cast(&mut self, cx: &mut SpellCx) {
        cx.audio.play("shield_raise");
    }
}

impl LastingBehavior for Shield {
    fn should_finish(&mut self, cx: &mut SpellCx) -> bool {
        self.gesture.break_pose(cx.q, cx.now) || !cx.q.both_facing_player()
    }

    /// The barrier tracks the forearms every channeling tick.
    fn keep_casting(&mut self, cx: &mut SpellCx) {
        let points = Self::arm_points(cx);
        cx.effects.submit(EffectCommand::MoveShield { points });
    }

    fn finish(&mut self, cx: &mut SpellCx) {
        cx.audio.play("shield_drop");
        cx.effects.submit(EffectCommand::DropShield);
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aim::AimState;
    use crate::collab::Recorder;
    use crate::hand::make_hand;
    use crate::player::PlayerFrame;
    use crate::query::HandQuery;
    use crate::spell::{ManaPool, Spell, SpellState};

    struct AlwaysPosed;

    impl Gesture for AlwaysPosed {
        fn start_pose(&mut self, _q: &HandQuery, _now: f64) -> bool {
            true
        }

        fn break_pose(&mut self, _q: &HandQuery, _now: f64) -> bool {
            false
        }

        fn cast_pose(&mut self, _q: &HandQuery, _now: f64) -> bool {
            true
        }
    }

    fn guarded_hands(facing_player: bool) -> HandQuery {
        let normal = if facing_player { Vec3::NEG_Z } else { Vec3::Z };
        let mut left = make_hand(Handedness::Left, [false; 5]);
        let mut right = make_hand(Handedness::Right, [false; 5]);
        left.palm_normal = normal;
        right.palm_normal = normal;
        HandQuery::from_hands(Some(left), Some(right), PlayerFrame::default())
    }

    fn tick(spell: &mut Spell, mana: &mut ManaPool, q: &HandQuery, rec: &mut Recorder) {
        let mut audio = Recorder::default();
        let aim = AimState::default();
        let mut cx = SpellCx {
            q,
            aim: &aim,
            now: 0.0,
            audio: &mut audio,
            effects: rec,
        };
        spell.tick(&mut cx, mana);
        rec.played.extend(audio.played);
    }

    #[test]
    fn shield_raises_tracks_and_drops() {
        let mut spell = Spell::lasting(Box::new(Shield::new(Box::new(AlwaysPosed))));
        let mut mana = ManaPool::new(100.0);
        let inward = guarded_hands(true);
        let mut rec = Recorder::default();

        for _ in 0..4 {
            tick(&mut spell, &mut mana, &inward, &mut rec);
        }
        assert_eq!(spell.state(), SpellState::Casting);
        assert!(rec.has_effect(|e| matches!(e, EffectCommand::RaiseShield { .. })));
        assert!(rec.played.contains(&"shield_raise"));
        // Shield is free to hold.
        assert_eq!(mana.current(), 100.0);

        tick(&mut spell, &mut mana, &inward, &mut rec);
        assert!(rec.has_effect(|e| matches!(e, EffectCommand::MoveShield { .. })));

        // Turning the palms away drops the barrier.
        let outward = guarded_hands(false);
        tick(&mut spell, &mut mana, &outward, &mut rec);
        assert_eq!(spell.state(), SpellState::Finished);
        tick(&mut spell, &mut mana, &outward, &mut rec);
        assert_eq!(spell.state(), SpellState::Idle);
        assert!(rec.has_effect(|e| matches!(e, EffectCommand::DropShield)));
        assert!(rec.played.contains(&"shield_drop"));
    }

    #[test]
    fn steering_breaks_the_guard() {
        let mut spell = Spell::lasting(Box::new(Shield::new(Box::new(AlwaysPosed))));
        let mut mana = ManaPool::new(100.0);
        let mut moving_player = PlayerFrame::default();
        moving_player.moving = true;
        let q = HandQuery::from_hands(
            Some(make_hand(Handedness::Left, [false; 5])),
            Some(make_hand(Handedness::Right, [false; 5])),
            moving_player,
        );
        let mut rec = Recorder::default();
        tick(&mut spell, &mut mana, &q, &mut rec);
        assert_eq!(spell.state(), SpellState::Idle);
    }

    #[test]
    fn shield_corner_points_span_both_forearms() {
        let mut spell = Spell::lasting(Box::new(Shield::new(Box::new(AlwaysPosed))));
        let mut mana = ManaPool::new(100.0);
        let inward = guarded_hands(true);
        let mut rec = Recorder::default();
        for _ in 0..4 {
            tick(&mut spell, &mut mana, &inward, &mut rec);
        }
        let points = rec
            .effects
            .iter()
            .find_map(|e| match e {
                EffectCommand::RaiseShield { points } => Some(*points),
                _ => None,
            })
            .expect("shield raised");
        let [left_elbow, left_wrist] = inward.elbow_line(Handedness::Left);
        let [right_elbow, right_wrist] = inward.elbow_line(Handedness::Right);
        assert_eq!(points, [left_elbow, left_wrist, right_elbow, right_wrist]);
    }
}
