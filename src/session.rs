//! Per-frame orchestration.
//!
//! One [`Session`] owns the active tracker, aim strategy, spell set, and
//! mana pool, and drives them in a fixed order every tick: tracker
//! refresh, hand snapshot, aim update, mana regeneration, checkpoint
//! gestures, then the spells. Everything downstream of the snapshot sees
//! one consistent view of the hands for the whole tick.

use std::time::Instant;

use tracing::{debug, info};

use crate::aim::{self, AimState, AimStrategy, Scene};
use crate::collab::{AudioSink, CheckpointSink, EffectSink};
use crate::hand::Handedness;
use crate::player::PlayerFrame;
use crate::query::HandQuery;
use crate::spell::{self, ManaPool, Spell, SpellCx, SpellState, MANA_REGEN_PER_TICK};
use crate::tracking::{CameraTracker, DeviceKind, SkeletalFrame, SkeletalTracker, Tracker};

/// Default port the camera estimator streams to.
pub const DEFAULT_CAMERA_PORT: u16 = 5052;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub device: DeviceKind,
    pub camera_port: u16,
    pub max_mana: f32,
    /// Tick rate the budget in the timing stats is derived from.
    pub tick_hz: f64,
    /// Skip binding the camera socket; payloads must then be fed in
    /// directly.
    pub offline: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            device: DeviceKind::Skeletal,
            camera_port: DEFAULT_CAMERA_PORT,
            max_mana: 100.0,
            tick_hz: 60.0,
            offline: false,
        }
    }
}

pub struct Session {
    config: SessionConfig,
    tracker: Tracker,
    aim_strategy: Box<dyn AimStrategy>,
    aim: AimState,
    spells: Vec<Spell>,
    mana: ManaPool,
    player: PlayerFrame,
    clock: f64,
    timing: TickTiming,
    checkpoint_confirm_held: bool,
    checkpoint_repeat_held: bool,
}

impl Session {
    pub fn new(config: SessionConfig) -> anyhow::Result<Self> {
        let tracker = build_tracker(&config, config.device)?;
        let budget_ms = 1000.0 / config.tick_hz;
        Ok(Self {
            tracker,
            aim_strategy: aim::for_device(config.device),
            aim: AimState::default(),
            spells: spell::standard_set(config.device),
            mana: ManaPool::new(config.max_mana),
            player: PlayerFrame::default(),
            clock: 0.0,
            timing: TickTiming::new(1000, budget_ms),
            checkpoint_confirm_held: false,
            checkpoint_repeat_held: false,
            config,
        })
    }

    pub fn device(&self) -> DeviceKind {
        self.tracker.device()
    }

    pub fn mana(&self) -> f32 {
        self.mana.current()
    }

    pub fn mana_pool_mut(&mut self) -> &mut ManaPool {
        &mut self.mana
    }

    pub fn aim(&self) -> AimState {
        self.aim
    }

    pub fn is_streaming(&self) -> bool {
        self.tracker.is_streaming()
    }

    pub fn timing(&self) -> &TickTiming {
        &self.timing
    }

    pub fn spell_states(&self) -> Vec<SpellState> {
        self.spells.iter().map(|s| s.state()).collect()
    }

    pub fn set_player(&mut self, player: PlayerFrame) {
        self.player = player;
    }

    pub fn submit_skeletal_frame(&mut self, frame: SkeletalFrame) {
        self.tracker.submit_skeletal(frame);
    }

    /// Switch the tracking backend. The replacement tracker, aim
    /// strategy, and re-bound spell set are built first and committed
    /// together; a failed switch leaves the session untouched.
    pub fn set_device(&mut self, device: DeviceKind) -> anyhow::Result<()> {
        if device == self.tracker.device() {
            return Ok(());
        }
        let tracker = build_tracker(&self.config, device)?;
        self.tracker = tracker;
        self.aim_strategy = aim::for_device(device);
        self.spells = spell::standard_set(device);
        self.aim = AimState::default();
        info!(device = device.as_str(), "tracking device switched");
        Ok(())
    }

    /// Advance the session by `dt` seconds.
    pub fn tick(
        &mut self,
        dt: f64,
        scene: &dyn Scene,
        audio: &mut dyn AudioSink,
        effects: &mut dyn EffectSink,
        checkpoints: &mut dyn CheckpointSink,
    ) {
        let tick_start = Instant::now();
        self.clock += dt;

        self.tracker.refresh(&self.player);
        let q = HandQuery::snapshot(&self.tracker, &self.player);
        self.aim = self.aim_strategy.update(&q, scene);
        let tracking_ms = tick_start.elapsed().as_secs_f64() * 1000.0;

        self.mana.regenerate(MANA_REGEN_PER_TICK);
        self.check_checkpoint_gestures(&q, checkpoints);

        let spell_start = Instant::now();
        self.tick_spells(&q, audio, effects);
        let spell_ms = spell_start.elapsed().as_secs_f64() * 1000.0;

        self.timing.record_tick(tracking_ms, spell_ms);
    }

    /// A raised shield suppresses the fireball; flipping the fists open
    /// to throw would otherwise read as a fireball release.
    fn tick_spells(&mut self, q: &HandQuery, audio: &mut dyn AudioSink, effects: &mut dyn EffectSink) {
        let shield_up = self
            .spells
            .iter()
            .any(|s| s.name() == "shield" && matches!(s.state(), SpellState::Casted | SpellState::Casting));

        for spell in &mut self.spells {
            if shield_up && spell.name() == "fireball" {
                continue;
            }
            let mut cx = SpellCx {
                q,
                aim: &self.aim,
                now: self.clock,
                audio,
                effects,
            };
            spell.tick(&mut cx, &mut self.mana);
        }
    }

    /// Tutorial control gestures on the right hand, edge-triggered so a
    /// held pose fires once.
    fn check_checkpoint_gestures(&mut self, q: &HandQuery, checkpoints: &mut dyn CheckpointSink) {
        let confirm = q.is_peace_sign(Handedness::Right);
        if confirm && !self.checkpoint_confirm_held {
            debug!("confirm gesture");
            checkpoints.advance();
        }
        self.checkpoint_confirm_held = confirm;

        let repeat = q.is_thumbs_down(Handedness::Right);
        if repeat && !self.checkpoint_repeat_held {
            debug!("repeat gesture");
            checkpoints.repeat();
        }
        self.checkpoint_repeat_held = repeat;
    }
}

fn build_tracker(config: &SessionConfig, device: DeviceKind) -> anyhow::Result<Tracker> {
    Ok(match device {
        DeviceKind::Skeletal => Tracker::Skeletal(SkeletalTracker::new()),
        DeviceKind::Camera if config.offline => Tracker::Camera(CameraTracker::detached()),
        DeviceKind::Camera => Tracker::Camera(CameraTracker::bind(config.camera_port)?),
    })
}

// ── Tick timing ────────────────────────────────────────────

/// Rolling per-tick timing over a window of samples.
#[derive(Debug)]
pub struct TickTiming {
    tracking_times: Vec<f64>,
    spell_times: Vec<f64>,
    total_times: Vec<f64>,
    window_size: usize,
    total_ticks: u64,
    missed_ticks: u64,
    budget_ms: f64,
}

impl TickTiming {
    pub fn new(window_size: usize, budget_ms: f64) -> Self {
        Self {
            tracking_times: Vec::with_capacity(window_size),
            spell_times: Vec::with_capacity(window_size),
            total_times: Vec::with_capacity(window_size),
            window_size,
            total_ticks: 0,
            missed_ticks: 0,
            budget_ms,
        }
    }

    pub fn record_tick(&mut self, tracking_ms: f64, spell_ms: f64) {
        let total = tracking_ms + spell_ms;
        Self::push_sample(&mut self.tracking_times, tracking_ms, self.window_size);
        Self::push_sample(&mut self.spell_times, spell_ms, self.window_size);
        Self::push_sample(&mut self.total_times, total, self.window_size);

        self.total_ticks += 1;
        if total > self.budget_ms {
            self.missed_ticks += 1;
        }
    }

    fn push_sample(samples: &mut Vec<f64>, value: f64, window_size: usize) {
        samples.push(value);
        if samples.len() > window_size {
            samples.remove(0);
        }
    }

    fn percentile(sorted: &[f64], p: f64) -> f64 {
        if sorted.is_empty() {
            return 0.0;
        }
        let idx = ((sorted.len() as f64 - 1.0) * p / 100.0).round() as usize;
        sorted[idx.min(sorted.len() - 1)]
    }

    pub fn stats(&self) -> TickTimingStats {
        let mut tracking = self.tracking_times.clone();
        let mut spells = self.spell_times.clone();
        let mut total = self.total_times.clone();
        for samples in [&mut tracking, &mut spells, &mut total] {
            samples.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        }

        TickTimingStats {
            tracking_p50: Self::percentile(&tracking, 50.0),
            tracking_p99: Self::percentile(&tracking, 99.0),
            spell_p50: Self::percentile(&spells, 50.0),
            spell_p99: Self::percentile(&spells, 99.0),
            total_p50: Self::percentile(&total, 50.0),
            total_p99: Self::percentile(&total, 99.0),
            missed_pct: if self.total_ticks > 0 {
                (self.missed_ticks as f64 / self.total_ticks as f64) * 100.0
            } else {
                0.0
            },
            total_ticks: self.total_ticks,
            missed_ticks: self.missed_ticks,
        }
    }
}

/// Computed tick timing statistics.
#[derive(Debug, Clone)]
pub struct TickTimingStats {
    pub tracking_p50: f64,
    pub tracking_p99: f64,
    pub spell_p50: f64,
    pub spell_p99: f64,
    pub total_p50: f64,
    pub total_p99: f64,
    pub missed_pct: f64,
    pub total_ticks: u64,
    pub missed_ticks: u64,
}

// ── Tests ──────────────────────────────────────────────────
