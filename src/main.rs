//! Manacast - gesture-driven spellcasting core for hand-tracked VR.

use std::time::{Duration, Instant};

use clap::Parser;
use glam::Vec3;
use tracing::info;

use manacast::aim::{RayHit, Scene, TargetInfo};
use manacast::collab::LogCollab;
use manacast::session::{Session, SessionConfig, DEFAULT_CAMERA_PORT};
use manacast::tracking::DeviceKind;

#[derive(Parser, Debug)]
#[command(name = "manacast", about = "Gesture-driven spellcasting core")]
struct Cli {
    /// Tracking device: skeletal or camera
    #[arg(long, default_value = "skeletal")]
    device: String,

    /// UDP port the camera estimator streams to
    #[arg(long, default_value_t = DEFAULT_CAMERA_PORT)]
    camera_port: u16,

    /// Mana pool capacity
    #[arg(long, default_value_t = 100.0)]
    max_mana: f32,

    /// Tick rate in Hz
    #[arg(long, default_value_t = 60.0)]
    tick_hz: f64,

    /// Exit after N seconds (headless testing)
    #[arg(long)]
    exit_after: Option<u64>,

    /// Show version and exit
    #[arg(long)]
    version: bool,
}

/// Stand-in scene for the demo binary: no geometry, nothing to hit.
struct EmptyScene;

impl Scene for EmptyScene {
    fn raycast(&self, _origin: Vec3, _direction: Vec3) -> Option<RayHit> {
        None
    }

    fn sphere_cast(&self, _o: Vec3, _d: Vec3, _r: f32, _range: f32) -> Vec<TargetInfo> {
        vec![]
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.version {
        println!("manacast {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "manacast=info".into()),
        )
        .init();

    info!("manacast v{} starting", env!("CARGO_PKG_VERSION"));

    let device = match cli.device.as_str() {
        "skeletal" => DeviceKind::Skeletal,
        "camera" => DeviceKind::Camera,
        other => {
            eprintln!("Unknown device: {other}. Use: skeletal or camera");
            std::process::exit(1);
        }
    };
    info!(device = device.as_str(), "tracking device");

    let mut session = Session::new(SessionConfig {
        device,
        camera_port: cli.camera_port,
        max_mana: cli.max_mana,
        tick_hz: cli.tick_hz,
        offline: false,
    })?;

    let mut collab = LogCollab;
    let mut audio = LogCollab;
    let mut checkpoints = LogCollab;
    let scene = EmptyScene;

    let tick = Duration::from_secs_f64(1.0 / cli.tick_hz);
    let started = Instant::now();
    let mut last_report = Instant::now();

    loop {
        let tick_start = Instant::now();
        session.tick(
            tick.as_secs_f64(),
            &scene,
            &mut audio,
            &mut collab,
            &mut checkpoints,
        );

        if last_report.elapsed() > Duration::from_secs(5) {
            let stats = session.timing().stats();
            info!(
                mana = session.mana(),
                streaming = session.is_streaming(),
                tick_p50_ms = stats.total_p50,
                tick_p99_ms = stats.total_p99,
                missed_pct = stats.missed_pct,
                "session report"
            );
            last_report = Instant::now();
        }

        if let Some(secs) = cli.exit_after {
            if started.elapsed() >= Duration::from_secs(secs) {
                info!("exit-after reached, shutting down");
                return Ok(());
            }
        }

        if let Some(remaining) = tick.checked_sub(tick_start.elapsed()) {
            std::thread::sleep(remaining);
        }
    }
}
