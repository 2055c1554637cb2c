//! Stride - headless locomotion runner
//!
//! Runs a scripted input sequence through the fixed-step simulation in the
//! test arena and logs what the actor did. Set `RUST_LOG=debug` to see
//! individual locomotion events.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use stride_game::{Level, LocomotionConfig, PlayerInput, Simulation, SimulationConfig, TickReport};
use stride_physics::movement::{GroundEvent, SlideEvent, StanceEvent};

/// Scripted input sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Script {
    /// Walk forward across the open floor.
    Walk,
    /// Walk forward and jump once a second.
    Jump,
    /// Crouch into the low tunnel and let go of crouch inside it.
    Crouch,
    /// Sprint, then crouch into a slide.
    Slide,
    /// Walk up the stairs.
    Stairs,
}

impl Script {
    /// Spawn point the script starts from.
    fn spawn(self) -> &'static str {
        match self {
            Script::Walk | Script::Jump | Script::Slide => "start",
            Script::Crouch => "tunnel",
            Script::Stairs => "stairs",
        }
    }

    /// Device state for tick `tick` (at `tick_rate` Hz).
    fn input(self, tick: u32, tick_rate: u32) -> PlayerInput {
        let second = tick_rate.max(1);
        let mut input = PlayerInput {
            frame: tick,
            ..Default::default()
        };
        input.movement.forward = true;

        match self {
            Script::Walk | Script::Stairs => {}
            Script::Jump => input.actions.jump = tick % second < 2,
            Script::Crouch => input.actions.crouch = tick < second * 3 / 2,
            Script::Slide => {
                input.actions.sprint = true;
                input.actions.crouch = tick >= second;
            }
        }
        input
    }
}

/// Built-in locomotion tunings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Preset {
    Default,
    /// Fast, floaty, toggle crouch.
    Arcade,
    /// Slow, heavy, long landing recovery.
    Tactical,
}

impl Preset {
    fn locomotion(self) -> LocomotionConfig {
        match self {
            Preset::Default => LocomotionConfig::default(),
            Preset::Arcade => LocomotionConfig::arcade(),
            Preset::Tactical => LocomotionConfig::tactical(),
        }
    }
}

/// Headless runner for the first-person locomotion controller
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON simulation config; missing fields use defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of ticks to run
    #[arg(short, long, default_value_t = 300)]
    ticks: u32,

    /// Input script to play
    #[arg(short, long, value_enum, default_value_t = Script::Walk)]
    script: Script,

    /// Replace the config's locomotion tuning with a preset
    #[arg(short, long, value_enum)]
    preset: Option<Preset>,

    /// Override the config's tick rate
    #[arg(long)]
    tick_rate: Option<u32>,

    /// Print the effective config as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

/// Event counts over a run.
#[derive(Debug, Default)]
struct Summary {
    ticks: u32,
    jumps: u32,
    landings: u32,
    hard_landings: u32,
    steps: u32,
    slides: u32,
    forced_crouches: u32,
    blocked_stands: u32,
}

impl Summary {
    fn record(&mut self, report: &TickReport) {
        self.ticks += 1;
        self.jumps += u32::from(report.jumped);
        self.steps += u32::from(report.stepped);
        match report.ground {
            GroundEvent::Landed { .. } => self.landings += 1,
            GroundEvent::HardLanding { .. } => self.hard_landings += 1,
            _ => {}
        }
        if let SlideEvent::Started { .. } = report.slide {
            self.slides += 1;
        }
        match report.stance {
            StanceEvent::ForcedCrouch => self.forced_crouches += 1,
            StanceEvent::StandBlocked => self.blocked_stands += 1,
            _ => {}
        }
    }
}

fn load_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            SimulationConfig::from_json(&json)
                .with_context(|| format!("loading config {}", path.display()))?
        }
        None => SimulationConfig::default(),
    };

    if let Some(preset) = args.preset {
        config.locomotion = preset.locomotion();
    }
    if let Some(tick_rate) = args.tick_rate {
        config.tick_rate = tick_rate;
    }
    config.validate().context("validating config")?;
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = load_config(&args)?;
    if args.dump_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let tick_rate = config.tick_rate;
    let mut simulation =
        Simulation::new(config, Level::test_arena()).context("starting simulation")?;
    if !simulation.respawn_at(args.script.spawn()) {
        bail!("test arena has no spawn point named {}", args.script.spawn());
    }

    let start = simulation.player().position();
    let mut summary = Summary::default();

    for tick in 0..args.ticks {
        simulation.set_input(args.script.input(tick, tick_rate));
        match simulation.tick() {
            Some(report) => summary.record(&report),
            None => log::warn!("Tick {} was not simulated", tick),
        }
    }

    let player = simulation.player();
    let state = player.state();
    log::info!(
        "{:?}: {} ticks, moved {:.2}m to {:?}",
        args.script,
        summary.ticks,
        (player.position() - start).length(),
        player.position()
    );
    log::info!(
        "grounded={} stance={:?} height={:.2} speed={:.2}",
        state.grounded,
        state.stance,
        state.body_height,
        state.horizontal_speed()
    );
    log::info!(
        "jumps={} landings={} hard_landings={} steps={} slides={} forced_crouches={} blocked_stands={}",
        summary.jumps,
        summary.landings,
        summary.hard_landings,
        summary.steps,
        summary.slides,
        summary.forced_crouches,
        summary.blocked_stands
    );

    Ok(())
}
