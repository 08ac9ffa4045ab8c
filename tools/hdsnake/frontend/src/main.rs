mod realtime;
mod script;
mod snapshot;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hdsnake_core::color::{Rgb888, BLACK};
use hdsnake_core::game::GameState;
use hdsnake_core::raster::PIXELS_PER_FRAME;
use hdsnake_core::resolver::render_frame;
use hdsnake_core::system::{PinInputs, SnakeSystem, SystemConfig};
use hdsnake_core::video::{FrameCapture, VideoSink};
use tracing::{info, warn, Level};
use tracing_subscriber::util::SubscriberInitExt;

use crate::script::InputScript;

#[derive(Parser)]
#[command(name = "hdsnake")]
#[command(version, about = "Cycle-accurate 720p snake, run headless", long_about = None)]
struct Cli {
    /// Most verbose level to log
    #[arg(long, global = true, default_value_t = Level::WARN)]
    log_level: Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clock whole frames and write them out as PNGs
    Frames {
        /// Number of frames to clock
        #[arg(short, long)]
        frames: u64,

        /// Button script, e.g. "U*3,R*6"
        #[arg(short, long)]
        input: Option<String>,

        /// Directory for the PNGs
        #[arg(short, long, default_value = "frames")]
        out: PathBuf,

        /// Only keep every k-th frame
        #[arg(long, default_value_t = 1)]
        every: u64,

        /// Tick divider width
        #[arg(long)]
        tick_bits: Option<u32>,
    },

    /// Step the game logic directly, one line per tick
    Ticks {
        #[arg(short, long)]
        ticks: u64,

        #[arg(short, long)]
        input: Option<String>,

        /// Also render each tick's scene into this directory
        #[arg(long)]
        snapshots: Option<PathBuf>,
    },

    /// Run against the wall clock
    Run {
        #[arg(short, long, default_value_t = 5.0)]
        seconds: f64,

        #[arg(short, long)]
        input: Option<String>,

        #[arg(long)]
        tick_bits: Option<u32>,
    },
}

fn setup_logging(level: Level) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .compact()
        .finish()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.log_level);

    match cli.command {
        Commands::Frames { frames, input, out, every, tick_bits } => {
            let script = load_script(input.as_deref())?;
            let config = config_with(tick_bits);
            run_frames(frames, &script, &out, every.max(1), config)
        }
        Commands::Ticks { ticks, input, snapshots } => {
            let script = load_script(input.as_deref())?;
            run_ticks(ticks, &script, snapshots.as_deref())
        }
        Commands::Run { seconds, input, tick_bits } => {
            let script = load_script(input.as_deref())?;
            let (counter, emu) = realtime::run(seconds, &script, config_with(tick_bits))?;
            let game = emu.system.game();
            println!("cycles {} frames {} ticks {}", counter.cycles, counter.vsync_edges, emu.system.ticks());
            println!("length {} heading {:?} food ({}, {})",
                game.length(), game.direction(), game.food().cx, game.food().cy);
            Ok(())
        }
    }
}

fn config_with(tick_bits: Option<u32>) -> SystemConfig {
    let mut config = SystemConfig::default();
    if let Some(bits) = tick_bits {
        config.tick_bits = bits;
    }
    config
}

fn load_script(input: Option<&str>) -> Result<InputScript> {
    match input {
        Some(text) => InputScript::parse(text).context("invalid input script"),
        None => Ok(InputScript::default()),
    }
}

fn run_frames(frames: u64, script: &InputScript, out: &Path, every: u64, config: SystemConfig) -> Result<()> {
    fs::create_dir_all(out).with_context(|| format!("failed to create {}", out.display()))?;

    let mut system = SnakeSystem::new(config);
    let mut capture = FrameCapture::new();
    let mut written = 0;

    while capture.frames_completed() < frames {
        let before = capture.frames_completed();
        let pins = PinInputs::buttons(script.buttons_for_tick(system.ticks()));
        let signal = system.clock(pins);
        capture.accept(&signal);

        let done = capture.frames_completed();
        if done != before && (done - 1) % every == 0 {
            let path = out.join(format!("frame_{:05}.png", done - 1));
            snapshot::write_png(&path, capture.frame())?;
            written += 1;
        }
    }

    info!("wrote {} frames to {}", written, out.display());
    Ok(())
}

fn run_ticks(ticks: u64, script: &InputScript, snapshots: Option<&Path>) -> Result<()> {
    if let Some(dir) = snapshots {
        fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    }

    if script.len_ticks() > ticks {
        warn!("input script covers {} ticks, only {} will run", script.len_ticks(), ticks);
    }

    let mut game = GameState::new();
    let mut scene: Vec<Rgb888> = vec![BLACK; PIXELS_PER_FRAME];

    for tick in 0..ticks {
        let outcome = game.step(script.buttons_for_tick(tick));

        let body = game.body().iter()
            .map(|c| format!("({},{})", c.cx, c.cy))
            .collect::<Vec<_>>()
            .join(" ");
        println!("{:>5} len {:>3} {:<5} food ({},{}){} {}",
            tick + 1, game.length(), format!("{:?}", game.direction()),
            game.food().cx, game.food().cy,
            if outcome.ate { " ate" } else { "" },
            body);

        if let Some(dir) = snapshots {
            render_frame(&game, &mut scene);
            snapshot::write_png(&dir.join(format!("tick_{:05}.png", tick + 1)), &scene)?;
        }
    }

    Ok(())
}
