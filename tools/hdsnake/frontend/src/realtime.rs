use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use hdsnake_core::emulator::{Emulator, TimeDaemon};
use hdsnake_core::inputs::{ControllerButton, InputCommand, KeyState};
use hdsnake_core::system::SystemConfig;
use hdsnake_core::video::SignalCounter;
use tracing::{debug, info};

use crate::script::InputScript;

pub struct InstantClock {
    instant: Instant,
}

impl InstantClock {
    pub fn new() -> Self {
        Self { instant: Instant::now() }
    }
}

impl TimeDaemon for InstantClock {
    fn get_now_ms(&self) -> f64 {
        self.instant.elapsed().as_secs_f64() * 1000.0
    }
}

fn raise_priority() {
    #[cfg(not(target_arch = "wasm32"))]
    {
        use thread_priority::*;
        if set_current_thread_priority(ThreadPriority::Max).is_err() {
            debug!("could not raise thread priority");
        }
    }
}

/// Paces the core against the wall clock for `seconds`, feeding the script's
/// buttons in as key presses. Returns what the output stream carried.
pub fn run(seconds: f64, script: &InputScript, config: SystemConfig) -> Result<(SignalCounter, Emulator<InstantClock>)> {
    raise_priority();

    let mut emu = Emulator::init(InstantClock::new(), config);
    let mut counter = SignalCounter::default();
    let deadline = Duration::from_secs_f64(seconds.max(0.0));
    let started = Instant::now();

    let mut held = [false; 4];
    while started.elapsed() < deadline {
        let buttons = script.buttons_for_tick(emu.system.ticks());
        for (slot, button) in ControllerButton::PRIORITY.into_iter().enumerate() {
            let pressed = buttons.is_pressed(button);
            if pressed != held[slot] {
                emu.set_input_state(InputCommand::Controller(button), KeyState::new(pressed));
                held[slot] = pressed;
            }
        }

        emu.process_cycles(&mut counter);
        thread::sleep(Duration::from_millis(1));
    }

    info!("ran {} cycles, {} ticks in {:.2}s (tick every 2^{} cycles)",
        counter.cycles, emu.system.ticks(), started.elapsed().as_secs_f64(), emu.system.config().tick_bits);
    Ok((counter, emu))
}
