use heapless::{FnvIndexMap, Vec as HVec};
use log::{debug, info, warn};
use crate::emulator::PlayState::{Paused, Playing};
use crate::inputs::{InputCommand, KeyState};
use crate::inputs::InputCommand::{Controller, Reset};
use crate::system::{PinInputs, SnakeSystem, SystemConfig};
use crate::video::{ClockPair, VideoSink};

/// Longest wall-clock gap simulated in one go before we give up catching up.
const MAX_BACKLOG_MS: f64 = 33.0;
const FRAME_MS: f64 = 1000.0 / 60.0;

const INPUT_SLOTS: usize = 8;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PlayState {
    Paused,
    Playing,
}

/// Wall clock standing in for the external clock generator.
pub trait TimeDaemon {
    fn get_now_ms(&self) -> f64;
}

pub struct Emulator<Clock: TimeDaemon> {
    pub system: SnakeSystem,
    pub play_state: PlayState,
    pub clocks: ClockPair,

    pub last_emu_tick: f64,
    pub cycles_per_ms: f64,
    cycle_remainder: f64,
    behind: bool,

    input_state: FnvIndexMap<InputCommand, KeyState, INPUT_SLOTS>,
    pins: PinInputs,

    pub clock: Clock,
}

impl<Clock: TimeDaemon> core::fmt::Debug for Emulator<Clock> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_struct("Emulator")
            .field("system", &self.system)
            .field("play_state", &self.play_state)
            .field("last_emu_tick", &self.last_emu_tick)
            .field("pins", &self.pins)
            .finish()
    }
}

impl<Clock: TimeDaemon> Emulator<Clock> {
    pub fn init(clock: Clock, config: SystemConfig) -> Self {
        let clocks = ClockPair::HD720P60;
        let last_emu_tick = clock.get_now_ms();

        Emulator {
            system: SnakeSystem::new(config),
            play_state: Playing,
            clocks,
            last_emu_tick,
            cycles_per_ms: clocks.pixel_hz as f64 / 1000.0,
            cycle_remainder: 0.0,
            behind: false,
            input_state: FnvIndexMap::new(),
            pins: PinInputs::default(),
            clock,
        }
    }

    pub fn set_input_state(&mut self, input_command: InputCommand, state: KeyState) {
        if self.input_state.insert(input_command, state).is_err() {
            warn!("input map full, dropping {:?}", input_command);
        }
    }

    pub fn pins(&self) -> PinInputs {
        self.pins
    }

    pub fn toggle_pause(&mut self) {
        self.play_state = match self.play_state {
            Paused => Playing,
            Playing => Paused,
        };
        // don't try to catch up on the time spent paused
        self.last_emu_tick = self.clock.get_now_ms();
        self.cycle_remainder = 0.0;
        info!("emulator {:?}", self.play_state);
    }

    /// Runs as many pixel clocks as wall time has moved since the last call.
    /// Returns the number of edges clocked.
    pub fn process_cycles<S: VideoSink>(&mut self, sink: &mut S) -> u64 {
        self.process_inputs();

        let now_ms = self.clock.get_now_ms();
        if self.play_state != Playing {
            self.last_emu_tick = now_ms;
            return 0;
        }

        let mut elapsed_ms = now_ms - self.last_emu_tick;
        if elapsed_ms > MAX_BACKLOG_MS {
            if !self.behind {
                warn!("emulator fell behind by {:.1}ms, dropping backlog", elapsed_ms);
                self.behind = true;
            }
            elapsed_ms = FRAME_MS;
        } else if self.behind {
            debug!("emulator caught up");
            self.behind = false;
        }

        let exact = elapsed_ms.max(0.0) * self.cycles_per_ms + self.cycle_remainder;
        let cycles = exact as u64;
        self.cycle_remainder = exact - cycles as f64;

        self.system.run_cycles(cycles, self.pins, sink);
        self.last_emu_tick = now_ms;
        cycles
    }

    fn process_inputs(&mut self) {
        let keys: HVec<InputCommand, INPUT_SLOTS> = self.input_state.keys().copied().collect();

        let mut pins = PinInputs::default();
        for key in &keys {
            let state = self.input_state[key];
            match key {
                Controller(button) => pins.buttons.set_pressed(*button, state.is_pressed()),
                Reset => {
                    if state == KeyState::JustPressed {
                        info!("reset requested");
                    }
                    pins.reset = state.is_pressed();
                }
            }
            if self.input_state.insert(*key, state.update()).is_err() {
                warn!("input map full, lost state of {:?}", key);
            }
        }

        self.pins = pins;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell as StdCell;
    use crate::game::Cell;
    use crate::inputs::{ButtonPort, ControllerButton};
    use crate::video::SignalCounter;

    struct FakeClock {
        now: StdCell<f64>,
    }

    impl FakeClock {
        fn new() -> Self {
            Self { now: StdCell::new(0.0) }
        }
    }

    impl TimeDaemon for &FakeClock {
        fn get_now_ms(&self) -> f64 {
            self.now.get()
        }
    }

    #[test]
    fn wall_time_becomes_pixel_clocks() {
        let clock = FakeClock::new();
        let mut emu = Emulator::init(&clock, SystemConfig::default());
        let mut counter = SignalCounter::default();

        clock.now.set(1.0);
        assert_eq!(emu.process_cycles(&mut counter), 74_250);
        assert_eq!(counter.cycles, 74_250);
    }

    #[test]
    fn backlog_is_clamped_to_one_frame() {
        let clock = FakeClock::new();
        let mut emu = Emulator::init(&clock, SystemConfig::default());

        clock.now.set(500.0);
        let cycles = emu.process_cycles(&mut crate::video::NullSink);
        assert_eq!(cycles, (FRAME_MS * 74_250.0) as u64);
    }

    #[test]
    fn paused_emulator_does_not_run() {
        let clock = FakeClock::new();
        let mut emu = Emulator::init(&clock, SystemConfig::default());
        emu.toggle_pause();

        clock.now.set(10.0);
        assert_eq!(emu.process_cycles(&mut crate::video::NullSink), 0);

        emu.toggle_pause();
        clock.now.set(11.0);
        assert_eq!(emu.process_cycles(&mut crate::video::NullSink), 74_250);
    }

    #[test]
    fn held_keys_drive_the_button_port() {
        let clock = FakeClock::new();
        let mut emu = Emulator::init(&clock, SystemConfig { tick_bits: 4 });

        emu.set_input_state(Controller(ControllerButton::Up), KeyState::JustPressed);
        clock.now.set(16.0 / 74_250.0 * 1.0001);
        emu.process_cycles(&mut crate::video::NullSink);
        assert!(emu.pins().buttons.is_pressed(ControllerButton::Up));
        assert_eq!(emu.system.game().head(), Cell::new(14, 8));

        emu.set_input_state(Controller(ControllerButton::Up), KeyState::JustReleased);
        emu.process_cycles(&mut crate::video::NullSink);
        assert_eq!(emu.pins().buttons, ButtonPort::RELEASED);
    }

    #[test]
    fn every_input_fits_and_settles() {
        let clock = FakeClock::new();
        let mut emu = Emulator::init(&clock, SystemConfig::default());

        emu.set_input_state(Reset, KeyState::JustPressed);
        for button in ControllerButton::PRIORITY {
            emu.set_input_state(Controller(button), KeyState::JustPressed);
        }
        assert_eq!(emu.input_state.len(), 5);

        emu.process_cycles(&mut crate::video::NullSink);
        assert!(emu.pins().reset);
        assert_eq!(emu.pins().buttons, ButtonPort(0xF0));
        assert!(emu.input_state.values().all(|state| *state == KeyState::Held));

        emu.process_cycles(&mut crate::video::NullSink);
        assert_eq!(emu.pins().buttons, ButtonPort(0xF0));
    }

    #[test]
    fn reset_key_holds_the_system() {
        let clock = FakeClock::new();
        let mut emu = Emulator::init(&clock, SystemConfig { tick_bits: 2 });

        clock.now.set(0.01);
        emu.process_cycles(&mut crate::video::NullSink);
        assert!(emu.system.ticks() > 0);

        emu.set_input_state(Reset, KeyState::JustPressed);
        clock.now.set(0.02);
        emu.process_cycles(&mut crate::video::NullSink);
        assert!(emu.pins().reset);
        assert_eq!(emu.system.ticks(), 0);

        emu.set_input_state(Reset, KeyState::JustReleased);
        clock.now.set(0.03);
        emu.process_cycles(&mut crate::video::NullSink);
        assert!(!emu.pins().reset);
        assert!(emu.system.ticks() > 0);
    }
}
