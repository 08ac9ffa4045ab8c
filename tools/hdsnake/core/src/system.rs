//! The single clocked process tying raster, divider, game and output
//! register together.
//!
//! Every call to [`SnakeSystem::clock`] is one rising pixel-clock edge. All
//! combinational values for the edge are taken from the registers as they
//! stood before it, then every register is committed at once.

use log::{debug, info};
use crate::color::{Rgb888, BLACK};
use crate::divider::{TickDivider, DEFAULT_TICK_BITS};
use crate::game::GameState;
use crate::inputs::ButtonPort;
use crate::raster::{RasterPosition, CYCLES_PER_FRAME};
use crate::resolver::resolve_pixel;
use crate::video::{VideoOut, VideoSink};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SystemConfig {
    /// Width of the tick divider; a tick fires every `2^tick_bits` clocks.
    pub tick_bits: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self { tick_bits: DEFAULT_TICK_BITS }
    }
}

/// Input pins sampled on each edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PinInputs {
    pub reset: bool,
    pub buttons: ButtonPort,
}

impl PinInputs {
    pub fn buttons(buttons: ButtonPort) -> Self {
        Self { reset: false, buttons }
    }
}

impl Default for PinInputs {
    fn default() -> Self {
        Self {
            reset: false,
            buttons: ButtonPort::RELEASED,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SnakeSystem {
    config: SystemConfig,
    raster: RasterPosition,
    divider: TickDivider,
    game: GameState,
    color_out: Rgb888,

    in_reset: bool,
    ticks: u64,
    cycles: u64,
}

impl SnakeSystem {
    pub fn new(config: SystemConfig) -> Self {
        Self {
            config,
            raster: RasterPosition::new(),
            divider: TickDivider::new(config.tick_bits),
            game: GameState::new(),
            color_out: BLACK,
            in_reset: false,
            ticks: 0,
            cycles: 0,
        }
    }

    /// Forces every register back to its initial value.
    pub fn reset(&mut self) {
        self.raster = RasterPosition::new();
        self.divider.reset();
        self.game = GameState::new();
        self.color_out = BLACK;
        self.ticks = 0;
    }

    pub fn clock(&mut self, pins: PinInputs) -> VideoOut {
        self.cycles += 1;

        if pins.reset {
            if !self.in_reset {
                info!("reset asserted after {} cycles", self.cycles - 1);
                self.in_reset = true;
            }
            self.reset();
            return self.output();
        }
        if self.in_reset {
            debug!("reset released");
            self.in_reset = false;
        }

        // combinational, from pre-edge registers
        let signals = self.raster.signals();
        let out = VideoOut {
            rgb: self.color_out,
            hsync: signals.hsync,
            vsync: signals.vsync,
            display_enable: signals.display_enable,
        };
        let next_color = resolve_pixel(&signals, &self.game);

        // edge
        self.color_out = next_color;
        self.raster.advance();
        if self.divider.advance() {
            self.game.step(pins.buttons);
            self.ticks += 1;
        }

        out
    }

    /// Clocks `cycles` edges with fixed pins, feeding every output to `sink`.
    pub fn run_cycles<S: VideoSink>(&mut self, cycles: u64, pins: PinInputs, sink: &mut S) {
        for _ in 0..cycles {
            let out = self.clock(pins);
            sink.accept(&out);
        }
    }

    pub fn run_frame<S: VideoSink>(&mut self, pins: PinInputs, sink: &mut S) {
        self.run_cycles(CYCLES_PER_FRAME as u64, pins, sink);
    }

    /// What the pins carry right now, before the next edge.
    pub fn output(&self) -> VideoOut {
        let signals = self.raster.signals();
        VideoOut {
            rgb: self.color_out,
            hsync: signals.hsync,
            vsync: signals.vsync,
            display_enable: signals.display_enable,
        }
    }

    pub fn config(&self) -> SystemConfig {
        self.config
    }

    pub fn raster(&self) -> RasterPosition {
        self.raster
    }

    pub fn divider(&self) -> &TickDivider {
        &self.divider
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    /// Game ticks since the last reset.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Edges clocked since construction, reset cycles included.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }
}

impl Default for SnakeSystem {
    fn default() -> Self {
        Self::new(SystemConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{BACKGROUND, FOOD, SNAKE};
    use crate::game::{Cell, INITIAL_HEAD};
    use crate::inputs::ControllerButton;
    use crate::raster::{H_ACTIVE_START, H_DISP, V_ACTIVE_START};
    use crate::video::{FrameCapture, NullSink, SignalCounter};

    fn fast(bits: u32) -> SnakeSystem {
        SnakeSystem::new(SystemConfig { tick_bits: bits })
    }

    fn clock_to(system: &mut SnakeSystem, h: u16, v: u16) {
        while system.raster() != (RasterPosition { h_count: h, v_count: v }) {
            system.clock(PinInputs::default());
        }
    }

    #[test]
    fn color_register_lags_one_clock() {
        let mut system = fast(23);
        // left edge of the tail cell (11, 9); the stale slot (10, 9) left of it is masked
        clock_to(&mut system, H_ACTIVE_START + 11 * 40, V_ACTIVE_START + 9 * 40);

        let at_tail = system.clock(PinInputs::default());
        assert!(at_tail.display_enable);
        // still showing the decision for the pixel left of the tail
        assert_eq!(at_tail.rgb, BACKGROUND);

        let next = system.clock(PinInputs::default());
        assert_eq!(next.rgb, SNAKE);
    }

    #[test]
    fn first_enabled_pixel_carries_blanking_black() {
        let mut system = fast(23);
        clock_to(&mut system, H_ACTIVE_START, V_ACTIVE_START);
        let out = system.clock(PinInputs::default());
        assert!(out.display_enable);
        assert_eq!(out.rgb, BLACK);
    }

    #[test]
    fn one_frame_of_signals() {
        let mut system = SnakeSystem::default();
        let mut counter = SignalCounter::default();
        system.run_frame(PinInputs::default(), &mut counter);
        assert_eq!(counter.cycles, CYCLES_PER_FRAME as u64);
        assert_eq!(counter.enabled, 1280 * 720);
        assert_eq!(counter.hsync_edges, 750);
        assert_eq!(counter.vsync_edges, 1);
        assert_eq!(system.raster(), RasterPosition::new());
    }

    #[test]
    fn ticks_follow_the_divider() {
        let mut system = fast(4);
        assert_eq!(system.config(), SystemConfig { tick_bits: 4 });
        assert_eq!(system.divider().period(), 16);
        system.run_cycles(15, PinInputs::default(), &mut NullSink);
        assert_eq!(system.ticks(), 0);
        assert_eq!(system.game().head(), INITIAL_HEAD);

        system.run_cycles(1, PinInputs::default(), &mut NullSink);
        assert_eq!(system.ticks(), 1);
        assert_eq!(system.game().head(), Cell::new(15, 9));

        system.run_cycles(16 * 4, PinInputs::default(), &mut NullSink);
        assert_eq!(system.ticks(), 5);
        assert_eq!(system.game().head(), Cell::new(19, 9));
    }

    #[test]
    fn buttons_only_matter_on_the_tick_edge() {
        let mut system = fast(3);
        let up = PinInputs::buttons(ButtonPort::pressed(&[ControllerButton::Up]));
        system.run_cycles(7, up, &mut NullSink);
        system.clock(PinInputs::default());
        assert_eq!(system.game().head(), Cell::new(15, 9));

        system.run_cycles(7, PinInputs::default(), &mut NullSink);
        system.clock(up);
        assert_eq!(system.game().head(), Cell::new(15, 8));
    }

    #[test]
    fn reset_holds_everything_at_initial_values() {
        let mut system = fast(2);
        system.run_cycles(1000, PinInputs::default(), &mut NullSink);
        assert_ne!(system.game().head(), INITIAL_HEAD);

        let reset = PinInputs { reset: true, ..Default::default() };
        for _ in 0..10 {
            let out = system.clock(reset);
            assert_eq!(out.rgb, BLACK);
            assert!(out.hsync && out.vsync && !out.display_enable);
        }
        assert_eq!(system.raster(), RasterPosition::new());
        assert_eq!(system.ticks(), 0);
        assert_eq!(system.game(), &GameState::new());
        assert_eq!(system.divider().counter(), 0);
    }

    #[test]
    fn captured_frame_is_shifted_by_the_output_register() {
        let mut system = SnakeSystem::default();
        let mut capture = FrameCapture::new();
        system.run_frame(PinInputs::default(), &mut capture);
        assert_eq!(capture.frames_completed(), 1);

        // food cell spans x 800..840 on row 240; the register delays it one pixel
        let row = 6 * 40;
        assert_eq!(capture.pixel(800, row), Some(BACKGROUND));
        assert_eq!(capture.pixel(801, row), Some(FOOD));
        assert_eq!(capture.pixel(840, row), Some(FOOD));
        assert_eq!(capture.pixel(841, row), Some(BACKGROUND));
        // every line starts with the black decided during blanking
        assert_eq!(capture.pixel(0, 0), Some(BLACK));
        assert_eq!(capture.pixel(0, 719), Some(BLACK));
        assert_eq!(capture.pixel(H_DISP as usize - 1, 0), Some(BACKGROUND));
    }
}
