//! The boundary between the core and whatever consumes its pixel stream.
//!
//! On hardware the consumer is a TMDS encoder clocked by the pixel clock and
//! a 5x serial clock. Here any [`VideoSink`] can stand in for it: the core
//! hands it one [`VideoOut`] per pixel clock and makes no other assumption.

use alloc::vec;
use alloc::vec::Vec;
use crate::color::{Rgb888, BLACK};
use crate::raster::PIXELS_PER_FRAME;

/// Clocks the external clock generator is expected to supply.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ClockPair {
    pub pixel_hz: u32,
    pub serial_hz: u32,
}

impl ClockPair {
    pub const HD720P60: ClockPair = ClockPair {
        pixel_hz: 74_250_000,
        serial_hz: 74_250_000 * 5,
    };
}

/// Signals presented to the encoder during one pixel clock.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct VideoOut {
    pub rgb: Rgb888,
    pub hsync: bool,
    pub vsync: bool,
    pub display_enable: bool,
}

pub trait VideoSink {
    fn accept(&mut self, out: &VideoOut);
}

impl<S: VideoSink + ?Sized> VideoSink for &mut S {
    fn accept(&mut self, out: &VideoOut) {
        (**self).accept(out)
    }
}

/// Drops every pixel.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullSink;

impl VideoSink for NullSink {
    fn accept(&mut self, _: &VideoOut) {}
}

/// Counts what a monitor would lock onto, without keeping any pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SignalCounter {
    pub cycles: u64,
    pub enabled: u64,
    pub hsync_edges: u64,
    pub vsync_edges: u64,
    last: VideoOut,
}

impl VideoSink for SignalCounter {
    fn accept(&mut self, out: &VideoOut) {
        self.cycles += 1;
        self.enabled += out.display_enable as u64;
        self.hsync_edges += (out.hsync && !self.last.hsync) as u64;
        self.vsync_edges += (out.vsync && !self.last.vsync) as u64;
        self.last = *out;
    }
}

/// Rebuilds 1280x720 frames from the stream.
///
/// The vsync leading edge rewinds the write cursor; every enabled cycle
/// writes the next pixel. A frame counts as complete once its last visible
/// pixel lands, so it can be read right after the final active line.
#[derive(Clone, Debug)]
pub struct FrameCapture {
    pixels: Vec<Rgb888>,
    cursor: usize,
    last_vsync: bool,
    frames: u64,
}

impl FrameCapture {
    pub fn new() -> Self {
        Self {
            pixels: vec![BLACK; PIXELS_PER_FRAME],
            cursor: 0,
            last_vsync: false,
            frames: 0,
        }
    }

    pub fn frame(&self) -> &[Rgb888] {
        &self.pixels
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn frames_completed(&self) -> u64 {
        self.frames
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb888> {
        if x >= crate::raster::H_DISP as usize {
            return None;
        }
        self.pixels.get(y * crate::raster::H_DISP as usize + x).copied()
    }
}

impl Default for FrameCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoSink for FrameCapture {
    fn accept(&mut self, out: &VideoOut) {
        if out.vsync && !self.last_vsync {
            self.cursor = 0;
        }
        self.last_vsync = out.vsync;

        if !out.display_enable {
            return;
        }

        if let Some(pixel) = self.pixels.get_mut(self.cursor) {
            *pixel = out.rgb;
            self.cursor += 1;
            if self.cursor == PIXELS_PER_FRAME {
                self.frames += 1;
            }
        }
    }
}
