//! Horizontal/vertical counters for the fixed 1280x720@60Hz raster.
//!
//! Each line is laid out as `sync | back porch | active | front porch`, and
//! the same for each frame in lines. Sync is asserted during the leading
//! window of both counters.

pub const H_SYNC: u16 = 40;
pub const H_BACK: u16 = 220;
pub const H_DISP: u16 = 1280;
pub const H_FRONT: u16 = 110;
pub const H_TOTAL: u16 = H_SYNC + H_BACK + H_DISP + H_FRONT;

pub const V_SYNC: u16 = 5;
pub const V_BACK: u16 = 20;
pub const V_DISP: u16 = 720;
pub const V_FRONT: u16 = 5;
pub const V_TOTAL: u16 = V_SYNC + V_BACK + V_DISP + V_FRONT;

/// First `h_count` inside the visible window.
pub const H_ACTIVE_START: u16 = H_SYNC + H_BACK;
/// First `v_count` inside the visible window.
pub const V_ACTIVE_START: u16 = V_SYNC + V_BACK;

pub const CYCLES_PER_FRAME: u32 = H_TOTAL as u32 * V_TOTAL as u32;
pub const PIXELS_PER_FRAME: usize = H_DISP as usize * V_DISP as usize;

/// Visible pixel, relative to the top-left of the active window.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PixelCoordinate {
    pub x: u16,
    pub y: u16,
}

/// Everything the raster counters drive combinationally for one cycle.
///
/// `x` and `y` are raw counter differences and carry no meaning while
/// `display_enable` is low.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RasterSignals {
    pub hsync: bool,
    pub vsync: bool,
    pub display_enable: bool,
    pub x: u16,
    pub y: u16,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RasterPosition {
    pub h_count: u16,
    pub v_count: u16,
}

impl RasterPosition {
    pub const fn new() -> Self {
        Self { h_count: 0, v_count: 0 }
    }

    #[inline(always)]
    pub fn advance(&mut self) {
        if self.h_count == H_TOTAL - 1 {
            self.h_count = 0;
            self.v_count = if self.v_count == V_TOTAL - 1 {
                0
            } else {
                self.v_count + 1
            };
        } else {
            self.h_count += 1;
        }
    }

    #[inline(always)]
    pub fn signals(&self) -> RasterSignals {
        let h_active = (H_ACTIVE_START..H_ACTIVE_START + H_DISP).contains(&self.h_count);
        let v_active = (V_ACTIVE_START..V_ACTIVE_START + V_DISP).contains(&self.v_count);

        RasterSignals {
            hsync: self.h_count < H_SYNC,
            vsync: self.v_count < V_SYNC,
            display_enable: h_active && v_active,
            x: self.h_count.wrapping_sub(H_ACTIVE_START),
            y: self.v_count.wrapping_sub(V_ACTIVE_START),
        }
    }

    pub fn pixel(&self) -> Option<PixelCoordinate> {
        let signals = self.signals();
        if signals.display_enable {
            Some(PixelCoordinate { x: signals.x, y: signals.y })
        } else {
            None
        }
    }
}
