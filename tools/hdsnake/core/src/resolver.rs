//! Per-pixel color decision.
//!
//! This is the inner loop of the whole simulator: it runs once per visible
//! pixel clock and scans the live body for every one of them.

use crate::color::{Rgb888, BACKGROUND, BLACK, FOOD, SNAKE};
use crate::game::{Cell, GameState, CELL_SIZE};
use crate::raster::{RasterSignals, H_DISP, V_DISP};

#[inline(always)]
pub fn cell_at(x: u16, y: u16) -> Cell {
    Cell::new((x / CELL_SIZE) as u8, (y / CELL_SIZE) as u8)
}

/// Food wins over body, body over background; blanking is always black.
#[inline]
pub fn resolve_pixel(signals: &RasterSignals, state: &GameState) -> Rgb888 {
    if !signals.display_enable {
        return BLACK;
    }

    let cell = cell_at(signals.x, signals.y);
    if cell == state.food() {
        FOOD
    } else if state.occupies(cell) {
        SNAKE
    } else {
        BACKGROUND
    }
}

/// Renders the visible window straight from `state`, without the output
/// register delay. `out` must hold `H_DISP * V_DISP` pixels.
pub fn render_frame(state: &GameState, out: &mut [Rgb888]) {
    for (i, pixel) in out.iter_mut().enumerate().take(H_DISP as usize * V_DISP as usize) {
        let signals = RasterSignals {
            hsync: false,
            vsync: false,
            display_enable: true,
            x: (i % H_DISP as usize) as u16,
            y: (i / H_DISP as usize) as u16,
        };
        *pixel = resolve_pixel(&signals, state);
    }
}
