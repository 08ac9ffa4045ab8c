//! Snake game state, advanced once per game tick.
//!
//! The body lives in a fixed arena of `MAX_LEN` slots. Only the first
//! `length` slots are snake; the rest hold whatever was last written there
//! (including the raw reset pattern) and must stay masked out.

use heapless::Vec as HVec;
use log::{debug, info, warn};
use crate::inputs::{ButtonPort, ControllerButton};
use crate::lfsr::FoodGenerator;
use crate::raster::{H_DISP, V_DISP};

pub const CELL_SIZE: u16 = 40;
pub const GRID_W: u8 = (H_DISP / CELL_SIZE) as u8;
pub const GRID_H: u8 = (V_DISP / CELL_SIZE) as u8;

pub const MAX_LEN: usize = 128;
pub const INITIAL_LENGTH: usize = 4;
pub const INITIAL_HEAD: Cell = Cell::new(14, 9);
pub const INITIAL_FOOD: Cell = Cell::new(20, 6);

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cell {
    pub cx: u8,
    pub cy: u8,
}

impl Cell {
    pub const fn new(cx: u8, cy: u8) -> Self {
        Self { cx, cy }
    }

    pub fn is_on_grid(&self) -> bool {
        self.cx < GRID_W && self.cy < GRID_H
    }

    /// One cell along `direction`, wrapping at the grid edges.
    pub fn stepped(self, direction: Direction) -> Cell {
        let Cell { cx, cy } = self;
        match direction {
            Direction::Up => Cell::new(cx, if cy == 0 { GRID_H - 1 } else { cy - 1 }),
            Direction::Down => Cell::new(cx, if cy >= GRID_H - 1 { 0 } else { cy + 1 }),
            Direction::Left => Cell::new(if cx == 0 { GRID_W - 1 } else { cx - 1 }, cy),
            Direction::Right => Cell::new(if cx >= GRID_W - 1 { 0 } else { cx + 1 }, cy),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const fn reverse(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

impl From<ControllerButton> for Direction {
    fn from(button: ControllerButton) -> Self {
        match button {
            ControllerButton::Up => Direction::Up,
            ControllerButton::Down => Direction::Down,
            ControllerButton::Left => Direction::Left,
            ControllerButton::Right => Direction::Right,
        }
    }
}

/// Applies every pressed button in priority order, each overriding the last.
/// Reversal is judged against the direction held before the tick.
pub fn steer(current: Direction, buttons: ButtonPort) -> Direction {
    let mut next = current;
    for button in ControllerButton::PRIORITY {
        let wanted = Direction::from(button);
        if buttons.is_pressed(button) && wanted != current.reverse() {
            next = wanted;
        }
    }
    next
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub ate: bool,
    pub grew: bool,
}

/// Live part of the game state, detached from the arena.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameSnapshot {
    pub body: HVec<Cell, MAX_LEN>,
    pub direction: Direction,
    pub food: Cell,
}

impl GameSnapshot {
    pub fn length(&self) -> usize {
        self.body.len()
    }

    pub fn head(&self) -> Option<Cell> {
        self.body.first().copied()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    body: [Cell; MAX_LEN],
    length: usize,
    direction: Direction,
    food: Cell,
    food_gen: FoodGenerator,
}

impl GameState {
    pub fn new() -> Self {
        let mut body = [Cell::default(); MAX_LEN];
        for (i, slot) in body.iter_mut().enumerate() {
            // wraps for i > 14; those slots are masked until the snake grows into them
            *slot = Cell::new(INITIAL_HEAD.cx.wrapping_sub(i as u8), INITIAL_HEAD.cy);
        }

        Self {
            body,
            length: INITIAL_LENGTH,
            direction: Direction::Right,
            food: INITIAL_FOOD,
            food_gen: FoodGenerator::new(),
        }
    }

    pub fn step(&mut self, buttons: ButtonPort) -> TickOutcome {
        self.direction = steer(self.direction, buttons);

        // memmove semantics: every slot reads its pre-tick neighbour
        self.body.copy_within(0..self.length - 1, 1);

        let head = self.body[0].stepped(self.direction);
        self.body[0] = head;

        let mut outcome = TickOutcome::default();
        if head == self.food {
            outcome.ate = true;
            if self.length < MAX_LEN - 1 {
                self.length += 1;
                outcome.grew = true;
            } else {
                warn!("snake is at maximum length {}, not growing", self.length);
            }

            self.food = self.food_gen.next_food();
            info!("ate food at ({}, {}); length {}, next food at ({}, {})",
                head.cx, head.cy, self.length, self.food.cx, self.food.cy);
        }

        debug!("tick: head ({}, {}) heading {:?}, length {}", head.cx, head.cy, self.direction, self.length);
        outcome
    }

    /// Whether `cell` is covered by a live body segment.
    #[inline]
    pub fn occupies(&self, cell: Cell) -> bool {
        self.body().iter().any(|segment| *segment == cell)
    }

    #[inline]
    pub fn body(&self) -> &[Cell] {
        &self.body[..self.length]
    }

    /// The whole arena, stale slots included.
    pub fn raw_slots(&self) -> &[Cell; MAX_LEN] {
        &self.body
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[inline]
    pub fn food(&self) -> Cell {
        self.food
    }

    pub fn food_generator(&self) -> &FoodGenerator {
        &self.food_gen
    }

    #[cfg(test)]
    pub(crate) fn place_food(&mut self, food: Cell) {
        self.food = food;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            body: self.body().iter().copied().collect(),
            direction: self.direction,
            food: self.food,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
