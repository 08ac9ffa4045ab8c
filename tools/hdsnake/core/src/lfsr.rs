//! Food placement randomizer: two 5-bit Fibonacci LFSRs.
//!
//! Both registers only move when food is eaten, so the food sequence is a
//! pure function of the number of meals since reset.

use bit_field::BitField;
use crate::game::{Cell, GRID_H, GRID_W};

pub const SEED_X: u8 = 0b10101;
pub const SEED_Y: u8 = 0b01011;

/// Shifts left by one; the new low bit is `bit4 ^ bit TAP`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Lfsr5<const TAP: usize> {
    state: u8,
}

impl<const TAP: usize> Lfsr5<TAP> {
    pub const fn new(seed: u8) -> Self {
        Self { state: seed & 0b1_1111 }
    }

    #[inline]
    pub fn value(&self) -> u8 {
        self.state
    }

    #[inline]
    pub fn advance(&mut self) -> u8 {
        let feedback = self.state.get_bit(4) ^ self.state.get_bit(TAP);
        let mut next = self.state.get_bits(0..4) << 1;
        next.set_bit(0, feedback);
        self.state = next;
        next
    }
}

pub type LfsrX = Lfsr5<2>;
pub type LfsrY = Lfsr5<1>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FoodGenerator {
    pub x: LfsrX,
    pub y: LfsrY,
}

impl FoodGenerator {
    pub const fn new() -> Self {
        Self {
            x: LfsrX::new(SEED_X),
            y: LfsrY::new(SEED_Y),
        }
    }

    /// Advances both registers once and maps the new values onto the grid.
    pub fn next_food(&mut self) -> Cell {
        let x = self.x.advance();
        let y = self.y.advance();
        Cell::new(x % GRID_W, y % GRID_H)
    }
}

impl Default for FoodGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period<const TAP: usize>(seed: u8) -> usize {
        let mut lfsr = Lfsr5::<TAP>::new(seed);
        let mut steps = 0;
        loop {
            lfsr.advance();
            steps += 1;
            if lfsr.value() == seed || steps > 64 {
                return steps;
            }
        }
    }

    #[test]
    fn single_steps_from_seed() {
        let mut x = LfsrX::new(SEED_X);
        assert_eq!(x.advance(), 0b01010);
        assert_eq!(x.advance(), 0b10100);

        let mut y = LfsrY::new(SEED_Y);
        assert_eq!(y.advance(), 0b10111);
        assert_eq!(y.advance(), 0b01110);
    }

    #[test]
    fn both_taps_are_maximal_length() {
        assert_eq!(period::<2>(SEED_X), 31);
        assert_eq!(period::<1>(SEED_Y), 31);
    }

    #[test]
    fn never_locks_up_from_nonzero_state() {
        let mut x = LfsrX::new(SEED_X);
        let mut y = LfsrY::new(SEED_Y);
        for _ in 0..100 {
            assert_ne!(x.advance(), 0);
            assert_ne!(y.advance(), 0);
        }
    }

    #[test]
    fn food_sequence_from_reset() {
        let mut food = FoodGenerator::new();
        let seq: [Cell; 6] = core::array::from_fn(|_| food.next_food());
        assert_eq!(
            seq,
            [
                Cell::new(10, 5),
                Cell::new(20, 14),
                Cell::new(8, 11),
                Cell::new(16, 9),
                Cell::new(1, 4),
                Cell::new(2, 12),
            ]
        );
    }

    #[test]
    fn food_is_always_on_grid() {
        let mut food = FoodGenerator::new();
        for _ in 0..62 {
            assert!(food.next_food().is_on_grid());
        }
    }
}
