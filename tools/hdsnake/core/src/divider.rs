use log::warn;

/// Width of the free-running tick counter on hardware.
pub const DEFAULT_TICK_BITS: u32 = 23;

/// Free-running pixel-clock counter; its rollover is the game tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TickDivider {
    counter: u32,
    mask: u32,
}

impl TickDivider {
    pub fn new(bits: u32) -> Self {
        let clamped = bits.clamp(1, 31);
        if clamped != bits {
            warn!("tick divider width {} out of range, using {}", bits, clamped);
        }

        Self {
            counter: 0,
            mask: (1u32 << clamped) - 1,
        }
    }

    #[inline(always)]
    pub fn is_rollover(&self) -> bool {
        self.counter == self.mask
    }

    /// Clocks the counter once, returning whether this edge was the rollover.
    #[inline(always)]
    pub fn advance(&mut self) -> bool {
        let tick = self.is_rollover();
        self.counter = self.counter.wrapping_add(1) & self.mask;
        tick
    }

    pub fn reset(&mut self) {
        self.counter = 0;
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Pixel clocks between two ticks.
    pub fn period(&self) -> u64 {
        self.mask as u64 + 1
    }
}

impl Default for TickDivider {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_BITS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_lands_on_last_count() {
        let mut div = TickDivider::new(3);
        let ticks: [bool; 16] = core::array::from_fn(|_| div.advance());
        assert_eq!(
            ticks,
            [
                false, false, false, false, false, false, false, true,
                false, false, false, false, false, false, false, true,
            ]
        );
    }

    #[test]
    fn hardware_period() {
        let div = TickDivider::default();
        assert_eq!(div.period(), 1 << 23);
    }

    #[test]
    fn reset_restarts_the_count() {
        let mut div = TickDivider::new(2);
        div.advance();
        div.advance();
        div.reset();
        assert_eq!(div.counter(), 0);
        assert!(!div.advance());
        assert!(!div.advance());
        assert!(!div.advance());
        assert!(div.advance());
    }

    #[test]
    fn width_is_clamped() {
        assert_eq!(TickDivider::new(0).period(), 2);
        assert_eq!(TickDivider::new(40).period(), 1 << 31);
    }
}
