use bytemuck::{Pod, Zeroable};

/// One pixel as driven onto the three 8-bit color channels.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Rgb888 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb888 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

pub const BLACK: Rgb888 = Rgb888::new(0x00, 0x00, 0x00);
pub const FOOD: Rgb888 = Rgb888::new(0xFF, 0x00, 0x00);
pub const SNAKE: Rgb888 = Rgb888::new(0x00, 0xFF, 0x00);
pub const BACKGROUND: Rgb888 = Rgb888::new(0x00, 0x00, 0x20);
