#![no_std]
#![allow(clippy::single_match)]
extern crate alloc;

pub mod color;
pub mod divider;
pub mod emulator;
pub mod game;
pub mod inputs;
pub mod lfsr;
pub mod raster;
pub mod resolver;
pub mod system;
pub mod video;
