#![cfg_attr(not(any(test, feature = "std")), no_std)]
extern crate nalgebra;

mod clock;
mod i2c;
mod imu;
mod types;

pub use clock::*;
pub use i2c::*;
pub use imu::*;
pub use types::*;
