#![cfg_attr(not(any(test, feature = "std")), no_std)]

mod error;
pub mod imu;

#[cfg(test)]
mod mock;

pub use error::*;
pub use imu::mpu6050::{AccelRange, GyroRange, Mpu6050, Mpu6050Config};
pub use imu::{AngleIntegrator, Axis};
