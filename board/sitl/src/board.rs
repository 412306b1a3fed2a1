use std::sync::{Arc, RwLock};

use driver::imu::mpu6050::MPU6050_I2C_ADDR_PRIMARY;
use hal::StdClock;

use crate::sim::{SimState, SimulatedMpu6050};

/// Host board wiring a simulated MPU6050 to the wall clock
pub struct SitlBoard {
    imu_bus: SimulatedMpu6050,
    clock: StdClock,
}

impl SitlBoard {
    pub fn new(state: SimState) -> Self {
        SitlBoard {
            imu_bus: SimulatedMpu6050::new(MPU6050_I2C_ADDR_PRIMARY, state),
            clock: StdClock::new(),
        }
    }

    pub fn get_name(&self) -> &str {
        "SITL"
    }

    /// Shared motion state of the simulated sensor
    pub fn sim_state(&self) -> Arc<RwLock<SimState>> {
        self.imu_bus.state_handle()
    }

    /// Hand out the IMU bus and the clock
    pub fn split_resources(self) -> (SimulatedMpu6050, StdClock) {
        (self.imu_bus, self.clock)
    }
}
