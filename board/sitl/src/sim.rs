use std::sync::{Arc, RwLock};

use driver::imu::mpu6050::{
    MPU6050_REG_ACCEL_XOUT_H, MPU6050_REG_GYRO_XOUT_H, MPU6050_REG_PWR_MGMT_1,
    MPU6050_REG_TEMP_OUT_H, MPU6050_TEMP_OFFSET_C, MPU6050_TEMP_SENSITIVITY,
};
use driver::{AccelRange, GyroRange};
use hal::{I2cDevice, Vector3d};
use thiserror::Error;

const REGISTER_COUNT: usize = 128;

// PWR_MGMT_1 value after power-on: SLEEP bit set
const PWR_MGMT_1_RESET: u8 = 0x40;
const SLEEP_BIT: u8 = 0x40;

/// Motion and environment seen by the simulated sensor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimState {
    /// Body rotation rate in °/s
    pub roll_rate: f32,
    pub pitch_rate: f32,
    pub yaw_rate: f32,
    /// Constant gyro error in °/s added on top of the body rate
    pub gyro_bias: Vector3d,
    /// Specific force in g
    pub acceleration: Vector3d,
    /// Die temperature in Celsius
    pub temperature: f32,
}

impl SimState {
    /// A level, motionless board on a desk
    pub fn new() -> Self {
        Self {
            roll_rate: 0.0,
            pitch_rate: 0.0,
            yaw_rate: 0.0,
            gyro_bias: Vector3d::new(0.8, -0.4, 0.25),
            acceleration: Vector3d::new(0.0, 0.0, 1.0),
            temperature: 24.0,
        }
    }

    fn body_rate(&self) -> Vector3d {
        Vector3d::new(self.roll_rate, self.pitch_rate, self.yaw_rate)
    }
}

impl Default for SimState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimBusError {
    #[error("no device acknowledged address {0:#04x}")]
    Nack(u8),
    #[error("register {0:#04x} is outside the register file")]
    RegisterOutOfRange(u8),
    #[error("transaction carried no register address")]
    MissingRegister,
}

/// Register-level model of an MPU6050 at its power-on ranges
///
/// Measurement registers are refreshed from the shared [`SimState`] on every
/// read while the device is awake, and read as zero while it sleeps.
#[derive(Debug)]
pub struct SimulatedMpu6050 {
    addr: u8,
    registers: [u8; REGISTER_COUNT],
    state: Arc<RwLock<SimState>>,
}

impl SimulatedMpu6050 {
    pub fn new(addr: u8, state: SimState) -> Self {
        let mut registers = [0u8; REGISTER_COUNT];
        registers[MPU6050_REG_PWR_MGMT_1 as usize] = PWR_MGMT_1_RESET;
        Self {
            addr,
            registers,
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Handle for steering the simulated motion while a driver owns the bus
    pub fn state_handle(&self) -> Arc<RwLock<SimState>> {
        self.state.clone()
    }

    pub fn is_awake(&self) -> bool {
        self.registers[MPU6050_REG_PWR_MGMT_1 as usize] & SLEEP_BIT == 0
    }

    fn store(&mut self, reg: u8, value: f32) {
        let raw = value
            .round()
            .clamp(i16::MIN as f32, i16::MAX as f32) as i16;
        let [high, low] = raw.to_be_bytes();
        self.registers[reg as usize] = high;
        self.registers[reg as usize + 1] = low;
    }

    fn refresh_measurements(&mut self) {
        let state = match self.state.read() {
            Ok(state) => *state,
            Err(poisoned) => *poisoned.into_inner(),
        };

        if !self.is_awake() {
            for reg in MPU6050_REG_ACCEL_XOUT_H..MPU6050_REG_GYRO_XOUT_H + 6 {
                self.registers[reg as usize] = 0;
            }
            return;
        }

        let accel = state.acceleration * AccelRange::G2.sensitivity();
        let omega = (state.body_rate() + state.gyro_bias) * GyroRange::Dps250.sensitivity();
        let temperature = (state.temperature - MPU6050_TEMP_OFFSET_C) * MPU6050_TEMP_SENSITIVITY;

        for (i, value) in accel.iter().enumerate() {
            self.store(MPU6050_REG_ACCEL_XOUT_H + 2 * i as u8, *value);
        }
        self.store(MPU6050_REG_TEMP_OUT_H, temperature);
        for (i, value) in omega.iter().enumerate() {
            self.store(MPU6050_REG_GYRO_XOUT_H + 2 * i as u8, *value);
        }
    }

    fn check_addr(&self, addr: u8) -> Result<(), SimBusError> {
        if addr == self.addr {
            Ok(())
        } else {
            Err(SimBusError::Nack(addr))
        }
    }
}

impl I2cDevice for SimulatedMpu6050 {
    type Error = SimBusError;

    fn write(&mut self, addr: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.check_addr(addr)?;
        let (reg, values) = data.split_first().ok_or(SimBusError::MissingRegister)?;
        if *reg as usize + values.len() > REGISTER_COUNT {
            return Err(SimBusError::RegisterOutOfRange(*reg));
        }
        self.registers[*reg as usize..*reg as usize + values.len()].copy_from_slice(values);
        Ok(())
    }

    fn write_read(
        &mut self,
        addr: u8,
        write_data: &[u8],
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.check_addr(addr)?;
        let reg = *write_data.first().ok_or(SimBusError::MissingRegister)?;
        if reg as usize + read_data.len() > REGISTER_COUNT {
            return Err(SimBusError::RegisterOutOfRange(reg));
        }
        self.refresh_measurements();
        read_data.copy_from_slice(&self.registers[reg as usize..reg as usize + read_data.len()]);
        Ok(())
    }
}
