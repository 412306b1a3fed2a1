use hal::{Clock, I2cDevice, ImuSensor, ImuStatus, Vector3d, Vector3i};
use log::{debug, info, warn};

use crate::error::{DriverError, DriverResult, InvalidArgument};
use crate::imu::{vector_from_pairs, AngleIntegrator};

// MPU6050 I2C addresses (depends on AD0 pin state)
pub const MPU6050_I2C_ADDR_PRIMARY: u8 = 0x68;
pub const MPU6050_I2C_ADDR_SECONDARY: u8 = 0x69;

// Register addresses (high byte of each big-endian pair)
pub const MPU6050_REG_PWR_MGMT_1: u8 = 0x6B;
pub const MPU6050_REG_TEMP_OUT_H: u8 = 0x41;
pub const MPU6050_REG_ACCEL_XOUT_H: u8 = 0x3B;
pub const MPU6050_REG_ACCEL_YOUT_H: u8 = 0x3D;
pub const MPU6050_REG_ACCEL_ZOUT_H: u8 = 0x3F;
pub const MPU6050_REG_GYRO_XOUT_H: u8 = 0x43;
pub const MPU6050_REG_GYRO_YOUT_H: u8 = 0x45;
pub const MPU6050_REG_GYRO_ZOUT_H: u8 = 0x47;

// Clearing PWR_MGMT_1 takes the chip out of sleep on the internal oscillator
pub const MPU6050_WAKE_CMD: u8 = 0x00;

// Temperature conversion: raw / 340 + 36.53 °C
pub const MPU6050_TEMP_SENSITIVITY: f32 = 340.0;
pub const MPU6050_TEMP_OFFSET_C: f32 = 36.53;

const ACCEL_REGS: [u8; 3] = [
    MPU6050_REG_ACCEL_XOUT_H,
    MPU6050_REG_ACCEL_YOUT_H,
    MPU6050_REG_ACCEL_ZOUT_H,
];

const GYRO_REGS: [u8; 3] = [
    MPU6050_REG_GYRO_XOUT_H,
    MPU6050_REG_GYRO_YOUT_H,
    MPU6050_REG_GYRO_ZOUT_H,
];

/// Gyroscope full-scale range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GyroRange {
    Dps250,
    Dps500,
    Dps1000,
    Dps2000,
}

impl GyroRange {
    /// LSB per °/s
    pub fn sensitivity(self) -> f32 {
        match self {
            GyroRange::Dps250 => 131.0,
            GyroRange::Dps500 => 65.5,
            GyroRange::Dps1000 => 32.8,
            GyroRange::Dps2000 => 16.4,
        }
    }
}

/// Accelerometer full-scale range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccelRange {
    G2,
    G4,
    G8,
    G16,
}

impl AccelRange {
    /// LSB per g
    pub fn sensitivity(self) -> f32 {
        match self {
            AccelRange::G2 => 16384.0,
            AccelRange::G4 => 8192.0,
            AccelRange::G8 => 4096.0,
            AccelRange::G16 => 2048.0,
        }
    }
}

/// Configuration for MPU6050 sensor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mpu6050Config {
    /// I2C address of the MPU6050 (0x68 or 0x69)
    pub i2c_addr: u8,

    /// Gyroscope LSB per °/s
    pub gyro_sensitivity: f32,

    /// Accelerometer LSB per g
    pub accel_sensitivity: f32,

    /// Samples averaged by each gyro calibration
    pub calibration_samples: u16,

    /// Pause between calibration samples
    pub calibration_interval_ms: u32,

    /// Settling time after waking the device
    pub wake_delay_ms: u32,
}

impl Default for Mpu6050Config {
    fn default() -> Self {
        Self {
            i2c_addr: MPU6050_I2C_ADDR_PRIMARY,
            gyro_sensitivity: GyroRange::Dps250.sensitivity(),
            accel_sensitivity: AccelRange::G2.sensitivity(),
            calibration_samples: 200,
            calibration_interval_ms: 10,
            wake_delay_ms: 100,
        }
    }
}

impl Mpu6050Config {
    pub fn with_address(mut self, i2c_addr: u8) -> Self {
        self.i2c_addr = i2c_addr;
        self
    }

    pub fn with_gyro_range(mut self, range: GyroRange) -> Self {
        self.gyro_sensitivity = range.sensitivity();
        self
    }

    pub fn with_accel_range(mut self, range: AccelRange) -> Self {
        self.accel_sensitivity = range.sensitivity();
        self
    }

    pub fn with_calibration(mut self, samples: u16, interval_ms: u32) -> Self {
        self.calibration_samples = samples;
        self.calibration_interval_ms = interval_ms;
        self
    }

    pub fn with_wake_delay(mut self, wake_delay_ms: u32) -> Self {
        self.wake_delay_ms = wake_delay_ms;
        self
    }
}

/// Combine a big-endian register pair into a signed two's-complement value
pub fn decode_raw(high: u8, low: u8) -> i16 {
    i16::from_be_bytes([high, low])
}

/// MPU6050 accelerometer + gyroscope driver
///
/// Every reading is a fresh blocking bus transaction. The gyro bias is
/// measured once at construction and subtracted from every angular-velocity
/// reading; the integrated angle advances each time `get_theta` is called.
pub struct Mpu6050<I: I2cDevice, C: Clock> {
    /// I2C device for communication
    i2c: I,
    /// Monotonic clock used for delays and integration steps
    clock: C,
    /// Current addressing, scaling and calibration settings
    config: Mpu6050Config,
    /// Gyro bias in °/s, subtracted from every angular-velocity reading
    gyro_offset: Vector3d,
    /// Integrated orientation
    integrator: AngleIntegrator,
    /// Whether the last bus transaction succeeded
    healthy: bool,
    /// Last temperature read in Celsius
    last_temperature_c: f32,
    /// Clock reading of the last successful measurement
    last_reading_ms: u32,
}

impl<I: I2cDevice, C: Clock> Mpu6050<I, C> {
    /// Wake the device at the primary address and calibrate the gyro
    ///
    /// Blocks for the wake delay plus the whole calibration window
    /// (about 2.1 s with defaults); the device must stay still meanwhile.
    pub fn new(i2c: I, clock: C) -> DriverResult<Self, I::Error> {
        Self::new_with_config(i2c, clock, Mpu6050Config::default())
    }

    /// Create a new MPU6050 driver with custom configuration
    pub fn new_with_config(i2c: I, clock: C, config: Mpu6050Config) -> DriverResult<Self, I::Error> {
        let now = clock.now_ms();
        let mut imu = Self {
            i2c,
            clock,
            config,
            gyro_offset: Vector3d::zeros(),
            integrator: AngleIntegrator::new(now),
            healthy: false,
            last_temperature_c: 0.0,
            last_reading_ms: now,
        };

        imu.wake()?;

        let now = imu.clock.now_ms();
        imu.integrator.reset(now);
        imu.gyro_offset = imu.calibrate_gyro(imu.config.calibration_samples)?;

        Ok(imu)
    }

    /// Give back the bus and clock
    pub fn release(self) -> (I, C) {
        (self.i2c, self.clock)
    }

    /// Read a register
    fn read_register(&mut self, reg: u8) -> DriverResult<u8, I::Error> {
        match self.i2c.read_reg(self.config.i2c_addr, reg) {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!("MPU6050 read of register {:#04x} failed: {:?}", reg, e);
                self.healthy = false;
                Err(DriverError::Transport(e))
            }
        }
    }

    /// Write to a register
    fn write_register(&mut self, reg: u8, value: u8) -> DriverResult<(), I::Error> {
        match self.i2c.write_reg(self.config.i2c_addr, reg, value) {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!("MPU6050 write of register {:#04x} failed: {:?}", reg, e);
                self.healthy = false;
                Err(DriverError::Transport(e))
            }
        }
    }

    fn wake(&mut self) -> DriverResult<(), I::Error> {
        self.write_register(MPU6050_REG_PWR_MGMT_1, MPU6050_WAKE_CMD)?;
        self.clock.delay_ms(self.config.wake_delay_ms);
        self.healthy = true;
        info!("MPU6050 awake at address {:#04x}", self.config.i2c_addr);
        Ok(())
    }

    fn mark_reading(&mut self) {
        self.healthy = true;
        self.last_reading_ms = self.clock.now_ms();
    }

    /// Read a signed 16-bit measurement from `reg` (high) and `reg + 1` (low)
    ///
    /// Uses two single-byte reads; nothing is cached.
    pub fn read_raw(&mut self, reg: u8) -> DriverResult<i16, I::Error> {
        let high = self.read_register(reg)?;
        let low = self.read_register(reg.wrapping_add(1))?;
        Ok(decode_raw(high, low))
    }

    /// Read three consecutive measurements and divide each by `sensitivity`
    fn read_scaled(&mut self, regs: &[u8; 3], sensitivity: f32) -> DriverResult<Vector3d, I::Error> {
        let x = self.read_raw(regs[0])?;
        let y = self.read_raw(regs[1])?;
        let z = self.read_raw(regs[2])?;
        self.mark_reading();

        Ok(Vector3d::new(
            x as f32 / sensitivity,
            y as f32 / sensitivity,
            z as f32 / sensitivity,
        ))
    }

    /// Die temperature in Celsius
    pub fn get_temp(&mut self) -> DriverResult<f32, I::Error> {
        let raw = self.read_raw(MPU6050_REG_TEMP_OUT_H)?;
        self.mark_reading();

        let temperature = raw as f32 / MPU6050_TEMP_SENSITIVITY + MPU6050_TEMP_OFFSET_C;
        self.last_temperature_c = temperature;
        Ok(temperature)
    }

    /// Acceleration in g, not bias corrected
    pub fn get_accel(&mut self) -> DriverResult<Vector3d, I::Error> {
        let sensitivity = self.config.accel_sensitivity;
        self.read_scaled(&ACCEL_REGS, sensitivity)
    }

    /// Angular velocity in °/s before bias subtraction
    pub fn get_omega_uncorrected(&mut self) -> DriverResult<Vector3d, I::Error> {
        let sensitivity = self.config.gyro_sensitivity;
        self.read_scaled(&GYRO_REGS, sensitivity)
    }

    /// Bias-corrected angular velocity in °/s
    pub fn get_omega(&mut self) -> DriverResult<Vector3d, I::Error> {
        Ok(self.get_omega_uncorrected()? - self.gyro_offset)
    }

    /// Average `samples` uncorrected gyro readings into a bias estimate
    ///
    /// Blocking: sleeps `calibration_interval_ms` after every sample. The
    /// device has to stay still for the whole window; nothing checks that.
    /// The stored offset is left untouched, see [`Self::reset_gyro_offset`].
    pub fn calibrate_gyro(&mut self, samples: u16) -> DriverResult<Vector3d, I::Error> {
        if samples == 0 {
            return Err(InvalidArgument::NoSamples.into());
        }

        info!("Calibrating gyro (ω), keep device still...");
        let mut sum = Vector3d::zeros();
        for _ in 0..samples {
            sum += self.get_omega_uncorrected()?;
            self.clock.delay_ms(self.config.calibration_interval_ms);
        }

        let offset = sum / samples as f32;
        info!(
            "Calibration complete. ω offset: x={} y={} z={}",
            offset.x, offset.y, offset.z
        );
        Ok(offset)
    }

    /// Advance the angle integration by one step
    ///
    /// The time origin moves to now even when the gyro read fails; in that
    /// case the accumulated angle is left unchanged.
    pub fn update_theta(&mut self) -> DriverResult<(), I::Error> {
        let dt = self.integrator.advance(self.clock.now_ms());
        let omega = self.get_omega()?;
        self.integrator.integrate(&omega, dt);
        debug!(
            "θ step dt={}s ω=({}, {}, {})",
            dt, omega.x, omega.y, omega.z
        );
        Ok(())
    }

    /// Integrate up to now and return the whole-degree angle
    pub fn get_theta(&mut self) -> DriverResult<Vector3i, I::Error> {
        self.update_theta()?;
        Ok(self.integrator.theta())
    }

    /// Whole-degree angle as of the last step, without reading the device
    pub fn theta(&self) -> Vector3i {
        self.integrator.theta()
    }

    /// Full-precision angle as of the last step
    pub fn theta_precise(&self) -> Vector3d {
        self.integrator.theta_precise()
    }

    /// Zero the angle and restart integration from now
    pub fn reset_theta(&mut self) {
        let now = self.clock.now_ms();
        self.integrator.reset(now);
    }

    /// Re-measure the gyro bias; the previous bias is kept if this fails
    pub fn reset_gyro_offset(&mut self) -> DriverResult<(), I::Error> {
        self.gyro_offset = self.calibrate_gyro(self.config.calibration_samples)?;
        Ok(())
    }

    /// Replace the gyro bias from a keyed mapping holding "x", "y" and "z"
    ///
    /// ```ignore
    /// imu.set_gyro_offset([("x", 0.4), ("y", -0.1), ("z", 0.0)])?;
    /// ```
    pub fn set_gyro_offset<'a, P>(&mut self, offset: P) -> DriverResult<(), I::Error>
    where
        P: IntoIterator<Item = (&'a str, f32)>,
    {
        self.gyro_offset = vector_from_pairs(offset)?;
        Ok(())
    }

    pub fn set_gyro_bias(&mut self, bias: Vector3d) {
        self.gyro_offset = bias;
    }

    pub fn gyro_offset(&self) -> Vector3d {
        self.gyro_offset
    }

    pub fn set_gyro_sensitivity(&mut self, factor: f32) {
        self.config.gyro_sensitivity = factor;
    }

    pub fn set_accel_sensitivity(&mut self, factor: f32) {
        self.config.accel_sensitivity = factor;
    }

    pub fn set_gyro_range(&mut self, range: GyroRange) {
        self.set_gyro_sensitivity(range.sensitivity());
    }

    pub fn set_accel_range(&mut self, range: AccelRange) {
        self.set_accel_sensitivity(range.sensitivity());
    }

    pub fn gyro_sensitivity(&self) -> f32 {
        self.config.gyro_sensitivity
    }

    pub fn accel_sensitivity(&self) -> f32 {
        self.config.accel_sensitivity
    }

    pub fn config(&self) -> &Mpu6050Config {
        &self.config
    }
}

impl<I: I2cDevice, C: Clock> ImuSensor for Mpu6050<I, C> {
    type Error = DriverError<I::Error>;

    fn temperature(&mut self) -> Result<f32, Self::Error> {
        self.get_temp()
    }

    fn acceleration(&mut self) -> Result<Vector3d, Self::Error> {
        self.get_accel()
    }

    fn angular_velocity(&mut self) -> Result<Vector3d, Self::Error> {
        self.get_omega()
    }

    fn calibrate_gyro(&mut self) -> Result<(), Self::Error> {
        self.reset_gyro_offset()
    }

    fn gyro_bias(&self) -> Vector3d {
        self.gyro_offset
    }

    fn set_gyro_bias(&mut self, bias: Vector3d) {
        self.gyro_offset = bias;
    }

    fn get_status(&self) -> ImuStatus {
        ImuStatus {
            healthy: self.healthy,
            temperature: self.last_temperature_c,
            last_reading_ms: self.last_reading_ms,
        }
    }
}
