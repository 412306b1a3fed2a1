/// IMU (Inertial Measurement Unit) sensor interface
use crate::types::Vector3d;

/// Blocking 6-DoF IMU interface (accelerometer + gyroscope)
///
/// Every read performs a fresh bus transaction; nothing is cached between
/// calls apart from what `get_status` reports.
pub trait ImuSensor {
    /// Error raised when a reading or calibration cannot complete
    type Error;

    /// Get the current temperature of the IMU in Celsius
    fn temperature(&mut self) -> Result<f32, Self::Error>;

    /// Get acceleration data (in g)
    fn acceleration(&mut self) -> Result<Vector3d, Self::Error>;

    /// Get bias-corrected gyroscope data (in °/s)
    fn angular_velocity(&mut self) -> Result<Vector3d, Self::Error>;

    /// Calibrate the gyroscope specifically
    ///
    /// The device should remain stationary during this process
    fn calibrate_gyro(&mut self) -> Result<(), Self::Error>;

    /// Get the current gyroscope bias correction
    fn gyro_bias(&self) -> Vector3d;

    /// Set the gyroscope bias correction
    fn set_gyro_bias(&mut self, bias: Vector3d);

    /// Get detailed information about the IMU status
    fn get_status(&self) -> ImuStatus;
}

/// IMU sensor status information
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImuStatus {
    /// Whether the last bus transaction succeeded
    pub healthy: bool,

    /// Temperature of the sensor in Celsius, from the last temperature read
    pub temperature: f32,

    /// Clock timestamp of the last successful reading in milliseconds
    pub last_reading_ms: u32,
}
