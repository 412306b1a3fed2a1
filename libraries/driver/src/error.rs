use thiserror::Error;

use crate::imu::Axis;

/// Primary error type for the sensor drivers
///
/// `E` is the error type of the bus transport the driver talks through.
#[derive(Error, Debug, PartialEq)]
pub enum DriverError<E> {
    /// Bus write or read failed; never retried by the driver
    #[error("Bus transport error: {0:?}")]
    Transport(E),

    /// A caller-supplied argument was rejected before touching the bus
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] InvalidArgument),
}

/// Reasons an argument can be rejected
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidArgument {
    /// A keyed 3-axis mapping lacked one of the required axes
    #[error("offset must include keys 'x', 'y' and 'z' (missing '{0}')")]
    MissingAxis(Axis),

    /// Calibration was asked to average zero samples
    #[error("calibration needs at least one sample")]
    NoSamples,
}

/// Type alias for Result with DriverError
pub type DriverResult<T, E> = Result<T, DriverError<E>>;
