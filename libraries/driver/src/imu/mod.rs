// Inertial measurement unit drivers
//
// Each chip driver owns its bus transport and clock, performs every read as a
// fresh blocking bus transaction and implements `hal::ImuSensor`.

use core::fmt;

use hal::Vector3d;

use crate::error::InvalidArgument;

pub mod integrator;
pub mod mpu6050;

pub use self::integrator::AngleIntegrator;
pub use self::mpu6050::Mpu6050;

/// Body axis of a 3-axis measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in vector order
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Key naming this axis in a keyed mapping
    pub fn key(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }

    /// Look up an axis by its mapping key
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "x" => Some(Axis::X),
            "y" => Some(Axis::Y),
            "z" => Some(Axis::Z),
            _ => None,
        }
    }

    /// Position of this axis inside a `Vector3`
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Build a 3-axis vector from `(key, value)` pairs
///
/// Every one of "x", "y" and "z" must be present. Unknown keys are ignored and
/// a repeated key keeps its last value.
pub fn vector_from_pairs<'a, P>(pairs: P) -> Result<Vector3d, InvalidArgument>
where
    P: IntoIterator<Item = (&'a str, f32)>,
{
    let mut values: [Option<f32>; 3] = [None; 3];
    for (key, value) in pairs {
        if let Some(axis) = Axis::from_key(key) {
            values[axis.index()] = Some(value);
        }
    }

    let mut vector = Vector3d::zeros();
    for axis in Axis::ALL {
        vector[axis.index()] = values[axis.index()].ok_or(InvalidArgument::MissingAxis(axis))?;
    }
    Ok(vector)
}
