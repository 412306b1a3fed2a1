/// Common data types for hardware abstraction interfaces
pub use nalgebra::Vector3;

/// 3D vector representation using nalgebra
pub type Vector3d = Vector3<f32>;

/// Whole-number 3D vector, used for truncated angle views
pub type Vector3i = Vector3<i32>;
