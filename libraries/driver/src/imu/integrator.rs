use hal::{elapsed_ms, Vector3d, Vector3i};

/// Forward-Euler integration of angular rate into an angle per axis
///
/// Keeps a floating point accumulator for precision plus a whole-degree view
/// truncated toward zero. The two are always updated together.
#[derive(Debug, Clone, Copy)]
pub struct AngleIntegrator {
    /// Accumulated angle in degrees
    theta_f: Vector3d,
    /// `theta_f` truncated toward zero
    theta: Vector3i,
    /// Clock reading of the previous step in milliseconds
    last_update_ms: u32,
}

impl AngleIntegrator {
    /// Create an integrator at rest, with its time origin at `now_ms`
    pub fn new(now_ms: u32) -> Self {
        Self {
            theta_f: Vector3d::zeros(),
            theta: Vector3i::zeros(),
            last_update_ms: now_ms,
        }
    }

    /// Zero both accumulators and move the time origin to `now_ms`
    pub fn reset(&mut self, now_ms: u32) {
        *self = Self::new(now_ms);
    }

    /// Move the time origin to `now_ms` and return the step length in seconds
    pub fn advance(&mut self, now_ms: u32) -> f32 {
        let dt = elapsed_ms(now_ms, self.last_update_ms) as f32 / 1000.0;
        self.last_update_ms = now_ms;
        dt
    }

    /// Add `omega * dt` to the accumulator (θ += ωΔt)
    pub fn integrate(&mut self, omega: &Vector3d, dt: f32) {
        self.theta_f += *omega * dt;
        self.theta = self.theta_f.map(|angle| angle as i32);
    }

    /// Whole-degree angle, truncated toward zero
    pub fn theta(&self) -> Vector3i {
        self.theta
    }

    /// Full-precision angle in degrees
    pub fn theta_precise(&self) -> Vector3d {
        self.theta_f
    }

    pub fn last_update_ms(&self) -> u32 {
        self.last_update_ms
    }
}
