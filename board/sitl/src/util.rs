use hal::Vector3i;

/// Render a whole-degree angle the way the demo prints it
pub fn format_theta(theta: &Vector3i) -> String {
    format!("{{x: {}, y: {}, z: {}}}", theta.x, theta.y, theta.z)
}
