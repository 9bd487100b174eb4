use serde::{Deserialize, Serialize};

/// Tuning for camera interaction and frame delivery.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Maximum outbound camera/zoom commands per second.
    pub max_event_rate: f64,

    /// Rotation speed in radians per unit of normalized pointer travel.
    pub rotate_scale: f64,

    /// Per-detent multiplicative zoom step.
    pub zoom_scale: f64,

    /// Polar clamp in radians, strictly inside ±π/2.
    pub pole_limit: f64,

    /// Smallest allowed camera-to-focus distance.
    pub radius_floor: f64,

    /// Vertical view angle in degrees; sets the pan speed so screen-space
    /// motion is zoom-invariant.
    pub view_angle_deg: f64,
}

impl ViewerConfig {
    /// Minimum interval between two outbound commands.
    pub fn throttle_window_ms(&self) -> f64 {
        1000.0 / self.max_event_rate.max(1e-3)
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            max_event_rate: 20.0,
            rotate_scale: 5.0,
            zoom_scale: 0.05,
            pole_limit: 1.5175,
            radius_floor: 1e-5,
            view_angle_deg: 30.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ViewerConfig;

    #[test]
    fn default_window_is_fifty_ms() {
        let cfg = ViewerConfig::default();
        assert_eq!(cfg.throttle_window_ms(), 50.0);
    }

    #[test]
    fn pole_limit_stays_inside_half_pi() {
        let cfg = ViewerConfig::default();
        assert!(cfg.pole_limit < std::f64::consts::FRAC_PI_2);
    }
}
