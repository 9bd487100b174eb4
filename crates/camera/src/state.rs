use foundation::math::{Spherical, Vec3};

/// Camera pose relative to a look-at focus point.
///
/// The world-space camera position is always derived, never stored:
/// `position = focus + offset.to_cartesian()`. The up vector is fixed for the
/// session and only participates in the pan basis; tilting the world is the
/// server's business, not the client's.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraState {
    pub focus: Vec3,
    pub offset: Spherical,
    pub up: Vec3,
}

impl CameraState {
    /// Build from the world-space camera position, focus, and up vector as
    /// mirrored from the host model.
    pub fn from_look_at(position: Vec3, focus: Vec3, up: Vec3) -> Self {
        Self {
            focus,
            offset: Spherical::from_cartesian(position - focus),
            up: up.normalize(),
        }
    }

    /// Derived world-space camera position.
    pub fn position(&self) -> Vec3 {
        self.focus + self.offset.to_cartesian()
    }
}

#[cfg(test)]
mod tests {
    use super::CameraState;
    use foundation::math::Vec3;

    #[test]
    fn position_round_trips_through_spherical() {
        let pos = Vec3::new(3.0, 2.0, -1.0);
        let focus = Vec3::new(1.0, 0.0, 0.5);
        let state = CameraState::from_look_at(pos, focus, Vec3::new(0.0, 1.0, 0.0));
        assert!((state.position() - pos).norm() < 1e-12);
    }

    #[test]
    fn offset_is_focus_relative() {
        let state = CameraState::from_look_at(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::ZERO,
            Vec3::new(0.0, 1.0, 0.0),
        );
        assert!((state.offset.radius - 5.0).abs() < 1e-12);
        assert!(state.offset.azimuth.abs() < 1e-12);
        assert!(state.offset.polar.abs() < 1e-12);
    }
}
