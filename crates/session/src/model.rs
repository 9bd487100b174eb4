//! Mirror of the host-model properties shared with the embedding frontend.
//!
//! Properties are set externally and read by the core; the only writes going
//! the other way are the `camp`/`camf` camera mirror after each emitted
//! command.

use foundation::math::Vec3;

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerModel {
    /// Render-surface resolution, width × height.
    pub resolution: (u32, u32),

    /// Camera focal point.
    pub camf: Vec3,

    /// World-space camera position.
    pub camp: Vec3,

    /// World up vector, immutable per session.
    pub camu: Vec3,

    /// Maximum outbound camera commands per second.
    pub max_event_rate: f64,

    /// Latest raw frame payload (RGB triples).
    pub frame: Vec<u8>,

    /// Latest compressed frame payload (base64 text).
    pub compressed_frame: Vec<u8>,
}

impl Default for ViewerModel {
    fn default() -> Self {
        Self {
            resolution: (800, 500),
            camf: Vec3::ZERO,
            camp: Vec3::new(0.0, 0.0, 1.0),
            camu: Vec3::new(0.0, 1.0, 0.0),
            max_event_rate: 20.0,
            frame: Vec::new(),
            compressed_frame: Vec::new(),
        }
    }
}

impl ViewerModel {
    /// Mirror write after a successful command emission.
    pub fn write_camera(&mut self, camp: Vec3, camf: Vec3) {
        self.camp = camp;
        self.camf = camf;
    }
}

#[cfg(test)]
mod tests {
    use super::ViewerModel;
    use foundation::math::Vec3;

    #[test]
    fn camera_mirror_updates_both_properties() {
        let mut model = ViewerModel::default();
        model.write_camera(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.5, 0.0, 0.0));
        assert_eq!(model.camp, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(model.camf, Vec3::new(0.5, 0.0, 0.0));
    }
}
