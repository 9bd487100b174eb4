use crate::math::vec::Vec3;

/// Spherical offset from a focus point.
///
/// Azimuth is measured around the vertical axis from +Z toward +X; polar is
/// the elevation from the horizon plane. The convention matches
/// `from_cartesian`: `azimuth = atan2(x, z)`, `polar = asin(y / r)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Spherical {
    pub radius: f64,
    pub azimuth: f64,
    pub polar: f64,
}

impl Spherical {
    pub fn new(radius: f64, azimuth: f64, polar: f64) -> Self {
        Self {
            radius,
            azimuth,
            polar,
        }
    }

    pub fn from_cartesian(p: Vec3) -> Self {
        let r = p.norm();
        if r <= 1e-12 {
            return Self::new(0.0, 0.0, 0.0);
        }
        Self::new(r, p.x.atan2(p.z), (p.y / r).clamp(-1.0, 1.0).asin())
    }

    pub fn to_cartesian(self) -> Vec3 {
        Vec3::new(
            self.radius * self.azimuth.sin() * self.polar.cos(),
            self.radius * self.polar.sin(),
            self.radius * self.azimuth.cos() * self.polar.cos(),
        )
    }
}
