//! Spur gear geometry
//!
//! Sizes follow the usual module convention: the pitch diameter is
//! `module * teeth`, the addendum is one module and the dedendum 1.25.

/// Largest tooth count the parser accepts
pub const MAX_TEETH: u32 = 1000;

/// Geometry of a spur gear
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GearGeometry {
    pub teeth: u32,
    pub module: f64,
}

impl GearGeometry {
    pub fn new(teeth: u32, module: f64) -> Self {
        Self { teeth, module }
    }

    pub fn pitch_radius(&self) -> f64 {
        self.module * f64::from(self.teeth) / 2.0
    }

    /// Radius at the tooth tips
    pub fn outer_radius(&self) -> f64 {
        self.pitch_radius() + self.module
    }

    /// Radius at the bottom of the tooth gaps
    pub fn root_radius(&self) -> f64 {
        (self.pitch_radius() - 1.25 * self.module).max(0.0)
    }

    /// Side of the square box enclosing the gear
    pub fn box_side(&self) -> f64 {
        2.0 * self.outer_radius()
    }

    /// Distance between centres when meshed with `other`
    pub fn center_distance(&self, other: &GearGeometry) -> f64 {
        self.pitch_radius() + other.pitch_radius()
    }

    /// Rotation in degrees that interleaves this gear's teeth with its driver
    pub fn mesh_rotation(&self) -> f64 {
        let t = f64::from(self.teeth);
        180.0 * (t - 1.0) / t
    }
}
