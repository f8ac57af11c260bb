//! 2D vector helpers layered over `glam::Vec2`.
//!
//! In-place arithmetic is glam's own (`+=`, `-=`, `*=`, `/=`); this module adds the
//! projection and point-to-line helpers the narrowphase needs.

use glam::Vec2;

/// Projection and line-distance helpers missing from `glam::Vec2`.
pub trait Vec2Ext: Sized {
    /// Vector projection of `self` onto `onto` (any non-zero length).
    fn project_onto(self, onto: Vec2) -> Vec2;

    /// Vector projection of `self` onto the raw axis `(x, y)`.
    fn project_onto_xy(self, x: f32, y: f32) -> Vec2 {
        self.project_onto(Vec2::new(x, y))
    }

    /// Length of the projection of `self` onto `onto`, whose length is `onto_len`.
    fn scalar_project(self, onto: Vec2, onto_len: f32) -> f32;

    /// Length of the projection of `self` onto the unit vector `unit`.
    fn unit_scalar_project(self, unit: Vec2) -> f32;

    /// Signed distance from the point `self` to the infinite line through `p1` and `p2`.
    ///
    /// Positive on the left of `p1 -> p2`. `p1` and `p2` must differ.
    fn signed_dist_to_line(self, p1: Vec2, p2: Vec2) -> f32;

    /// Absolute distance from the point `self` to the line through `p1` and `p2`.
    fn dist_to_line(self, p1: Vec2, p2: Vec2) -> f32 {
        self.signed_dist_to_line(p1, p2).abs()
    }

    /// Squared distance to the line through `p1` and `p2`; avoids the square root.
    fn dist_to_line_squared(self, p1: Vec2, p2: Vec2) -> f32;

    /// Unit vector in the direction of `self`.
    ///
    /// # Panics
    /// Panics on a zero-length (or non-finite) vector. Callers guarantee non-zero length.
    fn unit(self) -> Vec2;
}

impl Vec2Ext for Vec2 {
    fn project_onto(self, onto: Vec2) -> Vec2 {
        onto * (self.dot(onto) / onto.length_squared())
    }

    fn scalar_project(self, onto: Vec2, onto_len: f32) -> f32 {
        self.dot(onto) / onto_len
    }

    fn unit_scalar_project(self, unit: Vec2) -> f32 {
        self.dot(unit)
    }

    fn signed_dist_to_line(self, p1: Vec2, p2: Vec2) -> f32 {
        let d = p2 - p1;
        d.perp_dot(self - p1) / d.length()
    }

    fn dist_to_line_squared(self, p1: Vec2, p2: Vec2) -> f32 {
        let d = p2 - p1;
        let cross = d.perp_dot(self - p1);
        cross * cross / d.length_squared()
    }

    fn unit(self) -> Vec2 {
        let len = self.length();
        assert!(len > 0.0 && len.is_finite(), "cannot normalize vector {self:?}");
        self / len
    }
}
