//! Convex polygons, stored inline so [`Shape`](crate::shape::Shape) stays `Copy`.

use glam::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::CollisionError;
use crate::vector::Vec2Ext;

/// Most vertices a [`ConvexPolygon`] can hold.
pub const MAX_POLYGON_VERTICES: usize = 8;

/// Strictly convex polygon. Vertices are relative to the owning body's position and kept in
/// counter-clockwise order.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<Vec2>", into = "Vec<Vec2>"))]
pub struct ConvexPolygon {
    vertices: [Vec2; MAX_POLYGON_VERTICES],
    /// Outward unit normal of the edge from `vertices[i]` to `vertices[i + 1]`.
    normals: [Vec2; MAX_POLYGON_VERTICES],
    len: u8,
}

impl ConvexPolygon {
    /// Build from 3 to 8 vertices in either winding.
    pub fn new(points: &[Vec2]) -> Result<Self, CollisionError> {
        let n = points.len();
        if !(3..=MAX_POLYGON_VERTICES).contains(&n) {
            return Err(CollisionError::InvalidPolygon("expected 3 to 8 vertices"));
        }
        if points.iter().any(|p| !p.is_finite()) {
            return Err(CollisionError::InvalidPolygon("non-finite vertex"));
        }

        let mut vertices = [Vec2::ZERO; MAX_POLYGON_VERTICES];
        vertices[..n].copy_from_slice(points);
        let twice_area = signed_twice_area(&vertices[..n]);
        if twice_area.abs() <= f32::EPSILON {
            return Err(CollisionError::InvalidPolygon("zero area"));
        }
        if twice_area < 0.0 {
            vertices[..n].reverse();
        }

        for i in 0..n {
            let e0 = vertices[(i + 1) % n] - vertices[i];
            let e1 = vertices[(i + 2) % n] - vertices[(i + 1) % n];
            if e0.perp_dot(e1) <= 0.0 {
                return Err(CollisionError::InvalidPolygon("not strictly convex"));
            }
        }

        let mut normals = [Vec2::ZERO; MAX_POLYGON_VERTICES];
        for i in 0..n {
            let e = vertices[(i + 1) % n] - vertices[i];
            normals[i] = Vec2::new(e.y, -e.x).unit();
        }
        Ok(Self { vertices, normals, len: n as u8 })
    }

    /// Regular polygon with `sides` vertices on a circle of `radius`, the first on +x.
    pub fn regular(radius: f32, sides: usize) -> Result<Self, CollisionError> {
        let radius = CollisionError::positive("radius", radius)?;
        if !(3..=MAX_POLYGON_VERTICES).contains(&sides) {
            return Err(CollisionError::InvalidPolygon("expected 3 to 8 vertices"));
        }
        let step = std::f32::consts::TAU / sides as f32;
        let mut points = [Vec2::ZERO; MAX_POLYGON_VERTICES];
        for (i, p) in points[..sides].iter_mut().enumerate() {
            *p = Vec2::from_angle(step * i as f32) * radius;
        }
        Self::new(&points[..sides])
    }

    /// The box `[-half, half]` as a four-sided polygon.
    pub(crate) fn from_half_extents(half: Vec2) -> Self {
        let mut vertices = [Vec2::ZERO; MAX_POLYGON_VERTICES];
        let mut normals = [Vec2::ZERO; MAX_POLYGON_VERTICES];
        vertices[..4].copy_from_slice(&[
            Vec2::new(-half.x, -half.y),
            Vec2::new(half.x, -half.y),
            Vec2::new(half.x, half.y),
            Vec2::new(-half.x, half.y),
        ]);
        normals[..4].copy_from_slice(&[Vec2::NEG_Y, Vec2::X, Vec2::Y, Vec2::NEG_X]);
        Self { vertices, normals, len: 4 }
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices[..self.len as usize]
    }

    pub fn normals(&self) -> &[Vec2] {
        &self.normals[..self.len as usize]
    }

    /// Edge `i` as its two endpoints, wrapping at the last vertex.
    pub fn edge(&self, i: usize) -> (Vec2, Vec2) {
        let v = self.vertices();
        (v[i], v[(i + 1) % v.len()])
    }

    /// Half extents of the box centered on the body position that covers every vertex.
    pub fn half_extents(&self) -> Vec2 {
        self.vertices().iter().fold(Vec2::ZERO, |h, v| h.max(v.abs()))
    }

    pub fn area(&self) -> f32 {
        signed_twice_area(self.vertices()) * 0.5
    }
}

/// Shoelace sum; positive for counter-clockwise winding.
fn signed_twice_area(vertices: &[Vec2]) -> f32 {
    let n = vertices.len();
    (0..n).map(|i| vertices[i].perp_dot(vertices[(i + 1) % n])).sum()
}

impl TryFrom<Vec<Vec2>> for ConvexPolygon {
    type Error = CollisionError;

    fn try_from(points: Vec<Vec2>) -> Result<Self, Self::Error> {
        Self::new(&points)
    }
}

impl From<ConvexPolygon> for Vec<Vec2> {
    fn from(polygon: ConvexPolygon) -> Self {
        polygon.vertices().to_vec()
    }
}
