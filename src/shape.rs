//! Closed set of collision shapes and the pairwise time-of-impact dispatch.
//!
//! Shapes carry no position: every query takes the owning body's [`Kinematics`].

use glam::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::api::NarrowphaseApi;
use crate::body::Kinematics;
use crate::error::CollisionError;
use crate::narrowphase::Narrowphase;
use crate::polygon::ConvexPolygon;
use crate::types::{Aabb, Contact};

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Shape {
    /// Axis-aligned box centered on the body position.
    Aabb { half_extents: Vec2 },
    /// Circle centered on the body position.
    Circle { radius: f32 },
    /// Convex polygon with vertices relative to the body position.
    Polygon(ConvexPolygon),
}

/// Tag of a [`Shape`] variant; indexes the pair dispatch table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Aabb = 0,
    Circle = 1,
    Polygon = 2,
}

const SHAPE_KINDS: usize = 3;

/// Half extents and area of a shape.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Extents {
    pub half: Vec2,
    pub area: f32,
}

impl Shape {
    /// Box of the given full width and height.
    pub fn aabb(width: f32, height: f32) -> Result<Self, CollisionError> {
        let w = CollisionError::non_negative("width", width)?;
        let h = CollisionError::non_negative("height", height)?;
        Ok(Shape::Aabb { half_extents: Vec2::new(w, h) * 0.5 })
    }

    pub fn circle(radius: f32) -> Result<Self, CollisionError> {
        Ok(Shape::Circle { radius: CollisionError::non_negative("radius", radius)? })
    }

    /// Convex polygon from 3 to 8 vertices in either winding.
    pub fn polygon(vertices: &[Vec2]) -> Result<Self, CollisionError> {
        Ok(Shape::Polygon(ConvexPolygon::new(vertices)?))
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Aabb { .. } => ShapeKind::Aabb,
            Shape::Circle { .. } => ShapeKind::Circle,
            Shape::Polygon(_) => ShapeKind::Polygon,
        }
    }

    pub fn half_extents(&self) -> Vec2 {
        match *self {
            Shape::Aabb { half_extents } => half_extents,
            Shape::Circle { radius } => Vec2::splat(radius),
            Shape::Polygon(ref polygon) => polygon.half_extents(),
        }
    }

    pub fn width(&self) -> f32 {
        self.half_extents().x * 2.0
    }

    pub fn height(&self) -> f32 {
        self.half_extents().y * 2.0
    }

    pub fn area(&self) -> f32 {
        match *self {
            Shape::Aabb { half_extents } => 4.0 * half_extents.x * half_extents.y,
            Shape::Circle { radius } => std::f32::consts::PI * radius * radius,
            Shape::Polygon(ref polygon) => polygon.area(),
        }
    }

    pub fn extents(&self) -> Extents {
        Extents { half: self.half_extents(), area: self.area() }
    }

    /// Bounding box of the shape placed at `position`.
    pub fn bounds_at(&self, position: Vec2) -> Aabb {
        Aabb::from_center_half_extents(position, self.half_extents())
    }

    /// Earliest contact between `self` (moving as `me`) and `other` (moving as `them`)
    /// within `[0, max_time]`.
    ///
    /// The returned normal points from `other` into `self`.
    pub fn time_of_impact(
        &self,
        me: &Kinematics,
        other: &Shape,
        them: &Kinematics,
        max_time: f32,
    ) -> Option<Contact> {
        let a = Swept { shape: *self, position: me.position, velocity: me.velocity };
        let b = Swept { shape: *other, position: them.position, velocity: them.velocity };
        TOI_TABLE[self.kind() as usize][other.kind() as usize](&a, &b, max_time)
    }
}

/// A shape in motion, as seen by one dispatch table entry.
struct Swept {
    shape: Shape,
    position: Vec2,
    velocity: Vec2,
}

impl Swept {
    fn radius(&self) -> f32 {
        match self.shape {
            Shape::Circle { radius } => radius,
            _ => self.shape.half_extents().max_element(),
        }
    }

    /// The shape as a polygon; boxes become their four corners.
    fn outline(&self) -> ConvexPolygon {
        match self.shape {
            Shape::Polygon(polygon) => polygon,
            _ => ConvexPolygon::from_half_extents(self.shape.half_extents()),
        }
    }
}

type ToiFn = fn(&Swept, &Swept, f32) -> Option<Contact>;

/// Row: kind of the first shape. Column: kind of the second.
const TOI_TABLE: [[ToiFn; SHAPE_KINDS]; SHAPE_KINDS] = [
    [aabb_vs_aabb, aabb_vs_circle, outline_vs_outline],
    [circle_vs_aabb, circle_vs_circle, circle_vs_polygon],
    [outline_vs_outline, polygon_vs_circle, outline_vs_outline],
];

fn aabb_vs_aabb(a: &Swept, b: &Swept, max_time: f32) -> Option<Contact> {
    Narrowphase::sweep_aabb_aabb(
        a.position,
        a.shape.half_extents(),
        a.velocity,
        b.position,
        b.shape.half_extents(),
        b.velocity,
        max_time,
    )
}

fn circle_vs_circle(a: &Swept, b: &Swept, max_time: f32) -> Option<Contact> {
    Narrowphase::sweep_circle_circle(
        a.position,
        a.radius(),
        a.velocity,
        b.position,
        b.radius(),
        b.velocity,
        max_time,
    )
}

fn circle_vs_aabb(a: &Swept, b: &Swept, max_time: f32) -> Option<Contact> {
    Narrowphase::sweep_circle_aabb(
        a.position,
        a.radius(),
        a.velocity,
        b.position,
        b.shape.half_extents(),
        b.velocity,
        max_time,
    )
}

fn aabb_vs_circle(a: &Swept, b: &Swept, max_time: f32) -> Option<Contact> {
    circle_vs_aabb(b, a, max_time).map(|c| Contact { time: c.time, normal: -c.normal })
}

/// Any pair of boxes and polygons except box/box, which has its own slab test.
fn outline_vs_outline(a: &Swept, b: &Swept, max_time: f32) -> Option<Contact> {
    Narrowphase::sweep_polygon_polygon(
        a.position,
        &a.outline(),
        a.velocity,
        b.position,
        &b.outline(),
        b.velocity,
        max_time,
    )
}

fn circle_vs_polygon(a: &Swept, b: &Swept, max_time: f32) -> Option<Contact> {
    Narrowphase::sweep_circle_polygon(
        a.position,
        a.radius(),
        a.velocity,
        b.position,
        &b.outline(),
        b.velocity,
        max_time,
    )
}

fn polygon_vs_circle(a: &Swept, b: &Swept, max_time: f32) -> Option<Contact> {
    circle_vs_polygon(b, a, max_time).map(|c| Contact { time: c.time, normal: -c.normal })
}
