use glam::Vec2;

use crate::error::CollisionError;
use crate::index::NodeId;
use crate::motion::{Inertial, Motion};
use crate::shape::Shape;
use crate::types::{Aabb, Category, Material};

/// Position, velocity and mass of a body; what motions, effects and hooks operate on.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Kinematics {
    pub position: Vec2,
    pub velocity: Vec2,
    /// `f32::INFINITY` for immovable bodies.
    pub mass: f32,
}

/// Construction parameters for a [`Body`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BodyDesc {
    pub shape: Shape,
    pub position: Vec2,
    pub velocity: Vec2,
    pub material: Material,
    pub category: Category,
}

impl BodyDesc {
    /// At rest at the origin, default material, category 0.
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            material: Material::DEFAULT,
            category: Category::default(),
        }
    }

    pub fn at(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn moving(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }
}

/// Per-frame hook run once with the full frame time after stepping.
pub type UpdateHook = Box<dyn FnMut(&mut Kinematics, f32)>;

/// Where a body currently sits in the spatial index.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Membership {
    pub node: NodeId,
    pub slot: usize,
}

/// A collidable body: shape, kinematic state, material and category.
pub struct Body {
    kin: Kinematics,
    shape: Shape,
    material: Material,
    category: Category,
    motion: Box<dyn Motion>,
    hook: Option<UpdateHook>,
    bounds: Aabb,
    pub(crate) membership: Option<Membership>,
}

impl Body {
    /// Mass is derived as `shape.area() * material.density()`.
    pub fn new(desc: BodyDesc) -> Self {
        let mass = desc.shape.area() * desc.material.density();
        let mut body = Self {
            kin: Kinematics { position: desc.position, velocity: desc.velocity, mass },
            shape: desc.shape,
            material: desc.material,
            category: desc.category,
            motion: Box::new(Inertial),
            hook: None,
            bounds: Aabb::EMPTY,
            membership: None,
        };
        body.compute_swept_bounds(0.0);
        body
    }

    /// Override the derived mass. `f32::INFINITY` makes the body immovable in `response::bounce`.
    pub fn with_mass(mut self, mass: f32) -> Result<Self, CollisionError> {
        if mass.is_nan() || mass <= 0.0 {
            return Err(CollisionError::InvalidArgument { name: "mass", value: mass });
        }
        self.kin.mass = mass;
        Ok(self)
    }

    pub fn with_motion(mut self, motion: impl Motion + 'static) -> Self {
        self.motion = Box::new(motion);
        self
    }

    pub fn with_update_hook(mut self, hook: impl FnMut(&mut Kinematics, f32) + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    pub fn kinematics(&self) -> &Kinematics {
        &self.kin
    }

    pub fn kinematics_mut(&mut self) -> &mut Kinematics {
        &mut self.kin
    }

    pub fn position(&self) -> Vec2 {
        self.kin.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.kin.velocity
    }

    pub fn mass(&self) -> f32 {
        self.kin.mass
    }

    /// Teleport the body. Its motion restarts from the new position.
    pub fn set_position(&mut self, position: Vec2) {
        self.kin.position = position;
        self.motion.reset();
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.kin.velocity = velocity;
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn set_category(&mut self, category: Category) {
        self.category = category;
    }

    pub fn motion_mut(&mut self) -> &mut dyn Motion {
        self.motion.as_mut()
    }

    pub fn set_motion(&mut self, motion: impl Motion + 'static) {
        self.motion = Box::new(motion);
    }

    /// Swept bounds from the last `compute_swept_bounds` call.
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Whether the body is currently held by a world's spatial index.
    pub fn is_indexed(&self) -> bool {
        self.membership.is_some()
    }

    /// Ask the motion strategy for the next velocity and cache it.
    pub fn update_motion(&mut self, dt: f32) {
        self.kin.velocity = self.motion.next_velocity(&self.kin, dt);
    }

    /// Integrate position by the cached velocity.
    pub fn update_position(&mut self, dt: f32) {
        self.kin.position += self.kin.velocity * dt;
    }

    /// Box covering the shape at its current position and after `max_time` of travel.
    pub fn compute_swept_bounds(&mut self, max_time: f32) -> Aabb {
        let start = self.shape.bounds_at(self.kin.position);
        let end = self.shape.bounds_at(self.kin.position + self.kin.velocity * max_time);
        self.bounds = start.union(&end);
        self.bounds
    }

    pub(crate) fn run_update_hook(&mut self, elapsed: f32) {
        if let Some(hook) = self.hook.as_mut() {
            hook(&mut self.kin, elapsed);
        }
    }
}

impl std::fmt::Debug for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Body")
            .field("kin", &self.kin)
            .field("shape", &self.shape)
            .field("material", &self.material)
            .field("category", &self.category)
            .field("bounds", &self.bounds)
            .field("membership", &self.membership)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::{JumpMotion, SeekMotion};

    fn square(side: f32) -> Shape {
        Shape::aabb(side, side).unwrap()
    }

    #[test]
    fn test_mass_from_area_and_density() {
        let b = Body::new(BodyDesc::new(square(2.0)).material(Material::STEEL));
        assert!((b.mass() - 4.0 * 7.82).abs() < 1e-4);
        let wall = Body::new(BodyDesc::new(square(2.0))).with_mass(f32::INFINITY).unwrap();
        assert!(wall.mass().is_infinite());
        assert!(Body::new(BodyDesc::new(square(2.0))).with_mass(0.0).is_err());
        assert!(Body::new(BodyDesc::new(square(2.0))).with_mass(f32::NAN).is_err());
    }

    #[test]
    fn test_swept_bounds_cover_travel() {
        let mut b = Body::new(
            BodyDesc::new(square(2.0)).at(Vec2::new(1.0, 1.0)).moving(Vec2::new(4.0, -2.0)),
        );
        let swept = b.compute_swept_bounds(0.5);
        assert_eq!(swept.min, Vec2::new(0.0, -1.0));
        assert_eq!(swept.max, Vec2::new(4.0, 2.0));
        assert_eq!(b.bounds(), swept);
    }

    #[test]
    fn test_update_motion_then_position() {
        let mut b = Body::new(BodyDesc::new(square(1.0)))
            .with_motion(SeekMotion::new(Vec2::new(0.0, 10.0), 2.0).unwrap());
        b.update_motion(1.0);
        assert_eq!(b.velocity(), Vec2::new(0.0, 2.0));
        b.update_position(0.25);
        assert_eq!(b.position(), Vec2::new(0.0, 0.5));
    }

    #[test]
    fn test_teleport_restarts_motion() {
        let mut b = Body::new(BodyDesc::new(square(1.0)))
            .with_motion(JumpMotion::new(Vec2::new(10.0, 0.0), 3.0, 1.0).unwrap());
        b.update_motion(0.5);
        assert_eq!(b.velocity(), Vec2::ZERO);
        b.set_position(Vec2::ZERO);
        // Half a delay since the teleport: still waiting.
        b.update_motion(0.5);
        assert_eq!(b.velocity(), Vec2::ZERO);
        b.update_motion(0.5);
        assert!((b.velocity().x - 6.0).abs() < 1e-5);
    }

    #[test]
    fn test_update_hook_runs_with_elapsed() {
        let mut b = Body::new(BodyDesc::new(square(1.0)))
            .with_update_hook(|k: &mut Kinematics, dt: f32| k.velocity.y -= 10.0 * dt);
        b.run_update_hook(0.5);
        assert_eq!(b.velocity(), Vec2::new(0.0, -5.0));
        assert!(!b.is_indexed());
    }
}
