//! World-wide velocity effects applied once per frame to every body whose category the
//! effect selects, before each body's own motion runs.

use glam::Vec2;

use crate::body::Kinematics;
use crate::error::CollisionError;
use crate::types::{Category, CategoryMask};

pub trait WorldEffect {
    /// Categories this effect acts on.
    fn categories(&self) -> CategoryMask;

    /// Advance internal state by the frame time; called once before `apply`.
    fn update(&mut self, dt: f32);

    fn apply(&self, body: &mut Kinematics);

    fn affects(&self, category: Category) -> bool {
        self.categories().contains(category)
    }
}

/// Constant acceleration.
#[derive(Copy, Clone, Debug)]
pub struct Gravity {
    accel: Vec2,
    categories: CategoryMask,
    frame_delta: Vec2,
}

impl Gravity {
    pub fn new(accel: Vec2, categories: CategoryMask) -> Self {
        Self { accel, categories, frame_delta: Vec2::ZERO }
    }

    pub fn set(&mut self, accel: Vec2) {
        self.accel = accel;
    }
}

impl WorldEffect for Gravity {
    fn categories(&self) -> CategoryMask {
        self.categories
    }

    fn update(&mut self, dt: f32) {
        self.frame_delta = self.accel * dt;
    }

    fn apply(&self, body: &mut Kinematics) {
        body.velocity += self.frame_delta;
    }
}

/// Pulls every affected body's speed toward `max_speed`.
///
/// New speed is `ratio * speed + (1 - ratio) * max_speed`: a ratio of 0 snaps to
/// `max_speed`, a ratio of 1 leaves speeds untouched. Bodies at rest stay at rest.
#[derive(Copy, Clone, Debug)]
pub struct SpeedLimit {
    max_speed: f32,
    ratio: f32,
    categories: CategoryMask,
}

impl SpeedLimit {
    pub fn new(max_speed: f32, ratio: f32, categories: CategoryMask) -> Result<Self, CollisionError> {
        let max_speed = CollisionError::non_negative("max_speed", max_speed)?;
        if !(0.0..=1.0).contains(&ratio) {
            return Err(CollisionError::InvalidArgument { name: "ratio", value: ratio });
        }
        Ok(Self { max_speed, ratio, categories })
    }
}

impl WorldEffect for SpeedLimit {
    fn categories(&self) -> CategoryMask {
        self.categories
    }

    fn update(&mut self, _dt: f32) {}

    fn apply(&self, body: &mut Kinematics) {
        let speed = body.velocity.length();
        if speed == 0.0 {
            return;
        }
        let scale = self.ratio + (1.0 - self.ratio) * self.max_speed / speed;
        body.velocity *= scale;
    }
}
