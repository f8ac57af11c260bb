//! Pluggable velocity strategies held by each body.
//!
//! A [`Motion`] is asked once per frame for the body's next velocity. Closures of the shape
//! `FnMut(&Kinematics, f32) -> Vec2` are motions too.

use glam::Vec2;

use crate::body::Kinematics;
use crate::error::CollisionError;

pub trait Motion {
    /// Velocity the body should carry for the next `dt` seconds.
    fn next_velocity(&mut self, body: &Kinematics, dt: f32) -> Vec2;

    /// Restore any internal timers or accumulated state. Called when the body is teleported.
    fn reset(&mut self) {}
}

impl<F> Motion for F
where
    F: FnMut(&Kinematics, f32) -> Vec2,
{
    fn next_velocity(&mut self, body: &Kinematics, dt: f32) -> Vec2 {
        self(body, dt)
    }
}

/// Keeps whatever velocity the body already has. Default for new bodies.
#[derive(Copy, Clone, Debug, Default)]
pub struct Inertial;

impl Motion for Inertial {
    fn next_velocity(&mut self, body: &Kinematics, _dt: f32) -> Vec2 {
        body.velocity
    }
}

/// Travels toward a destination at constant speed and stops there without overshooting.
#[derive(Copy, Clone, Debug)]
pub struct SeekMotion {
    destination: Vec2,
    speed: f32,
}

impl SeekMotion {
    pub fn new(destination: Vec2, speed: f32) -> Result<Self, CollisionError> {
        Ok(Self { destination, speed: CollisionError::non_negative("speed", speed)? })
    }

    pub fn set_destination(&mut self, destination: Vec2) {
        self.destination = destination;
    }

    pub fn destination(&self) -> Vec2 {
        self.destination
    }
}

impl Motion for SeekMotion {
    fn next_velocity(&mut self, body: &Kinematics, dt: f32) -> Vec2 {
        let to_go = self.destination - body.position;
        let dist = to_go.length();
        if dist == 0.0 {
            return Vec2::ZERO;
        }
        if dt > 0.0 && self.speed * dt > dist {
            return to_go / dt;
        }
        to_go * (self.speed / dist)
    }
}

/// Idles, then covers up to `jump_distance` toward the destination in a single frame every
/// `delay` seconds.
#[derive(Copy, Clone, Debug)]
pub struct JumpMotion {
    destination: Vec2,
    jump_distance: f32,
    delay: f32,
    until_next: f32,
}

impl JumpMotion {
    /// A zero `delay` jumps every frame.
    pub fn new(destination: Vec2, jump_distance: f32, delay: f32) -> Result<Self, CollisionError> {
        let delay = CollisionError::non_negative("delay", delay)?;
        Ok(Self {
            destination,
            jump_distance: CollisionError::non_negative("jump_distance", jump_distance)?,
            delay,
            until_next: delay,
        })
    }

    pub fn set_destination(&mut self, destination: Vec2) {
        self.destination = destination;
    }
}

impl Motion for JumpMotion {
    fn next_velocity(&mut self, body: &Kinematics, dt: f32) -> Vec2 {
        self.until_next -= dt;
        if self.until_next > 0.0 || dt <= 0.0 {
            return Vec2::ZERO;
        }
        self.until_next += self.delay;

        let to_go = self.destination - body.position;
        let dist = to_go.length();
        if dist == 0.0 {
            return Vec2::ZERO;
        }
        if dist < self.jump_distance {
            return to_go / dt;
        }
        to_go * (self.jump_distance / dist / dt)
    }

    fn reset(&mut self) {
        self.until_next = self.delay;
    }
}

/// Spring pull toward a destination.
///
/// `damping` is a ratio of the critical damping `2 * sqrt(k / m)`: 0 oscillates forever,
/// 1 settles without overshoot.
#[derive(Copy, Clone, Debug)]
pub struct AttractMotion {
    destination: Vec2,
    k: f32,
    damping: f32,
}

impl AttractMotion {
    pub fn new(destination: Vec2, k: f32, damping: f32) -> Result<Self, CollisionError> {
        Ok(Self {
            destination,
            k: CollisionError::non_negative("k", k)?,
            damping: CollisionError::non_negative("damping", damping)?,
        })
    }

    pub fn set_destination(&mut self, destination: Vec2) {
        self.destination = destination;
    }
}

/// Damping coefficient at which a spring of stiffness `k` on mass `m` is critically damped.
pub fn critical_damping(k: f32, mass: f32) -> f32 {
    2.0 * (k / mass).sqrt()
}

impl Motion for AttractMotion {
    fn next_velocity(&mut self, body: &Kinematics, dt: f32) -> Vec2 {
        if !body.mass.is_finite() || body.mass <= 0.0 {
            return body.velocity;
        }
        let to_go = self.destination - body.position;
        let accel = to_go * (self.k / body.mass);
        let drag = body.velocity * (self.damping * critical_damping(self.k, body.mass));
        body.velocity + (accel - drag) * dt
    }
}
