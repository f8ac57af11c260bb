//! tunnelfree: continuous 2D collision detection.
//!
//! A [`CollisionWorld`] owns bodies, keeps them in a self-resizing loose quadtree, and on
//! every [`step`](CollisionWorldApi::step) advances the whole world in lockstep to the single
//! earliest swept contact, reports it, and repeats until the frame time is used up. Fast
//! bodies cannot pass through each other because no sub-step moves past the first event.
//!
//! The engine reports events; it does not resolve them. Handlers can use
//! [`response::bounce`] (or [`BodyAccess::bounce`]) for a simple elastic response.

pub mod types;
pub mod error;
pub mod vector;
pub mod polygon;
pub mod shape;
pub mod narrowphase;
pub mod body;
pub mod motion;
pub mod effects;
pub mod filter;
pub mod index;
pub mod rate;
pub mod response;
pub mod api;
pub mod world;

pub use crate::types::*;
pub use crate::api::*;
pub use crate::error::CollisionError;
pub use crate::vector::Vec2Ext;
pub use crate::polygon::ConvexPolygon;
pub use crate::shape::Shape;
pub use crate::body::{Body, BodyDesc, Kinematics};
pub use crate::motion::{AttractMotion, Inertial, JumpMotion, Motion, SeekMotion};
pub use crate::effects::{Gravity, SpeedLimit, WorldEffect};
pub use crate::filter::CategoryFilter;
pub use crate::world::{BodyAccess, CollisionWorld};

pub use glam::Vec2;
