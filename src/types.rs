use glam::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::CollisionError;

/// Number of distinct categories the filter table can express.
pub const MAX_CATEGORIES: u8 = 32;

/// Stable handle of a body owned by a `CollisionWorld`.
///
/// Handles are slab keys: once a body is removed its key may be handed to a later body.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyId(pub(crate) usize);

impl BodyId {
    /// Raw slab key, useful as a stable sort key in tests and tools.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Small integer tag used to admit or deny collision testing between body classes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Category(u8);

impl Category {
    /// Build a category from its ordinal (`0..32`).
    pub fn new(ordinal: u8) -> Result<Self, CollisionError> {
        if ordinal < MAX_CATEGORIES {
            Ok(Self(ordinal))
        } else {
            Err(CollisionError::CategoryOutOfRange(ordinal))
        }
    }

    /// Compile-time constructor for category constants.
    ///
    /// # Panics
    /// Panics (at compile time in const context) when `ordinal >= 32`.
    pub const fn of(ordinal: u8) -> Self {
        assert!(ordinal < MAX_CATEGORIES, "category ordinal must be < 32");
        Self(ordinal)
    }

    pub fn ordinal(self) -> u8 {
        self.0
    }

    /// Single-bit mask for this category.
    pub fn bit(self) -> u32 {
        1u32 << self.0
    }
}

/// Set of categories, used by world effects to select the bodies they act on.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CategoryMask(pub u32);

impl CategoryMask {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(u32::MAX);

    pub fn with(self, category: Category) -> Self {
        Self(self.0 | category.bit())
    }

    pub fn without(self, category: Category) -> Self {
        Self(self.0 & !category.bit())
    }

    pub fn contains(self, category: Category) -> bool {
        self.0 & category.bit() != 0
    }
}

impl From<Category> for CategoryMask {
    fn from(category: Category) -> Self {
        Self(category.bit())
    }
}

/// Physical surface properties carried by each body.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Material {
    density: f32,
    restitution: f32,
}

impl Material {
    pub const DEFAULT: Self = Self { density: 1.0, restitution: 1.0 };
    pub const RUBBER: Self = Self { density: 1.1, restitution: 1.0 };
    pub const STEEL: Self = Self { density: 7.82, restitution: 1.0 };
    pub const ICE: Self = Self { density: 0.917, restitution: 1.0 };

    /// Density must be positive, restitution non-negative.
    pub fn new(density: f32, restitution: f32) -> Result<Self, CollisionError> {
        Ok(Self {
            density: CollisionError::positive("density", density)?,
            restitution: CollisionError::non_negative("restitution", restitution)?,
        })
    }

    pub fn density(&self) -> f32 {
        self.density
    }

    pub fn restitution(&self) -> f32 {
        self.restitution
    }

    /// Restitution used when `self` meets `other` (geometric mean).
    pub fn combined_restitution(&self, other: &Material) -> f32 {
        (self.restitution * other.restitution).sqrt()
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Axis-aligned box given by its min/max corners.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub const EMPTY: Self = Self { min: Vec2::ZERO, max: Vec2::ZERO };

    pub fn new(min: Vec2, max: Vec2) -> Self {
        debug_assert!(min.x <= max.x && min.y <= max.y, "invalid Aabb: min > max");
        Self { min, max }
    }

    pub fn from_center_half_extents(center: Vec2, half_extents: Vec2) -> Self {
        Self { min: center - half_extents, max: center + half_extents }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    /// Inclusive overlap: touching faces count.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// `other` lies fully inside `self` without touching its faces.
    pub fn strictly_contains(&self, other: &Aabb) -> bool {
        other.min.x > self.min.x
            && other.max.x < self.max.x
            && other.min.y > self.min.y
            && other.max.y < self.max.y
    }

    /// `other` lies inside `self`, faces included.
    pub fn contains(&self, other: &Aabb) -> bool {
        other.min.x >= self.min.x
            && other.max.x <= self.max.x
            && other.min.y >= self.min.y
            && other.max.y <= self.max.y
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb { min: self.min.min(other.min), max: self.max.max(other.max) }
    }

    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }
}

/// Narrowphase result: when two shapes first touch and the contact normal.
///
/// The normal is unit length and points from the second shape into the first.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Contact {
    pub time: f32,
    pub normal: Vec2,
}

/// Result of an earliest-event query: the "no collision" sentinel or a concrete event.
///
/// The sentinel has `time == f32::INFINITY` and no bodies; a concrete event always names
/// two distinct bodies.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CollisionEvent {
    time: f32,
    normal: Vec2,
    a: Option<BodyId>,
    b: Option<BodyId>,
}

impl CollisionEvent {
    pub const NONE: Self = Self { time: f32::INFINITY, normal: Vec2::ZERO, a: None, b: None };

    pub fn new(contact: Contact, a: BodyId, b: BodyId) -> Self {
        debug_assert_ne!(a, b, "a body cannot collide with itself");
        Self { time: contact.time, normal: contact.normal, a: Some(a), b: Some(b) }
    }

    pub fn is_none(&self) -> bool {
        self.a.is_none()
    }

    /// Time to impact; `f32::INFINITY` for the sentinel.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Unit normal pointing from body `b` into body `a`.
    pub fn normal(&self) -> Vec2 {
        self.normal
    }

    pub fn a(&self) -> Option<BodyId> {
        self.a
    }

    pub fn b(&self) -> Option<BodyId> {
        self.b
    }

    /// Both participants, or `None` for the sentinel.
    pub fn bodies(&self) -> Option<(BodyId, BodyId)> {
        self.a.zip(self.b)
    }

    /// Sentinel and concrete states are mutually exclusive and exhaustive.
    pub(crate) fn is_consistent(&self) -> bool {
        self.a.is_some() == self.b.is_some() && (self.a.is_some() || self.time == f32::INFINITY)
    }
}

impl Default for CollisionEvent {
    fn default() -> Self {
        Self::NONE
    }
}

/// World-level configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorldConfig {
    /// Center of the initial root region.
    pub center: Vec2,
    /// Half side length of the initial (square) root region.
    pub half_extent: f32,
    /// A leaf holding more bodies than this is split into four quadrants.
    pub split_threshold: usize,
    /// Leaves at or below this half extent never split.
    pub min_node_half_extent: f32,
    /// Maximum collision events handled by a single `step`; the rest of the frame is dropped.
    pub max_events_per_step: usize,
    /// Allow the root to shrink back toward `half_extent` when bodies gather in one quadrant.
    pub shrink_root: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            half_extent: 512.0,
            split_threshold: 8,
            min_node_half_extent: 1.0,
            max_events_per_step: 4096,
            shrink_root: true,
        }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Result<(), CollisionError> {
        if !(self.half_extent.is_finite() && self.half_extent > 0.0) {
            return Err(CollisionError::InvalidConfig("half_extent must be positive and finite"));
        }
        if !self.center.is_finite() {
            return Err(CollisionError::InvalidConfig("center must be finite"));
        }
        if self.split_threshold == 0 {
            return Err(CollisionError::InvalidConfig("split_threshold must be at least 1"));
        }
        if !(self.min_node_half_extent.is_finite() && self.min_node_half_extent > 0.0) {
            return Err(CollisionError::InvalidConfig("min_node_half_extent must be positive"));
        }
        if self.max_events_per_step == 0 {
            return Err(CollisionError::InvalidConfig("max_events_per_step must be at least 1"));
        }
        Ok(())
    }
}

/// Debug/performance statistics.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct WorldStats {
    pub bodies: usize,
    pub nodes: usize,
    pub leaves: usize,
    pub depth: usize,
    /// Pairs that passed the category filter and swept-box test during the last `step`.
    pub candidate_pairs: usize,
    /// Narrowphase calls that produced a contact during the last `step`.
    pub contacts_found: usize,
    /// Sub-steps run during the last `step`.
    pub substeps: usize,
    /// Events handed to the context during the last `step`.
    pub events: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_range() {
        assert_eq!(Category::new(31).map(Category::ordinal), Ok(31));
        assert_eq!(Category::new(32), Err(CollisionError::CategoryOutOfRange(32)));
        assert_eq!(Category::of(3).bit(), 0b1000);
        let m = CategoryMask::NONE.with(Category::of(1)).with(Category::of(4));
        assert!(m.contains(Category::of(4)));
        assert!(!m.without(Category::of(4)).contains(Category::of(4)));
    }

    #[test]
    fn test_material_validation() {
        assert!(Material::new(0.0, 1.0).is_err());
        assert!(Material::new(1.0, -0.1).is_err());
        let m = Material::new(2.0, 0.25).unwrap();
        assert!((m.combined_restitution(&Material::DEFAULT) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_aabb_relations() {
        let outer = Aabb::from_center_half_extents(Vec2::ZERO, Vec2::splat(2.0));
        let inner = Aabb::from_center_half_extents(Vec2::new(1.0, 0.0), Vec2::splat(1.0));
        assert!(outer.contains(&inner));
        assert!(!outer.strictly_contains(&inner));
        assert!(outer.overlaps(&inner));
        let touching = Aabb::new(Vec2::new(2.0, -1.0), Vec2::new(3.0, 1.0));
        assert!(outer.overlaps(&touching));
        assert_eq!(outer.union(&touching).max, Vec2::new(3.0, 2.0));
        assert_eq!(inner.center(), Vec2::new(1.0, 0.0));
        assert_eq!(inner.half_extents(), Vec2::ONE);
    }

    #[test]
    fn test_event_sentinel_consistency() {
        let none = CollisionEvent::NONE;
        assert!(none.is_none());
        assert!(none.a().is_none() && none.b().is_none());
        assert!(none.is_consistent());
        let hit = CollisionEvent::new(Contact { time: 0.5, normal: Vec2::X }, BodyId(0), BodyId(1));
        assert!(!hit.is_none());
        assert_eq!(hit.bodies(), Some((BodyId(0), BodyId(1))));
        assert!(hit.is_consistent());
    }

    #[test]
    fn test_config_validation() {
        assert!(WorldConfig::default().validate().is_ok());
        let bad = WorldConfig { half_extent: -1.0, ..Default::default() };
        assert!(bad.validate().is_err());
        let bad = WorldConfig { split_threshold: 0, ..Default::default() };
        assert!(bad.validate().is_err());
    }
}
