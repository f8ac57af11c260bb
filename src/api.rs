use glam::Vec2;

use crate::body::Body;
use crate::effects::WorldEffect;
use crate::error::CollisionError;
use crate::polygon::ConvexPolygon;
use crate::types::*;
use crate::world::BodyAccess;

/// The application side of a `step`: pause flag, event handler, end-of-frame notification.
pub trait StepContext {
    /// Checked before every sub-step; `true` ends the frame early.
    fn is_paused(&self) -> bool {
        false
    }

    /// Called at most once per sub-step with the earliest event and the recent event rate.
    ///
    /// The handler must change enough state (velocity, position, membership) that the same
    /// zero-time event is not reported again on the next sub-step.
    fn handle_collision(&mut self, bodies: &mut BodyAccess<'_>, event: &CollisionEvent, rate: f32);

    /// Called once per frame after stepping with the full elapsed time.
    fn update(&mut self, _elapsed: f32) {}
}

impl<F> StepContext for F
where
    F: FnMut(&mut BodyAccess<'_>, &CollisionEvent, f32),
{
    fn handle_collision(&mut self, bodies: &mut BodyAccess<'_>, event: &CollisionEvent, rate: f32) {
        self(bodies, event, rate)
    }
}

/// Sink for `debug_draw`.
pub trait DebugRenderer {
    /// An index node region; `depth` 0 is the root.
    fn draw_region(&mut self, region: Aabb, depth: usize, is_leaf: bool);

    fn draw_body(&mut self, id: BodyId, body: &Body);
}

/// Public API contract for the continuous collision world.
pub trait CollisionWorldApi {
    fn new(cfg: WorldConfig) -> Result<Self, CollisionError>
    where
        Self: Sized;

    // --- Bodies ------------------------------------------------------------

    /// Take ownership of `body` and index it.
    fn add_body(&mut self, body: Body) -> BodyId;

    /// Detach and return a body. `None` if the id is not live.
    fn remove_body(&mut self, id: BodyId) -> Option<Body>;

    // --- Filtering & effects -----------------------------------------------

    fn enable_pair(&mut self, a: Category, b: Category);
    fn disable_pair(&mut self, a: Category, b: Category);
    fn is_pair_enabled(&self, a: Category, b: Category) -> bool;

    fn add_effect(&mut self, effect: Box<dyn WorldEffect>);

    /// Remove every body and effect and reset the index, filter, rate and game time.
    fn clear(&mut self);

    // --- Stepping ----------------------------------------------------------

    /// Advance the world by `elapsed`, reporting events to `ctx` in time order.
    fn step<C: StepContext + ?Sized>(&mut self, elapsed: f32, ctx: &mut C);

    /// Visit index regions and bodies, culled against `view` when given.
    fn debug_draw<R: DebugRenderer + ?Sized>(&self, view: Option<Aabb>, renderer: &mut R);
}

/// Swept primitive tests. Velocities are per unit time, results are times in `[0, max_time]`,
/// and normals point from the second shape into the first.
pub trait NarrowphaseApi {
    fn sweep_aabb_aabb(
        c0: Vec2,
        h0: Vec2,
        v0: Vec2,
        c1: Vec2,
        h1: Vec2,
        v1: Vec2,
        max_time: f32,
    ) -> Option<Contact>;

    fn sweep_circle_aabb(
        c: Vec2,
        r: f32,
        v: Vec2,
        box_c: Vec2,
        box_h: Vec2,
        box_v: Vec2,
        max_time: f32,
    ) -> Option<Contact>;

    fn sweep_circle_circle(
        c0: Vec2,
        r0: f32,
        v0: Vec2,
        c1: Vec2,
        r1: f32,
        v1: Vec2,
        max_time: f32,
    ) -> Option<Contact>;

    /// Separating-axis sweep; polygons are positioned at `c0` and `c1`.
    fn sweep_polygon_polygon(
        c0: Vec2,
        p0: &ConvexPolygon,
        v0: Vec2,
        c1: Vec2,
        p1: &ConvexPolygon,
        v1: Vec2,
        max_time: f32,
    ) -> Option<Contact>;

    fn sweep_circle_polygon(
        c: Vec2,
        r: f32,
        v: Vec2,
        poly_c: Vec2,
        poly: &ConvexPolygon,
        poly_v: Vec2,
        max_time: f32,
    ) -> Option<Contact>;
}
