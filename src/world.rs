use slab::Slab;
use tracing::{instrument, trace, warn};

use crate::api::{CollisionWorldApi, DebugRenderer, StepContext};
use crate::body::Body;
use crate::effects::WorldEffect;
use crate::error::CollisionError;
use crate::filter::CategoryFilter;
use crate::index::QuadTree;
use crate::rate::RateCounter;
use crate::response;
use crate::types::*;

/// Continuous collision world: owns the bodies, the quadtree and the category filter, and
/// steps everything in lockstep from one collision event to the next.
pub struct CollisionWorld {
    cfg: WorldConfig,
    bodies: Slab<Body>,
    index: QuadTree,
    filter: CategoryFilter,
    effects: Vec<Box<dyn WorldEffect>>,
    rate: RateCounter,
    game_time: f32,
    stats: WorldStats,
}

/// Body access handed to collision handlers mid-frame.
///
/// Removals and insertions go through the index immediately, so the next sub-step sees them.
pub struct BodyAccess<'w> {
    bodies: &'w mut Slab<Body>,
    index: &'w mut QuadTree,
}

impl BodyAccess<'_> {
    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.0)
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id.0)
    }

    /// Both bodies mutably; `None` if either is gone or `a == b`.
    pub fn pair_mut(&mut self, a: BodyId, b: BodyId) -> Option<(&mut Body, &mut Body)> {
        if a == b {
            return None;
        }
        self.bodies.get2_mut(a.0, b.0)
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.bodies.contains(id.0)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn insert(&mut self, body: Body) -> BodyId {
        insert_body(self.bodies, self.index, body)
    }

    pub fn remove(&mut self, id: BodyId) -> Option<Body> {
        remove_body(self.bodies, self.index, id)
    }

    /// Elastic bounce of the event's two bodies using their combined restitution.
    pub fn bounce(&mut self, event: &CollisionEvent) -> Result<(), CollisionError> {
        let Some((a, b)) = event.bodies() else { return Ok(()) };
        let missing = if self.contains(a) { b } else { a };
        let (ba, bb) = self.pair_mut(a, b).ok_or(CollisionError::UnknownBody(missing))?;
        let restitution = ba.material().combined_restitution(bb.material());
        response::bounce(ba.kinematics_mut(), bb.kinematics_mut(), event.normal(), restitution);
        Ok(())
    }
}

fn insert_body(bodies: &mut Slab<Body>, index: &mut QuadTree, mut body: Body) -> BodyId {
    body.membership = None;
    body.compute_swept_bounds(0.0);
    let id = BodyId(bodies.insert(body));
    index.insert(bodies, id);
    trace!(?id, "body added");
    id
}

fn remove_body(bodies: &mut Slab<Body>, index: &mut QuadTree, id: BodyId) -> Option<Body> {
    if !bodies.contains(id.0) {
        return None;
    }
    index.remove(bodies, id);
    let body = bodies.remove(id.0);
    trace!(?id, "body removed");
    Some(body)
}

impl CollisionWorld {
    pub fn config(&self) -> &WorldConfig {
        &self.cfg
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.0)
    }

    /// Mutable body access between steps. Position and velocity changes are picked up by
    /// the next step's containment pass.
    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id.0)
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.bodies.contains(id.0)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &Body)> {
        self.bodies.iter().map(|(k, b)| (BodyId(k), b))
    }

    /// Total simulated time advanced by all sub-steps so far.
    pub fn game_time(&self) -> f32 {
        self.game_time
    }

    /// Region of the index node currently holding `id`.
    pub fn node_region_of(&self, id: BodyId) -> Option<Aabb> {
        self.index.node_of(&self.bodies, id).map(|n| self.index.region(n))
    }

    pub fn root_region(&self) -> Aabb {
        self.index.root_region()
    }

    /// Tree shape plus counters from the last `step`.
    pub fn stats(&self) -> WorldStats {
        let tree = self.index.stats();
        WorldStats {
            bodies: self.bodies.len(),
            nodes: tree.nodes,
            leaves: tree.leaves,
            depth: tree.depth,
            ..self.stats
        }
    }

    /// Consistency check of the index against the bodies, for tests and debugging tools.
    pub fn check_index(&self) -> Result<(), String> {
        self.index.check_invariants(&self.bodies)
    }

    /// Earliest event within `window` from the current state, without advancing anything.
    pub fn peek_event(&mut self, window: f32) -> CollisionEvent {
        self.index.ensure_contained(&mut self.bodies, window);
        self.index.earliest_event(&self.bodies, &self.filter, window).0
    }

    fn apply_effects(&mut self, elapsed: f32) {
        for effect in self.effects.iter_mut() {
            effect.update(elapsed);
        }
        for (_, body) in self.bodies.iter_mut() {
            for effect in &self.effects {
                if effect.affects(body.category()) {
                    effect.apply(body.kinematics_mut());
                }
            }
            body.update_motion(elapsed);
        }
    }
}

impl CollisionWorldApi for CollisionWorld {
    fn new(cfg: WorldConfig) -> Result<Self, CollisionError> {
        cfg.validate()?;
        Ok(Self {
            index: QuadTree::new(&cfg),
            cfg,
            bodies: Slab::new(),
            filter: CategoryFilter::new(),
            effects: Vec::new(),
            rate: RateCounter::new(),
            game_time: 0.0,
            stats: WorldStats::default(),
        })
    }

    fn add_body(&mut self, body: Body) -> BodyId {
        insert_body(&mut self.bodies, &mut self.index, body)
    }

    fn remove_body(&mut self, id: BodyId) -> Option<Body> {
        remove_body(&mut self.bodies, &mut self.index, id)
    }

    fn enable_pair(&mut self, a: Category, b: Category) {
        self.filter.enable_pair(a, b);
    }

    fn disable_pair(&mut self, a: Category, b: Category) {
        self.filter.disable_pair(a, b);
    }

    fn is_pair_enabled(&self, a: Category, b: Category) -> bool {
        self.filter.allows(a, b)
    }

    fn add_effect(&mut self, effect: Box<dyn WorldEffect>) {
        self.effects.push(effect);
    }

    fn clear(&mut self) {
        self.bodies.clear();
        self.index.clear();
        self.filter.clear();
        self.effects.clear();
        self.rate.reset();
        self.game_time = 0.0;
        self.stats = WorldStats::default();
    }

    #[instrument(skip_all, fields(elapsed = elapsed, bodies = self.bodies.len()))]
    fn step<C: StepContext + ?Sized>(&mut self, elapsed: f32, ctx: &mut C) {
        self.stats = WorldStats::default();
        self.apply_effects(elapsed);

        let mut remaining = elapsed;
        while remaining > 0.0 && !ctx.is_paused() {
            self.index.ensure_contained(&mut self.bodies, remaining);
            let (event, search) = self.index.earliest_event(&self.bodies, &self.filter, remaining);
            debug_assert!(event.is_consistent(), "inconsistent event {event:?}");
            self.stats.candidate_pairs += search.candidate_pairs;
            self.stats.contacts_found += search.contacts_found;
            self.stats.substeps += 1;

            let dt = event.time().min(remaining);
            for (_, body) in self.bodies.iter_mut() {
                body.update_position(dt);
            }
            self.game_time += dt;

            if event.time() < remaining {
                let rate = self.rate.record(self.game_time);
                trace!(a = ?event.a(), b = ?event.b(), time = event.time(), rate, "collision");
                let mut access = BodyAccess { bodies: &mut self.bodies, index: &mut self.index };
                ctx.handle_collision(&mut access, &event, rate);
                self.stats.events += 1;
                if self.stats.events >= self.cfg.max_events_per_step {
                    warn!(
                        events = self.stats.events,
                        dropped = remaining - dt,
                        "event cap reached; dropping the rest of the frame"
                    );
                    break;
                }
            }
            remaining -= dt;
        }

        self.index.try_resize(&mut self.bodies);
        for (_, body) in self.bodies.iter_mut() {
            body.run_update_hook(elapsed);
        }
        ctx.update(elapsed);
    }

    fn debug_draw<R: DebugRenderer + ?Sized>(&self, view: Option<Aabb>, renderer: &mut R) {
        let mut visible = Vec::new();
        self.index.for_each_in_view(
            view.as_ref(),
            |region, depth, leaf| renderer.draw_region(region, depth, leaf),
            |id| visible.push(id),
        );
        for id in visible {
            let body = &self.bodies[id.0];
            if view.is_none_or(|v| v.overlaps(&body.bounds())) {
                renderer.draw_body(id, body);
            }
        }
    }
}
