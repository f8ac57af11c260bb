//! Loose quadtree over swept body bounds.
//!
//! Each node owns a square region. A body lives in the deepest node whose region strictly
//! contains its swept bounds; bodies that straddle a node's center lines stay on that node.
//! Because a child only holds bodies strictly inside its region, bodies in sibling subtrees
//! can never touch within the window, so the earliest-event search only pairs bodies on the
//! same node and bodies on a node with bodies below it.
//!
//! Nodes live in a `Vec` arena addressed by [`NodeId`]; freed slots are recycled.

use glam::Vec2;
use slab::Slab;
use tracing::{debug, warn};

use crate::body::{Body, Membership};
use crate::filter::CategoryFilter;
use crate::types::{Aabb, BodyId, CollisionEvent, WorldConfig};

/// Handle of a node in the quadtree arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
struct Node {
    center: Vec2,
    half: f32,
    parent: Option<NodeId>,
    /// Quadrant `q` has bit 0 set for the max-x side and bit 1 for the max-y side.
    children: Option<[NodeId; 4]>,
    bodies: Vec<BodyId>,
    /// Bodies on this node and all its descendants.
    subtree_len: usize,
}

impl Node {
    fn new(center: Vec2, half: f32, parent: Option<NodeId>) -> Self {
        Self { center, half, parent, children: None, bodies: Vec::new(), subtree_len: 0 }
    }

    fn region(&self) -> Aabb {
        Aabb::from_center_half_extents(self.center, Vec2::splat(self.half))
    }
}

/// Counters filled by one earliest-event search.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub candidate_pairs: usize,
    pub contacts_found: usize,
}

/// Tree shape summary.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub nodes: usize,
    pub leaves: usize,
    pub depth: usize,
}

struct Search<'a> {
    bodies: &'a Slab<Body>,
    filter: &'a CategoryFilter,
    window: f32,
    best: CollisionEvent,
    stats: SearchStats,
}

impl Search<'_> {
    fn test(&mut self, a: BodyId, b: BodyId) {
        let (ba, bb) = (&self.bodies[a.0], &self.bodies[b.0]);
        if !self.filter.allows(ba.category(), bb.category()) {
            return;
        }
        if !ba.bounds().overlaps(&bb.bounds()) {
            return;
        }
        self.stats.candidate_pairs += 1;
        let contact =
            ba.shape().time_of_impact(ba.kinematics(), bb.shape(), bb.kinematics(), self.window);
        if let Some(contact) = contact {
            self.stats.contacts_found += 1;
            // Strict: on ties the pair found first in traversal order wins.
            if contact.time < self.best.time() {
                self.best = CollisionEvent::new(contact, a, b);
            }
        }
    }
}

pub struct QuadTree {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
    root: NodeId,
    initial_center: Vec2,
    initial_half: f32,
    split_threshold: usize,
    min_half: f32,
    shrink_root: bool,
    pending: Vec<BodyId>,
}

impl QuadTree {
    pub fn new(cfg: &WorldConfig) -> Self {
        Self {
            nodes: vec![Node::new(cfg.center, cfg.half_extent, None)],
            free: Vec::new(),
            root: NodeId(0),
            initial_center: cfg.center,
            initial_half: cfg.half_extent,
            split_threshold: cfg.split_threshold,
            min_half: cfg.min_node_half_extent,
            shrink_root: cfg.shrink_root,
            pending: Vec::new(),
        }
    }

    /// Drop every node and return to the initial root region.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.nodes.push(Node::new(self.initial_center, self.initial_half, None));
        self.root = NodeId(0);
    }

    pub fn root_region(&self) -> Aabb {
        self.nodes[self.root.index()].region()
    }

    pub fn region(&self, id: NodeId) -> Aabb {
        self.nodes[id.index()].region()
    }

    pub fn len(&self) -> usize {
        self.nodes[self.root.index()].subtree_len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn alloc(&mut self, center: Vec2, half: f32, parent: Option<NodeId>) -> NodeId {
        let node = Node::new(center, half, parent);
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.index()] = node;
                id
            }
            None => {
                self.nodes.push(node);
                NodeId((self.nodes.len() - 1) as u32)
            }
        }
    }

    /// Free `id` and all its descendants. Bodies must already have been moved out.
    fn release(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            let node = &mut self.nodes[n.index()];
            debug_assert!(node.bodies.is_empty(), "releasing a node that still holds bodies");
            if let Some(children) = node.children.take() {
                stack.extend(children);
            }
            node.parent = None;
            node.subtree_len = 0;
            self.free.push(n);
        }
    }

    fn adjust_counts(&mut self, from: NodeId, add: bool) {
        let mut cur = Some(from);
        while let Some(n) = cur {
            let node = &mut self.nodes[n.index()];
            if add {
                node.subtree_len += 1;
            } else {
                node.subtree_len -= 1;
            }
            cur = node.parent;
        }
    }

    fn attach(&mut self, bodies: &mut Slab<Body>, id: BodyId, node: NodeId) {
        let list = &mut self.nodes[node.index()].bodies;
        let slot = list.len();
        list.push(id);
        bodies[id.0].membership = Some(Membership { node, slot });
        self.adjust_counts(node, true);
    }

    /// O(1) removal via the body's back-reference.
    fn detach(&mut self, bodies: &mut Slab<Body>, id: BodyId) -> Option<NodeId> {
        let Membership { node, slot } = bodies[id.0].membership.take()?;
        let list = &mut self.nodes[node.index()].bodies;
        debug_assert_eq!(list.get(slot), Some(&id), "stale index membership for {id:?}");
        list.swap_remove(slot);
        if let Some(&moved) = list.get(slot) {
            if let Some(m) = bodies[moved.0].membership.as_mut() {
                m.slot = slot;
            }
        }
        self.adjust_counts(node, false);
        Some(node)
    }

    /// Index a body by its current swept bounds.
    pub fn insert(&mut self, bodies: &mut Slab<Body>, id: BodyId) {
        let bounds = bodies[id.0].bounds();
        let target = if self.grow_to_fit(&bounds) {
            self.descend(self.root, &bounds)
        } else {
            self.root
        };
        self.attach(bodies, id, target);
    }

    /// Remove a body from the index. Returns false if it was not indexed.
    pub fn remove(&mut self, bodies: &mut Slab<Body>, id: BodyId) -> bool {
        self.detach(bodies, id).is_some()
    }

    /// Node currently holding `id`, if indexed.
    pub fn node_of(&self, bodies: &Slab<Body>, id: BodyId) -> Option<NodeId> {
        bodies.get(id.0)?.membership.map(|m| m.node)
    }

    /// Deepest node at or below `from` whose region strictly contains `bounds`.
    fn descend(&self, from: NodeId, bounds: &Aabb) -> NodeId {
        let mut cur = from;
        'down: while let Some(children) = self.nodes[cur.index()].children {
            for child in children {
                if self.region(child).strictly_contains(bounds) {
                    cur = child;
                    continue 'down;
                }
            }
            break;
        }
        cur
    }

    /// Walk up from `from` until a region contains `bounds`, growing the root if needed,
    /// then back down as deep as it fits.
    fn locate(&mut self, from: NodeId, bounds: &Aabb) -> NodeId {
        let mut up = from;
        while !self.region(up).strictly_contains(bounds) {
            match self.nodes[up.index()].parent {
                Some(parent) => up = parent,
                None => {
                    if !self.grow_to_fit(bounds) {
                        return self.root;
                    }
                    up = self.root;
                    break;
                }
            }
        }
        self.descend(up, bounds)
    }

    /// Grow the root until it strictly contains `bounds`. False for non-finite bounds.
    fn grow_to_fit(&mut self, bounds: &Aabb) -> bool {
        if !bounds.is_finite() {
            warn!(?bounds, "body bounds are not finite; holding it at the root");
            return false;
        }
        while !self.root_region().strictly_contains(bounds) {
            self.grow_toward(bounds.center());
        }
        true
    }

    /// Double the root toward `target`; the old root becomes one quadrant of the new one.
    fn grow_toward(&mut self, target: Vec2) {
        let old = self.root;
        let (center, half) = {
            let n = &self.nodes[old.index()];
            (n.center, n.half)
        };
        let dir = Vec2::new(
            if target.x < center.x { -1.0 } else { 1.0 },
            if target.y < center.y { -1.0 } else { 1.0 },
        );
        let new_center = center + dir * half;
        let new_half = half * 2.0;
        let subtree_len = self.nodes[old.index()].subtree_len;

        let root = self.alloc(new_center, new_half, None);
        let old_q = quadrant(new_center, center);
        let mut children = [old; 4];
        for (q, slot) in children.iter_mut().enumerate() {
            if q != old_q {
                *slot = self.alloc(child_center(new_center, new_half, q), half, Some(root));
            }
        }
        self.nodes[old.index()].parent = Some(root);
        let node = &mut self.nodes[root.index()];
        node.children = Some(children);
        node.subtree_len = subtree_len;
        self.root = root;
        debug!(half = new_half, center = ?new_center, "quadtree root grew");
    }

    /// Recompute every body's swept bounds for `window` and move any body whose node no
    /// longer strictly contains them (or that now fits deeper).
    pub fn ensure_contained(&mut self, bodies: &mut Slab<Body>, window: f32) {
        let mut pending = std::mem::take(&mut self.pending);
        pending.clear();
        for (key, body) in bodies.iter_mut() {
            let bounds = body.compute_swept_bounds(window);
            let Some(m) = body.membership else { continue };
            let node = &self.nodes[m.node.index()];
            if node.children.is_some() || !node.region().strictly_contains(&bounds) {
                pending.push(BodyId(key));
            }
        }
        for &id in &pending {
            let Some(current) = bodies[id.0].membership.map(|m| m.node) else { continue };
            let bounds = bodies[id.0].bounds();
            let target = self.locate(current, &bounds);
            if target != current {
                self.detach(bodies, id);
                self.attach(bodies, id, target);
            }
        }
        self.pending = pending;
    }

    /// Earliest contact among filter-enabled pairs within `[0, window]`.
    ///
    /// Traversal is preorder from the root. At each node, pairs of its own bodies are tried
    /// in list order, then each own body against the subtrees below (quadrants 0..4), then
    /// the quadrants themselves. A later pair replaces the current best only when strictly
    /// earlier, so ties resolve to the first pair visited. The returned event's `a` is the
    /// body met first in that order.
    pub fn earliest_event(
        &self,
        bodies: &Slab<Body>,
        filter: &CategoryFilter,
        window: f32,
    ) -> (CollisionEvent, SearchStats) {
        let mut search = Search {
            bodies,
            filter,
            window,
            best: CollisionEvent::NONE,
            stats: SearchStats::default(),
        };
        self.visit(self.root, &mut search);
        (search.best, search.stats)
    }

    fn visit(&self, id: NodeId, search: &mut Search<'_>) {
        let node = &self.nodes[id.index()];
        if node.subtree_len < 2 {
            return;
        }
        for (i, &a) in node.bodies.iter().enumerate() {
            for &b in &node.bodies[i + 1..] {
                search.test(a, b);
            }
        }
        if let Some(children) = node.children {
            for &a in &node.bodies {
                let bounds = search.bodies[a.0].bounds();
                for child in children {
                    self.visit_against(child, a, &bounds, search);
                }
            }
            for child in children {
                self.visit(child, search);
            }
        }
    }

    fn visit_against(&self, id: NodeId, a: BodyId, bounds: &Aabb, search: &mut Search<'_>) {
        let node = &self.nodes[id.index()];
        if node.subtree_len == 0 || !node.region().overlaps(bounds) {
            return;
        }
        for &b in &node.bodies {
            search.test(a, b);
        }
        if let Some(children) = node.children {
            for child in children {
                self.visit_against(child, a, bounds, search);
            }
        }
    }

    /// Between-frame maintenance: shrink the root, then split crowded leaves and collapse
    /// sparse quads.
    pub fn try_resize(&mut self, bodies: &mut Slab<Body>) {
        if self.shrink_root {
            self.shrink();
        }
        self.rebalance(self.root, bodies);
    }

    fn shrink(&mut self) {
        loop {
            let root = &self.nodes[self.root.index()];
            let Some(children) = root.children else { break };
            if !root.bodies.is_empty() || root.half * 0.5 < self.initial_half {
                break;
            }
            let total = root.subtree_len;
            let keep = if total == 0 {
                // An empty tree shrinks toward the configured center.
                children[quadrant(root.center, self.initial_center)]
            } else {
                match children.into_iter().find(|c| self.nodes[c.index()].subtree_len == total) {
                    Some(keep) => keep,
                    None => break,
                }
            };
            let old = self.root;
            self.nodes[old.index()].children = None;
            for child in children {
                if child != keep {
                    self.release(child);
                }
            }
            self.nodes[keep.index()].parent = None;
            self.release(old);
            self.root = keep;
            debug!(half = self.nodes[keep.index()].half, "quadtree root shrank");
        }
    }

    fn rebalance(&mut self, id: NodeId, bodies: &mut Slab<Body>) {
        match self.nodes[id.index()].children {
            Some(children) => {
                if self.nodes[id.index()].subtree_len <= self.split_threshold {
                    self.collapse(id, bodies);
                } else {
                    for child in children {
                        self.rebalance(child, bodies);
                    }
                }
            }
            None => {
                let node = &self.nodes[id.index()];
                if node.bodies.len() > self.split_threshold
                    && node.half * 0.5 >= self.min_half
                    && self.split(id, bodies)
                {
                    if let Some(children) = self.nodes[id.index()].children {
                        for child in children {
                            self.rebalance(child, bodies);
                        }
                    }
                }
            }
        }
    }

    /// Give a leaf four quadrants and push down every body that fits one.
    ///
    /// Returns false (and leaves the node alone) if no body would move.
    fn split(&mut self, id: NodeId, bodies: &mut Slab<Body>) -> bool {
        let (center, half) = (self.nodes[id.index()].center, self.nodes[id.index()].half);
        let fits = |b: &Body| child_fit(center, half, &b.bounds());
        if !self.nodes[id.index()].bodies.iter().any(|b| fits(&bodies[b.0]).is_some()) {
            return false;
        }

        let mut children = [id; 4];
        for (q, slot) in children.iter_mut().enumerate() {
            *slot = self.alloc(child_center(center, half, q), half * 0.5, Some(id));
        }
        self.nodes[id.index()].children = Some(children);

        let own = std::mem::take(&mut self.nodes[id.index()].bodies);
        for body_id in own {
            let target = match fits(&bodies[body_id.0]) {
                Some(q) => children[q],
                None => id,
            };
            let list = &mut self.nodes[target.index()].bodies;
            let slot = list.len();
            list.push(body_id);
            bodies[body_id.0].membership = Some(Membership { node: target, slot });
            if target != id {
                self.nodes[target.index()].subtree_len += 1;
            }
        }
        debug!(node = id.0, half, "quadtree node split");
        true
    }

    /// Pull every descendant body up onto `id` and free its subtree.
    fn collapse(&mut self, id: NodeId, bodies: &mut Slab<Body>) {
        let Some(children) = self.nodes[id.index()].children.take() else { return };
        let mut stack: Vec<NodeId> = children.to_vec();
        while let Some(n) = stack.pop() {
            let moved = std::mem::take(&mut self.nodes[n.index()].bodies);
            for body_id in moved {
                let list = &mut self.nodes[id.index()].bodies;
                let slot = list.len();
                list.push(body_id);
                bodies[body_id.0].membership = Some(Membership { node: id, slot });
            }
            if let Some(grand) = self.nodes[n.index()].children {
                stack.extend(grand);
            }
        }
        for child in children {
            self.release(child);
        }
        debug!(node = id.0, "quadtree node collapsed");
    }

    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        let mut stack = vec![(self.root, 1usize)];
        while let Some((id, depth)) = stack.pop() {
            stats.nodes += 1;
            stats.depth = stats.depth.max(depth);
            match self.nodes[id.index()].children {
                Some(children) => stack.extend(children.map(|c| (c, depth + 1))),
                None => stats.leaves += 1,
            }
        }
        stats
    }

    /// Visit node regions (preorder, with depth and leaf flag) and the bodies they hold,
    /// skipping subtrees whose region misses `view`.
    pub fn for_each_in_view(
        &self,
        view: Option<&Aabb>,
        mut on_node: impl FnMut(Aabb, usize, bool),
        mut on_body: impl FnMut(BodyId),
    ) {
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            let node = &self.nodes[id.index()];
            let region = node.region();
            if view.is_some_and(|v| !v.overlaps(&region)) {
                continue;
            }
            on_node(region, depth, node.children.is_none());
            for &b in &node.bodies {
                on_body(b);
            }
            if let Some(children) = node.children {
                stack.extend(children.iter().rev().map(|&c| (c, depth + 1)));
            }
        }
    }

    /// Every indexed body sits in a node that strictly contains its bounds, at the slot its
    /// back-reference names, and node counts add up.
    pub fn check_invariants(&self, bodies: &Slab<Body>) -> Result<(), String> {
        let mut seen = 0;
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.index()];
            let region = node.region();
            for (slot, &b) in node.bodies.iter().enumerate() {
                let body = bodies.get(b.0).ok_or_else(|| format!("{b:?} indexed but not live"))?;
                if body.membership != Some(Membership { node: id, slot }) {
                    return Err(format!("{b:?} back-reference does not match node {}", id.0));
                }
                let bounds = body.bounds();
                if bounds.is_finite() && !region.strictly_contains(&bounds) {
                    return Err(format!("{b:?} bounds {bounds:?} escape node region {region:?}"));
                }
            }
            let below: usize = node
                .children
                .map(|c| c.iter().map(|c| self.nodes[c.index()].subtree_len).sum::<usize>())
                .unwrap_or(0);
            if node.subtree_len != node.bodies.len() + below {
                return Err(format!("node {} subtree count is off", id.0));
            }
            seen += node.bodies.len();
            if let Some(children) = node.children {
                stack.extend(children);
            }
        }
        let live = bodies.iter().filter(|(_, b)| b.is_indexed()).count();
        if seen != live {
            return Err(format!("{seen} bodies in tree, {live} marked indexed"));
        }
        Ok(())
    }
}

/// Quadrant of `p` relative to `center`.
fn quadrant(center: Vec2, p: Vec2) -> usize {
    (p.x >= center.x) as usize | ((p.y >= center.y) as usize) << 1
}

fn child_center(center: Vec2, half: f32, q: usize) -> Vec2 {
    let quarter = half * 0.5;
    Vec2::new(
        if q & 1 != 0 { center.x + quarter } else { center.x - quarter },
        if q & 2 != 0 { center.y + quarter } else { center.y - quarter },
    )
}

/// Quadrant of the node at (`center`, `half`) that strictly contains `bounds`, if any.
fn child_fit(center: Vec2, half: f32, bounds: &Aabb) -> Option<usize> {
    let q = quadrant(center, bounds.center());
    let region = Aabb::from_center_half_extents(child_center(center, half, q), Vec2::splat(half * 0.5));
    region.strictly_contains(bounds).then_some(q)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::BodyDesc;
    use crate::shape::Shape;
    use crate::types::Category;

    fn cfg(half: f32, split: usize) -> WorldConfig {
        WorldConfig { half_extent: half, split_threshold: split, ..Default::default() }
    }

    fn add(tree: &mut QuadTree, bodies: &mut Slab<Body>, x: f32, y: f32, vx: f32) -> BodyId {
        let body = Body::new(
            BodyDesc::new(Shape::aabb(2.0, 2.0).unwrap())
                .at(Vec2::new(x, y))
                .moving(Vec2::new(vx, 0.0)),
        );
        let id = BodyId(bodies.insert(body));
        tree.insert(bodies, id);
        id
    }

    fn all_pairs() -> CategoryFilter {
        let mut f = CategoryFilter::new();
        f.enable_pair(Category::of(0), Category::of(0));
        f
    }

    #[test]
    fn test_root_grows_toward_far_body() {
        let mut bodies = Slab::new();
        let mut tree = QuadTree::new(&cfg(8.0, 4));
        let id = add(&mut tree, &mut bodies, 100.0, 3.0, 0.0);
        assert!(tree.root_region().strictly_contains(&bodies[id.0].bounds()));
        assert!(tree.root_region().half_extents().x >= 64.0);
        tree.check_invariants(&bodies).unwrap();
    }

    #[test]
    fn test_remove_fixes_swapped_slot() {
        let mut bodies = Slab::new();
        let mut tree = QuadTree::new(&cfg(64.0, 8));
        let a = add(&mut tree, &mut bodies, 0.0, 0.0, 0.0);
        let _b = add(&mut tree, &mut bodies, 5.0, 0.0, 0.0);
        let c = add(&mut tree, &mut bodies, 10.0, 0.0, 0.0);
        assert!(tree.remove(&mut bodies, a));
        assert!(!tree.remove(&mut bodies, a));
        assert_eq!(bodies[c.0].membership.map(|m| m.slot), Some(0));
        assert_eq!(tree.len(), 2);
        tree.check_invariants(&bodies).unwrap();
    }

    #[test]
    fn test_split_and_collapse() {
        let mut bodies = Slab::new();
        let mut tree = QuadTree::new(&cfg(64.0, 2));
        let ids: Vec<_> = [(-30.0, -30.0), (30.0, -30.0), (-30.0, 30.0), (30.0, 30.0)]
            .iter()
            .map(|&(x, y)| add(&mut tree, &mut bodies, x, y, 0.0))
            .collect();
        tree.try_resize(&mut bodies);
        let s = tree.stats();
        assert_eq!(s.nodes, 5);
        assert_eq!(s.leaves, 4);
        tree.check_invariants(&bodies).unwrap();

        for &id in &ids[..3] {
            tree.remove(&mut bodies, id);
            bodies.remove(id.0);
        }
        tree.try_resize(&mut bodies);
        assert_eq!(tree.stats().nodes, 1);
        tree.check_invariants(&bodies).unwrap();
    }

    #[test]
    fn test_ensure_contained_relocates_moving_body() {
        let mut bodies = Slab::new();
        let mut tree = QuadTree::new(&cfg(64.0, 1));
        add(&mut tree, &mut bodies, -30.0, -30.0, 0.0);
        let mover = add(&mut tree, &mut bodies, 30.0, -30.0, 0.0);
        tree.try_resize(&mut bodies);
        let before = tree.node_of(&bodies, mover).unwrap();

        bodies[mover.0].set_velocity(Vec2::new(-200.0, 0.0));
        tree.ensure_contained(&mut bodies, 1.0);
        assert_ne!(tree.node_of(&bodies, mover), Some(before));
        tree.check_invariants(&bodies).unwrap();
    }

    #[test]
    fn test_earliest_event_across_nodes() {
        let mut bodies = Slab::new();
        let mut tree = QuadTree::new(&cfg(64.0, 1));
        let left = add(&mut tree, &mut bodies, -20.0, -20.0, 0.0);
        let right = add(&mut tree, &mut bodies, 20.0, -20.0, -40.0);
        add(&mut tree, &mut bodies, 20.0, 20.0, 0.0);
        tree.try_resize(&mut bodies);
        tree.ensure_contained(&mut bodies, 1.0);
        tree.check_invariants(&bodies).unwrap();

        let (event, stats) = tree.earliest_event(&bodies, &all_pairs(), 1.0);
        let (a, b) = event.bodies().unwrap();
        assert!((a == right && b == left) || (a == left && b == right));
        // gap of 38 closed at 40/s
        assert!((event.time() - 0.95).abs() < 1e-4);
        assert!(stats.candidate_pairs >= 1);
    }

    #[test]
    fn test_filter_blocks_candidates() {
        let mut bodies = Slab::new();
        let mut tree = QuadTree::new(&cfg(64.0, 8));
        add(&mut tree, &mut bodies, 0.0, 0.0, 10.0);
        add(&mut tree, &mut bodies, 5.0, 0.0, 0.0);
        tree.ensure_contained(&mut bodies, 1.0);
        let (event, stats) = tree.earliest_event(&bodies, &CategoryFilter::new(), 1.0);
        assert!(event.is_none());
        assert_eq!(stats.candidate_pairs, 0);
    }

    #[test]
    fn test_clear_restores_initial_root() {
        let mut bodies = Slab::new();
        let mut tree = QuadTree::new(&cfg(8.0, 4));
        add(&mut tree, &mut bodies, 500.0, 0.0, 0.0);
        tree.clear();
        assert_eq!(tree.root_region(), Aabb::from_center_half_extents(Vec2::ZERO, Vec2::splat(8.0)));
        assert_eq!(tree.stats().nodes, 1);
    }

    #[test]
    fn test_root_shrinks_back() {
        let mut bodies = Slab::new();
        let mut tree = QuadTree::new(&cfg(16.0, 4));
        let far = add(&mut tree, &mut bodies, 200.0, 200.0, 0.0);
        add(&mut tree, &mut bodies, 3.0, 3.0, 0.0);
        tree.remove(&mut bodies, far);
        bodies.remove(far.0);
        tree.try_resize(&mut bodies);
        assert_eq!(tree.root_region().half_extents(), Vec2::splat(16.0));
        tree.check_invariants(&bodies).unwrap();
    }
}
