use tunnelfree::*;

const A: Category = Category::of(0);
const B: Category = Category::of(1);
const C: Category = Category::of(2);

fn world() -> CollisionWorld {
    CollisionWorld::new(WorldConfig { half_extent: 64.0, split_threshold: 4, ..Default::default() })
        .unwrap()
}

fn body(shape: Shape, pos: Vec2, vel: Vec2, category: Category) -> Body {
    Body::new(BodyDesc::new(shape).at(pos).moving(vel).category(category))
}

fn square(half: f32) -> Shape {
    Shape::aabb(half * 2.0, half * 2.0).unwrap()
}

fn lcg(seed: &mut u32) -> f32 {
    *seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
    *seed as f32 / u32::MAX as f32
}

/// How far two shapes overlap; negative when apart.
fn penetration(a: &Body, b: &Body) -> f32 {
    fn circle_box(c: Vec2, r: f32, box_c: Vec2, box_h: Vec2) -> f32 {
        let p = c - box_c;
        let d = (p - p.clamp(-box_h, box_h)).length();
        if d > 0.0 { r - d } else { r + (box_h - p.abs()).min_element() }
    }
    match (*a.shape(), *b.shape()) {
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            ra + rb - a.position().distance(b.position())
        }
        (Shape::Aabb { half_extents: ha }, Shape::Aabb { half_extents: hb }) => {
            let p = ha + hb - (a.position() - b.position()).abs();
            p.x.min(p.y)
        }
        (Shape::Circle { radius }, Shape::Aabb { half_extents }) => {
            circle_box(a.position(), radius, b.position(), half_extents)
        }
        (Shape::Aabb { half_extents }, Shape::Circle { radius }) => {
            circle_box(b.position(), radius, a.position(), half_extents)
        }
        _ => unreachable!("scene uses boxes and circles only"),
    }
}

#[test]
fn no_overshoot_at_reported_events() {
    let mut w = world();
    w.enable_pair(A, A);
    let mut seed = 7u32;
    for i in 0..8 {
        for j in 0..8 {
            let pos = Vec2::new(i as f32 * 10.0 - 35.0, j as f32 * 10.0 - 35.0);
            let vel = Vec2::new(lcg(&mut seed) * 120.0 - 60.0, lcg(&mut seed) * 120.0 - 60.0);
            let shape = if (i + j) % 2 == 0 { square(1.5) } else { Shape::circle(1.5).unwrap() };
            w.add_body(body(shape, pos, vel, A));
        }
    }

    let mut events = 0;
    let mut worst = f32::NEG_INFINITY;
    let mut ctx = |bodies: &mut BodyAccess<'_>, ev: &CollisionEvent, _rate: f32| {
        let (a, b) = ev.bodies().expect("concrete event");
        let depth = penetration(bodies.get(a).unwrap(), bodies.get(b).unwrap());
        worst = worst.max(depth);
        events += 1;
        bodies.bounce(ev).unwrap();
    };
    let cap = w.config().max_events_per_step;
    for frame in 0..30 {
        w.step(1.0 / 30.0, &mut ctx);
        let stats = w.stats();
        assert!(stats.events < cap, "frame {frame} stalled at the event cap");
        assert!((w.game_time() - (frame + 1) as f32 / 30.0).abs() < 1e-3);
    }
    assert!(events > 0, "scene should produce collisions");
    assert!(worst < 1e-2, "bodies overlapped by {worst} at an event");
}

#[test]
fn containment_holds_after_every_pass() {
    let mut w = world();
    w.enable_pair(A, A);
    let mut seed = 99u32;
    for _ in 0..60 {
        let pos = Vec2::new(lcg(&mut seed) * 100.0 - 50.0, lcg(&mut seed) * 100.0 - 50.0);
        let vel = Vec2::new(lcg(&mut seed) * 400.0 - 200.0, lcg(&mut seed) * 400.0 - 200.0);
        w.add_body(body(square(0.5), pos, vel, A));
    }
    w.check_index().unwrap();

    for _ in 0..20 {
        w.step(1.0 / 20.0, &mut |bodies: &mut BodyAccess<'_>, ev: &CollisionEvent, _: f32| {
            bodies.bounce(ev).unwrap();
        });
        w.check_index().unwrap();

        // Fresh containment pass for the next frame's window.
        w.peek_event(1.0 / 20.0);
        w.check_index().unwrap();
        for (id, b) in w.bodies() {
            let region = w.node_region_of(id).unwrap();
            assert!(region.strictly_contains(&b.bounds()), "{id:?} escapes its node");
        }
    }
    assert!(w.stats().nodes > 1, "tree should have split");
}

#[test]
fn filter_is_symmetric() {
    let mut w = world();
    w.enable_pair(A, B);
    assert!(w.is_pair_enabled(A, B));
    assert!(w.is_pair_enabled(B, A));
    assert!(!w.is_pair_enabled(A, C));

    w.disable_pair(A, B);
    assert!(!w.is_pair_enabled(B, A));

    w.enable_pair(C, C);
    w.enable_pair(C, C);
    assert!(w.is_pair_enabled(C, C));
}

#[test]
fn sentinel_and_concrete_events_are_consistent() {
    let mut w = world();
    w.add_body(body(square(1.0), Vec2::ZERO, Vec2::new(5.0, 0.0), A));
    w.add_body(body(square(1.0), Vec2::new(4.0, 0.0), Vec2::ZERO, A));

    let none = w.peek_event(1.0);
    assert!(none.is_none());
    assert_eq!(none.is_none(), none.a().is_none() && none.b().is_none());
    assert!(none.time().is_infinite());

    w.enable_pair(A, A);
    let hit = w.peek_event(1.0);
    assert!(!hit.is_none());
    assert_eq!(hit.is_none(), hit.a().is_none() && hit.b().is_none());
    let (a, b) = hit.bodies().unwrap();
    assert_ne!(a, b);
    assert!(w.contains(a) && w.contains(b));
    assert!(hit.time() >= 0.0 && hit.time() <= 1.0);
}

#[test]
fn resting_circles_stay_put() {
    let mut w = world();
    w.enable_pair(A, A);
    let c = Shape::circle(5.0).unwrap();
    let left = w.add_body(body(c, Vec2::ZERO, Vec2::ZERO, A));
    let right = w.add_body(body(c, Vec2::new(20.0, 0.0), Vec2::ZERO, A));

    assert!(w.peek_event(10.0).is_none());
    let mut events = 0;
    w.step(3.7, &mut |_: &mut BodyAccess<'_>, _: &CollisionEvent, _: f32| events += 1);
    assert_eq!(events, 0);
    assert_eq!(w.body(left).unwrap().position(), Vec2::ZERO);
    assert_eq!(w.body(right).unwrap().position(), Vec2::new(20.0, 0.0));
}

#[test]
fn head_on_boxes_meet_at_point_eight() {
    let mut w = world();
    w.enable_pair(A, A);
    w.add_body(body(square(1.0), Vec2::ZERO, Vec2::new(5.0, 0.0), A));
    w.add_body(body(square(1.0), Vec2::new(10.0, 0.0), Vec2::new(-5.0, 0.0), A));

    let ev = w.peek_event(2.0);
    assert!((ev.time() - 0.8).abs() < 1e-4);
    assert!((ev.normal().x.abs() - 1.0).abs() < 1e-6);
    assert_eq!(ev.normal().y, 0.0);

    let mut seen = Vec::new();
    w.step(1.0, &mut |_: &mut BodyAccess<'_>, ev: &CollisionEvent, _: f32| seen.push(ev.time()));
    // Not separated by the handler, so the same pair keeps touching at t=0 afterwards.
    assert!(!seen.is_empty());
    assert!((seen[0] - 0.8).abs() < 1e-4);
}

#[test]
fn disabled_categories_never_collide() {
    let mut w = world();
    w.enable_pair(A, A);
    w.enable_pair(B, B);
    // Overlapping and closing, but A/B is not enabled.
    let a = w.add_body(body(square(1.0), Vec2::ZERO, Vec2::new(3.0, 0.0), A));
    let b = w.add_body(body(square(1.0), Vec2::new(1.0, 0.0), Vec2::new(-3.0, 0.0), B));

    assert!(w.peek_event(1.0).is_none());
    let mut events = 0;
    w.step(1.0, &mut |_: &mut BodyAccess<'_>, _: &CollisionEvent, _: f32| events += 1);
    assert_eq!(events, 0);
    assert_eq!(w.body(a).unwrap().position(), Vec2::new(3.0, 0.0));
    assert_eq!(w.body(b).unwrap().position(), Vec2::new(-2.0, 0.0));
}

#[test]
fn frame_without_events_moves_by_velocity_times_elapsed() {
    let mut w = world();
    let mut seed = 3u32;
    let mut start = Vec::new();
    for _ in 0..40 {
        let pos = Vec2::new(lcg(&mut seed) * 100.0 - 50.0, lcg(&mut seed) * 100.0 - 50.0);
        let vel = Vec2::new(lcg(&mut seed) * 20.0 - 10.0, lcg(&mut seed) * 20.0 - 10.0);
        let id = w.add_body(body(Shape::circle(1.0).unwrap(), pos, vel, A));
        start.push((id, pos, vel));
    }
    let t = 0.75;
    let mut events = 0;
    w.step(t, &mut |_: &mut BodyAccess<'_>, _: &CollisionEvent, _: f32| events += 1);
    assert_eq!(events, 0);
    for (id, pos, vel) in start {
        assert_eq!(w.body(id).unwrap().position(), pos + vel * t);
    }
    assert_eq!(w.stats().substeps, 1);
}

#[test]
fn fast_body_does_not_tunnel() {
    let mut w = world();
    w.enable_pair(A, B);
    let bullet = w.add_body(body(Shape::circle(0.1).unwrap(), Vec2::new(-20.0, 0.0), Vec2::new(3000.0, 0.0), A));
    let wall = w.add_body(body(Shape::aabb(0.2, 10.0).unwrap(), Vec2::ZERO, Vec2::ZERO, B));

    let mut hits = Vec::new();
    w.step(1.0 / 60.0, &mut |bodies: &mut BodyAccess<'_>, ev: &CollisionEvent, _: f32| {
        hits.push(*ev);
        bodies.get_mut(bullet).unwrap().set_velocity(Vec2::ZERO);
    });
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].bodies(), Some((bullet, wall)));
    assert_eq!(hits[0].normal(), Vec2::new(-1.0, 0.0));
    let x = w.body(bullet).unwrap().position().x;
    assert!((x - -0.2).abs() < 1e-3, "bullet stopped at {x}");
}
