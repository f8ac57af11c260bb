use std::error::Error;
use std::time::Instant;

use tracing_subscriber::EnvFilter;
use tunnelfree::*;

fn lcg(seed: &mut u32) -> u32 {
    *seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
    *seed
}

fn unit(seed: &mut u32) -> f32 {
    lcg(seed) as f32 / u32::MAX as f32
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse()?))
        .init();

    let mut world = CollisionWorld::new(WorldConfig {
        half_extent: 128.0,
        split_threshold: 8,
        max_events_per_step: 100_000,
        ..Default::default()
    })?;
    let dynamic = Category::of(0);
    world.enable_pair(dynamic, dynamic);
    world.add_effect(Box::new(SpeedLimit::new(2.0, 0.9, CategoryMask::ALL)?));

    let n = 5_000usize;
    let mut seed = 1u32;
    for i in 0..n {
        let pos = Vec2::new(unit(&mut seed) * 200.0 - 100.0, unit(&mut seed) * 200.0 - 100.0);
        let vel = Vec2::new(unit(&mut seed) * 4.0 - 2.0, unit(&mut seed) * 4.0 - 2.0);
        let shape = match i % 3 {
            0 => Shape::aabb(1.0, 1.0)?,
            1 => Shape::circle(0.5)?,
            _ => Shape::Polygon(ConvexPolygon::regular(0.5, 6)?),
        };
        world.add_body(Body::new(BodyDesc::new(shape).at(pos).moving(vel).category(dynamic)));
    }

    let mut handled = 0usize;
    let mut ctx = |bodies: &mut BodyAccess<'_>, ev: &CollisionEvent, _rate: f32| {
        handled += 1;
        if bodies.bounce(ev).is_err() {
            eprintln!("event named a missing body: {ev:?}");
        }
    };

    let frames = 60;
    let t0 = Instant::now();
    for _ in 0..frames {
        world.step(1.0 / 60.0, &mut ctx);
    }
    let elapsed = t0.elapsed();

    let stats = world.stats();
    println!(
        "N={} frames={} total={:?} per_frame={:?} events={} last_frame(substeps={} candidates={} contacts={}) nodes={} leaves={} depth={}",
        n,
        frames,
        elapsed,
        elapsed / frames,
        handled,
        stats.substeps,
        stats.candidate_pairs,
        stats.contacts_found,
        stats.nodes,
        stats.leaves,
        stats.depth
    );
    Ok(())
}
