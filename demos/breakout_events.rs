use std::error::Error;

use tracing_subscriber::EnvFilter;
use tunnelfree::*;

const BALL: Category = Category::of(0);
const WALL: Category = Category::of(1);
const BRICK: Category = Category::of(2);

/// Bounces the ball off everything and knocks out bricks.
struct Breakout {
    bricks: Vec<BodyId>,
    frames: u32,
}

impl StepContext for Breakout {
    fn handle_collision(&mut self, bodies: &mut BodyAccess<'_>, event: &CollisionEvent, rate: f32) {
        let Some((a, b)) = event.bodies() else { return };
        println!(
            "t={:.3} {:?} vs {:?} n=({:.2},{:.2}) rate={:.1}/s",
            event.time(),
            a,
            b,
            event.normal().x,
            event.normal().y,
            rate
        );
        if let Err(e) = bodies.bounce(event) {
            eprintln!("bounce failed: {e}");
            return;
        }
        for id in [a, b] {
            if let Some(pos) = self.bricks.iter().position(|&brick| brick == id) {
                self.bricks.swap_remove(pos);
                bodies.remove(id);
                println!("  brick {id:?} destroyed, {} left", self.bricks.len());
            }
        }
    }

    fn update(&mut self, _elapsed: f32) {
        self.frames += 1;
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let mut world = CollisionWorld::new(WorldConfig { half_extent: 32.0, ..Default::default() })?;
    world.enable_pair(BALL, WALL);
    world.enable_pair(BALL, BRICK);

    let walls = [
        (Vec2::new(0.0, 21.0), Vec2::new(42.0, 2.0)),
        (Vec2::new(0.0, -21.0), Vec2::new(42.0, 2.0)),
        (Vec2::new(-21.0, 0.0), Vec2::new(2.0, 40.0)),
        (Vec2::new(21.0, 0.0), Vec2::new(2.0, 40.0)),
    ];
    for (center, size) in walls {
        let wall = Body::new(BodyDesc::new(Shape::aabb(size.x, size.y)?).at(center).category(WALL))
            .with_mass(f32::INFINITY)?;
        world.add_body(wall);
    }

    let mut bricks = Vec::new();
    for row in 0..3 {
        for col in 0..6 {
            let center = Vec2::new(-12.5 + col as f32 * 5.0, 8.0 + row as f32 * 3.0);
            let brick = Body::new(BodyDesc::new(Shape::aabb(4.0, 2.0)?).at(center).category(BRICK))
                .with_mass(f32::INFINITY)?;
            bricks.push(world.add_body(brick));
        }
    }

    // Fast enough to cross a brick in well under one frame.
    let ball = world.add_body(Body::new(
        BodyDesc::new(Shape::circle(0.5)?)
            .at(Vec2::new(0.0, -10.0))
            .moving(Vec2::new(37.0, 91.0))
            .material(Material::RUBBER)
            .category(BALL),
    ));

    let mut game = Breakout { bricks, frames: 0 };
    while game.frames < 600 && !game.bricks.is_empty() {
        world.step(1.0 / 60.0, &mut game);
    }

    let stats = world.stats();
    println!(
        "frames={} bricks_left={} ball={:?} nodes={} depth={}",
        game.frames,
        game.bricks.len(),
        world.body(ball).map(Body::position),
        stats.nodes,
        stats.depth
    );
    Ok(())
}
