//! Elastic bounce for collision handlers.
//!
//! The engine only reports events; handlers that want bodies to rebound can call
//! [`bounce`] on the two participants.

use glam::Vec2;

use crate::body::Kinematics;
use crate::vector::Vec2Ext;

/// Exchange normal momentum between `a` and `b` across the contact `normal`.
///
/// `normal` is the event normal (unit, from `b` into `a`). `restitution` scales the rebound:
/// 1 is perfectly elastic, 0 is perfectly plastic. Tangential velocity is preserved. An
/// infinite-mass body is never moved; two infinite masses both lose their normal velocity.
pub fn bounce(a: &mut Kinematics, b: &mut Kinematics, normal: Vec2, restitution: f32) {
    let tangent = normal.perp();
    let (na, ta) = (a.velocity.unit_scalar_project(normal), a.velocity.unit_scalar_project(tangent));
    let (nb, tb) = (b.velocity.unit_scalar_project(normal), b.velocity.unit_scalar_project(tangent));

    let (na_final, nb_final) = match (a.mass.is_infinite(), b.mass.is_infinite()) {
        (true, true) => (0.0, 0.0),
        (true, false) => (na, na * (1.0 + restitution) - restitution * nb),
        (false, true) => (nb * (1.0 + restitution) - restitution * na, nb),
        (false, false) => {
            let closing = nb - na;
            let momentum = na * a.mass + nb * b.mass;
            let total = a.mass + b.mass;
            (
                (restitution * b.mass * closing + momentum) / total,
                (momentum - restitution * a.mass * closing) / total,
            )
        }
    };

    a.velocity = normal * na_final + tangent * ta;
    b.velocity = normal * nb_final + tangent * tb;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kin(vx: f32, vy: f32, mass: f32) -> Kinematics {
        Kinematics { position: Vec2::ZERO, velocity: Vec2::new(vx, vy), mass }
    }

    #[test]
    fn test_equal_masses_swap_normal_velocity() {
        let mut a = kin(5.0, 1.0, 2.0);
        let mut b = kin(-5.0, 0.0, 2.0);
        // a approaches b from the left: normal from b into a points -x
        bounce(&mut a, &mut b, Vec2::new(-1.0, 0.0), 1.0);
        assert!((a.velocity.x + 5.0).abs() < 1e-5);
        assert!((a.velocity.y - 1.0).abs() < 1e-5);
        assert!((b.velocity.x - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_bounce_off_infinite_wall() {
        let mut ball = kin(0.0, -3.0, 1.0);
        let mut wall = kin(0.0, 0.0, f32::INFINITY);
        bounce(&mut ball, &mut wall, Vec2::Y, 1.0);
        assert!((ball.velocity.y - 3.0).abs() < 1e-5);
        assert_eq!(wall.velocity, Vec2::ZERO);

        let mut ball = kin(0.0, -3.0, 1.0);
        bounce(&mut wall, &mut ball, Vec2::NEG_Y, 0.5);
        assert!((ball.velocity.y - 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_plastic_conserves_momentum() {
        let mut a = kin(4.0, 0.0, 1.0);
        let mut b = kin(0.0, 0.0, 3.0);
        bounce(&mut a, &mut b, Vec2::NEG_X, 0.0);
        assert!((a.velocity.x - 1.0).abs() < 1e-5);
        assert!((b.velocity.x - 1.0).abs() < 1e-5);
    }
}
