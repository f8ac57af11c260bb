use glam::Vec2;

use crate::api::NarrowphaseApi;
use crate::polygon::ConvexPolygon;
use crate::types::Contact;
use crate::vector::Vec2Ext;

/// Relative speeds at or below this along an axis count as "not moving" on that axis.
pub const VELOCITY_EPSILON: f32 = 1e-6;

/// Swept primitive tests. All velocities are in units per unit time; results are in time.
pub struct Narrowphase;

/// Entry/exit times of one moving interval against a static one.
#[derive(Copy, Clone, Debug)]
struct AxisSweep {
    /// `NEG_INFINITY` when the intervals already overlap on this axis.
    entry: f32,
    exit: f32,
    /// Sign of the normal on this axis (from B into A) if this axis sets the entry time.
    sign: f32,
}

/// Sweep interval `[a_min, a_max]` moving at `vel` against the fixed `[b_min, b_max]`.
///
/// Returns `None` when the intervals are apart and not closing.
fn sweep_axis(a_min: f32, a_max: f32, b_min: f32, b_max: f32, vel: f32) -> Option<AxisSweep> {
    let (entry, sign) = if a_max <= b_min {
        if vel <= VELOCITY_EPSILON {
            return None;
        }
        ((b_min - a_max) / vel, -1.0)
    } else if a_min >= b_max {
        if vel >= -VELOCITY_EPSILON {
            return None;
        }
        ((b_max - a_min) / vel, 1.0)
    } else {
        (f32::NEG_INFINITY, 0.0)
    };
    let exit = if vel > VELOCITY_EPSILON {
        (b_max - a_min) / vel
    } else if vel < -VELOCITY_EPSILON {
        (b_min - a_max) / vel
    } else {
        f32::INFINITY
    };
    Some(AxisSweep { entry, exit, sign })
}

/// Combine per-axis sweeps into a first-contact time and axis normal.
fn combine_axes(x: AxisSweep, y: AxisSweep) -> Option<(f32, Vec2)> {
    let (entry, normal) = if x.entry >= y.entry {
        (x.entry, Vec2::new(x.sign, 0.0))
    } else {
        (y.entry, Vec2::new(0.0, y.sign))
    };
    let exit = x.exit.min(y.exit);
    if entry > exit {
        return None;
    }
    Some((entry, normal))
}

/// Axis of least penetration for two overlapping boxes, pointing from B into A.
fn overlap_normal(delta: Vec2, penetration: Vec2) -> Vec2 {
    let sign = |v: f32| if v >= 0.0 { 1.0 } else { -1.0 };
    if penetration.x <= penetration.y {
        Vec2::new(sign(delta.x), 0.0)
    } else {
        Vec2::new(0.0, sign(delta.y))
    }
}

/// Report an already-overlapping pair at `t = 0` only while it is still closing.
fn immediate_if_closing(normal: Vec2, vrel: Vec2) -> Option<Contact> {
    if vrel.dot(normal) < -VELOCITY_EPSILON {
        Some(Contact { time: 0.0, normal })
    } else {
        None
    }
}

/// Extent of `vertices`, shifted by `offset`, along the unit `axis`.
fn project(vertices: &[Vec2], offset: Vec2, axis: Vec2) -> (f32, f32) {
    vertices.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
        let d = (v + offset).unit_scalar_project(axis);
        (lo.min(d), hi.max(d))
    })
}

fn closest_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let e = b - a;
    let t = ((p - a).dot(e) / e.length_squared()).clamp(0.0, 1.0);
    a + e * t
}

impl Narrowphase {
    /// Earliest `t >= 0` at which `origin + dir * t` enters the circle, if any.
    ///
    /// A ray starting on the circle and heading outward, or starting inside it, never enters:
    /// callers deal with overlap before sweeping.
    fn ray_circle(origin: Vec2, dir: Vec2, center: Vec2, r: f32) -> Option<f32> {
        // Solve ||origin + t*dir - center||^2 = r^2 for t >= 0
        let m = origin - center;
        let a = dir.length_squared();
        if a == 0.0 {
            return None;
        }
        let b = 2.0 * m.dot(dir);
        let c = m.length_squared() - r * r;
        let disc = b * b - 4.0 * a * c;
        if disc < 0.0 {
            return None;
        }
        let t0 = (-b - disc.sqrt()) / (2.0 * a);
        if t0 < 0.0 {
            return None;
        }
        Some(t0)
    }
}

impl NarrowphaseApi for Narrowphase {
    fn sweep_aabb_aabb(
        c0: Vec2,
        h0: Vec2,
        v0: Vec2,
        c1: Vec2,
        h1: Vec2,
        v1: Vec2,
        max_time: f32,
    ) -> Option<Contact> {
        let vrel = v0 - v1;
        let (a_min, a_max) = (c0 - h0, c0 + h0);
        let (b_min, b_max) = (c1 - h1, c1 + h1);

        let x = sweep_axis(a_min.x, a_max.x, b_min.x, b_max.x, vrel.x)?;
        let y = sweep_axis(a_min.y, a_max.y, b_min.y, b_max.y, vrel.y)?;

        if x.entry == f32::NEG_INFINITY && y.entry == f32::NEG_INFINITY {
            let delta = c0 - c1;
            let penetration = (h0 + h1) - delta.abs();
            return immediate_if_closing(overlap_normal(delta, penetration), vrel);
        }

        let (entry, normal) = combine_axes(x, y)?;
        if entry > max_time {
            return None;
        }
        Some(Contact { time: entry.max(0.0), normal })
    }

    fn sweep_circle_circle(
        c0: Vec2,
        r0: f32,
        v0: Vec2,
        c1: Vec2,
        r1: f32,
        v1: Vec2,
        max_time: f32,
    ) -> Option<Contact> {
        let d = c0 - c1;
        let vrel = v0 - v1;
        let rsum = r0 + r1;
        let dist2 = d.length_squared();

        if dist2 < rsum * rsum {
            // Coincident centers: fall back to the direction of travel.
            let normal = if dist2 > 0.0 {
                d / dist2.sqrt()
            } else if vrel.length_squared() > 0.0 {
                -vrel.normalize()
            } else {
                return None;
            };
            return immediate_if_closing(normal, vrel);
        }

        if vrel.length_squared() <= VELOCITY_EPSILON * VELOCITY_EPSILON {
            return None;
        }
        // The path of `d` never comes within `rsum` of the other center.
        if Vec2::ZERO.dist_to_line_squared(d, d + vrel) > rsum * rsum {
            return None;
        }
        let t = Self::ray_circle(d, vrel, Vec2::ZERO, rsum)?;
        if t > max_time {
            return None;
        }
        let normal = (d + vrel * t) / rsum;
        Some(Contact { time: t, normal })
    }

    fn sweep_circle_aabb(
        c: Vec2,
        r: f32,
        v: Vec2,
        box_c: Vec2,
        box_h: Vec2,
        box_v: Vec2,
        max_time: f32,
    ) -> Option<Contact> {
        // Work in the box frame: the circle center is `p`, moving at `vrel`.
        let p = c - box_c;
        let vrel = v - box_v;

        let closest = p.clamp(-box_h, box_h);
        let delta = p - closest;
        let dist2 = delta.length_squared();
        if dist2 < r * r {
            let normal = if dist2 > 0.0 {
                delta / dist2.sqrt()
            } else {
                overlap_normal(p, box_h - p.abs())
            };
            return immediate_if_closing(normal, vrel);
        }

        let rv = Vec2::splat(r);
        let x = sweep_axis(p.x - rv.x, p.x + rv.x, -box_h.x, box_h.x, vrel.x)?;
        let y = sweep_axis(p.y - rv.y, p.y + rv.y, -box_h.y, box_h.y, vrel.y)?;
        let (entry, normal) = combine_axes(x, y)?;
        let entry = entry.max(0.0);
        if entry > max_time {
            return None;
        }

        // Entering the expanded box through a corner square: the true shape there is the
        // rounded corner, so re-test against the corner circle.
        let q = p + vrel * entry;
        if q.x.abs() > box_h.x && q.y.abs() > box_h.y {
            let corner = Vec2::new(box_h.x.copysign(q.x), box_h.y.copysign(q.y));
            let t = Self::ray_circle(p, vrel, corner, r)?;
            if t > max_time {
                return None;
            }
            let normal = (p + vrel * t - corner) / r;
            return Some(Contact { time: t, normal });
        }
        Some(Contact { time: entry, normal })
    }

    fn sweep_polygon_polygon(
        c0: Vec2,
        p0: &ConvexPolygon,
        v0: Vec2,
        c1: Vec2,
        p1: &ConvexPolygon,
        v1: Vec2,
        max_time: f32,
    ) -> Option<Contact> {
        // Slab test along every edge normal of both polygons, in the frame of the second.
        let vrel = v0 - v1;
        let offset = c0 - c1;
        let mut entry = f32::NEG_INFINITY;
        let mut entry_normal = Vec2::ZERO;
        let mut exit = f32::INFINITY;
        let mut shallowest = (f32::INFINITY, Vec2::ZERO);

        for &axis in p0.normals().iter().chain(p1.normals()) {
            let (a_min, a_max) = project(p0.vertices(), offset, axis);
            let (b_min, b_max) = project(p1.vertices(), Vec2::ZERO, axis);
            let sweep = sweep_axis(a_min, a_max, b_min, b_max, vrel.unit_scalar_project(axis))?;
            if sweep.entry > entry {
                entry = sweep.entry;
                entry_normal = axis * sweep.sign;
            }
            exit = exit.min(sweep.exit);

            let (push_up, push_down) = (b_max - a_min, a_max - b_min);
            let (depth, normal) = if push_up <= push_down { (push_up, axis) } else { (push_down, -axis) };
            if depth < shallowest.0 {
                shallowest = (depth, normal);
            }
        }

        if entry == f32::NEG_INFINITY {
            return immediate_if_closing(shallowest.1, vrel);
        }
        if entry > exit || entry > max_time {
            return None;
        }
        Some(Contact { time: entry, normal: entry_normal })
    }

    fn sweep_circle_polygon(
        c: Vec2,
        r: f32,
        v: Vec2,
        poly_c: Vec2,
        poly: &ConvexPolygon,
        poly_v: Vec2,
        max_time: f32,
    ) -> Option<Contact> {
        let p = c - poly_c;
        let vrel = v - poly_v;
        let normals = poly.normals();

        // Largest signed distance to an edge line; not positive means the center is inside.
        let (face, separation) = (0..normals.len())
            .map(|i| {
                let (a, b) = poly.edge(i);
                (i, p.signed_dist_to_line(b, a))
            })
            .fold((0, f32::NEG_INFINITY), |best, cur| if cur.1 > best.1 { cur } else { best });
        if separation <= 0.0 {
            return immediate_if_closing(normals[face], vrel);
        }

        let (closest, dist2) = (0..normals.len())
            .map(|i| {
                let (a, b) = poly.edge(i);
                let q = closest_on_segment(p, a, b);
                (q, (p - q).length_squared())
            })
            .fold((Vec2::ZERO, f32::INFINITY), |best, cur| if cur.1 < best.1 { cur } else { best });
        if dist2 < r * r {
            return immediate_if_closing((p - closest) / dist2.sqrt(), vrel);
        }

        if vrel.length_squared() <= VELOCITY_EPSILON * VELOCITY_EPSILON {
            return None;
        }

        // The swept circle against the polygon grown by `r`: offset edges, then rounded corners.
        let mut best: Option<Contact> = None;
        let mut keep = |time: f32, normal: Vec2| {
            if time <= max_time && best.is_none_or(|c| time < c.time) {
                best = Some(Contact { time, normal });
            }
        };
        for (i, &normal) in normals.iter().enumerate() {
            let (a, b) = poly.edge(i);
            let closing = vrel.dot(normal);
            if closing < -VELOCITY_EPSILON {
                let t = (r - (p - a).dot(normal)) / closing;
                let touch = p + vrel * t - normal * r;
                let e = b - a;
                let along = (touch - a).dot(e) / e.length_squared();
                if t >= 0.0 && (0.0..=1.0).contains(&along) {
                    keep(t, normal);
                }
            }
            if r > 0.0 {
                if let Some(t) = Self::ray_circle(p, vrel, a, r) {
                    keep(t, (p + vrel * t - a) / r);
                }
            }
        }
        best
    }
}
