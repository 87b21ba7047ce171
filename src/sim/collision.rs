//! Exact collision prediction and response
//!
//! The analytic core of the engine. Every body feels the same uniform
//! gravity, so the relative acceleration between any two bodies is zero and
//! the squared inter-center distance is an exact quadratic in time. Wall
//! contact along one axis is likewise quadratic (or linear when gravity has
//! no component on that axis). Collision times therefore come from
//! closed-form root solving rather than fixed-step overlap probing.

use serde::{Deserialize, Serialize};

use super::body::Body;
use crate::error::SimError;
use crate::vector::Vector;

/// Minimum strictly-positive time for a predicted contact to count as lying
/// in the future. A root at or below this threshold is a contact that was
/// just resolved, left over as floating-point residue; selecting it again
/// would wedge the scheduler on the same event forever.
pub const DOUBLE_THRESHOLD: f64 = 1e-12;

/// A predicted future contact, with time relative to the world's current
/// absolute time
///
/// Bodies are identified by insertion index; the world never removes bodies,
/// so indices are stable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CollisionEvent {
    /// Two bodies touch
    BodyBody {
        first: usize,
        second: usize,
        delta_t: f64,
    },
    /// One body reaches the lower or upper wall on the given axis
    BodyWall {
        body: usize,
        axis: usize,
        delta_t: f64,
    },
}

impl CollisionEvent {
    /// Time to this contact from the current absolute time
    pub fn delta_t(&self) -> f64 {
        match *self {
            CollisionEvent::BodyBody { delta_t, .. } => delta_t,
            CollisionEvent::BodyWall { delta_t, .. } => delta_t,
        }
    }

    /// Re-base the stored time after the world consumed `elapsed` seconds
    /// without reaching this event
    pub(crate) fn shift(&mut self, elapsed: f64) {
        match self {
            CollisionEvent::BodyBody { delta_t, .. } => *delta_t -= elapsed,
            CollisionEvent::BodyWall { delta_t, .. } => *delta_t -= elapsed,
        }
    }
}

/// Smallest solution of `a·x² + b·x + c = 0` that lies strictly in the
/// future
///
/// Policy, in order:
/// - non-positive discriminant: no solution;
/// - both roots above the threshold: the smaller one;
/// - exactly one root above the threshold: that one, however close the
///   other sits to zero;
/// - otherwise none.
///
/// A root at or below [`DOUBLE_THRESHOLD`] is "the collision we just did"
/// and is never selected. NaN comparisons are false, so the degenerate
/// `a == 0` case falls through to `None` on its own.
pub fn least_positive_solution(a: f64, b: f64, c: f64) -> Option<f64> {
    let discriminant = b * b - 4.0 * a * c;
    if discriminant <= 0.0 {
        return None;
    }

    let sqrt_d = discriminant.sqrt();
    let x1 = (-b + sqrt_d) / (2.0 * a);
    let x2 = (-b - sqrt_d) / (2.0 * a);

    if x1 > DOUBLE_THRESHOLD && x2 > DOUBLE_THRESHOLD {
        Some(x1.min(x2))
    } else if x1 > DOUBLE_THRESHOLD && x2 <= DOUBLE_THRESHOLD {
        Some(x1)
    } else if x2 > DOUBLE_THRESHOLD && x1 <= DOUBLE_THRESHOLD {
        Some(x2)
    } else {
        None
    }
}

/// Predict the next contact between two bodies
///
/// Contact happens when the centers are exactly the radius sum apart:
/// `|Δv|²·t² + 2·(Δv·Δp)·t + (|Δp|² − R²) = 0`. Returns `None` when no
/// valid future root exists, which includes the no-relative-motion case
/// (`Δv = 0`).
pub fn check_pair_collision(
    first: usize,
    second: usize,
    b1: &Body,
    b2: &Body,
) -> Result<Option<CollisionEvent>, SimError> {
    let delta_p = b1.position.sub(&b2.position)?;
    let delta_v = b1.velocity.sub(&b2.velocity)?;

    let v_dot_v = delta_v.dot(&delta_v)?;
    let v_dot_p = delta_v.dot(&delta_p)?;
    let p_dot_p = delta_p.dot(&delta_p)?;

    let radius_sum = b1.radius + b2.radius;

    let t = least_positive_solution(v_dot_v, 2.0 * v_dot_p, p_dot_p - radius_sum * radius_sum);

    Ok(t.map(|delta_t| CollisionEvent::BodyBody {
        first,
        second,
        delta_t,
    }))
}

/// Predict the next wall contact for one body, across all axes
///
/// Each axis is solved independently. With gravity on the axis the contact
/// time is a root of `½·a·t² + v·t + (p − bound ∓ r) = 0`; without gravity
/// it is a linear crossing, or nothing at all when the body is at rest on
/// that axis. The soonest valid candidate across axes wins.
///
/// The orders of `body`, both bounds and `gravity` must agree; the world
/// guarantees this for every body it owns.
pub fn check_wall_collision(
    id: usize,
    body: &Body,
    lower_bounds: &Vector,
    upper_bounds: &Vector,
    gravity: &Vector,
) -> Option<CollisionEvent> {
    let r = body.radius;
    let mut best: Option<CollisionEvent> = None;

    for axis in 0..lower_bounds.order() {
        let a = gravity[axis];
        let v = body.velocity[axis];
        let p = body.position[axis];

        let lower = lower_bounds[axis];
        let upper = upper_bounds[axis];

        let (lower_t, upper_t) = if a != 0.0 {
            // Accelerating on this axis: quadratic contact time against each
            // bound. The body touches the lower wall at p(t) = lower + r and
            // the upper wall at p(t) = upper − r.
            (
                least_positive_solution(0.5 * a, v, p - lower - r),
                least_positive_solution(0.5 * a, v, p - upper + r),
            )
        } else if v == 0.0 {
            // No acceleration and no velocity: this axis never reaches a wall.
            (None, None)
        } else {
            // Linear drift: v·t + p = bound ± r.
            (Some((lower + r - p) / v), Some((upper - r - p) / v))
        };

        let t = match (lower_t, upper_t) {
            (Some(lo), None) if lo > DOUBLE_THRESHOLD => Some(lo),
            (None, Some(up)) if up > DOUBLE_THRESHOLD => Some(up),
            (Some(lo), Some(up)) => {
                if lo > DOUBLE_THRESHOLD && up > DOUBLE_THRESHOLD {
                    Some(lo.min(up))
                } else if lo > DOUBLE_THRESHOLD {
                    Some(lo)
                } else if up > DOUBLE_THRESHOLD {
                    Some(up)
                } else {
                    None
                }
            }
            _ => None,
        };

        if let Some(delta_t) = t
            && best.is_none_or(|b| delta_t < b.delta_t())
        {
            best = Some(CollisionEvent::BodyWall {
                body: id,
                axis,
                delta_t,
            });
        }
    }

    best
}

/// Elastic collision response between two touching bodies
///
/// Decomposes each velocity into the component along the line of centers
/// and the orthogonal remainder, applies the 1-D elastic exchange along the
/// normal, and reassembles. Tangential motion is untouched; momentum and
/// kinetic energy are conserved up to floating error.
///
/// Does not check that a contact actually occurred. Coincident centers make
/// the normal a NaN vector, which propagates per the caller contract.
pub fn apply_elastic_collision(b1: &mut Body, b2: &mut Body) -> Result<(), SimError> {
    let m1 = b1.mass;
    let m2 = b2.mass;

    // Basis for the whole calculation: the unit position vector from b1
    // toward b2, the contact normal.
    let p_hat = b2.position.sub(&b1.position)?.unit();

    // Scalar velocities along the normal.
    let v1_init = b1.velocity.dot(&p_hat)?;
    let v2_init = b2.velocity.dot(&p_hat)?;

    // Components parallel to the contact surface, unchanged by the collision.
    let b1_par = b1.velocity.sub(&p_hat.scaled(v1_init))?;
    let b2_par = b2.velocity.sub(&p_hat.scaled(v2_init))?;

    // 1-D elastic exchange along the normal.
    let v1_final = (v1_init * (m1 - m2) + 2.0 * m2 * v2_init) / (m1 + m2);
    let v2_final = (v2_init * (m2 - m1) + 2.0 * m1 * v1_init) / (m1 + m2);

    b1.velocity = b1_par.add(&p_hat.scaled(v1_final))?;
    b2.velocity = b2_par.add(&p_hat.scaled(v2_final))?;

    Ok(())
}

/// Wall reflection: negate the velocity component on `axis`, leave every
/// other component untouched
pub fn apply_wall_reflection(body: &mut Body, axis: usize) {
    body.velocity[axis] = -body.velocity[axis];
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn body(mass: f64, radius: f64, pos: [f64; 2], vel: [f64; 2]) -> Body {
        Body::new(mass, radius, Vector::new(pos.to_vec()), Vector::new(vel.to_vec())).unwrap()
    }

    #[test]
    fn least_positive_picks_the_positive_root() {
        // x² − 4 = 0, roots ±2
        assert_eq!(least_positive_solution(1.0, 0.0, -4.0), Some(2.0));
    }

    #[test]
    fn least_positive_none_for_negative_discriminant() {
        // x² + 4 = 0
        assert_eq!(least_positive_solution(1.0, 0.0, 4.0), None);
    }

    #[test]
    fn least_positive_picks_smaller_of_two_future_roots() {
        // (x − 1)(x − 3) = x² − 4x + 3
        let t = least_positive_solution(1.0, -4.0, 3.0).unwrap();
        assert_relative_eq!(t, 1.0, max_relative = 1e-12);
    }

    #[test]
    fn least_positive_none_when_both_roots_past() {
        // (x + 1)(x + 3) = x² + 4x + 3
        assert_eq!(least_positive_solution(1.0, 4.0, 3.0), None);
    }

    #[test]
    fn least_positive_none_for_degenerate_linear() {
        // a = 0 with b ≠ 0: division by zero yields NaN/inf roots, which the
        // branch structure rejects.
        assert_eq!(least_positive_solution(0.0, 1.0, -1.0), None);
        assert_eq!(least_positive_solution(0.0, -1.0, 1.0), None);
    }

    #[test]
    fn head_on_pair_collides_at_expected_time() {
        // Separation 5, approach speed 2, contact at center distance 2.
        let b1 = body(1.0, 1.0, [0.0, 0.0], [1.0, 0.0]);
        let b2 = body(1.0, 1.0, [5.0, 0.0], [-1.0, 0.0]);

        let event = check_pair_collision(0, 1, &b1, &b2).unwrap().unwrap();
        assert_relative_eq!(event.delta_t(), 1.5, max_relative = 1e-12);
    }

    #[test]
    fn pair_with_no_relative_motion_never_collides() {
        let b1 = body(1.0, 1.0, [0.0, 0.0], [3.0, -2.0]);
        let b2 = body(1.0, 1.0, [10.0, 0.0], [3.0, -2.0]);

        assert_eq!(check_pair_collision(0, 1, &b1, &b2).unwrap(), None);
    }

    #[test]
    fn separating_pair_never_collides() {
        let b1 = body(1.0, 1.0, [0.0, 0.0], [-1.0, 0.0]);
        let b2 = body(1.0, 1.0, [5.0, 0.0], [1.0, 0.0]);

        assert_eq!(check_pair_collision(0, 1, &b1, &b2).unwrap(), None);
    }

    #[test]
    fn wall_collision_linear_case() {
        // Ball at x = 5 moving right at 3 toward wall at x = 10, r = 1:
        // contact at x = 9 after (9 − 5) / 3 seconds.
        let b = body(1.0, 1.0, [5.0, 5.0], [3.0, 0.0]);
        let lower = Vector::new([0.0, 0.0]);
        let upper = Vector::new([10.0, 10.0]);
        let gravity = Vector::zeros(2);

        let event = check_wall_collision(0, &b, &lower, &upper, &gravity).unwrap();
        match event {
            CollisionEvent::BodyWall {
                body: id,
                axis,
                delta_t,
            } => {
                assert_eq!(id, 0);
                assert_eq!(axis, 0);
                assert_relative_eq!(delta_t, 4.0 / 3.0, max_relative = 1e-12);
            }
            other => panic!("expected wall event, got {other:?}"),
        }
    }

    #[test]
    fn wall_collision_under_gravity() {
        // Dropped from rest at y = 5 with g = −10 on y, floor at 0, r = 1:
        // 5 − 5t² = 1  →  t = √0.8.
        let b = body(1.0, 1.0, [5.0, 5.0], [0.0, 0.0]);
        let lower = Vector::new([0.0, 0.0]);
        let upper = Vector::new([10.0, 10.0]);
        let gravity = Vector::new([0.0, -10.0]);

        let event = check_wall_collision(0, &b, &lower, &upper, &gravity).unwrap();
        match event {
            CollisionEvent::BodyWall { axis, delta_t, .. } => {
                assert_eq!(axis, 1);
                assert_relative_eq!(delta_t, 0.8f64.sqrt(), max_relative = 1e-12);
            }
            other => panic!("expected wall event, got {other:?}"),
        }
    }

    #[test]
    fn stationary_body_without_gravity_never_hits_walls() {
        let b = body(1.0, 1.0, [5.0, 5.0], [0.0, 0.0]);
        let lower = Vector::new([0.0, 0.0]);
        let upper = Vector::new([10.0, 10.0]);
        let gravity = Vector::zeros(2);

        assert_eq!(check_wall_collision(0, &b, &lower, &upper, &gravity), None);
    }

    #[test]
    fn wall_picks_soonest_axis() {
        // Faster toward the y wall than the x wall.
        let b = body(1.0, 1.0, [5.0, 5.0], [1.0, 4.0]);
        let lower = Vector::new([0.0, 0.0]);
        let upper = Vector::new([10.0, 10.0]);
        let gravity = Vector::zeros(2);

        let event = check_wall_collision(0, &b, &lower, &upper, &gravity).unwrap();
        match event {
            CollisionEvent::BodyWall { axis, delta_t, .. } => {
                assert_eq!(axis, 1);
                assert_relative_eq!(delta_t, 1.0, max_relative = 1e-12);
            }
            other => panic!("expected wall event, got {other:?}"),
        }
    }

    #[test]
    fn equal_mass_head_on_swaps_velocities() {
        let mut b1 = body(1.0, 1.0, [0.0, 0.0], [1.0, 0.0]);
        let mut b2 = body(1.0, 1.0, [2.0, 0.0], [-1.0, 0.0]);

        apply_elastic_collision(&mut b1, &mut b2).unwrap();

        assert_relative_eq!(b1.velocity[0], -1.0, max_relative = 1e-12);
        assert_relative_eq!(b1.velocity[1], 0.0);
        assert_relative_eq!(b2.velocity[0], 1.0, max_relative = 1e-12);
        assert_relative_eq!(b2.velocity[1], 0.0);
    }

    #[test]
    fn glancing_collision_leaves_tangential_motion_alone() {
        // Contact normal is x; the y components must come through untouched.
        let mut b1 = body(1.0, 1.0, [0.0, 0.0], [1.0, 2.0]);
        let mut b2 = body(1.0, 1.0, [2.0, 0.0], [-1.0, -3.0]);

        apply_elastic_collision(&mut b1, &mut b2).unwrap();

        assert_relative_eq!(b1.velocity[1], 2.0);
        assert_relative_eq!(b2.velocity[1], -3.0);
    }

    #[test]
    fn wall_reflection_negates_exactly_one_axis() {
        let mut b = body(1.0, 1.0, [5.0, 5.0], [3.0, -2.5]);
        apply_wall_reflection(&mut b, 0);
        assert_eq!(b.velocity[0], -3.0);
        assert_eq!(b.velocity[1], -2.5);
    }

    proptest! {
        #[test]
        fn elastic_collision_conserves_momentum_and_energy(
            m1 in 0.1f64..10.0,
            m2 in 0.1f64..10.0,
            p1 in prop::array::uniform2(-100.0f64..100.0),
            p2 in prop::array::uniform2(-100.0f64..100.0),
            v1 in prop::array::uniform2(-50.0f64..50.0),
            v2 in prop::array::uniform2(-50.0f64..50.0),
        ) {
            // Coincident centers have no defined normal.
            prop_assume!((p1[0] - p2[0]).abs() + (p1[1] - p2[1]).abs() > 1e-3);

            let mut b1 = body(m1, 1.0, p1, v1);
            let mut b2 = body(m2, 1.0, p2, v2);

            let momentum_before = b1.velocity.scaled(m1).add(&b2.velocity.scaled(m2)).unwrap();
            let energy_before = 0.5 * m1 * b1.velocity.squared_magnitude()
                + 0.5 * m2 * b2.velocity.squared_magnitude();

            apply_elastic_collision(&mut b1, &mut b2).unwrap();

            let momentum_after = b1.velocity.scaled(m1).add(&b2.velocity.scaled(m2)).unwrap();
            let energy_after = 0.5 * m1 * b1.velocity.squared_magnitude()
                + 0.5 * m2 * b2.velocity.squared_magnitude();

            let momentum_scale = momentum_before.magnitude().max(1.0);
            prop_assert!(
                momentum_after.sub(&momentum_before).unwrap().magnitude() <= 1e-9 * momentum_scale
            );
            prop_assert!((energy_after - energy_before).abs() <= 1e-9 * energy_before.max(1.0));
        }
    }
}
