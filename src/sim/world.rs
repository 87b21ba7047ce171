//! World: body ownership, event scheduling and exact time advancement
//!
//! The world owns every [`Body`] plus gravity and the arena bounds, and it
//! caches the single earliest future collision. `advance` integrates all
//! bodies analytically up to that event, applies the response, reschedules,
//! and repeats until the requested time is exhausted. There is no fixed
//! internal timestep; state lands exactly on each contact instant.
//!
//! The world is single-threaded and synchronous. Callers serialize all
//! mutation (one dedicated simulation thread, or an external mutex); the
//! periodic tick that drives `advance` lives outside this crate.

use std::fmt;
use std::ops::Range;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::collision::{self, CollisionEvent};
use crate::error::SimError;
use crate::vector::Vector;

/// Placement attempts per body in [`World::add_random_bodies`] before the
/// generator gives up with `PlacementExhausted`
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 128;

/// One body as seen by the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodySnapshot {
    /// Insertion index of the body; stable, bodies are never removed
    pub id: usize,
    pub position: Vector,
    pub radius: f64,
}

/// Read-only view of the world at one instant, safe to hand across the
/// presentation boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub absolute_time: f64,
    pub bodies: Vec<BodySnapshot>,
}

/// Owner of all bodies, gravity and arena bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    gravity: Vector,
    lower_bounds: Vector,
    upper_bounds: Vector,
    bodies: Vec<Body>,
    absolute_time: f64,
    /// Earliest future event given the current state; recomputed on every
    /// structural change and after each applied event
    next_event: Option<CollisionEvent>,
}

impl World {
    /// Fails with `DimensionMismatch` unless gravity and both bounds share
    /// one order
    pub fn new(
        gravity: Vector,
        lower_bounds: Vector,
        upper_bounds: Vector,
    ) -> Result<Self, SimError> {
        if gravity.order() != lower_bounds.order() {
            return Err(SimError::DimensionMismatch {
                expected: gravity.order(),
                actual: lower_bounds.order(),
            });
        }
        if gravity.order() != upper_bounds.order() {
            return Err(SimError::DimensionMismatch {
                expected: gravity.order(),
                actual: upper_bounds.order(),
            });
        }
        Ok(Self {
            gravity,
            lower_bounds,
            upper_bounds,
            bodies: Vec::new(),
            absolute_time: 0.0,
            next_event: None,
        })
    }

    /// Vector order shared by gravity, bounds and every body
    #[inline]
    pub fn order(&self) -> usize {
        self.gravity.order()
    }

    pub fn gravity(&self) -> &Vector {
        &self.gravity
    }

    pub fn lower_bounds(&self) -> &Vector {
        &self.lower_bounds
    }

    pub fn upper_bounds(&self) -> &Vector {
        &self.upper_bounds
    }

    pub fn absolute_time(&self) -> f64 {
        self.absolute_time
    }

    /// Read-only view of all bodies, in insertion order
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// The cached next event, if any (time relative to `absolute_time`)
    pub fn next_event(&self) -> Option<&CollisionEvent> {
        self.next_event.as_ref()
    }

    /// Insert a body and reschedule
    ///
    /// Fails with `DimensionMismatch` (and inserts nothing) if the body's
    /// order disagrees with the world's. Returns the body's id, its
    /// insertion index.
    pub fn add_body(&mut self, body: Body) -> Result<usize, SimError> {
        if body.order() != self.order() {
            return Err(SimError::DimensionMismatch {
                expected: self.order(),
                actual: body.order(),
            });
        }
        let id = self.bodies.len();
        self.bodies.push(body);
        log::debug!("body {id} added, rescheduling");
        self.recompute_next_event()?;
        Ok(id)
    }

    /// Replace gravity and reschedule
    pub fn set_gravity(&mut self, gravity: Vector) -> Result<(), SimError> {
        if gravity.order() != self.order() {
            return Err(SimError::DimensionMismatch {
                expected: self.order(),
                actual: gravity.order(),
            });
        }
        self.gravity = gravity;
        self.recompute_next_event()
    }

    /// Generate `count` non-overlapping random bodies
    ///
    /// Radius is drawn uniformly from `radius_range`, each velocity
    /// component uniformly from `speed_range`, position per axis so the
    /// whole body fits inside the bounds, and mass follows the `radius²`
    /// convention. A candidate placement is rejected when its center is
    /// closer to an existing body than the two radii allow; after
    /// [`MAX_PLACEMENT_ATTEMPTS`] rejections the call fails with
    /// `PlacementExhausted` and inserts nothing, including bodies staged
    /// earlier in the same call.
    pub fn add_random_bodies(
        &mut self,
        count: usize,
        radius_range: Range<f64>,
        speed_range: Range<f64>,
        rng: &mut impl Rng,
    ) -> Result<(), SimError> {
        let order = self.order();
        let mut staged: Vec<Body> = Vec::with_capacity(count);

        for _ in 0..count {
            let radius = rng.random_range(radius_range.clone());
            let mass = radius * radius;

            let fits = (0..order)
                .all(|n| self.lower_bounds[n] + radius < self.upper_bounds[n] - radius);
            if !fits {
                return Err(SimError::PlacementExhausted { attempts: 0 });
            }

            let mut velocity = Vector::zeros(order);
            for n in 0..order {
                velocity[n] = rng.random_range(speed_range.clone());
            }

            let mut placed = None;
            for _ in 0..MAX_PLACEMENT_ATTEMPTS {
                let mut position = Vector::zeros(order);
                for n in 0..order {
                    position[n] = rng.random_range(
                        (self.lower_bounds[n] + radius)..(self.upper_bounds[n] - radius),
                    );
                }

                let overlaps = self.bodies.iter().chain(staged.iter()).any(|other| {
                    let clearance = other.radius + radius;
                    let dist_sq: f64 = other
                        .position
                        .comps()
                        .iter()
                        .zip(position.comps())
                        .map(|(a, b)| (a - b) * (a - b))
                        .sum();
                    dist_sq < clearance * clearance
                });

                if !overlaps {
                    placed = Some(position);
                    break;
                }
            }

            match placed {
                Some(position) => staged.push(Body {
                    mass,
                    radius,
                    position,
                    velocity,
                }),
                None => {
                    return Err(SimError::PlacementExhausted {
                        attempts: MAX_PLACEMENT_ATTEMPTS,
                    });
                }
            }
        }

        self.bodies.append(&mut staged);
        log::debug!("placed {count} random bodies ({} total)", self.bodies.len());
        self.recompute_next_event()
    }

    /// Advance the simulation by exactly `delta_t` seconds
    ///
    /// Processes every scheduled event that falls inside the budget: the
    /// world integrates analytically up to the event instant, applies the
    /// response, reschedules, and continues with whatever time is left.
    /// When the budget ends short of the next event, the cached event's time
    /// is shifted down so it stays relative to the new absolute time.
    pub fn advance(&mut self, delta_t: f64) -> Result<(), SimError> {
        if delta_t < 0.0 {
            return Err(SimError::NegativeTimeStep(delta_t));
        }

        let mut remaining = delta_t;

        while let Some(event) = self.next_event {
            if event.delta_t() > remaining {
                break;
            }

            let step = event.delta_t();
            self.integrate(step)?;
            remaining -= step;

            log::trace!("event at t = {}: {event:?}", self.absolute_time);
            self.apply_event(event)?;
            self.recompute_next_event()?;
        }

        self.integrate(remaining)?;

        if let Some(event) = &mut self.next_event {
            event.shift(remaining);
        }

        Ok(())
    }

    /// Snapshot for the presentation layer: absolute time plus id, position
    /// and radius per body, all by value
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            absolute_time: self.absolute_time,
            bodies: self
                .bodies
                .iter()
                .enumerate()
                .map(|(id, body)| BodySnapshot {
                    id,
                    position: body.position.clone(),
                    radius: body.radius,
                })
                .collect(),
        }
    }

    /// Closed-form kinematics for every body over `delta_t`, ignoring
    /// collisions: `p' = p + v·Δt + ½·g·Δt²`, `v' = v + g·Δt`
    fn integrate(&mut self, delta_t: f64) -> Result<(), SimError> {
        let half_g_t2 = self.gravity.scaled(delta_t * delta_t / 2.0);
        let g_dt = self.gravity.scaled(delta_t);

        for body in &mut self.bodies {
            let v_dt = body.velocity.scaled(delta_t);
            body.position.add_in_place(&v_dt)?;
            body.position.add_in_place(&half_g_t2)?;
            body.velocity.add_in_place(&g_dt)?;
        }

        self.absolute_time += delta_t;
        Ok(())
    }

    fn apply_event(&mut self, event: CollisionEvent) -> Result<(), SimError> {
        match event {
            CollisionEvent::BodyBody { first, second, .. } => {
                // first < second by construction of the recompute loop.
                let (head, tail) = self.bodies.split_at_mut(second);
                collision::apply_elastic_collision(&mut head[first], &mut tail[0])?;
            }
            CollisionEvent::BodyWall { body, axis, .. } => {
                collision::apply_wall_reflection(&mut self.bodies[body], axis);
            }
        }
        Ok(())
    }

    /// Full rescan of every unordered body pair and every body's wall
    /// candidate; O(n²), no spatial partitioning
    ///
    /// Ties on the minimum time resolve to the first candidate found, in
    /// insertion order: for each body i, pairs (i, j > i) come before body
    /// i's own wall candidate.
    fn recompute_next_event(&mut self) -> Result<(), SimError> {
        let mut best: Option<CollisionEvent> = None;

        for i in 0..self.bodies.len() {
            for j in (i + 1)..self.bodies.len() {
                if let Some(event) =
                    collision::check_pair_collision(i, j, &self.bodies[i], &self.bodies[j])?
                    && best.is_none_or(|b| event.delta_t() < b.delta_t())
                {
                    best = Some(event);
                }
            }

            if let Some(event) = collision::check_wall_collision(
                i,
                &self.bodies[i],
                &self.lower_bounds,
                &self.upper_bounds,
                &self.gravity,
            ) && best.is_none_or(|b| event.delta_t() < b.delta_t())
            {
                best = Some(event);
            }
        }

        self.next_event = best;
        Ok(())
    }
}

impl fmt::Display for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Time: {}", self.absolute_time)?;
        for (id, body) in self.bodies.iter().enumerate() {
            writeln!(f, "Body {id}: {body}")?;
        }
        Ok(())
    }
}
