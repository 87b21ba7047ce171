//! Event-driven simulation core
//!
//! Pure and deterministic: no rendering, no platform dependencies, no
//! internal tick. An external driver owns the cadence (typically a periodic
//! call to [`World::advance`]) and serializes all mutation; stopping the
//! simulation simply means not calling `advance` again.

pub mod body;
pub mod collision;
pub mod world;

pub use body::Body;
pub use collision::{
    CollisionEvent, DOUBLE_THRESHOLD, apply_elastic_collision, apply_wall_reflection,
    check_pair_collision, check_wall_collision, least_positive_solution,
};
pub use world::{BodySnapshot, MAX_PLACEMENT_ATTEMPTS, World, WorldSnapshot};
