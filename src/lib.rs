//! Carom - event-driven elastic collision simulation
//!
//! Circular rigid bodies move under a uniform acceleration field inside a
//! bounded rectangular arena. Instead of stepping on a fixed grid and
//! probing for overlap, the engine predicts the exact time of the next
//! contact (body/body or body/wall) by closed-form root solving, advances
//! every body analytically to that instant, applies the elastic response,
//! and reschedules.
//!
//! Core modules:
//! - `vector`: runtime-order f64 vector algebra
//! - `sim::body`: pure physical state (mass, radius, position, velocity)
//! - `sim::collision`: exact collision-time prediction and response
//! - `sim::world`: body ownership, scheduling and time advancement
//!
//! The crate is a library only. Rendering, user controls and the periodic
//! tick that drives [`World::advance`] belong to the embedding application,
//! as does logger setup (`log` is used as a facade throughout).
//!
//! ```
//! use carom::{Body, Vector, World};
//!
//! let mut world = World::new(
//!     Vector::new([0.0, -9.8]),
//!     Vector::new([0.0, 0.0]),
//!     Vector::new([700.0, 650.0]),
//! )?;
//! world.add_body(Body::new(
//!     4.0,
//!     2.0,
//!     Vector::new([100.0, 300.0]),
//!     Vector::new([25.0, 0.0]),
//! )?)?;
//!
//! world.advance(1.0 / 25.0)?;
//! let frame = world.snapshot();
//! assert_eq!(frame.bodies.len(), 1);
//! # Ok::<(), carom::SimError>(())
//! ```

pub mod error;
pub mod sim;
pub mod vector;

pub use error::SimError;
pub use sim::{Body, BodySnapshot, CollisionEvent, World, WorldSnapshot};
pub use vector::Vector;
