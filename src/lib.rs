//! Mutually attracting circular bodies that merge when they touch.
//!
//! A [`World`] owns the bodies and exposes the two update phases,
//! [`World::tick_forces`] and [`World::tick_integrate`]. [`Simulation`] drives
//! both on their own timers from worker threads.

pub mod body;
pub mod color;
pub mod config;
pub mod error;
pub mod gravity;
pub mod simulation;
pub mod utils;
pub mod world;

pub use body::{Body, BodyId, Vector2};
pub use color::{Color, ColorSource};
pub use config::Config;
pub use error::{Error, Result};
pub use gravity::Gravity;
pub use simulation::Simulation;
pub use world::{BodyView, MergeEvent, Snapshot, World};
