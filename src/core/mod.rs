//! Physics core: bodies, wall integration, overlap detection, collision response
//! and the world that ties them into a tick.

pub mod boundary;
pub mod collision;
pub mod config;
pub mod particle;
pub mod vecmath;
pub mod world;

pub use config::{WallRule, WorldConfig};
pub use particle::Particle;
pub use world::{TickStats, World};
