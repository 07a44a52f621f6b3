mod aabb;
mod body;
mod collision;
mod config;
mod dynamics;
mod error;
mod linked;
mod provider;
mod timer;

pub use aabb::AABB;
pub use body::{BodyId, DynamicBody, StaticBody};
pub use collision::{SweepHit, sweep_aabb};
pub use config::{DEFAULT_GRAVITY, DEFAULT_MAX_SUBSTEPS, DEFAULT_TIMESTEP, WorldConfig};
pub use dynamics::{DynamicsWorld, StepReport, VoxelDynamicsWorld};
pub use error::{Result, WorldError};
pub use linked::LinkedDynamicsWorld;
pub use provider::{ChunkedGeometry, GeometryProvider, SolidBlock, static_bodies_in};
