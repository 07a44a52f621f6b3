use crate::body::{BodyId, DynamicBody, StaticBody};
use crate::collision::sweep_aabb;
use crate::config::{DEFAULT_TIMESTEP, WorldConfig};
use crate::error::{Result, WorldError};
use crate::timer::StepTimer;
use glam::Vec3;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Fraction of a move held back at contact so bodies never end up touching.
const CONTACT_SKIN: f32 = 1e-5;

/// Outcome of one call into a stepping entry point.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct StepReport {
    /// Fixed substeps actually simulated. 0 means the call did no work.
    pub substeps: u32,
    /// Simulated time in seconds.
    pub simulated: f32,
}

/// The simulation a [`LinkedDynamicsWorld`](crate::LinkedDynamicsWorld) wraps.
///
/// Adding a body that is already present and destroying one that is absent are
/// both errors; implementations must never silently accept either.
pub trait DynamicsWorld {
    fn add_static_body(&mut self, body: StaticBody) -> Result<()>;

    fn destroy_static_body(&mut self, id: BodyId) -> Result<StaticBody>;

    fn contains_body(&self, id: BodyId) -> bool;

    /// Auto-step: runs as many fixed substeps as the elapsed time allows.
    fn update(&mut self) -> Result<StepReport>;

    /// One step of exactly `dt` seconds.
    fn force_update_with(&mut self, dt: f32) -> Result<StepReport>;

    /// One step of the world's default timestep.
    fn force_update(&mut self) -> Result<StepReport>;
}

/// Moves `body` along one axis by `distance`, stopping at the first static
/// body in the way. Returns the distance actually travelled.
fn move_along_axis(
    body: &mut DynamicBody,
    axis: usize,
    distance: f32,
    statics: &HashMap<BodyId, StaticBody>,
) -> f32 {
    if distance.abs() < f32::EPSILON {
        return 0.0;
    }

    let mut step = Vec3::ZERO;
    step[axis] = distance;

    let from = body.world_aabb();
    let swept = from.union(&from.translate(step));

    // earliest blocking contact as (time, normal component on `axis`)
    let mut contact: Option<(f32, f32)> = None;
    for obstacle in statics.values().map(|s| &s.aabb) {
        if !swept.intersects(obstacle) {
            continue;
        }
        let Some(hit) = sweep_aabb(&from, step, obstacle) else {
            continue;
        };
        let candidate = if hit.normal[axis].abs() > 0.1 {
            (hit.time, hit.normal[axis])
        } else if hit.normal == Vec3::ZERO
            && distance * (obstacle.center() - from.center())[axis] > 0.0
        {
            // already overlapping and moving deeper: stay put
            (0.0, -distance.signum())
        } else {
            continue;
        };
        if contact.is_none_or(|(time, _)| candidate.0 < time) {
            contact = Some(candidate);
        }
    }

    let Some((time, normal)) = contact else {
        body.position[axis] += distance;
        return distance;
    };

    let travelled = distance * (time - CONTACT_SKIN).max(0.0);
    body.position[axis] += travelled;

    if normal * distance < 0.0 {
        body.velocity[axis] = 0.0;
        if axis == 1 && normal > 0.5 {
            body.is_grounded = true;
        }
    }
    travelled
}

/// Box-and-voxel rigid body world: dynamic boxes swept against static boxes.
#[derive(Debug)]
pub struct VoxelDynamicsWorld {
    config: WorldConfig,
    timer: StepTimer,
    statics: HashMap<BodyId, StaticBody>,
    dynamics: HashMap<BodyId, DynamicBody>,
}

impl VoxelDynamicsWorld {
    pub fn new(config: WorldConfig) -> Result<Self> {
        config.validate()?;
        let step = config.step_duration()?;
        Ok(Self::with_valid_config(config, step))
    }

    fn with_valid_config(config: WorldConfig, step: Duration) -> Self {
        VoxelDynamicsWorld {
            timer: StepTimer::new(step, config.max_substeps),
            config,
            statics: HashMap::new(),
            dynamics: HashMap::new(),
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    pub fn start_at(&mut self, now: Instant) {
        log::debug!("Starting dynamics world");
        self.timer.start(now);
    }

    pub fn stop(&mut self) {
        log::debug!("Stopping dynamics world");
        self.timer.stop();
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Auto-step against an explicit clock reading.
    pub fn update_at(&mut self, now: Instant) -> Result<StepReport> {
        if !self.timer.is_running() {
            return Err(WorldError::NotRunning);
        }
        let substeps = self.timer.advance(now);
        let dt = self.config.timestep;
        for _ in 0..substeps {
            self.integrate(dt);
        }
        Ok(StepReport {
            substeps,
            simulated: substeps as f32 * dt,
        })
    }

    pub fn add_dynamic_body(&mut self, body: DynamicBody) -> Result<BodyId> {
        let id = body.id();
        if self.contains_body(id) {
            return Err(WorldError::DuplicateBody(id));
        }
        self.dynamics.insert(id, body);
        Ok(id)
    }

    pub fn remove_dynamic_body(&mut self, id: BodyId) -> Result<DynamicBody> {
        self.dynamics.remove(&id).ok_or(WorldError::MissingBody(id))
    }

    pub fn dynamic_body(&self, id: BodyId) -> Option<&DynamicBody> {
        self.dynamics.get(&id)
    }

    pub fn dynamic_body_mut(&mut self, id: BodyId) -> Option<&mut DynamicBody> {
        self.dynamics.get_mut(&id)
    }

    pub fn static_body(&self, id: BodyId) -> Option<&StaticBody> {
        self.statics.get(&id)
    }

    pub fn static_body_count(&self) -> usize {
        self.statics.len()
    }

    pub fn dynamic_body_count(&self) -> usize {
        self.dynamics.len()
    }

    /// Applies gravity, then moves every dynamic body axis by axis (x, z, y)
    /// with swept tests against the static bodies present right now.
    fn integrate(&mut self, dt: f32) {
        let gravity = self.config.gravity;
        let statics = &self.statics;
        for body in self.dynamics.values_mut() {
            body.velocity += gravity * body.gravity_scale * dt;
            body.is_grounded = false;
            let displacement = body.velocity * dt;
            move_along_axis(body, 0, displacement.x, statics);
            move_along_axis(body, 2, displacement.z, statics);
            move_along_axis(body, 1, displacement.y, statics);
        }
        log::trace!(
            "Integrated {} dynamic bodies against {} static bodies (dt = {})",
            self.dynamics.len(),
            self.statics.len(),
            dt
        );
    }
}

impl Default for VoxelDynamicsWorld {
    fn default() -> Self {
        Self::with_valid_config(
            WorldConfig::default(),
            Duration::from_secs_f32(DEFAULT_TIMESTEP),
        )
    }
}

impl DynamicsWorld for VoxelDynamicsWorld {
    fn add_static_body(&mut self, body: StaticBody) -> Result<()> {
        let id = body.id();
        if self.contains_body(id) {
            return Err(WorldError::DuplicateBody(id));
        }
        self.statics.insert(id, body);
        Ok(())
    }

    fn destroy_static_body(&mut self, id: BodyId) -> Result<StaticBody> {
        self.statics.remove(&id).ok_or(WorldError::MissingBody(id))
    }

    fn contains_body(&self, id: BodyId) -> bool {
        self.statics.contains_key(&id) || self.dynamics.contains_key(&id)
    }

    fn update(&mut self) -> Result<StepReport> {
        self.update_at(Instant::now())
    }

    fn force_update_with(&mut self, dt: f32) -> Result<StepReport> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(WorldError::InvalidTimestep(dt));
        }
        self.integrate(dt);
        Ok(StepReport {
            substeps: 1,
            simulated: dt,
        })
    }

    fn force_update(&mut self) -> Result<StepReport> {
        self.force_update_with(self.config.timestep)
    }
}
