//! One-step static geometry on top of a [`DynamicsWorld`].
//!
//! Static bodies handed to [`LinkedDynamicsWorld::add_linked_bodies`] exist in
//! the wrapped world for exactly the next step. Every stepping entry point
//! retires them right after delegating, whether the step did work, did
//! nothing, or failed.

use crate::body::{BodyId, StaticBody};
use crate::config::WorldConfig;
use crate::dynamics::{DynamicsWorld, StepReport, VoxelDynamicsWorld};
use crate::error::{Result, WorldError};
use smallvec::SmallVec;
use std::collections::HashSet;
use std::sync::Arc;

/// Linked bodies currently injected into the world and pending destruction.
#[derive(Debug, Default)]
enum LinkedBodies {
    #[default]
    Empty,
    Pending(HashSet<BodyId>),
}

impl LinkedBodies {
    fn contains(&self, id: BodyId) -> bool {
        match self {
            LinkedBodies::Empty => false,
            LinkedBodies::Pending(ids) => ids.contains(&id),
        }
    }

    fn len(&self) -> usize {
        match self {
            LinkedBodies::Empty => 0,
            LinkedBodies::Pending(ids) => ids.len(),
        }
    }

    /// empty -> pending, or pending -> pending (union).
    fn link(&mut self, ids: impl IntoIterator<Item = BodyId>) {
        let mut ids = ids.into_iter().peekable();
        if ids.peek().is_none() {
            return;
        }
        match self {
            LinkedBodies::Empty => *self = LinkedBodies::Pending(ids.collect()),
            LinkedBodies::Pending(pending) => pending.extend(ids),
        }
    }

    /// pending -> empty, or empty -> empty. Never a partial clear.
    fn take(&mut self) -> HashSet<BodyId> {
        match std::mem::take(self) {
            LinkedBodies::Empty => HashSet::new(),
            LinkedBodies::Pending(ids) => ids,
        }
    }
}

/// A dynamics world that absorbs externally supplied static bodies for a
/// single step and then destroys them.
///
/// The geometry provider is only held so callers can reach it through
/// [`provider`](Self::provider); this type never queries it.
pub struct LinkedDynamicsWorld<W, P: ?Sized> {
    world: W,
    provider: Arc<P>,
    linked: LinkedBodies,
    poisoned: Option<WorldError>,
}

impl<P: ?Sized> LinkedDynamicsWorld<VoxelDynamicsWorld, P> {
    pub fn with_config(config: WorldConfig, provider: Arc<P>) -> Result<Self> {
        Ok(Self::new(VoxelDynamicsWorld::new(config)?, provider))
    }
}

impl<W: DynamicsWorld, P: ?Sized> LinkedDynamicsWorld<W, P> {
    pub fn new(world: W, provider: Arc<P>) -> Self {
        LinkedDynamicsWorld {
            world,
            provider,
            linked: LinkedBodies::Empty,
            poisoned: None,
        }
    }

    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    /// Direct access to the wrapped world. Destroying a linked body through
    /// it breaks the next cleanup pass and poisons this world.
    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn pending_count(&self) -> usize {
        self.linked.len()
    }

    pub fn is_linked(&self, id: BodyId) -> bool {
        self.linked.contains(id)
    }

    pub fn is_poisoned(&self) -> bool {
        self.poisoned.is_some()
    }

    /// Adds static bodies for the next step only.
    ///
    /// Handles are deduplicated by identity, both within `bodies` and against
    /// bodies already linked this tick. The call is all-or-nothing: if any new
    /// handle is already in the world, nothing is added and the world is
    /// poisoned.
    pub fn add_linked_bodies<I>(&mut self, bodies: I) -> Result<()>
    where
        I: IntoIterator<Item = StaticBody>,
    {
        self.ensure_usable()?;

        let mut seen = HashSet::new();
        let fresh: SmallVec<[StaticBody; 16]> = bodies
            .into_iter()
            .filter(|body| !self.linked.contains(body.id()) && seen.insert(body.id()))
            .collect();
        if fresh.is_empty() {
            return Ok(());
        }

        if let Some(body) = fresh.iter().find(|body| self.world.contains_body(body.id())) {
            return Err(self.poison(WorldError::DuplicateBody(body.id())));
        }

        let mut added = SmallVec::<[BodyId; 16]>::with_capacity(fresh.len());
        let mut failure = None;
        for body in fresh {
            let id = body.id();
            match self.world.add_static_body(body) {
                Ok(()) => added.push(id),
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            }
        }
        log::trace!("Linked {} static bodies", added.len());
        self.linked.link(added);

        match failure {
            Some(err) => Err(self.poison(err)),
            None => Ok(()),
        }
    }

    /// Auto-step, then retire linked bodies.
    pub fn update(&mut self) -> Result<StepReport> {
        self.ensure_usable()?;
        let stepped = self.world.update();
        self.finish_step(stepped)
    }

    /// One step of `dt` seconds, then retire linked bodies.
    pub fn force_update_with(&mut self, dt: f32) -> Result<StepReport> {
        self.ensure_usable()?;
        let stepped = self.world.force_update_with(dt);
        self.finish_step(stepped)
    }

    /// One step of the default timestep, then retire linked bodies.
    pub fn force_update(&mut self) -> Result<StepReport> {
        self.ensure_usable()?;
        let stepped = self.world.force_update();
        self.finish_step(stepped)
    }

    /// Tears the linked layer down, retiring bodies linked since the last
    /// step, and hands back the wrapped world.
    pub fn into_inner(mut self) -> Result<W> {
        if let Some(cause) = &self.poisoned {
            return Err(WorldError::Poisoned {
                cause: Box::new(cause.clone()),
            });
        }
        self.destroy_and_clear()?;
        Ok(self.world)
    }

    fn finish_step(&mut self, stepped: Result<StepReport>) -> Result<StepReport> {
        let cleaned = self.destroy_and_clear();
        match (stepped, cleaned) {
            (Ok(report), Ok(retired)) => {
                log::debug!(
                    "Stepped {} substeps ({}s), retired {} linked bodies",
                    report.substeps,
                    report.simulated,
                    retired
                );
                Ok(report)
            }
            (Err(step_err), Ok(retired)) => {
                log::debug!("Step failed ({step_err}), retired {retired} linked bodies");
                Err(step_err)
            }
            (Ok(_), Err(cleanup_err)) => Err(cleanup_err),
            (Err(step_err), Err(cleanup_err)) => {
                log::error!("Step failed ({step_err}) and cleanup failed ({cleanup_err})");
                Err(cleanup_err)
            }
        }
    }

    /// Destroys every linked body exactly once and empties the tracking set.
    /// A body the world no longer has is a broken invariant: the remaining
    /// bodies are still destroyed, then the world is poisoned.
    fn destroy_and_clear(&mut self) -> Result<usize> {
        let pending = self.linked.take();
        let mut retired = 0;
        let mut first_missing = None;
        for id in pending {
            match self.world.destroy_static_body(id) {
                Ok(_) => retired += 1,
                Err(err) => {
                    log::error!("Linked body {id} vanished before cleanup: {err}");
                    first_missing.get_or_insert(err);
                }
            }
        }
        match first_missing {
            Some(err) => Err(self.poison(err)),
            None => Ok(retired),
        }
    }

    fn ensure_usable(&self) -> Result<()> {
        match &self.poisoned {
            Some(cause) => Err(WorldError::Poisoned {
                cause: Box::new(cause.clone()),
            }),
            None => Ok(()),
        }
    }

    /// Records a fatal error and retires whatever is still linked so the
    /// wrapped world is left without stale bodies.
    fn poison(&mut self, err: WorldError) -> WorldError {
        log::error!("Linked world poisoned: {err}");
        self.poisoned = Some(err.clone());
        for id in self.linked.take() {
            if let Err(cleanup_err) = self.world.destroy_static_body(id) {
                log::error!("Could not retire linked body {id}: {cleanup_err}");
            }
        }
        err
    }
}
