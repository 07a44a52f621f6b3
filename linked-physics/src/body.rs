use crate::aabb::AABB;
use glam::Vec3;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_BODY_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a body. Allocated once per body and never reused, so two bodies
/// with identical geometry still have distinct ids.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(u64);

impl BodyId {
    pub fn next() -> Self {
        BodyId(NEXT_BODY_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Immobile collision geometry.
///
/// Equality and hashing only look at the id: a clone is the same body, while a
/// second body built from the same box is not.
#[derive(Debug, Clone)]
pub struct StaticBody {
    id: BodyId,
    pub aabb: AABB,
}

impl StaticBody {
    pub fn new(aabb: AABB) -> Self {
        StaticBody {
            id: BodyId::next(),
            aabb,
        }
    }

    #[inline]
    pub fn id(&self) -> BodyId {
        self.id
    }
}

impl PartialEq for StaticBody {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for StaticBody {}

impl Hash for StaticBody {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[derive(Debug, Clone)]
pub struct DynamicBody {
    id: BodyId,
    /// center of the AABB.
    pub position: Vec3,
    pub velocity: Vec3,
    pub dimensions: Vec3,
    pub is_grounded: bool,
    /// Multiplier on world gravity. 0.0 makes the body float.
    pub gravity_scale: f32,
}

impl DynamicBody {
    pub fn new(position: Vec3, dimensions: Vec3) -> Self {
        DynamicBody {
            id: BodyId::next(),
            position,
            velocity: Vec3::ZERO,
            dimensions,
            is_grounded: false,
            gravity_scale: 1.0,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_gravity_scale(mut self, gravity_scale: f32) -> Self {
        self.gravity_scale = gravity_scale;
        self
    }

    #[inline]
    pub fn id(&self) -> BodyId {
        self.id
    }

    /// World-space AABB of body at current position.
    pub fn world_aabb(&self) -> AABB {
        AABB::from_center_dims(self.position, self.dimensions)
    }
}
